//! Request header statements.
//!
//! Well-known header names map onto the typed setters of `HttpHeaders`; any
//! other name is added as a raw name/value pair.

// Internal imports (std, crate)
use crate::emit::writer::SourceWriter;
use crate::model::{HttpLocation, LocationAttribute, TypedSite};
use crate::planner::ValueFormat;
use crate::utils::quote;

/// Quoted, whitespace-separated parts of `value`, at most `limit` of them.
fn parts(value: &str, limit: usize) -> String {
    value
        .split_whitespace()
        .take(limit)
        .map(quote)
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn looks_like_date(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
}

/// Typed setter for a well-known header with a static value, relative to a
/// headers collection (`Accept.Add(..)`, `Authorization = ..`).
pub fn typed_setter(name: &str, value: &str) -> Option<String> {
    let v = quote(value);
    let setter = match name {
        "Accept" => format!("Accept.Add(new MediaTypeWithQualityHeaderValue({v}))"),
        "Accept-Charset" => format!("AcceptCharset.Add(new StringWithQualityHeaderValue({v}))"),
        "Accept-Encoding" => format!("AcceptEncoding.Add(new StringWithQualityHeaderValue({v}))"),
        "Accept-Language" => format!("AcceptLanguage.Add(new StringWithQualityHeaderValue({v}))"),
        "Authorization" => format!(
            "Authorization = new AuthenticationHeaderValue({})",
            parts(value, 2)
        ),
        "Connection" => format!("Connection.Add({v})"),
        "ConnectionClose" => format!("ConnectionClose = {}", parse_bool(value)?),
        "Date" if looks_like_date(value) => format!("Date = DateTimeOffset.Parse({v})"),
        "Expect" => format!("Expect.Add(new NameValueWithParametersHeaderValue({v}))"),
        "ExpectContinue" => format!("ExpectContinue = {}", parse_bool(value)?),
        "From" => format!("From = {v}"),
        "Host" => format!("Host = {v}"),
        "If-Match" => format!("IfMatch.Add(new EntityTagHeaderValue({v}))"),
        "If-Modified-Since" if looks_like_date(value) => {
            format!("IfModifiedSince = DateTimeOffset.Parse({v})")
        }
        "If-None-Match" => format!("IfNoneMatch.Add(new EntityTagHeaderValue({v}))"),
        "If-Range" => format!("IfRange = new RangeConditionHeaderValue({v})"),
        "If-Unmodified-Since" if looks_like_date(value) => {
            format!("IfUnmodifiedSince = DateTimeOffset.Parse({v})")
        }
        "Max-Forwards" => format!("MaxForwards = {}", value.trim().parse::<i32>().ok()?),
        "Pragma" => format!("Pragma.Add(new NameValueHeaderValue({v}))"),
        ":protocol" => format!("Protocol = {v}"),
        "Proxy-Authorization" => format!(
            "ProxyAuthorization = new AuthenticationHeaderValue({})",
            parts(value, 2)
        ),
        "Referer" => format!("Referrer = new Uri({v}, UriKind.RelativeOrAbsolute)"),
        "TE" => format!("TE.Add(new TransferCodingWithQualityHeaderValue({v}))"),
        "Trailer" => format!("Trailer.Add({v})"),
        "Transfer-Encoding" => format!("TransferEncoding.Add(new TransferCodingHeaderValue({v}))"),
        "TransferEncodingChunked" => format!("TransferEncodingChunked = {}", parse_bool(value)?),
        "Upgrade" => format!("Upgrade.Add(new ProductHeaderValue({}))", parts(value, 2)),
        "User-Agent" => format!("UserAgent.Add(new ProductInfoHeaderValue({}))", parts(value, 2)),
        "Via" => format!("Via.Add(new ViaHeaderValue({}))", parts(value, 4)),
        _ => return None,
    };
    Some(setter)
}

/// One statement applying a static header to the `target` headers collection.
///
/// Returns `None` for a header attribute without a name.
pub fn static_header(target: &str, location: &LocationAttribute) -> Option<String> {
    let name = location.name.as_deref().filter(|n| !n.is_empty())?;
    let value = location.value.as_deref().unwrap_or_default();
    Some(match typed_setter(name, value) {
        Some(setter) => format!("{target}.{setter};"),
        None => format!("{target}.Add({}, {});", quote(name), quote(value)),
    })
}

/// String expression for a header site. Header values are never percent-encoded.
fn site_value(site: &dyn TypedSite) -> String {
    let ty = site.descriptor();
    ValueFormat::decide(ty, &ty.location.clone().with_url_encode(false)).expression(site.name())
}

/// Header statements for one request: site headers first (first site per key
/// wins), then method defaults that no site overrides.
pub fn write_request_headers(
    w: &mut SourceWriter,
    sites: &[&dyn TypedSite],
    defaults: &[&LocationAttribute],
) {
    let mut seen: Vec<String> = Vec::new();
    for site in sites.iter().filter(|s| s.located(HttpLocation::Header)) {
        let key = site.key().to_string();
        if seen.iter().any(|k| k.eq_ignore_ascii_case(&key)) {
            continue;
        }
        let default = defaults
            .iter()
            .find(|d| d.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(&key)))
            .and_then(|d| d.value.as_deref());
        let value = site_value(*site);
        let name = quote(&key);

        match (site.descriptor().is_optional(), default) {
            (true, Some(default)) => w.line(format!(
                "request.Headers.Add({name}, {} is not null ? {value} : {});",
                site.name(),
                quote(default)
            )),
            (true, None) => {
                w.open(format!("if ({} is not null)", site.name()));
                w.line(format!("request.Headers.Add({name}, {value});"));
                w.close();
            }
            (false, _) => w.line(format!("request.Headers.Add({name}, {value});")),
        }
        seen.push(key);
    }

    for default in defaults {
        let overridden = default
            .name
            .as_deref()
            .is_some_and(|n| seen.iter().any(|k| k.eq_ignore_ascii_case(n)));
        if overridden {
            continue;
        }
        if let Some(statement) = static_header("request.Headers", default) {
            w.line(statement);
        }
    }
}
