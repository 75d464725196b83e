//! URL planning for one endpoint.
//!
//! [`plan`] splits the route into a static, interpolated template and a list of
//! runtime [`QueryStep`]s. The template receives:
//!
//! 1. path holes bound to `Path` sites,
//! 2. required scalar query values without a serializer,
//! 3. required raw query fragments.
//!
//! Everything whose presence or cardinality is only known at call time
//! (optional values, collections, query maps, serializer output) becomes a
//! step for the runtime URL builder, in declaration order.

pub mod format;

// Internal imports (std, crate)
use crate::model::hooks::resolve_exact;
use crate::model::{
    resolve, ClassModel, HttpLocation, LocationAttribute, MethodModel,
    RequestQueryParamSerializerModel, TypeDescriptor, TypedSite, WellKnown,
};
use crate::utils::{encode_braces, escape_data_string, escape_interpolated, escape_literal, quote};

// External imports (alphabetized)
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

pub use format::ValueFormat;

/// `{name}` route placeholders.
static HOLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{|}]*)\}").expect("Invalid regex"));

/// One piece of the static route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    /// Content of an interpolation hole.
    Hole(String),
}

/// The part of the URL that is known when the method is generated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTemplate {
    head: Vec<Segment>,
    /// Fragment text after `#`, kept behind any query.
    anchor: Option<String>,
}

impl PathTemplate {
    fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Text(last)) = self.head.last_mut() {
            last.push_str(&text);
        } else {
            self.head.push(Segment::Text(text));
        }
    }

    fn push_hole(&mut self, content: impl Into<String>) {
        self.head.push(Segment::Hole(content.into()));
    }

    fn has_query(&self) -> bool {
        self.head
            .iter()
            .any(|s| matches!(s, Segment::Text(t) if t.contains('?')))
    }

    fn separator(&self) -> char {
        if self.has_query() {
            '&'
        } else {
            '?'
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.head
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    pub fn is_interpolated(&self) -> bool {
        self.head.iter().any(|s| matches!(s, Segment::Hole(_)))
    }

    fn render(&self, with_anchor: bool) -> String {
        let interpolated = self.is_interpolated();
        let escape = |text: &str| {
            if interpolated {
                escape_interpolated(text)
            } else {
                escape_literal(text)
            }
        };

        let mut body = String::new();
        for segment in &self.head {
            match segment {
                Segment::Text(text) => body.push_str(&escape(text)),
                Segment::Hole(content) => {
                    body.push('{');
                    body.push_str(content);
                    body.push('}');
                }
            }
        }
        if let (true, Some(anchor)) = (with_anchor, &self.anchor) {
            body.push('#');
            body.push_str(&escape(anchor));
        }

        if interpolated {
            format!("$\"{body}\"")
        } else {
            format!("\"{body}\"")
        }
    }

    /// The whole URL as a C# string expression.
    pub fn to_csharp(&self) -> String {
        self.render(true)
    }

    /// The URL up to (not including) the fragment.
    pub fn head_csharp(&self) -> String {
        self.render(false)
    }

    /// The fragment as a C# string literal, `#` included.
    pub fn anchor_csharp(&self) -> Option<String> {
        self.anchor.as_ref().map(|a| quote(&format!("#{a}")))
    }
}

/// How a runtime value is turned into query text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Format(ValueFormat),
    /// A serializer hook; its pairs are escaped when `escape` is set.
    Serializer {
        name: String,
        format: Option<String>,
        escape: bool,
    },
}

impl QueryValue {
    /// Serializer resolution for one site, else the formatting rules.
    fn for_site(
        serializers: &[RequestQueryParamSerializerModel],
        ty: &TypeDescriptor,
        location: &LocationAttribute,
    ) -> Self {
        match resolve(serializers, Some(ty)) {
            Some(serializer) => Self::serializer(serializer, location),
            None => Self::Format(ValueFormat::decide(ty, location)),
        }
    }

    fn serializer(
        serializer: &RequestQueryParamSerializerModel,
        location: &LocationAttribute,
    ) -> Self {
        Self::Serializer {
            name: serializer.name.clone(),
            format: serializer.has_format.then(|| location.format.clone()),
            escape: location.url_encode,
        }
    }

    /// Format applied to each key and value a serializer yields.
    pub fn pair_format(escape: bool) -> ValueFormat {
        ValueFormat::for_string(escape)
    }
}

/// One call-time addition to the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStep {
    /// `key=value` for one value, or serializer output for it.
    Scalar {
        expr: String,
        key: String,
        guard: bool,
        value: QueryValue,
    },
    /// One `key=item` per element.
    Collection {
        expr: String,
        key: String,
        guard: bool,
        item_null_skip: bool,
        value: QueryValue,
    },
    /// One pair per entry (or per element of a collection-valued entry).
    Map {
        expr: String,
        guard: bool,
        key: ValueFormat,
        /// Keys are strings already; serializers receive them as-is.
        key_is_string: bool,
        value_null_skip: bool,
        /// `Some(item_null_skip)` when entry values are iterated.
        nested: Option<bool>,
        value: QueryValue,
    },
    /// A pre-formed fragment appended as-is.
    Raw { expr: String, guard: bool },
}

impl QueryStep {
    pub fn expr(&self) -> &str {
        match self {
            Self::Scalar { expr, .. }
            | Self::Collection { expr, .. }
            | Self::Map { expr, .. }
            | Self::Raw { expr, .. } => expr,
        }
    }

    pub fn guard(&self) -> bool {
        match self {
            Self::Scalar { guard, .. }
            | Self::Collection { guard, .. }
            | Self::Map { guard, .. }
            | Self::Raw { guard, .. } => *guard,
        }
    }
}

/// Everything needed to compose one endpoint's URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPlan {
    pub template: PathTemplate,
    pub steps: Vec<QueryStep>,
}

impl PathPlan {
    /// Whether a runtime builder (and a `CreatePath` helper) is needed.
    pub fn needs_builder(&self) -> bool {
        !self.steps.is_empty()
    }
}

/// Method parameters first, then class properties.
fn sites<'a>(method: &'a MethodModel, class: &'a ClassModel) -> Vec<&'a dyn TypedSite> {
    method
        .parameters
        .iter()
        .map(|p| p as &dyn TypedSite)
        .chain(class.properties.iter().map(|p| p as &dyn TypedSite))
        .collect()
}

/// Phase 1: bind `{name}` holes to `Path` sites.
fn fill_holes(template: &mut PathTemplate, route: &str, sites: &[&dyn TypedSite]) {
    let mut last = 0;
    for caps in HOLE.captures_iter(route) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        template.push_text(encode_braces(&route[last..whole.start()]));
        last = whole.end();

        let name = &caps[1];
        let site = sites.iter().find(|site| {
            site.located(HttpLocation::Path) && (site.name() == name || site.key() == name)
        });
        match site {
            Some(site) => {
                let ty = site.descriptor();
                template.push_hole(ValueFormat::decide(ty, &ty.location).inline(site.name()));
            }
            None => template.push_text(encode_braces(whole.as_str())),
        }
    }
    template.push_text(encode_braces(&route[last..]));
}

fn query_step(
    site: &dyn TypedSite,
    serializers: &[RequestQueryParamSerializerModel],
) -> QueryStep {
    let ty = site.descriptor();
    let location = &ty.location;
    let key = site.key().to_string();
    let expr = site.name().to_string();
    let guard = ty.is_optional();

    if let (true, Some(item)) = (ty.is_collection, ty.collection_item()) {
        // A serializer for the exact collection type takes the whole value.
        if let Some(serializer) = resolve_exact(serializers, ty) {
            return QueryStep::Scalar {
                expr,
                key,
                guard,
                value: QueryValue::serializer(serializer, location),
            };
        }
        return QueryStep::Collection {
            expr,
            key,
            guard,
            item_null_skip: item.is_optional(),
            value: QueryValue::for_site(serializers, item, location),
        };
    }

    QueryStep::Scalar {
        expr,
        key,
        guard,
        value: QueryValue::for_site(serializers, ty, location),
    }
}

fn map_step(
    site: &dyn TypedSite,
    serializers: &[RequestQueryParamSerializerModel],
) -> Option<QueryStep> {
    let ty = site.descriptor();
    let location = &ty.location;
    let [key_type, value_type] = site.generic_types() else {
        debug!("{} is not a key/value map; skipped", site.name());
        return None;
    };

    let key_is_string = key_type.is(WellKnown::String);
    let key = if key_is_string {
        ValueFormat::for_string(location.url_encode)
    } else {
        ValueFormat::decide(
            key_type,
            &LocationAttribute::new(HttpLocation::QueryMap).with_url_encode(location.url_encode),
        )
    };

    let (nested, value) = match (value_type.is_collection, value_type.collection_item()) {
        (true, Some(item)) => match resolve_exact(serializers, value_type) {
            Some(serializer) => (None, QueryValue::serializer(serializer, location)),
            None => (
                Some(item.is_optional()),
                QueryValue::for_site(serializers, item, location),
            ),
        },
        _ => (None, QueryValue::for_site(serializers, value_type, location)),
    };

    Some(QueryStep::Map {
        expr: site.name().to_string(),
        guard: ty.is_optional(),
        key,
        key_is_string,
        value_null_skip: value_type.is_nullable,
        nested,
        value,
    })
}

/// Plans the URL of `method` against the sites and hooks of `class`.
pub fn plan(method: &MethodModel, class: &ClassModel) -> PathPlan {
    let sites = sites(method, class);
    let serializers = &class.request_query_param_serializers;

    let (route, anchor) = match method.path.split_once('#') {
        Some((route, anchor)) => (route, Some(anchor.to_string())),
        None => (method.path.as_str(), None),
    };
    let mut template = PathTemplate {
        head: Vec::new(),
        anchor,
    };
    fill_holes(&mut template, route, &sites);

    // Phase 2
    for site in &sites {
        let ty = site.descriptor();
        if !site.located(HttpLocation::Query)
            || ty.is_collection
            || ty.is_optional()
            || resolve(serializers, Some(ty)).is_some()
        {
            continue;
        }
        let separator = template.separator();
        template.push_text(format!("{separator}{}=", escape_data_string(site.key())));
        template.push_hole(ValueFormat::decide(ty, &ty.location).inline(site.name()));
    }

    // Phase 3
    for site in &sites {
        if site.located(HttpLocation::Raw) && !site.descriptor().is_optional() {
            let separator = template.separator();
            template.push_text(separator.to_string());
            template.push_hole(site.name());
        }
    }

    // Phase 4
    let mut steps = Vec::new();
    for site in &sites {
        let ty = site.descriptor();
        match ty.location.location {
            HttpLocation::Query
                if ty.is_collection
                    || ty.is_optional()
                    || resolve(serializers, Some(ty)).is_some() =>
            {
                steps.push(query_step(*site, serializers));
            }
            HttpLocation::QueryMap => steps.extend(map_step(*site, serializers)),
            HttpLocation::Raw if ty.is_optional() => steps.push(QueryStep::Raw {
                expr: site.name().to_string(),
                guard: true,
            }),
            _ => {}
        }
    }

    debug!(
        "{}: path {} with {} runtime step(s)",
        method.name,
        template.head_csharp(),
        steps.len()
    );
    PathPlan { template, steps }
}
