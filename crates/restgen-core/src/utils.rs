//! String utilities for emitting C# source

// External imports (alphabetized)
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except RFC 3986 unreserved characters, matching `Uri.EscapeDataString`.
const DATA_STRING: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a URL component at generation time
pub fn escape_data_string(s: &str) -> String {
    utf8_percent_encode(s, DATA_STRING).to_string()
}

/// Replace literal braces so they survive inside an interpolated string
pub fn encode_braces(s: &str) -> String {
    s.replace('{', "%7B").replace('}', "%7D")
}

fn escape_into(out: &mut String, s: &str, interpolated: bool) {
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            '{' if interpolated => out.push_str("{{"),
            '}' if interpolated => out.push_str("}}"),
            _ => out.push(ch),
        }
    }
}

/// Body of a regular string literal, without the quotes
pub fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(&mut out, s, false);
    out
}

/// Body of an interpolated string literal: braces doubled as well
pub fn escape_interpolated(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(&mut out, s, true);
    out
}

/// A quoted C# string literal
pub fn quote(s: &str) -> String {
    format!("\"{}\"", escape_literal(s))
}

/// Escape text for an XML documentation comment
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
