//! Value formatting rules for URL components.
//!
//! Every value placed in a path or query goes through [`ValueFormat::decide`],
//! which applies these rules in order:
//!
//! 1. strings are percent-encoded unless `UrlEncode = false`;
//! 2. a format containing `{0}` placeholders is a template for the value;
//! 3. with encoding on, types outside the URL-safe primitive list are formatted
//!    and then percent-encoded;
//! 4. a plain format is a format specifier;
//! 5. otherwise the value's natural string form is used.
//!
//! Encoding always applies to the final formatted text.

// Internal imports (std, crate)
use crate::model::{LocationAttribute, TypeDescriptor, WellKnown};
use crate::utils::{escape_interpolated, quote};

// External imports (alphabetized)
use once_cell::sync::Lazy;
use regex::Regex;

/// `{0}`, `{1:N2}`: positional placeholders of a format template.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\d+)(:[^}]*)?\}").expect("Invalid regex"));

/// `System` types whose text never needs percent-encoding.
const URL_SAFE: &[&str] = &[
    "short", "Int16", "int", "Int32", "long", "Int64", "ushort", "UInt16", "uint", "UInt32",
    "ulong", "UInt64", "float", "Single", "double", "Double", "decimal", "Decimal", "bool",
    "Boolean", "char", "Char",
];

/// Whether `format` is a template rather than a specifier.
pub fn has_placeholders(format: &str) -> bool {
    !format.is_empty() && PLACEHOLDER.is_match(format)
}

/// Whether the text of `ty` may contain characters that need encoding.
pub fn needs_url_encoding(ty: &TypeDescriptor) -> bool {
    let name = ty.type_name.trim_end_matches('?');
    !(ty.namespace == "System" && URL_SAFE.contains(&name))
}

/// Body of an interpolated string with placeholder 0 bound to `expr`.
///
/// Placeholders with other indices have nothing to bind to and stay literal.
pub fn fill_template(format: &str, expr: &str) -> String {
    let mut out = String::new();
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(format) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&escape_interpolated(&format[last..whole.start()]));
        if &caps[1] == "0" {
            out.push('{');
            out.push_str(expr);
            if let Some(spec) = caps.get(2) {
                out.push_str(spec.as_str());
            }
            out.push('}');
        } else {
            out.push_str(&escape_interpolated(whole.as_str()));
        }
        last = whole.end();
    }
    out.push_str(&escape_interpolated(&format[last..]));
    out
}

/// How one value becomes URL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueFormat {
    /// `Uri.EscapeDataString(x)`
    EscapedString,
    /// A string used as-is.
    RawString,
    /// `$"..{x:spec}.."`, optionally percent-encoded.
    Template { format: String, escape: bool },
    /// `Uri.EscapeDataString(x.ToString(format))`
    EscapedText {
        format: Option<String>,
        unwrap: bool,
    },
    /// `x.ToString(format)`, or `{x:format}` inside an interpolation.
    Specifier { format: String, unwrap: bool },
    /// `x.ToString()`, or `{x}` inside an interpolation.
    Natural,
}

impl ValueFormat {
    pub fn decide(ty: &TypeDescriptor, location: &LocationAttribute) -> Self {
        let unwrap = ty.is_nullable_value_type();
        if ty.is(WellKnown::String) {
            return if location.url_encode {
                Self::EscapedString
            } else {
                Self::RawString
            };
        }
        if has_placeholders(&location.format) {
            return Self::Template {
                format: location.format.clone(),
                escape: location.url_encode,
            };
        }
        if location.url_encode && needs_url_encoding(ty) {
            return Self::EscapedText {
                format: location.has_format().then(|| location.format.clone()),
                unwrap,
            };
        }
        if location.has_format() {
            return if location.url_encode {
                Self::EscapedText {
                    format: Some(location.format.clone()),
                    unwrap,
                }
            } else {
                Self::Specifier {
                    format: location.format.clone(),
                    unwrap,
                }
            };
        }
        Self::Natural
    }

    /// Formatting for serializer output and other plain strings.
    pub fn for_string(url_encode: bool) -> Self {
        if url_encode {
            Self::EscapedString
        } else {
            Self::RawString
        }
    }

    fn to_string_call(expr: &str, format: Option<&str>, unwrap: bool) -> String {
        let target = if unwrap {
            format!("{expr}.Value")
        } else {
            expr.to_string()
        };
        match format {
            Some(format) => format!("{target}.ToString({})", quote(format)),
            None => format!("{target}.ToString()"),
        }
    }

    /// Content of an interpolation hole (without the braces).
    pub fn inline(&self, expr: &str) -> String {
        match self {
            Self::Specifier { format, .. } => format!("{expr}:{}", escape_hole_format(format)),
            Self::Natural | Self::RawString => expr.to_string(),
            _ => self.expression(expr),
        }
    }

    /// A C# expression of type `string`.
    pub fn expression(&self, expr: &str) -> String {
        match self {
            Self::EscapedString => format!("Uri.EscapeDataString({expr})"),
            Self::RawString => expr.to_string(),
            Self::Template { format, escape } => {
                let text = format!("$\"{}\"", fill_template(format, expr));
                if *escape {
                    format!("Uri.EscapeDataString({text})")
                } else {
                    text
                }
            }
            Self::EscapedText { format, unwrap } => format!(
                "Uri.EscapeDataString({})",
                Self::to_string_call(expr, format.as_deref(), *unwrap)
            ),
            Self::Specifier { format, unwrap } => {
                Self::to_string_call(expr, Some(format), *unwrap)
            }
            Self::Natural => format!("{expr}.ToString()"),
        }
    }
}

/// A format specifier inside `{x:spec}` may not contain braces or quotes.
fn escape_hole_format(format: &str) -> String {
    format
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '"' | '\\'))
        .collect()
}
