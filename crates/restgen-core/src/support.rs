//! Runtime support unit shared by every generated client.

// Internal imports (std, crate)
use crate::config::GenerationOptions;
use crate::generate::GeneratedSource;
use crate::Result;

// External imports (alphabetized)
use serde::Serialize;
use tera::{Context, Tera};

/// Hint name of the URL builder unit.
pub const URL_BUILDER_HINT: &str = "UrlBuilder.g.cs";

const URL_BUILDER_TEMPLATE: &str = include_str!("../templates/UrlBuilder.cs.tera");

/// Characters rented up front for short paths.
const INITIAL_CAPACITY: usize = 256;

#[derive(Debug, Serialize)]
struct SupportContext<'a> {
    namespace: &'a str,
    tool: &'a str,
    version: &'a str,
    initial_capacity: usize,
}

/// Renders the `UrlBuilder` struct into the configured runtime namespace.
pub fn url_builder(options: &GenerationOptions) -> Result<GeneratedSource> {
    let mut tera = Tera::default();
    tera.add_raw_template("UrlBuilder.cs", URL_BUILDER_TEMPLATE)?;

    let context = Context::from_serialize(SupportContext {
        namespace: &options.runtime_namespace,
        tool: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        initial_capacity: INITIAL_CAPACITY,
    })?;
    let text = tera.render("UrlBuilder.cs", &context)?;

    Ok(GeneratedSource {
        hint_name: URL_BUILDER_HINT.to_string(),
        text: if options.indent == "\t" {
            text
        } else {
            text.replace('\t', &options.indent)
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_builder_renders_into_runtime_namespace() {
        let options = GenerationOptions {
            runtime_namespace: "Acme.Http".into(),
            indent: "    ".into(),
            ..Default::default()
        };
        let unit = url_builder(&options).unwrap();

        assert_eq!(unit.hint_name, "UrlBuilder.g.cs");
        assert!(unit.text.starts_with("// <auto-generated/>"));
        assert!(unit.text.contains("namespace Acme.Http;"));
        assert!(unit.text.contains("internal struct UrlBuilder"));
        assert!(unit.text.contains("    public void AppendQuery(string key, string? value)"));
        assert!(unit.text.contains("Math.Max(path.Length * 2, 256)"));
        assert!(!unit.text.contains('\t'));
        assert!(!unit.text.contains("{{"));
    }
}
