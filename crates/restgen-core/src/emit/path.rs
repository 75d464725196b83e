//! The `CreatePath` helper that composes a URL at call time.

// Internal imports (std, crate)
use crate::emit::writer::SourceWriter;
use crate::planner::{PathPlan, QueryStep, QueryValue, ValueFormat};
use crate::utils::{escape_data_string, quote};

/// Name of the local function emitted for runtime URLs.
pub const CREATE_PATH: &str = "CreatePath";

fn skip_null(w: &mut SourceWriter, expr: &str) {
    w.line(format!("if ({expr} is null) continue;"));
}

/// `AppendQuery` calls for one value under a static key.
fn append_value(w: &mut SourceWriter, key: &str, value: &QueryValue, expr: &str) {
    match value {
        QueryValue::Format(format) => w.line(format!(
            "_builder.AppendQuery({}, {});",
            quote(&escape_data_string(key)),
            format.expression(expr)
        )),
        QueryValue::Serializer { .. } => append_serialized(w, &quote(key), value, expr),
    }
}

/// Loops over the pairs a serializer yields for `expr`, passing `key` through.
fn append_serialized(w: &mut SourceWriter, key: &str, value: &QueryValue, expr: &str) {
    let QueryValue::Serializer {
        name,
        format,
        escape,
    } = value
    else {
        return;
    };
    let call = match format {
        Some(format) => format!("{name}({key}, {expr}, {})", quote(format)),
        None => format!("{name}({key}, {expr})"),
    };
    let pair = QueryValue::pair_format(*escape);
    w.open(format!("foreach (var _pair in {call})"));
    w.line(format!(
        "_builder.AppendQuery({}, {});",
        pair.expression("_pair.Key"),
        pair.expression("_pair.Value")
    ));
    w.close();
}

fn write_step(w: &mut SourceWriter, step: &QueryStep) {
    w.blank();
    w.open_if(step.guard(), format!("if ({} is not null)", step.expr()));
    match step {
        QueryStep::Scalar {
            expr, key, value, ..
        } => append_value(w, key, value, expr),
        QueryStep::Collection {
            expr,
            key,
            item_null_skip,
            value,
            ..
        } => {
            w.open(format!("foreach (var _item in {expr})"));
            if *item_null_skip {
                skip_null(w, "_item");
            }
            append_value(w, key, value, "_item");
            w.close();
        }
        QueryStep::Map {
            expr,
            key,
            key_is_string,
            value_null_skip,
            nested,
            value,
            ..
        } => {
            w.open(format!("foreach (var _entry in {expr})"));
            if *value_null_skip {
                skip_null(w, "_entry.Value");
            }
            let item = match nested {
                Some(item_null_skip) => {
                    w.open("foreach (var _value in _entry.Value)");
                    if *item_null_skip {
                        skip_null(w, "_value");
                    }
                    "_value"
                }
                None => "_entry.Value",
            };
            match value {
                QueryValue::Format(format) => w.line(format!(
                    "_builder.AppendQuery({}, {});",
                    key.expression("_entry.Key"),
                    format.expression(item)
                )),
                QueryValue::Serializer { .. } => {
                    let raw_key = if *key_is_string {
                        "_entry.Key".to_string()
                    } else {
                        ValueFormat::Natural.expression("_entry.Key")
                    };
                    append_serialized(w, &raw_key, value, item);
                }
            }
            if nested.is_some() {
                w.close();
            }
            w.close();
        }
        QueryStep::Raw { expr, .. } => w.line(format!("_builder.AppendRaw($\"{{{expr}}}\");")),
    }
    w.close();
}

/// Writes `string CreatePath()` for a plan that needs a runtime builder.
pub fn write_create_path(w: &mut SourceWriter, plan: &PathPlan) {
    w.open(format!("string {CREATE_PATH}()"));
    w.line(format!(
        "var _builder = new UrlBuilder({});",
        plan.template.head_csharp()
    ));
    for step in &plan.steps {
        write_step(w, step);
    }
    w.blank();
    match plan.template.anchor_csharp() {
        Some(anchor) => w.line(format!("return _builder.ToStringAndClear() + {anchor};")),
        None => w.line("return _builder.ToStringAndClear();"),
    }
    w.close();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(steps: Vec<QueryStep>) -> String {
        let mut w = SourceWriter::new("\t");
        write_create_path(
            &mut w,
            &PathPlan {
                template: Default::default(),
                steps,
            },
        );
        w.finish()
    }

    #[test]
    fn test_guarded_scalar() {
        let text = render(vec![QueryStep::Scalar {
            expr: "size".into(),
            key: "page size".into(),
            guard: true,
            value: QueryValue::Format(ValueFormat::Natural),
        }]);
        assert_eq!(
            text,
            concat!(
                "string CreatePath()\n",
                "{\n",
                "\tvar _builder = new UrlBuilder(\"\");\n",
                "\n",
                "\tif (size is not null)\n",
                "\t{\n",
                "\t\t_builder.AppendQuery(\"page%20size\", size.ToString());\n",
                "\t}\n",
                "\n",
                "\treturn _builder.ToStringAndClear();\n",
                "}\n",
            )
        );
    }

    #[test]
    fn test_serializer_output_is_appended_pairwise() {
        let text = render(vec![QueryStep::Scalar {
            expr: "n".into(),
            key: "n".into(),
            guard: false,
            value: QueryValue::Serializer {
                name: "SerializeInt".into(),
                format: None,
                escape: true,
            },
        }]);
        assert!(text.contains("foreach (var _pair in SerializeInt(\"n\", n))"));
        assert!(text.contains(
            "_builder.AppendQuery(Uri.EscapeDataString(_pair.Key), Uri.EscapeDataString(_pair.Value));"
        ));
        assert!(!text.contains("if (n is not null)"));
    }

    #[test]
    fn test_query_map_of_lists() {
        let text = render(vec![QueryStep::Map {
            expr: "filters".into(),
            guard: true,
            key: ValueFormat::EscapedString,
            key_is_string: true,
            value_null_skip: true,
            nested: Some(false),
            value: QueryValue::Format(ValueFormat::Natural),
        }]);
        let expected = concat!(
            "\tif (filters is not null)\n",
            "\t{\n",
            "\t\tforeach (var _entry in filters)\n",
            "\t\t{\n",
            "\t\t\tif (_entry.Value is null) continue;\n",
            "\t\t\tforeach (var _value in _entry.Value)\n",
            "\t\t\t{\n",
            "\t\t\t\t_builder.AppendQuery(Uri.EscapeDataString(_entry.Key), _value.ToString());\n",
            "\t\t\t}\n",
            "\t\t}\n",
            "\t}\n",
        );
        assert!(text.contains(expected), "{text}");
    }

    #[test]
    fn test_collection_with_nullable_items_and_raw() {
        let text = render(vec![
            QueryStep::Collection {
                expr: "tags".into(),
                key: "tag".into(),
                guard: false,
                item_null_skip: true,
                value: QueryValue::Format(ValueFormat::EscapedString),
            },
            QueryStep::Raw {
                expr: "extra".into(),
                guard: true,
            },
        ]);
        assert!(text.contains("\t\tif (_item is null) continue;\n"));
        assert!(text.contains("_builder.AppendQuery(\"tag\", Uri.EscapeDataString(_item));"));
        assert!(text.contains("\t\t_builder.AppendRaw($\"{extra}\");\n"));
    }
}
