//! XML documentation for generated endpoints.

// Internal imports (std, crate)
use crate::emit::body::BodyContent;
use crate::emit::writer::SourceWriter;
use crate::model::{
    resolve, ClassModel, HttpLocation, MethodModel, ParameterModel, TypedSite, WellKnown,
};
use crate::utils::escape_xml;

/// Base address and route joined by exactly one `/`.
pub fn absolute_url(base: &str, path: &str) -> String {
    match (base.is_empty(), path.is_empty()) {
        (true, _) => path.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ),
    }
}

fn paramref(name: &str) -> String {
    format!("<paramref name=\"{}\" />", escape_xml(name))
}

fn describe(parameter: &ParameterModel, class: &ClassModel) -> Option<String> {
    let ty = &parameter.descriptor;
    let key = escape_xml(parameter.key());
    let name = parameter.name();

    if ty.is(WellKnown::CancellationToken) {
        return Some("The CancellationToken that is used for the request.".to_string());
    }
    let text = match ty.location.location {
        HttpLocation::Query => match resolve(&class.request_query_param_serializers, Some(ty)) {
            Some(serializer) => format!(
                "Invokes {}('{key}', {}) and appends the query result to the url.",
                serializer.name,
                paramref(name)
            ),
            None => format!("Appends '{key}={}' to the url.", paramref(name)),
        },
        HttpLocation::Header => format!("Sets the '{key}' header of the request."),
        HttpLocation::Path => format!("Fills the '{{{key}}}' placeholder of the url."),
        HttpLocation::Body => match BodyContent::select(class, ty) {
            BodyContent::Serializer(serializer) => format!(
                "Invokes {}({}) and assigns the result to the body of the request.",
                serializer.name,
                paramref(name)
            ),
            BodyContent::PassThrough => "Used as the body of the request.".to_string(),
            content => format!(
                "Sets the body to '{}'.",
                escape_xml(&content.expression(name, "cancellationToken"))
            ),
        },
        HttpLocation::Raw => "The raw query value of the request.".to_string(),
        HttpLocation::QueryMap => "The query map value of the request.".to_string(),
        HttpLocation::None => return None,
    };
    Some(text)
}

pub fn write_method_comment(w: &mut SourceWriter, method: &MethodModel, class: &ClassModel) {
    w.line("/// <summary>");
    w.line(format!(
        "/// Sends a {} request to <see href=\"{}\" />",
        method.method.as_str().to_ascii_uppercase(),
        escape_xml(&absolute_url(&class.base_address, &method.path))
    ));
    w.line("/// </summary>");

    for parameter in &method.parameters {
        if let Some(text) = describe(parameter, class) {
            w.line(format!(
                "/// <param name=\"{}\">{text}</param>",
                escape_xml(parameter.name())
            ));
        }
    }

    let guarded: Vec<&ParameterModel> = method
        .parameters
        .iter()
        .filter(|p| p.descriptor.requires_null_guard())
        .collect();
    if guarded.is_empty() {
        return;
    }
    w.line("/// <exception cref=\"System.ArgumentNullException\">");
    for (i, parameter) in guarded.iter().enumerate() {
        let suffix = if i + 1 < guarded.len() { " <br/>" } else { "" };
        w.line(format!(
            "/// Throws if {} is null.{suffix}",
            paramref(parameter.name())
        ));
    }
    w.line("/// </exception>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::descriptor;
    use crate::model::{HttpMethod, LocationAttribute};

    #[test]
    fn test_absolute_url() {
        assert_eq!(absolute_url("https://api.test/", "/users"), "https://api.test/users");
        assert_eq!(absolute_url("", "users"), "users");
        assert_eq!(absolute_url("https://api.test", ""), "https://api.test");
    }

    #[test]
    fn test_method_comment() {
        let param = |type_name: &str, ns: &str, name: &str, location: HttpLocation| {
            let mut d = descriptor(type_name, ns, name);
            d.location = LocationAttribute::new(location);
            ParameterModel {
                descriptor: d,
                generic_types: Vec::new(),
            }
        };
        let class = ClassModel {
            name: "Api".into(),
            namespace: String::new(),
            base_address: "https://api.test".into(),
            client_name: "Client".into(),
            needs_client: true,
            is_disposable: false,
            http_client_initializer: None,
            response_deserializers: Vec::new(),
            request_body_serializers: Vec::new(),
            request_query_param_serializers: Vec::new(),
            request_modifiers: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            attributes: Vec::new(),
        };
        let method = MethodModel {
            name: "Update".into(),
            accessibility: "public".into(),
            path: "users/{id}".into(),
            method: HttpMethod::Put,
            return_type_name: "Task".into(),
            return_type: descriptor("void", "System", "Void"),
            is_awaitable: true,
            allow_any_status_code: false,
            parameters: vec![
                param("int", "System", "id", HttpLocation::Path),
                param("string", "System", "name", HttpLocation::Body),
                param("CancellationToken", "System.Threading", "token", HttpLocation::None),
            ],
            locations: Vec::new(),
            namespaces: Vec::new(),
        };

        let mut w = SourceWriter::new("\t");
        write_method_comment(&mut w, &method, &class);
        let text = w.finish();

        assert!(text.contains(
            "/// Sends a PUT request to <see href=\"https://api.test/users/{id}\" />"
        ));
        assert!(text.contains(
            "<param name=\"id\">Fills the '{id}' placeholder of the url.</param>"
        ));
        assert!(text.contains("Sets the body to 'new StringContent(name)'."));
        assert!(text.contains("<param name=\"token\">The CancellationToken"));
        assert!(text.contains("/// Throws if <paramref name=\"name\" /> is null."));
    }
}
