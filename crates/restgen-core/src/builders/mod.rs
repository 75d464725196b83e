//! Class model building.
//!
//! Aggregates one annotated partial type into a [`ClassModel`]: client member
//! resolution, disposability, hook discovery and one [`MethodModel`] per partial
//! endpoint declaration.
pub mod hooks;

// Internal imports (std, crate)
use crate::config::GenerationOptions;
use crate::extract::Extractor;
use crate::model::{ClassModel, HttpLocation, HttpMethod, LocationAttribute, MethodModel};
use crate::symbols::{shape, AttributeData, MemberDef, MethodDef, TypeDef, TypeQuery, TypeRef};

// External imports (alphabetized)
use url::Url;

fn is_http_client(ty: &TypeRef) -> bool {
    ty.is("System.Net.Http", "HttpClient")
}

/// Builds [`ClassModel`]s from host declarations.
pub struct ClassModelBuilder<'a> {
    extractor: Extractor<'a>,
}

impl<'a> ClassModelBuilder<'a> {
    pub fn new(host: &'a dyn TypeQuery, options: &'a GenerationOptions) -> Self {
        Self {
            extractor: Extractor::new(host, options),
        }
    }

    /// Partial types carrying the client marker.
    pub fn is_client(&self, def: &TypeDef) -> bool {
        def.is_partial && self.extractor.find(&def.attributes, "RestClient").is_some()
    }

    pub fn build(&self, def: &TypeDef) -> ClassModel {
        let host = self.extractor.host();
        let options = self.extractor.options();
        let members = shape::members(host, &def.self_ref());

        let client_name = self
            .extractor
            .find(&def.attributes, "RestClient")
            .and_then(|a| a.str_value(0, "Name"))
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| options.default_client_name.clone());

        let needs_client = !members.iter().any(|member| match member {
            MemberDef::Field(f) => f.name == client_name && is_http_client(&f.ty),
            MemberDef::Property(p) => p.name == client_name && is_http_client(&p.ty),
            MemberDef::Method(_) => false,
        });

        let has_dispose = members.iter().any(|member| {
            matches!(member, MemberDef::Method(m)
                if m.name == "Dispose"
                    && m.parameters.is_empty()
                    && m.return_type.is_void()
                    && !m.is_partial_definition)
        });
        let is_disposable =
            shape::implements(host, &def.self_ref(), "System", "IDisposable") && !has_dispose;

        let class_allows_any = allow_any_status_code(&self.extractor, &def.attributes);
        let hooks = hooks::discover(&self.extractor, &members);

        let methods: Vec<MethodModel> = def
            .methods()
            .filter(|m| m.is_partial_definition)
            .map(|m| self.method(m, class_allows_any.unwrap_or(false)))
            .collect();

        let properties = def
            .properties()
            .filter(|p| !p.is_static)
            .map(|p| self.extractor.property(p))
            .filter(|p| !p.descriptor.location.is(HttpLocation::None))
            .collect();

        let attributes = self
            .extractor
            .location_attributes(&def.attributes, HttpLocation::None)
            .into_iter()
            .filter(|l| !l.is(HttpLocation::None))
            .collect();

        log::debug!(
            "built client model {} with {} endpoint(s)",
            def.full_name(),
            methods.len()
        );

        ClassModel {
            name: def.name.clone(),
            namespace: def.namespace.clone(),
            base_address: self.base_address(def),
            client_name,
            needs_client,
            is_disposable,
            http_client_initializer: hooks.http_client_initializer,
            response_deserializers: hooks.response_deserializers,
            request_body_serializers: hooks.request_body_serializers,
            request_query_param_serializers: hooks.request_query_param_serializers,
            request_modifiers: hooks.request_modifiers,
            methods,
            properties,
            attributes,
        }
    }

    /// Absolute base address with trailing `?`/`&` trimmed, or empty.
    fn base_address(&self, def: &TypeDef) -> String {
        let Some(raw) = self
            .extractor
            .find(&def.attributes, "BaseAddress")
            .and_then(|a| a.str_value(0, "BaseAddress"))
        else {
            return String::new();
        };
        let trimmed = raw.trim().trim_end_matches(['?', '&']);
        if trimmed.is_empty() {
            return String::new();
        }
        match Url::parse(trimmed) {
            Ok(_) => trimmed.to_string(),
            Err(e) => {
                log::warn!(
                    "ignoring base address '{}' on {}: {}",
                    raw,
                    def.full_name(),
                    e
                );
                String::new()
            }
        }
    }

    fn method(&self, def: &MethodDef, class_allows_any: bool) -> MethodModel {
        let host = self.extractor.host();
        let (method, path) = route(&self.extractor, &def.attributes);

        let awaited = shape::awaited_type(host, &def.return_type);
        let result = awaited.clone().unwrap_or_else(|| def.return_type.clone());

        let mut namespaces = def.return_type.namespaces();
        for param in &def.parameters {
            namespaces.extend(param.ty.namespaces());
        }
        namespaces.sort();
        namespaces.dedup();

        let model = MethodModel {
            name: def.name.clone(),
            accessibility: def.accessibility.clone(),
            path,
            method,
            return_type_name: def.return_type.display(),
            return_type: self
                .extractor
                .describe(&result, None, LocationAttribute::default()),
            is_awaitable: awaited.is_some(),
            allow_any_status_code: allow_any_status_code(&self.extractor, &def.attributes)
                .unwrap_or(class_allows_any),
            parameters: def
                .parameters
                .iter()
                .map(|p| self.extractor.parameter(p))
                .collect(),
            locations: self
                .extractor
                .location_attributes(&def.attributes, HttpLocation::None)
                .into_iter()
                .filter(|l| !l.is(HttpLocation::None))
                .collect(),
            namespaces,
        };
        log::debug!(
            "endpoint {} -> {} {}",
            model.name,
            model.method.as_str(),
            model.path
        );
        model
    }
}

/// Verb and route template from the first verb (or `Request`) marker.
fn route(extractor: &Extractor<'_>, attributes: &[AttributeData]) -> (HttpMethod, String) {
    for attribute in extractor.owned(attributes) {
        let short = attribute.short_name();
        let found = if let Some(method) = HttpMethod::ALL.into_iter().find(|m| m.as_str() == short)
        {
            Some((method, attribute.str_value(0, "Path")))
        } else if short == "Request" {
            let method = attribute
                .str_value(0, "Method")
                .and_then(HttpMethod::parse)
                .unwrap_or_default();
            Some((method, attribute.str_value(1, "Path")))
        } else {
            None
        };
        if let Some((method, path)) = found {
            let path = path.unwrap_or_default().trim_end_matches(['?', '&']);
            return (method, path.to_string());
        }
    }
    (HttpMethod::default(), String::new())
}

/// `Some(flag)` when the status opt-out marker is present; the flag defaults to true.
fn allow_any_status_code(extractor: &Extractor<'_>, attributes: &[AttributeData]) -> Option<bool> {
    extractor
        .find(attributes, "AllowAnyStatusCode")
        .map(|a| a.bool_value(0, "AllowAnyStatusCode").unwrap_or(true))
}
