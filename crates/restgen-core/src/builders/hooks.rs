//! Hook method discovery.
//!
//! Each classifier checks one marker attribute plus the structural shape the
//! emitted code relies on. Methods with the marker but the wrong shape are
//! dropped without a trace; validating them is an analyzer concern.

// Internal imports (std, crate)
use crate::extract::Extractor;
use crate::model::{
    LocationAttribute, RequestBodySerializerModel, RequestModifierModel,
    RequestQueryParamSerializerModel, ResponseDeserializerModel,
};
use crate::symbols::{shape, MemberDef, MethodDef, TypeRef};

/// Hook methods found on one client type.
#[derive(Debug, Clone, Default)]
pub struct Hooks {
    pub response_deserializers: Vec<ResponseDeserializerModel>,
    pub request_body_serializers: Vec<RequestBodySerializerModel>,
    pub request_query_param_serializers: Vec<RequestQueryParamSerializerModel>,
    pub request_modifiers: Vec<RequestModifierModel>,
    pub http_client_initializer: Option<String>,
}

fn is_token(ty: &TypeRef) -> bool {
    ty.is("System.Threading", "CancellationToken")
}

fn is_string(ty: &TypeRef) -> bool {
    ty.is("System", "String")
}

/// `(first)` or `(first, CancellationToken)`; returns whether a token is taken.
fn single_arg_shape(method: &MethodDef, first: impl Fn(&TypeRef) -> bool) -> Option<bool> {
    match method.parameters.as_slice() {
        [only] if first(&only.ty) => Some(false),
        [only, token] if first(&only.ty) && is_token(&token.ty) => Some(true),
        _ => None,
    }
}

/// Classifies every method of a client (declared and inherited).
pub fn discover(extractor: &Extractor<'_>, members: &[MemberDef]) -> Hooks {
    let mut hooks = Hooks::default();
    for member in members {
        let MemberDef::Method(method) = member else {
            continue;
        };
        if let Some(hook) = response_deserializer(extractor, method) {
            hooks.response_deserializers.push(hook);
        }
        if let Some(hook) = request_body_serializer(extractor, method) {
            hooks.request_body_serializers.push(hook);
        }
        if let Some(hook) = request_modifier(extractor, method) {
            hooks.request_modifiers.push(hook);
        }
        if let Some(hook) = query_param_serializer(extractor, method) {
            hooks.request_query_param_serializers.push(hook);
        }
        if hooks.http_client_initializer.is_none() && is_client_initializer(extractor, method) {
            hooks.http_client_initializer = Some(method.name.clone());
        }
    }
    // Stable, so equal orders keep declaration order.
    hooks.request_modifiers.sort_by_key(|m| m.order);
    hooks
}

pub fn response_deserializer(
    extractor: &Extractor<'_>,
    method: &MethodDef,
) -> Option<ResponseDeserializerModel> {
    extractor.find(&method.attributes, "ResponseDeserializer")?;
    if method.type_params.len() > 1 {
        return None;
    }
    let has_cancellation = single_arg_shape(method, |ty| {
        ty.is("System.Net.Http", "HttpResponseMessage")
    })?;

    let awaited = shape::awaited_type(extractor.host(), &method.return_type);
    let produced = awaited.clone().unwrap_or_else(|| method.return_type.clone());
    if produced.is_void() {
        return None;
    }
    Some(ResponseDeserializerModel {
        name: method.name.clone(),
        is_async: awaited.is_some(),
        has_cancellation,
        ty: Some(extractor.describe(&produced, None, LocationAttribute::default())),
    })
}

pub fn request_body_serializer(
    extractor: &Extractor<'_>,
    method: &MethodDef,
) -> Option<RequestBodySerializerModel> {
    extractor.find(&method.attributes, "RequestBodySerializer")?;
    if method.type_params.len() > 1 {
        return None;
    }
    let awaited = shape::awaited_type(extractor.host(), &method.return_type);
    let produced = awaited.as_ref().unwrap_or(&method.return_type);
    if !produced.is("System.Net.Http", "HttpContent") {
        return None;
    }
    let has_cancellation = single_arg_shape(method, |_| true)?;

    Some(RequestBodySerializerModel {
        name: method.name.clone(),
        is_async: awaited.is_some(),
        has_cancellation,
        ty: Some(extractor.describe(
            &method.parameters[0].ty,
            None,
            LocationAttribute::default(),
        )),
    })
}

pub fn request_modifier(
    extractor: &Extractor<'_>,
    method: &MethodDef,
) -> Option<RequestModifierModel> {
    let attribute = extractor.find(&method.attributes, "RequestModifier")?;
    let has_cancellation = single_arg_shape(method, |ty| {
        ty.is("System.Net.Http", "HttpRequestMessage")
    })?;

    Some(RequestModifierModel {
        name: method.name.clone(),
        is_async: shape::is_awaitable(extractor.host(), &method.return_type),
        has_cancellation,
        order: attribute.int_value(0, "Order").unwrap_or(0),
    })
}

/// Whether `ty` enumerates `KeyValuePair<string, string>`.
fn yields_string_pairs(extractor: &Extractor<'_>, ty: &TypeRef) -> bool {
    shape::collection_element(extractor.host(), ty).is_some_and(|pair| {
        pair.is("System.Collections.Generic", "KeyValuePair")
            && pair.type_args.len() == 2
            && pair.type_args.iter().all(is_string)
    })
}

pub fn query_param_serializer(
    extractor: &Extractor<'_>,
    method: &MethodDef,
) -> Option<RequestQueryParamSerializerModel> {
    extractor.find(&method.attributes, "RequestQueryParamSerializer")?;
    if method.type_params.len() > 1 || !yields_string_pairs(extractor, &method.return_type) {
        return None;
    }
    let has_format = match method.parameters.as_slice() {
        [key, _] if is_string(&key.ty) => false,
        [key, _, format] if is_string(&key.ty) && is_string(&format.ty) => true,
        _ => return None,
    };

    let value = &method.parameters[1];
    let value_type = extractor.describe(&value.ty, Some(&value.name), LocationAttribute::default());
    Some(RequestQueryParamSerializerModel {
        name: method.name.clone(),
        is_collection: value_type.is_collection,
        value_type,
        has_format,
    })
}

pub fn is_client_initializer(extractor: &Extractor<'_>, method: &MethodDef) -> bool {
    extractor
        .find(&method.attributes, "HttpClientInitializer")
        .is_some()
        && method.is_static
        && method.parameters.is_empty()
        && method.return_type.is("System.Net.Http", "HttpClient")
}
