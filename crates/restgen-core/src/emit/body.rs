//! Request content and response reading.

// Internal imports (std, crate)
use crate::model::{
    resolve, ClassModel, RequestBodySerializerModel, ResponseDeserializerModel, TypeDescriptor,
    WellKnown,
};

/// How a `Body` site becomes `request.Content`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyContent<'a> {
    Serializer(&'a RequestBodySerializerModel),
    Text,
    Binary,
    Stream,
    PassThrough,
    Json,
}

impl<'a> BodyContent<'a> {
    /// A matching serializer hook, else wrapping by the value's type.
    pub fn select(class: &'a ClassModel, ty: &TypeDescriptor) -> Self {
        if let Some(serializer) = resolve(&class.request_body_serializers, Some(ty)) {
            return Self::Serializer(serializer);
        }
        if ty.is(WellKnown::String) {
            Self::Text
        } else if ty.is(WellKnown::ByteArray) {
            Self::Binary
        } else if ty.is(WellKnown::Stream) {
            Self::Stream
        } else if ty.is(WellKnown::HttpContent) {
            Self::PassThrough
        } else {
            Self::Json
        }
    }

    /// Right-hand side of `request.Content = ...;`.
    pub fn expression(&self, value: &str, token: &str) -> String {
        match self {
            Self::Serializer(serializer) => {
                let call = if serializer.has_cancellation {
                    format!("{}({value}, {token})", serializer.name)
                } else {
                    format!("{}({value})", serializer.name)
                };
                if serializer.is_async {
                    format!("await {call}")
                } else {
                    call
                }
            }
            Self::Text => format!("new StringContent({value})"),
            Self::Binary => format!("new ByteArrayContent({value})"),
            Self::Stream => format!("new StreamContent({value})"),
            Self::PassThrough => value.to_string(),
            Self::Json => format!("JsonContent.Create({value})"),
        }
    }
}

/// How the awaited result is produced from `response`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseReader<'a> {
    /// A deserializer matching the result type exactly.
    Deserializer(&'a ResponseDeserializerModel),
    /// A generic deserializer, called with the result type as type argument.
    GenericDeserializer(&'a ResponseDeserializerModel),
    Text,
    Binary,
    Stream,
    Message,
    Json,
}

impl<'a> ResponseReader<'a> {
    pub fn select(class: &'a ClassModel, ty: &TypeDescriptor) -> Self {
        if ty.is(WellKnown::HttpResponseMessage) {
            return Self::Message;
        }
        match resolve(&class.response_deserializers, Some(ty)) {
            Some(d) if d.ty.as_ref().map_or(true, TypeDescriptor::accepts_any) => {
                Self::GenericDeserializer(d)
            }
            Some(d) => Self::Deserializer(d),
            None if ty.is(WellKnown::String) => Self::Text,
            None if ty.is(WellKnown::ByteArray) => Self::Binary,
            None if ty.is(WellKnown::Stream) => Self::Stream,
            None => Self::Json,
        }
    }

    /// Whether `response` must outlive the method.
    pub fn keeps_response(&self) -> bool {
        matches!(self, Self::Message | Self::Stream)
    }

    /// Expression returned from the method body.
    pub fn expression(&self, ty: &TypeDescriptor, token: &str) -> String {
        let hook = |d: &ResponseDeserializerModel, type_args: String| {
            let call = if d.has_cancellation {
                format!("{}{type_args}(response, {token})", d.name)
            } else {
                format!("{}{type_args}(response)", d.name)
            };
            if d.is_async {
                format!("await {call}")
            } else {
                call
            }
        };
        match self {
            Self::Deserializer(d) => hook(d, String::new()),
            Self::GenericDeserializer(d) => hook(d, format!("<{}>", ty.type_name)),
            Self::Text => format!("await response.Content.ReadAsStringAsync({token})"),
            Self::Binary => format!("await response.Content.ReadAsByteArrayAsync({token})"),
            Self::Stream => format!("await response.Content.ReadAsStreamAsync({token})"),
            Self::Message => "response".to_string(),
            Self::Json => format!(
                "await response.Content.ReadFromJsonAsync<{}>({token})",
                ty.type_name
            ),
        }
    }
}
