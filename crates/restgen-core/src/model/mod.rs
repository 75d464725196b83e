//! Normalized generation model.
//!
//! Extraction turns host declarations into these records once; planning and
//! emission only ever read them. Every record serializes so `restgen inspect`
//! can print what the generator understood.

pub mod hooks;

// External imports (alphabetized)
use serde::Serialize;

use crate::symbols::NullableAnnotation;

pub use hooks::{
    resolve, AcceptsType, RequestBodySerializerModel, RequestModifierModel,
    RequestQueryParamSerializerModel, ResponseDeserializerModel,
};

/// Where a value belongs in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum HttpLocation {
    #[default]
    None,
    Path,
    Query,
    Header,
    Body,
    Raw,
    QueryMap,
}

/// Location metadata read from one attribute instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationAttribute {
    pub location: HttpLocation,
    /// Key override; the declaration name is used when absent.
    pub name: Option<String>,
    /// Static value, used by header defaults.
    pub value: Option<String>,
    /// Format specifier or `{0}` template; empty when unset.
    pub format: String,
    pub url_encode: bool,
}

impl Default for LocationAttribute {
    fn default() -> Self {
        Self::new(HttpLocation::None)
    }
}

impl LocationAttribute {
    pub fn new(location: HttpLocation) -> Self {
        Self {
            location,
            name: None,
            value: None,
            format: String::new(),
            url_encode: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_url_encode(mut self, url_encode: bool) -> Self {
        self.url_encode = url_encode;
        self
    }

    pub fn is(&self, location: HttpLocation) -> bool {
        self.location == location
    }

    pub fn has_format(&self) -> bool {
        !self.format.is_empty()
    }
}

/// Well-known types the planner and emitters special-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnown {
    String,
    ByteArray,
    Stream,
    HttpContent,
    HttpResponseMessage,
    CancellationToken,
    Void,
}

/// Semantic shape of one typed site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDescriptor {
    /// Display name, e.g. `List<int>?`.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Declaration identifier, or the type's own name for unbound types.
    pub name: String,
    pub namespace: String,
    /// Whether the site can hold null at all (reference or `Nullable<T>`).
    pub is_nullable: bool,
    pub is_reference_type: bool,
    pub nullable_annotation: NullableAnnotation,
    pub is_collection: bool,
    pub is_generic: bool,
    pub is_type_parameter: bool,
    pub collection_type: Option<Box<TypeDescriptor>>,
    pub location: LocationAttribute,
}

impl TypeDescriptor {
    /// Whether the site was declared optional (`string?`, `int?`).
    pub fn is_optional(&self) -> bool {
        self.is_nullable && self.nullable_annotation == NullableAnnotation::Annotated
    }

    /// Reference typed and declared non-optional: gets a fail-fast null guard.
    pub fn requires_null_guard(&self) -> bool {
        self.is_reference_type && self.nullable_annotation == NullableAnnotation::NotAnnotated
    }

    /// `int?` and friends, whose members are reached through `.Value`.
    pub fn is_nullable_value_type(&self) -> bool {
        self.is_nullable && !self.is_reference_type
    }

    /// Display name without a trailing reference `?`.
    pub fn plain_type_name(&self) -> &str {
        if self.is_reference_type || self.is_type_parameter {
            self.type_name.strip_suffix('?').unwrap_or(&self.type_name)
        } else {
            &self.type_name
        }
    }

    /// Request key: the location's name override, else the declaration name.
    pub fn key(&self) -> &str {
        self.location
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }

    /// Type identity: display name (reference annotation ignored) and namespace.
    pub fn same_type(&self, other: &TypeDescriptor) -> bool {
        self.plain_type_name() == other.plain_type_name() && self.namespace == other.namespace
    }

    /// Registered as accepting any type.
    pub fn accepts_any(&self) -> bool {
        self.is_type_parameter
    }

    pub fn is(&self, known: WellKnown) -> bool {
        let name = self.plain_type_name();
        match known {
            WellKnown::String => self.namespace == "System" && matches!(name, "string" | "String"),
            WellKnown::ByteArray => self.namespace == "System" && name == "byte[]",
            WellKnown::Stream => self.namespace == "System.IO" && name == "Stream",
            WellKnown::HttpContent => self.namespace == "System.Net.Http" && name == "HttpContent",
            WellKnown::HttpResponseMessage => {
                self.namespace == "System.Net.Http" && name == "HttpResponseMessage"
            }
            WellKnown::CancellationToken => {
                self.namespace == "System.Threading" && name == "CancellationToken"
            }
            WellKnown::Void => self.namespace == "System" && name == "void",
        }
    }

    pub fn collection_item(&self) -> Option<&TypeDescriptor> {
        self.collection_type.as_deref()
    }
}

/// Anything carrying a [`TypeDescriptor`]: parameters, properties, bare types.
pub trait TypedSite {
    fn descriptor(&self) -> &TypeDescriptor;

    /// Dictionary key/value types (or generic arguments) for map-shaped sites.
    fn generic_types(&self) -> &[TypeDescriptor] {
        &[]
    }

    fn name(&self) -> &str {
        &self.descriptor().name
    }

    fn location(&self) -> &LocationAttribute {
        &self.descriptor().location
    }

    fn key(&self) -> &str {
        self.descriptor().key()
    }

    fn located(&self, location: HttpLocation) -> bool {
        self.location().is(location)
    }
}

impl TypedSite for TypeDescriptor {
    fn descriptor(&self) -> &TypeDescriptor {
        self
    }
}

/// One parameter of an endpoint method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterModel {
    #[serde(flatten)]
    pub descriptor: TypeDescriptor,
    pub generic_types: Vec<TypeDescriptor>,
}

impl ParameterModel {
    pub fn is_collection(&self) -> bool {
        self.descriptor.is_collection
    }

    pub fn collection_item_type(&self) -> Option<&TypeDescriptor> {
        self.descriptor.collection_item()
    }
}

impl TypedSite for ParameterModel {
    fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn generic_types(&self) -> &[TypeDescriptor] {
        &self.generic_types
    }
}

/// An instance property that feeds every request of its class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyModel {
    #[serde(flatten)]
    pub descriptor: TypeDescriptor,
    pub generic_types: Vec<TypeDescriptor>,
}

impl TypedSite for PropertyModel {
    fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn generic_types(&self) -> &[TypeDescriptor] {
        &self.generic_types
    }
}

/// HTTP verb of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Trace,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Head,
        Self::Options,
        Self::Trace,
        Self::Patch,
    ];

    /// Member name on `HttpMethod`, e.g. `Get`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Post => "Post",
            Self::Put => "Put",
            Self::Delete => "Delete",
            Self::Head => "Head",
            Self::Options => "Options",
            Self::Trace => "Trace",
            Self::Patch => "Patch",
        }
    }

    /// Case-insensitive parse of a verb name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(name))
    }

    /// Verbs the client can send without a request message or content.
    pub fn has_shortcut(self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }
}

/// One generated endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodModel {
    pub name: String,
    pub accessibility: String,
    /// Route template with trailing `?` and `&` trimmed.
    pub path: String,
    pub method: HttpMethod,
    /// Declared return type as written, e.g. `Task<User>`.
    pub return_type_name: String,
    /// Awaited result type, or the declared type when not awaitable.
    pub return_type: TypeDescriptor,
    pub is_awaitable: bool,
    pub allow_any_status_code: bool,
    pub parameters: Vec<ParameterModel>,
    /// Method-level header defaults.
    pub locations: Vec<LocationAttribute>,
    /// Namespaces referenced by the signature.
    pub namespaces: Vec<String>,
}

impl MethodModel {
    pub fn returns(&self, known: WellKnown) -> bool {
        self.return_type.is(known)
    }

    pub fn default_headers(&self) -> impl Iterator<Item = &LocationAttribute> {
        self.locations
            .iter()
            .filter(|l| l.is(HttpLocation::Header))
    }
}

/// The whole client declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassModel {
    pub name: String,
    pub namespace: String,
    pub base_address: String,
    pub client_name: String,
    pub needs_client: bool,
    pub is_disposable: bool,
    pub http_client_initializer: Option<String>,
    pub response_deserializers: Vec<ResponseDeserializerModel>,
    pub request_body_serializers: Vec<RequestBodySerializerModel>,
    pub request_query_param_serializers: Vec<RequestQueryParamSerializerModel>,
    pub request_modifiers: Vec<RequestModifierModel>,
    pub methods: Vec<MethodModel>,
    pub properties: Vec<PropertyModel>,
    /// Class-level location attributes.
    pub attributes: Vec<LocationAttribute>,
}

impl ClassModel {
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Headers every request of this client carries.
    pub fn default_headers(&self) -> impl Iterator<Item = &LocationAttribute> {
        self.attributes
            .iter()
            .filter(|l| l.is(HttpLocation::Header))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Descriptor for tests; `type_name` may end in `?`.
    pub fn descriptor(type_name: &str, namespace: &str, name: &str) -> TypeDescriptor {
        let annotated = type_name.ends_with('?');
        let reference = matches!(
            type_name.trim_end_matches('?'),
            "string" | "byte[]" | "Stream" | "HttpContent" | "object"
        ) || type_name.contains('<')
            || type_name.ends_with("[]");
        TypeDescriptor {
            type_name: type_name.to_string(),
            name: name.to_string(),
            namespace: namespace.to_string(),
            is_nullable: reference || annotated,
            is_reference_type: reference,
            nullable_annotation: if annotated {
                NullableAnnotation::Annotated
            } else {
                NullableAnnotation::NotAnnotated
            },
            is_collection: false,
            is_generic: false,
            is_type_parameter: false,
            collection_type: None,
            location: LocationAttribute::default(),
        }
    }
}
