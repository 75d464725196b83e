//! Type and attribute extraction.
//!
//! Turns raw host declarations into [`LocationAttribute`]s and
//! [`TypeDescriptor`]s. Nothing here fails: unknown attributes and unresolved
//! types degrade to defaults.

// Internal imports (std, crate)
use crate::config::GenerationOptions;
use crate::model::{
    HttpLocation, LocationAttribute, ParameterModel, PropertyModel, TypeDescriptor,
};
use crate::symbols::{
    shape, AttributeData, NullableAnnotation, ParameterDef, PropertyDef, TypeQuery, TypeRef,
    TypeRefKind,
};

/// Deepest element nesting described for one site.
const MAX_DEPTH: usize = 8;

/// Maps a location marker attribute to its location.
pub fn location_kind(attribute: &AttributeData) -> Option<HttpLocation> {
    match attribute.short_name() {
        "Query" => Some(HttpLocation::Query),
        "Header" => Some(HttpLocation::Header),
        "Path" => Some(HttpLocation::Path),
        "Body" => Some(HttpLocation::Body),
        "QueryMap" => Some(HttpLocation::QueryMap),
        "RawQueryString" => Some(HttpLocation::Raw),
        _ => None,
    }
}

/// Extraction context bound to one host and one set of options.
pub struct Extractor<'a> {
    host: &'a dyn TypeQuery,
    options: &'a GenerationOptions,
}

impl<'a> Extractor<'a> {
    pub fn new(host: &'a dyn TypeQuery, options: &'a GenerationOptions) -> Self {
        Self { host, options }
    }

    pub fn host(&self) -> &'a dyn TypeQuery {
        self.host
    }

    pub fn options(&self) -> &'a GenerationOptions {
        self.options
    }

    /// Our attributes on a declaration, in declaration order.
    pub fn owned<'b>(&self, attributes: &'b [AttributeData]) -> Vec<&'b AttributeData> {
        attributes
            .iter()
            .filter(|a| self.options.owns_attribute(&a.namespace))
            .collect()
    }

    /// First owned attribute called `name`.
    pub fn find<'b>(
        &self,
        attributes: &'b [AttributeData],
        name: &str,
    ) -> Option<&'b AttributeData> {
        self.owned(attributes).into_iter().find(|a| a.is_named(name))
    }

    /// One location per owned attribute. Attributes that are not location
    /// markers take `default`.
    pub fn location_attributes(
        &self,
        attributes: &[AttributeData],
        default: HttpLocation,
    ) -> Vec<LocationAttribute> {
        self.owned(attributes)
            .into_iter()
            .map(|attribute| read_location(attribute, location_kind(attribute).unwrap_or(default)))
            .collect()
    }

    /// The site's location, or `default` when it carries no owned attribute.
    pub fn location_of(
        &self,
        attributes: &[AttributeData],
        default: HttpLocation,
    ) -> LocationAttribute {
        self.location_attributes(attributes, default)
            .into_iter()
            .next()
            .unwrap_or_else(|| LocationAttribute::new(default))
    }

    /// Semantic shape of `ty`, bound to `name` when it belongs to a declaration.
    pub fn describe(
        &self,
        ty: &TypeRef,
        name: Option<&str>,
        location: LocationAttribute,
    ) -> TypeDescriptor {
        self.describe_at(ty, name, location, 0)
    }

    fn describe_at(
        &self,
        ty: &TypeRef,
        name: Option<&str>,
        location: LocationAttribute,
        depth: usize,
    ) -> TypeDescriptor {
        let is_reference_type = shape::is_reference_type(self.host, ty);
        let nullable_value = shape::is_nullable_value_type(self.host, ty);
        let element = if depth < MAX_DEPTH {
            shape::collection_element(self.host, ty)
        } else {
            None
        };

        let nullable_annotation = if ty.is_nullable_wrapper() {
            NullableAnnotation::Annotated
        } else {
            ty.nullable
        };
        let namespace = match ty.kind {
            TypeRefKind::Array => "System".to_string(),
            TypeRefKind::Parameter => String::new(),
            TypeRefKind::Named if ty.is_nullable_wrapper() => ty.type_args[0].namespace.clone(),
            TypeRefKind::Named => ty.namespace.clone(),
        };
        let name = name.map(str::to_string).unwrap_or_else(|| match ty.kind {
            TypeRefKind::Array => ty.display_unannotated(),
            _ => ty.name.clone(),
        });

        TypeDescriptor {
            type_name: ty.display(),
            name,
            namespace,
            is_nullable: is_reference_type || nullable_value,
            is_reference_type,
            nullable_annotation,
            is_collection: element.is_some(),
            is_generic: match ty.kind {
                TypeRefKind::Parameter => true,
                TypeRefKind::Named => !ty.type_args.is_empty(),
                TypeRefKind::Array => false,
            },
            is_type_parameter: ty.kind == TypeRefKind::Parameter,
            collection_type: element.map(|element| {
                Box::new(self.describe_at(
                    &element,
                    None,
                    LocationAttribute::default(),
                    depth + 1,
                ))
            }),
            location,
        }
    }

    /// Describes each generic argument (dictionary key and value first).
    pub fn generic_types(&self, ty: &TypeRef) -> Vec<TypeDescriptor> {
        shape::generic_arguments(self.host, ty)
            .iter()
            .map(|arg| self.describe(arg, None, LocationAttribute::default()))
            .collect()
    }

    /// Parameters default to `Query`; cancellation tokens carry no location.
    pub fn parameter(&self, param: &ParameterDef) -> ParameterModel {
        let default = if param.ty.is("System.Threading", "CancellationToken") {
            HttpLocation::None
        } else {
            HttpLocation::Query
        };
        let location = self.location_of(&param.attributes, default);
        ParameterModel {
            descriptor: self.describe(&param.ty, Some(&param.name), location),
            generic_types: self.generic_types(&param.ty),
        }
    }

    pub fn property(&self, property: &PropertyDef) -> PropertyModel {
        let location = self.location_of(&property.attributes, HttpLocation::None);
        PropertyModel {
            descriptor: self.describe(&property.ty, Some(&property.name), location),
            generic_types: self.generic_types(&property.ty),
        }
    }
}

/// Reads name/value positionally then by name; format and encoding by name only.
fn read_location(attribute: &AttributeData, location: HttpLocation) -> LocationAttribute {
    LocationAttribute {
        location,
        name: attribute.str_value(0, "Name").map(str::to_string),
        value: attribute.str_value(1, "Value").map(str::to_string),
        format: attribute.named_str("Format").unwrap_or_default().to_string(),
        url_encode: attribute.named_bool("UrlEncode").unwrap_or(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{AttrValue, SymbolTable};

    const NS: &str = "RestGen.Attributes";

    fn ty(s: &str) -> TypeRef {
        s.parse().unwrap()
    }

    #[test]
    fn test_location_table() {
        let cases = [
            ("QueryAttribute", HttpLocation::Query),
            ("Header", HttpLocation::Header),
            ("PathAttribute", HttpLocation::Path),
            ("BodyAttribute", HttpLocation::Body),
            ("QueryMapAttribute", HttpLocation::QueryMap),
            ("RawQueryStringAttribute", HttpLocation::Raw),
        ];
        for (name, expected) in cases {
            assert_eq!(location_kind(&AttributeData::new(NS, name)), Some(expected));
        }
        assert_eq!(location_kind(&AttributeData::new(NS, "GetAttribute")), None);
    }

    #[test]
    fn test_location_reads_positional_then_named() {
        let table = SymbolTable::default();
        let options = GenerationOptions::default();
        let extractor = Extractor::new(&table, &options);

        let attrs = vec![AttributeData::new(NS, "QueryAttribute")
            .named_arg("Name", AttrValue::Str("q".into()))
            .named_arg("Format", AttrValue::Str("N2".into()))
            .named_arg("UrlEncode", AttrValue::Bool(false))];
        let location = extractor.location_of(&attrs, HttpLocation::Query);
        assert_eq!(location.name.as_deref(), Some("q"));
        assert_eq!(location.format, "N2");
        assert!(!location.url_encode);

        let attrs = vec![AttributeData::new(NS, "Header").str_arg("Accept").str_arg("*/*")];
        let location = extractor.location_of(&attrs, HttpLocation::None);
        assert_eq!(location.location, HttpLocation::Header);
        assert_eq!(location.value.as_deref(), Some("*/*"));
        assert!(location.url_encode);
    }

    #[test]
    fn test_foreign_attributes_are_ignored() {
        let table = SymbolTable::default();
        let options = GenerationOptions::default();
        let extractor = Extractor::new(&table, &options);

        let attrs = vec![AttributeData::new("Other.Library", "HeaderAttribute").str_arg("X")];
        let location = extractor.location_of(&attrs, HttpLocation::Query);
        assert_eq!(location, LocationAttribute::new(HttpLocation::Query));
    }

    #[test]
    fn test_parameter_defaults() {
        let table = SymbolTable::default();
        let options = GenerationOptions::default();
        let extractor = Extractor::new(&table, &options);

        let id = extractor.parameter(&ParameterDef::new("id", ty("int")));
        assert_eq!(id.descriptor.location.location, HttpLocation::Query);
        assert!(!id.descriptor.is_nullable);

        let token = extractor.parameter(&ParameterDef::new(
            "token",
            ty("System.Threading.CancellationToken"),
        ));
        assert_eq!(token.descriptor.location.location, HttpLocation::None);
    }

    #[test]
    fn test_describe_collections_and_maps() {
        let table = SymbolTable::default();
        let options = GenerationOptions::default();
        let extractor = Extractor::new(&table, &options);

        let map = extractor.parameter(&ParameterDef::new(
            "filters",
            ty(concat!(
                "System.Collections.Generic.Dictionary<",
                "string, System.Collections.Generic.List<int>>?"
            )),
        ));
        assert_eq!(map.descriptor.type_name, "Dictionary<string, List<int>>?");
        assert!(map.descriptor.is_optional());
        assert_eq!(map.generic_types.len(), 2);
        assert!(map.generic_types[1].is_collection);
        assert_eq!(
            map.generic_types[1].collection_item().unwrap().type_name,
            "int"
        );

        let tags = extractor.parameter(&ParameterDef::new(
            "tags",
            ty("System.Collections.Generic.List<string>"),
        ));
        assert!(tags.is_collection());
        assert_eq!(
            tags.collection_item_type().map(|t| t.type_name.as_str()),
            Some("string")
        );

        let name = extractor.describe(&ty("string"), Some("name"), LocationAttribute::default());
        assert!(!name.is_collection);
        assert!(name.collection_type.is_none());
        assert!(name.requires_null_guard());

        let bytes = extractor.describe(&ty("byte[]"), None, LocationAttribute::default());
        assert_eq!(bytes.namespace, "System");
        assert_eq!(bytes.name, "byte[]");
        assert!(bytes.is_collection);

        let page = extractor.describe(&ty("int?"), Some("page"), LocationAttribute::default());
        assert!(page.is_optional());
        assert!(page.is_nullable_value_type());
        assert_eq!(page.namespace, "System");
    }
}
