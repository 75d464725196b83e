//! Declaration records exported by the host compiler.
//!
//! A symbol table is a list of [`TypeDef`]s. Every use site of a type is a
//! [`TypeRef`], which can be written either as a full map or as a C#-style
//! shorthand string such as `"System.Collections.Generic.List<int>?"`.

// Internal imports (std, crate)
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

// External imports (alphabetized)
use serde::{Deserialize, Serialize};

/// Nullable annotation attached to a type at its use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullableAnnotation {
    /// Declared outside of a nullable context
    #[default]
    None,
    /// Reference type not marked optional
    NotAnnotated,
    /// Marked optional with `?`
    Annotated,
}

/// Shape of a type reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRefKind {
    #[default]
    Named,
    Array,
    Parameter,
}

/// A type as it appears at a use site (parameter, property, return, argument).
///
/// Arrays keep their element as the single entry of `type_args`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TypeRefRepr")]
pub struct TypeRef {
    pub kind: TypeRefKind,
    pub name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_args: Vec<TypeRef>,
    pub rank: usize,
    pub nullable: NullableAnnotation,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TypeRefRepr {
    Short(String),
    Full {
        #[serde(default)]
        kind: TypeRefKind,
        name: String,
        #[serde(default)]
        namespace: String,
        #[serde(default)]
        type_args: Vec<TypeRef>,
        #[serde(default = "default_rank")]
        rank: usize,
        #[serde(default = "default_annotation")]
        nullable: NullableAnnotation,
    },
}

fn default_rank() -> usize {
    1
}

fn default_annotation() -> NullableAnnotation {
    NullableAnnotation::NotAnnotated
}

impl TryFrom<TypeRefRepr> for TypeRef {
    type Error = Error;

    fn try_from(repr: TypeRefRepr) -> Result<Self> {
        match repr {
            TypeRefRepr::Short(text) => text.parse(),
            TypeRefRepr::Full {
                kind,
                name,
                namespace,
                type_args,
                rank,
                nullable,
            } => Ok(Self {
                kind,
                name,
                namespace,
                type_args,
                rank: rank.max(1),
                nullable,
            }),
        }
    }
}

/// C# keyword aliases of `System` types.
const KEYWORDS: &[(&str, &str)] = &[
    ("bool", "Boolean"),
    ("byte", "Byte"),
    ("sbyte", "SByte"),
    ("char", "Char"),
    ("decimal", "Decimal"),
    ("double", "Double"),
    ("float", "Single"),
    ("int", "Int32"),
    ("uint", "UInt32"),
    ("long", "Int64"),
    ("ulong", "UInt64"),
    ("short", "Int16"),
    ("ushort", "UInt16"),
    ("nint", "IntPtr"),
    ("nuint", "UIntPtr"),
    ("object", "Object"),
    ("string", "String"),
    ("void", "Void"),
];

/// Metadata name of the `System` type a C# keyword stands for.
pub fn keyword_type(keyword: &str) -> Option<&'static str> {
    KEYWORDS
        .iter()
        .find(|(k, _)| *k == keyword)
        .map(|(_, name)| *name)
}

/// C# keyword for a `System` type, if it has one.
pub fn type_keyword(namespace: &str, name: &str) -> Option<&'static str> {
    if namespace != "System" {
        return None;
    }
    KEYWORDS
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(keyword, _)| *keyword)
}

impl TypeRef {
    /// A non-generic named type.
    pub fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::generic(namespace, name, Vec::new())
    }

    /// A constructed generic type.
    pub fn generic(
        namespace: impl Into<String>,
        name: impl Into<String>,
        type_args: Vec<TypeRef>,
    ) -> Self {
        Self {
            kind: TypeRefKind::Named,
            name: name.into(),
            namespace: namespace.into(),
            type_args,
            rank: 1,
            nullable: NullableAnnotation::NotAnnotated,
        }
    }

    /// A single-dimensional array of `element`.
    pub fn array(element: TypeRef) -> Self {
        Self::array_of_rank(element, 1)
    }

    pub fn array_of_rank(element: TypeRef, rank: usize) -> Self {
        Self {
            kind: TypeRefKind::Array,
            name: String::new(),
            namespace: String::new(),
            type_args: vec![element],
            rank: rank.max(1),
            nullable: NullableAnnotation::NotAnnotated,
        }
    }

    /// A reference to a generic type parameter such as `T`.
    pub fn parameter(name: impl Into<String>) -> Self {
        Self {
            kind: TypeRefKind::Parameter,
            name: name.into(),
            namespace: String::new(),
            type_args: Vec::new(),
            rank: 1,
            nullable: NullableAnnotation::NotAnnotated,
        }
    }

    pub fn void() -> Self {
        Self::named("System", "Void")
    }

    /// The same type marked optional.
    pub fn annotated(mut self) -> Self {
        self.nullable = NullableAnnotation::Annotated;
        self
    }

    /// Whether this is the named type `namespace.name`, whatever its arguments.
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.kind == TypeRefKind::Named && self.namespace == namespace && self.name == name
    }

    pub fn is_void(&self) -> bool {
        self.is("System", "Void")
    }

    /// `System.Nullable<T>` spelled out explicitly.
    pub fn is_nullable_wrapper(&self) -> bool {
        self.is("System", "Nullable") && self.type_args.len() == 1
    }

    pub fn arity(&self) -> usize {
        self.type_args.len()
    }

    /// Element type of an array.
    pub fn element(&self) -> Option<&TypeRef> {
        match self.kind {
            TypeRefKind::Array => self.type_args.first(),
            _ => None,
        }
    }

    /// Replaces type parameters named in `params` with the matching `args`.
    pub fn substitute(&self, params: &[String], args: &[TypeRef]) -> TypeRef {
        if params.is_empty() {
            return self.clone();
        }
        match self.kind {
            TypeRefKind::Parameter => {
                let bound = params
                    .iter()
                    .position(|p| *p == self.name)
                    .and_then(|index| args.get(index));
                match bound {
                    Some(arg) => {
                        let mut arg = arg.clone();
                        if self.nullable == NullableAnnotation::Annotated {
                            arg.nullable = NullableAnnotation::Annotated;
                        }
                        arg
                    }
                    None => self.clone(),
                }
            }
            TypeRefKind::Named | TypeRefKind::Array => {
                let mut ty = self.clone();
                ty.type_args = self
                    .type_args
                    .iter()
                    .map(|arg| arg.substitute(params, args))
                    .collect();
                ty
            }
        }
    }

    /// Every namespace this reference mentions, including its arguments.
    pub fn namespaces(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_namespaces(&mut out);
        out
    }

    fn collect_namespaces(&self, out: &mut Vec<String>) {
        if self.kind == TypeRefKind::Named && !self.namespace.is_empty() {
            out.push(self.namespace.clone());
        }
        for arg in &self.type_args {
            arg.collect_namespaces(out);
        }
    }

    /// Minimally-qualified display name, e.g. `Dictionary<string, List<int>>?`.
    pub fn display(&self) -> String {
        let mut text = self.display_unannotated();
        if self.nullable == NullableAnnotation::Annotated && !self.is_nullable_wrapper() {
            text.push('?');
        }
        text
    }

    /// Display name without a trailing optional marker on this level.
    pub fn display_unannotated(&self) -> String {
        match self.kind {
            TypeRefKind::Parameter => self.name.clone(),
            TypeRefKind::Array => {
                let element = self
                    .element()
                    .map(TypeRef::display)
                    .unwrap_or_else(|| "object".to_string());
                format!("{}[{}]", element, ",".repeat(self.rank.saturating_sub(1)))
            }
            TypeRefKind::Named => {
                if self.is_nullable_wrapper() {
                    let inner = self.type_args[0].display_unannotated();
                    return format!("{inner}?");
                }
                let name = type_keyword(&self.namespace, &self.name)
                    .filter(|_| self.type_args.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| self.name.clone());
                if self.type_args.is_empty() {
                    name
                } else {
                    let args: Vec<String> = self.type_args.iter().map(TypeRef::display).collect();
                    format!("{}<{}>", name, args.join(", "))
                }
            }
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for TypeRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parser = TypeParser { src: s, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos != s.len() {
            return Err(Error::symbols(format!(
                "unexpected trailing input in type '{s}' at {}",
                parser.pos
            )));
        }
        Ok(ty)
    }
}

/// Recursive-descent parser for the shorthand type syntax.
///
/// Dotted names are namespace-qualified, `global::Name` is a type in the global
/// namespace, C# keywords map to `System` types and any other bare identifier is
/// a type parameter.
struct TypeParser<'a> {
    src: &'a str,
    pos: usize,
}

impl TypeParser<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn error(&self, what: &str) -> Error {
        Error::symbols(format!("{what} in type '{}' at {}", self.src, self.pos))
    }

    fn identifier(&mut self) -> Result<String> {
        self.skip_ws();
        let len = self
            .rest()
            .char_indices()
            .take_while(|(i, c)| c.is_alphanumeric() || *c == '_' || (*i == 0 && *c == '@'))
            .map(|(i, c)| i + c.len_utf8())
            .last()
            .unwrap_or(0);
        if len == 0 {
            return Err(self.error("expected identifier"));
        }
        let ident = self.rest()[..len].to_string();
        self.pos += len;
        Ok(ident)
    }

    fn parse_type(&mut self) -> Result<TypeRef> {
        let global = self.eat("global::");
        let mut segments = vec![self.identifier()?];
        while self.eat(".") {
            segments.push(self.identifier()?);
        }
        let mut type_args = Vec::new();
        if self.eat("<") {
            loop {
                type_args.push(self.parse_type()?);
                if self.eat(">") {
                    break;
                }
                if !self.eat(",") {
                    return Err(self.error("expected ',' or '>'"));
                }
            }
        }

        let name = segments.pop().unwrap_or_default();
        let mut ty = if !segments.is_empty() || global {
            TypeRef::generic(segments.join("."), name, type_args)
        } else if let Some(system) = keyword_type(&name).filter(|_| type_args.is_empty()) {
            TypeRef::named("System", system)
        } else if type_args.is_empty() {
            TypeRef::parameter(name)
        } else {
            TypeRef::generic("", name, type_args)
        };

        loop {
            if self.eat("?") {
                ty = ty.annotated();
            } else if self.eat("[") {
                let mut rank = 1;
                while self.eat(",") {
                    rank += 1;
                }
                if !self.eat("]") {
                    return Err(self.error("expected ']'"));
                }
                ty = TypeRef::array_of_rank(ty, rank);
            } else {
                break;
            }
        }
        Ok(ty)
    }
}

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDefKind {
    #[default]
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

impl TypeDefKind {
    pub fn is_reference_type(self) -> bool {
        matches!(self, Self::Class | Self::Interface | Self::Delegate)
    }
}

/// A type declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub kind: TypeDefKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<String>,
    #[serde(default)]
    pub is_partial: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberDef>,
}

impl TypeDef {
    pub fn new(kind: TypeDefKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            kind,
            ..Default::default()
        }
    }

    /// Fully qualified name, e.g. `Sample.Api.UserClient`.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// The declared type referenced from inside itself, type parameters unbound.
    pub fn self_ref(&self) -> TypeRef {
        TypeRef::generic(
            self.namespace.clone(),
            self.name.clone(),
            self.type_params.iter().map(TypeRef::parameter).collect(),
        )
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeData> {
        self.attributes.iter().find(|a| a.is_named(name))
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDef> {
        self.members.iter().filter_map(|m| match m {
            MemberDef::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDef> {
        self.members.iter().filter_map(|m| match m {
            MemberDef::Property(property) => Some(property),
            _ => None,
        })
    }
}

/// A member of a type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum MemberDef {
    Method(MethodDef),
    Property(PropertyDef),
    Field(FieldDef),
}

impl MemberDef {
    pub fn name(&self) -> &str {
        match self {
            Self::Method(m) => &m.name,
            Self::Property(p) => &p.name,
            Self::Field(f) => &f.name,
        }
    }

    pub(crate) fn substitute(&self, params: &[String], args: &[TypeRef]) -> MemberDef {
        match self {
            Self::Method(m) => {
                let mut m = m.clone();
                m.return_type = m.return_type.substitute(params, args);
                for p in &mut m.parameters {
                    p.ty = p.ty.substitute(params, args);
                }
                Self::Method(m)
            }
            Self::Property(p) => {
                let mut p = p.clone();
                p.ty = p.ty.substitute(params, args);
                Self::Property(p)
            }
            Self::Field(f) => {
                let mut f = f.clone();
                f.ty = f.ty.substitute(params, args);
                Self::Field(f)
            }
        }
    }
}

fn default_accessibility() -> String {
    "public".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    #[serde(default = "TypeRef::void")]
    pub return_type: TypeRef,
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<String>,
    #[serde(default)]
    pub is_static: bool,
    /// Declaring half of a partial method, without a body.
    #[serde(default)]
    pub is_partial_definition: bool,
    #[serde(default = "default_accessibility")]
    pub accessibility: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeData>,
}

impl MethodDef {
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            return_type,
            parameters: Vec::new(),
            type_params: Vec::new(),
            is_static: false,
            is_partial_definition: false,
            accessibility: default_accessibility(),
            attributes: Vec::new(),
        }
    }

    pub fn with_param(mut self, param: ParameterDef) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeData) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn partial(mut self) -> Self {
        self.is_partial_definition = true;
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeData> {
        self.attributes.iter().find(|a| a.is_named(name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeData>,
}

impl ParameterDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeData) -> Self {
        self.attributes.push(attribute);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeData>,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            is_static: false,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeData) -> Self {
        self.attributes.push(attribute);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeData>,
}

/// A constant attribute argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }
}

/// An attribute applied to a declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeData {
    /// Attribute class name, with or without the `Attribute` suffix.
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<AttrValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub named: BTreeMap<String, AttrValue>,
}

impl AttributeData {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    pub fn arg(mut self, value: AttrValue) -> Self {
        self.args.push(value);
        self
    }

    pub fn str_arg(self, value: impl Into<String>) -> Self {
        self.arg(AttrValue::Str(value.into()))
    }

    pub fn named_arg(mut self, key: impl Into<String>, value: AttrValue) -> Self {
        self.named.insert(key.into(), value);
        self
    }

    /// Class name without the `Attribute` suffix.
    pub fn short_name(&self) -> &str {
        self.name.strip_suffix("Attribute").unwrap_or(&self.name)
    }

    /// Matches `name` against the class name with or without its suffix.
    pub fn is_named(&self, name: &str) -> bool {
        let wanted = name.strip_suffix("Attribute").unwrap_or(name);
        self.short_name() == wanted
    }

    pub fn positional_str(&self, index: usize) -> Option<&str> {
        self.args.get(index).and_then(AttrValue::as_str)
    }

    pub fn named_str(&self, key: &str) -> Option<&str> {
        self.named.get(key).and_then(AttrValue::as_str)
    }

    pub fn named_bool(&self, key: &str) -> Option<bool> {
        self.named.get(key).and_then(AttrValue::as_bool)
    }

    pub fn named_int(&self, key: &str) -> Option<i64> {
        self.named.get(key).and_then(AttrValue::as_int)
    }

    /// A string read positionally first, then by name.
    pub fn str_value(&self, index: usize, key: &str) -> Option<&str> {
        self.positional_str(index).or_else(|| self.named_str(key))
    }

    /// A boolean read positionally first, then by name.
    pub fn bool_value(&self, index: usize, key: &str) -> Option<bool> {
        self.args
            .get(index)
            .and_then(AttrValue::as_bool)
            .or_else(|| self.named_bool(key))
    }

    /// An integer read positionally first, then by name.
    pub fn int_value(&self, index: usize, key: &str) -> Option<i64> {
        self.args
            .get(index)
            .and_then(AttrValue::as_int)
            .or_else(|| self.named_int(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> TypeRef {
        s.parse().expect("type should parse")
    }

    #[test]
    fn test_parse_keywords_and_generics() {
        let ty = parse(concat!(
            "System.Collections.Generic.Dictionary<",
            "string, System.Collections.Generic.List<int>>?"
        ));
        assert!(ty.is("System.Collections.Generic", "Dictionary"));
        assert_eq!(ty.nullable, NullableAnnotation::Annotated);
        assert!(ty.type_args[0].is("System", "String"));
        assert!(ty.type_args[1].type_args[0].is("System", "Int32"));
        assert_eq!(ty.display(), "Dictionary<string, List<int>>?");
    }

    #[test]
    fn test_parse_arrays_and_parameters() {
        let ty = parse("int?[]");
        assert_eq!(ty.kind, TypeRefKind::Array);
        assert_eq!(ty.display(), "int?[]");

        let ty = parse("byte[,]");
        assert_eq!(ty.rank, 2);
        assert_eq!(ty.display(), "byte[,]");

        let ty = parse("T");
        assert_eq!(ty.kind, TypeRefKind::Parameter);

        let ty = parse("global::User");
        assert!(ty.is("", "User"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("List<int".parse::<TypeRef>().is_err());
        assert!("int]".parse::<TypeRef>().is_err());
        assert!("".parse::<TypeRef>().is_err());
    }

    #[test]
    fn test_explicit_nullable_displays_short_form() {
        let ty = TypeRef::generic("System", "Nullable", vec![TypeRef::named("System", "Int32")])
            .annotated();
        assert_eq!(ty.display(), "int?");
    }

    #[test]
    fn test_substitute_keeps_use_site_annotation() {
        let ty = TypeRef::parameter("TResult").annotated();
        let bound = ty.substitute(&["TResult".to_string()], &[parse("string")]);
        assert_eq!(bound.display(), "string?");
    }

    #[test]
    fn test_deserialize_short_and_full_forms() {
        let yaml = r#"
- "System.Threading.Tasks.Task<string>"
- name: Int32
  namespace: System
"#;
        let types: Vec<TypeRef> = serde_yaml::from_str(yaml).expect("valid yaml");
        assert_eq!(types[0].display(), "Task<string>");
        assert_eq!(types[1].display(), "int");
    }

    #[test]
    fn test_attribute_value_lookup_prefers_positional() {
        let attr = AttributeData::new("RestGen.Attributes", "HeaderAttribute")
            .str_arg("Accept")
            .named_arg("Name", AttrValue::Str("ignored".into()))
            .named_arg("Value", AttrValue::Str("application/json".into()));
        assert!(attr.is_named("Header"));
        assert_eq!(attr.str_value(0, "Name"), Some("Accept"));
        assert_eq!(attr.str_value(1, "Value"), Some("application/json"));
        assert_eq!(attr.named_bool("UrlEncode"), None);
    }
}
