//! Hook method records and the ranked lookup shared by every serializer kind.

// External imports (alphabetized)
use serde::Serialize;

use super::TypeDescriptor;

/// A hook that accepts (or produces) values of one type.
pub trait AcceptsType {
    /// The handled type; `None` means any type.
    fn accepted_type(&self) -> Option<&TypeDescriptor>;

    fn accepts_any(&self) -> bool {
        self.accepted_type().map_or(true, TypeDescriptor::accepts_any)
    }
}

/// Picks the hook for `target`: the first exact, non-generic type match, else
/// the first hook accepting any type, else nothing.
pub fn resolve<'a, C: AcceptsType>(
    candidates: &'a [C],
    target: Option<&TypeDescriptor>,
) -> Option<&'a C> {
    target
        .and_then(|target| {
            candidates.iter().find(|c| {
                !c.accepts_any() && c.accepted_type().is_some_and(|ty| ty.same_type(target))
            })
        })
        .or_else(|| candidates.iter().find(|c| c.accepts_any()))
}

/// Exact, non-generic matches only.
pub fn resolve_exact<'a, C: AcceptsType>(
    candidates: &'a [C],
    target: &TypeDescriptor,
) -> Option<&'a C> {
    candidates
        .iter()
        .find(|c| !c.accepts_any() && c.accepted_type().is_some_and(|ty| ty.same_type(target)))
}

/// `T Parse(HttpResponseMessage[, CancellationToken])`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseDeserializerModel {
    pub name: String,
    pub is_async: bool,
    pub has_cancellation: bool,
    /// Produced type, awaited when the hook is async.
    #[serde(rename = "type")]
    pub ty: Option<TypeDescriptor>,
}

impl AcceptsType for ResponseDeserializerModel {
    fn accepted_type(&self) -> Option<&TypeDescriptor> {
        self.ty.as_ref()
    }
}

/// `HttpContent Serialize(T[, CancellationToken])`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBodySerializerModel {
    pub name: String,
    pub is_async: bool,
    pub has_cancellation: bool,
    #[serde(rename = "type")]
    pub ty: Option<TypeDescriptor>,
}

impl AcceptsType for RequestBodySerializerModel {
    fn accepted_type(&self) -> Option<&TypeDescriptor> {
        self.ty.as_ref()
    }
}

/// `void Modify(HttpRequestMessage[, CancellationToken])`, run in `order`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestModifierModel {
    pub name: String,
    pub is_async: bool,
    pub has_cancellation: bool,
    pub order: i64,
}

/// `IEnumerable<KeyValuePair<string, string>> Serialize(string key, T value[, string format])`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestQueryParamSerializerModel {
    pub name: String,
    pub value_type: TypeDescriptor,
    /// The value parameter is itself a collection.
    pub is_collection: bool,
    /// Takes the site's format string as a third argument.
    pub has_format: bool,
}

impl AcceptsType for RequestQueryParamSerializerModel {
    fn accepted_type(&self) -> Option<&TypeDescriptor> {
        Some(&self.value_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::descriptor;

    fn serializer(name: &str, value_type: TypeDescriptor) -> RequestQueryParamSerializerModel {
        RequestQueryParamSerializerModel {
            name: name.to_string(),
            is_collection: value_type.is_collection,
            value_type,
            has_format: false,
        }
    }

    fn generic() -> TypeDescriptor {
        let mut t = descriptor("T", "", "T");
        t.is_type_parameter = true;
        t.is_generic = true;
        t
    }

    #[test]
    fn test_exact_match_beats_earlier_generic() {
        let candidates = vec![
            serializer("Any", generic()),
            serializer("Ints", descriptor("int", "System", "value")),
        ];
        let target = descriptor("int", "System", "n");
        assert_eq!(resolve(&candidates, Some(&target)).unwrap().name, "Ints");
    }

    #[test]
    fn test_generic_fallback_and_none() {
        let candidates = vec![serializer("Ints", descriptor("int", "System", "value"))];
        let target = descriptor("string", "System", "s");
        assert!(resolve(&candidates, Some(&target)).is_none());

        let candidates = vec![
            serializer("Ints", descriptor("int", "System", "value")),
            serializer("First", generic()),
            serializer("Second", generic()),
        ];
        assert_eq!(resolve(&candidates, Some(&target)).unwrap().name, "First");
        assert_eq!(resolve(&candidates, None).unwrap().name, "First");
    }

    #[test]
    fn test_resolution_is_first_declared_among_exact_matches() {
        let candidates = vec![
            serializer("A", descriptor("int", "System", "value")),
            serializer("B", descriptor("int", "System", "value")),
        ];
        let target = descriptor("int", "System", "n");
        for _ in 0..3 {
            assert_eq!(resolve(&candidates, Some(&target)).unwrap().name, "A");
        }
        assert_eq!(resolve_exact(&candidates, &target).unwrap().name, "A");
    }
}
