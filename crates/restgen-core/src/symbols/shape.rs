//! Structural predicates over the host symbol model.
//!
//! Everything here answers questions about the *shape* of a type: is it a
//! reference type, which interfaces does it reach, can it be awaited, what does
//! it enumerate. Generic arguments are substituted through base types and
//! interfaces so `List<int>` reaches `IEnumerable<int>`.

// Internal imports (std, crate)
use std::collections::VecDeque;

use super::types::{MemberDef, NullableAnnotation, TypeDefKind, TypeRef, TypeRefKind};
use super::TypeQuery;

const GENERIC: &str = "System.Collections.Generic";

/// Whether values of `ty` are references. Unresolved named types count as classes.
pub fn is_reference_type(host: &dyn TypeQuery, ty: &TypeRef) -> bool {
    match ty.kind {
        TypeRefKind::Array => true,
        TypeRefKind::Parameter => false,
        TypeRefKind::Named => host
            .resolve(ty)
            .map(|def| def.kind.is_reference_type())
            .unwrap_or(true),
    }
}

/// Whether `ty` is a value type that may hold null (`int?`, `Nullable<Guid>`).
pub fn is_nullable_value_type(host: &dyn TypeQuery, ty: &TypeRef) -> bool {
    if ty.is_nullable_wrapper() {
        return true;
    }
    ty.kind == TypeRefKind::Named
        && ty.nullable == NullableAnnotation::Annotated
        && !is_reference_type(host, ty)
}

/// `ty` itself followed by its base types, arguments substituted.
pub fn base_chain(host: &dyn TypeQuery, ty: &TypeRef) -> Vec<TypeRef> {
    let mut chain = vec![ty.clone()];
    let mut current = ty.clone();
    // Bounded so a cyclic table cannot hang generation.
    for _ in 0..64 {
        let Some(def) = host.resolve(&current) else {
            break;
        };
        let Some(base) = &def.base else {
            break;
        };
        let next = base.substitute(&def.type_params, &current.type_args);
        chain.push(next.clone());
        current = next;
    }
    chain
}

/// Every interface reachable from `ty` through bases and interface inheritance.
pub fn all_interfaces(host: &dyn TypeQuery, ty: &TypeRef) -> Vec<TypeRef> {
    let mut found: Vec<TypeRef> = Vec::new();
    let mut queue: VecDeque<TypeRef> = base_chain(host, ty).into();
    while let Some(current) = queue.pop_front() {
        let Some(def) = host.resolve(&current) else {
            continue;
        };
        for iface in &def.interfaces {
            let bound = iface.substitute(&def.type_params, &current.type_args);
            if !found.contains(&bound) {
                found.push(bound.clone());
                queue.push_back(bound);
            }
        }
    }
    found
}

/// First interface of `ty` named `namespace.name`, optionally counting `ty` itself.
pub fn find_interface(
    host: &dyn TypeQuery,
    ty: &TypeRef,
    namespace: &str,
    name: &str,
    include_self: bool,
) -> Option<TypeRef> {
    if include_self && ty.is(namespace, name) {
        return Some(ty.clone());
    }
    all_interfaces(host, ty)
        .into_iter()
        .find(|iface| iface.is(namespace, name))
}

pub fn implements(host: &dyn TypeQuery, ty: &TypeRef, namespace: &str, name: &str) -> bool {
    find_interface(host, ty, namespace, name, true).is_some()
}

/// Members declared on `ty` and then on its base types, arguments substituted.
pub fn members(host: &dyn TypeQuery, ty: &TypeRef) -> Vec<MemberDef> {
    let mut out = Vec::new();
    for current in base_chain(host, ty) {
        if let Some(def) = host.resolve(&current) {
            out.extend(
                def.members
                    .iter()
                    .map(|m| m.substitute(&def.type_params, &current.type_args)),
            );
        }
    }
    out
}

/// Result type of awaiting `ty`, or `None` when `ty` is not awaitable.
///
/// Awaitable means: a parameterless non-void `GetAwaiter()` whose result has a
/// `bool IsCompleted` property, a parameterless `GetResult()` and an
/// `OnCompleted(System.Action)` method. The result is `GetResult`'s return
/// type, which is `void` for non-generic tasks.
pub fn awaited_type(host: &dyn TypeQuery, ty: &TypeRef) -> Option<TypeRef> {
    let awaiter = members(host, ty).into_iter().find_map(|m| match m {
        MemberDef::Method(method)
            if method.name == "GetAwaiter"
                && method.parameters.is_empty()
                && !method.return_type.is_void() =>
        {
            Some(method.return_type)
        }
        _ => None,
    })?;

    let awaiter_members = members(host, &awaiter);
    let completes = awaiter_members.iter().any(|m| {
        matches!(m, MemberDef::Property(p)
            if p.name == "IsCompleted" && p.ty.is("System", "Boolean"))
    });
    let continues = awaiter_members.iter().any(|m| {
        matches!(m, MemberDef::Method(method)
            if method.name == "OnCompleted"
                && method.parameters.len() == 1
                && method.parameters[0].ty.is("System", "Action"))
    });
    let result = awaiter_members.into_iter().find_map(|m| match m {
        MemberDef::Method(method) if method.name == "GetResult" && method.parameters.is_empty() => {
            Some(method.return_type)
        }
        _ => None,
    })?;

    (completes && continues).then_some(result)
}

pub fn is_awaitable(host: &dyn TypeQuery, ty: &TypeRef) -> bool {
    awaited_type(host, ty).is_some()
}

pub fn is_string(ty: &TypeRef) -> bool {
    ty.is("System", "String")
}

/// Element type of a collection: arrays, or anything reaching `IEnumerable<T>`.
/// Strings are never collections.
pub fn collection_element(host: &dyn TypeQuery, ty: &TypeRef) -> Option<TypeRef> {
    if is_string(ty) {
        return None;
    }
    if let Some(element) = ty.element() {
        return Some(element.clone());
    }
    find_interface(host, ty, GENERIC, "IEnumerable", true)
        .and_then(|iface| iface.type_args.into_iter().next())
}

pub fn is_collection(host: &dyn TypeQuery, ty: &TypeRef) -> bool {
    collection_element(host, ty).is_some()
}

/// Key and value types of a dictionary, else the type's own generic arguments.
pub fn generic_arguments(host: &dyn TypeQuery, ty: &TypeRef) -> Vec<TypeRef> {
    ["IDictionary", "IReadOnlyDictionary"]
        .iter()
        .find_map(|name| find_interface(host, ty, GENERIC, name, false))
        .map(|iface| iface.type_args)
        .unwrap_or_else(|| ty.type_args.clone())
}

/// Whether the declaration behind `ty` is a struct or enum.
pub fn is_value_type(host: &dyn TypeQuery, ty: &TypeRef) -> bool {
    ty.kind == TypeRefKind::Named
        && host
            .resolve(ty)
            .is_some_and(|def| matches!(def.kind, TypeDefKind::Struct | TypeDefKind::Enum))
}
