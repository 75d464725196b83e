//! Core library declarations every symbol table starts from.
//!
//! Only the shape the generator reasons about is modelled: awaiter members on
//! the task types, interface chains on the collections, disposal on the HTTP
//! types.

use super::types::{
    MemberDef, MethodDef, ParameterDef, PropertyDef, TypeDef, TypeDefKind, TypeRef,
};

const SYSTEM: &str = "System";
const TASKS: &str = "System.Threading.Tasks";
const COMPILER: &str = "System.Runtime.CompilerServices";
const GENERIC: &str = "System.Collections.Generic";
const HTTP: &str = "System.Net.Http";

const PRIMITIVES: &[&str] = &[
    "Boolean", "Byte", "SByte", "Char", "Decimal", "Double", "Single", "Int16", "UInt16", "Int32",
    "UInt32", "Int64", "UInt64", "IntPtr", "UIntPtr", "DateTime", "DateTimeOffset", "TimeSpan",
    "Guid", "Void",
];

fn def(kind: TypeDefKind, namespace: &str, name: &str, type_params: &[&str]) -> TypeDef {
    let mut def = TypeDef::new(kind, namespace, name);
    def.type_params = type_params.iter().map(|p| p.to_string()).collect();
    def
}

fn t(namespace: &str, name: &str) -> TypeRef {
    TypeRef::named(namespace, name)
}

fn g(namespace: &str, name: &str, args: &[&str]) -> TypeRef {
    TypeRef::generic(
        namespace,
        name,
        args.iter().map(|a| TypeRef::parameter(*a)).collect(),
    )
}

fn method(name: &str, return_type: TypeRef) -> MemberDef {
    MemberDef::Method(MethodDef::new(name, return_type))
}

/// `T` plus its awaiter type `A`, e.g. `Task<TResult>` and `TaskAwaiter<TResult>`.
fn awaitable_pair(
    kind: TypeDefKind,
    name: &str,
    awaiter: &str,
    result: Option<&str>,
) -> [TypeDef; 2] {
    let params: Vec<&str> = result.into_iter().collect();
    let awaiter_ref = g(COMPILER, awaiter, &params);
    let result_ref = result.map(TypeRef::parameter).unwrap_or_else(TypeRef::void);

    let mut task = def(kind, TASKS, name, &params);
    task.members.push(method("GetAwaiter", awaiter_ref));

    let mut awaiter_def = def(TypeDefKind::Struct, COMPILER, awaiter, &params);
    awaiter_def.members = vec![
        MemberDef::Property(PropertyDef::new("IsCompleted", t(SYSTEM, "Boolean"))),
        method("GetResult", result_ref),
        MemberDef::Method(
            MethodDef::new("OnCompleted", TypeRef::void())
                .with_param(ParameterDef::new("continuation", t(SYSTEM, "Action"))),
        ),
    ];
    [task, awaiter_def]
}

fn disposable(mut def: TypeDef) -> TypeDef {
    def.interfaces.push(t(SYSTEM, "IDisposable"));
    def
}

fn implementing(mut def: TypeDef, interfaces: Vec<TypeRef>) -> TypeDef {
    def.interfaces.extend(interfaces);
    def
}

/// All seeded declarations.
pub fn types() -> Vec<TypeDef> {
    let mut out: Vec<TypeDef> = PRIMITIVES
        .iter()
        .map(|name| def(TypeDefKind::Struct, SYSTEM, name, &[]))
        .collect();

    out.push(def(TypeDefKind::Class, SYSTEM, "Object", &[]));
    out.push(implementing(
        def(TypeDefKind::Class, SYSTEM, "String", &[]),
        vec![TypeRef::generic(GENERIC, "IEnumerable", vec![t(SYSTEM, "Char")])],
    ));
    out.push(def(TypeDefKind::Class, SYSTEM, "Uri", &[]));
    out.push(def(TypeDefKind::Delegate, SYSTEM, "Action", &[]));
    out.push(def(TypeDefKind::Struct, SYSTEM, "Nullable", &["T"]));

    let mut idisposable = def(TypeDefKind::Interface, SYSTEM, "IDisposable", &[]);
    idisposable.members.push(method("Dispose", TypeRef::void()));
    out.push(idisposable);

    out.push(def(
        TypeDefKind::Struct,
        "System.Threading",
        "CancellationToken",
        &[],
    ));

    out.extend(awaitable_pair(TypeDefKind::Class, "Task", "TaskAwaiter", None));
    let [mut task_of, awaiter_of] =
        awaitable_pair(TypeDefKind::Class, "Task", "TaskAwaiter", Some("TResult"));
    task_of.base = Some(t(TASKS, "Task"));
    out.push(task_of);
    out.push(awaiter_of);
    out.extend(awaitable_pair(
        TypeDefKind::Struct,
        "ValueTask",
        "ValueTaskAwaiter",
        None,
    ));
    out.extend(awaitable_pair(
        TypeDefKind::Struct,
        "ValueTask",
        "ValueTaskAwaiter",
        Some("TResult"),
    ));

    let kvp = || {
        TypeRef::generic(
            GENERIC,
            "KeyValuePair",
            vec![TypeRef::parameter("TKey"), TypeRef::parameter("TValue")],
        )
    };
    let of_kvp = |name: &str| TypeRef::generic(GENERIC, name, vec![kvp()]);

    out.push(def(TypeDefKind::Interface, GENERIC, "IEnumerable", &["T"]));
    out.push(implementing(
        def(TypeDefKind::Interface, GENERIC, "IReadOnlyCollection", &["T"]),
        vec![g(GENERIC, "IEnumerable", &["T"])],
    ));
    out.push(implementing(
        def(TypeDefKind::Interface, GENERIC, "IReadOnlyList", &["T"]),
        vec![g(GENERIC, "IReadOnlyCollection", &["T"])],
    ));
    out.push(implementing(
        def(TypeDefKind::Interface, GENERIC, "ICollection", &["T"]),
        vec![g(GENERIC, "IEnumerable", &["T"])],
    ));
    out.push(implementing(
        def(TypeDefKind::Interface, GENERIC, "IList", &["T"]),
        vec![g(GENERIC, "ICollection", &["T"])],
    ));
    out.push(implementing(
        def(TypeDefKind::Interface, GENERIC, "ISet", &["T"]),
        vec![g(GENERIC, "ICollection", &["T"])],
    ));
    out.push(implementing(
        def(TypeDefKind::Class, GENERIC, "List", &["T"]),
        vec![g(GENERIC, "IList", &["T"]), g(GENERIC, "IReadOnlyList", &["T"])],
    ));
    out.push(implementing(
        def(TypeDefKind::Class, GENERIC, "HashSet", &["T"]),
        vec![g(GENERIC, "ISet", &["T"]), g(GENERIC, "IReadOnlyCollection", &["T"])],
    ));
    out.push(def(
        TypeDefKind::Struct,
        GENERIC,
        "KeyValuePair",
        &["TKey", "TValue"],
    ));
    out.push(implementing(
        def(TypeDefKind::Interface, GENERIC, "IDictionary", &["TKey", "TValue"]),
        vec![of_kvp("ICollection")],
    ));
    out.push(implementing(
        def(
            TypeDefKind::Interface,
            GENERIC,
            "IReadOnlyDictionary",
            &["TKey", "TValue"],
        ),
        vec![of_kvp("IReadOnlyCollection")],
    ));
    out.push(implementing(
        def(TypeDefKind::Class, GENERIC, "Dictionary", &["TKey", "TValue"]),
        vec![
            g(GENERIC, "IDictionary", &["TKey", "TValue"]),
            g(GENERIC, "IReadOnlyDictionary", &["TKey", "TValue"]),
        ],
    ));

    out.push(disposable(def(TypeDefKind::Class, "System.IO", "Stream", &[])));
    out.push(disposable(def(TypeDefKind::Class, HTTP, "HttpClient", &[])));
    out.push(disposable(def(
        TypeDefKind::Class,
        HTTP,
        "HttpRequestMessage",
        &[],
    )));
    out.push(disposable(def(
        TypeDefKind::Class,
        HTTP,
        "HttpResponseMessage",
        &[],
    )));
    out.push(disposable(def(TypeDefKind::Class, HTTP, "HttpContent", &[])));
    out.push(def(TypeDefKind::Class, HTTP, "HttpMethod", &[]));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identities_are_unique() {
        let types = types();
        let mut keys: Vec<_> = types
            .iter()
            .map(|d| (d.namespace.clone(), d.name.clone(), d.type_params.len()))
            .collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[test]
    fn test_generic_task_awaiter_returns_its_parameter() {
        let types = types();
        let awaiter = types
            .iter()
            .find(|d| d.name == "TaskAwaiter" && d.type_params.len() == 1)
            .unwrap();
        let result = awaiter
            .methods()
            .find(|m| m.name == "GetResult")
            .unwrap();
        assert_eq!(result.return_type, TypeRef::parameter("TResult"));
    }
}
