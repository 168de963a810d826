use super::*;
use crate::arena::TypeArena;
use crate::types::{FunctionShape, TypeFunctionKind};

#[test]
fn formats_primitives_and_singletons() {
    let arena = TypeArena::new();
    let mut fmt = TypeFormatter::new(&arena);
    assert_eq!(fmt.format(TypeId::NUMBER), "number");
    assert_eq!(fmt.format(TypeId::UNKNOWN), "unknown");
    assert_eq!(fmt.format(TypeId::TRUE), "true");
    let hello = arena.string_singleton("hello");
    assert_eq!(fmt.format(hello), "\"hello\"");
}

#[test]
fn formats_nested_instances() {
    let arena = TypeArena::new();
    let a = arena.generic("a");
    let inner = arena.instance(TypeFunctionKind::Add, [a, TypeId::NUMBER]);
    let outer = arena.instance(TypeFunctionKind::Lt, [inner, TypeId::STRING]);
    assert_eq!(
        TypeFormatter::new(&arena).format(outer),
        "lt<add<a, number>, string>"
    );
}

#[test]
fn formats_functions() {
    let arena = TypeArena::new();
    let a = arena.generic("a");
    let params = arena.list_pack(vec![a, TypeId::NUMBER], None);
    let returns = arena.list_pack(vec![TypeId::BOOLEAN], None);
    let function = arena.function(FunctionShape {
        generics: vec![a],
        generic_packs: vec![],
        params,
        returns,
    });
    assert_eq!(
        TypeFormatter::new(&arena).format(function),
        "<a>(a, number) -> boolean"
    );
}

#[test]
fn formats_multiple_returns_in_parentheses() {
    let arena = TypeArena::new();
    let rest = arena.variadic_pack(TypeId::STRING);
    let returns = arena.list_pack(vec![TypeId::NUMBER], Some(rest));
    let function = arena.function(FunctionShape {
        generics: vec![],
        generic_packs: vec![],
        params: TypePackId::EMPTY,
        returns,
    });
    assert_eq!(
        TypeFormatter::new(&arena).format(function),
        "() -> (number, ...string)"
    );
}

#[test]
fn formats_tables_unions_and_intersections() {
    let arena = TypeArena::new();
    let table = arena.table(vec![("x".to_string(), TypeId::NUMBER)]);
    let union = arena.union(vec![TypeId::STRING, TypeId::NIL]);
    let intersection = arena.intersection(vec![table, union]);
    let mut fmt = TypeFormatter::new(&arena);
    assert_eq!(fmt.format(table), "{ x: number }");
    assert_eq!(fmt.format(union), "string | nil");
    assert_eq!(fmt.format(intersection), "{ x: number } & string | nil");
    assert_eq!(fmt.format(arena.table(vec![])), "{}");
}

#[test]
fn formats_cycles_with_a_marker() {
    let arena = TypeArena::new();
    let placeholder = arena.fresh_type();
    let table = arena.table(vec![("next".to_string(), placeholder)]);
    arena.bind(placeholder, table);
    assert_eq!(
        TypeFormatter::new(&arena).format(table),
        "{ next: *CYCLE* }"
    );
}

#[test]
fn formats_packs() {
    let arena = TypeArena::new();
    let tail = arena.generic_pack("T");
    let pack = arena.list_pack(vec![TypeId::NUMBER, TypeId::STRING], Some(tail));
    let mut fmt = TypeFormatter::new(&arena);
    assert_eq!(fmt.format_pack(pack), "(number, string, T...)");
    assert_eq!(fmt.format_pack(TypePackId::EMPTY), "()");
}

#[test]
fn truncates_long_renderings() {
    let arena = TypeArena::new();
    let members = vec![TypeId::NUMBER; 50];
    let union = arena.union(members);
    let rendered = TypeFormatter::new(&arena).with_max_len(20).format(union);
    assert_eq!(rendered.len(), 23);
    assert!(rendered.ends_with("..."));
}
