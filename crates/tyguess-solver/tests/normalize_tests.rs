use super::*;
use crate::arena::TypeArena;
use crate::types::TypeFunctionKind;

fn truthy(arena: &TypeArena, ty: TypeId) -> bool {
    TypeNormalizer::new(arena)
        .normalize(ty)
        .is_some_and(|n| n.is_truthy())
}

#[test]
fn concrete_non_falsy_types_are_truthy() {
    let arena = TypeArena::new();
    let table = arena.table(vec![("x".to_string(), TypeId::NUMBER)]);

    assert!(truthy(&arena, TypeId::NUMBER));
    assert!(truthy(&arena, TypeId::STRING));
    assert!(truthy(&arena, TypeId::TRUE));
    assert!(truthy(&arena, table));
}

#[test]
fn falsy_components_are_not_truthy() {
    let arena = TypeArena::new();
    let optional = arena.union(vec![TypeId::NUMBER, TypeId::NIL]);

    assert!(!truthy(&arena, TypeId::NIL));
    assert!(!truthy(&arena, TypeId::FALSE));
    assert!(!truthy(&arena, TypeId::BOOLEAN));
    assert!(!truthy(&arena, optional));
}

#[test]
fn open_types_are_not_truthy() {
    let arena = TypeArena::new();
    let generic = arena.generic("a");
    let add = arena.instance(TypeFunctionKind::Add, [generic, TypeId::NUMBER]);

    assert!(!truthy(&arena, TypeId::UNKNOWN));
    assert!(!truthy(&arena, TypeId::ANY));
    assert!(!truthy(&arena, generic));
    assert!(!truthy(&arena, add));
    assert!(!truthy(&arena, arena.fresh_type()));
}

#[test]
fn never_is_vacuously_truthy() {
    let arena = TypeArena::new();
    let normalized = TypeNormalizer::new(&arena)
        .normalize(TypeId::NEVER)
        .expect("never normalizes");
    assert!(normalized.is_never());
    assert!(normalized.is_truthy());
    assert!(!normalized.is_falsy());
}

#[test]
fn falsy_detection() {
    let arena = TypeArena::new();
    let normalizer = TypeNormalizer::new(&arena);
    let nil_or_false = arena.union(vec![TypeId::NIL, TypeId::FALSE]);

    assert!(normalizer.normalize(nil_or_false).is_some_and(|n| n.is_falsy()));
    assert!(!normalizer.normalize(TypeId::BOOLEAN).is_some_and(|n| n.is_falsy()));
}

#[test]
fn intersection_removes_falsy_components() {
    let arena = TypeArena::new();
    let optional = arena.union(vec![TypeId::STRING, TypeId::NIL]);
    let refined = arena.intersection(vec![optional, TypeId::STRING]);
    let with_unknown = arena.intersection(vec![TypeId::UNKNOWN, TypeId::NUMBER]);

    assert!(truthy(&arena, refined));
    assert!(truthy(&arena, with_unknown));
}

#[test]
fn normalization_looks_through_aliases() {
    let arena = TypeArena::new();
    let alias = arena.fresh_type();
    arena.bind(alias, TypeId::NIL);
    assert!(!truthy(&arena, alias));

    let alias = arena.fresh_type();
    arena.bind(alias, TypeId::NUMBER);
    assert!(truthy(&arena, alias));
}

#[test]
fn cyclic_union_terminates() {
    let arena = TypeArena::new();
    let placeholder = arena.fresh_type();
    let recursive = arena.union(vec![TypeId::NUMBER, placeholder]);
    arena.bind(placeholder, recursive);

    assert!(truthy(&arena, recursive));
}

#[test]
fn exceeding_the_limit_yields_no_view() {
    let arena = TypeArena::new();
    let mut ty = TypeId::NUMBER;
    for _ in 0..8 {
        ty = arena.union(vec![ty]);
    }
    let shallow = TypeNormalizer::with_profile(
        &arena,
        RecursionProfile::Custom {
            max_depth: 4,
            max_iterations: 100,
        },
    );
    assert_eq!(shallow.normalize(ty), None);
    assert!(TypeNormalizer::new(&arena).normalize(ty).is_some());
}

#[test]
fn dangling_handle_yields_no_view() {
    let arena = TypeArena::new();
    assert_eq!(TypeNormalizer::new(&arena).normalize(TypeId(99_999)), None);
}
