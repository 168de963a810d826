use super::*;

#[test]
fn primitive_catalog_is_preallocated() {
    let arena = TypeArena::new();
    assert_eq!(arena.len() as u32, TypeId::FIRST_DYNAMIC);
    assert_eq!(
        arena.lookup(TypeId::NUMBER),
        Some(TypeData::Primitive(PrimitiveKind::Number))
    );
    assert_eq!(
        arena.lookup(TypeId::BOOLEAN),
        Some(TypeData::Primitive(PrimitiveKind::Boolean))
    );
    assert_eq!(arena.lookup(TypeId::UNKNOWN), Some(TypeData::Unknown));
    assert_eq!(
        arena.lookup(TypeId::FALSE),
        Some(TypeData::Singleton(SingletonValue::Boolean(false)))
    );
    assert_eq!(
        arena.lookup_pack(TypePackId::EMPTY),
        Some(TypePackData::List {
            head: vec![],
            tail: None
        })
    );
}

#[test]
fn allocation_hands_out_sequential_handles() {
    let arena = TypeArena::new();
    let a = arena.generic("a");
    let b = arena.generic("b");
    assert_eq!(a.0, TypeId::FIRST_DYNAMIC);
    assert_eq!(b.0, TypeId::FIRST_DYNAMIC + 1);
    assert!(!a.is_builtin());
    assert!(TypeId::NUMBER.is_builtin());
}

#[test]
fn structurally_equal_types_are_distinct_handles() {
    let arena = TypeArena::new();
    let first = arena.instance(TypeFunctionKind::Add, [TypeId::NUMBER, TypeId::NUMBER]);
    let second = arena.instance(TypeFunctionKind::Add, [TypeId::NUMBER, TypeId::NUMBER]);
    assert_ne!(first, second);
    assert_eq!(arena.lookup(first), arena.lookup(second));
}

#[test]
fn dangling_handles_look_up_to_none() {
    let arena = TypeArena::new();
    assert_eq!(arena.lookup(TypeId(10_000)), None);
    assert_eq!(arena.lookup_pack(TypePackId(10_000)), None);
}

#[test]
fn follow_resolves_bound_chains() {
    let arena = TypeArena::new();
    let a = arena.fresh_type();
    let b = arena.fresh_type();
    arena.bind(a, b);
    arena.bind(b, TypeId::STRING);

    assert_eq!(arena.follow(a), TypeId::STRING);
    assert_eq!(arena.follow(b), TypeId::STRING);
    assert_eq!(arena.follow(TypeId::STRING), TypeId::STRING);
    // idempotent
    assert_eq!(arena.follow(arena.follow(a)), arena.follow(a));
}

#[test]
fn follow_terminates_on_bound_cycle() {
    let arena = TypeArena::new();
    let a = arena.fresh_type();
    let b = arena.fresh_type();
    arena.bind(a, b);
    arena.bind(b, a);

    let resolved = arena.follow(a);
    assert!(resolved == a || resolved == b);
}

#[test]
fn follow_terminates_on_self_bound_type() {
    let arena = TypeArena::new();
    let a = arena.fresh_type();
    arena.bind(a, a);
    assert_eq!(arena.follow(a), a);
}

#[test]
fn follow_pack_resolves_bound_packs() {
    let arena = TypeArena::new();
    let target = arena.list_pack(vec![TypeId::NUMBER], None);
    let alias = arena.fresh_pack();
    arena.bind_pack(alias, target);
    assert_eq!(arena.follow_pack(alias), target);
}

#[test]
fn instance_pack_keeps_its_operands() {
    let arena = TypeArena::new();
    let tail = arena.generic_pack("T");
    let pack = arena.instance_pack(TypeFunctionKind::Add, [TypeId::NUMBER], vec![tail]);
    match arena.lookup_pack(pack) {
        Some(TypePackData::Instance(instance)) => {
            assert_eq!(instance.function, TypeFunctionKind::Add);
            assert_eq!(instance.type_arguments.as_slice(), &[TypeId::NUMBER]);
            assert_eq!(instance.pack_arguments, vec![tail]);
        }
        other => panic!("expected an instance pack, got {other:?}"),
    }
}

#[test]
fn type_function_names_round_trip() {
    for kind in TypeFunctionKind::ALL {
        assert_eq!(TypeFunctionKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(TypeFunctionKind::from_name("frobnicate"), None);
}
