use super::*;
use crate::arena::TypeArena;
use crate::normalize::TypeNormalizer;

struct Fixture {
    arena: TypeArena,
    family_reduces_to: GuessMap,
    substitutable: GuessMap,
    cyclic_instances: FxHashSet<TypeId>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            arena: TypeArena::new(),
            family_reduces_to: GuessMap::default(),
            substitutable: GuessMap::default(),
            cyclic_instances: FxHashSet::default(),
        }
    }

    fn run(&self, kind: TypeFunctionKind, args: &[TypeId]) -> TypeFunctionInferenceResult {
        let normalizer = TypeNormalizer::new(&self.arena);
        let ctx = HeuristicContext {
            db: &self.arena,
            normalizer: &normalizer,
            family_reduces_to: &self.family_reduces_to,
            substitutable: &self.substitutable,
            cyclic_instances: &self.cyclic_instances,
        };
        let instance = TypeFunctionInstance::new(kind, args.iter().copied());
        infer_instance(&ctx, &instance)
    }
}

fn result(operands: &[TypeId], result: TypeId) -> TypeFunctionInferenceResult {
    TypeFunctionInferenceResult {
        operand_inference: operands.iter().copied().collect(),
        result_inference: result,
    }
}

#[test]
fn every_numeric_binop_guesses_number() {
    let fx = Fixture::new();
    let a = fx.arena.generic("a");
    for kind in [
        TypeFunctionKind::Add,
        TypeFunctionKind::Sub,
        TypeFunctionKind::Mul,
        TypeFunctionKind::Div,
        TypeFunctionKind::Idiv,
        TypeFunctionKind::Pow,
        TypeFunctionKind::Mod,
    ] {
        assert_eq!(
            fx.run(kind, &[a, TypeId::STRING]),
            result(&[TypeId::NUMBER, TypeId::NUMBER], TypeId::NUMBER),
            "{kind}"
        );
    }
}

#[test]
fn family_table_covers_only_heuristic_kinds() {
    let recognized: Vec<_> = TypeFunctionKind::ALL
        .iter()
        .filter(|kind| kind.heuristic_family().is_some())
        .collect();
    assert_eq!(recognized.len(), 15);
    assert_eq!(TypeFunctionKind::Concat.heuristic_family(), None);
    assert_eq!(TypeFunctionKind::Index.heuristic_family(), None);
    assert_eq!(
        TypeFunctionKind::Eq.heuristic_family(),
        Some(HeuristicFamily::Comparison)
    );
}

#[test]
fn unrecognized_family_guesses_unknown() {
    let fx = Fixture::new();
    let a = fx.arena.generic("a");
    assert_eq!(
        fx.run(TypeFunctionKind::Concat, &[a, TypeId::STRING]),
        TypeFunctionInferenceResult::unknown()
    );
}

#[test]
#[should_panic(expected = "guessing heuristic expects 2")]
fn arity_mismatch_panics() {
    let fx = Fixture::new();
    fx.run(TypeFunctionKind::Add, &[TypeId::NUMBER]);
}

// =============================================================================
// Comparison
// =============================================================================

#[test]
fn comparison_with_open_lhs_takes_rhs_type() {
    let fx = Fixture::new();
    let a = fx.arena.generic("a");
    assert_eq!(
        fx.run(TypeFunctionKind::Lt, &[a, TypeId::STRING]),
        result(&[TypeId::STRING, TypeId::STRING], TypeId::BOOLEAN)
    );
}

#[test]
fn comparison_with_open_rhs_takes_lhs_type() {
    let fx = Fixture::new();
    let a = fx.arena.generic("a");
    assert_eq!(
        fx.run(TypeFunctionKind::Le, &[TypeId::STRING, a]),
        result(&[TypeId::STRING, TypeId::STRING], TypeId::BOOLEAN)
    );
}

#[test]
fn comparison_defaults_to_number() {
    let fx = Fixture::new();
    let a = fx.arena.generic("a");
    let b = fx.arena.generic("b");
    let number_pair = result(&[TypeId::NUMBER, TypeId::NUMBER], TypeId::BOOLEAN);
    assert_eq!(fx.run(TypeFunctionKind::Lt, &[a, b]), number_pair);
    assert_eq!(
        fx.run(TypeFunctionKind::Eq, &[TypeId::STRING, TypeId::BOOLEAN]),
        number_pair
    );
}

#[test]
fn comparison_uses_existing_hypotheses() {
    let mut fx = Fixture::new();
    let a = fx.arena.generic("a");
    let b = fx.arena.generic("b");
    let inner = fx.arena.instance(TypeFunctionKind::Add, [b, TypeId::NUMBER]);
    fx.family_reduces_to.insert(inner, TypeId::STRING);

    // the reduced instance now reads as `string`, so the open side is `a`
    assert_eq!(
        fx.run(TypeFunctionKind::Lt, &[a, inner]),
        result(&[TypeId::STRING, TypeId::STRING], TypeId::BOOLEAN)
    );
}

#[test]
fn cyclic_members_count_as_open() {
    let mut fx = Fixture::new();
    let table = fx.arena.table(vec![]);
    fx.cyclic_instances.insert(table);
    assert_eq!(
        fx.run(TypeFunctionKind::Lt, &[table, TypeId::STRING]),
        result(&[TypeId::STRING, TypeId::STRING], TypeId::BOOLEAN)
    );
}

// =============================================================================
// Or / And
// =============================================================================

#[test]
fn or_truth_table() {
    let fx = Fixture::new();
    let a = fx.arena.generic("a");
    let b = fx.arena.generic("b");
    let maybe_string = fx.arena.union(vec![TypeId::STRING, TypeId::NIL]);

    assert_eq!(
        fx.run(TypeFunctionKind::Or, &[a, b]),
        result(&[TypeId::UNKNOWN, TypeId::UNKNOWN], TypeId::BOOLEAN)
    );
    assert_eq!(
        fx.run(TypeFunctionKind::Or, &[a, TypeId::NUMBER]),
        result(&[TypeId::UNKNOWN, TypeId::NUMBER], TypeId::NUMBER)
    );
    assert_eq!(
        fx.run(TypeFunctionKind::Or, &[TypeId::NUMBER, b]),
        result(&[TypeId::NUMBER, TypeId::UNKNOWN], TypeId::NUMBER)
    );
    assert_eq!(
        fx.run(TypeFunctionKind::Or, &[TypeId::NUMBER, TypeId::STRING]),
        result(&[TypeId::NUMBER, TypeId::STRING], TypeId::NUMBER)
    );
    assert_eq!(
        fx.run(TypeFunctionKind::Or, &[maybe_string, TypeId::NUMBER]),
        result(&[TypeId::UNKNOWN, TypeId::UNKNOWN], TypeId::BOOLEAN)
    );
}

#[test]
fn or_reads_rhs_truthiness_from_lhs() {
    let fx = Fixture::new();
    // a truthy right side does not rescue a falsy left side
    assert_eq!(
        fx.run(TypeFunctionKind::Or, &[TypeId::NIL, TypeId::STRING]),
        result(&[TypeId::UNKNOWN, TypeId::UNKNOWN], TypeId::BOOLEAN)
    );
}

#[test]
fn and_truth_table() {
    let fx = Fixture::new();
    let a = fx.arena.generic("a");
    let b = fx.arena.generic("b");
    let maybe_string = fx.arena.union(vec![TypeId::STRING, TypeId::NIL]);

    assert_eq!(
        fx.run(TypeFunctionKind::And, &[a, b]),
        result(&[TypeId::UNKNOWN, TypeId::UNKNOWN], TypeId::BOOLEAN)
    );
    assert_eq!(
        fx.run(TypeFunctionKind::And, &[a, TypeId::NUMBER]),
        result(&[], TypeId::NUMBER)
    );
    assert_eq!(
        fx.run(TypeFunctionKind::And, &[TypeId::STRING, b]),
        result(&[], TypeId::STRING)
    );
    assert_eq!(
        fx.run(TypeFunctionKind::And, &[TypeId::NUMBER, TypeId::STRING]),
        result(&[TypeId::NUMBER, TypeId::STRING], TypeId::STRING)
    );
    assert_eq!(
        fx.run(TypeFunctionKind::And, &[maybe_string, TypeId::NUMBER]),
        result(&[maybe_string, TypeId::NUMBER], maybe_string)
    );
}

#[test]
fn or_substitutes_generic_before_checking_truthiness() {
    let mut fx = Fixture::new();
    let a = fx.arena.generic("a");
    fx.substitutable.insert(a, TypeId::NUMBER);
    assert_eq!(
        fx.run(TypeFunctionKind::Or, &[a, TypeId::STRING]),
        result(&[TypeId::NUMBER, TypeId::STRING], TypeId::NUMBER)
    );
}

// =============================================================================
// Unary
// =============================================================================

#[test]
fn not_and_len_surface_the_resolved_operand() {
    let mut fx = Fixture::new();
    let a = fx.arena.generic("a");
    let b = fx.arena.generic("b");
    fx.substitutable.insert(a, TypeId::STRING);

    assert_eq!(
        fx.run(TypeFunctionKind::Not, &[a]),
        result(&[TypeId::STRING], TypeId::BOOLEAN)
    );
    assert_eq!(
        fx.run(TypeFunctionKind::Len, &[a]),
        result(&[TypeId::STRING], TypeId::NUMBER)
    );
    assert_eq!(
        fx.run(TypeFunctionKind::Len, &[b]),
        result(&[b], TypeId::NUMBER)
    );
}

#[test]
fn unary_minus_keeps_numbers_and_widens_the_rest() {
    let mut fx = Fixture::new();
    let a = fx.arena.generic("a");
    let b = fx.arena.generic("b");
    fx.substitutable.insert(a, TypeId::NUMBER);

    assert_eq!(
        fx.run(TypeFunctionKind::Unm, &[a]),
        result(&[TypeId::NUMBER], TypeId::NUMBER)
    );
    assert_eq!(
        fx.run(TypeFunctionKind::Unm, &[b]),
        result(&[TypeId::UNKNOWN], TypeId::NUMBER)
    );
    assert_eq!(
        fx.run(TypeFunctionKind::Unm, &[TypeId::STRING]),
        result(&[TypeId::UNKNOWN], TypeId::NUMBER)
    );
}
