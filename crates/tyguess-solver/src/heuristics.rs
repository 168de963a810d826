//! Per-family reduction heuristics.
//!
//! Each recognized type function family has one pure function mapping an
//! instance's operands to a tentative result type and tentative operand
//! types. The heuristics read, but never write, the engine's current
//! hypotheses through [`HeuristicContext`].
//!
//! These are guesses for an editor suggestion, not type checking. They are
//! allowed to be wrong.

use crate::db::TypeDatabase;
use crate::normalize::Normalizer;
use crate::type_queries::{TypeKind, classify, is_number};
use crate::types::{TypeFunctionInstance, TypeFunctionKind, TypeId};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use smallvec::{SmallVec, smallvec};
use tracing::trace;

/// Insertion-ordered map from a type to its guessed replacement.
pub type GuessMap = IndexMap<TypeId, TypeId, FxBuildHasher>;

/// What a heuristic proposes for one instance.
///
/// `operand_inference[i]` is the guess for operand `i`; the list may be
/// shorter than the operand list, in which case the remaining operands get no
/// guess.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeFunctionInferenceResult {
    pub operand_inference: SmallVec<[TypeId; 2]>,
    pub result_inference: TypeId,
}

impl TypeFunctionInferenceResult {
    fn new(operands: SmallVec<[TypeId; 2]>, result: TypeId) -> Self {
        Self {
            operand_inference: operands,
            result_inference: result,
        }
    }

    /// No operand guesses, result `unknown`.
    pub fn unknown() -> Self {
        Self::new(SmallVec::new(), TypeId::UNKNOWN)
    }
}

// =============================================================================
// Families
// =============================================================================

/// The type function families the guesser has a heuristic for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HeuristicFamily {
    /// `add`, `sub`, `mul`, `div`, `idiv`, `pow`, `mod`
    NumericBinop,
    /// `lt`, `le`, `eq`
    Comparison,
    Or,
    And,
    Not,
    Len,
    /// `unm`
    UnaryMinus,
}

pub type Heuristic = fn(&HeuristicContext<'_>, &TypeFunctionInstance) -> TypeFunctionInferenceResult;

impl HeuristicFamily {
    /// Operand count every instance of this family must have.
    pub const fn arity(self) -> usize {
        match self {
            Self::NumericBinop | Self::Comparison | Self::Or | Self::And => 2,
            Self::Not | Self::Len | Self::UnaryMinus => 1,
        }
    }

    pub const fn heuristic(self) -> Heuristic {
        match self {
            Self::NumericBinop => infer_numeric_binop,
            Self::Comparison => infer_comparison,
            Self::Or => infer_or,
            Self::And => infer_and,
            Self::Not => infer_not,
            Self::Len => infer_len,
            Self::UnaryMinus => infer_unary_minus,
        }
    }
}

impl TypeFunctionKind {
    /// The heuristic family for this type function, if the guesser knows one.
    pub const fn heuristic_family(self) -> Option<HeuristicFamily> {
        match self {
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Idiv | Self::Pow | Self::Mod => {
                Some(HeuristicFamily::NumericBinop)
            }
            Self::Lt | Self::Le | Self::Eq => Some(HeuristicFamily::Comparison),
            Self::Or => Some(HeuristicFamily::Or),
            Self::And => Some(HeuristicFamily::And),
            Self::Not => Some(HeuristicFamily::Not),
            Self::Len => Some(HeuristicFamily::Len),
            Self::Unm => Some(HeuristicFamily::UnaryMinus),
            Self::Concat
            | Self::Union
            | Self::Intersect
            | Self::Refine
            | Self::Keyof
            | Self::Rawkeyof
            | Self::Index
            | Self::Rawget => None,
        }
    }
}

// =============================================================================
// Context
// =============================================================================

/// Read-only view of the engine state a heuristic may consult.
pub struct HeuristicContext<'a> {
    pub db: &'a dyn TypeDatabase,
    pub normalizer: &'a dyn Normalizer,
    /// Current hypothesis for what each instance reduces to.
    pub family_reduces_to: &'a GuessMap,
    /// Current substitution for each generic.
    pub substitutable: &'a GuessMap,
    pub cyclic_instances: &'a FxHashSet<TypeId>,
}

impl HeuristicContext<'_> {
    /// The hypothesis already recorded for an operand, if any.
    ///
    /// Instances are collected innermost first, so an operand that is itself
    /// an instance has usually been guessed already.
    fn try_assign_operand_type(&self, ty: TypeId) -> Option<TypeId> {
        match classify(self.db, ty) {
            TypeKind::Instance => self.family_reduces_to.get(&ty).copied(),
            TypeKind::Generic => self.substitutable.get(&ty).copied(),
            TypeKind::Class | TypeKind::Other => None,
        }
    }

    /// Operand `ty`, followed, replaced by its current hypothesis if it has one.
    fn resolve_operand(&self, ty: TypeId) -> TypeId {
        let ty = self.db.follow(ty);
        match self.try_assign_operand_type(ty) {
            Some(assigned) => self.db.follow(assigned),
            None => ty,
        }
    }

    /// An operand is assignable when it is still open: an unreduced instance,
    /// a generic, or an instance on a cycle.
    fn operand_is_assignable(&self, ty: TypeId) -> bool {
        matches!(classify(self.db, ty), TypeKind::Instance | TypeKind::Generic)
            || self.cyclic_instances.contains(&ty)
    }

    fn is_truthy(&self, ty: TypeId) -> bool {
        self.normalizer
            .normalize(ty)
            .is_some_and(|normalized| normalized.is_truthy())
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Run the heuristic for `instance`'s family.
///
/// Unrecognized families get no operand guesses and an `unknown` result.
///
/// # Panics
///
/// If the instance's operand count does not match its family's arity. The
/// type function catalog and this heuristic catalog have diverged and no
/// guess is meaningful.
pub fn infer_instance(
    ctx: &HeuristicContext<'_>,
    instance: &TypeFunctionInstance,
) -> TypeFunctionInferenceResult {
    let Some(family) = instance.function.heuristic_family() else {
        trace!(function = %instance.function, "no heuristic for family");
        return TypeFunctionInferenceResult::unknown();
    };

    assert_eq!(
        instance.type_arguments.len(),
        family.arity(),
        "type function `{}` has {} operands but its guessing heuristic expects {}",
        instance.function,
        instance.type_arguments.len(),
        family.arity(),
    );

    let result = (family.heuristic())(ctx, instance);
    trace!(
        function = %instance.function,
        ?family,
        operands = ?result.operand_inference,
        result = ?result.result_inference,
        "heuristic applied"
    );
    result
}

// =============================================================================
// Heuristics
// =============================================================================

/// Arithmetic is overwhelmingly numeric: guess `number` everywhere.
fn infer_numeric_binop(
    _ctx: &HeuristicContext<'_>,
    _instance: &TypeFunctionInstance,
) -> TypeFunctionInferenceResult {
    TypeFunctionInferenceResult::new(smallvec![TypeId::NUMBER, TypeId::NUMBER], TypeId::NUMBER)
}

/// Comparisons are treated as `t -> t -> boolean`: if exactly one side is
/// still open, both sides take the concrete side's type.
fn infer_comparison(
    ctx: &HeuristicContext<'_>,
    instance: &TypeFunctionInstance,
) -> TypeFunctionInferenceResult {
    let lhs = ctx.resolve_operand(instance.type_arguments[0]);
    let rhs = ctx.resolve_operand(instance.type_arguments[1]);

    let both = |ty: TypeId| TypeFunctionInferenceResult::new(smallvec![ty, ty], TypeId::BOOLEAN);

    let lhs_open = ctx.operand_is_assignable(lhs);
    let rhs_open = ctx.operand_is_assignable(rhs);
    if lhs_open && !rhs_open {
        return both(rhs);
    }
    if rhs_open && !lhs_open {
        return both(lhs);
    }
    both(TypeId::NUMBER)
}

fn default_or_and() -> TypeFunctionInferenceResult {
    TypeFunctionInferenceResult::new(smallvec![TypeId::UNKNOWN, TypeId::UNKNOWN], TypeId::BOOLEAN)
}

/// Resolved operands of a binary `or` / `and` with their truthiness.
struct LogicalOperands {
    lhs: TypeId,
    rhs: TypeId,
    lhs_open: bool,
    rhs_open: bool,
    lhs_truthy: bool,
    rhs_truthy: bool,
}

fn logical_operands(ctx: &HeuristicContext<'_>, instance: &TypeFunctionInstance) -> LogicalOperands {
    let lhs = ctx.resolve_operand(instance.type_arguments[0]);
    let rhs = ctx.resolve_operand(instance.type_arguments[1]);

    // Both truthiness flags are read from the left operand.
    let lhs_truthy = ctx.is_truthy(lhs);
    let rhs_truthy = ctx.is_truthy(lhs);

    LogicalOperands {
        lhs,
        rhs,
        lhs_open: ctx.operand_is_assignable(lhs),
        rhs_open: ctx.operand_is_assignable(rhs),
        lhs_truthy,
        rhs_truthy,
    }
}

fn infer_or(ctx: &HeuristicContext<'_>, instance: &TypeFunctionInstance) -> TypeFunctionInferenceResult {
    let ops = logical_operands(ctx, instance);

    if ops.lhs_open && ops.rhs_open {
        return default_or_and();
    }
    if ops.lhs_open {
        return TypeFunctionInferenceResult::new(smallvec![TypeId::UNKNOWN, ops.rhs], ops.rhs);
    }
    if ops.rhs_open {
        return TypeFunctionInferenceResult::new(smallvec![ops.lhs, TypeId::UNKNOWN], ops.lhs);
    }
    if ops.lhs_truthy {
        return TypeFunctionInferenceResult::new(smallvec![ops.lhs, ops.rhs], ops.lhs);
    }
    if ops.rhs_truthy {
        return TypeFunctionInferenceResult::new(smallvec![TypeId::UNKNOWN, ops.rhs], ops.rhs);
    }
    default_or_and()
}

fn infer_and(ctx: &HeuristicContext<'_>, instance: &TypeFunctionInstance) -> TypeFunctionInferenceResult {
    let ops = logical_operands(ctx, instance);

    if ops.lhs_open && ops.rhs_open {
        return default_or_and();
    }
    if ops.lhs_open {
        return TypeFunctionInferenceResult::new(SmallVec::new(), ops.rhs);
    }
    if ops.rhs_open {
        return TypeFunctionInferenceResult::new(SmallVec::new(), ops.lhs);
    }
    // a truthy left side means `and` evaluates to the right side
    if ops.lhs_truthy {
        TypeFunctionInferenceResult::new(smallvec![ops.lhs, ops.rhs], ops.rhs)
    } else {
        TypeFunctionInferenceResult::new(smallvec![ops.lhs, ops.rhs], ops.lhs)
    }
}

/// `not x`: surface whatever `x` already resolved to.
fn infer_not(ctx: &HeuristicContext<'_>, instance: &TypeFunctionInstance) -> TypeFunctionInferenceResult {
    let operand = ctx.resolve_operand(instance.type_arguments[0]);
    TypeFunctionInferenceResult::new(smallvec![operand], TypeId::BOOLEAN)
}

/// `#x`: surface whatever `x` already resolved to.
fn infer_len(ctx: &HeuristicContext<'_>, instance: &TypeFunctionInstance) -> TypeFunctionInferenceResult {
    let operand = ctx.resolve_operand(instance.type_arguments[0]);
    TypeFunctionInferenceResult::new(smallvec![operand], TypeId::NUMBER)
}

fn infer_unary_minus(
    ctx: &HeuristicContext<'_>,
    instance: &TypeFunctionInstance,
) -> TypeFunctionInferenceResult {
    let operand = ctx.resolve_operand(instance.type_arguments[0]);
    if is_number(ctx.db, operand) {
        TypeFunctionInferenceResult::new(smallvec![TypeId::NUMBER], TypeId::NUMBER)
    } else {
        TypeFunctionInferenceResult::new(smallvec![TypeId::UNKNOWN], TypeId::NUMBER)
    }
}

#[cfg(test)]
#[path = "../tests/heuristics_tests.rs"]
mod tests;
