//! Reduction guessing for unannotated functions.
//!
//! Given the inferred return type of a function, the guesser collects every
//! pending type function instance reachable from it and runs the per-family
//! heuristics over them innermost first. Each dispatch refines two maps:
//!
//! - `family_reduces_to`: instance -> what it is believed to reduce to
//! - `substitutable`: generic -> what it is believed to stand for
//!
//! The maps are then read back to propose parameter and return annotations.
//! All state is scoped to a single [`ReductionGuesser::guess_reduction_for_function`]
//! call and cleared before it returns.

use crate::ast::FunctionExpr;
use crate::db::TypeDatabase;
use crate::format::TypeFormatter;
use crate::heuristics::{
    GuessMap, HeuristicContext, TypeFunctionInferenceResult, infer_instance,
};
use crate::instance_collector::{CollectedInstances, collect_instances, collect_pack_instances};
use crate::normalize::Normalizer;
use crate::type_queries::{
    TypeKind, classify, flatten, is_type_function_instance, pack_types, type_function_instance,
};
use crate::types::{FunctionShape, TypeFunctionInstance, TypeId, TypePackData, TypePackId};
use rustc_hash::{FxBuildHasher, FxHashSet};
use std::collections::VecDeque;
use tracing::{Level, debug, debug_span, trace};
use tyguess_common::limits::{GUESS_MAP_INITIAL_CAPACITY, WORKLIST_INITIAL_CAPACITY};

/// Annotations proposed for one function.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReductionGuessResult {
    /// `(parameter name, guessed type)` in declaration order. Parameters
    /// without a usable guess are omitted.
    pub guessed_function_annotations: Vec<(String, TypeId)>,
    /// `None` only when no recommendation is made.
    pub guessed_return_type: Option<TypeId>,
    pub should_recommend_annotation: bool,
}

impl ReductionGuessResult {
    fn no_recommendation() -> Self {
        Self::default()
    }
}

pub struct ReductionGuesser<'a> {
    db: &'a dyn TypeDatabase,
    normalizer: &'a dyn Normalizer,
    family_reduces_to: GuessMap,
    substitutable: GuessMap,
    to_infer: VecDeque<TypeId>,
    cyclic_instances: FxHashSet<TypeId>,
}

impl<'a> ReductionGuesser<'a> {
    pub fn new(db: &'a dyn TypeDatabase, normalizer: &'a dyn Normalizer) -> Self {
        Self {
            db,
            normalizer,
            family_reduces_to: GuessMap::with_capacity_and_hasher(
                GUESS_MAP_INITIAL_CAPACITY,
                FxBuildHasher::default(),
            ),
            substitutable: GuessMap::with_capacity_and_hasher(
                GUESS_MAP_INITIAL_CAPACITY,
                FxBuildHasher::default(),
            ),
            to_infer: VecDeque::with_capacity(WORKLIST_INITIAL_CAPACITY),
            cyclic_instances: FxHashSet::default(),
        }
    }

    // =========================================================================
    // Public queries
    // =========================================================================

    /// The current guess for `ty`, followed. Never an unreduced instance.
    pub fn guess(&self, ty: TypeId) -> Option<TypeId> {
        let guessed = self.db.follow(self.guess_type(ty)?);
        if is_type_function_instance(self.db, guessed) {
            return None;
        }
        Some(guessed)
    }

    /// Guess every element of `tp`'s head and allocate the guessed pack,
    /// keeping the original tail.
    ///
    /// Rejects the whole pack if any element has no guess or is still an
    /// instance.
    pub fn guess_pack(&self, tp: TypePackId) -> Option<TypePackId> {
        let (head, tail) = flatten(self.db, tp);
        let mut guessed_head = Vec::with_capacity(head.len());
        for ty in head {
            let guessed = self.guess_type(ty)?;
            if is_type_function_instance(self.db, self.db.follow(guessed)) {
                return None;
            }
            guessed_head.push(guessed);
        }
        Some(self.db.add_type_pack(TypePackData::List {
            head: guessed_head,
            tail,
        }))
    }

    /// The hypothesis recorded for an instance, unfollowed.
    pub fn reduction_of(&self, instance: TypeId) -> Option<TypeId> {
        self.family_reduces_to.get(&self.db.follow(instance)).copied()
    }

    /// The substitution recorded for a generic, unfollowed.
    pub fn substitution_of(&self, generic: TypeId) -> Option<TypeId> {
        self.substitutable.get(&self.db.follow(generic)).copied()
    }

    // =========================================================================
    // Seeding and inference
    // =========================================================================

    /// Seed the worklist with every instance reachable from `root`.
    ///
    /// Returns the followed operands of the collected instances.
    pub fn collect_from(&mut self, root: TypeId) -> FxHashSet<TypeId> {
        let collected = collect_instances(self.db, root);
        self.seed(collected)
    }

    /// Seed the worklist with every type instance reachable from the pack
    /// `root`. Pack instances are collected but have no heuristics.
    pub fn collect_from_pack(&mut self, root: TypePackId) -> FxHashSet<TypeId> {
        let collected = collect_pack_instances(self.db, root);
        if !collected.pack_instances.is_empty() {
            debug!(
                count = collected.pack_instances.len(),
                "pack instances have no guessing heuristic, skipping"
            );
        }
        self.seed(collected)
    }

    fn seed(&mut self, collected: CollectedInstances) -> FxHashSet<TypeId> {
        debug!(
            instances = collected.instances.len(),
            cyclic = collected.cyclic_instances.len(),
            "seeding reduction worklist"
        );
        self.to_infer = collected.instances;
        self.cyclic_instances = collected.cyclic_instances;
        collected.instance_arguments
    }

    /// Drain the worklist. Returns the number of heuristic dispatches, which
    /// never exceeds the number of seeded instances.
    pub fn infer(&mut self) -> usize {
        let mut dispatched = 0;
        while !self.done() {
            if self.step() {
                dispatched += 1;
            }
        }
        debug!(dispatched, "reduction inference finished");
        dispatched
    }

    fn done(&self) -> bool {
        self.to_infer.is_empty()
    }

    /// Process the front of the worklist. Returns whether a heuristic ran.
    fn step(&mut self) -> bool {
        let Some(front) = self.to_infer.pop_front() else {
            return false;
        };
        let ty = self.db.follow(front);
        let Some(instance) = type_function_instance(self.db, ty) else {
            trace!(type_id = ty.0, "worklist entry no longer an instance");
            return false;
        };

        let inference = {
            let ctx = HeuristicContext {
                db: self.db,
                normalizer: self.normalizer,
                family_reduces_to: &self.family_reduces_to,
                substitutable: &self.substitutable,
                cyclic_instances: &self.cyclic_instances,
            };
            infer_instance(&ctx, &instance)
        };
        self.infer_type_function_substitutions(ty, &instance, &inference);
        true
    }

    /// Record one heuristic's proposal.
    ///
    /// The instance's own result is skipped when the candidate result is
    /// already a key of the result map. Operand proposals never overwrite an
    /// instance's hypothesis but always overwrite a generic's substitution.
    fn infer_type_function_substitutions(
        &mut self,
        ty: TypeId,
        instance: &TypeFunctionInstance,
        inference: &TypeFunctionInferenceResult,
    ) {
        let result = self.db.follow(inference.result_inference);
        if !self.family_reduces_to.contains_key(&result) {
            self.family_reduces_to.insert(ty, result);
        }

        for (&arg, &proposed) in instance
            .type_arguments
            .iter()
            .zip(inference.operand_inference.iter())
        {
            let arg = self.db.follow(arg);
            let proposed = self.db.follow(proposed);
            match classify(self.db, arg) {
                TypeKind::Instance => {
                    self.family_reduces_to.entry(arg).or_insert(proposed);
                }
                TypeKind::Generic => {
                    self.substitutable.insert(arg, proposed);
                }
                TypeKind::Class | TypeKind::Other => {}
            }
        }
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    fn guess_type(&self, ty: TypeId) -> Option<TypeId> {
        let ty = self.db.follow(ty);

        if let Some(&subst) = self.substitutable.get(&ty) {
            let subst = self.db.follow(subst);
            if subst == ty || self.substitutable.contains_key(&subst) {
                return Some(subst);
            }
            if !is_type_function_instance(self.db, subst) {
                return Some(subst);
            }
            return self.guess_type(subst);
        }

        if is_type_function_instance(self.db, ty) {
            return self.family_reduces_to.get(&ty).copied();
        }
        None
    }

    // =========================================================================
    // Orchestration
    // =========================================================================

    /// Propose annotations for an unannotated function.
    ///
    /// `signature` is the function's inferred type and `return_type` its
    /// inferred return type (usually the head of `signature.returns`).
    pub fn guess_reduction_for_function(
        &mut self,
        expr: &FunctionExpr,
        signature: &FunctionShape,
        return_type: TypeId,
    ) -> ReductionGuessResult {
        let span = debug_span!(
            "guess_reduction_for_function",
            params = expr.params.len(),
            return_type = return_type.0
        );
        let _enter = span.enter();

        let instance_arguments = self.collect_from(return_type);
        if self.is_function_generics_saturated(signature, &instance_arguments) {
            debug!("signature generics saturated, no recommendation");
            self.clear();
            return ReductionGuessResult::no_recommendation();
        }

        self.infer();
        self.dump_guesses();

        let args = pack_types(self.db, signature.params);
        let mut annotations = Vec::new();
        for (param, &arg) in expr.params.iter().zip(args.iter()) {
            match self.guess(arg) {
                Some(guessed) => annotations.push((param.name.clone(), guessed)),
                None => trace!(param = %param.name, "no guess for parameter"),
            }
        }

        let return_guess = self.guess(return_type).unwrap_or(TypeId::UNKNOWN);

        self.clear();
        ReductionGuessResult {
            guessed_function_annotations: annotations,
            guessed_return_type: Some(return_guess),
            should_recommend_annotation: true,
        }
    }

    /// Whether the signature's generics are already anchored by the collected
    /// operands.
    ///
    /// Only the counts decide: the membership flag starts out true and is
    /// OR-ed, so it never turns false.
    fn is_function_generics_saturated(
        &self,
        signature: &FunctionShape,
        instance_arguments: &FxHashSet<TypeId>,
    ) -> bool {
        let same_size = signature.generics.len() == instance_arguments.len();
        let mut all_generics_appear = true;
        for generic in &signature.generics {
            all_generics_appear = all_generics_appear || instance_arguments.contains(generic);
        }
        same_size && all_generics_appear
    }

    /// Log every hypothesis and substitution at debug level.
    fn dump_guesses(&self) {
        if !tracing::enabled!(Level::DEBUG) {
            return;
        }
        let mut fmt = TypeFormatter::new(self.db);
        for (&instance, &guess) in &self.family_reduces_to {
            let instance = fmt.format(instance);
            let guess = fmt.format(guess);
            debug!(%instance, %guess, "instance reduces to");
        }
        for (&generic, &guess) in &self.substitutable {
            let generic = fmt.format(generic);
            let guess = fmt.format(guess);
            debug!(%generic, %guess, "generic substituted by");
        }
    }

    /// Drop all per-call state.
    pub fn clear(&mut self) {
        self.family_reduces_to.clear();
        self.substitutable.clear();
        self.to_infer.clear();
        self.cyclic_instances.clear();
    }
}

#[cfg(test)]
#[path = "../tests/guesser_tests.rs"]
mod tests;
