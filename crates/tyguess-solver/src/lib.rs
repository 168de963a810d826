//! Type Function Reduction Guesser
//!
//! When a function has no annotations, its inferred signature is often full
//! of type function applications that could not be reduced (`add<a, number>`,
//! `lt<a, string>`, ...). This crate guesses what those applications would
//! most plausibly reduce to, so that an editor can suggest concrete parameter
//! and return annotations.
//!
//! It uses:
//!
//! - **`TypeDatabase`**: a seam over the host checker's type arena
//! - **Instance collection**: innermost-first worklist with cycle detection
//! - **Family heuristics**: one pure rule per type function family
//! - **Fixpoint inference**: a single pass over the worklist refining
//!   hypotheses for instances and substitutions for generics
//!
//! Everything is heuristic. A guess is a suggestion, never a checked type.
mod arena;
pub mod ast;
mod db;
mod format;
pub mod guesser;
pub mod heuristics;
pub mod instance_collector;
pub mod normalize;
pub mod recursion;
pub mod type_queries;
pub mod types;

pub use arena::TypeArena;
pub use ast::{FunctionExpr, Local};
pub use db::TypeDatabase;
pub use format::TypeFormatter;
pub use guesser::{ReductionGuessResult, ReductionGuesser};
pub use heuristics::{
    GuessMap, HeuristicContext, HeuristicFamily, TypeFunctionInferenceResult, infer_instance,
};
pub use instance_collector::{
    CollectedInstances, InstanceCollector, collect_instances, collect_pack_instances,
};
pub use normalize::{BooleanInhabitants, NormalizedType, Normalizer, TypeNormalizer};
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use types::{
    ClassShape, FunctionShape, GenericParam, PrimitiveKind, SingletonValue, TableShape, TypeData,
    TypeFunctionInstance, TypeFunctionKind, TypeId, TypePackData, TypePackId,
};
