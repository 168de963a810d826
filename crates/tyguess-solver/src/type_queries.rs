//! Kind queries over the type graph.
//!
//! The guesser only cares whether a node currently behaves as a type function
//! instance, a generic, a class, or something else. These helpers answer that
//! without callers matching on `TypeData` themselves. None of them follow
//! aliases; callers decide when to `follow`.

use crate::db::TypeDatabase;
use crate::types::{PrimitiveKind, TypeData, TypeFunctionInstance, TypeId, TypePackData, TypePackId};
use rustc_hash::FxHashSet;

/// The capability set the guesser distinguishes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A pending type function application.
    Instance,
    /// A type parameter of the enclosing signature.
    Generic,
    /// An opaque class; never traversed.
    Class,
    /// Anything else, opaque to the guesser.
    Other,
}

pub fn classify(db: &dyn TypeDatabase, ty: TypeId) -> TypeKind {
    match db.lookup(ty) {
        Some(TypeData::Instance(_)) => TypeKind::Instance,
        Some(TypeData::Generic(_)) => TypeKind::Generic,
        Some(TypeData::Class(_)) => TypeKind::Class,
        _ => TypeKind::Other,
    }
}

/// The instance payload, if `ty` is a type function instance.
pub fn type_function_instance(db: &dyn TypeDatabase, ty: TypeId) -> Option<TypeFunctionInstance> {
    match db.lookup(ty) {
        Some(TypeData::Instance(instance)) => Some(instance),
        _ => None,
    }
}

pub fn is_type_function_instance(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    classify(db, ty) == TypeKind::Instance
}

pub fn is_generic(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    classify(db, ty) == TypeKind::Generic
}

/// Whether `ty` resolves to the `number` primitive. Follows aliases.
pub fn is_number(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    matches!(
        db.lookup(db.follow(ty)),
        Some(TypeData::Primitive(PrimitiveKind::Number))
    )
}

/// Split a pack into its fixed head and its open tail, if any.
///
/// Nested list packs reached through tails are concatenated. The returned
/// tail is the first tail that is not itself a list (followed), so
/// `(number, ...string)` flattens to `([number], Some(...string))` and
/// `(number, string)` to `([number, string], None)`.
pub fn flatten(db: &dyn TypeDatabase, tp: TypePackId) -> (Vec<TypeId>, Option<TypePackId>) {
    let mut head = Vec::new();
    let mut current = db.follow_pack(tp);
    let mut seen = FxHashSet::default();

    while seen.insert(current) {
        match db.lookup_pack(current) {
            Some(TypePackData::List { head: types, tail }) => {
                head.extend(types);
                match tail {
                    Some(next) => current = db.follow_pack(next),
                    None => return (head, None),
                }
            }
            _ => return (head, Some(current)),
        }
    }

    // a list pack whose tail loops back to itself: stop at the repeat
    (head, Some(current))
}

/// The fixed head of a pack. Open tails are dropped.
pub fn pack_types(db: &dyn TypeDatabase, tp: TypePackId) -> Vec<TypeId> {
    flatten(db, tp).0
}

#[cfg(test)]
#[path = "../tests/type_queries_tests.rs"]
mod tests;
