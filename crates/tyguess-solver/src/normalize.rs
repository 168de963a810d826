//! Truthiness-oriented normalization.
//!
//! The `or` / `and` heuristics need to know whether an operand can be falsy.
//! A full normal form is the host checker's business; the guesser only asks
//! for a [`NormalizedType`] view exposing the falsy components (`nil`,
//! `false`) and whether the type is still open (a top-like type that could
//! be anything).
//!
//! Views are computed on demand and never cached: the guesser asks at most
//! twice per heuristic dispatch.

use crate::db::TypeDatabase;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{PrimitiveKind, SingletonValue, TypeData, TypeId};
use tracing::debug;

/// Which boolean values a type admits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BooleanInhabitants {
    #[default]
    None,
    True,
    False,
    Both,
}

impl BooleanInhabitants {
    fn from_flags(has_true: bool, has_false: bool) -> Self {
        match (has_true, has_false) {
            (false, false) => Self::None,
            (true, false) => Self::True,
            (false, true) => Self::False,
            (true, true) => Self::Both,
        }
    }

    pub fn includes_true(self) -> bool {
        matches!(self, Self::True | Self::Both)
    }

    pub fn includes_false(self) -> bool {
        matches!(self, Self::False | Self::Both)
    }

    fn join(self, other: Self) -> Self {
        Self::from_flags(
            self.includes_true() || other.includes_true(),
            self.includes_false() || other.includes_false(),
        )
    }

    fn meet(self, other: Self) -> Self {
        Self::from_flags(
            self.includes_true() && other.includes_true(),
            self.includes_false() && other.includes_false(),
        )
    }
}

/// A summary of a type's inhabitants, precise enough to answer truthiness.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedType {
    /// The type is open: `unknown`, `any`, an error, an unsolved variable, a
    /// generic, or an unreduced type function. It may hold anything.
    pub tops: bool,
    pub nil: bool,
    pub booleans: BooleanInhabitants,
    /// Some inhabitant that is always truthy (numbers, strings, tables,
    /// functions, classes, ...).
    pub others: bool,
}

impl NormalizedType {
    /// The empty type.
    pub fn never() -> Self {
        Self::default()
    }

    pub fn top() -> Self {
        Self {
            tops: true,
            ..Self::default()
        }
    }

    pub fn is_never(&self) -> bool {
        *self == Self::never()
    }

    /// Whether every inhabitant is truthy, i.e. `nil` and `false` are excluded
    /// and the type is not open.
    pub fn is_truthy(&self) -> bool {
        !self.tops && !self.nil && !self.booleans.includes_false()
    }

    /// Whether every inhabitant is falsy and at least one exists.
    pub fn is_falsy(&self) -> bool {
        !self.tops
            && !self.others
            && !self.booleans.includes_true()
            && (self.nil || self.booleans.includes_false())
    }

    fn union(self, other: Self) -> Self {
        Self {
            tops: self.tops || other.tops,
            nil: self.nil || other.nil,
            booleans: self.booleans.join(other.booleans),
            others: self.others || other.others,
        }
    }

    fn intersect(self, other: Self) -> Self {
        if self.tops {
            return other;
        }
        if other.tops {
            return self;
        }
        Self {
            tops: false,
            nil: self.nil && other.nil,
            booleans: self.booleans.meet(other.booleans),
            others: self.others && other.others,
        }
    }
}

/// Produces [`NormalizedType`] views on demand.
pub trait Normalizer {
    /// `None` for inputs that cannot be normalized (dangling handles, graphs
    /// too deep or too wide). Callers treat that as "not truthy".
    fn normalize(&self, ty: TypeId) -> Option<NormalizedType>;
}

/// [`Normalizer`] over any [`TypeDatabase`].
pub struct TypeNormalizer<'a> {
    db: &'a dyn TypeDatabase,
    profile: RecursionProfile,
}

impl<'a> TypeNormalizer<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self {
            db,
            profile: RecursionProfile::Normalization,
        }
    }

    pub fn with_profile(db: &'a dyn TypeDatabase, profile: RecursionProfile) -> Self {
        Self { db, profile }
    }

    fn walk(&self, guard: &mut RecursionGuard<TypeId>, ty: TypeId) -> Option<NormalizedType> {
        let ty = self.db.follow(ty);
        match guard.enter(ty) {
            RecursionResult::Entered => {
                let result = self.normalize_data(guard, ty);
                guard.leave(ty);
                result
            }
            // A type that contains itself through a union adds nothing new.
            RecursionResult::Cycle => Some(NormalizedType::never()),
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                debug!(type_id = ty.0, "normalization limit exceeded");
                None
            }
        }
    }

    fn normalize_data(
        &self,
        guard: &mut RecursionGuard<TypeId>,
        ty: TypeId,
    ) -> Option<NormalizedType> {
        let normalized = match self.db.lookup(ty)? {
            TypeData::Primitive(PrimitiveKind::Nil) => NormalizedType {
                nil: true,
                ..NormalizedType::default()
            },
            TypeData::Primitive(PrimitiveKind::Boolean) => NormalizedType {
                booleans: BooleanInhabitants::Both,
                ..NormalizedType::default()
            },
            TypeData::Singleton(SingletonValue::Boolean(true)) => NormalizedType {
                booleans: BooleanInhabitants::True,
                ..NormalizedType::default()
            },
            TypeData::Singleton(SingletonValue::Boolean(false)) => NormalizedType {
                booleans: BooleanInhabitants::False,
                ..NormalizedType::default()
            },
            TypeData::Primitive(
                PrimitiveKind::Number
                | PrimitiveKind::String
                | PrimitiveKind::Thread
                | PrimitiveKind::Buffer,
            )
            | TypeData::Singleton(SingletonValue::String(_))
            | TypeData::Class(_)
            | TypeData::Function(_)
            | TypeData::Table(_) => NormalizedType {
                others: true,
                ..NormalizedType::default()
            },
            TypeData::Never => NormalizedType::never(),
            // `follow` stops on a bound cycle; such a node says nothing.
            TypeData::Unknown
            | TypeData::Any
            | TypeData::Error
            | TypeData::Free
            | TypeData::Bound(_)
            | TypeData::Generic(_)
            | TypeData::Instance(_) => NormalizedType::top(),
            TypeData::Union(members) => {
                let mut acc = NormalizedType::never();
                for member in members {
                    acc = acc.union(self.walk(guard, member)?);
                }
                acc
            }
            TypeData::Intersection(members) => {
                let mut acc = NormalizedType::top();
                for member in members {
                    acc = acc.intersect(self.walk(guard, member)?);
                }
                acc
            }
        };
        Some(normalized)
    }
}

impl Normalizer for TypeNormalizer<'_> {
    fn normalize(&self, ty: TypeId) -> Option<NormalizedType> {
        let mut guard = RecursionGuard::with_profile(self.profile);
        self.walk(&mut guard, ty)
    }
}

#[cfg(test)]
#[path = "../tests/normalize_tests.rs"]
mod tests;
