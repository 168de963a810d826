//! The type graph as seen by the guesser.
//!
//! `TypeDatabase` is the seam between the guesser and the host checker's
//! arena. The guesser reads the graph through `lookup` and `follow`, and its
//! only write is `add_type_pack`, used when a guessed pack has to be
//! materialized.

use crate::types::{TypeData, TypeId, TypePackData, TypePackId};
use tracing::warn;

pub trait TypeDatabase {
    /// Structural content of `id`, or `None` for a dangling handle.
    fn lookup(&self, id: TypeId) -> Option<TypeData>;

    /// Structural content of the pack `id`, or `None` for a dangling handle.
    fn lookup_pack(&self, id: TypePackId) -> Option<TypePackData>;

    /// Allocate a new type node.
    fn add_type(&self, data: TypeData) -> TypeId;

    /// Allocate a new type pack node.
    fn add_type_pack(&self, data: TypePackData) -> TypePackId;

    /// The node `id` aliases, if it is a `Bound` node.
    fn bound_target(&self, id: TypeId) -> Option<TypeId> {
        match self.lookup(id) {
            Some(TypeData::Bound(target)) => Some(target),
            _ => None,
        }
    }

    /// The pack `id` aliases, if it is a bound pack.
    fn bound_pack_target(&self, id: TypePackId) -> Option<TypePackId> {
        match self.lookup_pack(id) {
            Some(TypePackData::Bound(target)) => Some(target),
            _ => None,
        }
    }

    /// Resolve alias chains to the canonical representative of `id`.
    ///
    /// Idempotent. A malformed chain that loops back on itself is detected
    /// (tortoise and hare) and cut at the point of detection.
    fn follow(&self, id: TypeId) -> TypeId {
        let mut slow = id;
        let mut fast = id;
        let mut advance_slow = false;
        while let Some(next) = self.bound_target(fast) {
            fast = next;
            if advance_slow {
                slow = self.bound_target(slow).unwrap_or(slow);
            }
            advance_slow = !advance_slow;
            if slow == fast {
                warn!(type_id = fast.0, "bound type chain forms a cycle");
                return fast;
            }
        }
        fast
    }

    /// Resolve pack alias chains. Same contract as [`follow`](Self::follow).
    fn follow_pack(&self, id: TypePackId) -> TypePackId {
        let mut slow = id;
        let mut fast = id;
        let mut advance_slow = false;
        while let Some(next) = self.bound_pack_target(fast) {
            fast = next;
            if advance_slow {
                slow = self.bound_pack_target(slow).unwrap_or(slow);
            }
            advance_slow = !advance_slow;
            if slow == fast {
                warn!(pack_id = fast.0, "bound type pack chain forms a cycle");
                return fast;
            }
        }
        fast
    }
}
