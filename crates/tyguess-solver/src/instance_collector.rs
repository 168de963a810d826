//! Collection of type function instances reachable from a type.
//!
//! The collector walks the graph depth-first, visiting each node once. Every
//! type function instance it meets is pushed to the *front* of the worklist,
//! so once the walk is over the innermost instances come first: for
//! `add<add<add<number, number>, number>, number>` the innermost `add` is
//! at the front and the outermost at the back. Processing the worklist from
//! the front therefore reduces operands before the instances that use them.
//!
//! A node met again while it is still on the current path is a back edge;
//! if that node is an instance it is recorded as cyclic. Nodes met again
//! after they were finished (shared structure) are skipped silently.

use crate::db::TypeDatabase;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::type_queries::is_type_function_instance;
use crate::types::{TypeData, TypeFunctionInstance, TypeId, TypePackData, TypePackId};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Everything one collection pass found.
#[derive(Debug, Default)]
pub struct CollectedInstances {
    /// Type function instances, innermost first.
    pub instances: VecDeque<TypeId>,
    /// Type pack function instances, innermost first.
    pub pack_instances: VecDeque<TypePackId>,
    /// Instances reached again through a back edge.
    pub cyclic_instances: FxHashSet<TypeId>,
    /// Followed operands of every visited instance.
    pub instance_arguments: FxHashSet<TypeId>,
}

pub struct InstanceCollector<'a> {
    db: &'a dyn TypeDatabase,
    type_path: RecursionGuard<TypeId>,
    pack_path: RecursionGuard<TypePackId>,
    seen_types: FxHashSet<TypeId>,
    seen_packs: FxHashSet<TypePackId>,
    collected: CollectedInstances,
}

impl<'a> InstanceCollector<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self::with_profile(db, RecursionProfile::InstanceCollection)
    }

    pub fn with_profile(db: &'a dyn TypeDatabase, profile: RecursionProfile) -> Self {
        Self {
            db,
            type_path: RecursionGuard::with_profile(profile),
            pack_path: RecursionGuard::with_profile(profile),
            seen_types: FxHashSet::default(),
            seen_packs: FxHashSet::default(),
            collected: CollectedInstances::default(),
        }
    }

    pub fn traverse(&mut self, ty: TypeId) {
        let ty = self.db.follow(ty);

        if self.type_path.is_visiting(&ty) {
            self.cycle(ty);
            return;
        }
        if self.seen_types.contains(&ty) {
            return;
        }

        // Only entered nodes count as seen: a node cut off by a limit may
        // still be reached through a shorter path.
        match self.type_path.enter(ty) {
            RecursionResult::Entered => {
                self.seen_types.insert(ty);
                self.visit_type(ty);
                self.type_path.leave(ty);
            }
            RecursionResult::Cycle => self.cycle(ty),
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                debug!(type_id = ty.0, "instance collection limit reached, not descending");
            }
        }
    }

    pub fn traverse_pack(&mut self, tp: TypePackId) {
        let tp = self.db.follow_pack(tp);

        if self.pack_path.is_visiting(&tp) || self.seen_packs.contains(&tp) {
            return;
        }

        match self.pack_path.enter(tp) {
            RecursionResult::Entered => {
                self.seen_packs.insert(tp);
                self.visit_pack(tp);
                self.pack_path.leave(tp);
            }
            RecursionResult::Cycle => {}
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                debug!(pack_id = tp.0, "instance collection limit reached, not descending");
            }
        }
    }

    pub fn finish(self) -> CollectedInstances {
        self.collected
    }

    fn visit_type(&mut self, ty: TypeId) {
        let Some(data) = self.db.lookup(ty) else {
            return;
        };
        match data {
            TypeData::Instance(instance) => {
                trace!(type_id = ty.0, function = %instance.function, "collected instance");
                self.collected.instances.push_front(ty);
                for &arg in &instance.type_arguments {
                    self.collected
                        .instance_arguments
                        .insert(self.db.follow(arg));
                }
                self.visit_operands(&instance);
            }
            // opaque: the host owns everything behind a class
            TypeData::Class(_) => {}
            TypeData::Function(shape) => {
                for generic in shape.generics {
                    self.traverse(generic);
                }
                for generic in shape.generic_packs {
                    self.traverse_pack(generic);
                }
                self.traverse_pack(shape.params);
                self.traverse_pack(shape.returns);
            }
            TypeData::Table(table) => {
                for (_, prop) in table.properties {
                    self.traverse(prop);
                }
                if let Some((key, value)) = table.indexer {
                    self.traverse(key);
                    self.traverse(value);
                }
            }
            TypeData::Union(members) | TypeData::Intersection(members) => {
                for member in members {
                    self.traverse(member);
                }
            }
            TypeData::Primitive(_)
            | TypeData::Singleton(_)
            | TypeData::Unknown
            | TypeData::Any
            | TypeData::Never
            | TypeData::Error
            | TypeData::Free
            | TypeData::Bound(_)
            | TypeData::Generic(_) => {}
        }
    }

    fn visit_pack(&mut self, tp: TypePackId) {
        let Some(data) = self.db.lookup_pack(tp) else {
            return;
        };
        match data {
            TypePackData::List { head, tail } => {
                for ty in head {
                    self.traverse(ty);
                }
                if let Some(tail) = tail {
                    self.traverse_pack(tail);
                }
            }
            TypePackData::Variadic(element) => self.traverse(element),
            TypePackData::Instance(instance) => {
                trace!(pack_id = tp.0, function = %instance.function, "collected pack instance");
                self.collected.pack_instances.push_front(tp);
                self.visit_operands(&instance);
            }
            TypePackData::Generic(_) | TypePackData::Free | TypePackData::Bound(_) => {}
        }
    }

    fn visit_operands(&mut self, instance: &TypeFunctionInstance) {
        for &arg in &instance.type_arguments {
            self.traverse(arg);
        }
        for &arg in &instance.pack_arguments {
            self.traverse_pack(arg);
        }
    }

    fn cycle(&mut self, ty: TypeId) {
        let ty = self.db.follow(ty);
        if is_type_function_instance(self.db, ty) {
            trace!(type_id = ty.0, "instance participates in a cycle");
            self.collected.cyclic_instances.insert(ty);
        }
    }
}

/// Collect every instance reachable from `root`.
pub fn collect_instances(db: &dyn TypeDatabase, root: TypeId) -> CollectedInstances {
    let mut collector = InstanceCollector::new(db);
    collector.traverse(root);
    collector.finish()
}

/// Collect every instance reachable from the pack `root`.
pub fn collect_pack_instances(db: &dyn TypeDatabase, root: TypePackId) -> CollectedInstances {
    let mut collector = InstanceCollector::new(db);
    collector.traverse_pack(root);
    collector.finish()
}

#[cfg(test)]
#[path = "../tests/instance_collector_tests.rs"]
mod tests;
