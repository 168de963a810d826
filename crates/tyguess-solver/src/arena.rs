//! Single-threaded type arena.
//!
//! `TypeArena` is the reference implementation of [`TypeDatabase`]. It hands
//! out sequential handles, pre-allocates the primitive catalog at the fixed
//! `TypeId` constants, and supports building cyclic graphs by allocating a
//! `Free` placeholder and binding it later.
//!
//! Allocation goes through `&self` so that a guesser holding a shared borrow
//! can still materialize guessed packs. The arena is deliberately `!Sync`:
//! every orchestration call is single-threaded.

use crate::db::TypeDatabase;
use crate::types::{
    ClassShape, FunctionShape, GenericParam, PrimitiveKind, SingletonValue, TableShape, TypeData,
    TypeFunctionInstance, TypeFunctionKind, TypeId, TypePackData, TypePackId,
};
use std::cell::RefCell;
use tracing::trace;

pub struct TypeArena {
    types: RefCell<Vec<TypeData>>,
    packs: RefCell<Vec<TypePackData>>,
}

impl TypeArena {
    pub fn new() -> Self {
        let types = vec![
            TypeData::Primitive(PrimitiveKind::Nil),
            TypeData::Primitive(PrimitiveKind::Boolean),
            TypeData::Primitive(PrimitiveKind::Number),
            TypeData::Primitive(PrimitiveKind::String),
            TypeData::Primitive(PrimitiveKind::Thread),
            TypeData::Primitive(PrimitiveKind::Buffer),
            TypeData::Unknown,
            TypeData::Any,
            TypeData::Never,
            TypeData::Error,
            TypeData::Singleton(SingletonValue::Boolean(true)),
            TypeData::Singleton(SingletonValue::Boolean(false)),
        ];
        debug_assert_eq!(types.len() as u32, TypeId::FIRST_DYNAMIC);

        let packs = vec![TypePackData::List {
            head: Vec::new(),
            tail: None,
        }];
        debug_assert_eq!(packs.len() as u32, TypePackId::FIRST_DYNAMIC);

        Self {
            types: RefCell::new(types),
            packs: RefCell::new(packs),
        }
    }

    /// Number of type nodes, primitives included.
    pub fn len(&self) -> usize {
        self.types.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of type pack nodes, the empty pack included.
    pub fn pack_count(&self) -> usize {
        self.packs.borrow().len()
    }

    // =========================================================================
    // Type constructors
    // =========================================================================

    /// Allocate an unsolved placeholder, to be bound later with [`bind`](Self::bind).
    pub fn fresh_type(&self) -> TypeId {
        self.add_type(TypeData::Free)
    }

    /// Turn `id` into an alias of `target`.
    ///
    /// This is how cyclic graphs are built: allocate a placeholder, build
    /// structure that mentions it, then bind the placeholder to that
    /// structure.
    pub fn bind(&self, id: TypeId, target: TypeId) {
        debug_assert!(!id.is_builtin(), "cannot rebind a primitive type");
        if let Some(slot) = self.types.borrow_mut().get_mut(id.index()) {
            *slot = TypeData::Bound(target);
        }
    }

    pub fn generic(&self, name: &str) -> TypeId {
        self.add_type(TypeData::Generic(GenericParam {
            name: name.to_string(),
        }))
    }

    pub fn string_singleton(&self, value: &str) -> TypeId {
        self.add_type(TypeData::Singleton(SingletonValue::String(
            value.to_string(),
        )))
    }

    pub fn instance(
        &self,
        function: TypeFunctionKind,
        type_arguments: impl IntoIterator<Item = TypeId>,
    ) -> TypeId {
        self.add_type(TypeData::Instance(TypeFunctionInstance::new(
            function,
            type_arguments,
        )))
    }

    pub fn class(&self, name: &str, properties: Vec<(String, TypeId)>) -> TypeId {
        self.add_type(TypeData::Class(ClassShape {
            name: name.to_string(),
            properties,
        }))
    }

    pub fn function(&self, shape: FunctionShape) -> TypeId {
        self.add_type(TypeData::Function(shape))
    }

    pub fn table(&self, properties: Vec<(String, TypeId)>) -> TypeId {
        self.add_type(TypeData::Table(TableShape {
            properties,
            indexer: None,
        }))
    }

    pub fn union(&self, members: Vec<TypeId>) -> TypeId {
        self.add_type(TypeData::Union(members))
    }

    pub fn intersection(&self, members: Vec<TypeId>) -> TypeId {
        self.add_type(TypeData::Intersection(members))
    }

    // =========================================================================
    // Type pack constructors
    // =========================================================================

    pub fn list_pack(&self, head: Vec<TypeId>, tail: Option<TypePackId>) -> TypePackId {
        self.add_type_pack(TypePackData::List { head, tail })
    }

    pub fn variadic_pack(&self, element: TypeId) -> TypePackId {
        self.add_type_pack(TypePackData::Variadic(element))
    }

    pub fn generic_pack(&self, name: &str) -> TypePackId {
        self.add_type_pack(TypePackData::Generic(GenericParam {
            name: name.to_string(),
        }))
    }

    pub fn fresh_pack(&self) -> TypePackId {
        self.add_type_pack(TypePackData::Free)
    }

    pub fn bind_pack(&self, id: TypePackId, target: TypePackId) {
        debug_assert!(id != TypePackId::EMPTY, "cannot rebind the empty pack");
        if let Some(slot) = self.packs.borrow_mut().get_mut(id.index()) {
            *slot = TypePackData::Bound(target);
        }
    }

    pub fn instance_pack(
        &self,
        function: TypeFunctionKind,
        type_arguments: impl IntoIterator<Item = TypeId>,
        pack_arguments: Vec<TypePackId>,
    ) -> TypePackId {
        let mut instance = TypeFunctionInstance::new(function, type_arguments);
        instance.pack_arguments = pack_arguments;
        self.add_type_pack(TypePackData::Instance(instance))
    }
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDatabase for TypeArena {
    fn lookup(&self, id: TypeId) -> Option<TypeData> {
        self.types.borrow().get(id.index()).cloned()
    }

    fn lookup_pack(&self, id: TypePackId) -> Option<TypePackData> {
        self.packs.borrow().get(id.index()).cloned()
    }

    fn add_type(&self, data: TypeData) -> TypeId {
        let mut types = self.types.borrow_mut();
        let id = TypeId(types.len() as u32);
        trace!(type_id = id.0, ?data, "allocate type");
        types.push(data);
        id
    }

    fn add_type_pack(&self, data: TypePackData) -> TypePackId {
        let mut packs = self.packs.borrow_mut();
        let id = TypePackId(packs.len() as u32);
        trace!(pack_id = id.0, ?data, "allocate type pack");
        packs.push(data);
        id
    }

    fn bound_target(&self, id: TypeId) -> Option<TypeId> {
        match self.types.borrow().get(id.index()) {
            Some(TypeData::Bound(target)) => Some(*target),
            _ => None,
        }
    }

    fn bound_pack_target(&self, id: TypePackId) -> Option<TypePackId> {
        match self.packs.borrow().get(id.index()) {
            Some(TypePackData::Bound(target)) => Some(*target),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/arena_tests.rs"]
mod tests;
