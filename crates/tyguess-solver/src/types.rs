//! Type graph representation.
//!
//! Types live in an arena owned by the host checker and are referenced through
//! `TypeId` / `TypePackId` handles. The graph may be cyclic: a `Bound` node
//! aliases another node and `Free` placeholders are rebound after the fact,
//! so nothing here assumes a tree.
//!
//! The guesser only distinguishes four kinds of node (see
//! [`TypeKind`](crate::type_queries::TypeKind)); every other variant exists so
//! that hosts and tests can build realistic graphs around them.

use smallvec::SmallVec;
use std::fmt;

// =============================================================================
// Handles
// =============================================================================

/// Handle to a type node in a [`TypeDatabase`](crate::TypeDatabase).
///
/// Equality is handle equality. Two structurally identical types allocated
/// separately are different handles, exactly as in the host arena.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    // === Primitive catalog (pre-allocated by every arena) ===
    pub const NIL: Self = Self(0);
    pub const BOOLEAN: Self = Self(1);
    pub const NUMBER: Self = Self(2);
    pub const STRING: Self = Self(3);
    pub const THREAD: Self = Self(4);
    pub const BUFFER: Self = Self(5);
    /// The top type. Used whenever a guess has nothing better to offer.
    pub const UNKNOWN: Self = Self(6);
    pub const ANY: Self = Self(7);
    pub const NEVER: Self = Self(8);
    pub const ERROR: Self = Self(9);
    /// The `true` singleton.
    pub const TRUE: Self = Self(10);
    /// The `false` singleton.
    pub const FALSE: Self = Self(11);

    /// First handle handed out for dynamically allocated types.
    pub const FIRST_DYNAMIC: u32 = tyguess_common::limits::PRIMITIVE_TYPE_SLOTS;

    /// Whether this handle belongs to the pre-allocated primitive catalog.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::NIL => "nil",
            Self::BOOLEAN => "boolean",
            Self::NUMBER => "number",
            Self::STRING => "string",
            Self::THREAD => "thread",
            Self::BUFFER => "buffer",
            Self::UNKNOWN => "unknown",
            Self::ANY => "any",
            Self::NEVER => "never",
            Self::ERROR => "*error*",
            Self::TRUE => "true",
            Self::FALSE => "false",
            _ => return write!(f, "TypeId({})", self.0),
        };
        write!(f, "TypeId::{name}")
    }
}

/// Handle to a type pack node in a [`TypeDatabase`](crate::TypeDatabase).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypePackId(pub u32);

impl TypePackId {
    /// The empty pack `()`.
    pub const EMPTY: Self = Self(0);

    /// First handle handed out for dynamically allocated packs.
    pub const FIRST_DYNAMIC: u32 = 1;

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// Type functions
// =============================================================================

/// Built-in type functions known to the checker.
///
/// Instances of these stand for computations such as "the result of `a + b`"
/// that could not be reduced during inference because an operand was still
/// unknown.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeFunctionKind {
    Add,
    Sub,
    Mul,
    Div,
    Idiv,
    Pow,
    Mod,
    Concat,
    Lt,
    Le,
    Eq,
    Or,
    And,
    Not,
    Len,
    Unm,
    Union,
    Intersect,
    Refine,
    Keyof,
    Rawkeyof,
    Index,
    Rawget,
}

impl TypeFunctionKind {
    pub const ALL: [Self; 23] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Idiv,
        Self::Pow,
        Self::Mod,
        Self::Concat,
        Self::Lt,
        Self::Le,
        Self::Eq,
        Self::Or,
        Self::And,
        Self::Not,
        Self::Len,
        Self::Unm,
        Self::Union,
        Self::Intersect,
        Self::Refine,
        Self::Keyof,
        Self::Rawkeyof,
        Self::Index,
        Self::Rawget,
    ];

    /// The family name as written in source and in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Idiv => "idiv",
            Self::Pow => "pow",
            Self::Mod => "mod",
            Self::Concat => "concat",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Eq => "eq",
            Self::Or => "or",
            Self::And => "and",
            Self::Not => "not",
            Self::Len => "len",
            Self::Unm => "unm",
            Self::Union => "union",
            Self::Intersect => "intersect",
            Self::Refine => "refine",
            Self::Keyof => "keyof",
            Self::Rawkeyof => "rawkeyof",
            Self::Index => "index",
            Self::Rawget => "rawget",
        }
    }

    /// Look up a built-in type function by family name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for TypeFunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pending type-level computation: a type function applied to operands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeFunctionInstance {
    pub function: TypeFunctionKind,
    pub type_arguments: SmallVec<[TypeId; 2]>,
    pub pack_arguments: Vec<TypePackId>,
}

impl TypeFunctionInstance {
    pub fn new(function: TypeFunctionKind, type_arguments: impl IntoIterator<Item = TypeId>) -> Self {
        Self {
            function,
            type_arguments: type_arguments.into_iter().collect(),
            pack_arguments: Vec::new(),
        }
    }
}

// =============================================================================
// Type data
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Nil,
    Boolean,
    Number,
    String,
    Thread,
    Buffer,
}

impl PrimitiveKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Thread => "thread",
            Self::Buffer => "buffer",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SingletonValue {
    Boolean(bool),
    String(String),
}

/// A type parameter bound by an enclosing function signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GenericParam {
    pub name: String,
}

/// An opaque host-defined class. The guesser never looks inside one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassShape {
    pub name: String,
    pub properties: Vec<(String, TypeId)>,
}

/// A function signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    /// Generic type parameters declared by the signature.
    pub generics: Vec<TypeId>,
    /// Generic pack parameters declared by the signature.
    pub generic_packs: Vec<TypePackId>,
    pub params: TypePackId,
    pub returns: TypePackId,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TableShape {
    pub properties: Vec<(String, TypeId)>,
    pub indexer: Option<(TypeId, TypeId)>,
}

/// Structural content of a type node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Primitive(PrimitiveKind),
    Singleton(SingletonValue),
    Unknown,
    Any,
    Never,
    Error,
    /// Unsolved inference variable.
    Free,
    /// Alias for another node; `follow` looks through it.
    Bound(TypeId),
    Generic(GenericParam),
    Class(ClassShape),
    Function(FunctionShape),
    Table(TableShape),
    Union(Vec<TypeId>),
    Intersection(Vec<TypeId>),
    Instance(TypeFunctionInstance),
}

/// Structural content of a type pack node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypePackData {
    /// A fixed head followed by an optional open tail.
    List {
        head: Vec<TypeId>,
        tail: Option<TypePackId>,
    },
    Variadic(TypeId),
    Generic(GenericParam),
    Free,
    Bound(TypePackId),
    Instance(TypeFunctionInstance),
}
