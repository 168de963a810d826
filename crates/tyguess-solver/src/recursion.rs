//! Recursion guard for walks over the (possibly cyclic) type graph.
//!
//! Every recursive walk in this crate (instance collection, normalization,
//! formatting) needs the same three things:
//! 1. **Path tracking** via a visiting set (`FxHashSet<K>`), so that a back
//!    edge to a node still on the current path is reported as a cycle
//! 2. **Depth limiting** so a pathologically deep graph cannot overflow the
//!    stack
//! 3. **Iteration bounding** so a pathologically wide graph cannot stall an
//!    editor request
//!
//! [`RecursionProfile`] names the limits for each walk so call sites never
//! carry magic numbers:
//!
//! ```ignore
//! let mut guard = RecursionGuard::with_profile(RecursionProfile::Normalization);
//! ```
//!
//! In debug builds, dropping a guard with active entries or leaving a key
//! that was never entered panics.

use rustc_hash::FxHashSet;
use std::hash::Hash;

// ---------------------------------------------------------------------------
// RecursionProfile
// ---------------------------------------------------------------------------

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Depth-first collection of type function instances from a return type.
    ///
    /// depth = 200, iterations = 100,000
    InstanceCollection,

    /// Normalizing an operand to decide truthiness for `or` / `and`.
    ///
    /// Shallow: unions of unions are common, deep structure is irrelevant to
    /// truthiness.
    ///
    /// depth = 50, iterations = 10,000
    Normalization,

    /// Rendering a type for logs and suggestion text.
    ///
    /// depth = 32, iterations = 10,000
    Formatting,

    /// Custom limits for one-off or test scenarios.
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::InstanceCollection => 200,
            Self::Normalization => 50,
            Self::Formatting => 32,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::InstanceCollection => 100_000,
            Self::Normalization => 10_000,
            Self::Formatting => 10_000,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

// ---------------------------------------------------------------------------
// RecursionResult
// ---------------------------------------------------------------------------

/// Result of attempting to enter a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the node.
    Entered,
    /// The node is already on the current path: a back edge.
    Cycle,
    /// Maximum depth reached.
    DepthExceeded,
    /// Iteration budget exhausted.
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }
}

// ---------------------------------------------------------------------------
// RecursionGuard
// ---------------------------------------------------------------------------

/// Tracks the current path of a graph walk plus its depth and work budget.
///
/// ```ignore
/// match guard.enter(ty) {
///     RecursionResult::Entered => {
///         walk_children(ty);
///         guard.leave(ty);
///     }
///     RecursionResult::Cycle => on_back_edge(ty),
///     RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {}
/// }
/// ```
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    exceeded: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    /// Prefer [`with_profile`](Self::with_profile) outside of tests.
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Try to enter `key`.
    ///
    /// On [`RecursionResult::Entered`] the caller must call
    /// [`leave`](Self::leave) with the same key once its children are done.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);

        if self.iterations > self.max_iterations {
            self.exceeded = true;
            return RecursionResult::IterationExceeded;
        }
        if self.visiting.contains(&key) {
            return RecursionResult::Cycle;
        }
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }

        self.visiting.insert(key);
        self.depth += 1;
        RecursionResult::Entered
    }

    /// Leave `key`. Must pair with exactly one successful `enter`.
    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);

        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that is not on the current path"
        );

        self.depth = self.depth.saturating_sub(1);
    }

    /// Run `f` with `key` entered, leaving it afterwards.
    ///
    /// Returns the reason for refusal if `key` could not be entered.
    pub fn scope<T>(&mut self, key: K, f: impl FnOnce() -> T) -> Result<T, RecursionResult> {
        match self.enter(key) {
            RecursionResult::Entered => {
                let result = f();
                self.leave(key);
                Ok(result)
            }
            denied => Err(denied),
        }
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.depth > 0
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Sticky: once a limit is hit this stays `true` until [`reset`](Self::reset).
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }

    pub fn reset(&mut self) {
        self.visiting.clear();
        self.depth = 0;
        self.iterations = 0;
        self.exceeded = false;
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} nodes still on the path (missing leave() calls)",
                self.visiting.len(),
            );
        }
    }
}
