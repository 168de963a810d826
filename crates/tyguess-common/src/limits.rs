//! Centralized limits and thresholds for the annotation guesser.
//!
//! Recursion limits for graph walks (instance collection, normalization,
//! formatting) live in `tyguess_solver::recursion::RecursionProfile`, which
//! is the single source of truth for traversal depth. This module only holds
//! capacity hints and the names of the environment variables that configure
//! logging.

// =============================================================================
// Capacity Hints
// =============================================================================

/// Initial capacity of the per-call hypothesis and substitution maps.
///
/// Most unannotated functions produce a handful of type function instances
/// (one per arithmetic or comparison operator that could not be reduced), so
/// a small pre-allocation avoids rehashing in the common case.
pub const GUESS_MAP_INITIAL_CAPACITY: usize = 16;

/// Initial capacity of the instance worklist.
pub const WORKLIST_INITIAL_CAPACITY: usize = 16;

/// Number of pre-allocated primitive type slots in a fresh arena.
///
/// Handles below this index are the primitive catalog (`nil`, `boolean`,
/// `number`, ...). Dynamically allocated types start here.
pub const PRIMITIVE_TYPE_SLOTS: u32 = 12;

/// Longest rendering produced by the type formatter before it truncates
/// with `...`.
///
/// Guesses are displayed in editor tooltips; anything longer is noise.
pub const MAX_FORMATTED_TYPE_LEN: usize = 400;

// =============================================================================
// Logging Environment
// =============================================================================

/// Environment variable holding the log filter (same syntax as `RUST_LOG`).
pub const LOG_FILTER_ENV: &str = "TYGUESS_LOG";

/// Environment variable selecting the log format (`text`, `tree`, `json`).
pub const LOG_FORMAT_ENV: &str = "TYGUESS_LOG_FORMAT";
