//! Tracing configuration for debugging annotation guesses.
//!
//! Supports three output formats controlled by `TYGUESS_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`, handy for
//!   following one orchestration call from collection to final guess
//! - `json`: One JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Watch the worklist drain and the hypotheses being recorded
//! TYGUESS_LOG=tyguess_solver=debug TYGUESS_LOG_FORMAT=tree my-host file.luau
//!
//! # Every heuristic dispatch, including operand classification
//! TYGUESS_LOG=tyguess_solver::heuristics=trace my-host file.luau
//! ```
//!
//! The subscriber is only initialised when `TYGUESS_LOG` (or `RUST_LOG`) is
//! set, so there is zero overhead in normal builds.

use crate::limits::{LOG_FILTER_ENV, LOG_FORMAT_ENV};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name. Unknown names fall back to [`LogFormat::Text`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Read the format from `TYGUESS_LOG_FORMAT`.
    fn from_env() -> Self {
        Self::parse(&std::env::var(LOG_FORMAT_ENV).unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `TYGUESS_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var(LOG_FILTER_ENV) {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

fn logging_requested() -> bool {
    std::env::var(LOG_FILTER_ENV).is_ok() || std::env::var("RUST_LOG").is_ok()
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `TYGUESS_LOG` nor `RUST_LOG` is set. Panics if a
/// global subscriber was already installed; hosts that may call this more
/// than once should use [`try_init_tracing`].
pub fn init_tracing() {
    if !try_init_tracing() && logging_requested() {
        panic!("a global tracing subscriber is already installed");
    }
}

/// Initialise the global tracing subscriber if logging was requested and no
/// subscriber is installed yet.
///
/// Returns `true` when this call installed the subscriber. Safe to call from
/// every test.
pub fn try_init_tracing() -> bool {
    if !logging_requested() {
        return false;
    }

    let filter = build_filter();

    // All output goes to stderr so it never interferes with a host's stdout.
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default()
                .with(filter)
                .with(tree_layer)
                .try_init()
                .is_ok()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default()
                .with(filter)
                .with(json_layer)
                .try_init()
                .is_ok()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    }
}

#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tests;
