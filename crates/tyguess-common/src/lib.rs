//! Common utilities for the tyguess crates.
//!
//! - Centralized limits and capacity hints
//! - Tracing subscriber bootstrap driven by environment variables

// Centralized limits and thresholds
pub mod limits;

// Opt-in log output (stderr only)
pub mod tracing_config;
pub use tracing_config::{LogFormat, init_tracing, try_init_tracing};
