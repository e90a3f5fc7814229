#![forbid(unsafe_code)]
//! relwire-core: shared building blocks for the relwire workspace.
//!
//! - `error`: the canonical error taxonomy (`MalformedOperator` et al.)
//! - `schema`: logical data types and named schemas used by read operators
//! - `config`: plan/producer configuration with env overrides
//! - `hash`: stable blake3 fingerprints over encoded plans

pub mod config;
pub mod error;
pub mod hash;
pub mod prelude;
pub mod schema;

/// Crate version, reported as the producer version in encoded plans.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
