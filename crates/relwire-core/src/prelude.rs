//! Convenient re-exports for downstream crates.

pub use crate::config::{OutputFormat, PlanConfig, PlanConfigOverrides};
pub use crate::error::{Error, Result};
pub use crate::hash::Hash256;
pub use crate::schema::{DataType, Field, Schema};
