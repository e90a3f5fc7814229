#![forbid(unsafe_code)]
//! relwire-plan: relational operator trees that encode themselves into
//! Substrait plans.
//!
//! Design:
//! - `RelNode` is a closed enum with one case per operator kind; each case
//!   owns its children (`Box`, exclusive) and its payload.
//! - `RelNode::encode()` recurses depth-first: children are encoded by their
//!   own `encode()`, then wrapped with the operator's payload and the direct
//!   emission marker. Encoding is pure and infallible.
//! - Construction validates mandatory payloads and fails fast with
//!   `Error::MalformedOperator`; `RelBuilder` is the `Option`-accepting front
//!   door that also rejects missing required inputs.
//! - `PlanNode` wraps roots with function extension declarations.
//! - `dsl::yaml` turns a linear YAML pipeline into a `PlanNode`.

pub mod builder;
pub mod dsl;
pub mod expression;
pub mod extensions;
pub mod plan;
pub mod rel;

pub use builder::RelBuilder;
pub use dsl::yaml::{parse_yaml_pipeline, DslError, ParsedPipeline};
pub use expression::{ExpressionNode, Scalar, TypeNode};
pub use extensions::FunctionRegistry;
pub use plan::{PlanBuilder, PlanNode};
pub use rel::RelNode;
