//! Pipeline DSL: linear YAML pipelines compiled into `PlanNode`s.

pub mod predicate;
pub mod yaml;
