//! `Option`-accepting constructors for every operator.
//!
//! Callers assembling trees from loosely-typed sources (the YAML pipeline, a
//! frontend that may or may not have produced a predicate yet) go through
//! here so that a missing payload or a missing required input is reported as
//! `Error::MalformedOperator` instead of being unrepresentable.

use relwire_core::error::{Error, Result};
use relwire_core::schema::Schema;

use crate::expression::ExpressionNode;
use crate::rel::{
    Aggregate, Cross, Fetch, Filter, Join, JoinType, LocalFile, MeasureNode, Project, Read,
    ReadSource, RelNode, Set, SetOp, Sort, SortFieldNode,
};

pub struct RelBuilder;

fn required(operator: &'static str, what: &str, node: Option<RelNode>) -> Result<RelNode> {
    node.ok_or_else(|| Error::malformed(operator, format!("{what} is required")))
}

impl RelBuilder {
    pub fn read_named_table(schema: Schema, names: Vec<String>) -> Result<RelNode> {
        Ok(Read::new(schema, ReadSource::NamedTable(names))?.into())
    }

    pub fn read_local_files(schema: Schema, files: Vec<LocalFile>) -> Result<RelNode> {
        Ok(Read::new(schema, ReadSource::LocalFiles(files))?.into())
    }

    /// A missing condition is an error; a missing input is not.
    pub fn filter(input: Option<RelNode>, condition: Option<ExpressionNode>) -> Result<RelNode> {
        let condition =
            condition.ok_or_else(|| Error::malformed("filter", "condition is required"))?;
        Ok(Filter::new(input, condition).into())
    }

    pub fn project(input: Option<RelNode>, expressions: Vec<ExpressionNode>) -> Result<RelNode> {
        Ok(Project::new(input, expressions)?.into())
    }

    pub fn aggregate(
        input: Option<RelNode>,
        group_by: Vec<ExpressionNode>,
        measures: Vec<MeasureNode>,
    ) -> Result<RelNode> {
        let input = required("aggregate", "input", input)?;
        Ok(Aggregate::new(input, group_by, measures)?.into())
    }

    pub fn join(
        left: Option<RelNode>,
        right: Option<RelNode>,
        expression: Option<ExpressionNode>,
        join_type: JoinType,
    ) -> Result<RelNode> {
        let left = required("join", "left input", left)?;
        let right = required("join", "right input", right)?;
        let expression =
            expression.ok_or_else(|| Error::malformed("join", "join expression is required"))?;
        Ok(Join::new(left, right, expression, join_type)?.into())
    }

    pub fn cross(left: Option<RelNode>, right: Option<RelNode>) -> Result<RelNode> {
        let left = required("cross", "left input", left)?;
        let right = required("cross", "right input", right)?;
        Ok(Cross::new(left, right).into())
    }

    pub fn sort(input: Option<RelNode>, sorts: Vec<SortFieldNode>) -> Result<RelNode> {
        let input = required("sort", "input", input)?;
        Ok(Sort::new(input, sorts)?.into())
    }

    pub fn fetch(input: Option<RelNode>, offset: u64, count: Option<u64>) -> Result<RelNode> {
        let input = required("fetch", "input", input)?;
        Ok(Fetch::new(input, offset, count)?.into())
    }

    pub fn set(inputs: Vec<RelNode>, op: SetOp) -> Result<RelNode> {
        Ok(Set::new(inputs, op)?.into())
    }
}

#[cfg(test)]
mod tests {
    use relwire_core::error::Error;

    use super::*;
    use crate::rel::test_util::*;

    fn operator_of(err: Error) -> &'static str {
        match err {
            Error::MalformedOperator { operator, .. } => operator,
            other => panic!("expected malformed operator, got {other}"),
        }
    }

    #[test]
    fn filter_without_condition_is_malformed() {
        let err = RelBuilder::filter(Some(scan("t")), None).unwrap_err();
        assert_eq!(operator_of(err), "filter");
    }

    #[test]
    fn filter_without_input_is_fine() {
        let node = RelBuilder::filter(None, Some(predicate(0, 1))).unwrap();
        assert!(node.children().is_empty());
    }

    #[test]
    fn required_inputs_enforced() {
        let err = RelBuilder::sort(None, vec![SortFieldNode::asc(predicate(0, 1))]).unwrap_err();
        assert_eq!(operator_of(err), "sort");
        let err = RelBuilder::fetch(None, 0, Some(1)).unwrap_err();
        assert_eq!(operator_of(err), "fetch");
        let err = RelBuilder::cross(Some(scan("a")), None).unwrap_err();
        assert_eq!(operator_of(err), "cross");
        let err = RelBuilder::aggregate(None, vec![predicate(0, 1)], vec![]).unwrap_err();
        assert_eq!(operator_of(err), "aggregate");
    }

    #[test]
    fn join_needs_expression() {
        let err = RelBuilder::join(Some(scan("a")), Some(scan("b")), None, JoinType::Inner)
            .unwrap_err();
        assert_eq!(operator_of(err), "join");
        let ok = RelBuilder::join(
            Some(scan("a")),
            Some(scan("b")),
            Some(predicate(0, 1)),
            JoinType::Inner,
        )
        .unwrap();
        assert_eq!(ok.kind(), "join");
    }

    #[test]
    fn read_and_set_delegate_validation() {
        assert!(RelBuilder::read_named_table(schema(), vec![]).is_err());
        assert!(RelBuilder::set(vec![scan("a")], SetOp::UnionAll).is_err());
        let set = RelBuilder::set(vec![scan("a"), scan("b")], SetOp::UnionAll).unwrap();
        assert_eq!(set.children().len(), 2);
    }
}
