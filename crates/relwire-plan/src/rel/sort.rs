//! Sort keys and the Sort operator.

use relwire_core::error::{Error, Result};
use relwire_proto::rel::{RelCommon, SortDirection, SortField, SortRel};

use super::RelNode;
use crate::expression::ExpressionNode;

#[derive(Debug, Clone, PartialEq)]
pub struct SortFieldNode {
    expr: ExpressionNode,
    direction: SortDirection,
}

impl SortFieldNode {
    pub fn new(expr: ExpressionNode, direction: SortDirection) -> Self {
        Self { expr, direction }
    }

    pub fn asc(expr: ExpressionNode) -> Self {
        Self::new(expr, SortDirection::AscNullsLast)
    }

    pub fn desc(expr: ExpressionNode) -> Self {
        Self::new(expr, SortDirection::DescNullsFirst)
    }

    pub fn expr(&self) -> &ExpressionNode {
        &self.expr
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn encode(&self) -> SortField {
        SortField {
            expr: Some(self.expr.encode()),
            direction: self.direction,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    input: Box<RelNode>,
    sorts: Vec<SortFieldNode>,
}

impl Sort {
    pub fn new(input: RelNode, sorts: Vec<SortFieldNode>) -> Result<Self> {
        if sorts.is_empty() {
            return Err(Error::malformed("sort", "at least one sort field required"));
        }
        if sorts
            .iter()
            .any(|s| s.direction == SortDirection::Unspecified)
        {
            return Err(Error::malformed("sort", "sort direction must be specified"));
        }
        Ok(Self {
            input: Box::new(input),
            sorts,
        })
    }

    pub fn input(&self) -> &RelNode {
        &self.input
    }

    pub fn sorts(&self) -> &[SortFieldNode] {
        &self.sorts
    }

    pub(crate) fn encode(&self, common: RelCommon) -> SortRel {
        SortRel {
            common: Some(common),
            input: Some(Box::new(self.input.encode())),
            sorts: self.sorts.iter().map(|s| s.encode()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use relwire_proto::rel::RelType;

    use super::*;
    use crate::rel::test_util::*;

    #[test]
    fn empty_or_unspecified_sorts_rejected() {
        assert!(Sort::new(scan("t"), vec![]).unwrap_err().is_malformed());
        let unspecified = SortFieldNode::new(
            ExpressionNode::field(0).unwrap(),
            SortDirection::Unspecified,
        );
        assert!(Sort::new(scan("t"), vec![unspecified]).unwrap_err().is_malformed());
    }

    #[test]
    fn sort_keys_encoded_in_order() {
        let node: RelNode = Sort::new(
            scan("t"),
            vec![
                SortFieldNode::desc(ExpressionNode::field(2).unwrap()),
                SortFieldNode::asc(ExpressionNode::field(0).unwrap()),
            ],
        )
        .unwrap()
        .into();
        let Some(RelType::Sort(s)) = node.encode().rel_type else {
            panic!("expected sort");
        };
        assert_eq!(s.sorts.len(), 2);
        assert_eq!(s.sorts[0].direction, SortDirection::DescNullsFirst);
        assert_eq!(s.sorts[1].direction, SortDirection::AscNullsLast);
    }
}
