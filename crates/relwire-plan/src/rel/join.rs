//! Join and Cross: the two-input operators.

use relwire_core::error::{Error, Result};
use relwire_proto::rel::{CrossRel, JoinRel, JoinType, RelCommon};

use super::RelNode;
use crate::expression::ExpressionNode;

/// Join of two inputs on a boolean expression over the concatenated record
/// (left columns, then right columns).
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    left: Box<RelNode>,
    right: Box<RelNode>,
    expression: ExpressionNode,
    post_join_filter: Option<ExpressionNode>,
    join_type: JoinType,
}

impl Join {
    pub fn new(
        left: RelNode,
        right: RelNode,
        expression: ExpressionNode,
        join_type: JoinType,
    ) -> Result<Self> {
        if join_type == JoinType::Unspecified {
            return Err(Error::malformed("join", "join type must be specified"));
        }
        Ok(Self {
            left: Box::new(left),
            right: Box::new(right),
            expression,
            post_join_filter: None,
            join_type,
        })
    }

    pub fn with_post_join_filter(mut self, filter: ExpressionNode) -> Self {
        self.post_join_filter = Some(filter);
        self
    }

    pub fn left(&self) -> &RelNode {
        &self.left
    }

    pub fn right(&self) -> &RelNode {
        &self.right
    }

    pub fn expression(&self) -> &ExpressionNode {
        &self.expression
    }

    pub fn post_join_filter(&self) -> Option<&ExpressionNode> {
        self.post_join_filter.as_ref()
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub(crate) fn encode(&self, common: RelCommon) -> JoinRel {
        JoinRel {
            common: Some(common),
            left: Some(Box::new(self.left.encode())),
            right: Some(Box::new(self.right.encode())),
            expression: Some(self.expression.encode()),
            post_join_filter: self.post_join_filter.as_ref().map(|f| f.encode()),
            r#type: self.join_type,
        }
    }
}

/// Cartesian product.
#[derive(Debug, Clone, PartialEq)]
pub struct Cross {
    left: Box<RelNode>,
    right: Box<RelNode>,
}

impl Cross {
    pub fn new(left: RelNode, right: RelNode) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn left(&self) -> &RelNode {
        &self.left
    }

    pub fn right(&self) -> &RelNode {
        &self.right
    }

    pub(crate) fn encode(&self, common: RelCommon) -> CrossRel {
        CrossRel {
            common: Some(common),
            left: Some(Box::new(self.left.encode())),
            right: Some(Box::new(self.right.encode())),
        }
    }
}

#[cfg(test)]
mod tests {
    use relwire_proto::rel::RelType;

    use super::*;
    use crate::rel::test_util::*;

    #[test]
    fn unspecified_type_is_malformed() {
        let err = Join::new(scan("a"), scan("b"), predicate(0, 1), JoinType::Unspecified)
            .unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn both_sides_embedded_in_order() {
        let node: RelNode = Join::new(scan("a"), scan("b"), predicate(0, 3), JoinType::Left)
            .unwrap()
            .with_post_join_filter(predicate(4, 1))
            .into();
        let Some(RelType::Join(j)) = node.encode().rel_type else {
            panic!("expected join");
        };
        assert_eq!(j.left.as_deref(), Some(&scan("a").encode()));
        assert_eq!(j.right.as_deref(), Some(&scan("b").encode()));
        assert_eq!(j.r#type, JoinType::Left);
        assert_eq!(j.post_join_filter, Some(predicate(4, 1).encode()));
    }

    #[test]
    fn cross_has_both_children() {
        let node: RelNode = Cross::new(scan("a"), scan("b")).into();
        let Some(RelType::Cross(c)) = node.encode().rel_type else {
            panic!("expected cross");
        };
        assert!(c.left.is_some() && c.right.is_some());
        assert!(c.common.unwrap().is_direct());
    }
}
