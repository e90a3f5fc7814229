//! Project: appends computed expressions to the input columns.

use relwire_core::error::{Error, Result};
use relwire_proto::rel::{ProjectRel, RelCommon};

use super::{encode_child, RelNode};
use crate::expression::ExpressionNode;

/// Appends computed expressions to each input row.
///
/// Like `Filter`, the input may be absent: a projection with no upstream
/// evaluates its expressions against an empty record (constant rows).
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    input: Option<Box<RelNode>>,
    expressions: Vec<ExpressionNode>,
}

impl Project {
    pub fn new(input: Option<RelNode>, expressions: Vec<ExpressionNode>) -> Result<Self> {
        if expressions.is_empty() {
            return Err(Error::malformed("project", "at least one expression required"));
        }
        Ok(Self {
            input: input.map(Box::new),
            expressions,
        })
    }

    pub fn input(&self) -> Option<&RelNode> {
        self.input.as_deref()
    }

    pub fn expressions(&self) -> &[ExpressionNode] {
        &self.expressions
    }

    pub(crate) fn encode(&self, common: RelCommon) -> ProjectRel {
        ProjectRel {
            common: Some(common),
            input: encode_child(self.input()),
            expressions: self.expressions.iter().map(|e| e.encode()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use relwire_proto::rel::RelType;

    use super::*;
    use crate::rel::test_util::*;

    #[test]
    fn empty_projection_is_malformed() {
        let err = Project::new(Some(scan("t")), vec![]).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn expressions_keep_order() {
        let exprs = vec![
            ExpressionNode::field(2).unwrap(),
            ExpressionNode::field(0).unwrap(),
        ];
        let node: RelNode = Project::new(Some(scan("t")), exprs.clone()).unwrap().into();
        let Some(RelType::Project(p)) = node.encode().rel_type else {
            panic!("expected project");
        };
        assert_eq!(p.expressions, exprs.iter().map(|e| e.encode()).collect::<Vec<_>>());
        assert!(p.input.is_some());
    }

    #[test]
    fn inputless_projection_allowed() {
        let node: RelNode = Project::new(None, vec![ExpressionNode::field(0).unwrap()])
            .unwrap()
            .into();
        let Some(RelType::Project(p)) = node.encode().rel_type else {
            panic!("expected project");
        };
        assert!(p.input.is_none());
    }
}
