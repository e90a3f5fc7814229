//! Filter: keeps input rows for which the boolean condition holds.

use relwire_proto::rel::{FilterRel, RelCommon};

use super::{encode_child, RelNode};
use crate::expression::ExpressionNode;

/// Keeps the input rows for which `condition` is true.
///
/// The input is optional: a filter with no upstream operator is a legal
/// terminal state (the consumer feeds rows in directly), and encodes with no
/// `input` field at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    input: Option<Box<RelNode>>,
    condition: ExpressionNode,
}

impl Filter {
    pub fn new(input: Option<RelNode>, condition: ExpressionNode) -> Self {
        Self {
            input: input.map(Box::new),
            condition,
        }
    }

    pub fn input(&self) -> Option<&RelNode> {
        self.input.as_deref()
    }

    pub fn condition(&self) -> &ExpressionNode {
        &self.condition
    }

    pub(crate) fn encode(&self, common: RelCommon) -> FilterRel {
        FilterRel {
            common: Some(common),
            input: encode_child(self.input()),
            condition: Some(self.condition.encode()),
        }
    }
}
