//! Set operations over two or more inputs.

use relwire_core::error::{Error, Result};
use relwire_proto::rel::{RelCommon, SetOp, SetRel};

use super::RelNode;

/// Union/intersection/minus over two or more inputs. The first input is the
/// primary one for the `*_PRIMARY` operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    inputs: Vec<RelNode>,
    op: SetOp,
}

impl Set {
    pub fn new(inputs: Vec<RelNode>, op: SetOp) -> Result<Self> {
        if inputs.len() < 2 {
            return Err(Error::malformed(
                "set",
                format!("needs at least two inputs, got {}", inputs.len()),
            ));
        }
        if op == SetOp::Unspecified {
            return Err(Error::malformed("set", "set operation must be specified"));
        }
        Ok(Self { inputs, op })
    }

    pub fn inputs(&self) -> &[RelNode] {
        &self.inputs
    }

    pub fn op(&self) -> SetOp {
        self.op
    }

    pub(crate) fn encode(&self, common: RelCommon) -> SetRel {
        SetRel {
            common: Some(common),
            inputs: self.inputs.iter().map(|i| i.encode()).collect(),
            op: self.op,
        }
    }
}
