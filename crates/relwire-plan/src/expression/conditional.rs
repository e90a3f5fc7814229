//! Casts and conditional expressions.

use relwire_core::error::{Error, Result};
use relwire_proto::expr::{Cast, FailureBehavior, IfClause, IfThen, SingularOrList};

use super::types::TypeNode;
use super::ExpressionNode;

#[derive(Debug, Clone, PartialEq)]
pub struct CastNode {
    input: Box<ExpressionNode>,
    output_type: TypeNode,
    failure_behavior: FailureBehavior,
}

impl CastNode {
    pub fn new(input: ExpressionNode, output_type: TypeNode) -> Self {
        Self {
            input: Box::new(input),
            output_type,
            failure_behavior: FailureBehavior::Unspecified,
        }
    }

    pub fn with_failure_behavior(mut self, failure_behavior: FailureBehavior) -> Self {
        self.failure_behavior = failure_behavior;
        self
    }

    pub fn input(&self) -> &ExpressionNode {
        &self.input
    }

    pub fn output_type(&self) -> TypeNode {
        self.output_type
    }

    pub fn encode(&self) -> Cast {
        Cast {
            r#type: Some(self.output_type.encode()),
            input: Some(self.input.encode()),
            failure_behavior: self.failure_behavior,
        }
    }
}

/// `CASE WHEN .. THEN .. [ELSE ..] END`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfThenNode {
    clauses: Vec<(ExpressionNode, ExpressionNode)>,
    otherwise: Option<Box<ExpressionNode>>,
}

impl IfThenNode {
    pub fn new(
        clauses: Vec<(ExpressionNode, ExpressionNode)>,
        otherwise: Option<ExpressionNode>,
    ) -> Result<Self> {
        if clauses.is_empty() {
            return Err(Error::malformed_expr("if_then", "at least one clause required"));
        }
        Ok(Self {
            clauses,
            otherwise: otherwise.map(Box::new),
        })
    }

    pub fn clauses(&self) -> &[(ExpressionNode, ExpressionNode)] {
        &self.clauses
    }

    pub fn otherwise(&self) -> Option<&ExpressionNode> {
        self.otherwise.as_deref()
    }

    pub fn encode(&self) -> IfThen {
        IfThen {
            ifs: self
                .clauses
                .iter()
                .map(|(cond, then)| IfClause {
                    r#if: Some(cond.encode()),
                    then: Some(then.encode()),
                })
                .collect(),
            r#else: self.otherwise.as_ref().map(|e| e.encode()),
        }
    }
}

/// `value IN (options...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SingularOrListNode {
    value: Box<ExpressionNode>,
    options: Vec<ExpressionNode>,
}

impl SingularOrListNode {
    pub fn new(value: ExpressionNode, options: Vec<ExpressionNode>) -> Result<Self> {
        if options.is_empty() {
            return Err(Error::malformed_expr("singular_or_list", "empty option list"));
        }
        Ok(Self {
            value: Box::new(value),
            options,
        })
    }

    pub fn value(&self) -> &ExpressionNode {
        &self.value
    }

    pub fn options(&self) -> &[ExpressionNode] {
        &self.options
    }

    pub fn encode(&self) -> SingularOrList {
        SingularOrList {
            value: Some(self.value.encode()),
            options: self.options.iter().map(|o| o.encode()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Scalar;
    use relwire_core::schema::DataType;

    #[test]
    fn empty_if_then_rejected() {
        let err = IfThenNode::new(vec![], None).unwrap_err();
        assert!(matches!(err, Error::MalformedExpression { kind: "if_then", .. }));
    }

    #[test]
    fn if_then_without_else_omits_it() {
        let node = IfThenNode::new(
            vec![(
                ExpressionNode::literal(Scalar::Bool(true)),
                ExpressionNode::literal(Scalar::I32(1)),
            )],
            None,
        )
        .unwrap();
        let msg = node.encode();
        assert_eq!(msg.ifs.len(), 1);
        assert!(msg.r#else.is_none());
    }

    #[test]
    fn empty_or_list_rejected() {
        assert!(SingularOrListNode::new(ExpressionNode::field(0).unwrap(), vec![]).is_err());
    }

    #[test]
    fn cast_encodes_input_standalone() {
        let input = ExpressionNode::field(1).unwrap();
        let cast = CastNode::new(input.clone(), TypeNode::new(DataType::Float64, true))
            .with_failure_behavior(FailureBehavior::ReturnNull);
        let msg = cast.encode();
        assert_eq!(msg.input, Some(input.encode()));
        assert_eq!(msg.failure_behavior, FailureBehavior::ReturnNull);
    }
}
