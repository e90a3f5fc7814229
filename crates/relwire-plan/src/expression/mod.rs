//! Scalar expression nodes.
//!
//! Operators treat an `ExpressionNode` as an opaque unit with one operation,
//! `encode()`. Nothing here checks that referenced columns exist.

mod conditional;
mod field;
mod function;
mod literal;
mod types;

pub use conditional::{CastNode, IfThenNode, SingularOrListNode};
pub use field::FieldReference;
pub use function::{AggregateFunctionNode, ScalarFunctionNode};
pub use literal::Scalar;
pub use types::{named_struct, TypeNode};

pub use relwire_proto::expr::FailureBehavior;
pub use relwire_proto::rel::{AggregationInvocation, AggregationPhase};

use relwire_core::error::Result;
use relwire_proto::expr::{Expression, RexType};

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    Literal(Scalar),
    Field(FieldReference),
    ScalarFunction(ScalarFunctionNode),
    Cast(CastNode),
    IfThen(IfThenNode),
    SingularOrList(SingularOrListNode),
}

impl ExpressionNode {
    pub fn literal(value: Scalar) -> Self {
        ExpressionNode::Literal(value)
    }

    /// Reference to column `ordinal` of the operator's input record.
    pub fn field(ordinal: usize) -> Result<Self> {
        Ok(ExpressionNode::Field(FieldReference::new(ordinal)?))
    }

    pub fn call(
        function_reference: u32,
        arguments: Vec<ExpressionNode>,
        output_type: TypeNode,
    ) -> Self {
        ExpressionNode::ScalarFunction(ScalarFunctionNode::new(
            function_reference,
            arguments,
            output_type,
        ))
    }

    pub fn cast(input: ExpressionNode, output_type: TypeNode) -> Self {
        ExpressionNode::Cast(CastNode::new(input, output_type))
    }

    /// Short label used by `explain`.
    pub fn label(&self) -> String {
        match self {
            ExpressionNode::Literal(s) => s.to_string(),
            ExpressionNode::Field(f) => format!("${}", f.ordinal()),
            ExpressionNode::ScalarFunction(f) => {
                let args: Vec<String> = f.arguments().iter().map(|a| a.label()).collect();
                format!("fn#{}({})", f.function_reference(), args.join(", "))
            }
            ExpressionNode::Cast(c) => {
                format!("cast({} as {:?})", c.input().label(), c.output_type().data_type)
            }
            ExpressionNode::IfThen(i) => format!("if_then[{}]", i.clauses().len()),
            ExpressionNode::SingularOrList(s) => {
                format!("{} in [{}]", s.value().label(), s.options().len())
            }
        }
    }

    pub fn encode(&self) -> Expression {
        let rex = match self {
            ExpressionNode::Literal(s) => RexType::Literal(s.encode()),
            ExpressionNode::Field(f) => RexType::Selection(Box::new(f.encode())),
            ExpressionNode::ScalarFunction(f) => RexType::ScalarFunction(f.encode()),
            ExpressionNode::Cast(c) => RexType::Cast(Box::new(c.encode())),
            ExpressionNode::IfThen(i) => RexType::IfThen(Box::new(i.encode())),
            ExpressionNode::SingularOrList(s) => RexType::SingularOrList(Box::new(s.encode())),
        };
        Expression {
            rex_type: Some(rex),
        }
    }
}

impl From<Scalar> for ExpressionNode {
    fn from(value: Scalar) -> Self {
        ExpressionNode::Literal(value)
    }
}

impl From<FieldReference> for ExpressionNode {
    fn from(f: FieldReference) -> Self {
        ExpressionNode::Field(f)
    }
}
