//! Function calls. Functions are referenced by plan-local anchor; see
//! `extensions::FunctionRegistry` for how anchors are declared.

use relwire_proto::expr::{ArgType, FunctionArgument, ScalarFunction};
use relwire_proto::rel::{AggregateFunction, AggregationInvocation, AggregationPhase};

use super::types::TypeNode;
use super::ExpressionNode;

fn encode_arguments(arguments: &[ExpressionNode]) -> Vec<FunctionArgument> {
    arguments
        .iter()
        .map(|a| FunctionArgument {
            arg_type: Some(ArgType::Value(a.encode())),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarFunctionNode {
    function_reference: u32,
    arguments: Vec<ExpressionNode>,
    output_type: TypeNode,
}

impl ScalarFunctionNode {
    pub fn new(
        function_reference: u32,
        arguments: Vec<ExpressionNode>,
        output_type: TypeNode,
    ) -> Self {
        Self {
            function_reference,
            arguments,
            output_type,
        }
    }

    pub fn function_reference(&self) -> u32 {
        self.function_reference
    }

    pub fn arguments(&self) -> &[ExpressionNode] {
        &self.arguments
    }

    pub fn output_type(&self) -> TypeNode {
        self.output_type
    }

    pub fn encode(&self) -> ScalarFunction {
        ScalarFunction {
            function_reference: self.function_reference,
            arguments: encode_arguments(&self.arguments),
            output_type: Some(self.output_type.encode()),
        }
    }
}

/// Aggregate call used as an `Aggregate` measure.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateFunctionNode {
    function_reference: u32,
    arguments: Vec<ExpressionNode>,
    output_type: TypeNode,
    phase: AggregationPhase,
    invocation: AggregationInvocation,
}

impl AggregateFunctionNode {
    /// Single-phase (`INITIAL_TO_RESULT`) aggregate over all values.
    pub fn new(
        function_reference: u32,
        arguments: Vec<ExpressionNode>,
        output_type: TypeNode,
    ) -> Self {
        Self {
            function_reference,
            arguments,
            output_type,
            phase: AggregationPhase::InitialToResult,
            invocation: AggregationInvocation::All,
        }
    }

    pub fn with_phase(mut self, phase: AggregationPhase) -> Self {
        self.phase = phase;
        self
    }

    pub fn distinct(mut self) -> Self {
        self.invocation = AggregationInvocation::Distinct;
        self
    }

    pub fn function_reference(&self) -> u32 {
        self.function_reference
    }

    pub fn arguments(&self) -> &[ExpressionNode] {
        &self.arguments
    }

    pub fn output_type(&self) -> TypeNode {
        self.output_type
    }

    pub fn phase(&self) -> AggregationPhase {
        self.phase
    }

    pub fn invocation(&self) -> AggregationInvocation {
        self.invocation
    }

    pub fn encode(&self) -> AggregateFunction {
        AggregateFunction {
            function_reference: self.function_reference,
            arguments: encode_arguments(&self.arguments),
            output_type: Some(self.output_type.encode()),
            phase: self.phase,
            invocation: self.invocation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Scalar;
    use relwire_core::schema::DataType;

    #[test]
    fn aggregate_defaults_to_single_phase_all() {
        let f = AggregateFunctionNode::new(
            2,
            vec![ExpressionNode::field(0).unwrap()],
            TypeNode::new(DataType::Int64, true),
        );
        let msg = f.encode();
        assert_eq!(msg.phase, AggregationPhase::InitialToResult);
        assert_eq!(msg.invocation, AggregationInvocation::All);
        assert_eq!(msg.function_reference, 2);
        assert_eq!(msg.arguments.len(), 1);

        let d = f.distinct().with_phase(AggregationPhase::InitialToIntermediate);
        assert_eq!(d.invocation(), AggregationInvocation::Distinct);
        assert_eq!(d.phase(), AggregationPhase::InitialToIntermediate);
    }

    #[test]
    fn scalar_function_arguments_in_order() {
        let f = ScalarFunctionNode::new(
            1,
            vec![
                ExpressionNode::field(0).unwrap(),
                ExpressionNode::literal(Scalar::I32(9)),
            ],
            TypeNode::new(DataType::Boolean, false),
        );
        let msg = f.encode();
        assert_eq!(
            msg.arguments[1].arg_type,
            Some(ArgType::Value(ExpressionNode::literal(Scalar::I32(9)).encode()))
        );
        assert_eq!(
            msg.output_type,
            Some(TypeNode::new(DataType::Boolean, false).encode())
        );
    }
}
