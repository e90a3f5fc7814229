//! Aggregate: grouping sets plus aggregate measures.

use relwire_core::error::{Error, Result};
use relwire_proto::rel::{AggregateRel, Grouping, Measure, RelCommon};

use super::RelNode;
use crate::expression::{AggregateFunctionNode, ExpressionNode};

/// One aggregate output column, optionally restricted by a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureNode {
    function: AggregateFunctionNode,
    filter: Option<ExpressionNode>,
}

impl MeasureNode {
    pub fn new(function: AggregateFunctionNode) -> Self {
        Self {
            function,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: ExpressionNode) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn function(&self) -> &AggregateFunctionNode {
        &self.function
    }

    pub fn filter(&self) -> Option<&ExpressionNode> {
        self.filter.as_ref()
    }

    fn encode(&self) -> Measure {
        Measure {
            measure: Some(self.function.encode()),
            filter: self.filter.as_ref().map(|f| f.encode()),
        }
    }
}

/// Group-by plus measures. Output columns: grouping keys, then measures.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    input: Box<RelNode>,
    grouping_sets: Vec<Vec<ExpressionNode>>,
    measures: Vec<MeasureNode>,
}

impl Aggregate {
    /// Single grouping set over `group_by`; an empty `group_by` means a
    /// global aggregate.
    pub fn new(
        input: RelNode,
        group_by: Vec<ExpressionNode>,
        measures: Vec<MeasureNode>,
    ) -> Result<Self> {
        let sets = if group_by.is_empty() {
            vec![]
        } else {
            vec![group_by]
        };
        Self::with_grouping_sets(input, sets, measures)
    }

    /// Several grouping sets (`GROUPING SETS`/`ROLLUP`-style). An empty set
    /// inside `grouping_sets` is the grand total.
    pub fn with_grouping_sets(
        input: RelNode,
        grouping_sets: Vec<Vec<ExpressionNode>>,
        measures: Vec<MeasureNode>,
    ) -> Result<Self> {
        if grouping_sets.is_empty() && measures.is_empty() {
            return Err(Error::malformed(
                "aggregate",
                "needs at least one grouping or measure",
            ));
        }
        Ok(Self {
            input: Box::new(input),
            grouping_sets,
            measures,
        })
    }

    pub fn input(&self) -> &RelNode {
        &self.input
    }

    pub fn grouping_sets(&self) -> &[Vec<ExpressionNode>] {
        &self.grouping_sets
    }

    pub fn measures(&self) -> &[MeasureNode] {
        &self.measures
    }

    pub(crate) fn encode(&self, common: RelCommon) -> AggregateRel {
        AggregateRel {
            common: Some(common),
            input: Some(Box::new(self.input.encode())),
            groupings: self
                .grouping_sets
                .iter()
                .map(|set| Grouping {
                    grouping_expressions: set.iter().map(|e| e.encode()).collect(),
                })
                .collect(),
            measures: self.measures.iter().map(|m| m.encode()).collect(),
        }
    }
}
