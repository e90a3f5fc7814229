//! Relational operator nodes.
//!
//! Each variant struct owns its children and payload and exposes getters
//! only. Encoding follows one shape everywhere: encode the children with their
//! own `encode()`, build the operator message with `Emission::Direct` common
//! metadata and the encoded payload, wrap it in `Rel`.

mod aggregate;
mod fetch;
mod filter;
mod join;
mod project;
mod read;
mod set;
mod sort;

use std::fmt;

pub use aggregate::{Aggregate, MeasureNode};
pub use fetch::Fetch;
pub use filter::Filter;
pub use join::{Cross, Join};
pub use project::Project;
pub use read::{FileFormat, LocalFile, Read, ReadSource};
pub use set::Set;
pub use sort::{Sort, SortFieldNode};

pub use relwire_proto::rel::{JoinType, SetOp, SortDirection};

use relwire_proto::rel::{Rel, RelCommon, RelType};

/// How an operator's output is emitted. Only inline emission exists today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Emission {
    #[default]
    Direct,
}

impl Emission {
    pub fn encode(self) -> RelCommon {
        match self {
            Emission::Direct => RelCommon::direct(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RelNode {
    Read(Read),
    Filter(Filter),
    Project(Project),
    Aggregate(Aggregate),
    Join(Join),
    Cross(Cross),
    Sort(Sort),
    Fetch(Fetch),
    Set(Set),
}

impl RelNode {
    /// Stable lowercase operator name; matches `RelType::name` of the encoding.
    pub fn kind(&self) -> &'static str {
        match self {
            RelNode::Read(_) => "read",
            RelNode::Filter(_) => "filter",
            RelNode::Project(_) => "project",
            RelNode::Aggregate(_) => "aggregate",
            RelNode::Join(_) => "join",
            RelNode::Cross(_) => "cross",
            RelNode::Sort(_) => "sort",
            RelNode::Fetch(_) => "fetch",
            RelNode::Set(_) => "set",
        }
    }

    pub fn emission(&self) -> Emission {
        Emission::Direct
    }

    /// Direct children, left to right.
    pub fn children(&self) -> Vec<&RelNode> {
        match self {
            RelNode::Read(_) => vec![],
            RelNode::Filter(n) => n.input().into_iter().collect(),
            RelNode::Project(n) => n.input().into_iter().collect(),
            RelNode::Aggregate(n) => vec![n.input()],
            RelNode::Join(n) => vec![n.left(), n.right()],
            RelNode::Cross(n) => vec![n.left(), n.right()],
            RelNode::Sort(n) => vec![n.input()],
            RelNode::Fetch(n) => vec![n.input()],
            RelNode::Set(n) => n.inputs().iter().collect(),
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Encode this node and its whole subtree.
    pub fn encode(&self) -> Rel {
        #[cfg(feature = "tracing")]
        tracing::trace!(kind = self.kind(), "encoding rel");

        let common = self.emission().encode();
        let rel_type = match self {
            RelNode::Read(n) => RelType::Read(Box::new(n.encode(common))),
            RelNode::Filter(n) => RelType::Filter(Box::new(n.encode(common))),
            RelNode::Project(n) => RelType::Project(Box::new(n.encode(common))),
            RelNode::Aggregate(n) => RelType::Aggregate(Box::new(n.encode(common))),
            RelNode::Join(n) => RelType::Join(Box::new(n.encode(common))),
            RelNode::Cross(n) => RelType::Cross(Box::new(n.encode(common))),
            RelNode::Sort(n) => RelType::Sort(Box::new(n.encode(common))),
            RelNode::Fetch(n) => RelType::Fetch(Box::new(n.encode(common))),
            RelNode::Set(n) => RelType::Set(n.encode(common)),
        };
        Rel {
            rel_type: Some(rel_type),
        }
    }

    /// One-line description of this node's payload, used by `explain`.
    pub fn describe(&self) -> String {
        match self {
            RelNode::Read(n) => n.describe(),
            RelNode::Filter(n) => format!("condition={}", n.condition().label()),
            RelNode::Project(n) => {
                let exprs: Vec<String> = n.expressions().iter().map(|e| e.label()).collect();
                format!("expressions=[{}]", exprs.join(", "))
            }
            RelNode::Aggregate(n) => format!(
                "grouping_sets={} measures={}",
                n.grouping_sets().len(),
                n.measures().len()
            ),
            RelNode::Join(n) => format!("type={:?} on={}", n.join_type(), n.expression().label()),
            RelNode::Cross(_) => String::new(),
            RelNode::Sort(n) => {
                let keys: Vec<String> = n
                    .sorts()
                    .iter()
                    .map(|s| format!("{} {:?}", s.expr().label(), s.direction()))
                    .collect();
                format!("by=[{}]", keys.join(", "))
            }
            RelNode::Fetch(n) => match n.count() {
                Some(c) => format!("offset={} count={}", n.offset(), c),
                None => format!("offset={} count=all", n.offset()),
            },
            RelNode::Set(n) => format!("op={:?} inputs={}", n.op(), n.inputs().len()),
        }
    }

    /// Indented operator tree, root first.
    pub fn explain(&self) -> String {
        let mut out = String::new();
        self.explain_into(&mut out, 0);
        out
    }

    fn explain_into(&self, out: &mut String, depth: usize) {
        use std::fmt::Write as _;
        let desc = self.describe();
        let _ = if desc.is_empty() {
            writeln!(out, "{}{}", "  ".repeat(depth), self.kind())
        } else {
            writeln!(out, "{}{} {}", "  ".repeat(depth), self.kind(), desc)
        };
        for child in self.children() {
            child.explain_into(out, depth + 1);
        }
    }
}

impl fmt::Display for RelNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.explain())
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for RelNode {
                fn from(n: $variant) -> Self {
                    RelNode::$variant(n)
                }
            }
        )*
    };
}

impl_from_variant!(Read, Filter, Project, Aggregate, Join, Cross, Sort, Fetch, Set);

/// Encode an optional boxed child.
fn encode_child(child: Option<&RelNode>) -> Option<Box<Rel>> {
    child.map(|c| Box::new(c.encode()))
}

#[cfg(test)]
pub(crate) mod test_util {
    use relwire_core::schema::{DataType, Field, Schema};

    use super::*;
    use crate::expression::{ExpressionNode, Scalar, TypeNode};

    pub fn schema() -> Schema {
        Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, true),
            Field::new("age", DataType::Int32, true),
        ])
    }

    pub fn scan(table: &str) -> RelNode {
        Read::new(schema(), ReadSource::NamedTable(vec![table.to_string()]))
            .unwrap()
            .into()
    }

    /// `fn#1($idx, literal)` returning boolean.
    pub fn predicate(idx: usize, literal: i64) -> ExpressionNode {
        ExpressionNode::call(
            1,
            vec![
                ExpressionNode::field(idx).unwrap(),
                ExpressionNode::literal(Scalar::I64(literal)),
            ],
            TypeNode::new(DataType::Boolean, true),
        )
    }
}
