//! YAML → `PlanNode` for *linear* pipelines.
//!
//! Example:
//! ```yaml
//! config: { producer: "etl/1.0" }
//! steps:
//!   - op: scan
//!     table: "sales.orders"
//!     schema:
//!       - { name: "id",     type: "Int64",   nullable: false }
//!       - { name: "region", type: "Utf8",    nullable: true }
//!       - { name: "amount", type: "Float64", nullable: true }
//!   - op: filter
//!     expr: "amount > 100 AND region IS NOT NULL"
//!   - op: aggregate
//!     group_by: ["region"]
//!     measures: [ { func: "sum", column: "amount", alias: "total" } ]
//!   - op: sort
//!     by: [ { column: "total", direction: "desc" } ]
//!   - op: fetch
//!     count: 10
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use relwire_core::config::{PlanConfig, PlanConfigOverrides};
use relwire_core::schema::{DataType, Field, Schema};

use super::predicate::parse_predicate;
use crate::builder::RelBuilder;
use crate::expression::{AggregateFunctionNode, ExpressionNode, TypeNode};
use crate::extensions::FunctionRegistry;
use crate::plan::{PlanBuilder, PlanNode};
use crate::rel::{LocalFile, MeasureNode, RelNode, SortDirection, SortFieldNode};

#[derive(Debug, Error)]
pub enum DslError {
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Plan(#[from] relwire_core::error::Error),

    #[error("invalid pipeline: {0}")]
    Invalid(String),

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("bad predicate: {0}")]
    Predicate(String),
}

impl DslError {
    /// True when an operator rejected its payload at construction.
    pub fn is_malformed(&self) -> bool {
        matches!(self, DslError::Plan(e) if e.is_malformed())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub config: Option<PlanConfigOverrides>,
    /// Names for the root's output columns; defaults to the running schema.
    #[serde(default)]
    pub output_names: Option<Vec<String>>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "op")]
pub enum Step {
    #[serde(rename = "scan")]
    Scan {
        #[serde(default)]
        table: Option<String>,
        #[serde(default)]
        files: Vec<LocalFile>,
        schema: Vec<FieldDef>,
        #[serde(default)]
        columns: Option<Vec<String>>,
    },

    #[serde(rename = "filter")]
    Filter {
        #[serde(default)]
        expr: Option<String>,
    },

    #[serde(rename = "project")]
    Project { columns: Vec<ProjectItem> },

    #[serde(rename = "aggregate")]
    Aggregate {
        #[serde(default)]
        group_by: Vec<String>,
        #[serde(default)]
        measures: Vec<MeasureDef>,
    },

    #[serde(rename = "sort")]
    Sort { by: Vec<SortKeyDef> },

    #[serde(rename = "fetch")]
    Fetch {
        #[serde(default)]
        offset: u64,
        #[serde(default)]
        count: Option<u64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub nullable: bool,
}

/// A projected column: either a bare name or a cast with an optional alias.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectItem {
    Column(String),
    Cast {
        column: String,
        cast: String,
        #[serde(default)]
        alias: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasureDef {
    pub func: String,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub distinct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortKeyDef {
    pub column: String,
    #[serde(default)]
    pub direction: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ParsedPipeline {
    pub root: RelNode,
    pub output_names: Vec<String>,
    /// Schema of the root's output rows.
    pub schema: Schema,
    pub registry: FunctionRegistry,
    pub config: PlanConfigOverrides,
}

impl ParsedPipeline {
    /// Wrap the pipeline into a plan. `base` is layered under the pipeline's
    /// own `config:` block.
    pub fn into_plan(self, mut base: PlanConfig) -> Result<PlanNode, DslError> {
        base.merge(&self.config);
        let mut builder = PlanBuilder::new(base).with_registry(self.registry);
        builder.add_root(self.root, self.output_names);
        Ok(builder.build()?)
    }
}

fn to_schema(fields: &[FieldDef]) -> Result<Schema, DslError> {
    let fields = fields
        .iter()
        .map(|f| -> Result<Field, DslError> {
            Ok(Field::new(
                f.name.clone(),
                DataType::parse(&f.data_type)?,
                f.nullable,
            ))
        })
        .collect::<Result<Vec<_>, DslError>>()?;
    Ok(Schema::new(fields))
}

fn column(schema: &Schema, name: &str) -> Result<(usize, Field), DslError> {
    let idx = schema
        .index_of(name)
        .ok_or_else(|| DslError::UnknownColumn(name.to_string()))?;
    let field = schema
        .field(idx)
        .cloned()
        .ok_or_else(|| DslError::UnknownColumn(name.to_string()))?;
    Ok((idx, field))
}

fn parse_direction(s: Option<&str>) -> Result<SortDirection, DslError> {
    Ok(match s.map(|d| d.to_ascii_lowercase()).as_deref() {
        None | Some("asc") | Some("asc_nulls_last") => SortDirection::AscNullsLast,
        Some("asc_nulls_first") => SortDirection::AscNullsFirst,
        Some("desc") | Some("desc_nulls_first") => SortDirection::DescNullsFirst,
        Some("desc_nulls_last") => SortDirection::DescNullsLast,
        Some(other) => {
            return Err(DslError::Invalid(format!("unknown sort direction '{other}'")))
        }
    })
}

/// Output type of the DSL's built-in aggregates.
fn measure_type(func: &str, input: Option<&Field>) -> Result<TypeNode, DslError> {
    match (func, input) {
        ("count", _) => Ok(TypeNode::new(DataType::Int64, false)),
        ("avg", Some(_)) => Ok(TypeNode::new(DataType::Float64, true)),
        ("sum" | "min" | "max", Some(f)) => Ok(TypeNode::new(f.data_type, true)),
        ("avg" | "sum" | "min" | "max", None) => {
            Err(DslError::Invalid(format!("'{func}' needs a column")))
        }
        (other, _) => Err(DslError::Invalid(format!("unknown aggregate '{other}'"))),
    }
}

struct Cursor {
    node: RelNode,
    schema: Schema,
}

fn scan(
    table: Option<String>,
    files: Vec<LocalFile>,
    fields: &[FieldDef],
    columns: Option<Vec<String>>,
) -> Result<Cursor, DslError> {
    let schema = to_schema(fields)?;
    let node = match (table, files.is_empty()) {
        (Some(t), true) => {
            let names = t.split('.').map(str::to_string).collect();
            RelBuilder::read_named_table(schema.clone(), names)?
        }
        (None, false) => RelBuilder::read_local_files(schema.clone(), files)?,
        _ => {
            return Err(DslError::Invalid(
                "scan needs exactly one of 'table' or 'files'".into(),
            ))
        }
    };
    let Some(columns) = columns else {
        return Ok(Cursor { node, schema });
    };

    let indices = columns
        .iter()
        .map(|c| column(&schema, c).map(|(i, _)| i))
        .collect::<Result<Vec<_>, _>>()?;
    let RelNode::Read(read) = node else {
        return Err(DslError::Invalid("scan did not produce a read".into()));
    };
    let read = read.with_projection(indices)?;
    let schema = read.output_schema();
    Ok(Cursor {
        node: read.into(),
        schema,
    })
}

fn apply(cur: Cursor, step: Step, registry: &mut FunctionRegistry) -> Result<Cursor, DslError> {
    let Cursor { node, schema } = cur;
    match step {
        Step::Scan { .. } => Err(DslError::Invalid("multiple scans not supported".into())),

        Step::Filter { expr } => {
            let condition = expr
                .map(|e| parse_predicate(&e, &schema, registry))
                .transpose()?;
            Ok(Cursor {
                node: RelBuilder::filter(Some(node), condition)?,
                schema,
            })
        }

        Step::Project { columns } => {
            let mut out = schema.clone();
            let mut exprs = Vec::with_capacity(columns.len());
            for item in columns {
                match item {
                    ProjectItem::Column(name) => {
                        let (idx, field) = column(&schema, &name)?;
                        exprs.push(ExpressionNode::field(idx)?);
                        out.fields.push(field);
                    }
                    ProjectItem::Cast {
                        column: name,
                        cast,
                        alias,
                    } => {
                        let (idx, field) = column(&schema, &name)?;
                        let target = TypeNode::new(DataType::parse(&cast)?, field.nullable);
                        exprs.push(ExpressionNode::cast(ExpressionNode::field(idx)?, target));
                        out.fields.push(Field::new(
                            alias.unwrap_or(name),
                            target.data_type,
                            target.nullable,
                        ));
                    }
                }
            }
            Ok(Cursor {
                node: RelBuilder::project(Some(node), exprs)?,
                schema: out,
            })
        }

        Step::Aggregate { group_by, measures } => {
            let mut out = Vec::new();
            let mut keys = Vec::with_capacity(group_by.len());
            for name in &group_by {
                let (idx, field) = column(&schema, name)?;
                keys.push(ExpressionNode::field(idx)?);
                out.push(field);
            }

            let mut nodes = Vec::with_capacity(measures.len());
            for m in measures {
                let func = m.func.to_ascii_lowercase();
                let input = match m.column.as_deref() {
                    None | Some("*") => None,
                    Some(c) => Some(column(&schema, c)?),
                };
                let output_type = measure_type(&func, input.as_ref().map(|(_, f)| f))?;
                let args = match &input {
                    Some((idx, _)) => vec![ExpressionNode::field(*idx)?],
                    None => vec![],
                };
                let anchor = registry.register(&func);
                let mut agg = AggregateFunctionNode::new(anchor, args, output_type);
                if m.distinct {
                    agg = agg.distinct();
                }
                nodes.push(MeasureNode::new(agg));

                let alias = m.alias.unwrap_or_else(|| match &input {
                    Some((_, f)) => format!("{func}_{}", f.name),
                    None => func.clone(),
                });
                out.push(Field::new(alias, output_type.data_type, output_type.nullable));
            }

            Ok(Cursor {
                node: RelBuilder::aggregate(Some(node), keys, nodes)?,
                schema: Schema::new(out),
            })
        }

        Step::Sort { by } => {
            let sorts = by
                .iter()
                .map(|key| -> Result<SortFieldNode, DslError> {
                    let (idx, _) = column(&schema, &key.column)?;
                    let dir = parse_direction(key.direction.as_deref())?;
                    Ok(SortFieldNode::new(ExpressionNode::field(idx)?, dir))
                })
                .collect::<Result<Vec<_>, DslError>>()?;
            Ok(Cursor {
                node: RelBuilder::sort(Some(node), sorts)?,
                schema,
            })
        }

        Step::Fetch { offset, count } => Ok(Cursor {
            node: RelBuilder::fetch(Some(node), offset, count)?,
            schema,
        }),
    }
}

/// Parse a YAML pipeline. The first step must be a `scan`; every later step
/// consumes the previous one.
pub fn parse_yaml_pipeline(yaml_src: &str) -> Result<ParsedPipeline, DslError> {
    let doc: Pipeline = serde_yaml::from_str(yaml_src)?;
    let mut registry = FunctionRegistry::new();
    let mut steps = doc.steps.into_iter();

    let mut cur = match steps.next() {
        Some(Step::Scan {
            table,
            files,
            schema,
            columns,
        }) => scan(table, files, &schema, columns)?,
        Some(other) => {
            return Err(DslError::Invalid(format!(
                "first step must be 'scan', got {other:?}"
            )))
        }
        None => return Err(DslError::Invalid("empty pipeline".into())),
    };
    for step in steps {
        cur = apply(cur, step, &mut registry)?;
    }

    let output_names = match doc.output_names {
        Some(names) if names.len() != cur.schema.len() => {
            return Err(DslError::Invalid(format!(
                "{} output names for {} columns",
                names.len(),
                cur.schema.len()
            )))
        }
        Some(names) => names,
        None => cur.schema.names(),
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
        nodes = cur.node.node_count(),
        functions = registry.len(),
        "parsed pipeline"
    );

    Ok(ParsedPipeline {
        root: cur.node,
        output_names,
        schema: cur.schema,
        registry,
        config: doc.config.unwrap_or_default(),
    })
}
