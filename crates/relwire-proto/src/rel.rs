//! `substrait.Rel`: the tagged union over relational operator messages.
//!
//! Every operator message starts with `common` (field 1). Child relations are
//! boxed because `Rel` is recursive.

use serde::Serialize;

use crate::expr::{Expression, FunctionArgument};
use crate::types::{NamedStruct, Type};
use crate::wire::{self, Empty, Message, WireBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Rel {
    pub rel_type: Option<RelType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RelType {
    Read(Box<ReadRel>),
    Filter(Box<FilterRel>),
    Fetch(Box<FetchRel>),
    Aggregate(Box<AggregateRel>),
    Sort(Box<SortRel>),
    Join(Box<JoinRel>),
    Project(Box<ProjectRel>),
    Set(SetRel),
    Cross(Box<CrossRel>),
}

impl RelType {
    /// Stable lowercase name of the operator kind.
    pub fn name(&self) -> &'static str {
        match self {
            RelType::Read(_) => "read",
            RelType::Filter(_) => "filter",
            RelType::Fetch(_) => "fetch",
            RelType::Aggregate(_) => "aggregate",
            RelType::Sort(_) => "sort",
            RelType::Join(_) => "join",
            RelType::Project(_) => "project",
            RelType::Set(_) => "set",
            RelType::Cross(_) => "cross",
        }
    }
}

/// Metadata shared by all operator messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelCommon {
    pub emit_kind: Option<EmitKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EmitKind {
    /// Output every column, in order, inline.
    Direct(Empty),
}

impl RelCommon {
    pub fn direct() -> Self {
        RelCommon {
            emit_kind: Some(EmitKind::Direct(Empty {})),
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self.emit_kind, Some(EmitKind::Direct(_)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterRel {
    pub common: Option<RelCommon>,
    pub input: Option<Box<Rel>>,
    pub condition: Option<Expression>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectRel {
    pub common: Option<RelCommon>,
    pub input: Option<Box<Rel>>,
    pub expressions: Vec<Expression>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FetchRel {
    pub common: Option<RelCommon>,
    pub input: Option<Box<Rel>>,
    pub offset: i64,
    /// `-1` means all remaining records.
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateRel {
    pub common: Option<RelCommon>,
    pub input: Option<Box<Rel>>,
    pub groupings: Vec<Grouping>,
    pub measures: Vec<Measure>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Grouping {
    pub grouping_expressions: Vec<Expression>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Measure {
    pub measure: Option<AggregateFunction>,
    pub filter: Option<Expression>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum AggregationPhase {
    #[default]
    Unspecified = 0,
    InitialToIntermediate = 1,
    IntermediateToIntermediate = 2,
    InitialToResult = 3,
    IntermediateToResult = 4,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum AggregationInvocation {
    #[default]
    Unspecified = 0,
    All = 1,
    Distinct = 2,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateFunction {
    pub function_reference: u32,
    pub arguments: Vec<FunctionArgument>,
    pub output_type: Option<Type>,
    pub phase: AggregationPhase,
    pub invocation: AggregationInvocation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SortRel {
    pub common: Option<RelCommon>,
    pub input: Option<Box<Rel>>,
    pub sorts: Vec<SortField>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum SortDirection {
    #[default]
    Unspecified = 0,
    AscNullsFirst = 1,
    AscNullsLast = 2,
    DescNullsFirst = 3,
    DescNullsLast = 4,
    Clustered = 5,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SortField {
    pub expr: Option<Expression>,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum JoinType {
    #[default]
    Unspecified = 0,
    Inner = 1,
    Outer = 2,
    Left = 3,
    Right = 4,
    LeftSemi = 5,
    LeftAnti = 6,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JoinRel {
    pub common: Option<RelCommon>,
    pub left: Option<Box<Rel>>,
    pub right: Option<Box<Rel>>,
    pub expression: Option<Expression>,
    pub post_join_filter: Option<Expression>,
    pub r#type: JoinType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrossRel {
    pub common: Option<RelCommon>,
    pub left: Option<Box<Rel>>,
    pub right: Option<Box<Rel>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum SetOp {
    #[default]
    Unspecified = 0,
    MinusPrimary = 1,
    MinusMultiset = 2,
    IntersectionPrimary = 3,
    IntersectionMultiset = 4,
    UnionDistinct = 5,
    UnionAll = 6,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SetRel {
    pub common: Option<RelCommon>,
    pub inputs: Vec<Rel>,
    pub op: SetOp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReadRel {
    pub common: Option<RelCommon>,
    pub base_schema: Option<NamedStruct>,
    pub filter: Option<Expression>,
    pub projection: Option<MaskExpression>,
    pub read_type: Option<ReadType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReadType {
    LocalFiles(LocalFiles),
    NamedTable(NamedTable),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NamedTable {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalFiles {
    pub items: Vec<FileOrFiles>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileOrFiles {
    pub path_type: Option<PathType>,
    pub partition_index: u64,
    pub start: u64,
    pub length: u64,
    pub file_format: Option<FileFormat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PathType {
    UriPath(String),
    UriPathGlob(String),
    UriFile(String),
    UriFolder(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FileFormat {
    Parquet(Empty),
    Arrow(Empty),
    Orc(Empty),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaskExpression {
    pub select: Option<StructSelect>,
    pub maintain_singular_struct: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructSelect {
    pub struct_items: Vec<StructItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructItem {
    pub field: i32,
}

impl Message for Rel {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        let Some(rel) = &self.rel_type else {
            return;
        };
        match rel {
            RelType::Read(r) => wire::message(1, r, buf),
            RelType::Filter(r) => wire::message(2, r, buf),
            RelType::Fetch(r) => wire::message(3, r, buf),
            RelType::Aggregate(r) => wire::message(4, r, buf),
            RelType::Sort(r) => wire::message(5, r, buf),
            RelType::Join(r) => wire::message(6, r, buf),
            RelType::Project(r) => wire::message(7, r, buf),
            RelType::Set(r) => wire::message(8, r, buf),
            RelType::Cross(r) => wire::message(12, r, buf),
        }
    }
}

impl Message for RelCommon {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        if let Some(EmitKind::Direct(d)) = &self.emit_kind {
            wire::message(1, d, buf);
        }
    }
}

impl Message for FilterRel {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::optional_message(1, self.common.as_ref(), buf);
        wire::optional_message(2, self.input.as_ref(), buf);
        wire::optional_message(3, self.condition.as_ref(), buf);
    }
}

impl Message for ProjectRel {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::optional_message(1, self.common.as_ref(), buf);
        wire::optional_message(2, self.input.as_ref(), buf);
        wire::repeated_message(3, &self.expressions, buf);
    }
}

impl Message for FetchRel {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::optional_message(1, self.common.as_ref(), buf);
        wire::optional_message(2, self.input.as_ref(), buf);
        if self.offset != 0 {
            wire::int64(3, self.offset, buf);
        }
        if self.count != 0 {
            wire::int64(4, self.count, buf);
        }
    }
}

impl Message for AggregateRel {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::optional_message(1, self.common.as_ref(), buf);
        wire::optional_message(2, self.input.as_ref(), buf);
        wire::repeated_message(3, &self.groupings, buf);
        wire::repeated_message(4, &self.measures, buf);
    }
}

impl Message for Grouping {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::repeated_message(1, &self.grouping_expressions, buf);
    }
}

impl Message for Measure {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::optional_message(1, self.measure.as_ref(), buf);
        wire::optional_message(2, self.filter.as_ref(), buf);
    }
}

impl Message for AggregateFunction {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        if self.function_reference != 0 {
            wire::uint32(1, self.function_reference, buf);
        }
        if self.phase != AggregationPhase::Unspecified {
            wire::enumeration(4, self.phase as i32, buf);
        }
        wire::optional_message(5, self.output_type.as_ref(), buf);
        if self.invocation != AggregationInvocation::Unspecified {
            wire::enumeration(6, self.invocation as i32, buf);
        }
        wire::repeated_message(7, &self.arguments, buf);
    }
}

impl Message for SortRel {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::optional_message(1, self.common.as_ref(), buf);
        wire::optional_message(2, self.input.as_ref(), buf);
        wire::repeated_message(3, &self.sorts, buf);
    }
}

impl Message for SortField {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::optional_message(1, self.expr.as_ref(), buf);
        // sort_kind oneof member
        wire::enumeration(2, self.direction as i32, buf);
    }
}

impl Message for JoinRel {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::optional_message(1, self.common.as_ref(), buf);
        wire::optional_message(2, self.left.as_ref(), buf);
        wire::optional_message(3, self.right.as_ref(), buf);
        wire::optional_message(4, self.expression.as_ref(), buf);
        wire::optional_message(5, self.post_join_filter.as_ref(), buf);
        if self.r#type != JoinType::Unspecified {
            wire::enumeration(6, self.r#type as i32, buf);
        }
    }
}

impl Message for CrossRel {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::optional_message(1, self.common.as_ref(), buf);
        wire::optional_message(2, self.left.as_ref(), buf);
        wire::optional_message(3, self.right.as_ref(), buf);
    }
}

impl Message for SetRel {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::optional_message(1, self.common.as_ref(), buf);
        wire::repeated_message(2, &self.inputs, buf);
        if self.op != SetOp::Unspecified {
            wire::enumeration(3, self.op as i32, buf);
        }
    }
}

impl Message for ReadRel {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::optional_message(1, self.common.as_ref(), buf);
        wire::optional_message(2, self.base_schema.as_ref(), buf);
        wire::optional_message(3, self.filter.as_ref(), buf);
        wire::optional_message(4, self.projection.as_ref(), buf);
        match &self.read_type {
            Some(ReadType::LocalFiles(lf)) => wire::message(6, lf, buf),
            Some(ReadType::NamedTable(nt)) => wire::message(7, nt, buf),
            None => {}
        }
    }
}

impl Message for NamedTable {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::repeated_string(1, &self.names, buf);
    }
}

impl Message for LocalFiles {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::repeated_message(1, &self.items, buf);
    }
}

impl Message for FileOrFiles {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        match &self.path_type {
            Some(PathType::UriPath(p)) => wire::string(1, p, buf),
            Some(PathType::UriPathGlob(p)) => wire::string(2, p, buf),
            Some(PathType::UriFile(p)) => wire::string(3, p, buf),
            Some(PathType::UriFolder(p)) => wire::string(4, p, buf),
            None => {}
        }
        if self.partition_index != 0 {
            wire::uint64(6, self.partition_index, buf);
        }
        if self.start != 0 {
            wire::uint64(7, self.start, buf);
        }
        if self.length != 0 {
            wire::uint64(8, self.length, buf);
        }
        match &self.file_format {
            Some(FileFormat::Parquet(o)) => wire::message(9, o, buf),
            Some(FileFormat::Arrow(o)) => wire::message(10, o, buf),
            Some(FileFormat::Orc(o)) => wire::message(11, o, buf),
            None => {}
        }
    }
}

impl Message for MaskExpression {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::optional_message(1, self.select.as_ref(), buf);
        if self.maintain_singular_struct {
            wire::bool(2, true, buf);
        }
    }
}

impl Message for StructSelect {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::repeated_message(1, &self.struct_items, buf);
    }
}

impl Message for StructItem {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        if self.field != 0 {
            wire::int32(1, self.field, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_common_layout() {
        assert_eq!(RelCommon::direct().encode_to_vec(), vec![0x0a, 0x00]);
        assert!(RelCommon::direct().is_direct());
        assert!(!RelCommon::default().is_direct());
    }

    #[test]
    fn bare_filter_rel_layout() {
        let rel = Rel {
            rel_type: Some(RelType::Filter(Box::new(FilterRel {
                common: Some(RelCommon::direct()),
                input: None,
                condition: Some(Expression::default()),
            }))),
        };
        // filter { common { direct {} } condition {} }
        assert_eq!(
            rel.encode_to_vec(),
            vec![0x12, 0x06, 0x0a, 0x02, 0x0a, 0x00, 0x1a, 0x00]
        );
    }

    #[test]
    fn fetch_all_writes_negative_count() {
        let f = FetchRel {
            count: -1,
            ..Default::default()
        };
        let bytes = f.encode_to_vec();
        assert_eq!(bytes[0], 0x20);
        assert_eq!(bytes.len(), 11);
    }

    #[test]
    fn sort_direction_always_written() {
        let s = SortField::default();
        assert_eq!(s.encode_to_vec(), vec![0x10, 0x00]);
    }

    #[test]
    fn kind_names() {
        assert_eq!(RelType::Set(SetRel::default()).name(), "set");
        assert_eq!(RelType::Filter(Box::default()).name(), "filter");
    }

    #[test]
    fn json_shape_is_externally_tagged() {
        let rel = Rel {
            rel_type: Some(RelType::Filter(Box::new(FilterRel {
                common: Some(RelCommon::direct()),
                input: None,
                condition: Some(Expression::default()),
            }))),
        };
        assert_eq!(
            serde_json::to_value(&rel).unwrap(),
            serde_json::json!({
                "rel_type": {
                    "Filter": {
                        "common": { "emit_kind": { "Direct": {} } },
                        "input": null,
                        "condition": { "rex_type": null }
                    }
                }
            })
        );
    }
}
