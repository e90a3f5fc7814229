//! Read: leaf scan of a named table or a set of local files.

use relwire_core::error::{Error, Result};
use relwire_core::schema::Schema;
use relwire_proto::rel::{
    FileFormat as FileFormatMsg, FileOrFiles, LocalFiles, MaskExpression, NamedTable, PathType,
    ReadRel, ReadType, RelCommon, StructItem, StructSelect,
};
use relwire_proto::wire::Empty;
use serde::{Deserialize, Serialize};

use crate::expression::{named_struct, ExpressionNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Parquet,
    Arrow,
    Orc,
}

impl FileFormat {
    fn encode(self) -> FileFormatMsg {
        match self {
            FileFormat::Parquet => FileFormatMsg::Parquet(Empty {}),
            FileFormat::Arrow => FileFormatMsg::Arrow(Empty {}),
            FileFormat::Orc => FileFormatMsg::Orc(Empty {}),
        }
    }
}

/// One file (or byte range of a file) to scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFile {
    pub path: String,
    pub format: FileFormat,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub length: u64,
    #[serde(default)]
    pub partition_index: u64,
}

impl LocalFile {
    pub fn new(path: impl Into<String>, format: FileFormat) -> Self {
        Self {
            path: path.into(),
            format,
            start: 0,
            length: 0,
            partition_index: 0,
        }
    }

    fn encode(&self) -> FileOrFiles {
        FileOrFiles {
            path_type: Some(PathType::UriFile(self.path.clone())),
            partition_index: self.partition_index,
            start: self.start,
            length: self.length,
            file_format: Some(self.format.encode()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadSource {
    /// Catalog-qualified table name, outermost first.
    NamedTable(Vec<String>),
    LocalFiles(Vec<LocalFile>),
}

/// Leaf scan of a table or a set of files with a known base schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Read {
    schema: Schema,
    source: ReadSource,
    filter: Option<ExpressionNode>,
    projection: Option<Vec<usize>>,
}

impl Read {
    pub fn new(schema: Schema, source: ReadSource) -> Result<Self> {
        match &source {
            ReadSource::NamedTable(names) if names.is_empty() => {
                return Err(Error::malformed("read", "table name is empty"));
            }
            ReadSource::NamedTable(names) if names.iter().any(|n| n.is_empty()) => {
                return Err(Error::malformed("read", "table name has an empty part"));
            }
            ReadSource::LocalFiles(files) if files.is_empty() => {
                return Err(Error::malformed("read", "no files to read"));
            }
            _ => {}
        }
        if let Some(dup) = schema.duplicate_name() {
            return Err(Error::malformed(
                "read",
                format!("duplicate column '{dup}' in base schema"),
            ));
        }
        Ok(Self {
            schema,
            source,
            filter: None,
            projection: None,
        })
    }

    /// Pushed-down filter, evaluated against the base schema.
    pub fn with_filter(mut self, filter: ExpressionNode) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Keep only the given base schema columns, in the given order.
    pub fn with_projection(mut self, columns: Vec<usize>) -> Result<Self> {
        if let Some(bad) = columns.iter().find(|&&c| c >= self.schema.len()) {
            return Err(Error::malformed(
                "read",
                format!(
                    "projection column {bad} out of range for {} columns",
                    self.schema.len()
                ),
            ));
        }
        self.projection = Some(columns);
        Ok(self)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn source(&self) -> &ReadSource {
        &self.source
    }

    pub fn filter(&self) -> Option<&ExpressionNode> {
        self.filter.as_ref()
    }

    pub fn projection(&self) -> Option<&[usize]> {
        self.projection.as_deref()
    }

    /// Schema of the rows this scan produces.
    pub fn output_schema(&self) -> Schema {
        match &self.projection {
            None => self.schema.clone(),
            Some(cols) => Schema::new(
                cols.iter()
                    .filter_map(|&c| self.schema.field(c).cloned())
                    .collect(),
            ),
        }
    }

    pub(crate) fn describe(&self) -> String {
        let mut out = match &self.source {
            ReadSource::NamedTable(names) => format!("table={}", names.join(".")),
            ReadSource::LocalFiles(files) => format!("files={}", files.len()),
        };
        out.push_str(&format!(" columns={}", self.schema.len()));
        if let Some(f) = &self.filter {
            out.push_str(&format!(" filter={}", f.label()));
        }
        if let Some(p) = &self.projection {
            out.push_str(&format!(" projection={p:?}"));
        }
        out
    }

    pub(crate) fn encode(&self, common: RelCommon) -> ReadRel {
        let read_type = match &self.source {
            ReadSource::NamedTable(names) => ReadType::NamedTable(NamedTable {
                names: names.clone(),
            }),
            ReadSource::LocalFiles(files) => ReadType::LocalFiles(LocalFiles {
                items: files.iter().map(LocalFile::encode).collect(),
            }),
        };
        let projection = self.projection.as_ref().map(|cols| MaskExpression {
            select: Some(StructSelect {
                struct_items: cols
                    .iter()
                    .map(|&c| StructItem { field: c as i32 })
                    .collect(),
            }),
            maintain_singular_struct: false,
        });
        ReadRel {
            common: Some(common),
            base_schema: Some(named_struct(&self.schema)),
            filter: self.filter.as_ref().map(|f| f.encode()),
            projection,
            read_type: Some(read_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use relwire_core::schema::{DataType, Field};
    use relwire_proto::rel::RelType;

    use super::*;
    use crate::rel::test_util::*;
    use crate::rel::RelNode;

    fn encoded(node: RelNode) -> ReadRel {
        match node.encode().rel_type {
            Some(RelType::Read(r)) => *r,
            other => panic!("expected read, got {other:?}"),
        }
    }

    #[test]
    fn named_table_carries_schema_and_names() {
        let r = encoded(scan("users"));
        assert_eq!(
            r.read_type,
            Some(ReadType::NamedTable(NamedTable {
                names: vec!["users".into()]
            }))
        );
        let base = r.base_schema.unwrap();
        assert_eq!(base.names, vec!["id", "name", "age"]);
        assert!(r.common.unwrap().is_direct());
        assert!(r.projection.is_none());
    }

    #[test]
    fn empty_source_and_duplicate_columns_rejected() {
        assert!(Read::new(schema(), ReadSource::NamedTable(vec![]))
            .unwrap_err()
            .is_malformed());
        assert!(Read::new(schema(), ReadSource::LocalFiles(vec![]))
            .unwrap_err()
            .is_malformed());
        let dup = Schema::new(vec![
            Field::new("a", DataType::Int32, false),
            Field::new("a", DataType::Utf8, true),
        ]);
        assert!(Read::new(dup, ReadSource::NamedTable(vec!["t".into()])).is_err());
    }

    #[test]
    fn projection_bounds_checked() {
        let read = Read::new(schema(), ReadSource::NamedTable(vec!["t".into()])).unwrap();
        assert!(read.clone().with_projection(vec![3]).unwrap_err().is_malformed());

        let read = read.with_projection(vec![2, 0]).unwrap();
        assert_eq!(read.output_schema().names(), vec!["age", "id"]);
        let r = encoded(read.into());
        let items = r.projection.unwrap().select.unwrap().struct_items;
        assert_eq!(items, vec![StructItem { field: 2 }, StructItem { field: 0 }]);
    }

    #[test]
    fn local_files_encode_format_and_range() {
        let mut file = LocalFile::new("file:///data/part-0.parquet", FileFormat::Parquet);
        file.length = 4096;
        let read = Read::new(schema(), ReadSource::LocalFiles(vec![file])).unwrap();
        assert!(read.describe().starts_with("files=1"));
        let Some(ReadType::LocalFiles(lf)) = encoded(read.into()).read_type else {
            panic!("expected local files");
        };
        assert_eq!(lf.items.len(), 1);
        assert_eq!(lf.items[0].length, 4096);
        assert_eq!(lf.items[0].file_format, Some(FileFormatMsg::Parquet(Empty {})));
    }
}
