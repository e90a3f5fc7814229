//! Logical schema types. Pure data; no protobuf dependency here.
//!
//! `relwire-plan` turns these into interchange `Type` messages when a read
//! operator declares its base schema or an expression declares its output type.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Utf8,
    Binary,
    /// Days since the Unix epoch.
    Date32,
    /// Microseconds since the Unix epoch, no time zone.
    Timestamp,
    Decimal128 { precision: i32, scale: i32 },
}

impl DataType {
    /// Parse the names accepted by the pipeline DSL.
    pub fn parse(s: &str) -> Result<Self> {
        Ok(match s {
            "Boolean" | "bool" => DataType::Boolean,
            "Int8" | "i8" => DataType::Int8,
            "Int16" | "i16" => DataType::Int16,
            "Int32" | "i32" => DataType::Int32,
            "Int64" | "i64" => DataType::Int64,
            "Float32" | "f32" => DataType::Float32,
            "Float64" | "f64" => DataType::Float64,
            "Utf8" | "string" => DataType::Utf8,
            "Binary" | "bytes" => DataType::Binary,
            "Date32" | "date" => DataType::Date32,
            "Timestamp" | "timestamp" => DataType::Timestamp,
            other => {
                if let Some(args) = other
                    .strip_prefix("Decimal128(")
                    .or_else(|| other.strip_prefix("decimal("))
                    .and_then(|rest| rest.strip_suffix(')'))
                {
                    let mut parts = args.split(',').map(|p| p.trim().parse::<i32>());
                    match (parts.next(), parts.next(), parts.next()) {
                        (Some(Ok(precision)), Some(Ok(scale)), None) => {
                            return Ok(DataType::Decimal128 { precision, scale })
                        }
                        _ => return Err(Error::Schema(format!("bad decimal type '{other}'"))),
                    }
                }
                return Err(Error::Schema(format!("unknown data type '{other}'")));
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// First duplicated field name, if any.
    pub fn duplicate_name(&self) -> Option<&str> {
        self.fields.iter().enumerate().find_map(|(i, f)| {
            self.fields[..i]
                .iter()
                .any(|g| g.name == f.name)
                .then_some(f.name.as_str())
        })
    }
}
