//! Type nodes and schema to `NamedStruct` conversion.

use relwire_core::schema::{DataType, Schema};
use relwire_proto::types::{Decimal, Kind, NamedStruct, Nullability, Primitive, Struct, Type};

/// A logical type plus nullability, as carried by expressions and schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeNode {
    pub data_type: DataType,
    pub nullable: bool,
}

impl TypeNode {
    pub fn new(data_type: DataType, nullable: bool) -> Self {
        Self {
            data_type,
            nullable,
        }
    }

    pub fn encode(&self) -> Type {
        let nullability = Nullability::from_nullable(self.nullable);
        let p = Primitive {
            type_variation_reference: 0,
            nullability,
        };
        let kind = match self.data_type {
            DataType::Boolean => Kind::Bool(p),
            DataType::Int8 => Kind::I8(p),
            DataType::Int16 => Kind::I16(p),
            DataType::Int32 => Kind::I32(p),
            DataType::Int64 => Kind::I64(p),
            DataType::Float32 => Kind::Fp32(p),
            DataType::Float64 => Kind::Fp64(p),
            DataType::Utf8 => Kind::String(p),
            DataType::Binary => Kind::Binary(p),
            DataType::Date32 => Kind::Date(p),
            DataType::Timestamp => Kind::Timestamp(p),
            DataType::Decimal128 { precision, scale } => Kind::Decimal(Decimal {
                scale,
                precision,
                type_variation_reference: 0,
                nullability,
            }),
        };
        Type { kind: Some(kind) }
    }
}

/// Base schema of a read: field names plus a required struct of their types.
pub fn named_struct(schema: &Schema) -> NamedStruct {
    NamedStruct {
        names: schema.names(),
        r#struct: Some(Struct {
            types: schema
                .fields
                .iter()
                .map(|f| TypeNode::new(f.data_type, f.nullable).encode())
                .collect(),
            type_variation_reference: 0,
            nullability: Nullability::Required,
        }),
    }
}
