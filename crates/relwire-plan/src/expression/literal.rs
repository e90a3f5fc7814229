//! Literal values.

use std::fmt;

use relwire_core::schema::DataType;
use relwire_proto::expr::{DecimalLiteral, Literal, LiteralType};
use serde::{Deserialize, Serialize};

use super::types::TypeNode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    /// Null of the given type.
    Null(DataType),
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
    /// Days since the epoch.
    Date(i32),
    /// Microseconds since the epoch.
    Timestamp(i64),
    Decimal {
        value: i128,
        precision: i32,
        scale: i32,
    },
}

impl Scalar {
    pub fn data_type(&self) -> DataType {
        match self {
            Scalar::Null(dt) => *dt,
            Scalar::Bool(_) => DataType::Boolean,
            Scalar::I8(_) => DataType::Int8,
            Scalar::I16(_) => DataType::Int16,
            Scalar::I32(_) => DataType::Int32,
            Scalar::I64(_) => DataType::Int64,
            Scalar::F32(_) => DataType::Float32,
            Scalar::F64(_) => DataType::Float64,
            Scalar::Str(_) => DataType::Utf8,
            Scalar::Bin(_) => DataType::Binary,
            Scalar::Date(_) => DataType::Date32,
            Scalar::Timestamp(_) => DataType::Timestamp,
            Scalar::Decimal {
                precision, scale, ..
            } => DataType::Decimal128 {
                precision: *precision,
                scale: *scale,
            },
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null(_))
    }

    /// Parse `text` as a literal of type `dt`. Used by the pipeline DSL.
    pub fn parse_as(dt: DataType, text: &str) -> Option<Scalar> {
        let t = text.trim();
        if t.eq_ignore_ascii_case("null") {
            return Some(Scalar::Null(dt));
        }
        match dt {
            DataType::Boolean => t.parse().ok().map(Scalar::Bool),
            DataType::Int8 => t.parse().ok().map(Scalar::I8),
            DataType::Int16 => t.parse().ok().map(Scalar::I16),
            DataType::Int32 => t.parse().ok().map(Scalar::I32),
            DataType::Int64 => t.parse().ok().map(Scalar::I64),
            DataType::Float32 => t.parse().ok().map(Scalar::F32),
            DataType::Float64 => t.parse().ok().map(Scalar::F64),
            DataType::Date32 => t.parse().ok().map(Scalar::Date),
            DataType::Timestamp => t.parse().ok().map(Scalar::Timestamp),
            DataType::Utf8 => Some(Scalar::Str(unquote(t).to_string())),
            DataType::Binary => Some(Scalar::Bin(unquote(t).as_bytes().to_vec())),
            DataType::Decimal128 { precision, scale } => {
                parse_decimal(t, precision, scale).map(|value| Scalar::Decimal {
                    value,
                    precision,
                    scale,
                })
            }
        }
    }

    pub fn encode(&self) -> Literal {
        let literal_type = match self {
            Scalar::Null(dt) => LiteralType::Null(TypeNode::new(*dt, true).encode()),
            Scalar::Bool(v) => LiteralType::Boolean(*v),
            Scalar::I8(v) => LiteralType::I8(i32::from(*v)),
            Scalar::I16(v) => LiteralType::I16(i32::from(*v)),
            Scalar::I32(v) => LiteralType::I32(*v),
            Scalar::I64(v) => LiteralType::I64(*v),
            Scalar::F32(v) => LiteralType::Fp32(*v),
            Scalar::F64(v) => LiteralType::Fp64(*v),
            Scalar::Str(v) => LiteralType::String(v.clone()),
            Scalar::Bin(v) => LiteralType::Binary(v.clone()),
            Scalar::Date(v) => LiteralType::Date(*v),
            Scalar::Timestamp(v) => LiteralType::Timestamp(*v),
            Scalar::Decimal {
                value,
                precision,
                scale,
            } => LiteralType::Decimal(DecimalLiteral {
                value: value.to_le_bytes().to_vec(),
                precision: *precision,
                scale: *scale,
            }),
        };
        Literal {
            nullable: self.is_null(),
            type_variation_reference: 0,
            literal_type: Some(literal_type),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null(_) => write!(f, "null"),
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::I8(v) => write!(f, "{v}"),
            Scalar::I16(v) => write!(f, "{v}"),
            Scalar::I32(v) => write!(f, "{v}"),
            Scalar::I64(v) => write!(f, "{v}"),
            Scalar::F32(v) => write!(f, "{v}"),
            Scalar::F64(v) => write!(f, "{v}"),
            Scalar::Str(v) => write!(f, "'{v}'"),
            Scalar::Bin(v) => write!(f, "<{} bytes>", v.len()),
            Scalar::Date(v) => write!(f, "date({v})"),
            Scalar::Timestamp(v) => write!(f, "ts({v})"),
            Scalar::Decimal { value, scale, .. } => write!(f, "{value}e-{scale}"),
        }
    }
}

fn unquote(s: &str) -> &str {
    for q in ['\'', '"'] {
        if let Some(inner) = s.strip_prefix(q).and_then(|r| r.strip_suffix(q)) {
            return inner;
        }
    }
    s
}

/// "12.5" with scale 3 -> 12500. Values wider than `precision` digits are rejected.
fn parse_decimal(s: &str, precision: i32, scale: i32) -> Option<i128> {
    let scale = u32::try_from(scale).ok()?;
    let precision = u32::try_from(precision).ok()?;
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if frac_part.len() > scale as usize {
        return None;
    }
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }

    let mut unscaled: i128 = 0;
    for b in int_part.bytes() {
        unscaled = unscaled.checked_mul(10)?.checked_add(i128::from(b - b'0'))?;
    }
    for i in 0..scale as usize {
        let d = frac_part.as_bytes().get(i).map_or(0, |b| b - b'0');
        unscaled = unscaled.checked_mul(10)?.checked_add(i128::from(d))?;
    }
    if let Some(limit) = 10i128.checked_pow(precision) {
        if unscaled >= limit {
            return None;
        }
    }
    if neg {
        unscaled.checked_neg()
    } else {
        Some(unscaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_respects_column_type() {
        assert_eq!(Scalar::parse_as(DataType::Int64, " 25 "), Some(Scalar::I64(25)));
        assert_eq!(Scalar::parse_as(DataType::Int32, "abc"), None);
        assert_eq!(
            Scalar::parse_as(DataType::Utf8, "'Alice'"),
            Some(Scalar::Str("Alice".into()))
        );
        assert_eq!(
            Scalar::parse_as(DataType::Boolean, "NULL"),
            Some(Scalar::Null(DataType::Boolean))
        );
    }

    #[test]
    fn decimal_parsing_scales() {
        let dt = DataType::Decimal128 {
            precision: 10,
            scale: 3,
        };
        assert_eq!(
            Scalar::parse_as(dt, "12.5"),
            Some(Scalar::Decimal {
                value: 12500,
                precision: 10,
                scale: 3
            })
        );
        assert_eq!(
            Scalar::parse_as(dt, "-0.001"),
            Some(Scalar::Decimal {
                value: -1,
                precision: 10,
                scale: 3
            })
        );
        assert_eq!(Scalar::parse_as(dt, "1.2345"), None);

        assert_eq!(Scalar::parse_as(dt, "--5"), None);
        assert_eq!(Scalar::parse_as(dt, "-+5"), None);
        assert_eq!(Scalar::parse_as(dt, "1.-5"), None);
        assert_eq!(Scalar::parse_as(dt, "-"), None);
        assert_eq!(
            Scalar::parse_as(dt, "--170141183460469231731687303715884105728"),
            None
        );

        let narrow = DataType::Decimal128 {
            precision: 3,
            scale: 1,
        };
        assert_eq!(Scalar::parse_as(narrow, "123456.7"), None);
        assert_eq!(Scalar::parse_as(narrow, "100.0"), None);
        assert_eq!(
            Scalar::parse_as(narrow, "-99.9"),
            Some(Scalar::Decimal {
                value: -999,
                precision: 3,
                scale: 1
            })
        );
    }

    #[test]
    fn null_literal_is_nullable_and_typed() {
        let lit = Scalar::Null(DataType::Int32).encode();
        assert!(lit.nullable);
        assert_eq!(
            lit.literal_type,
            Some(LiteralType::Null(TypeNode::new(DataType::Int32, true).encode()))
        );
        assert!(!Scalar::I32(0).encode().nullable);
    }

    #[test]
    fn decimal_literal_is_sixteen_bytes() {
        let lit = Scalar::Decimal {
            value: 1,
            precision: 5,
            scale: 0,
        }
        .encode();
        match lit.literal_type {
            Some(LiteralType::Decimal(d)) => {
                assert_eq!(d.value.len(), 16);
                assert_eq!(d.value[0], 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
