//! `substrait.Expression` subset: literals, field references, scalar
//! functions, casts, if/then and singular or-lists.

use serde::Serialize;

use crate::types::Type;
use crate::wire::{self, Empty, Message, WireBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Expression {
    pub rex_type: Option<RexType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RexType {
    Literal(Literal),
    Selection(Box<FieldReference>),
    ScalarFunction(ScalarFunction),
    IfThen(Box<IfThen>),
    SingularOrList(Box<SingularOrList>),
    Cast(Box<Cast>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Literal {
    pub nullable: bool,
    pub type_variation_reference: u32,
    pub literal_type: Option<LiteralType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LiteralType {
    Boolean(bool),
    I8(i32),
    I16(i32),
    I32(i32),
    I64(i64),
    Fp32(f32),
    Fp64(f64),
    String(String),
    Binary(Vec<u8>),
    /// Microseconds since the epoch.
    Timestamp(i64),
    /// Days since the epoch.
    Date(i32),
    Decimal(DecimalLiteral),
    /// Typed null.
    Null(Type),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecimalLiteral {
    /// 16-byte little-endian two's complement.
    pub value: Vec<u8>,
    pub precision: i32,
    pub scale: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldReference {
    pub reference_type: Option<ReferenceType>,
    pub root_type: Option<RootType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReferenceType {
    DirectReference(ReferenceSegment),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RootType {
    /// Reference into the incoming record of the enclosing operator.
    RootReference(Empty),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceSegment {
    pub reference_type: Option<SegmentType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SegmentType {
    StructField(Box<StructField>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructField {
    pub field: i32,
    pub child: Option<ReferenceSegment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FunctionArgument {
    pub arg_type: Option<ArgType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ArgType {
    Value(Expression),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScalarFunction {
    pub function_reference: u32,
    pub arguments: Vec<FunctionArgument>,
    pub output_type: Option<Type>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum FailureBehavior {
    #[default]
    Unspecified = 0,
    ReturnNull = 1,
    ThrowException = 2,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cast {
    pub r#type: Option<Type>,
    pub input: Option<Expression>,
    pub failure_behavior: FailureBehavior,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IfClause {
    pub r#if: Option<Expression>,
    pub then: Option<Expression>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IfThen {
    pub ifs: Vec<IfClause>,
    pub r#else: Option<Expression>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SingularOrList {
    pub value: Option<Expression>,
    pub options: Vec<Expression>,
}

impl Message for Expression {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        let Some(rex) = &self.rex_type else {
            return;
        };
        match rex {
            RexType::Literal(l) => wire::message(1, l, buf),
            RexType::Selection(f) => wire::message(2, f, buf),
            RexType::ScalarFunction(f) => wire::message(3, f, buf),
            RexType::IfThen(i) => wire::message(6, i, buf),
            RexType::SingularOrList(s) => wire::message(8, s, buf),
            RexType::Cast(c) => wire::message(11, c, buf),
        }
    }
}

impl Message for Literal {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        if let Some(lit) = &self.literal_type {
            // oneof members are always written, zero or not
            match lit {
                LiteralType::Boolean(v) => wire::bool(1, *v, buf),
                LiteralType::I8(v) => wire::int32(2, *v, buf),
                LiteralType::I16(v) => wire::int32(3, *v, buf),
                LiteralType::I32(v) => wire::int32(5, *v, buf),
                LiteralType::I64(v) => wire::int64(7, *v, buf),
                LiteralType::Fp32(v) => wire::float(10, *v, buf),
                LiteralType::Fp64(v) => wire::double(11, *v, buf),
                LiteralType::String(v) => wire::string(12, v, buf),
                LiteralType::Binary(v) => wire::bytes(13, v, buf),
                LiteralType::Timestamp(v) => wire::int64(14, *v, buf),
                LiteralType::Date(v) => wire::int32(16, *v, buf),
                LiteralType::Decimal(d) => wire::message(24, d, buf),
                LiteralType::Null(t) => wire::message(29, t, buf),
            }
        }
        if self.nullable {
            wire::bool(50, true, buf);
        }
        if self.type_variation_reference != 0 {
            wire::uint32(51, self.type_variation_reference, buf);
        }
    }
}

impl Message for DecimalLiteral {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        if !self.value.is_empty() {
            wire::bytes(1, &self.value, buf);
        }
        if self.precision != 0 {
            wire::int32(2, self.precision, buf);
        }
        if self.scale != 0 {
            wire::int32(3, self.scale, buf);
        }
    }
}

impl Message for FieldReference {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        if let Some(ReferenceType::DirectReference(seg)) = &self.reference_type {
            wire::message(1, seg, buf);
        }
        if let Some(RootType::RootReference(root)) = &self.root_type {
            wire::message(4, root, buf);
        }
    }
}

impl Message for ReferenceSegment {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        if let Some(SegmentType::StructField(sf)) = &self.reference_type {
            wire::message(2, sf, buf);
        }
    }
}

impl Message for StructField {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        if self.field != 0 {
            wire::int32(1, self.field, buf);
        }
        wire::optional_message(2, self.child.as_ref(), buf);
    }
}

impl Message for FunctionArgument {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        if let Some(ArgType::Value(e)) = &self.arg_type {
            wire::message(3, e, buf);
        }
    }
}

impl Message for ScalarFunction {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        if self.function_reference != 0 {
            wire::uint32(1, self.function_reference, buf);
        }
        wire::optional_message(3, self.output_type.as_ref(), buf);
        wire::repeated_message(4, &self.arguments, buf);
    }
}

impl Message for Cast {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::optional_message(1, self.r#type.as_ref(), buf);
        wire::optional_message(2, self.input.as_ref(), buf);
        if self.failure_behavior != FailureBehavior::Unspecified {
            wire::enumeration(3, self.failure_behavior as i32, buf);
        }
    }
}

impl Message for IfClause {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::optional_message(1, self.r#if.as_ref(), buf);
        wire::optional_message(2, self.then.as_ref(), buf);
    }
}

impl Message for IfThen {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::repeated_message(1, &self.ifs, buf);
        wire::optional_message(2, self.r#else.as_ref(), buf);
    }
}

impl Message for SingularOrList {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::optional_message(1, self.value.as_ref(), buf);
        wire::repeated_message(2, &self.options, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(l: LiteralType) -> Expression {
        Expression {
            rex_type: Some(RexType::Literal(Literal {
                literal_type: Some(l),
                ..Default::default()
            })),
        }
    }

    #[test]
    fn false_literal_is_written() {
        // Expression.literal { boolean: false }
        assert_eq!(
            lit(LiteralType::Boolean(false)).encode_to_vec(),
            vec![0x0a, 0x02, 0x08, 0x00]
        );
    }

    #[test]
    fn field_zero_reference() {
        let e = Expression {
            rex_type: Some(RexType::Selection(Box::new(FieldReference {
                reference_type: Some(ReferenceType::DirectReference(ReferenceSegment {
                    reference_type: Some(SegmentType::StructField(Box::default())),
                })),
                root_type: Some(RootType::RootReference(Empty {})),
            }))),
        };
        // selection { direct_reference { struct_field {} } root_reference {} }
        assert_eq!(
            e.encode_to_vec(),
            vec![0x12, 0x06, 0x0a, 0x02, 0x12, 0x00, 0x22, 0x00]
        );
    }

    #[test]
    fn cast_carries_input_and_type() {
        let c = Cast {
            r#type: Some(Type::default()),
            input: Some(lit(LiteralType::I32(7))),
            failure_behavior: FailureBehavior::ThrowException,
        };
        assert_eq!(
            c.encode_to_vec(),
            vec![0x0a, 0x00, 0x12, 0x04, 0x0a, 0x02, 0x28, 0x07, 0x18, 0x02]
        );
    }
}
