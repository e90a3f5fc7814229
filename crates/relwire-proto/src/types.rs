//! `substrait.Type` and friends.

use serde::Serialize;

use crate::wire::{self, Message, WireBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum Nullability {
    #[default]
    Unspecified = 0,
    Nullable = 1,
    Required = 2,
}

impl Nullability {
    pub fn from_nullable(nullable: bool) -> Self {
        if nullable {
            Nullability::Nullable
        } else {
            Nullability::Required
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Type {
    pub kind: Option<Kind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Kind {
    Bool(Primitive),
    I8(Primitive),
    I16(Primitive),
    I32(Primitive),
    I64(Primitive),
    Fp32(Primitive),
    Fp64(Primitive),
    String(Primitive),
    Binary(Primitive),
    Timestamp(Primitive),
    Date(Primitive),
    Decimal(Decimal),
    Struct(Struct),
}

/// Body shared by every parameterless type (`Type.Boolean`, `Type.I32`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Primitive {
    pub type_variation_reference: u32,
    pub nullability: Nullability,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Decimal {
    pub scale: i32,
    pub precision: i32,
    pub type_variation_reference: u32,
    pub nullability: Nullability,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Struct {
    pub types: Vec<Type>,
    pub type_variation_reference: u32,
    pub nullability: Nullability,
}

/// Column names in depth-first order plus the struct type they label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NamedStruct {
    pub names: Vec<String>,
    pub r#struct: Option<Struct>,
}

impl Message for Type {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        let Some(kind) = &self.kind else {
            return;
        };
        match kind {
            Kind::Bool(p) => wire::message(1, p, buf),
            Kind::I8(p) => wire::message(2, p, buf),
            Kind::I16(p) => wire::message(3, p, buf),
            Kind::I32(p) => wire::message(5, p, buf),
            Kind::I64(p) => wire::message(7, p, buf),
            Kind::Fp32(p) => wire::message(10, p, buf),
            Kind::Fp64(p) => wire::message(11, p, buf),
            Kind::String(p) => wire::message(12, p, buf),
            Kind::Binary(p) => wire::message(13, p, buf),
            Kind::Timestamp(p) => wire::message(14, p, buf),
            Kind::Date(p) => wire::message(16, p, buf),
            Kind::Decimal(d) => wire::message(24, d, buf),
            Kind::Struct(s) => wire::message(25, s, buf),
        }
    }
}

impl Message for Primitive {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        if self.type_variation_reference != 0 {
            wire::uint32(1, self.type_variation_reference, buf);
        }
        if self.nullability != Nullability::Unspecified {
            wire::enumeration(2, self.nullability as i32, buf);
        }
    }
}

impl Message for Decimal {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        if self.scale != 0 {
            wire::int32(1, self.scale, buf);
        }
        if self.precision != 0 {
            wire::int32(2, self.precision, buf);
        }
        if self.type_variation_reference != 0 {
            wire::uint32(3, self.type_variation_reference, buf);
        }
        if self.nullability != Nullability::Unspecified {
            wire::enumeration(4, self.nullability as i32, buf);
        }
    }
}

impl Message for Struct {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::repeated_message(1, &self.types, buf);
        if self.type_variation_reference != 0 {
            wire::uint32(2, self.type_variation_reference, buf);
        }
        if self.nullability != Nullability::Unspecified {
            wire::enumeration(3, self.nullability as i32, buf);
        }
    }
}

impl Message for NamedStruct {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::repeated_string(1, &self.names, buf);
        wire::optional_message(2, self.r#struct.as_ref(), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_i64_layout() {
        let t = Type {
            kind: Some(Kind::I64(Primitive {
                type_variation_reference: 0,
                nullability: Nullability::Required,
            })),
        };
        // field 7, len 2, { nullability = 2 }
        assert_eq!(t.encode_to_vec(), vec![0x3a, 0x02, 0x10, 0x02]);
    }

    #[test]
    fn unspecified_primitive_is_still_present() {
        let t = Type {
            kind: Some(Kind::Bool(Primitive::default())),
        };
        assert_eq!(t.encode_to_vec(), vec![0x0a, 0x00]);
    }

    #[test]
    fn named_struct_writes_names_then_struct() {
        let ns = NamedStruct {
            names: vec!["a".into()],
            r#struct: Some(Struct {
                types: vec![],
                type_variation_reference: 0,
                nullability: Nullability::Required,
            }),
        };
        assert_eq!(
            ns.encode_to_vec(),
            vec![0x0a, 0x01, b'a', 0x12, 0x02, 0x18, 0x02]
        );
    }
}
