//! Field references: positional columns of the input record.

use relwire_core::error::{Error, Result};
use relwire_proto::expr::{
    FieldReference as FieldReferenceMsg, ReferenceSegment, ReferenceType, RootType, SegmentType,
    StructField,
};
use relwire_proto::wire::Empty;

/// Direct reference to a top-level column of the input record, by ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldReference {
    ordinal: i32,
}

impl FieldReference {
    pub fn new(ordinal: usize) -> Result<Self> {
        let ordinal = i32::try_from(ordinal).map_err(|_| {
            Error::malformed_expr("field_reference", format!("ordinal {ordinal} out of range"))
        })?;
        Ok(Self { ordinal })
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal as usize
    }

    pub fn encode(&self) -> FieldReferenceMsg {
        FieldReferenceMsg {
            reference_type: Some(ReferenceType::DirectReference(ReferenceSegment {
                reference_type: Some(SegmentType::StructField(Box::new(StructField {
                    field: self.ordinal,
                    child: None,
                }))),
            })),
            root_type: Some(RootType::RootReference(Empty {})),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_round_trips_into_struct_field() {
        let f = FieldReference::new(3).unwrap();
        assert_eq!(f.ordinal(), 3);
        let msg = f.encode();
        let Some(ReferenceType::DirectReference(seg)) = msg.reference_type else {
            panic!("expected direct reference");
        };
        let Some(SegmentType::StructField(sf)) = seg.reference_type else {
            panic!("expected struct field");
        };
        assert_eq!(sf.field, 3);
        assert!(matches!(msg.root_type, Some(RootType::RootReference(_))));
    }

    #[test]
    fn huge_ordinal_rejected() {
        let err = FieldReference::new(usize::MAX).unwrap_err();
        assert!(matches!(err, Error::MalformedExpression { .. }));
    }
}
