#![forbid(unsafe_code)]
//! relwire-proto: the interchange message schema (Substrait algebra subset)
//! and a protobuf wire writer.
//!
//! Messages are plain structs with public fields and `Default`; build them
//! with struct literals (`FilterRel { common: .., ..Default::default() }`),
//! which is the per-message builder interface. Oneofs are modeled as
//! `Option<enum>`; recursive message fields are boxed.
//!
//! Field numbers and enum values follow the published Substrait protos, so
//! the bytes produced by [`Message::encode_to_vec`] are readable by any
//! Substrait consumer. There is no decoder here.

pub mod expr;
pub mod plan;
pub mod rel;
pub mod types;
pub mod wire;

pub use expr::Expression;
pub use plan::Plan;
pub use rel::{Rel, RelCommon, RelType};
pub use types::Type;
pub use wire::{Message, WireBuf};
