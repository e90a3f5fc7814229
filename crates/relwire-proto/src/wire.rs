//! Protobuf wire writer.
//!
//! Pure, synchronous byte building into a `BytesMut`. Only the subset of the
//! wire format the interchange schema needs: varints, fixed32/fixed64 and
//! length-delimited fields.
//!
//! Presence rules are the caller's job: plain proto3 scalars are skipped when
//! zero, while message fields and oneof members are written whenever set,
//! even when empty.

use bytes::{BufMut, Bytes, BytesMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

/// Byte sink the field writers target: a real buffer or a length counter.
pub trait WireBuf {
    fn put_u8(&mut self, b: u8);
    fn put_slice(&mut self, s: &[u8]);
}

impl WireBuf for BytesMut {
    fn put_u8(&mut self, b: u8) {
        BufMut::put_u8(self, b);
    }

    fn put_slice(&mut self, s: &[u8]) {
        BufMut::put_slice(self, s);
    }
}

/// Counts bytes without storing them; backs `Message::encoded_len`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LenCounter(pub usize);

impl WireBuf for LenCounter {
    fn put_u8(&mut self, _b: u8) {
        self.0 += 1;
    }

    fn put_slice(&mut self, s: &[u8]) {
        self.0 += s.len();
    }
}

/// A message that knows how to write its own fields.
pub trait Message {
    /// Write this message's fields (without an outer key or length prefix).
    fn encode_raw<B: WireBuf>(&self, buf: &mut B);

    fn encoded_len(&self) -> usize {
        let mut counter = LenCounter::default();
        self.encode_raw(&mut counter);
        counter.0
    }

    fn encode_to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode_raw(&mut buf);
        buf.freeze()
    }

    fn encode_to_vec(&self) -> Vec<u8> {
        self.encode_to_bytes().to_vec()
    }
}

impl<M: Message + ?Sized> Message for Box<M> {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        (**self).encode_raw(buf)
    }
}

pub fn put_varint<B: WireBuf>(buf: &mut B, mut v: u64) {
    while v >= 0x80 {
        buf.put_u8((v as u8) | 0x80);
        v >>= 7;
    }
    buf.put_u8(v as u8);
}

pub fn put_key<B: WireBuf>(buf: &mut B, field: u32, wire_type: WireType) {
    put_varint(buf, (u64::from(field) << 3) | wire_type as u64);
}

pub fn uint64<B: WireBuf>(field: u32, v: u64, buf: &mut B) {
    put_key(buf, field, WireType::Varint);
    put_varint(buf, v);
}

pub fn uint32<B: WireBuf>(field: u32, v: u32, buf: &mut B) {
    uint64(field, u64::from(v), buf);
}

pub fn int64<B: WireBuf>(field: u32, v: i64, buf: &mut B) {
    uint64(field, v as u64, buf);
}

/// Negative int32 values are sign-extended to ten bytes, as protobuf does.
pub fn int32<B: WireBuf>(field: u32, v: i32, buf: &mut B) {
    uint64(field, i64::from(v) as u64, buf);
}

pub fn enumeration<B: WireBuf>(field: u32, v: i32, buf: &mut B) {
    int32(field, v, buf);
}

pub fn bool<B: WireBuf>(field: u32, v: bool, buf: &mut B) {
    uint64(field, u64::from(v), buf);
}

pub fn float<B: WireBuf>(field: u32, v: f32, buf: &mut B) {
    put_key(buf, field, WireType::Fixed32);
    buf.put_slice(&v.to_le_bytes());
}

pub fn double<B: WireBuf>(field: u32, v: f64, buf: &mut B) {
    put_key(buf, field, WireType::Fixed64);
    buf.put_slice(&v.to_le_bytes());
}

pub fn bytes<B: WireBuf>(field: u32, v: &[u8], buf: &mut B) {
    put_key(buf, field, WireType::LengthDelimited);
    put_varint(buf, v.len() as u64);
    buf.put_slice(v);
}

pub fn string<B: WireBuf>(field: u32, v: &str, buf: &mut B) {
    bytes(field, v.as_bytes(), buf);
}

/// Nested message: a counting pass sizes the prefix, then the body is written
/// straight into `buf`.
pub fn message<M: Message + ?Sized, B: WireBuf>(field: u32, msg: &M, buf: &mut B) {
    put_key(buf, field, WireType::LengthDelimited);
    put_varint(buf, msg.encoded_len() as u64);
    msg.encode_raw(buf);
}

pub fn optional_message<M: Message + ?Sized, B: WireBuf>(
    field: u32,
    msg: Option<&M>,
    buf: &mut B,
) {
    if let Some(m) = msg {
        message(field, m, buf);
    }
}

pub fn repeated_message<M: Message, B: WireBuf>(field: u32, msgs: &[M], buf: &mut B) {
    for m in msgs {
        message(field, m, buf);
    }
}

pub fn repeated_string<B: WireBuf>(field: u32, values: &[String], buf: &mut B) {
    for v in values {
        string(field, v, buf);
    }
}

/// Empty marker message (e.g. `RelCommon.Direct`): written as key + zero length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct Empty {}

impl Message for Empty {
    fn encode_raw<B: WireBuf>(&self, _buf: &mut B) {}
}
