//! Byte accumulator for BCS encoding

use crate::{Serializable, U256};

/// Accumulates BCS-encoded bytes.
///
/// Every operation appends to an internal buffer and cannot fail.
#[derive(Debug, Default, Clone)]
pub struct Serializer {
    buffer: Vec<u8>,
}

impl Serializer {
    /// Create an empty serializer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a serializer with `capacity` bytes preallocated
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Borrow the bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the serializer and return its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Append raw bytes with no length prefix.
    ///
    /// Used for fixed-size fields such as addresses and curve points.
    pub fn serialize_fixed_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Append a uleb128 length followed by the bytes
    pub fn serialize_bytes(&mut self, bytes: &[u8]) {
        self.serialize_len(bytes.len());
        self.buffer.extend_from_slice(bytes);
    }

    /// Append a length-prefixed UTF-8 string
    pub fn serialize_str(&mut self, value: &str) {
        self.serialize_bytes(value.as_bytes());
    }

    /// Append a boolean as a single 0/1 byte
    pub fn serialize_bool(&mut self, value: bool) {
        self.buffer.push(u8::from(value));
    }

    /// Append a single byte
    pub fn serialize_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Append a little-endian u16
    pub fn serialize_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Append a little-endian u32
    pub fn serialize_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Append a u64 as two u32 halves, low half first
    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize_u64(&mut self, value: u64) {
        self.serialize_u32(value as u32);
        self.serialize_u32((value >> 32) as u32);
    }

    /// Append a u128 as two u64 halves, low half first
    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize_u128(&mut self, value: u128) {
        self.serialize_u64(value as u64);
        self.serialize_u64((value >> 64) as u64);
    }

    /// Append a u256 as two u128 halves, low half first
    pub fn serialize_u256(&mut self, value: U256) {
        self.serialize_u128(value.low);
        self.serialize_u128(value.high);
    }

    /// Append `value` as unsigned LEB128.
    ///
    /// Seven bits per byte, least significant group first, high bit set on
    /// every byte except the last.
    pub fn serialize_u32_as_uleb128(&mut self, value: u32) {
        self.serialize_uleb128(u64::from(value));
    }

    /// Append a variant tag
    pub fn serialize_variant_index(&mut self, tag: u32) {
        self.serialize_u32_as_uleb128(tag);
    }

    /// Append a value through its [`Serializable`] implementation
    pub fn serialize<T: Serializable + ?Sized>(&mut self, value: &T) {
        value.serialize(self);
    }

    /// Append a length-prefixed sequence of values
    pub fn serialize_vector<T: Serializable>(&mut self, values: &[T]) {
        self.serialize_len(values.len());
        for value in values {
            value.serialize(self);
        }
    }

    /// Append a presence byte and, when present, the value
    pub fn serialize_option<T: Serializable>(&mut self, value: Option<&T>) {
        match value {
            Some(inner) => {
                self.serialize_bool(true);
                inner.serialize(self);
            }
            None => self.serialize_bool(false),
        }
    }

    /// Append an optional string
    pub fn serialize_option_str(&mut self, value: Option<&str>) {
        match value {
            Some(inner) => {
                self.serialize_bool(true);
                self.serialize_str(inner);
            }
            None => self.serialize_bool(false),
        }
    }

    /// Append an optional fixed-size byte block
    pub fn serialize_option_fixed_bytes(&mut self, value: Option<&[u8]>) {
        match value {
            Some(inner) => {
                self.serialize_bool(true);
                self.serialize_fixed_bytes(inner);
            }
            None => self.serialize_bool(false),
        }
    }

    fn serialize_len(&mut self, len: usize) {
        self.serialize_uleb128(len as u64);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn serialize_uleb128(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buffer.push((value & 0x7f) as u8 | 0x80);
            value >>= 7;
        }
        self.buffer.push(value as u8);
    }
}
