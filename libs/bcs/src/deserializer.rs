//! Cursor-based BCS decoding

use crate::{BcsError, Deserializable, Result, U256};

/// Decodes BCS data from an owned copy of the input.
///
/// The input is copied at construction so later changes to the caller's buffer
/// cannot affect decoding. The cursor only moves forward.
#[derive(Debug, Clone)]
pub struct Deserializer {
    buffer: Vec<u8>,
    offset: usize,
}

impl Deserializer {
    /// Create a deserializer over a copy of `data`
    pub fn new(data: &[u8]) -> Self {
        Self {
            buffer: data.to_vec(),
            offset: 0,
        }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.offset
    }

    /// Fail with [`BcsError::TrailingBytes`] unless the input is fully consumed
    pub fn finish(&self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(BcsError::TrailingBytes(n)),
        }
    }

    fn read(&mut self, len: usize) -> Result<&[u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(BcsError::BufferUnderrun {
                needed: len,
                remaining,
            });
        }
        let start = self.offset;
        self.offset += len;
        Ok(&self.buffer[start..self.offset])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }

    /// Read `len` raw bytes with no length prefix
    pub fn deserialize_fixed_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        Ok(self.read(len)?.to_vec())
    }

    /// Read exactly `N` raw bytes into an array
    pub fn deserialize_fixed_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.read_array()
    }

    /// Read a uleb128 length followed by that many bytes
    pub fn deserialize_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.deserialize_uleb128_as_u32()? as usize;
        self.deserialize_fixed_bytes(len)
    }

    /// Read a length-prefixed UTF-8 string
    pub fn deserialize_str(&mut self) -> Result<String> {
        let bytes = self.deserialize_bytes()?;
        String::from_utf8(bytes).map_err(|e| BcsError::InvalidUtf8(e.to_string()))
    }

    /// Read a boolean, rejecting any byte other than 0 or 1
    pub fn deserialize_bool(&mut self) -> Result<bool> {
        match self.deserialize_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(BcsError::InvalidBoolean(other)),
        }
    }

    /// Read a single byte
    pub fn deserialize_u8(&mut self) -> Result<u8> {
        Ok(self.read(1)?[0])
    }

    /// Read a little-endian u16
    pub fn deserialize_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u32
    pub fn deserialize_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a u64 from two u32 halves, low half first
    pub fn deserialize_u64(&mut self) -> Result<u64> {
        let low = u64::from(self.deserialize_u32()?);
        let high = u64::from(self.deserialize_u32()?);
        Ok((high << 32) | low)
    }

    /// Read a u128 from two u64 halves, low half first
    pub fn deserialize_u128(&mut self) -> Result<u128> {
        let low = u128::from(self.deserialize_u64()?);
        let high = u128::from(self.deserialize_u64()?);
        Ok((high << 64) | low)
    }

    /// Read a u256 from two u128 halves, low half first
    pub fn deserialize_u256(&mut self) -> Result<U256> {
        let low = self.deserialize_u128()?;
        let high = self.deserialize_u128()?;
        Ok(U256 { low, high })
    }

    /// Read an unsigned LEB128 value that must fit in a u32
    pub fn deserialize_uleb128_as_u32(&mut self) -> Result<u32> {
        let mut value: u64 = 0;
        let mut shift = 0u32;
        loop {
            let byte = self.deserialize_u8()?;
            value |= u64::from(byte & 0x7f) << shift;
            if value > u64::from(u32::MAX) {
                return Err(BcsError::Uleb128Overflow);
            }
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
            if shift > 28 {
                return Err(BcsError::Uleb128Overflow);
            }
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(value as u32)
    }

    /// Read a variant tag
    pub fn deserialize_variant_index(&mut self) -> Result<u32> {
        self.deserialize_uleb128_as_u32()
    }

    /// Decode a value of a known type at the cursor
    pub fn deserialize<T: Deserializable>(&mut self) -> Result<T> {
        T::deserialize(self)
    }

    /// Decode a length-prefixed sequence of a known type
    pub fn deserialize_vector<T: Deserializable>(&mut self) -> Result<Vec<T>> {
        let len = self.deserialize_uleb128_as_u32()? as usize;
        // Each element takes at least one byte, so a length beyond the
        // remaining input can never decode.
        if len > self.remaining() {
            return Err(BcsError::BufferUnderrun {
                needed: len,
                remaining: self.remaining(),
            });
        }
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(T::deserialize(self)?);
        }
        Ok(values)
    }

    /// Decode a presence byte followed by an optional value
    pub fn deserialize_option<T: Deserializable>(&mut self) -> Result<Option<T>> {
        if self.deserialize_bool()? {
            Ok(Some(T::deserialize(self)?))
        } else {
            Ok(None)
        }
    }

    /// Decode an optional string
    pub fn deserialize_option_str(&mut self) -> Result<Option<String>> {
        if self.deserialize_bool()? {
            Ok(Some(self.deserialize_str()?))
        } else {
            Ok(None)
        }
    }

    /// Decode an optional fixed-size byte block
    pub fn deserialize_option_fixed_bytes(&mut self, len: usize) -> Result<Option<Vec<u8>>> {
        if self.deserialize_bool()? {
            Ok(Some(self.deserialize_fixed_bytes(len)?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uleb128_300() {
        let mut de = Deserializer::new(&[0xac, 0x02]);
        assert_eq!(de.deserialize_uleb128_as_u32().unwrap(), 300);
        assert_eq!(de.remaining(), 0);
    }

    #[test]
    fn test_uleb128_max_and_overflow() {
        let mut de = Deserializer::new(&[0xff, 0xff, 0xff, 0xff, 0x0f]);
        assert_eq!(de.deserialize_uleb128_as_u32().unwrap(), u32::MAX);

        let mut de = Deserializer::new(&[0xff, 0xff, 0xff, 0xff, 0x1f]);
        assert_eq!(
            de.deserialize_uleb128_as_u32(),
            Err(BcsError::Uleb128Overflow)
        );

        // Six continuation bytes can never fit
        let mut de = Deserializer::new(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x00]);
        assert_eq!(
            de.deserialize_uleb128_as_u32(),
            Err(BcsError::Uleb128Overflow)
        );
    }

    #[test]
    fn test_uleb128_truncated() {
        let mut de = Deserializer::new(&[0x80]);
        assert!(matches!(
            de.deserialize_uleb128_as_u32(),
            Err(BcsError::BufferUnderrun { .. })
        ));
    }

    #[test]
    fn test_invalid_boolean() {
        let mut de = Deserializer::new(&[0x02]);
        assert_eq!(de.deserialize_bool(), Err(BcsError::InvalidBoolean(2)));
    }

    #[test]
    fn test_buffer_underrun_reports_sizes() {
        let mut de = Deserializer::new(&[0x01, 0x02, 0x03]);
        assert_eq!(
            de.deserialize_u32(),
            Err(BcsError::BufferUnderrun {
                needed: 4,
                remaining: 3
            })
        );
    }

    #[test]
    fn test_u64_fixed_vector() {
        let value: u64 = 1_311_768_467_750_121_216;
        let mut de = Deserializer::new(&value.to_le_bytes());
        assert_eq!(de.deserialize_u64().unwrap(), value);
    }

    #[test]
    fn test_input_is_copied() {
        let mut data = vec![0x01, 0x00];
        let mut de = Deserializer::new(&data);
        data[0] = 0x07;
        assert_eq!(de.deserialize_u16().unwrap(), 1);
    }

    #[test]
    fn test_vector_length_beyond_input() {
        let mut de = Deserializer::new(&[0x05, 0x01]);
        assert!(matches!(
            de.deserialize_vector::<u8>(),
            Err(BcsError::BufferUnderrun { .. })
        ));
    }

    #[test]
    fn test_finish_rejects_trailing() {
        let mut de = Deserializer::new(&[0x01, 0x02]);
        de.deserialize_u8().unwrap();
        assert_eq!(de.finish(), Err(BcsError::TrailingBytes(1)));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut de = Deserializer::new(&[0x02, 0xc3, 0x28]);
        assert!(matches!(
            de.deserialize_str(),
            Err(BcsError::InvalidUtf8(_))
        ));
    }
}
