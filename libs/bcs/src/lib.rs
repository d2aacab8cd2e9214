//! Binary Canonical Serialization (BCS) for Move-based chains
//!
//! BCS is the deterministic encoding every on-chain structure uses: integers
//! are little-endian and fixed width, lengths and enum tags are unsigned
//! LEB128 (capped at `u32::MAX`), and nothing is padded. Two encoders that
//! agree on a type's field order always agree on its bytes.
//!
//! # Example
//!
//! ```rust
//! use movekey_bcs::{Deserializer, Serializer};
//!
//! let mut ser = Serializer::new();
//! ser.serialize_u32_as_uleb128(300);
//! ser.serialize_str("move");
//! let bytes = ser.into_bytes();
//! assert_eq!(&bytes[..2], &[0xac, 0x02]);
//!
//! let mut de = Deserializer::new(&bytes);
//! assert_eq!(de.deserialize_uleb128_as_u32().unwrap(), 300);
//! assert_eq!(de.deserialize_str().unwrap(), "move");
//! ```

#![warn(missing_docs)]

mod deserializer;
mod error;
mod serializer;
mod u256;

pub use deserializer::Deserializer;
pub use error::{BcsError, Result};
pub use serializer::Serializer;
pub use u256::U256;

/// A type with a canonical BCS encoding
pub trait Serializable {
    /// Append this value's encoding to `serializer`
    fn serialize(&self, serializer: &mut Serializer);

    /// Encode this value into a fresh byte vector
    fn bcs_to_bytes(&self) -> Vec<u8> {
        let mut serializer = Serializer::new();
        self.serialize(&mut serializer);
        serializer.into_bytes()
    }
}

/// A type that can be decoded from its BCS encoding
pub trait Deserializable: Sized {
    /// Decode a value at the deserializer's cursor
    fn deserialize(deserializer: &mut Deserializer) -> Result<Self>;
}

/// Decode exactly one `T` from `bytes`, rejecting trailing input
pub fn from_bytes<T: Deserializable>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = Deserializer::new(bytes);
    let value = T::deserialize(&mut deserializer)?;
    deserializer.finish()?;
    Ok(value)
}

/// Encode `value` into a fresh byte vector
pub fn to_bytes<T: Serializable + ?Sized>(value: &T) -> Vec<u8> {
    value.bcs_to_bytes()
}

macro_rules! impl_primitive {
    ($ty:ty, $ser:ident, $de:ident) => {
        impl Serializable for $ty {
            fn serialize(&self, serializer: &mut Serializer) {
                serializer.$ser(*self);
            }
        }

        impl Deserializable for $ty {
            fn deserialize(deserializer: &mut Deserializer) -> Result<Self> {
                deserializer.$de()
            }
        }
    };
}

impl_primitive!(bool, serialize_bool, deserialize_bool);
impl_primitive!(u8, serialize_u8, deserialize_u8);
impl_primitive!(u16, serialize_u16, deserialize_u16);
impl_primitive!(u32, serialize_u32, deserialize_u32);
impl_primitive!(u64, serialize_u64, deserialize_u64);
impl_primitive!(u128, serialize_u128, deserialize_u128);
impl_primitive!(U256, serialize_u256, deserialize_u256);

impl Serializable for str {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_str(self);
    }
}

impl Serializable for String {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_str(self);
    }
}

impl Deserializable for String {
    fn deserialize(deserializer: &mut Deserializer) -> Result<Self> {
        deserializer.deserialize_str()
    }
}

impl<T: Serializable> Serializable for Vec<T> {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_vector(self);
    }
}

impl<T: Deserializable> Deserializable for Vec<T> {
    fn deserialize(deserializer: &mut Deserializer) -> Result<Self> {
        deserializer.deserialize_vector()
    }
}

impl<T: Serializable> Serializable for Option<T> {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_option(self.as_ref());
    }
}

impl<T: Deserializable> Deserializable for Option<T> {
    fn deserialize(deserializer: &mut Deserializer) -> Result<Self> {
        deserializer.deserialize_option()
    }
}
