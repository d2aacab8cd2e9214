//! 256-bit unsigned integer carrier

use num_bigint::BigUint;
use std::fmt;

/// 256-bit unsigned integer stored as two `u128` halves.
///
/// Only carries the value through the codec; arithmetic goes through
/// [`BigUint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U256 {
    /// Least significant 128 bits
    pub low: u128,
    /// Most significant 128 bits
    pub high: u128,
}

impl U256 {
    /// Zero
    pub const ZERO: Self = Self { low: 0, high: 0 };

    /// 2^256 - 1
    pub const MAX: Self = Self {
        low: u128::MAX,
        high: u128::MAX,
    };

    /// Build from 32 little-endian bytes
    pub fn from_le_bytes(bytes: [u8; 32]) -> Self {
        let mut low = [0u8; 16];
        let mut high = [0u8; 16];
        low.copy_from_slice(&bytes[..16]);
        high.copy_from_slice(&bytes[16..]);
        Self {
            low: u128::from_le_bytes(low),
            high: u128::from_le_bytes(high),
        }
    }

    /// Little-endian byte representation
    pub fn to_le_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out[..16].copy_from_slice(&self.low.to_le_bytes());
        out[16..].copy_from_slice(&self.high.to_le_bytes());
        out
    }

    /// Convert from a [`BigUint`], returning `None` if it needs more than 256 bits
    pub fn from_biguint(value: &BigUint) -> Option<Self> {
        let bytes = value.to_bytes_le();
        if bytes.len() > 32 {
            return None;
        }
        let mut padded = [0u8; 32];
        padded[..bytes.len()].copy_from_slice(&bytes);
        Some(Self::from_le_bytes(padded))
    }

    /// Convert to a [`BigUint`]
    pub fn to_biguint(self) -> BigUint {
        BigUint::from_bytes_le(&self.to_le_bytes())
    }
}

impl From<u128> for U256 {
    fn from(low: u128) -> Self {
        Self { low, high: 0 }
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}
