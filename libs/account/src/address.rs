//! Account addresses
//!
//! Addresses are 32 bytes. Textual form follows AIP-40: "special" addresses
//! (first 31 bytes zero, last byte below 0x10) print as `0x` plus one hex
//! digit, everything else prints as `0x` plus 64 hex digits.

use crate::auth_key::Scheme;
use movekey_bcs::{Deserializable, Deserializer, Serializable, Serializer};
use serde::{Deserialize, Deserializer as SerdeDeserializer, Serialize, Serializer as SerdeSerializer};
use sha3::{Digest, Sha3_256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Address parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Strict parsing requires a `0x` prefix
    #[error("Hex string must start with a leading 0x")]
    LeadingZeroXRequired,

    /// No hex digits after the optional prefix
    #[error("Hex string is too short, must be 1 to 64 chars long, excluding the leading 0x")]
    TooShort,

    /// More than 64 hex digits
    #[error("Hex string is too long, must be 1 to 64 chars long, excluding the leading 0x")]
    TooLong,

    /// Non-hex characters
    #[error("Hex characters are invalid: {0}")]
    InvalidHexChars(String),

    /// Strict parsing saw a short form for a non-special address
    #[error("Hex string is not a special address and must be 64 chars long: {0}")]
    InvalidPaddingZeroes(String),

    /// Authentication function reference was not `address::module::function`
    #[error("Invalid function info: {0}")]
    InvalidFunctionInfo(String),

    /// Byte slice was not 32 bytes
    #[error("Invalid address length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },
}

/// Result type for address operations
pub type Result<T> = std::result::Result<T, AddressError>;

/// A 32-byte account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountAddress([u8; 32]);

impl AccountAddress {
    /// Size of an address in bytes
    pub const LENGTH: usize = 32;

    /// Length of the long textual form, without prefix
    pub const LONG_STRING_LENGTH: usize = 64;

    /// `0x0`
    pub const ZERO: Self = Self::from_last_byte(0);
    /// `0x1`, the framework address
    pub const ONE: Self = Self::from_last_byte(1);
    /// `0x3`
    pub const THREE: Self = Self::from_last_byte(3);
    /// `0x4`
    pub const FOUR: Self = Self::from_last_byte(4);

    const fn from_last_byte(byte: u8) -> Self {
        let mut bytes = [0u8; Self::LENGTH];
        bytes[Self::LENGTH - 1] = byte;
        Self(bytes)
    }

    /// Wrap 32 raw bytes
    pub const fn new(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }

    /// Build from a slice that must be exactly 32 bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let array: [u8; Self::LENGTH] =
            bytes.try_into().map_err(|_| AddressError::InvalidLength {
                expected: Self::LENGTH,
                actual: bytes.len(),
            })?;
        Ok(Self(array))
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }

    /// Whether this is a special address (`0x0` through `0xf`)
    pub fn is_special(&self) -> bool {
        self.0[..Self::LENGTH - 1].iter().all(|b| *b == 0) && self.0[Self::LENGTH - 1] < 0x10
    }

    /// Always the 64-digit form with `0x` prefix
    pub fn to_string_long(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Hex without leading zeros and without prefix; `"0"` for the zero address
    pub fn to_string_short_without_prefix(&self) -> String {
        let full = hex::encode(self.0);
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Parse following AIP-40 strictly.
    ///
    /// Requires `0x`. Accepts the 64-digit long form for any address and the
    /// single-digit short form only for special addresses.
    pub fn from_str_strict(input: &str) -> Result<Self> {
        if !input.starts_with("0x") {
            return Err(AddressError::LeadingZeroXRequired);
        }
        let address = Self::from_str_relaxed(input)?;
        let digits = input.len() - 2;
        if digits == Self::LONG_STRING_LENGTH || (address.is_special() && digits == 1) {
            Ok(address)
        } else {
            Err(AddressError::InvalidPaddingZeroes(input.to_string()))
        }
    }

    /// Parse with an optional `0x` and any number of digits up to 64.
    ///
    /// Short input is left-padded with zeros.
    pub fn from_str_relaxed(input: &str) -> Result<Self> {
        let digits = input.strip_prefix("0x").unwrap_or(input);
        if digits.is_empty() {
            return Err(AddressError::TooShort);
        }
        if digits.len() > Self::LONG_STRING_LENGTH {
            return Err(AddressError::TooLong);
        }
        let padded = format!("{digits:0>64}");
        let bytes =
            hex::decode(&padded).map_err(|_| AddressError::InvalidHexChars(input.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Address of an object created from `creator` with `seed`
    pub fn create_object_address(creator: &AccountAddress, seed: &[u8]) -> Self {
        Self::derive_with_seed(creator, seed, Scheme::DeriveObjectAddressFromSeed)
    }

    /// Address of a resource account created from `creator` with `seed`
    pub fn create_resource_address(creator: &AccountAddress, seed: &[u8]) -> Self {
        Self::derive_with_seed(creator, seed, Scheme::DeriveResourceAccountAddress)
    }

    fn derive_with_seed(creator: &AccountAddress, seed: &[u8], scheme: Scheme) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(creator.as_bytes());
        hasher.update(seed);
        hasher.update([scheme.tag()]);
        Self(hasher.finalize().into())
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_special() {
            write!(f, "0x{}", self.to_string_short_without_prefix())
        } else {
            write!(f, "{}", self.to_string_long())
        }
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({self})")
    }
}

impl FromStr for AccountAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_relaxed(s)
    }
}

impl From<[u8; 32]> for AccountAddress {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serializable for AccountAddress {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_fixed_bytes(&self.0);
    }
}

impl Deserializable for AccountAddress {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        Ok(Self(deserializer.deserialize_fixed_array()?))
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: SerdeSerializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: SerdeDeserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = <String as Deserialize>::deserialize(deserializer)?;
        Self::from_str_relaxed(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_short_and_long_forms_agree() {
        let short: AccountAddress = "0x1".parse().unwrap();
        let long: AccountAddress =
            "0x0000000000000000000000000000000000000000000000000000000000000001"
                .parse()
                .unwrap();
        assert_eq!(short, long);
        assert_eq!(short, AccountAddress::ONE);
        assert_eq!(short.to_string(), "0x1");
        assert_eq!(long.to_string(), "0x1");
    }

    #[test]
    fn test_non_special_prints_long() {
        let addr: AccountAddress = "0x10".parse().unwrap();
        assert!(!addr.is_special());
        assert_eq!(
            addr.to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000000010"
        );
        assert_eq!(addr.to_string_short_without_prefix(), "10");
    }

    #[test]
    fn test_zero_and_f_are_special() {
        assert_eq!(AccountAddress::ZERO.to_string(), "0x0");
        let f: AccountAddress = "f".parse().unwrap();
        assert!(f.is_special());
        assert_eq!(f.to_string(), "0xf");
    }

    #[test]
    fn test_strict_parsing() {
        assert_eq!(
            AccountAddress::from_str_strict("1"),
            Err(AddressError::LeadingZeroXRequired)
        );
        assert_eq!(
            AccountAddress::from_str_strict("0x1").unwrap(),
            AccountAddress::ONE
        );
        assert!(matches!(
            AccountAddress::from_str_strict("0x01"),
            Err(AddressError::InvalidPaddingZeroes(_))
        ));
        assert!(matches!(
            AccountAddress::from_str_strict("0xca843279e3427144cead5e4d5999a3d0"),
            Err(AddressError::InvalidPaddingZeroes(_))
        ));
        assert!(
            AccountAddress::from_str_strict(
                "0x0000000000000000000000000000000000000000000000000000000000000001"
            )
            .is_ok()
        );
    }

    #[test]
    fn test_relaxed_errors() {
        assert_eq!(AccountAddress::from_str_relaxed("0x"), Err(AddressError::TooShort));
        assert_eq!(
            AccountAddress::from_str_relaxed(&"1".repeat(65)),
            Err(AddressError::TooLong)
        );
        assert!(matches!(
            AccountAddress::from_str_relaxed("0xzz"),
            Err(AddressError::InvalidHexChars(_))
        ));
    }

    #[test]
    fn test_from_bytes_length() {
        assert_eq!(
            AccountAddress::from_bytes(&[0u8; 31]),
            Err(AddressError::InvalidLength {
                expected: 32,
                actual: 31
            })
        );
    }

    #[test]
    fn test_bcs_is_fixed_32_bytes() {
        let bytes = movekey_bcs::to_bytes(&AccountAddress::ONE);
        assert_eq!(bytes.len(), 32);
        assert_eq!(
            movekey_bcs::from_bytes::<AccountAddress>(&bytes).unwrap(),
            AccountAddress::ONE
        );
    }

    #[test]
    fn test_object_and_resource_addresses_differ() {
        let creator = AccountAddress::ONE;
        let object = AccountAddress::create_object_address(&creator, b"seed");
        let resource = AccountAddress::create_resource_address(&creator, b"seed");
        assert_ne!(object, resource);
        assert_eq!(object, AccountAddress::create_object_address(&creator, b"seed"));
    }

    #[test]
    fn test_serde_uses_display_form() {
        let json = serde_json::to_string(&AccountAddress::ONE).unwrap();
        assert_eq!(json, "\"0x1\"");
        let back: AccountAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AccountAddress::ONE);
    }

    #[test]
    fn test_serde_accepts_relaxed_strings() {
        let parsed: AccountAddress = serde_json::from_str("\"0xa\"").unwrap();
        assert_eq!(parsed, AccountAddress::from_str_relaxed("0xa").unwrap());
        assert!(serde_json::from_str::<AccountAddress>("\"0xzz\"").is_err());
        assert!(serde_json::from_str::<AccountAddress>("1").is_err());
    }
}
