//! Key, signature and proof primitives
//!
//! Concrete curves live in [`ed25519`] and [`secp256k1`]. [`single_key`] wraps
//! them (and keyless keys) in the tagged `AnyPublicKey` / `AnySignature`
//! unions, [`multi_ed25519`] and [`multi_key`] aggregate them behind a
//! [`bitmap`], and [`keyless`], [`poseidon`] and [`groth16`] cover the
//! zero-knowledge side.

pub mod bitmap;
pub mod ed25519;
pub mod ephemeral;
pub mod groth16;
pub mod keyless;
pub mod multi_ed25519;
pub mod multi_key;
pub mod poseidon;
pub mod private_key;
pub mod secp256k1;
pub mod single_key;

use movekey_bcs::BcsError;
use sha3::{Digest, Sha3_256};
use thiserror::Error;

/// Cryptographic errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Key bytes had the wrong length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Signature bytes had the wrong length
    #[error("Invalid signature length: expected {expected}, got {actual}")]
    InvalidSignatureLength {
        /// Expected signature length in bytes
        expected: usize,
        /// Actual signature length in bytes
        actual: usize,
    },

    /// Bytes did not decode to a public key
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Bytes did not decode to a private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Hex input could not be decoded
    #[error("Invalid hex input: {0}")]
    InvalidHex(String),

    /// Randomness source failed
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    /// Signing primitive failed
    #[error("Signing failed: {0}")]
    Signing(String),

    /// A tag is reserved but this library cannot decode it
    #[error("Unsupported {type_name} variant: {tag}")]
    UnsupportedVariant {
        /// Name of the tagged union
        type_name: &'static str,
        /// Offending tag
        tag: u32,
    },

    /// `MultiKey::get_index` found no matching key
    #[error("Public key not found in multi-key")]
    KeyNotFound,

    /// A bitmap index appeared twice
    #[error("Duplicate bit {0} in bitmap")]
    DuplicateBit(u8),

    /// Bitmap indices were not strictly ascending
    #[error("Bitmap indices must be sorted in ascending order")]
    UnsortedBits,

    /// Bitmap index beyond the 32 supported participants
    #[error("Bitmap index {0} out of range, must be below 32")]
    IndexOutOfRange(usize),

    /// Number of set bits differs from the number of signatures
    #[error("Bitmap has {bits} bits set but {signatures} signatures were provided")]
    BitmapMismatch {
        /// Set bits in the bitmap
        bits: usize,
        /// Signatures present
        signatures: usize,
    },

    /// Threshold of 0 or larger than the key count
    #[error("Invalid threshold {threshold} for {keys} keys")]
    InvalidThreshold {
        /// Required signatures
        threshold: usize,
        /// Available keys
        keys: usize,
    },

    /// More keys than a bitmap can address
    #[error("Too many keys: {0}, maximum is 32")]
    TooManyKeys(usize),

    /// Poseidon input or parameter failure
    #[error("Poseidon error: {0}")]
    Poseidon(String),

    /// Curve point or pairing check failure
    #[error("Groth16 error: {0}")]
    Groth16(String),

    /// Keyless identity inputs were malformed
    #[error("Invalid keyless input: {0}")]
    InvalidKeyless(String),

    /// Codec failure
    #[error("Serialization error: {0}")]
    Bcs(#[from] BcsError),
}

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, CryptoError>;

/// SHA3-256 of `data`
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    Sha3_256::digest(data).into()
}

/// Decode hex with or without a `0x` prefix
pub fn decode_hex(input: &str) -> Result<Vec<u8>> {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(digits).map_err(|e| CryptoError::InvalidHex(format!("{input}: {e}")))
}

/// Copy `bytes` into a fixed-size array, reporting a key length error otherwise
pub(crate) fn key_array<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
        expected: N,
        actual: bytes.len(),
    })
}

/// Copy `bytes` into a fixed-size array, reporting a signature length error otherwise
pub(crate) fn signature_array<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidSignatureLength {
            expected: N,
            actual: bytes.len(),
        })
}

/// Fill a buffer from the operating system's randomness source
pub(crate) fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut out = [0u8; N];
    getrandom::fill(&mut out).map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
    Ok(out)
}

/// Map a crypto-level failure into a codec error during decoding
pub(crate) fn to_bcs_error(type_name: &'static str, err: &CryptoError) -> BcsError {
    match err {
        CryptoError::Bcs(inner) => inner.clone(),
        CryptoError::UnsupportedVariant { type_name, tag } => {
            BcsError::unsupported_variant(type_name, *tag)
        }
        other => BcsError::invalid_value(type_name, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha3_256_empty() {
        assert_eq!(
            hex::encode(sha3_256(b"")),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn test_decode_hex_prefix_optional() {
        assert_eq!(decode_hex("0x0102").unwrap(), vec![1, 2]);
        assert_eq!(decode_hex("0102").unwrap(), vec![1, 2]);
        assert!(matches!(decode_hex("0xg1"), Err(CryptoError::InvalidHex(_))));
    }

    #[test]
    fn test_key_array_reports_lengths() {
        assert_eq!(
            key_array::<32>(&[0u8; 5]),
            Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual: 5
            })
        );
    }
}
