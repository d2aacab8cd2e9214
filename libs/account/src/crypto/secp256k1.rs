//! Secp256k1 ECDSA keys and signatures
//!
//! Messages are hashed with SHA3-256 before signing. Signatures are 64-byte
//! compact `r ‖ s` with `s` normalized to the lower half of the curve order;
//! verification rejects high-`s` signatures.

use super::{CryptoError, Result, decode_hex, key_array, random_bytes, sha3_256, signature_array};
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use movekey_bcs::{Deserializable, Deserializer, Serializable, Serializer};
use std::fmt;

/// AIP-80 prefix for Secp256k1 private keys
pub const AIP80_PREFIX: &str = "secp256k1-priv-";

/// Secp256k1 private key (32-byte scalar)
#[derive(Clone)]
pub struct Secp256k1PrivateKey {
    key: SigningKey,
}

impl Secp256k1PrivateKey {
    /// Size in bytes
    pub const LENGTH: usize = 32;

    /// Generate a key from OS randomness
    pub fn generate() -> Result<Self> {
        // Rejection sampling: zero and values at or above the curve order are invalid scalars
        loop {
            let candidate = random_bytes::<32>()?;
            if let Ok(key) = Self::from_bytes(&candidate) {
                return Ok(key);
            }
        }
    }

    /// Build from a 32-byte big-endian scalar
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let array = key_array::<32>(bytes)?;
        let key = SigningKey::from_slice(&array)
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self { key })
    }

    /// Parse an AIP-80 string (`secp256k1-priv-0x…`) or bare hex
    pub fn from_aip80(input: &str) -> Result<Self> {
        let hex_part = match input.strip_prefix(AIP80_PREFIX) {
            Some(rest) => rest,
            None if input.contains("-priv-") => {
                return Err(CryptoError::InvalidPrivateKey(format!(
                    "expected {AIP80_PREFIX} prefix"
                )));
            }
            None => input,
        };
        Self::from_bytes(&decode_hex(hex_part)?)
    }

    /// AIP-80 string form
    pub fn to_aip80_string(&self) -> String {
        format!("{AIP80_PREFIX}0x{}", hex::encode(self.to_bytes()))
    }

    /// Raw scalar bytes
    pub fn to_bytes(&self) -> [u8; Self::LENGTH] {
        let mut out = [0u8; Self::LENGTH];
        out.copy_from_slice(&self.key.to_bytes());
        out
    }

    /// Matching public key
    pub fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey::from_verifying_key(self.key.verifying_key())
    }

    /// Sign `SHA3-256(message)`
    pub fn sign(&self, message: &[u8]) -> Result<Secp256k1Signature> {
        let digest = sha3_256(message);
        let signature: Signature = self
            .key
            .sign_prehash(&digest)
            .map_err(|e| CryptoError::Signing(e.to_string()))?;
        let signature = signature.normalize_s().unwrap_or(signature);
        let mut out = [0u8; Secp256k1Signature::LENGTH];
        out.copy_from_slice(&signature.to_bytes());
        Ok(Secp256k1Signature(out))
    }
}

impl fmt::Debug for Secp256k1PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secp256k1PrivateKey(<redacted>)")
    }
}

impl PartialEq for Secp256k1PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Secp256k1PrivateKey {}

impl Serializable for Secp256k1PrivateKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.to_bytes());
    }
}

impl Deserializable for Secp256k1PrivateKey {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        let bytes = deserializer.deserialize_bytes()?;
        Self::from_bytes(&bytes).map_err(|e| super::to_bcs_error("Secp256k1PrivateKey", &e))
    }
}

/// Secp256k1 public key, kept in 65-byte uncompressed SEC1 form
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Secp256k1PublicKey([u8; 65]);

impl Secp256k1PublicKey {
    /// Uncompressed size in bytes
    pub const LENGTH: usize = 65;

    /// Compressed SEC1 size in bytes
    pub const COMPRESSED_LENGTH: usize = 33;

    fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let mut out = [0u8; Self::LENGTH];
        out.copy_from_slice(point.as_bytes());
        Self(out)
    }

    /// Parse compressed (33 bytes) or uncompressed (65 bytes) SEC1
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::LENGTH && bytes.len() != Self::COMPRESSED_LENGTH {
            return Err(CryptoError::InvalidKeyLength {
                expected: Self::LENGTH,
                actual: bytes.len(),
            });
        }
        let key = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        Ok(Self::from_verifying_key(&key))
    }

    /// Uncompressed bytes
    pub fn to_bytes(&self) -> [u8; Self::LENGTH] {
        self.0
    }

    /// Verify a compact low-`s` signature over `SHA3-256(message)`
    pub fn verify_signature(&self, message: &[u8], signature: &Secp256k1Signature) -> bool {
        let Ok(key) = VerifyingKey::from_sec1_bytes(&self.0) else {
            return false;
        };
        let Ok(sig) = Signature::from_slice(&signature.0) else {
            return false;
        };
        if sig.normalize_s().is_some() {
            return false;
        }
        key.verify_prehash(&sha3_256(message), &sig).is_ok()
    }
}

impl fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1PublicKey(0x{})", hex::encode(self.0))
    }
}

impl fmt::Display for Secp256k1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serializable for Secp256k1PublicKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.0);
    }
}

impl Deserializable for Secp256k1PublicKey {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        let bytes = deserializer.deserialize_bytes()?;
        Self::from_bytes(&bytes).map_err(|e| super::to_bcs_error("Secp256k1PublicKey", &e))
    }
}

/// Compact Secp256k1 signature (64 bytes)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Secp256k1Signature([u8; 64]);

impl Secp256k1Signature {
    /// Size in bytes
    pub const LENGTH: usize = 64;

    /// Build from a slice that must be 64 bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self(signature_array(bytes)?))
    }

    /// Raw bytes
    pub fn to_bytes(&self) -> [u8; Self::LENGTH] {
        self.0
    }
}

impl fmt::Debug for Secp256k1Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1Signature(0x{})", hex::encode(self.0))
    }
}

impl Serializable for Secp256k1Signature {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.0);
    }
}

impl Deserializable for Secp256k1Signature {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        let bytes = deserializer.deserialize_bytes()?;
        Self::from_bytes(&bytes).map_err(|e| super::to_bcs_error("Secp256k1Signature", &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> Secp256k1PrivateKey {
        Secp256k1PrivateKey::from_bytes(&[0x11u8; 32]).unwrap()
    }

    #[test]
    fn test_sign_and_verify() {
        let key = test_key();
        let pk = key.public_key();
        let sig = key.sign(b"hello").unwrap();
        assert!(pk.verify_signature(b"hello", &sig));
        assert!(!pk.verify_signature(b"world", &sig));
    }

    #[test]
    fn test_signatures_are_deterministic_and_low_s() {
        let key = test_key();
        let a = key.sign(b"msg").unwrap();
        let b = key.sign(b"msg").unwrap();
        assert_eq!(a, b);
        let sig = Signature::from_slice(&a.to_bytes()).unwrap();
        assert!(sig.normalize_s().is_none());
    }

    #[test]
    fn test_public_key_is_uncompressed() {
        let pk = test_key().public_key();
        assert_eq!(pk.to_bytes()[0], 0x04);
        let bytes = movekey_bcs::to_bytes(&pk);
        assert_eq!(bytes[0], 65);
        assert_eq!(movekey_bcs::from_bytes::<Secp256k1PublicKey>(&bytes).unwrap(), pk);
    }

    #[test]
    fn test_compressed_input_accepted() {
        let pk = test_key().public_key();
        let key = VerifyingKey::from_sec1_bytes(&pk.to_bytes()).unwrap();
        let compressed = key.to_encoded_point(true);
        assert_eq!(
            Secp256k1PublicKey::from_bytes(compressed.as_bytes()).unwrap(),
            pk
        );
    }

    #[test]
    fn test_zero_scalar_rejected() {
        assert!(matches!(
            Secp256k1PrivateKey::from_bytes(&[0u8; 32]),
            Err(CryptoError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_aip80_roundtrip() {
        let key = test_key();
        let s = key.to_aip80_string();
        assert!(s.starts_with("secp256k1-priv-0x"));
        assert_eq!(Secp256k1PrivateKey::from_aip80(&s).unwrap(), key);
    }
}
