//! Ed25519 keys and signatures

use super::{CryptoError, Result, decode_hex, key_array, random_bytes, signature_array};
use crate::auth_key::{AuthenticationKey, Scheme};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use movekey_bcs::{Deserializable, Deserializer, Serializable, Serializer};
use std::fmt;

/// AIP-80 prefix for Ed25519 private keys
pub const AIP80_PREFIX: &str = "ed25519-priv-";

/// Ed25519 private key (32-byte seed)
#[derive(Clone)]
pub struct Ed25519PrivateKey {
    key: SigningKey,
}

impl Ed25519PrivateKey {
    /// Size in bytes
    pub const LENGTH: usize = 32;

    /// Generate a key from OS randomness
    pub fn generate() -> Result<Self> {
        let seed = random_bytes::<32>()?;
        Ok(Self::from_seed(&seed))
    }

    /// Build from a 32-byte seed
    pub fn from_seed(seed: &[u8; Self::LENGTH]) -> Self {
        Self {
            key: SigningKey::from_bytes(seed),
        }
    }

    /// Build from a slice that must be 32 bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_seed(&key_array(bytes)?))
    }

    /// Parse an AIP-80 string (`ed25519-priv-0x…`) or bare hex
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

    /// Raw seed bytes
    pub fn to_bytes(&self) -> [u8; Self::LENGTH] {
        self.key.to_bytes()
    }

    /// Matching public key
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.key.verifying_key().to_bytes())
    }

    /// Sign raw message bytes
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.key.sign(message).to_bytes())
    }
}

impl fmt::Debug for Ed25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Ed25519PrivateKey(<redacted>)")
    }
}

impl PartialEq for Ed25519PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Ed25519PrivateKey {}

impl Serializable for Ed25519PrivateKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.to_bytes());
    }
}

impl Deserializable for Ed25519PrivateKey {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        let bytes = deserializer.deserialize_bytes()?;
        Self::from_bytes(&bytes).map_err(|e| super::to_bcs_error("Ed25519PrivateKey", &e))
    }
}

/// Ed25519 public key (32 bytes, validated as a curve point)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; 32]);

impl Ed25519PublicKey {
    /// Size in bytes
    pub const LENGTH: usize = 32;

    /// Build from a slice, rejecting bytes that are not a valid point
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let array = key_array::<32>(bytes)?;
        VerifyingKey::from_bytes(&array)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        Ok(Self(array))
    }

    /// Raw bytes
    pub fn to_bytes(&self) -> [u8; Self::LENGTH] {
        self.0
    }

    /// Borrow raw bytes
    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }

    /// Strict verification: rejects non-canonical `S` and small-order keys
    pub fn verify_signature(&self, message: &[u8], signature: &Ed25519Signature) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
        key.verify_strict(message, &sig).is_ok()
    }

    /// Legacy authentication key, `SHA3-256(key ‖ 0x00)`
    pub fn auth_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_scheme(Scheme::Ed25519, &self.0)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey(0x{})", hex::encode(self.0))
    }
}

impl fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serializable for Ed25519PublicKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.0);
    }
}

impl Deserializable for Ed25519PublicKey {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        let bytes = deserializer.deserialize_bytes()?;
        Self::from_bytes(&bytes).map_err(|e| super::to_bcs_error("Ed25519PublicKey", &e))
    }
}

/// Ed25519 signature (64 bytes)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519Signature([u8; 64]);

impl Ed25519Signature {
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

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signature(0x{})", hex::encode(self.0))
    }
}

impl Serializable for Ed25519Signature {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.0);
    }
}

impl Deserializable for Ed25519Signature {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        let bytes = deserializer.deserialize_bytes()?;
        Self::from_bytes(&bytes).map_err(|e| super::to_bcs_error("Ed25519Signature", &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let key = Ed25519PrivateKey::from_seed(&[1u8; 32]);
        let pk = key.public_key();
        let sig = key.sign(b"hello");
        assert!(pk.verify_signature(b"hello", &sig));
        assert!(!pk.verify_signature(b"hellp", &sig));
    }

    #[test]
    fn test_rfc8032_vector_one() {
        let seed: [u8; 32] =
            hex::decode("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60")
                .unwrap()
                .try_into()
                .unwrap();
        let key = Ed25519PrivateKey::from_seed(&seed);
        assert_eq!(
            key.public_key().to_string(),
            "0xd75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
        );
        let sig = key.sign(b"");
        assert_eq!(
            hex::encode(sig.to_bytes()),
            "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
        );
    }

    #[test]
    fn test_aip80_roundtrip() {
        let key = Ed25519PrivateKey::from_seed(&[9u8; 32]);
        let s = key.to_aip80_string();
        assert!(s.starts_with("ed25519-priv-0x"));
        assert_eq!(Ed25519PrivateKey::from_aip80(&s).unwrap(), key);
        let bare = s.trim_start_matches(AIP80_PREFIX);
        assert_eq!(Ed25519PrivateKey::from_aip80(bare).unwrap(), key);
        assert!(Ed25519PrivateKey::from_aip80("secp256k1-priv-0x00").is_err());
    }

    #[test]
    fn test_bcs_is_length_prefixed() {
        let pk = Ed25519PrivateKey::from_seed(&[3u8; 32]).public_key();
        let bytes = movekey_bcs::to_bytes(&pk);
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 32);
        assert_eq!(movekey_bcs::from_bytes::<Ed25519PublicKey>(&bytes).unwrap(), pk);
    }

    #[test]
    fn test_wrong_lengths() {
        assert!(matches!(
            Ed25519PublicKey::from_bytes(&[0u8; 31]),
            Err(CryptoError::InvalidKeyLength { expected: 32, actual: 31 })
        ));
        assert!(matches!(
            Ed25519Signature::from_bytes(&[0u8; 63]),
            Err(CryptoError::InvalidSignatureLength { expected: 64, actual: 63 })
        ));
    }
}
