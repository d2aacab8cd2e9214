//! Private keys usable by single-key accounts

use super::ed25519::Ed25519PrivateKey;
use super::secp256k1::Secp256k1PrivateKey;
use super::single_key::{AnyPublicKey, AnySignature, public_key_tag};
use super::{CryptoError, Result, ed25519, secp256k1};
use movekey_bcs::{BcsError, Deserializer};

/// A private key of any curve a single-key account can hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivateKey {
    /// Ed25519
    Ed25519(Ed25519PrivateKey),
    /// Secp256k1
    Secp256k1(Secp256k1PrivateKey),
}

impl PrivateKey {
    /// The `AnyPublicKey` tag of the matching public key
    pub const fn public_key_tag(&self) -> u32 {
        match self {
            Self::Ed25519(_) => public_key_tag::ED25519,
            Self::Secp256k1(_) => public_key_tag::SECP256K1,
        }
    }

    /// Matching public key, wrapped
    pub fn public_key(&self) -> AnyPublicKey {
        match self {
            Self::Ed25519(key) => AnyPublicKey::Ed25519(key.public_key()),
            Self::Secp256k1(key) => AnyPublicKey::Secp256k1(key.public_key()),
        }
    }

    /// Sign raw message bytes
    pub fn sign(&self, message: &[u8]) -> Result<AnySignature> {
        match self {
            Self::Ed25519(key) => Ok(AnySignature::Ed25519(key.sign(message))),
            Self::Secp256k1(key) => Ok(AnySignature::Secp256k1(key.sign(message)?)),
        }
    }

    /// Parse an AIP-80 string, choosing the curve from its prefix
    pub fn from_aip80(input: &str) -> Result<Self> {
        if input.starts_with(ed25519::AIP80_PREFIX) {
            Ok(Self::Ed25519(Ed25519PrivateKey::from_aip80(input)?))
        } else if input.starts_with(secp256k1::AIP80_PREFIX) {
            Ok(Self::Secp256k1(Secp256k1PrivateKey::from_aip80(input)?))
        } else {
            Err(CryptoError::InvalidPrivateKey(
                "unknown AIP-80 prefix".to_string(),
            ))
        }
    }

    /// AIP-80 string form
    pub fn to_aip80_string(&self) -> String {
        match self {
            Self::Ed25519(key) => key.to_aip80_string(),
            Self::Secp256k1(key) => key.to_aip80_string(),
        }
    }

    /// Raw key bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(key) => key.to_bytes().to_vec(),
            Self::Secp256k1(key) => key.to_bytes().to_vec(),
        }
    }

    /// Decode a length-prefixed key whose curve is given by `tag`
    pub(crate) fn deserialize_tagged(
        tag: u32,
        deserializer: &mut Deserializer,
    ) -> movekey_bcs::Result<Self> {
        match tag {
            public_key_tag::ED25519 => Ok(Self::Ed25519(deserializer.deserialize()?)),
            public_key_tag::SECP256K1 => Ok(Self::Secp256k1(deserializer.deserialize()?)),
            other => Err(BcsError::unsupported_variant("PrivateKey", other)),
        }
    }
}

impl From<Ed25519PrivateKey> for PrivateKey {
    fn from(key: Ed25519PrivateKey) -> Self {
        Self::Ed25519(key)
    }
}

impl From<Secp256k1PrivateKey> for PrivateKey {
    fn from(key: Secp256k1PrivateKey) -> Self {
        Self::Secp256k1(key)
    }
}
