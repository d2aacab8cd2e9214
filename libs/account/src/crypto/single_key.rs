//! Tagged single-key unions
//!
//! `AnyPublicKey` and `AnySignature` prefix their payload with a uleb128 tag.
//! Tags are part of the wire contract and must never be renumbered.

use super::ed25519::{Ed25519PublicKey, Ed25519Signature};
use super::keyless::{FederatedKeylessPublicKey, KeylessPublicKey, KeylessSignature};
use super::secp256k1::{Secp256k1PublicKey, Secp256k1Signature};
use crate::auth_key::{AuthenticationKey, Scheme};
use movekey_bcs::{BcsError, Deserializable, Deserializer, Serializable, Serializer};

/// Wire tags for [`AnyPublicKey`]
pub mod public_key_tag {
    /// Ed25519
    pub const ED25519: u32 = 0;
    /// Secp256k1 ECDSA
    pub const SECP256K1: u32 = 1;
    /// Secp256r1 ECDSA (WebAuthn passkeys); recognised, not decodable here
    pub const SECP256R1: u32 = 2;
    /// Keyless
    pub const KEYLESS: u32 = 3;
    /// Federated keyless
    pub const FEDERATED_KEYLESS: u32 = 4;
}

/// Wire tags for [`AnySignature`]
pub mod signature_tag {
    /// Ed25519
    pub const ED25519: u32 = 0;
    /// Secp256k1 ECDSA
    pub const SECP256K1: u32 = 1;
    /// WebAuthn assertion; recognised, not decodable here
    pub const WEBAUTHN: u32 = 2;
    /// Keyless
    pub const KEYLESS: u32 = 3;
}

/// A public key of any single-key kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyPublicKey {
    /// Ed25519 key
    Ed25519(Ed25519PublicKey),
    /// Secp256k1 key
    Secp256k1(Secp256k1PublicKey),
    /// Keyless identity commitment
    Keyless(KeylessPublicKey),
    /// Keyless identity whose JWKs live at an account address
    FederatedKeyless(FederatedKeylessPublicKey),
}

impl AnyPublicKey {
    /// Wire tag
    pub const fn tag(&self) -> u32 {
        match self {
            Self::Ed25519(_) => public_key_tag::ED25519,
            Self::Secp256k1(_) => public_key_tag::SECP256K1,
            Self::Keyless(_) => public_key_tag::KEYLESS,
            Self::FederatedKeyless(_) => public_key_tag::FEDERATED_KEYLESS,
        }
    }

    /// Verify a signature of the matching kind; mismatched kinds never verify
    pub fn verify_signature(&self, message: &[u8], signature: &AnySignature) -> bool {
        match (self, signature) {
            (Self::Ed25519(pk), AnySignature::Ed25519(sig)) => pk.verify_signature(message, sig),
            (Self::Secp256k1(pk), AnySignature::Secp256k1(sig)) => {
                pk.verify_signature(message, sig)
            }
            (Self::Keyless(pk), AnySignature::Keyless(sig)) => pk.verify_signature(message, sig),
            (Self::FederatedKeyless(pk), AnySignature::Keyless(sig)) => {
                pk.verify_signature(message, sig)
            }
            _ => false,
        }
    }

    /// Single-key authentication key, `SHA3-256(BCS(self) ‖ 0x02)`
    pub fn auth_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_scheme(Scheme::SingleKey, &self.bcs_to_bytes())
    }
}

impl From<Ed25519PublicKey> for AnyPublicKey {
    fn from(key: Ed25519PublicKey) -> Self {
        Self::Ed25519(key)
    }
}

impl From<Secp256k1PublicKey> for AnyPublicKey {
    fn from(key: Secp256k1PublicKey) -> Self {
        Self::Secp256k1(key)
    }
}

impl From<KeylessPublicKey> for AnyPublicKey {
    fn from(key: KeylessPublicKey) -> Self {
        Self::Keyless(key)
    }
}

impl From<FederatedKeylessPublicKey> for AnyPublicKey {
    fn from(key: FederatedKeylessPublicKey) -> Self {
        Self::FederatedKeyless(key)
    }
}

impl Serializable for AnyPublicKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(self.tag());
        match self {
            Self::Ed25519(pk) => pk.serialize(serializer),
            Self::Secp256k1(pk) => pk.serialize(serializer),
            Self::Keyless(pk) => pk.serialize(serializer),
            Self::FederatedKeyless(pk) => pk.serialize(serializer),
        }
    }
}

impl Deserializable for AnyPublicKey {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        match deserializer.deserialize_variant_index()? {
            public_key_tag::ED25519 => Ok(Self::Ed25519(deserializer.deserialize()?)),
            public_key_tag::SECP256K1 => Ok(Self::Secp256k1(deserializer.deserialize()?)),
            public_key_tag::KEYLESS => Ok(Self::Keyless(deserializer.deserialize()?)),
            public_key_tag::FEDERATED_KEYLESS => {
                Ok(Self::FederatedKeyless(deserializer.deserialize()?))
            }
            tag => Err(BcsError::unsupported_variant("AnyPublicKey", tag)),
        }
    }
}

/// A signature of any single-key kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnySignature {
    /// Ed25519 signature
    Ed25519(Ed25519Signature),
    /// Secp256k1 signature
    Secp256k1(Secp256k1Signature),
    /// Keyless signature (ephemeral signature plus certificate)
    Keyless(KeylessSignature),
}

impl AnySignature {
    /// Wire tag
    pub const fn tag(&self) -> u32 {
        match self {
            Self::Ed25519(_) => signature_tag::ED25519,
            Self::Secp256k1(_) => signature_tag::SECP256K1,
            Self::Keyless(_) => signature_tag::KEYLESS,
        }
    }
}

impl From<Ed25519Signature> for AnySignature {
    fn from(sig: Ed25519Signature) -> Self {
        Self::Ed25519(sig)
    }
}

impl From<Secp256k1Signature> for AnySignature {
    fn from(sig: Secp256k1Signature) -> Self {
        Self::Secp256k1(sig)
    }
}

impl From<KeylessSignature> for AnySignature {
    fn from(sig: KeylessSignature) -> Self {
        Self::Keyless(sig)
    }
}

impl Serializable for AnySignature {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(self.tag());
        match self {
            Self::Ed25519(sig) => sig.serialize(serializer),
            Self::Secp256k1(sig) => sig.serialize(serializer),
            Self::Keyless(sig) => sig.serialize(serializer),
        }
    }
}

impl Deserializable for AnySignature {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        match deserializer.deserialize_variant_index()? {
            signature_tag::ED25519 => Ok(Self::Ed25519(deserializer.deserialize()?)),
            signature_tag::SECP256K1 => Ok(Self::Secp256k1(deserializer.deserialize()?)),
            signature_tag::KEYLESS => Ok(Self::Keyless(deserializer.deserialize()?)),
            tag => Err(BcsError::unsupported_variant("AnySignature", tag)),
        }
    }
}
