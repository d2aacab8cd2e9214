//! Ephemeral keys bound into keyless proofs

use super::ed25519::{Ed25519PublicKey, Ed25519Signature};
use movekey_bcs::{BcsError, Deserializable, Deserializer, Serializable, Serializer};

const ED25519_TAG: u32 = 0;

/// Public half of an ephemeral key pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EphemeralPublicKey {
    /// Ed25519
    Ed25519(Ed25519PublicKey),
}

impl EphemeralPublicKey {
    /// Wire tag
    pub const fn tag(&self) -> u32 {
        match self {
            Self::Ed25519(_) => ED25519_TAG,
        }
    }

    /// Verify a signature of the matching kind
    pub fn verify_signature(&self, message: &[u8], signature: &EphemeralSignature) -> bool {
        match (self, signature) {
            (Self::Ed25519(pk), EphemeralSignature::Ed25519(sig)) => {
                pk.verify_signature(message, sig)
            }
        }
    }
}

impl Serializable for EphemeralPublicKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(self.tag());
        match self {
            Self::Ed25519(pk) => pk.serialize(serializer),
        }
    }
}

impl Deserializable for EphemeralPublicKey {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        match deserializer.deserialize_variant_index()? {
            ED25519_TAG => Ok(Self::Ed25519(deserializer.deserialize()?)),
            tag => Err(BcsError::unsupported_variant("EphemeralPublicKey", tag)),
        }
    }
}

/// Signature by an ephemeral key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EphemeralSignature {
    /// Ed25519
    Ed25519(Ed25519Signature),
}

impl EphemeralSignature {
    /// Wire tag
    pub const fn tag(&self) -> u32 {
        match self {
            Self::Ed25519(_) => ED25519_TAG,
        }
    }
}

impl Serializable for EphemeralSignature {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(self.tag());
        match self {
            Self::Ed25519(sig) => sig.serialize(serializer),
        }
    }
}

impl Deserializable for EphemeralSignature {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        match deserializer.deserialize_variant_index()? {
            ED25519_TAG => Ok(Self::Ed25519(deserializer.deserialize()?)),
            tag => Err(BcsError::unsupported_variant("EphemeralSignature", tag)),
        }
    }
}
