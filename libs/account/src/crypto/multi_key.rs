//! K-of-N over heterogeneous single keys

use super::bitmap::{self, BITMAP_LEN, MAX_SIGNATURES_SUPPORTED};
use super::single_key::{AnyPublicKey, AnySignature};
use super::{CryptoError, Result};
use crate::auth_key::{AuthenticationKey, Scheme};
use movekey_bcs::{BcsError, Deserializable, Deserializer, Serializable, Serializer};

/// Threshold key over any mix of single-key kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiKey {
    public_keys: Vec<AnyPublicKey>,
    signatures_required: u8,
}

impl MultiKey {
    /// Build a `signatures_required`-of-`public_keys.len()` key
    pub fn new(public_keys: Vec<AnyPublicKey>, signatures_required: u8) -> Result<Self> {
        if public_keys.len() > MAX_SIGNATURES_SUPPORTED {
            return Err(CryptoError::TooManyKeys(public_keys.len()));
        }
        if signatures_required == 0 || usize::from(signatures_required) > public_keys.len() {
            return Err(CryptoError::InvalidThreshold {
                threshold: usize::from(signatures_required),
                keys: public_keys.len(),
            });
        }
        Ok(Self {
            public_keys,
            signatures_required,
        })
    }

    /// Member keys in index order
    pub fn public_keys(&self) -> &[AnyPublicKey] {
        &self.public_keys
    }

    /// Required signature count
    pub fn signatures_required(&self) -> u8 {
        self.signatures_required
    }

    /// Linear search for `key`
    pub fn get_index(&self, key: &AnyPublicKey) -> Result<u8> {
        self.public_keys
            .iter()
            .position(|pk| pk == key)
            .and_then(|i| u8::try_from(i).ok())
            .ok_or(CryptoError::KeyNotFound)
    }

    /// Bitmap for strictly ascending member indices
    pub fn create_bitmap(&self, bits: &[u8]) -> Result<[u8; BITMAP_LEN]> {
        bitmap::create_bitmap(bits)
    }

    /// `SHA3-256(BCS(self) ‖ 0x03)`
    pub fn auth_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_scheme(Scheme::MultiKey, &self.bcs_to_bytes())
    }

    /// Check that enough marked members signed `message`.
    ///
    /// The i-th signature is checked against the member at the i-th set bit.
    pub fn verify_signature(&self, message: &[u8], signature: &MultiKeySignature) -> bool {
        self.verify_signature_with(signature, |pk, sig| pk.verify_signature(message, sig))
    }

    /// Like [`Self::verify_signature`], with a caller-supplied check per
    /// member, for members that sign different messages.
    pub fn verify_signature_with<F>(&self, signature: &MultiKeySignature, verify: F) -> bool
    where
        F: Fn(&AnyPublicKey, &AnySignature) -> bool,
    {
        let indices = bitmap::indices(&signature.bitmap);
        if indices.len() != signature.signatures.len()
            || indices.len() < usize::from(self.signatures_required)
        {
            return false;
        }
        indices
            .iter()
            .zip(&signature.signatures)
            .all(|(&index, sig)| self.public_keys.get(index).is_some_and(|pk| verify(pk, sig)))
    }
}

impl Serializable for MultiKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_vector(&self.public_keys);
        serializer.serialize_u8(self.signatures_required);
    }
}

impl Deserializable for MultiKey {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        let public_keys = deserializer.deserialize_vector()?;
        let signatures_required = deserializer.deserialize_u8()?;
        Self::new(public_keys, signatures_required)
            .map_err(|e| super::to_bcs_error("MultiKey", &e))
    }
}

/// Signatures from a subset of multi-key members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiKeySignature {
    signatures: Vec<AnySignature>,
    bitmap: [u8; BITMAP_LEN],
}

impl MultiKeySignature {
    /// Pair signatures with a bitmap; the set-bit count must match
    pub fn new(signatures: Vec<AnySignature>, bitmap: [u8; BITMAP_LEN]) -> Result<Self> {
        let bits = bitmap::count_ones(&bitmap);
        if bits != signatures.len() {
            return Err(CryptoError::BitmapMismatch {
                bits,
                signatures: signatures.len(),
            });
        }
        Ok(Self { signatures, bitmap })
    }

    /// Build from `(member index, signature)` pairs in ascending index order
    pub fn from_indexed(signatures: Vec<(u8, AnySignature)>) -> Result<Self> {
        let bits: Vec<u8> = signatures.iter().map(|(i, _)| *i).collect();
        let bitmap = bitmap::create_bitmap(&bits)?;
        Self::new(signatures.into_iter().map(|(_, s)| s).collect(), bitmap)
    }

    /// Signatures in bitmap order
    pub fn signatures(&self) -> &[AnySignature] {
        &self.signatures
    }

    /// Participant bitmap
    pub fn bitmap(&self) -> &[u8; BITMAP_LEN] {
        &self.bitmap
    }
}

impl Serializable for MultiKeySignature {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_vector(&self.signatures);
        serializer.serialize_bytes(&self.bitmap);
    }
}

impl Deserializable for MultiKeySignature {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        let signatures = deserializer.deserialize_vector()?;
        let bitmap_bytes = deserializer.deserialize_bytes()?;
        let bitmap = bitmap::from_slice(&bitmap_bytes).map_err(|_| {
            BcsError::invalid_value(
                "MultiKeySignature",
                format!("bitmap must be {BITMAP_LEN} bytes, got {}", bitmap_bytes.len()),
            )
        })?;
        Self::new(signatures, bitmap).map_err(|e| super::to_bcs_error("MultiKeySignature", &e))
    }
}
