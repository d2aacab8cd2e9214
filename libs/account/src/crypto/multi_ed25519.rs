//! Legacy K-of-N Ed25519
//!
//! Both the key and the signature travel as one length-prefixed byte string:
//! keys are `pk_0 ‖ … ‖ pk_n ‖ threshold` and signatures are
//! `sig_a ‖ … ‖ sig_z ‖ bitmap`.

use super::bitmap::{self, BITMAP_LEN, MAX_SIGNATURES_SUPPORTED};
use super::ed25519::{Ed25519PublicKey, Ed25519Signature};
use super::{CryptoError, Result};
use crate::auth_key::{AuthenticationKey, Scheme};
use movekey_bcs::{Deserializable, Deserializer, Serializable, Serializer};

/// Fewest keys a multi-Ed25519 key may hold
pub const MIN_KEYS: usize = 2;

/// K-of-N Ed25519 public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiEd25519PublicKey {
    public_keys: Vec<Ed25519PublicKey>,
    threshold: u8,
}

impl MultiEd25519PublicKey {
    /// Build a `threshold`-of-`public_keys.len()` key
    pub fn new(public_keys: Vec<Ed25519PublicKey>, threshold: u8) -> Result<Self> {
        if public_keys.len() > MAX_SIGNATURES_SUPPORTED {
            return Err(CryptoError::TooManyKeys(public_keys.len()));
        }
        if public_keys.len() < MIN_KEYS || threshold == 0 || usize::from(threshold) > public_keys.len() {
            return Err(CryptoError::InvalidThreshold {
                threshold: usize::from(threshold),
                keys: public_keys.len(),
            });
        }
        Ok(Self {
            public_keys,
            threshold,
        })
    }

    /// Member keys in index order
    pub fn public_keys(&self) -> &[Ed25519PublicKey] {
        &self.public_keys
    }

    /// Required signature count
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Concatenated keys followed by the threshold byte
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.public_keys.len() * Ed25519PublicKey::LENGTH + 1);
        for key in &self.public_keys {
            out.extend_from_slice(key.as_bytes());
        }
        out.push(self.threshold);
        out
    }

    /// Parse the concatenated form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let Some((&threshold, keys)) = bytes.split_last() else {
            return Err(CryptoError::InvalidKeyLength {
                expected: MIN_KEYS * Ed25519PublicKey::LENGTH + 1,
                actual: 0,
            });
        };
        if keys.len() % Ed25519PublicKey::LENGTH != 0 {
            return Err(CryptoError::InvalidKeyLength {
                expected: (keys.len() / Ed25519PublicKey::LENGTH + 1) * Ed25519PublicKey::LENGTH + 1,
                actual: bytes.len(),
            });
        }
        let public_keys = keys
            .chunks_exact(Ed25519PublicKey::LENGTH)
            .map(Ed25519PublicKey::from_bytes)
            .collect::<Result<Vec<_>>>()?;
        Self::new(public_keys, threshold)
    }

    /// Position of `key` among the members
    pub fn get_index(&self, key: &Ed25519PublicKey) -> Result<u8> {
        self.public_keys
            .iter()
            .position(|pk| pk == key)
            .and_then(|i| u8::try_from(i).ok())
            .ok_or(CryptoError::KeyNotFound)
    }

    /// `SHA3-256(to_bytes() ‖ 0x01)`
    pub fn auth_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_scheme(Scheme::MultiEd25519, &self.to_bytes())
    }

    /// Check that enough marked members signed `message`.
    ///
    /// Signatures are matched to members in ascending bitmap order, so a
    /// signature list in any other order fails.
    pub fn verify_signature(&self, message: &[u8], signature: &MultiEd25519Signature) -> bool {
        let indices = bitmap::indices(&signature.bitmap);
        if indices.len() != signature.signatures.len() || indices.len() < usize::from(self.threshold)
        {
            return false;
        }
        indices
            .iter()
            .zip(&signature.signatures)
            .all(|(&index, sig)| {
                self.public_keys
                    .get(index)
                    .is_some_and(|pk| pk.verify_signature(message, sig))
            })
    }
}

impl Serializable for MultiEd25519PublicKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.to_bytes());
    }
}

impl Deserializable for MultiEd25519PublicKey {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        let bytes = deserializer.deserialize_bytes()?;
        Self::from_bytes(&bytes).map_err(|e| super::to_bcs_error("MultiEd25519PublicKey", &e))
    }
}

/// Signatures from a subset of multi-Ed25519 members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiEd25519Signature {
    signatures: Vec<Ed25519Signature>,
    bitmap: [u8; BITMAP_LEN],
}

impl MultiEd25519Signature {
    /// Pair signatures with a bitmap; the set-bit count must match
    pub fn new(signatures: Vec<Ed25519Signature>, bitmap: [u8; BITMAP_LEN]) -> Result<Self> {
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
    pub fn from_indexed(signatures: Vec<(u8, Ed25519Signature)>) -> Result<Self> {
        let bits: Vec<u8> = signatures.iter().map(|(i, _)| *i).collect();
        let bitmap = bitmap::create_bitmap(&bits)?;
        Self::new(signatures.into_iter().map(|(_, s)| s).collect(), bitmap)
    }

    /// Signatures in bitmap order
    pub fn signatures(&self) -> &[Ed25519Signature] {
        &self.signatures
    }

    /// Participant bitmap
    pub fn bitmap(&self) -> &[u8; BITMAP_LEN] {
        &self.bitmap
    }

    /// Concatenated signatures followed by the bitmap
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.signatures.len() * Ed25519Signature::LENGTH + BITMAP_LEN);
        for sig in &self.signatures {
            out.extend_from_slice(&sig.to_bytes());
        }
        out.extend_from_slice(&self.bitmap);
        out
    }

    /// Parse the concatenated form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < BITMAP_LEN || (bytes.len() - BITMAP_LEN) % Ed25519Signature::LENGTH != 0 {
            return Err(CryptoError::InvalidSignatureLength {
                expected: BITMAP_LEN
                    + bytes.len().saturating_sub(BITMAP_LEN) / Ed25519Signature::LENGTH
                        * Ed25519Signature::LENGTH,
                actual: bytes.len(),
            });
        }
        let (sigs, bitmap) = bytes.split_at(bytes.len() - BITMAP_LEN);
        let signatures = sigs
            .chunks_exact(Ed25519Signature::LENGTH)
            .map(Ed25519Signature::from_bytes)
            .collect::<Result<Vec<_>>>()?;
        Self::new(signatures, bitmap::from_slice(bitmap)?)
    }
}

impl Serializable for MultiEd25519Signature {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.to_bytes());
    }
}

impl Deserializable for MultiEd25519Signature {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        let bytes = deserializer.deserialize_bytes()?;
        Self::from_bytes(&bytes).map_err(|e| super::to_bcs_error("MultiEd25519Signature", &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::ed25519::Ed25519PrivateKey;

    fn keys(n: u8) -> Vec<Ed25519PrivateKey> {
        (1..=n).map(|i| Ed25519PrivateKey::from_seed(&[i; 32])).collect()
    }

    #[test]
    fn test_threshold_validation() {
        let pks: Vec<_> = keys(3).iter().map(Ed25519PrivateKey::public_key).collect();
        assert!(MultiEd25519PublicKey::new(pks.clone(), 0).is_err());
        assert!(MultiEd25519PublicKey::new(pks.clone(), 4).is_err());
        assert!(MultiEd25519PublicKey::new(pks[..1].to_vec(), 1).is_err());
        assert!(MultiEd25519PublicKey::new(pks, 2).is_ok());
    }

    #[test]
    fn test_bytes_layout() {
        let pks: Vec<_> = keys(3).iter().map(Ed25519PrivateKey::public_key).collect();
        let multi = MultiEd25519PublicKey::new(pks, 2).unwrap();
        let bytes = multi.to_bytes();
        assert_eq!(bytes.len(), 97);
        assert_eq!(bytes[96], 2);
        assert_eq!(MultiEd25519PublicKey::from_bytes(&bytes).unwrap(), multi);
        assert!(MultiEd25519PublicKey::from_bytes(&bytes[1..]).is_err());
    }

    #[test]
    fn test_verify_two_of_three() {
        let privs = keys(3);
        let pks: Vec<_> = privs.iter().map(Ed25519PrivateKey::public_key).collect();
        let multi = MultiEd25519PublicKey::new(pks, 2).unwrap();
        let sig = MultiEd25519Signature::from_indexed(vec![
            (0, privs[0].sign(b"msg")),
            (2, privs[2].sign(b"msg")),
        ])
        .unwrap();
        assert_eq!(sig.bitmap(), &[0xa0, 0, 0, 0]);
        assert!(multi.verify_signature(b"msg", &sig));

        let decoded = MultiEd25519Signature::from_bytes(&sig.to_bytes()).unwrap();
        assert_eq!(decoded, sig);
    }

    #[test]
    fn test_verify_rejects_swapped_order_and_too_few() {
        let privs = keys(3);
        let pks: Vec<_> = privs.iter().map(Ed25519PrivateKey::public_key).collect();
        let multi = MultiEd25519PublicKey::new(pks, 2).unwrap();
        let swapped = MultiEd25519Signature::new(
            vec![privs[2].sign(b"msg"), privs[0].sign(b"msg")],
            [0xa0, 0, 0, 0],
        )
        .unwrap();
        assert!(!multi.verify_signature(b"msg", &swapped));

        let one = MultiEd25519Signature::from_indexed(vec![(1, privs[1].sign(b"msg"))]).unwrap();
        assert!(!multi.verify_signature(b"msg", &one));
    }

    #[test]
    fn test_bitmap_count_must_match() {
        let sig = Ed25519PrivateKey::from_seed(&[1; 32]).sign(b"x");
        assert_eq!(
            MultiEd25519Signature::new(vec![sig], [0xc0, 0, 0, 0]),
            Err(CryptoError::BitmapMismatch {
                bits: 2,
                signatures: 1
            })
        );
    }
}
