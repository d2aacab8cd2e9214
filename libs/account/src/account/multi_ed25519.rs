//! Legacy K-of-N Ed25519 account

use super::{AccountError, Result};
use crate::address::AccountAddress;
use crate::authenticator::AccountAuthenticator;
use crate::crypto::bitmap;
use crate::crypto::ed25519::Ed25519PrivateKey;
use crate::crypto::multi_ed25519::{MultiEd25519PublicKey, MultiEd25519Signature};
use crate::transaction::AnyRawTransaction;
use movekey_bcs::{Deserializer, Serializer};

/// A multi-Ed25519 account holding exactly `threshold` member keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiEd25519Account {
    public_key: MultiEd25519PublicKey,
    // (member index, key), ascending by index
    signers: Vec<(u8, Ed25519PrivateKey)>,
    address: AccountAddress,
}

impl MultiEd25519Account {
    /// Pair member keys with the multi-key they belong to.
    ///
    /// Signers may be given in any order; they are re-sorted by their
    /// position in `public_key`.
    ///
    /// # Errors
    ///
    /// [`AccountError::ThresholdMismatch`] unless exactly `threshold` signers
    /// are supplied, and `KeyNotFound` for a signer that is not a member.
    pub fn new(
        public_key: MultiEd25519PublicKey,
        signers: Vec<Ed25519PrivateKey>,
        address: Option<AccountAddress>,
    ) -> Result<Self> {
        if signers.len() != usize::from(public_key.threshold()) {
            return Err(AccountError::ThresholdMismatch {
                signers: signers.len(),
                threshold: public_key.threshold(),
            });
        }
        let mut signers = signers
            .into_iter()
            .map(|key| Ok((public_key.get_index(&key.public_key())?, key)))
            .collect::<Result<Vec<_>>>()?;
        signers.sort_by_key(|(index, _)| *index);
        // Duplicate members surface here
        let bits: Vec<u8> = signers.iter().map(|(index, _)| *index).collect();
        bitmap::create_bitmap(&bits)?;

        let address = address.unwrap_or_else(|| public_key.auth_key().derived_address());
        log::debug!(
            "MultiEd25519 account {address} with {} of {} signers",
            signers.len(),
            public_key.public_keys().len()
        );
        Ok(Self {
            public_key,
            signers,
            address,
        })
    }

    /// Account address
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Aggregate public key
    pub fn public_key(&self) -> &MultiEd25519PublicKey {
        &self.public_key
    }

    /// Member indices that sign, ascending
    pub fn signer_indices(&self) -> Vec<u8> {
        self.signers.iter().map(|(index, _)| *index).collect()
    }

    /// Sign raw bytes with every held member key
    pub fn sign(&self, message: &[u8]) -> Result<MultiEd25519Signature> {
        let signatures = self
            .signers
            .iter()
            .map(|(index, key)| (*index, key.sign(message)))
            .collect();
        Ok(MultiEd25519Signature::from_indexed(signatures)?)
    }

    /// Sign raw bytes into an authenticator
    pub fn sign_with_authenticator(&self, message: &[u8]) -> Result<AccountAuthenticator> {
        Ok(AccountAuthenticator::MultiEd25519 {
            public_key: self.public_key.clone(),
            signature: self.sign(message)?,
        })
    }

    /// Sign a transaction's signing message
    pub fn sign_transaction(
        &self,
        transaction: &AnyRawTransaction,
    ) -> Result<MultiEd25519Signature> {
        self.sign(&transaction.signing_message()?)
    }

    /// Sign a transaction into an authenticator
    pub fn sign_transaction_with_authenticator(
        &self,
        transaction: &AnyRawTransaction,
    ) -> Result<AccountAuthenticator> {
        self.sign_with_authenticator(&transaction.signing_message()?)
    }

    /// Check a signature over raw bytes
    pub fn verify_signature(&self, message: &[u8], signature: &MultiEd25519Signature) -> bool {
        self.public_key.verify_signature(message, signature)
    }

    pub(super) fn serialize_payload(&self, serializer: &mut Serializer) {
        serializer.serialize(&self.public_key);
        let keys: Vec<Ed25519PrivateKey> =
            self.signers.iter().map(|(_, key)| key.clone()).collect();
        serializer.serialize_vector(&keys);
    }

    pub(super) fn deserialize_payload(
        deserializer: &mut Deserializer,
        address: AccountAddress,
    ) -> Result<Self> {
        let public_key = deserializer.deserialize()?;
        let signers = deserializer.deserialize_vector()?;
        Self::new(public_key, signers, Some(address))
    }
}
