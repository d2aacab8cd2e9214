//! Single-key account over any supported curve

use super::{Ed25519Account, Result};
use crate::address::AccountAddress;
use crate::authenticator::AccountAuthenticator;
use crate::crypto::private_key::PrivateKey;
use crate::crypto::single_key::{AnyPublicKey, AnySignature};
use crate::transaction::AnyRawTransaction;
use movekey_bcs::Serializer;

/// Account holding one Ed25519 or Secp256k1 key under the single-key scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleKeyAccount {
    private_key: PrivateKey,
    public_key: AnyPublicKey,
    address: AccountAddress,
}

impl SingleKeyAccount {
    /// Wrap a key; `address` overrides the derived one for rotated accounts
    pub fn new(private_key: impl Into<PrivateKey>, address: Option<AccountAddress>) -> Self {
        let private_key = private_key.into();
        let public_key = private_key.public_key();
        let address = address.unwrap_or_else(|| public_key.auth_key().derived_address());
        Self {
            private_key,
            public_key,
            address,
        }
    }

    /// Re-wrap a legacy account's key, keeping its address
    pub fn from_ed25519_account(account: &Ed25519Account) -> Self {
        Self::new(account.private_key().clone(), Some(account.address()))
    }

    /// Account address
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Wrapped public key
    pub fn public_key(&self) -> &AnyPublicKey {
        &self.public_key
    }

    /// Private key
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Sign raw bytes
    pub fn sign(&self, message: &[u8]) -> Result<AnySignature> {
        Ok(self.private_key.sign(message)?)
    }

    /// Sign raw bytes into an authenticator
    pub fn sign_with_authenticator(&self, message: &[u8]) -> Result<AccountAuthenticator> {
        Ok(AccountAuthenticator::SingleKey {
            public_key: self.public_key.clone(),
            signature: self.sign(message)?,
        })
    }

    /// Sign a transaction's signing message
    pub fn sign_transaction(&self, transaction: &AnyRawTransaction) -> Result<AnySignature> {
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
    pub fn verify_signature(&self, message: &[u8], signature: &AnySignature) -> bool {
        self.public_key.verify_signature(message, signature)
    }

    pub(super) fn serialize_payload(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.private_key.to_bytes());
    }
}
