//! Legacy single Ed25519 account

use super::Result;
use crate::address::AccountAddress;
use crate::authenticator::AccountAuthenticator;
use crate::crypto::ed25519::{Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature};
use crate::transaction::AnyRawTransaction;
use movekey_bcs::Serializer;

/// Account holding one Ed25519 key under the legacy scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519Account {
    private_key: Ed25519PrivateKey,
    public_key: Ed25519PublicKey,
    address: AccountAddress,
}

impl Ed25519Account {
    /// Wrap a key; `address` overrides the derived one for rotated accounts
    pub fn new(private_key: Ed25519PrivateKey, address: Option<AccountAddress>) -> Self {
        let public_key = private_key.public_key();
        let address = address.unwrap_or_else(|| public_key.auth_key().derived_address());
        Self {
            private_key,
            public_key,
            address,
        }
    }

    /// Fresh random key
    pub fn generate() -> Result<Self> {
        Ok(Self::new(Ed25519PrivateKey::generate()?, None))
    }

    /// Account address
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Public key
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.public_key
    }

    /// Private key
    pub fn private_key(&self) -> &Ed25519PrivateKey {
        &self.private_key
    }

    /// Sign raw bytes
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        self.private_key.sign(message)
    }

    /// Sign raw bytes into an authenticator
    pub fn sign_with_authenticator(&self, message: &[u8]) -> AccountAuthenticator {
        AccountAuthenticator::Ed25519 {
            public_key: self.public_key,
            signature: self.sign(message),
        }
    }

    /// Sign a transaction's signing message
    pub fn sign_transaction(&self, transaction: &AnyRawTransaction) -> Result<Ed25519Signature> {
        Ok(self.sign(&transaction.signing_message()?))
    }

    /// Sign a transaction into an authenticator
    pub fn sign_transaction_with_authenticator(
        &self,
        transaction: &AnyRawTransaction,
    ) -> Result<AccountAuthenticator> {
        Ok(self.sign_with_authenticator(&transaction.signing_message()?))
    }

    /// Check a signature over raw bytes
    pub fn verify_signature(&self, message: &[u8], signature: &Ed25519Signature) -> bool {
        self.public_key.verify_signature(message, signature)
    }

    pub(super) fn serialize_payload(&self, serializer: &mut Serializer) {
        serializer.serialize(&self.private_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ed25519_key;

    #[test]
    fn test_address_is_legacy_auth_key() {
        let account = Ed25519Account::new(ed25519_key(1), None);
        assert_eq!(
            account.address(),
            account.public_key().auth_key().derived_address()
        );
    }

    #[test]
    fn test_authenticator_carries_public_key() {
        let account = Ed25519Account::new(ed25519_key(2), None);
        let auth = account.sign_with_authenticator(b"message");
        assert!(auth.verify(b"message"));
        assert!(matches!(
            auth,
            AccountAuthenticator::Ed25519 { public_key, .. } if public_key == account.public_key()
        ));
    }
}
