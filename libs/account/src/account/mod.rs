//! Accounts: one signing surface over every key shape
//!
//! Each variant knows its address, its signing scheme and how to produce a
//! signature or an [`AccountAuthenticator`] for raw bytes or a transaction.
//! Accounts that hold key material can be persisted with
//! [`Account::to_bytes`]: `uleb128(scheme) ‖ address ‖ payload`.

pub mod abstracted;
pub mod ed25519;
pub mod keyless;
pub mod multi_ed25519;
pub mod multi_key;
pub mod single_key;

pub use abstracted::{
    AbstractPublicKey, AbstractSigner, AbstractedAccount, DerivableAbstractedAccount,
};
pub use ed25519::Ed25519Account;
pub use keyless::{FederatedKeylessAccount, KeylessAccount, KeylessAccountParams};
pub use multi_ed25519::MultiEd25519Account;
pub use multi_key::{MultiKeyAccount, MultiKeySigner};
pub use single_key::SingleKeyAccount;

use crate::address::{AccountAddress, AddressError};
use crate::auth_key::Scheme;
use crate::authenticator::AccountAuthenticator;
use crate::crypto::CryptoError;
use crate::crypto::ed25519::{Ed25519PublicKey, Ed25519Signature};
use crate::crypto::multi_ed25519::{MultiEd25519PublicKey, MultiEd25519Signature};
use crate::crypto::multi_key::{MultiKey, MultiKeySignature};
use crate::crypto::private_key::PrivateKey;
use crate::crypto::single_key::{AnyPublicKey, AnySignature, public_key_tag};
use crate::keyless::KeylessError;
use crate::transaction::{AnyRawTransaction, TransactionError};
use movekey_bcs::{BcsError, Deserializer, Serializer};
use thiserror::Error;

/// Account errors
#[derive(Error, Debug)]
pub enum AccountError {
    /// Multi-signer constructed with a signer count other than the threshold
    #[error("Signer count {signers} does not match threshold {threshold}")]
    ThresholdMismatch {
        /// Signers supplied
        signers: usize,
        /// Threshold of the public key
        threshold: u8,
    },

    /// Variant holds a callback and cannot be persisted
    #[error("{0} accounts cannot be serialized")]
    NotSerializable(&'static str),

    /// Nested account cannot act as a multi-key member
    #[error("Unsupported multi-key signer: {0}")]
    UnsupportedSigner(String),

    /// Abstract signer callback failed
    #[error("Abstract signer failed: {0}")]
    Signer(String),

    /// Key material error
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Keyless session error
    #[error(transparent)]
    Keyless(#[from] KeylessError),

    /// Signing message error
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// Address error
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Codec error
    #[error(transparent)]
    Bcs(#[from] BcsError),
}

/// Result type for account operations
pub type Result<T> = std::result::Result<T, AccountError>;

/// Public key of any account
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountPublicKey {
    /// Legacy Ed25519
    Ed25519(Ed25519PublicKey),
    /// Legacy K-of-N Ed25519
    MultiEd25519(MultiEd25519PublicKey),
    /// Single key of any kind, including keyless
    SingleKey(AnyPublicKey),
    /// K-of-N over keys of any kind
    MultiKey(MultiKey),
    /// Placeholder for function-authenticated accounts
    Abstract(AbstractPublicKey),
}

/// Signature of any account
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountSignature {
    /// Legacy Ed25519
    Ed25519(Ed25519Signature),
    /// Legacy K-of-N Ed25519
    MultiEd25519(MultiEd25519Signature),
    /// Single key of any kind
    SingleKey(AnySignature),
    /// K-of-N over keys of any kind
    MultiKey(MultiKeySignature),
    /// Opaque bytes from an abstract signer
    Abstract(Vec<u8>),
}

/// Any account
#[derive(Debug, Clone)]
pub enum Account {
    /// Legacy Ed25519 key
    Ed25519(Ed25519Account),
    /// Single Ed25519 or Secp256k1 key
    SingleKey(SingleKeyAccount),
    /// Legacy K-of-N Ed25519
    MultiEd25519(MultiEd25519Account),
    /// K-of-N over mixed signers
    MultiKey(MultiKeyAccount),
    /// OIDC-backed session key
    Keyless(KeylessAccount),
    /// Keyless with JWKs published at an account address
    FederatedKeyless(FederatedKeylessAccount),
    /// Authenticated by a Move function
    Abstracted(AbstractedAccount),
    /// Authenticated by a Move function, address derived from an identity
    DerivableAbstracted(DerivableAbstractedAccount),
}

impl Account {
    /// Account address
    pub fn address(&self) -> AccountAddress {
        match self {
            Self::Ed25519(a) => a.address(),
            Self::SingleKey(a) => a.address(),
            Self::MultiEd25519(a) => a.address(),
            Self::MultiKey(a) => a.address(),
            Self::Keyless(a) => a.address(),
            Self::FederatedKeyless(a) => a.address(),
            Self::Abstracted(a) => a.address(),
            Self::DerivableAbstracted(a) => a.address(),
        }
    }

    /// Scheme the account authenticates with
    pub const fn signing_scheme(&self) -> Scheme {
        match self {
            Self::Ed25519(_) => Scheme::Ed25519,
            Self::SingleKey(_) | Self::Keyless(_) | Self::FederatedKeyless(_) => Scheme::SingleKey,
            Self::MultiEd25519(_) => Scheme::MultiEd25519,
            Self::MultiKey(_) => Scheme::MultiKey,
            Self::Abstracted(_) | Self::DerivableAbstracted(_) => Scheme::Abstraction,
        }
    }

    /// Public key in its account shape
    pub fn public_key(&self) -> AccountPublicKey {
        match self {
            Self::Ed25519(a) => AccountPublicKey::Ed25519(a.public_key()),
            Self::SingleKey(a) => AccountPublicKey::SingleKey(a.public_key().clone()),
            Self::MultiEd25519(a) => AccountPublicKey::MultiEd25519(a.public_key().clone()),
            Self::MultiKey(a) => AccountPublicKey::MultiKey(a.public_key().clone()),
            Self::Keyless(a) => AccountPublicKey::SingleKey(a.any_public_key()),
            Self::FederatedKeyless(a) => AccountPublicKey::SingleKey(a.any_public_key()),
            Self::Abstracted(a) => AccountPublicKey::Abstract(a.public_key()),
            Self::DerivableAbstracted(a) => AccountPublicKey::Abstract(a.public_key()),
        }
    }

    /// Sign raw bytes
    pub fn sign(&self, message: &[u8]) -> Result<AccountSignature> {
        Ok(match self {
            Self::Ed25519(a) => AccountSignature::Ed25519(a.sign(message)),
            Self::SingleKey(a) => AccountSignature::SingleKey(a.sign(message)?),
            Self::MultiEd25519(a) => AccountSignature::MultiEd25519(a.sign(message)?),
            Self::MultiKey(a) => AccountSignature::MultiKey(a.sign(message)?),
            Self::Keyless(a) => AccountSignature::SingleKey(AnySignature::Keyless(a.sign(message)?)),
            Self::FederatedKeyless(a) => {
                AccountSignature::SingleKey(AnySignature::Keyless(a.sign(message)?))
            }
            Self::Abstracted(a) => AccountSignature::Abstract(a.sign(message)?),
            Self::DerivableAbstracted(a) => AccountSignature::Abstract(a.sign(message)?),
        })
    }

    /// Sign raw bytes and package the result with the public key
    pub fn sign_with_authenticator(&self, message: &[u8]) -> Result<AccountAuthenticator> {
        match self {
            Self::Ed25519(a) => Ok(a.sign_with_authenticator(message)),
            Self::SingleKey(a) => a.sign_with_authenticator(message),
            Self::MultiEd25519(a) => a.sign_with_authenticator(message),
            Self::MultiKey(a) => a.sign_with_authenticator(message),
            Self::Keyless(a) => a.sign_with_authenticator(message),
            Self::FederatedKeyless(a) => a.sign_with_authenticator(message),
            Self::Abstracted(a) => a.sign_with_authenticator(message),
            Self::DerivableAbstracted(a) => a.sign_with_authenticator(message),
        }
    }

    /// Sign a transaction's signing message
    pub fn sign_transaction(&self, transaction: &AnyRawTransaction) -> Result<AccountSignature> {
        Ok(match self {
            Self::Ed25519(a) => AccountSignature::Ed25519(a.sign_transaction(transaction)?),
            Self::SingleKey(a) => AccountSignature::SingleKey(a.sign_transaction(transaction)?),
            Self::MultiEd25519(a) => AccountSignature::MultiEd25519(a.sign_transaction(transaction)?),
            Self::MultiKey(a) => AccountSignature::MultiKey(a.sign_transaction(transaction)?),
            Self::Keyless(a) => {
                AccountSignature::SingleKey(AnySignature::Keyless(a.sign_transaction(transaction)?))
            }
            Self::FederatedKeyless(a) => {
                AccountSignature::SingleKey(AnySignature::Keyless(a.sign_transaction(transaction)?))
            }
            Self::Abstracted(a) => AccountSignature::Abstract(a.sign_transaction(transaction)?),
            Self::DerivableAbstracted(a) => {
                AccountSignature::Abstract(a.sign_transaction(transaction)?)
            }
        })
    }

    /// Sign a transaction and package the result with the public key
    pub fn sign_transaction_with_authenticator(
        &self,
        transaction: &AnyRawTransaction,
    ) -> Result<AccountAuthenticator> {
        match self {
            Self::Ed25519(a) => a.sign_transaction_with_authenticator(transaction),
            Self::SingleKey(a) => a.sign_transaction_with_authenticator(transaction),
            Self::MultiEd25519(a) => a.sign_transaction_with_authenticator(transaction),
            Self::MultiKey(a) => a.sign_transaction_with_authenticator(transaction),
            Self::Keyless(a) => a.sign_transaction_with_authenticator(transaction),
            Self::FederatedKeyless(a) => a.sign_transaction_with_authenticator(transaction),
            Self::Abstracted(a) => a.sign_transaction_with_authenticator(transaction),
            Self::DerivableAbstracted(a) => a.sign_transaction_with_authenticator(transaction),
        }
    }

    /// Check a signature over raw bytes; mismatched shapes never verify
    pub fn verify_signature(&self, message: &[u8], signature: &AccountSignature) -> bool {
        match (self, signature) {
            (Self::Ed25519(a), AccountSignature::Ed25519(sig)) => a.verify_signature(message, sig),
            (Self::SingleKey(a), AccountSignature::SingleKey(sig)) => {
                a.verify_signature(message, sig)
            }
            (Self::MultiEd25519(a), AccountSignature::MultiEd25519(sig)) => {
                a.verify_signature(message, sig)
            }
            (Self::MultiKey(a), AccountSignature::MultiKey(sig)) => a.verify_signature(message, sig),
            (Self::Keyless(a), AccountSignature::SingleKey(AnySignature::Keyless(sig))) => {
                a.verify_signature(message, sig)
            }
            (Self::FederatedKeyless(a), AccountSignature::SingleKey(AnySignature::Keyless(sig))) => {
                a.verify_signature(message, sig)
            }
            _ => false,
        }
    }

    /// Persist key material and address
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut serializer = Serializer::new();
        self.serialize_into(&mut serializer)?;
        Ok(serializer.into_bytes())
    }

    fn serialize_into(&self, serializer: &mut Serializer) -> Result<()> {
        match self {
            Self::Abstracted(_) => return Err(AccountError::NotSerializable("Abstracted")),
            Self::DerivableAbstracted(_) => {
                return Err(AccountError::NotSerializable("DerivableAbstracted"));
            }
            _ => {}
        }
        serializer.serialize_variant_index(u32::from(self.signing_scheme().tag()));
        serializer.serialize(&self.address());
        match self {
            Self::Ed25519(a) => a.serialize_payload(serializer),
            Self::SingleKey(a) => {
                serializer.serialize_variant_index(a.private_key().public_key_tag());
                a.serialize_payload(serializer);
            }
            Self::MultiEd25519(a) => a.serialize_payload(serializer),
            Self::MultiKey(a) => a.serialize_payload(serializer)?,
            Self::Keyless(a) => {
                serializer.serialize_variant_index(public_key_tag::KEYLESS);
                a.serialize_payload(serializer)?;
            }
            Self::FederatedKeyless(a) => {
                serializer.serialize_variant_index(public_key_tag::FEDERATED_KEYLESS);
                a.serialize_payload(serializer)?;
            }
            Self::Abstracted(_) | Self::DerivableAbstracted(_) => {}
        }
        Ok(())
    }

    /// Restore an account from [`Account::to_bytes`] output
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut deserializer = Deserializer::new(bytes);
        let account = Self::deserialize_from(&mut deserializer)?;
        deserializer.finish()?;
        Ok(account)
    }

    fn deserialize_from(deserializer: &mut Deserializer) -> Result<Self> {
        let tag = deserializer.deserialize_uleb128_as_u32()?;
        let scheme = u8::try_from(tag)
            .ok()
            .and_then(Scheme::from_tag)
            .ok_or_else(|| BcsError::unsupported_variant("Account", tag))?;
        let address: AccountAddress = deserializer.deserialize()?;
        log::debug!("Decoding {scheme} account {address}");

        Ok(match scheme {
            Scheme::Ed25519 => {
                Self::Ed25519(Ed25519Account::new(deserializer.deserialize()?, Some(address)))
            }
            Scheme::SingleKey => match deserializer.deserialize_uleb128_as_u32()? {
                public_key_tag::KEYLESS => {
                    Self::Keyless(KeylessAccount::deserialize_payload(deserializer, address)?)
                }
                public_key_tag::FEDERATED_KEYLESS => Self::FederatedKeyless(
                    FederatedKeylessAccount::deserialize_payload(deserializer, address)?,
                ),
                key_tag => Self::SingleKey(SingleKeyAccount::new(
                    PrivateKey::deserialize_tagged(key_tag, deserializer)?,
                    Some(address),
                )),
            },
            Scheme::MultiEd25519 => {
                Self::MultiEd25519(MultiEd25519Account::deserialize_payload(deserializer, address)?)
            }
            Scheme::MultiKey => {
                Self::MultiKey(MultiKeyAccount::deserialize_payload(deserializer, address)?)
            }
            other => {
                return Err(BcsError::unsupported_variant("Account", u32::from(other.tag())).into());
            }
        })
    }
}

macro_rules! impl_from_account {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Account {
                fn from(account: $ty) -> Self {
                    Self::$variant(account)
                }
            }
        )*
    };
}

impl_from_account! {
    Ed25519 => Ed25519Account,
    SingleKey => SingleKeyAccount,
    MultiEd25519 => MultiEd25519Account,
    MultiKey => MultiKeyAccount,
    Keyless => KeylessAccount,
    FederatedKeyless => FederatedKeylessAccount,
    Abstracted => AbstractedAccount,
    DerivableAbstracted => DerivableAbstractedAccount,
}
