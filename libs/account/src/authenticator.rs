//! Account and transaction authenticators
//!
//! An [`AccountAuthenticator`] carries one account's public key and signature
//! over a signing message. A [`TransactionAuthenticator`] groups the sender's
//! authenticator with any secondary signers and fee payer.

use crate::address::AccountAddress;
use crate::auth_key::{FunctionInfo, Scheme};
use crate::crypto::ed25519::{Ed25519PublicKey, Ed25519Signature};
use crate::crypto::multi_ed25519::{MultiEd25519PublicKey, MultiEd25519Signature};
use crate::crypto::multi_key::{MultiKey, MultiKeySignature};
use crate::crypto::sha3_256;
use crate::crypto::single_key::{AnyPublicKey, AnySignature};
use crate::transaction::{AnyRawTransaction, RawTransaction};
use movekey_bcs::{BcsError, Deserializable, Deserializer, Serializable, Serializer};

/// Authentication payload of an abstracted account
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbstractionAuthData {
    /// Opaque authenticator checked by the account's function
    V1 {
        /// SHA3-256 of the signing message
        signing_message_digest: Vec<u8>,
        /// Function-specific proof
        authenticator: Vec<u8>,
    },
    /// Domain-abstracted account; the identity travels with the signature
    DerivableV1 {
        /// SHA3-256 of the signing message
        signing_message_digest: Vec<u8>,
        /// Function-specific signature
        abstract_signature: Vec<u8>,
        /// Identity the address was derived from
        abstract_public_key: Vec<u8>,
    },
}

impl AbstractionAuthData {
    const V1_TAG: u32 = 0;
    const DERIVABLE_V1_TAG: u32 = 1;

    /// Digest the authenticator commits to
    pub fn signing_message_digest(&self) -> &[u8] {
        match self {
            Self::V1 {
                signing_message_digest,
                ..
            }
            | Self::DerivableV1 {
                signing_message_digest,
                ..
            } => signing_message_digest,
        }
    }
}

impl Serializable for AbstractionAuthData {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            Self::V1 {
                signing_message_digest,
                authenticator,
            } => {
                serializer.serialize_variant_index(Self::V1_TAG);
                serializer.serialize_bytes(signing_message_digest);
                serializer.serialize_bytes(authenticator);
            }
            Self::DerivableV1 {
                signing_message_digest,
                abstract_signature,
                abstract_public_key,
            } => {
                serializer.serialize_variant_index(Self::DERIVABLE_V1_TAG);
                serializer.serialize_bytes(signing_message_digest);
                serializer.serialize_bytes(abstract_signature);
                serializer.serialize_bytes(abstract_public_key);
            }
        }
    }
}

impl Deserializable for AbstractionAuthData {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        match deserializer.deserialize_variant_index()? {
            Self::V1_TAG => Ok(Self::V1 {
                signing_message_digest: deserializer.deserialize_bytes()?,
                authenticator: deserializer.deserialize_bytes()?,
            }),
            Self::DERIVABLE_V1_TAG => Ok(Self::DerivableV1 {
                signing_message_digest: deserializer.deserialize_bytes()?,
                abstract_signature: deserializer.deserialize_bytes()?,
                abstract_public_key: deserializer.deserialize_bytes()?,
            }),
            tag => Err(BcsError::unsupported_variant("AbstractionAuthData", tag)),
        }
    }
}

/// One account's authorization of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountAuthenticator {
    /// Legacy Ed25519
    Ed25519 {
        /// Key
        public_key: Ed25519PublicKey,
        /// Signature
        signature: Ed25519Signature,
    },
    /// Legacy K-of-N Ed25519
    MultiEd25519 {
        /// Key
        public_key: MultiEd25519PublicKey,
        /// Signature
        signature: MultiEd25519Signature,
    },
    /// Single key of any kind
    SingleKey {
        /// Key
        public_key: AnyPublicKey,
        /// Signature
        signature: AnySignature,
    },
    /// K-of-N over keys of any kind
    MultiKey {
        /// Keys and threshold
        public_key: MultiKey,
        /// Signatures and bitmap
        signature: MultiKeySignature,
    },
    /// Placeholder for a signer that has not signed yet
    NoAccountAuthenticator,
    /// Authorization checked by a Move function
    Abstraction {
        /// The authenticating function
        function_info: FunctionInfo,
        /// Payload for the function
        auth_data: AbstractionAuthData,
    },
}

impl AccountAuthenticator {
    const ED25519_TAG: u32 = 0;
    const MULTI_ED25519_TAG: u32 = 1;
    const SINGLE_KEY_TAG: u32 = 2;
    const MULTI_KEY_TAG: u32 = 3;
    const NO_ACCOUNT_AUTHENTICATOR_TAG: u32 = 4;
    const ABSTRACTION_TAG: u32 = 5;

    /// Wire tag
    pub const fn tag(&self) -> u32 {
        match self {
            Self::Ed25519 { .. } => Self::ED25519_TAG,
            Self::MultiEd25519 { .. } => Self::MULTI_ED25519_TAG,
            Self::SingleKey { .. } => Self::SINGLE_KEY_TAG,
            Self::MultiKey { .. } => Self::MULTI_KEY_TAG,
            Self::NoAccountAuthenticator => Self::NO_ACCOUNT_AUTHENTICATOR_TAG,
            Self::Abstraction { .. } => Self::ABSTRACTION_TAG,
        }
    }

    /// Authentication scheme
    pub const fn scheme(&self) -> Scheme {
        match self {
            Self::Ed25519 { .. } => Scheme::Ed25519,
            Self::MultiEd25519 { .. } => Scheme::MultiEd25519,
            Self::SingleKey { .. } => Scheme::SingleKey,
            Self::MultiKey { .. } => Scheme::MultiKey,
            Self::NoAccountAuthenticator => Scheme::NoScheme,
            Self::Abstraction { .. } => Scheme::Abstraction,
        }
    }

    /// Check the signature over `message`.
    ///
    /// Abstraction authenticators are verified on chain by their function;
    /// here only the digest is compared.
    pub fn verify(&self, message: &[u8]) -> bool {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => public_key.verify_signature(message, signature),
            Self::MultiEd25519 {
                public_key,
                signature,
            } => public_key.verify_signature(message, signature),
            Self::SingleKey {
                public_key,
                signature,
            } => public_key.verify_signature(message, signature),
            Self::MultiKey {
                public_key,
                signature,
            } => public_key.verify_signature(message, signature),
            Self::NoAccountAuthenticator => false,
            Self::Abstraction { auth_data, .. } => {
                auth_data.signing_message_digest() == sha3_256(message)
            }
        }
    }

    /// Check the signature as an authorization of `transaction`.
    ///
    /// Keyless signatures, alone or as multi-key members, are checked against
    /// the transaction bound to their proof.
    pub fn verify_transaction(&self, transaction: &AnyRawTransaction) -> bool {
        let signed = |sig: &AnySignature| transaction.signing_message_for(sig).ok();
        match self {
            Self::SingleKey {
                public_key,
                signature,
            } => signed(signature).is_some_and(|m| public_key.verify_signature(&m, signature)),
            Self::MultiKey {
                public_key,
                signature,
            } => public_key.verify_signature_with(signature, |pk, sig| {
                signed(sig).is_some_and(|m| pk.verify_signature(&m, sig))
            }),
            _ => transaction.signing_message().is_ok_and(|m| self.verify(&m)),
        }
    }

    /// Number of signatures carried
    pub fn number_of_signatures(&self) -> usize {
        match self {
            Self::Ed25519 { .. } | Self::SingleKey { .. } | Self::Abstraction { .. } => 1,
            Self::MultiEd25519 { signature, .. } => signature.signatures().len(),
            Self::MultiKey { signature, .. } => signature.signatures().len(),
            Self::NoAccountAuthenticator => 0,
        }
    }
}

impl Serializable for AccountAuthenticator {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(self.tag());
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => {
                serializer.serialize(public_key);
                serializer.serialize(signature);
            }
            Self::MultiEd25519 {
                public_key,
                signature,
            } => {
                serializer.serialize(public_key);
                serializer.serialize(signature);
            }
            Self::SingleKey {
                public_key,
                signature,
            } => {
                serializer.serialize(public_key);
                serializer.serialize(signature);
            }
            Self::MultiKey {
                public_key,
                signature,
            } => {
                serializer.serialize(public_key);
                serializer.serialize(signature);
            }
            Self::NoAccountAuthenticator => {}
            Self::Abstraction {
                function_info,
                auth_data,
            } => {
                serializer.serialize(function_info);
                serializer.serialize(auth_data);
            }
        }
    }
}

impl Deserializable for AccountAuthenticator {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        Ok(match deserializer.deserialize_variant_index()? {
            Self::ED25519_TAG => Self::Ed25519 {
                public_key: deserializer.deserialize()?,
                signature: deserializer.deserialize()?,
            },
            Self::MULTI_ED25519_TAG => Self::MultiEd25519 {
                public_key: deserializer.deserialize()?,
                signature: deserializer.deserialize()?,
            },
            Self::SINGLE_KEY_TAG => Self::SingleKey {
                public_key: deserializer.deserialize()?,
                signature: deserializer.deserialize()?,
            },
            Self::MULTI_KEY_TAG => Self::MultiKey {
                public_key: deserializer.deserialize()?,
                signature: deserializer.deserialize()?,
            },
            Self::NO_ACCOUNT_AUTHENTICATOR_TAG => Self::NoAccountAuthenticator,
            Self::ABSTRACTION_TAG => Self::Abstraction {
                function_info: deserializer.deserialize()?,
                auth_data: deserializer.deserialize()?,
            },
            tag => return Err(BcsError::unsupported_variant("AccountAuthenticator", tag)),
        })
    }
}

/// Every authorization a transaction carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionAuthenticator {
    /// Legacy single Ed25519 sender
    Ed25519 {
        /// Key
        public_key: Ed25519PublicKey,
        /// Signature
        signature: Ed25519Signature,
    },
    /// Legacy K-of-N Ed25519 sender
    MultiEd25519 {
        /// Key
        public_key: MultiEd25519PublicKey,
        /// Signature
        signature: MultiEd25519Signature,
    },
    /// Sender plus secondary signers
    MultiAgent {
        /// Sender
        sender: AccountAuthenticator,
        /// Secondary signer addresses, in signing order
        secondary_signer_addresses: Vec<AccountAddress>,
        /// Secondary signers
        secondary_signers: Vec<AccountAuthenticator>,
    },
    /// Sponsored, optionally multi-agent
    FeePayer {
        /// Sender
        sender: AccountAuthenticator,
        /// Secondary signer addresses
        secondary_signer_addresses: Vec<AccountAddress>,
        /// Secondary signers
        secondary_signers: Vec<AccountAuthenticator>,
        /// Gas payer
        fee_payer_address: AccountAddress,
        /// Gas payer's authorization
        fee_payer_signer: AccountAuthenticator,
    },
    /// Single sender of any authenticator kind
    SingleSender {
        /// Sender
        sender: AccountAuthenticator,
    },
}

impl TransactionAuthenticator {
    const ED25519_TAG: u32 = 0;
    const MULTI_ED25519_TAG: u32 = 1;
    const MULTI_AGENT_TAG: u32 = 2;
    const FEE_PAYER_TAG: u32 = 3;
    const SINGLE_SENDER_TAG: u32 = 4;

    /// Wire tag
    pub const fn tag(&self) -> u32 {
        match self {
            Self::Ed25519 { .. } => Self::ED25519_TAG,
            Self::MultiEd25519 { .. } => Self::MULTI_ED25519_TAG,
            Self::MultiAgent { .. } => Self::MULTI_AGENT_TAG,
            Self::FeePayer { .. } => Self::FEE_PAYER_TAG,
            Self::SingleSender { .. } => Self::SINGLE_SENDER_TAG,
        }
    }

    /// Wrap a lone sender in the most specific shape.
    ///
    /// Legacy Ed25519 and MultiEd25519 senders keep their dedicated variants.
    pub fn single_sender(sender: AccountAuthenticator) -> Self {
        match sender {
            AccountAuthenticator::Ed25519 {
                public_key,
                signature,
            } => Self::Ed25519 {
                public_key,
                signature,
            },
            AccountAuthenticator::MultiEd25519 {
                public_key,
                signature,
            } => Self::MultiEd25519 {
                public_key,
                signature,
            },
            sender => Self::SingleSender { sender },
        }
    }

    /// Assemble the authenticator matching the transaction's shape
    pub fn for_transaction(
        transaction: &AnyRawTransaction,
        sender: AccountAuthenticator,
        secondary_signers: Vec<AccountAuthenticator>,
        fee_payer_signer: Option<AccountAuthenticator>,
    ) -> Self {
        let secondary_signer_addresses = transaction
            .secondary_signer_addresses
            .clone()
            .unwrap_or_default();
        if let Some(fee_payer_address) = transaction.fee_payer_address {
            Self::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer: fee_payer_signer
                    .unwrap_or(AccountAuthenticator::NoAccountAuthenticator),
            }
        } else if transaction.secondary_signer_addresses.is_some() {
            Self::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            }
        } else {
            Self::single_sender(sender)
        }
    }

    /// The sender's authorization
    pub fn sender(&self) -> AccountAuthenticator {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => AccountAuthenticator::Ed25519 {
                public_key: *public_key,
                signature: *signature,
            },
            Self::MultiEd25519 {
                public_key,
                signature,
            } => AccountAuthenticator::MultiEd25519 {
                public_key: public_key.clone(),
                signature: signature.clone(),
            },
            Self::MultiAgent { sender, .. }
            | Self::FeePayer { sender, .. }
            | Self::SingleSender { sender } => sender.clone(),
        }
    }

    /// Check every signature against `raw_txn` wrapped in this shape.
    ///
    /// For fee-payer transactions the sender and secondary signers may have
    /// signed over either the fee payer's address or the zero address; the
    /// fee payer must have signed over its own address.
    pub fn verify(&self, raw_txn: &RawTransaction) -> bool {
        match self {
            Self::Ed25519 { .. } | Self::MultiEd25519 { .. } | Self::SingleSender { .. } => self
                .sender()
                .verify_transaction(&AnyRawTransaction::simple(raw_txn.clone())),
            Self::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                let transaction = AnyRawTransaction::multi_agent(
                    raw_txn.clone(),
                    secondary_signer_addresses.clone(),
                );
                secondary_signer_addresses.len() == secondary_signers.len()
                    && std::iter::once(sender)
                        .chain(secondary_signers)
                        .all(|signer| signer.verify_transaction(&transaction))
            }
            Self::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => {
                let signed_over = |fee_payer| {
                    AnyRawTransaction::fee_payer(
                        raw_txn.clone(),
                        secondary_signer_addresses.clone(),
                        fee_payer,
                    )
                };
                let with_zero = signed_over(AccountAddress::ZERO);
                let with_address = signed_over(*fee_payer_address);
                secondary_signer_addresses.len() == secondary_signers.len()
                    && std::iter::once(sender).chain(secondary_signers).all(|signer| {
                        signer.verify_transaction(&with_zero)
                            || signer.verify_transaction(&with_address)
                    })
                    && fee_payer_signer.verify_transaction(&with_address)
            }
        }
    }
}

impl Serializable for TransactionAuthenticator {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(self.tag());
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => {
                serializer.serialize(public_key);
                serializer.serialize(signature);
            }
            Self::MultiEd25519 {
                public_key,
                signature,
            } => {
                serializer.serialize(public_key);
                serializer.serialize(signature);
            }
            Self::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                serializer.serialize(sender);
                serializer.serialize_vector(secondary_signer_addresses);
                serializer.serialize_vector(secondary_signers);
            }
            Self::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => {
                serializer.serialize(sender);
                serializer.serialize_vector(secondary_signer_addresses);
                serializer.serialize_vector(secondary_signers);
                serializer.serialize(fee_payer_address);
                serializer.serialize(fee_payer_signer);
            }
            Self::SingleSender { sender } => serializer.serialize(sender),
        }
    }
}

impl Deserializable for TransactionAuthenticator {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        Ok(match deserializer.deserialize_variant_index()? {
            Self::ED25519_TAG => Self::Ed25519 {
                public_key: deserializer.deserialize()?,
                signature: deserializer.deserialize()?,
            },
            Self::MULTI_ED25519_TAG => Self::MultiEd25519 {
                public_key: deserializer.deserialize()?,
                signature: deserializer.deserialize()?,
            },
            Self::MULTI_AGENT_TAG => Self::MultiAgent {
                sender: deserializer.deserialize()?,
                secondary_signer_addresses: deserializer.deserialize_vector()?,
                secondary_signers: deserializer.deserialize_vector()?,
            },
            Self::FEE_PAYER_TAG => Self::FeePayer {
                sender: deserializer.deserialize()?,
                secondary_signer_addresses: deserializer.deserialize_vector()?,
                secondary_signers: deserializer.deserialize_vector()?,
                fee_payer_address: deserializer.deserialize()?,
                fee_payer_signer: deserializer.deserialize()?,
            },
            Self::SINGLE_SENDER_TAG => Self::SingleSender {
                sender: deserializer.deserialize()?,
            },
            tag => return Err(BcsError::unsupported_variant("TransactionAuthenticator", tag)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::ed25519::Ed25519PrivateKey;

    fn ed25519_auth(seed: u8, message: &[u8]) -> AccountAuthenticator {
        let key = Ed25519PrivateKey::from_seed(&[seed; 32]);
        AccountAuthenticator::Ed25519 {
            public_key: key.public_key(),
            signature: key.sign(message),
        }
    }

    #[test]
    fn test_account_authenticator_tags() {
        let auth = ed25519_auth(1, b"m");
        let bytes = movekey_bcs::to_bytes(&auth);
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[1], 32);
        assert_eq!(bytes[34], 64);
        assert_eq!(bytes.len(), 1 + 33 + 65);
        assert_eq!(
            movekey_bcs::to_bytes(&AccountAuthenticator::NoAccountAuthenticator),
            vec![4]
        );
        assert!(matches!(
            movekey_bcs::from_bytes::<AccountAuthenticator>(&[6]),
            Err(BcsError::UnsupportedVariant { tag: 6, .. })
        ));
    }

    #[test]
    fn test_abstraction_layout_and_digest_check() {
        let info: FunctionInfo = "0x1::permissioned_delegation::authenticate".parse().unwrap();
        let digest = sha3_256(b"message").to_vec();
        let auth = AccountAuthenticator::Abstraction {
            function_info: info.clone(),
            auth_data: AbstractionAuthData::DerivableV1 {
                signing_message_digest: digest.clone(),
                abstract_signature: vec![9; 3],
                abstract_public_key: vec![8; 2],
            },
        };
        let bytes = movekey_bcs::to_bytes(&auth);
        assert_eq!(bytes[0], 5);
        let info_len = movekey_bcs::to_bytes(&info).len();
        assert_eq!(bytes[1 + info_len], 1);
        assert_eq!(bytes[2 + info_len], 32);
        assert_eq!(movekey_bcs::from_bytes::<AccountAuthenticator>(&bytes).unwrap(), auth);

        assert!(auth.verify(b"message"));
        assert!(!auth.verify(b"other"));
    }

    #[test]
    fn test_single_sender_keeps_legacy_variants() {
        let auth = ed25519_auth(1, b"m");
        let txn_auth = TransactionAuthenticator::single_sender(auth.clone());
        assert_eq!(txn_auth.tag(), 0);
        assert_eq!(txn_auth.sender(), auth);

        let no_auth = TransactionAuthenticator::single_sender(AccountAuthenticator::NoAccountAuthenticator);
        assert_eq!(no_auth.tag(), 4);
    }

    #[test]
    fn test_transaction_authenticator_roundtrip() {
        let auth = TransactionAuthenticator::FeePayer {
            sender: ed25519_auth(1, b"m"),
            secondary_signer_addresses: vec![AccountAddress::THREE],
            secondary_signers: vec![ed25519_auth(2, b"m")],
            fee_payer_address: AccountAddress::FOUR,
            fee_payer_signer: AccountAuthenticator::NoAccountAuthenticator,
        };
        let bytes = movekey_bcs::to_bytes(&auth);
        assert_eq!(bytes[0], 3);
        assert_eq!(movekey_bcs::from_bytes::<TransactionAuthenticator>(&bytes).unwrap(), auth);
    }

    #[test]
    fn test_keyless_authenticator_covers_transaction_and_proof() {
        use crate::account::KeylessAccount;
        use crate::test_utils::{FAR_FUTURE_SECS, keyless_params, transfer_transaction};

        let account = KeylessAccount::new(keyless_params("auth", 3, FAR_FUTURE_SECS)).unwrap();
        let transaction = AnyRawTransaction::simple(transfer_transaction(account.address(), 0));
        let auth = account.sign_transaction_with_authenticator(&transaction).unwrap();
        assert!(matches!(auth, AccountAuthenticator::SingleKey { .. }));

        assert!(auth.verify_transaction(&transaction));
        assert!(!auth.verify(&transaction.signing_message().unwrap()));

        let mut other = transaction.clone();
        other.raw_txn.sequence_number += 1;
        assert!(!auth.verify_transaction(&other));
    }
}
