//! K-of-N account over mixed signers

use super::{
    Account, AccountError, Ed25519Account, FederatedKeylessAccount, KeylessAccount, Result,
    SingleKeyAccount,
};
use crate::address::AccountAddress;
use crate::authenticator::AccountAuthenticator;
use crate::crypto::multi_key::{MultiKey, MultiKeySignature};
use crate::crypto::single_key::{AnyPublicKey, AnySignature};
use crate::transaction::AnyRawTransaction;
use movekey_bcs::{Deserializer, Serializer};

/// An account that can contribute one signature to a multi-key
#[derive(Debug, Clone)]
pub enum MultiKeySigner {
    /// Ed25519 key, appearing in the multi-key as `AnyPublicKey::Ed25519`
    Ed25519(Ed25519Account),
    /// Single key of any curve
    SingleKey(SingleKeyAccount),
    /// Keyless session
    Keyless(KeylessAccount),
    /// Federated keyless session
    FederatedKeyless(FederatedKeylessAccount),
}

impl MultiKeySigner {
    /// The member key this signer matches
    pub fn public_key(&self) -> AnyPublicKey {
        match self {
            Self::Ed25519(a) => AnyPublicKey::Ed25519(a.public_key()),
            Self::SingleKey(a) => a.public_key().clone(),
            Self::Keyless(a) => a.any_public_key(),
            Self::FederatedKeyless(a) => a.any_public_key(),
        }
    }

    /// Sign raw bytes
    pub fn sign(&self, message: &[u8]) -> Result<AnySignature> {
        Ok(match self {
            Self::Ed25519(a) => AnySignature::Ed25519(a.sign(message)),
            Self::SingleKey(a) => a.sign(message)?,
            Self::Keyless(a) => AnySignature::Keyless(a.sign(message)?),
            Self::FederatedKeyless(a) => AnySignature::Keyless(a.sign(message)?),
        })
    }

    /// Sign a transaction the way this signer signs it alone
    pub fn sign_transaction(&self, transaction: &AnyRawTransaction) -> Result<AnySignature> {
        Ok(match self {
            Self::Ed25519(a) => AnySignature::Ed25519(a.sign_transaction(transaction)?),
            Self::SingleKey(a) => a.sign_transaction(transaction)?,
            Self::Keyless(a) => AnySignature::Keyless(a.sign_transaction(transaction)?),
            Self::FederatedKeyless(a) => AnySignature::Keyless(a.sign_transaction(transaction)?),
        })
    }

    fn wait_for_proof(&self) {
        match self {
            Self::Keyless(a) => {
                a.wait_for_proof();
            }
            Self::FederatedKeyless(a) => {
                a.wait_for_proof();
            }
            Self::Ed25519(_) | Self::SingleKey(_) => {}
        }
    }
}

impl TryFrom<Account> for MultiKeySigner {
    type Error = AccountError;

    fn try_from(account: Account) -> Result<Self> {
        match account {
            Account::Ed25519(a) => Ok(Self::Ed25519(a)),
            Account::SingleKey(a) => Ok(Self::SingleKey(a)),
            Account::Keyless(a) => Ok(Self::Keyless(a)),
            Account::FederatedKeyless(a) => Ok(Self::FederatedKeyless(a)),
            other => Err(AccountError::UnsupportedSigner(
                other.signing_scheme().to_string(),
            )),
        }
    }
}

impl From<MultiKeySigner> for Account {
    fn from(signer: MultiKeySigner) -> Self {
        match signer {
            MultiKeySigner::Ed25519(a) => Self::Ed25519(a),
            MultiKeySigner::SingleKey(a) => Self::SingleKey(a),
            MultiKeySigner::Keyless(a) => Self::Keyless(a),
            MultiKeySigner::FederatedKeyless(a) => Self::FederatedKeyless(a),
        }
    }
}

/// A multi-key account holding exactly `signatures_required` member signers
#[derive(Debug, Clone)]
pub struct MultiKeyAccount {
    public_key: MultiKey,
    // (member index, signer), ascending by index
    signers: Vec<(u8, MultiKeySigner)>,
    address: AccountAddress,
}

impl MultiKeyAccount {
    /// Pair signers with the multi-key they belong to.
    ///
    /// Each signer's member index is found once here and the signers are
    /// sorted by it, so signatures always come out in bitmap order.
    ///
    /// # Errors
    ///
    /// [`AccountError::ThresholdMismatch`] unless exactly
    /// `signatures_required` signers are supplied, `KeyNotFound` for a signer
    /// outside the multi-key and `DuplicateBit` for a repeated member.
    pub fn new(
        public_key: MultiKey,
        signers: Vec<MultiKeySigner>,
        address: Option<AccountAddress>,
    ) -> Result<Self> {
        let threshold = public_key.signatures_required();
        if signers.len() != usize::from(threshold) {
            return Err(AccountError::ThresholdMismatch {
                signers: signers.len(),
                threshold,
            });
        }
        let mut signers = signers
            .into_iter()
            .map(|signer| Ok((public_key.get_index(&signer.public_key())?, signer)))
            .collect::<Result<Vec<_>>>()?;
        signers.sort_by_key(|(index, _)| *index);
        let bits: Vec<u8> = signers.iter().map(|(index, _)| *index).collect();
        public_key.create_bitmap(&bits)?;

        let address = address.unwrap_or_else(|| public_key.auth_key().derived_address());
        log::debug!(
            "MultiKey account {address}, {threshold} of {} with signers at {bits:?}",
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
    pub fn public_key(&self) -> &MultiKey {
        &self.public_key
    }

    /// Signers, ascending by member index
    pub fn signers(&self) -> impl Iterator<Item = &MultiKeySigner> {
        self.signers.iter().map(|(_, signer)| signer)
    }

    /// Member indices that sign, ascending
    pub fn signer_indices(&self) -> Vec<u8> {
        self.signers.iter().map(|(index, _)| *index).collect()
    }

    /// Block until every keyless signer's proof has settled
    pub fn wait_for_proofs(&self) {
        for (_, signer) in &self.signers {
            signer.wait_for_proof();
        }
    }

    /// Sign raw bytes with every signer
    pub fn sign(&self, message: &[u8]) -> Result<MultiKeySignature> {
        let signatures = self
            .signers
            .iter()
            .map(|(index, signer)| Ok((*index, signer.sign(message)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(MultiKeySignature::from_indexed(signatures)?)
    }

    /// Sign raw bytes into an authenticator
    pub fn sign_with_authenticator(&self, message: &[u8]) -> Result<AccountAuthenticator> {
        Ok(AccountAuthenticator::MultiKey {
            public_key: self.public_key.clone(),
            signature: self.sign(message)?,
        })
    }

    /// Sign a transaction with every signer
    pub fn sign_transaction(&self, transaction: &AnyRawTransaction) -> Result<MultiKeySignature> {
        let signatures = self
            .signers
            .iter()
            .map(|(index, signer)| Ok((*index, signer.sign_transaction(transaction)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(MultiKeySignature::from_indexed(signatures)?)
    }

    /// Sign a transaction into an authenticator
    pub fn sign_transaction_with_authenticator(
        &self,
        transaction: &AnyRawTransaction,
    ) -> Result<AccountAuthenticator> {
        Ok(AccountAuthenticator::MultiKey {
            public_key: self.public_key.clone(),
            signature: self.sign_transaction(transaction)?,
        })
    }

    /// Check a signature over raw bytes
    pub fn verify_signature(&self, message: &[u8], signature: &MultiKeySignature) -> bool {
        self.public_key.verify_signature(message, signature)
    }

    pub(super) fn serialize_payload(&self, serializer: &mut Serializer) -> Result<()> {
        serializer.serialize(&self.public_key);
        let nested = self
            .signers
            .iter()
            .map(|(_, signer)| Account::from(signer.clone()).to_bytes())
            .collect::<Result<Vec<_>>>()?;
        serializer.serialize_vector(&nested);
        Ok(())
    }

    pub(super) fn deserialize_payload(
        deserializer: &mut Deserializer,
        address: AccountAddress,
    ) -> Result<Self> {
        let public_key = deserializer.deserialize()?;
        let signers = deserializer
            .deserialize_vector::<Vec<u8>>()?
            .iter()
            .map(|bytes| MultiKeySigner::try_from(Account::from_bytes(bytes)?))
            .collect::<Result<Vec<_>>>()?;
        Self::new(public_key, signers, Some(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CryptoError;
    use crate::test_utils::{FAR_FUTURE_SECS, ed25519_key, keyless_params, secp256k1_key};

    fn keyless_signer() -> KeylessAccount {
        KeylessAccount::new(keyless_params("dave", 5, FAR_FUTURE_SECS)).unwrap()
    }

    fn mixed() -> (MultiKey, Vec<MultiKeySigner>) {
        let signers = vec![
            MultiKeySigner::SingleKey(SingleKeyAccount::new(ed25519_key(1), None)),
            MultiKeySigner::SingleKey(SingleKeyAccount::new(secp256k1_key(2), None)),
            MultiKeySigner::Keyless(keyless_signer()),
        ];
        let public_key =
            MultiKey::new(signers.iter().map(MultiKeySigner::public_key).collect(), 2).unwrap();
        (public_key, signers)
    }

    #[test]
    fn test_signers_sorted_regardless_of_input_order() {
        let (public_key, mut signers) = mixed();
        signers.remove(1);
        signers.reverse();
        let account = MultiKeyAccount::new(public_key, signers, None).unwrap();
        assert_eq!(account.signer_indices(), vec![0, 2]);

        let sig = account.sign(b"msg").unwrap();
        assert_eq!(sig.bitmap(), &[0b1010_0000, 0, 0, 0]);
        assert!(matches!(sig.signatures()[0], AnySignature::Ed25519(_)));
        assert!(matches!(sig.signatures()[1], AnySignature::Keyless(_)));
        assert!(account.verify_signature(b"msg", &sig));
    }

    #[test]
    fn test_threshold_mismatch() {
        let (public_key, signers) = mixed();
        assert!(matches!(
            MultiKeyAccount::new(public_key, signers, None),
            Err(AccountError::ThresholdMismatch {
                signers: 3,
                threshold: 2
            })
        ));
    }

    #[test]
    fn test_outsider_rejected() {
        let (public_key, mut signers) = mixed();
        signers.truncate(1);
        signers.push(MultiKeySigner::SingleKey(SingleKeyAccount::new(ed25519_key(9), None)));
        assert!(matches!(
            MultiKeyAccount::new(public_key, signers, None),
            Err(AccountError::Crypto(CryptoError::KeyNotFound))
        ));
    }

    #[test]
    fn test_legacy_ed25519_member_signs_as_any_key() {
        let legacy = Ed25519Account::new(ed25519_key(1), None);
        let (public_key, mut signers) = mixed();
        signers.truncate(1);
        signers[0] = MultiKeySigner::Ed25519(legacy);
        signers.push(MultiKeySigner::SingleKey(SingleKeyAccount::new(secp256k1_key(2), None)));
        let account = MultiKeyAccount::new(public_key, signers, None).unwrap();
        let auth = account.sign_with_authenticator(b"m").unwrap();
        assert!(auth.verify(b"m"));
        assert_eq!(auth.number_of_signatures(), 2);
    }

    #[test]
    fn test_nested_persistence_round_trip() {
        let (public_key, mut signers) = mixed();
        signers.remove(0);
        let account = Account::from(MultiKeyAccount::new(public_key, signers, None).unwrap());
        let restored = Account::from_bytes(&account.to_bytes().unwrap()).unwrap();
        assert_eq!(restored.address(), account.address());
        assert_eq!(restored.public_key(), account.public_key());

        let Account::MultiKey(restored) = restored else {
            panic!("expected multi-key account");
        };
        assert_eq!(restored.signer_indices(), vec![1, 2]);
        restored.wait_for_proofs();
        let sig = restored.sign(b"m").unwrap();
        assert!(restored.verify_signature(b"m", &sig));
    }

    #[test]
    fn test_nested_multi_key_is_unsupported() {
        let (public_key, mut signers) = mixed();
        signers.truncate(2);
        let inner = Account::from(MultiKeyAccount::new(public_key, signers, None).unwrap());
        assert!(matches!(
            MultiKeySigner::try_from(inner),
            Err(AccountError::UnsupportedSigner(_))
        ));
    }
}
