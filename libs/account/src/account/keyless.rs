//! Keyless and federated keyless accounts
//!
//! Both variants share a session: a parsed JWT, an ephemeral key pair, the
//! pepper and a [`ProofSlot`]. Signing fails fast while the proof is
//! unresolved; callers wait explicitly with `wait_for_proof`.
//!
//! Transactions are signed through [`TransactionAndProof`] so that the
//! ephemeral signature also covers the proof.

use super::Result;
use crate::address::AccountAddress;
use crate::authenticator::AccountAuthenticator;
use crate::crypto::keyless::{
    EphemeralCertificate, FederatedKeylessPublicKey, KeylessPublicKey, KeylessSignature,
    PEPPER_LENGTH, ZeroKnowledgeSig,
};
use crate::crypto::single_key::{AnyPublicKey, AnySignature};
use crate::keyless::source::require_jwk;
use crate::keyless::{
    DEFAULT_UID_KEY, EphemeralKeyPair, JwkSource, Jwt, KeylessConfigSource, KeylessError,
    ProofSlot, ProofSource, ProofState,
};
use crate::transaction::{AnyRawTransaction, TransactionAndProof};
use movekey_bcs::{BcsError, Deserializer, Serializer};
use std::fmt;

const VERIFICATION_KEY_HASH_LENGTH: usize = 32;

/// Everything needed to open a keyless session
pub struct KeylessAccountParams {
    /// Address override for rotated accounts
    pub address: Option<AccountAddress>,
    /// Compact OIDC token whose nonce commits to `ephemeral_key_pair`
    pub jwt: String,
    /// Session key
    pub ephemeral_key_pair: EphemeralKeyPair,
    /// 31-byte pepper hiding the user id
    pub pepper: Vec<u8>,
    /// Claim identifying the user, `sub` when absent
    pub uid_key: Option<String>,
    /// Proof, available now or fetched in the background
    pub proof: ProofSource,
    /// Hash of the verification key the proof must have been made for
    pub verification_key_hash: Option<[u8; VERIFICATION_KEY_HASH_LENGTH]>,
}

impl KeylessAccountParams {
    /// Parameters with no address override, `sub` as uid claim and no pinned key
    pub fn new(
        jwt: impl Into<String>,
        ephemeral_key_pair: EphemeralKeyPair,
        pepper: Vec<u8>,
        proof: impl Into<ProofSource>,
    ) -> Self {
        Self {
            address: None,
            jwt: jwt.into(),
            ephemeral_key_pair,
            pepper,
            uid_key: None,
            proof: proof.into(),
            verification_key_hash: None,
        }
    }
}

#[derive(Clone)]
struct KeylessSession {
    jwt: Jwt,
    ephemeral_key_pair: EphemeralKeyPair,
    pepper: [u8; PEPPER_LENGTH],
    uid_key: String,
    proof: ProofSlot,
    verification_key_hash: Option<[u8; VERIFICATION_KEY_HASH_LENGTH]>,
}

impl KeylessSession {
    /// Session plus the keyless public key it authenticates as
    fn open(params: KeylessAccountParams) -> Result<(Self, KeylessPublicKey)> {
        let jwt = Jwt::parse(&params.jwt)?;
        let uid_key = params
            .uid_key
            .unwrap_or_else(|| DEFAULT_UID_KEY.to_string());
        let public_key = jwt.keyless_public_key(&params.pepper, &uid_key)?;
        let pepper = <[u8; PEPPER_LENGTH]>::try_from(params.pepper.as_slice()).map_err(|_| {
            KeylessError::InvalidPepperLength {
                expected: PEPPER_LENGTH,
                actual: params.pepper.len(),
            }
        })?;

        if jwt.nonce().ok() != Some(params.ephemeral_key_pair.nonce()) {
            log::warn!("JWT nonce does not commit to the ephemeral key pair");
        }

        let session = Self {
            jwt,
            ephemeral_key_pair: params.ephemeral_key_pair,
            pepper,
            uid_key,
            proof: ProofSlot::start(params.proof),
            verification_key_hash: params.verification_key_hash,
        };
        Ok((session, public_key))
    }

    fn require_proof(&self) -> Result<ZeroKnowledgeSig> {
        if self.ephemeral_key_pair.is_expired() {
            return Err(KeylessError::EphemeralKeyPairExpired.into());
        }
        self.proof
            .proof()
            .ok_or_else(|| KeylessError::ProofNotFound.into())
    }

    fn sign(&self, message: &[u8]) -> Result<KeylessSignature> {
        self.sign_with_proof(message, self.require_proof()?)
    }

    fn sign_with_proof(&self, message: &[u8], proof: ZeroKnowledgeSig) -> Result<KeylessSignature> {
        Ok(KeylessSignature {
            ephemeral_certificate: EphemeralCertificate::ZeroKnowledgeSig(proof),
            jwt_header: self.jwt.header_json().to_string(),
            exp_date_secs: self.ephemeral_key_pair.expiry_date_secs(),
            ephemeral_public_key: self.ephemeral_key_pair.public_key(),
            ephemeral_signature: self.ephemeral_key_pair.sign(message)?,
        })
    }

    fn sign_transaction(&self, transaction: &AnyRawTransaction) -> Result<KeylessSignature> {
        let proof = self.require_proof()?;
        let message = TransactionAndProof {
            transaction: transaction.signing_target(),
            proof: Some(proof.proof.clone()),
        }
        .signing_message()?;
        self.sign_with_proof(&message, proof)
    }

    fn check_validity(
        &self,
        config_source: &dyn KeylessConfigSource,
        jwk_source: &dyn JwkSource,
        jwk_address: &AccountAddress,
    ) -> std::result::Result<(), KeylessError> {
        if self.ephemeral_key_pair.is_expired() {
            return Err(KeylessError::EphemeralKeyPairExpired);
        }
        let proof = match self.proof.wait() {
            ProofState::Resolved(proof) => proof,
            ProofState::Failed(reason) => return Err(KeylessError::ProofFetchFailed(reason)),
            ProofState::Unresolved => return Err(KeylessError::ProofNotFound),
        };
        let kid = self.jwt.kid()?;
        let config = config_source.keyless_configuration()?;

        if let Some(pinned) = self.verification_key_hash {
            let published = config.verification_key.hash()?;
            if pinned != published {
                log::warn!("Pinned verification key no longer matches the published key");
                return Err(KeylessError::VerificationKeyMismatch {
                    pinned: hex::encode(pinned),
                    published: hex::encode(published),
                });
            }
        }
        if proof.exp_horizon_secs > config.max_exp_horizon_secs {
            return Err(KeylessError::ExpHorizonExceeded {
                exp_horizon_secs: proof.exp_horizon_secs,
                max_exp_horizon_secs: config.max_exp_horizon_secs,
            });
        }
        let iss = self.jwt.iss()?;
        require_jwk(jwk_source, jwk_address, iss, kid)?;
        log::debug!("Keyless session for {iss} passed validity checks");
        Ok(())
    }

    fn serialize(&self, serializer: &mut Serializer) -> Result<()> {
        let proof = self.proof.proof().ok_or(KeylessError::ProofNotFound)?;
        serializer.serialize_str(self.jwt.as_str());
        serializer.serialize_str(&self.uid_key);
        serializer.serialize_fixed_bytes(&self.pepper);
        serializer.serialize(&self.ephemeral_key_pair);
        serializer.serialize(&proof);
        serializer.serialize_option_fixed_bytes(
            self.verification_key_hash
                .as_ref()
                .map(<[u8; VERIFICATION_KEY_HASH_LENGTH]>::as_slice),
        );
        Ok(())
    }

    fn deserialize(deserializer: &mut Deserializer) -> Result<(Self, KeylessPublicKey)> {
        let jwt = deserializer.deserialize_str()?;
        let uid_key = deserializer.deserialize_str()?;
        let pepper = deserializer.deserialize_fixed_bytes(PEPPER_LENGTH)?;
        let ephemeral_key_pair = deserializer.deserialize()?;
        let proof: ZeroKnowledgeSig = deserializer.deserialize()?;
        let verification_key_hash = deserializer
            .deserialize_option_fixed_bytes(VERIFICATION_KEY_HASH_LENGTH)?
            .map(|bytes| {
                <[u8; VERIFICATION_KEY_HASH_LENGTH]>::try_from(bytes.as_slice())
                    .map_err(|_| BcsError::invalid_value("VerificationKeyHash", "expected 32 bytes"))
            })
            .transpose()?;
        Self::open(KeylessAccountParams {
            address: None,
            jwt,
            ephemeral_key_pair,
            pepper,
            uid_key: Some(uid_key),
            proof: ProofSource::Resolved(proof),
            verification_key_hash,
        })
    }
}

impl fmt::Debug for KeylessSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeylessSession")
            .field("iss", &self.jwt.iss().unwrap_or_default())
            .field("uid_key", &self.uid_key)
            .field("expiry_date_secs", &self.ephemeral_key_pair.expiry_date_secs())
            .field("proof", &self.proof)
            .finish_non_exhaustive()
    }
}

/// Accessors and signing shared by both keyless variants
macro_rules! impl_keyless_session {
    ($account:ty) => {
        impl $account {
            /// Account address
            pub fn address(&self) -> AccountAddress {
                self.address
            }

            /// The parsed token
            pub fn jwt(&self) -> &Jwt {
                &self.session.jwt
            }

            /// Session key
            pub fn ephemeral_key_pair(&self) -> &EphemeralKeyPair {
                &self.session.ephemeral_key_pair
            }

            /// Pepper hiding the user id
            pub fn pepper(&self) -> &[u8; PEPPER_LENGTH] {
                &self.session.pepper
            }

            /// Claim identifying the user
            pub fn uid_key(&self) -> &str {
                &self.session.uid_key
            }

            /// Pinned verification key hash
            pub fn verification_key_hash(&self) -> Option<&[u8; VERIFICATION_KEY_HASH_LENGTH]> {
                self.session.verification_key_hash.as_ref()
            }

            /// Whether the ephemeral key pair has expired
            pub fn is_expired(&self) -> bool {
                self.session.ephemeral_key_pair.is_expired()
            }

            /// Current proof state
            pub fn proof_state(&self) -> ProofState {
                self.session.proof.state()
            }

            /// The proof, if resolved
            pub fn proof(&self) -> Option<ZeroKnowledgeSig> {
                self.session.proof.proof()
            }

            /// Block until the background fetch and its callback have finished
            pub fn wait_for_proof(&self) -> ProofState {
                self.session.proof.wait()
            }

            /// Sign raw bytes.
            ///
            /// # Errors
            ///
            /// `EphemeralKeyPairExpired` once the session key has expired,
            /// then `ProofNotFound` until the proof has resolved.
            pub fn sign(&self, message: &[u8]) -> Result<KeylessSignature> {
                self.session.sign(message)
            }

            /// Sign raw bytes into an authenticator
            pub fn sign_with_authenticator(&self, message: &[u8]) -> Result<AccountAuthenticator> {
                Ok(AccountAuthenticator::SingleKey {
                    public_key: self.any_public_key(),
                    signature: AnySignature::Keyless(self.sign(message)?),
                })
            }

            /// Sign a transaction together with the proof
            pub fn sign_transaction(
                &self,
                transaction: &AnyRawTransaction,
            ) -> Result<KeylessSignature> {
                self.session.sign_transaction(transaction)
            }

            /// Sign a transaction into an authenticator
            pub fn sign_transaction_with_authenticator(
                &self,
                transaction: &AnyRawTransaction,
            ) -> Result<AccountAuthenticator> {
                Ok(AccountAuthenticator::SingleKey {
                    public_key: self.any_public_key(),
                    signature: AnySignature::Keyless(self.sign_transaction(transaction)?),
                })
            }

            /// Check a signature over raw bytes
            pub fn verify_signature(&self, message: &[u8], signature: &KeylessSignature) -> bool {
                self.public_key.verify_signature(message, signature)
            }
        }
    };
}

/// Account authenticated by an OIDC identity
#[derive(Debug, Clone)]
pub struct KeylessAccount {
    session: KeylessSession,
    public_key: KeylessPublicKey,
    address: AccountAddress,
}

impl_keyless_session!(KeylessAccount);

impl KeylessAccount {
    /// Open a session; a pending proof starts fetching immediately
    pub fn new(params: KeylessAccountParams) -> Result<Self> {
        let address = params.address;
        let (session, public_key) = KeylessSession::open(params)?;
        Ok(Self::from_session(session, public_key, address))
    }

    fn from_session(
        session: KeylessSession,
        public_key: KeylessPublicKey,
        address: Option<AccountAddress>,
    ) -> Self {
        let address = address.unwrap_or_else(|| public_key.auth_key().derived_address());
        log::debug!("Keyless account {address} for issuer {}", public_key.iss());
        Self {
            session,
            public_key,
            address,
        }
    }

    /// Keyless public key
    pub fn public_key(&self) -> &KeylessPublicKey {
        &self.public_key
    }

    /// Public key wrapped for single-key authenticators
    pub fn any_public_key(&self) -> AnyPublicKey {
        AnyPublicKey::Keyless(self.public_key.clone())
    }

    /// Wait for the proof and check it against the published configuration.
    ///
    /// JWKs are looked up under `0x1`, where issuer keys are published.
    pub fn check_validity(
        &self,
        config_source: &dyn KeylessConfigSource,
        jwk_source: &dyn JwkSource,
    ) -> Result<()> {
        Ok(self
            .session
            .check_validity(config_source, jwk_source, &AccountAddress::ONE)?)
    }

    pub(super) fn serialize_payload(&self, serializer: &mut Serializer) -> Result<()> {
        self.session.serialize(serializer)
    }

    pub(super) fn deserialize_payload(
        deserializer: &mut Deserializer,
        address: AccountAddress,
    ) -> Result<Self> {
        let (session, public_key) = KeylessSession::deserialize(deserializer)?;
        Ok(Self::from_session(session, public_key, Some(address)))
    }
}

/// Keyless account whose issuer keys are published at `jwk_address`
#[derive(Debug, Clone)]
pub struct FederatedKeylessAccount {
    session: KeylessSession,
    public_key: FederatedKeylessPublicKey,
    address: AccountAddress,
    audless: bool,
}

impl_keyless_session!(FederatedKeylessAccount);

impl FederatedKeylessAccount {
    /// Open a session trusting the JWKs at `jwk_address`
    pub fn new(
        params: KeylessAccountParams,
        jwk_address: AccountAddress,
        audless: bool,
    ) -> Result<Self> {
        let address = params.address;
        let (session, public_key) = KeylessSession::open(params)?;
        Ok(Self::from_session(
            session,
            FederatedKeylessPublicKey::new(jwk_address, public_key),
            address,
            audless,
        ))
    }

    fn from_session(
        session: KeylessSession,
        public_key: FederatedKeylessPublicKey,
        address: Option<AccountAddress>,
        audless: bool,
    ) -> Self {
        let address = address.unwrap_or_else(|| public_key.auth_key().derived_address());
        log::debug!(
            "Federated keyless account {address} trusting JWKs at {}",
            public_key.jwk_address()
        );
        Self {
            session,
            public_key,
            address,
            audless,
        }
    }

    /// Federated keyless public key
    pub fn public_key(&self) -> &FederatedKeylessPublicKey {
        &self.public_key
    }

    /// Public key wrapped for single-key authenticators
    pub fn any_public_key(&self) -> AnyPublicKey {
        AnyPublicKey::FederatedKeyless(self.public_key.clone())
    }

    /// Address holding the trusted JWKs
    pub fn jwk_address(&self) -> &AccountAddress {
        self.public_key.jwk_address()
    }

    /// Whether the identity was committed without an audience
    pub fn audless(&self) -> bool {
        self.audless
    }

    /// Wait for the proof and check it against the published configuration,
    /// looking JWKs up under [`Self::jwk_address`]
    pub fn check_validity(
        &self,
        config_source: &dyn KeylessConfigSource,
        jwk_source: &dyn JwkSource,
    ) -> Result<()> {
        Ok(self
            .session
            .check_validity(config_source, jwk_source, self.public_key.jwk_address())?)
    }

    pub(super) fn serialize_payload(&self, serializer: &mut Serializer) -> Result<()> {
        self.session.serialize(serializer)?;
        serializer.serialize(self.public_key.jwk_address());
        serializer.serialize_bool(self.audless);
        Ok(())
    }

    pub(super) fn deserialize_payload(
        deserializer: &mut Deserializer,
        address: AccountAddress,
    ) -> Result<Self> {
        let (session, public_key) = KeylessSession::deserialize(deserializer)?;
        let jwk_address = deserializer.deserialize()?;
        let audless = deserializer.deserialize_bool()?;
        Ok(Self::from_session(
            session,
            FederatedKeylessPublicKey::new(jwk_address, public_key),
            Some(address),
            audless,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Account, AccountError};
    use crate::keyless::{Jwk, JwkSet, KeylessConfiguration, ProofFetchStatus};
    use crate::test_utils::{
        FAR_FUTURE_SECS, TEST_ISS, keyless_params, synthetic_key_and_proof, test_proof,
        transfer_transaction,
    };
    use ark_bn254::Fr;
    use std::sync::mpsc;

    fn configuration(max_exp_horizon_secs: u64) -> KeylessConfiguration {
        KeylessConfiguration {
            verification_key: synthetic_key_and_proof(Fr::from(1u64)).0,
            max_exp_horizon_secs,
        }
    }

    fn jwks_at(address: AccountAddress) -> JwkSet {
        let mut jwks = JwkSet::new();
        jwks.insert(
            address,
            TEST_ISS,
            Jwk {
                kid: "test-kid".to_string(),
                kty: "RSA".to_string(),
                alg: "RS256".to_string(),
                e: "AQAB".to_string(),
                n: "test".to_string(),
            },
        );
        jwks
    }

    #[test]
    fn test_signature_verifies_and_binds_header() {
        let account = KeylessAccount::new(keyless_params("alice", 1, FAR_FUTURE_SECS)).unwrap();
        let sig = account.sign(b"hello").unwrap();
        assert!(account.verify_signature(b"hello", &sig));
        assert!(!account.verify_signature(b"other", &sig));
        assert_eq!(sig.jwt_header, account.jwt().header_json());
        assert_eq!(sig.exp_date_secs, FAR_FUTURE_SECS);
    }

    #[test]
    fn test_address_depends_on_user_not_session() {
        let first = KeylessAccount::new(keyless_params("alice", 1, FAR_FUTURE_SECS)).unwrap();
        let second = KeylessAccount::new(keyless_params("alice", 2, FAR_FUTURE_SECS)).unwrap();
        let other = KeylessAccount::new(keyless_params("bob", 1, FAR_FUTURE_SECS)).unwrap();
        assert_eq!(first.address(), second.address());
        assert_ne!(first.address(), other.address());
    }

    #[test]
    fn test_expired_session_refuses_to_sign() {
        let account = KeylessAccount::new(keyless_params("alice", 1, 1_000)).unwrap();
        assert!(account.is_expired());
        assert!(matches!(
            account.sign(b"m"),
            Err(AccountError::Keyless(KeylessError::EphemeralKeyPairExpired))
        ));
    }

    #[test]
    fn test_pending_proof_fails_fast_then_signs() {
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let mut params = keyless_params("alice", 1, FAR_FUTURE_SECS);
        params.proof = ProofSource::pending(
            move || {
                release_rx.recv().map_err(|e| e.to_string())?;
                Ok(test_proof())
            },
            |_| {},
        );
        let account = KeylessAccount::new(params).unwrap();
        assert!(matches!(
            account.sign(b"m"),
            Err(AccountError::Keyless(KeylessError::ProofNotFound))
        ));

        release_tx.send(()).unwrap();
        assert_eq!(account.wait_for_proof(), ProofState::Resolved(test_proof()));
        assert!(account.sign(b"m").is_ok());
    }

    #[test]
    fn test_transaction_signature_covers_proof() {
        let account = KeylessAccount::new(keyless_params("alice", 3, FAR_FUTURE_SECS)).unwrap();
        let txn = AnyRawTransaction::simple(transfer_transaction(account.address(), 0));
        let auth = account.sign_transaction_with_authenticator(&txn).unwrap();

        let with_proof = TransactionAndProof {
            transaction: txn.signing_target(),
            proof: Some(test_proof().proof),
        }
        .signing_message()
        .unwrap();
        assert!(auth.verify(&with_proof));
        assert!(!auth.verify(&txn.signing_message().unwrap()));
    }

    #[test]
    fn test_transaction_signature_embeds_the_proof_it_covers() {
        let account = KeylessAccount::new(keyless_params("alice", 4, FAR_FUTURE_SECS)).unwrap();
        let txn = AnyRawTransaction::fee_payer(
            transfer_transaction(account.address(), 2),
            vec![],
            AccountAddress::ZERO,
        );
        let signature = account.sign_transaction(&txn).unwrap();
        let EphemeralCertificate::ZeroKnowledgeSig(embedded) = &signature.ephemeral_certificate;
        assert_eq!(*embedded, test_proof());

        let covered = TransactionAndProof {
            transaction: txn.signing_target(),
            proof: Some(embedded.proof.clone()),
        }
        .signing_message()
        .unwrap();
        let for_signature = txn
            .signing_message_for(&AnySignature::Keyless(signature.clone()))
            .unwrap();
        assert_eq!(covered, for_signature);
        assert!(account.public_key().verify_signature(&covered, &signature));
    }

    #[test]
    fn test_check_validity_passes_with_published_jwk() {
        let mut params = keyless_params("alice", 1, FAR_FUTURE_SECS);
        let config = configuration(10_000);
        params.verification_key_hash = Some(config.verification_key.hash().unwrap());
        let account = KeylessAccount::new(params).unwrap();
        account
            .check_validity(&config, &jwks_at(AccountAddress::ONE))
            .unwrap();
    }

    #[test]
    fn test_check_validity_rejects_pinned_key_mismatch() {
        let mut params = keyless_params("alice", 1, FAR_FUTURE_SECS);
        params.verification_key_hash = Some([9; 32]);
        let account = KeylessAccount::new(params).unwrap();
        let err = account
            .check_validity(&configuration(10_000), &jwks_at(AccountAddress::ONE))
            .unwrap_err();
        assert!(matches!(
            err,
            AccountError::Keyless(KeylessError::VerificationKeyMismatch { .. })
        ));
    }

    #[test]
    fn test_check_validity_horizon_and_jwk() {
        let account = KeylessAccount::new(keyless_params("alice", 1, FAR_FUTURE_SECS)).unwrap();
        assert!(matches!(
            account.check_validity(&configuration(60), &jwks_at(AccountAddress::ONE)),
            Err(AccountError::Keyless(KeylessError::ExpHorizonExceeded { .. }))
        ));
        assert!(matches!(
            account.check_validity(&configuration(10_000), &JwkSet::new()),
            Err(AccountError::Keyless(KeylessError::JwkNotFound { .. }))
        ));
    }

    #[test]
    fn test_check_validity_reports_failed_fetch() {
        let (status_tx, status_rx) = mpsc::channel();
        let mut params = keyless_params("alice", 1, FAR_FUTURE_SECS);
        params.proof = ProofSource::pending(
            || Err("prover unavailable".to_string()),
            move |status| status_tx.send(status).unwrap(),
        );
        let account = KeylessAccount::new(params).unwrap();
        let err = account
            .check_validity(&configuration(10_000), &jwks_at(AccountAddress::ONE))
            .unwrap_err();
        assert!(matches!(
            err,
            AccountError::Keyless(KeylessError::ProofFetchFailed(reason)) if reason == "prover unavailable"
        ));
        assert_eq!(
            status_rx.recv().unwrap(),
            ProofFetchStatus::Failed("prover unavailable".to_string())
        );
    }

    #[test]
    fn test_federated_uses_jwk_address() {
        let jwk_address = AccountAddress::from_str_relaxed("0xfeed").unwrap();
        let account =
            FederatedKeylessAccount::new(keyless_params("alice", 1, FAR_FUTURE_SECS), jwk_address, false)
                .unwrap();
        let plain = KeylessAccount::new(keyless_params("alice", 1, FAR_FUTURE_SECS)).unwrap();
        assert_ne!(account.address(), plain.address());

        assert!(account
            .check_validity(&configuration(10_000), &jwks_at(jwk_address))
            .is_ok());
        assert!(matches!(
            account.check_validity(&configuration(10_000), &jwks_at(AccountAddress::ONE)),
            Err(AccountError::Keyless(KeylessError::JwkNotFound { .. }))
        ));
    }

    #[test]
    fn test_persistence_round_trip() {
        let jwk_address = AccountAddress::from_str_relaxed("0xfeed").unwrap();
        let federated = Account::from(
            FederatedKeylessAccount::new(keyless_params("carol", 4, FAR_FUTURE_SECS), jwk_address, true)
                .unwrap(),
        );
        let bytes = federated.to_bytes().unwrap();
        let Account::FederatedKeyless(restored) = Account::from_bytes(&bytes).unwrap() else {
            panic!("expected federated keyless account");
        };
        assert!(restored.audless());
        assert_eq!(restored.jwk_address(), &jwk_address);
        assert_eq!(restored.address(), federated.address());
        assert_eq!(restored.proof(), Some(test_proof()));
    }

    #[test]
    fn test_unresolved_proof_cannot_be_persisted() {
        let (_release_tx, release_rx) = mpsc::channel::<()>();
        let mut params = keyless_params("alice", 1, FAR_FUTURE_SECS);
        params.proof = ProofSource::pending(
            move || {
                let _ = release_rx.recv();
                Ok(test_proof())
            },
            |_| {},
        );
        let account = Account::from(KeylessAccount::new(params).unwrap());
        assert!(matches!(
            account.to_bytes(),
            Err(AccountError::Keyless(KeylessError::ProofNotFound))
        ));
    }

    #[test]
    fn test_debug_omits_pepper() {
        let account = KeylessAccount::new(keyless_params("alice", 1, FAR_FUTURE_SECS)).unwrap();
        let debug = format!("{account:?}");
        assert!(!debug.contains("pepper"));
        assert!(debug.contains(TEST_ISS));
    }
}
