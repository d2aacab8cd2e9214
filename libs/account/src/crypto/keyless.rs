//! Keyless public keys, signatures and proofs
//!
//! A keyless public key commits to an OIDC identity:
//! `Poseidon(pepper, H(aud), H(uid_val), H(uid_key))` where each `H` is the
//! length-padded string hash from [`poseidon`](super::poseidon). The key is
//! bound to a session by an ephemeral key pair and a Groth16 proof.

use super::ephemeral::{EphemeralPublicKey, EphemeralSignature};
use super::poseidon::{bytes_to_field_le, field_to_bytes_le, hash_str_to_field, poseidon_hash};
use super::single_key::AnyPublicKey;
use super::{CryptoError, Result};
use crate::address::AccountAddress;
use crate::auth_key::AuthenticationKey;
use movekey_bcs::{BcsError, Deserializable, Deserializer, Serializable, Serializer};
use std::time::{SystemTime, UNIX_EPOCH};

/// Id commitment size
pub const ID_COMMITMENT_LENGTH: usize = 32;
/// Pepper size
pub const PEPPER_LENGTH: usize = 31;
/// Padded size for the `aud` claim
pub const MAX_AUD_VAL_BYTES: usize = 120;
/// Padded size for the uid claim name
pub const MAX_UID_KEY_BYTES: usize = 30;
/// Padded size for the uid claim value
pub const MAX_UID_VAL_BYTES: usize = 330;
/// Padded size for the `iss` claim
pub const MAX_ISS_VAL_BYTES: usize = 120;
/// Padded size for the revealed extra field
pub const MAX_EXTRA_FIELD_BYTES: usize = 350;
/// Padded size for the base64 JWT header
pub const MAX_JWT_HEADER_B64_BYTES: usize = 300;
/// Padded size for the serialized ephemeral public key in the nonce
pub const MAX_COMMITED_EPK_BYTES: usize = 93;

/// Seconds since the Unix epoch
pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Identity commitment under an OIDC issuer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeylessPublicKey {
    iss: String,
    id_commitment: [u8; ID_COMMITMENT_LENGTH],
}

impl KeylessPublicKey {
    /// Wrap an existing commitment
    pub fn new(iss: impl Into<String>, id_commitment: &[u8]) -> Result<Self> {
        let id_commitment = id_commitment
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: ID_COMMITMENT_LENGTH,
                actual: id_commitment.len(),
            })?;
        Ok(Self {
            iss: iss.into(),
            id_commitment,
        })
    }

    /// Compute the commitment from identity claims and a 31-byte pepper
    pub fn create(iss: &str, uid_key: &str, uid_val: &str, aud: &str, pepper: &[u8]) -> Result<Self> {
        if pepper.len() != PEPPER_LENGTH {
            return Err(CryptoError::InvalidKeyless(format!(
                "pepper must be {PEPPER_LENGTH} bytes, got {}",
                pepper.len()
            )));
        }
        let fields = [
            bytes_to_field_le(pepper),
            hash_str_to_field(aud, MAX_AUD_VAL_BYTES)?,
            hash_str_to_field(uid_val, MAX_UID_VAL_BYTES)?,
            hash_str_to_field(uid_key, MAX_UID_KEY_BYTES)?,
        ];
        let commitment = poseidon_hash(&fields)?;
        Ok(Self {
            iss: iss.to_string(),
            id_commitment: field_to_bytes_le(&commitment),
        })
    }

    /// Issuer
    pub fn iss(&self) -> &str {
        &self.iss
    }

    /// Identity commitment bytes
    pub fn id_commitment(&self) -> &[u8; ID_COMMITMENT_LENGTH] {
        &self.id_commitment
    }

    /// Single-key authentication key of the wrapped key
    pub fn auth_key(&self) -> AuthenticationKey {
        AnyPublicKey::Keyless(self.clone()).auth_key()
    }

    /// Check the ephemeral signature and that the session has not expired.
    ///
    /// The zero-knowledge relation is checked separately with
    /// [`Groth16VerificationKey::verify_proof`](super::groth16::Groth16VerificationKey::verify_proof).
    pub fn verify_signature(&self, message: &[u8], signature: &KeylessSignature) -> bool {
        signature.exp_date_secs >= now_secs()
            && signature
                .ephemeral_public_key
                .verify_signature(message, &signature.ephemeral_signature)
    }
}

impl Serializable for KeylessPublicKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_str(&self.iss);
        serializer.serialize_bytes(&self.id_commitment);
    }
}

impl Deserializable for KeylessPublicKey {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        let iss = deserializer.deserialize_str()?;
        let commitment = deserializer.deserialize_bytes()?;
        Self::new(iss, &commitment).map_err(|e| super::to_bcs_error("KeylessPublicKey", &e))
    }
}

/// Keyless key whose JWKs are published at `jwk_address` instead of `0x1`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FederatedKeylessPublicKey {
    jwk_address: AccountAddress,
    keyless_public_key: KeylessPublicKey,
}

impl FederatedKeylessPublicKey {
    /// Pair a keyless key with the address holding its JWKs
    pub fn new(jwk_address: AccountAddress, keyless_public_key: KeylessPublicKey) -> Self {
        Self {
            jwk_address,
            keyless_public_key,
        }
    }

    /// Where the issuer's JWKs are published
    pub fn jwk_address(&self) -> &AccountAddress {
        &self.jwk_address
    }

    /// Inner keyless key
    pub fn keyless_public_key(&self) -> &KeylessPublicKey {
        &self.keyless_public_key
    }

    /// Single-key authentication key of the wrapped key
    pub fn auth_key(&self) -> AuthenticationKey {
        AnyPublicKey::FederatedKeyless(self.clone()).auth_key()
    }

    /// Same checks as [`KeylessPublicKey::verify_signature`]
    pub fn verify_signature(&self, message: &[u8], signature: &KeylessSignature) -> bool {
        self.keyless_public_key.verify_signature(message, signature)
    }
}

impl Serializable for FederatedKeylessPublicKey {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize(&self.jwk_address);
        serializer.serialize(&self.keyless_public_key);
    }
}

impl Deserializable for FederatedKeylessPublicKey {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        let jwk_address = deserializer.deserialize()?;
        let keyless_public_key = deserializer.deserialize()?;
        Ok(Self {
            jwk_address,
            keyless_public_key,
        })
    }
}

/// Groth16 proof points, compressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Groth16Zkp {
    /// A in G1
    pub a: [u8; 32],
    /// B in G2
    pub b: [u8; 64],
    /// C in G1
    pub c: [u8; 32],
}

impl Serializable for Groth16Zkp {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_fixed_bytes(&self.a);
        serializer.serialize_fixed_bytes(&self.b);
        serializer.serialize_fixed_bytes(&self.c);
    }
}

impl Deserializable for Groth16Zkp {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        Ok(Self {
            a: deserializer.deserialize_fixed_array()?,
            b: deserializer.deserialize_fixed_array()?,
            c: deserializer.deserialize_fixed_array()?,
        })
    }
}

/// A zero-knowledge proof of any supported system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZkProof {
    /// Groth16 over BN254
    Groth16(Groth16Zkp),
}

impl ZkProof {
    const GROTH16_TAG: u32 = 0;

    /// Wire tag
    pub const fn tag(&self) -> u32 {
        match self {
            Self::Groth16(_) => Self::GROTH16_TAG,
        }
    }
}

impl Serializable for ZkProof {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(self.tag());
        match self {
            Self::Groth16(proof) => proof.serialize(serializer),
        }
    }
}

impl Deserializable for ZkProof {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        match deserializer.deserialize_variant_index()? {
            Self::GROTH16_TAG => Ok(Self::Groth16(deserializer.deserialize()?)),
            tag => Err(BcsError::unsupported_variant("ZkProof", tag)),
        }
    }
}

/// Proof plus the auxiliary data the relation was proven over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroKnowledgeSig {
    /// The proof
    pub proof: ZkProof,
    /// Largest allowed gap between JWT `iat` and ephemeral expiry
    pub exp_horizon_secs: u64,
    /// Extra JWT claim revealed by the proof, as `"name":value`
    pub extra_field: Option<String>,
    /// `aud` used in place of the JWT's, for recovery flows
    pub override_aud_val: Option<String>,
    /// Prover service co-signature
    pub training_wheels_signature: Option<EphemeralSignature>,
}

impl ZeroKnowledgeSig {
    /// A proof with no auxiliary fields
    pub fn new(proof: ZkProof, exp_horizon_secs: u64) -> Self {
        Self {
            proof,
            exp_horizon_secs,
            extra_field: None,
            override_aud_val: None,
            training_wheels_signature: None,
        }
    }
}

impl Serializable for ZeroKnowledgeSig {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize(&self.proof);
        serializer.serialize_u64(self.exp_horizon_secs);
        serializer.serialize_option_str(self.extra_field.as_deref());
        serializer.serialize_option_str(self.override_aud_val.as_deref());
        serializer.serialize_option(self.training_wheels_signature.as_ref());
    }
}

impl Deserializable for ZeroKnowledgeSig {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        Ok(Self {
            proof: deserializer.deserialize()?,
            exp_horizon_secs: deserializer.deserialize_u64()?,
            extra_field: deserializer.deserialize_option_str()?,
            override_aud_val: deserializer.deserialize_option_str()?,
            training_wheels_signature: deserializer.deserialize_option()?,
        })
    }
}

/// What certifies the ephemeral key inside a keyless signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EphemeralCertificate {
    /// A zero-knowledge proof
    ZeroKnowledgeSig(ZeroKnowledgeSig),
}

impl EphemeralCertificate {
    const ZK_PROOF_TAG: u32 = 0;

    /// Wire tag
    pub const fn tag(&self) -> u32 {
        match self {
            Self::ZeroKnowledgeSig(_) => Self::ZK_PROOF_TAG,
        }
    }
}

impl Serializable for EphemeralCertificate {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(self.tag());
        match self {
            Self::ZeroKnowledgeSig(sig) => sig.serialize(serializer),
        }
    }
}

impl Deserializable for EphemeralCertificate {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        match deserializer.deserialize_variant_index()? {
            Self::ZK_PROOF_TAG => Ok(Self::ZeroKnowledgeSig(deserializer.deserialize()?)),
            tag => Err(BcsError::unsupported_variant("EphemeralCertificate", tag)),
        }
    }
}

/// Signature produced by a keyless account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeylessSignature {
    /// Certificate binding the ephemeral key to the identity
    pub ephemeral_certificate: EphemeralCertificate,
    /// Decoded JWT header JSON
    pub jwt_header: String,
    /// Ephemeral key expiry
    pub exp_date_secs: u64,
    /// Key that produced `ephemeral_signature`
    pub ephemeral_public_key: EphemeralPublicKey,
    /// Signature over the message
    pub ephemeral_signature: EphemeralSignature,
}

impl Serializable for KeylessSignature {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize(&self.ephemeral_certificate);
        serializer.serialize_str(&self.jwt_header);
        serializer.serialize_u64(self.exp_date_secs);
        serializer.serialize(&self.ephemeral_public_key);
        serializer.serialize(&self.ephemeral_signature);
    }
}

impl Deserializable for KeylessSignature {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        Ok(Self {
            ephemeral_certificate: deserializer.deserialize()?,
            jwt_header: deserializer.deserialize_str()?,
            exp_date_secs: deserializer.deserialize_u64()?,
            ephemeral_public_key: deserializer.deserialize()?,
            ephemeral_signature: deserializer.deserialize()?,
        })
    }
}
