//! Ephemeral key pairs for keyless sessions

use super::{KeylessError, Result};
use crate::config::AccountConfig;
use crate::crypto::ed25519::Ed25519PrivateKey;
use crate::crypto::ephemeral::{EphemeralPublicKey, EphemeralSignature};
use crate::crypto::keyless::{MAX_COMMITED_EPK_BYTES, now_secs};
use crate::crypto::poseidon::{
    bytes_to_field_le, field_to_decimal, pad_and_pack_bytes_with_len, poseidon_hash,
};
use crate::crypto::random_bytes;
use ark_bn254::Fr;
use movekey_bcs::{BcsError, Deserializable, Deserializer, Serializable, Serializer};

/// Blinder size
pub const BLINDER_LENGTH: usize = 31;

/// Default session lifetime, two weeks
pub const DEFAULT_EPHEMERAL_LIFETIME_SECS: u64 = 1_209_600;

const SECS_PER_HOUR: u64 = 3600;
const ED25519_VARIANT: u32 = 0;

/// Short-lived Ed25519 key bound into an OIDC nonce
#[derive(Debug, Clone, PartialEq)]
pub struct EphemeralKeyPair {
    private_key: Ed25519PrivateKey,
    public_key: EphemeralPublicKey,
    expiry_date_secs: u64,
    blinder: [u8; BLINDER_LENGTH],
    nonce: String,
}

fn floor_to_whole_hour(secs: u64) -> u64 {
    secs - secs % SECS_PER_HOUR
}

impl EphemeralKeyPair {
    /// Build from known parts and compute the nonce
    pub fn new(
        private_key: Ed25519PrivateKey,
        expiry_date_secs: u64,
        blinder: [u8; BLINDER_LENGTH],
    ) -> Result<Self> {
        let public_key = EphemeralPublicKey::Ed25519(private_key.public_key());
        let nonce = Self::compute_nonce(&public_key, expiry_date_secs, &blinder)?;
        Ok(Self {
            private_key,
            public_key,
            expiry_date_secs,
            blinder,
            nonce,
        })
    }

    /// Fresh key pair expiring two weeks from now, floored to the hour
    pub fn generate() -> Result<Self> {
        Self::generate_with_lifetime(DEFAULT_EPHEMERAL_LIFETIME_SECS)
    }

    /// Fresh key pair using the configured lifetime
    pub fn generate_with_config(config: &AccountConfig) -> Result<Self> {
        Self::generate_with_lifetime(config.ephemeral_lifetime_secs)
    }

    fn generate_with_lifetime(lifetime_secs: u64) -> Result<Self> {
        let private_key = Ed25519PrivateKey::generate()?;
        let blinder = random_bytes::<31>()?;
        let expiry = floor_to_whole_hour(now_secs().saturating_add(lifetime_secs));
        log::debug!("Generated ephemeral key pair expiring at {expiry}");
        Self::new(private_key, expiry, blinder)
    }

    fn compute_nonce(
        public_key: &EphemeralPublicKey,
        expiry_date_secs: u64,
        blinder: &[u8; BLINDER_LENGTH],
    ) -> Result<String> {
        let mut fields =
            pad_and_pack_bytes_with_len(&movekey_bcs::to_bytes(public_key), MAX_COMMITED_EPK_BYTES)?;
        fields.push(Fr::from(expiry_date_secs));
        fields.push(bytes_to_field_le(blinder));
        Ok(field_to_decimal(&poseidon_hash(&fields)?))
    }

    /// Public half
    pub fn public_key(&self) -> EphemeralPublicKey {
        self.public_key
    }

    /// Expiry in seconds since the epoch
    pub fn expiry_date_secs(&self) -> u64 {
        self.expiry_date_secs
    }

    /// Blinder mixed into the nonce
    pub fn blinder(&self) -> &[u8; BLINDER_LENGTH] {
        &self.blinder
    }

    /// Decimal nonce to request the OIDC token with
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// Whether the key pair is past its expiry now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_secs())
    }

    /// Whether the key pair is past its expiry at `now_secs`
    pub fn is_expired_at(&self, now_secs: u64) -> bool {
        now_secs > self.expiry_date_secs
    }

    /// Sign with the ephemeral key; refused once expired
    pub fn sign(&self, message: &[u8]) -> Result<EphemeralSignature> {
        if self.is_expired() {
            return Err(KeylessError::EphemeralKeyPairExpired);
        }
        Ok(EphemeralSignature::Ed25519(self.private_key.sign(message)))
    }

    /// BCS bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        movekey_bcs::to_bytes(self)
    }

    /// Decode and recompute the nonce
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(movekey_bcs::from_bytes(bytes)?)
    }
}

impl Serializable for EphemeralKeyPair {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(ED25519_VARIANT);
        serializer.serialize(&self.private_key);
        serializer.serialize_u64(self.expiry_date_secs);
        serializer.serialize_fixed_bytes(&self.blinder);
    }
}

impl Deserializable for EphemeralKeyPair {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        let variant = deserializer.deserialize_variant_index()?;
        if variant != ED25519_VARIANT {
            return Err(BcsError::unsupported_variant("EphemeralKeyPair", variant));
        }
        let private_key = deserializer.deserialize()?;
        let expiry = deserializer.deserialize_u64()?;
        let blinder = deserializer.deserialize_fixed_array()?;
        Self::new(private_key, expiry, blinder)
            .map_err(|e| BcsError::invalid_value("EphemeralKeyPair", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_pair(expiry: u64) -> EphemeralKeyPair {
        EphemeralKeyPair::new(Ed25519PrivateKey::from_seed(&[3; 32]), expiry, [5; 31]).unwrap()
    }

    #[test]
    fn test_generated_expiry_is_on_the_hour() {
        let pair = EphemeralKeyPair::generate().unwrap();
        assert_eq!(pair.expiry_date_secs() % 3600, 0);
        let now = now_secs();
        assert!(pair.expiry_date_secs() > now + DEFAULT_EPHEMERAL_LIFETIME_SECS - 3600);
        assert!(pair.expiry_date_secs() <= now + DEFAULT_EPHEMERAL_LIFETIME_SECS);
        assert!(!pair.is_expired());
    }

    #[test]
    fn test_config_lifetime() {
        let config = AccountConfig {
            ephemeral_lifetime_secs: 7200,
            ..AccountConfig::default()
        };
        let pair = EphemeralKeyPair::generate_with_config(&config).unwrap();
        assert!(pair.expiry_date_secs() <= now_secs() + 7200);
    }

    #[test]
    fn test_nonce_depends_on_every_input() {
        let base = fixed_pair(1_800_000_000);
        assert_eq!(base.nonce(), fixed_pair(1_800_000_000).nonce());
        assert!(base.nonce().chars().all(|c| c.is_ascii_digit()));

        assert_ne!(base.nonce(), fixed_pair(1_800_003_600).nonce());
        let other_blinder =
            EphemeralKeyPair::new(Ed25519PrivateKey::from_seed(&[3; 32]), 1_800_000_000, [6; 31])
                .unwrap();
        assert_ne!(base.nonce(), other_blinder.nonce());
        let other_key =
            EphemeralKeyPair::new(Ed25519PrivateKey::from_seed(&[4; 32]), 1_800_000_000, [5; 31])
                .unwrap();
        assert_ne!(base.nonce(), other_key.nonce());
    }

    #[test]
    fn test_expired_pair_refuses_to_sign() {
        let pair = fixed_pair(1);
        assert!(pair.is_expired());
        assert_eq!(pair.sign(b"msg"), Err(KeylessError::EphemeralKeyPairExpired));

        let live = fixed_pair(now_secs() + 3600);
        let sig = live.sign(b"msg").unwrap();
        assert!(live.public_key().verify_signature(b"msg", &sig));
    }

    #[test]
    fn test_expiry_boundary() {
        let pair = fixed_pair(1000);
        assert!(!pair.is_expired_at(1000));
        assert!(pair.is_expired_at(1001));
    }

    #[test]
    fn test_bytes_layout() {
        let pair = fixed_pair(1_800_000_000);
        let bytes = pair.to_bytes();
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[1], 32);
        assert_eq!(bytes.len(), 1 + 1 + 32 + 8 + 31);
        let decoded = EphemeralKeyPair::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, pair);
        assert_eq!(decoded.nonce(), pair.nonce());
    }
}
