//! Narrow interfaces to on-chain keyless configuration and JWKs

use super::{KeylessError, Result};
use crate::address::AccountAddress;
use crate::crypto::groth16::Groth16VerificationKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// On-chain keyless parameters relevant to signing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeylessConfiguration {
    /// Current Groth16 verification key
    pub verification_key: Groth16VerificationKey,
    /// Largest expiry horizon a proof may use
    pub max_exp_horizon_secs: u64,
}

/// Provides the current [`KeylessConfiguration`]
pub trait KeylessConfigSource {
    /// Fetch the configuration
    fn keyless_configuration(&self) -> Result<KeylessConfiguration>;
}

impl KeylessConfigSource for KeylessConfiguration {
    fn keyless_configuration(&self) -> Result<KeylessConfiguration> {
        Ok(self.clone())
    }
}

/// An RSA JSON Web Key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    /// Key id
    pub kid: String,
    /// Key type, `RSA`
    pub kty: String,
    /// Algorithm, `RS256`
    pub alg: String,
    /// Public exponent, base64url
    pub e: String,
    /// Modulus, base64url
    pub n: String,
}

/// Looks up a JWK published under an account address
pub trait JwkSource {
    /// Find the key for `iss` and `kid` stored at `jwk_address`
    fn fetch_jwk(&self, jwk_address: &AccountAddress, iss: &str, kid: &str) -> Result<Option<Jwk>>;
}

/// In-memory JWK store
#[derive(Debug, Clone, Default)]
pub struct JwkSet {
    keys: HashMap<(AccountAddress, String, String), Jwk>,
}

impl JwkSet {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `jwk` for `iss` at `jwk_address`
    pub fn insert(&mut self, jwk_address: AccountAddress, iss: impl Into<String>, jwk: Jwk) {
        self.keys
            .insert((jwk_address, iss.into(), jwk.kid.clone()), jwk);
    }
}

impl JwkSource for JwkSet {
    fn fetch_jwk(&self, jwk_address: &AccountAddress, iss: &str, kid: &str) -> Result<Option<Jwk>> {
        Ok(self
            .keys
            .get(&(*jwk_address, iss.to_string(), kid.to_string()))
            .cloned())
    }
}

/// Fetch a JWK or fail with [`KeylessError::JwkNotFound`]
pub fn require_jwk(
    source: &dyn JwkSource,
    jwk_address: &AccountAddress,
    iss: &str,
    kid: &str,
) -> Result<Jwk> {
    source
        .fetch_jwk(jwk_address, iss, kid)?
        .ok_or_else(|| KeylessError::JwkNotFound {
            iss: iss.to_string(),
            kid: kid.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwk(kid: &str) -> Jwk {
        Jwk {
            kid: kid.to_string(),
            kty: "RSA".to_string(),
            alg: "RS256".to_string(),
            e: "AQAB".to_string(),
            n: "sXch".to_string(),
        }
    }

    #[test]
    fn test_jwk_set_scopes_by_address_and_issuer() {
        let mut set = JwkSet::new();
        set.insert(AccountAddress::ONE, "iss", jwk("k1"));

        assert_eq!(
            require_jwk(&set, &AccountAddress::ONE, "iss", "k1").unwrap(),
            jwk("k1")
        );
        assert!(matches!(
            require_jwk(&set, &AccountAddress::FOUR, "iss", "k1"),
            Err(KeylessError::JwkNotFound { .. })
        ));
        assert!(matches!(
            require_jwk(&set, &AccountAddress::ONE, "other", "k1"),
            Err(KeylessError::JwkNotFound { .. })
        ));
    }

    #[test]
    fn test_jwk_json_shape() {
        let parsed: Jwk = serde_json::from_str(
            r#"{"kid":"k1","kty":"RSA","alg":"RS256","e":"AQAB","n":"sXch"}"#,
        )
        .unwrap();
        assert_eq!(parsed, jwk("k1"));
    }
}
