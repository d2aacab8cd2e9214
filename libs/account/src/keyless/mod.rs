//! Keyless session lifecycle
//!
//! A keyless account signs with a short-lived [`EphemeralKeyPair`] whose
//! nonce was embedded in an OIDC token. A Groth16 proof links the token to
//! the ephemeral key. The proof may arrive later than the account is
//! constructed; [`ProofSlot`] tracks that single transition.

pub mod ephemeral_key_pair;
pub mod jwt;
pub mod proof;
pub mod source;

pub use ephemeral_key_pair::EphemeralKeyPair;
pub use jwt::Jwt;
pub use proof::{ProofFetchStatus, ProofSlot, ProofSource, ProofState};
pub use source::{Jwk, JwkSet, JwkSource, KeylessConfigSource, KeylessConfiguration};

use crate::crypto::CryptoError;
use movekey_bcs::BcsError;
use thiserror::Error;

/// JWT claim identifying the user when none is specified
pub const DEFAULT_UID_KEY: &str = "sub";

/// Keyless errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeylessError {
    /// No proof is available yet, or fetching it failed
    #[error("Proof not found; wait for the proof to resolve before signing")]
    ProofNotFound,

    /// The proof source reported an error
    #[error("Proof fetch failed: {0}")]
    ProofFetchFailed(String),

    /// The ephemeral key pair is past its expiry
    #[error("Ephemeral key pair has expired")]
    EphemeralKeyPairExpired,

    /// Pinned verification key differs from the published one
    #[error("Verification key mismatch: pinned {pinned}, published {published}")]
    VerificationKeyMismatch {
        /// Hex of the hash the account was created with
        pinned: String,
        /// Hex of the hash currently published
        published: String,
    },

    /// JWT header carries no `kid`
    #[error("JWT header is missing kid")]
    MissingKid,

    /// Malformed token or claims
    #[error("JWT parsing failed: {0}")]
    JwtParsing(String),

    /// Pepper is not 31 bytes
    #[error("Invalid pepper length: expected {expected}, got {actual}")]
    InvalidPepperLength {
        /// Required size
        expected: usize,
        /// Supplied size
        actual: usize,
    },

    /// No JWK is published for the token's issuer and key id
    #[error("No JWK found for issuer {iss} with kid {kid}")]
    JwkNotFound {
        /// Token issuer
        iss: String,
        /// Token key id
        kid: String,
    },

    /// Proof allows a longer session than the chain accepts
    #[error("Expiry horizon {exp_horizon_secs}s exceeds maximum {max_exp_horizon_secs}s")]
    ExpHorizonExceeded {
        /// Horizon in the proof
        exp_horizon_secs: u64,
        /// On-chain maximum
        max_exp_horizon_secs: u64,
    },

    /// A configuration or JWK source failed
    #[error("Source error: {0}")]
    Source(String),

    /// Key material error
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Codec error
    #[error(transparent)]
    Bcs(#[from] BcsError),
}

/// Result type for keyless operations
pub type Result<T> = std::result::Result<T, KeylessError>;
