//! Account authentication for Move-based chains
//!
//! This library derives addresses and builds authenticators for every account
//! shape the chain accepts: legacy Ed25519, single keys on any supported
//! curve, K-of-N multi-signature and multi-key accounts, keyless (OIDC plus
//! Groth16 proof) sessions and function-authenticated abstract accounts.
//! Everything it produces is BCS bytes ready for a submission layer to post.
//!
//! # Modules
//!
//! - `address`, `auth_key`: 32-byte addresses and their derivation schemes
//! - `crypto`: keys, signatures, multi-signer bitmaps, Poseidon and Groth16
//! - `keyless`: ephemeral key pairs, JWT claims and the proof lifecycle
//! - `account`: the [`Account`] enum and its variants
//! - `transaction`, `authenticator`: signing messages and authenticators
//!
//! # Example
//!
//! ```rust
//! use movekey_account::account::{Account, SingleKeyAccount};
//! use movekey_account::crypto::ed25519::Ed25519PrivateKey;
//!
//! let account = Account::from(SingleKeyAccount::new(
//!     Ed25519PrivateKey::from_seed(&[7u8; 32]),
//!     None,
//! ));
//! let signature = account.sign(b"hello").unwrap();
//! assert!(account.verify_signature(b"hello", &signature));
//! println!("Account address: {}", account.address());
//! ```

#![warn(missing_docs)]

pub mod account;
pub mod address;
pub mod auth_key;
pub mod authenticator;
pub mod config;
pub mod crypto;
pub mod keyless;
/// Deterministic keys, tokens and transactions for tests
pub mod test_utils;
pub mod transaction;

// Re-export commonly used types
pub use account::{Account, AccountError, AccountPublicKey, AccountSignature};
pub use address::{AccountAddress, AddressError};
pub use auth_key::{AuthenticationKey, FunctionInfo, Scheme};
pub use authenticator::{AccountAuthenticator, TransactionAuthenticator};
pub use config::{AccountConfig, ConfigError};
pub use crypto::CryptoError;
pub use keyless::{EphemeralKeyPair, KeylessError, ProofSource, ProofState};
pub use transaction::{AnyRawTransaction, RawTransaction, SignedTransaction, TransactionError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
