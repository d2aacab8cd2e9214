//! Accounts authenticated by a Move function
//!
//! These accounts hold no key. A caller-supplied signer turns the SHA3-256
//! digest of the signing message into whatever bytes the account's
//! authentication function expects.

use super::{AccountError, Result};
use crate::address::AccountAddress;
use crate::auth_key::{AuthenticationKey, FunctionInfo};
use crate::authenticator::{AbstractionAuthData, AccountAuthenticator};
use crate::crypto::sha3_256;
use crate::transaction::AnyRawTransaction;
use std::fmt;
use std::sync::Arc;

/// Produces the authenticator bytes for a signing-message digest
pub type AbstractSigner =
    Arc<dyn Fn(&[u8]) -> std::result::Result<Vec<u8>, String> + Send + Sync>;

/// Stand-in public key for function-authenticated accounts.
///
/// It names the account and nothing else; verification always fails because
/// only the on-chain function can judge the authenticator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AbstractPublicKey {
    address: AccountAddress,
}

impl AbstractPublicKey {
    /// Placeholder for `address`
    pub const fn new(address: AccountAddress) -> Self {
        Self { address }
    }

    /// The account this key stands for
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Always `false`
    pub fn verify_signature(&self, _message: &[u8], _signature: &[u8]) -> bool {
        false
    }
}

fn run_signer(signer: &AbstractSigner, digest: &[u8]) -> Result<Vec<u8>> {
    signer(digest).map_err(|reason| {
        log::warn!("Abstract signer failed: {reason}");
        AccountError::Signer(reason)
    })
}

/// Account at a fixed address whose authentication function was set on chain
#[derive(Clone)]
pub struct AbstractedAccount {
    address: AccountAddress,
    function_info: FunctionInfo,
    signer: AbstractSigner,
}

impl AbstractedAccount {
    /// Account at `address` authenticated by `function_info`
    pub fn new<F>(address: AccountAddress, function_info: FunctionInfo, signer: F) -> Self
    where
        F: Fn(&[u8]) -> std::result::Result<Vec<u8>, String> + Send + Sync + 'static,
    {
        Self {
            address,
            function_info,
            signer: Arc::new(signer),
        }
    }

    /// Replace the signer, for callers whose signing context arrives later
    pub fn set_signer<F>(&mut self, signer: F)
    where
        F: Fn(&[u8]) -> std::result::Result<Vec<u8>, String> + Send + Sync + 'static,
    {
        self.signer = Arc::new(signer);
    }

    /// Account address
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Authentication function
    pub fn function_info(&self) -> &FunctionInfo {
        &self.function_info
    }

    /// Placeholder public key
    pub fn public_key(&self) -> AbstractPublicKey {
        AbstractPublicKey::new(self.address)
    }

    /// Signer output over `SHA3-256(message)`
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        run_signer(&self.signer, &sha3_256(message))
    }

    /// Sign raw bytes into an abstraction authenticator
    pub fn sign_with_authenticator(&self, message: &[u8]) -> Result<AccountAuthenticator> {
        let digest = sha3_256(message);
        let authenticator = run_signer(&self.signer, &digest)?;
        Ok(AccountAuthenticator::Abstraction {
            function_info: self.function_info.clone(),
            auth_data: AbstractionAuthData::V1 {
                signing_message_digest: digest.to_vec(),
                authenticator,
            },
        })
    }

    /// Sign a transaction's signing message
    pub fn sign_transaction(&self, transaction: &AnyRawTransaction) -> Result<Vec<u8>> {
        self.sign(&transaction.signing_message()?)
    }

    /// Sign a transaction into an authenticator
    pub fn sign_transaction_with_authenticator(
        &self,
        transaction: &AnyRawTransaction,
    ) -> Result<AccountAuthenticator> {
        self.sign_with_authenticator(&transaction.signing_message()?)
    }
}

impl fmt::Debug for AbstractedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbstractedAccount")
            .field("address", &self.address)
            .field("function_info", &self.function_info)
            .finish_non_exhaustive()
    }
}

/// Account whose address is derived from its authentication function and an
/// identity such as an external wallet's public key
#[derive(Clone)]
pub struct DerivableAbstractedAccount {
    address: AccountAddress,
    function_info: FunctionInfo,
    abstract_public_key: Vec<u8>,
    signer: AbstractSigner,
}

impl DerivableAbstractedAccount {
    /// Account for `abstract_public_key` under `function_info`
    pub fn new<F>(function_info: FunctionInfo, abstract_public_key: Vec<u8>, signer: F) -> Self
    where
        F: Fn(&[u8]) -> std::result::Result<Vec<u8>, String> + Send + Sync + 'static,
    {
        let address = AuthenticationKey::domain_abstraction(&function_info, &abstract_public_key)
            .derived_address();
        log::debug!("Domain-abstracted account {address} under {function_info}");
        Self {
            address,
            function_info,
            abstract_public_key,
            signer: Arc::new(signer),
        }
    }

    /// Parse `address::module::function` and build the account
    pub fn from_function_str<F>(
        function_info: &str,
        abstract_public_key: Vec<u8>,
        signer: F,
    ) -> Result<Self>
    where
        F: Fn(&[u8]) -> std::result::Result<Vec<u8>, String> + Send + Sync + 'static,
    {
        Ok(Self::new(function_info.parse()?, abstract_public_key, signer))
    }

    /// Replace the signer
    pub fn set_signer<F>(&mut self, signer: F)
    where
        F: Fn(&[u8]) -> std::result::Result<Vec<u8>, String> + Send + Sync + 'static,
    {
        self.signer = Arc::new(signer);
    }

    /// Account address
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Authentication function
    pub fn function_info(&self) -> &FunctionInfo {
        &self.function_info
    }

    /// Identity the address was derived from
    pub fn abstract_public_key(&self) -> &[u8] {
        &self.abstract_public_key
    }

    /// Placeholder public key
    pub fn public_key(&self) -> AbstractPublicKey {
        AbstractPublicKey::new(self.address)
    }

    /// Signer output over `SHA3-256(message)`
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        run_signer(&self.signer, &sha3_256(message))
    }

    /// Sign raw bytes into an authenticator carrying the identity
    pub fn sign_with_authenticator(&self, message: &[u8]) -> Result<AccountAuthenticator> {
        let digest = sha3_256(message);
        let abstract_signature = run_signer(&self.signer, &digest)?;
        Ok(AccountAuthenticator::Abstraction {
            function_info: self.function_info.clone(),
            auth_data: AbstractionAuthData::DerivableV1 {
                signing_message_digest: digest.to_vec(),
                abstract_signature,
                abstract_public_key: self.abstract_public_key.clone(),
            },
        })
    }

    /// Sign a transaction's signing message
    pub fn sign_transaction(&self, transaction: &AnyRawTransaction) -> Result<Vec<u8>> {
        self.sign(&transaction.signing_message()?)
    }

    /// Sign a transaction into an authenticator
    pub fn sign_transaction_with_authenticator(
        &self,
        transaction: &AnyRawTransaction,
    ) -> Result<AccountAuthenticator> {
        self.sign_with_authenticator(&transaction.signing_message()?)
    }
}

impl fmt::Debug for DerivableAbstractedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivableAbstractedAccount")
            .field("address", &self.address)
            .field("function_info", &self.function_info)
            .field("abstract_public_key", &hex::encode(&self.abstract_public_key))
            .finish_non_exhaustive()
    }
}
