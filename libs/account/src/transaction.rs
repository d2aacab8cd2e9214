//! Raw transactions and their signing messages
//!
//! A signing message is `SHA3-256(domain separator) ‖ BCS(value)`. Plain
//! transactions use `APTOS::RawTransaction`; multi-agent and fee-payer
//! transactions sign a `RawTransactionWithData` under
//! `APTOS::RawTransactionWithData`.

use crate::address::{AccountAddress, AddressError};
use crate::auth_key::is_identifier;
use crate::authenticator::TransactionAuthenticator;
use crate::crypto::keyless::{EphemeralCertificate, ZkProof};
use crate::crypto::sha3_256;
use crate::crypto::single_key::AnySignature;
use movekey_bcs::{BcsError, Deserializable, Deserializer, Serializable, Serializer, U256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Required prefix for every domain separator
pub const DOMAIN_SEPARATOR_PREFIX: &str = "APTOS::";
/// Separator for plain transactions
pub const RAW_TRANSACTION_SALT: &str = "APTOS::RawTransaction";
/// Separator for multi-agent and fee-payer transactions
pub const RAW_TRANSACTION_WITH_DATA_SALT: &str = "APTOS::RawTransactionWithData";
/// Separator binding a keyless proof to the transaction it authorizes
pub const TRANSACTION_AND_PROOF_SALT: &str = "APTOS::TransactionAndProof";

/// Transaction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// Domain separator lacks the `APTOS::` namespace
    #[error("Domain separator must start with '{DOMAIN_SEPARATOR_PREFIX}': {0}")]
    InvalidDomainSeparator(String),

    /// Module, function or struct name is not a Move identifier
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Address parse failure
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Codec failure
    #[error(transparent)]
    Bcs(#[from] BcsError),
}

/// Result type for transaction operations
pub type Result<T> = std::result::Result<T, TransactionError>;

/// `SHA3-256(domain_separator) ‖ bytes`
pub fn generate_signing_message(bytes: &[u8], domain_separator: &str) -> Result<Vec<u8>> {
    if !domain_separator.starts_with(DOMAIN_SEPARATOR_PREFIX) {
        return Err(TransactionError::InvalidDomainSeparator(
            domain_separator.to_string(),
        ));
    }
    let mut message = Vec::with_capacity(32 + bytes.len());
    message.extend_from_slice(&sha3_256(domain_separator.as_bytes()));
    message.extend_from_slice(bytes);
    Ok(message)
}

fn identifier(name: &str) -> Result<String> {
    if is_identifier(name) {
        Ok(name.to_string())
    } else {
        Err(TransactionError::InvalidIdentifier(name.to_string()))
    }
}

/// `address::module`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleId {
    /// Publishing account
    pub address: AccountAddress,
    /// Module name
    pub name: String,
}

impl ModuleId {
    /// Build and validate the name
    pub fn new(address: AccountAddress, name: &str) -> Result<Self> {
        Ok(Self {
            address,
            name: identifier(name)?,
        })
    }
}

impl FromStr for ModuleId {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self> {
        let (address, name) = s
            .split_once("::")
            .ok_or_else(|| TransactionError::InvalidIdentifier(s.to_string()))?;
        Self::new(AccountAddress::from_str_relaxed(address)?, name)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.address, self.name)
    }
}

impl Serializable for ModuleId {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize(&self.address);
        serializer.serialize_str(&self.name);
    }
}

impl Deserializable for ModuleId {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        Ok(Self {
            address: deserializer.deserialize()?,
            name: deserializer.deserialize_str()?,
        })
    }
}

/// A fully qualified struct type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructTag {
    /// Publishing account
    pub address: AccountAddress,
    /// Module name
    pub module: String,
    /// Struct name
    pub name: String,
    /// Generic arguments
    pub type_args: Vec<TypeTag>,
}

impl StructTag {
    /// Build and validate names
    pub fn new(
        address: AccountAddress,
        module: &str,
        name: &str,
        type_args: Vec<TypeTag>,
    ) -> Result<Self> {
        Ok(Self {
            address,
            module: identifier(module)?,
            name: identifier(name)?,
            type_args,
        })
    }
}

impl Serializable for StructTag {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize(&self.address);
        serializer.serialize_str(&self.module);
        serializer.serialize_str(&self.name);
        serializer.serialize_vector(&self.type_args);
    }
}

impl Deserializable for StructTag {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        Ok(Self {
            address: deserializer.deserialize()?,
            module: deserializer.deserialize_str()?,
            name: deserializer.deserialize_str()?,
            type_args: deserializer.deserialize_vector()?,
        })
    }
}

/// Move type argument
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `bool`
    Bool,
    /// `u8`
    U8,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `address`
    Address,
    /// `signer`
    Signer,
    /// `vector<T>`
    Vector(Box<TypeTag>),
    /// A struct type
    Struct(Box<StructTag>),
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u256`
    U256,
}

impl TypeTag {
    /// Wire tag
    pub const fn tag(&self) -> u32 {
        match self {
            Self::Bool => 0,
            Self::U8 => 1,
            Self::U64 => 2,
            Self::U128 => 3,
            Self::Address => 4,
            Self::Signer => 5,
            Self::Vector(_) => 6,
            Self::Struct(_) => 7,
            Self::U16 => 8,
            Self::U32 => 9,
            Self::U256 => 10,
        }
    }
}

impl Serializable for TypeTag {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(self.tag());
        match self {
            Self::Vector(inner) => inner.serialize(serializer),
            Self::Struct(tag) => tag.serialize(serializer),
            _ => {}
        }
    }
}

impl Deserializable for TypeTag {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        Ok(match deserializer.deserialize_variant_index()? {
            0 => Self::Bool,
            1 => Self::U8,
            2 => Self::U64,
            3 => Self::U128,
            4 => Self::Address,
            5 => Self::Signer,
            6 => Self::Vector(Box::new(deserializer.deserialize()?)),
            7 => Self::Struct(Box::new(deserializer.deserialize()?)),
            8 => Self::U16,
            9 => Self::U32,
            10 => Self::U256,
            tag => return Err(BcsError::unsupported_variant("TypeTag", tag)),
        })
    }
}

/// Call of a published entry function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFunction {
    /// Module holding the function
    pub module: ModuleId,
    /// Function name
    pub function: String,
    /// Generic arguments
    pub ty_args: Vec<TypeTag>,
    /// BCS-encoded arguments
    pub args: Vec<Vec<u8>>,
}

impl EntryFunction {
    /// Build from parts
    pub fn new(
        module: ModuleId,
        function: &str,
        ty_args: Vec<TypeTag>,
        args: Vec<Vec<u8>>,
    ) -> Result<Self> {
        Ok(Self {
            module,
            function: identifier(function)?,
            ty_args,
            args,
        })
    }
}

impl Serializable for EntryFunction {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize(&self.module);
        serializer.serialize_str(&self.function);
        serializer.serialize_vector(&self.ty_args);
        serializer.serialize_u32_as_uleb128(len_u32(self.args.len()));
        for arg in &self.args {
            serializer.serialize_bytes(arg);
        }
    }
}

impl Deserializable for EntryFunction {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        let module = deserializer.deserialize()?;
        let function = deserializer.deserialize_str()?;
        let ty_args = deserializer.deserialize_vector()?;
        let count = deserializer.deserialize_uleb128_as_u32()? as usize;
        if count > deserializer.remaining() {
            return Err(BcsError::BufferUnderrun {
                needed: count,
                remaining: deserializer.remaining(),
            });
        }
        let args = (0..count)
            .map(|_| deserializer.deserialize_bytes())
            .collect::<movekey_bcs::Result<_>>()?;
        Ok(Self {
            module,
            function,
            ty_args,
            args,
        })
    }
}

// Collections here are bounded far below u32::MAX by construction
fn len_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Argument to a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionArgument {
    /// `u8`
    U8(u8),
    /// `u64`
    U64(u64),
    /// `u128`
    U128(u128),
    /// `address`
    Address(AccountAddress),
    /// `vector<u8>`
    U8Vector(Vec<u8>),
    /// `bool`
    Bool(bool),
    /// `u16`
    U16(u16),
    /// `u32`
    U32(u32),
    /// `u256`
    U256(U256),
    /// Pre-serialized value
    Serialized(Vec<u8>),
}

impl TransactionArgument {
    /// Wire tag
    pub const fn tag(&self) -> u32 {
        match self {
            Self::U8(_) => 0,
            Self::U64(_) => 1,
            Self::U128(_) => 2,
            Self::Address(_) => 3,
            Self::U8Vector(_) => 4,
            Self::Bool(_) => 5,
            Self::U16(_) => 6,
            Self::U32(_) => 7,
            Self::U256(_) => 8,
            Self::Serialized(_) => 9,
        }
    }
}

impl Serializable for TransactionArgument {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(self.tag());
        match self {
            Self::U8(v) => serializer.serialize_u8(*v),
            Self::U64(v) => serializer.serialize_u64(*v),
            Self::U128(v) => serializer.serialize_u128(*v),
            Self::Address(v) => serializer.serialize(v),
            Self::U8Vector(v) | Self::Serialized(v) => serializer.serialize_bytes(v),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::U16(v) => serializer.serialize_u16(*v),
            Self::U32(v) => serializer.serialize_u32(*v),
            Self::U256(v) => serializer.serialize_u256(*v),
        }
    }
}

impl Deserializable for TransactionArgument {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        Ok(match deserializer.deserialize_variant_index()? {
            0 => Self::U8(deserializer.deserialize_u8()?),
            1 => Self::U64(deserializer.deserialize_u64()?),
            2 => Self::U128(deserializer.deserialize_u128()?),
            3 => Self::Address(deserializer.deserialize()?),
            4 => Self::U8Vector(deserializer.deserialize_bytes()?),
            5 => Self::Bool(deserializer.deserialize_bool()?),
            6 => Self::U16(deserializer.deserialize_u16()?),
            7 => Self::U32(deserializer.deserialize_u32()?),
            8 => Self::U256(deserializer.deserialize_u256()?),
            9 => Self::Serialized(deserializer.deserialize_bytes()?),
            tag => return Err(BcsError::unsupported_variant("TransactionArgument", tag)),
        })
    }
}

/// Compiled script with arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// Bytecode
    pub code: Vec<u8>,
    /// Generic arguments
    pub ty_args: Vec<TypeTag>,
    /// Arguments
    pub args: Vec<TransactionArgument>,
}

impl Serializable for Script {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.code);
        serializer.serialize_vector(&self.ty_args);
        serializer.serialize_vector(&self.args);
    }
}

impl Deserializable for Script {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        Ok(Self {
            code: deserializer.deserialize_bytes()?,
            ty_args: deserializer.deserialize_vector()?,
            args: deserializer.deserialize_vector()?,
        })
    }
}

/// Payload executed by an on-chain multisig account
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultisigTransactionPayload {
    /// Entry function call
    EntryFunction(EntryFunction),
}

impl Serializable for MultisigTransactionPayload {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            Self::EntryFunction(entry) => {
                serializer.serialize_variant_index(0);
                entry.serialize(serializer);
            }
        }
    }
}

impl Deserializable for MultisigTransactionPayload {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        match deserializer.deserialize_variant_index()? {
            0 => Ok(Self::EntryFunction(deserializer.deserialize()?)),
            tag => Err(BcsError::unsupported_variant("MultisigTransactionPayload", tag)),
        }
    }
}

/// Execution of a multisig account's transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multisig {
    /// The multisig account
    pub multisig_address: AccountAddress,
    /// Payload, omitted when it was stored on chain beforehand
    pub transaction_payload: Option<MultisigTransactionPayload>,
}

impl Serializable for Multisig {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize(&self.multisig_address);
        serializer.serialize_option(self.transaction_payload.as_ref());
    }
}

impl Deserializable for Multisig {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        Ok(Self {
            multisig_address: deserializer.deserialize()?,
            transaction_payload: deserializer.deserialize_option()?,
        })
    }
}

/// What a transaction executes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionPayload {
    /// Script
    Script(Script),
    /// Entry function call
    EntryFunction(EntryFunction),
    /// Multisig account execution
    Multisig(Multisig),
}

impl TransactionPayload {
    const SCRIPT_TAG: u32 = 0;
    // tag 1 was the retired module bundle payload
    const ENTRY_FUNCTION_TAG: u32 = 2;
    const MULTISIG_TAG: u32 = 3;

    /// Wire tag
    pub const fn tag(&self) -> u32 {
        match self {
            Self::Script(_) => Self::SCRIPT_TAG,
            Self::EntryFunction(_) => Self::ENTRY_FUNCTION_TAG,
            Self::Multisig(_) => Self::MULTISIG_TAG,
        }
    }
}

impl Serializable for TransactionPayload {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(self.tag());
        match self {
            Self::Script(script) => script.serialize(serializer),
            Self::EntryFunction(entry) => entry.serialize(serializer),
            Self::Multisig(multisig) => multisig.serialize(serializer),
        }
    }
}

impl Deserializable for TransactionPayload {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        match deserializer.deserialize_variant_index()? {
            Self::SCRIPT_TAG => Ok(Self::Script(deserializer.deserialize()?)),
            Self::ENTRY_FUNCTION_TAG => Ok(Self::EntryFunction(deserializer.deserialize()?)),
            Self::MULTISIG_TAG => Ok(Self::Multisig(deserializer.deserialize()?)),
            tag => Err(BcsError::unsupported_variant("TransactionPayload", tag)),
        }
    }
}

/// Unsigned transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    /// Sending account
    pub sender: AccountAddress,
    /// Sender's sequence number
    pub sequence_number: u64,
    /// What to execute
    pub payload: TransactionPayload,
    /// Gas limit
    pub max_gas_amount: u64,
    /// Price per gas unit
    pub gas_unit_price: u64,
    /// Expiry in seconds since the epoch
    pub expiration_timestamp_secs: u64,
    /// Target chain
    pub chain_id: u8,
}

impl RawTransaction {
    /// BCS bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        movekey_bcs::to_bytes(self)
    }
}

impl Serializable for RawTransaction {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize(&self.sender);
        serializer.serialize_u64(self.sequence_number);
        serializer.serialize(&self.payload);
        serializer.serialize_u64(self.max_gas_amount);
        serializer.serialize_u64(self.gas_unit_price);
        serializer.serialize_u64(self.expiration_timestamp_secs);
        serializer.serialize_u8(self.chain_id);
    }
}

impl Deserializable for RawTransaction {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        Ok(Self {
            sender: deserializer.deserialize()?,
            sequence_number: deserializer.deserialize_u64()?,
            payload: deserializer.deserialize()?,
            max_gas_amount: deserializer.deserialize_u64()?,
            gas_unit_price: deserializer.deserialize_u64()?,
            expiration_timestamp_secs: deserializer.deserialize_u64()?,
            chain_id: deserializer.deserialize_u8()?,
        })
    }
}

/// Raw transaction plus the extra signers every party signs over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTransactionWithData {
    /// Sender plus secondary signers
    MultiAgent {
        /// Transaction
        raw_txn: RawTransaction,
        /// Secondary signer addresses
        secondary_signer_addresses: Vec<AccountAddress>,
    },
    /// Multi-agent with a separate gas payer
    MultiAgentWithFeePayer {
        /// Transaction
        raw_txn: RawTransaction,
        /// Secondary signer addresses
        secondary_signer_addresses: Vec<AccountAddress>,
        /// Gas payer
        fee_payer_address: AccountAddress,
    },
}

impl RawTransactionWithData {
    const MULTI_AGENT_TAG: u32 = 0;
    const FEE_PAYER_TAG: u32 = 1;
}

impl Serializable for RawTransactionWithData {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            Self::MultiAgent {
                raw_txn,
                secondary_signer_addresses,
            } => {
                serializer.serialize_variant_index(Self::MULTI_AGENT_TAG);
                serializer.serialize(raw_txn);
                serializer.serialize_vector(secondary_signer_addresses);
            }
            Self::MultiAgentWithFeePayer {
                raw_txn,
                secondary_signer_addresses,
                fee_payer_address,
            } => {
                serializer.serialize_variant_index(Self::FEE_PAYER_TAG);
                serializer.serialize(raw_txn);
                serializer.serialize_vector(secondary_signer_addresses);
                serializer.serialize(fee_payer_address);
            }
        }
    }
}

impl Deserializable for RawTransactionWithData {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        match deserializer.deserialize_variant_index()? {
            Self::MULTI_AGENT_TAG => Ok(Self::MultiAgent {
                raw_txn: deserializer.deserialize()?,
                secondary_signer_addresses: deserializer.deserialize_vector()?,
            }),
            Self::FEE_PAYER_TAG => Ok(Self::MultiAgentWithFeePayer {
                raw_txn: deserializer.deserialize()?,
                secondary_signer_addresses: deserializer.deserialize_vector()?,
                fee_payer_address: deserializer.deserialize()?,
            }),
            tag => Err(BcsError::unsupported_variant("RawTransactionWithData", tag)),
        }
    }
}

/// The exact shape a transaction is signed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningTarget {
    /// Plain raw transaction
    Raw(RawTransaction),
    /// Multi-agent or fee-payer wrapper
    WithData(RawTransactionWithData),
}

impl SigningTarget {
    /// Domain separator for this shape
    pub fn domain_separator(&self) -> &'static str {
        match self {
            Self::Raw(_) => RAW_TRANSACTION_SALT,
            Self::WithData(_) => RAW_TRANSACTION_WITH_DATA_SALT,
        }
    }

    /// Domain-separated signing message
    pub fn signing_message(&self) -> Result<Vec<u8>> {
        generate_signing_message(&movekey_bcs::to_bytes(self), self.domain_separator())
    }
}

impl Serializable for SigningTarget {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            Self::Raw(raw) => raw.serialize(serializer),
            Self::WithData(with_data) => with_data.serialize(serializer),
        }
    }
}

/// A raw transaction with its optional extra signers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyRawTransaction {
    /// Transaction
    pub raw_txn: RawTransaction,
    /// Secondary signers, for multi-agent transactions
    pub secondary_signer_addresses: Option<Vec<AccountAddress>>,
    /// Gas payer, for sponsored transactions
    pub fee_payer_address: Option<AccountAddress>,
}

impl AnyRawTransaction {
    /// Plain single-signer transaction
    pub fn simple(raw_txn: RawTransaction) -> Self {
        Self {
            raw_txn,
            secondary_signer_addresses: None,
            fee_payer_address: None,
        }
    }

    /// Multi-agent transaction
    pub fn multi_agent(raw_txn: RawTransaction, secondary_signer_addresses: Vec<AccountAddress>) -> Self {
        Self {
            raw_txn,
            secondary_signer_addresses: Some(secondary_signer_addresses),
            fee_payer_address: None,
        }
    }

    /// Sponsored transaction, optionally with secondary signers
    pub fn fee_payer(
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
        fee_payer_address: AccountAddress,
    ) -> Self {
        Self {
            raw_txn,
            secondary_signer_addresses: Some(secondary_signer_addresses),
            fee_payer_address: Some(fee_payer_address),
        }
    }

    /// Select the wrapper: fee payer, then multi-agent, then plain
    pub fn signing_target(&self) -> SigningTarget {
        let secondary = self.secondary_signer_addresses.clone().unwrap_or_default();
        if let Some(fee_payer_address) = self.fee_payer_address {
            SigningTarget::WithData(RawTransactionWithData::MultiAgentWithFeePayer {
                raw_txn: self.raw_txn.clone(),
                secondary_signer_addresses: secondary,
                fee_payer_address,
            })
        } else if self.secondary_signer_addresses.is_some() {
            SigningTarget::WithData(RawTransactionWithData::MultiAgent {
                raw_txn: self.raw_txn.clone(),
                secondary_signer_addresses: secondary,
            })
        } else {
            SigningTarget::Raw(self.raw_txn.clone())
        }
    }

    /// Domain-separated signing message
    pub fn signing_message(&self) -> Result<Vec<u8>> {
        self.signing_target().signing_message()
    }

    /// Message `signature` must cover to authorize this transaction.
    ///
    /// Keyless signatures cover the transaction bound to their proof; every
    /// other scheme covers the plain signing message.
    pub fn signing_message_for(&self, signature: &AnySignature) -> Result<Vec<u8>> {
        match signature {
            AnySignature::Keyless(keyless) => {
                let EphemeralCertificate::ZeroKnowledgeSig(zk) = &keyless.ephemeral_certificate;
                TransactionAndProof {
                    transaction: self.signing_target(),
                    proof: Some(zk.proof.clone()),
                }
                .signing_message()
            }
            _ => self.signing_message(),
        }
    }
}

/// Transaction bound to the keyless proof authorizing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionAndProof {
    /// The transaction in its signing shape
    pub transaction: SigningTarget,
    /// Proof, if any
    pub proof: Option<ZkProof>,
}

impl TransactionAndProof {
    /// Message a keyless ephemeral key signs
    pub fn signing_message(&self) -> Result<Vec<u8>> {
        generate_signing_message(&movekey_bcs::to_bytes(self), TRANSACTION_AND_PROOF_SALT)
    }
}

impl Serializable for TransactionAndProof {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_fixed_bytes(&movekey_bcs::to_bytes(&self.transaction));
        serializer.serialize_option(self.proof.as_ref());
    }
}

/// Transaction ready for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Transaction
    pub raw_txn: RawTransaction,
    /// Signatures
    pub authenticator: TransactionAuthenticator,
}

impl SignedTransaction {
    /// Pair a transaction with its authenticator
    pub fn new(raw_txn: RawTransaction, authenticator: TransactionAuthenticator) -> Self {
        Self {
            raw_txn,
            authenticator,
        }
    }

    /// Check every signature against the transaction's signing message
    pub fn verify(&self) -> bool {
        self.authenticator.verify(&self.raw_txn)
    }

    /// Bytes to submit
    pub fn to_bytes(&self) -> Vec<u8> {
        movekey_bcs::to_bytes(self)
    }
}

impl Serializable for SignedTransaction {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize(&self.raw_txn);
        serializer.serialize(&self.authenticator);
    }
}

impl Deserializable for SignedTransaction {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        Ok(Self {
            raw_txn: deserializer.deserialize()?,
            authenticator: deserializer.deserialize()?,
        })
    }
}
