//! Authentication keys and scheme tags
//!
//! An authentication key is `SHA3-256(preimage ‖ scheme)`. For a fresh account
//! it is also the address; rotation changes the key and keeps the address.

use crate::address::{AccountAddress, AddressError, Result};
use movekey_bcs::{BcsError, Deserializable, Deserializer, Serializable, Serializer};
use sha3::{Digest, Sha3_256};
use std::fmt;
use std::str::FromStr;

/// Domain-separation byte appended to an authentication-key preimage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Scheme {
    /// Legacy single Ed25519 key
    Ed25519 = 0,
    /// Legacy K-of-N Ed25519
    MultiEd25519 = 1,
    /// One key of any supported kind
    SingleKey = 2,
    /// K-of-N over keys of any supported kind
    MultiKey = 3,
    /// Account authenticated by a Move function
    Abstraction = 4,
    /// Address derived from an authentication function and an identity
    DeriveDomainAbstraction = 5,
    /// No authentication
    NoScheme = 250,
    /// Transaction-derived unique id
    DeriveAuid = 251,
    /// Object derived from another object
    DeriveObjectAddressFromObject = 252,
    /// Object derived from a GUID
    DeriveObjectAddressFromGuid = 253,
    /// Object derived from a creator and seed
    DeriveObjectAddressFromSeed = 254,
    /// Resource account derived from a creator and seed
    DeriveResourceAccountAddress = 255,
}

impl Scheme {
    /// Wire byte
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Look up a scheme from its wire byte
    pub const fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            0 => Self::Ed25519,
            1 => Self::MultiEd25519,
            2 => Self::SingleKey,
            3 => Self::MultiKey,
            4 => Self::Abstraction,
            5 => Self::DeriveDomainAbstraction,
            250 => Self::NoScheme,
            251 => Self::DeriveAuid,
            252 => Self::DeriveObjectAddressFromObject,
            253 => Self::DeriveObjectAddressFromGuid,
            254 => Self::DeriveObjectAddressFromSeed,
            255 => Self::DeriveResourceAccountAddress,
            _ => return None,
        })
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 32-byte authentication key
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthenticationKey([u8; 32]);

impl AuthenticationKey {
    /// Size in bytes
    pub const LENGTH: usize = 32;

    /// Wrap raw bytes
    pub const fn new(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }

    /// `SHA3-256(preimage ‖ scheme)`
    pub fn from_scheme(scheme: Scheme, preimage: &[u8]) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(preimage);
        hasher.update([scheme.tag()]);
        Self(hasher.finalize().into())
    }

    /// Key for a domain-abstracted account.
    ///
    /// The preimage is `BCS(function_info) ‖ BCS(identity as bytes)`.
    pub fn domain_abstraction(function_info: &FunctionInfo, account_identity: &[u8]) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(movekey_bcs::to_bytes(function_info));
        let mut identity = Serializer::new();
        identity.serialize_bytes(account_identity);
        hasher.update(identity.as_bytes());
        hasher.update([Scheme::DeriveDomainAbstraction.tag()]);
        Self(hasher.finalize().into())
    }

    /// The address an account created with this key receives
    pub fn derived_address(&self) -> AccountAddress {
        AccountAddress::new(self.0)
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }
}

impl fmt::Display for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthenticationKey({self})")
    }
}

impl From<AuthenticationKey> for AccountAddress {
    fn from(key: AuthenticationKey) -> Self {
        key.derived_address()
    }
}

/// Reference to a Move function, written `address::module::function`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionInfo {
    /// Address of the publishing account
    pub module_address: AccountAddress,
    /// Module name
    pub module_name: String,
    /// Function name
    pub function_name: String,
}

impl FunctionInfo {
    /// Build from parts
    pub fn new(
        module_address: AccountAddress,
        module_name: impl Into<String>,
        function_name: impl Into<String>,
    ) -> Self {
        Self {
            module_address,
            module_name: module_name.into(),
            function_name: function_name.into(),
        }
    }
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl FromStr for FunctionInfo {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AddressError::InvalidFunctionInfo(s.to_string());
        let parts: Vec<&str> = s.split("::").collect();
        let [address, module, function] = parts.as_slice() else {
            return Err(invalid());
        };
        if !is_identifier(module) || !is_identifier(function) {
            return Err(invalid());
        }
        let module_address = AccountAddress::from_str_relaxed(address).map_err(|_| invalid())?;
        Ok(Self::new(module_address, *module, *function))
    }
}

impl fmt::Display for FunctionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            self.module_address, self.module_name, self.function_name
        )
    }
}

impl Serializable for FunctionInfo {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize(&self.module_address);
        serializer.serialize_str(&self.module_name);
        serializer.serialize_str(&self.function_name);
    }
}

impl Deserializable for FunctionInfo {
    fn deserialize(deserializer: &mut Deserializer) -> movekey_bcs::Result<Self> {
        let module_address = deserializer.deserialize()?;
        let module_name = deserializer.deserialize_str()?;
        let function_name = deserializer.deserialize_str()?;
        if !is_identifier(&module_name) || !is_identifier(&function_name) {
            return Err(BcsError::invalid_value(
                "FunctionInfo",
                format!("{module_name}::{function_name} is not a valid identifier pair"),
            ));
        }
        Ok(Self {
            module_address,
            module_name,
            function_name,
        })
    }
}

/// Address of a domain-abstracted account.
///
/// Parses `function_info` first, so a malformed reference fails before any
/// hashing.
pub fn domain_abstraction_address(
    function_info: &str,
    account_identity: &[u8],
) -> Result<AccountAddress> {
    let info: FunctionInfo = function_info.parse()?;
    Ok(AuthenticationKey::domain_abstraction(&info, account_identity).derived_address())
}
