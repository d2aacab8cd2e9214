//! Codec errors

use thiserror::Error;

/// Errors raised while decoding BCS data.
///
/// Encoding never fails; every variant here comes from the [`Deserializer`](crate::Deserializer)
/// or from a `Deserializable` implementation rejecting a decoded value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BcsError {
    /// A read would run past the end of the input
    #[error("Buffer underrun: needed {needed} bytes, {remaining} remaining")]
    BufferUnderrun {
        /// Bytes the read required
        needed: usize,
        /// Bytes left in the input
        remaining: usize,
    },

    /// A boolean (or option presence) byte was neither 0 nor 1
    #[error("Invalid boolean byte: 0x{0:02X}")]
    InvalidBoolean(u8),

    /// A uleb128 value did not fit in 32 bits
    #[error("Uleb128 value overflows u32")]
    Uleb128Overflow,

    /// A string payload was not valid UTF-8
    #[error("Invalid UTF-8 string: {0}")]
    InvalidUtf8(String),

    /// An enum tag did not match any known variant
    #[error("Unsupported {type_name} variant: {tag}")]
    UnsupportedVariant {
        /// Name of the enum being decoded
        type_name: &'static str,
        /// The tag read from the input
        tag: u32,
    },

    /// A decoded value failed type-specific validation
    #[error("Invalid {type_name}: {reason}")]
    InvalidValue {
        /// Name of the type being decoded
        type_name: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Input had bytes left after a complete value was decoded
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),
}

impl BcsError {
    /// Build an [`BcsError::UnsupportedVariant`] for `type_name`.
    pub fn unsupported_variant(type_name: &'static str, tag: u32) -> Self {
        Self::UnsupportedVariant { type_name, tag }
    }

    /// Build an [`BcsError::InvalidValue`] for `type_name`.
    pub fn invalid_value(type_name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            type_name,
            reason: reason.into(),
        }
    }
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, BcsError>;
