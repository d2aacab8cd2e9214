//! Poseidon hashing over the BN254 scalar field
//!
//! Matches the circom parameter set used by the keyless circuit. Byte
//! strings enter the field by zero-padding to a fixed maximum, splitting into
//! 31-byte little-endian chunks and appending the unpadded length.

use super::{CryptoError, Result};
use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use light_poseidon::{Poseidon, PoseidonHasher};
use num_bigint::BigUint;

/// Bytes packed into one field element
pub const BYTES_PACKED_PER_SCALAR: usize = 31;

/// Most inputs the circom parameters support in a single permutation
pub const MAX_NUM_INPUT_SCALARS: usize = 12;

/// Most bytes [`pad_and_pack_bytes_with_len`] can fit
pub const MAX_NUM_INPUT_BYTES: usize = (MAX_NUM_INPUT_SCALARS - 1) * BYTES_PACKED_PER_SCALAR;

/// Poseidon over 1 to 12 field elements
pub fn poseidon_hash(inputs: &[Fr]) -> Result<Fr> {
    if inputs.is_empty() || inputs.len() > MAX_NUM_INPUT_SCALARS {
        return Err(CryptoError::Poseidon(format!(
            "unsupported input count {}, must be 1 to {MAX_NUM_INPUT_SCALARS}",
            inputs.len()
        )));
    }
    let mut hasher =
        Poseidon::<Fr>::new_circom(inputs.len()).map_err(|e| CryptoError::Poseidon(e.to_string()))?;
    hasher
        .hash(inputs)
        .map_err(|e| CryptoError::Poseidon(e.to_string()))
}

/// Little-endian bytes as a field element (reduced)
pub fn bytes_to_field_le(bytes: &[u8]) -> Fr {
    Fr::from_le_bytes_mod_order(bytes)
}

/// Field element as 32 little-endian bytes
pub fn field_to_bytes_le(value: &Fr) -> [u8; 32] {
    let bytes = value.into_bigint().to_bytes_le();
    let mut out = [0u8; 32];
    out[..bytes.len()].copy_from_slice(&bytes);
    out
}

/// Decimal string of a field element
pub fn field_to_decimal(value: &Fr) -> String {
    BigUint::from_bytes_le(&field_to_bytes_le(value)).to_string()
}

/// Zero-pad `bytes` to `max_len`, pack, and append the original length
pub fn pad_and_pack_bytes_with_len(bytes: &[u8], max_len: usize) -> Result<Vec<Fr>> {
    if bytes.len() > max_len {
        return Err(CryptoError::Poseidon(format!(
            "input of {} bytes exceeds maximum {max_len}",
            bytes.len()
        )));
    }
    if max_len > MAX_NUM_INPUT_BYTES {
        return Err(CryptoError::Poseidon(format!(
            "maximum {max_len} exceeds packable {MAX_NUM_INPUT_BYTES} bytes"
        )));
    }
    let mut padded = bytes.to_vec();
    padded.resize(max_len, 0);
    let mut fields: Vec<Fr> = padded
        .chunks(BYTES_PACKED_PER_SCALAR)
        .map(bytes_to_field_le)
        .collect();
    fields.push(Fr::from(bytes.len() as u64));
    Ok(fields)
}

/// Hash a byte string padded to `max_len`
pub fn hash_bytes_with_len(bytes: &[u8], max_len: usize) -> Result<Fr> {
    poseidon_hash(&pad_and_pack_bytes_with_len(bytes, max_len)?)
}

/// Hash a UTF-8 string padded to `max_len` bytes
pub fn hash_str_to_field(value: &str, max_len: usize) -> Result<Fr> {
    hash_bytes_with_len(value.as_bytes(), max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circom_reference_vector() {
        // poseidon([1, 2]) from circomlibjs
        let hash = poseidon_hash(&[Fr::from(1u64), Fr::from(2u64)]).unwrap();
        assert_eq!(
            field_to_decimal(&hash),
            "7853200120776062878684798364095072458815029376092732009249414926327459813530"
        );
    }

    #[test]
    fn test_pack_layout() {
        let fields = pad_and_pack_bytes_with_len(b"ab", 62).unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], Fr::from(u64::from(b'a') + (u64::from(b'b') << 8)));
        assert_eq!(fields[1], Fr::from(0u64));
        assert_eq!(fields[2], Fr::from(2u64));
    }

    #[test]
    fn test_keyless_maximums_fit() {
        for (max, expected_inputs) in [(30, 2), (93, 4), (120, 5), (330, 12)] {
            let fields = pad_and_pack_bytes_with_len(b"x", max).unwrap();
            assert_eq!(fields.len(), expected_inputs, "max {max}");
            assert!(poseidon_hash(&fields).is_ok());
        }
    }

    #[test]
    fn test_over_length_rejected() {
        assert!(hash_str_to_field(&"a".repeat(31), 30).is_err());
        assert!(pad_and_pack_bytes_with_len(b"", 400).is_err());
        assert!(poseidon_hash(&[]).is_err());
    }

    #[test]
    fn test_field_bytes_roundtrip() {
        let value = Fr::from(0x0102_0304u64);
        let bytes = field_to_bytes_le(&value);
        assert_eq!(&bytes[..4], &[4, 3, 2, 1]);
        assert_eq!(bytes_to_field_le(&bytes), value);
    }
}
