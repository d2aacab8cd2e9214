//! Participant bitmaps for multi-signer signatures
//!
//! A bitmap is 4 bytes. Participant `i` is bit `0x80 >> (i % 8)` of byte
//! `i / 8`, so index 0 is the most significant bit of the first byte.
//! Signatures accompanying a bitmap appear in ascending index order.

use super::{CryptoError, Result};

/// Bitmap size in bytes
pub const BITMAP_LEN: usize = 4;

/// Most participants a bitmap can address
pub const MAX_SIGNATURES_SUPPORTED: usize = BITMAP_LEN * 8;

const FIRST_BIT_IN_BYTE: u8 = 0x80;

/// Build a bitmap from strictly ascending participant indices.
///
/// Each index is checked in order: range first, then duplicates, then
/// ordering against the previous index.
pub fn create_bitmap(bits: &[u8]) -> Result<[u8; BITMAP_LEN]> {
    let mut bitmap = [0u8; BITMAP_LEN];
    for (position, &bit) in bits.iter().enumerate() {
        let index = usize::from(bit);
        if index >= MAX_SIGNATURES_SUPPORTED {
            return Err(CryptoError::IndexOutOfRange(index));
        }
        if is_set(&bitmap, index) {
            return Err(CryptoError::DuplicateBit(bit));
        }
        if position > 0 && bit <= bits[position - 1] {
            return Err(CryptoError::UnsortedBits);
        }
        bitmap[index / 8] |= FIRST_BIT_IN_BYTE >> (index % 8);
    }
    Ok(bitmap)
}

/// Whether participant `index` is marked
pub fn is_set(bitmap: &[u8; BITMAP_LEN], index: usize) -> bool {
    index < MAX_SIGNATURES_SUPPORTED && bitmap[index / 8] & (FIRST_BIT_IN_BYTE >> (index % 8)) != 0
}

/// Marked participant indices in ascending order
pub fn indices(bitmap: &[u8; BITMAP_LEN]) -> Vec<usize> {
    (0..MAX_SIGNATURES_SUPPORTED)
        .filter(|&i| is_set(bitmap, i))
        .collect()
}

/// Number of marked participants
pub fn count_ones(bitmap: &[u8; BITMAP_LEN]) -> usize {
    bitmap.iter().map(|b| b.count_ones() as usize).sum()
}

/// Copy a slice into a bitmap, rejecting any other length
pub fn from_slice(bytes: &[u8]) -> Result<[u8; BITMAP_LEN]> {
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidSignatureLength {
            expected: BITMAP_LEN,
            actual: bytes.len(),
        })
}
