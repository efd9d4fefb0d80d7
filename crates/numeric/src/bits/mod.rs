//! The 32-bit word type used by every unit.
//!
//! Values are stored as explicit bit elements, least-significant bit first,
//! rather than as a host integer. This module provides:
//! 1. **Validation:** The only public constructors check their input, so a
//!    [`BitVec32`] in hand is always exactly 32 elements of 0/1.
//! 2. **Conversion:** Round-trippable mapping to and from unsigned integers.
//! 3. **Rendering:** Grouped binary and 8-digit uppercase hex strings, built
//!    nibble-by-nibble from the bit elements.
//! 4. **Parsing:** MSB-first binary strings with optional `_` group
//!    separators, the human-entry format used by the two's-complement codec.

use std::fmt;

use serde::Serialize;

use crate::common::error::CoreError;

/// Width of the architectural word, in bits.
pub const WORD_BITS: usize = 32;

/// Uppercase hex digit for each 4-bit value.
const NIBBLE_TO_HEX: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
];

/// A 32-bit word held as explicit bit elements.
///
/// Index 0 is the least-significant bit, index 31 the sign/most-significant
/// bit. Every element is 0 or 1 by construction; operations that consume a
/// `BitVec32` therefore never re-validate it.
///
/// The type is `Copy` and immutable: arithmetic units return new words rather
/// than mutating their operands.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BitVec32([u8; WORD_BITS]);

impl BitVec32 {
    /// Builds a word from an unsigned integer.
    ///
    /// Bit `i` of the result is `(value >> i) & 1`.
    ///
    /// # Errors
    ///
    /// Returns a range error if `value` exceeds `2^32 - 1`.
    pub fn from_unsigned(value: u64) -> Result<Self, CoreError> {
        if value > u64::from(u32::MAX) {
            return Err(CoreError::UnsignedOutOfRange { value });
        }
        Ok(Self::from(value as u32))
    }

    /// Builds a word from a raw bit slice, LSB first.
    ///
    /// This is the boundary entry point for callers holding loose bit
    /// sequences; everything downstream relies on the validation done here.
    ///
    /// # Errors
    ///
    /// Returns a format error if `bits` is not exactly 32 elements or
    /// contains an element other than 0 or 1.
    pub fn from_bits(bits: &[u8]) -> Result<Self, CoreError> {
        if bits.len() != WORD_BITS {
            return Err(CoreError::WidthMismatch {
                expected: WORD_BITS,
                found: bits.len(),
            });
        }
        let mut out = [0u8; WORD_BITS];
        for (index, &bit) in bits.iter().enumerate() {
            if bit > 1 {
                return Err(CoreError::NotABit { index, found: bit });
            }
            out[index] = bit;
        }
        Ok(Self(out))
    }

    /// Parses an MSB-first binary string such as
    /// `"11111111_11111111_11111111_11110011"`.
    ///
    /// Underscore separators and surrounding whitespace are ignored; exactly
    /// 32 significant digits must remain.
    ///
    /// # Errors
    ///
    /// Returns a format error on any other character or digit count.
    pub fn parse_binary(text: &str) -> Result<Self, CoreError> {
        let mut out = [0u8; WORD_BITS];
        let mut seen = 0usize;
        for ch in text.trim().chars() {
            match ch {
                '_' => {}
                '0' | '1' => {
                    if seen < WORD_BITS {
                        // MSB-first text fills from the top of the word down.
                        out[WORD_BITS - 1 - seen] = if ch == '1' { 1 } else { 0 };
                    }
                    seen += 1;
                }
                other => return Err(CoreError::BinaryStringChar { found: other }),
            }
        }
        if seen != WORD_BITS {
            return Err(CoreError::BinaryStringLength { found: seen });
        }
        Ok(Self(out))
    }

    /// Builds a word from bit elements already known to be valid.
    pub(crate) fn from_array(bits: [u8; WORD_BITS]) -> Self {
        Self(bits)
    }

    /// Builds a word from the low 32 elements of an internal register slice.
    ///
    /// Internal only: the slice must hold at least 32 valid bit elements.
    pub(crate) fn from_low_slice(bits: &[u8]) -> Self {
        let mut out = [0u8; WORD_BITS];
        out.copy_from_slice(&bits[..WORD_BITS]);
        Self(out)
    }

    /// Reconstructs the unsigned integer this word encodes.
    ///
    /// Exact inverse of [`BitVec32::from_unsigned`] for all in-range values.
    pub fn to_unsigned(self) -> u32 {
        let mut value = 0u32;
        for i in 0..WORD_BITS {
            if self.0[i] == 1 {
                value |= 1 << i;
            }
        }
        value
    }

    /// Returns bit `i` (0 or 1). `i` must be below 32.
    pub fn bit(self, i: usize) -> u8 {
        self.0[i]
    }

    /// Returns the sign bit (bit 31).
    pub fn sign_bit(self) -> u8 {
        self.0[WORD_BITS - 1]
    }

    /// Returns the bitwise complement.
    pub fn not(self) -> Self {
        let mut out = [0u8; WORD_BITS];
        for i in 0..WORD_BITS {
            out[i] = 1 - self.0[i];
        }
        Self(out)
    }

    /// Borrows the underlying bit elements, LSB first.
    pub fn as_bits(&self) -> &[u8; WORD_BITS] {
        &self.0
    }

    /// Renders the word MSB-first, grouped into four bytes:
    /// `"11011110_10101101_10111110_11101111"` for `0xDEADBEEF`.
    pub fn to_grouped_binary(self) -> String {
        let mut text = String::with_capacity(WORD_BITS + 3);
        for (count, i) in (0..WORD_BITS).rev().enumerate() {
            if count > 0 && count % 8 == 0 {
                text.push('_');
            }
            text.push(if self.0[i] == 1 { '1' } else { '0' });
        }
        text
    }

    /// Renders the word as `0x` plus eight uppercase hex digits, assembled a
    /// nibble at a time from the bit elements.
    pub fn to_hex(self) -> String {
        hex_of_bits(&self.0)
    }
}

impl From<u32> for BitVec32 {
    fn from(value: u32) -> Self {
        let mut bits = [0u8; WORD_BITS];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = ((value >> i) & 1) as u8;
        }
        Self(bits)
    }
}

impl fmt::Display for BitVec32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_grouped_binary())
    }
}

impl fmt::Debug for BitVec32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitVec32({})", self.to_hex())
    }
}

/// Renders an LSB-first bit slice as `0x` + uppercase hex, one nibble per
/// four bits. The slice length must be a multiple of 4.
///
/// Shared with the MDU so that 64-bit accumulator halves and the 33-bit
/// remainder register render through the same path as architectural words.
pub(crate) fn hex_of_bits(bits: &[u8]) -> String {
    let mut text = String::with_capacity(2 + bits.len() / 4);
    text.push('0');
    text.push('x');
    for nibble in (0..bits.len() / 4).rev() {
        let base = nibble * 4;
        let value = bits[base]
            | (bits[base + 1] << 1)
            | (bits[base + 2] << 2)
            | (bits[base + 3] << 3);
        text.push(NIBBLE_TO_HEX[value as usize]);
    }
    text
}
