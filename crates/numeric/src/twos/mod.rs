//! Two's-complement codec for 32-bit values.
//!
//! Signed integers are encoded by wrapping into the 32-bit range exactly the
//! way hardware does (modulo 2^32), with a flag recording when the original
//! value did not fit the signed range. Width extension grows a narrow value
//! by replicating its sign bit or inserting zeros.
//!
//! Overflow here is about the *sign being wrong*, not about a carry: the
//! encoded pattern is always produced, and the flag merely records that it no
//! longer equals the mathematical input.

use serde::Serialize;

use crate::bits::BitVec32;
use crate::common::error::CoreError;

/// Mask selecting the low 32 bits of a wider integer.
const MASK32: u64 = 0xFFFF_FFFF;

/// Result of encoding a signed integer into two's complement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Encoded {
    /// The wrapped 32-bit pattern.
    pub bits: BitVec32,
    /// Hex rendering of the pattern, e.g. `0xFFFFFFF3` for −13.
    pub hex: String,
    /// Set when the input lay outside `[-2^31, 2^31 - 1]`, so the pattern
    /// does not represent the original value.
    pub overflow: bool,
}

/// Encodes a signed integer as a 32-bit two's-complement pattern.
///
/// The value is wrapped modulo 2^32; out-of-range inputs still produce a
/// pattern but raise the [`Encoded::overflow`] flag.
pub fn encode(value: i64) -> Encoded {
    let overflow = value < i64::from(i32::MIN) || value > i64::from(i32::MAX);
    let wrapped = (value as u64 & MASK32) as u32;
    let bits = BitVec32::from(wrapped);
    Encoded {
        bits,
        hex: bits.to_hex(),
        overflow,
    }
}

/// Reads a 32-bit pattern back as a signed value.
///
/// Bit 31 is the sign: the result is `u` when it is clear and `u - 2^32`
/// when it is set.
pub fn decode_bits(bits: BitVec32) -> i32 {
    bits.to_unsigned() as i32
}

/// Reads an MSB-first binary string (underscore separators permitted) back
/// as a signed value.
///
/// # Errors
///
/// Returns a format error if the string does not contain exactly 32 binary
/// digits.
pub fn decode_str(text: &str) -> Result<i32, CoreError> {
    Ok(decode_bits(BitVec32::parse_binary(text)?))
}

/// Reads an unsigned integer in `[0, 2^32 - 1]` back as a signed value.
///
/// # Errors
///
/// Returns a range error if `value` does not fit in 32 bits.
pub fn decode_unsigned(value: u64) -> Result<i32, CoreError> {
    Ok(decode_bits(BitVec32::from_unsigned(value)?))
}

/// Grows a value by replicating its sign bit into the new high positions.
///
/// `bits` is LSB-first; the low `from_width` elements are the current value
/// and bit `from_width - 1` is its sign. Works on arbitrary widths so the
/// MDU can widen a 32-bit multiplicand to 64 bits.
///
/// # Errors
///
/// Returns a format error for non-0/1 elements, and a range error when
/// `from_width` is outside `1..=bits.len()` or `to_width < from_width`.
pub fn sign_extend(bits: &[u8], from_width: usize, to_width: usize) -> Result<Vec<u8>, CoreError> {
    validate_extension(bits, from_width, to_width)?;
    let sign = bits[from_width - 1];
    let mut out = Vec::with_capacity(to_width);
    out.extend_from_slice(&bits[..from_width]);
    out.resize(to_width, sign);
    Ok(out)
}

/// Grows a value by inserting zeros into the new high positions.
///
/// Same contract as [`sign_extend`], for unsigned (or known non-negative)
/// views of a value.
///
/// # Errors
///
/// Returns a format error for non-0/1 elements, and a range error when
/// `from_width` is outside `1..=bits.len()` or `to_width < from_width`.
pub fn zero_extend(bits: &[u8], from_width: usize, to_width: usize) -> Result<Vec<u8>, CoreError> {
    validate_extension(bits, from_width, to_width)?;
    let mut out = Vec::with_capacity(to_width);
    out.extend_from_slice(&bits[..from_width]);
    out.resize(to_width, 0);
    Ok(out)
}

/// Shared validation for the extension helpers.
fn validate_extension(bits: &[u8], from_width: usize, to_width: usize) -> Result<(), CoreError> {
    for (index, &bit) in bits.iter().enumerate() {
        if bit > 1 {
            return Err(CoreError::NotABit { index, found: bit });
        }
    }
    if from_width == 0 || from_width > bits.len() {
        return Err(CoreError::SourceWidthOutOfRange {
            from: from_width,
            len: bits.len(),
        });
    }
    if to_width < from_width {
        return Err(CoreError::TargetWidthTooSmall {
            from: from_width,
            to: to_width,
        });
    }
    Ok(())
}
