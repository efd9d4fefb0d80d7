//! Barrel shifter for 32-bit words.
//!
//! Shifts are built from conditional power-of-two stages (1, 2, 4, 8, 16)
//! the way a hardware barrel shifter cascades multiplexers; no multi-bit
//! host shift is applied to the word itself. Logical shifts fill vacated
//! positions with 0; the arithmetic right shift fills with the *original*
//! sign bit, held constant across all stages.

use crate::bits::{BitVec32, WORD_BITS};
use crate::common::error::CoreError;

/// The power-of-two stage distances of the barrel cascade.
const STAGES: [usize; 5] = [1, 2, 4, 8, 16];

/// Shift left logical: vacated low positions are filled with 0.
///
/// # Errors
///
/// Returns a range error if `shamt` exceeds 31.
pub fn sll(word: BitVec32, shamt: u32) -> Result<BitVec32, CoreError> {
    let shamt = validate_shamt(shamt)?;
    let mut bits = *word.as_bits();
    for (stage_index, &distance) in STAGES.iter().enumerate() {
        if (shamt >> stage_index) & 1 == 1 {
            bits = stage_left(&bits, distance, 0);
        }
    }
    Ok(BitVec32::from_array(bits))
}

/// Shift right logical: vacated high positions are filled with 0.
///
/// # Errors
///
/// Returns a range error if `shamt` exceeds 31.
pub fn srl(word: BitVec32, shamt: u32) -> Result<BitVec32, CoreError> {
    let shamt = validate_shamt(shamt)?;
    let mut bits = *word.as_bits();
    for (stage_index, &distance) in STAGES.iter().enumerate() {
        if (shamt >> stage_index) & 1 == 1 {
            bits = stage_right(&bits, distance, 0);
        }
    }
    Ok(BitVec32::from_array(bits))
}

/// Shift right arithmetic: vacated high positions replicate the pre-shift
/// sign bit.
///
/// # Errors
///
/// Returns a range error if `shamt` exceeds 31.
pub fn sra(word: BitVec32, shamt: u32) -> Result<BitVec32, CoreError> {
    let shamt = validate_shamt(shamt)?;
    let fill = word.sign_bit();
    let mut bits = *word.as_bits();
    for (stage_index, &distance) in STAGES.iter().enumerate() {
        if (shamt >> stage_index) & 1 == 1 {
            bits = stage_right(&bits, distance, fill);
        }
    }
    Ok(BitVec32::from_array(bits))
}

/// Checks the shift amount against the RV32 domain `0..=31`.
fn validate_shamt(shamt: u32) -> Result<u32, CoreError> {
    if shamt >= WORD_BITS as u32 {
        return Err(CoreError::ShamtOutOfRange { shamt });
    }
    Ok(shamt)
}

/// One left stage: `out[i] = src[i - distance]`, or `fill` below the cut.
fn stage_left(src: &[u8; WORD_BITS], distance: usize, fill: u8) -> [u8; WORD_BITS] {
    let mut out = [fill; WORD_BITS];
    for i in distance..WORD_BITS {
        out[i] = src[i - distance];
    }
    out
}

/// One right stage: `out[i] = src[i + distance]`, or `fill` above the cut.
fn stage_right(src: &[u8; WORD_BITS], distance: usize, fill: u8) -> [u8; WORD_BITS] {
    let mut out = [fill; WORD_BITS];
    for i in 0..WORD_BITS - distance {
        out[i] = src[i + distance];
    }
    out
}
