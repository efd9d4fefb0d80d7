//! Multiply/Divide Unit (MDU) for RV32M-style operations.
//!
//! **Multiply** is classic shift-add: the sign-extended multiplicand is
//! conditionally accumulated into a 64-bit register, once per multiplier
//! bit, using the ALU's ripple chain widened to 64 positions. The low 32
//! bits are the architectural result; an overflow flag records when the
//! true signed 64-bit product does not fit in 32 signed bits.
//!
//! **Divide** is 32-iteration restoring division over a combined 33-bit
//! remainder / 32-bit quotient shift register. RV32M edge cases are flagged
//! results, not errors:
//! - `x / 0` → quotient all-ones, remainder = dividend, `div_by_zero` set.
//! - signed `INT_MIN / -1` → quotient `INT_MIN`, remainder 0, `overflow`
//!   set (the only representable-overflow case in two's complement).

use serde::Serialize;
use tracing::trace;

use crate::bits::{BitVec32, WORD_BITS, hex_of_bits};
use crate::units::alu::{negate, ripple_add};

/// Width of the multiply accumulator.
const ACC_BITS: usize = 64;

/// Width of the division remainder register (one bit wider than the word so
/// the tentative subtraction has a sign position).
const REM_BITS: usize = WORD_BITS + 1;

/// Result of a 32×32 → low-32 multiplication.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MulResult {
    /// Low 32 bits of the 64-bit accumulation.
    pub bits: BitVec32,
    /// Set when bits 32–63 of the accumulator are not the sign-extension of
    /// bit 31, i.e. the signed product overflowed 32 bits.
    pub overflow: bool,
}

/// One iteration of the shift-add multiplier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MulStep {
    /// Multiplier bit index handled this iteration, LSB = 0.
    pub index: usize,
    /// The multiplier bit examined.
    pub multiplier_bit: u8,
    /// Whether the shifted multiplicand was added into the accumulator.
    pub added: bool,
    /// Hex snapshot of accumulator bits 0–31.
    pub acc_low: String,
    /// Hex snapshot of accumulator bits 32–63.
    pub acc_high: String,
}

/// Per-iteration multiplier trace; always exactly 32 entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MulTrace {
    /// The trace entries, one per multiplier bit.
    pub steps: Vec<MulStep>,
}

/// Flags produced by division.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DivFlags {
    /// The divisor was zero.
    pub div_by_zero: bool,
    /// Signed `INT_MIN / -1` overflow.
    pub overflow: bool,
}

/// Result of a division: quotient, remainder, and edge-case flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DivResult {
    /// The quotient word.
    pub quotient: BitVec32,
    /// The remainder word; its sign follows the dividend for signed
    /// division.
    pub remainder: BitVec32,
    /// Edge-case flags.
    pub flags: DivFlags,
}

/// One entry of a division trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum DivStep {
    /// Operands as handed to the divider.
    Start {
        /// Hex rendering of the dividend.
        dividend: String,
        /// Hex rendering of the divisor.
        divisor: String,
        /// Whether signed semantics were requested.
        signed: bool,
    },
    /// One restoring iteration.
    Iter {
        /// Iteration index, 0–31.
        index: usize,
        /// Quotient bit decided this iteration.
        quotient_bit: u8,
        /// Hex snapshot of the remainder register after the iteration.
        remainder: String,
        /// Hex snapshot of the quotient register after the iteration.
        quotient: String,
    },
    /// Final registers and flags.
    Finish {
        /// Hex rendering of the quotient.
        quotient: String,
        /// Hex rendering of the remainder.
        remainder: String,
        /// The flag set.
        flags: DivFlags,
    },
}

/// Ordered division trace: a start record, one record per iteration (none
/// for the short-circuited edge cases), and a finish record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DivTrace {
    /// The trace entries, in execution order.
    pub steps: Vec<DivStep>,
}

/// Multiply/Divide Unit.
///
/// Stateless; depends only on the ALU's ripple chain and per-bit shifting.
#[derive(Debug)]
pub struct Mdu;

impl Mdu {
    /// Multiplies two words, signed, returning the low 32 bits and an
    /// overflow flag for the full 64-bit product.
    pub fn multiply(rs1: BitVec32, rs2: BitVec32) -> MulResult {
        let (result, _) = multiply_inner(rs1, rs2, false);
        result
    }

    /// Multiplies with a per-iteration trace (exactly 32 entries).
    pub fn multiply_traced(rs1: BitVec32, rs2: BitVec32) -> (MulResult, MulTrace) {
        let (result, steps) = multiply_inner(rs1, rs2, true);
        (result, steps.unwrap_or_default())
    }

    /// Divides `dividend` by `divisor` with restoring division.
    ///
    /// `signed` selects DIV/REM semantics (quotient sign is the XOR of the
    /// operand signs; remainder sign follows the dividend); otherwise the
    /// operands are treated as unsigned magnitudes.
    pub fn divide(dividend: BitVec32, divisor: BitVec32, signed: bool) -> DivResult {
        let (result, _) = divide_inner(dividend, divisor, signed, false);
        result
    }

    /// Divides with a per-iteration trace of the remainder/quotient
    /// registers.
    pub fn divide_traced(
        dividend: BitVec32,
        divisor: BitVec32,
        signed: bool,
    ) -> (DivResult, DivTrace) {
        let (result, steps) = divide_inner(dividend, divisor, signed, true);
        (result, steps.unwrap_or_default())
    }
}

/// Sign-extends a word into a 64-bit register image.
fn widen_signed(word: BitVec32) -> Vec<u8> {
    let mut out = Vec::with_capacity(ACC_BITS);
    out.extend_from_slice(word.as_bits());
    out.resize(ACC_BITS, word.sign_bit());
    out
}

/// Shifts a register image left by one position, dropping the top bit.
fn shift_left_one(register: &mut [u8]) {
    for i in (1..register.len()).rev() {
        register[i] = register[i - 1];
    }
    register[0] = 0;
}

fn multiply_inner(rs1: BitVec32, rs2: BitVec32, traced: bool) -> (MulResult, Option<MulTrace>) {
    trace!(rs1 = %rs1.to_hex(), rs2 = %rs2.to_hex(), "mdu multiply");
    let mut acc = vec![0u8; ACC_BITS];
    // The addend starts as the sign-extended multiplicand and moves up one
    // position per iteration, so iteration i adds rs1 << i.
    let mut addend = widen_signed(rs1);
    let mut steps = traced.then(|| Vec::with_capacity(WORD_BITS));

    for index in 0..WORD_BITS {
        let multiplier_bit = rs2.bit(index);
        if multiplier_bit == 1 {
            acc = ripple_add(&acc, &addend, 0).bits;
        }
        if let Some(steps) = steps.as_mut() {
            steps.push(MulStep {
                index,
                multiplier_bit,
                added: multiplier_bit == 1,
                acc_low: hex_of_bits(&acc[..WORD_BITS]),
                acc_high: hex_of_bits(&acc[WORD_BITS..]),
            });
        }
        shift_left_one(&mut addend);
    }

    let bits = BitVec32::from_low_slice(&acc);
    let low_sign = acc[WORD_BITS - 1];
    let overflow = acc[WORD_BITS..].iter().any(|&bit| bit != low_sign);
    (
        MulResult { bits, overflow },
        steps.map(|steps| MulTrace { steps }),
    )
}

fn divide_inner(
    dividend: BitVec32,
    divisor: BitVec32,
    signed: bool,
    traced: bool,
) -> (DivResult, Option<DivTrace>) {
    trace!(
        dividend = %dividend.to_hex(),
        divisor = %divisor.to_hex(),
        signed,
        "mdu divide"
    );
    let mut steps = traced.then(|| Vec::with_capacity(WORD_BITS + 2));
    if let Some(steps) = steps.as_mut() {
        steps.push(DivStep::Start {
            dividend: dividend.to_hex(),
            divisor: divisor.to_hex(),
            signed,
        });
    }

    // Edge cases short-circuit before any iteration runs.
    let result = if divisor.to_unsigned() == 0 {
        DivResult {
            quotient: BitVec32::from(u32::MAX),
            remainder: dividend,
            flags: DivFlags {
                div_by_zero: true,
                overflow: false,
            },
        }
    } else if signed && dividend.to_unsigned() == 1 << 31 && divisor.to_unsigned() == u32::MAX {
        DivResult {
            quotient: dividend,
            remainder: BitVec32::from(0),
            flags: DivFlags {
                div_by_zero: false,
                overflow: true,
            },
        }
    } else {
        restoring_loop(dividend, divisor, signed, steps.as_mut())
    };

    if let Some(steps) = steps.as_mut() {
        steps.push(DivStep::Finish {
            quotient: result.quotient.to_hex(),
            remainder: result.remainder.to_hex(),
            flags: result.flags,
        });
    }
    (result, steps.map(|steps| DivTrace { steps }))
}

/// The 32-iteration restoring core, on magnitudes.
fn restoring_loop(
    dividend: BitVec32,
    divisor: BitVec32,
    signed: bool,
    mut steps: Option<&mut Vec<DivStep>>,
) -> DivResult {
    let dividend_sign = signed && dividend.sign_bit() == 1;
    let divisor_sign = signed && divisor.sign_bit() == 1;
    let quotient_sign = dividend_sign ^ divisor_sign;

    let magnitude = |word: BitVec32, negative: bool| {
        if negative {
            BitVec32::from_low_slice(&negate(word.as_bits()))
        } else {
            word
        }
    };
    let dividend_mag = magnitude(dividend, dividend_sign);
    let divisor_mag = magnitude(divisor, divisor_sign);

    // Combined shift register: 33-bit remainder above a 32-bit quotient
    // register that starts out holding the dividend magnitude.
    let mut remainder = vec![0u8; REM_BITS];
    let mut quotient = *dividend_mag.as_bits();

    // The subtrahend is fixed: the complement of the zero-extended divisor,
    // added with carry-in 1.
    let mut divisor_complement = Vec::with_capacity(REM_BITS);
    divisor_complement.extend(divisor_mag.as_bits().iter().map(|&bit| 1 - bit));
    divisor_complement.push(1);

    for index in 0..WORD_BITS {
        // Shift the (remainder, quotient) pair left one position; the top
        // quotient bit feeds the bottom of the remainder.
        let incoming = quotient[WORD_BITS - 1];
        shift_left_one(&mut remainder);
        remainder[0] = incoming;
        shift_left_one(&mut quotient);

        // Tentative subtract; a clear sign bit means the divisor fit.
        let difference = ripple_add(&remainder, &divisor_complement, 1);
        let quotient_bit = if difference.bits[REM_BITS - 1] == 0 {
            remainder = difference.bits;
            1
        } else {
            // Restore: the shifted remainder is kept untouched.
            0
        };
        quotient[0] = quotient_bit;

        if let Some(steps) = steps.as_mut() {
            steps.push(DivStep::Iter {
                index,
                quotient_bit,
                remainder: hex_of_bits(&remainder[..WORD_BITS]),
                quotient: hex_of_bits(&quotient),
            });
        }
    }

    let mut quotient_word = BitVec32::from_array(quotient);
    let mut remainder_word = BitVec32::from_low_slice(&remainder);
    if quotient_sign {
        quotient_word = BitVec32::from_low_slice(&negate(quotient_word.as_bits()));
    }
    // Remainder sign follows the dividend, except an exact zero stays zero.
    if dividend_sign && remainder_word.to_unsigned() != 0 {
        remainder_word = BitVec32::from_low_slice(&negate(remainder_word.as_bits()));
    }

    DivResult {
        quotient: quotient_word,
        remainder: remainder_word,
        flags: DivFlags::default(),
    }
}
