//! Ripple-carry ALU for ADD/SUB with N/Z/C/V flags.
//!
//! Both operations share one primitive: a chain of 1-bit full adders with a
//! selectable initial carry-in. Subtraction is the textbook two's-complement
//! identity `a - b = a + !b + 1`, so SUB is a single ripple with the
//! subtrahend complemented and carry-in 1.
//!
//! Flag semantics (two's complement):
//! - **N**: bit 31 of the result.
//! - **Z**: all 32 result bits are 0.
//! - **C**: carry out of bit 31. For SUB via `a + !b + 1`, `C = 1` means no
//!   borrow occurred.
//! - **V**: the carry *into* bit 31 differs from the carry *out of* bit 31
//!   (equivalently for ADD: operands share a sign and the result sign flips).

use serde::Serialize;
use tracing::trace;

use crate::bits::{BitVec32, WORD_BITS};

/// Condition flags produced by every add/subtract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Flags {
    /// Negative: bit 31 of the result.
    pub n: bool,
    /// Zero: every result bit is 0.
    pub z: bool,
    /// Carry out of bit 31.
    pub c: bool,
    /// Signed overflow.
    pub v: bool,
}

/// Result of an ALU add or subtract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AluResult {
    /// The 32-bit result word.
    pub bits: BitVec32,
    /// Condition flags computed alongside the result.
    pub flags: Flags,
}

/// One entry of a per-bit ALU execution trace.
///
/// Purely observational: the trace is built from the same carry chain that
/// produced the result and never feeds back into it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum AluStep {
    /// Operands and initial carry, before the first bit position.
    Start {
        /// Hex rendering of operand `a`.
        a: String,
        /// Hex rendering of operand `b` as fed to the chain (already
        /// complemented for SUB).
        b: String,
        /// Initial carry-in (0 for ADD, 1 for SUB).
        carry_in: u8,
    },
    /// One full-adder position.
    Bit {
        /// Bit position, LSB = 0.
        index: usize,
        /// Operand `a` bit at this position.
        a: u8,
        /// Operand `b` bit at this position.
        b: u8,
        /// Carry into this position.
        carry_in: u8,
        /// Sum bit produced.
        sum: u8,
        /// Carry out of this position.
        carry_out: u8,
    },
    /// Result and flags, after the last bit position.
    Finish {
        /// Hex rendering of the result word.
        result: String,
        /// The final flag set.
        flags: Flags,
    },
}

/// Ordered per-bit trace of one ripple: a start record, 32 bit records, and
/// a finish record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AluTrace {
    /// The trace entries, in execution order.
    pub steps: Vec<AluStep>,
}

/// Outcome of a width-generic ripple-carry addition.
///
/// `carries[i]` is the carry *into* position `i`; `carries[len]` is the
/// carry out of the most significant position. Shared with the MDU, which
/// runs the same chain at 33 and 64 bits.
pub(crate) struct Ripple {
    /// Sum bits, LSB first, same length as the operands.
    pub bits: Vec<u8>,
    /// Carry into each position, plus the final carry-out.
    pub carries: Vec<u8>,
}

/// Rips a carry chain across two equal-length bit slices.
///
/// Per position `i`: `sum = a ^ b ^ cin` and
/// `cout = (a & b) | (cin & (a ^ b))`.
pub(crate) fn ripple_add(a: &[u8], b: &[u8], carry_in: u8) -> Ripple {
    debug_assert_eq!(a.len(), b.len());
    let width = a.len();
    let mut bits = vec![0u8; width];
    let mut carries = vec![0u8; width + 1];
    carries[0] = carry_in;
    for i in 0..width {
        let axb = a[i] ^ b[i];
        bits[i] = axb ^ carries[i];
        carries[i + 1] = (a[i] & b[i]) | (carries[i] & axb);
    }
    Ripple { bits, carries }
}

/// Two's-complement negation of an arbitrary-width register: `!x + 1`,
/// computed with the same ripple chain as everything else.
pub(crate) fn negate(bits: &[u8]) -> Vec<u8> {
    let inverted: Vec<u8> = bits.iter().map(|&b| 1 - b).collect();
    let zeros = vec![0u8; bits.len()];
    ripple_add(&inverted, &zeros, 1).bits
}

/// Arithmetic Logic Unit for integer add/subtract.
///
/// Stateless; both operations are pure functions over validated words.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Adds two words, producing the result and N/Z/C/V flags.
    pub fn add(a: BitVec32, b: BitVec32) -> AluResult {
        let (result, _) = run(a, b, 0, false);
        result
    }

    /// Adds two words and records a per-bit execution trace.
    ///
    /// The trace is additive only; the numeric result is identical to
    /// [`Alu::add`].
    pub fn add_traced(a: BitVec32, b: BitVec32) -> (AluResult, AluTrace) {
        let (result, trace) = run(a, b, 0, true);
        (result, trace.unwrap_or_default())
    }

    /// Subtracts `b` from `a` via `a + !b + 1`, producing result and flags.
    pub fn sub(a: BitVec32, b: BitVec32) -> AluResult {
        let (result, _) = run(a, b.not(), 1, false);
        result
    }

    /// Subtracts with a per-bit execution trace.
    ///
    /// The trace shows the chain as executed: operand `b` appears
    /// complemented and the initial carry is 1.
    pub fn sub_traced(a: BitVec32, b: BitVec32) -> (AluResult, AluTrace) {
        let (result, trace) = run(a, b.not(), 1, true);
        (result, trace.unwrap_or_default())
    }
}

/// Runs the 32-bit chain and derives flags, optionally building a trace.
fn run(a: BitVec32, b: BitVec32, carry_in: u8, traced: bool) -> (AluResult, Option<AluTrace>) {
    let ripple = ripple_add(a.as_bits(), b.as_bits(), carry_in);
    let bits = BitVec32::from_low_slice(&ripple.bits);
    let flags = Flags {
        n: ripple.bits[WORD_BITS - 1] == 1,
        z: ripple.bits.iter().all(|&bit| bit == 0),
        c: ripple.carries[WORD_BITS] == 1,
        v: ripple.carries[WORD_BITS - 1] != ripple.carries[WORD_BITS],
    };
    let result = AluResult { bits, flags };
    trace!(
        a = %a.to_hex(),
        b = %b.to_hex(),
        carry_in,
        result = %bits.to_hex(),
        ?flags,
        "alu ripple"
    );
    if !traced {
        return (result, None);
    }

    let mut steps = Vec::with_capacity(WORD_BITS + 2);
    steps.push(AluStep::Start {
        a: a.to_hex(),
        b: b.to_hex(),
        carry_in,
    });
    for index in 0..WORD_BITS {
        steps.push(AluStep::Bit {
            index,
            a: a.bit(index),
            b: b.bit(index),
            carry_in: ripple.carries[index],
            sum: ripple.bits[index],
            carry_out: ripple.carries[index + 1],
        });
    }
    steps.push(AluStep::Finish {
        result: bits.to_hex(),
        flags,
    });
    (result, Some(AluTrace { steps }))
}
