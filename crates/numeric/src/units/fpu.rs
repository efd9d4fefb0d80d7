//! IEEE-754 binary32 floating-point unit.
//!
//! [`Fpu::pack`] is the canonical rounding algorithm of the core: it lowers a
//! real value into sign/exponent/fraction fields through a normalized-fraction
//! decomposition, carrying guard/round/sticky bits and rounding to nearest,
//! ties to even. [`Fpu::unpack`] classifies a pattern and reconstructs its
//! value. Add, subtract, and multiply unpack both operands to real values,
//! operate exactly (every binary32 add/sub/mul is exact in the f64 working
//! precision), and re-pack through the same rounding path, so the one rounding
//! step happens at binary32 precision.
//!
//! Flags are classification heuristics for grading, not a full IEEE
//! exception model: `overflow` means finite inputs produced an infinity,
//! `underflow` means finite non-zero inputs produced a zero/subnormal, and
//! `invalid` means a NaN appeared without a NaN input.

use serde::Serialize;
use tracing::trace;

use crate::bits::{BitVec32, WORD_BITS};

/// Exponent bias of binary32.
const EXP_BIAS: i32 = 127;

/// Number of stored fraction bits.
const FRAC_BITS: usize = 23;

/// Number of significand bits including the implicit leading 1.
const SIG_BITS: usize = 24;

/// Number of exponent field bits.
const EXP_BITS: usize = 8;

/// Exponent field value reserved for infinities and NaNs.
const EXP_MAX: u32 = 255;

/// Bit pattern of +infinity.
const INF_PATTERN: u32 = 0x7F80_0000;

/// Canonical quiet NaN produced for any NaN result.
const QNAN_PATTERN: u32 = 0x7FC0_0000;

/// Mask of the stored fraction field.
const FRAC_MASK: u32 = 0x007F_FFFF;

/// Classification of a binary32 pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatClass {
    /// Exponent 0, fraction 0 (either sign).
    Zero,
    /// Exponent 0, fraction non-zero.
    Subnormal,
    /// Exponent in 1..=254.
    Normal,
    /// Exponent 255, fraction 0.
    Inf,
    /// Exponent 255, fraction non-zero.
    Nan,
}

/// The three sub-fields of a packed binary32 value, LSB-first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FloatFields {
    /// Sign bit (bit 31 of the word).
    pub sign: u8,
    /// Exponent field bits (word bits 23–30), LSB first.
    pub exponent: [u8; EXP_BITS],
    /// Fraction field bits (word bits 0–22), LSB first.
    pub fraction: [u8; FRAC_BITS],
}

impl FloatFields {
    /// Splits a word into its sign/exponent/fraction fields.
    pub fn from_word(word: BitVec32) -> Self {
        let bits = word.as_bits();
        let mut exponent = [0u8; EXP_BITS];
        exponent.copy_from_slice(&bits[FRAC_BITS..FRAC_BITS + EXP_BITS]);
        let mut fraction = [0u8; FRAC_BITS];
        fraction.copy_from_slice(&bits[..FRAC_BITS]);
        Self {
            sign: word.sign_bit(),
            exponent,
            fraction,
        }
    }

    /// Reassembles the fields into a word; exact inverse of
    /// [`FloatFields::from_word`].
    pub fn to_word(&self) -> BitVec32 {
        let mut bits = [0u8; WORD_BITS];
        bits[..FRAC_BITS].copy_from_slice(&self.fraction);
        bits[FRAC_BITS..FRAC_BITS + EXP_BITS].copy_from_slice(&self.exponent);
        bits[WORD_BITS - 1] = self.sign;
        BitVec32::from_array(bits)
    }

    /// The exponent field as an unsigned integer (0–255).
    pub fn exponent_value(&self) -> u32 {
        self.exponent
            .iter()
            .enumerate()
            .fold(0, |acc, (i, &bit)| acc | (u32::from(bit) << i))
    }

    /// The fraction field as an unsigned integer (23 bits).
    pub fn fraction_value(&self) -> u32 {
        self.fraction
            .iter()
            .enumerate()
            .fold(0, |acc, (i, &bit)| acc | (u32::from(bit) << i))
    }

    /// Classifies the pattern from its exponent/fraction fields alone.
    pub fn classify(&self) -> FloatClass {
        match (self.exponent_value(), self.fraction_value()) {
            (0, 0) => FloatClass::Zero,
            (0, _) => FloatClass::Subnormal,
            (EXP_MAX, 0) => FloatClass::Inf,
            (EXP_MAX, _) => FloatClass::Nan,
            _ => FloatClass::Normal,
        }
    }
}

/// Result of packing a real value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Packed {
    /// The packed 32-bit pattern.
    pub bits: BitVec32,
    /// The same pattern split into fields.
    pub fields: FloatFields,
}

/// Result of unpacking a pattern.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Unpacked {
    /// The mathematical value the pattern encodes (NaN for NaN patterns).
    pub value: f64,
    /// The pattern's classification.
    pub class: FloatClass,
}

/// Flags attached to every floating-point arithmetic result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FpFlags {
    /// Finite inputs produced an infinite result.
    pub overflow: bool,
    /// Finite non-zero inputs produced a zero or subnormal result.
    pub underflow: bool,
    /// A NaN result appeared without a NaN input.
    pub invalid: bool,
}

/// Result of a floating-point add, subtract, or multiply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FpResult {
    /// The packed result pattern.
    pub bits: BitVec32,
    /// Heuristic classification flags.
    pub flags: FpFlags,
}

/// The single trace entry of a floating-point operation: both operand
/// patterns and the result pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FpStep {
    /// Operation mnemonic (`fadd`, `fsub`, `fmul`).
    pub op: &'static str,
    /// Hex rendering of operand `a`.
    pub a: String,
    /// Hex rendering of operand `b`.
    pub b: String,
    /// Hex rendering of the result.
    pub result: String,
}

/// Trace of a floating-point operation; always exactly one entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FpTrace {
    /// The trace entries.
    pub steps: Vec<FpStep>,
}

/// Binary32 floating-point unit.
///
/// Stateless; every operation is a pure function over validated words.
#[derive(Debug)]
pub struct Fpu;

impl Fpu {
    /// Packs a real value into a binary32 pattern with
    /// round-to-nearest-ties-to-even.
    ///
    /// NaN inputs produce the canonical quiet NaN `0x7FC00000`; signed
    /// zeros and infinities keep their sign. Values whose magnitude exceeds
    /// the binary32 maximum saturate to infinity, and tiny values take the
    /// subnormal path, where a rounding carry can promote the result to the
    /// smallest normal.
    pub fn pack(value: f64) -> Packed {
        if value.is_nan() {
            return packed_from(QNAN_PATTERN);
        }
        let sign = u32::from(value.is_sign_negative()) << 31;
        if value.is_infinite() {
            return packed_from(sign | INF_PATTERN);
        }
        if value == 0.0 {
            return packed_from(sign);
        }

        // Normalized-fraction decomposition: |value| = fraction * 2^exponent
        // with fraction in [0.5, 1), i.e. 1.f × 2^(exponent - 1).
        let (fraction, exponent) = frexp(value.abs());
        let mut biased = exponent - 1 + EXP_BIAS;
        if biased >= EXP_MAX as i32 {
            return packed_from(sign | INF_PATTERN);
        }

        // Pull 27 significand bits MSB-first: 24 result bits plus
        // guard/round/sticky. Whatever precision remains below feeds sticky.
        let mut sig = 0u32;
        let mut rest = fraction;
        for _ in 0..SIG_BITS + 3 {
            rest *= 2.0;
            sig <<= 1;
            if rest >= 1.0 {
                sig |= 1;
                rest -= 1.0;
            }
        }
        let mut sticky = rest > 0.0;

        let word = if biased <= 0 {
            // Subnormal path: the significand moves right until the exponent
            // reaches the minimum; the displaced bits fold into sticky.
            let shift = (1 - biased) as u32;
            let shifted = if shift >= (SIG_BITS + 3) as u32 {
                sticky = sticky || sig != 0;
                0
            } else {
                sticky = sticky || sig & ((1 << shift) - 1) != 0;
                sig >> shift
            };
            // A carry out of rounding lands exactly on the smallest normal
            // (exponent field 1, fraction 0).
            sign | round_rne(shifted, sticky)
        } else {
            let mut sig24 = round_rne(sig, sticky);
            if sig24 == 1 << SIG_BITS {
                // Rounded up into the 25th bit: renormalize.
                sig24 >>= 1;
                biased += 1;
            }
            if biased >= EXP_MAX as i32 {
                sign | INF_PATTERN
            } else {
                sign | ((biased as u32) << FRAC_BITS) | (sig24 & FRAC_MASK)
            }
        };
        packed_from(word)
    }

    /// Unpacks a binary32 pattern into its value and classification.
    pub fn unpack(word: BitVec32) -> Unpacked {
        let fields = FloatFields::from_word(word);
        let class = fields.classify();
        let sign = if fields.sign == 1 { -1.0 } else { 1.0 };
        let exponent = fields.exponent_value();
        let fraction = fields.fraction_value();
        let value = match class {
            FloatClass::Zero => sign * 0.0,
            FloatClass::Subnormal => sign * f64::from(fraction) * 2f64.powi(-149),
            FloatClass::Normal => {
                let significand = 1.0 + f64::from(fraction) / f64::from(1u32 << FRAC_BITS);
                sign * significand * 2f64.powi(exponent as i32 - EXP_BIAS)
            }
            FloatClass::Inf => sign * f64::INFINITY,
            FloatClass::Nan => f64::NAN,
        };
        Unpacked { value, class }
    }

    /// Floating-point addition.
    pub fn add(a: BitVec32, b: BitVec32) -> FpResult {
        binary_op("fadd", a, b, |x, y| x + y)
    }

    /// Floating-point addition with a one-entry trace.
    pub fn add_traced(a: BitVec32, b: BitVec32) -> (FpResult, FpTrace) {
        let result = Self::add(a, b);
        (result, trace_of("fadd", a, b, &result))
    }

    /// Floating-point subtraction.
    pub fn sub(a: BitVec32, b: BitVec32) -> FpResult {
        binary_op("fsub", a, b, |x, y| x - y)
    }

    /// Floating-point subtraction with a one-entry trace.
    pub fn sub_traced(a: BitVec32, b: BitVec32) -> (FpResult, FpTrace) {
        let result = Self::sub(a, b);
        (result, trace_of("fsub", a, b, &result))
    }

    /// Floating-point multiplication.
    pub fn mul(a: BitVec32, b: BitVec32) -> FpResult {
        binary_op("fmul", a, b, |x, y| x * y)
    }

    /// Floating-point multiplication with a one-entry trace.
    pub fn mul_traced(a: BitVec32, b: BitVec32) -> (FpResult, FpTrace) {
        let result = Self::mul(a, b);
        (result, trace_of("fmul", a, b, &result))
    }
}

/// Shared unpack → operate → re-pack path for add/sub/mul.
fn binary_op(
    op: &'static str,
    a: BitVec32,
    b: BitVec32,
    apply: impl Fn(f64, f64) -> f64,
) -> FpResult {
    let ua = Fpu::unpack(a);
    let ub = Fpu::unpack(b);
    let packed = Fpu::pack(apply(ua.value, ub.value));
    let result_class = packed.fields.classify();
    trace!(op, a = %a.to_hex(), b = %b.to_hex(), result = %packed.bits.to_hex(), "fpu op");

    let finite = |class: FloatClass| !matches!(class, FloatClass::Inf | FloatClass::Nan);
    let finite_nonzero =
        |class: FloatClass| matches!(class, FloatClass::Normal | FloatClass::Subnormal);
    let flags = FpFlags {
        overflow: finite(ua.class) && finite(ub.class) && result_class == FloatClass::Inf,
        underflow: finite_nonzero(ua.class)
            && finite_nonzero(ub.class)
            && matches!(result_class, FloatClass::Zero | FloatClass::Subnormal),
        invalid: result_class == FloatClass::Nan
            && ua.class != FloatClass::Nan
            && ub.class != FloatClass::Nan,
    };
    FpResult {
        bits: packed.bits,
        flags,
    }
}

/// Builds the one-entry trace for an arithmetic operation.
fn trace_of(op: &'static str, a: BitVec32, b: BitVec32, result: &FpResult) -> FpTrace {
    FpTrace {
        steps: vec![FpStep {
            op,
            a: a.to_hex(),
            b: b.to_hex(),
            result: result.bits.to_hex(),
        }],
    }
}

/// Builds a `Packed` record from a raw pattern.
fn packed_from(pattern: u32) -> Packed {
    let bits = BitVec32::from(pattern);
    Packed {
        bits,
        fields: FloatFields::from_word(bits),
    }
}

/// Decomposes a positive finite value into `(fraction, exponent)` with
/// `fraction` in `[0.5, 1)` and `value == fraction * 2^exponent`.
fn frexp(magnitude: f64) -> (f64, i32) {
    let bits = magnitude.to_bits();
    let exp_field = ((bits >> 52) & 0x7FF) as i32;
    if exp_field == 0 {
        // Subnormal f64 input: renormalize by scaling up first. Unreachable
        // for values in binary32 range but kept for totality.
        let (fraction, exponent) = frexp(magnitude * 2f64.powi(64));
        (fraction, exponent - 64)
    } else {
        let fraction = f64::from_bits((bits & !(0x7FFu64 << 52)) | (1022u64 << 52));
        (fraction, exp_field - 1022)
    }
}

/// Rounds a significand carrying 3 low guard/round/sticky bits to nearest,
/// ties to even: round up iff guard is set and any of round, sticky, or the
/// resulting LSB is set.
fn round_rne(sig: u32, sticky: bool) -> u32 {
    let guard = (sig >> 2) & 1;
    let round = (sig >> 1) & 1;
    let sticky = sticky || sig & 1 == 1;
    let lsb = (sig >> 3) & 1;
    let mut out = sig >> 3;
    if guard == 1 && (round == 1 || sticky || lsb == 1) {
        out += 1;
    }
    out
}
