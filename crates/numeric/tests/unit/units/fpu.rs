//! Binary32 FPU Tests
//!
//! Deterministic tests for IEEE-754 binary32 pack/unpack, classification,
//! round-to-nearest-ties-to-even (including the subnormal boundary and the
//! tie cases on either side of it), and the add/sub/mul flag heuristics.
//! Every expected bit pattern is a hand-checked binary32 encoding.

use pretty_assertions::assert_eq;
use rvnum_core::units::fpu::{FloatClass, FloatFields, FpFlags};
use rvnum_core::{BitVec32, Fpu};

// ─── Constants ───────────────────────────────────────────────────────────────

const POS_ZERO: u32 = 0x0000_0000;
const NEG_ZERO: u32 = 0x8000_0000;
const POS_INF: u32 = 0x7F80_0000;
const NEG_INF: u32 = 0xFF80_0000;
const QNAN: u32 = 0x7FC0_0000;
const ONE: u32 = 0x3F80_0000;
const SMALLEST_SUBNORMAL: u32 = 0x0000_0001;
const SMALLEST_NORMAL: u32 = 0x0080_0000;
const MAX_FINITE: u32 = 0x7F7F_FFFF;

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn pack_bits(value: f64) -> u32 {
    Fpu::pack(value).bits.to_unsigned()
}

fn op_bits(result: rvnum_core::units::fpu::FpResult) -> (u32, FpFlags) {
    (result.bits.to_unsigned(), result.flags)
}

// ═════════════════════════════════════════════════════════════════════════════
//  Pack — exact values
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn pack_signed_zeros() {
    assert_eq!(pack_bits(0.0), POS_ZERO);
    assert_eq!(pack_bits(-0.0), NEG_ZERO);
}

#[test]
fn pack_one() {
    assert_eq!(pack_bits(1.0), ONE);
}

#[test]
fn pack_simple_dyadic_values() {
    assert_eq!(pack_bits(1.5), 0x3FC0_0000);
    assert_eq!(pack_bits(-1.5), 0xBFC0_0000);
    assert_eq!(pack_bits(0.75), 0x3F40_0000);
    assert_eq!(pack_bits(2.25), 0x4010_0000);
    assert_eq!(pack_bits(3.375), 0x4058_0000);
    assert_eq!(pack_bits(3.75), 0x4070_0000);
    assert_eq!(pack_bits(100.0), 0x42C8_0000);
    assert_eq!(pack_bits(-2.5), 0xC020_0000);
}

#[test]
fn pack_infinities() {
    assert_eq!(pack_bits(f64::INFINITY), POS_INF);
    assert_eq!(pack_bits(f64::NEG_INFINITY), NEG_INF);
}

#[test]
fn pack_nan_canonicalizes() {
    assert_eq!(pack_bits(f64::NAN), QNAN);
    assert_eq!(pack_bits(-f64::NAN), QNAN);
}

#[test]
fn pack_max_finite() {
    assert_eq!(pack_bits(f64::from(f32::MAX)), MAX_FINITE);
}

// ═════════════════════════════════════════════════════════════════════════════
//  Pack — rounding
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn pack_halfway_tie_rounds_to_even_down() {
    // 1 + 2^-24 sits exactly between 1.0 (even fraction) and 1 + 2^-23.
    assert_eq!(pack_bits(1.0 + 2f64.powi(-24)), ONE);
}

#[test]
fn pack_halfway_tie_rounds_to_even_up() {
    // 1 + 3*2^-24 sits between fractions 1 (odd) and 2 (even).
    assert_eq!(pack_bits(1.0 + 3.0 * 2f64.powi(-24)), 0x3F80_0002);
}

#[test]
fn pack_just_above_a_tie_rounds_up() {
    assert_eq!(pack_bits(1.0 + 2f64.powi(-24) + 2f64.powi(-40)), 0x3F80_0001);
}

#[test]
fn pack_just_below_a_tie_rounds_down() {
    assert_eq!(pack_bits(1.0 + 2f64.powi(-24) - 2f64.powi(-40)), ONE);
}

#[test]
fn pack_rounding_can_carry_into_the_exponent() {
    // 2 - 2^-25 rounds up from 1.111...1 to 10.0, i.e. exactly 2.0.
    assert_eq!(pack_bits(2.0 - 2f64.powi(-25)), 0x4000_0000);
}

#[test]
fn pack_saturates_to_infinity_above_max_finite() {
    assert_eq!(pack_bits(3.5e38), POS_INF);
    assert_eq!(pack_bits(-3.5e38), NEG_INF);
}

#[test]
fn pack_rounds_up_to_infinity_at_the_overflow_threshold() {
    // 2^128 * (1 - 2^-25) is past the last finite rounding boundary.
    assert_eq!(pack_bits(2f64.powi(128) * (1.0 - 2f64.powi(-25))), POS_INF);
}

// ═════════════════════════════════════════════════════════════════════════════
//  Pack — subnormals
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn pack_smallest_subnormal() {
    assert_eq!(pack_bits(2f64.powi(-149)), SMALLEST_SUBNORMAL);
}

#[test]
fn pack_below_half_of_smallest_subnormal_flushes_to_zero() {
    // 2^-150 ties between 0 (even) and 2^-149; RNE picks zero.
    assert_eq!(pack_bits(2f64.powi(-150)), POS_ZERO);
    assert_eq!(pack_bits(-(2f64.powi(-150))), NEG_ZERO);
}

#[test]
fn pack_above_the_tie_rounds_to_smallest_subnormal() {
    assert_eq!(pack_bits(1.5 * 2f64.powi(-150)), SMALLEST_SUBNORMAL);
}

#[test]
fn pack_subnormal_rounding_promotes_to_smallest_normal() {
    // Halfway between the largest subnormal and 2^-126; even side is normal.
    assert_eq!(
        pack_bits(2f64.powi(-126) * (1.0 - 2f64.powi(-24))),
        SMALLEST_NORMAL
    );
}

#[test]
fn pack_smallest_normal_is_not_subnormal() {
    assert_eq!(pack_bits(2f64.powi(-126)), SMALLEST_NORMAL);
}

// ═════════════════════════════════════════════════════════════════════════════
//  Unpack and classification
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn unpack_classifies_zeros() {
    assert_eq!(Fpu::unpack(BitVec32::from(POS_ZERO)).class, FloatClass::Zero);
    assert_eq!(Fpu::unpack(BitVec32::from(NEG_ZERO)).class, FloatClass::Zero);
}

#[test]
fn unpack_classifies_subnormals() {
    let unpacked = Fpu::unpack(BitVec32::from(SMALLEST_SUBNORMAL));
    assert_eq!(unpacked.class, FloatClass::Subnormal);
    assert_eq!(unpacked.value, 2f64.powi(-149));
}

#[test]
fn unpack_classifies_normals() {
    let unpacked = Fpu::unpack(BitVec32::from(ONE));
    assert_eq!(unpacked.class, FloatClass::Normal);
    assert_eq!(unpacked.value, 1.0);
}

#[test]
fn unpack_classifies_infinities() {
    let positive = Fpu::unpack(BitVec32::from(POS_INF));
    assert_eq!(positive.class, FloatClass::Inf);
    assert_eq!(positive.value, f64::INFINITY);
    let negative = Fpu::unpack(BitVec32::from(NEG_INF));
    assert_eq!(negative.value, f64::NEG_INFINITY);
}

#[test]
fn unpack_classifies_nans() {
    // Any non-zero fraction with exponent 255 is NaN, quiet bit or not.
    assert_eq!(Fpu::unpack(BitVec32::from(QNAN)).class, FloatClass::Nan);
    assert_eq!(
        Fpu::unpack(BitVec32::from(0x7FC0_0001)).class,
        FloatClass::Nan
    );
    assert_eq!(
        Fpu::unpack(BitVec32::from(0x7F80_0001)).class,
        FloatClass::Nan
    );
    assert!(Fpu::unpack(BitVec32::from(QNAN)).value.is_nan());
}

#[test]
fn unpack_reads_negative_values() {
    assert_eq!(Fpu::unpack(BitVec32::from(0xC020_0000)).value, -2.5);
}

#[test]
fn unpack_inverts_pack_for_finite_values() {
    for value in [0.0, 1.0, -1.5, 0.75, 3.375, 100.0, 2f64.powi(-149)] {
        assert_eq!(Fpu::unpack(Fpu::pack(value).bits).value, value);
    }
}

#[test]
fn fields_round_trip_through_the_word() {
    let word = BitVec32::from(0xDEAD_BEEF);
    let fields = FloatFields::from_word(word);
    assert_eq!(fields.to_word(), word);
    assert_eq!(fields.sign, 1);
    assert_eq!(fields.exponent_value(), 0xBD);
    assert_eq!(fields.fraction_value(), 0x2D_BEEF);
}

// ═════════════════════════════════════════════════════════════════════════════
//  Arithmetic
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn add_simple_values() {
    let (bits, flags) = op_bits(Fpu::add(Fpu::pack(1.5).bits, Fpu::pack(2.25).bits));
    assert_eq!(bits, 0x4070_0000);
    assert_eq!(flags, FpFlags::default());
}

#[test]
fn add_of_opposite_values_is_positive_zero() {
    let (bits, flags) = op_bits(Fpu::add(Fpu::pack(1.5).bits, Fpu::pack(-1.5).bits));
    assert_eq!(bits, POS_ZERO);
    // Exact cancellation of normal inputs lands in the zero class, which the
    // heuristic reports as underflow.
    assert!(flags.underflow);
}

#[test]
fn sub_simple_values() {
    let (bits, flags) = op_bits(Fpu::sub(Fpu::pack(2.25).bits, Fpu::pack(1.5).bits));
    assert_eq!(bits, 0x3F40_0000);
    assert_eq!(flags, FpFlags::default());
}

#[test]
fn mul_simple_values() {
    let (bits, flags) = op_bits(Fpu::mul(Fpu::pack(1.5).bits, Fpu::pack(2.25).bits));
    assert_eq!(bits, pack_bits(3.375));
    assert_eq!(flags, FpFlags::default());
}

#[test]
fn mul_overflow_saturates_and_flags() {
    let (bits, flags) = op_bits(Fpu::mul(Fpu::pack(1.0e38).bits, Fpu::pack(10.0).bits));
    assert_eq!(bits, POS_INF);
    assert!(flags.overflow);
    assert!(!flags.invalid);
}

#[test]
fn mul_underflow_flushes_and_flags() {
    let tiny = Fpu::pack(1.0e-30).bits;
    let (bits, flags) = op_bits(Fpu::mul(tiny, tiny));
    assert_eq!(bits, POS_ZERO);
    assert!(flags.underflow);
    assert!(!flags.overflow);
}

#[test]
fn add_with_an_infinite_input_does_not_flag_overflow() {
    let (bits, flags) = op_bits(Fpu::add(BitVec32::from(POS_INF), Fpu::pack(1.0).bits));
    assert_eq!(bits, POS_INF);
    assert_eq!(flags, FpFlags::default());
}

#[test]
fn add_of_opposing_infinities_is_invalid() {
    let (bits, flags) = op_bits(Fpu::add(BitVec32::from(POS_INF), BitVec32::from(NEG_INF)));
    assert_eq!(bits, QNAN);
    assert!(flags.invalid);
    assert!(!flags.overflow);
}

#[test]
fn nan_input_propagates_without_the_invalid_flag() {
    let (bits, flags) = op_bits(Fpu::add(BitVec32::from(QNAN), Fpu::pack(1.0).bits));
    assert_eq!(bits, QNAN);
    assert!(!flags.invalid);
}

#[test]
fn signed_zero_addition_follows_rne() {
    let (bits, _) = op_bits(Fpu::add(BitVec32::from(POS_ZERO), BitVec32::from(NEG_ZERO)));
    assert_eq!(bits, POS_ZERO);
}

#[test]
fn traced_operation_records_both_operands_and_the_result() {
    let a = Fpu::pack(1.5).bits;
    let b = Fpu::pack(2.25).bits;
    let (result, trace) = Fpu::add_traced(a, b);
    assert_eq!(trace.steps.len(), 1);
    let step = &trace.steps[0];
    assert_eq!(step.op, "fadd");
    assert_eq!(step.a, a.to_hex());
    assert_eq!(step.b, b.to_hex());
    assert_eq!(step.result, result.bits.to_hex());
}

#[test]
fn traced_results_match_untraced() {
    let a = Fpu::pack(-2.5).bits;
    let b = Fpu::pack(0.75).bits;
    assert_eq!(Fpu::sub_traced(a, b).0, Fpu::sub(a, b));
    assert_eq!(Fpu::mul_traced(a, b).0, Fpu::mul(a, b));
}
