//! Bit-accurate RV32 arithmetic core.
//!
//! This crate implements the arithmetic/logic subsystem of a 32-bit RISC-V
//! style execution unit, computed over explicit 32-element bit vectors rather
//! than host-native integer arithmetic:
//! 1. **Bits:** The validated [`BitVec32`] word type, integer conversion, and
//!    grouped-binary / hexadecimal rendering.
//! 2. **Two's complement:** Signed encode/decode with wraparound-overflow
//!    flagging, plus sign/zero width extension.
//! 3. **Shifter:** Barrel-shifter SLL/SRL/SRA built from power-of-two stages.
//! 4. **ALU:** Ripple-carry ADD/SUB with N/Z/C/V flags and per-bit traces.
//! 5. **MDU:** Shift-add multiplication and restoring division with
//!    RV32M-compatible edge cases and per-iteration traces.
//! 6. **FPU:** IEEE-754 binary32 pack/unpack and add/sub/mul with
//!    round-to-nearest-ties-to-even and overflow/underflow/invalid flags.
//!
//! Every operation is a pure function of its inputs: no unit owns mutable
//! state across calls, and traces are plain values owned by the caller.

/// Common types shared by every unit (errors, error classification).
pub mod common;

/// The 32-bit word type and its conversions and renderings.
pub mod bits;

/// Two's-complement codec and width-extension helpers.
pub mod twos;

/// Execution units (shifter, ALU, MDU, FPU).
pub mod units;

/// The validated 32-bit word; construct via [`BitVec32::from_unsigned`] or `From<u32>`.
pub use crate::bits::BitVec32;
/// Crate-wide error type; classify with [`CoreError::kind`].
pub use crate::common::error::{CoreError, ErrorKind};
/// Integer add/subtract unit; entry points are [`Alu::add`] and [`Alu::sub`].
pub use crate::units::alu::Alu;
/// Binary32 floating-point unit; entry points are [`Fpu::pack`], [`Fpu::unpack`],
/// and the [`Fpu::add`]/[`Fpu::sub`]/[`Fpu::mul`] family.
pub use crate::units::fpu::Fpu;
/// Multiply/divide unit; entry points are [`Mdu::multiply`] and [`Mdu::divide`].
pub use crate::units::mdu::Mdu;
