//! Execution units of the arithmetic core.
//!
//! One unit per submodule, mirroring the blocks of a real execute stage:
//! - [`shifter`]: barrel shifter (SLL, SRL, SRA).
//! - [`alu`]:     ripple-carry add/subtract with N/Z/C/V flags.
//! - [`mdu`]:     shift-add multiply and restoring divide.
//! - [`fpu`]:     IEEE-754 binary32 pack/unpack and add/sub/mul.
//!
//! Units are stateless; every operation is a pure function.

/// Ripple-carry integer add/subtract.
pub mod alu;

/// IEEE-754 binary32 floating-point operations.
pub mod fpu;

/// Multiply/divide unit.
pub mod mdu;

/// Barrel shifter.
pub mod shifter;
