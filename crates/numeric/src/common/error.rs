//! Error definitions for the arithmetic core.
//!
//! Two kinds of failure exist, and both are detected at the start of a public
//! operation before any computation proceeds:
//! 1. **Format errors:** A caller handed over a malformed bit pattern (wrong
//!    length, elements outside {0, 1}, or an unparsable binary string).
//! 2. **Range errors:** A scalar parameter lies outside its documented domain
//!    (an integer too large for 32 bits, a shift amount above 31, or an
//!    extension width narrower than its source).
//!
//! Divide-by-zero and `INT_MIN / -1` are deliberately *not* errors: they are
//! specified, flagged results matching RV32M hardware semantics.

use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a [`CoreError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// A malformed bit-vector or bit-string input.
    Format,
    /// A scalar parameter outside its documented domain.
    Range,
}

/// Errors surfaced by the arithmetic core.
///
/// Every variant is synchronous and fail-fast; no partial results are ever
/// produced alongside an error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A bit slice did not contain exactly the expected number of elements.
    #[error("bit vector must contain exactly {expected} elements, found {found}")]
    WidthMismatch {
        /// The required element count.
        expected: usize,
        /// The element count actually supplied.
        found: usize,
    },

    /// A bit slice contained an element other than 0 or 1.
    #[error("bit vector elements must be 0 or 1, found {found} at index {index}")]
    NotABit {
        /// Index of the offending element (LSB = 0).
        index: usize,
        /// The value found there.
        found: u8,
    },

    /// A binary string did not contain exactly 32 significant characters.
    #[error("binary string must contain exactly 32 digits, found {found}")]
    BinaryStringLength {
        /// Number of significant (non-separator) characters found.
        found: usize,
    },

    /// A binary string contained a character other than '0', '1', or '_'.
    #[error("binary string must contain only '0'/'1' digits, found {found:?}")]
    BinaryStringChar {
        /// The offending character.
        found: char,
    },

    /// An unsigned integer did not fit in 32 bits.
    #[error("value {value:#X} is outside the unsigned 32-bit range")]
    UnsignedOutOfRange {
        /// The out-of-range value.
        value: u64,
    },

    /// A shift amount was outside `0..=31`.
    #[error("shift amount {shamt} is outside 0..=31")]
    ShamtOutOfRange {
        /// The rejected shift amount.
        shamt: u32,
    },

    /// A width-extension source width was outside `1..=len`.
    #[error("source width {from} is outside 1..={len}")]
    SourceWidthOutOfRange {
        /// The rejected source width.
        from: usize,
        /// Length of the supplied bit slice.
        len: usize,
    },

    /// A width-extension target width was narrower than the source width.
    #[error("target width {to} is narrower than source width {from}")]
    TargetWidthTooSmall {
        /// The source width.
        from: usize,
        /// The rejected target width.
        to: usize,
    },
}

impl CoreError {
    /// Classifies this error as a format or range failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::WidthMismatch { .. }
            | Self::NotABit { .. }
            | Self::BinaryStringLength { .. }
            | Self::BinaryStringChar { .. } => ErrorKind::Format,
            Self::UnsignedOutOfRange { .. }
            | Self::ShamtOutOfRange { .. }
            | Self::SourceWidthOutOfRange { .. }
            | Self::TargetWidthTooSmall { .. } => ErrorKind::Range,
        }
    }
}
