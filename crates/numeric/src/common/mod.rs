//! Common utilities and types used throughout the arithmetic core.
//!
//! This module provides the building blocks shared by every unit:
//! 1. **Error Handling:** The crate-wide error enum and its format/range
//!    classification.

/// Error types and their classification.
pub mod error;

pub use error::{CoreError, ErrorKind};
