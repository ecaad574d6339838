//! Error types for the OPINE test oracle.
//!
//! Policy-invariant violations and width-range errors are normally caught at
//! compile time, because formats are declared as `const` items and the
//! checks run inside `const fn` constructors. The same conditions surface as
//! [`OpineError`] values when a format is assembled at runtime.

use thiserror::Error;

/// Primary error type for the OPINE library.
#[derive(Debug, Error)]
pub enum OpineError {
    /// A format combined policy-axis values that violate an invariant.
    ///
    /// The message names the violated invariant verbatim.
    #[error("invalid policy combination: {invariant}")]
    InvalidPolicy {
        /// The violated invariant, spelled out.
        invariant: &'static str,
    },

    /// A bit-container width fell outside the supported range.
    #[error("width out of range: {width} bits (supported: {min}..={max})")]
    WidthOutOfRange {
        /// The requested width.
        width: u32,
        /// Smallest supported width.
        min: u32,
        /// Largest supported width.
        max: u32,
    },

    /// The storage container is not a power-of-two machine width.
    #[error("storage width {width} is not one of 8, 16, 32, 64, 128")]
    BadStorageWidth {
        /// The requested storage width.
        width: u32,
    },

    /// The declared fields do not fit inside the declared total width.
    #[error("bit layout overflow: fields need {needed} bits, total is {total}")]
    LayoutOverflow {
        /// Highest bit position any field reaches.
        needed: u32,
        /// Declared total width.
        total: u32,
    },

    /// No host floating-point type matches the requested format.
    #[error("no native arithmetic for format `{format}`")]
    NoNativeFormat {
        /// Name of the format that was requested.
        format: String,
    },

    /// No SoftFloat reference type matches the requested format.
    #[error("no soft-float reference for format `{format}`")]
    NoReferenceFormat {
        /// Name of the format that was requested.
        format: String,
    },
}

/// Convenience result type used throughout the library.
pub type Result<T> = std::result::Result<T, OpineError>;
