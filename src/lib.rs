//! OPINE - differential testing for configurable floating-point formats.
//!
//! This library answers one question for any floating-point format
//! describable by its policy taxonomy: *what is the mathematically correct
//! result of this operation on these bit patterns?* - and uses the answer
//! to cross-validate independent arithmetic implementations against each
//! other on exhaustive and randomized corpora.
//!
//! # Features
//!
//! - **Policy taxonomy**: sign encoding (magnitude, two's- and
//!   one's-complement), NaN encoding (reserved exponent, trap value,
//!   negative-zero pattern, none), infinity encoding, denormal modes,
//!   zero-sign, explicit/implicit leading bit, configurable bias
//! - **Format codec**: decode of every bit pattern - including explicit-bit
//!   unnormals, pseudo-denormals, pseudo-infinities and pseudo-NaNs - to an
//!   exact 256-bit real, and correctly rounded re-encoding
//! - **Three adapters**: arbitrary-precision oracle, Berkeley SoftFloat
//!   reference, host FPU - all behind one dispatch trait
//! - **Differential harness**: targeted and seeded-random corpora, NaN-aware
//!   comparison, bounded failure reports
//!
//! # Quick Start
//!
//! ```rust
//! use opine::format::formats::BINARY32;
//! use opine::{oracle_vs_native, ReportFormatter};
//!
//! fn main() -> Result<(), opine::OpineError> {
//!     let reports = oracle_vs_native(&BINARY32, 1_000)?;
//!     println!("{}", opine::HumanFormatter.format_run(&reports));
//!     assert!(reports.iter().all(|r| r.is_pass()));
//!     Ok(())
//! }
//! ```
//!
//! # Format Support
//!
//! Preset formats cover IEEE binary16/32/64/128, x87 extFloat80, bfloat16,
//! the OCP 8-bit formats (E5M2, E4M3 saturating, E4M3FNUZ) and 8-bit
//! two's-complement and one's-complement teaching formats. New formats are
//! `const`-declared; illegal policy combinations fail the build with a
//! message naming the violated invariant.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod adapters;
pub mod bits;
pub mod cases;
pub mod codec;
pub mod corpus;
pub mod error;
pub mod flags;
pub mod format;
pub mod formatter;
pub mod harness;
pub mod policy;
pub mod real;

pub use adapters::{
    BinaryOp, FloatImpl, NativeFloat, Oracle, SoftFloatRef, TernaryOp, TestOutput, UnaryOp,
};
pub use bits::Bits;
pub use error::{OpineError, Result};
pub use flags::ExceptionFlags;
pub use format::{BitLayout, Encoding, FloatFormat};
pub use formatter::{HumanFormatter, JsonFormatter, ReportFormatter, ShortFormatter};
pub use harness::{
    run_binary, run_suite, run_ternary, run_unary, Comparator, DiffConfig, DiffReport, Failure,
};
pub use real::Real;

use crate::corpus::DEFAULT_SEED;
use crate::format::FloatFormat as Format;

/// Runs the stock suite oracle-vs-SoftFloat in both directions.
///
/// # Errors
///
/// Fails when SoftFloat does not implement the format.
pub fn oracle_vs_reference(
    format: &'static Format,
    random_count: usize,
) -> Result<Vec<DiffReport>> {
    let oracle = Oracle::new(format);
    let reference = SoftFloatRef::for_format(format)?;
    let config = DiffConfig::default();
    let mut reports = run_suite(format, &oracle, &reference, random_count, DEFAULT_SEED, &config);
    reports.extend(run_suite(
        format,
        &reference,
        &oracle,
        random_count,
        DEFAULT_SEED,
        &config,
    ));
    Ok(reports)
}

/// Runs the stock suite oracle-vs-host-FPU in both directions.
///
/// # Errors
///
/// Fails when the host has no matching floating-point type.
pub fn oracle_vs_native(format: &'static Format, random_count: usize) -> Result<Vec<DiffReport>> {
    let oracle = Oracle::new(format);
    let native = NativeFloat::for_format(format)?;
    let config = DiffConfig::default();
    let mut reports = run_suite(format, &oracle, &native, random_count, DEFAULT_SEED, &config);
    reports.extend(run_suite(
        format,
        &native,
        &oracle,
        random_count,
        DEFAULT_SEED,
        &config,
    ));
    Ok(reports)
}

/// Runs the stock suite SoftFloat-vs-host-FPU in both directions.
///
/// # Errors
///
/// Fails when either implementation does not cover the format.
pub fn reference_vs_native(
    format: &'static Format,
    random_count: usize,
) -> Result<Vec<DiffReport>> {
    let reference = SoftFloatRef::for_format(format)?;
    let native = NativeFloat::for_format(format)?;
    let config = DiffConfig::default();
    let mut reports = run_suite(format, &reference, &native, random_count, DEFAULT_SEED, &config);
    reports.extend(run_suite(
        format,
        &native,
        &reference,
        random_count,
        DEFAULT_SEED,
        &config,
    ));
    Ok(reports)
}
