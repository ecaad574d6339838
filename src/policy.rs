//! Policy vocabulary for describing floating-point formats.
//!
//! Every format OPINE can reason about is addressed by five orthogonal
//! encoding axes (sign, NaN, infinity, denormals, zero sign) plus the
//! implicit-bit switch and the exponent bias, and by the rounding and
//! exception policies resolved at format-instantiation time. These types
//! are pure data; all behavior keyed on them lives in the codec and the
//! adapters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the sign of a value is encoded in the bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignEncoding {
    /// A dedicated sign bit; exponent and mantissa store the magnitude.
    Magnitude,
    /// The whole word is two's-complement negated for negative values.
    TwosComplement,
    /// Exponent and mantissa fields are bitwise inverted for negative values.
    OnesComplement,
}

/// How NaN is encoded, if the format has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NanEncoding {
    /// IEEE style: maximum exponent with a non-zero fraction.
    ReservedExponent,
    /// A single trap pattern: only the most significant bit set.
    TrapValue,
    /// The pattern sign=1, exponent=0, mantissa=0 (FNUZ style).
    NegativeZero,
    /// The format has no NaN.
    None,
}

/// How infinity is encoded, if the format has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfEncoding {
    /// IEEE style: maximum exponent with zero fraction.
    ReservedExponent,
    /// The two's-complement signed-integer extremes.
    IntegerExtremes,
    /// The format has no infinities.
    None,
}

/// Denormal (subnormal) handling of a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenormalMode {
    /// Gradual underflow; subnormals are decoded and produced.
    Full,
    /// Subnormal results are flushed to signed zero.
    FlushOutput,
    /// Subnormal operands are read as signed zero.
    FlushInput,
    /// Both of the above.
    FlushBoth,
    /// The format has no denormals at all.
    None,
}

impl DenormalMode {
    /// Whether subnormal operands are collapsed to zero at decode time.
    pub fn flushes_input(self) -> bool {
        matches!(self, Self::FlushInput | Self::FlushBoth | Self::None)
    }

    /// Whether subnormal results are collapsed to zero at encode time.
    pub fn flushes_output(self) -> bool {
        matches!(self, Self::FlushOutput | Self::FlushBoth | Self::None)
    }
}

/// Whether the format distinguishes −0 from +0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroSign {
    /// A negative-zero bit pattern exists.
    Exists,
    /// All zeros collapse to the positive pattern.
    DoesNotExist,
}

/// Rounding policy of a format, resolved at instantiation time.
///
/// Each mode carries the number of guard bits a correctly rounded
/// implementation of the library under test must retain; the oracle itself
/// rounds from 256-bit intermediates and does not consume this number, but
/// the harness exposes it so implementations can be parameterized from the
/// same vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Truncate toward zero.
    TowardZero,
    /// Directed rounding toward +∞.
    TowardPositive,
    /// Directed rounding toward −∞.
    TowardNegative,
    /// Round to nearest, ties to the even significand.
    TiesToEven,
    /// Round to nearest, ties away from zero.
    TiesToAway,
    /// Set the low bit when any precision is lost (double-rounding avoidance).
    ToOdd,
}

impl Rounding {
    /// Guard bits a correctly rounded implementation needs for this mode.
    pub const fn guard_bits(self) -> u32 {
        match self {
            Self::TowardZero => 0,
            Self::TowardPositive | Self::TowardNegative | Self::ToOdd => 1,
            Self::TiesToEven | Self::TiesToAway => 3,
        }
    }
}

/// Whether an implementation's exception-flag byte is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionPolicy {
    /// Flags are not modeled; the flag byte is always zero.
    Ignore,
    /// Flags are recorded per operation.
    Record,
}

/// Exponent bias selection.
///
/// `Auto` resolves to `2^(E−1)` for two's-complement sign encoding and to
/// the IEEE `2^(E−1) − 1` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    /// Derive the bias from the exponent width and sign encoding.
    Auto,
    /// Use the given bias verbatim.
    Explicit(i32),
}

impl fmt::Display for SignEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Magnitude => write!(f, "sign-magnitude"),
            Self::TwosComplement => write!(f, "two's-complement"),
            Self::OnesComplement => write!(f, "one's-complement"),
        }
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TowardZero => write!(f, "toward-zero"),
            Self::TowardPositive => write!(f, "toward-positive"),
            Self::TowardNegative => write!(f, "toward-negative"),
            Self::TiesToEven => write!(f, "ties-to-even"),
            Self::TiesToAway => write!(f, "ties-to-away"),
            Self::ToOdd => write!(f, "to-odd"),
        }
    }
}
