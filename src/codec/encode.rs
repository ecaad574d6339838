//! Round-to-format: exact real value → bit pattern.
//!
//! Given a target format and any 256-bit real, produce the bit pattern
//! that best represents the value under the format's rounding policy,
//! together with the exception flags the rounding step can model
//! (inexact, overflow, underflow). Special values map to the format's
//! canonical special encodings; finite values are scaled so the target
//! significand becomes the integer part, rounded, and re-packed with
//! carry-out, overflow and subnormal handling.

use rug::float::Round;
use rug::ops::CompleteRound;
use rug::{Float, Integer};
use std::cmp::Ordering;

use crate::bits::Bits;
use crate::flags::ExceptionFlags;
use crate::format::FloatFormat;
use crate::policy::{InfEncoding, NanEncoding, Rounding, ZeroSign};
use crate::real::{Real, PRECISION};

/// The format's canonical NaN pattern.
///
/// Reserved-exponent formats quieten the top mantissa bit (and set the J
/// bit for explicit-bit formats); trap-value formats have exactly one NaN
/// pattern; negative-zero formats use the sign=1/exp=0/mant=0 word; a
/// format without NaN falls back to the zero pattern.
pub fn canonical_nan(format: &FloatFormat) -> Bits {
    let m = format.layout.mant_bits;
    match format.encoding.nan {
        NanEncoding::ReservedExponent => {
            let mant = if format.encoding.explicit_bit {
                (1u128 << (m - 1)) | (1u128 << (m - 2))
            } else {
                1u128 << (m - 1)
            };
            format.pack(false, format.exp_all_ones(), mant)
        }
        NanEncoding::TrapValue => format.trap_pattern(),
        NanEncoding::NegativeZero => format.pack(true, 0, 0),
        NanEncoding::None => format.zero_bits(),
    }
}

/// A signed zero pattern, collapsing to +0 where no negative zero exists.
pub fn encode_zero(format: &FloatFormat, negative: bool) -> Bits {
    let keep_sign = negative && matches!(format.encoding.zero_sign, ZeroSign::Exists);
    format.pack(keep_sign, 0, 0)
}

/// The format's signed-infinity pattern (the zero pattern when the format
/// has no infinities).
pub fn encode_infinity(format: &FloatFormat, negative: bool) -> Bits {
    match format.encoding.inf {
        InfEncoding::ReservedExponent => {
            let mant = if format.encoding.explicit_bit {
                1u128 << (format.layout.mant_bits - 1)
            } else {
                0
            };
            format.pack(negative, format.exp_all_ones(), mant)
        }
        InfEncoding::IntegerExtremes => {
            let (pos, neg) = format.integer_extremes();
            if negative {
                neg
            } else {
                pos
            }
        }
        InfEncoding::None => format.zero_bits(),
    }
}

/// The largest finite pattern of the given sign, skipping patterns
/// reserved for integer-extreme infinities.
pub fn largest_finite(format: &FloatFormat, negative: bool) -> Bits {
    let exp = format.max_finite_biased_exp();
    let mut mant = (1u128 << format.layout.mant_bits) - 1;
    if matches!(format.encoding.inf, InfEncoding::IntegerExtremes) {
        let (pos, _) = format.integer_extremes();
        if format.pack(false, exp, mant) == pos {
            mant -= 1;
        }
    }
    format.pack(negative, exp, mant)
}

/// Overflow result: infinity where the rounding direction reaches it,
/// the largest finite value otherwise. A format without infinities
/// saturates (documented policy choice).
fn overflow(format: &FloatFormat, negative: bool) -> (Bits, ExceptionFlags) {
    let flags = ExceptionFlags::OVERFLOW | ExceptionFlags::INEXACT;
    let to_infinity = !matches!(format.encoding.inf, InfEncoding::None)
        && match format.rounding {
            Rounding::TiesToEven | Rounding::TiesToAway => true,
            Rounding::TowardZero | Rounding::ToOdd => false,
            Rounding::TowardPositive => !negative,
            Rounding::TowardNegative => negative,
        };
    if to_infinity {
        (encode_infinity(format, negative), flags)
    } else {
        (largest_finite(format, negative), flags)
    }
}

/// `|value|` scaled by `2^shift`, as a bare 256-bit float. Exact: the
/// shift only adjusts the exponent.
fn scaled_magnitude(value: &Real, shift: i32) -> Float {
    let mut f = value.as_float().clone();
    f.abs_mut();
    f <<= shift;
    f
}

/// Rounds a non-negative scaled magnitude to an integer significand under
/// the format's rounding mode, reporting inexactness. Directed modes are
/// resolved against the value's sign, since the input is a magnitude.
fn round_magnitude(scaled: &Float, mode: Rounding, negative: bool) -> (Integer, bool) {
    let direct = match mode {
        Rounding::TiesToEven => Some(Round::Nearest),
        Rounding::TowardZero => Some(Round::Zero),
        Rounding::TowardPositive => Some(if negative { Round::Zero } else { Round::Up }),
        Rounding::TowardNegative => Some(if negative { Round::Up } else { Round::Zero }),
        Rounding::TiesToAway | Rounding::ToOdd => None,
    };
    if let Some(round) = direct {
        let (int, dir) = scaled
            .to_integer_round(round)
            .expect("scaled magnitude is finite");
        return (int, dir != Ordering::Equal);
    }

    let (trunc, dir) = scaled
        .to_integer_round(Round::Zero)
        .expect("scaled magnitude is finite");
    if dir == Ordering::Equal {
        return (trunc, false);
    }
    match mode {
        Rounding::TiesToAway => {
            // The fractional part is exact at 256 bits, so the tie test is.
            let frac = (scaled - &trunc).complete(PRECISION);
            if frac < 0.5 {
                (trunc, true)
            } else {
                (trunc + 1u32, true)
            }
        }
        Rounding::ToOdd => {
            if trunc.is_even() {
                (trunc + 1u32, true)
            } else {
                (trunc, true)
            }
        }
        _ => unreachable!(),
    }
}

/// Rounds a real value into the format, returning the bit pattern and the
/// rounding-related exception flags.
pub fn round_to_format(format: &FloatFormat, value: &Real) -> (Bits, ExceptionFlags) {
    if value.is_nan() {
        return (canonical_nan(format), ExceptionFlags::empty());
    }
    if value.is_infinite() {
        return (
            encode_infinity(format, value.is_sign_negative()),
            ExceptionFlags::empty(),
        );
    }
    if value.is_zero() {
        return (
            encode_zero(format, value.is_sign_negative()),
            ExceptionFlags::empty(),
        );
    }

    let negative = value.is_sign_negative();
    let e = value
        .binary_exponent()
        .expect("finite non-zero value has a binary exponent");
    if e >= format.min_exponent() {
        encode_normal(format, value, negative, e)
    } else {
        encode_subnormal(format, value, negative)
    }
}

fn encode_normal(
    format: &FloatFormat,
    value: &Real,
    negative: bool,
    e0: i32,
) -> (Bits, ExceptionFlags) {
    let mp = format.rounding_mantissa_bits();
    // Scale so the integer part is the significand: |v| ∈ [2^e, 2^(e+1))
    // becomes [2^mp, 2^(mp+1)).
    let scaled = scaled_magnitude(value, mp as i32 - e0);
    let (mut sig, inexact) = round_magnitude(&scaled, format.rounding, negative);

    let mut e = e0;
    if sig == (Integer::from(1) << (mp + 1)) {
        // Rounding carried out of the significand.
        sig >>= 1u32;
        e += 1;
    }

    let biased = (e as i64) + format.bias() as i64;
    if biased > format.max_finite_biased_exp() as i64 {
        return overflow(format, negative);
    }

    let sig = sig.to_u128().expect("significand fits the container");
    let mant = if format.encoding.explicit_bit {
        sig
    } else {
        sig & ((1u128 << mp) - 1)
    };

    if matches!(format.encoding.inf, InfEncoding::IntegerExtremes) {
        // The all-ones top pattern is the positive infinity; a value
        // rounding onto it has left the encodable finite range.
        let (pos, _) = format.integer_extremes();
        if format.pack(false, biased as u128, mant) == pos {
            return overflow(format, negative);
        }
    }

    let flags = if inexact {
        ExceptionFlags::INEXACT
    } else {
        ExceptionFlags::empty()
    };
    (format.pack(negative, biased as u128, mant), flags)
}

fn encode_subnormal(
    format: &FloatFormat,
    value: &Real,
    negative: bool,
) -> (Bits, ExceptionFlags) {
    let mp = format.rounding_mantissa_bits();
    let scaled = scaled_magnitude(value, format.bias() - 1 + mp as i32);
    let (sig, inexact) = round_magnitude(&scaled, format.rounding, negative);

    if sig == 0u32 {
        let flags = ExceptionFlags::INEXACT | ExceptionFlags::UNDERFLOW;
        return (encode_zero(format, negative), flags);
    }
    if sig == (Integer::from(1) << mp) {
        // Rounded up to the smallest normal; tininess disappears after
        // rounding, so only inexactness remains.
        let mant = if format.encoding.explicit_bit {
            1u128 << mp
        } else {
            0
        };
        let flags = if inexact {
            ExceptionFlags::INEXACT
        } else {
            ExceptionFlags::empty()
        };
        return (format.pack(negative, 1, mant), flags);
    }
    if format.encoding.denormal.flushes_output() {
        let flags = ExceptionFlags::INEXACT | ExceptionFlags::UNDERFLOW;
        return (encode_zero(format, negative), flags);
    }

    let mant = sig.to_u128().expect("subnormal significand fits");
    let flags = if inexact {
        ExceptionFlags::INEXACT | ExceptionFlags::UNDERFLOW
    } else {
        ExceptionFlags::empty()
    };
    (format.pack(negative, 0, mant), flags)
}
