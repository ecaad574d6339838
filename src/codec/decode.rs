//! Decoding: bit pattern → exact real value.
//!
//! Decoding runs in five phases, each conditional on policy values:
//! width masking, whole-pattern special checks, sign recovery with field
//! extraction, field-based special checks, and finally the finite-value
//! formula. Non-canonical explicit-bit encodings (unnormals,
//! pseudo-denormals, pseudo-infinities, pseudo-NaNs) decode at their
//! mathematical value instead of being rejected; that is what lets the
//! harness expose implementations that silently normalize them.

use rug::Integer;

use crate::bits::Bits;
use crate::format::FloatFormat;
use crate::policy::{InfEncoding, NanEncoding, SignEncoding, ZeroSign};
use crate::real::Real;

/// Recovers the logical `(negative, exponent, mantissa)` fields from a raw
/// pattern, undoing the sign encoding.
///
/// For two's-complement the whole word is negated modulo the declared
/// width before field extraction; for one's-complement the exponent and
/// mantissa fields are each bitwise inverted. The pattern is masked to the
/// declared width first.
pub fn recover_fields(format: &FloatFormat, bits: Bits) -> (bool, u128, u128) {
    let bits = format.mask_to_width(bits);
    let negative = format.raw_sign(&bits);
    if !negative {
        return (false, format.raw_exp(&bits), format.raw_mant(&bits));
    }
    match format.encoding.sign {
        SignEncoding::Magnitude => (true, format.raw_exp(&bits), format.raw_mant(&bits)),
        SignEncoding::TwosComplement => {
            let negated = Bits::new(
                format.layout.storage_bits,
                bits.raw().wrapping_neg() & format.total_mask(),
            );
            (true, format.raw_exp(&negated), format.raw_mant(&negated))
        }
        SignEncoding::OnesComplement => {
            let exp_mask = (1u128 << format.layout.exp_bits) - 1;
            let mant_mask = (1u128 << format.layout.mant_bits) - 1;
            (
                true,
                !format.raw_exp(&bits) & exp_mask,
                !format.raw_mant(&bits) & mant_mask,
            )
        }
    }
}

/// Whether a pattern encodes NaN under the format's NaN encoding.
///
/// Used by the NaN-aware comparator, which must match any two NaN results
/// regardless of payload.
pub fn is_nan_pattern(format: &FloatFormat, bits: Bits) -> bool {
    let bits = format.mask_to_width(bits);
    match format.encoding.nan {
        NanEncoding::None => false,
        NanEncoding::TrapValue => bits == format.trap_pattern(),
        NanEncoding::NegativeZero => {
            format.raw_sign(&bits) && format.raw_exp(&bits) == 0 && format.raw_mant(&bits) == 0
        }
        NanEncoding::ReservedExponent => {
            let (_, exp, mant) = recover_fields(format, bits);
            if exp != format.exp_all_ones() {
                return false;
            }
            let fraction = if format.encoding.explicit_bit {
                mant & ((1u128 << (format.layout.mant_bits - 1)) - 1)
            } else {
                mant
            };
            // A zero fraction at the top exponent is infinity when the
            // format has one (canonical or pseudo); NaN otherwise.
            fraction != 0 || !matches!(format.encoding.inf, InfEncoding::ReservedExponent)
        }
    }
}

/// Decodes a bit pattern to its exact real value.
pub fn decode(format: &FloatFormat, bits: Bits) -> Real {
    // Phase 1: everything below reasons over the declared width only.
    let bits = format.mask_to_width(bits);

    // Phase 2: whole-pattern special values.
    if matches!(format.encoding.nan, NanEncoding::TrapValue) && bits == format.trap_pattern() {
        return Real::nan();
    }
    if matches!(format.encoding.inf, InfEncoding::IntegerExtremes) {
        let (pos, neg) = format.integer_extremes();
        if bits == pos {
            return Real::infinity(false);
        }
        if bits == neg {
            return Real::infinity(true);
        }
    }
    if matches!(format.encoding.nan, NanEncoding::NegativeZero)
        && format.raw_sign(&bits)
        && format.raw_exp(&bits) == 0
        && format.raw_mant(&bits) == 0
    {
        return Real::nan();
    }

    // Phase 3: sign recovery and field extraction.
    let (negative, exp, mant) = recover_fields(format, bits);

    // Phase 4: field-based special values. Reserved-exponent infinity
    // shares the top exponent with NaN; for explicit-bit formats the
    // infinity test must run first because a canonical infinity carries a
    // non-zero mantissa field (J = 1).
    if matches!(format.encoding.nan, NanEncoding::ReservedExponent)
        && exp == format.exp_all_ones()
    {
        let fraction = if format.encoding.explicit_bit {
            mant & ((1u128 << (format.layout.mant_bits - 1)) - 1)
        } else {
            mant
        };
        if fraction == 0 && matches!(format.encoding.inf, InfEncoding::ReservedExponent) {
            // Canonical infinity (J = 1) and pseudo-infinity (J = 0)
            // decode to the same value.
            return Real::infinity(negative);
        }
        return Real::nan();
    }

    // Phase 5: finite values.
    decode_finite(format, negative, exp, mant)
}

fn decode_finite(format: &FloatFormat, negative: bool, exp: u128, mant: u128) -> Real {
    let keep_sign = negative && matches!(format.encoding.zero_sign, ZeroSign::Exists);

    if exp == 0 && mant == 0 {
        return Real::zero(keep_sign);
    }
    // Flush-input collapses subnormal operands. A pseudo-denormal
    // (exp = 0 with the J bit set) is value-equal to a normal and stays.
    let subnormal = exp == 0
        && (!format.encoding.explicit_bit
            || mant >> (format.layout.mant_bits - 1) == 0);
    if subnormal && format.encoding.denormal.flushes_input() {
        return Real::zero(keep_sign);
    }

    let m = format.layout.mant_bits as i32;
    let bias = format.bias();
    let (significand, unbiased) = if format.encoding.explicit_bit {
        // The stored mantissa already carries the J bit; unnormals
        // (exp > 0, J = 0) and pseudo-denormals (exp = 0, J = 1) fall out
        // of the same formula at their mathematical value.
        let exponent = if exp > 0 { exp as i32 } else { 1 };
        (mant, exponent - bias - (m - 1))
    } else if exp > 0 {
        ((1u128 << m) | mant, exp as i32 - bias - m)
    } else {
        (mant, 1 - bias - m)
    };

    Real::from_int_scale(Integer::from(significand), unbiased, negative)
}
