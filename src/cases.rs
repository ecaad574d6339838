//! Edge-case bit-pattern generation.
//!
//! Given a format, produce the fixed list of patterns most likely to
//! expose disagreement between implementations: specials, range extremes,
//! values around 1.0, and, for explicit-bit formats, every class of
//! non-canonical encoding. The list is deduplicated, deterministic, and
//! entirely derived from the format's policies; patterns a format cannot
//! express are omitted rather than approximated.

use crate::bits::Bits;
use crate::codec::{canonical_nan, encode_infinity, encode_zero, largest_finite};
use crate::format::FloatFormat;
use crate::policy::{InfEncoding, NanEncoding};

/// Accumulates unique patterns in insertion order.
struct PatternSet<'a> {
    format: &'a FloatFormat,
    out: Vec<Bits>,
}

impl<'a> PatternSet<'a> {
    fn new(format: &'a FloatFormat) -> Self {
        Self {
            format,
            out: Vec::new(),
        }
    }

    fn push(&mut self, bits: Bits) {
        let bits = self.format.mask_to_width(bits);
        if !self.out.contains(&bits) {
            self.out.push(bits);
        }
    }

    /// Packs fields and pushes, skipping biased exponents the format
    /// cannot hold.
    fn push_fields(&mut self, negative: bool, biased: i64, mant: u128) {
        if biased < 0 || biased as u128 > self.format.exp_all_ones() {
            return;
        }
        self.push(self.format.pack(negative, biased as u128, mant));
    }
}

/// The interesting patterns of a format.
pub fn interesting_patterns(format: &FloatFormat) -> Vec<Bits> {
    let mut set = PatternSet::new(format);
    let m = format.layout.mant_bits;
    let explicit = format.encoding.explicit_bit;
    let bias = format.bias() as i64;
    let signed = format.layout.sign_bits != 0;

    // The J bit contribution for canonical normal mantissas.
    let j = if explicit { 1u128 << (m - 1) } else { 0 };
    let frac_ones = if explicit {
        (1u128 << (m - 1)) - 1
    } else {
        (1u128 << m) - 1
    };

    // Zeros (−0 collapses to +0 where it does not exist).
    set.push(encode_zero(format, false));
    if signed {
        set.push(encode_zero(format, true));
    }

    // Canonical infinities.
    if !matches!(format.encoding.inf, InfEncoding::None) {
        set.push(encode_infinity(format, false));
        set.push(encode_infinity(format, true));
    }

    // NaNs: minimum and maximum quiet payload, plus a signaling pattern
    // for reserved-exponent formats; single patterns otherwise.
    match format.encoding.nan {
        NanEncoding::ReservedExponent => {
            let top = format.exp_all_ones() as i64;
            set.push(canonical_nan(format));
            set.push_fields(false, top, j | frac_ones);
            // Signaling: quiet bit clear, payload 1.
            set.push_fields(false, top, j | 1);
        }
        NanEncoding::TrapValue => set.push(format.trap_pattern()),
        NanEncoding::NegativeZero => set.push(format.pack(true, 0, 0)),
        NanEncoding::None => {}
    }

    // Subnormal extremes of each sign.
    let max_sub = frac_ones;
    for negative in [false, true] {
        if negative && !signed {
            continue;
        }
        set.push_fields(negative, 0, 1);
        set.push_fields(negative, 0, max_sub);
        // Minimum normal.
        set.push_fields(negative, 1, j);
        // Maximum finite.
        set.push(largest_finite(format, negative));
    }

    // Values around one: 1.0, −1.0, 2.0, 0.5, 1.0 ± 1 ulp.
    set.push_fields(false, bias, j);
    if signed {
        set.push_fields(true, bias, j);
    }
    set.push_fields(false, bias + 1, j);
    set.push_fields(false, bias - 1, j);
    set.push_fields(false, bias, j | 1);
    set.push_fields(false, bias - 1, j | frac_ones);

    // Minimum normal + 1 ulp, and machine epsilon 2^−M.
    set.push_fields(false, 1, j | 1);
    set.push_fields(false, bias - m as i64, j);

    if explicit {
        push_non_canonical(&mut set, format);
    }

    set.out
}

/// Every class of explicit-bit non-canonical encoding.
fn push_non_canonical(set: &mut PatternSet<'_>, format: &FloatFormat) {
    let m = format.layout.mant_bits;
    let bias = format.bias() as i64;
    let top = format.exp_all_ones() as i64;
    let max_finite = format.max_finite_biased_exp() as i64;
    let j = 1u128 << (m - 1);
    let frac_ones = j - 1;

    // Unnormal zeros (exp > 0, significand entirely zero).
    set.push_fields(false, 1, 0);
    set.push_fields(false, bias, 0);

    // Unnormals with J = 0 and an all-ones fraction at low, middle and
    // maximum finite exponents.
    set.push_fields(false, 1, frac_ones);
    set.push_fields(false, bias, frac_ones);
    set.push_fields(false, max_finite, frac_ones);

    // Pseudo-denormals: exp = 0 with the J bit set.
    set.push_fields(false, 0, j);
    set.push_fields(false, 0, j | 1);
    set.push_fields(false, 0, j | frac_ones);

    // Pseudo-infinities of both signs: exp = max, J = 0, fraction = 0.
    set.push_fields(false, top, 0);
    set.push_fields(true, top, 0);

    // Pseudo-NaNs at minimum and maximum fractions: exp = max, J = 0.
    set.push_fields(false, top, 1);
    set.push_fields(false, top, frac_ones);
}
