//! Format descriptions: bit geometry plus policy bundle.
//!
//! A [`FloatFormat`] is the currency token of the library: the codec, the
//! edge-case generator, the iteration strategies and every adapter consume
//! one. Formats are meant to be compile-time singletons (`const` items);
//! the policy invariants are checked inside `const fn` constructors, so an
//! illegal combination fails the build with a message naming the invariant.

use serde::Serialize;

use crate::bits::Bits;
use crate::error::{OpineError, Result};
use crate::policy::{
    Bias, DenormalMode, ExceptionPolicy, InfEncoding, NanEncoding, Rounding, SignEncoding,
    ZeroSign,
};

/// Field placement of a format inside its storage container.
///
/// Every storage integer is interpreted as unsigned with fields at explicit
/// offsets. Bits of the container above `total_bits` are padding: zero on
/// decode, emitted as zero on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BitLayout {
    /// Width of the sign field (0 for unsigned formats, else 1).
    pub sign_bits: u32,
    /// Offset of the sign field.
    pub sign_off: u32,
    /// Width of the exponent field.
    pub exp_bits: u32,
    /// Offset of the exponent field.
    pub exp_off: u32,
    /// Width of the mantissa field (including the J bit for explicit-bit
    /// formats).
    pub mant_bits: u32,
    /// Offset of the mantissa field.
    pub mant_off: u32,
    /// Declared width of the format.
    pub total_bits: u32,
    /// Width of the storage container (8, 16, 32, 64 or 128).
    pub storage_bits: u32,
}

impl BitLayout {
    /// Standard layout: mantissa at offset 0, exponent above it, sign at
    /// the MSB. Storage is the smallest machine width holding the total.
    pub const fn standard(sign_bits: u32, exp_bits: u32, mant_bits: u32) -> Self {
        let total = sign_bits + exp_bits + mant_bits;
        Self {
            sign_bits,
            sign_off: exp_bits + mant_bits,
            exp_bits,
            exp_off: mant_bits,
            mant_bits,
            mant_off: 0,
            total_bits: total,
            storage_bits: storage_for(total),
        }
    }

    /// Same as [`standard`](Self::standard) with an explicit storage width,
    /// for formats such as extFloat80 that live in a wider container.
    pub const fn standard_in(sign_bits: u32, exp_bits: u32, mant_bits: u32, storage: u32) -> Self {
        let mut layout = Self::standard(sign_bits, exp_bits, mant_bits);
        layout.storage_bits = storage;
        layout
    }
}

/// Smallest power-of-two machine width that holds `total` bits.
const fn storage_for(total: u32) -> u32 {
    let mut width = 8;
    while width < total {
        width *= 2;
    }
    width
}

/// The encoding record: the five policy axes plus implicit bit and bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Encoding {
    /// Sign encoding axis.
    pub sign: SignEncoding,
    /// NaN encoding axis.
    pub nan: NanEncoding,
    /// Infinity encoding axis.
    pub inf: InfEncoding,
    /// Denormal handling axis.
    pub denormal: DenormalMode,
    /// Whether a negative-zero pattern exists.
    pub zero_sign: ZeroSign,
    /// True when the stored mantissa carries the leading significand bit
    /// (the J bit) explicitly; false for IEEE-style implicit-bit formats.
    pub explicit_bit: bool,
    /// Exponent bias selection.
    pub bias: Bias,
}

/// A complete floating-point format: geometry, encoding and policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FloatFormat {
    /// Human-readable name used in reports.
    pub name: &'static str,
    /// Field geometry.
    pub layout: BitLayout,
    /// Policy-axis values.
    pub encoding: Encoding,
    /// Rounding policy, resolved at instantiation time.
    pub rounding: Rounding,
    /// Whether adapters for this format are expected to report flags.
    pub exceptions: ExceptionPolicy,
}

impl FloatFormat {
    /// Builds and validates a format. Illegal policy combinations and
    /// out-of-range widths panic; in const contexts that is a build error
    /// whose message names the violated invariant.
    pub const fn new(
        name: &'static str,
        layout: BitLayout,
        encoding: Encoding,
        rounding: Rounding,
        exceptions: ExceptionPolicy,
    ) -> Self {
        let format = Self {
            name,
            layout,
            encoding,
            rounding,
            exceptions,
        };
        format.assert_valid();
        format
    }

    const fn assert_valid(&self) {
        let l = &self.layout;
        assert!(
            l.storage_bits == 8
                || l.storage_bits == 16
                || l.storage_bits == 32
                || l.storage_bits == 64
                || l.storage_bits == 128,
            "storage width must be one of 8, 16, 32, 64, 128"
        );
        assert!(
            l.total_bits >= 8 && l.total_bits <= 128,
            "total width must lie in 8..=128"
        );
        assert!(
            l.total_bits <= l.storage_bits,
            "total width must fit the storage container"
        );
        assert!(l.sign_bits <= 1, "sign field is at most one bit");
        assert!(l.exp_bits >= 1, "exponent field cannot be empty");
        assert!(l.mant_bits >= 1, "mantissa field cannot be empty");
        assert!(
            l.sign_off + l.sign_bits <= l.total_bits
                && l.exp_off + l.exp_bits <= l.total_bits
                && l.mant_off + l.mant_bits <= l.total_bits,
            "a field extends past the declared total width"
        );
        assert!(
            l.sign_bits + l.exp_bits + l.mant_bits <= l.total_bits,
            "field widths exceed the declared total width"
        );

        let e = &self.encoding;
        if matches!(e.sign, SignEncoding::TwosComplement) {
            assert!(
                matches!(e.zero_sign, ZeroSign::DoesNotExist),
                "invalid policy combination: two's-complement formats cannot encode a negative zero"
            );
            assert!(
                matches!(e.nan, NanEncoding::TrapValue | NanEncoding::None),
                "invalid policy combination: two's-complement NaN must be trap-value or none"
            );
            assert!(
                matches!(e.inf, InfEncoding::IntegerExtremes | InfEncoding::None),
                "invalid policy combination: two's-complement infinity must be integer-extremes or none"
            );
        }
        if matches!(e.sign, SignEncoding::OnesComplement) {
            assert!(
                matches!(e.zero_sign, ZeroSign::Exists),
                "invalid policy combination: one's-complement formats must keep a negative zero"
            );
        }
        if matches!(e.nan, NanEncoding::NegativeZero) {
            assert!(
                matches!(e.zero_sign, ZeroSign::DoesNotExist),
                "invalid policy combination: a negative-zero NaN pattern excludes a negative zero value"
            );
        }
        if matches!(e.inf, InfEncoding::ReservedExponent) {
            assert!(
                matches!(e.nan, NanEncoding::ReservedExponent),
                "invalid policy combination: reserved-exponent infinity requires reserved-exponent NaN"
            );
        }
        if matches!(e.nan, NanEncoding::TrapValue | NanEncoding::NegativeZero)
            || matches!(e.inf, InfEncoding::IntegerExtremes)
        {
            assert!(
                l.sign_bits == 1,
                "whole-pattern special values need a sign bit"
            );
        }
    }

    /// Runtime validation, reporting the violated invariant as an error
    /// instead of panicking. Mirrors the `const` checks.
    pub fn validate(&self) -> Result<()> {
        let l = &self.layout;
        if !matches!(l.storage_bits, 8 | 16 | 32 | 64 | 128) {
            return Err(OpineError::BadStorageWidth {
                width: l.storage_bits,
            });
        }
        if !(8..=128).contains(&l.total_bits) || l.total_bits > l.storage_bits {
            return Err(OpineError::WidthOutOfRange {
                width: l.total_bits,
                min: 8,
                max: l.storage_bits.min(128),
            });
        }
        let needed = (l.sign_off + l.sign_bits)
            .max(l.exp_off + l.exp_bits)
            .max(l.mant_off + l.mant_bits);
        if needed > l.total_bits {
            return Err(OpineError::LayoutOverflow {
                needed,
                total: l.total_bits,
            });
        }

        let e = &self.encoding;
        let violated = if matches!(e.sign, SignEncoding::TwosComplement)
            && matches!(e.zero_sign, ZeroSign::Exists)
        {
            Some("two's-complement formats cannot encode a negative zero")
        } else if matches!(e.sign, SignEncoding::TwosComplement)
            && !matches!(e.nan, NanEncoding::TrapValue | NanEncoding::None)
        {
            Some("two's-complement NaN must be trap-value or none")
        } else if matches!(e.sign, SignEncoding::TwosComplement)
            && !matches!(e.inf, InfEncoding::IntegerExtremes | InfEncoding::None)
        {
            Some("two's-complement infinity must be integer-extremes or none")
        } else if matches!(e.sign, SignEncoding::OnesComplement)
            && !matches!(e.zero_sign, ZeroSign::Exists)
        {
            Some("one's-complement formats must keep a negative zero")
        } else if matches!(e.nan, NanEncoding::NegativeZero)
            && !matches!(e.zero_sign, ZeroSign::DoesNotExist)
        {
            Some("a negative-zero NaN pattern excludes a negative zero value")
        } else if matches!(e.inf, InfEncoding::ReservedExponent)
            && !matches!(e.nan, NanEncoding::ReservedExponent)
        {
            Some("reserved-exponent infinity requires reserved-exponent NaN")
        } else {
            None
        };
        match violated {
            Some(invariant) => Err(OpineError::InvalidPolicy { invariant }),
            None => Ok(()),
        }
    }

    /// The resolved exponent bias.
    pub const fn bias(&self) -> i32 {
        match self.encoding.bias {
            Bias::Explicit(b) => b,
            Bias::Auto => {
                let half = 1i32 << (self.layout.exp_bits - 1);
                match self.encoding.sign {
                    SignEncoding::TwosComplement => half,
                    _ => half - 1,
                }
            }
        }
    }

    /// SWAR lane count: how many values the storage container holds.
    pub const fn lanes(&self) -> u32 {
        self.layout.storage_bits / self.layout.total_bits
    }

    /// All-ones exponent field value.
    pub const fn exp_all_ones(&self) -> u128 {
        (1u128 << self.layout.exp_bits) - 1
    }

    /// Largest biased exponent that still encodes a finite value:
    /// `2^E − 2` when the top exponent is reserved for NaN/infinity,
    /// `2^E − 1` otherwise.
    pub const fn max_finite_biased_exp(&self) -> u128 {
        let top = self.exp_all_ones();
        if matches!(self.encoding.nan, NanEncoding::ReservedExponent)
            || matches!(self.encoding.inf, InfEncoding::ReservedExponent)
        {
            top - 1
        } else {
            top
        }
    }

    /// Smallest biased-1 unbiased exponent, `1 − bias`.
    pub const fn min_exponent(&self) -> i32 {
        1 - self.bias()
    }

    /// Width the rounding step aims at: M for implicit-bit formats,
    /// M − 1 for explicit-bit formats (the J bit is part of the stored
    /// mantissa there).
    pub const fn rounding_mantissa_bits(&self) -> u32 {
        if self.encoding.explicit_bit {
            self.layout.mant_bits - 1
        } else {
            self.layout.mant_bits
        }
    }

    /// Mask covering the declared (total) width inside the container.
    pub const fn total_mask(&self) -> u128 {
        u128::MAX >> (128 - self.layout.total_bits)
    }

    /// An all-zero pattern at the storage width.
    pub const fn zero_bits(&self) -> Bits {
        Bits::zero(self.layout.storage_bits)
    }

    /// Masks a raw pattern down to the declared width (clears padding).
    pub fn mask_to_width(&self, bits: Bits) -> Bits {
        Bits::new(self.layout.storage_bits, bits.raw() & self.total_mask())
    }

    /// Reads the stored sign bit. False for unsigned formats.
    pub fn raw_sign(&self, bits: &Bits) -> bool {
        self.layout.sign_bits != 0 && bits.bit(self.layout.sign_off)
    }

    /// Reads the stored exponent field without any sign transformation.
    pub fn raw_exp(&self, bits: &Bits) -> u128 {
        bits.field(self.layout.exp_off, self.layout.exp_bits)
    }

    /// Reads the stored mantissa field without any sign transformation.
    pub fn raw_mant(&self, bits: &Bits) -> u128 {
        bits.field(self.layout.mant_off, self.layout.mant_bits)
    }

    /// Assembles a bit pattern from logical fields, applying the sign
    /// encoding. This is the inverse of the decode pipeline's sign
    /// recovery: sign-magnitude sets the sign bit, two's-complement
    /// negates the whole word, one's-complement inverts the exponent and
    /// mantissa fields under the sign bit.
    pub fn pack(&self, negative: bool, exp: u128, mant: u128) -> Bits {
        let positive = self
            .zero_bits()
            .with_field(self.layout.mant_off, self.layout.mant_bits, mant)
            .with_field(self.layout.exp_off, self.layout.exp_bits, exp);
        if !negative || self.layout.sign_bits == 0 {
            return positive;
        }
        match self.encoding.sign {
            SignEncoding::Magnitude => positive.with_field(self.layout.sign_off, 1, 1),
            SignEncoding::TwosComplement => {
                let negated = positive.raw().wrapping_neg() & self.total_mask();
                Bits::new(self.layout.storage_bits, negated)
            }
            SignEncoding::OnesComplement => {
                let exp_mask = (1u128 << self.layout.exp_bits) - 1;
                let mant_mask = (1u128 << self.layout.mant_bits) - 1;
                self.zero_bits()
                    .with_field(self.layout.mant_off, self.layout.mant_bits, !mant & mant_mask)
                    .with_field(self.layout.exp_off, self.layout.exp_bits, !exp & exp_mask)
                    .with_field(self.layout.sign_off, 1, 1)
            }
        }
    }

    /// The single trap-value NaN pattern: only the MSB of the declared
    /// width set.
    pub fn trap_pattern(&self) -> Bits {
        Bits::zero(self.layout.storage_bits).with_bit(self.layout.total_bits - 1, true)
    }

    /// The two integer-extreme infinity patterns `(+∞, −∞)`: the maximum
    /// positive signed integer and its two's-complement negation.
    pub fn integer_extremes(&self) -> (Bits, Bits) {
        let pos = Bits::new(
            self.layout.storage_bits,
            self.total_mask() >> 1,
        );
        let neg = Bits::new(
            self.layout.storage_bits,
            pos.raw().wrapping_neg() & self.total_mask(),
        );
        (pos, neg)
    }
}

/// Preset formats. Each is a compile-time singleton; the policy invariants
/// hold by construction.
pub mod formats {
    use super::*;

    const IEEE: Encoding = Encoding {
        sign: SignEncoding::Magnitude,
        nan: NanEncoding::ReservedExponent,
        inf: InfEncoding::ReservedExponent,
        denormal: DenormalMode::Full,
        zero_sign: ZeroSign::Exists,
        explicit_bit: false,
        bias: Bias::Auto,
    };

    /// IEEE 754 binary16.
    pub const BINARY16: FloatFormat = FloatFormat::new(
        "binary16",
        BitLayout::standard(1, 5, 10),
        IEEE,
        Rounding::TiesToEven,
        ExceptionPolicy::Record,
    );

    /// IEEE 754 binary32.
    pub const BINARY32: FloatFormat = FloatFormat::new(
        "binary32",
        BitLayout::standard(1, 8, 23),
        IEEE,
        Rounding::TiesToEven,
        ExceptionPolicy::Record,
    );

    /// IEEE 754 binary64.
    pub const BINARY64: FloatFormat = FloatFormat::new(
        "binary64",
        BitLayout::standard(1, 11, 52),
        IEEE,
        Rounding::TiesToEven,
        ExceptionPolicy::Record,
    );

    /// IEEE 754 binary128.
    pub const BINARY128: FloatFormat = FloatFormat::new(
        "binary128",
        BitLayout::standard(1, 15, 112),
        IEEE,
        Rounding::TiesToEven,
        ExceptionPolicy::Record,
    );

    /// x87 80-bit extended precision: explicit J bit, 64-bit significand,
    /// 128-bit storage container. The explicit bit admits the whole
    /// non-canonical taxonomy (unnormals, pseudo-denormals,
    /// pseudo-infinities, pseudo-NaNs).
    pub const EXT_FLOAT80: FloatFormat = FloatFormat::new(
        "extFloat80",
        BitLayout::standard_in(1, 15, 64, 128),
        Encoding {
            sign: SignEncoding::Magnitude,
            nan: NanEncoding::ReservedExponent,
            inf: InfEncoding::ReservedExponent,
            denormal: DenormalMode::Full,
            zero_sign: ZeroSign::Exists,
            explicit_bit: true,
            bias: Bias::Auto,
        },
        Rounding::TiesToEven,
        ExceptionPolicy::Record,
    );

    /// bfloat16: binary32's exponent range at 8 bits of mantissa.
    pub const BFLOAT16: FloatFormat = FloatFormat::new(
        "bfloat16",
        BitLayout::standard(1, 8, 7),
        IEEE,
        Rounding::TiesToEven,
        ExceptionPolicy::Record,
    );

    /// OCP 8-bit E5M2 (IEEE-style specials).
    pub const E5M2: FloatFormat = FloatFormat::new(
        "e5m2",
        BitLayout::standard(1, 5, 2),
        IEEE,
        Rounding::TiesToEven,
        ExceptionPolicy::Record,
    );

    /// 8-bit E4M3 with a reserved top exponent and no infinities;
    /// overflow saturates to the largest finite value.
    pub const E4M3: FloatFormat = FloatFormat::new(
        "e4m3",
        BitLayout::standard(1, 4, 3),
        Encoding {
            sign: SignEncoding::Magnitude,
            nan: NanEncoding::ReservedExponent,
            inf: InfEncoding::None,
            denormal: DenormalMode::Full,
            zero_sign: ZeroSign::Exists,
            explicit_bit: false,
            bias: Bias::Auto,
        },
        Rounding::TiesToEven,
        ExceptionPolicy::Record,
    );

    /// OCP 8-bit E4M3FNUZ: NaN is the negative-zero pattern, no negative
    /// zero value, no infinities, bias 8.
    pub const E4M3FNUZ: FloatFormat = FloatFormat::new(
        "e4m3fnuz",
        BitLayout::standard(1, 4, 3),
        Encoding {
            sign: SignEncoding::Magnitude,
            nan: NanEncoding::NegativeZero,
            inf: InfEncoding::None,
            denormal: DenormalMode::Full,
            zero_sign: ZeroSign::DoesNotExist,
            explicit_bit: false,
            bias: Bias::Explicit(8),
        },
        Rounding::TiesToEven,
        ExceptionPolicy::Record,
    );

    /// 8-bit two's-complement teaching format: 3-bit exponent, 4-bit
    /// mantissa, trap-value NaN, integer-extreme infinities. Bit patterns
    /// order exactly like signed bytes.
    pub const TC_E3M4: FloatFormat = FloatFormat::new(
        "tc-e3m4",
        BitLayout::standard(1, 3, 4),
        Encoding {
            sign: SignEncoding::TwosComplement,
            nan: NanEncoding::TrapValue,
            inf: InfEncoding::IntegerExtremes,
            denormal: DenormalMode::Full,
            zero_sign: ZeroSign::DoesNotExist,
            explicit_bit: false,
            bias: Bias::Auto,
        },
        Rounding::TiesToEven,
        ExceptionPolicy::Record,
    );

    /// 8-bit one's-complement teaching format: negative values store
    /// inverted exponent and mantissa fields, and a negative zero exists.
    pub const OC_E3M4: FloatFormat = FloatFormat::new(
        "oc-e3m4",
        BitLayout::standard(1, 3, 4),
        Encoding {
            sign: SignEncoding::OnesComplement,
            nan: NanEncoding::ReservedExponent,
            inf: InfEncoding::ReservedExponent,
            denormal: DenormalMode::Full,
            zero_sign: ZeroSign::Exists,
            explicit_bit: false,
            bias: Bias::Auto,
        },
        Rounding::TiesToEven,
        ExceptionPolicy::Record,
    );

    /// Every preset, for suite iteration.
    pub const ALL: [&FloatFormat; 11] = [
        &BINARY16, &BINARY32, &BINARY64, &BINARY128, &EXT_FLOAT80, &BFLOAT16, &E5M2, &E4M3,
        &E4M3FNUZ, &TC_E3M4, &OC_E3M4,
    ];

    /// Looks a preset up by its report name.
    pub fn by_name(name: &str) -> Option<&'static FloatFormat> {
        ALL.iter().copied().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::formats::*;
    use super::*;

    #[test]
    fn test_standard_layout_geometry() {
        let l = BitLayout::standard(1, 5, 10);
        assert_eq!(l.total_bits, 16);
        assert_eq!(l.storage_bits, 16);
        assert_eq!(l.mant_off, 0);
        assert_eq!(l.exp_off, 10);
        assert_eq!(l.sign_off, 15);

        // 80-bit total lives in a 128-bit container.
        assert_eq!(EXT_FLOAT80.layout.storage_bits, 128);
        assert_eq!(EXT_FLOAT80.layout.total_bits, 80);
        assert_eq!(EXT_FLOAT80.lanes(), 1);
    }

    #[test]
    fn test_resolved_bias() {
        assert_eq!(BINARY16.bias(), 15);
        assert_eq!(BINARY32.bias(), 127);
        assert_eq!(BINARY64.bias(), 1023);
        assert_eq!(EXT_FLOAT80.bias(), 16383);
        // Two's-complement auto bias is 2^(E−1), not 2^(E−1)−1.
        assert_eq!(TC_E3M4.bias(), 4);
        assert_eq!(OC_E3M4.bias(), 3);
        // Explicit bias wins over auto.
        assert_eq!(E4M3FNUZ.bias(), 8);
    }

    #[test]
    fn test_max_finite_biased_exponent() {
        // Reserved top exponent: 2^E − 2.
        assert_eq!(BINARY16.max_finite_biased_exp(), 30);
        assert_eq!(E4M3.max_finite_biased_exp(), 14);
        // Nothing reserved: 2^E − 1.
        assert_eq!(E4M3FNUZ.max_finite_biased_exp(), 15);
        assert_eq!(TC_E3M4.max_finite_biased_exp(), 7);
    }

    #[test]
    fn test_pack_sign_magnitude() {
        // 1.0 in binary16.
        let one = BINARY16.pack(false, 15, 0);
        assert_eq!(one.raw(), 0x3C00);
        let neg_one = BINARY16.pack(true, 15, 0);
        assert_eq!(neg_one.raw(), 0xBC00);
    }

    #[test]
    fn test_pack_twos_complement_negates_whole_word() {
        // +1.0 in tc-e3m4: exp = bias = 4, mantissa 0 → 0x40.
        let one = TC_E3M4.pack(false, 4, 0);
        assert_eq!(one.raw(), 0x40);
        let neg_one = TC_E3M4.pack(true, 4, 0);
        assert_eq!(neg_one.raw(), 0xC0);
        // Negative zero collapses to zero.
        assert_eq!(TC_E3M4.pack(true, 0, 0).raw(), 0x00);
    }

    #[test]
    fn test_pack_ones_complement_inverts_fields() {
        let zero = OC_E3M4.pack(false, 0, 0);
        assert_eq!(zero.raw(), 0x00);
        // −0 inverts both fields under the sign bit: all ones.
        let neg_zero = OC_E3M4.pack(true, 0, 0);
        assert_eq!(neg_zero.raw(), 0xFF);
    }

    #[test]
    fn test_whole_pattern_specials() {
        assert_eq!(TC_E3M4.trap_pattern().raw(), 0x80);
        let (pos, neg) = TC_E3M4.integer_extremes();
        assert_eq!(pos.raw(), 0x7F);
        assert_eq!(neg.raw(), 0x81);
    }

    #[test]
    fn test_runtime_validation_reports_invariants() {
        let mut bad = TC_E3M4;
        bad.encoding.zero_sign = ZeroSign::Exists;
        let err = bad.validate().unwrap_err();
        assert!(err.to_string().contains("negative zero"));

        let mut bad = BINARY16;
        bad.encoding.nan = NanEncoding::None;
        // Reserved-exponent infinity without reserved-exponent NaN.
        let err = bad.validate().unwrap_err();
        assert!(err.to_string().contains("reserved-exponent"));
    }

    #[test]
    fn test_all_presets_pass_runtime_validation() {
        for format in ALL {
            format.validate().unwrap_or_else(|e| {
                panic!("preset {} failed validation: {e}", format.name);
            });
        }
    }

    #[test]
    fn test_preset_lookup_by_name() {
        assert_eq!(by_name("binary32"), Some(&BINARY32));
        assert!(by_name("binary touch").is_none());
    }
}
