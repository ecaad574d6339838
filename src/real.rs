//! Arbitrary-precision real values at 256-bit working precision.
//!
//! [`Real`] is an owned handle to an MPFR value ([`rug::Float`]) with the
//! precision pinned to [`PRECISION`]. 256 bits is unconditionally lossless
//! for add/sub/mul of any binary128 operand pair and correctly rounded at
//! the same precision for div, sqrt and remainder, which is exactly the
//! intermediate the round-to-format step expects. The buffer is uniquely
//! owned; `Real` is deliberately not `Clone`, so sharing is impossible and
//! every value dies at the end of the dispatch that created it.
//!
//! Arithmetic on special values follows IEEE semantics throughout: NaN
//! propagates, 0/0 and ∞−∞ produce NaN, finite/0 produces a signed
//! infinity, and signed zero survives where the standard says it must.

use rug::float::Special;
use rug::ops::CompleteRound;
use rug::{Float, Integer};
use std::cmp::Ordering;
use std::fmt;

/// Working precision of every [`Real`], in bits.
pub const PRECISION: u32 = 256;

/// An owned 256-bit real value.
pub struct Real(Float);

impl Real {
    /// The canonical quiet NaN.
    pub fn nan() -> Self {
        Self(Float::with_val(PRECISION, Special::Nan))
    }

    /// A signed infinity.
    pub fn infinity(negative: bool) -> Self {
        let special = if negative {
            Special::NegInfinity
        } else {
            Special::Infinity
        };
        Self(Float::with_val(PRECISION, special))
    }

    /// A signed zero. The sign bit survives arithmetic per IEEE rules.
    pub fn zero(negative: bool) -> Self {
        let special = if negative { Special::NegZero } else { Special::Zero };
        Self(Float::with_val(PRECISION, special))
    }

    /// Exact construction of `mantissa × 2^exponent`.
    ///
    /// Exact because every significand the codec produces fits in far fewer
    /// than 256 bits; the shift only adjusts the exponent.
    pub fn from_int_scale(mantissa: Integer, exponent: i32, negative: bool) -> Self {
        debug_assert!(mantissa.significant_bits() <= PRECISION);
        let mut f = Float::with_val(PRECISION, &mantissa);
        f <<= exponent;
        if negative {
            f = -f;
        }
        Self(f)
    }

    /// Wraps an already-computed 256-bit float.
    pub(crate) fn from_float(f: Float) -> Self {
        debug_assert_eq!(f.prec(), PRECISION);
        Self(f)
    }

    /// Borrows the underlying float for the codec's re-encoding step.
    pub(crate) fn as_float(&self) -> &Float {
        &self.0
    }

    /// Sum, rounded to nearest at 256 bits.
    pub fn add(&self, rhs: &Real) -> Real {
        Self((&self.0 + &rhs.0).complete(PRECISION))
    }

    /// Difference, rounded to nearest at 256 bits.
    pub fn sub(&self, rhs: &Real) -> Real {
        Self((&self.0 - &rhs.0).complete(PRECISION))
    }

    /// Product, rounded to nearest at 256 bits.
    pub fn mul(&self, rhs: &Real) -> Real {
        Self((&self.0 * &rhs.0).complete(PRECISION))
    }

    /// Quotient, correctly rounded to nearest at 256 bits.
    pub fn div(&self, rhs: &Real) -> Real {
        Self((&self.0 / &rhs.0).complete(PRECISION))
    }

    /// IEEE remainder: `self − n·rhs` with `n` the nearest integer quotient.
    pub fn ieee_rem(&self, rhs: &Real) -> Real {
        Self(self.0.remainder_ref(&rhs.0).complete(PRECISION))
    }

    /// Fused multiply-add with a single rounding at 256 bits.
    pub fn fma(&self, mul: &Real, add: &Real) -> Real {
        Self(self.0.mul_add_ref(&mul.0, &add.0).complete(PRECISION))
    }

    /// Square root, correctly rounded to nearest at 256 bits.
    ///
    /// `sqrt(−0)` is −0 and the square root of any other negative value is
    /// NaN, both per IEEE.
    pub fn sqrt(&self) -> Real {
        Self(self.0.sqrt_ref().complete(PRECISION))
    }

    /// Exact negation (flips the sign of zeros and NaN alike).
    pub fn neg(&self) -> Real {
        Self((-&self.0).complete(PRECISION))
    }

    /// Exact absolute value.
    pub fn abs(&self) -> Real {
        Self(self.0.abs_ref().complete(PRECISION))
    }

    /// Whether the value is NaN.
    pub fn is_nan(&self) -> bool {
        self.0.is_nan()
    }

    /// Whether the value is ±∞.
    pub fn is_infinite(&self) -> bool {
        self.0.is_infinite()
    }

    /// Whether the value is ±0.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whether the value is neither NaN nor infinite.
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Numeric sign: −1, 0 or +1. NaN and both zeros report 0.
    pub fn sign(&self) -> i32 {
        match self.0.cmp0() {
            Some(Ordering::Less) => -1,
            Some(Ordering::Greater) => 1,
            _ => 0,
        }
    }

    /// The sign *bit*, distinct from [`sign`](Self::sign): true for −0.
    pub fn is_sign_negative(&self) -> bool {
        self.0.is_sign_negative()
    }

    /// Mathematical binary exponent `e` with `|value| ∈ [2^e, 2^(e+1))`.
    ///
    /// `None` for zero, NaN and infinities.
    pub fn binary_exponent(&self) -> Option<i32> {
        if !self.is_finite() || self.is_zero() {
            return None;
        }
        // MPFR exponents place the significand in [0.5, 1).
        self.0.get_exp().map(|e| e - 1)
    }

    /// Decomposes a finite value into `(integer, exponent)` with
    /// `value = integer × 2^exponent`. `None` for NaN and infinities.
    pub fn to_int_scale(&self) -> Option<(Integer, i32)> {
        self.0.to_integer_exp()
    }

    /// Value-level comparison; `None` when either side is NaN.
    pub fn partial_cmp(&self, rhs: &Real) -> Option<Ordering> {
        self.0.partial_cmp(&rhs.0)
    }

    /// Value-level equality (so +0 == −0, and NaN ≠ NaN).
    pub fn value_eq(&self, rhs: &Real) -> bool {
        self.partial_cmp(rhs) == Some(Ordering::Equal)
    }
}

impl fmt::Debug for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Real({})", self.0)
    }
}

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Real {
        Real::from_int_scale(Integer::from(v.unsigned_abs()), 0, v < 0)
    }

    #[test]
    fn test_special_constructors() {
        assert!(Real::nan().is_nan());
        assert!(Real::infinity(false).is_infinite());
        assert_eq!(Real::infinity(true).sign(), -1);
        assert!(Real::zero(false).is_zero());
        assert!(Real::zero(true).is_zero());
    }

    #[test]
    fn test_sign_bit_vs_sign_for_zero() {
        let nz = Real::zero(true);
        assert_eq!(nz.sign(), 0);
        assert!(nz.is_sign_negative());
        let pz = Real::zero(false);
        assert_eq!(pz.sign(), 0);
        assert!(!pz.is_sign_negative());
    }

    #[test]
    fn test_ieee_specials_propagate() {
        let zero = Real::zero(false);
        assert!(zero.div(&zero).is_nan());
        assert!(int(1).div(&zero).is_infinite());
        assert_eq!(int(-1).div(&zero).sign(), -1);

        let inf = Real::infinity(false);
        assert!(inf.sub(&inf).is_nan());
        assert!(inf.mul(&zero).is_nan());
        assert!(Real::nan().add(&int(1)).is_nan());
    }

    #[test]
    fn test_sqrt_negative_and_negative_zero() {
        assert!(int(-4).sqrt().is_nan());
        let r = Real::zero(true).sqrt();
        assert!(r.is_zero());
        assert!(r.is_sign_negative());
        assert!(int(9).sqrt().value_eq(&int(3)));
    }

    #[test]
    fn test_signed_zero_arithmetic() {
        // (−0) + (−0) keeps the sign; (+0) + (−0) is +0 under round-to-nearest.
        let nz = Real::zero(true);
        let pz = Real::zero(false);
        assert!(nz.add(&nz).is_sign_negative());
        assert!(!pz.add(&nz).is_sign_negative());
    }

    #[test]
    fn test_exact_scale_construction() {
        // 3 × 2^−2 = 0.75
        let r = Real::from_int_scale(Integer::from(3), -2, false);
        let (i, e) = r.to_int_scale().unwrap();
        // Normalization may shift the pair, but the value must agree.
        let back = Real::from_int_scale(i, e, false);
        assert!(back.value_eq(&r));
        assert_eq!(r.binary_exponent(), Some(-1));
    }

    #[test]
    fn test_fma_single_rounding() {
        let a = int(3);
        let b = int(5);
        let c = int(7);
        assert!(a.fma(&b, &c).value_eq(&int(22)));
    }

    #[test]
    fn test_ieee_remainder_rounds_quotient_to_nearest() {
        // rem(5, 2) = 1, rem(7, 2) = −1 (quotient 4 is nearest even).
        assert!(int(5).ieee_rem(&int(2)).value_eq(&int(1)));
        assert!(int(7).ieee_rem(&int(2)).value_eq(&int(-1)));
        assert!(int(1).ieee_rem(&Real::zero(false)).is_nan());
    }

    #[test]
    fn test_binary_exponent_brackets_value() {
        assert_eq!(int(1).binary_exponent(), Some(0));
        assert_eq!(int(2).binary_exponent(), Some(1));
        assert_eq!(int(3).binary_exponent(), Some(1));
        assert_eq!(int(4).binary_exponent(), Some(2));
        assert_eq!(Real::zero(false).binary_exponent(), None);
        assert_eq!(Real::nan().binary_exponent(), None);
    }
}
