//! Per-preset behavioral checks: each catalog format exercised through
//! the codec and the oracle on hand-computed values.

use opine::adapters::{BinaryOp, FloatImpl, Oracle, TernaryOp, UnaryOp};
use opine::bits::Bits;
use opine::codec::{decode, round_to_format};
use opine::flags::ExceptionFlags;
use opine::format::formats;
use opine::real::Real;
use rug::Integer;

fn real(v: i64) -> Real {
    Real::from_int_scale(Integer::from(v.unsigned_abs()), 0, v < 0)
}

#[test]
fn test_binary32_known_constants() {
    let fmt = &formats::BINARY32;
    assert_eq!(round_to_format(fmt, &real(1)).0.raw(), 0x3F80_0000);
    assert_eq!(round_to_format(fmt, &real(-2)).0.raw(), 0xC000_0000);
    // Max finite and min subnormal round-trip.
    assert!(decode(fmt, Bits::new(32, 0x7F7F_FFFF)).value_eq(&Real::from_int_scale(
        Integer::from((1u64 << 24) - 1),
        104,
        false
    )));
    assert!(decode(fmt, Bits::new(32, 0x0000_0001)).value_eq(&Real::from_int_scale(
        Integer::from(1),
        -149,
        false
    )));
}

#[test]
fn test_binary64_known_constants() {
    let fmt = &formats::BINARY64;
    assert_eq!(
        round_to_format(fmt, &real(1)).0.raw(),
        0x3FF0_0000_0000_0000
    );
    // 0.1 rounds to the familiar pattern.
    let tenth = real(1).div(&real(10));
    assert_eq!(
        round_to_format(fmt, &tenth).0.raw(),
        0x3FB9_9999_9999_999A
    );
}

#[test]
fn test_bfloat16_coarse_rounding() {
    let fmt = &formats::BFLOAT16;
    // bfloat16 keeps binary32's exponent range at 8-bit precision:
    // 257 is exactly between 256 and 258 and rounds to the even 256.
    let (bits, flags) = round_to_format(fmt, &real(257));
    assert!(decode(fmt, bits).value_eq(&real(256)));
    assert!(flags.contains(ExceptionFlags::INEXACT));
    // 1/256 of the exponent range survives: 2^−126 is the min normal.
    let min_normal = Bits::new(16, 0x0080);
    assert_eq!(decode(fmt, min_normal).binary_exponent(), Some(-126));
}

#[test]
fn test_e5m2_extremes() {
    let fmt = &formats::E5M2;
    // Max finite: exp 30, mant 3 → 1.75 × 2^15 = 57344.
    assert!(decode(fmt, Bits::new(8, 0x7B)).value_eq(&real(57344)));
    // Min subnormal: 2^−16.
    assert!(decode(fmt, Bits::new(8, 0x01)).value_eq(&Real::from_int_scale(
        Integer::from(1),
        -16,
        false
    )));
    // IEEE-style specials all present.
    assert!(decode(fmt, Bits::new(8, 0x7C)).is_infinite());
    assert!(decode(fmt, Bits::new(8, 0x7E)).is_nan());
    let nz = decode(fmt, Bits::new(8, 0x80));
    assert!(nz.is_zero() && nz.is_sign_negative());
}

#[test]
fn test_e4m3_saturating_arithmetic() {
    let fmt = &formats::E4M3;
    let oracle = Oracle::new(fmt);
    let max = opine::codec::largest_finite(fmt, false);
    // max + max saturates instead of producing an infinity.
    let out = oracle.binary(BinaryOp::Add, max, max);
    assert_eq!(out.bits, max);
    assert!(out.flags.contains(ExceptionFlags::OVERFLOW));
    // The negative direction saturates symmetrically.
    let neg_max = opine::codec::largest_finite(fmt, true);
    let out = oracle.binary(BinaryOp::Add, neg_max, neg_max);
    assert_eq!(out.bits, neg_max);
}

#[test]
fn test_e4m3fnuz_bias_shift() {
    let fmt = &formats::E4M3FNUZ;
    // Bias 8 instead of 7: 1.0 sits at exponent 8.
    assert_eq!(round_to_format(fmt, &real(1)).0.raw(), 0x40);
    // Division by zero has no infinity to produce; the oracle saturates
    // per the overflow policy only on overflow - an exact infinite result
    // encodes as zero (no infinity exists), making the flag the signal.
    let oracle = Oracle::new(fmt);
    let out = oracle.binary(BinaryOp::Div, Bits::new(8, 0x40), Bits::new(8, 0x00));
    assert!(out.flags.contains(ExceptionFlags::INFINITE));
}

#[test]
fn test_tc_e3m4_arithmetic_matches_signed_layout() {
    let fmt = &formats::TC_E3M4;
    let oracle = Oracle::new(fmt);
    let one = fmt.pack(false, 4, 0); // 0x40
    let neg_one = fmt.pack(true, 4, 0); // 0xC0

    // 1 + (−1) = 0, the unique zero.
    let out = oracle.binary(BinaryOp::Add, one, neg_one);
    assert_eq!(out.bits.raw(), 0x00);

    // 1 × (−1) = −1.
    let out = oracle.binary(BinaryOp::Mul, one, neg_one);
    assert_eq!(out.bits, neg_one);

    // Negation is exact two's-complement word negation.
    assert_eq!(oracle.unary(UnaryOp::Neg, one).bits, neg_one);
    assert_eq!(oracle.unary(UnaryOp::Abs, neg_one).bits, one);

    // Overflow runs into the integer-extreme infinity.
    let big = fmt.pack(false, 7, 14); // largest finite, 15.0
    let out = oracle.binary(BinaryOp::Add, big, big);
    let (pos_inf, _) = fmt.integer_extremes();
    assert_eq!(out.bits, pos_inf);
}

#[test]
fn test_oc_e3m4_arithmetic_through_inverted_fields() {
    let fmt = &formats::OC_E3M4;
    let oracle = Oracle::new(fmt);
    let one = fmt.pack(false, 3, 0);
    let neg_one = fmt.pack(true, 3, 0);

    let out = oracle.binary(BinaryOp::Add, one, neg_one);
    assert!(decode(fmt, out.bits).is_zero());

    let out = oracle.binary(BinaryOp::Sub, neg_one, neg_one);
    assert!(decode(fmt, out.bits).is_zero());

    // −1 < −0 is false: the zeros compare equal.
    let neg_zero = fmt.pack(true, 0, 0);
    let pos_zero = fmt.pack(false, 0, 0);
    assert_eq!(
        oracle.binary(BinaryOp::Eq, neg_zero, pos_zero).bits.raw(),
        1
    );
    assert_eq!(
        oracle.binary(BinaryOp::Lt, neg_one, neg_zero).bits.raw(),
        1
    );
}

#[test]
fn test_ext_float80_sqrt_and_fma() {
    let fmt = &formats::EXT_FLOAT80;
    let oracle = Oracle::new(fmt);
    let four = fmt.pack(false, 16385, 1u128 << 63);
    let two = fmt.pack(false, 16384, 1u128 << 63);
    assert!(decode(fmt, four).value_eq(&real(4)));
    assert!(decode(fmt, two).value_eq(&real(2)));

    let out = oracle.unary(UnaryOp::Sqrt, four);
    assert!(decode(fmt, out.bits).value_eq(&real(2)));

    // fma(2, 2, 1) = 5 in one rounding.
    let one = fmt.pack(false, 16383, 1u128 << 63);
    let out = oracle.ternary(TernaryOp::MulAdd, two, two, one);
    assert!(decode(fmt, out.bits).value_eq(&real(5)));
}

#[test]
fn test_binary128_precision_boundary() {
    let fmt = &formats::BINARY128;
    // 2^113 + 1 is the first integer binary128 cannot hold; it rounds to
    // the even neighbor 2^113.
    let value = Real::from_int_scale(Integer::from(1u32), 113, false)
        .add(&real(1));
    let (bits, flags) = round_to_format(fmt, &value);
    assert!(decode(fmt, bits).value_eq(&Real::from_int_scale(
        Integer::from(1u32),
        113,
        false
    )));
    assert!(flags.contains(ExceptionFlags::INEXACT));
    // 2^112 + 1 is still exact.
    let value = Real::from_int_scale(Integer::from(1u32), 112, false)
        .add(&real(1));
    let (_, flags) = round_to_format(fmt, &value);
    assert!(flags.is_empty());
}
