//! End-to-end scenarios driving the oracle and harness through the
//! situations the system exists to handle.

use opine::adapters::{BinaryOp, FloatImpl, Oracle, UnaryOp};
use opine::bits::Bits;
use opine::codec::{decode, round_to_format};
use opine::corpus::targeted_pairs;
use opine::flags::ExceptionFlags;
use opine::format::formats;
use opine::harness::{run_binary, Comparator, DiffConfig};

/// binary16: 1.0 + 2.0 = 3.0, no flags.
#[test]
fn test_binary16_add_one_and_two() {
    let oracle = Oracle::new(&formats::BINARY16);
    let out = oracle.binary(
        BinaryOp::Add,
        Bits::new(16, 0x3C00),
        Bits::new(16, 0x4000),
    );
    assert_eq!(out.bits.raw(), 0x4200);
    assert_eq!(out.flags, ExceptionFlags::empty());
}

/// extFloat80: adding the unnormal (exp = 0x3FFF, significand = 0) to +0
/// must produce exactly +0, because the unnormal's value is zero. An
/// implementation that assumes the J bit is set returns 1.0 here; the
/// harness is built to catch exactly that.
#[test]
fn test_unnormal_add_is_zero() {
    let fmt = &formats::EXT_FLOAT80;
    let oracle = Oracle::new(fmt);
    let unnormal = fmt.pack(false, 0x3FFF, 0);
    let zero = fmt.pack(false, 0, 0);
    let out = oracle.binary(BinaryOp::Add, unnormal, zero);
    assert_eq!(out.bits.raw(), 0, "sign=0, signExp=0, sig=0");
    // The unnormal itself is preserved by the sign-bit operations...
    assert_eq!(oracle.unary(UnaryOp::Abs, unnormal).bits, unnormal);
    // ...and canonicalized by arithmetic.
    assert_eq!(
        oracle.binary(BinaryOp::Add, unnormal, unnormal).bits.raw(),
        0
    );
}

/// extFloat80 value equivalences: unnormal-zero ≡ +0, pseudo-denormal ≡
/// smallest normal.
#[test]
fn test_explicit_bit_value_equivalence() {
    let fmt = &formats::EXT_FLOAT80;
    let unnormal_zero = decode(fmt, fmt.pack(false, 1, 0));
    let plus_zero = decode(fmt, fmt.pack(false, 0, 0));
    assert!(unnormal_zero.is_zero());
    assert_eq!(
        unnormal_zero.is_sign_negative(),
        plus_zero.is_sign_negative()
    );

    let j = 1u128 << 63;
    let pseudo_denormal = decode(fmt, fmt.pack(false, 0, j));
    let smallest_normal = decode(fmt, fmt.pack(false, 1, j));
    assert!(pseudo_denormal.value_eq(&smallest_normal));
    // Both equal 2^(1 − bias).
    assert_eq!(pseudo_denormal.binary_exponent(), Some(1 - 16383));
}

/// Two's-complement formats order like signed integers: exhaustive over
/// all 256 × 256 pairs, NaN excluded.
#[test]
fn test_twos_complement_monotonic_order() {
    let fmt = &formats::TC_E3M4;
    for x in 0..=0xFFu128 {
        let vx = decode(fmt, Bits::new(8, x));
        if vx.is_nan() {
            continue;
        }
        for y in 0..=0xFFu128 {
            let vy = decode(fmt, Bits::new(8, y));
            if vy.is_nan() {
                continue;
            }
            let value_lt = vx.partial_cmp(&vy) == Some(std::cmp::Ordering::Less);
            let int_lt = Bits::new(8, x).as_signed() < Bits::new(8, y).as_signed();
            assert_eq!(
                value_lt, int_lt,
                "order mismatch at x={x:#04x} y={y:#04x}"
            );
        }
    }
}

/// E4M3FNUZ: exactly one NaN pattern (0x80), and NaN encodes to it.
#[test]
fn test_fnuz_nan_handling() {
    let fmt = &formats::E4M3FNUZ;
    assert!(decode(fmt, Bits::new(8, 0x80)).is_nan());
    let (nan_bits, _) = round_to_format(fmt, &opine::Real::nan());
    assert_eq!(nan_bits.raw(), 0x80);
    for raw in 0..=0xFFu128 {
        if raw == 0x80 {
            continue;
        }
        assert!(
            !decode(fmt, Bits::new(8, raw)).is_nan(),
            "{raw:#04x} must not be NaN"
        );
    }
}

/// Exhaustive byte-format arithmetic consistency: over all 65,536 ordered
/// pairs, addition and multiplication commute bit-exactly, and
/// subtraction matches addition of the bitwise negation wherever negation
/// is value-faithful (everything except the FNUZ NaN pattern, whose sign
/// flip lands on +0 by construction).
#[test]
fn test_exhaustive_byte_format_arithmetic() {
    for fmt in [&formats::E5M2, &formats::E4M3FNUZ] {
        let oracle = Oracle::new(fmt);
        for x in 0..=0xFFu128 {
            let a = Bits::new(8, x);
            for y in 0..=0xFFu128 {
                let b = Bits::new(8, y);
                let ab = oracle.binary(BinaryOp::Add, a, b);
                let ba = oracle.binary(BinaryOp::Add, b, a);
                assert_eq!(ab.bits, ba.bits, "{} add {a} {b}", fmt.name);
                let m1 = oracle.binary(BinaryOp::Mul, a, b);
                let m2 = oracle.binary(BinaryOp::Mul, b, a);
                assert_eq!(m1.bits, m2.bits, "{} mul {a} {b}", fmt.name);

                let neg_b = oracle.unary(UnaryOp::Neg, b).bits;
                if !decode(fmt, b).is_nan() && !decode(fmt, neg_b).is_nan() {
                    let sub = oracle.binary(BinaryOp::Sub, a, b);
                    let add_neg = oracle.binary(BinaryOp::Add, a, neg_b);
                    assert_eq!(sub.bits, add_neg.bits, "{} sub {a} {b}", fmt.name);
                }
            }
        }
    }
}

/// The harness agrees with itself: the oracle run against a second oracle
/// over the full targeted corpus passes in both directions.
#[test]
fn test_oracle_self_agreement_both_directions() {
    for fmt in [&formats::BINARY16, &formats::E4M3FNUZ, &formats::TC_E3M4] {
        let left = Oracle::new(fmt);
        let right = Oracle::new(fmt);
        let config = DiffConfig {
            comparator: Comparator::BitExact,
            ..DiffConfig::default()
        };
        for op in BinaryOp::ALL {
            let forward = run_binary(
                fmt.name,
                fmt,
                op,
                &left,
                &right,
                targeted_pairs(fmt),
                &config,
            );
            assert!(forward.is_pass(), "{}", forward);
            let reverse = run_binary(
                fmt.name,
                fmt,
                op,
                &right,
                &left,
                targeted_pairs(fmt),
                &config,
            );
            assert!(reverse.is_pass(), "{}", reverse);
        }
    }
}
