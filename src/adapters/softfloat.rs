//! Bit-exact reference adapter over Berkeley SoftFloat-3.
//!
//! Wraps the `softfloat-sys` bindings for the five IEEE widths the C
//! library implements: f16, f32, f64, extFloat80 and f128. SoftFloat keeps
//! its rounding mode and exception flags in a thread-local register; the
//! adapter writes the mode and clears the flags before every call and
//! reads the flags back after, so each dispatch is self-contained.

use softfloat_sys as sys;

use crate::adapters::{abs_bits, negate_bits, BinaryOp, FloatImpl, TernaryOp, TestOutput, UnaryOp};
use crate::bits::Bits;
use crate::error::{OpineError, Result};
use crate::flags::ExceptionFlags;
use crate::format::{formats, FloatFormat};
use crate::policy::Rounding;

#[derive(Clone, Copy)]
enum RefKind {
    F16,
    F32,
    F64,
    ExtF80,
    F128,
}

/// Berkeley SoftFloat reference implementation.
pub struct SoftFloatRef {
    format: &'static FloatFormat,
    kind: RefKind,
}

impl SoftFloatRef {
    /// A reference adapter for the format, if SoftFloat implements it.
    pub fn for_format(format: &'static FloatFormat) -> Result<Self> {
        let kind = if *format == formats::BINARY16 {
            RefKind::F16
        } else if *format == formats::BINARY32 {
            RefKind::F32
        } else if *format == formats::BINARY64 {
            RefKind::F64
        } else if *format == formats::EXT_FLOAT80 {
            RefKind::ExtF80
        } else if *format == formats::BINARY128 {
            RefKind::F128
        } else {
            return Err(OpineError::NoReferenceFormat {
                format: format.name.to_string(),
            });
        };
        Ok(Self { format, kind })
    }

    fn rounding_word(&self) -> u8 {
        match self.format.rounding {
            Rounding::TiesToEven => sys::softfloat_round_near_even,
            Rounding::TowardZero => sys::softfloat_round_minMag,
            Rounding::TowardNegative => sys::softfloat_round_min,
            Rounding::TowardPositive => sys::softfloat_round_max,
            Rounding::TiesToAway => sys::softfloat_round_near_maxMag,
            Rounding::ToOdd => {
                panic!("SoftFloat reference: round-to-odd is not exposed by the C library")
            }
        }
    }

    /// Runs one SoftFloat call with a clean flag register and collects
    /// the flags it raised.
    fn guard(&self, call: impl FnOnce() -> u128) -> TestOutput {
        unsafe {
            sys::softfloat_roundingMode_write_helper(self.rounding_word());
            sys::softfloat_exceptionFlags_write_helper(0);
        }
        let raw = call();
        let flags = unsafe { sys::softfloat_exceptionFlags_read_helper() };
        TestOutput {
            bits: Bits::new(self.format.layout.storage_bits, raw),
            flags: ExceptionFlags::from_bits_truncate(flags),
        }
    }
}

fn ext_from_bits(raw: u128) -> sys::extFloat80_t {
    sys::extFloat80_t {
        signif: raw as u64,
        signExp: (raw >> 64) as u16,
    }
}

fn ext_to_bits(v: sys::extFloat80_t) -> u128 {
    ((v.signExp as u128) << 64) | v.signif as u128
}

fn f128_from_bits(raw: u128) -> sys::float128_t {
    sys::float128_t {
        v: [raw as u64, (raw >> 64) as u64],
    }
}

fn f128_to_bits(v: sys::float128_t) -> u128 {
    ((v.v[1] as u128) << 64) | v.v[0] as u128
}

unsafe fn binary_f16(op: BinaryOp, a: u128, b: u128) -> u128 {
    let x = sys::float16_t { v: a as u16 };
    let y = sys::float16_t { v: b as u16 };
    match op {
        BinaryOp::Add => sys::f16_add(x, y).v as u128,
        BinaryOp::Sub => sys::f16_sub(x, y).v as u128,
        BinaryOp::Mul => sys::f16_mul(x, y).v as u128,
        BinaryOp::Div => sys::f16_div(x, y).v as u128,
        BinaryOp::Rem => sys::f16_rem(x, y).v as u128,
        BinaryOp::Eq => sys::f16_eq(x, y) as u128,
        BinaryOp::Lt => sys::f16_lt(x, y) as u128,
        BinaryOp::Le => sys::f16_le(x, y) as u128,
    }
}

unsafe fn binary_f32(op: BinaryOp, a: u128, b: u128) -> u128 {
    let x = sys::float32_t { v: a as u32 };
    let y = sys::float32_t { v: b as u32 };
    match op {
        BinaryOp::Add => sys::f32_add(x, y).v as u128,
        BinaryOp::Sub => sys::f32_sub(x, y).v as u128,
        BinaryOp::Mul => sys::f32_mul(x, y).v as u128,
        BinaryOp::Div => sys::f32_div(x, y).v as u128,
        BinaryOp::Rem => sys::f32_rem(x, y).v as u128,
        BinaryOp::Eq => sys::f32_eq(x, y) as u128,
        BinaryOp::Lt => sys::f32_lt(x, y) as u128,
        BinaryOp::Le => sys::f32_le(x, y) as u128,
    }
}

unsafe fn binary_f64(op: BinaryOp, a: u128, b: u128) -> u128 {
    let x = sys::float64_t { v: a as u64 };
    let y = sys::float64_t { v: b as u64 };
    match op {
        BinaryOp::Add => sys::f64_add(x, y).v as u128,
        BinaryOp::Sub => sys::f64_sub(x, y).v as u128,
        BinaryOp::Mul => sys::f64_mul(x, y).v as u128,
        BinaryOp::Div => sys::f64_div(x, y).v as u128,
        BinaryOp::Rem => sys::f64_rem(x, y).v as u128,
        BinaryOp::Eq => sys::f64_eq(x, y) as u128,
        BinaryOp::Lt => sys::f64_lt(x, y) as u128,
        BinaryOp::Le => sys::f64_le(x, y) as u128,
    }
}

unsafe fn binary_ext_f80(op: BinaryOp, a: u128, b: u128) -> u128 {
    let x = ext_from_bits(a);
    let y = ext_from_bits(b);
    match op {
        BinaryOp::Add => ext_to_bits(sys::extF80_add(x, y)),
        BinaryOp::Sub => ext_to_bits(sys::extF80_sub(x, y)),
        BinaryOp::Mul => ext_to_bits(sys::extF80_mul(x, y)),
        BinaryOp::Div => ext_to_bits(sys::extF80_div(x, y)),
        BinaryOp::Rem => ext_to_bits(sys::extF80_rem(x, y)),
        BinaryOp::Eq => sys::extF80_eq(x, y) as u128,
        BinaryOp::Lt => sys::extF80_lt(x, y) as u128,
        BinaryOp::Le => sys::extF80_le(x, y) as u128,
    }
}

unsafe fn binary_f128(op: BinaryOp, a: u128, b: u128) -> u128 {
    let x = f128_from_bits(a);
    let y = f128_from_bits(b);
    match op {
        BinaryOp::Add => f128_to_bits(sys::f128_add(x, y)),
        BinaryOp::Sub => f128_to_bits(sys::f128_sub(x, y)),
        BinaryOp::Mul => f128_to_bits(sys::f128_mul(x, y)),
        BinaryOp::Div => f128_to_bits(sys::f128_div(x, y)),
        BinaryOp::Rem => f128_to_bits(sys::f128_rem(x, y)),
        BinaryOp::Eq => sys::f128_eq(x, y) as u128,
        BinaryOp::Lt => sys::f128_lt(x, y) as u128,
        BinaryOp::Le => sys::f128_le(x, y) as u128,
    }
}

impl FloatImpl for SoftFloatRef {
    fn name(&self) -> &str {
        "softfloat"
    }

    fn format(&self) -> &'static FloatFormat {
        self.format
    }

    fn binary(&self, op: BinaryOp, a: Bits, b: Bits) -> TestOutput {
        let (a, b) = (a.raw(), b.raw());
        self.guard(|| unsafe {
            match self.kind {
                RefKind::F16 => binary_f16(op, a, b),
                RefKind::F32 => binary_f32(op, a, b),
                RefKind::F64 => binary_f64(op, a, b),
                RefKind::ExtF80 => binary_ext_f80(op, a, b),
                RefKind::F128 => binary_f128(op, a, b),
            }
        })
    }

    fn unary(&self, op: UnaryOp, a: Bits) -> TestOutput {
        match op {
            UnaryOp::Neg => TestOutput::quiet(negate_bits(self.format, a)),
            UnaryOp::Abs => TestOutput::quiet(abs_bits(self.format, a)),
            UnaryOp::Sqrt => {
                let a = a.raw();
                self.guard(|| unsafe {
                    match self.kind {
                        RefKind::F16 => sys::f16_sqrt(sys::float16_t { v: a as u16 }).v as u128,
                        RefKind::F32 => sys::f32_sqrt(sys::float32_t { v: a as u32 }).v as u128,
                        RefKind::F64 => sys::f64_sqrt(sys::float64_t { v: a as u64 }).v as u128,
                        RefKind::ExtF80 => ext_to_bits(sys::extF80_sqrt(ext_from_bits(a))),
                        RefKind::F128 => f128_to_bits(sys::f128_sqrt(f128_from_bits(a))),
                    }
                })
            }
        }
    }

    fn supports_ternary(&self, _op: TernaryOp) -> bool {
        !matches!(self.kind, RefKind::ExtF80)
    }

    fn ternary(&self, op: TernaryOp, a: Bits, b: Bits, c: Bits) -> TestOutput {
        let TernaryOp::MulAdd = op;
        let (a, b, c) = (a.raw(), b.raw(), c.raw());
        self.guard(|| unsafe {
            match self.kind {
                RefKind::F16 => sys::f16_mulAdd(
                    sys::float16_t { v: a as u16 },
                    sys::float16_t { v: b as u16 },
                    sys::float16_t { v: c as u16 },
                )
                .v as u128,
                RefKind::F32 => sys::f32_mulAdd(
                    sys::float32_t { v: a as u32 },
                    sys::float32_t { v: b as u32 },
                    sys::float32_t { v: c as u32 },
                )
                .v as u128,
                RefKind::F64 => sys::f64_mulAdd(
                    sys::float64_t { v: a as u64 },
                    sys::float64_t { v: b as u64 },
                    sys::float64_t { v: c as u64 },
                )
                .v as u128,
                RefKind::ExtF80 => {
                    panic!("SoftFloat reference: extFloat80 has no fused multiply-add")
                }
                RefKind::F128 => f128_to_bits(sys::f128_mulAdd(
                    f128_from_bits(a),
                    f128_from_bits(b),
                    f128_from_bits(c),
                )),
            }
        })
    }
}
