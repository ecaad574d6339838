//! Host-FPU adapter.
//!
//! Wraps the machine's own floating-point arithmetic for the formats that
//! have a native counterpart (binary32 and binary64), by bit-reinterpreting
//! between the storage container and `f32`/`f64`. The IEEE remainder goes
//! through the platform libm; everything else is a plain hardware
//! operation. Exception flags are not modeled: the flag byte is zero.

use crate::adapters::{abs_bits, negate_bits, BinaryOp, FloatImpl, TernaryOp, TestOutput, UnaryOp};
use crate::bits::Bits;
use crate::error::{OpineError, Result};
use crate::format::{formats, FloatFormat};

#[derive(Clone, Copy)]
enum NativeKind {
    F32,
    F64,
}

/// Hardware floating-point implementation.
pub struct NativeFloat {
    format: &'static FloatFormat,
    kind: NativeKind,
}

impl NativeFloat {
    /// A native adapter for the format, if the host has a matching type.
    pub fn for_format(format: &'static FloatFormat) -> Result<Self> {
        let kind = if *format == formats::BINARY32 {
            NativeKind::F32
        } else if *format == formats::BINARY64 {
            NativeKind::F64
        } else {
            return Err(OpineError::NoNativeFormat {
                format: format.name.to_string(),
            });
        };
        Ok(Self { format, kind })
    }

    fn out(&self, raw: u128) -> TestOutput {
        TestOutput::quiet(Bits::new(self.format.layout.storage_bits, raw))
    }

    fn predicate(&self, value: bool) -> TestOutput {
        self.out(value as u128)
    }
}

impl FloatImpl for NativeFloat {
    fn name(&self) -> &str {
        "native"
    }

    fn format(&self) -> &'static FloatFormat {
        self.format
    }

    fn binary(&self, op: BinaryOp, a: Bits, b: Bits) -> TestOutput {
        match self.kind {
            NativeKind::F32 => {
                let x = f32::from_bits(a.raw() as u32);
                let y = f32::from_bits(b.raw() as u32);
                let value = match op {
                    BinaryOp::Add => x + y,
                    BinaryOp::Sub => x - y,
                    BinaryOp::Mul => x * y,
                    BinaryOp::Div => x / y,
                    BinaryOp::Rem => libm::remainderf(x, y),
                    BinaryOp::Eq => return self.predicate(x == y),
                    BinaryOp::Lt => return self.predicate(x < y),
                    BinaryOp::Le => return self.predicate(x <= y),
                };
                self.out(value.to_bits() as u128)
            }
            NativeKind::F64 => {
                let x = f64::from_bits(a.raw() as u64);
                let y = f64::from_bits(b.raw() as u64);
                let value = match op {
                    BinaryOp::Add => x + y,
                    BinaryOp::Sub => x - y,
                    BinaryOp::Mul => x * y,
                    BinaryOp::Div => x / y,
                    BinaryOp::Rem => libm::remainder(x, y),
                    BinaryOp::Eq => return self.predicate(x == y),
                    BinaryOp::Lt => return self.predicate(x < y),
                    BinaryOp::Le => return self.predicate(x <= y),
                };
                self.out(value.to_bits() as u128)
            }
        }
    }

    fn unary(&self, op: UnaryOp, a: Bits) -> TestOutput {
        match op {
            // Sign-bit operations stay bit operations here too, so NaN
            // payloads survive exactly as the hardware would keep them.
            UnaryOp::Neg => TestOutput::quiet(negate_bits(self.format, a)),
            UnaryOp::Abs => TestOutput::quiet(abs_bits(self.format, a)),
            UnaryOp::Sqrt => match self.kind {
                NativeKind::F32 => {
                    let x = f32::from_bits(a.raw() as u32);
                    self.out(x.sqrt().to_bits() as u128)
                }
                NativeKind::F64 => {
                    let x = f64::from_bits(a.raw() as u64);
                    self.out(x.sqrt().to_bits() as u128)
                }
            },
        }
    }

    fn ternary(&self, op: TernaryOp, a: Bits, b: Bits, c: Bits) -> TestOutput {
        match op {
            TernaryOp::MulAdd => match self.kind {
                NativeKind::F32 => {
                    let x = f32::from_bits(a.raw() as u32);
                    let y = f32::from_bits(b.raw() as u32);
                    let z = f32::from_bits(c.raw() as u32);
                    self.out(x.mul_add(y, z).to_bits() as u128)
                }
                NativeKind::F64 => {
                    let x = f64::from_bits(a.raw() as u64);
                    let y = f64::from_bits(b.raw() as u64);
                    let z = f64::from_bits(c.raw() as u64);
                    self.out(x.mul_add(y, z).to_bits() as u128)
                }
            },
        }
    }
}
