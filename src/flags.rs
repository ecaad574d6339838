//! IEEE exception flags.
//!
//! The bit assignment matches Berkeley SoftFloat's flag byte, so the
//! reference adapter's register can be passed through unchanged and the
//! strict comparator can compare bytes directly.

use bitflags::bitflags;
use serde::{Serialize, Serializer};

bitflags! {
    /// One byte of sticky IEEE exception flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ExceptionFlags: u8 {
        /// Result differs from the unbounded-precision result.
        const INEXACT = 0x01;
        /// Tiny result lost precision.
        const UNDERFLOW = 0x02;
        /// Result exceeded the finite range.
        const OVERFLOW = 0x04;
        /// Exact infinite result from finite operands (division by zero).
        const INFINITE = 0x08;
        /// No useful result is definable.
        const INVALID = 0x10;
    }
}

impl Serialize for ExceptionFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_bits_match_softfloat_assignment() {
        assert_eq!(ExceptionFlags::INEXACT.bits(), 0x01);
        assert_eq!(ExceptionFlags::UNDERFLOW.bits(), 0x02);
        assert_eq!(ExceptionFlags::OVERFLOW.bits(), 0x04);
        assert_eq!(ExceptionFlags::INFINITE.bits(), 0x08);
        assert_eq!(ExceptionFlags::INVALID.bits(), 0x10);
        assert_eq!(ExceptionFlags::empty().bits(), 0);
    }
}
