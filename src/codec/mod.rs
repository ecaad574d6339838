//! The format codec: bit patterns to exact reals and back.
//!
//! [`decode`] maps any bit pattern of a format, canonical or not, to its
//! exact mathematical value as a 256-bit [`Real`](crate::real::Real).
//! [`round_to_format`] maps any real back to the bit pattern that best
//! represents it under the format's rounding policy. Together they define
//! what "the correct answer" means for every format the policy taxonomy
//! can address; the oracle adapter is little more than decode → arithmetic
//! → round-to-format.

mod decode;
mod encode;

pub use decode::{decode, is_nan_pattern, recover_fields};
pub use encode::{canonical_nan, encode_infinity, encode_zero, largest_finite, round_to_format};
