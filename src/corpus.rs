//! Iteration strategies feeding the differential harness.
//!
//! Three sources of operand patterns: the Cartesian product of a format's
//! interesting patterns (targeted), a deterministic pseudo-random stream
//! (random), and sequences of the two (chained). The random stream is
//! seeded explicitly, never from the host clock, so a million-pair run
//! is byte-for-byte reproducible and every reported failure can be
//! replayed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bits::Bits;
use crate::cases::interesting_patterns;
use crate::format::FloatFormat;

/// Seed used by the stock suites when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 0x4F50_494E_45;

/// Every ordered pair of interesting patterns.
pub fn targeted_pairs(format: &FloatFormat) -> impl Iterator<Item = (Bits, Bits)> {
    let patterns = interesting_patterns(format);
    let n = patterns.len();
    (0..n * n).map(move |idx| (patterns[idx / n], patterns[idx % n]))
}

/// The interesting patterns themselves, for unary corpora.
pub fn targeted_singles(format: &FloatFormat) -> impl Iterator<Item = Bits> {
    interesting_patterns(format).into_iter()
}

/// `count` pseudo-random pairs, each masked to the declared width.
pub fn random_pairs(
    format: &FloatFormat,
    count: usize,
    seed: u64,
) -> impl Iterator<Item = (Bits, Bits)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let storage = format.layout.storage_bits;
    let mask = format.total_mask();
    (0..count).map(move |_| {
        let a = rng.gen::<u128>() & mask;
        let b = rng.gen::<u128>() & mask;
        (Bits::new(storage, a), Bits::new(storage, b))
    })
}

/// `count` pseudo-random single patterns, masked to the declared width.
pub fn random_singles(
    format: &FloatFormat,
    count: usize,
    seed: u64,
) -> impl Iterator<Item = Bits> {
    let mut rng = StdRng::seed_from_u64(seed);
    let storage = format.layout.storage_bits;
    let mask = format.total_mask();
    (0..count).map(move |_| Bits::new(storage, rng.gen::<u128>() & mask))
}

/// Every ordered triple of interesting patterns (for fused multiply-add).
pub fn targeted_triples(format: &FloatFormat) -> impl Iterator<Item = (Bits, Bits, Bits)> {
    let patterns = interesting_patterns(format);
    let n = patterns.len();
    (0..n * n * n).map(move |idx| {
        (
            patterns[idx / (n * n)],
            patterns[(idx / n) % n],
            patterns[idx % n],
        )
    })
}

/// `count` pseudo-random triples, each masked to the declared width.
pub fn random_triples(
    format: &FloatFormat,
    count: usize,
    seed: u64,
) -> impl Iterator<Item = (Bits, Bits, Bits)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let storage = format.layout.storage_bits;
    let mask = format.total_mask();
    (0..count).map(move |_| {
        (
            Bits::new(storage, rng.gen::<u128>() & mask),
            Bits::new(storage, rng.gen::<u128>() & mask),
            Bits::new(storage, rng.gen::<u128>() & mask),
        )
    })
}

/// Runs two strategies in sequence.
pub fn chained<T>(
    first: impl Iterator<Item = T>,
    second: impl Iterator<Item = T>,
) -> impl Iterator<Item = T> {
    first.chain(second)
}
