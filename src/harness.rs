//! The differential harness.
//!
//! Runs two opaque adapters over an operand corpus, compares their outputs
//! pairwise and accumulates a bounded failure report. The harness knows
//! nothing about adapter internals; running the same pair in the reverse
//! direction surfaces asymmetric bugs for free.

use serde::Serialize;

use crate::adapters::{BinaryOp, FloatImpl, TernaryOp, TestOutput, UnaryOp};
use crate::bits::Bits;
use crate::codec::is_nan_pattern;
use crate::corpus;
use crate::format::FloatFormat;

/// Failures recorded per run before reporting switches to counting only.
pub const DEFAULT_FAILURE_BOUND: usize = 10;

/// How two test outputs are judged equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    /// Bit pattern and flag byte must both match.
    BitExact,
    /// Only the bit pattern must match.
    BitExactIgnoringFlags,
    /// Two NaN results match regardless of payload; anything else must be
    /// bit-equal. Flag bytes are not compared (adapters that report no
    /// flags return zero); strict flag checking is [`Comparator::BitExact`].
    NanAware,
}

impl Comparator {
    /// Pure function of two outputs (and the format, for NaN detection).
    pub fn matches(self, format: &FloatFormat, left: &TestOutput, right: &TestOutput) -> bool {
        match self {
            Self::BitExact => left.bits == right.bits && left.flags == right.flags,
            Self::BitExactIgnoringFlags => left.bits == right.bits,
            Self::NanAware => {
                if is_nan_pattern(format, left.bits) && is_nan_pattern(format, right.bits) {
                    return true;
                }
                left.bits == right.bits
            }
        }
    }
}

/// Harness configuration.
#[derive(Debug, Clone, Copy)]
pub struct DiffConfig {
    /// Output comparison mode.
    pub comparator: Comparator,
    /// Maximum number of failures recorded in full.
    pub max_failures: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            comparator: Comparator::NanAware,
            max_failures: DEFAULT_FAILURE_BOUND,
        }
    }
}

/// One recorded disagreement: the inputs and both adapters' outputs.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    /// Operand patterns, in dispatch order.
    pub inputs: Vec<Bits>,
    /// Output of the first adapter.
    pub left: TestOutput,
    /// Output of the second adapter.
    pub right: TestOutput,
}

/// Pass/fail summary of one differential run.
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    /// Test name, e.g. `binary64 mul oracle vs softfloat`.
    pub name: String,
    /// Name of the first adapter.
    pub left: String,
    /// Name of the second adapter.
    pub right: String,
    /// Inputs on which the outputs matched.
    pub passed: u64,
    /// Inputs on which the outputs disagreed.
    pub failed: u64,
    /// Hex digits per printed value: the format's total bit count divided
    /// by four, rounded up.
    pub hex_digits: usize,
    /// The first [`DiffConfig::max_failures`] disagreements, in full.
    pub failures: Vec<Failure>,
}

impl DiffReport {
    fn new(
        name: String,
        format: &FloatFormat,
        left: &dyn FloatImpl,
        right: &dyn FloatImpl,
    ) -> Self {
        Self {
            name,
            left: left.name().to_string(),
            right: right.name().to_string(),
            passed: 0,
            failed: 0,
            hex_digits: format.layout.total_bits.div_ceil(4) as usize,
            failures: Vec::new(),
        }
    }

    fn hex(&self, bits: Bits) -> String {
        format!("0x{:0>1$X}", bits.raw(), self.hex_digits)
    }

    fn record(
        &mut self,
        format: &FloatFormat,
        config: &DiffConfig,
        inputs: &[Bits],
        left: TestOutput,
        right: TestOutput,
    ) {
        if config.comparator.matches(format, &left, &right) {
            self.passed += 1;
        } else {
            self.failed += 1;
            if self.failures.len() < config.max_failures {
                self.failures.push(Failure {
                    inputs: inputs.to_vec(),
                    left,
                    right,
                });
            }
        }
    }

    /// Whether every input matched.
    pub fn is_pass(&self) -> bool {
        self.failed == 0
    }
}

impl std::fmt::Display for DiffReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{}: {} passed, {} failed",
            self.name, self.passed, self.failed
        )?;
        for failure in &self.failures {
            let inputs: Vec<String> =
                failure.inputs.iter().map(|b| self.hex(*b)).collect();
            writeln!(
                f,
                "  FAIL {} -> {} {} [flags {:#04x}] vs {} {} [flags {:#04x}]",
                inputs.join(", "),
                self.left,
                self.hex(failure.left.bits),
                failure.left.flags.bits(),
                self.right,
                self.hex(failure.right.bits),
                failure.right.flags.bits(),
            )?;
        }
        Ok(())
    }
}

/// Runs a binary operation over a pair corpus.
pub fn run_binary(
    name: &str,
    format: &FloatFormat,
    op: BinaryOp,
    left: &dyn FloatImpl,
    right: &dyn FloatImpl,
    pairs: impl Iterator<Item = (Bits, Bits)>,
    config: &DiffConfig,
) -> DiffReport {
    let mut report = DiffReport::new(format!("{name} {op}"), format, left, right);
    for (a, b) in pairs {
        let lo = left.binary(op, a, b);
        let ro = right.binary(op, a, b);
        report.record(format, config, &[a, b], lo, ro);
    }
    report
}

/// Runs a unary operation over a single-operand corpus.
pub fn run_unary(
    name: &str,
    format: &FloatFormat,
    op: UnaryOp,
    left: &dyn FloatImpl,
    right: &dyn FloatImpl,
    operands: impl Iterator<Item = Bits>,
    config: &DiffConfig,
) -> DiffReport {
    let mut report = DiffReport::new(format!("{name} {op}"), format, left, right);
    for a in operands {
        let lo = left.unary(op, a);
        let ro = right.unary(op, a);
        report.record(format, config, &[a], lo, ro);
    }
    report
}

/// Runs a ternary operation over a triple corpus.
pub fn run_ternary(
    name: &str,
    format: &FloatFormat,
    op: TernaryOp,
    left: &dyn FloatImpl,
    right: &dyn FloatImpl,
    triples: impl Iterator<Item = (Bits, Bits, Bits)>,
    config: &DiffConfig,
) -> DiffReport {
    let mut report = DiffReport::new(format!("{name} {op}"), format, left, right);
    for (a, b, c) in triples {
        let lo = left.ternary(op, a, b, c);
        let ro = right.ternary(op, a, b, c);
        report.record(format, config, &[a, b, c], lo, ro);
    }
    report
}

/// Runs the stock suite for one adapter pairing: every binary and unary
/// operation over the targeted corpus plus `random_count` random inputs,
/// and fused multiply-add where both adapters support it.
pub fn run_suite(
    format: &'static FloatFormat,
    left: &dyn FloatImpl,
    right: &dyn FloatImpl,
    random_count: usize,
    seed: u64,
    config: &DiffConfig,
) -> Vec<DiffReport> {
    let name = format!("{} {} vs {}", format.name, left.name(), right.name());
    let mut reports = Vec::new();
    for op in BinaryOp::ALL {
        let pairs = corpus::chained(
            corpus::targeted_pairs(format),
            corpus::random_pairs(format, random_count, seed),
        );
        reports.push(run_binary(&name, format, op, left, right, pairs, config));
    }
    for op in UnaryOp::ALL {
        let operands = corpus::chained(
            corpus::targeted_singles(format),
            corpus::random_singles(format, random_count, seed),
        );
        reports.push(run_unary(&name, format, op, left, right, operands, config));
    }
    if left.supports_ternary(TernaryOp::MulAdd) && right.supports_ternary(TernaryOp::MulAdd) {
        let triples = corpus::random_triples(format, random_count, seed);
        reports.push(run_ternary(
            &name,
            format,
            TernaryOp::MulAdd,
            left,
            right,
            triples,
            config,
        ));
    }
    reports
}
