//! OPINE differential test driver.
//!
//! Command-line tool that runs the differential harness over preset
//! formats and adapter pairings, printing per-test reports and exiting
//! non-zero when any pairing disagrees.

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use std::process::ExitCode;

use opine::corpus::{self, DEFAULT_SEED};
use opine::format::{formats, FloatFormat};
use opine::{
    run_binary, run_suite, run_ternary, run_unary, BinaryOp, Comparator, DiffConfig, DiffReport,
    FloatImpl, HumanFormatter, JsonFormatter, NativeFloat, Oracle, ReportFormatter,
    ShortFormatter, SoftFloatRef, TernaryOp, UnaryOp,
};

/// Differential tester for configurable floating-point formats.
///
/// Cross-validates the arbitrary-precision oracle, the Berkeley SoftFloat
/// reference and the host FPU against each other on targeted and
/// seeded-random corpora.
#[derive(Parser, Debug)]
#[command(name = "opine-difftest")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Formats to test (preset names, or "all")
    #[arg(short, long, default_value = "binary32")]
    formats: Vec<String>,

    /// Adapter pairings to run
    #[arg(short, long, value_enum, default_value = "oracle-reference")]
    pair: Vec<Pairing>,

    /// Operations to run (e.g. add,mul,sqrt,fma); all when omitted
    #[arg(long, value_delimiter = ',')]
    ops: Option<Vec<String>>,

    /// Random inputs per operation (on top of the targeted corpus)
    #[arg(short = 'n', long, default_value_t = 10_000)]
    random: usize,

    /// Seed for the random corpus
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Output comparison strictness
    #[arg(short, long, value_enum, default_value = "nan-aware")]
    comparator: ComparatorArg,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    output: OutputFormat,

    /// Skip the reverse-direction runs
    #[arg(long)]
    one_direction: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Adapter pairing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Pairing {
    /// Oracle vs Berkeley SoftFloat
    OracleReference,
    /// Oracle vs host FPU
    OracleNative,
    /// Berkeley SoftFloat vs host FPU
    ReferenceNative,
}

/// Comparator options.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ComparatorArg {
    /// Bits and flags must match
    BitExact,
    /// Bits must match, flags ignored
    IgnoreFlags,
    /// NaN payloads may differ, otherwise bits must match
    NanAware,
}

impl From<ComparatorArg> for Comparator {
    fn from(arg: ComparatorArg) -> Self {
        match arg {
            ComparatorArg::BitExact => Comparator::BitExact,
            ComparatorArg::IgnoreFlags => Comparator::BitExactIgnoringFlags,
            ComparatorArg::NanAware => Comparator::NanAware,
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
    /// Compact single-line output
    Short,
}

fn resolve_formats(names: &[String]) -> Result<Vec<&'static FloatFormat>> {
    if names.iter().any(|n| n == "all") {
        return Ok(formats::ALL.to_vec());
    }
    let mut out = Vec::new();
    for name in names {
        match formats::by_name(name) {
            Some(format) => out.push(format),
            None => {
                let known: Vec<&str> = formats::ALL.iter().map(|f| f.name).collect();
                bail!("unknown format `{name}` (known: {})", known.join(", "));
            }
        }
    }
    Ok(out)
}

/// Builds the two adapters of a pairing, or explains why the pairing does
/// not apply to this format.
fn build_pair(
    pairing: Pairing,
    format: &'static FloatFormat,
) -> opine::Result<(Box<dyn FloatImpl>, Box<dyn FloatImpl>)> {
    Ok(match pairing {
        Pairing::OracleReference => (
            Box::new(Oracle::new(format)),
            Box::new(SoftFloatRef::for_format(format)?),
        ),
        Pairing::OracleNative => (
            Box::new(Oracle::new(format)),
            Box::new(NativeFloat::for_format(format)?),
        ),
        Pairing::ReferenceNative => (
            Box::new(SoftFloatRef::for_format(format)?),
            Box::new(NativeFloat::for_format(format)?),
        ),
    })
}

/// Parsed `--ops` selection.
struct OpSelection {
    binary: Vec<BinaryOp>,
    unary: Vec<UnaryOp>,
    fma: bool,
}

fn parse_ops(names: &[String]) -> Result<OpSelection> {
    let mut selection = OpSelection {
        binary: Vec::new(),
        unary: Vec::new(),
        fma: false,
    };
    for name in names {
        match name.as_str() {
            "add" => selection.binary.push(BinaryOp::Add),
            "sub" => selection.binary.push(BinaryOp::Sub),
            "mul" => selection.binary.push(BinaryOp::Mul),
            "div" => selection.binary.push(BinaryOp::Div),
            "rem" => selection.binary.push(BinaryOp::Rem),
            "eq" => selection.binary.push(BinaryOp::Eq),
            "lt" => selection.binary.push(BinaryOp::Lt),
            "le" => selection.binary.push(BinaryOp::Le),
            "sqrt" => selection.unary.push(UnaryOp::Sqrt),
            "neg" => selection.unary.push(UnaryOp::Neg),
            "abs" => selection.unary.push(UnaryOp::Abs),
            "fma" => selection.fma = true,
            _ => bail!("unknown operation `{name}`"),
        }
    }
    Ok(selection)
}

/// Runs only the selected operations for one direction of a pairing.
fn run_selected(
    format: &'static FloatFormat,
    left: &dyn FloatImpl,
    right: &dyn FloatImpl,
    selection: &OpSelection,
    random: usize,
    seed: u64,
    config: &DiffConfig,
) -> Vec<DiffReport> {
    let name = format!("{} {} vs {}", format.name, left.name(), right.name());
    let mut reports = Vec::new();
    for &op in &selection.binary {
        let pairs = corpus::chained(
            corpus::targeted_pairs(format),
            corpus::random_pairs(format, random, seed),
        );
        reports.push(run_binary(&name, format, op, left, right, pairs, config));
    }
    for &op in &selection.unary {
        let operands = corpus::chained(
            corpus::targeted_singles(format),
            corpus::random_singles(format, random, seed),
        );
        reports.push(run_unary(&name, format, op, left, right, operands, config));
    }
    if selection.fma
        && left.supports_ternary(TernaryOp::MulAdd)
        && right.supports_ternary(TernaryOp::MulAdd)
    {
        let triples = corpus::random_triples(format, random, seed);
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

fn run(args: &Args) -> Result<Vec<DiffReport>> {
    let config = DiffConfig {
        comparator: args.comparator.into(),
        ..DiffConfig::default()
    };
    let selection = args.ops.as_deref().map(parse_ops).transpose()?;
    let mut reports = Vec::new();
    for format in resolve_formats(&args.formats)? {
        for pairing in &args.pair {
            let (left, right) = match build_pair(*pairing, format) {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!("skipping {:?} for {}: {e}", pairing, format.name);
                    continue;
                }
            };
            tracing::info!(
                format = format.name,
                left = left.name(),
                right = right.name(),
                random = args.random,
                seed = args.seed,
                "running suite"
            );
            let mut directions = vec![(left.as_ref(), right.as_ref())];
            if !args.one_direction {
                directions.push((right.as_ref(), left.as_ref()));
            }
            for (first, second) in directions {
                match &selection {
                    Some(selection) => reports.extend(run_selected(
                        format,
                        first,
                        second,
                        selection,
                        args.random,
                        args.seed,
                        &config,
                    )),
                    None => reports.extend(run_suite(
                        format,
                        first,
                        second,
                        args.random,
                        args.seed,
                        &config,
                    )),
                }
            }
        }
    }
    Ok(reports)
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    let reports = match run(&args) {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };

    let rendered = match args.output {
        OutputFormat::Human => HumanFormatter.format_run(&reports),
        OutputFormat::Json => JsonFormatter { pretty: true }.format_run(&reports),
        OutputFormat::Short => ShortFormatter.format_run(&reports),
    };
    println!("{rendered}");

    let failed = reports.iter().filter(|r| !r.is_pass()).count();
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        eprintln!("{failed} test(s) failed");
        ExitCode::FAILURE
    }
}
