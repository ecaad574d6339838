//! Output formatters for differential reports.
//!
//! Trait-based formatters for rendering harness results in various output
//! formats (human-readable, JSON, compact single-line).

use crate::harness::DiffReport;

/// Trait for formatting differential reports.
///
/// Implementors render a single report; the whole-run rendering has a
/// default implementation that concatenates report outputs and appends a
/// summary line.
pub trait ReportFormatter {
    /// Format one report.
    fn format_report(&self, report: &DiffReport) -> String;

    /// Format the closing summary for a whole run.
    fn format_summary(&self, reports: &[DiffReport]) -> Option<String>;

    /// Format a complete run.
    fn format_run(&self, reports: &[DiffReport]) -> String {
        let mut parts: Vec<String> = reports.iter().map(|r| self.format_report(r)).collect();
        if let Some(summary) = self.format_summary(reports) {
            parts.push(summary);
        }
        parts.join("\n")
    }
}

/// Full human-readable output: per-test pass/fail lines plus recorded
/// failures with width-padded hex operands.
pub struct HumanFormatter;

impl ReportFormatter for HumanFormatter {
    fn format_report(&self, report: &DiffReport) -> String {
        report.to_string().trim_end().to_string()
    }

    fn format_summary(&self, reports: &[DiffReport]) -> Option<String> {
        let failed_tests = reports.iter().filter(|r| !r.is_pass()).count();
        let failed_inputs: u64 = reports.iter().map(|r| r.failed).sum();
        let total_inputs: u64 = reports.iter().map(|r| r.passed + r.failed).sum();
        Some(if failed_tests == 0 {
            format!("all {} tests passed ({total_inputs} inputs)", reports.len())
        } else {
            format!(
                "{failed_tests} of {} tests failed ({failed_inputs} of {total_inputs} inputs)",
                reports.len()
            )
        })
    }
}

/// Machine-readable JSON output.
pub struct JsonFormatter {
    /// Pretty-print with indentation.
    pub pretty: bool,
}

impl ReportFormatter for JsonFormatter {
    fn format_report(&self, report: &DiffReport) -> String {
        let result = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        result.unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
    }

    fn format_summary(&self, _reports: &[DiffReport]) -> Option<String> {
        None
    }
}

/// Compact one-line-per-test output.
pub struct ShortFormatter;

impl ReportFormatter for ShortFormatter {
    fn format_report(&self, report: &DiffReport) -> String {
        if report.is_pass() {
            format!("PASS {} ({})", report.name, report.passed)
        } else {
            format!(
                "FAIL {} ({} of {})",
                report.name,
                report.failed,
                report.passed + report.failed
            )
        }
    }

    fn format_summary(&self, reports: &[DiffReport]) -> Option<String> {
        let failed = reports.iter().filter(|r| !r.is_pass()).count();
        Some(format!("{failed}/{} failed", reports.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{BinaryOp, Oracle};
    use crate::corpus::targeted_pairs;
    use crate::format::formats::BINARY16;
    use crate::harness::{run_binary, DiffConfig};

    fn sample_report() -> DiffReport {
        let left = Oracle::new(&BINARY16);
        let right = Oracle::new(&BINARY16);
        run_binary(
            "sample",
            &BINARY16,
            BinaryOp::Add,
            &left,
            &right,
            targeted_pairs(&BINARY16),
            &DiffConfig::default(),
        )
    }

    #[test]
    fn test_human_formatter_summarizes() {
        let reports = vec![sample_report()];
        let out = HumanFormatter.format_run(&reports);
        assert!(out.contains("sample add"));
        assert!(out.contains("all 1 tests passed"));
    }

    #[test]
    fn test_json_formatter_is_parseable() {
        let report = sample_report();
        let out = JsonFormatter { pretty: false }.format_report(&report);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["name"], "sample add");
        assert_eq!(value["failed"], 0);
    }

    #[test]
    fn test_short_formatter_is_one_line() {
        let report = sample_report();
        let out = ShortFormatter.format_report(&report);
        assert!(out.starts_with("PASS sample add"));
        assert!(!out.contains('\n'));
    }
}
