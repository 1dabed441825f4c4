//! Text and JSON rendering of validation results.
//!
//! Both renderers are pure; the caller decides where the output goes.

use anyhow::{Context, Result};

use crate::key_check::ValidationResult;

const BANNER_WIDTH: usize = 80;
const SECTION_RULE_WIDTH: usize = 40;
const REPORT_TITLE: &str = "AWS S3 KEY VALIDATION REPORT";

/// Counts shown at the top of the text report.
///
/// `valid` counts only keys without recommendations; valid keys with
/// recommendations are counted in `with_warnings`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub with_warnings: usize,
}

impl ReportSummary {
    pub fn from_results(results: &[ValidationResult]) -> Self {
        results
            .iter()
            .fold(ReportSummary::default(), |mut summary, result| {
                summary.total += 1;
                if !result.is_valid {
                    summary.invalid += 1;
                } else if result.recommendations.is_empty() {
                    summary.valid += 1;
                } else {
                    summary.with_warnings += 1;
                }
                summary
            })
    }

    pub fn has_invalid(&self) -> bool {
        self.invalid > 0
    }
}

/// Render the human-readable report.
///
/// Invalid keys and keys with warnings are always itemized; clean keys only
/// when `show_valid` is set.
pub fn generate_report(results: &[ValidationResult], show_valid: bool) -> String {
    let summary = ReportSummary::from_results(results);
    let mut lines: Vec<String> = Vec::new();

    lines.push("=".repeat(BANNER_WIDTH));
    lines.push(REPORT_TITLE.to_string());
    lines.push("=".repeat(BANNER_WIDTH));
    lines.push(format!("Total files scanned: {}", summary.total));
    lines.push(format!("Valid files: {}", summary.valid));
    lines.push(format!("Invalid files: {}", summary.invalid));
    lines.push(format!("Files with warnings: {}", summary.with_warnings));
    lines.push(String::new());

    if summary.invalid > 0 {
        push_section_header(&mut lines, "INVALID FILES:");
        for result in results.iter().filter(|r| !r.is_valid) {
            lines.push(format!("❌ {}", result.key));
            push_path(&mut lines, result);
            for issue in &result.issues {
                lines.push(format!("   Issue: {issue}"));
            }
            lines.push(String::new());
        }
    }

    if summary.with_warnings > 0 {
        push_section_header(&mut lines, "FILES WITH WARNINGS:");
        for result in results.iter().filter(|r| r.has_warnings()) {
            lines.push(format!("⚠️  {}", result.key));
            push_path(&mut lines, result);
            for recommendation in &result.recommendations {
                lines.push(format!("   Warning: {recommendation}"));
            }
            lines.push(String::new());
        }
    }

    if show_valid && summary.valid > 0 {
        push_section_header(&mut lines, "VALID FILES:");
        for result in results.iter().filter(|r| r.is_clean()) {
            lines.push(format!("✅ {}", result.key));
            push_path(&mut lines, result);
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Serialize the full result sequence as pretty-printed JSON.
pub fn generate_json(results: &[ValidationResult]) -> Result<String> {
    serde_json::to_string_pretty(results).context("serde_json::to_string_pretty() failed.")
}

fn push_section_header(lines: &mut Vec<String>, title: &str) {
    lines.push(title.to_string());
    lines.push("-".repeat(SECTION_RULE_WIDTH));
}

fn push_path(lines: &mut Vec<String>, result: &ValidationResult) {
    if let Some(path) = &result.path {
        lines.push(format!("   Path: {path}"));
    }
}
