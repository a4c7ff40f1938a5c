//! Aggregation and report generation
//!
//! Pure formatting over already-computed reports; no matching logic here.

use std::fmt::Write;

use crate::detector::{Detection, FileReport};

/// How unknown-type files figure into the success rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatePolicy {
    /// Unknowns are excluded from the denominator: absence of a signature
    /// says nothing about the file being disguised
    #[default]
    ExcludeUnknown,
    /// Unknowns count toward the denominator
    CountUnknown,
}

/// Counts aggregated over one scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    pub total: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub unknown: usize,
    pub unreadable: usize,
}

impl ScanSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            summary.total += 1;
            match &report.detection {
                Detection::Matched(_) => summary.matched += 1,
                Detection::Mismatched(_) => summary.mismatched += 1,
                Detection::Unknown => summary.unknown += 1,
                Detection::Unreadable { .. } => summary.unreadable += 1,
            }
        }
        summary
    }

    /// Share of classified files whose extension agrees with their content,
    /// as a percentage. None when the denominator is empty.
    pub fn success_rate(&self, policy: RatePolicy) -> Option<f64> {
        let denominator = match policy {
            RatePolicy::ExcludeUnknown => self.matched + self.mismatched,
            RatePolicy::CountUnknown => self.matched + self.mismatched + self.unknown,
        };
        (denominator > 0).then(|| self.matched as f64 * 100.0 / denominator as f64)
    }
}

/// Only the reports flagged as mismatched
pub fn filter_mismatches(reports: &[FileReport]) -> impl Iterator<Item = &FileReport> {
    reports.iter().filter(|r| r.is_mismatch())
}

/// Renders a text summary of a scan, mismatched files listed in full
pub fn generate_report(reports: &[FileReport]) -> String {
    let summary = ScanSummary::from_reports(reports);
    let rule = "-".repeat(70);

    let mut out = String::new();
    let _ = writeln!(out, "FILE TYPE VERIFICATION REPORT");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Files analyzed: {}", summary.total);
    let _ = writeln!(out, "Matched:        {}", summary.matched);
    let _ = writeln!(out, "Mismatched:     {}", summary.mismatched);
    let _ = writeln!(out, "Unknown type:   {}", summary.unknown);
    let _ = writeln!(out, "Unreadable:     {}", summary.unreadable);
    match summary.success_rate(RatePolicy::default()) {
        Some(rate) => {
            let _ = writeln!(out, "Success rate:   {rate:.1}%");
        }
        None => {
            let _ = writeln!(out, "Success rate:   n/a");
        }
    }

    if summary.mismatched > 0 {
        let _ = writeln!(out);
        let _ = writeln!(out, "MISMATCHED FILES");
        let _ = writeln!(out, "{rule}");
        for report in filter_mismatches(reports) {
            let _ = writeln!(out, "{report}");
            let _ = writeln!(out, "{rule}");
        }
    }

    out
}
