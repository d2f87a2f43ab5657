// src/services/stats.rs

//! Verdict aggregation.

use crate::models::{AnalysisRecord, AnalysisSummary, Label};

/// Count records per bucket and derive percentages of the full total.
///
/// Unknown records count towards `total` but towards neither percentage, so
/// the two percentages add up to 100 only when every record is classified.
pub fn summarize(records: &[AnalysisRecord]) -> AnalysisSummary {
    let total = records.len();
    let count = |label: Label| records.iter().filter(|r| r.label == label).count();

    let legitimate_count = count(Label::Legitimate);
    let suspicious_count = count(Label::Suspicious);

    AnalysisSummary {
        total,
        legitimate_count,
        suspicious_count,
        unknown_count: total - legitimate_count - suspicious_count,
        legitimate_percent: percent(legitimate_count, total),
        suspicious_percent: percent(suspicious_count, total),
    }
}

fn percent(count: usize, total: usize) -> Option<f64> {
    (total > 0).then(|| count as f64 * 100.0 / total as f64)
}
