// src/services/chart.rs

//! Text rendering of the verdict distribution.

use crate::models::AnalysisSummary;
use crate::utils::pad_right;

const BAR_WIDTH: usize = 40;

/// One slice of the distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlice {
    pub label: &'static str,
    pub value: usize,
}

/// Two-slice distribution of classified URLs.
///
/// Unknown rows are not charted, so `charted_total` may be below the
/// summary total.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub slices: [ChartSlice; 2],
}

impl ChartData {
    pub fn from_summary(summary: &AnalysisSummary) -> Self {
        Self {
            slices: [
                ChartSlice {
                    label: "Safe & Legitimate",
                    value: summary.legitimate_count,
                },
                ChartSlice {
                    label: "Suspicious Threats",
                    value: summary.suspicious_count,
                },
            ],
        }
    }

    pub fn charted_total(&self) -> usize {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Share of a slice within the charted total.
    pub fn share(&self, slice: &ChartSlice) -> Option<f64> {
        let total = self.charted_total();
        (total > 0).then(|| slice.value as f64 * 100.0 / total as f64)
    }

    /// Render as horizontal bars with counts and shares.
    pub fn render(&self) -> String {
        let total = self.charted_total();
        if total == 0 {
            return "No classified URLs to chart".to_string();
        }

        let label_width = self.slices.iter().map(|s| s.label.len()).max().unwrap_or(0);
        let mut out = String::new();
        for slice in &self.slices {
            let share = self.share(slice).unwrap_or(0.0);
            let filled = ((share / 100.0) * BAR_WIDTH as f64).round() as usize;
            out.push_str(&format!(
                "{} │{}{}│ {} URLs ({:.1}%)\n",
                pad_right(slice.label, label_width),
                "█".repeat(filled),
                "░".repeat(BAR_WIDTH - filled),
                slice.value,
                share
            ));
        }
        out.push_str(&format!("{total} Total URLs"));
        out
    }
}
