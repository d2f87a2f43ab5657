//! Raw reports and the records parsed out of them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unparsed markup returned by the prediction endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawReport(String);

impl RawReport {
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for RawReport {
    fn from(body: String) -> Self {
        Self(body)
    }
}

/// Classification bucket of one analyzed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Legitimate,
    Suspicious,
    Unknown,
}

impl Label {
    /// Classify the text of a verdict cell.
    ///
    /// "Legitimate" wins when both words appear.
    pub fn classify(text: &str) -> Self {
        if text.contains("Legitimate") {
            Label::Legitimate
        } else if text.contains("Suspicious") {
            Label::Suspicious
        } else {
            Label::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Legitimate => "Legitimate",
            Label::Suspicious => "Suspicious",
            Label::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One analyzed URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub url: String,
    pub label: Label,
    /// Trimmed text of the verdict cell the label was derived from
    pub verdict: String,
}

impl AnalysisRecord {
    pub fn new(url: impl Into<String>, verdict: impl Into<String>) -> Self {
        let verdict = verdict.into();
        Self {
            url: url.into(),
            label: Label::classify(&verdict),
            verdict,
        }
    }
}

/// Records extracted from a report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResult {
    pub records: Vec<AnalysisRecord>,
}

impl ParsedResult {
    /// Number of body rows, including unclassified ones.
    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Aggregated verdict counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub total: usize,
    pub legitimate_count: usize,
    pub suspicious_count: usize,
    pub unknown_count: usize,
    /// `None` when `total` is zero
    pub legitimate_percent: Option<f64>,
    /// `None` when `total` is zero
    pub suspicious_percent: Option<f64>,
}

impl AnalysisSummary {
    pub fn has_data(&self) -> bool {
        self.total > 0
    }

    /// Headline shown under the total.
    ///
    /// Only suspicious verdicts raise the alert; unclassified rows are
    /// reported in the counts, not here.
    pub fn headline(&self) -> String {
        if self.suspicious_count > 0 {
            format!(
                "Found {} suspicious URLs requiring attention",
                self.suspicious_count
            )
        } else {
            "All URLs classified as legitimate".to_string()
        }
    }
}

/// Format a percentage with one decimal, or "n/a" when undefined.
pub fn format_percent(percent: Option<f64>) -> String {
    match percent {
        Some(p) => format!("{p:.1}%"),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_substring() {
        assert_eq!(Label::classify("Legitimate"), Label::Legitimate);
        assert_eq!(Label::classify("  Suspicious activity  "), Label::Suspicious);
        assert_eq!(
            Label::classify("Legitimate (was Suspicious)"),
            Label::Legitimate
        );
        assert_eq!(Label::classify("legitimate"), Label::Unknown);
        assert_eq!(Label::classify(""), Label::Unknown);
    }

    #[test]
    fn test_record_derives_label() {
        let record = AnalysisRecord::new("https://a.example", "Suspicious");
        assert_eq!(record.label, Label::Suspicious);
        assert_eq!(record.verdict, "Suspicious");
    }

    fn summary(legitimate: usize, suspicious: usize, unknown: usize) -> AnalysisSummary {
        let total = legitimate + suspicious + unknown;
        AnalysisSummary {
            total,
            legitimate_count: legitimate,
            suspicious_count: suspicious,
            unknown_count: unknown,
            legitimate_percent: None,
            suspicious_percent: None,
        }
    }

    #[test]
    fn test_headline_flags_suspicious_urls() {
        assert_eq!(
            summary(3, 2, 0).headline(),
            "Found 2 suspicious URLs requiring attention"
        );
        assert_eq!(
            summary(0, 1, 4).headline(),
            "Found 1 suspicious URLs requiring attention"
        );
    }

    #[test]
    fn test_headline_without_suspicious_urls() {
        assert_eq!(summary(5, 0, 0).headline(), "All URLs classified as legitimate");
        // Unclassified rows do not change the headline.
        assert_eq!(summary(3, 0, 2).headline(), "All URLs classified as legitimate");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(60.0)), "60.0%");
        assert_eq!(format_percent(Some(33.3333)), "33.3%");
        assert_eq!(format_percent(None), "n/a");
    }

    #[test]
    fn test_raw_report_serializes_as_plain_string() {
        let report = RawReport::new("<table></table>");
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, "\"<table></table>\"");
    }
}
