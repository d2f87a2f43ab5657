// src/services/export.rs

//! CSV export of analysis records.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{AnalysisRecord, ExportConfig};

/// Fixed header row of the export.
pub const CSV_HEADER: &str = "URL,Prediction,Threat Level";

/// Writes the per-URL results as a CSV file with a fixed name.
#[derive(Debug, Clone)]
pub struct ExportGenerator {
    file_name: String,
}

impl ExportGenerator {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            file_name: config.file_name.clone(),
        }
    }

    /// Render records as CSV text, one line per record after the header.
    pub fn to_csv(records: &[AnalysisRecord]) -> String {
        let mut out = String::with_capacity(CSV_HEADER.len() + records.len() * 64);
        out.push_str(CSV_HEADER);
        out.push('\n');
        for record in records {
            out.push_str(&escape_field(&record.url));
            out.push(',');
            out.push_str(record.label.as_str());
            out.push(',');
            out.push_str(&escape_field(&record.verdict));
            out.push('\n');
        }
        out
    }

    /// Write the CSV into `dir` and return the file path.
    pub async fn write(&self, dir: &Path, records: &[AnalysisRecord]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, Self::to_csv(records)).await?;
        log::info!("Exported {} records to {}", records.len(), path.display());
        Ok(path)
    }
}

/// Quote a field when it contains a delimiter, quote or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_to_csv_exports_real_records() {
        let records = vec![
            AnalysisRecord::new("https://a.example", "Legitimate"),
            AnalysisRecord::new("https://b.example/?q=1,2", "Suspicious \"phish\""),
            AnalysisRecord::new("https://c.example", "n/a"),
        ];

        let csv = ExportGenerator::to_csv(&records);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "https://a.example,Legitimate,Legitimate");
        assert_eq!(
            lines[2],
            "\"https://b.example/?q=1,2\",Suspicious,\"Suspicious \"\"phish\"\"\""
        );
        assert_eq!(lines[3], "https://c.example,Unknown,n/a");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_to_csv_empty_has_header_only() {
        assert_eq!(ExportGenerator::to_csv(&[]), format!("{CSV_HEADER}\n"));
    }

    #[tokio::test]
    async fn test_write_uses_fixed_file_name() {
        let tmp = TempDir::new().unwrap();
        let generator = ExportGenerator::new(&ExportConfig::default());
        let records = vec![AnalysisRecord::new("https://a.example", "Legitimate")];

        let path = generator.write(tmp.path(), &records).await.unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str(),
            Some("phishing_analysis_results.csv")
        );
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.starts_with(CSV_HEADER));
    }
}
