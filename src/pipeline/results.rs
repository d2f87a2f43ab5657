// src/pipeline/results.rs

//! Results view: read the handed-off report and derive what is shown.

use crate::error::{ParseError, Result};
use crate::models::{AnalysisRecord, AnalysisSummary};
use crate::services::{ChartData, ResponseParser, summarize};
use crate::storage::ResultStore;

/// Parsed and aggregated analysis, ready for display and export.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResults {
    pub records: Vec<AnalysisRecord>,
    pub summary: AnalysisSummary,
}

impl AnalysisResults {
    pub fn chart(&self) -> ChartData {
        ChartData::from_summary(&self.summary)
    }
}

/// What the results view shows on load.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    /// Nothing usable was handed off; go back to submission
    Redirect,
    /// The report held a table without rows
    NoData,
    Ready(AnalysisResults),
}

/// Load the report stored under `key` and build the view.
///
/// With `consume` the slot is emptied by the read, so a reload redirects.
pub async fn load_results(
    store: &dyn ResultStore,
    parser: &ResponseParser,
    key: &str,
    consume: bool,
) -> Result<ResultsView> {
    let report = if consume {
        store.consume(key).await?
    } else {
        store.take(key).await?
    };

    let Some(report) = report else {
        log::info!("No stored result under '{}'; redirecting to submission", key);
        return Ok(ResultsView::Redirect);
    };

    let parsed = match parser.try_parse(&report) {
        Ok(parsed) => parsed,
        Err(ParseError::NoTableFound) => {
            log::warn!(
                "Stored report ({} bytes) has no result table; redirecting to submission",
                report.len()
            );
            return Ok(ResultsView::Redirect);
        }
    };

    let summary = summarize(&parsed.records);
    if !summary.has_data() {
        return Ok(ResultsView::NoData);
    }

    Ok(ResultsView::Ready(AnalysisResults {
        records: parsed.records,
        summary,
    }))
}
