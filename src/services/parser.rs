// src/services/parser.rs

//! Report parsing.
//!
//! The prediction endpoint renders its results as an HTML table, one body
//! row per URL with the verdict in the last column. This module turns that
//! markup back into records.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, ParseError, Result};
use crate::models::{AnalysisRecord, ParsedResult, RawReport};
use crate::utils::normalize_whitespace;

/// Extracts analysis records from raw reports.
#[derive(Debug)]
pub struct ResponseParser {
    table: Selector,
    header_cells: Selector,
    body_rows: Selector,
    cells: Selector,
    url_header: Regex,
}

impl ResponseParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            table: Self::parse_selector("table")?,
            header_cells: Self::parse_selector("thead th")?,
            body_rows: Self::parse_selector("tbody tr")?,
            cells: Self::parse_selector("td")?,
            url_header: Regex::new(r"(?i)\b(url|link|domain|address)\b")
                .map_err(|e| AppError::config(format!("URL header pattern: {e}")))?,
        })
    }

    /// Parse a report, treating a missing table as an empty result.
    pub fn parse(&self, report: &RawReport) -> ParsedResult {
        self.try_parse(report).unwrap_or_else(|e| {
            log::warn!("{e}; treating report as empty");
            ParsedResult::default()
        })
    }

    /// Parse a report, distinguishing a missing table from an empty one.
    pub fn try_parse(&self, report: &RawReport) -> std::result::Result<ParsedResult, ParseError> {
        let document = Html::parse_document(report.as_str());
        let table = document
            .select(&self.table)
            .next()
            .ok_or(ParseError::NoTableFound)?;

        let url_column = self.url_column(&table);
        let records: Vec<AnalysisRecord> = table
            .select(&self.body_rows)
            .map(|row| self.parse_row(&row, url_column))
            .collect();

        log::debug!(
            "Parsed {} rows (URL column {:?})",
            records.len(),
            url_column
        );
        Ok(ParsedResult { records })
    }

    /// Index of the header naming a URL column, if any.
    fn url_column(&self, table: &ElementRef) -> Option<usize> {
        table
            .select(&self.header_cells)
            .map(|th| cell_text(&th))
            .position(|text| self.url_header.is_match(&text))
    }

    fn parse_row(&self, row: &ElementRef, url_column: Option<usize>) -> AnalysisRecord {
        let cells: Vec<String> = row.select(&self.cells).map(|td| cell_text(&td)).collect();

        let url = url_column
            .and_then(|i| cells.get(i))
            .or_else(|| cells.first())
            .cloned()
            .unwrap_or_default();
        let verdict = cells.last().cloned().unwrap_or_default();

        AnalysisRecord::new(url, verdict)
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

fn cell_text(element: &ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}
