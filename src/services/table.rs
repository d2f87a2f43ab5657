// src/services/table.rs

//! Tabular display of analysis records.

use crate::models::AnalysisRecord;
use crate::utils::{display_len, pad_right, truncate_graphemes};

const URL_WIDTH: usize = 60;
const HEADERS: [&str; 3] = ["#", "URL", "Prediction"];

/// Render records as an aligned text table, truncating long URLs.
pub fn render_table(records: &[AnalysisRecord]) -> String {
    let rows: Vec<[String; 3]> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            [
                (i + 1).to_string(),
                truncate_graphemes(&r.url, URL_WIDTH),
                r.label.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(display_len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_len(cell));
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(str::to_string), &widths);
    out.push_str(
        &widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad_right(cell, *width))
        .collect::<Vec<_>>()
        .join(" │ ");
    out.push_str(line.trim_end());
    out.push('\n');
}
