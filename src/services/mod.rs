//! Service layer for the PhishGuard client.
//!
//! Contains the stages of the ingestion-and-result pipeline:
//! - `ingest`: File selection and validation
//! - `upload`: Submission to the prediction endpoint
//! - `parser`: Report markup to records
//! - `stats`: Verdict aggregation
//! - `chart`, `table`: Text presentation
//! - `export`: CSV export
//! - `training`: Remote training trigger with progress estimate

pub mod chart;
pub mod export;
pub mod ingest;
pub mod parser;
pub mod stats;
pub mod table;
pub mod training;
pub mod upload;

pub use chart::ChartData;
pub use export::ExportGenerator;
pub use ingest::FileIngestor;
pub use parser::ResponseParser;
pub use stats::summarize;
pub use table::render_table;
pub use training::{ProgressEstimator, TrainingTrigger};
pub use upload::UploadClient;
