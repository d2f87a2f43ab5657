// src/models/mod.rs

//! Domain models for the PhishGuard client.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod file;
mod report;
mod training;

// Re-export all public types
pub use config::{
    Config, ExportConfig, IngestConfig, LoggingConfig, ServiceConfig, StoreConfig,
    TrainingConfig,
};
pub use file::{CSV_MEDIA_TYPE, FileCandidate, SelectedFile, SelectionSource, media_type_for};
pub use report::{
    AnalysisRecord, AnalysisSummary, Label, ParsedResult, RawReport, format_percent,
};
pub use training::{TrainingRun, TrainingStatus};
