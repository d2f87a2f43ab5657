// src/services/ingest.rs

//! File selection and validation.

use crate::error::ValidationError;
use crate::models::{FileCandidate, IngestConfig, SelectedFile};

/// Holds at most one validated file awaiting submission.
#[derive(Debug, Clone)]
pub struct FileIngestor {
    accepted_media_type: String,
    max_file_bytes: u64,
    enforce_max_size: bool,
    selected: Option<SelectedFile>,
    last_error: Option<ValidationError>,
}

impl FileIngestor {
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            accepted_media_type: config.accepted_media_type.clone(),
            max_file_bytes: config.max_file_bytes,
            enforce_max_size: config.enforce_max_size,
            selected: None,
            last_error: None,
        }
    }

    /// Validate a candidate and make it the current selection.
    ///
    /// A rejected candidate is never stored; the previous selection, if any,
    /// stays in place alongside the recorded error.
    pub fn select(&mut self, candidate: FileCandidate) -> Result<&SelectedFile, ValidationError> {
        if let Err(error) = self.validate(&candidate) {
            log::warn!(
                "Rejected {} ({:?}, {}): {}",
                candidate.name,
                candidate.source,
                candidate.media_type,
                error
            );
            self.last_error = Some(error.clone());
            return Err(error);
        }

        log::debug!(
            "Selected {} via {:?} ({} bytes)",
            candidate.name,
            candidate.source,
            candidate.contents.len()
        );
        self.last_error = None;
        let selected = self.selected.insert(SelectedFile::from_candidate(candidate));
        Ok(&*selected)
    }

    fn validate(&self, candidate: &FileCandidate) -> Result<(), ValidationError> {
        if candidate.media_type != self.accepted_media_type {
            return Err(ValidationError::InvalidType {
                found: candidate.media_type.clone(),
                expected: self.accepted_media_type.clone(),
            });
        }

        let size = candidate.contents.len() as u64;
        if size > self.max_file_bytes {
            if self.enforce_max_size {
                return Err(ValidationError::TooLarge {
                    size,
                    limit: self.max_file_bytes,
                });
            }
            log::warn!(
                "{} is {} bytes, above the advertised limit of {} bytes",
                candidate.name,
                size,
                self.max_file_bytes
            );
        }
        Ok(())
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn last_error(&self) -> Option<&ValidationError> {
        self.last_error.as_ref()
    }

    /// Drop the selection once the submission has handed off its result.
    pub fn clear(&mut self) {
        self.selected = None;
        self.last_error = None;
    }
}
