// src/pipeline/submit.rs

//! Submission view: select a file, upload it, hand the report off.

use crate::error::{Result, ValidationError};
use crate::models::{FileCandidate, SelectedFile};
use crate::services::{FileIngestor, UploadClient};
use crate::storage::ResultStore;

pub const INVALID_FILE_MESSAGE: &str = "Please upload a valid CSV file";
pub const UPLOAD_FAILED_MESSAGE: &str =
    "Failed to analyze file. Please check your backend connection.";

/// Where the user ends up after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Stay on (or return to) the submission view
    Submission,
    /// Move on to the results view
    Results,
}

/// State of the submission view.
#[derive(Debug)]
pub struct SubmitView {
    ingestor: FileIngestor,
    uploading: bool,
    error: Option<String>,
}

impl SubmitView {
    pub fn new(ingestor: FileIngestor) -> Self {
        Self {
            ingestor,
            uploading: false,
            error: None,
        }
    }

    /// Offer a file; a rejection is shown inline and blocks submission.
    pub fn select(&mut self, candidate: FileCandidate) -> std::result::Result<(), ValidationError> {
        match self.ingestor.select(candidate) {
            Ok(_) => {
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(INVALID_FILE_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.ingestor.selected()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn can_submit(&self) -> bool {
        self.selected().is_some() && !self.uploading
    }

    /// Upload the selected file and store the report under `key`.
    ///
    /// Upload failures are absorbed into the view: the error message is set,
    /// the file stays selected for a retry and the view stays put. Only
    /// store failures are returned as errors.
    pub async fn submit(
        &mut self,
        client: &UploadClient,
        store: &dyn ResultStore,
        key: &str,
    ) -> Result<Navigation> {
        if !self.can_submit() {
            return Ok(Navigation::Submission);
        }
        let Some(file) = self.ingestor.selected().cloned() else {
            return Ok(Navigation::Submission);
        };

        self.uploading = true;
        self.error = None;
        let outcome = client.submit(&file).await;
        self.uploading = false;

        match outcome {
            Ok(report) => {
                store.put(key, &report).await?;
                self.ingestor.clear();
                Ok(Navigation::Results)
            }
            Err(e) => {
                log::error!("Upload of {} failed: {}", file.name, e);
                self.error = Some(UPLOAD_FAILED_MESSAGE.to_string());
                Ok(Navigation::Submission)
            }
        }
    }
}
