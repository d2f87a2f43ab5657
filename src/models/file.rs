//! Candidate and selected input files.

use std::path::Path;

use crate::error::Result;

/// Media type of comma-separated tabular data.
pub const CSV_MEDIA_TYPE: &str = "text/csv";

/// How a candidate reached the ingestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// Chosen explicitly by path
    Picker,
    /// Dropped onto the submission view
    Drop,
}

/// A file offered for selection, not yet validated.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    pub name: String,
    pub media_type: String,
    pub contents: Vec<u8>,
    pub source: SelectionSource,
}

impl FileCandidate {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            contents: contents.into(),
            source: SelectionSource::Picker,
        }
    }

    /// Read a candidate from disk, inferring its media type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            media_type: media_type_for(path).to_string(),
            name,
            contents,
            source: SelectionSource::Picker,
        })
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    pub fn with_source(mut self, source: SelectionSource) -> Self {
        self.source = source;
        self
    }
}

/// Media type a browser would report for the given file name.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => CSV_MEDIA_TYPE,
        "tsv" => "text/tab-separated-values",
        "txt" => "text/plain",
        "json" => "application/json",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// A validated file ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub byte_size: u64,
    pub media_type: String,
    contents: Vec<u8>,
}

impl SelectedFile {
    pub(crate) fn from_candidate(candidate: FileCandidate) -> Self {
        Self {
            name: candidate.name,
            byte_size: candidate.contents.len() as u64,
            media_type: candidate.media_type,
            contents: candidate.contents,
        }
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Size in kilobytes with one decimal, as shown next to the file name.
    pub fn display_size(&self) -> String {
        format!("{:.1} KB", self.byte_size as f64 / 1024.0)
    }
}
