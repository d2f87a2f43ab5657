// src/services/upload.rs

//! Batch submission to the prediction endpoint.

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::error::{Result, UploadError};
use crate::models::{RawReport, SelectedFile, ServiceConfig};
use crate::utils::http::describe_transport_error;

/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Client for the prediction endpoint.
#[derive(Debug, Clone)]
pub struct UploadClient {
    client: Client,
    endpoint: Url,
}

impl UploadClient {
    pub fn new(client: Client, config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            client,
            endpoint: config.predict_url()?,
        })
    }

    /// Upload the file and return the service's report body untouched.
    ///
    /// A single attempt is made; retrying is up to the caller.
    pub async fn submit(&self, file: &SelectedFile) -> std::result::Result<RawReport, UploadError> {
        let part = Part::bytes(file.contents().to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.media_type)
            .map_err(|_| UploadError::InvalidMediaType(file.media_type.clone()))?;
        let form = Form::new().part(FILE_FIELD, part);

        log::info!(
            "Uploading {} ({}) to {}",
            file.name,
            file.display_size(),
            self.endpoint
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::TransportFailure(describe_transport_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Prediction endpoint answered {}", status);
            return Err(UploadError::RemoteRejected {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| UploadError::TransportFailure(describe_transport_error(&e)))?;
        log::debug!("Received report of {} bytes", body.len());
        Ok(RawReport::new(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CSV_MEDIA_TYPE, FileCandidate};
    use crate::testing::{FakeService, unreachable_base_url};

    fn selected(contents: &str) -> SelectedFile {
        SelectedFile::from_candidate(FileCandidate::new("batch.csv", CSV_MEDIA_TYPE, contents))
    }

    fn client_for(base_url: String) -> UploadClient {
        let config = ServiceConfig {
            base_url,
            ..ServiceConfig::default()
        };
        UploadClient::new(Client::new(), &config).unwrap()
    }

    #[tokio::test]
    async fn test_submit_returns_body_unmodified() {
        let service = FakeService::start().await;
        let client = client_for(service.base_url());

        let report = client
            .submit(&selected("url,label\nhttps://a.example,Legitimate\n"))
            .await
            .unwrap();

        assert_eq!(
            report.as_str(),
            FakeService::render_table("url,label\nhttps://a.example,Legitimate\n")
        );
        let received = service.last_upload().unwrap();
        assert_eq!(received.file_name.as_deref(), Some("batch.csv"));
        assert_eq!(received.content_type.as_deref(), Some(CSV_MEDIA_TYPE));
    }

    #[tokio::test]
    async fn test_non_success_status_is_remote_rejected() {
        let service = FakeService::start().await;
        service.fail_with(500);
        let client = client_for(service.base_url());

        let err = client.submit(&selected("url\n")).await.unwrap_err();
        assert!(matches!(err, UploadError::RemoteRejected { status: 500 }));
    }

    #[tokio::test]
    async fn test_malformed_media_type_is_not_sent() {
        let service = FakeService::start().await;
        let client = client_for(service.base_url());
        let file = SelectedFile::from_candidate(FileCandidate::new("batch.csv", "csv", "url\n"));

        let err = client.submit(&file).await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidMediaType(ref t) if t == "csv"));
        assert!(service.last_upload().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_failure() {
        let client = client_for(unreachable_base_url().await);
        let err = client.submit(&selected("url\n")).await.unwrap_err();
        assert!(matches!(err, UploadError::TransportFailure(_)));
    }
}
