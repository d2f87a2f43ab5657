//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote classification service endpoints
    #[serde(default)]
    pub service: ServiceConfig,

    /// File selection rules
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Session-scoped result hand-off
    #[serde(default)]
    pub store: StoreConfig,

    /// Local training progress estimation
    #[serde(default)]
    pub training: TrainingConfig,

    /// CSV export settings
    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let base = self.service.base_url()?;
        if base.cannot_be_a_base() {
            return Err(AppError::config("service.base_url cannot be a base URL"));
        }
        if self.service.user_agent.trim().is_empty() {
            return Err(AppError::config("service.user_agent is empty"));
        }
        if self.service.timeout_secs == Some(0) {
            return Err(AppError::config("service.timeout_secs must be > 0"));
        }
        if self.ingest.accepted_media_type.trim().is_empty() {
            return Err(AppError::config("ingest.accepted_media_type is empty"));
        }
        if self.store.key.trim().is_empty() {
            return Err(AppError::config("store.key is empty"));
        }
        if self.training.tick_ms == 0 {
            return Err(AppError::config("training.tick_ms must be > 0"));
        }
        if !(0.0..100.0).contains(&self.training.ceiling) {
            return Err(AppError::config("training.ceiling must be in [0, 100)"));
        }
        if self.training.max_step <= 0.0 {
            return Err(AppError::config("training.max_step must be > 0"));
        }
        if self.export.file_name.trim().is_empty() {
            return Err(AppError::config("export.file_name is empty"));
        }
        Ok(())
    }
}

/// Remote service location and HTTP behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the classification service
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Path of the batch prediction endpoint
    #[serde(default = "defaults::predict_path")]
    pub predict_path: String,

    /// Path of the training endpoint
    #[serde(default = "defaults::train_path")]
    pub train_path: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds; absent means wait indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ServiceConfig {
    pub fn base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?)
    }

    /// Absolute URL of the prediction endpoint.
    pub fn predict_url(&self) -> Result<Url> {
        Ok(self.base_url()?.join(&self.predict_path)?)
    }

    /// Absolute URL of the training endpoint.
    pub fn train_url(&self) -> Result<Url> {
        Ok(self.base_url()?.join(&self.train_path)?)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            predict_path: defaults::predict_path(),
            train_path: defaults::train_path(),
            user_agent: defaults::user_agent(),
            timeout_secs: None,
        }
    }
}

/// File selection constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// The single media type accepted for upload
    #[serde(default = "defaults::accepted_media_type")]
    pub accepted_media_type: String,

    /// Advertised size ceiling in bytes
    #[serde(default = "defaults::max_file_bytes")]
    pub max_file_bytes: u64,

    /// Reject files above `max_file_bytes` instead of only advertising the limit
    #[serde(default)]
    pub enforce_max_size: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            accepted_media_type: defaults::accepted_media_type(),
            max_file_bytes: defaults::max_file_bytes(),
            enforce_max_size: false,
        }
    }
}

/// Result hand-off settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one subdirectory per session; defaults to the
    /// system temp directory so nothing survives a restart
    #[serde(default = "defaults::store_root")]
    pub root_dir: String,

    /// Well-known key of the most recent raw report
    #[serde(default = "defaults::store_key")]
    pub key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root_dir: defaults::store_root(),
            key: defaults::store_key(),
        }
    }
}

/// Simulated training progress settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Interval between progress increments in milliseconds
    #[serde(default = "defaults::tick_ms")]
    pub tick_ms: u64,

    /// Progress never exceeds this value while the request is in flight
    #[serde(default = "defaults::ceiling")]
    pub ceiling: f64,

    /// Upper bound (exclusive) of a single random increment
    #[serde(default = "defaults::max_step")]
    pub max_step: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            tick_ms: defaults::tick_ms(),
            ceiling: defaults::ceiling(),
            max_step: defaults::max_step(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Fixed name of the downloaded CSV file
    #[serde(default = "defaults::export_file_name")]
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: defaults::export_file_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // Service defaults
    pub fn base_url() -> String {
        "http://localhost:8000".into()
    }
    pub fn predict_path() -> String {
        "/predict".into()
    }
    pub fn train_path() -> String {
        "/train".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; PhishGuard/0.1)".into()
    }

    // Ingest defaults
    pub fn accepted_media_type() -> String {
        crate::models::CSV_MEDIA_TYPE.into()
    }
    pub fn max_file_bytes() -> u64 {
        10 * 1024 * 1024
    }

    // Store defaults
    pub fn store_root() -> String {
        std::env::temp_dir()
            .join("phishguard")
            .join("sessions")
            .to_string_lossy()
            .into_owned()
    }
    pub fn store_key() -> String {
        "analysisResults".into()
    }

    // Training defaults
    pub fn tick_ms() -> u64 {
        500
    }
    pub fn ceiling() -> f64 {
        90.0
    }
    pub fn max_step() -> f64 {
        15.0
    }

    pub fn export_file_name() -> String {
        "phishing_analysis_results.csv".into()
    }
    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.service.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout_and_bad_ceiling() {
        let mut config = Config::default();
        config.service.timeout_secs = Some(0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.training.ceiling = 100.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn endpoint_urls_join_base() {
        let mut service = ServiceConfig::default();
        assert_eq!(
            service.predict_url().unwrap().as_str(),
            "http://localhost:8000/predict"
        );
        service.base_url = "http://10.0.0.5:9000/api/".into();
        service.train_path = "train".into();
        assert_eq!(
            service.train_url().unwrap().as_str(),
            "http://10.0.0.5:9000/api/train"
        );
    }

    #[test]
    fn bundled_config_is_valid() {
        let config: Config = toml::from_str(include_str!("../../storage/config.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.service.timeout_secs, None);
        assert!(std::path::Path::new(&config.store.root_dir).starts_with(std::env::temp_dir()));
    }

    #[test]
    fn load_fails_on_missing_or_broken_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("absent.toml");
        assert!(matches!(Config::load(&missing), Err(AppError::Io(_))));

        let broken = tmp.path().join("broken.toml");
        fs::write(&broken, "[service\nbase_url = 1").unwrap();
        assert!(matches!(Config::load(&broken), Err(AppError::Toml(_))));

        // The lenient loader still yields a usable configuration.
        assert!(Config::load_or_default(&broken).validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [service]
            base_url = "http://scanner:8000"

            [ingest]
            enforce_max_size = true
            "#,
        )
        .unwrap();
        assert_eq!(config.service.base_url, "http://scanner:8000");
        assert_eq!(config.service.predict_path, "/predict");
        assert!(config.ingest.enforce_max_size);
        assert_eq!(config.ingest.max_file_bytes, 10 * 1024 * 1024);
        assert_eq!(config.store.key, "analysisResults");
        assert_eq!(config.training.tick_ms, 500);
    }
}
