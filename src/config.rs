//! Configuration management for the prediction pipeline

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default location of the optional configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub artifacts: ArtifactsConfig,
    pub remote: RemoteConfig,
    pub credentials: CredentialsConfig,
    pub logging: LoggingConfig,
}

/// Local artifact layout written by the training pipeline
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Directory holding one subdirectory per training run
    pub root_dir: PathBuf,
    /// Path of the serialized model inside a training run directory
    pub model_relative_path: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("artifact"),
            model_relative_path: PathBuf::from("model_trainer/trained_model/model.pkl"),
        }
    }
}

/// Remote object storage holding the promoted model
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteConfig {
    /// Bucket name
    pub bucket_name: String,
    /// Object key of the serialized model
    pub model_key: String,
    /// Storage region used for request signing
    pub region: String,
    /// Endpoint override (MinIO, localstack); defaults to the regional S3 host
    pub endpoint: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            bucket_name: "my-model-mlopsproj".to_string(),
            model_key: "model.pkl".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
            timeout_secs: 30,
        }
    }
}

impl RemoteConfig {
    /// Base URL requests are sent to (path-style addressing)
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://s3.{}.amazonaws.com", self.region),
        }
    }
}

/// Names of the environment variables carrying storage credentials
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CredentialsConfig {
    pub access_key_env: String,
    pub secret_key_env: String,
    pub session_token_env: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            access_key_env: "AWS_ACCESS_KEY_ID".to_string(),
            secret_key_env: "AWS_SECRET_ACCESS_KEY".to_string(),
            session_token_env: "AWS_SESSION_TOKEN".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file, if present
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path.
    ///
    /// The file is optional; `VEHICLE__SECTION__KEY` environment variables
    /// override anything it sets.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(Environment::with_prefix("VEHICLE").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
