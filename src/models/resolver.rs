//! Chooses which trained model serves a prediction.
//!
//! With storage credentials in the environment the promoted model in the
//! configured bucket is used and the local filesystem is never consulted.
//! Without them the newest local training run that produced a model
//! artifact is used. Resolution happens again on every call.

use crate::config::{AppConfig, ArtifactsConfig, CredentialsConfig, RemoteConfig};
use crate::error::ResolveError;
use crate::models::loader::ModelLoader;
use crate::storage::{Credentials, EnvSource, ProcessEnv, RemoteModel, S3Connector, StoreConnector};
use crate::types::frame::DataFrame;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

/// Where the model for a call comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    Remote { bucket: String, key: String },
    Local { path: PathBuf },
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSource::Remote { bucket, key } => write!(f, "s3://{}/{}", bucket, key),
            ModelSource::Local { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Newest immediate subdirectory of `root` that contains `relative`.
///
/// Subdirectories are ordered by modification time, newest first; equal
/// times fall back to the directory name, highest first.
pub fn find_latest_model(root: &Path, relative: &Path) -> Result<PathBuf> {
    if !root.is_dir() {
        return Err(ResolveError::ArtifactRootMissing(root.to_path_buf()).into());
    }

    let mut runs: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("Failed to list {:?}", root))? {
        let path = entry
            .with_context(|| format!("Failed to read entry of {:?}", root))?
            .path();
        if !path.is_dir() {
            continue;
        }
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to read modification time of {:?}", path))?;
        runs.push((modified, path));
    }

    runs.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));

    for (modified, run) in &runs {
        let candidate = run.join(relative);
        if candidate.exists() {
            let modified: DateTime<Utc> = (*modified).into();
            debug!(
                run = %run.display(),
                modified = %modified.to_rfc3339(),
                "Selected newest training run with a model"
            );
            return Ok(candidate);
        }
        debug!(run = %run.display(), "Training run has no model artifact, skipping");
    }

    Err(ResolveError::NoLocalModel {
        root: root.to_path_buf(),
        relative: relative.parent().unwrap_or(relative).to_path_buf(),
    }
    .into())
}

/// Prediction entry point that picks the remote or local model per call
pub struct ModelResolver {
    artifacts: ArtifactsConfig,
    remote: RemoteConfig,
    credentials: CredentialsConfig,
    env: Box<dyn EnvSource>,
    connector: Box<dyn StoreConnector>,
    loader: ModelLoader,
}

impl ModelResolver {
    /// Resolver reading the process environment and talking to S3
    pub fn new(config: &AppConfig) -> Self {
        Self::with_sources(
            config,
            ProcessEnv,
            S3Connector::new(config.remote.clone()),
        )
    }

    /// Resolver with explicit environment and storage backends
    pub fn with_sources(
        config: &AppConfig,
        env: impl EnvSource + 'static,
        connector: impl StoreConnector + 'static,
    ) -> Self {
        Self {
            artifacts: config.artifacts.clone(),
            remote: config.remote.clone(),
            credentials: config.credentials.clone(),
            env: Box::new(env),
            connector: Box::new(connector),
            loader: ModelLoader::new(),
        }
    }

    fn lookup_credentials(&self) -> Option<Credentials> {
        Credentials::from_env(&*self.env, &self.credentials)
    }

    /// Decide the model source without loading anything
    pub fn resolve(&self) -> Result<ModelSource> {
        if self.lookup_credentials().is_some() {
            return Ok(self.remote_source());
        }

        let path = find_latest_model(&self.artifacts.root_dir, &self.artifacts.model_relative_path)?;
        Ok(ModelSource::Local { path })
    }

    fn remote_source(&self) -> ModelSource {
        ModelSource::Remote {
            bucket: self.remote.bucket_name.clone(),
            key: self.remote.model_key.clone(),
        }
    }

    /// Resolve the model and predict one label per frame row
    pub fn predict(&self, frame: &DataFrame) -> Result<Vec<i64>> {
        info!(rows = frame.n_rows(), "Entered predict method of ModelResolver");

        let result = match self.lookup_credentials() {
            Some(credentials) => {
                info!("Storage credentials found; using remote model for prediction");
                self.predict_remote(credentials, frame)
            }
            None => {
                info!("Storage credentials missing; loading latest local trained model");
                self.predict_local(frame)
            }
        };

        result.context("Error in ModelResolver predict")
    }

    fn predict_remote(&self, credentials: Credentials, frame: &DataFrame) -> Result<Vec<i64>> {
        let store = self
            .connector
            .connect(credentials)
            .context("Failed to connect to remote storage")?;

        RemoteModel::new(store, &self.remote.bucket_name, &self.remote.model_key).predict(frame)
    }

    fn predict_local(&self, frame: &DataFrame) -> Result<Vec<i64>> {
        let path = find_latest_model(&self.artifacts.root_dir, &self.artifacts.model_relative_path)?;

        info!(path = %path.display(), "Loading local model");
        let bundle = self.loader.load_object(&path)?;
        bundle.predict(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_source_display() {
        let remote = ModelSource::Remote {
            bucket: "my-model-mlopsproj".to_string(),
            key: "model.pkl".to_string(),
        };
        assert_eq!(remote.to_string(), "s3://my-model-mlopsproj/model.pkl");
    }

    #[test]
    fn test_missing_root_is_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("artifact");

        let err = find_latest_model(&root, Path::new("model_trainer/trained_model/model.pkl"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolveError>(),
            Some(ResolveError::ArtifactRootMissing(path)) if *path == root
        ));
    }

    #[test]
    fn test_no_run_with_model() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("01_01_2025_00_00_00/data_ingestion")).unwrap();
        fs::write(dir.path().join("stray.txt"), b"not a run").unwrap();

        let err = find_latest_model(dir.path(), Path::new("model_trainer/trained_model/model.pkl"))
            .unwrap_err();
        assert!(err.to_string().starts_with("No local trained model found in"));
        assert!(err.to_string().ends_with("model_trainer/trained_model"));
    }
}
