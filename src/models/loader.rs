//! Serialized model bundle loader

use crate::models::bundle::ModelBundle;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Reads and writes model bundles in the artifact format.
///
/// The on-disk body is JSON; callers treat it as an opaque blob.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelLoader;

impl ModelLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a bundle from a file
    pub fn load_object<P: AsRef<Path>>(&self, path: P) -> Result<ModelBundle> {
        let path = path.as_ref();

        info!(path = %path.display(), "Loading model object");

        let bytes =
            fs::read(path).with_context(|| format!("Failed to read model from {:?}", path))?;
        self.load_from_bytes(&bytes, &path.display().to_string())
    }

    /// Deserialize a bundle already held in memory; `origin` only feeds error messages
    pub fn load_from_bytes(&self, bytes: &[u8], origin: &str) -> Result<ModelBundle> {
        let bundle: ModelBundle = serde_json::from_slice(bytes)
            .with_context(|| format!("Failed to deserialize model object from {}", origin))?;
        bundle
            .model()
            .validate()
            .with_context(|| format!("Failed to deserialize model object from {}", origin))?;

        info!(
            origin = %origin,
            bytes = bytes.len(),
            classes = ?bundle.model().classes(),
            "Model object loaded successfully"
        );
        Ok(bundle)
    }

    /// Write a bundle, creating parent directories as needed
    pub fn save_object<P: AsRef<Path>>(&self, path: P, bundle: &ModelBundle) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let bytes = serde_json::to_vec(bundle).context("Failed to serialize model object")?;
        fs::write(path, bytes).with_context(|| format!("Failed to write model to {:?}", path))?;

        info!(path = %path.display(), "Saved model object");
        Ok(())
    }
}
