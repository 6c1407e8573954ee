//! Error kinds raised at the points where a prediction can fail.
//!
//! Public operations return `anyhow::Result` and attach context at every
//! boundary; these types sit at the bottom of the cause chain so callers can
//! `downcast_ref` when they need to tell failures apart.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while deciding which model artifact to load
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("artifact directory not found for local model fallback: {}", .0.display())]
    ArtifactRootMissing(PathBuf),

    #[error("No local trained model found in {}/*/{}", root.display(), relative.display())]
    NoLocalModel { root: PathBuf, relative: PathBuf },

    #[error("model s3://{bucket}/{key} is not present in remote storage")]
    RemoteModelMissing { bucket: String, key: String },

    #[error("remote storage returned HTTP {status} for s3://{bucket}/{key}")]
    RemoteFetch {
        bucket: String,
        key: String,
        status: u16,
    },
}

/// Failures while building or consuming a tabular frame
#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("column '{0}' expected by the transform is missing from the frame")]
    MissingColumn(String),

    #[error("column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("model expects {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("frame has no rows")]
    Empty,
}
