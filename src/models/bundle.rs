//! Preprocessing transform and trained classifier packaged as one unit

use crate::models::predictor::Classifier;
use crate::models::preprocess::Preprocessor;
use crate::types::frame::DataFrame;
use anyhow::{Context, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Maps a raw feature frame to the numeric matrix the model was trained on
pub trait Transform {
    fn transform(&self, frame: &DataFrame) -> Result<Array2<f64>>;
}

/// A fitted model exposing a single inference operation
pub trait Predict {
    /// One label per row of `features`
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<i64>>;
}

/// Fitted preprocessing object and trained model, serialized together.
///
/// The two halves must come from the same training run; nothing here checks
/// that beyond the feature count the classifier verifies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle<T = Preprocessor, P = Classifier> {
    preprocessing: T,
    model: P,
}

impl<T, P> ModelBundle<T, P> {
    pub fn new(preprocessing: T, model: P) -> Self {
        Self {
            preprocessing,
            model,
        }
    }

    pub fn preprocessing(&self) -> &T {
        &self.preprocessing
    }

    pub fn model(&self) -> &P {
        &self.model
    }
}

impl<T: Transform, P: Predict> ModelBundle<T, P> {
    /// Transform the frame, then run the classifier on the result
    pub fn predict(&self, frame: &DataFrame) -> Result<Vec<i64>> {
        info!(rows = frame.n_rows(), "Entered predict method of ModelBundle");

        let features = self
            .preprocessing
            .transform(frame)
            .context("Failed to apply preprocessing transform")?;

        let predictions = self
            .model
            .predict(&features)
            .context("Trained model failed to predict")?;

        info!(
            predictions = predictions.len(),
            "Exited predict method of ModelBundle"
        );
        Ok(predictions)
    }
}
