//! Fitted column transformer applied before the classifier.
//!
//! Mirrors how the training pipeline prepared features: a few numeric
//! columns are scaled with parameters learned at fit time, every other
//! column is passed through untouched (or dropped). Output columns are the
//! scaled ones in step order followed by the remainder in frame order.

use crate::error::FrameError;
use crate::models::bundle::Transform;
use crate::types::frame::DataFrame;
use anyhow::Result;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-column scaling learned during training
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard { mean: f64, scale: f64 },
    /// `x * scale + min`, i.e. the fitted range mapped onto [0, 1]
    MinMax { min: f64, scale: f64 },
}

impl Scaler {
    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            // zero variance columns were fit with a unit scale
            Scaler::Standard { mean, scale } if scale == 0.0 => x - mean,
            Scaler::Standard { mean, scale } => (x - mean) / scale,
            Scaler::MinMax { min, scale } => x * scale + min,
        }
    }
}

/// A scaler bound to the column it was fit on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnScaler {
    pub column: String,
    pub scaler: Scaler,
}

impl ColumnScaler {
    pub fn new(column: impl Into<String>, scaler: Scaler) -> Self {
        Self {
            column: column.into(),
            scaler,
        }
    }
}

/// What happens to columns no scaler claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Remainder {
    #[default]
    Passthrough,
    Drop,
}

/// Fitted preprocessing object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    pub scalers: Vec<ColumnScaler>,
    #[serde(default)]
    pub remainder: Remainder,
}

impl Preprocessor {
    pub fn new(scalers: Vec<ColumnScaler>, remainder: Remainder) -> Self {
        Self { scalers, remainder }
    }

    /// Names of the produced features, in output order
    pub fn feature_names(&self, frame: &DataFrame) -> Result<Vec<String>, FrameError> {
        let mut names = Vec::with_capacity(frame.n_cols());

        for step in &self.scalers {
            if frame.column(&step.column).is_none() {
                return Err(FrameError::MissingColumn(step.column.clone()));
            }
            names.push(step.column.clone());
        }

        if self.remainder == Remainder::Passthrough {
            names.extend(
                frame
                    .column_names()
                    .into_iter()
                    .filter(|name| !self.is_scaled(name))
                    .map(String::from),
            );
        }

        Ok(names)
    }

    fn is_scaled(&self, name: &str) -> bool {
        self.scalers.iter().any(|s| s.column == name)
    }
}

impl Transform for Preprocessor {
    fn transform(&self, frame: &DataFrame) -> Result<Array2<f64>> {
        let names = self.feature_names(frame)?;
        let rows = frame.n_rows();
        let mut features = Array2::zeros((rows, names.len()));

        for (j, name) in names.iter().enumerate() {
            let column = frame
                .column(name)
                .ok_or_else(|| FrameError::MissingColumn(name.clone()))?;
            let scaler = self
                .scalers
                .iter()
                .find(|s| &s.column == name)
                .map(|s| s.scaler);

            for (i, value) in column.values.iter().enumerate() {
                let x = value.as_f64();
                features[[i, j]] = scaler.map_or(x, |s| s.apply(x));
            }
        }

        debug!(
            rows = rows,
            features = names.len(),
            "Applied preprocessing transform"
        );
        Ok(features)
    }
}
