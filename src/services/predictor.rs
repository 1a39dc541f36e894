use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::core::{PredictionError, Predictor};

/// Errors that can occur when loading a model artifact
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("model artifact is invalid: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model artifact is inconsistent: {0}")]
    Inconsistent(String),
}

/// Linear scoring model deserialized from a JSON artifact
///
/// Training happens offline; this service only consumes the result. The
/// artifact carries the feature columns in matrix order, one weight per
/// column, and an intercept:
///
/// ```json
/// {
///   "feature_columns": ["Calif promedio playas", "Calif promedio museos"],
///   "weights": [0.6, 0.4],
///   "intercept": 0.1
/// }
/// ```
///
/// Loaded once at startup and treated as immutable for the process
/// lifetime; hot reload is out of scope.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    feature_columns: Vec<String>,
    weights: Vec<f64>,
    #[serde(default)]
    intercept: f64,
}

impl LinearModel {
    /// Load and validate a model artifact
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path)?;
        let model: LinearModel = serde_json::from_str(&raw)?;

        if model.weights.len() != model.feature_columns.len() {
            return Err(ModelError::Inconsistent(format!(
                "{} weights for {} feature columns",
                model.weights.len(),
                model.feature_columns.len()
            )));
        }

        Ok(model)
    }

    #[cfg(test)]
    pub fn from_parts(feature_columns: Vec<String>, weights: Vec<f64>, intercept: f64) -> Self {
        Self {
            feature_columns,
            weights,
            intercept,
        }
    }
}

impl Predictor for LinearModel {
    fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    fn predict(&self, matrix: &[Vec<f64>]) -> Result<Vec<f64>, PredictionError> {
        matrix
            .iter()
            .map(|row| {
                if row.len() != self.weights.len() {
                    return Err(PredictionError(format!(
                        "row has {} values, model expects {}",
                        row.len(),
                        self.weights.len()
                    )));
                }
                Ok(self.intercept
                    + row
                        .iter()
                        .zip(&self.weights)
                        .map(|(value, weight)| value * weight)
                        .sum::<f64>())
            })
            .collect()
    }
}
