//! Training configuration loadable from JSON.

use crate::activator::Activator;
use crate::error::{Error, Result};

use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Network shape and learning parameters for a training run.
///
/// Missing fields take their default value, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// Node count of each hidden layer, in order.
    pub hidden: Vec<usize>,
    pub hidden_activator: Activator,
    pub output_activator: Activator,
    pub learning_rate: f64,
    pub momentum: f64,
    /// Lower bound handed to weight randomization.
    pub weight_low: f64,
    /// Upper bound handed to weight randomization.
    pub weight_high: f64,
    pub seed: u64,
    /// Number of passes over the training data.
    pub epochs: usize,
    /// When set, stop as soon as the epoch error drops below it instead of
    /// counting epochs.
    pub error_threshold: Option<f64>,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Hyperparameters {
            hidden: vec![3],
            hidden_activator: Activator::Sigmoid,
            output_activator: Activator::Sigmoid,
            learning_rate: 0.3,
            momentum: 0.2,
            weight_low: -0.05,
            weight_high: 0.05,
            seed: 1,
            epochs: 1000,
            error_threshold: None,
        }
    }
}

impl Hyperparameters {
    /// Parses hyperparameters from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Hyperparameters = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Reads hyperparameters from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Hyperparameters::from_json(&fs::read_to_string(path)?)
    }

    fn validate(&self) -> Result<()> {
        if self.weight_low >= self.weight_high {
            return Err(Error::InvalidHyperparameter(format!(
                "weight range [{}, {}) is empty",
                self.weight_low, self.weight_high
            )));
        }
        if let Some(threshold) = self.error_threshold {
            if !(threshold > 0.0) {
                return Err(Error::InvalidHyperparameter(format!(
                    "error threshold must be positive, got {}",
                    threshold
                )));
            }
        }
        Ok(())
    }
}
