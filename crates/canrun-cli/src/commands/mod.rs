//! CLI command implementations

pub mod estimate;
pub mod host;
pub mod matrix;
pub mod quants;
pub mod recommend;
pub mod select;

use crate::error::CliError;
use canrun_core::{EstimatorConfig, FeasibilityEstimator};
use std::path::Path;

/// Build the estimator from `--config`, or the built-in defaults. `CANRUN_*`
/// environment overrides apply in both cases.
pub fn load_estimator(config: Option<&Path>) -> Result<FeasibilityEstimator, CliError> {
    let config = match config {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading estimator configuration");
            EstimatorConfig::load(path)?
        }
        None => EstimatorConfig::from_env()?,
    };
    Ok(FeasibilityEstimator::new(config))
}
