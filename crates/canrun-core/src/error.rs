//! Error types for feasibility estimation

use thiserror::Error;

/// Errors surfaced by the estimator API.
///
/// Invalid numeric variant fields are not represented here; they are clamped
/// to zero and reported through a `tracing` warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FitError {
    #[error("Unknown quantization '{0}'")]
    UnknownQuantization(String),

    #[error("Unknown platform class '{0}'")]
    UnknownPlatform(String),

    #[error("Invalid estimator configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for estimator operations
pub type FitResult<T> = Result<T, FitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            FitError::UnknownQuantization("Q9_X".into()).to_string(),
            "Unknown quantization 'Q9_X'"
        );
        assert_eq!(
            FitError::UnknownPlatform("amiga".into()).to_string(),
            "Unknown platform class 'amiga'"
        );
        assert_eq!(
            FitError::InvalidConfig("min > max".into()).to_string(),
            "Invalid estimator configuration: min > max"
        );
    }
}
