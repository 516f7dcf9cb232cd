//! # canrun-core
//!
//! Memory and feasibility estimation for running quantized language models
//! locally.
//!
//! Given a [`ModelVariant`] (parameter count, on-disk size, quantization,
//! context length) and the host's total RAM, the estimator produces a
//! [`MemoryEstimate`] breakdown and a discrete [`Verdict`]:
//!
//! | Verdict       | Headroom (usable − required) |
//! |---------------|------------------------------|
//! | `comfortable` | ≥ 2.0 GB                     |
//! | `tight`       | ≥ 0.5 GB                     |
//! | `maybe`       | ≥ −1.5 GB                    |
//! | `no`          | below −1.5 GB                |
//! | `unknown`     | no RAM figure supplied       |
//!
//! Every operation is a pure function over its inputs and the constant
//! tables in [`EstimatorConfig`]. Nothing here measures real memory usage;
//! the platform reserve model is a heuristic safety margin.
//!
//! ## Quick Start
//!
//! ```rust
//! use canrun_core::{FeasibilityEstimator, ModelVariant, PlatformClass, QuantKey, Verdict};
//!
//! let estimator = FeasibilityEstimator::default();
//! let variant = ModelVariant::new("llama-3-8b-q4", 7.0, 4.7, QuantKey::Q4KM, 8192);
//!
//! let assessment = estimator.assess(&variant, Some(16.0), PlatformClass::MacosLike);
//! assert!(matches!(assessment.verdict, Verdict::Comfortable | Verdict::Tight));
//! println!("{}", assessment.detail());
//! ```

pub mod config;
pub mod error;
pub mod estimator;
pub mod feasibility;
pub mod matrix;
pub mod platform;
pub mod quant;
pub mod selection;
pub mod variant;
pub mod verdict;

pub use config::{ConfigError, ConfigResult, EstimatorConfig, VerdictThresholds};
pub use error::{FitError, FitResult};
pub use estimator::{KvCacheModel, MemoryEstimate, MemoryEstimator, StepKvCacheModel};
pub use feasibility::FeasibilityEstimator;
pub use matrix::{CellVerdict, QuantMatrixRow};
pub use platform::{PlatformClass, UsableMemory};
pub use quant::{QuantConfig, QuantKey, size_for_quant};
pub use variant::{ModelVariant, VariantCatalog};
pub use verdict::{Assessment, Verdict};
