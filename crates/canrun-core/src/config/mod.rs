//! Estimator configuration.
//!
//! Every numeric constant the estimator uses lives here, grouped by the
//! component that consumes it. `Default` carries the fitted values; files
//! loaded through [`EstimatorConfig::load`] only need to name the fields
//! they override, since every section is `#[serde(default)]`.
//!
//! ## Example
//!
//! ```toml
//! [overhead]
//! base_gb = 1.0
//!
//! [verdict]
//! comfortable_gb = 3.0
//! ```

pub mod loader;

pub use loader::{
    ConfigError, ConfigResult, detect_format, env_overrides, load_config, load_layered,
    load_with_env,
};

use config::Environment;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FitError, FitResult};
use crate::platform::PlatformClass;
use crate::verdict::{COMFORTABLE_HEADROOM_GB, MAYBE_HEADROOM_GB, TIGHT_HEADROOM_GB};

/// Environment prefix for overrides, e.g. `CANRUN_VERDICT__TIGHT_GB=1.0`
pub const ENV_PREFIX: &str = "CANRUN";

/// Top-level estimator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub weights: WeightsConfig,
    pub kv_cache: KvCacheConfig,
    pub overhead: OverheadConfig,
    pub platform: PlatformConfig,
    pub verdict: VerdictThresholds,
    pub matrix: MatrixConfig,
}

/// Weights term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightsConfig {
    /// Multiplier applied to the weight size for GGUF metadata and tensor
    /// alignment padding.
    pub metadata_allowance: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            metadata_allowance: 1.05,
        }
    }
}

/// One step of the KV-cache step function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KvStep {
    /// Inclusive upper bound in billions of parameters
    pub max_params_b: f64,
    /// Cache cost in GB per 1024 tokens of context
    pub gb_per_1k_tokens: f64,
}

impl KvStep {
    pub const fn new(max_params_b: f64, gb_per_1k_tokens: f64) -> Self {
        Self {
            max_params_b,
            gb_per_1k_tokens,
        }
    }
}

/// KV-cache term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KvCacheConfig {
    /// Cap applied to a variant's native context when no override is given.
    /// Keeps the default estimate from assuming a full 128k window.
    pub default_context_cap: u32,
    /// Ascending breakpoints. Values approximate fp16 caches of
    /// grouped-query-attention models of each size class.
    pub steps: Vec<KvStep>,
    /// Cost above the last breakpoint
    pub above_gb_per_1k_tokens: f64,
}

impl Default for KvCacheConfig {
    fn default() -> Self {
        Self {
            default_context_cap: 8192,
            steps: vec![
                KvStep::new(1.0, 0.03),
                KvStep::new(3.0, 0.06),
                KvStep::new(8.0, 0.125),
                KvStep::new(14.0, 0.19),
                KvStep::new(35.0, 0.25),
                KvStep::new(72.0, 0.32),
                KvStep::new(200.0, 0.5),
            ],
            above_gb_per_1k_tokens: 0.8,
        }
    }
}

/// Runtime overhead term: `clamp(base_gb + params_b × per_param_gb, min_gb, max_gb)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverheadConfig {
    /// Fixed runtime cost (backend context, compute buffers)
    pub base_gb: f64,
    /// Compute-buffer allowance per billion parameters
    pub per_param_gb: f64,
    pub min_gb: f64,
    pub max_gb: f64,
}

impl Default for OverheadConfig {
    fn default() -> Self {
        Self {
            base_gb: 1.2,
            per_param_gb: 0.04,
            min_gb: 1.0,
            max_gb: 6.0,
        }
    }
}

/// Memory the operating system and background processes are expected to
/// hold on to, for one platform class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReserveProfile {
    pub base_reserve_gb: f64,
    /// Fraction of total RAM reserved on top of the base
    pub reserve_fraction: f64,
}

impl ReserveProfile {
    pub const fn new(base_reserve_gb: f64, reserve_fraction: f64) -> Self {
        Self {
            base_reserve_gb,
            reserve_fraction,
        }
    }
}

/// Platform reserve model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub min_reserve_gb: f64,
    pub max_reserve_gb: f64,
    /// Floor for usable memory so verdicts never degenerate
    pub min_usable_gb: f64,
    pub linux_like: ReserveProfile,
    pub macos_like: ReserveProfile,
    pub windows_like: ReserveProfile,
    pub mobile: ReserveProfile,
    pub unknown: ReserveProfile,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            min_reserve_gb: 2.5,
            max_reserve_gb: 16.0,
            min_usable_gb: 1.0,
            linux_like: ReserveProfile::new(1.0, 0.10),
            macos_like: ReserveProfile::new(2.0, 0.15),
            windows_like: ReserveProfile::new(2.5, 0.18),
            mobile: ReserveProfile::new(2.0, 0.30),
            unknown: ReserveProfile::new(2.0, 0.15),
        }
    }
}

impl PlatformConfig {
    pub fn profile(&self, class: PlatformClass) -> ReserveProfile {
        match class {
            PlatformClass::LinuxLike => self.linux_like,
            PlatformClass::MacosLike => self.macos_like,
            PlatformClass::WindowsLike => self.windows_like,
            PlatformClass::Mobile => self.mobile,
            PlatformClass::Unknown => self.unknown,
        }
    }
}

/// Inclusive lower headroom bounds (GB) for each verdict, evaluated top-down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdictThresholds {
    pub comfortable_gb: f64,
    pub tight_gb: f64,
    pub maybe_gb: f64,
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            comfortable_gb: COMFORTABLE_HEADROOM_GB,
            tight_gb: TIGHT_HEADROOM_GB,
            maybe_gb: MAYBE_HEADROOM_GB,
        }
    }
}

/// Quantization matrix defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Context used for matrix cells when the caller gives none
    pub default_context: u32,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            default_context: 4096,
        }
    }
}

impl EstimatorConfig {
    /// Load a config file (yaml, toml, json or json5) with `CANRUN_*`
    /// environment overrides, then validate it.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::from_sources(Some(path.as_ref()), env_overrides(ENV_PREFIX))
    }

    /// Defaults with `CANRUN_*` environment overrides, validated.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_sources(None, env_overrides(ENV_PREFIX))
    }

    /// Layer `env` over an optional file, then validate.
    pub fn from_sources(path: Option<&Path>, env: Environment) -> ConfigResult<Self> {
        let config: Self = load_layered(path, env)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is internally consistent.
    pub fn validate(&self) -> FitResult<()> {
        let allowance = self.weights.metadata_allowance;
        if !allowance.is_finite() || allowance <= 0.0 {
            return invalid(format!(
                "weights.metadata_allowance must be > 0, got {allowance}"
            ));
        }

        self.validate_kv_cache()?;

        let o = &self.overhead;
        if ![o.base_gb, o.per_param_gb, o.min_gb, o.max_gb]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
        {
            return invalid("overhead values must be finite and >= 0".to_string());
        }
        if o.min_gb > o.max_gb {
            return invalid(format!(
                "overhead.min_gb ({}) exceeds overhead.max_gb ({})",
                o.min_gb, o.max_gb
            ));
        }

        let p = &self.platform;
        if ![p.min_reserve_gb, p.max_reserve_gb, p.min_usable_gb]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
        {
            return invalid("platform reserve bounds must be finite and >= 0".to_string());
        }
        if p.min_reserve_gb > p.max_reserve_gb {
            return invalid(format!(
                "platform.min_reserve_gb ({}) exceeds platform.max_reserve_gb ({})",
                p.min_reserve_gb, p.max_reserve_gb
            ));
        }
        for class in PlatformClass::ALL {
            let profile = p.profile(class);
            if !profile.base_reserve_gb.is_finite() || profile.base_reserve_gb < 0.0 {
                return invalid(format!("{class}: base_reserve_gb must be >= 0"));
            }
            if !(0.0..=1.0).contains(&profile.reserve_fraction) {
                return invalid(format!("{class}: reserve_fraction must be within [0, 1]"));
            }
        }

        let v = &self.verdict;
        if ![v.comfortable_gb, v.tight_gb, v.maybe_gb]
            .iter()
            .all(|t| t.is_finite())
        {
            return invalid("verdict thresholds must be finite".to_string());
        }
        if !(v.comfortable_gb > v.tight_gb && v.tight_gb > v.maybe_gb) {
            return invalid(format!(
                "verdict thresholds must descend: comfortable {} > tight {} > maybe {}",
                v.comfortable_gb, v.tight_gb, v.maybe_gb
            ));
        }

        if self.matrix.default_context == 0 {
            return invalid("matrix.default_context must be > 0".to_string());
        }

        Ok(())
    }

    fn validate_kv_cache(&self) -> FitResult<()> {
        let kv = &self.kv_cache;
        if kv.default_context_cap == 0 {
            return invalid("kv_cache.default_context_cap must be > 0".to_string());
        }

        let costs: Vec<f64> = kv
            .steps
            .iter()
            .map(|s| s.gb_per_1k_tokens)
            .chain(std::iter::once(kv.above_gb_per_1k_tokens))
            .collect();
        if !costs.iter().all(|c| c.is_finite() && *c >= 0.0) {
            return invalid("kv_cache costs must be finite and >= 0".to_string());
        }
        if !costs.windows(2).all(|w| w[0] < w[1]) {
            return invalid("kv_cache costs must strictly increase with model size".to_string());
        }
        if !kv.steps.iter().all(|s| s.max_params_b.is_finite()) {
            return invalid("kv_cache breakpoints must be finite".to_string());
        }
        if !kv.steps.windows(2).all(|w| w[0].max_params_b < w[1].max_params_b) {
            return invalid("kv_cache breakpoints must be strictly ascending".to_string());
        }
        Ok(())
    }
}

fn invalid(reason: String) -> FitResult<()> {
    Err(FitError::InvalidConfig(reason))
}
