//! Memory estimation for a single model variant.
//!
//! ```text
//! total = weights + kv_cache + runtime_overhead
//!
//! weights          = size_gb × allowance            (size known)
//!                  = params_b × bytes/param × allowance (fallback)
//! kv_cache         = (context / 1024) × kv_gb_per_1k_tokens(params_b)
//! runtime_overhead = clamp(base + params_b × per_param, min, max)
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{KvCacheConfig, KvStep, OverheadConfig, WeightsConfig};
use crate::quant::size_for_quant;
use crate::variant::ModelVariant;

/// Memory breakdown for one variant at one context length, in GB.
///
/// `total_gb` is always the exact sum of the three terms; no rounding is
/// applied until display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryEstimate {
    /// Context length (tokens) the KV term was computed for
    pub context: u32,
    pub weights_gb: f64,
    pub kv_cache_gb: f64,
    pub runtime_overhead_gb: f64,
    pub total_gb: f64,
}

impl MemoryEstimate {
    pub fn new(context: u32, weights_gb: f64, kv_cache_gb: f64, runtime_overhead_gb: f64) -> Self {
        Self {
            context,
            weights_gb,
            kv_cache_gb,
            runtime_overhead_gb,
            total_gb: weights_gb + kv_cache_gb + runtime_overhead_gb,
        }
    }
}

/// Strategy for the per-token KV-cache cost of a model.
///
/// The bundled [`StepKvCacheModel`] only looks at parameter count; an
/// architecture-aware implementation (layers × kv-heads × head-dim) can be
/// dropped in without touching callers.
pub trait KvCacheModel: Send + Sync {
    /// KV-cache size in GB per 1024 tokens of context.
    fn gb_per_1k_tokens(&self, params_b: f64) -> f64;
}

/// Coarse step function over parameter count, approximating
/// grouped-query-attention models with an fp16 cache.
#[derive(Debug, Clone, PartialEq)]
pub struct StepKvCacheModel {
    steps: Vec<KvStep>,
    above_gb_per_1k_tokens: f64,
}

impl StepKvCacheModel {
    pub fn new(config: &KvCacheConfig) -> Self {
        Self {
            steps: config.steps.clone(),
            above_gb_per_1k_tokens: config.above_gb_per_1k_tokens,
        }
    }
}

impl Default for StepKvCacheModel {
    fn default() -> Self {
        Self::new(&KvCacheConfig::default())
    }
}

impl KvCacheModel for StepKvCacheModel {
    fn gb_per_1k_tokens(&self, params_b: f64) -> f64 {
        self.steps
            .iter()
            .find(|step| params_b <= step.max_params_b)
            .map(|step| step.gb_per_1k_tokens)
            .unwrap_or(self.above_gb_per_1k_tokens)
    }
}

/// Computes [`MemoryEstimate`]s.
#[derive(Debug, Clone)]
pub struct MemoryEstimator<K = StepKvCacheModel> {
    weights: WeightsConfig,
    overhead: OverheadConfig,
    default_context_cap: u32,
    kv_model: K,
}

impl Default for MemoryEstimator<StepKvCacheModel> {
    fn default() -> Self {
        let kv = KvCacheConfig::default();
        Self::new(
            WeightsConfig::default(),
            OverheadConfig::default(),
            &kv,
            StepKvCacheModel::new(&kv),
        )
    }
}

impl<K: KvCacheModel> MemoryEstimator<K> {
    pub fn new(
        weights: WeightsConfig,
        overhead: OverheadConfig,
        kv_cache: &KvCacheConfig,
        kv_model: K,
    ) -> Self {
        Self {
            weights,
            overhead,
            default_context_cap: kv_cache.default_context_cap,
            kv_model,
        }
    }

    pub fn kv_model(&self) -> &K {
        &self.kv_model
    }

    /// Estimate memory for `variant`.
    ///
    /// Without an override the variant's native context is capped at
    /// `kv_cache.default_context_cap`. An explicit override is used as-is.
    pub fn estimate(&self, variant: &ModelVariant, context_override: Option<u32>) -> MemoryEstimate {
        let variant = variant.sanitized();
        let context = self.effective_context(&variant, context_override);

        let estimate = MemoryEstimate::new(
            context,
            self.weights_gb(&variant),
            self.kv_cache_gb(variant.params_b, context),
            self.overhead_gb(variant.params_b),
        );

        tracing::debug!(
            variant = %variant.id,
            quant = %variant.quant,
            context,
            weights_gb = estimate.weights_gb,
            kv_cache_gb = estimate.kv_cache_gb,
            overhead_gb = estimate.runtime_overhead_gb,
            total_gb = estimate.total_gb,
            "memory estimate"
        );

        estimate
    }

    pub fn effective_context(&self, variant: &ModelVariant, context_override: Option<u32>) -> u32 {
        context_override.unwrap_or_else(|| variant.context.min(self.default_context_cap))
    }

    /// Weights term; prefers the on-disk size when the variant has one.
    pub fn weights_gb(&self, variant: &ModelVariant) -> f64 {
        let raw = if variant.has_size() {
            variant.size_gb
        } else {
            size_for_quant(variant.params_b.max(0.0), variant.quant)
        };
        raw * self.weights.metadata_allowance
    }

    pub fn kv_cache_gb(&self, params_b: f64, context: u32) -> f64 {
        (f64::from(context) / 1024.0) * self.kv_model.gb_per_1k_tokens(params_b)
    }

    /// Runtime overhead, clamped to `[min_gb, max_gb]`.
    pub fn overhead_gb(&self, params_b: f64) -> f64 {
        let o = &self.overhead;
        (o.base_gb + params_b * o.per_param_gb)
            .max(o.min_gb)
            .min(o.max_gb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quant::QuantKey;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_total_is_exact_sum() {
        let estimator = MemoryEstimator::default();
        for params in [0.0, 0.5, 1.5, 7.0, 13.0, 34.0, 70.0, 180.0, 405.0] {
            for key in QuantKey::ALL {
                let v = ModelVariant::new("v", params, 0.0, key, 32768);
                let e = estimator.estimate(&v, None);
                assert_eq!(e.total_gb, e.weights_gb + e.kv_cache_gb + e.runtime_overhead_gb);
            }
        }
    }

    #[test]
    fn test_weights_prefers_disk_size() {
        let estimator = MemoryEstimator::default();
        let v = ModelVariant::new("mistral-7b", 7.0, 4.7, QuantKey::Q4KM, 8192);
        assert!(approx(estimator.weights_gb(&v), 4.935));
    }

    #[test]
    fn test_weights_falls_back_to_quant_size() {
        let estimator = MemoryEstimator::default();
        let v = ModelVariant::new("no-size", 10.0, 0.0, QuantKey::Q8, 8192);
        // 10 × 1.05 × 1.05
        assert!(approx(estimator.weights_gb(&v), 11.025));
    }

    #[test]
    fn test_context_capped_without_override() {
        let estimator = MemoryEstimator::default();
        let v = ModelVariant::new("long", 8.0, 4.9, QuantKey::Q4KM, 131_072);
        assert_eq!(estimator.estimate(&v, None).context, 8192);
        assert_eq!(estimator.estimate(&v, Some(32768)).context, 32768);

        let short = ModelVariant::new("short", 8.0, 4.9, QuantKey::Q4KM, 2048);
        assert_eq!(estimator.estimate(&short, None).context, 2048);
    }

    #[test]
    fn test_override_is_not_capped() {
        let estimator = MemoryEstimator::default();
        let v = ModelVariant::new("v", 8.0, 4.9, QuantKey::Q4KM, 4096);
        let e = estimator.estimate(&v, Some(65536));
        assert!(approx(e.kv_cache_gb, 64.0 * 0.125));
    }

    #[test]
    fn test_kv_step_function_breakpoints() {
        let kv = StepKvCacheModel::default();
        assert_eq!(kv.gb_per_1k_tokens(0.0), 0.03);
        assert_eq!(kv.gb_per_1k_tokens(1.0), 0.03);
        assert_eq!(kv.gb_per_1k_tokens(1.1), 0.06);
        assert_eq!(kv.gb_per_1k_tokens(8.0), 0.125);
        assert_eq!(kv.gb_per_1k_tokens(13.0), 0.19);
        assert_eq!(kv.gb_per_1k_tokens(32.0), 0.25);
        assert_eq!(kv.gb_per_1k_tokens(70.0), 0.32);
        assert_eq!(kv.gb_per_1k_tokens(200.0), 0.5);
        assert_eq!(kv.gb_per_1k_tokens(405.0), 0.8);
    }

    #[test]
    fn test_kv_step_function_monotonic() {
        let kv = StepKvCacheModel::default();
        let mut last = 0.0;
        let mut params = 0.0;
        while params < 500.0 {
            let cost = kv.gb_per_1k_tokens(params);
            assert!(cost >= last, "{params}B: {cost} < {last}");
            last = cost;
            params += 0.25;
        }
    }

    #[test]
    fn test_overhead_clamped() {
        let estimator = MemoryEstimator::default();
        assert!(approx(estimator.overhead_gb(7.0), 1.48));
        assert_eq!(estimator.overhead_gb(0.0), 1.2);
        assert_eq!(estimator.overhead_gb(405.0), 6.0);

        let low = MemoryEstimator::new(
            WeightsConfig::default(),
            OverheadConfig {
                base_gb: 0.2,
                ..OverheadConfig::default()
            },
            &KvCacheConfig::default(),
            StepKvCacheModel::default(),
        );
        assert_eq!(low.overhead_gb(0.0), 1.0);
    }

    #[test]
    fn test_zero_params_is_finite_and_non_negative() {
        let estimator = MemoryEstimator::default();
        let v = ModelVariant::new("embedder", 0.0, 0.0, QuantKey::F16, 512);
        let e = estimator.estimate(&v, None);
        for value in [e.weights_gb, e.kv_cache_gb, e.runtime_overhead_gb, e.total_gb] {
            assert!(value.is_finite() && value >= 0.0);
        }
        assert!(e.runtime_overhead_gb >= 1.0 && e.runtime_overhead_gb <= 6.0);
    }

    #[test]
    fn test_invalid_inputs_clamped() {
        let estimator = MemoryEstimator::default();
        let v = ModelVariant::new("bad", -7.0, -4.0, QuantKey::Q4KM, 4096);
        let e = estimator.estimate(&v, None);
        assert_eq!(e.weights_gb, 0.0);
        assert!(e.kv_cache_gb >= 0.0);
        assert_eq!(e.runtime_overhead_gb, 1.2);

        let nan = ModelVariant::new("nan", f64::NAN, f64::NAN, QuantKey::Q4KM, 4096);
        let e = estimator.estimate(&nan, None);
        assert!(e.total_gb.is_finite());
    }

    struct FlatKv(f64);

    impl KvCacheModel for FlatKv {
        fn gb_per_1k_tokens(&self, _params_b: f64) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_custom_kv_model() {
        let estimator = MemoryEstimator::new(
            WeightsConfig::default(),
            OverheadConfig::default(),
            &KvCacheConfig::default(),
            FlatKv(1.0),
        );
        let v = ModelVariant::new("v", 70.0, 40.0, QuantKey::Q4KM, 4096);
        assert_eq!(estimator.estimate(&v, None).kv_cache_gb, 4.0);
    }
}
