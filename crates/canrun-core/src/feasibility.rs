//! Stateless facade tying the estimator components together.

use crate::config::EstimatorConfig;
use crate::estimator::{KvCacheModel, MemoryEstimate, MemoryEstimator, StepKvCacheModel};
use crate::platform::{PlatformClass, UsableMemory, usable_memory};
use crate::variant::ModelVariant;
use crate::verdict::{Assessment, classify};

/// Entry point for estimates, verdicts, matrices and selection.
///
/// Holds only immutable configuration, so one instance can be shared freely
/// across threads.
#[derive(Debug, Clone)]
pub struct FeasibilityEstimator<K = StepKvCacheModel> {
    config: EstimatorConfig,
    memory: MemoryEstimator<K>,
}

impl Default for FeasibilityEstimator<StepKvCacheModel> {
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}

impl FeasibilityEstimator<StepKvCacheModel> {
    /// Build an estimator using the step-function KV-cache model described
    /// by `config.kv_cache`.
    pub fn new(config: EstimatorConfig) -> Self {
        let kv_model = StepKvCacheModel::new(&config.kv_cache);
        Self::with_kv_model(config, kv_model)
    }
}

impl<K: KvCacheModel> FeasibilityEstimator<K> {
    /// Build an estimator with a custom KV-cache strategy.
    pub fn with_kv_model(config: EstimatorConfig, kv_model: K) -> Self {
        let memory = MemoryEstimator::new(
            config.weights.clone(),
            config.overhead.clone(),
            &config.kv_cache,
            kv_model,
        );
        Self { config, memory }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn memory_estimator(&self) -> &MemoryEstimator<K> {
        &self.memory
    }

    pub fn estimate(&self, variant: &ModelVariant, context_override: Option<u32>) -> MemoryEstimate {
        self.memory.estimate(variant, context_override)
    }

    pub fn usable_memory(&self, total_ram_gb: f64, platform: PlatformClass) -> UsableMemory {
        usable_memory(total_ram_gb, platform, &self.config.platform)
    }

    /// Classify an existing estimate.
    pub fn classify(
        &self,
        estimate: &MemoryEstimate,
        available_ram_gb: Option<f64>,
        platform: PlatformClass,
    ) -> Assessment {
        classify(
            estimate,
            available_ram_gb,
            platform,
            &self.config.platform,
            &self.config.verdict,
        )
    }

    /// Estimate `variant` at its default context and classify it.
    pub fn assess(
        &self,
        variant: &ModelVariant,
        available_ram_gb: Option<f64>,
        platform: PlatformClass,
    ) -> Assessment {
        self.assess_with_context(variant, None, available_ram_gb, platform)
    }

    pub fn assess_with_context(
        &self,
        variant: &ModelVariant,
        context_override: Option<u32>,
        available_ram_gb: Option<f64>,
        platform: PlatformClass,
    ) -> Assessment {
        let estimate = self.estimate(variant, context_override);
        self.classify(&estimate, available_ram_gb, platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quant::QuantKey;
    use crate::verdict::Verdict;

    #[test]
    fn test_seven_b_q4_runs_on_sixteen_gb_desktop() {
        let estimator = FeasibilityEstimator::default();
        let variant = ModelVariant::new("mistral-7b-q4", 7.0, 4.7, QuantKey::Q4KM, 8192);

        for platform in [PlatformClass::MacosLike, PlatformClass::WindowsLike] {
            let a = estimator.assess(&variant, Some(16.0), platform);
            assert!((a.estimate.weights_gb - 4.935).abs() < 1e-9);
            assert!(a.estimate.kv_cache_gb > 0.0);
            assert!((1.0..=6.0).contains(&a.estimate.runtime_overhead_gb));
            assert!(
                matches!(a.verdict, Verdict::Comfortable | Verdict::Tight),
                "{platform}: {:?}",
                a.verdict
            );
        }
    }

    #[test]
    fn test_config_overrides_flow_through() {
        let mut config = EstimatorConfig::default();
        config.verdict.comfortable_gb = 100.0;
        let estimator = FeasibilityEstimator::new(config);
        let variant = ModelVariant::new("tiny", 1.0, 0.7, QuantKey::Q4KM, 2048);
        let a = estimator.assess(&variant, Some(64.0), PlatformClass::LinuxLike);
        assert_eq!(a.verdict, Verdict::Tight);
    }

    #[test]
    fn test_estimator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FeasibilityEstimator>();
    }
}
