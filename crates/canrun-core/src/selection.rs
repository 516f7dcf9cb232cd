//! Variant selection and context fitting.

use crate::estimator::KvCacheModel;
use crate::feasibility::FeasibilityEstimator;
use crate::platform::PlatformClass;
use crate::variant::{ModelVariant, non_negative};
use crate::verdict::Verdict;

/// Smallest context tried by [`FeasibilityEstimator::max_context`]
pub const MIN_CONTEXT_STEP: u32 = 1024;

impl<K: KvCacheModel> FeasibilityEstimator<K> {
    /// Pick the most capable variant that plausibly runs.
    ///
    /// Variants are ranked by `params_b` descending, ties broken by `id` and
    /// then by input position. The first `comfortable` variant wins; failing
    /// that, the first `tight` or `maybe`. Returns `None` without a RAM
    /// figure or when every variant classifies as `no`.
    pub fn select_best<'a>(
        &self,
        variants: &'a [ModelVariant],
        ram_gb: Option<f64>,
        platform: PlatformClass,
    ) -> Option<&'a ModelVariant> {
        let ram_gb = ram_gb?;

        let mut ranked: Vec<&ModelVariant> = variants.iter().collect();
        // stable: equal (params, id) keep input order
        ranked.sort_by(|a, b| {
            non_negative(b.params_b)
                .total_cmp(&non_negative(a.params_b))
                .then_with(|| a.id.cmp(&b.id))
        });

        let verdicts: Vec<(&ModelVariant, Verdict)> = ranked
            .into_iter()
            .map(|v| (v, self.assess(v, Some(ram_gb), platform).verdict))
            .collect();

        let chosen = verdicts
            .iter()
            .find(|(_, verdict)| *verdict == Verdict::Comfortable)
            .or_else(|| verdicts.iter().find(|(_, verdict)| verdict.is_runnable()))
            .map(|(variant, _)| *variant);

        tracing::debug!(
            candidates = variants.len(),
            ram_gb,
            %platform,
            selected = chosen.map(|v| v.id.as_str()).unwrap_or("<none>"),
            "selected best variant"
        );

        chosen
    }

    /// Largest context (tokens) at which `variant` still classifies as at
    /// least `tight`.
    ///
    /// Walks 1024, 2048, 4096, … up to the variant's native context, which
    /// is always tried last. `None` without a RAM figure or when even the
    /// smallest step does not fit.
    pub fn max_context(
        &self,
        variant: &ModelVariant,
        ram_gb: Option<f64>,
        platform: PlatformClass,
    ) -> Option<u32> {
        let ram_gb = ram_gb?;
        if variant.context == 0 {
            return None;
        }

        let mut best = None;
        for context in context_ladder(variant.context) {
            let verdict = self
                .assess_with_context(variant, Some(context), Some(ram_gb), platform)
                .verdict;
            if !verdict.at_least(Verdict::Tight) {
                break;
            }
            best = Some(context);
        }
        best
    }
}

/// Doubling ladder from [`MIN_CONTEXT_STEP`] ending at `limit`.
fn context_ladder(limit: u32) -> Vec<u32> {
    let mut ladder = Vec::new();
    let mut step = MIN_CONTEXT_STEP;
    while step < limit {
        ladder.push(step);
        step = step.saturating_mul(2);
    }
    ladder.push(limit);
    ladder
}
