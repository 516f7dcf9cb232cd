//! Parameter-size × quantization feasibility matrix.

use serde::{Deserialize, Serialize};

use crate::estimator::{KvCacheModel, MemoryEstimate};
use crate::feasibility::FeasibilityEstimator;
use crate::platform::PlatformClass;
use crate::quant::{QuantKey, size_for_quant};
use crate::variant::non_negative;
use crate::verdict::Verdict;

/// One cell of the matrix: a parameter size stored at one quantization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellVerdict {
    pub quant: QuantKey,
    pub verdict: Verdict,
    pub total_gb: f64,
    pub headroom_gb: Option<f64>,
}

/// All requested quantizations for one parameter size, in request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantMatrixRow {
    pub params_b: f64,
    pub cells: Vec<CellVerdict>,
}

impl QuantMatrixRow {
    pub fn cell(&self, quant: QuantKey) -> Option<&CellVerdict> {
        self.cells.iter().find(|c| c.quant == quant)
    }
}

/// Distinct parameter sizes in ascending order; invalid sizes count as zero.
pub fn distinct_sizes(param_sizes: &[f64]) -> Vec<f64> {
    let mut sizes: Vec<f64> = param_sizes.iter().copied().map(non_negative).collect();
    sizes.sort_by(f64::total_cmp);
    sizes.dedup();
    sizes
}

/// Drop repeated keys, keeping the first occurrence's position.
pub fn distinct_quants(quant_keys: &[QuantKey]) -> Vec<QuantKey> {
    let mut keys = Vec::with_capacity(quant_keys.len());
    for key in quant_keys {
        if !keys.contains(key) {
            keys.push(*key);
        }
    }
    keys
}

impl<K: KvCacheModel> FeasibilityEstimator<K> {
    /// Cross every distinct parameter size with every quantization key.
    ///
    /// Each cell totals `size_for_quant(params_b, quant)` (no metadata
    /// allowance) with the KV-cache and overhead terms at `context` tokens
    /// (default from `matrix.default_context`, not capped), then classifies it.
    pub fn build_matrix(
        &self,
        param_sizes: &[f64],
        quant_keys: &[QuantKey],
        ram_gb: Option<f64>,
        context: Option<u32>,
        platform: PlatformClass,
    ) -> Vec<QuantMatrixRow> {
        let context = context.unwrap_or(self.config().matrix.default_context);
        let keys = distinct_quants(quant_keys);

        let rows: Vec<QuantMatrixRow> = distinct_sizes(param_sizes)
            .into_iter()
            .map(|params_b| QuantMatrixRow {
                params_b,
                cells: keys
                    .iter()
                    .map(|&quant| self.matrix_cell(params_b, quant, ram_gb, context, platform))
                    .collect(),
            })
            .collect();

        tracing::debug!(
            rows = rows.len(),
            columns = keys.len(),
            context,
            %platform,
            "built quantization matrix"
        );

        rows
    }

    fn matrix_cell(
        &self,
        params_b: f64,
        quant: QuantKey,
        ram_gb: Option<f64>,
        context: u32,
        platform: PlatformClass,
    ) -> CellVerdict {
        let memory = self.memory_estimator();
        let estimate = MemoryEstimate::new(
            context,
            size_for_quant(params_b, quant),
            memory.kv_cache_gb(params_b, context),
            memory.overhead_gb(params_b),
        );
        let assessment = self.classify(&estimate, ram_gb, platform);
        CellVerdict {
            quant,
            verdict: assessment.verdict,
            total_gb: assessment.estimate.total_gb,
            headroom_gb: assessment.headroom_gb,
        }
    }

    /// Highest-precision quantization of a `params_b` model that runs.
    ///
    /// Prefers the most precise `comfortable` cell, then the most precise
    /// `tight` or `maybe` one. `None` without a RAM figure or when every
    /// candidate classifies as `no`.
    pub fn recommend_quant(
        &self,
        params_b: f64,
        quant_keys: &[QuantKey],
        ram_gb: Option<f64>,
        context: Option<u32>,
        platform: PlatformClass,
    ) -> Option<CellVerdict> {
        if ram_gb.is_none() {
            return None;
        }
        let row = self
            .build_matrix(&[params_b], quant_keys, ram_gb, context, platform)
            .pop()?;

        let mut cells = row.cells;
        cells.sort_by(|a, b| b.quant.cmp(&a.quant));

        cells
            .iter()
            .find(|c| c.verdict == Verdict::Comfortable)
            .or_else(|| cells.iter().find(|c| c.verdict.is_runnable()))
            .copied()
    }
}
