//! Model variants and variant catalogs.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{ConfigResult, load_config};
use crate::quant::QuantKey;

/// One concrete size/quantization release of a model, e.g. "8B at Q4_K_M".
///
/// Supplied by an external catalog; the estimator never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVariant {
    /// Stable identifier, used as the deterministic tie-break in selection
    #[serde(default)]
    pub id: String,
    /// Billions of parameters
    pub params_b: f64,
    /// On-disk weight size in GB at `quant`; 0 when no trustworthy figure exists
    #[serde(default)]
    pub size_gb: f64,
    pub quant: QuantKey,
    /// Native context length in tokens
    pub context: u32,
}

impl ModelVariant {
    pub fn new(
        id: impl Into<String>,
        params_b: f64,
        size_gb: f64,
        quant: QuantKey,
        context: u32,
    ) -> Self {
        Self {
            id: id.into(),
            params_b,
            size_gb,
            quant,
            context,
        }
    }

    /// Names of fields that violate the variant contract: negative or
    /// non-finite `params_b`/`size_gb`, or a zero context.
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if !(self.params_b.is_finite() && self.params_b >= 0.0) {
            fields.push("params_b");
        }
        if !(self.size_gb.is_finite() && self.size_gb >= 0.0) {
            fields.push("size_gb");
        }
        if self.context == 0 {
            fields.push("context");
        }
        fields
    }

    /// Copy with invalid numeric fields clamped to zero.
    ///
    /// Clamping is logged at `warn` level.
    pub fn sanitized(&self) -> Self {
        let invalid = self.invalid_fields();
        if !invalid.is_empty() {
            tracing::warn!(
                variant = %self.id,
                params_b = self.params_b,
                size_gb = self.size_gb,
                context = self.context,
                fields = ?invalid,
                "invalid variant fields clamped to zero"
            );
        }
        Self {
            id: self.id.clone(),
            params_b: non_negative(self.params_b),
            size_gb: non_negative(self.size_gb),
            quant: self.quant,
            context: self.context,
        }
    }

    /// Whether the variant carries a usable on-disk size.
    pub fn has_size(&self) -> bool {
        non_negative(self.size_gb) > 0.0
    }
}

/// A list of variants as read from a catalog file.
///
/// ```yaml
/// variants:
///   - id: qwen2.5-7b-q4
///     params_b: 7.6
///     size_gb: 4.7
///     quant: Q4_K_M
///     context: 32768
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantCatalog {
    #[serde(default)]
    pub variants: Vec<ModelVariant>,
}

impl VariantCatalog {
    /// Load a catalog from a yaml, toml, json or json5 file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let catalog: Self = load_config(path)?;
        tracing::debug!(variants = catalog.variants.len(), "loaded variant catalog");
        Ok(catalog)
    }
}

/// `value` if finite and positive, else zero.
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
