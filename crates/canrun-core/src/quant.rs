//! Quantization catalog.
//!
//! Static table of the quantization schemes the estimator understands,
//! ordered by ascending bit-width. Bytes-per-parameter figures are
//! effective GGUF sizes (block scales and zero-points included), which is
//! why `Q8_0` sits slightly above one byte per parameter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FitError, FitResult};

/// Known quantization schemes.
///
/// Variant order is ascending bit-width, so the derived `Ord` doubles as a
/// precision ordering (`Q2K < Q4KM < F16`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String")]
pub enum QuantKey {
    #[serde(rename = "Q2_K")]
    Q2K,
    #[serde(rename = "Q3_K_M")]
    Q3KM,
    #[serde(rename = "Q4_K_M")]
    Q4KM,
    #[serde(rename = "Q5_K_M")]
    Q5KM,
    #[serde(rename = "Q6_K")]
    Q6K,
    #[serde(rename = "Q8_0")]
    Q8,
    #[serde(rename = "F16")]
    F16,
}

/// Catalog entry for one quantization scheme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantConfig {
    pub key: QuantKey,
    /// Nominal bit-width of a stored weight
    pub bits: u8,
    /// Effective bytes per parameter, including block metadata
    pub bytes_per_param: f64,
    /// Short display label
    pub label: &'static str,
    /// One-line description of the quality trade-off
    pub desc: &'static str,
}

static CATALOG: [QuantConfig; 7] = [
    QuantConfig {
        key: QuantKey::Q2K,
        bits: 2,
        bytes_per_param: 0.37,
        label: "Q2_K",
        desc: "2-bit k-quant; smallest footprint, noticeable quality loss",
    },
    QuantConfig {
        key: QuantKey::Q3KM,
        bits: 3,
        bytes_per_param: 0.48,
        label: "Q3_K_M",
        desc: "3-bit k-quant; usable on very constrained hosts",
    },
    QuantConfig {
        key: QuantKey::Q4KM,
        bits: 4,
        bytes_per_param: 0.58,
        label: "Q4_K_M",
        desc: "4-bit k-quant; the common default balance of size and quality",
    },
    QuantConfig {
        key: QuantKey::Q5KM,
        bits: 5,
        bytes_per_param: 0.68,
        label: "Q5_K_M",
        desc: "5-bit k-quant; close to 8-bit quality",
    },
    QuantConfig {
        key: QuantKey::Q6K,
        bits: 6,
        bytes_per_param: 0.80,
        label: "Q6_K",
        desc: "6-bit k-quant; near-lossless for most tasks",
    },
    QuantConfig {
        key: QuantKey::Q8,
        bits: 8,
        bytes_per_param: 1.05,
        label: "Q8_0",
        desc: "8-bit integer; effectively lossless",
    },
    QuantConfig {
        key: QuantKey::F16,
        bits: 16,
        bytes_per_param: 2.0,
        label: "F16",
        desc: "16-bit float; unquantized reference weights",
    },
];

impl QuantKey {
    /// All keys in display order (ascending bit-width).
    pub const ALL: [QuantKey; 7] = [
        QuantKey::Q2K,
        QuantKey::Q3KM,
        QuantKey::Q4KM,
        QuantKey::Q5KM,
        QuantKey::Q6K,
        QuantKey::Q8,
        QuantKey::F16,
    ];

    /// Catalog entry for this key.
    pub fn config(self) -> &'static QuantConfig {
        &CATALOG[self as usize]
    }

    pub fn bytes_per_param(self) -> f64 {
        self.config().bytes_per_param
    }

    pub fn bits(self) -> u8 {
        self.config().bits
    }

    /// Canonical identifier, e.g. `Q4_K_M`
    pub fn as_str(self) -> &'static str {
        self.config().label
    }
}

impl fmt::Display for QuantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QuantKey {
    type Err = FitError;

    /// Case-insensitive; accepts canonical GGUF names plus short aliases
    /// such as `q4`, `int8` or `fp16`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "Q2_K" | "Q2" | "INT2" => Ok(Self::Q2K),
            "Q3_K_M" | "Q3_K" | "Q3" | "INT3" => Ok(Self::Q3KM),
            "Q4_K_M" | "Q4_K" | "Q4_0" | "Q4" | "INT4" => Ok(Self::Q4KM),
            "Q5_K_M" | "Q5_K" | "Q5" | "INT5" => Ok(Self::Q5KM),
            "Q6_K" | "Q6" | "INT6" => Ok(Self::Q6K),
            "Q8_0" | "Q8" | "INT8" => Ok(Self::Q8),
            "F16" | "FP16" | "BF16" => Ok(Self::F16),
            _ => Err(FitError::UnknownQuantization(s.trim().to_string())),
        }
    }
}

impl TryFrom<String> for QuantKey {
    type Error = FitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The full catalog in display order.
pub fn catalog() -> &'static [QuantConfig] {
    &CATALOG
}

/// Look up a catalog entry by identifier.
pub fn lookup(id: &str) -> FitResult<&'static QuantConfig> {
    id.parse::<QuantKey>().map(QuantKey::config)
}

/// Weight size in GB for `params_b` billion parameters stored at `quant`.
pub fn size_for_quant(params_b: f64, quant: QuantKey) -> f64 {
    params_b * quant.bytes_per_param()
}

/// [`size_for_quant`] keyed by identifier; fails on unknown schemes.
pub fn size_for_quant_id(params_b: f64, quant: &str) -> FitResult<f64> {
    Ok(size_for_quant(params_b, quant.parse()?))
}
