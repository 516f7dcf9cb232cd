//! Verdict classification.
//!
//! Headroom is usable memory minus the estimated requirement. Thresholds are
//! inclusive lower bounds evaluated top-down:
//!
//! | headroom      | verdict       |
//! |---------------|---------------|
//! | ≥ 2.0 GB      | `comfortable` |
//! | ≥ 0.5 GB      | `tight`       |
//! | ≥ −1.5 GB     | `maybe`       |
//! | otherwise     | `no`          |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{PlatformConfig, VerdictThresholds};
use crate::estimator::MemoryEstimate;
use crate::platform::{PlatformClass, UsableMemory, usable_memory};

/// Minimum headroom (GB) for `comfortable`
pub const COMFORTABLE_HEADROOM_GB: f64 = 2.0;
/// Minimum headroom (GB) for `tight`
pub const TIGHT_HEADROOM_GB: f64 = 0.5;
/// Minimum headroom (GB) for `maybe`; a small deficit can still run with
/// swap, mmap paging or a trimmed context.
pub const MAYBE_HEADROOM_GB: f64 = -1.5;

/// Feasibility verdict for a variant on a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Comfortable,
    Tight,
    Maybe,
    No,
    /// No RAM figure was available to compare against
    Unknown,
}

impl Verdict {
    /// Ordering of runnable-ness; `None` for `Unknown`.
    pub fn rank(self) -> Option<u8> {
        match self {
            Self::Comfortable => Some(3),
            Self::Tight => Some(2),
            Self::Maybe => Some(1),
            Self::No => Some(0),
            Self::Unknown => None,
        }
    }

    /// True when `self` is known and at least as good as `other`.
    pub fn at_least(self, other: Verdict) -> bool {
        match (self.rank(), other.rank()) {
            (Some(a), Some(b)) => a >= b,
            _ => false,
        }
    }

    /// `comfortable`, `tight` or `maybe`
    pub fn is_runnable(self) -> bool {
        self.at_least(Verdict::Maybe)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comfortable => "comfortable",
            Self::Tight => "tight",
            Self::Maybe => "maybe",
            Self::No => "no",
            Self::Unknown => "unknown",
        }
    }

    /// Short human-facing label
    pub fn label(self) -> &'static str {
        match self {
            Self::Comfortable => "Can run",
            Self::Tight => "Tight",
            Self::Maybe => "Maybe",
            Self::No => "Cannot run",
            Self::Unknown => "Unknown",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Comfortable => "Fits with room to spare for other applications",
            Self::Tight => "Fits, but close other memory-heavy applications first",
            Self::Maybe => {
                "Slightly over budget; may run with swap, memory mapping or a shorter context"
            }
            Self::No => "Needs substantially more memory than is available",
            Self::Unknown => "Provide a RAM figure to get a verdict",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl VerdictThresholds {
    /// Map a headroom figure to a verdict.
    pub fn classify(&self, headroom_gb: f64) -> Verdict {
        if headroom_gb >= self.comfortable_gb {
            Verdict::Comfortable
        } else if headroom_gb >= self.tight_gb {
            Verdict::Tight
        } else if headroom_gb >= self.maybe_gb {
            Verdict::Maybe
        } else {
            Verdict::No
        }
    }
}

/// Outcome of classifying one estimate against a host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub verdict: Verdict,
    pub platform: PlatformClass,
    pub estimate: MemoryEstimate,
    /// Absent when no RAM figure was supplied
    pub memory: Option<UsableMemory>,
    pub headroom_gb: Option<f64>,
}

impl Assessment {
    /// One-line explanation of the verdict.
    pub fn detail(&self) -> String {
        match (self.memory, self.headroom_gb) {
            (Some(mem), Some(headroom)) => {
                // Branch on the printed value so -0.04 reads "0.0 GB headroom"
                let rounded = (headroom * 10.0).round() / 10.0;
                let margin = if rounded >= 0.0 {
                    format!("{:.1} GB headroom", rounded.abs())
                } else {
                    format!("{:.1} GB short", -rounded)
                };
                format!(
                    "needs {:.1} GB of {:.1} GB usable ({:.1} GB reserved by {}); {}",
                    self.estimate.total_gb,
                    mem.usable_ram_gb,
                    mem.reserved_gb,
                    self.platform,
                    margin
                )
            }
            _ => format!(
                "needs {:.1} GB; no RAM figure to compare against",
                self.estimate.total_gb
            ),
        }
    }
}

/// Classify `estimate` against `available_ram_gb` on `platform`.
///
/// Returns [`Verdict::Unknown`] with no headroom when the RAM figure is
/// absent, regardless of the estimate.
pub fn classify(
    estimate: &MemoryEstimate,
    available_ram_gb: Option<f64>,
    platform: PlatformClass,
    platform_config: &PlatformConfig,
    thresholds: &VerdictThresholds,
) -> Assessment {
    let Some(ram) = available_ram_gb else {
        return Assessment {
            verdict: Verdict::Unknown,
            platform,
            estimate: *estimate,
            memory: None,
            headroom_gb: None,
        };
    };

    let memory = usable_memory(ram, platform, platform_config);
    let headroom = memory.usable_ram_gb - estimate.total_gb;
    let verdict = thresholds.classify(headroom);

    tracing::debug!(
        %platform,
        usable_ram_gb = memory.usable_ram_gb,
        total_gb = estimate.total_gb,
        headroom_gb = headroom,
        %verdict,
        "classified estimate"
    );

    Assessment {
        verdict,
        platform,
        estimate: *estimate,
        memory: Some(memory),
        headroom_gb: Some(headroom),
    }
}
