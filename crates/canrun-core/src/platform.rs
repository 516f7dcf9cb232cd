//! Platform reserve model.
//!
//! Approximates how much of a host's total RAM is left for inference once
//! the operating system and typical background processes have taken their
//! share. This is a heuristic safety margin derived from the platform
//! class, not a reading of live free memory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::PlatformConfig;
use crate::error::FitError;
use crate::variant::non_negative;

/// Operating-system / device class, ordered roughly by expected background
/// footprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformClass {
    /// Linux, BSDs and other headless or server-like environments
    LinuxLike,
    /// macOS desktop
    MacosLike,
    /// Windows desktop
    WindowsLike,
    /// iOS and Android devices
    Mobile,
    /// Anything unrecognised; uses a middle-of-the-road reserve
    #[default]
    Unknown,
}

impl PlatformClass {
    pub const ALL: [PlatformClass; 5] = [
        PlatformClass::LinuxLike,
        PlatformClass::MacosLike,
        PlatformClass::WindowsLike,
        PlatformClass::Mobile,
        PlatformClass::Unknown,
    ];

    /// Classify an OS name as reported by `std::env::consts::OS`.
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" | "illumos"
            | "solaris" => Self::LinuxLike,
            "macos" => Self::MacosLike,
            "windows" => Self::WindowsLike,
            "ios" | "android" => Self::Mobile,
            _ => Self::Unknown,
        }
    }

    /// Platform class of the machine this binary was built for.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LinuxLike => "linux-like",
            Self::MacosLike => "macos-like",
            Self::WindowsLike => "windows-like",
            Self::Mobile => "mobile",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PlatformClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlatformClass {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linux-like" | "linux" | "server" | "headless" | "bsd" => Ok(Self::LinuxLike),
            "macos-like" | "macos" | "mac" | "darwin" | "osx" => Ok(Self::MacosLike),
            "windows-like" | "windows" | "win" => Ok(Self::WindowsLike),
            "mobile" | "ios" | "android" => Ok(Self::Mobile),
            "unknown" | "default" | "other" => Ok(Self::Unknown),
            other => Err(FitError::UnknownPlatform(other.to_string())),
        }
    }
}

/// Split of total RAM into the OS reserve and what is left for inference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsableMemory {
    pub total_ram_gb: f64,
    pub reserved_gb: f64,
    pub usable_ram_gb: f64,
}

/// Usable memory for inference on a host with `total_ram_gb` of RAM.
///
/// `reserved = clamp(base + total × fraction, min_reserve, max_reserve)` and
/// `usable = max(min_usable, total − reserved)`. Negative or non-finite RAM
/// figures are treated as zero.
pub fn usable_memory(
    total_ram_gb: f64,
    platform: PlatformClass,
    config: &PlatformConfig,
) -> UsableMemory {
    let total = non_negative(total_ram_gb);
    let profile = config.profile(platform);

    let reserved = (profile.base_reserve_gb + total * profile.reserve_fraction)
        .max(config.min_reserve_gb)
        .min(config.max_reserve_gb);
    let usable = (total - reserved).max(config.min_usable_gb);

    UsableMemory {
        total_ram_gb: total,
        reserved_gb: reserved,
        usable_ram_gb: usable,
    }
}
