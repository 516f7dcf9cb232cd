//! Host RAM detection and resolution of `--ram` / `--platform`.

use crate::cli::HostArgs;
use crate::error::CliError;
use canrun_core::PlatformClass;
use serde::Serialize;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Memory and OS facts about the machine running the binary.
#[derive(Debug, Clone, Serialize)]
pub struct HostInfo {
    pub os: &'static str,
    pub arch: &'static str,
    pub platform: PlatformClass,
    pub total_ram_gb: f64,
    pub available_ram_gb: f64,
}

/// Detects the host's memory via sysinfo.
pub fn detect_host() -> HostInfo {
    let mut sys = sysinfo::System::new();
    sys.refresh_memory();

    HostInfo {
        os: std::env::consts::OS,
        arch: std::env::consts::ARCH,
        platform: PlatformClass::current(),
        total_ram_gb: bytes_to_gb(sys.total_memory()),
        available_ram_gb: bytes_to_gb(sys.available_memory()),
    }
}

pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// Where the RAM figure used for verdicts came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RamSource {
    Flag,
    Detected,
    None,
}

/// RAM figure and platform an estimate is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HostTarget {
    pub ram_gb: Option<f64>,
    pub ram_source: RamSource,
    pub platform: PlatformClass,
}

impl HostArgs {
    /// Resolve flags against the running host.
    pub fn resolve(&self) -> Result<HostTarget, CliError> {
        self.resolve_with(|| detect_host().total_ram_gb)
    }

    fn resolve_with(&self, detect_ram: impl FnOnce() -> f64) -> Result<HostTarget, CliError> {
        let platform = self.platform.unwrap_or_else(PlatformClass::current);

        let (ram_gb, ram_source) = match self.ram {
            Some(ram) if !(ram.is_finite() && ram > 0.0) => {
                return Err(CliError::InvalidArgument(format!(
                    "--ram must be a positive number of GB, got {ram}"
                )));
            }
            Some(ram) => (Some(ram), RamSource::Flag),
            None if self.no_detect => (None, RamSource::None),
            None => {
                let detected = detect_ram();
                if detected > 0.0 {
                    (Some(detected), RamSource::Detected)
                } else {
                    tracing::warn!("host RAM detection returned nothing; verdicts will be unknown");
                    (None, RamSource::None)
                }
            }
        };

        tracing::debug!(?ram_gb, ?ram_source, %platform, "resolved host target");

        Ok(HostTarget {
            ram_gb,
            ram_source,
            platform,
        })
    }
}
