use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::alerts::AlertThresholds;
use crate::monitor::DEFAULT_INTERVAL;
use crate::store::DEFAULT_LOG_PATH;

/// TOML configuration for the monitor. Every field is optional; absent
/// values fall back to the documented defaults.
///
/// ```toml
/// interval_secs = 10
/// log_path = "logs/system_monitor.csv"
///
/// [thresholds]
/// cpu_max = 80.0
/// memory_max = 85.0
/// disk_max = 90.0
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    pub interval_secs: Option<u64>,
    pub log_path: Option<PathBuf>,
    pub thresholds: AlertThresholds,
}

impl MonitorConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Zero is treated the same as absent: the 5-second default.
    pub fn interval(&self) -> Duration {
        match self.interval_secs {
            Some(0) | None => DEFAULT_INTERVAL,
            Some(secs) => Duration::from_secs(secs),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH))
    }
}
