use std::path::Path;

use chrono::Local;
use log::debug;
use sysinfo::{Disks, MINIMUM_CPU_UPDATE_INTERVAL, ProcessesToUpdate, System};

use super::{MetricSource, SourceError};
use crate::types::Sample;

/// Production metric source backed by sysinfo.
pub struct HostSource {
    sys: System,
}

impl HostSource {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }
}

impl Default for HostSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for HostSource {
    fn sample(&mut self) -> Result<Sample, SourceError> {
        // CPU usage is a delta between two refreshes; blocking for the
        // minimum update interval gives a time-averaged reading.
        self.sys.refresh_cpu_usage();
        std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
        self.sys.refresh_cpu_usage();
        let cpu_percent = f64::from(self.sys.global_cpu_usage()).clamp(0.0, 100.0);

        self.sys.refresh_memory();
        let total_memory = self.sys.total_memory();
        if total_memory == 0 {
            return Err(SourceError::Unavailable {
                reason: "memory totals not reported".to_string(),
            });
        }
        let memory_used_bytes = self.sys.used_memory();
        let memory_percent =
            (memory_used_bytes as f64 / total_memory as f64 * 100.0).clamp(0.0, 100.0);

        let disks = Disks::new_with_refreshed_list();
        let disk = disks
            .list()
            .iter()
            .find(|d| d.mount_point() == Path::new("/"))
            .or_else(|| disks.list().iter().max_by_key(|d| d.total_space()))
            .ok_or_else(|| SourceError::Unavailable {
                reason: "no disks enumerated".to_string(),
            })?;
        let total_space = disk.total_space();
        if total_space == 0 {
            return Err(SourceError::InvalidData {
                reason: format!("disk {:?} reports zero capacity", disk.mount_point()),
            });
        }
        let disk_free_bytes = disk.available_space();
        let disk_percent = (total_space.saturating_sub(disk_free_bytes) as f64
            / total_space as f64
            * 100.0)
            .clamp(0.0, 100.0);

        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        let process_count = self.sys.processes().len();

        debug!(
            "[collector] cpu={cpu_percent:.1}% mem={memory_percent:.1}% disk={disk_percent:.1}% procs={process_count}"
        );

        Ok(Sample {
            timestamp: Local::now().naive_local(),
            cpu_percent,
            memory_percent,
            memory_used_bytes,
            disk_percent,
            disk_free_bytes,
            process_count,
        })
    }
}
