use chrono::NaiveDateTime;

/// Bytes per gibibyte, the unit the log format and dashboard report in.
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// One immutable snapshot of host resource state, taken once per cycle.
#[derive(Debug, Clone)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub memory_used_bytes: u64,
    pub disk_percent: f64,
    pub disk_free_bytes: u64,
    pub process_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Cpu,
    Memory,
    Disk,
}

/// A single metric whose observed value exceeded its configured ceiling.
/// Produced fresh each cycle, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertCondition {
    pub metric: Metric,
    pub observed: f64,
    pub threshold: f64,
}
