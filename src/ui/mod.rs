//! Textual dashboard rendered once per cycle.

use std::fmt::Write as _;

use crate::alerts::AlertThresholds;
use crate::store::{AppendInfo, TIMESTAMP_FORMAT};
use crate::types::{AlertCondition, BYTES_PER_GB, Metric, Sample};

const WIDTH: usize = 50;

/// Renders a sample, its alert conditions (already in evaluation order) and
/// optional log metadata into a human-readable block. Never fails.
pub fn render(
    sample: &Sample,
    alerts: &[AlertCondition],
    thresholds: &AlertThresholds,
    log_info: Option<&AppendInfo>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "=".repeat(WIDTH));
    let _ = writeln!(
        out,
        "SYSTEM MONITOR - {}",
        sample.timestamp.format(TIMESTAMP_FORMAT)
    );
    let _ = writeln!(out, "{}", "=".repeat(WIDTH));

    let _ = writeln!(
        out,
        "{} CPU:       {:>6.1}%",
        marker(sample.cpu_percent, thresholds.cpu_max),
        sample.cpu_percent
    );
    let _ = writeln!(
        out,
        "{} Memory:    {:>6.1}% ({:>6.2} GB used)",
        marker(sample.memory_percent, thresholds.memory_max),
        sample.memory_percent,
        sample.memory_used_bytes as f64 / BYTES_PER_GB
    );
    let _ = writeln!(
        out,
        "{} Disk:      {:>6.1}% ({:>6.2} GB free)",
        marker(sample.disk_percent, thresholds.disk_max),
        sample.disk_percent,
        sample.disk_free_bytes as f64 / BYTES_PER_GB
    );
    let _ = writeln!(out, "     Processes: {:>5}", sample.process_count);
    let _ = writeln!(out, "{}", "-".repeat(WIDTH));

    if !alerts.is_empty() {
        let _ = writeln!(out, "ALERTS:");
        for alert in alerts {
            let _ = writeln!(out, "  - {}", describe(alert));
        }
    }

    if let Some(info) = log_info {
        let _ = writeln!(
            out,
            "Log: {} ({:.1} KB)",
            info.path.display(),
            info.size_bytes as f64 / 1024.0
        );
    }

    out
}

fn marker(observed: f64, threshold: f64) -> &'static str {
    if observed > threshold { "[!!]" } else { "[ok]" }
}

fn describe(alert: &AlertCondition) -> String {
    let kind = match alert.metric {
        Metric::Cpu => "High CPU",
        Metric::Memory => "High memory",
        Metric::Disk => "Low disk space",
    };
    format!(
        "{}: {:.1}% (threshold {:.1}%)",
        kind, alert.observed, alert.threshold
    )
}
