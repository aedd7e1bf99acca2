use serde::Deserialize;

use crate::types::{AlertCondition, Metric, Sample};

/// Percentage ceilings for each monitored metric. Loaded once at startup
/// and never reloaded mid-run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    pub cpu_max: f64,
    pub memory_max: f64,
    pub disk_max: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            cpu_max: 80.0,
            memory_max: 85.0,
            disk_max: 90.0,
        }
    }
}

/// Evaluation order is fixed: CPU, then memory, then disk. The dashboard
/// prints conditions in this order, so it is part of the contract.
///
/// A metric fires iff its observed value is strictly greater than the
/// threshold. All firing conditions are returned, none deduplicated.
pub fn evaluate(sample: &Sample, thresholds: &AlertThresholds) -> Vec<AlertCondition> {
    let checks = [
        (Metric::Cpu, sample.cpu_percent, thresholds.cpu_max),
        (Metric::Memory, sample.memory_percent, thresholds.memory_max),
        (Metric::Disk, sample.disk_percent, thresholds.disk_max),
    ];

    let mut conditions = Vec::new();
    for (metric, observed, threshold) in checks {
        if observed > threshold {
            conditions.push(AlertCondition {
                metric,
                observed,
                threshold,
            });
        }
    }
    conditions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(cpu: f64, mem: f64, disk: f64) -> Sample {
        Sample {
            timestamp: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            cpu_percent: cpu,
            memory_percent: mem,
            memory_used_bytes: 4 * 1024 * 1024 * 1024,
            disk_percent: disk,
            disk_free_bytes: 100 * 1024 * 1024 * 1024,
            process_count: 200,
        }
    }

    #[test]
    fn exact_threshold_does_not_fire() {
        let thresholds = AlertThresholds::default();
        let conditions = evaluate(&sample(80.0, 85.0, 90.0), &thresholds);
        assert!(conditions.is_empty());
    }

    #[test]
    fn strictly_above_threshold_fires() {
        let thresholds = AlertThresholds::default();
        let conditions = evaluate(&sample(80.1, 10.0, 10.0), &thresholds);
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].metric, Metric::Cpu);
        assert_eq!(conditions[0].observed, 80.1);
        assert_eq!(conditions[0].threshold, 80.0);
    }

    #[test]
    fn conditions_keep_fixed_cpu_memory_disk_order() {
        let thresholds = AlertThresholds::default();
        let conditions = evaluate(&sample(99.0, 99.0, 99.0), &thresholds);
        let order: Vec<Metric> = conditions.iter().map(|c| c.metric).collect();
        assert_eq!(order, vec![Metric::Cpu, Metric::Memory, Metric::Disk]);
    }

    #[test]
    fn subset_of_metrics_can_fire() {
        let thresholds = AlertThresholds::default();
        let conditions = evaluate(&sample(10.0, 95.0, 95.0), &thresholds);
        let order: Vec<Metric> = conditions.iter().map(|c| c.metric).collect();
        assert_eq!(order, vec![Metric::Memory, Metric::Disk]);
    }

    #[test]
    fn nothing_fires_on_idle_host() {
        let thresholds = AlertThresholds::default();
        assert!(evaluate(&sample(1.0, 20.0, 30.0), &thresholds).is_empty());
    }
}
