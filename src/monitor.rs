use std::time::Duration;

use log::{info, warn};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::alerts::{AlertThresholds, evaluate};
use crate::collectors::MetricSource;
use crate::store::MetricLog;
use crate::ui;

/// Used when a caller supplies a zero interval. Rejecting the value with a
/// documented fallback beats a busy-loop or a crash.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

const MAX_CONSECUTIVE_SOURCE_FAILURES: u32 = 5;

/// Drives repeated sample -> evaluate -> log -> report cycles.
///
/// One cycle completes fully before the next begins; the only suspension
/// point is the cancellable inter-cycle wait in continuous mode.
pub struct Monitor<S> {
    source: S,
    thresholds: AlertThresholds,
    log: MetricLog,
}

impl<S: MetricSource> Monitor<S> {
    pub fn new(source: S, thresholds: AlertThresholds, log: MetricLog) -> Self {
        Self {
            source,
            thresholds,
            log,
        }
    }

    /// Executes exactly one full cycle. Returns false when sampling failed;
    /// nothing is logged or reported in that case.
    pub fn run_once(&mut self) -> bool {
        self.cycle()
    }

    /// Cycles until cancelled, returning the number of completed cycles.
    ///
    /// The first cycle runs immediately; every later attempt is preceded by
    /// a wait of exactly `interval`, including retries after a sampling
    /// failure, so a failing source never spins faster than the cadence.
    /// Cancellation is observed at the wait boundary; a completed cycle is
    /// never rolled back.
    pub async fn run_continuous(&mut self, interval: Duration, cancel: CancellationToken) -> u64 {
        let interval = normalize_interval(interval);
        info!(
            "[monitor] starting continuous monitoring, interval {}s",
            interval.as_secs()
        );

        let mut cycles: u64 = 0;
        let mut consecutive_failures: u32 = 0;
        let mut first = true;
        loop {
            if !first {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = sleep(interval) => {}
                }
            }
            first = false;
            if cancel.is_cancelled() {
                break;
            }

            if self.cycle() {
                cycles += 1;
                consecutive_failures = 0;
            } else {
                consecutive_failures += 1;
                if consecutive_failures >= MAX_CONSECUTIVE_SOURCE_FAILURES {
                    warn!(
                        "[monitor] aborting after {consecutive_failures} consecutive sampling failures"
                    );
                    break;
                }
            }
        }

        info!("[monitor] stopped after {cycles} cycles");
        cycles
    }

    fn cycle(&mut self) -> bool {
        let sample = match self.source.sample() {
            Ok(sample) => sample,
            Err(err) => {
                warn!("[monitor] sampling failed: {err}");
                return false;
            }
        };

        let alerts = evaluate(&sample, &self.thresholds);

        // Losing one record is preferable to terminating monitoring.
        let append_info = match self.log.append(&sample) {
            Ok(info) => Some(info),
            Err(err) => {
                warn!("[monitor] failed to log sample: {err}");
                None
            }
        };

        println!(
            "{}",
            ui::render(&sample, &alerts, &self.thresholds, append_info.as_ref())
        );
        true
    }
}

fn normalize_interval(interval: Duration) -> Duration {
    if interval.is_zero() {
        DEFAULT_INTERVAL
    } else {
        interval
    }
}
