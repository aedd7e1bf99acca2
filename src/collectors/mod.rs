mod host;

pub use host::HostSource;

use thiserror::Error;

use crate::types::Sample;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("instrumentation unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("instrumentation returned invalid data: {reason}")]
    InvalidData { reason: String },
}

/// Abstraction over the operating system's instrumentation.
///
/// `sample` may block the caller for a bounded measurement window: CPU
/// utilization is averaged over a short interval, never read as a single
/// instantaneous counter. Failures surface as `SourceError`; the scheduler
/// decides whether a failed cycle is fatal.
pub trait MetricSource {
    fn sample(&mut self) -> Result<Sample, SourceError>;
}
