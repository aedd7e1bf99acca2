pub mod alerts;
pub mod collectors;
pub mod config;
pub mod monitor;
pub mod store;
pub mod types;
pub mod ui;

pub use alerts::{AlertThresholds, evaluate};
pub use collectors::{HostSource, MetricSource, SourceError};
pub use config::MonitorConfig;
pub use monitor::{DEFAULT_INTERVAL, Monitor};
pub use store::{AppendInfo, LogError, LogSummary, MetricLog};
pub use types::{AlertCondition, Metric, Sample};
