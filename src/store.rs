use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::debug;
use thiserror::Error;

use crate::types::{BYTES_PER_GB, Sample};

pub const DEFAULT_LOG_PATH: &str = "logs/system_monitor.csv";

/// Fixed first line of every log file. Field order and decimal precision of
/// the record lines are part of the format and must never change.
pub const HEADER: &str =
    "timestamp,cpu_percent,memory_percent,memory_gb,disk_percent,disk_free_gb,process_count";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create log file {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to append to log file {path}: {source}")]
    Append {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read log file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where a record landed, for display purposes.
#[derive(Debug, Clone)]
pub struct AppendInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogSummary {
    pub record_count: u64,
    pub first_timestamp: Option<NaiveDateTime>,
    pub last_timestamp: Option<NaiveDateTime>,
}

/// Durable append-only CSV store for samples.
///
/// The file is shared across independent process instances. Each record is
/// written as a single `write_all` of one complete line on an append-mode
/// handle, so concurrent writers never interleave partial lines. Header
/// creation uses `create_new` so exactly one header ever exists. No record,
/// once written, is ever modified or deleted.
pub struct MetricLog {
    path: PathBuf,
}

impl MetricLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Self {
        Self::new(DEFAULT_LOG_PATH)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends exactly one record line, creating the directory, the file
    /// and the header first when absent. I/O failures are not retried here;
    /// retry policy belongs to the caller.
    pub fn append(&self, sample: &Sample) -> Result<AppendInfo, LogError> {
        self.ensure_parent()?;
        self.ensure_header()?;

        let line = encode_record(sample);
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|source| LogError::Append {
                path: self.path.clone(),
                source,
            })?;
        file.write_all(line.as_bytes())
            .map_err(|source| LogError::Append {
                path: self.path.clone(),
                source,
            })?;

        let size_bytes = file
            .metadata()
            .map(|m| m.len())
            .map_err(|source| LogError::Append {
                path: self.path.clone(),
                source,
            })?;
        debug!("[store] appended record to {}", self.path.display());

        Ok(AppendInfo {
            path: self.path.clone(),
            size_bytes,
        })
    }

    /// Reads the log and reports record count plus first/last timestamps.
    ///
    /// A missing file is `Ok(None)` ("no log yet"), distinct from a read
    /// failure on a present file. Lines that do not parse as well-formed
    /// records are skipped; the summary is advisory, so counting the
    /// remaining good lines beats failing the whole call.
    pub fn summarize(&self) -> Result<Option<LogSummary>, LogError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(LogError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let mut summary = LogSummary {
            record_count: 0,
            first_timestamp: None,
            last_timestamp: None,
        };
        for line in content.lines() {
            match parse_record(line) {
                Some(timestamp) => {
                    summary.record_count += 1;
                    if summary.first_timestamp.is_none() {
                        summary.first_timestamp = Some(timestamp);
                    }
                    summary.last_timestamp = Some(timestamp);
                }
                None => {
                    if !line.is_empty() && line != HEADER {
                        debug!("[store] skipping corrupt line: {line}");
                    }
                }
            }
        }
        Ok(Some(summary))
    }

    fn ensure_parent(&self) -> Result<(), LogError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| LogError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Creates the file with the header as its first line. `create_new`
    /// guarantees a single creator even when independent writers race.
    fn ensure_header(&self) -> Result<(), LogError> {
        match OpenOptions::new()
            .append(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(mut file) => file
                .write_all(format!("{HEADER}\n").as_bytes())
                .map_err(|source| LogError::Create {
                    path: self.path.clone(),
                    source,
                }),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(source) => Err(LogError::Create {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// One newline-terminated record line in canonical field order.
fn encode_record(sample: &Sample) -> String {
    format!(
        "{},{:.1},{:.1},{:.2},{:.1},{:.2},{}\n",
        sample.timestamp.format(TIMESTAMP_FORMAT),
        sample.cpu_percent,
        sample.memory_percent,
        sample.memory_used_bytes as f64 / BYTES_PER_GB,
        sample.disk_percent,
        sample.disk_free_bytes as f64 / BYTES_PER_GB,
        sample.process_count,
    )
}

/// Returns the timestamp of a well-formed record line, `None` otherwise.
fn parse_record(line: &str) -> Option<NaiveDateTime> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 7 {
        return None;
    }
    let timestamp = NaiveDateTime::parse_from_str(fields[0], TIMESTAMP_FORMAT).ok()?;
    for field in &fields[1..6] {
        field.parse::<f64>().ok()?;
    }
    fields[6].parse::<u64>().ok()?;
    Some(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs::read_to_string;
    use tempfile::tempdir;

    fn sample_at(hour: u32, minute: u32) -> Sample {
        Sample {
            timestamp: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap(),
            cpu_percent: 23.456,
            memory_percent: 61.2,
            memory_used_bytes: 8 * 1024 * 1024 * 1024,
            disk_percent: 45.0,
            disk_free_bytes: 512 * 1024 * 1024 * 1024,
            process_count: 312,
        }
    }

    #[test]
    fn encodes_fixed_field_order_and_precision() {
        let line = encode_record(&sample_at(12, 30));
        assert_eq!(line, "2025-06-01 12:30:00,23.5,61.2,8.00,45.0,512.00,312\n");
    }

    #[test]
    fn fresh_log_gets_header_then_records_in_order() {
        let dir = tempdir().unwrap();
        let log = MetricLog::new(dir.path().join("logs").join("m.csv"));

        for minute in 0..3 {
            log.append(&sample_at(10, minute)).unwrap();
        }

        let content = read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with("2025-06-01 10:00:00,"));
        assert!(lines[2].starts_with("2025-06-01 10:01:00,"));
        assert!(lines[3].starts_with("2025-06-01 10:02:00,"));

        let summary = log.summarize().unwrap().unwrap();
        assert_eq!(summary.record_count, 3);
        assert_eq!(
            summary.first_timestamp.unwrap(),
            sample_at(10, 0).timestamp
        );
        assert_eq!(summary.last_timestamp.unwrap(), sample_at(10, 2).timestamp);
    }

    #[test]
    fn append_reports_path_and_size() {
        let dir = tempdir().unwrap();
        let log = MetricLog::new(dir.path().join("m.csv"));

        let info = log.append(&sample_at(9, 0)).unwrap();
        assert_eq!(info.path, log.path());
        let expected = (HEADER.len() + 1 + encode_record(&sample_at(9, 0)).len()) as u64;
        assert_eq!(info.size_bytes, expected);
    }

    #[test]
    fn summarize_missing_file_is_no_log_yet() {
        let dir = tempdir().unwrap();
        let log = MetricLog::new(dir.path().join("absent.csv"));
        assert!(log.summarize().unwrap().is_none());
    }

    #[test]
    fn summarize_skips_corrupt_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.csv");
        let good_first = encode_record(&sample_at(8, 0));
        let good_last = encode_record(&sample_at(8, 5));
        fs::write(
            &path,
            format!(
                "{HEADER}\n{good_first}not,a,record\n2025-06-01 08:03:00,oops,1.0,1.00,1.0,1.00,5\n{good_last}"
            ),
        )
        .unwrap();

        let summary = MetricLog::new(&path).summarize().unwrap().unwrap();
        assert_eq!(summary.record_count, 2);
        assert_eq!(summary.first_timestamp.unwrap(), sample_at(8, 0).timestamp);
        assert_eq!(summary.last_timestamp.unwrap(), sample_at(8, 5).timestamp);
    }

    #[test]
    fn summarize_header_only_file_counts_zero() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.csv");
        fs::write(&path, format!("{HEADER}\n")).unwrap();

        let summary = MetricLog::new(&path).summarize().unwrap().unwrap();
        assert_eq!(summary.record_count, 0);
        assert!(summary.first_timestamp.is_none());
        assert!(summary.last_timestamp.is_none());
    }

    #[test]
    fn append_surfaces_directory_failure() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let log = MetricLog::new(blocker.join("sub").join("m.csv"));
        let err = log.append(&sample_at(7, 0)).unwrap_err();
        assert!(matches!(err, LogError::CreateDir { .. }));
    }

    #[test]
    fn concurrent_writers_never_interleave_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.csv");

        let writers: Vec<_> = [40_u32, 25]
            .into_iter()
            .enumerate()
            .map(|(id, count)| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let log = MetricLog::new(path);
                    for i in 0..count {
                        log.append(&sample_at(id as u32 + 1, i % 60)).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let content = read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 66);
        assert_eq!(lines.iter().filter(|l| **l == HEADER).count(), 1);
        assert_eq!(
            lines.iter().filter(|l| parse_record(l).is_some()).count(),
            65
        );

        let summary = MetricLog::new(&path).summarize().unwrap().unwrap();
        assert_eq!(summary.record_count, 65);
    }
}
