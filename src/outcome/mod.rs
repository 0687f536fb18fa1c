//! Delivery outcomes and the append-only CSV audit log.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Header row of the outcome log, written once when the file is created.
pub const LOG_HEADER: [&str; 7] = [
    "timestamp_utc",
    "email",
    "status",
    "attempts",
    "http_status",
    "message_id",
    "error_preview",
];

#[derive(Debug, Error)]
#[error("Outcome log error ({}): {source}", .path.display())]
pub struct OutcomeLogError {
    pub path: PathBuf,
    #[source]
    pub source: csv::Error,
}

/// Terminal state of one recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Sent,
    Failed,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Sent => "sent",
            OutcomeStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of all attempts for one recipient in one run. Field order matches
/// [`LOG_HEADER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    #[serde(rename = "timestamp_utc", serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub email: String,
    pub status: OutcomeStatus,
    pub attempts: u32,
    /// Status of the last HTTP response; `None` if no attempt got one
    pub http_status: Option<u16>,
    pub message_id: Option<String>,
    pub error_preview: Option<String>,
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Micros, false))
}

/// Receives each terminal outcome as soon as it is known.
pub trait OutcomeSink {
    fn record(&mut self, outcome: &DeliveryOutcome) -> Result<(), OutcomeLogError>;
}

impl OutcomeSink for Vec<DeliveryOutcome> {
    fn record(&mut self, outcome: &DeliveryOutcome) -> Result<(), OutcomeLogError> {
        self.push(outcome.clone());
        Ok(())
    }
}

/// Append-only CSV log of delivery outcomes.
///
/// Every row is flushed as soon as it is written. The file is flushed again
/// on [`OutcomeLog::finish`] and, failing that, on drop.
#[derive(Debug)]
pub struct OutcomeLog {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl OutcomeLog {
    /// Open `path` for appending, writing the header if the file is new.
    pub fn open(path: &Path) -> Result<Self, OutcomeLogError> {
        let wrap = |source: csv::Error| OutcomeLogError {
            path: path.to_path_buf(),
            source,
        };

        let first_write = !path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| wrap(e.into()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if first_write {
            writer.write_record(LOG_HEADER).map_err(wrap)?;
            writer.flush().map_err(|e| wrap(e.into()))?;
            tracing::debug!(path = %path.display(), "Created outcome log");
        }

        Ok(Self {
            path: path.to_path_buf(),
            writer,
        })
    }

    /// Flush and close the log.
    pub fn finish(mut self) -> Result<(), OutcomeLogError> {
        self.flush()
    }

    fn flush(&mut self) -> Result<(), OutcomeLogError> {
        self.writer.flush().map_err(|e| OutcomeLogError {
            path: self.path.clone(),
            source: e.into(),
        })
    }
}

impl OutcomeSink for OutcomeLog {
    fn record(&mut self, outcome: &DeliveryOutcome) -> Result<(), OutcomeLogError> {
        self.writer
            .serialize(outcome)
            .map_err(|source| OutcomeLogError {
                path: self.path.clone(),
                source,
            })?;
        self.flush()
    }
}

impl Drop for OutcomeLog {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to flush outcome log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(email: &str, status: OutcomeStatus) -> DeliveryOutcome {
        DeliveryOutcome {
            timestamp: Utc::now(),
            email: email.to_string(),
            status,
            attempts: 1,
            http_status: Some(200),
            message_id: Some("msg-1".to_string()),
            error_preview: None,
        }
    }

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_header_written_on_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("send_log.csv");

        let log = OutcomeLog::open(&path).unwrap();
        log.finish().unwrap();

        assert_eq!(read_lines(&path), vec![LOG_HEADER.join(",")]);
    }

    #[test]
    fn test_header_written_once_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("send_log.csv");

        for email in ["a@example.com", "b@example.com"] {
            let mut log = OutcomeLog::open(&path).unwrap();
            log.record(&outcome(email, OutcomeStatus::Sent)).unwrap();
            log.finish().unwrap();
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.iter().filter(|l| l.starts_with("timestamp_utc")).count(), 1);
        assert!(lines[1].contains(",a@example.com,sent,1,200,msg-1,"));
        assert!(lines[2].contains(",b@example.com,sent,1,200,msg-1,"));
    }

    #[test]
    fn test_existing_file_gets_no_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("existing.csv");
        std::fs::write(&path, "").unwrap();

        let mut log = OutcomeLog::open(&path).unwrap();
        log.record(&outcome("c@example.com", OutcomeStatus::Sent)).unwrap();
        drop(log);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 1);
        assert!(!lines[0].starts_with("timestamp_utc"));
    }

    #[test]
    fn test_failed_row_with_empty_optionals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("send_log.csv");

        let mut log = OutcomeLog::open(&path).unwrap();
        log.record(&DeliveryOutcome {
            timestamp: Utc::now(),
            email: "d@example.com".to_string(),
            status: OutcomeStatus::Failed,
            attempts: 3,
            http_status: None,
            message_id: None,
            error_preview: Some("connection failed: refused, retry".to_string()),
        })
        .unwrap();

        // row is on disk before the log is closed
        let lines = read_lines(&path);
        assert!(lines[1].ends_with(",d@example.com,failed,3,,,\"connection failed: refused, retry\""));
        log.finish().unwrap();
    }

    #[test]
    fn test_status_display() {
        assert_eq!(OutcomeStatus::Sent.to_string(), "sent");
        assert_eq!(OutcomeStatus::Failed.as_str(), "failed");
    }
}
