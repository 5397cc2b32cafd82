//! Daily append-only execution log.
//!
//! Every script run appends a single JSON line to
//! `<log_dir>/execution_YYYYMMDD.jsonl`, where the date is the UTC day of the
//! record's timestamp. The file is opened in append mode for each record and
//! the full line goes out in one write, so a crash mid-write can lose at most
//! the record being written and never touches earlier lines.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::RecorderError;
use crate::record::ExecutionRecord;

// ---------------------------------------------------------------------------
// ExecutionRecorder
// ---------------------------------------------------------------------------

/// Appends execution records to one JSON-lines file per UTC day.
///
/// The recorder holds no open handles between calls.
#[derive(Debug, Clone)]
pub struct ExecutionRecorder {
    log_dir: PathBuf,
}

impl ExecutionRecorder {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Path of the daily log file for `date`.
    pub fn log_path_for(&self, date: NaiveDate) -> PathBuf {
        self.log_dir
            .join(format!("execution_{}.jsonl", date.format("%Y%m%d")))
    }

    /// Create the log directory and its parents. Safe to call repeatedly.
    pub fn ensure_dir(&self) -> Result<(), RecorderError> {
        std::fs::create_dir_all(&self.log_dir).map_err(|source| RecorderError::CreateDir {
            path: self.log_dir.clone(),
            source,
        })
    }

    /// Append `record` to its day's log file and return that file's path.
    pub fn record(&self, record: &ExecutionRecord) -> Result<PathBuf, RecorderError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        self.ensure_dir()?;
        let path = self.log_path_for(record.timestamp.date_naive());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| RecorderError::Open {
                path: path.clone(),
                source,
            })?;

        file.write_all(line.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| RecorderError::Write {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), status = %record.status, "execution record appended");
        Ok(path)
    }

    /// Like [`record`](Self::record), but a failed write is only logged.
    ///
    /// Used on the run path so a broken log directory never hides the
    /// script's own outcome.
    pub fn record_best_effort(&self, record: &ExecutionRecord) -> Option<PathBuf> {
        match self.record(record) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(
                    log_dir = %self.log_dir.display(),
                    error = %e,
                    "could not write execution record"
                );
                None
            }
        }
    }

    /// Read back every record logged on `date`, in write order.
    ///
    /// A day with no log file yields an empty list.
    pub fn read_day(&self, date: NaiveDate) -> Result<Vec<ExecutionRecord>, RecorderError> {
        let path = self.log_path_for(date);
        let file = match std::fs::File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(RecorderError::Read { path, source }),
        };

        let mut records = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| RecorderError::Read {
                path: path.clone(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|source| RecorderError::Parse {
                path: path.clone(),
                line: idx + 1,
                source,
            })?;
            records.push(record);
        }
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RunStatus;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Map, Value};

    fn inputs(value: &str) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("input".to_string(), json!(value));
        m
    }

    #[test]
    fn test_log_path_uses_utc_day() {
        let recorder = ExecutionRecorder::new("/tmp/logs");
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(
            recorder.log_path_for(date),
            PathBuf::from("/tmp/logs/execution_20260307.jsonl")
        );
    }

    #[test]
    fn test_record_creates_nested_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let recorder = ExecutionRecorder::new(dir.path().join(".tmp/logs"));
        assert!(!recorder.log_dir().exists());

        let record = ExecutionRecord::success("demo", inputs("hello"), Map::new(), 0.01);
        let path = recorder.record(&record).unwrap();

        assert!(path.exists());
        assert!(recorder.log_dir().is_dir());
        assert!(path.starts_with(recorder.log_dir()));
    }

    #[test]
    fn test_file_selected_from_record_timestamp() {
        let dir = tempfile::TempDir::new().unwrap();
        let recorder = ExecutionRecorder::new(dir.path());

        // 23:59 UTC on the 31st stays on the 31st regardless of local zone.
        let ts = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        let record =
            ExecutionRecord::success("demo", inputs("a"), Map::new(), 0.0).with_timestamp(ts);
        let path = recorder.record(&record).unwrap();

        assert_eq!(path, dir.path().join("execution_20251231.jsonl"));
    }

    #[test]
    fn test_appends_one_line_per_record() {
        let dir = tempfile::TempDir::new().unwrap();
        let recorder = ExecutionRecorder::new(dir.path());
        let ts = Utc.with_ymd_and_hms(2026, 1, 2, 8, 0, 0).unwrap();

        let first =
            ExecutionRecord::success("demo", inputs("hello"), Map::new(), 0.2).with_timestamp(ts);
        let second = ExecutionRecord::failure("demo", inputs(""), 0.1, "input_value cannot be empty")
            .with_timestamp(ts);

        let p1 = recorder.record(&first).unwrap();
        let p2 = recorder.record(&second).unwrap();
        assert_eq!(p1, p2);

        let content = std::fs::read_to_string(&p1).unwrap();
        assert!(content.ends_with('\n'));
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2, "expected 2 JSON lines");

        for line in &lines {
            let _: Value = serde_json::from_str(line).unwrap();
        }

        let records = recorder.read_day(ts.date_naive()).unwrap();
        assert_eq!(records, vec![first, second]);
        assert_eq!(records[1].status, RunStatus::Error);
    }

    #[test]
    fn test_reopening_preserves_existing_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let ts = Utc.with_ymd_and_hms(2026, 5, 5, 12, 0, 0).unwrap();

        {
            let recorder = ExecutionRecorder::new(dir.path());
            let r = ExecutionRecord::success("a", inputs("1"), Map::new(), 0.0).with_timestamp(ts);
            recorder.record(&r).unwrap();
        }
        {
            let recorder = ExecutionRecorder::new(dir.path());
            let r = ExecutionRecord::success("b", inputs("2"), Map::new(), 0.0).with_timestamp(ts);
            recorder.record(&r).unwrap();
        }

        let records = ExecutionRecorder::new(dir.path())
            .read_day(ts.date_naive())
            .unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.script_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let recorder = ExecutionRecorder::new(dir.path().join("logs"));
        recorder.ensure_dir().unwrap();
        recorder.ensure_dir().unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_read_missing_day_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let recorder = ExecutionRecorder::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert!(recorder.read_day(date).unwrap().is_empty());
    }

    #[test]
    fn test_read_reports_malformed_line() {
        let dir = tempfile::TempDir::new().unwrap();
        let recorder = ExecutionRecorder::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        std::fs::write(recorder.log_path_for(date), "{not json}\n").unwrap();

        let err = recorder.read_day(date).unwrap_err();
        assert!(matches!(err, RecorderError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_unusable_log_dir_errors_but_best_effort_does_not() {
        let dir = tempfile::TempDir::new().unwrap();
        // A regular file where the directory should be.
        let blocker = dir.path().join("logs");
        std::fs::write(&blocker, "").unwrap();

        let recorder = ExecutionRecorder::new(&blocker);
        let record = ExecutionRecord::failure("demo", inputs(""), 0.0, "boom");

        let err = recorder.record(&record).unwrap_err();
        assert!(matches!(err, RecorderError::CreateDir { .. }));
        assert!(recorder.record_best_effort(&record).is_none());
    }
}
