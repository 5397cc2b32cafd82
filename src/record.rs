//! Execution record data model.
//!
//! One `ExecutionRecord` describes a single script invocation: what went in,
//! what came out, how long it took and whether it succeeded. Records are
//! serialized as one compact JSON object per line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of a script run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The script logic returned a result.
    Success,
    /// The script logic failed; the record carries the error message.
    Error,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Success => write!(f, "success"),
            RunStatus::Error => write!(f, "error"),
        }
    }
}

/// A single line of the daily execution log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionRecord {
    /// UTC capture time of record creation.
    pub timestamp: DateTime<Utc>,
    pub script_name: String,
    pub inputs: Map<String, Value>,
    /// Always empty for failed runs.
    pub outputs: Map<String, Value>,
    /// Wall-clock duration, rounded to milliseconds.
    pub duration_seconds: f64,
    pub status: RunStatus,
    /// Serialized as `null` on success so every line carries the same keys.
    pub error: Option<String>,
}

impl ExecutionRecord {
    /// Record for a run that completed normally.
    pub fn success(
        script_name: impl Into<String>,
        inputs: Map<String, Value>,
        outputs: Map<String, Value>,
        duration_seconds: f64,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            script_name: script_name.into(),
            inputs,
            outputs,
            duration_seconds: round_millis(duration_seconds),
            status: RunStatus::Success,
            error: None,
        }
    }

    /// Record for a run that failed with `error`. Outputs are left empty.
    pub fn failure(
        script_name: impl Into<String>,
        inputs: Map<String, Value>,
        duration_seconds: f64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            script_name: script_name.into(),
            inputs,
            outputs: Map::new(),
            duration_seconds: round_millis(duration_seconds),
            status: RunStatus::Error,
            error: Some(error.into()),
        }
    }

    /// Override the capture time. Mostly useful for tests that need a fixed day.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}

/// Round a duration to 3 decimal places. Negative or non-finite inputs clamp to 0.
pub fn round_millis(secs: f64) -> f64 {
    if !secs.is_finite() || secs < 0.0 {
        return 0.0;
    }
    (secs * 1000.0).round() / 1000.0
}
