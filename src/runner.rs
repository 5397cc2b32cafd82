//! Top-level run flow: time the logic, record the outcome, report it.

use std::time::Instant;

use serde_json::{Map, Value};
use tracing::{error, info};

use crate::error::ScriptError;
use crate::record::ExecutionRecord;
use crate::recorder::ExecutionRecorder;

/// Wraps script logic with timing and execution logging.
#[derive(Debug, Clone)]
pub struct Runner {
    script_name: String,
    recorder: ExecutionRecorder,
}

impl Runner {
    pub fn new(script_name: impl Into<String>, recorder: ExecutionRecorder) -> Self {
        Self {
            script_name: script_name.into(),
            recorder,
        }
    }

    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    pub fn recorder(&self) -> &ExecutionRecorder {
        &self.recorder
    }

    /// Run `logic` once and append exactly one execution record for it.
    ///
    /// The record write is best-effort: whatever `logic` returned is handed
    /// back unchanged even if the log directory is unusable.
    pub fn execute<F>(
        &self,
        inputs: Map<String, Value>,
        logic: F,
    ) -> Result<Map<String, Value>, ScriptError>
    where
        F: FnOnce() -> Result<Map<String, Value>, ScriptError>,
    {
        let start = Instant::now();
        let result = logic();
        let duration = start.elapsed().as_secs_f64();

        match result {
            Ok(outputs) => {
                let record =
                    ExecutionRecord::success(&self.script_name, inputs, outputs.clone(), duration);
                self.recorder.record_best_effort(&record);
                let summary = Value::Object(outputs.clone());
                info!("Done in {:.2}s - {}", duration, summary);
                Ok(outputs)
            }
            Err(e) => {
                let record =
                    ExecutionRecord::failure(&self.script_name, inputs, duration, e.to_string());
                self.recorder.record_best_effort(&record);
                error!("Failed: {}", e);
                Err(e)
            }
        }
    }
}
