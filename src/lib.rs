//! scriptlog -- skeleton for ad-hoc command-line scripts.
//!
//! A script run validates its input, does its (placeholder) work, and appends
//! one structured record to a daily JSON-lines execution log under
//! `.tmp/logs/`. Result artifacts go under `.tmp/data/`.

pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod recorder;
pub mod runner;
pub mod script;
pub mod sink;

use serde_json::{Map, Value};

use crate::error::ScriptError;

/// Everything one invocation needs, resolved from config and CLI flags.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub input: String,
    /// Artifact file name under the data directory, if one should be written.
    pub output: Option<String>,
}

impl Invocation {
    /// The inputs echoed into the execution record.
    pub fn record_inputs(&self) -> Map<String, Value> {
        let mut inputs = Map::new();
        inputs.insert("input".to_string(), Value::from(self.input.clone()));
        if let Some(output) = &self.output {
            inputs.insert("output".to_string(), Value::from(output.clone()));
        }
        inputs
    }
}

/// Run the script once: process the input, write the optional artifact, and
/// record the outcome.
pub fn run_script(
    runner: &runner::Runner,
    sink: &sink::DataSink,
    invocation: &Invocation,
) -> Result<Map<String, Value>, ScriptError> {
    runner.execute(invocation.record_inputs(), || {
        let output = script::run(&invocation.input)?;
        if let Some(name) = &invocation.output {
            sink.write_json(name, &output)?;
        }
        Ok(output.to_map())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RunStatus;
    use crate::recorder::ExecutionRecorder;
    use chrono::Utc;

    #[test]
    fn test_run_script_writes_artifact_and_record() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = runner::Runner::new("demo", ExecutionRecorder::new(dir.path().join("logs")));
        let sink = sink::DataSink::new(dir.path().join("data"));
        let invocation = Invocation {
            input: "hello".to_string(),
            output: Some("result.json".to_string()),
        };

        run_script(&runner, &sink, &invocation).unwrap();

        assert!(dir.path().join("data/result.json").exists());
        let records = runner.recorder().read_day(Utc::now().date_naive()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].inputs["output"], "result.json");
    }

    #[test]
    fn test_sink_failure_is_recorded_as_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = runner::Runner::new("demo", ExecutionRecorder::new(dir.path().join("logs")));
        let sink = sink::DataSink::new(dir.path().join("data"));
        let invocation = Invocation {
            input: "hello".to_string(),
            output: Some("../escape.json".to_string()),
        };

        let err = run_script(&runner, &sink, &invocation).unwrap_err();
        assert!(matches!(err, ScriptError::Unexpected(_)));

        let records = runner.recorder().read_day(Utc::now().date_naive()).unwrap();
        assert_eq!(records[0].status, RunStatus::Error);
        assert!(records[0].outputs.is_empty());
    }

    #[test]
    fn test_record_inputs_omit_absent_output() {
        let invocation = Invocation {
            input: "hello".to_string(),
            output: None,
        };
        let inputs = invocation.record_inputs();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs["input"], "hello");
    }
}
