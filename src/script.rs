//! Script logic.
//!
//! This is the placeholder processing step a concrete script replaces. It
//! validates its input and reports an empty result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ScriptError;

/// Result summary of one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunOutput {
    pub records: u64,
    pub status: String,
}

impl RunOutput {
    /// The output as a JSON mapping, as stored in the execution record.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("records".to_string(), Value::from(self.records));
        map.insert("status".to_string(), Value::from(self.status.clone()));
        map
    }
}

/// Process `input`.
pub fn run(input: &str) -> Result<RunOutput, ScriptError> {
    if input.is_empty() {
        return Err(ScriptError::invalid_input("input_value cannot be empty"));
    }

    // TODO: replace with the script's real processing once it has a data source.
    tracing::info!("Processing: {}", input);

    Ok(RunOutput {
        records: 0,
        status: "ok".to_string(),
    })
}
