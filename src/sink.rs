//! Result artifacts under the data directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::SinkError;

/// Writes JSON artifacts into a single data directory.
#[derive(Debug, Clone)]
pub struct DataSink {
    data_dir: PathBuf,
}

impl DataSink {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Create the data directory and its parents. Safe to call repeatedly.
    pub fn ensure_dir(&self) -> Result<(), SinkError> {
        std::fs::create_dir_all(&self.data_dir).map_err(|source| SinkError::CreateDir {
            path: self.data_dir.clone(),
            source,
        })
    }

    /// Write `value` as pretty JSON to `<data_dir>/<name>`, replacing any
    /// previous file of that name.
    ///
    /// The content lands in a sibling temp file first and is renamed into
    /// place, so readers never see a half-written artifact.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf, SinkError> {
        validate_name(name)?;
        let mut body = serde_json::to_vec_pretty(value)?;
        body.push(b'\n');

        self.ensure_dir()?;
        let path = self.data_dir.join(name);
        let tmp = self.data_dir.join(format!(".{name}.tmp"));

        let write = || -> std::io::Result<()> {
            let mut file = std::fs::File::create(&tmp)?;
            file.write_all(&body)?;
            file.sync_all()?;
            std::fs::rename(&tmp, &path)
        };
        if let Err(source) = write() {
            let _ = std::fs::remove_file(&tmp);
            return Err(SinkError::Write { path, source });
        }

        info!(path = %path.display(), bytes = body.len(), "output written");
        Ok(path)
    }
}

fn validate_name(name: &str) -> Result<(), SinkError> {
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some_and(|f| f == name);
    if plain {
        Ok(())
    } else {
        Err(SinkError::InvalidName {
            name: name.to_string(),
        })
    }
}
