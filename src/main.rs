use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use scriptlog::config::{LogFormat, LoggingConfig, ScriptConfig};
use scriptlog::error::ScriptError;
use scriptlog::recorder::ExecutionRecorder;
use scriptlog::runner::Runner;
use scriptlog::sink::DataSink;
use scriptlog::{logging, Invocation};

#[derive(Parser)]
#[command(
    name = "scriptlog",
    about = "Ad-hoc script skeleton with a daily append-only execution log",
    version,
    long_about = None
)]
struct Cli {
    /// Input value to process
    #[arg(long)]
    input: String,

    /// Write the result as JSON to this file name under the data directory
    #[arg(long)]
    output: Option<String>,

    /// Config file (defaults to $SCRIPTLOG_CONFIG, then ./scriptlog.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the execution log directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Override the data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Emit console logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<ScriptConfig> {
        let config = match &self.config {
            Some(path) => ScriptConfig::load(path)?,
            None => ScriptConfig::load_or_default(),
        };
        Ok(self.apply_overrides(config))
    }

    /// Flag values win over anything read from a config file.
    fn apply_overrides(&self, mut config: ScriptConfig) -> ScriptConfig {
        if let Some(dir) = &self.log_dir {
            config.paths.log_dir = dir.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.paths.data_dir = dir.clone();
        }
        if self.json_logs {
            config.logging.format = LogFormat::Json;
        }
        config
    }

    fn invocation(&self) -> Invocation {
        Invocation {
            input: self.input.clone(),
            output: self.output.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config loading reports through a default console logger; the configured
    // one takes over for the run itself.
    let bootstrap = logging::build_subscriber(&LoggingConfig::default());
    let config = match tracing::subscriber::with_default(bootstrap, || cli.resolve_config()) {
        Ok(config) => config,
        Err(e) => {
            let fallback = cli.apply_overrides(ScriptConfig::default());
            let subscriber = logging::build_subscriber(&fallback.logging);
            return tracing::subscriber::with_default(subscriber, || {
                config_failure(&cli, &fallback, &e)
            });
        }
    };

    let subscriber = logging::build_subscriber(&config.logging);
    tracing::subscriber::with_default(subscriber, || execute(&cli, &config))
}

fn execute(cli: &Cli, config: &ScriptConfig) -> ExitCode {
    let recorder = ExecutionRecorder::new(&config.paths.log_dir);
    let sink = DataSink::new(&config.paths.data_dir);

    if let Err(e) = recorder.ensure_dir() {
        tracing::warn!(error = %e, "execution log directory unavailable");
    }
    if let Err(e) = sink.ensure_dir() {
        tracing::warn!(error = %e, "data directory unavailable");
    }

    let runner = Runner::new(env!("CARGO_BIN_NAME"), recorder);
    match scriptlog::run_script(&runner, &sink, &cli.invocation()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

/// The run never starts when the config cannot be loaded, but it still gets
/// its error record, written under the fallback log directory.
fn config_failure(cli: &Cli, fallback: &ScriptConfig, err: &anyhow::Error) -> ExitCode {
    let runner = Runner::new(
        env!("CARGO_BIN_NAME"),
        ExecutionRecorder::new(&fallback.paths.log_dir),
    );
    let message = format!("{:#}", err);
    let _ = runner.execute(cli.invocation().record_inputs(), || {
        Err(ScriptError::Unexpected(message))
    });
    ExitCode::FAILURE
}
