use mdsweep::analysis::AnalysisError;
use mdsweep::config::ConfigError;
use mdsweep::spawn::SpawnError;
use mdsweep::sweep::SweepError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sweep expansion error: {0}")]
    Sweep(#[from] SweepError),

    #[error("Spawning error: {0}")]
    Spawn(#[from] SpawnError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Invalid hand-off payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{failed} of {total} instance(s) failed")]
    InstancesFailed { failed: usize, total: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
