pub mod handoff;
pub mod scheduler;
pub mod serial;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("instance '{dir_name}' is missing required variable(s): {}", names.join(", "))]
    MissingVariables {
        dir_name: String,
        names: Vec<String>,
    },

    #[error("failed to create instance directory '{path}'", path = path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create engine log file '{path}'", path = path.display())]
    CreateLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch engine command '{command}'")]
    EngineLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("submit mode requires a [scheduler] section in the configuration")]
    NoScheduler,

    #[error("failed to launch scheduler command '{command}'")]
    SchedulerLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode hand-off payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Tally of one spawning pass. Per-instance engine failures land in
/// `failed` without aborting the rest of the sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    /// Instances whose engine process exited successfully (serial mode) or
    /// whose job script was accepted by the scheduler (submit mode).
    pub completed: usize,
    /// Instances whose engine or submission exited non-zero.
    pub failed: usize,
    /// Instances skipped because their directory already existed.
    pub skipped: usize,
    /// Instances only planned during a dry run.
    pub planned: usize,
}

impl SpawnReport {
    pub fn total(&self) -> usize {
        self.completed + self.failed + self.skipped + self.planned
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Fail-fast check over a whole batch: every instance must resolve every
/// required variable before the first one is spawned.
pub(crate) fn check_required(
    instances: &[crate::instance::SimulationInstance],
    required: &[String],
) -> Result<(), SpawnError> {
    for instance in instances {
        let names = instance.missing_required(required);
        if !names.is_empty() {
            return Err(SpawnError::MissingVariables {
                dir_name: instance.dir_name.clone(),
                names,
            });
        }
    }
    Ok(())
}
