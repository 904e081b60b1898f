use super::{SpawnError, SpawnReport, check_required, handoff::Handoff};
use crate::config::SweepConfig;
use crate::engine::{EngineCommand, rewrite_for_subdir};
use crate::instance::SimulationInstance;
use crate::progress::{Progress, ProgressReporter};
use std::fs::File;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// What happened to a single instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceOutcome {
    Completed,
    Failed { code: Option<i32> },
    Skipped,
    Planned,
}

/// Runs instances one by one in the calling process, blocking on each engine
/// subprocess. Each instance gets its own subdirectory under the job
/// directory; the engine's stdout is captured into the configured log file.
///
/// An existing subdirectory means the instance already ran (or is running
/// elsewhere) and is skipped, so an interrupted sweep can be resumed by
/// invoking it again.
pub struct SerialSpawner {
    command: EngineCommand,
    input_file: String,
    log_file: String,
    path_variables: Vec<String>,
    required_variables: Vec<String>,
    job_dir: PathBuf,
    dry_run: bool,
}

impl SerialSpawner {
    pub fn from_config(config: &SweepConfig, job_dir: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            command: EngineCommand::from_config(&config.engine, config.mpi.as_ref()),
            input_file: config.engine.input_file.clone(),
            log_file: config.engine.log_file.clone(),
            path_variables: config.job.path_variables.clone(),
            required_variables: config.job.required_variables.clone(),
            job_dir: job_dir.into(),
            dry_run,
        }
    }

    /// Builds a spawner for the second stage, where the configuration is no
    /// longer available and the payload is the source of truth.
    pub fn from_handoff(handoff: &Handoff, job_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: handoff.command.clone(),
            input_file: handoff.input_file.clone(),
            log_file: handoff.log_file.clone(),
            path_variables: handoff.path_variables.clone(),
            required_variables: Vec::new(),
            job_dir: job_dir.into(),
            dry_run: handoff.dry_run,
        }
    }

    pub fn run(
        &self,
        instances: &[SimulationInstance],
        reporter: &ProgressReporter,
    ) -> Result<SpawnReport, SpawnError> {
        check_required(instances, &self.required_variables)?;

        reporter.report(Progress::SweepStart {
            total_instances: instances.len() as u64,
        });

        let mut report = SpawnReport::default();
        for instance in instances {
            reporter.report(Progress::InstanceStart {
                dir_name: instance.dir_name.clone(),
            });
            match self.run_instance(instance)? {
                InstanceOutcome::Completed => report.completed += 1,
                InstanceOutcome::Failed { .. } => report.failed += 1,
                InstanceOutcome::Skipped => {
                    report.skipped += 1;
                    reporter.report(Progress::InstanceSkipped {
                        dir_name: instance.dir_name.clone(),
                    });
                }
                InstanceOutcome::Planned => report.planned += 1,
            }
            reporter.report(Progress::InstanceDone);
        }

        reporter.report(Progress::SweepFinish);
        Ok(report)
    }

    /// Runs one instance in its subdirectory. A non-zero engine exit is an
    /// outcome, not an error: instances are independent and the rest of the
    /// sweep proceeds. Only failing to start a process at all is fatal.
    pub fn run_instance(
        &self,
        instance: &SimulationInstance,
    ) -> Result<InstanceOutcome, SpawnError> {
        let subdir = self.job_dir.join(&instance.dir_name);
        if subdir.is_dir() {
            info!(
                "Found existing subdirectory '{}'. Skipping.",
                instance.dir_name
            );
            return Ok(InstanceOutcome::Skipped);
        }

        // Paths in the variable set are relative to the job directory; the
        // engine runs one level down.
        let vars = rewrite_for_subdir(&instance.variables, &self.path_variables);
        let input_file = format!("../{}", self.input_file);
        let rendered = self.command.render(&input_file, &vars);

        if self.dry_run {
            info!("Dry run, would spawn in '{}': {}", instance.dir_name, rendered);
            return Ok(InstanceOutcome::Planned);
        }

        std::fs::create_dir(&subdir).map_err(|source| SpawnError::CreateDir {
            path: subdir.clone(),
            source,
        })?;
        let log_path = subdir.join(&self.log_file);
        let log = File::create(&log_path).map_err(|source| SpawnError::CreateLog {
            path: log_path,
            source,
        })?;

        debug!("Spawning engine: {}", rendered);
        let argv = self.command.invocation(&input_file, &vars);
        let status = Command::new(&argv[0])
            .args(&argv[1..])
            .current_dir(&subdir)
            .stdin(Stdio::null())
            .stdout(log)
            .status()
            .map_err(|source| SpawnError::EngineLaunch {
                command: rendered.clone(),
                source,
            })?;

        if status.success() {
            info!("Finished '{}'.", instance.dir_name);
            Ok(InstanceOutcome::Completed)
        } else {
            warn!(
                "Engine exited with {} in '{}'. Continuing with remaining instances.",
                status, instance.dir_name
            );
            Ok(InstanceOutcome::Failed {
                code: status.code(),
            })
        }
    }
}
