use super::{SpawnError, SpawnReport, check_required, handoff::{Handoff, shell_quote}};
use crate::config::{SchedulerConfig, SweepConfig};
use crate::instance::SimulationInstance;
use crate::progress::{Progress, ProgressReporter};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Submits one scheduler job per instance by piping an ephemeral job script
/// to the scheduler command's stdin (`sbatch` style). The script invokes the
/// second-stage runner with the serialized hand-off payload; the scheduler
/// decides when and where each instance actually runs.
#[derive(Debug)]
pub struct SchedulerSpawner<'a> {
    config: &'a SweepConfig,
    scheduler: &'a SchedulerConfig,
    /// Command prefix that starts the second stage, e.g.
    /// `/path/to/mdsweep exec`.
    runner_command: String,
    dry_run: bool,
}

impl<'a> SchedulerSpawner<'a> {
    pub fn new(
        config: &'a SweepConfig,
        runner_command: String,
        dry_run: bool,
    ) -> Result<Self, SpawnError> {
        let scheduler = config.scheduler.as_ref().ok_or(SpawnError::NoScheduler)?;
        Ok(Self {
            config,
            scheduler,
            runner_command,
            dry_run,
        })
    }

    pub fn submit(
        &self,
        instances: &[SimulationInstance],
        reporter: &ProgressReporter,
    ) -> Result<SpawnReport, SpawnError> {
        check_required(instances, &self.config.job.required_variables)?;

        reporter.report(Progress::SweepStart {
            total_instances: instances.len() as u64,
        });

        let mut report = SpawnReport::default();
        for instance in instances {
            reporter.report(Progress::InstanceStart {
                dir_name: instance.dir_name.clone(),
            });

            let handoff = Handoff::for_instance(self.config, instance, false);
            let script = self.job_script(&handoff)?;

            if self.dry_run {
                info!(
                    "Dry run, would submit job script for '{}':\n{}",
                    instance.dir_name, script
                );
                reporter.report(Progress::Message(format!(
                    "would submit '{}'",
                    instance.dir_name
                )));
                report.planned += 1;
            } else if self.submit_one(&script)? {
                info!("Submitted scheduler job for '{}'.", instance.dir_name);
                report.completed += 1;
            } else {
                warn!(
                    "Scheduler rejected job for '{}'. Continuing with remaining instances.",
                    instance.dir_name
                );
                report.failed += 1;
            }

            reporter.report(Progress::InstanceDone);
        }

        reporter.report(Progress::SweepFinish);
        Ok(report)
    }

    /// The ephemeral job script: a `/bin/sh` one-liner around the
    /// second-stage runner, with the payload single-quoted for the shell.
    fn job_script(&self, handoff: &Handoff) -> Result<String, SpawnError> {
        let payload = handoff.to_json()?;
        Ok(format!(
            "#!/bin/sh\n\n{} {}\n",
            self.runner_command,
            shell_quote(&payload)
        ))
    }

    /// Pipes `script` to the scheduler's stdin and waits for it to accept or
    /// reject the submission. Returns whether the scheduler exited zero.
    fn submit_one(&self, script: &str) -> Result<bool, SpawnError> {
        let rendered = format!("{} {}", self.scheduler.path, self.scheduler.args);
        debug!("Submitting via: {}", rendered.trim());

        let mut child = Command::new(&self.scheduler.path)
            .args(self.scheduler.args.split_whitespace())
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|source| SpawnError::SchedulerLaunch {
                command: rendered.clone(),
                source,
            })?;

        // stdin is piped above, so the handle is present.
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(script.as_bytes())
                .map_err(|source| SpawnError::SchedulerLaunch {
                    command: rendered.clone(),
                    source,
                })?;
        }

        let status = child
            .wait()
            .map_err(|source| SpawnError::SchedulerLaunch {
                command: rendered,
                source,
            })?;
        Ok(status.success())
    }
}
