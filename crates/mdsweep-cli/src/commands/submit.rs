use crate::cli::SweepArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use mdsweep::progress::ProgressReporter;
use mdsweep::spawn::handoff::shell_quote;
use mdsweep::spawn::scheduler::SchedulerSpawner;
use mdsweep::sweep;
use std::path::Path;
use tracing::info;

pub fn run(args: SweepArgs) -> Result<()> {
    let job_dir = std::env::current_dir()?;
    let config = crate::config::load(&args.config, &args.var, &job_dir)?;

    let instances = sweep::expand_instances(&config)?;
    info!("Got {} simulation(s).", instances.len());
    println!(
        "Expanded {} instance(s); submitting one scheduler job each.",
        instances.len()
    );

    // The generated job scripts call this very binary's second stage.
    let current_exe = std::env::current_exe()?;
    let runner_command = runner_command(&current_exe);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let spawner = SchedulerSpawner::new(&config, runner_command, args.dry_run)?;
    let report = spawner.submit(&instances, &reporter)?;

    super::finish(&report, args.dry_run)
}

/// The job-script command prefix for the second stage. The binary path is
/// shell-quoted so an install location with spaces survives the `/bin/sh`
/// wrapper.
fn runner_command(exe: &Path) -> String {
    format!("{} exec", shell_quote(&exe.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_command_quotes_paths_with_spaces() {
        assert_eq!(
            runner_command(Path::new("/opt/md tools/mdsweep")),
            "'/opt/md tools/mdsweep' exec"
        );
        assert_eq!(
            runner_command(Path::new("/usr/local/bin/mdsweep")),
            "'/usr/local/bin/mdsweep' exec"
        );
    }
}
