use crate::cli::ExecArgs;
use crate::error::{CliError, Result};
use mdsweep::spawn::handoff::Handoff;
use mdsweep::spawn::serial::{InstanceOutcome, SerialSpawner};
use tracing::info;

/// The second stage: runs inside the scheduler allocation, with the job
/// directory as working directory and the hand-off payload as the only
/// input.
pub fn run(args: ExecArgs) -> Result<()> {
    let handoff = Handoff::from_json(&args.payload)?;
    let instance = handoff.instance();
    info!("Decoded hand-off payload for '{}'.", instance.dir_name);

    let job_dir = std::env::current_dir()?;
    let spawner = SerialSpawner::from_handoff(&handoff, &job_dir);

    match spawner.run_instance(&instance)? {
        InstanceOutcome::Completed => {
            println!("Instance '{}' completed.", instance.dir_name);
            Ok(())
        }
        InstanceOutcome::Skipped => {
            println!(
                "Instance '{}' already has a directory. Nothing to do.",
                instance.dir_name
            );
            Ok(())
        }
        InstanceOutcome::Planned => {
            println!("Dry run: instance '{}' planned.", instance.dir_name);
            Ok(())
        }
        InstanceOutcome::Failed { code } => {
            println!(
                "Instance '{}' failed (engine exit code {:?}).",
                instance.dir_name, code
            );
            Err(CliError::InstancesFailed {
                failed: 1,
                total: 1,
            })
        }
    }
}
