use crate::cli::SweepArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use mdsweep::progress::ProgressReporter;
use mdsweep::spawn::serial::SerialSpawner;
use mdsweep::sweep;
use tracing::info;

pub fn run(args: SweepArgs) -> Result<()> {
    let job_dir = std::env::current_dir()?;
    let config = crate::config::load(&args.config, &args.var, &job_dir)?;

    let instances = sweep::expand_instances(&config)?;
    info!("Got {} simulation(s).", instances.len());
    println!(
        "Expanded {} instance(s) from {} dynamic variable(s).",
        instances.len(),
        config.variables.dynamic.len()
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let spawner = SerialSpawner::from_config(&config, &job_dir, args.dry_run);
    let report = spawner.run(&instances, &reporter)?;

    super::finish(&report, args.dry_run)
}
