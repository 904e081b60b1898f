use crate::cli::PlanArgs;
use crate::error::Result;
use mdsweep::sweep;

pub fn run(args: PlanArgs) -> Result<()> {
    let job_dir = std::env::current_dir()?;
    let config = crate::config::load(&args.config, &args.var, &job_dir)?;

    let instances = sweep::expand_instances(&config)?;

    println!(
        "{} instance(s) over {} dynamic variable(s):",
        instances.len(),
        config.variables.dynamic.len()
    );
    let width = instances
        .iter()
        .map(|i| i.dir_name.len())
        .max()
        .unwrap_or(0);
    for instance in &instances {
        let vars = instance
            .dynamic
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(" ");
        println!("  {:<width$}  {}", instance.dir_name, vars);
    }

    Ok(())
}
