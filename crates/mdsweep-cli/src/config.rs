use crate::error::{CliError, Result};
use crate::utils::parser;
use mdsweep::config::SweepConfig;
use std::path::Path;
use tracing::{debug, info};

/// Loads the sweep configuration, layers `--var` overrides on top, and
/// validates the result against the job directory. Everything a sweep can
/// reject is rejected here, before any subcommand touches the filesystem.
pub fn load(config_path: &Path, var_overrides: &[String], job_dir: &Path) -> Result<SweepConfig> {
    let mut config = SweepConfig::from_file(config_path)?;

    let overrides =
        parser::parse_overrides(var_overrides).map_err(|e| CliError::Argument(e.to_string()))?;
    if !overrides.is_empty() {
        info!(
            "Applying {} command-line variable override(s).",
            overrides.len()
        );
        config.apply_overrides(overrides);
    }

    config.validate(job_dir)?;
    debug!("Sweep configuration validated against {:?}.", job_dir);
    Ok(config)
}
