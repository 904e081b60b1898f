pub mod analyze;
pub mod exec;
pub mod plan;
pub mod run;
pub mod submit;

use crate::error::{CliError, Result};
use mdsweep::spawn::SpawnReport;

/// Prints the post-sweep summary and turns a dirty report into an error so
/// the process exit code reflects per-instance failures (which never abort
/// the other instances).
pub(crate) fn finish(report: &SpawnReport, dry_run: bool) -> Result<()> {
    if dry_run {
        println!(
            "Dry run: {} instance(s) planned, {} would be skipped.",
            report.planned, report.skipped
        );
        return Ok(());
    }

    println!(
        "Sweep finished: {} completed, {} failed, {} skipped.",
        report.completed, report.failed, report.skipped
    );

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::InstancesFailed {
            failed: report.failed,
            total: report.total(),
        })
    }
}
