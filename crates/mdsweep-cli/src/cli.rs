use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Daan Verhoeven",
    version,
    about = "mdsweep - parameter-sweep orchestration for LAMMPS-style molecular dynamics engines: \
             one working directory per parameter combination, run serially or submitted to a batch scheduler.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand the sweep and run every instance serially in this process.
    Run(SweepArgs),
    /// Expand the sweep and submit one scheduler job per instance.
    Submit(SweepArgs),
    /// Expand the sweep and print the instance table without touching the filesystem.
    Plan(PlanArgs),
    /// Second stage: decode a hand-off payload and run its single instance.
    /// Normally invoked from a generated job script, not by hand.
    Exec(ExecArgs),
    /// Classify the sorption regime of a finished instance from its density
    /// profiles.
    Analyze(AnalyzeArgs),
}

/// Shared arguments for the sweep-expanding subcommands.
#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Path to the sweep configuration file in TOML format.
    #[arg(short, long, value_name = "PATH", default_value = "sweep.toml")]
    pub config: PathBuf,

    /// Validate and plan everything, but don't create directories, spawn the
    /// engine, or submit anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Additional dynamic variable(s), overriding the configuration file.
    /// Values are a comma-separated list; a simulation is run for every
    /// combination. Can be given multiple times.
    /// Example: --var mu=-3.5,-3.0 --var cps=1.5,2.0
    #[arg(long = "var", value_name = "NAME=V1,V2,...")]
    pub var: Vec<String>,
}

/// Arguments for the `plan` subcommand.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the sweep configuration file in TOML format.
    #[arg(short, long, value_name = "PATH", default_value = "sweep.toml")]
    pub config: PathBuf,

    /// Additional dynamic variable(s), overriding the configuration file.
    /// Can be given multiple times.
    #[arg(long = "var", value_name = "NAME=V1,V2,...")]
    pub var: Vec<String>,
}

/// Arguments for the `exec` subcommand.
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// JSON hand-off payload produced by `submit`.
    #[arg(required = true, value_name = "PAYLOAD")]
    pub payload: String,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Instance directory containing the density files.
    #[arg(required = true, value_name = "DIR")]
    pub dir: PathBuf,

    /// Filename of the polymer density profile inside the instance directory.
    #[arg(long, value_name = "FILE", default_value = "PolyDens.dat")]
    pub poly: String,

    /// Filename of the solvent density profile inside the instance directory.
    #[arg(long, value_name = "FILE", default_value = "SolvDens.dat")]
    pub solv: String,

    /// Overlap integral below which the system counts as "no sorption".
    #[arg(long, value_name = "FLOAT", default_value_t = 0.2)]
    pub overlap_threshold: f64,
}
