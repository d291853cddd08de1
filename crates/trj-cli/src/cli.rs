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
    author,
    version,
    about = "trj - inspect, track and downsample LAMMPS text trajectory dumps (.lammpstrj).",
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

    /// Set the number of threads used to build atom tables.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Path to a parsing configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S parsing.duplicate-ids=strict
    #[arg(short = 'S', long = "set", global = true, value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a summary of a trajectory and any anomalies found while parsing.
    Info(InfoArgs),
    /// Export the per-frame positions of selected atoms as CSV.
    Track(TrackArgs),
    /// Keep every N-th frame of a trajectory and write it back out.
    Downsample(DownsampleArgs),
}

/// Arguments for the `info` subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the input trajectory (e.g., dump.lammpstrj).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Keep only every N-th frame before summarizing.
    #[arg(long, value_name = "N")]
    pub stride: Option<usize>,
}

/// Arguments for the `track` subcommand.
#[derive(Args, Debug)]
pub struct TrackArgs {
    /// Path to the input trajectory.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output CSV file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Atom id to track. Can be used multiple times.
    /// Defaults to every atom present in the first frame.
    #[arg(long = "id", value_name = "ID")]
    pub ids: Vec<i64>,

    /// Convert fractional coordinates to absolute ones using each frame's box.
    #[arg(long)]
    pub absolute: bool,

    /// Keep only every N-th frame.
    #[arg(long, value_name = "N")]
    pub stride: Option<usize>,
}

/// Arguments for the `downsample` subcommand.
#[derive(Args, Debug)]
pub struct DownsampleArgs {
    /// Path to the input trajectory.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the downsampled trajectory.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Keep every N-th frame, starting with the first.
    #[arg(long, required = true, value_name = "N")]
    pub stride: usize,
}
