use crate::core::io::lammpstrj::{LammpsDumpFile, parse_str};
use crate::core::io::traits::TrajectoryFile;
use crate::core::models::trajectory::Trajectory;
use crate::engine::config::LoadConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use std::path::Path;
use tracing::{info, instrument};

/// Loads a trajectory from `path` and applies the configured stride.
///
/// # Errors
///
/// Returns [`EngineError::Parse`] for I/O or parse failures and
/// [`EngineError::Trajectory`] for an invalid stride.
#[instrument(skip_all, name = "load_workflow", fields(path = %path.as_ref().display()))]
pub fn run<P: AsRef<Path>>(
    path: P,
    config: &LoadConfig,
    reporter: &ProgressReporter,
) -> Result<Trajectory, EngineError> {
    info!("Reading trajectory file.");
    let trajectory = LammpsDumpFile::read_from_path_with(&path, &config.parse, reporter)?;
    apply_stride(trajectory, config, reporter)
}

/// Same as [`run`] for text that is already in memory.
#[instrument(skip_all, name = "load_workflow")]
pub fn run_from_str(
    text: &str,
    config: &LoadConfig,
    reporter: &ProgressReporter,
) -> Result<Trajectory, EngineError> {
    let trajectory = parse_str(text, &config.parse, reporter)?;
    apply_stride(trajectory, config, reporter)
}

fn apply_stride(
    trajectory: Trajectory,
    config: &LoadConfig,
    reporter: &ProgressReporter,
) -> Result<Trajectory, EngineError> {
    if config.stride == 1 {
        return Ok(trajectory);
    }
    let reduced = trajectory.downsample(config.stride)?;
    info!(
        stride = config.stride,
        before = trajectory.frame_count(),
        after = reduced.frame_count(),
        "Trajectory downsampled."
    );
    reporter.message(format!(
        "Downsampled {} -> {} frames (stride {})",
        trajectory.frame_count(),
        reduced.frame_count(),
        config.stride
    ));
    Ok(reduced)
}
