pub mod downsample;
pub mod info;
pub mod track;

use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use lammpstrj::core::models::trajectory::Trajectory;
use lammpstrj::engine::config::LoadConfig;
use lammpstrj::engine::error::EngineError;
use lammpstrj::engine::progress::ProgressReporter;
use lammpstrj::workflows;
use std::path::Path;
use tracing::info;

/// Runs the load workflow on `input`, drawing progress on stderr.
///
/// Parse failures are reported against the input path so the user sees both the file
/// and the offending line.
fn load_trajectory(input: &Path, config: &LoadConfig) -> Result<Trajectory> {
    info!("Loading trajectory from {:?}", input);
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    workflows::load::run(input, config, &reporter).map_err(|e| match e {
        EngineError::Parse(source) => CliError::FileParsing {
            path: input.to_path_buf(),
            source: source.into(),
        },
        other => CliError::Core(other),
    })
}
