use super::load_trajectory;
use crate::cli::DownsampleArgs;
use crate::error::{CliError, Result};
use lammpstrj::core::io::lammpstrj::LammpsDumpFile;
use lammpstrj::core::io::traits::TrajectoryFile;
use lammpstrj::engine::config::LoadConfig;
use tracing::info;

/// `config.stride` already carries `--stride`, which takes precedence over file values.
pub fn run(args: DownsampleArgs, config: &LoadConfig) -> Result<()> {
    let trajectory = load_trajectory(&args.input, config)?;

    info!(
        frames = trajectory.frame_count(),
        "Writing downsampled trajectory to {:?}", &args.output
    );
    LammpsDumpFile::write_to_path(&trajectory, &args.output).map_err(|e| {
        CliError::FileWriting {
            path: args.output.clone(),
            source: e.into(),
        }
    })?;

    println!(
        "Wrote {} frame(s) (stride {}) to {}",
        trajectory.frame_count(),
        config.stride,
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::DRIFTING_DUMP;
    use crate::config::build_config;
    use lammpstrj::core::models::trajectory::Trajectory;
    use std::fs;

    #[test]
    fn run_writes_every_nth_frame() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.lammpstrj");
        let output = dir.path().join("out.lammpstrj");
        fs::write(&input, DRIFTING_DUMP).unwrap();

        let config = build_config(None, &[], Some(2)).unwrap();
        let args = DownsampleArgs {
            input,
            output: output.clone(),
            stride: 2,
        };
        run(args, &config).unwrap();

        let written = LammpsDumpFile::read_from_path(&output).unwrap();
        assert_eq!(written.timesteps(), vec![0, 200]);
        assert!(written.uniform_atom_count());
    }

    #[test]
    fn output_round_trips_through_the_parser() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.lammpstrj");
        let output = dir.path().join("out.lammpstrj");
        fs::write(&input, DRIFTING_DUMP).unwrap();

        let args = DownsampleArgs {
            input,
            output: output.clone(),
            stride: 1,
        };
        run(args, &LoadConfig::default()).unwrap();

        let original: Trajectory = DRIFTING_DUMP.parse().unwrap();
        let written = LammpsDumpFile::read_from_path(&output).unwrap();
        assert_eq!(written.timesteps(), original.timesteps());
        assert_eq!(written.positions_for_id(2), original.positions_for_id(2));
    }

    #[test]
    fn unwritable_output_is_reported_as_a_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.lammpstrj");
        let output = dir.path().join("missing").join("out.lammpstrj");
        fs::write(&input, DRIFTING_DUMP).unwrap();

        let args = DownsampleArgs {
            input,
            output: output.clone(),
            stride: 1,
        };
        let err = run(args, &LoadConfig::default()).unwrap_err();
        assert!(matches!(&err, CliError::FileWriting { path, .. } if path == &output));
        assert!(err.to_string().starts_with("Failed to write file"));
    }
}
