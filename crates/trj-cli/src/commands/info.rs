use super::load_trajectory;
use crate::cli::InfoArgs;
use crate::error::Result;
use lammpstrj::core::models::trajectory::Trajectory;
use lammpstrj::engine::config::LoadConfig;
use std::fmt::Write as _;
use tracing::info;

pub fn run(args: InfoArgs, config: &LoadConfig) -> Result<()> {
    let trajectory = load_trajectory(&args.input, config)?;
    info!("Rendering trajectory summary.");
    print!("{}", render_report(&trajectory));
    Ok(())
}

fn render_report(trajectory: &Trajectory) -> String {
    let mut report = format!("{}\n", trajectory.summary());
    if !trajectory.diagnostics().is_empty() {
        report.push_str("\nDiagnostics:\n");
        for diagnostic in trajectory.diagnostics() {
            let _ = writeln!(report, "  - {}", diagnostic);
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::DRIFTING_DUMP;
    use crate::error::CliError;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn report_contains_summary_and_diagnostics() {
        let trajectory: Trajectory = DRIFTING_DUMP.parse().unwrap();
        let report = render_report(&trajectory);

        assert!(report.contains("frames"));
        assert!(report.contains("uniform_atom_count  false"));
        assert!(report.contains("Diagnostics:"));
        assert!(report.lines().any(|l| l.starts_with("  - ")));
    }

    #[test]
    fn downsampled_report_can_become_uniform() {
        let trajectory = DRIFTING_DUMP
            .parse::<Trajectory>()
            .unwrap()
            .downsample(2)
            .unwrap();
        let report = render_report(&trajectory);
        assert!(report.contains("uniform_atom_count  true"));
        assert!(report.contains("diagnostics         0"));
        assert!(!report.contains("Diagnostics:"));
    }

    #[test]
    fn run_reports_parse_failures_with_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.lammpstrj");
        fs::write(&input, DRIFTING_DUMP.replace("0.25", "oops")).unwrap();

        let err = run(
            InfoArgs {
                input: input.clone(),
                stride: None,
            },
            &LoadConfig::default(),
        )
        .unwrap_err();

        match err {
            CliError::FileParsing { path, source } => {
                assert_eq!(path, input);
                assert!(source.to_string().contains("line 32"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn run_on_missing_file_fails() {
        let args = InfoArgs {
            input: PathBuf::from("/definitely/not/here.lammpstrj"),
            stride: None,
        };
        assert!(run(args, &LoadConfig::default()).is_err());
    }
}
