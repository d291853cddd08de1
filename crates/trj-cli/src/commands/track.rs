use super::load_trajectory;
use crate::cli::TrackArgs;
use crate::error::{CliError, Result};
use lammpstrj::core::models::trajectory::Trajectory;
use lammpstrj::core::utils::geometry::box_extent_to_absolute;
use lammpstrj::engine::config::LoadConfig;
use serde::Serialize;
use std::io::Write;
use tracing::{info, warn};

#[derive(Debug, Serialize, PartialEq)]
struct TrackRow {
    frame: usize,
    timestep: i64,
    id: i64,
    #[serde(rename = "type")]
    atom_type: i64,
    x: f64,
    y: f64,
    z: f64,
}

pub fn run(args: TrackArgs, config: &LoadConfig) -> Result<()> {
    let trajectory = load_trajectory(&args.input, config)?;

    let ids = if args.ids.is_empty() {
        default_ids(&trajectory)
    } else {
        args.ids.clone()
    };
    if ids.is_empty() {
        return Err(CliError::Argument(
            "no atoms to track: the trajectory has no frames".to_string(),
        ));
    }

    let rows = collect_rows(&trajectory, &ids, args.absolute);
    info!(atoms = ids.len(), rows = rows.len(), "Writing tracks to {:?}", &args.output);

    let mut writer = csv::Writer::from_path(&args.output)?;
    write_rows(&mut writer, &rows)?;

    println!(
        "Wrote {} position(s) for {} atom(s) to {}",
        rows.len(),
        ids.len(),
        args.output.display()
    );
    Ok(())
}

/// Every id present in the first frame, ascending.
fn default_ids(trajectory: &Trajectory) -> Vec<i64> {
    trajectory
        .table(0)
        .map(|table| {
            let mut ids: Vec<i64> = table.iter().map(|r| r.id).collect();
            ids.dedup();
            ids
        })
        .unwrap_or_default()
}

fn collect_rows(trajectory: &Trajectory, ids: &[i64], absolute: bool) -> Vec<TrackRow> {
    let frames = trajectory.frames();
    let mut rows = Vec::new();
    for &id in ids {
        let records = trajectory.records_for_id(id);
        if records.is_empty() {
            warn!(id, "Atom id does not appear in any frame.");
        }
        rows.extend(records.into_iter().map(|(frame, record)| {
            let meta = &frames[frame];
            let position = if absolute {
                box_extent_to_absolute(&record.position, &meta.extent)
            } else {
                record.position
            };
            TrackRow {
                frame,
                timestep: meta.timestep,
                id: record.id,
                atom_type: record.atom_type,
                x: position.x,
                y: position.y,
                z: position.z,
            }
        }));
    }
    rows
}

fn write_rows<W: Write>(writer: &mut csv::Writer<W>, rows: &[TrackRow]) -> Result<()> {
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::DRIFTING_DUMP;
    use std::fs;

    fn trajectory() -> Trajectory {
        DRIFTING_DUMP.parse().unwrap()
    }

    #[test]
    fn default_ids_come_from_the_first_frame() {
        assert_eq!(default_ids(&trajectory()), vec![1, 2]);
    }

    #[test]
    fn absent_frames_are_skipped_not_padded() {
        let rows = collect_rows(&trajectory(), &[2], false);
        let frames: Vec<usize> = rows.iter().map(|r| r.frame).collect();
        assert_eq!(frames, vec![0, 2]);
        assert_eq!(rows[1].timestep, 200);
        assert_eq!(rows[1].atom_type, 2);
    }

    #[test]
    fn absolute_rows_use_each_frames_box() {
        let rows = collect_rows(&trajectory(), &[2], true);
        assert_eq!((rows[0].x, rows[0].z), (5.0, 5.0));
        assert_eq!((rows[1].x, rows[1].z), (10.0, 5.0));
    }

    #[test]
    fn unknown_ids_produce_no_rows() {
        assert!(collect_rows(&trajectory(), &[42], false).is_empty());
    }

    #[test]
    fn csv_has_expected_header_and_rows() {
        let rows = collect_rows(&trajectory(), &[1], false);
        let mut writer = csv::Writer::from_writer(Vec::new());
        write_rows(&mut writer, &rows).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("frame,timestep,id,type,x,y,z"));
        assert_eq!(lines.next(), Some("0,0,1,1,0.1,0.2,0.3"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn run_writes_a_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("dump.lammpstrj");
        let output = dir.path().join("tracks.csv");
        fs::write(&input, DRIFTING_DUMP).unwrap();

        let args = TrackArgs {
            input,
            output: output.clone(),
            ids: vec![],
            absolute: false,
            stride: None,
        };
        run(args, &LoadConfig::default()).unwrap();

        let text = fs::read_to_string(output).unwrap();
        assert_eq!(text.lines().count(), 1 + 3 + 2);
    }
}
