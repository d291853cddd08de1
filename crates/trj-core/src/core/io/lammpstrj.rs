use super::builder::build_tables;
use super::columns::ColumnMap;
use super::error::ParseError;
use super::scanner::scan_frames;
use super::traits::TrajectoryFile;
use crate::core::models::frame::FrameMetadata;
use crate::core::models::trajectory::Trajectory;
use crate::engine::config::{ColumnLayout, ParseConfig};
use crate::engine::progress::{Progress, ProgressReporter};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use tracing::{info, instrument};

const DEFAULT_BOUNDARY_FLAGS: &str = "pp pp pp";
const DEFAULT_COORD_COLUMNS: [&str; 3] = ["xs", "ys", "zs"];
const TILT_FLAGS: [&str; 3] = ["xy", "xz", "yz"];

/// The LAMMPS text dump format (`ITEM:` blocks, one frame per `ITEM: TIMESTEP`).
pub struct LammpsDumpFile;

/// Parses trajectory text that has already been read into memory.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered, in file order; no partially built
/// trajectory is ever returned.
#[instrument(skip_all, name = "parse_lammpstrj")]
pub fn parse_str(
    text: &str,
    config: &ParseConfig,
    reporter: &ProgressReporter,
) -> Result<Trajectory, ParseError> {
    let lines: Vec<&str> = text.lines().collect();

    reporter.report(Progress::PhaseStart {
        name: "Scanning frames",
    });
    let scan = scan_frames(&lines, config.separator)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Building atom tables",
    });
    let built = build_tables(&lines, scan, config, reporter)?;
    reporter.report(Progress::PhaseFinish);

    for diagnostic in &built.diagnostics {
        reporter.warning(diagnostic.to_string());
    }
    let trajectory = built.into_trajectory();
    info!(
        frames = trajectory.frame_count(),
        uniform = trajectory.uniform_atom_count(),
        "Trajectory parsed."
    );
    Ok(trajectory)
}

impl FromStr for Trajectory {
    type Err = ParseError;

    /// Parses with the default options (whitespace separator, fixed `id type x y z`
    /// columns, permissive duplicate ids).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_str(s, &ParseConfig::default(), &ProgressReporter::new())
    }
}

/// Coordinate column names for the written header. Positions are always written as
/// fractions, so the input's spelling is reused only when it is a scaled one.
fn coordinate_columns(header: &[String]) -> [&str; 3] {
    match ColumnMap::resolve(ColumnLayout::Header, header) {
        Ok(map) if map.all_scaled() => [
            header[map.x].as_str(),
            header[map.y].as_str(),
            header[map.z].as_str(),
        ],
        _ => DEFAULT_COORD_COLUMNS,
    }
}

/// The `BOX BOUNDS` flags to write. The `xy xz yz` marker is emitted exactly when tilt
/// factors are written, whatever the input declared.
fn box_flags(meta: &FrameMetadata) -> String {
    let boundaries = meta
        .boundary_flags
        .split_whitespace()
        .filter(|flag| !TILT_FLAGS.contains(flag))
        .collect::<Vec<_>>()
        .join(" ");
    let boundaries = if boundaries.is_empty() {
        DEFAULT_BOUNDARY_FLAGS.to_string()
    } else {
        boundaries
    };
    match meta.tilt {
        Some(_) => format!("{} {}", TILT_FLAGS.join(" "), boundaries),
        None => boundaries,
    }
}

impl TrajectoryFile for LammpsDumpFile {
    type Error = ParseError;

    fn read_with(
        reader: &mut impl BufRead,
        config: &ParseConfig,
        reporter: &ProgressReporter,
    ) -> Result<Trajectory, Self::Error> {
        let mut text = String::new();
        io::Read::read_to_string(reader, &mut text)?;
        parse_str(&text, config, reporter)
    }

    fn write_to(trajectory: &Trajectory, writer: &mut impl Write) -> Result<(), Self::Error> {
        let [cx, cy, cz] = coordinate_columns(trajectory.atoms_header());

        for (meta, table) in trajectory.frames().iter().zip(trajectory.tables()) {
            let e = &meta.extent;
            let bounds = [(e.x_lo, e.x_hi), (e.y_lo, e.y_hi), (e.z_lo, e.z_hi)];

            writeln!(writer, "ITEM: TIMESTEP")?;
            writeln!(writer, "{}", meta.timestep)?;
            writeln!(writer, "ITEM: NUMBER OF ATOMS")?;
            writeln!(writer, "{}", table.len())?;
            writeln!(writer, "ITEM: BOX BOUNDS {}", box_flags(meta))?;
            for (axis, (lo, hi)) in bounds.into_iter().enumerate() {
                match meta.tilt {
                    Some(tilt) => writeln!(writer, "{} {} {}", lo, hi, tilt[axis])?,
                    None => writeln!(writer, "{} {}", lo, hi)?,
                }
            }
            writeln!(writer, "ITEM: ATOMS id type {} {} {}", cx, cy, cz)?;
            for atom in table {
                writeln!(
                    writer,
                    "{} {} {} {} {}",
                    atom.id, atom.atom_type, atom.position.x, atom.position.y, atom.position.z
                )?;
            }
        }
        Ok(())
    }
}
