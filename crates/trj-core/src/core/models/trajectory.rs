use super::atom::AtomRecord;
use super::diagnostic::Diagnostic;
use super::frame::{BoxExtent, FrameMetadata};
use super::table::{AtomTable, FrameTables};
use crate::core::utils::geometry::box_extent_to_absolute;
use itertools::{Itertools, MinMaxResult};
use nalgebra::Point3;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrajectoryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// A parsed trajectory: per-frame metadata and index-aligned atom tables.
///
/// The aggregate is a single-owner value. It is built once from raw input and afterwards
/// only read or transformed into a new value (see [`Trajectory::downsample`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    frames: Vec<FrameMetadata>,
    tables: FrameTables,
    atom_types: BTreeSet<i64>,
    atoms_header: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Trajectory {
    /// Assembles a trajectory from frame metadata and their atom tables.
    ///
    /// Tables are stably sorted by id, each frame's `atom_count` is synchronised with its
    /// table length and the atom type set is derived from the first table.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::InvalidArgument`] if `frames` and `tables` differ in length.
    pub fn from_parts(
        mut frames: Vec<FrameMetadata>,
        mut tables: Vec<AtomTable>,
        atoms_header: Vec<String>,
        diagnostics: Vec<Diagnostic>,
    ) -> Result<Self, TrajectoryError> {
        if frames.len() != tables.len() {
            return Err(TrajectoryError::InvalidArgument(format!(
                "{} frame metadata entries but {} atom tables",
                frames.len(),
                tables.len()
            )));
        }
        for (meta, table) in frames.iter_mut().zip(&mut tables) {
            table.sort_by_key(|r| r.id);
            meta.atom_count = table.len();
        }
        Ok(Self::new(
            frames,
            FrameTables::from_tables(tables),
            atoms_header,
            diagnostics,
        ))
    }

    /// Wraps already-aligned parts; callers guarantee sorted tables and matching lengths.
    pub(crate) fn new(
        frames: Vec<FrameMetadata>,
        tables: FrameTables,
        atoms_header: Vec<String>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        debug_assert_eq!(frames.len(), tables.len());
        let atom_types = collect_atom_types(&tables);
        Self {
            frames,
            tables,
            atom_types,
            atoms_header,
            diagnostics,
        }
    }

    pub fn frames(&self) -> &[FrameMetadata] {
        &self.frames
    }

    pub fn tables(&self) -> &FrameTables {
        &self.tables
    }

    pub fn table(&self, frame: usize) -> Option<&[AtomRecord]> {
        self.tables.get(frame)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// True iff every frame holds the same number of atoms.
    ///
    /// When false, per-frame tables differ in length and callers must not assume a
    /// dense `[frame][atom]` layout.
    pub fn uniform_atom_count(&self) -> bool {
        self.tables.is_uniform()
    }

    /// The atom types present in the first frame. Empty if there are no frames.
    pub fn atom_types(&self) -> &BTreeSet<i64> {
        &self.atom_types
    }

    /// The column names of the first `ITEM: ATOMS` header.
    pub fn atoms_header(&self) -> &[String] {
        &self.atoms_header
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn timesteps(&self) -> Vec<i64> {
        self.frames.iter().map(|f| f.timestep).collect()
    }

    pub fn extents(&self) -> impl ExactSizeIterator<Item = &BoxExtent> + '_ {
        self.frames.iter().map(|f| &f.extent)
    }

    pub fn first_extent(&self) -> Option<&BoxExtent> {
        self.frames.first().map(|f| &f.extent)
    }

    /// Fractional coordinates of atom `id` in every frame where it appears, in frame order.
    ///
    /// Frames without the atom are skipped, not padded; an id that never appears yields an
    /// empty vector. Duplicate ids within a frame contribute every occurrence.
    pub fn positions_for_id(&self, id: i64) -> Vec<Point3<f64>> {
        self.tables
            .iter()
            .flat_map(|table| find_by_id(table, id))
            .map(|record| record.position)
            .collect()
    }

    /// Every record of atom `id` paired with the index of the frame it was found in.
    pub fn records_for_id(&self, id: i64) -> Vec<(usize, &AtomRecord)> {
        self.tables
            .iter()
            .enumerate()
            .flat_map(|(index, table)| find_by_id(table, id).iter().map(move |r| (index, r)))
            .collect()
    }

    /// Absolute positions of atom `id` as `(frame_index, xyz)` pairs.
    ///
    /// Each position is converted with its own frame's extent. This is the keyframe track a
    /// scene builder needs to animate one atom instance.
    pub fn absolute_positions_for_id(&self, id: i64) -> Vec<(usize, Point3<f64>)> {
        self.tables
            .iter()
            .zip(&self.frames)
            .enumerate()
            .flat_map(|(index, (table, meta))| {
                find_by_id(table, id).iter().map(move |record| {
                    (index, box_extent_to_absolute(&record.position, &meta.extent))
                })
            })
            .collect()
    }

    /// Returns a new trajectory keeping frames `0, stride, 2*stride, ...`.
    ///
    /// `downsample(1)` is the identity and strides compose multiplicatively. Parse
    /// diagnostics are carried over, except [`Diagnostic::AtomCountDrift`], which is
    /// recomputed from the kept frames.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::InvalidArgument`] if `stride` is zero.
    pub fn downsample(&self, stride: usize) -> Result<Self, TrajectoryError> {
        if stride == 0 {
            return Err(TrajectoryError::InvalidArgument(
                "downsample stride must be a positive integer".to_string(),
            ));
        }
        let indices = (0..self.frames.len()).step_by(stride);
        let frames: Vec<FrameMetadata> = indices.clone().map(|i| self.frames[i].clone()).collect();
        let tables = self.tables.select(indices);
        let atom_types = collect_atom_types(&tables);
        let mut diagnostics: Vec<Diagnostic> = self
            .diagnostics
            .iter()
            .filter(|d| !matches!(d, Diagnostic::AtomCountDrift { .. }))
            .cloned()
            .collect();
        if let MinMaxResult::MinMax(min, max) = tables.atom_counts().into_iter().minmax() {
            if min != max {
                diagnostics.push(Diagnostic::AtomCountDrift { min, max });
            }
        }
        Ok(Self {
            frames,
            tables,
            atom_types,
            atoms_header: self.atoms_header.clone(),
            diagnostics,
        })
    }

    /// An explicit listing of the trajectory's public fields and their sizes.
    pub fn summary(&self) -> TrajectorySummary {
        let counts = self.tables.atom_counts();
        TrajectorySummary {
            frame_count: self.frames.len(),
            uniform_atom_count: self.uniform_atom_count(),
            min_atom_count: counts.iter().copied().min().unwrap_or(0),
            max_atom_count: counts.iter().copied().max().unwrap_or(0),
            atom_types: self.atom_types.iter().copied().collect(),
            first_timestep: self.frames.first().map(|f| f.timestep),
            last_timestep: self.frames.last().map(|f| f.timestep),
            first_extent: self.first_extent().copied(),
            atoms_header: self.atoms_header.clone(),
            diagnostic_count: self.diagnostics.len(),
        }
    }
}

fn find_by_id(table: &[AtomRecord], id: i64) -> &[AtomRecord] {
    let start = table.partition_point(|r| r.id < id);
    let end = start + table[start..].partition_point(|r| r.id == id);
    &table[start..end]
}

fn collect_atom_types(tables: &FrameTables) -> BTreeSet<i64> {
    tables
        .get(0)
        .map(|first| first.iter().map(|r| r.atom_type).collect())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySummary {
    pub frame_count: usize,
    pub uniform_atom_count: bool,
    pub min_atom_count: usize,
    pub max_atom_count: usize,
    pub atom_types: Vec<i64>,
    pub first_timestep: Option<i64>,
    pub last_timestep: Option<i64>,
    pub first_extent: Option<BoxExtent>,
    pub atoms_header: Vec<String>,
    pub diagnostic_count: usize,
}

impl fmt::Display for TrajectorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let atoms = if self.uniform_atom_count {
            format!("{} per frame", self.max_atom_count)
        } else {
            format!("{}..={} (varies)", self.min_atom_count, self.max_atom_count)
        };
        let timesteps = match (self.first_timestep, self.last_timestep) {
            (Some(first), Some(last)) => format!("{} .. {}", first, last),
            _ => "-".to_string(),
        };
        let types: Vec<String> = self.atom_types.iter().map(ToString::to_string).collect();

        writeln!(f, "{:<20}{}", "frames", self.frame_count)?;
        writeln!(f, "{:<20}{}", "timesteps", timesteps)?;
        writeln!(f, "{:<20}{}", "atoms", atoms)?;
        writeln!(f, "{:<20}{}", "uniform_atom_count", self.uniform_atom_count)?;
        writeln!(f, "{:<20}[{}]", "atom_types", types.join(", "))?;
        if let Some(e) = &self.first_extent {
            writeln!(
                f,
                "{:<20}[{}, {}] x [{}, {}] x [{}, {}]",
                "first_extent", e.x_lo, e.x_hi, e.y_lo, e.y_hi, e.z_lo, e.z_hi
            )?;
        }
        writeln!(f, "{:<20}{}", "atoms_header", self.atoms_header.join(" "))?;
        write!(f, "{:<20}{}", "diagnostics", self.diagnostic_count)
    }
}
