use super::columns::ColumnMap;
use super::error::ParseError;
use super::scanner::{FrameScanResult, LineSpan};
use super::tokenizer::{self, InvalidNumber};
use crate::core::models::atom::AtomRecord;
use crate::core::models::diagnostic::Diagnostic;
use crate::core::models::frame::{BoxExtent, FrameMetadata};
use crate::core::models::table::{AtomTable, FrameTables};
use crate::core::models::trajectory::Trajectory;
use crate::core::utils::geometry::absolute_to_fractional;
use crate::engine::config::{DuplicatePolicy, ParseConfig};
use crate::engine::progress::{Progress, ProgressReporter};
use itertools::{Itertools, MinMaxResult};
use nalgebra::Point3;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Index-aligned frame metadata and atom tables, ready to become a [`Trajectory`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltTables {
    pub metadata: Vec<FrameMetadata>,
    pub tables: FrameTables,
    pub atoms_header: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuiltTables {
    pub fn uniform_atom_count(&self) -> bool {
        self.tables.is_uniform()
    }

    pub fn into_trajectory(self) -> Trajectory {
        Trajectory::new(
            self.metadata,
            self.tables,
            self.atoms_header,
            self.diagnostics,
        )
    }
}

/// The parsed contents of one atom block.
struct FrameBlock {
    table: AtomTable,
    /// `(id, line)` of every record whose id repeats an earlier record in the block.
    duplicates: Vec<(i64, usize)>,
}

fn parse_block(
    lines: &[&str],
    span: LineSpan,
    extent: &BoxExtent,
    columns: &ColumnMap,
    sep: char,
) -> Result<FrameBlock, ParseError> {
    let min_fields = columns.min_fields();
    let mut rows: Vec<(AtomRecord, usize)> = Vec::with_capacity(span.len());
    let mut fields: Vec<&str> = Vec::with_capacity(min_fields);

    for index in span.range() {
        let line = index + 1;
        fields.clear();
        fields.extend(tokenizer::fields(lines[index], sep));
        if fields.is_empty() {
            continue;
        }
        if fields.len() < min_fields {
            return Err(ParseError::MissingField {
                line,
                expected: min_fields,
                found: fields.len(),
            });
        }
        let malformed = |e: InvalidNumber| ParseError::MalformedNumber {
            line,
            value: e.value,
        };
        let id = tokenizer::parse_i64(fields[columns.id]).map_err(malformed)?;
        let atom_type = tokenizer::parse_i64(fields[columns.atom_type]).map_err(malformed)?;
        let x = tokenizer::parse_f64(fields[columns.x]).map_err(malformed)?;
        let y = tokenizer::parse_f64(fields[columns.y]).map_err(malformed)?;
        let z = tokenizer::parse_f64(fields[columns.z]).map_err(malformed)?;
        let mut position = Point3::new(x, y, z);
        if !columns.all_scaled() {
            let fractional = absolute_to_fractional(&position, extent);
            for axis in (0..3).filter(|&axis| !columns.scaled[axis]) {
                position[axis] = fractional[axis];
            }
        }
        rows.push((AtomRecord::new(id, atom_type, position), line));
    }

    // Stable: records sharing an id stay in file order.
    rows.sort_by_key(|(record, _)| record.id);

    let duplicates = rows
        .iter()
        .tuple_windows()
        .filter(|((a, _), (b, _))| a.id == b.id)
        .map(|(_, (b, line))| (b.id, *line))
        .collect();
    let table = rows.into_iter().map(|(record, _)| record).collect();

    Ok(FrameBlock { table, duplicates })
}

/// Parses every frame's atom block into a table sorted ascending by id.
///
/// Frames whose block yields no records are dropped together with their metadata, so
/// frames and tables stay index-aligned. Each retained frame's `atom_count` becomes the
/// parsed record count; a disagreeing `NUMBER OF ATOMS` value is reported as a
/// diagnostic. When counts differ between frames the tables are stored ragged and an
/// [`Diagnostic::AtomCountDrift`] is emitted.
///
/// With the `parallel` feature blocks are parsed concurrently; results are still joined
/// in frame order and the first error in file order is returned.
///
/// # Errors
///
/// - [`ParseError::MalformedNumber`] for an unparsable id, type or coordinate field.
/// - [`ParseError::MissingField`] for an atom line with too few fields.
/// - [`ParseError::MissingColumn`] if the header layout lacks a required column.
/// - [`ParseError::DuplicateAtomId`] for a repeated id under [`DuplicatePolicy::Strict`].
#[instrument(skip_all, name = "build_tables", fields(frames = scan.metadata.len()))]
pub fn build_tables(
    lines: &[&str],
    scan: FrameScanResult,
    config: &ParseConfig,
    reporter: &ProgressReporter,
) -> Result<BuiltTables, ParseError> {
    let FrameScanResult {
        metadata,
        atom_block_spans,
        atoms_header,
        mut diagnostics,
    } = scan;
    let columns = ColumnMap::resolve(config.column_layout, &atoms_header)?;
    let sep = config.separator;

    reporter.report(Progress::TaskStart {
        total_steps: atom_block_spans.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = atom_block_spans.iter().zip(metadata.iter());

    #[cfg(feature = "parallel")]
    let iterator = atom_block_spans.par_iter().zip(metadata.par_iter());

    let blocks: Vec<Result<FrameBlock, ParseError>> = iterator
        .map(|(span, meta)| {
            let block = parse_block(lines, *span, &meta.extent, &columns, sep);
            reporter.report(Progress::TaskIncrement);
            block
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let mut kept_metadata = Vec::with_capacity(metadata.len());
    let mut tables = Vec::with_capacity(metadata.len());

    for (mut meta, block) in metadata.into_iter().zip(blocks) {
        let FrameBlock { table, duplicates } = block?;
        let timestep = meta.timestep;

        if let Some(&(id, line)) = duplicates.first() {
            if config.duplicate_ids == DuplicatePolicy::Strict {
                return Err(ParseError::DuplicateAtomId { line, id, timestep });
            }
        }
        for id in duplicates.iter().map(|&(id, _)| id).dedup() {
            warn!(timestep, id, "Duplicate atom id in frame.");
            diagnostics.push(Diagnostic::DuplicateAtomId { timestep, id });
        }

        if table.is_empty() {
            warn!(timestep, "Frame has no atom records; dropping it.");
            diagnostics.push(Diagnostic::EmptyFrameDropped { timestep });
            continue;
        }

        if let Some(declared) = meta.declared_atom_count {
            if declared != table.len() {
                warn!(
                    timestep,
                    declared,
                    parsed = table.len(),
                    "Declared atom count disagrees with atom lines present."
                );
                diagnostics.push(Diagnostic::DeclaredCountMismatch {
                    timestep,
                    declared,
                    parsed: table.len(),
                });
            }
        }

        meta.atom_count = table.len();
        kept_metadata.push(meta);
        tables.push(table);
    }

    if let MinMaxResult::MinMax(min, max) = tables.iter().map(Vec::len).minmax() {
        if min != max {
            warn!(
                min,
                max,
                "Beware, atom count varies between frames: atoms were lost or gained during \
                 the simulation."
            );
            let drift = Diagnostic::AtomCountDrift { min, max };
            diagnostics.push(drift);
        }
    }

    let tables = FrameTables::from_tables(tables);
    info!(
        frames = kept_metadata.len(),
        uniform = tables.is_uniform(),
        "Atom tables built."
    );
    debug!(diagnostics = diagnostics.len(), "Table build diagnostics collected.");

    Ok(BuiltTables {
        metadata: kept_metadata,
        tables,
        atoms_header,
        diagnostics,
    })
}
