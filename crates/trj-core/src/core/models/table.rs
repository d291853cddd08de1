use super::atom::AtomRecord;
use itertools::Itertools;

/// The atom records of one frame, sorted ascending by id.
pub type AtomTable = Vec<AtomRecord>;

/// Storage for the atom tables of every frame.
///
/// The shape is explicit at the type level: when every frame holds the same number of
/// atoms the records are kept in one dense, row-major `[frame][atom]` buffer; otherwise
/// each frame keeps an independently sized table.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameTables {
    /// Every frame has exactly `atoms_per_frame` records.
    Uniform {
        frame_count: usize,
        atoms_per_frame: usize,
        records: Vec<AtomRecord>,
    },
    /// Frames have differing atom counts.
    Ragged(Vec<AtomTable>),
}

impl Default for FrameTables {
    fn default() -> Self {
        FrameTables::Uniform {
            frame_count: 0,
            atoms_per_frame: 0,
            records: Vec::new(),
        }
    }
}

impl FrameTables {
    /// Packs per-frame tables, choosing the dense layout when all lengths agree.
    ///
    /// An empty input is considered uniform.
    pub fn from_tables(tables: Vec<AtomTable>) -> Self {
        if !tables.iter().map(Vec::len).all_equal() {
            return FrameTables::Ragged(tables);
        }
        let frame_count = tables.len();
        let atoms_per_frame = tables.first().map_or(0, Vec::len);
        FrameTables::Uniform {
            frame_count,
            atoms_per_frame,
            records: tables.into_iter().flatten().collect(),
        }
    }

    pub fn is_uniform(&self) -> bool {
        matches!(self, FrameTables::Uniform { .. })
    }

    pub fn len(&self) -> usize {
        match self {
            FrameTables::Uniform { frame_count, .. } => *frame_count,
            FrameTables::Ragged(tables) => tables.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The common atom count, if the layout is uniform.
    pub fn atoms_per_frame(&self) -> Option<usize> {
        match self {
            FrameTables::Uniform {
                atoms_per_frame, ..
            } => Some(*atoms_per_frame),
            FrameTables::Ragged(_) => None,
        }
    }

    /// The dense row-major `[frame][atom]` buffer, if the layout is uniform.
    pub fn as_dense(&self) -> Option<&[AtomRecord]> {
        match self {
            FrameTables::Uniform { records, .. } => Some(records),
            FrameTables::Ragged(_) => None,
        }
    }

    pub fn get(&self, frame: usize) -> Option<&[AtomRecord]> {
        match self {
            FrameTables::Uniform {
                frame_count,
                atoms_per_frame,
                records,
            } => {
                if frame >= *frame_count {
                    return None;
                }
                let start = frame * atoms_per_frame;
                records.get(start..start + atoms_per_frame)
            }
            FrameTables::Ragged(tables) => tables.get(frame).map(Vec::as_slice),
        }
    }

    pub fn iter(&self) -> Tables<'_> {
        Tables {
            tables: self,
            next: 0,
        }
    }

    pub fn atom_counts(&self) -> Vec<usize> {
        self.iter().map(<[AtomRecord]>::len).collect()
    }

    /// Builds a new storage from the frames at `indices`, re-deciding the layout.
    pub fn select(&self, indices: impl IntoIterator<Item = usize>) -> Self {
        let tables = indices
            .into_iter()
            .filter_map(|i| self.get(i))
            .map(<[AtomRecord]>::to_vec)
            .collect();
        Self::from_tables(tables)
    }

    pub fn into_tables(self) -> Vec<AtomTable> {
        match self {
            FrameTables::Uniform {
                atoms_per_frame,
                records,
                frame_count,
            } => {
                if atoms_per_frame == 0 {
                    return vec![Vec::new(); frame_count];
                }
                records
                    .chunks_exact(atoms_per_frame)
                    .map(<[AtomRecord]>::to_vec)
                    .collect()
            }
            FrameTables::Ragged(tables) => tables,
        }
    }
}

/// Iterator over the per-frame tables of a [`FrameTables`].
pub struct Tables<'a> {
    tables: &'a FrameTables,
    next: usize,
}

impl<'a> Iterator for Tables<'a> {
    type Item = &'a [AtomRecord];

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.tables.get(self.next)?;
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.tables.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Tables<'_> {}

impl<'a> IntoIterator for &'a FrameTables {
    type Item = &'a [AtomRecord];
    type IntoIter = Tables<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn table(ids: &[i64]) -> AtomTable {
        ids.iter()
            .map(|&id| AtomRecord::new(id, 1, Point3::new(0.0, 0.0, id as f64 / 10.0)))
            .collect()
    }

    #[test]
    fn equal_lengths_produce_dense_layout() {
        let tables = FrameTables::from_tables(vec![table(&[1, 2]), table(&[1, 2]), table(&[3, 4])]);
        assert!(tables.is_uniform());
        assert_eq!(tables.len(), 3);
        assert_eq!(tables.atoms_per_frame(), Some(2));
        assert_eq!(tables.as_dense().unwrap().len(), 6);
        let ids: Vec<i64> = tables.get(2).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert!(tables.get(3).is_none());
    }

    #[test]
    fn differing_lengths_produce_ragged_layout() {
        let tables = FrameTables::from_tables(vec![table(&[1, 2]), table(&[1])]);
        assert!(!tables.is_uniform());
        assert_eq!(tables.atoms_per_frame(), None);
        assert!(tables.as_dense().is_none());
        assert_eq!(tables.atom_counts(), vec![2, 1]);
    }

    #[test]
    fn empty_input_is_uniform_and_empty() {
        let tables = FrameTables::from_tables(Vec::new());
        assert!(tables.is_uniform());
        assert!(tables.is_empty());
        assert_eq!(tables.iter().count(), 0);
    }

    #[test]
    fn select_redecides_layout() {
        let tables = FrameTables::from_tables(vec![table(&[1, 2]), table(&[1]), table(&[1, 2])]);
        let selected = tables.select([0, 2]);
        assert!(selected.is_uniform());
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn into_tables_restores_per_frame_tables() {
        let original = vec![table(&[1, 2]), table(&[3, 4])];
        let tables = FrameTables::from_tables(original.clone());
        assert_eq!(tables.into_tables(), original);
    }

    #[test]
    fn iterator_reports_exact_size() {
        let tables = FrameTables::from_tables(vec![table(&[1]), table(&[2]), table(&[3])]);
        let mut iter = tables.iter();
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
    }
}
