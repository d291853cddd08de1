use nalgebra::Point3;

/// A single atom line of a trajectory frame.
///
/// Coordinates are stored exactly as read. In the usual `xs ys zs` dumps they are
/// fractional positions in `[0, 1]` relative to the frame's box extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomRecord {
    /// The atom id, unique within a well-formed frame.
    pub id: i64,
    /// The numeric LAMMPS atom type.
    pub atom_type: i64,
    /// The fractional coordinates of the atom.
    pub position: Point3<f64>,
}

impl AtomRecord {
    pub fn new(id: i64, atom_type: i64, position: Point3<f64>) -> Self {
        Self {
            id,
            atom_type,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stores_all_fields() {
        let record = AtomRecord::new(7, 2, Point3::new(0.1, 0.2, 0.3));
        assert_eq!(record.id, 7);
        assert_eq!(record.atom_type, 2);
        assert_eq!(record.position.x, 0.1);
        assert_eq!(record.position.y, 0.2);
        assert_eq!(record.position.z, 0.3);
    }
}
