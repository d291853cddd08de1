use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// The simulation box bounds of a single frame.
///
/// `lo <= hi` is expected on every axis but is not enforced: malformed input is
/// carried through untouched and conversions simply produce whatever the bounds imply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxExtent {
    pub x_lo: f64,
    pub x_hi: f64,
    pub y_lo: f64,
    pub y_hi: f64,
    pub z_lo: f64,
    pub z_hi: f64,
}

impl BoxExtent {
    pub fn new(x: (f64, f64), y: (f64, f64), z: (f64, f64)) -> Self {
        Self {
            x_lo: x.0,
            x_hi: x.1,
            y_lo: y.0,
            y_hi: y.1,
            z_lo: z.0,
            z_hi: z.1,
        }
    }

    /// The lower corner of the box.
    pub fn origin(&self) -> Point3<f64> {
        Point3::new(self.x_lo, self.y_lo, self.z_lo)
    }

    /// Edge lengths (`hi - lo`) along each axis.
    pub fn lengths(&self) -> Vector3<f64> {
        Vector3::new(
            self.x_hi - self.x_lo,
            self.y_hi - self.y_lo,
            self.z_hi - self.z_lo,
        )
    }

    /// Whether `lo <= hi` holds on all three axes.
    pub fn is_well_formed(&self) -> bool {
        self.x_lo <= self.x_hi && self.y_lo <= self.y_hi && self.z_lo <= self.z_hi
    }
}

impl Default for BoxExtent {
    /// The unit box, for which fractional and absolute coordinates coincide.
    fn default() -> Self {
        Self::new((0.0, 1.0), (0.0, 1.0), (0.0, 1.0))
    }
}

/// Per-frame metadata, one instance per retained frame in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMetadata {
    /// The simulation timestep from the `ITEM: TIMESTEP` block.
    pub timestep: i64,
    /// The observed number of atom records in the frame.
    ///
    /// The table builder overwrites the declared value with the parsed record count.
    pub atom_count: usize,
    /// The value of the `ITEM: NUMBER OF ATOMS` block, if one was present.
    pub declared_atom_count: Option<usize>,
    /// The box bounds of the frame.
    pub extent: BoxExtent,
    /// The boundary flags following `ITEM: BOX BOUNDS` (e.g. `pp pp pp`).
    pub boundary_flags: String,
    /// The `xy xz yz` tilt factors of a triclinic box, read from the third value of each
    /// box line. For triclinic boxes `extent` holds the bounding box LAMMPS writes.
    pub tilt: Option<[f64; 3]>,
}

impl FrameMetadata {
    pub fn new(timestep: i64) -> Self {
        Self {
            timestep,
            atom_count: 0,
            declared_atom_count: None,
            extent: BoxExtent::default(),
            boundary_flags: String::new(),
            tilt: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_and_origin_follow_bounds() {
        let extent = BoxExtent::new((-1.0, 3.0), (0.0, 2.0), (5.0, 6.5));
        assert_eq!(extent.origin(), Point3::new(-1.0, 0.0, 5.0));
        assert_eq!(extent.lengths(), Vector3::new(4.0, 2.0, 1.5));
        assert!(extent.is_well_formed());
    }

    #[test]
    fn inverted_bounds_are_reported_but_kept() {
        let extent = BoxExtent::new((2.0, 1.0), (0.0, 1.0), (0.0, 1.0));
        assert!(!extent.is_well_formed());
        assert_eq!(extent.lengths().x, -1.0);
    }

    #[test]
    fn new_frame_metadata_starts_empty() {
        let meta = FrameMetadata::new(100);
        assert_eq!(meta.timestep, 100);
        assert_eq!(meta.atom_count, 0);
        assert!(meta.declared_atom_count.is_none());
        assert_eq!(meta.extent, BoxExtent::default());
    }
}
