//! High-level procedures built on the core parsing layer.
//!
//! - [`load`] - Read a dump (from a path or in-memory text), build the trajectory and
//!   optionally downsample it, reporting progress along the way.

pub mod load;
