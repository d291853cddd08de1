//! # Core Module
//!
//! Fundamental data structures and parsing machinery for LAMMPS text trajectories.
//!
//! - **Trajectory Representation** ([`models`]) - Atom records, box extents, frame
//!   metadata, dense/ragged frame tables and the owning `Trajectory` aggregate
//! - **File I/O** ([`io`]) - Tokenizer, ITEM-block frame scanner, atom table builder and
//!   the `lammpstrj` reader/writer
//! - **Utilities** ([`utils`]) - Fractional/absolute coordinate conversion

pub mod io;
pub mod models;
pub mod utils;
