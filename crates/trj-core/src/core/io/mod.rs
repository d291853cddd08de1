//! Provides input/output functionality for LAMMPS text trajectories.
//!
//! Parsing is split into leaf-first stages with strictly one-way data flow:
//! the [`tokenizer`] splits lines into fields, the [`scanner`] walks `ITEM:` markers to
//! delimit frames, and the [`builder`] turns each frame's atom lines into sorted tables.
//! [`lammpstrj`] ties the stages together behind the [`traits::TrajectoryFile`] interface.

pub mod builder;
pub(crate) mod columns;
pub mod error;
pub mod lammpstrj;
pub mod scanner;
pub mod tokenizer;
pub mod traits;
