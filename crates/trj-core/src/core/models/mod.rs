//! Data models for parsed trajectories.
//!
//! Records flow strictly upward: an [`atom::AtomRecord`] is parsed from one line, a
//! frame's records form a table stored in [`table::FrameTables`], and the
//! [`trajectory::Trajectory`] owns all tables alongside per-frame [`frame::FrameMetadata`].

pub mod atom;
pub mod diagnostic;
pub mod frame;
pub mod table;
pub mod trajectory;
