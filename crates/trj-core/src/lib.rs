//! # lammpstrj Core Library
//!
//! A tolerant, deterministic reader for LAMMPS text trajectory dumps (the `lammpstrj`
//! ITEM-block format), turning raw text into per-frame atom tables and frame metadata.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture with one-way data flow
//! (raw text → tokenized fields → per-frame spans → atom tables → trajectory).
//!
//! - **[`core`]: The Foundation.** Owned data models (`Trajectory`, `AtomRecord`,
//!   `BoxExtent`), the line tokenizer, the frame scanner, the atom table builder and
//!   the file-format reader/writer.
//!
//! - **[`engine`]: Configuration and Plumbing.** Parsing options (duplicate-id policy,
//!   column layout), load configuration, the aggregated error type and progress reporting.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures such as loading a dump file
//!   and downsampling it in one call, with progress reporting for front ends.

pub mod core;
pub mod engine;
pub mod workflows;
