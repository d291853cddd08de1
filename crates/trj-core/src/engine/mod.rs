//! # Engine Module
//!
//! Configuration, error aggregation and progress plumbing shared by the parsing layer and
//! the workflows.
//!
//! - [`config`] - Parsing options and the load configuration builder
//! - [`error`] - The aggregated [`error::EngineError`] returned by workflows
//! - [`progress`] - Callback-based progress reporting for front ends

pub mod config;
pub mod error;
pub mod progress;
