use std::io;
use thiserror::Error;

/// Errors raised while turning trajectory text into a [`Trajectory`].
///
/// All line numbers are 1-based. A parse error never yields a partially built
/// trajectory.
///
/// [`Trajectory`]: crate::core::models::trajectory::Trajectory
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed number on line {line}: '{value}'")]
    MalformedNumber { line: usize, value: String },

    #[error("No frames found: the input contains no 'ITEM: TIMESTEP' marker")]
    NoFramesFound,

    #[error("Truncated '{item}' block starting on line {line}: input ends before its fields")]
    TruncatedBlock { line: usize, item: &'static str },

    #[error("Line {line} has {found} field(s), at least {expected} required")]
    MissingField {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate atom id {id} on line {line} (frame at timestep {timestep})")]
    DuplicateAtomId { line: usize, id: i64, timestep: i64 },

    #[error("Column '{column}' is missing from the ITEM: ATOMS header")]
    MissingColumn { column: &'static str },
}

impl ParseError {
    /// The 1-based input line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::MalformedNumber { line, .. }
            | ParseError::TruncatedBlock { line, .. }
            | ParseError::MissingField { line, .. }
            | ParseError::DuplicateAtomId { line, .. } => Some(*line),
            ParseError::Io(_) | ParseError::NoFramesFound | ParseError::MissingColumn { .. } => {
                None
            }
        }
    }
}
