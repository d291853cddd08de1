use std::fmt;

/// A non-fatal anomaly found while building a trajectory.
///
/// Diagnostics never abort construction; they are logged with `tracing::warn!` and kept
/// on the [`Trajectory`](super::trajectory::Trajectory) so callers can surface them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The number of atoms differs between frames.
    AtomCountDrift { min: usize, max: usize },
    /// An atom id occurs more than once in a frame (permissive mode only).
    DuplicateAtomId { timestep: i64, id: i64 },
    /// `ITEM: NUMBER OF ATOMS` disagrees with the number of atom lines actually present.
    DeclaredCountMismatch {
        timestep: i64,
        declared: usize,
        parsed: usize,
    },
    /// A frame without any atom records was dropped.
    EmptyFrameDropped { timestep: i64 },
    /// A frame carried no `ITEM: BOX BOUNDS` block; the unit box was assumed.
    MissingBoxBounds { timestep: i64 },
    /// A later `ITEM: ATOMS` header differs from the first one, which is the one retained.
    HeaderChanged { timestep: i64, header: Vec<String> },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::AtomCountDrift { min, max } => write!(
                f,
                "Atom count varies between frames ({}..={}); atoms were lost or gained during the run",
                min, max
            ),
            Diagnostic::DuplicateAtomId { timestep, id } => {
                write!(f, "Duplicate atom id {} in frame at timestep {}", id, timestep)
            }
            Diagnostic::DeclaredCountMismatch {
                timestep,
                declared,
                parsed,
            } => write!(
                f,
                "Frame at timestep {} declares {} atoms but {} atom lines were parsed",
                timestep, declared, parsed
            ),
            Diagnostic::EmptyFrameDropped { timestep } => {
                write!(f, "Frame at timestep {} has no atom records and was dropped", timestep)
            }
            Diagnostic::MissingBoxBounds { timestep } => write!(
                f,
                "Frame at timestep {} has no BOX BOUNDS block; assuming the unit box",
                timestep
            ),
            Diagnostic::HeaderChanged { timestep, header } => write!(
                f,
                "ATOMS header changes at timestep {} to '{}'; the first header is kept",
                timestep,
                header.join(" ")
            ),
        }
    }
}
