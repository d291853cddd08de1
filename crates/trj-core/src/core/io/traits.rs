use crate::core::models::trajectory::Trajectory;
use crate::engine::config::ParseConfig;
use crate::engine::progress::ProgressReporter;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing trajectory file formats.
///
/// Implementors handle format-specific parsing and serialization; path-based helpers
/// are provided on top of the reader/writer methods.
pub trait TrajectoryFile {
    /// The error type for I/O and parse failures.
    type Error: Error + From<io::Error>;

    /// Reads a trajectory from a buffered reader with explicit options.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    /// * `config` - Tokenization and column interpretation options.
    /// * `reporter` - Receives progress events while frames are built.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the content cannot be parsed.
    fn read_with(
        reader: &mut impl BufRead,
        config: &ParseConfig,
        reporter: &ProgressReporter,
    ) -> Result<Trajectory, Self::Error>;

    /// Writes a trajectory to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(trajectory: &Trajectory, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a trajectory with default options and no progress reporting.
    fn read_from(reader: &mut impl BufRead) -> Result<Trajectory, Self::Error> {
        Self::read_with(reader, &ParseConfig::default(), &ProgressReporter::new())
    }

    /// Reads a trajectory from a file path with explicit options.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path_with<P: AsRef<Path>>(
        path: P,
        config: &ParseConfig,
        reporter: &ProgressReporter,
    ) -> Result<Trajectory, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_with(&mut reader, config, reporter)
    }

    /// Reads a trajectory from a file path with default options.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Trajectory, Self::Error> {
        Self::read_from_path_with(path, &ParseConfig::default(), &ProgressReporter::new())
    }

    /// Writes a trajectory to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(trajectory: &Trajectory, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(trajectory, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
