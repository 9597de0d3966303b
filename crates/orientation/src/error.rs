//! Result and Error types for the orientation module

/// Type alias for `Result<T, orientation::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `grainkit-orientation`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Generic error type for nom parser results
    #[error("parser failed: {0}")]
    ParseError(String),

    /// First line of an orientation file is not a count
    #[error("failed to read number of orientations from \"{0}\"")]
    MissingCount(String),

    /// A line holds the wrong number of values
    #[error("line {line} has {found} values (expected {expected})")]
    UnexpectedNumberOfValues {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// The component tables do not describe the same set of orientations
    #[error(
        "inconsistent orientation tables ({unit_vectors} unit vectors, {euler} euler angles, {rgb} colours)"
    )]
    InconsistentTables {
        unit_vectors: usize,
        euler: usize,
        rgb: usize,
    },

    /// No orientations at all
    #[error("orientation table is empty")]
    EmptyTable,
}

impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        Self::ParseError(format!("{err:?}"))
    }
}
