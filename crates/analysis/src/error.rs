//! Result and Error types for the analysis module

/// Type alias for `Result<T, analysis::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `grainkit-analysis`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Failure writing a CSV report
    #[error("failed CSV operation")]
    Csv(#[from] csv::Error),

    /// Failure reading the analysis configuration
    #[error("failed serde JSON operation")]
    Json(#[from] serde_json::Error),

    /// Invalid regions, planes, or volumes
    #[error(transparent)]
    Volume(#[from] grainkit_volume::Error),

    /// Generic error type for nom parser results
    #[error("parser failed: {0}")]
    ParseError(String),

    /// Grain id 0 found where a valid orientation is required
    #[error("unassigned grain in scope ({context})")]
    UnassignedGrain { context: String },

    /// Orientation lookups need at least one orientation
    #[error("orientation service has no orientations")]
    NoOrientations,
}

impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        Self::ParseError(format!("{err:?}"))
    }
}
