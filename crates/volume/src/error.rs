//! Result and Error types for the volume module

use crate::{Bounds, Dimensions, Plane};

/// Type alias for `Result<T, volume::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `grainkit-volume`
pub enum Error {
    /// A field does not hold one value per cell
    #[error("inconsistent number of {field} values (expected {expected:?}, found {found:?})")]
    UnexpectedNumberOfCells {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    /// Cell edge length must be a positive length in metres
    #[error("cell size must be positive and finite, found {0}")]
    InvalidCellSize(f64),

    /// Lower bound above the upper bound on some axis
    #[error("bounds are inverted: {0}")]
    InvertedBounds(Bounds),

    /// Bounds reach past the edge of the volume
    #[error("bounds {bounds} exceed volume of {dimensions} cells")]
    BoundsOutsideVolume {
        bounds: Bounds,
        dimensions: Dimensions,
    },

    /// Cross-section plane is not one of XY, YZ, or XZ
    #[error("cross-section for analysis must be XZ, YZ, or XY, found \"{0}\"")]
    UnknownPlane(String),

    /// Cross-section location past the edge of the volume
    #[error("{plane} cross-section at {index} is outside the volume (limit {limit})")]
    SectionOutsideVolume {
        plane: Plane,
        index: usize,
        limit: usize,
    },
}
