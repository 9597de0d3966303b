//! Labelled grain volumes and the regions used to scope analyses
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod bounds;
mod error;
mod grain;
mod section;
mod volume;

// Inline anything important for a nice public API
#[doc(inline)]
pub use bounds::Bounds;

#[doc(inline)]
pub use grain::{is_nucleated, orientation_index, SUBSTRATE_LAYER, UNMELTED};

#[doc(inline)]
pub use section::{CrossSection, Plane, SectionCell};

#[doc(inline)]
pub use volume::{Cell, Dimensions, GrainVolume};

#[doc(inline)]
pub use error::{Error, Result};
