//! Orientation tables and misorientation lookups
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod axis;
mod error;
mod parsers;
mod reader;
mod service;
mod table;

// Inline anything important for a nice public API
#[doc(inline)]
pub use axis::Axis;

#[doc(inline)]
pub use reader::{read_euler_angles, read_rgb, read_unit_vectors};

#[doc(inline)]
pub use service::OrientationService;

#[doc(inline)]
pub use table::{Orientation, OrientationTable};

#[doc(inline)]
pub use error::{Error, Result};
