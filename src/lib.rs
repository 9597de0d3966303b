//! `grainkit` is a semi-modular toolkit of libraries for analysing the grain
//! structures produced by solidification simulations
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use grainkit_utils as utils;

#[cfg(feature = "volume")]
#[cfg_attr(docsrs, doc(cfg(feature = "volume")))]
#[doc(inline)]
pub use grainkit_volume as volume;

#[cfg(feature = "orientation")]
#[cfg_attr(docsrs, doc(cfg(feature = "orientation")))]
#[doc(inline)]
pub use grainkit_orientation as orientation;

#[cfg(feature = "analysis")]
#[cfg_attr(docsrs, doc(cfg(feature = "analysis")))]
#[doc(inline)]
pub use grainkit_analysis as analysis;
