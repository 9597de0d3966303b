//! Common utility for extended `std` types
//!
//! These are left public for convenience.
//!
//! For example, prettier formatting for scientific numbers and ratios that
//! never panic on empty populations are useful everywhere.
#![doc = include_str!("../readme.md")]

// Alias for the format! macro
pub use std::format as f;

// Modules
mod stats;
mod value_ext;

// Flatten
pub use stats::{mean, ratio, weighted_mean};
pub use value_ext::ValueExt;
