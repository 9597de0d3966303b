//! Grain statistics, cross-sections, pole figures and RVE extraction
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod config;
mod descriptors;
mod error;
mod grains;
mod layers;
mod misorientation;
mod pole_figure;
mod report;
mod run;
mod rve;
mod section;

// Inline anything important for a nice public API
#[doc(inline)]
pub use config::{AnalysisConfig, Reports, SectionConfig, Thresholds};

#[doc(inline)]
pub use descriptors::{describe_grain, describe_grains, GrainDescriptor, SizeSummary};

#[doc(inline)]
pub use grains::{GrainAreas, GrainSet};

#[doc(inline)]
pub use layers::{top_layer_grains, LayerAreas};

#[doc(inline)]
pub use misorientation::{CellMisorientations, GrainMisorientation, WeightedMisorientation};

#[doc(inline)]
pub use pole_figure::{parse_odf, read_odf, Histogram, OdfRow, OrientationFormat};

#[doc(inline)]
pub use report::{ReportPaths, SizeClass};

#[doc(inline)]
pub use run::{run, RunSummary};

#[doc(inline)]
pub use rve::{write_rve, RveSummary};

#[doc(inline)]
pub use section::{
    write_ipf_map, BimodalSummary, Distribution, SectionAnalysis, SectionCensus, UnimodalSummary,
};

#[doc(inline)]
pub use error::{Error, Result};
