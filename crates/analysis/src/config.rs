//! Selection of analyses and their parameters

// standard library
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// crate modules
use crate::error::Result;
use crate::pole_figure::OrientationFormat;

// grainkit modules
use grainkit_volume::{Bounds, CrossSection, GrainVolume, Plane};

// external crates
use serde::{Deserialize, Serialize};

/// Optional report files, one flag per file
///
/// Scalar summaries are always computed. These only control which raw
/// listings are written alongside them.
#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Reports {
    /// Misorientation about z of every melted cell
    pub misorientation: bool,
    /// Volume of every grain
    pub volume: bool,
    /// Aspect ratio of every grain
    pub aspect_ratio: bool,
    /// Mean grain area of every z layer
    pub grain_areas: bool,
    /// Area weighted grain area of every 5th z layer
    pub weighted_grain_areas: bool,
    /// Height of every grain
    pub grain_height: bool,
    /// Widths in x and y of every grain at the region top
    pub grain_widths: bool,
    /// Orientation histogram of the region
    pub pole_figure: bool,
}

/// Grain area thresholds in square microns
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    /// Grains smaller than this are too small to include in statistics
    pub min_grain_area: f64,
    /// Boundary between small and large grains in a bimodal analysis
    pub small_large_cutoff: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_grain_area: 7.8125,
            small_large_cutoff: 1500.0,
        }
    }
}

impl Thresholds {
    /// Minimum grain area in whole cells
    pub fn min_cells(&self, volume: &GrainVolume) -> usize {
        volume.area_to_cells(self.min_grain_area)
    }

    /// Small/large cutoff in whole cells
    pub fn cutoff_cells(&self, volume: &GrainVolume) -> usize {
        volume.area_to_cells(self.small_large_cutoff)
    }
}

/// A cross-section to analyse
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SectionConfig {
    /// Heading written to the quantities of interest file
    #[serde(default)]
    pub label: String,
    /// Plane name, also used in report file names
    pub plane: String,
    /// Coordinate along the axis normal to the plane
    pub index: usize,
    /// Write an MTEX ODF of the cross-section
    #[serde(default)]
    pub pole_figure: bool,
    /// Write an inverse pole figure map of the cross-section
    #[serde(default)]
    pub inverse_pole_figure: bool,
    /// Split grains into small and large populations
    #[serde(default)]
    pub bimodal: bool,
}

impl SectionConfig {
    /// Parse the plane name into a [CrossSection]
    pub fn cross_section(&self) -> Result<CrossSection> {
        let plane: Plane = self.plane.parse()?;
        Ok(CrossSection::new(plane, self.index))
    }
}

/// Everything needed for one analysis run
///
/// ```rust
/// # use grainkit_analysis::{AnalysisConfig, OrientationFormat};
/// let config: AnalysisConfig = serde_json::from_str(r#"{
///     "base_name": "out/TestProblem",
///     "reports": {"misorientation": true},
///     "cross_sections": [{"label": "Top", "plane": "XY", "index": 10}]
/// }"#).unwrap();
///
/// assert!(config.reports.misorientation);
/// assert!(!config.reports.pole_figure);
/// assert_eq!(config.format, OrientationFormat::Mtex);
/// assert_eq!(config.thresholds.min_grain_area, 7.8125);
/// assert!(config.region.is_none());
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Prefix of every report file name, may include directories
    pub base_name: String,
    /// Region analysed, the whole volume if not given
    #[serde(default)]
    pub region: Option<Bounds>,
    /// Optional report files
    #[serde(default)]
    pub reports: Reports,
    /// Encoding of orientation listings
    #[serde(default)]
    pub format: OrientationFormat,
    /// Grain area thresholds
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Cross-sections to analyse, in order
    #[serde(default)]
    pub cross_sections: Vec<SectionConfig>,
    /// Sub-volumes to extract
    #[serde(default)]
    pub rves: Vec<Bounds>,
}

impl AnalysisConfig {
    /// Configuration with every report disabled and default thresholds
    pub fn new(base_name: &str) -> Self {
        Self {
            base_name: base_name.to_string(),
            region: None,
            reports: Reports::default(),
            format: OrientationFormat::default(),
            thresholds: Thresholds::default(),
            cross_sections: Vec::new(),
            rves: Vec::new(),
        }
    }

    /// Read a configuration from a JSON file
    ///
    /// Plane names are checked here so a bad configuration is rejected before
    /// any analysis starts.
    ///
    /// ```rust, no_run
    /// # use grainkit_analysis::AnalysisConfig;
    /// let config = AnalysisConfig::from_json_file("analysis.json").unwrap();
    /// ```
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let config: Self = serde_json::from_reader(reader)?;
        for section in &config.cross_sections {
            section.cross_section()?;
        }
        Ok(config)
    }

    /// Analysed region for a given volume
    pub fn region(&self, volume: &GrainVolume) -> Bounds {
        self.region.unwrap_or_else(|| volume.bounds())
    }

    /// Check every region and cross-section fits inside `volume`
    pub fn validate(&self, volume: &GrainVolume) -> Result<()> {
        volume.check_bounds(&self.region(volume))?;
        for section in &self.cross_sections {
            section.cross_section()?.check(&volume.dimensions())?;
        }
        for rve in &self.rves {
            volume.check_bounds(rve)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use grainkit_volume::Dimensions;

    #[test]
    fn threshold_conversion_is_exact() {
        let volume = GrainVolume::uniform(Dimensions::new(1, 1, 1), 1e-6, 1);
        let thresholds = Thresholds::default();
        assert_eq!(thresholds.min_cells(&volume), 8);
        assert_eq!(thresholds.cutoff_cells(&volume), 1500);

        let coarse = GrainVolume::uniform(Dimensions::new(1, 1, 1), 2.5e-6, 1);
        assert_eq!(thresholds.min_cells(&coarse), 1);
        assert_eq!(thresholds.cutoff_cells(&coarse), 240);
    }

    #[test]
    fn unknown_plane_is_a_configuration_error() {
        let section = SectionConfig {
            label: String::new(),
            plane: "ZZ".to_string(),
            index: 0,
            pole_figure: false,
            inverse_pole_figure: false,
            bimodal: false,
        };
        assert!(matches!(
            section.cross_section(),
            Err(Error::Volume(grainkit_volume::Error::UnknownPlane(_)))
        ));
    }

    #[test]
    fn validate_against_volume() {
        let volume = GrainVolume::uniform(Dimensions::new(4, 4, 4), 1e-6, 1);
        let mut config = AnalysisConfig::new("x");
        assert!(config.validate(&volume).is_ok());
        assert_eq!(config.region(&volume), Bounds::new(0, 3, 0, 3, 0, 3));

        config.rves.push(Bounds::new(0, 4, 0, 1, 0, 1));
        assert!(config.validate(&volume).is_err());

        config.rves.clear();
        config.cross_sections.push(SectionConfig {
            label: "side".to_string(),
            plane: "YZ".to_string(),
            index: 4,
            pole_figure: false,
            inverse_pole_figure: false,
            bimodal: false,
        });
        assert!(config.validate(&volume).is_err());
    }

    #[test]
    fn thresholds_can_be_overridden() {
        let config: AnalysisConfig = serde_json::from_str(
            r#"{"base_name": "a", "format": "old", "thresholds": {"small_large_cutoff": 100.0}}"#,
        )
        .unwrap();
        assert_eq!(config.format, OrientationFormat::Legacy);
        assert_eq!(config.thresholds.min_grain_area, 7.8125);
        assert_eq!(config.thresholds.small_large_cutoff, 100.0);
    }
}
