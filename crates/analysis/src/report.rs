//! Report file names and plain text writers

// standard library
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

// crate modules
use crate::error::Result;

// grainkit modules
use grainkit_orientation::Axis;
use grainkit_utils::f;
use grainkit_volume::Bounds;

// external crates
use log::info;

/// Size class of a bimodal grain population
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    /// Between the minimum size and the cutoff
    Small,
    /// At or above the cutoff
    Large,
}

impl std::fmt::Display for SizeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Small => write!(f, "Small"),
            Self::Large => write!(f, "Large"),
        }
    }
}

/// Names of every report file, all sharing a common prefix
///
/// ```rust
/// # use grainkit_analysis::ReportPaths;
/// # use grainkit_volume::Bounds;
/// let paths = ReportPaths::new("out/TestProblem");
///
/// assert_eq!(paths.qoi().to_str(), Some("out/TestProblem_QoI.txt"));
/// assert_eq!(
///     paths.pole_figure_region(&Bounds::new(0, 9, 5, 9, 1, 4)).to_str(),
///     Some("out/TestProblem_PFVolumeX0-9Y5-9Z1-4.txt")
/// );
/// assert_eq!(paths.rve(2).to_str(), Some("out/TestProblem2_ExaConstit.csv"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    base: String,
}

impl ReportPaths {
    /// Paths prefixed by `base`
    pub fn new(base: &str) -> Self {
        Self {
            base: base.to_string(),
        }
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        PathBuf::from(f!("{}{suffix}", self.base))
    }

    /// Misorientation of every melted cell
    pub fn misorientation(&self) -> PathBuf {
        self.with_suffix("_MisorientationFrequency.csv")
    }

    /// Volume of every grain
    pub fn volume(&self) -> PathBuf {
        self.with_suffix("_VolumeFrequency.csv")
    }

    /// Aspect ratio of every grain
    pub fn aspect_ratio(&self) -> PathBuf {
        self.with_suffix("_AspectRatioFrequency.csv")
    }

    /// Height of every grain
    pub fn grain_height(&self) -> PathBuf {
        self.with_suffix("_GrainHeightDistribution.csv")
    }

    /// Mean grain area per layer
    pub fn grain_areas(&self) -> PathBuf {
        self.with_suffix("_GrainAreas.csv")
    }

    /// Weighted grain area per 5th layer
    pub fn weighted_grain_areas(&self) -> PathBuf {
        self.with_suffix("_WeightedGrainAreas.csv")
    }

    /// Grain widths along one lateral axis
    pub fn grain_widths(&self, axis: Axis) -> PathBuf {
        self.with_suffix(&f!("_GrainWidthDistribution{axis}.csv"))
    }

    /// MTEX ODF of a region
    pub fn pole_figure_region(&self, b: &Bounds) -> PathBuf {
        self.with_suffix(&f!(
            "_PFVolumeX{}-{}Y{}-{}Z{}-{}.txt",
            b.xmin,
            b.xmax,
            b.ymin,
            b.ymax,
            b.zmin,
            b.zmax
        ))
    }

    /// Bare orientation counts of a region
    pub fn orientation_counts(&self) -> PathBuf {
        self.with_suffix("_MTEXOrientations.csv")
    }

    /// Inverse pole figure map of a cross-section
    pub fn ipf_section(&self, plane: &str) -> PathBuf {
        self.with_suffix(&f!("-{plane}_IPFCrossSection.txt"))
    }

    /// MTEX ODF of a cross-section
    pub fn pole_figure_section(&self, plane: &str) -> PathBuf {
        self.with_suffix(&f!("-{plane}_PFCrossSection.txt"))
    }

    /// Area fractions of a unimodal cross-section
    pub fn section_areas(&self, plane: &str) -> PathBuf {
        self.with_suffix(&f!("_{plane}_Areas.txt"))
    }

    /// Areas of one size class of a bimodal cross-section
    pub fn class_areas(&self, plane: &str, class: SizeClass) -> PathBuf {
        self.with_suffix(&f!("_{plane}_{class}Areas.txt"))
    }

    /// Per-cell misorientation of one size class of a bimodal cross-section
    pub fn class_misorientation(&self, plane: &str, axis: Axis, class: SizeClass) -> PathBuf {
        self.with_suffix(&f!("_{plane}_{axis}Misorientation{class}Areas.txt"))
    }

    /// Green to blue ratio of the large grains of a bimodal cross-section
    pub fn green_blue(&self, plane: &str) -> PathBuf {
        self.with_suffix(&f!("_{plane}_GreenBlueRatio.txt"))
    }

    /// Quantities of interest of every cross-section
    pub fn qoi(&self) -> PathBuf {
        self.with_suffix("_QoI.txt")
    }

    /// Dense listing of the `n`th representative volume element
    pub fn rve(&self, n: usize) -> PathBuf {
        self.with_suffix(&f!("{n}_ExaConstit.csv"))
    }
}

/// Initialise a buffered writer from anything that can be turned into a path
pub(crate) fn init_writer<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}

/// Write one value per line
pub(crate) fn write_column<P, T, I>(path: P, values: I) -> Result<()>
where
    P: AsRef<Path>,
    T: Display,
    I: IntoIterator<Item = T>,
{
    let mut writer = init_writer(path)?;
    for value in values {
        writeln!(writer, "{value}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Human readable quantities of interest, echoed to the log
#[derive(Debug)]
pub(crate) struct QoiWriter<W: Write> {
    writer: W,
}

impl QoiWriter<BufWriter<File>> {
    /// Create the file at `path`
    pub(crate) fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(init_writer(path)?))
    }
}

impl<W: Write> QoiWriter<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a line and log it
    pub(crate) fn line(&mut self, text: &str) -> Result<()> {
        info!("{text}");
        writeln!(self.writer, "{text}")?;
        Ok(())
    }

    pub(crate) fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_file_names() {
        let paths = ReportPaths::new("base");
        let names = [
            paths.ipf_section("XZ-mid"),
            paths.pole_figure_section("XY"),
            paths.section_areas("XY"),
            paths.class_areas("XY", SizeClass::Large),
            paths.class_misorientation("YZ", Axis::X, SizeClass::Small),
            paths.green_blue("YZ"),
            paths.grain_widths(Axis::Y),
        ];
        let expected = [
            "base-XZ-mid_IPFCrossSection.txt",
            "base-XY_PFCrossSection.txt",
            "base_XY_Areas.txt",
            "base_XY_LargeAreas.txt",
            "base_YZ_XMisorientationSmallAreas.txt",
            "base_YZ_GreenBlueRatio.txt",
            "base_GrainWidthDistributionY.csv",
        ];
        for (name, expected) in names.iter().zip(expected) {
            assert_eq!(name.to_str(), Some(expected));
        }
    }

    #[test]
    fn qoi_lines_are_buffered_in_order() {
        let mut qoi = QoiWriter::new(Vec::new());
        qoi.line("Top").unwrap();
        qoi.line("Average grain area (in square microns): 12.5").unwrap();
        let bytes = qoi.finish().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Top\nAverage grain area (in square microns): 12.5\n"
        );
    }
}
