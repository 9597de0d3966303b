//! Orientation frequency histograms and their file formats

// standard library
use std::io::Write;
use std::path::Path;

// crate modules
use crate::error::Result;

// grainkit modules
use grainkit_orientation::OrientationService;
use grainkit_utils::ValueExt;
use grainkit_volume::{orientation_index, Bounds, CrossSection, GrainVolume};

// external crates
use log::{debug, warn};
use nom::character::complete::space1;
use nom::combinator::all_consuming;
use nom::number::complete::double;
use nom::sequence::{preceded, tuple};
use nom::IResult;
use serde::{Deserialize, Serialize};

/// Encoding used for orientation listings and pole figure data
#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrientationFormat {
    /// MTEX ODF with Euler angles for every bucket, the "new" format
    #[default]
    #[serde(alias = "new")]
    Mtex,
    /// Bare bucket counts, the "old" format
    #[serde(alias = "old")]
    Legacy,
}

/// Number of cells in each orientation
///
/// ```rust
/// # use grainkit_analysis::Histogram;
/// let mut histogram = Histogram::new(3);
/// for id in [1, -1, 3, 0, 5] {
///     histogram.add(id);
/// }
/// assert_eq!(histogram.counts(), &[2, 1, 1]);
/// assert_eq!(histogram.total(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<u64>,
}

impl Histogram {
    /// Empty histogram with a bucket for every orientation
    pub fn new(number_of_orientations: usize) -> Self {
        Self {
            counts: vec![0; number_of_orientations],
        }
    }

    /// Histogram of every melted cell in `bounds`
    ///
    /// Melted cells with no grain assigned are skipped with a warning.
    pub fn from_region(volume: &GrainVolume, bounds: &Bounds, number_of_orientations: usize) -> Self {
        let mut histogram = Self::new(number_of_orientations);
        let mut skipped = 0;
        for c in volume.cells(bounds).filter(|c| c.is_melted()) {
            if !histogram.add(c.grain_id) {
                skipped += 1;
            }
        }
        if skipped > 0 {
            warn!("Skipped {skipped} melted cells with no grain in {bounds}");
        }
        debug!("Orientation histogram of {} cells", histogram.total());
        histogram
    }

    /// Histogram of every assigned cell in a cross-section
    pub fn from_section(
        volume: &GrainVolume,
        section: &CrossSection,
        number_of_orientations: usize,
    ) -> Self {
        let mut histogram = Self::new(number_of_orientations);
        for c in section.cells(volume) {
            histogram.add(c.cell.grain_id);
        }
        histogram
    }

    /// Count one cell of grain `grain_id`
    ///
    /// Returns false, counting nothing, for the unassigned id.
    pub fn add(&mut self, grain_id: i32) -> bool {
        match orientation_index(grain_id, self.counts.len()) {
            Some(i) => {
                self.counts[i] += 1;
                true
            }
            None => false,
        }
    }

    /// Bucket counts in orientation order
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Number of cells counted
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Write the histogram in the requested format
    pub fn write<W: Write, S: OrientationService>(
        &self,
        writer: W,
        service: &S,
        format: OrientationFormat,
    ) -> Result<()> {
        match format {
            OrientationFormat::Mtex => self.write_odf(writer, service),
            OrientationFormat::Legacy => self.write_counts(writer),
        }
    }

    /// Write the histogram as an MTEX ODF
    ///
    /// A short comment header is followed by the Euler angles and count of
    /// every orientation, all fixed to six decimal places.
    pub fn write_odf<W: Write, S: OrientationService>(&self, mut writer: W, service: &S) -> Result<()> {
        writeln!(writer, "% MTEX ODF")?;
        writeln!(writer, "% crystal symmetry: \"m-3m\"")?;
        writeln!(writer, "% specimen symmetry: \"43\"")?;
        writeln!(writer, "% phi1    Phi     phi2    value")?;
        for (i, count) in self.counts.iter().enumerate() {
            let [phi1, phi, phi2] = service.euler_angles(i);
            writeln!(
                writer,
                "{} {} {} {}",
                phi1.fixed(6),
                phi.fixed(6),
                phi2.fixed(6),
                (*count as f64).fixed(6)
            )?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the bare bucket counts, one per line
    pub fn write_counts<W: Write>(&self, mut writer: W) -> Result<()> {
        for count in &self.counts {
            writeln!(writer, "{count}")?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Single row of an MTEX ODF listing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OdfRow {
    /// Bunge Euler angles `(phi1, Phi, phi2)`
    pub euler: [f64; 3],
    /// Weight of the orientation
    pub value: f64,
}

/// Four whitespace separated values
fn odf_row(i: &str) -> IResult<&str, OdfRow> {
    let (i, (phi1, phi, phi2, value)) = all_consuming(tuple((
        double,
        preceded(space1, double),
        preceded(space1, double),
        preceded(space1, double),
    )))(i.trim())?;
    Ok((
        i,
        OdfRow {
            euler: [phi1, phi, phi2],
            value,
        },
    ))
}

/// Parse an MTEX ODF listing, skipping `%` comment and blank lines
pub fn parse_odf(content: &str) -> Result<Vec<OdfRow>> {
    content
        .lines()
        .filter(|l| !l.trim().is_empty() && !l.trim_start().starts_with('%'))
        .map(|l| {
            let (_, row) = odf_row(l)?;
            Ok(row)
        })
        .collect()
}

/// Read an MTEX ODF file written by [Histogram::write_odf()]
///
/// ```rust, no_run
/// # use grainkit_analysis::read_odf;
/// let rows = read_odf("TestProblem_PFVolumeX0-99Y0-99Z0-49.txt").unwrap();
/// let cells: f64 = rows.iter().map(|r| r.value).sum();
/// ```
pub fn read_odf<P: AsRef<Path>>(path: P) -> Result<Vec<OdfRow>> {
    parse_odf(&std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use grainkit_orientation::Axis;
    use grainkit_volume::{Dimensions, Plane};

    struct Euler;

    impl OrientationService for Euler {
        fn number_of_orientations(&self) -> usize {
            3
        }
        fn angle(&self, _: usize, _: Axis) -> f64 {
            0.0
        }
        fn color(&self, _: usize) -> [f64; 3] {
            [0.0; 3]
        }
        fn euler_angles(&self, orientation: usize) -> [f64; 3] {
            let o = orientation as f64;
            [o, 0.5 * o, 0.25]
        }
    }

    #[test]
    fn substrate_is_not_counted() {
        let volume = GrainVolume::from_fn(Dimensions::new(2, 2, 2), 1e-6, |z, x, _| match z {
            0 => (4, -1),
            _ => (1 + x as i32, 0),
        })
        .unwrap();
        let histogram = Histogram::from_region(&volume, &volume.bounds(), 3);
        assert_eq!(histogram.counts(), &[2, 2, 0]);
    }

    #[test]
    fn section_counts_every_assigned_cell() {
        let volume = GrainVolume::from_fn(Dimensions::new(2, 3, 2), 1e-6, |z, _, y| {
            (if z == 1 && y == 0 { 0 } else { 3 }, -1)
        })
        .unwrap();
        let histogram = Histogram::from_section(&volume, &CrossSection::new(Plane::XZ, 0), 3);
        assert_eq!(histogram.counts(), &[0, 0, 2]);
    }

    #[test]
    fn odf_layout() {
        let mut histogram = Histogram::new(3);
        histogram.add(2);
        let mut buffer = Vec::new();
        histogram.write_odf(&mut buffer, &Euler).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines = text.lines().collect::<Vec<&str>>();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "% MTEX ODF");
        assert_eq!(lines[3], "% phi1    Phi     phi2    value");
        assert_eq!(lines[5], "1.000000 0.500000 0.250000 1.000000");
    }

    #[test]
    fn legacy_layout() {
        let mut histogram = Histogram::new(2);
        histogram.add(-2);
        histogram.add(2);
        let mut buffer = Vec::new();
        histogram
            .write(&mut buffer, &Euler, OrientationFormat::Legacy)
            .unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "0\n2\n");
    }

    #[test]
    fn malformed_odf_row() {
        assert!(matches!(
            parse_odf("% MTEX ODF\n1.0 2.0 3.0\n"),
            Err(Error::ParseError(_))
        ));
        assert!(parse_odf("1 2 3 4 5\n").is_err());
        assert!(parse_odf("% only a header\n\n").unwrap().is_empty());
    }

    #[test]
    fn format_names() {
        let f: OrientationFormat = serde_json::from_str("\"old\"").unwrap();
        assert_eq!(f, OrientationFormat::Legacy);
        let f: OrientationFormat = serde_json::from_str("\"mtex\"").unwrap();
        assert_eq!(f, OrientationFormat::Mtex);
    }
}
