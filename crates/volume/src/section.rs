// crate modules
use crate::error::{Error, Result};
use crate::volume::{Cell, Dimensions, GrainVolume};

// external crates
use serde::{Deserialize, Serialize};

/// Plane of a 2D cross-section through the volume
///
/// The two in-plane axes are named first and second, e.g. `XZ` runs over x
/// then z, with the section fixed along y.
///
/// Parsing is lenient in the same way as the analysis input files: any string
/// containing one of the plane names is accepted, checked in the order `XZ`,
/// `YZ`, `XY`.
///
/// ```rust
/// # use grainkit_volume::Plane;
/// assert_eq!("XY".parse::<Plane>().unwrap(), Plane::XY);
/// assert_eq!("XZ-middle".parse::<Plane>().unwrap(), Plane::XZ);
/// assert!("ZZ".parse::<Plane>().is_err());
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Plane {
    /// Fixed z, runs over x then y
    XY,
    /// Fixed x, runs over y then z
    YZ,
    /// Fixed y, runs over x then z
    XZ,
}

impl Plane {
    /// Number of cells along the first and second in-plane axes
    pub fn shape(&self, dimensions: &Dimensions) -> (usize, usize) {
        match self {
            Self::XY => (dimensions.nx, dimensions.ny),
            Self::YZ => (dimensions.ny, dimensions.nz),
            Self::XZ => (dimensions.nx, dimensions.nz),
        }
    }

    /// Number of cells along the axis normal to the plane
    pub fn normal_extent(&self, dimensions: &Dimensions) -> usize {
        match self {
            Self::XY => dimensions.nz,
            Self::YZ => dimensions.nx,
            Self::XZ => dimensions.ny,
        }
    }

    /// Map in-plane indices and the fixed normal index to `(z, x, y)`
    #[inline]
    pub fn locate(&self, index1: usize, index2: usize, fixed: usize) -> (usize, usize, usize) {
        match self {
            Self::XY => (fixed, index1, index2),
            Self::YZ => (index2, fixed, index1),
            Self::XZ => (index2, index1, fixed),
        }
    }
}

impl std::str::FromStr for Plane {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.contains("XZ") {
            Ok(Self::XZ)
        } else if s.contains("YZ") {
            Ok(Self::YZ)
        } else if s.contains("XY") {
            Ok(Self::XY)
        } else {
            Err(Error::UnknownPlane(s.to_string()))
        }
    }
}

impl TryFrom<String> for Plane {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Plane> for String {
    fn from(plane: Plane) -> Self {
        plane.to_string()
    }
}

impl std::fmt::Display for Plane {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::XY => "XY",
            Self::YZ => "YZ",
            Self::XZ => "XZ",
        };
        write!(f, "{s}")
    }
}

/// A cell visited by a [CrossSection], with its in-plane indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionCell {
    /// Index along the first in-plane axis
    pub index1: usize,
    /// Index along the second in-plane axis
    pub index2: usize,
    /// The volume cell itself
    pub cell: Cell,
}

/// A full 2D slice through the volume at a fixed coordinate
///
/// ```rust
/// # use grainkit_volume::{CrossSection, Dimensions, GrainVolume, Plane};
/// let volume = GrainVolume::uniform(Dimensions::new(3, 4, 5), 1e-6, 1);
/// let section = CrossSection::new(Plane::XZ, 2);
///
/// assert!(section.check(&volume.dimensions()).is_ok());
/// assert_eq!(section.number_of_cells(&volume.dimensions()), 15);
/// assert!(section.cells(&volume).all(|c| c.cell.y == 2));
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossSection {
    /// Plane of the slice
    pub plane: Plane,
    /// Coordinate along the axis normal to the plane
    pub index: usize,
}

impl CrossSection {
    /// Slice through `plane` at `index` along the normal axis
    pub fn new(plane: Plane, index: usize) -> Self {
        Self { plane, index }
    }

    /// Check the slice lies inside a volume of these dimensions
    pub fn check(&self, dimensions: &Dimensions) -> Result<()> {
        let limit = self.plane.normal_extent(dimensions);
        if self.index >= limit {
            return Err(Error::SectionOutsideVolume {
                plane: self.plane,
                index: self.index,
                limit,
            });
        }
        Ok(())
    }

    /// Number of cells in the slice
    pub fn number_of_cells(&self, dimensions: &Dimensions) -> usize {
        let (n1, n2) = self.plane.shape(dimensions);
        n1 * n2
    }

    /// Iterate over every cell in the slice
    ///
    /// The first in-plane index varies slowest. The slice is assumed valid,
    /// see [check()](CrossSection::check).
    pub fn cells<'a>(&self, volume: &'a GrainVolume) -> impl Iterator<Item = SectionCell> + 'a {
        let plane = self.plane;
        let fixed = self.index;
        let (n1, n2) = plane.shape(&volume.dimensions());
        (0..n1).flat_map(move |index1| {
            (0..n2).map(move |index2| {
                let (z, x, y) = plane.locate(index1, index2, fixed);
                SectionCell {
                    index1,
                    index2,
                    cell: volume.cell(z, x, y),
                }
            })
        })
    }
}

impl std::fmt::Display for CrossSection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} at {}", self.plane, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("XY", Plane::XY)]
    #[case("YZ", Plane::YZ)]
    #[case("XZ", Plane::XZ)]
    #[case("BuildXZ", Plane::XZ)]
    #[case("XYZ", Plane::YZ)]
    fn parse_plane(#[case] s: &str, #[case] expected: Plane) {
        assert_eq!(s.parse::<Plane>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("xy")]
    #[case("ZX")]
    fn unknown_plane(#[case] s: &str) {
        assert!(matches!(s.parse::<Plane>(), Err(Error::UnknownPlane(_))));
    }

    #[test]
    fn plane_serde_round_trip() {
        let plane: Plane = serde_json::from_str("\"YZ\"").unwrap();
        assert_eq!(plane, Plane::YZ);
        assert_eq!(serde_json::to_string(&Plane::XZ).unwrap(), "\"XZ\"");
        assert!(serde_json::from_str::<Plane>("\"QQ\"").is_err());
    }

    #[test]
    fn locate_maps_to_volume_axes() {
        let volume = GrainVolume::from_fn(Dimensions::new(3, 4, 5), 1e-6, |z, x, y| {
            ((100 * z + 10 * x + y) as i32, 0)
        })
        .unwrap();

        let xy = CrossSection::new(Plane::XY, 4);
        assert!(xy.cells(&volume).all(|c| c.cell.z == 4
            && c.cell.x == c.index1
            && c.cell.y == c.index2));

        let yz = CrossSection::new(Plane::YZ, 1);
        assert!(yz.cells(&volume).all(|c| c.cell.x == 1
            && c.cell.y == c.index1
            && c.cell.z == c.index2));

        let xz = CrossSection::new(Plane::XZ, 3);
        let cells = xz.cells(&volume).collect::<Vec<_>>();
        assert_eq!(cells.len(), 15);
        assert_eq!(cells[1].cell.grain_id, 100 + 3);
    }

    #[test]
    fn section_outside_volume() {
        let d = Dimensions::new(3, 4, 5);
        assert!(CrossSection::new(Plane::XY, 4).check(&d).is_ok());
        assert!(CrossSection::new(Plane::XY, 5).check(&d).is_err());
        assert!(CrossSection::new(Plane::YZ, 3).check(&d).is_err());
        assert!(CrossSection::new(Plane::XZ, 3).check(&d).is_ok());
    }
}
