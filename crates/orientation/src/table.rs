// standard library
use std::path::Path;

// crate modules
use crate::axis::Axis;
use crate::error::{Error, Result};
use crate::reader::{read_euler_angles, read_rgb, read_unit_vectors};
use crate::service::OrientationService;

// grainkit modules
use grainkit_utils::f;

// external crates
use log::debug;
use nalgebra::{Matrix3, Vector3};

/// One entry of the [OrientationTable]
#[derive(Debug, Clone, PartialEq)]
pub struct Orientation {
    /// Bunge Euler angles `(phi1, Phi, phi2)`
    pub euler: [f64; 3],
    /// Cubic crystal axes in the sample frame, one per row
    pub axes: Matrix3<f64>,
    /// Inverse pole figure colour
    pub rgb: [f64; 3],
}

impl Orientation {
    /// Smallest angle in degrees between any crystal axis and a sample axis
    ///
    /// Crystal axes are direction-agnostic under cubic symmetry, so the angle
    /// to each axis is folded into `[0, 90]` before taking the minimum.
    pub fn misorientation(&self, axis: Axis) -> f64 {
        let reference = match axis {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        };

        (0..3)
            .map(|l| {
                let crystal: Vector3<f64> = self.axes.row(l).transpose();
                let angle = crystal.angle(&reference).to_degrees();
                angle.min(180.0 - angle)
            })
            .fold(f64::INFINITY, f64::min)
    }
}

/// Fixed table of grain orientations shared by every analysis
///
/// Misorientation angles relative to each sample axis are evaluated once on
/// construction, so lookups through [OrientationService] are just indexing.
///
/// ```rust
/// # use grainkit_orientation::{Axis, OrientationService, OrientationTable};
/// // Identity orientation and a 45 degree rotation about z
/// let s = std::f64::consts::FRAC_1_SQRT_2;
/// let table = OrientationTable::new(
///     vec![[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
///          [s, s, 0.0, -s, s, 0.0, 0.0, 0.0, 1.0]],
///     vec![[0.0; 3], [45.0, 0.0, 0.0]],
///     vec![[1.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
/// ).unwrap();
///
/// assert!(table.angle(0, Axis::X).abs() < 1e-6);
/// assert!((table.angle(1, Axis::X) - 45.0).abs() < 1e-6);
/// assert!(table.angle(1, Axis::Z).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationTable {
    orientations: Vec<Orientation>,
    misorientations: Vec<[f64; 3]>,
}

impl OrientationTable {
    /// Build a table from per-orientation component lists
    ///
    /// Unit vectors are the 9 components of the three crystal axes, given
    /// axis by axis. All three lists must be the same non-zero length.
    pub fn new(
        unit_vectors: Vec<[f64; 9]>,
        euler: Vec<[f64; 3]>,
        rgb: Vec<[f64; 3]>,
    ) -> Result<Self> {
        if unit_vectors.len() != euler.len() || unit_vectors.len() != rgb.len() {
            return Err(Error::InconsistentTables {
                unit_vectors: unit_vectors.len(),
                euler: euler.len(),
                rgb: rgb.len(),
            });
        }
        if unit_vectors.is_empty() {
            return Err(Error::EmptyTable);
        }

        let orientations = unit_vectors
            .iter()
            .zip(euler)
            .zip(rgb)
            .map(|((uv, euler), rgb)| Orientation {
                euler,
                axes: Matrix3::from_row_slice(uv),
                rgb,
            })
            .collect::<Vec<Orientation>>();

        let misorientations = orientations
            .iter()
            .map(|o| Axis::ALL.map(|axis| o.misorientation(axis)))
            .collect();

        debug!("Built orientation table of {} entries", orientations.len());
        Ok(Self {
            orientations,
            misorientations,
        })
    }

    /// Read and combine the unit vector, Euler angle, and RGB files
    ///
    /// ```rust, no_run
    /// # use grainkit_orientation::OrientationTable;
    /// let table = OrientationTable::from_files(
    ///     "GrainOrientationVectors.csv",
    ///     "GrainOrientationEulerAnglesBungeZXZ.csv",
    ///     "GrainOrientationRGB_IPF-Z.csv",
    /// ).unwrap();
    /// ```
    pub fn from_files<P: AsRef<Path>>(unit_vectors: P, euler: P, rgb: P) -> Result<Self> {
        Self::new(
            read_unit_vectors(unit_vectors)?,
            read_euler_angles(euler)?,
            read_rgb(rgb)?,
        )
    }

    /// Number of orientations in the table
    pub fn len(&self) -> usize {
        self.orientations.len()
    }

    /// A table is never empty once built, kept for API symmetry
    pub fn is_empty(&self) -> bool {
        self.orientations.is_empty()
    }

    /// Get an orientation by index
    pub fn get(&self, index: usize) -> Option<&Orientation> {
        self.orientations.get(index)
    }

    /// Iterate over all orientations in index order
    pub fn iter(&self) -> impl Iterator<Item = &Orientation> {
        self.orientations.iter()
    }
}

impl OrientationService for OrientationTable {
    fn number_of_orientations(&self) -> usize {
        self.len()
    }

    fn angle(&self, orientation: usize, axis: Axis) -> f64 {
        self.misorientations[orientation][axis.index()]
    }

    fn color(&self, orientation: usize) -> [f64; 3] {
        self.orientations[orientation].rgb
    }

    fn euler_angles(&self, orientation: usize) -> [f64; 3] {
        self.orientations[orientation].euler
    }
}

impl std::fmt::Display for OrientationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("OrientationTable ({} entries) {{\n", self.len());
        for (i, o) in self.orientations.iter().take(5).enumerate() {
            s += &f!(
                "    {i:<5} euler [{:.3}, {:.3}, {:.3}]  misorientation z {:.3}\n",
                o.euler[0],
                o.euler[1],
                o.euler[2],
                self.misorientations[i][2]
            );
        }
        if self.len() > 5 {
            s += "    ...\n";
        }
        s += "}";
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

    fn single(uv: [f64; 9]) -> OrientationTable {
        OrientationTable::new(vec![uv], vec![[0.0; 3]], vec![[0.0, 1.0, 0.0]]).unwrap()
    }

    #[test]
    fn identity_is_aligned_with_every_axis() {
        let table = single(IDENTITY);
        for axis in Axis::ALL {
            assert!(table.angle(0, axis).abs() < 1e-9);
        }
    }

    #[test]
    fn antiparallel_axes_are_equivalent() {
        // crystal axes flipped, still aligned under cubic symmetry
        let table = single([-1.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 1.0]);
        for axis in Axis::ALL {
            assert!(table.angle(0, axis).abs() < 1e-9);
        }
    }

    #[test]
    fn body_diagonal_is_the_largest_misorientation() {
        // [111] along z gives acos(1/sqrt(3)) = 54.7356 degrees
        let r = 1.0 / 3.0_f64.sqrt();
        let a = 1.0 / 2.0_f64.sqrt();
        let b = 1.0 / 6.0_f64.sqrt();
        // rows are orthonormal crystal axes, each with z-component 1/sqrt(3)
        let table = single([a, b, r, -a, b, r, 0.0, -2.0 * b, r]);
        let z = table.angle(0, Axis::Z);
        assert!((z - 54.7356).abs() < 1e-3, "found {z}");
    }

    #[test]
    fn table_lengths_must_agree() {
        let result = OrientationTable::new(vec![IDENTITY; 2], vec![[0.0; 3]], vec![[0.0; 3]; 2]);
        assert!(matches!(
            result,
            Err(Error::InconsistentTables {
                unit_vectors: 2,
                euler: 1,
                rgb: 2
            })
        ));
        assert!(matches!(
            OrientationTable::new(vec![], vec![], vec![]),
            Err(Error::EmptyTable)
        ));
    }

    #[test]
    fn service_lookups() {
        let table = OrientationTable::new(
            vec![IDENTITY; 2],
            vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
            vec![[0.1, 0.2, 0.7], [0.3, 0.3, 0.4]],
        )
        .unwrap();
        assert_eq!(table.number_of_orientations(), 2);
        assert_eq!(table.euler_angles(1), [4.0, 5.0, 6.0]);
        assert_eq!(table.color(0), [0.1, 0.2, 0.7]);
    }
}
