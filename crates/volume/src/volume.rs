// crate modules
use crate::bounds::Bounds;
use crate::error::{Error, Result};
use crate::grain::{SUBSTRATE_LAYER, UNMELTED};

// grainkit modules
use grainkit_utils::{f, ValueExt};

// external crates
use serde::{Deserialize, Serialize};

/// Number of cells along each axis of a [GrainVolume]
#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Number of cells in x
    pub nx: usize,
    /// Number of cells in y
    pub ny: usize,
    /// Number of cells in z
    pub nz: usize,
}

impl Dimensions {
    /// New set of dimensions, given in (x, y, z) order
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    /// Total number of cells in the volume
    pub fn number_of_cells(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Flat index of the cell at `(z, x, y)`
    ///
    /// Storage is z-major with y varying fastest, matching the `(z, x, y)`
    /// indexing convention used everywhere else.
    #[inline]
    pub fn index(&self, z: usize, x: usize, y: usize) -> usize {
        (z * self.nx + x) * self.ny + y
    }

    /// Check that `(z, x, y)` lies inside the volume
    pub fn contains(&self, z: usize, x: usize, y: usize) -> bool {
        z < self.nz && x < self.nx && y < self.ny
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.nx, self.ny, self.nz)
    }
}

/// A single cell of the volume and everything stored for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// z coordinate
    pub z: usize,
    /// x coordinate
    pub x: usize,
    /// y coordinate
    pub y: usize,
    /// Grain identifier
    pub grain_id: i32,
    /// Layer in which the cell last melted
    pub layer_id: i32,
}

impl Cell {
    /// Cell underwent melting, i.e. is not part of the substrate mask
    #[inline]
    pub fn is_melted(&self) -> bool {
        self.layer_id != SUBSTRATE_LAYER
    }

    /// Cell was never assigned a grain
    #[inline]
    pub fn is_unassigned(&self) -> bool {
        self.grain_id == UNMELTED
    }
}

/// Labelled grain structure of a solidification simulation
///
/// Two parallel fields are stored with one value per cell:
///
/// - grain ids, where the sign gives provenance and the magnitude is the label
/// - layer ids, where [SUBSTRATE_LAYER] marks cells excluded from melt-pool
///   statistics
///
/// The volume is read-only once built. Every analysis borrows it and derives
/// its results from scratch.
///
/// ```rust
/// # use grainkit_volume::{Dimensions, GrainVolume};
/// let dimensions = Dimensions::new(2, 1, 1);
/// let volume = GrainVolume::new(dimensions, 1e-6, vec![3, -4], vec![0, -1]).unwrap();
///
/// assert_eq!(volume.grain_id(0, 1, 0), -4);
/// assert!(volume.is_melted(0, 0, 0));
/// assert!(!volume.is_melted(0, 1, 0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GrainVolume {
    dimensions: Dimensions,
    deltax: f64,
    grain_ids: Vec<i32>,
    layer_ids: Vec<i32>,
}

impl GrainVolume {
    /// Build a volume from flat `(z, x, y)` ordered fields
    ///
    /// Both fields must hold exactly one value per cell, and `deltax` is the
    /// cell edge length in metres.
    pub fn new(
        dimensions: Dimensions,
        deltax: f64,
        grain_ids: Vec<i32>,
        layer_ids: Vec<i32>,
    ) -> Result<Self> {
        if !(deltax.is_finite() && deltax > 0.0) {
            return Err(Error::InvalidCellSize(deltax));
        }

        let expected = dimensions.number_of_cells();
        for (field, found) in [("grain id", grain_ids.len()), ("layer id", layer_ids.len())] {
            if found != expected {
                return Err(Error::UnexpectedNumberOfCells {
                    field,
                    expected,
                    found,
                });
            }
        }

        Ok(Self {
            dimensions,
            deltax,
            grain_ids,
            layer_ids,
        })
    }

    /// Build a volume by evaluating `f(z, x, y) -> (grain id, layer id)`
    ///
    /// ```rust
    /// # use grainkit_volume::{Dimensions, GrainVolume};
    /// // Nucleated grain on top of a substrate grain
    /// let volume = GrainVolume::from_fn(Dimensions::new(2, 2, 2), 1e-6, |z, _, _| {
    ///     if z == 0 { (1, -1) } else { (-2, 0) }
    /// }).unwrap();
    ///
    /// assert_eq!(volume.grain_id(1, 1, 1), -2);
    /// assert_eq!(volume.layer_id(0, 1, 1), -1);
    /// ```
    pub fn from_fn<F>(dimensions: Dimensions, deltax: f64, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize, usize) -> (i32, i32),
    {
        let n = dimensions.number_of_cells();
        let mut grain_ids = Vec::with_capacity(n);
        let mut layer_ids = Vec::with_capacity(n);

        for z in 0..dimensions.nz {
            for x in 0..dimensions.nx {
                for y in 0..dimensions.ny {
                    let (grain, layer) = f(z, x, y);
                    grain_ids.push(grain);
                    layer_ids.push(layer);
                }
            }
        }

        Self::new(dimensions, deltax, grain_ids, layer_ids)
    }

    /// Volume with every cell melted in layer 0 and assigned to one grain
    ///
    /// Mostly useful for quick checks and tests. An invalid `deltax` falls
    /// back to 1 micron.
    pub fn uniform(dimensions: Dimensions, deltax: f64, grain_id: i32) -> Self {
        let n = dimensions.number_of_cells();
        let deltax = if deltax.is_finite() && deltax > 0.0 {
            deltax
        } else {
            1e-6
        };
        Self {
            dimensions,
            deltax,
            grain_ids: vec![grain_id; n],
            layer_ids: vec![0; n],
        }
    }

    /// Number of cells along each axis
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Number of cells in x
    pub fn nx(&self) -> usize {
        self.dimensions.nx
    }

    /// Number of cells in y
    pub fn ny(&self) -> usize {
        self.dimensions.ny
    }

    /// Number of cells in z
    pub fn nz(&self) -> usize {
        self.dimensions.nz
    }

    /// Cell edge length in metres
    pub fn deltax(&self) -> f64 {
        self.deltax
    }

    /// Grain id at `(z, x, y)`
    #[inline]
    pub fn grain_id(&self, z: usize, x: usize, y: usize) -> i32 {
        self.grain_ids[self.dimensions.index(z, x, y)]
    }

    /// Layer id at `(z, x, y)`
    #[inline]
    pub fn layer_id(&self, z: usize, x: usize, y: usize) -> i32 {
        self.layer_ids[self.dimensions.index(z, x, y)]
    }

    /// Whether the cell at `(z, x, y)` underwent melting
    #[inline]
    pub fn is_melted(&self, z: usize, x: usize, y: usize) -> bool {
        self.layer_id(z, x, y) != SUBSTRATE_LAYER
    }

    /// Full [Cell] record at `(z, x, y)`
    #[inline]
    pub fn cell(&self, z: usize, x: usize, y: usize) -> Cell {
        let index = self.dimensions.index(z, x, y);
        Cell {
            z,
            x,
            y,
            grain_id: self.grain_ids[index],
            layer_id: self.layer_ids[index],
        }
    }

    /// Bounds covering the entire volume
    pub fn bounds(&self) -> Bounds {
        Bounds {
            xmin: 0,
            xmax: self.nx().saturating_sub(1),
            ymin: 0,
            ymax: self.ny().saturating_sub(1),
            zmin: 0,
            zmax: self.nz().saturating_sub(1),
        }
    }

    /// Check that `bounds` are ordered and lie entirely inside the volume
    pub fn check_bounds(&self, bounds: &Bounds) -> Result<()> {
        bounds.check()?;
        if bounds.xmax >= self.nx() || bounds.ymax >= self.ny() || bounds.zmax >= self.nz() {
            return Err(Error::BoundsOutsideVolume {
                bounds: *bounds,
                dimensions: self.dimensions,
            });
        }
        Ok(())
    }

    /// Iterate over every cell inside `bounds`
    ///
    /// Cells are visited with z outermost and y innermost. The bounds are
    /// assumed valid, see [check_bounds()](GrainVolume::check_bounds).
    pub fn cells<'a>(&'a self, bounds: &Bounds) -> impl Iterator<Item = Cell> + 'a {
        bounds.coordinates().map(|(z, x, y)| self.cell(z, x, y))
    }

    /// Cell edge length in microns
    pub fn cell_length_microns(&self) -> f64 {
        self.deltax * 1e6
    }

    /// Cell face area in square microns
    pub fn cell_area_microns(&self) -> f64 {
        self.cell_length_microns().powi(2)
    }

    /// Cell volume in cubic microns
    pub fn cell_volume_microns(&self) -> f64 {
        self.cell_length_microns().powi(3)
    }

    /// Convert an area in square microns to the nearest whole number of cells
    ///
    /// This is the conversion used for every grain size threshold.
    ///
    /// ```rust
    /// # use grainkit_volume::{Dimensions, GrainVolume};
    /// let volume = GrainVolume::uniform(Dimensions::new(1, 1, 1), 1e-6, 1);
    /// assert_eq!(volume.area_to_cells(7.8125), 8);
    /// assert_eq!(volume.area_to_cells(1500.0), 1500);
    /// ```
    pub fn area_to_cells(&self, area_microns: f64) -> usize {
        (area_microns / (self.deltax * self.deltax * 1e12)).round() as usize
    }
}

impl std::fmt::Display for GrainVolume {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "GrainVolume {\n".to_string();
        s += &f!(
            "    cells: {} ({})\n",
            self.dimensions.number_of_cells(),
            self.dimensions
        );
        s += &f!("    deltax: {} m\n", self.deltax.sci(3, 2));
        s += &f!(
            "    melted: {}\n}}",
            self.layer_ids
                .iter()
                .filter(|l| **l != SUBSTRATE_LAYER)
                .count()
        );
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_index_is_y_fastest() {
        let d = Dimensions::new(3, 4, 5);
        assert_eq!(d.index(0, 0, 0), 0);
        assert_eq!(d.index(0, 0, 1), 1);
        assert_eq!(d.index(0, 1, 0), 4);
        assert_eq!(d.index(1, 0, 0), 12);
        assert_eq!(d.index(4, 2, 3), d.number_of_cells() - 1);
    }

    #[test]
    fn rejects_wrong_field_lengths() {
        let d = Dimensions::new(2, 2, 1);
        let result = GrainVolume::new(d, 1e-6, vec![1; 3], vec![0; 4]);
        assert!(matches!(
            result,
            Err(Error::UnexpectedNumberOfCells {
                field: "grain id",
                expected: 4,
                found: 3
            })
        ));

        let result = GrainVolume::new(d, 1e-6, vec![1; 4], vec![0; 5]);
        assert!(matches!(
            result,
            Err(Error::UnexpectedNumberOfCells { field: "layer id", .. })
        ));
    }

    #[test]
    fn rejects_bad_cell_size() {
        let d = Dimensions::new(1, 1, 1);
        assert!(GrainVolume::new(d, 0.0, vec![1], vec![0]).is_err());
        assert!(GrainVolume::new(d, f64::NAN, vec![1], vec![0]).is_err());
    }

    #[test]
    fn from_fn_matches_accessors() {
        let volume = GrainVolume::from_fn(Dimensions::new(3, 2, 2), 1e-6, |z, x, y| {
            ((100 * z + 10 * x + y) as i32 + 1, z as i32)
        })
        .unwrap();

        for z in 0..2 {
            for x in 0..3 {
                for y in 0..2 {
                    assert_eq!(volume.grain_id(z, x, y), (100 * z + 10 * x + y) as i32 + 1);
                    assert_eq!(volume.layer_id(z, x, y), z as i32);
                }
            }
        }
    }

    #[test]
    fn check_bounds_against_dimensions() {
        let volume = GrainVolume::uniform(Dimensions::new(4, 4, 4), 1e-6, 5);
        assert!(volume.check_bounds(&volume.bounds()).is_ok());

        let outside = Bounds::new(0, 4, 0, 3, 0, 3);
        assert!(matches!(
            volume.check_bounds(&outside),
            Err(Error::BoundsOutsideVolume { .. })
        ));
    }

    #[test]
    fn unit_conversions() {
        let volume = GrainVolume::uniform(Dimensions::new(1, 1, 1), 2e-6, 1);
        assert!((volume.cell_length_microns() - 2.0).abs() < 1e-12);
        assert!((volume.cell_area_microns() - 4.0).abs() < 1e-12);
        assert!((volume.cell_volume_microns() - 8.0).abs() < 1e-9);
        // 7.8125 / 4 = 1.95 rounds to 2 cells
        assert_eq!(volume.area_to_cells(7.8125), 2);
    }

    #[test]
    fn display_summary() {
        let volume = GrainVolume::new(Dimensions::new(2, 1, 1), 1.5e-6, vec![1, 2], vec![0, -1]).unwrap();
        let text = volume.to_string();
        assert!(text.contains("cells: 2 (2x1x1)"));
        assert!(text.contains("deltax: 1.500e-06 m"));
        assert!(text.contains("melted: 1"));
    }
}
