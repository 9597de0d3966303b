//! Per-grain bounding boxes and size statistics

// standard library
use std::collections::BTreeMap;

// grainkit modules
use grainkit_utils::{f, mean, ratio, weighted_mean};
use grainkit_volume::{is_nucleated, Bounds, GrainVolume};

// external crates
use log::{trace, warn};

/// Geometry of a single grain within a region
///
/// Bounding box corners are stored as `[x, y, z]` cell coordinates, and both
/// corners are inclusive. Every size is in cells, conversion to physical units
/// happens when reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrainDescriptor {
    /// Grain identifier
    pub id: i32,
    /// Number of cells belonging to the grain
    pub volume: usize,
    /// Lowest `[x, y, z]` coordinate of any cell in the grain
    pub min: [usize; 3],
    /// Highest `[x, y, z]` coordinate of any cell in the grain
    pub max: [usize; 3],
}

impl GrainDescriptor {
    /// Descriptor for a grain with a single cell at `(z, x, y)`
    fn new(id: i32, z: usize, x: usize, y: usize) -> Self {
        Self {
            id,
            volume: 1,
            min: [x, y, z],
            max: [x, y, z],
        }
    }

    /// Grow the descriptor to include another cell
    fn include(&mut self, z: usize, x: usize, y: usize) {
        self.volume += 1;
        for (axis, value) in [x, y, z].into_iter().enumerate() {
            self.min[axis] = self.min[axis].min(value);
            self.max[axis] = self.max[axis].max(value);
        }
    }

    /// Bounding box extent in x
    pub fn extent_x(&self) -> usize {
        self.max[0] - self.min[0] + 1
    }

    /// Bounding box extent in y
    pub fn extent_y(&self) -> usize {
        self.max[1] - self.min[1] + 1
    }

    /// Bounding box extent in z
    pub fn extent_z(&self) -> usize {
        self.max[2] - self.min[2] + 1
    }

    /// Grain height, the z extent
    pub fn height(&self) -> usize {
        self.extent_z()
    }

    /// Mean of the x and y extents
    pub fn width(&self) -> f64 {
        0.5 * (self.extent_x() + self.extent_y()) as f64
    }

    /// Mean of the build direction to transverse extent ratios
    ///
    /// `0.5 * (ez/ex + ez/ey)`. Extents are at least one cell, so this is
    /// always finite.
    pub fn aspect_ratio(&self) -> f64 {
        let ez = self.extent_z() as f64;
        0.5 * (ez / self.extent_x() as f64 + ez / self.extent_y() as f64)
    }

    /// Whether `(z, x, y)` falls inside the bounding box
    pub fn encloses(&self, z: usize, x: usize, y: usize) -> bool {
        [x, y, z]
            .into_iter()
            .enumerate()
            .all(|(axis, value)| (self.min[axis]..=self.max[axis]).contains(&value))
    }
}

impl std::fmt::Display for GrainDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "grain {}: {} cells, x {}-{}, y {}-{}, z {}-{}",
            self.id,
            self.volume,
            self.min[0],
            self.max[0],
            self.min[1],
            self.max[1],
            self.min[2],
            self.max[2]
        )
    }
}

/// Describe a single grain within a region
///
/// Scans every cell of `bounds` for `id`. Returns `None` if the grain has no
/// cells in the region.
///
/// ```rust
/// # use grainkit_analysis::describe_grain;
/// # use grainkit_volume::{Dimensions, GrainVolume};
/// let volume = GrainVolume::uniform(Dimensions::new(4, 4, 4), 1e-6, 5);
/// let grain = describe_grain(&volume, &volume.bounds(), 5).unwrap();
///
/// assert_eq!(grain.volume, 64);
/// assert_eq!(grain.min, [0, 0, 0]);
/// assert_eq!(grain.max, [3, 3, 3]);
/// assert_eq!(grain.aspect_ratio(), 1.0);
/// ```
pub fn describe_grain(volume: &GrainVolume, bounds: &Bounds, id: i32) -> Option<GrainDescriptor> {
    volume
        .cells(bounds)
        .filter(|c| c.grain_id == id)
        .fold(None, |descriptor, c| match descriptor {
            None => Some(GrainDescriptor::new(id, c.z, c.x, c.y)),
            Some(mut d) => {
                d.include(c.z, c.x, c.y);
                Some(d)
            }
        })
}

/// Describe every grain within a region in a single scan
///
/// Unassigned cells are skipped. Descriptors are returned in ascending order
/// of grain id, the same ordering as a [GrainSet](crate::GrainSet) of the
/// region.
pub fn describe_grains(volume: &GrainVolume, bounds: &Bounds) -> Vec<GrainDescriptor> {
    let mut grains: BTreeMap<i32, GrainDescriptor> = BTreeMap::new();
    for c in volume.cells(bounds).filter(|c| !c.is_unassigned()) {
        grains
            .entry(c.grain_id)
            .and_modify(|d| d.include(c.z, c.x, c.y))
            .or_insert_with(|| GrainDescriptor::new(c.grain_id, c.z, c.x, c.y));
    }
    trace!("Described {} grains in {bounds}", grains.len());
    grains.into_values().collect()
}

/// Size and shape statistics of every grain in a region
///
/// Unassigned cells are excluded from every statistic except the nucleated
/// fraction, which is relative to the full region.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeSummary {
    /// Region the statistics were collected over
    pub bounds: Bounds,
    /// Cells that belong to a grain
    pub grain_cells: usize,
    /// Cells that belong to a nucleated grain
    pub nucleated_cells: usize,
    /// Descriptors of every grain, ascending by id
    pub grains: Vec<GrainDescriptor>,
}

impl SizeSummary {
    /// Collect grain statistics over `bounds`
    pub fn new(volume: &GrainVolume, bounds: &Bounds) -> Self {
        let grains = describe_grains(volume, bounds);
        let grain_cells = grains.iter().map(|g| g.volume).sum();
        let nucleated_cells = grains
            .iter()
            .filter(|g| is_nucleated(g.id))
            .map(|g| g.volume)
            .sum();

        let summary = Self {
            bounds: *bounds,
            grain_cells,
            nucleated_cells,
            grains,
        };

        if summary.grains.is_empty() {
            warn!("No grains found in {bounds}, size statistics are undefined");
        }
        summary
    }

    /// Number of distinct grains
    pub fn number_of_grains(&self) -> usize {
        self.grains.len()
    }

    /// Mean grain volume in cells
    pub fn mean_volume(&self) -> f64 {
        ratio(self.grain_cells, self.grains.len())
    }

    /// Fraction of the region occupied by nucleated grains
    pub fn nucleated_fraction(&self) -> f64 {
        ratio(self.nucleated_cells, self.bounds.number_of_cells())
    }

    /// Mean of the per-grain aspect ratios
    pub fn mean_aspect_ratio(&self) -> f64 {
        mean(&self.aspect_ratios())
    }

    /// Aspect ratio weighted by grain volume
    ///
    /// Normalised by the total number of grain cells rather than the number
    /// of grains.
    pub fn volume_weighted_aspect_ratio(&self) -> f64 {
        let volumes = self.grains.iter().map(|g| g.volume).collect::<Vec<usize>>();
        weighted_mean(&self.aspect_ratios(), &volumes)
    }

    /// Mean grain height in cells
    pub fn mean_height(&self) -> f64 {
        mean(&self.heights())
    }

    /// Mean grain width in cells
    pub fn mean_width(&self) -> f64 {
        mean(&self.grains.iter().map(|g| g.width()).collect::<Vec<f64>>())
    }

    /// Per-grain aspect ratios, ascending by grain id
    pub fn aspect_ratios(&self) -> Vec<f64> {
        self.grains.iter().map(|g| g.aspect_ratio()).collect()
    }

    /// Per-grain heights in cells, ascending by grain id
    pub fn heights(&self) -> Vec<f64> {
        self.grains.iter().map(|g| g.height() as f64).collect()
    }
}

impl std::fmt::Display for SizeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("SizeSummary ({}) {{\n", self.bounds);
        s += &f!("    grains: {}\n", self.number_of_grains());
        s += &f!("    grain cells: {}\n", self.grain_cells);
        s += &f!("    nucleated fraction: {}\n", self.nucleated_fraction());
        s += &f!("    mean aspect ratio: {}\n", self.mean_aspect_ratio());
        s += "}";
        write!(f, "{}", s)
    }
}
