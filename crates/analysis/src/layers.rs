//! Grain areas and widths in single z layers

// crate modules
use crate::descriptors::{describe_grains, GrainDescriptor};
use crate::grains::GrainAreas;

// grainkit modules
use grainkit_utils::ratio;
use grainkit_volume::{Bounds, GrainVolume};

/// Grain count and area statistics of one z layer of a region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerAreas {
    /// z coordinate of the layer
    pub z: usize,
    /// Number of distinct grains in the layer
    pub grains: usize,
    /// Number of cells in the layer that belong to a grain
    pub cells: usize,
    /// Sum over grains of the squared grain area
    pub squared_area: usize,
}

impl LayerAreas {
    /// Count the grains of layer `z` within the lateral extent of `bounds`
    ///
    /// ```rust
    /// # use grainkit_analysis::LayerAreas;
    /// # use grainkit_volume::{Dimensions, GrainVolume};
    /// // two grains, 12 and 4 cells
    /// let volume = GrainVolume::from_fn(Dimensions::new(4, 4, 1), 1e-6, |_, x, _| {
    ///     (if x == 0 { 2 } else { 1 }, 0)
    /// }).unwrap();
    ///
    /// let layer = LayerAreas::new(&volume, &volume.bounds(), 0);
    /// assert_eq!(layer.grains, 2);
    /// assert_eq!(layer.mean_area(), 8.0);
    /// assert_eq!(layer.weighted_area(), 10.0);
    /// ```
    pub fn new(volume: &GrainVolume, bounds: &Bounds, z: usize) -> Self {
        let ids = volume
            .cells(&bounds.layer(z))
            .filter(|c| !c.is_unassigned())
            .map(|c| c.grain_id)
            .collect::<Vec<i32>>();
        let areas = GrainAreas::count(&ids);

        Self {
            z,
            grains: areas.len(),
            cells: areas.total(),
            squared_area: areas.total_squared(),
        }
    }

    /// Mean grain area in cells
    pub fn mean_area(&self) -> f64 {
        ratio(self.cells, self.grains)
    }

    /// Area weighted mean grain area in cells, `sum(a^2) / sum(a)`
    pub fn weighted_area(&self) -> f64 {
        ratio(self.squared_area, self.cells)
    }
}

/// Every grain crossing the top layer of a region
///
/// The descriptors only cover the top layer, so their x and y extents are the
/// grain widths at the top surface.
pub fn top_layer_grains(volume: &GrainVolume, bounds: &Bounds) -> Vec<GrainDescriptor> {
    describe_grains(volume, &bounds.top_layer())
}
