//! Misorientation relative to the sample axes

// crate modules
use crate::error::{Error, Result};

// grainkit modules
use grainkit_orientation::{Axis, OrientationService};
use grainkit_utils::{f, ratio};
use grainkit_volume::{orientation_index, Bounds, GrainVolume};

// external crates
use log::{debug, warn};

/// Orientation index of a grain, failing on the unassigned id
pub(crate) fn lookup<S: OrientationService>(
    service: &S,
    grain_id: i32,
    context: impl FnOnce() -> String,
) -> Result<usize> {
    if service.number_of_orientations() == 0 {
        return Err(Error::NoOrientations);
    }
    orientation_index(grain_id, service.number_of_orientations()).ok_or_else(|| {
        Error::UnassignedGrain {
            context: context(),
        }
    })
}

/// One misorientation sample per melted cell of a region
///
/// Cells masked as substrate are skipped. Every remaining cell must belong to
/// a grain, since its orientation is needed.
#[derive(Debug, Clone, PartialEq)]
pub struct CellMisorientations {
    /// Region that was sampled
    pub bounds: Bounds,
    /// Reference sample axis
    pub axis: Axis,
    /// Angle in degrees for every melted cell, in scan order
    pub angles: Vec<f64>,
    /// Number of samples taken from the top layer of the region
    pub top_cells: usize,
    /// Sum of the angles over the top layer of the region
    top_sum: f64,
}

impl CellMisorientations {
    /// Sample every melted cell of `bounds`
    ///
    /// ```rust
    /// # use grainkit_analysis::CellMisorientations;
    /// # use grainkit_orientation::{Axis, OrientationTable};
    /// # use grainkit_volume::{Dimensions, GrainVolume};
    /// let table = OrientationTable::new(
    ///     vec![[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]],
    ///     vec![[0.0; 3]],
    ///     vec![[1.0, 0.0, 0.0]],
    /// ).unwrap();
    /// let volume = GrainVolume::uniform(Dimensions::new(2, 2, 2), 1e-6, 3);
    ///
    /// let sampled = CellMisorientations::new(&volume, &volume.bounds(), &table, Axis::Z).unwrap();
    /// assert_eq!(sampled.angles.len(), 8);
    /// assert!(sampled.mean().abs() < 1e-9);
    /// ```
    pub fn new<S: OrientationService>(
        volume: &GrainVolume,
        bounds: &Bounds,
        service: &S,
        axis: Axis,
    ) -> Result<Self> {
        let mut angles = Vec::new();
        let mut top_cells = 0;
        let mut top_sum = 0.0;

        for c in volume.cells(bounds).filter(|c| c.is_melted()) {
            let orientation = lookup(service, c.grain_id, || {
                f!("melted cell at z={}, x={}, y={}", c.z, c.x, c.y)
            })?;
            let angle = service.angle(orientation, axis);
            if c.z == bounds.zmax {
                top_cells += 1;
                top_sum += angle;
            }
            angles.push(angle);
        }

        debug!("Sampled {} melted cells of {bounds}", angles.len());
        if angles.is_empty() {
            warn!("No melted cells in {bounds}, mean misorientation is undefined");
        }

        Ok(Self {
            bounds: *bounds,
            axis,
            angles,
            top_cells,
            top_sum,
        })
    }

    /// Number of melted cells sampled
    pub fn melted_cells(&self) -> usize {
        self.angles.len()
    }

    /// Mean angle over every melted cell
    pub fn mean(&self) -> f64 {
        self.angles.iter().sum::<f64>() / self.angles.len() as f64
    }

    /// Mean angle over the melted cells of the top layer
    pub fn mean_top(&self) -> f64 {
        self.top_sum / self.top_cells as f64
    }

    /// Fraction of the region that melted
    pub fn melted_fraction(&self) -> f64 {
        ratio(self.melted_cells(), self.bounds.number_of_cells())
    }
}

/// Misorientation of a single grain about every sample axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrainMisorientation {
    /// Grain identifier
    pub id: i32,
    /// Index into the orientation table
    pub orientation: usize,
    /// Number of cells the grain occupies
    pub area: usize,
    /// Angles in degrees relative to x, y and z
    pub angles: [f64; 3],
}

impl GrainMisorientation {
    /// Look up the misorientation of grain `id`
    ///
    /// Fails with [Error::UnassignedGrain] for id `0`.
    pub fn new<S: OrientationService>(service: &S, id: i32, area: usize) -> Result<Self> {
        let orientation = lookup(service, id, || f!("grain {id} with area {area}"))?;
        Ok(Self {
            id,
            orientation,
            area,
            angles: Axis::ALL.map(|axis| service.angle(orientation, axis)),
        })
    }

    /// Angle relative to one sample axis
    pub fn angle(&self, axis: Axis) -> f64 {
        self.angles[axis.index()]
    }
}

/// Area weighted mean misorientation over a population of grains
///
/// Each grain contributes its angle once per cell it occupies, giving the same
/// mean as a listing with one row per cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedMisorientation {
    sums: [f64; 3],
    area: usize,
}

impl WeightedMisorientation {
    /// Accumulate one grain
    pub fn push(&mut self, grain: &GrainMisorientation) {
        for axis in Axis::ALL {
            self.sums[axis.index()] += grain.area as f64 * grain.angle(axis);
        }
        self.area += grain.area;
    }

    /// Total area accumulated, in cells
    pub fn area(&self) -> usize {
        self.area
    }

    /// Weighted mean angle relative to `axis`
    pub fn mean(&self, axis: Axis) -> f64 {
        self.sums[axis.index()] / self.area as f64
    }
}

impl<'a> FromIterator<&'a GrainMisorientation> for WeightedMisorientation {
    fn from_iter<T: IntoIterator<Item = &'a GrainMisorientation>>(iter: T) -> Self {
        let mut weighted = Self::default();
        for grain in iter {
            weighted.push(grain);
        }
        weighted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grainkit_volume::Dimensions;

    /// Orientation `i` is misaligned by `10 * (i + 1)` degrees about every axis
    struct Steps(usize);

    impl OrientationService for Steps {
        fn number_of_orientations(&self) -> usize {
            self.0
        }
        fn angle(&self, orientation: usize, axis: Axis) -> f64 {
            10.0 * (orientation + 1) as f64 + axis.index() as f64
        }
        fn color(&self, _: usize) -> [f64; 3] {
            [0.0; 3]
        }
        fn euler_angles(&self, _: usize) -> [f64; 3] {
            [0.0; 3]
        }
    }

    #[test]
    fn substrate_cells_are_skipped() {
        // bottom layer is substrate with no grain assigned
        let volume = GrainVolume::from_fn(Dimensions::new(2, 2, 3), 1e-6, |z, x, _| match z {
            0 => (0, -1),
            _ => (1 + x as i32, 0),
        })
        .unwrap();
        let sampled = CellMisorientations::new(&volume, &volume.bounds(), &Steps(4), Axis::Z).unwrap();

        assert_eq!(sampled.melted_cells(), 8);
        assert_eq!(sampled.top_cells, 4);
        assert_eq!(sampled.melted_fraction(), 8.0 / 12.0);
        // half the cells in orientation 0, half in orientation 1
        assert_eq!(sampled.mean(), 17.0);
        assert_eq!(sampled.mean_top(), 17.0);
    }

    #[test]
    fn melted_unassigned_cell_is_fatal() {
        let volume = GrainVolume::uniform(Dimensions::new(1, 1, 2), 1e-6, 0);
        let result = CellMisorientations::new(&volume, &volume.bounds(), &Steps(4), Axis::Z);
        assert!(matches!(result, Err(Error::UnassignedGrain { .. })));
    }

    #[test]
    fn grain_lookup_is_sign_invariant() {
        let grown = GrainMisorientation::new(&Steps(3), 5, 10).unwrap();
        let nucleated = GrainMisorientation::new(&Steps(3), -5, 10).unwrap();
        assert_eq!(grown.orientation, 1);
        assert_eq!(grown.angles, nucleated.angles);
        assert_eq!(grown.angle(Axis::Y), 21.0);
    }

    #[test]
    fn unassigned_grain_is_fatal() {
        assert!(matches!(
            GrainMisorientation::new(&Steps(3), 0, 10),
            Err(Error::UnassignedGrain { .. })
        ));
        assert!(matches!(
            GrainMisorientation::new(&Steps(0), 1, 10),
            Err(Error::NoOrientations)
        ));
    }

    #[test]
    fn weighting_matches_replication() {
        let service = Steps(2);
        let grains = [
            GrainMisorientation::new(&service, 1, 3).unwrap(),
            GrainMisorientation::new(&service, 2, 1).unwrap(),
        ];
        let weighted: WeightedMisorientation = grains.iter().collect();

        // one row per cell, as written to the bimodal listings
        let replicated = grains
            .iter()
            .flat_map(|g| std::iter::repeat(g.angle(Axis::X)).take(g.area))
            .collect::<Vec<f64>>();

        assert_eq!(weighted.area(), 4);
        assert_eq!(weighted.mean(Axis::X), replicated.iter().sum::<f64>() / 4.0);
        assert_eq!(weighted.mean(Axis::X), 12.5);
    }

    #[test]
    fn empty_population_is_nan() {
        assert!(WeightedMisorientation::default().mean(Axis::Z).is_nan());
    }
}
