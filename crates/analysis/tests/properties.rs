//! Integration tests for the invariants of the grain analyses

use grainkit_analysis::{
    describe_grain, describe_grains, BimodalSummary, Distribution, Error, GrainAreas, GrainSet,
    Histogram, SectionAnalysis, Thresholds, UnimodalSummary,
};
use grainkit_orientation::{Axis, OrientationService};
use grainkit_volume::{orientation_index, Bounds, CrossSection, Dimensions, GrainVolume, Plane};
use rstest::{fixture, rstest};

/// Four orientations with distinct angles, colours and Euler angles
struct Quarters;

impl OrientationService for Quarters {
    fn number_of_orientations(&self) -> usize {
        4
    }
    fn angle(&self, orientation: usize, axis: Axis) -> f64 {
        15.0 * orientation as f64 + axis.index() as f64
    }
    fn color(&self, orientation: usize) -> [f64; 3] {
        [0.0, orientation as f64, 1.0]
    }
    fn euler_angles(&self, orientation: usize) -> [f64; 3] {
        [90.0 * orientation as f64, 45.0, 12.5]
    }
}

/// Deterministic mix of grown, nucleated and unassigned cells
#[fixture]
fn mixed() -> GrainVolume {
    GrainVolume::from_fn(Dimensions::new(12, 10, 8), 1e-6, |z, x, y| {
        let id = match (x + 3 * y + 7 * z) % 11 {
            0 => 0,
            n if n % 2 == 0 => -(n as i32),
            n => (x / 4 + n) as i32,
        };
        (id, if z == 0 { -1 } else { 0 })
    })
    .unwrap()
}

#[fixture]
fn filled() -> GrainVolume {
    GrainVolume::uniform(Dimensions::new(4, 4, 4), 1e-6, 5)
}

#[rstest]
fn single_grain_volume(filled: GrainVolume) {
    let region = filled.bounds();
    let grains = GrainSet::from_ids(filled.cells(&region).map(|c| c.grain_id));
    assert_eq!(grains.as_slice(), &[5]);
    assert_eq!(orientation_index(5, 4), Some(0));

    let grain = describe_grain(&filled, &region, 5).unwrap();
    assert_eq!(grain.volume, 64);
    assert_eq!(grain.min, [0, 0, 0]);
    assert_eq!(grain.max, [3, 3, 3]);
    assert_eq!(grain.aspect_ratio(), 1.0);
}

#[rstest]
#[case(Bounds::new(0, 11, 0, 9, 0, 7))] // full volume
#[case(Bounds::new(2, 5, 3, 9, 1, 6))] // interior box
#[case(Bounds::new(7, 7, 4, 4, 3, 3))] // single cell
#[case(Bounds::new(0, 11, 0, 9, 7, 7))] // top layer
fn cell_counts_sum_to_assigned_cells(mixed: GrainVolume, #[case] bounds: Bounds) {
    let assigned = mixed.cells(&bounds).filter(|c| c.grain_id != 0).count();
    let grains = GrainSet::from_ids(
        mixed
            .cells(&bounds)
            .map(|c| c.grain_id)
            .filter(|id| *id != 0),
    );
    let total: usize = grains
        .iter()
        .filter_map(|id| describe_grain(&mixed, &bounds, id))
        .map(|g| g.volume)
        .sum();
    assert_eq!(total, assigned);
    assert_eq!(describe_grains(&mixed, &bounds).len(), grains.len());
}

#[rstest]
fn bounding_boxes_are_exact(mixed: GrainVolume) {
    let region = mixed.bounds();
    for grain in describe_grains(&mixed, &region) {
        let cells = mixed
            .cells(&region)
            .filter(|c| c.grain_id == grain.id)
            .collect::<Vec<_>>();
        assert!(cells.iter().all(|c| grain.encloses(c.z, c.x, c.y)));
        for axis in 0..3 {
            let coordinate = |c: &grainkit_volume::Cell| [c.x, c.y, c.z][axis];
            assert_eq!(cells.iter().map(coordinate).min(), Some(grain.min[axis]));
            assert_eq!(cells.iter().map(coordinate).max(), Some(grain.max[axis]));
        }
    }
}

#[rstest]
fn single_cell_grain() {
    let volume = GrainVolume::from_fn(Dimensions::new(3, 3, 3), 1e-6, |z, x, y| {
        (if (z, x, y) == (1, 1, 1) { -9 } else { 2 }, 0)
    })
    .unwrap();
    let grain = describe_grain(&volume, &volume.bounds(), -9).unwrap();
    assert_eq!(grain.volume, 1);
    assert_eq!(grain.aspect_ratio(), 1.0);
    assert_eq!(grain.height(), 1);
    assert_eq!(grain.width(), 1.0);
}

#[rstest]
#[case(1e-6, 7.8125, 8)]
#[case(1e-6, 1500.0, 1500)]
#[case(2e-6, 7.8125, 2)]
#[case(5e-7, 7.8125, 31)]
fn threshold_conversion(#[case] deltax: f64, #[case] area: f64, #[case] cells: usize) {
    let volume = GrainVolume::uniform(Dimensions::new(1, 1, 1), deltax, 1);
    assert_eq!(volume.area_to_cells(area), cells);
}

#[rstest]
#[case(Plane::XY, 3)]
#[case(Plane::YZ, 5)]
#[case(Plane::XZ, 0)]
fn area_fractions_partition(mixed: GrainVolume, #[case] plane: Plane, #[case] index: usize) {
    let section = CrossSection::new(plane, index);
    let thresholds = Thresholds {
        min_grain_area: 3.0,
        small_large_cutoff: 6.0,
    };

    let unimodal = SectionAnalysis::new(&mixed, &section, false, &thresholds, &Quarters).unwrap();
    let Distribution::Unimodal(u) = &unimodal.distribution else {
        panic!("expected a unimodal distribution");
    };
    assert!((u.fraction_too_small() + u.fraction_counted() - 1.0).abs() < 1e-12);
    assert_eq!(unimodal.areas.total(), unimodal.census.melted_cells());

    let bimodal = SectionAnalysis::new(&mixed, &section, true, &thresholds, &Quarters).unwrap();
    let Distribution::Bimodal(b) = &bimodal.distribution else {
        panic!("expected a bimodal distribution");
    };
    let sum = b.fraction_too_small() + b.fraction_small() + b.fraction_large();
    assert!((sum - 1.0).abs() < 1e-12);

    // every surviving grain is in exactly one class
    let survivors = bimodal.areas.iter().filter(|(_, a)| *a >= 3).count();
    assert_eq!(b.small.len() + b.large.len(), survivors);
    assert!(b.small.iter().all(|g| !b.large.iter().any(|l| l.id == g.id)));
}

#[test]
fn bimodal_with_unassigned_grain_fails() {
    let ids = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4];
    let areas = GrainAreas::count(&ids);
    let result = BimodalSummary::new(&areas, 8, 15, &Quarters);
    assert!(matches!(result, Err(Error::UnassignedGrain { .. })));

    // the unimodal path needs no orientation
    let unimodal = UnimodalSummary::new(&areas, 8);
    assert_eq!(unimodal.counted.len(), 2);
}

#[rstest]
fn orientation_histogram_covers_melted_cells(mixed: GrainVolume) {
    let region = mixed.bounds();
    let histogram = Histogram::from_region(&mixed, &region, 4);
    let expected = mixed
        .cells(&region)
        .filter(|c| c.is_melted() && c.grain_id != 0)
        .count() as u64;
    assert_eq!(histogram.total(), expected);
}
