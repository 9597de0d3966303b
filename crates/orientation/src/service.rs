// crate modules
use crate::axis::Axis;

/// Read-only lookup of per-orientation crystallographic quantities
///
/// Analyses depend only on this trait, so the crystal symmetry maths behind
/// the misorientation angles can be replaced or stubbed in tests. The
/// standard implementation is [OrientationTable](crate::OrientationTable).
///
/// Orientation indices are always in `0..number_of_orientations()`.
/// Implementations may panic for anything outside that range.
///
/// ```rust
/// # use grainkit_orientation::{Axis, OrientationService};
/// /// Every orientation tilted 10 degrees from every axis
/// struct Tilted;
///
/// impl OrientationService for Tilted {
///     fn number_of_orientations(&self) -> usize { 4 }
///     fn angle(&self, _: usize, _: Axis) -> f64 { 10.0 }
///     fn color(&self, _: usize) -> [f64; 3] { [0.0, 0.5, 0.5] }
///     fn euler_angles(&self, _: usize) -> [f64; 3] { [0.0; 3] }
/// }
///
/// assert_eq!(Tilted.angle(3, Axis::Z), 10.0);
/// ```
pub trait OrientationService {
    /// Number of entries in the orientation table
    fn number_of_orientations(&self) -> usize;

    /// Misorientation angle in degrees between an orientation and a sample axis
    fn angle(&self, orientation: usize, axis: Axis) -> f64;

    /// Inverse pole figure colour of an orientation as `(r, g, b)`
    fn color(&self, orientation: usize) -> [f64; 3];

    /// Bunge Euler angles `(phi1, Phi, phi2)` of an orientation
    fn euler_angles(&self, orientation: usize) -> [f64; 3];
}

impl<T: OrientationService + ?Sized> OrientationService for &T {
    fn number_of_orientations(&self) -> usize {
        (**self).number_of_orientations()
    }

    fn angle(&self, orientation: usize, axis: Axis) -> f64 {
        (**self).angle(orientation, axis)
    }

    fn color(&self, orientation: usize) -> [f64; 3] {
        (**self).color(orientation)
    }

    fn euler_angles(&self, orientation: usize) -> [f64; 3] {
        (**self).euler_angles(orientation)
    }
}
