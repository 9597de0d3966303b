//! Interpretation of raw grain and layer identifiers

/// Grain id of a cell that was never melted and never assigned a grain
pub const UNMELTED: i32 = 0;

/// Layer id marking substrate cells excluded from melt-pool statistics
pub const SUBSTRATE_LAYER: i32 = -1;

/// Whether a grain id belongs to a nucleated grain
///
/// Positive ids grew from the substrate texture and `0` is unassigned.
///
/// ```rust
/// # use grainkit_volume::is_nucleated;
/// assert!(is_nucleated(-12));
/// assert!(!is_nucleated(12));
/// ```
#[inline]
pub fn is_nucleated(grain_id: i32) -> bool {
    grain_id < 0
}

/// Index into the orientation table for a grain id
///
/// The orientation of a grain is `(|id| - 1) mod number_of_orientations`, so
/// grown and nucleated grains with the same magnitude share an orientation.
/// Returns `None` for the unassigned id `0`, or an empty table.
///
/// ```rust
/// # use grainkit_volume::orientation_index;
/// assert_eq!(orientation_index(1, 4), Some(0));
/// assert_eq!(orientation_index(-1, 4), Some(0));
/// assert_eq!(orientation_index(6, 4), Some(1));
/// assert_eq!(orientation_index(0, 4), None);
/// ```
#[inline]
pub fn orientation_index(grain_id: i32, number_of_orientations: usize) -> Option<usize> {
    if grain_id == UNMELTED || number_of_orientations == 0 {
        return None;
    }
    Some((grain_id.unsigned_abs() as usize - 1) % number_of_orientations)
}
