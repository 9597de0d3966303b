//! Enumeration of distinct grains

// external crates
use itertools::Itertools;

/// Distinct grain ids in ascending order
///
/// Built from any sequence of ids drawn from a region. Repeats collapse to a
/// single entry and the ordering is always ascending, so the `n`th grain of a
/// region is reproducible between runs.
///
/// No filtering is applied. Callers decide whether the unassigned id `0`
/// belongs in the sequence.
///
/// ```rust
/// # use grainkit_analysis::GrainSet;
/// let grains = GrainSet::from_ids([4, -2, 4, 0, 7, -2]);
/// assert_eq!(grains.as_slice(), &[-2, 0, 4, 7]);
/// assert_eq!(grains.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrainSet {
    ids: Vec<i32>,
}

impl GrainSet {
    /// Collect the distinct values of `ids`
    pub fn from_ids<I: IntoIterator<Item = i32>>(ids: I) -> Self {
        Self {
            ids: ids.into_iter().sorted_unstable().dedup().collect(),
        }
    }

    /// Number of distinct grains
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// No grains at all
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `id` is in the set
    pub fn contains(&self, id: i32) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Ids as an ascending slice
    pub fn as_slice(&self) -> &[i32] {
        &self.ids
    }

    /// Iterate over ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<i32> for GrainSet {
    fn from_iter<T: IntoIterator<Item = i32>>(iter: T) -> Self {
        Self::from_ids(iter)
    }
}

/// Number of cells occupied by each distinct grain of a sample
///
/// Areas are found by exact membership counting, comparing every grain against
/// every sampled id. Grains keep the ascending order of their [GrainSet].
///
/// ```rust
/// # use grainkit_analysis::GrainAreas;
/// let areas = GrainAreas::count(&[3, 1, 3, 3, -1]);
/// assert_eq!(areas.iter().collect::<Vec<_>>(), vec![(-1, 1), (1, 1), (3, 3)]);
/// assert_eq!(areas.total(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrainAreas {
    grains: GrainSet,
    areas: Vec<usize>,
}

impl GrainAreas {
    /// Count the cells of every distinct id in `ids`
    pub fn count(ids: &[i32]) -> Self {
        let grains = GrainSet::from_ids(ids.iter().copied());
        let areas = grains
            .iter()
            .map(|grain| ids.iter().filter(|id| **id == grain).count())
            .collect();
        Self { grains, areas }
    }

    /// Number of distinct grains
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// No grains at all
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Distinct grains that were counted
    pub fn grains(&self) -> &GrainSet {
        &self.grains
    }

    /// Areas in cells, in the same order as [grains()](GrainAreas::grains)
    pub fn areas(&self) -> &[usize] {
        &self.areas
    }

    /// Sum of every area, equal to the number of ids counted
    pub fn total(&self) -> usize {
        self.areas.iter().sum()
    }

    /// Sum of the squared areas
    pub fn total_squared(&self) -> usize {
        self.areas.iter().map(|a| a * a).sum()
    }

    /// Iterate over `(id, area)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (i32, usize)> + '_ {
        self.grains.iter().zip(self.areas.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_independent_of_input_order() {
        let a = GrainSet::from_ids([9, 3, -1, 3, 9]);
        let b = GrainSet::from_ids([-1, 9, 9, 3]);
        assert_eq!(a, b);
        assert_eq!(a.as_slice(), &[-1, 3, 9]);
    }

    #[test]
    fn zero_is_kept_when_present() {
        let grains: GrainSet = [0, 0, 1].into_iter().collect();
        assert!(grains.contains(0));
        assert!(grains.contains(1));
        assert!(!grains.contains(2));
    }

    #[test]
    fn empty_input() {
        let grains = GrainSet::from_ids(std::iter::empty());
        assert!(grains.is_empty());
        assert_eq!(grains.iter().count(), 0);
    }

    #[test]
    fn areas_sum_to_sample_size() {
        let ids = [5, 5, -7, 2, 5, 2, 0, 0];
        let areas = GrainAreas::count(&ids);
        assert_eq!(areas.len(), 4);
        assert_eq!(areas.total(), ids.len());
        assert_eq!(areas.areas(), &[1, 2, 2, 3]);
        assert_eq!(areas.total_squared(), 1 + 4 + 4 + 9);
        assert_eq!(areas.grains().as_slice(), &[-7, 0, 2, 5]);
    }
}
