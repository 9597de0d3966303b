// crate modules
use crate::error::{Error, Result};

// external crates
use serde::{Deserialize, Serialize};

/// Axis-aligned box of cells with inclusive bounds on every axis
///
/// This is the unit of analysis for every volume query. Bounds are always
/// inclusive, so a box with `xmin == xmax` is one cell wide.
///
/// ```rust
/// # use grainkit_volume::Bounds;
/// let bounds = Bounds::new(0, 9, 0, 4, 2, 2);
/// assert_eq!(bounds.extent_x(), 10);
/// assert_eq!(bounds.extent_y(), 5);
/// assert_eq!(bounds.extent_z(), 1);
/// assert_eq!(bounds.number_of_cells(), 50);
/// ```
#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Lowest x coordinate
    pub xmin: usize,
    /// Highest x coordinate
    pub xmax: usize,
    /// Lowest y coordinate
    pub ymin: usize,
    /// Highest y coordinate
    pub ymax: usize,
    /// Lowest z coordinate
    pub zmin: usize,
    /// Highest z coordinate
    pub zmax: usize,
}

impl Bounds {
    /// Bounds from inclusive (min, max) pairs in x, y, z order
    pub fn new(
        xmin: usize,
        xmax: usize,
        ymin: usize,
        ymax: usize,
        zmin: usize,
        zmax: usize,
    ) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
            zmin,
            zmax,
        }
    }

    /// Check the lower bound never exceeds the upper bound on any axis
    pub fn check(&self) -> Result<()> {
        if self.xmin > self.xmax || self.ymin > self.ymax || self.zmin > self.zmax {
            Err(Error::InvertedBounds(*self))
        } else {
            Ok(())
        }
    }

    /// Number of cells in x
    pub fn extent_x(&self) -> usize {
        self.xmax - self.xmin + 1
    }

    /// Number of cells in y
    pub fn extent_y(&self) -> usize {
        self.ymax - self.ymin + 1
    }

    /// Number of cells in z
    pub fn extent_z(&self) -> usize {
        self.zmax - self.zmin + 1
    }

    /// Number of cells in one z layer
    pub fn layer_area(&self) -> usize {
        self.extent_x() * self.extent_y()
    }

    /// Total number of cells in the box
    pub fn number_of_cells(&self) -> usize {
        self.layer_area() * self.extent_z()
    }

    /// Single z layer of these bounds
    pub fn layer(&self, z: usize) -> Self {
        Self {
            zmin: z,
            zmax: z,
            ..*self
        }
    }

    /// Top z layer of these bounds
    pub fn top_layer(&self) -> Self {
        self.layer(self.zmax)
    }

    /// Whether `(z, x, y)` lies inside the box
    pub fn contains(&self, z: usize, x: usize, y: usize) -> bool {
        (self.zmin..=self.zmax).contains(&z)
            && (self.xmin..=self.xmax).contains(&x)
            && (self.ymin..=self.ymax).contains(&y)
    }

    /// Every `(z, x, y)` coordinate in the box
    ///
    /// z varies slowest and y fastest.
    ///
    /// ```rust
    /// # use grainkit_volume::Bounds;
    /// let bounds = Bounds::new(0, 1, 0, 1, 0, 0);
    /// let coordinates = bounds.coordinates().collect::<Vec<_>>();
    /// assert_eq!(coordinates, vec![(0, 0, 0), (0, 0, 1), (0, 1, 0), (0, 1, 1)]);
    /// ```
    pub fn coordinates(&self) -> impl Iterator<Item = (usize, usize, usize)> {
        let b = *self;
        (b.zmin..=b.zmax).flat_map(move |z| {
            (b.xmin..=b.xmax).flat_map(move |x| (b.ymin..=b.ymax).map(move |y| (z, x, y)))
        })
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "X {}-{}, Y {}-{}, Z {}-{}",
            self.xmin, self.xmax, self.ymin, self.ymax, self.zmin, self.zmax
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_bounds_are_rejected() {
        assert!(Bounds::new(0, 1, 0, 1, 0, 1).check().is_ok());
        assert!(matches!(
            Bounds::new(2, 1, 0, 1, 0, 1).check(),
            Err(Error::InvertedBounds(_))
        ));
        assert!(Bounds::new(0, 1, 0, 1, 5, 4).check().is_err());
    }

    #[test]
    fn coordinates_cover_every_cell_once() {
        let bounds = Bounds::new(1, 3, 2, 2, 4, 5);
        let coordinates = bounds.coordinates().collect::<Vec<_>>();
        assert_eq!(coordinates.len(), bounds.number_of_cells());
        assert_eq!(coordinates.first(), Some(&(4, 1, 2)));
        assert_eq!(coordinates.last(), Some(&(5, 3, 2)));
        assert!(coordinates.iter().all(|(z, x, y)| bounds.contains(*z, *x, *y)));
    }

    #[test]
    fn layers_keep_lateral_bounds() {
        let bounds = Bounds::new(1, 3, 2, 6, 4, 9);
        let top = bounds.top_layer();
        assert_eq!((top.zmin, top.zmax), (9, 9));
        assert_eq!(top.layer_area(), bounds.layer_area());
        assert_eq!(top.number_of_cells(), 15);
    }

    #[test]
    fn deserialise_from_json() {
        let json = r#"{"xmin": 0, "xmax": 9, "ymin": 0, "ymax": 9, "zmin": 1, "zmax": 3}"#;
        let bounds: Bounds = serde_json::from_str(json).unwrap();
        assert_eq!(bounds, Bounds::new(0, 9, 0, 9, 1, 3));
    }
}
