//! Representative volume element extraction

// standard library
use std::io::Write;

// crate modules
use crate::error::Result;

// grainkit modules
use grainkit_utils::{ratio, ValueExt};
use grainkit_volume::{is_nucleated, Bounds, GrainVolume};

// external crates
use log::debug;

/// Result of writing one representative volume element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RveSummary {
    /// Extracted sub-volume
    pub bounds: Bounds,
    /// Cells belonging to nucleated grains
    pub nucleated_cells: usize,
}

impl RveSummary {
    /// Fraction of the sub-volume belonging to nucleated grains
    pub fn nucleated_fraction(&self) -> f64 {
        ratio(self.nucleated_cells, self.bounds.number_of_cells())
    }
}

/// Write every cell of a sub-volume as a dense CSV listing
///
/// A free text line describing units, origin and extent comes first, then a
/// column header, then one `x,y,z,grain` row per cell with x varying fastest
/// and z slowest.
///
/// ```rust
/// # use grainkit_analysis::write_rve;
/// # use grainkit_volume::{Bounds, Dimensions, GrainVolume};
/// let volume = GrainVolume::uniform(Dimensions::new(3, 3, 3), 1e-6, -7);
/// let mut buffer = Vec::new();
///
/// let rve = write_rve(&mut buffer, &volume, &Bounds::new(1, 2, 0, 0, 0, 0)).unwrap();
/// assert_eq!(rve.nucleated_fraction(), 1.0);
///
/// let text = String::from_utf8(buffer).unwrap();
/// assert!(text.ends_with("X coord, Y coord, Z coord, Grain ID\n1,0,0,-7\n2,0,0,-7\n"));
/// ```
pub fn write_rve<W: Write>(mut writer: W, volume: &GrainVolume, bounds: &Bounds) -> Result<RveSummary> {
    volume.check_bounds(bounds)?;

    writeln!(
        writer,
        "Coordinates are in CA units, 1 cell = {} m. Data is cell-centered. Origin at {},{},{} , domain size is {} by {} by {} cells",
        volume.deltax().general(6),
        bounds.xmin,
        bounds.ymin,
        bounds.zmin,
        bounds.extent_x(),
        bounds.extent_y(),
        bounds.extent_z()
    )?;
    writeln!(writer, "X coord, Y coord, Z coord, Grain ID")?;

    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    let mut nucleated_cells = 0;
    for z in bounds.zmin..=bounds.zmax {
        for y in bounds.ymin..=bounds.ymax {
            for x in bounds.xmin..=bounds.xmax {
                let id = volume.grain_id(z, x, y);
                if is_nucleated(id) {
                    nucleated_cells += 1;
                }
                csv.serialize((x, y, z, id))?;
            }
        }
    }
    csv.flush()?;

    debug!("Wrote {} RVE cells for {bounds}", bounds.number_of_cells());
    Ok(RveSummary {
        bounds: *bounds,
        nucleated_cells,
    })
}
