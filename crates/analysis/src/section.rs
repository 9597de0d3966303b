//! Grain size distributions over 2D cross-sections

// standard library
use std::io::Write;

// crate modules
use crate::config::Thresholds;
use crate::error::{Error, Result};
use crate::grains::GrainAreas;
use crate::misorientation::{GrainMisorientation, WeightedMisorientation};
use crate::pole_figure::OrientationFormat;

// grainkit modules
use grainkit_orientation::OrientationService;
use grainkit_utils::{f, mean, ratio, ValueExt};
use grainkit_volume::{is_nucleated, orientation_index, CrossSection, GrainVolume, UNMELTED};

// external crates
use log::{debug, warn};

/// Cell counts of a cross-section and the grain ids found in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionCensus {
    /// The slice that was scanned
    pub section: CrossSection,
    /// Number of cells in the slice
    pub total_cells: usize,
    /// Cells never assigned a grain
    pub unmelted_cells: usize,
    /// Cells belonging to nucleated grains
    pub nucleated_cells: usize,
    /// Grain id of every assigned cell, in scan order
    pub grain_ids: Vec<i32>,
}

impl SectionCensus {
    /// Scan every cell of `section`
    pub fn new(volume: &GrainVolume, section: &CrossSection) -> Result<Self> {
        section.check(&volume.dimensions())?;

        let mut census = Self {
            section: *section,
            total_cells: section.number_of_cells(&volume.dimensions()),
            unmelted_cells: 0,
            nucleated_cells: 0,
            grain_ids: Vec::new(),
        };

        for c in section.cells(volume) {
            let id = c.cell.grain_id;
            if is_nucleated(id) {
                census.nucleated_cells += 1;
            }
            if c.cell.is_unassigned() {
                census.unmelted_cells += 1;
            } else {
                census.grain_ids.push(id);
            }
        }
        Ok(census)
    }

    /// Number of assigned cells
    pub fn melted_cells(&self) -> usize {
        self.grain_ids.len()
    }

    /// Fraction of the slice never assigned a grain
    pub fn unmelted_fraction(&self) -> f64 {
        ratio(self.unmelted_cells, self.total_cells)
    }

    /// Fraction of the slice belonging to nucleated grains
    pub fn nucleated_fraction(&self) -> f64 {
        ratio(self.nucleated_cells, self.total_cells)
    }

    /// Area of every grain in the slice
    pub fn grain_areas(&self) -> GrainAreas {
        GrainAreas::count(&self.grain_ids)
    }
}

/// Single population of grain areas
///
/// Grains below the minimum size are dropped, and every fraction is relative
/// to the total area of the grains provided.
#[derive(Debug, Clone, PartialEq)]
pub struct UnimodalSummary {
    /// Minimum area of a counted grain in cells
    pub min_cells: usize,
    /// Total area of every grain in cells
    pub total_area: usize,
    /// `(id, area)` of every grain at or above the minimum
    pub counted: Vec<(i32, usize)>,
}

impl UnimodalSummary {
    /// Drop grains smaller than `min_cells`
    pub fn new(areas: &GrainAreas, min_cells: usize) -> Self {
        let counted = areas
            .iter()
            .filter(|(_, area)| *area >= min_cells)
            .collect::<Vec<(i32, usize)>>();
        if counted.is_empty() {
            warn!("No grains of at least {min_cells} cells, unimodal statistics are undefined");
        }
        Self {
            min_cells,
            total_area: areas.total(),
            counted,
        }
    }

    /// Area of the counted grains in cells
    pub fn counted_area(&self) -> usize {
        self.counted.iter().map(|(_, a)| a).sum()
    }

    /// Fraction of the area in counted grains
    pub fn fraction_counted(&self) -> f64 {
        ratio(self.counted_area(), self.total_area)
    }

    /// Fraction of the area in grains too small to count
    pub fn fraction_too_small(&self) -> f64 {
        1.0 - self.fraction_counted()
    }

    /// Mean area of the counted grains in cells
    pub fn mean_area(&self) -> f64 {
        ratio(self.counted_area(), self.counted.len())
    }

    /// Area of every counted grain as a fraction of the counted area
    pub fn area_fractions(&self) -> Vec<f64> {
        let total = self.counted_area();
        self.counted.iter().map(|(_, a)| ratio(*a, total)).collect()
    }
}

/// Grain areas split into too small, small and large populations
///
/// Small grains are at least `min_cells`, large grains at least
/// `cutoff_cells`. Every counted grain carries its misorientation.
#[derive(Debug, Clone, PartialEq)]
pub struct BimodalSummary {
    /// Minimum area of a counted grain in cells
    pub min_cells: usize,
    /// Minimum area of a large grain in cells
    pub cutoff_cells: usize,
    /// Total area of every grain in cells
    pub total_area: usize,
    /// Area of the grains too small to count
    pub too_small_area: usize,
    /// Small grains, ascending by id
    pub small: Vec<GrainMisorientation>,
    /// Large grains, ascending by id
    pub large: Vec<GrainMisorientation>,
    /// Green to blue colour ratio `g / (g + b)` of every large grain
    pub green_blue: Vec<f64>,
}

impl BimodalSummary {
    /// Classify every grain by area
    ///
    /// Every grain needs a valid orientation, so an unassigned grain anywhere
    /// in `areas` is an error.
    pub fn new<S: OrientationService>(
        areas: &GrainAreas,
        min_cells: usize,
        cutoff_cells: usize,
        service: &S,
    ) -> Result<Self> {
        if let Some((_, area)) = areas.iter().find(|(id, _)| *id == UNMELTED) {
            return Err(Error::UnassignedGrain {
                context: f!("cross-section grain of {area} cells"),
            });
        }

        let mut summary = Self {
            min_cells,
            cutoff_cells,
            total_area: areas.total(),
            too_small_area: 0,
            small: Vec::new(),
            large: Vec::new(),
            green_blue: Vec::new(),
        };

        for (id, area) in areas.iter() {
            if area < min_cells {
                summary.too_small_area += area;
                continue;
            }
            let grain = GrainMisorientation::new(service, id, area)?;
            if area < cutoff_cells {
                summary.small.push(grain);
            } else {
                let [_, green, blue] = service.color(grain.orientation);
                summary.green_blue.push(green / (green + blue));
                summary.large.push(grain);
            }
        }

        debug!(
            "Classified {} small and {} large grains",
            summary.small.len(),
            summary.large.len()
        );
        if summary.large.is_empty() {
            warn!("No grains of at least {cutoff_cells} cells, large grain statistics are undefined");
        }
        Ok(summary)
    }

    /// Area of the small grains in cells
    pub fn small_area(&self) -> usize {
        self.small.iter().map(|g| g.area).sum()
    }

    /// Area of the large grains in cells
    pub fn large_area(&self) -> usize {
        self.large.iter().map(|g| g.area).sum()
    }

    /// Fraction of the area in grains too small to count
    pub fn fraction_too_small(&self) -> f64 {
        ratio(self.too_small_area, self.total_area)
    }

    /// Fraction of the area in small grains
    pub fn fraction_small(&self) -> f64 {
        ratio(self.small_area(), self.total_area)
    }

    /// Fraction of the area in large grains
    pub fn fraction_large(&self) -> f64 {
        ratio(self.large_area(), self.total_area)
    }

    /// Mean area of the small grains in cells
    pub fn mean_small_area(&self) -> f64 {
        ratio(self.small_area(), self.small.len())
    }

    /// Mean area of the large grains in cells
    pub fn mean_large_area(&self) -> f64 {
        ratio(self.large_area(), self.large.len())
    }

    /// Area weighted misorientation of the small grains
    pub fn small_misorientation(&self) -> WeightedMisorientation {
        self.small.iter().collect()
    }

    /// Area weighted misorientation of the large grains
    pub fn large_misorientation(&self) -> WeightedMisorientation {
        self.large.iter().collect()
    }

    /// Mean green to blue ratio of the large grains
    pub fn mean_green_blue(&self) -> f64 {
        mean(&self.green_blue)
    }
}

/// Outcome of the size classification of a cross-section
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    /// Single population
    Unimodal(UnimodalSummary),
    /// Small and large populations
    Bimodal(BimodalSummary),
}

/// Full analysis of one cross-section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionAnalysis {
    /// Cell counts of the slice
    pub census: SectionCensus,
    /// Area of every grain in the slice
    pub areas: GrainAreas,
    /// Size classification of the grains
    pub distribution: Distribution,
}

impl SectionAnalysis {
    /// Scan `section` and classify its grains
    ///
    /// Unassigned cells are excluded before grain areas are counted.
    ///
    /// ```rust
    /// # use grainkit_analysis::{Distribution, SectionAnalysis, Thresholds};
    /// # use grainkit_orientation::OrientationTable;
    /// # use grainkit_volume::{CrossSection, Dimensions, GrainVolume, Plane};
    /// let table = OrientationTable::new(
    ///     vec![[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]],
    ///     vec![[0.0; 3]],
    ///     vec![[1.0, 0.0, 0.0]],
    /// ).unwrap();
    /// let volume = GrainVolume::uniform(Dimensions::new(10, 10, 2), 1e-6, 4);
    /// let section = CrossSection::new(Plane::XY, 1);
    ///
    /// let analysis = SectionAnalysis::new(&volume, &section, false, &Thresholds::default(), &table).unwrap();
    /// let Distribution::Unimodal(unimodal) = analysis.distribution else { panic!() };
    /// assert_eq!(unimodal.mean_area(), 100.0);
    /// assert_eq!(unimodal.fraction_too_small(), 0.0);
    /// ```
    pub fn new<S: OrientationService>(
        volume: &GrainVolume,
        section: &CrossSection,
        bimodal: bool,
        thresholds: &Thresholds,
        service: &S,
    ) -> Result<Self> {
        let census = SectionCensus::new(volume, section)?;
        let areas = census.grain_areas();
        let min_cells = thresholds.min_cells(volume);

        let distribution = if bimodal {
            let cutoff_cells = thresholds.cutoff_cells(volume);
            Distribution::Bimodal(BimodalSummary::new(&areas, min_cells, cutoff_cells, service)?)
        } else {
            Distribution::Unimodal(UnimodalSummary::new(&areas, min_cells))
        };

        Ok(Self {
            census,
            areas,
            distribution,
        })
    }

    /// Number of grains in the slice
    pub fn number_of_grains(&self) -> usize {
        self.areas.len()
    }
}

/// Write an inverse pole figure map of a cross-section
///
/// Positions are in microns along the two in-plane axes. In the MTEX format
/// each row is `phi1 Phi phi2 phase x y`, with unassigned cells written as
/// phase 0. The legacy format is `x,y,orientation`, with `-1` for unassigned
/// cells.
pub fn write_ipf_map<W: Write, S: OrientationService>(
    mut writer: W,
    volume: &GrainVolume,
    section: &CrossSection,
    service: &S,
    format: OrientationFormat,
) -> Result<()> {
    section.check(&volume.dimensions())?;
    let n = service.number_of_orientations();
    let scale = volume.cell_length_microns();

    for c in section.cells(volume) {
        let x = c.index1 as f64 * scale;
        let y = c.index2 as f64 * scale;
        let orientation = orientation_index(c.cell.grain_id, n);
        match (format, orientation) {
            (OrientationFormat::Mtex, Some(o)) => {
                let [phi1, phi, phi2] = service.euler_angles(o);
                writeln!(
                    writer,
                    "{} {} {} 1 {} {}",
                    phi1.fixed(6),
                    phi.fixed(6),
                    phi2.fixed(6),
                    x.fixed(6),
                    y.fixed(6)
                )?;
            }
            (OrientationFormat::Mtex, None) => {
                writeln!(writer, "0 0 0 0 {} {}", x.fixed(6), y.fixed(6))?
            }
            (OrientationFormat::Legacy, Some(o)) => {
                writeln!(writer, "{},{},{o}", x.fixed(6), y.fixed(6))?
            }
            (OrientationFormat::Legacy, None) => {
                writeln!(writer, "{},{},-1", x.fixed(6), y.fixed(6))?
            }
        }
    }
    writer.flush()?;
    Ok(())
}
