//! Execute every analysis enabled by an [AnalysisConfig]

// standard library
use std::fs::File;
use std::io::BufWriter;

// crate modules
use crate::config::{AnalysisConfig, SectionConfig, Thresholds};
use crate::descriptors::SizeSummary;
use crate::error::Result;
use crate::layers::{top_layer_grains, LayerAreas};
use crate::misorientation::CellMisorientations;
use crate::pole_figure::{Histogram, OrientationFormat};
use crate::report::{init_writer, write_column, QoiWriter, ReportPaths, SizeClass};
use crate::rve::{write_rve, RveSummary};
use crate::section::{write_ipf_map, BimodalSummary, Distribution, SectionAnalysis, UnimodalSummary};

// grainkit modules
use grainkit_orientation::{Axis, OrientationService};
use grainkit_utils::f;
use grainkit_volume::{Bounds, GrainVolume};

// external crates
use log::info;

/// Scalar results of a full analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Region analysed
    pub region: Bounds,
    /// Misorientation about z of every melted cell
    pub misorientation: CellMisorientations,
    /// Grain size and shape statistics
    pub size: SizeSummary,
    /// Grain areas of the evaluated layers, ascending in z
    pub layers: Vec<LayerAreas>,
    /// Orientation histogram of the region, if requested
    pub pole_figure: Option<Histogram>,
    /// Every configured cross-section, in order
    pub sections: Vec<SectionAnalysis>,
    /// Every extracted sub-volume, in order
    pub rves: Vec<RveSummary>,
}

impl RunSummary {
    /// Grain areas of the top layer of the region
    pub fn top_layer(&self) -> Option<&LayerAreas> {
        self.layers.last()
    }
}

/// Run every analysis enabled by `config`
///
/// The configuration is checked against the volume before anything is
/// written. Analyses then run in a fixed order: misorientation, grain size,
/// layer areas, pole figure, cross-sections and finally RVEs. Each one scans
/// the volume again from scratch.
///
/// ```rust, no_run
/// # use grainkit_analysis::{run, AnalysisConfig};
/// # use grainkit_orientation::OrientationTable;
/// # use grainkit_volume::{Dimensions, GrainVolume};
/// let table = OrientationTable::from_files(
///     "GrainOrientationVectors.csv",
///     "GrainOrientationEulerAnglesBungeZXZ.csv",
///     "GrainOrientationRGB_IPF-Z.csv",
/// ).unwrap();
/// let config = AnalysisConfig::from_json_file("analysis.json").unwrap();
/// let volume = GrainVolume::uniform(Dimensions::new(10, 10, 10), 1e-6, 1);
///
/// let summary = run(&config, &volume, &table).unwrap();
/// println!("{}", summary.size);
/// ```
pub fn run<S: OrientationService>(
    config: &AnalysisConfig,
    volume: &GrainVolume,
    service: &S,
) -> Result<RunSummary> {
    config.validate(volume)?;
    let region = config.region(volume);
    let paths = ReportPaths::new(&config.base_name);
    info!("Analysing {region} of {}", volume.dimensions());

    let misorientation = misorientation_data(config, &paths, volume, &region, service)?;
    let size = size_data(config, &paths, volume, &region)?;
    let layers = layer_data(config, &paths, volume, &region)?;

    let pole_figure = if config.reports.pole_figure {
        Some(pole_figure_data(config, &paths, volume, &region, service)?)
    } else {
        None
    };

    let sections = cross_section_data(config, &paths, volume, service)?;
    let rves = rve_data(config, &paths, volume)?;

    Ok(RunSummary {
        region,
        misorientation,
        size,
        layers,
        pole_figure,
        sections,
        rves,
    })
}

fn misorientation_data<S: OrientationService>(
    config: &AnalysisConfig,
    paths: &ReportPaths,
    volume: &GrainVolume,
    region: &Bounds,
    service: &S,
) -> Result<CellMisorientations> {
    let sampled = CellMisorientations::new(volume, region, service, Axis::Z)?;

    if config.reports.misorientation {
        let path = paths.misorientation();
        info!(
            "Writing misorientations relative to +Z of every melted cell to {}",
            path.display()
        );
        write_column(path, &sampled.angles)?;
    }

    info!(
        "Within the region of {} cells, {} underwent melting",
        region.number_of_cells(),
        sampled.melted_cells()
    );
    info!(
        "-- The mean misorientation relative to the +Z direction is {} degrees",
        sampled.mean()
    );
    info!(
        "-- The mean misorientation relative to the +Z direction at the region top (Z = {}) is {} degrees",
        region.zmax,
        sampled.mean_top()
    );
    Ok(sampled)
}

fn size_data(
    config: &AnalysisConfig,
    paths: &ReportPaths,
    volume: &GrainVolume,
    region: &Bounds,
) -> Result<SizeSummary> {
    let size = SizeSummary::new(volume, region);
    let length = volume.cell_length_microns();

    info!(
        "-- There are {} grains in this volume, and the mean grain volume is {} cubic microns",
        size.number_of_grains(),
        size.mean_volume() * volume.cell_volume_microns()
    );
    info!(
        "-- The volume fraction consisting of nucleated grains is {}",
        size.nucleated_fraction()
    );
    info!(
        "-- The mean grain aspect ratio (Z direction to transverse) is {}",
        size.mean_aspect_ratio()
    );
    info!(
        "-- The mean volume-weighted grain aspect ratio (Z direction to transverse) is {}",
        size.volume_weighted_aspect_ratio()
    );
    info!(
        "-- The mean grain height is {} microns",
        size.mean_height() * length
    );
    info!(
        "-- The mean grain width is {} microns",
        size.mean_width() * length
    );

    if config.reports.volume {
        let path = paths.volume();
        info!("Writing grain volumes (cubic microns) to {}", path.display());
        let scale = volume.cell_volume_microns();
        write_column(path, size.grains.iter().map(|g| g.volume as f64 * scale))?;
    }
    if config.reports.aspect_ratio {
        let path = paths.aspect_ratio();
        info!("Writing grain aspect ratios to {}", path.display());
        write_column(path, size.aspect_ratios())?;
    }
    if config.reports.grain_height {
        let path = paths.grain_height();
        info!("Writing grain heights (microns) to {}", path.display());
        write_column(path, size.heights().into_iter().map(|h| h * length))?;
    }
    Ok(size)
}

fn layer_data(
    config: &AnalysisConfig,
    paths: &ReportPaths,
    volume: &GrainVolume,
    region: &Bounds,
) -> Result<Vec<LayerAreas>> {
    let reports = &config.reports;
    let area = volume.cell_area_microns();

    // without either listing only the top layer is needed
    let zmin = if reports.grain_areas || reports.weighted_grain_areas {
        region.zmin
    } else {
        region.zmax
    };
    let layers = (zmin..=region.zmax)
        .map(|z| LayerAreas::new(volume, region, z))
        .collect::<Vec<LayerAreas>>();

    if reports.grain_areas {
        let path = paths.grain_areas();
        info!(
            "Writing mean grain areas (square microns) of every layer to {}",
            path.display()
        );
        write_column(path, layers.iter().map(|l| l.mean_area() * area))?;
    }
    if reports.weighted_grain_areas {
        let path = paths.weighted_grain_areas();
        info!(
            "Writing weighted grain areas (square microns) of every 5th layer and the top to {}",
            path.display()
        );
        write_column(
            path,
            layers
                .iter()
                .filter(|l| l.z % 5 == 0 || l.z == region.zmax)
                .map(|l| l.weighted_area() * area),
        )?;
    }

    if let Some(top) = layers.last() {
        info!(
            "Number of grains at the region top (Z = {}): {}",
            top.z, top.grains
        );
        info!(
            "-- The mean grain area at the region top is {} square microns",
            top.mean_area() * area
        );
        info!(
            "-- The mean weighted grain area at the region top is {} square microns",
            top.weighted_area() * area
        );
    }

    if reports.grain_widths {
        let length = volume.cell_length_microns();
        let grains = top_layer_grains(volume, region);
        for axis in [Axis::X, Axis::Y] {
            let path = paths.grain_widths(axis);
            info!(
                "Writing grain widths in {axis} (microns) at Z = {} to {}",
                region.zmax,
                path.display()
            );
            write_column(
                path,
                grains.iter().map(|g| match axis {
                    Axis::X => g.extent_x() as f64 * length,
                    _ => g.extent_y() as f64 * length,
                }),
            )?;
        }
    }
    Ok(layers)
}

fn pole_figure_data<S: OrientationService>(
    config: &AnalysisConfig,
    paths: &ReportPaths,
    volume: &GrainVolume,
    region: &Bounds,
    service: &S,
) -> Result<Histogram> {
    let histogram = Histogram::from_region(volume, region, service.number_of_orientations());
    let path = match config.format {
        OrientationFormat::Mtex => paths.pole_figure_region(region),
        OrientationFormat::Legacy => paths.orientation_counts(),
    };
    info!("Writing orientation histogram to {}", path.display());
    histogram.write(init_writer(path)?, service, config.format)?;
    Ok(histogram)
}

fn cross_section_data<S: OrientationService>(
    config: &AnalysisConfig,
    paths: &ReportPaths,
    volume: &GrainVolume,
    service: &S,
) -> Result<Vec<SectionAnalysis>> {
    if config.cross_sections.is_empty() {
        return Ok(Vec::new());
    }

    let mut qoi = QoiWriter::create(paths.qoi())?;
    let mut analyses = Vec::with_capacity(config.cross_sections.len());
    for sc in &config.cross_sections {
        qoi.line(&sc.label)?;
        let analysis = analyse_section(&mut qoi, sc, config, paths, volume, service)?;
        analyses.push(analysis);
    }
    qoi.finish()?;
    Ok(analyses)
}

fn analyse_section<S: OrientationService>(
    qoi: &mut QoiWriter<BufWriter<File>>,
    sc: &SectionConfig,
    config: &AnalysisConfig,
    paths: &ReportPaths,
    volume: &GrainVolume,
    service: &S,
) -> Result<SectionAnalysis> {
    let section = sc.cross_section()?;
    info!("Analysing cross-section {} ({section})", sc.plane);

    if sc.inverse_pole_figure {
        let path = paths.ipf_section(&sc.plane);
        info!("Writing inverse pole figure map to {}", path.display());
        write_ipf_map(init_writer(path)?, volume, &section, service, config.format)?;
    }
    if sc.pole_figure {
        let path = paths.pole_figure_section(&sc.plane);
        info!("Writing cross-section pole figure to {}", path.display());
        Histogram::from_section(volume, &section, service.number_of_orientations())
            .write_odf(init_writer(path)?, service)?;
    }

    let analysis = SectionAnalysis::new(volume, &section, sc.bimodal, &config.thresholds, service)?;
    info!(
        "The fraction of the cross-section that went unmelted (not assigned a grain) is {}",
        analysis.census.unmelted_fraction()
    );
    qoi.line(&f!(
        "The fraction of grains in this cross-section formed via nucleation events is {}",
        analysis.census.nucleated_fraction()
    ))?;
    info!(
        "The number of grains in this cross-section is {}",
        analysis.number_of_grains()
    );

    match &analysis.distribution {
        Distribution::Unimodal(unimodal) => {
            unimodal_report(qoi, unimodal, &sc.plane, paths, volume)?
        }
        Distribution::Bimodal(bimodal) => {
            bimodal_report(qoi, bimodal, &sc.plane, &config.thresholds, paths, volume)?
        }
    }
    Ok(analysis)
}

fn unimodal_report(
    qoi: &mut QoiWriter<BufWriter<File>>,
    summary: &UnimodalSummary,
    plane: &str,
    paths: &ReportPaths,
    volume: &GrainVolume,
) -> Result<()> {
    info!(
        "Area fraction of grains too small to include in statistics (< {} cells): {}",
        summary.min_cells,
        summary.fraction_too_small()
    );
    qoi.line(&f!(
        "Average grain area (in square microns): {}",
        summary.mean_area() * volume.cell_area_microns()
    ))?;
    write_column(paths.section_areas(plane), summary.area_fractions())
}

fn bimodal_report(
    qoi: &mut QoiWriter<BufWriter<File>>,
    summary: &BimodalSummary,
    plane: &str,
    thresholds: &Thresholds,
    paths: &ReportPaths,
    volume: &GrainVolume,
) -> Result<()> {
    let area = volume.cell_area_microns();
    let cutoff = thresholds.small_large_cutoff;

    info!(
        "Area fraction of grains too small to include in statistics (< {} cells): {}",
        summary.min_cells,
        summary.fraction_too_small()
    );
    qoi.line(&f!(
        "Area fraction of grains smaller than {cutoff} sq microns: {}",
        summary.fraction_small()
    ))?;
    info!(
        "Area fraction of grains greater than or equal to {cutoff} sq microns: {}",
        summary.fraction_large()
    );
    qoi.line(&f!(
        "Average area (in square microns) for small grains: {}",
        summary.mean_small_area() * area
    ))?;
    qoi.line(&f!(
        "Average area (in square microns) for large grains: {}",
        summary.mean_large_area() * area
    ))?;

    let classes = [
        (SizeClass::Small, &summary.small, summary.small_misorientation()),
        (SizeClass::Large, &summary.large, summary.large_misorientation()),
    ];

    for (class, grains, _) in &classes {
        write_column(
            paths.class_areas(plane, *class),
            grains.iter().map(|g| g.area as f64 * area),
        )?;
        // one row per cell so the listing is area weighted
        for axis in Axis::ALL {
            write_column(
                paths.class_misorientation(plane, axis, *class),
                grains
                    .iter()
                    .flat_map(|g| std::iter::repeat(g.angle(axis)).take(g.area)),
            )?;
        }
    }
    write_column(paths.green_blue(plane), &summary.green_blue)?;

    for (class, _, weighted) in &classes {
        let name = match class {
            SizeClass::Small => "small",
            SizeClass::Large => "large",
        };
        for axis in Axis::ALL {
            qoi.line(&f!(
                "Average misorientation for {name} grains relative to the {axis} direction: {}",
                weighted.mean(axis)
            ))?;
        }
    }
    qoi.line(&f!(
        "Average 101:111 ratio for large grains relative to the Z direction: {}",
        summary.mean_green_blue()
    ))?;
    Ok(())
}

fn rve_data(
    config: &AnalysisConfig,
    paths: &ReportPaths,
    volume: &GrainVolume,
) -> Result<Vec<RveSummary>> {
    let mut rves = Vec::with_capacity(config.rves.len());
    for (n, bounds) in config.rves.iter().enumerate() {
        let path = paths.rve(n);
        info!(
            "Writing RVE {} with {bounds} to {}",
            n + 1,
            path.display()
        );
        let rve = write_rve(init_writer(path)?, volume, bounds)?;
        info!(
            "The fraction of grains formed via nucleation events in this RVE is {}",
            rve.nucleated_fraction()
        );
        rves.push(rve);
    }
    Ok(rves)
}
