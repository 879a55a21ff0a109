use crate::config::Config;
use crate::error::Result;
use crate::geometry::{compute_coverage, Coverage};
use crate::map::render_map;
use crate::output::{area_summary, open_in_browser, output_path, write_map};
use crate::points::{load, Dataset, InputSource};

use log::info;
use std::path::PathBuf;

// Result of a completed run
pub struct Report {
    pub dataset: Dataset,
    pub coverage: Coverage,
    pub map_path: PathBuf,
}

pub struct App {
    input: InputSource,
    delimiter: u8,
    radius: u32,
    segments: usize,
    zoom: u8,
    map_path: PathBuf,
    open_browser: bool,
}

impl App {
    // Validate the configuration. Nothing is read before this succeeds.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            input: config.input()?,
            delimiter: config.delimiter_byte()?,
            radius: config.radius,
            segments: config.segments,
            zoom: config.zoom,
            map_path: output_path(&config.output_base(), config.radius),
            open_browser: !config.no_browser,
        })
    }

    pub fn map_path(&self) -> &PathBuf {
        &self.map_path
    }

    // Load points, compute the union and store the map
    pub fn compute(&self) -> Result<Report> {
        let dataset = load(&self.input, self.delimiter)?;

        info!("Computing union of {} circles with radius {}m",
              dataset.len(), self.radius);
        let coverage = compute_coverage(&dataset.lat_lon(),
                                        self.radius as f64, self.segments)?;

        let doc = render_map(&dataset, &coverage, self.radius as f64,
                             self.zoom);
        write_map(&doc, &self.map_path)?;

        Ok(Report {
            dataset: dataset,
            coverage: coverage,
            map_path: self.map_path.clone(),
        })
    }

    pub fn run(&self) -> Result<Report> {
        let report = self.compute()?;

        if self.open_browser {
            open_in_browser(&report.map_path);
        }

        println!("{}", area_summary(report.coverage.area_m2));

        Ok(report)
    }
}
