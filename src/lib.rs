mod app;
mod config;
mod error;
mod geometry;
mod map;
mod output;
mod points;

pub use crate::app::{App, Report};
pub use crate::config::{Config, CONFIG};
pub use crate::error::{Error, Result};
pub use crate::geometry::{buffer_point, compute_coverage, Coverage, Projector};
pub use crate::map::{map_center, render_map, MapDocument};
pub use crate::output::{area_summary, open_in_browser, output_path, write_map};
pub use crate::points::{load, read_geojson, read_table, Dataset, InputSource,
                        PointRecord};
