use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("You should specify one of these: --csv_path or --geojson_path")]
    MissingInput,

    #[error("Only one of --csv_path and --geojson_path can be given")]
    ConflictingInput,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing column '{0}' in input table")]
    MissingColumn(&'static str),

    #[error("Invalid coordinate '{value}' in record {record}")]
    InvalidCoordinate { record: usize, value: String },

    #[error("Feature {feature} is not a point ({kind})")]
    NotAPoint { feature: usize, kind: String },

    #[error("Unable to project point ({x}, {y}) between EPSG:4326 and EPSG:3857")]
    Projection { x: f64, y: f64 },

    #[error("Projection {0} is not available")]
    ProjectionUnavailable(&'static str),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
