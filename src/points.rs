use crate::error::{Error, Result};

use geojson::{Feature, GeoJson, Geometry, Value};
use log::{debug, info};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const LAT_COLUMN: &str = "lat";
pub const LON_COLUMN: &str = "lon";

#[derive(Clone, Debug, PartialEq)]
pub enum InputSource {
    Table(PathBuf),
    GeoJson(PathBuf),
}

impl fmt::Display for InputSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Table(p) => write!(formatter, "table {}", p.display()),
            InputSource::GeoJson(p) => {
                write!(formatter, "geojson {}", p.display())
            },
        }
    }
}

// A single input location with the attributes of the record it came from
#[derive(Clone, Debug, PartialEq)]
pub struct PointRecord {
    pub lat: f64,
    pub lon: f64,
    pub attributes: Vec<(String, String)>,
}

impl PointRecord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: lat,
            lon: lon,
            attributes: vec![],
        }
    }
}

impl fmt::Display for PointRecord {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}, {}", self.lat, self.lon)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub points: Vec<PointRecord>,
}

impl Dataset {
    pub fn from_points(points: Vec<PointRecord>) -> Self {
        Self {
            columns: vec![LAT_COLUMN.to_string(), LON_COLUMN.to_string()],
            points: points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn lat_lon(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.lat, p.lon)).collect()
    }
}

pub fn load(source: &InputSource, delimiter: u8) -> Result<Dataset> {
    info!("Reading {}", source);

    let dataset = match source {
        InputSource::Table(path) => read_table(path, delimiter)?,
        InputSource::GeoJson(path) => read_geojson(path)?,
    };

    info!("Loaded {} points", dataset.len());
    Ok(dataset)
}

fn parse_coordinate(record: usize, value: &str, limit: f64) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() <= limit => Ok(v),
        _ => Err(Error::InvalidCoordinate {
            record: record,
            value: value.to_string(),
        }),
    }
}

fn check_coordinate(record: usize, lat: f64, lon: f64) -> Result<()> {
    for (v, limit) in [(lat, 90.0), (lon, 180.0)] {
        if !v.is_finite() || v.abs() > limit {
            return Err(Error::InvalidCoordinate {
                record: record,
                value: v.to_string(),
            });
        }
    }

    Ok(())
}

// Read a delimited table with a header row. The table must have 'lat' and
// 'lon' columns; all other columns are kept as attributes.
pub fn read_table(path: &Path, delimiter: u8) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_path(path)?;

    let columns: Vec<String> = reader.headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    debug!("Table columns: {}", columns.join(", "));

    let lat_idx = columns.iter().position(|c| c == LAT_COLUMN)
        .ok_or(Error::MissingColumn(LAT_COLUMN))?;
    let lon_idx = columns.iter().position(|c| c == LON_COLUMN)
        .ok_or(Error::MissingColumn(LON_COLUMN))?;

    let mut points = vec![];

    for (i, row) in reader.records().enumerate() {
        let row = row?;
        // Record numbers are 1-based and count the header line
        let n = i + 2;
        let lat = parse_coordinate(n, row.get(lat_idx).unwrap_or(""), 90.0)?;
        let lon = parse_coordinate(n, row.get(lon_idx).unwrap_or(""), 180.0)?;

        let attributes = columns.iter()
            .zip(row.iter())
            .enumerate()
            .filter(|(j, _)| *j != lat_idx && *j != lon_idx)
            .map(|(_, (c, v))| (c.clone(), v.to_string()))
            .collect();

        points.push(PointRecord {
            lat: lat,
            lon: lon,
            attributes: attributes,
        });
    }

    Ok(Dataset {
        columns: columns,
        points: points,
    })
}

fn geometry_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn point_from_geometry(feature: usize, geometry: Option<&Geometry>)
                       -> Result<(f64, f64)> {
    let Some(geometry) = geometry else {
        return Err(Error::NotAPoint {
            feature: feature,
            kind: "no geometry".to_string(),
        });
    };

    match &geometry.value {
        Value::Point(pos) if pos.len() >= 2 => {
            // GeoJSON positions are (x, y) = (lon, lat)
            let (lat, lon) = (pos[1], pos[0]);
            check_coordinate(feature, lat, lon)?;
            Ok((lat, lon))
        },
        v => Err(Error::NotAPoint {
            feature: feature,
            kind: geometry_kind(v).to_string(),
        }),
    }
}

fn feature_attributes(feature: &Feature) -> Vec<(String, String)> {
    let Some(properties) = &feature.properties else {
        return vec![];
    };

    properties.iter()
        .map(|(k, v)| {
            let value = match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), value)
        })
        .collect()
}

// Read point features from a GeoJSON document. Any geometry other than a
// point is rejected.
pub fn read_geojson(path: &Path) -> Result<Dataset> {
    let data = fs::read_to_string(path)?;
    let geojson = data.parse::<GeoJson>()?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(g) => vec![Feature::from(g)],
    };

    let mut columns = vec![LAT_COLUMN.to_string(), LON_COLUMN.to_string()];
    let mut points = vec![];

    for (i, feature) in features.iter().enumerate() {
        let (lat, lon) = point_from_geometry(i, feature.geometry.as_ref())?;
        let attributes = feature_attributes(feature);

        for (k, _) in &attributes {
            if !columns.contains(k) {
                columns.push(k.clone());
            }
        }

        points.push(PointRecord {
            lat: lat,
            lon: lon,
            attributes: attributes,
        });
    }

    Ok(Dataset {
        columns: columns,
        points: points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::with_suffix(suffix).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn reads_tab_separated_table() {
        let f = temp_file(".csv",
                          "@id\tname\tlat\tlon\nnode/1\tTaksim\t41.0369\t28.9850\n\
                           node/2\tBesiktas\t41.0422\t29.0067\n");
        let ds = read_table(f.path(), b'\t').unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.lat_lon(), vec![(41.0369, 28.9850), (41.0422, 29.0067)]);
        assert_eq!(ds.columns, vec!["@id", "name", "lat", "lon"]);
        assert_eq!(ds.points[0].attributes, vec![
            ("@id".to_string(), "node/1".to_string()),
            ("name".to_string(), "Taksim".to_string()),
        ]);
    }

    #[test]
    fn reads_comma_separated_table() {
        let f = temp_file(".csv", "lon,lat\n10.5,59.9\n");
        let ds = read_table(f.path(), b',').unwrap();

        assert_eq!(ds.lat_lon(), vec![(59.9, 10.5)]);
    }

    #[test]
    fn table_without_lat_column_fails() {
        let f = temp_file(".csv", "latitude\tlon\n1.0\t2.0\n");

        assert!(matches!(read_table(f.path(), b'\t'),
                         Err(Error::MissingColumn("lat"))));
    }

    #[test]
    fn table_with_bad_coordinate_fails() {
        let f = temp_file(".csv", "lat\tlon\n1.0\t2.0\nabc\t3.0\n");

        match read_table(f.path(), b'\t') {
            Err(Error::InvalidCoordinate { record, value }) => {
                assert_eq!(record, 3);
                assert_eq!(value, "abc");
            },
            other => panic!("unexpected result {:?}", other),
        }

        let f = temp_file(".csv", "lat\tlon\n91.0\t2.0\n");
        assert!(read_table(f.path(), b'\t').is_err());
    }

    #[test]
    fn reads_point_features() {
        let f = temp_file(".geojson", r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature",
                 "properties": {"name": "Yenikapi", "line": 2},
                 "geometry": {"type": "Point", "coordinates": [28.95, 41.00]}},
                {"type": "Feature",
                 "properties": null,
                 "geometry": {"type": "Point", "coordinates": [29.01, 41.04]}}
            ]
        }"#);
        let ds = read_geojson(f.path()).unwrap();

        assert_eq!(ds.lat_lon(), vec![(41.00, 28.95), (41.04, 29.01)]);
        assert!(ds.points[0].attributes
                .contains(&("name".to_string(), "Yenikapi".to_string())));
        assert!(ds.points[0].attributes
                .contains(&("line".to_string(), "2".to_string())));
        assert!(ds.points[1].attributes.is_empty());
        assert!(ds.columns.contains(&"name".to_string()));
    }

    #[test]
    fn reads_bare_point_geometry() {
        let f = temp_file(".geojson",
                          r#"{"type": "Point", "coordinates": [5.0, 60.0]}"#);
        let ds = read_geojson(f.path()).unwrap();

        assert_eq!(ds.lat_lon(), vec![(60.0, 5.0)]);
    }

    #[test]
    fn non_point_geometry_fails() {
        let f = temp_file(".geojson", r#"{
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "LineString",
                         "coordinates": [[0.0, 0.0], [1.0, 1.0]]}
        }"#);

        match read_geojson(f.path()) {
            Err(Error::NotAPoint { feature, kind }) => {
                assert_eq!(feature, 0);
                assert_eq!(kind, "LineString");
            },
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn load_dispatches_on_source() {
        let f = temp_file(".csv", "lat;lon\n1.5;2.5\n");
        let ds = load(&InputSource::Table(f.path().to_path_buf()), b';')
            .unwrap();

        assert_eq!(ds.lat_lon(), vec![(1.5, 2.5)]);
    }
}
