use approx::assert_relative_eq;
use coverage::{App, Config, Error};
use std::f64::consts::PI;
use std::fs;

#[test]
fn table_input_produces_map_and_area() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("bus stops.csv");
    fs::write(&csv, "name\tlat\tlon\nA\t41.0\t29.0\nB\t41.0\t29.0\n").unwrap();

    let config = Config::from_args([
        "coverage",
        "--csv_path", csv.to_str().unwrap(),
        "--radius", "500",
        "--html_output_path", dir.path().join("out/map.html").to_str().unwrap(),
        "--no_browser",
    ]).unwrap();

    let report = App::new(&config).unwrap().compute().unwrap();

    assert_eq!(report.dataset.len(), 2);
    assert_eq!(report.coverage.num_polygons(), 1);
    assert_relative_eq!(report.coverage.area_m2, PI*500.0*500.0,
                        max_relative = 0.01);
    assert!(report.map_path.ends_with("out/map with 500 meter radius.html"));

    let html = fs::read_to_string(&report.map_path).unwrap();
    assert!(html.contains("Union of Circles"));
    assert!(html.contains("0.78 km²"));
}

#[test]
fn geojson_input_produces_map() {
    let dir = tempfile::tempdir().unwrap();
    let geojson = dir.path().join("stations.geojson");
    fs::write(&geojson, r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"name": "Aksaray"},
         "geometry": {"type": "Point", "coordinates": [28.95, 41.01]}},
        {"type": "Feature", "properties": {"name": "Kadikoy"},
         "geometry": {"type": "Point", "coordinates": [29.03, 40.99]}}
    ]}"#).unwrap();

    let config = Config::from_args([
        "coverage",
        "--geojson_path", geojson.to_str().unwrap(),
        "--html_output_path", dir.path().join("metro.html").to_str().unwrap(),
        "--no_browser",
    ]).unwrap();

    let report = App::new(&config).unwrap().compute().unwrap();

    // The stations are several kilometers apart
    assert_eq!(report.coverage.num_polygons(), 2);
    assert_relative_eq!(report.coverage.area_km2(), 2.0*PI,
                        max_relative = 0.01);
    assert!(report.map_path.exists());
}

#[test]
fn non_point_geojson_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let geojson = dir.path().join("lines.geojson");
    fs::write(&geojson, r#"{"type": "Feature", "properties": null,
        "geometry": {"type": "LineString",
                     "coordinates": [[28.9, 41.0], [29.0, 41.1]]}}"#).unwrap();

    let config = Config::from_args([
        "coverage",
        "--geojson_path", geojson.to_str().unwrap(),
        "--html_output_path", dir.path().join("lines.html").to_str().unwrap(),
        "--no_browser",
    ]).unwrap();
    let app = App::new(&config).unwrap();

    assert!(matches!(app.compute(), Err(Error::NotAPoint { .. })));
    assert!(!app.map_path().exists());
}

#[test]
fn both_or_no_inputs_are_rejected() {
    assert!(Config::from_args(["coverage"]).is_err());
    assert!(Config::from_args([
        "coverage", "--csv_path", "a.csv", "--geojson_path", "b.geojson",
    ]).is_err());
}
