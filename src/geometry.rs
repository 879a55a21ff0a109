use crate::error::{Error, Result};

use galileo_types::cartesian::{CartesianPoint2d, Point2};
use galileo_types::geo::{Crs, GeoPoint, NewGeoPoint, Projection};
use galileo_types::geo::impls::GeoPoint2d;
use geo::{unary_union, Area, GeodesicArea};
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use log::{debug, info};
use std::f64::consts::PI;

// Conversion between WGS84 lat/lon and Web Mercator meters
pub struct Projector {
    proj: Box<dyn Projection<InPoint = GeoPoint2d, OutPoint = Point2>>,
}

impl Projector {
    pub fn web_mercator() -> Result<Self> {
        let proj = Crs::EPSG3857
            .get_projection::<GeoPoint2d, Point2>()
            .ok_or(Error::ProjectionUnavailable("EPSG:3857"))?;

        Ok(Self {
            proj: proj,
        })
    }

    // Returns (x, y) in meters
    pub fn project(&self, lat: f64, lon: f64) -> Result<(f64, f64)> {
        let p = self.proj.project(&GeoPoint2d::latlon(lat, lon))
            .ok_or(Error::Projection { x: lon, y: lat })?;
        let (x, y) = (p.x(), p.y());

        if !x.is_finite() || !y.is_finite() {
            return Err(Error::Projection { x: lon, y: lat });
        }

        Ok((x, y))
    }

    // Returns (lat, lon) in degrees
    pub fn unproject(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let gp = self.proj.unproject(&Point2::new(x, y))
            .ok_or(Error::Projection { x: x, y: y })?;

        Ok((gp.lat(), gp.lon()))
    }

    // Back-project a planar ring to a ring with x = lon, y = lat
    fn unproject_ring(&self, ring: &LineString<f64>)
                      -> Result<LineString<f64>> {
        let coords = ring.coords()
            .map(|c| {
                let (lat, lon) = self.unproject(c.x, c.y)?;
                Ok(Coord { x: lon, y: lat })
            })
            .collect::<Result<Vec<Coord<f64>>>>()?;

        Ok(LineString::new(coords))
    }

    pub fn unproject_polygon(&self, polygon: &Polygon<f64>)
                             -> Result<Polygon<f64>> {
        let exterior = self.unproject_ring(polygon.exterior())?;
        let interiors = polygon.interiors().iter()
            .map(|r| self.unproject_ring(r))
            .collect::<Result<Vec<LineString<f64>>>>()?;

        Ok(Polygon::new(exterior, interiors))
    }
}

// Approximate the disk around center with a closed ring of `segments`
// vertices.
pub fn buffer_point(center: Coord<f64>, radius: f64, segments: usize)
                    -> Polygon<f64> {
    let n = segments.max(4);
    let r = radius.abs();

    let mut coords = Vec::with_capacity(n + 1);
    for i in 0..n {
        let angle = 2.0*PI*(i as f64)/(n as f64);
        coords.push(Coord {
            x: center.x + r*angle.cos(),
            y: center.y + r*angle.sin(),
        });
    }
    coords.push(coords[0]);

    Polygon::new(LineString::new(coords), vec![])
}

// Union of the circles around a set of points
#[derive(Clone, Debug)]
pub struct Coverage {
    // Union in Web Mercator meters
    pub planar: MultiPolygon<f64>,
    // Same union with x = lon, y = lat
    pub geographic: MultiPolygon<f64>,
    pub area_m2: f64,
    pub ground_area_m2: f64,
}

impl Coverage {
    pub fn area_km2(&self) -> f64 {
        self.area_m2/1e6
    }

    pub fn num_polygons(&self) -> usize {
        self.planar.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planar.0.is_empty()
    }
}

pub fn compute_coverage(lat_lon: &[(f64, f64)], radius: f64, segments: usize)
                        -> Result<Coverage> {
    let projector = Projector::web_mercator()?;

    let circles = lat_lon.iter()
        .map(|&(lat, lon)| {
            let (x, y) = projector.project(lat, lon)?;
            Ok(buffer_point(Coord { x: x, y: y }, radius, segments))
        })
        .collect::<Result<Vec<Polygon<f64>>>>()?;
    debug!("Buffered {} points with radius {}m", circles.len(), radius);

    let planar = if circles.is_empty() {
        MultiPolygon::new(vec![])
    }
    else {
        unary_union(&circles)
    };

    let area_m2 = planar.unsigned_area();

    let geographic = MultiPolygon::new(
        planar.0.iter()
            .map(|p| projector.unproject_polygon(p))
            .collect::<Result<Vec<Polygon<f64>>>>()?);

    let ground_area_m2 = geographic.geodesic_area_unsigned();

    info!("Union: {} polygon(s), planar area {:.0} m², ground area {:.0} m²",
          planar.0.len(), area_m2, ground_area_m2);

    Ok(Coverage {
        planar: planar,
        geographic: geographic,
        area_m2: area_m2,
        ground_area_m2: ground_area_m2,
    })
}
