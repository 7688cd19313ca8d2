//! Distance semantics for radius search.

use geo::{Distance, Euclidean, Haversine, Point};
use serde::{Deserialize, Serialize};

/// Smallest accepted search radius
pub const MIN_RADIUS_KM: f64 = 0.1;
/// Largest accepted search radius
pub const MAX_RADIUS_KM: f64 = 100.0;
/// Radius used when the request does not name one
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Mean earth radius used to size candidate envelopes (meters)
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Sphere radius of EPSG:3857 (meters)
const MERCATOR_RADIUS_M: f64 = 6_378_137.0;
/// Latitude limit of EPSG:3857
const MERCATOR_MAX_LAT: f64 = 85.051_128_78;

/// How the distance between a record and the query center is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Planar distance after projecting both points to Web Mercator.
    ///
    /// Latitudes beyond ±85.05112878° are clamped to the projection limit,
    /// so points poleward of it project onto the same y and their
    /// north-south separation reads as zero. Distances there are
    /// understated. Candidates are still gathered from envelopes sized by
    /// spherical distance, which keeps far-off polar records out of a
    /// search.
    #[default]
    WebMercator,
    /// Great-circle distance on the mean sphere
    Haversine,
}

impl DistanceMetric {
    /// Distance in meters between two lon/lat points
    pub fn distance_m(&self, a: Point<f64>, b: Point<f64>) -> f64 {
        match self {
            DistanceMetric::WebMercator => Euclidean.distance(to_web_mercator(a), to_web_mercator(b)),
            DistanceMetric::Haversine => Haversine.distance(a, b),
        }
    }
}

/// Project a lon/lat point to EPSG:3857 meters
pub fn to_web_mercator(p: Point<f64>) -> Point<f64> {
    let lat = p.y().clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT);
    let x = MERCATOR_RADIUS_M * p.x().to_radians();
    let y = MERCATOR_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    Point::new(x, y)
}

/// Meters to kilometers, rounded to two decimals
pub fn round_km(meters: f64) -> f64 {
    (meters / 10.0).round() / 100.0
}
