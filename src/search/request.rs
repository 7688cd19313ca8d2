//! Translation of a validated radius query into a store-level request.

use geo::Point;
use rstar::AABB;
use rust_decimal::Decimal;

use super::distance::{DistanceMetric, EARTH_RADIUS_M};
use super::query::RadiusQuery;
use crate::models::{Category, PointRecord};

/// Envelope padding so that envelope tests never drop a true match
const ENVELOPE_MARGIN: f64 = 1.01;

/// A spatial predicate the store can evaluate.
#[derive(Debug, Clone)]
pub struct SpatialRequest {
    pub center: Point<f64>,
    pub radius_m: f64,
    pub category: Option<Category>,
    pub min_rating: Option<Decimal>,
    pub metric: DistanceMetric,
}

impl SpatialRequest {
    pub fn from_query(query: &RadiusQuery, metric: DistanceMetric) -> Self {
        Self {
            center: Point::new(query.lng, query.lat),
            radius_m: query.radius_km * 1000.0,
            category: query.category,
            min_rating: query.min_rating_decimal(),
            metric,
        }
    }

    /// Candidate lon/lat boxes for the R-tree.
    ///
    /// Split in two when the box crosses the antimeridian, widened to every
    /// longitude when it reaches a pole.
    pub fn envelopes(&self) -> Vec<AABB<[f64; 2]>> {
        let (lon, lat) = (self.center.x(), self.center.y());
        let delta = (self.radius_m * ENVELOPE_MARGIN / EARTH_RADIUS_M).to_degrees();

        let min_lat = lat - delta;
        let max_lat = lat + delta;
        if min_lat <= -90.0 || max_lat >= 90.0 {
            return vec![AABB::from_corners(
                [-180.0, min_lat.max(-90.0)],
                [180.0, max_lat.min(90.0)],
            )];
        }

        let ratio = delta.to_radians().sin() / lat.to_radians().cos();
        if ratio >= 1.0 {
            return vec![AABB::from_corners([-180.0, min_lat], [180.0, max_lat])];
        }
        let delta_lon = ratio.asin().to_degrees();

        let west = lon - delta_lon;
        let east = lon + delta_lon;
        if west < -180.0 {
            vec![
                AABB::from_corners([-180.0, min_lat], [east, max_lat]),
                AABB::from_corners([west + 360.0, min_lat], [180.0, max_lat]),
            ]
        } else if east > 180.0 {
            vec![
                AABB::from_corners([west, min_lat], [180.0, max_lat]),
                AABB::from_corners([-180.0, min_lat], [east - 360.0, max_lat]),
            ]
        } else {
            vec![AABB::from_corners([west, min_lat], [east, max_lat])]
        }
    }

    /// Distance in meters when the record satisfies every predicate
    pub fn matches(&self, record: &PointRecord) -> Option<f64> {
        if let Some(category) = self.category {
            if record.category != category {
                return None;
            }
        }

        if let Some(min) = self.min_rating {
            // Null ratings never satisfy a minimum
            match record.rating {
                Some(rating) if rating >= min => {}
                _ => return None,
            }
        }

        let distance = self
            .metric
            .distance_m(self.center, record.location.to_point());
        (distance <= self.radius_m).then_some(distance)
    }
}
