//! Radius search execution and response assembly.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::distance::{round_km, DistanceMetric};
use super::query::RadiusQuery;
use super::request::SpatialRequest;
use crate::error::Result;
use crate::models::{Category, PoiView};
use crate::store::PoiStore;

/// Hard cap on records in one response
pub const MAX_RESULTS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lng: f64,
}

/// Echo of the query that produced a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEcho {
    pub center: Center,
    pub radius_km: f64,
    pub category: Option<Category>,
    pub min_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiusSearchResponse {
    /// Number of returned records, after truncation
    pub count: usize,
    pub query: QueryEcho,
    pub results: Vec<PoiView>,
}

/// Radius search over a point-of-interest store.
#[derive(Clone)]
pub struct RadiusSearch {
    store: Arc<PoiStore>,
    metric: DistanceMetric,
}

impl RadiusSearch {
    pub fn new(store: Arc<PoiStore>, metric: DistanceMetric) -> Self {
        Self { store, metric }
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Execute a validated query: nearest first, at most `MAX_RESULTS`
    pub fn execute(&self, query: &RadiusQuery) -> Result<RadiusSearchResponse> {
        let request = SpatialRequest::from_query(query, self.metric);
        let mut matches = self.store.query(&request)?;
        let total = matches.len();

        matches.sort_by(|a, b| {
            a.distance_m
                .total_cmp(&b.distance_m)
                .then_with(|| a.record.id.cmp(&b.record.id))
        });
        matches.truncate(MAX_RESULTS);

        debug!(
            "Radius search at ({}, {}) r={}km: {} matches, returning {}",
            query.lat,
            query.lng,
            query.radius_km,
            total,
            matches.len()
        );

        let results: Vec<PoiView> = matches
            .iter()
            .map(|m| m.record.to_view_with_distance(Some(round_km(m.distance_m))))
            .collect();

        Ok(RadiusSearchResponse {
            count: results.len(),
            query: QueryEcho {
                center: Center {
                    lat: query.lat,
                    lng: query.lng,
                },
                radius_km: query.radius_km,
                category: query.category,
                min_rating: query.min_rating,
            },
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, PoiDraft};

    /// Five NYC landmarks with known coordinates
    fn nyc_store() -> Arc<PoiStore> {
        let store = PoiStore::temporary().unwrap();
        let landmarks = [
            ("Times Square", Category::Landmark, -74.0060, 40.7580, 4.2),
            ("Central Park", Category::Park, -73.9654, 40.7829, 4.8),
            ("Empire State Building", Category::Landmark, -73.9857, 40.7484, 4.4),
            ("Brooklyn Bridge", Category::Landmark, -73.9969, 40.7061, 4.5),
            ("Metropolitan Museum", Category::Museum, -73.9632, 40.7794, 4.7),
        ];
        for (name, category, lng, lat, rating) in landmarks {
            let draft = PoiDraft::new(name, category, Coordinates::new(lng, lat).unwrap())
                .with_rating(rating);
            store.insert(draft).unwrap();
        }
        Arc::new(store)
    }

    fn names(response: &RadiusSearchResponse) -> Vec<&str> {
        response.results.iter().map(|r| r.name.as_str()).collect()
    }

    fn assert_sorted(response: &RadiusSearchResponse) {
        let distances: Vec<f64> = response
            .results
            .iter()
            .map(|r| r.distance_km.unwrap())
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]), "{distances:?}");
        assert_eq!(response.count, response.results.len());
    }

    #[test]
    fn test_five_km_around_times_square() {
        for metric in [DistanceMetric::WebMercator, DistanceMetric::Haversine] {
            let search = RadiusSearch::new(nyc_store(), metric);
            let response = search
                .execute(&RadiusQuery::new(40.7580, -74.0060, 5.0))
                .unwrap();

            assert!(response.count > 0);
            assert_eq!(response.results[0].name, "Times Square");
            assert_eq!(response.results[0].distance_km, Some(0.0));
            assert!(names(&response).contains(&"Empire State Building"));
            assert!(!names(&response).contains(&"Brooklyn Bridge"));
            for r in &response.results {
                assert!(r.distance_km.unwrap() <= 5.0);
            }
            assert_sorted(&response);
        }
    }

    #[test]
    fn test_projected_distance_is_reported() {
        let search = RadiusSearch::new(nyc_store(), DistanceMetric::WebMercator);
        let response = search
            .execute(&RadiusQuery::new(40.7580, -74.0060, 5.0))
            .unwrap();
        // Central Park is ~4.4 km away on the ground but ~5.8 km projected
        assert_eq!(names(&response), vec!["Times Square", "Empire State Building"]);
        assert_eq!(response.results[1].distance_km, Some(2.66));
    }

    #[test]
    fn test_forty_km_returns_everything() {
        let search = RadiusSearch::new(nyc_store(), DistanceMetric::default());
        let response = search
            .execute(&RadiusQuery::new(40.7580, -74.0060, 40.0))
            .unwrap();
        assert_eq!(response.count, 5);
        assert_sorted(&response);
        assert_eq!(response.results.last().unwrap().name, "Brooklyn Bridge");
    }

    #[test]
    fn test_category_filter() {
        let search = RadiusSearch::new(nyc_store(), DistanceMetric::default());
        let query = RadiusQuery::new(40.7580, -74.0060, 10.0).with_category(Category::Landmark);
        let response = search.execute(&query).unwrap();
        assert_eq!(response.count, 3);
        assert!(response
            .results
            .iter()
            .all(|r| r.category == Category::Landmark));
        assert_eq!(response.query.category, Some(Category::Landmark));
    }

    #[test]
    fn test_min_rating_filter_excludes_unrated() {
        let store = nyc_store();
        store
            .insert(PoiDraft::new(
                "Unrated Deli",
                Category::Restaurant,
                Coordinates::new(-74.0061, 40.7581).unwrap(),
            ))
            .unwrap();
        let search = RadiusSearch::new(store, DistanceMetric::default());

        let all = search
            .execute(&RadiusQuery::new(40.7580, -74.0060, 10.0))
            .unwrap();
        assert!(names(&all).contains(&"Unrated Deli"));

        let rated = search
            .execute(&RadiusQuery::new(40.7580, -74.0060, 10.0).with_min_rating(4.5))
            .unwrap();
        let mut got = names(&rated);
        got.sort();
        assert_eq!(got, vec!["Brooklyn Bridge", "Central Park", "Metropolitan Museum"]);
        for r in &rated.results {
            assert!(r.rating.unwrap() >= rust_decimal::Decimal::new(45, 1));
        }
        assert_eq!(rated.query.min_rating, Some(4.5));
    }

    #[test]
    fn test_min_rating_finer_than_stored_precision() {
        let store = PoiStore::temporary().unwrap();
        store
            .insert(
                PoiDraft::new("Deli", Category::Restaurant, Coordinates::new(0.0, 0.0).unwrap())
                    .with_rating(4.55),
            )
            .unwrap();
        let search = RadiusSearch::new(Arc::new(store), DistanceMetric::default());

        let above = search
            .execute(&RadiusQuery::new(0.0, 0.0, 1.0).with_min_rating(4.551))
            .unwrap();
        assert_eq!(above.count, 0);
        assert!(above.results.is_empty());

        let equal = search
            .execute(&RadiusQuery::new(0.0, 0.0, 1.0).with_min_rating(4.55))
            .unwrap();
        assert_eq!(names(&equal), vec!["Deli"]);
    }

    #[test]
    fn test_truncates_to_nearest_hundred() {
        let store = PoiStore::temporary().unwrap();
        for i in 0..150 {
            let lat = 10.0 + i as f64 * 0.0001;
            let draft = PoiDraft::new(
                format!("Stop {i}"),
                Category::Transport,
                Coordinates::new(20.0, lat).unwrap(),
            );
            store.insert(draft).unwrap();
        }
        let search = RadiusSearch::new(Arc::new(store), DistanceMetric::Haversine);
        let response = search.execute(&RadiusQuery::new(10.0, 20.0, 50.0)).unwrap();

        assert_eq!(response.count, MAX_RESULTS);
        assert_eq!(response.results.len(), MAX_RESULTS);
        assert_eq!(response.results[0].name, "Stop 0");
        assert_eq!(response.results[99].name, "Stop 99");
        assert_sorted(&response);
    }

    #[test]
    fn test_ties_break_by_id() {
        let store = PoiStore::temporary().unwrap();
        let spot = Coordinates::new(2.35, 48.85).unwrap();
        let first = store.insert(PoiDraft::new("A", Category::Hotel, spot)).unwrap();
        let second = store.insert(PoiDraft::new("B", Category::Hotel, spot)).unwrap();
        let search = RadiusSearch::new(Arc::new(store), DistanceMetric::default());
        let response = search.execute(&RadiusQuery::new(48.85, 2.35, 1.0)).unwrap();
        let ids: Vec<u64> = response.results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn test_empty_store() {
        let search = RadiusSearch::new(Arc::new(PoiStore::temporary().unwrap()), DistanceMetric::default());
        let response = search.execute(&RadiusQuery::new(0.0, 0.0, 100.0)).unwrap();
        assert_eq!(response.count, 0);
        assert!(response.results.is_empty());
        assert_eq!(response.query.center, Center { lat: 0.0, lng: 0.0 });
        assert_eq!(response.query.radius_km, 100.0);
    }
}
