//! HTTP surface: the point-of-interest REST routes and health probes.

mod error;
mod handlers;
mod health;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

use crate::cache::QueryCache;
use crate::config::Config;
use crate::error::{PoiError, Result};
use crate::models::PoiView;
use crate::search::{DistanceMetric, RadiusSearch, RadiusSearchResponse};
use crate::store::PoiStore;

/// Application state shared across handlers
pub struct AppState {
    pub store: Arc<PoiStore>,
    pub search: RadiusSearch,
    pub radius_cache: Option<QueryCache<RadiusSearchResponse>>,
    pub list_cache: Option<QueryCache<Vec<PoiView>>>,
    pub query_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<PoiStore>, config: &Config) -> Self {
        let cache = &config.cache;
        let (radius_cache, list_cache) = if cache.enabled {
            (
                Some(QueryCache::new("radius", cache.radius_ttl(), cache.max_entries)),
                Some(QueryCache::new("list", cache.list_ttl(), cache.max_entries)),
            )
        } else {
            (None, None)
        };

        Self {
            search: RadiusSearch::new(Arc::clone(&store), config.search.metric),
            store,
            radius_cache,
            list_cache,
            query_timeout: config.server.query_timeout(),
        }
    }

    /// State with caching disabled
    pub fn uncached(store: Arc<PoiStore>, metric: DistanceMetric, query_timeout: Duration) -> Self {
        Self {
            search: RadiusSearch::new(Arc::clone(&store), metric),
            store,
            radius_cache: None,
            list_cache: None,
            query_timeout,
        }
    }

    /// Run a store call off the async runtime, bounded by the query timeout
    pub(crate) async fn blocking<T, F>(&self, f: F) -> std::result::Result<T, ApiError>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let task = tokio::task::spawn_blocking(f);
        match tokio::time::timeout(self.query_timeout, task).await {
            Ok(joined) => Ok(joined??),
            Err(_) => Err(PoiError::Timeout(self.query_timeout).into()),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/pois/",
            get(handlers::list_pois).post(handlers::create_poi),
        )
        .route("/pois/pois/", get(handlers::radius_search))
        .route("/pois/categories/", get(handlers::categories))
        .route("/pois/stats/", get(handlers::stats))
        .route(
            "/pois/{id}/",
            get(handlers::retrieve_poi)
                .put(handlers::update_poi)
                .delete(handlers::delete_poi),
        )
        .route("/health/", get(health::health))
        .route("/health/ready/", get(health::ready))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
