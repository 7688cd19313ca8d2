//! poi-locator - points of interest with radius search
//!
//! This library provides shared types and modules for the server and seed binaries.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod store;

pub use error::{PoiError, Result};
pub use models::{Category, Coordinates, PointRecord};
pub use search::{DistanceMetric, RadiusQuery, RadiusSearch};
pub use store::PoiStore;
