//! Radius search: validation, spatial request construction and result assembly.
//!
//! A request flows through [`RadiusParams::validate`], becomes a
//! [`SpatialRequest`] evaluated by the store, and is shaped into a
//! [`RadiusSearchResponse`] by [`RadiusSearch`].

pub mod distance;
mod query;
mod request;
mod service;

pub use distance::{DistanceMetric, DEFAULT_RADIUS_KM, MAX_RADIUS_KM, MIN_RADIUS_KM};
pub use query::{RadiusParams, RadiusQuery};
pub use request::SpatialRequest;
pub use service::{Center, QueryEcho, RadiusSearch, RadiusSearchResponse, MAX_RESULTS};
