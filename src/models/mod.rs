//! Core data models for the point of interest service.

pub mod payload;
pub mod poi;
pub mod stats;

pub use payload::{rating_to_decimal, PoiDraft, PoiPayload};
pub use poi::{Category, Coordinates, PoiView, PointRecord};
pub use stats::{CategoryCount, CategoryOption, PoiStats};
