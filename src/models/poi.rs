//! Point of interest record and its wire representations.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use geo_types::Point;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed set of point-of-interest categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Restaurant,
    Hotel,
    Museum,
    Park,
    Shopping,
    Transport,
    Landmark,
    Entertainment,
    Healthcare,
    Education,
}

impl Category {
    /// All categories in declaration order
    pub fn all() -> &'static [Category] {
        &[
            Category::Restaurant,
            Category::Hotel,
            Category::Museum,
            Category::Park,
            Category::Shopping,
            Category::Transport,
            Category::Landmark,
            Category::Entertainment,
            Category::Healthcare,
            Category::Education,
        ]
    }

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Restaurant => "restaurant",
            Category::Hotel => "hotel",
            Category::Museum => "museum",
            Category::Park => "park",
            Category::Shopping => "shopping",
            Category::Transport => "transport",
            Category::Landmark => "landmark",
            Category::Entertainment => "entertainment",
            Category::Healthcare => "healthcare",
            Category::Education => "education",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Restaurant => "Restaurant",
            Category::Hotel => "Hotel",
            Category::Museum => "Museum",
            Category::Park => "Park",
            Category::Shopping => "Shopping",
            Category::Transport => "Transport",
            Category::Landmark => "Landmark",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Education => "Education",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::all()
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| format!("\"{}\" is not a valid choice.", s))
    }
}

/// A WGS84 (EPSG:4326) coordinate pair.
///
/// Always within range; serialized as `[longitude, latitude]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", try_from = "[f64; 2]")]
pub struct Coordinates {
    longitude: f64,
    latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, String> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err("Longitude must be between -180 and 180 degrees".to_string());
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err("Latitude must be between -90 and 90 degrees".to_string());
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Point with x = longitude, y = latitude
    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.longitude, c.latitude]
    }
}

impl TryFrom<[f64; 2]> for Coordinates {
    type Error = String;

    fn try_from([longitude, latitude]: [f64; 2]) -> Result<Self, Self::Error> {
        Coordinates::new(longitude, latitude)
    }
}

/// The stored point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: u64,
    pub name: String,
    pub category: Category,
    pub location: Coordinates,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    /// 0.00 to 5.00
    pub rating: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PointRecord {
    /// Serialized view without a query center
    pub fn to_view(&self) -> PoiView {
        self.to_view_with_distance(None)
    }

    pub fn to_view_with_distance(&self, distance_km: Option<f64>) -> PoiView {
        PoiView {
            id: self.id,
            name: self.name.clone(),
            category: self.category,
            description: self.description.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            website: self.website.clone(),
            rating: self.rating,
            coordinates: self.location,
            distance_km,
            created_at: self.created_at,
        }
    }
}

impl fmt::Display for PointRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.category)
    }
}

/// Per-record API output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiView {
    pub id: u64,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub rating: Option<Decimal>,
    pub coordinates: Coordinates,
    /// Null unless the view was produced by a radius search
    pub distance_km: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> PointRecord {
        let now = Utc::now();
        PointRecord {
            id: 7,
            name: "Test POI".to_string(),
            category: Category::Landmark,
            location: Coordinates::new(-73.9857, 40.7484).unwrap(),
            description: "Test description".to_string(),
            address: "Test Address".to_string(),
            phone: String::new(),
            website: String::new(),
            rating: Some(Decimal::new(45, 1)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_category_round_trip_and_labels() {
        assert_eq!(Category::all().len(), 10);
        for category in Category::all() {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), *category);
            assert_eq!(category.label().to_lowercase(), category.as_str());
        }
        assert!("cafe".parse::<Category>().is_err());
        assert!("Landmark".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_is_lowercase() {
        let json = serde_json::to_string(&Category::Entertainment).unwrap();
        assert_eq!(json, "\"entertainment\"");
    }

    #[test]
    fn test_coordinates_bounds() {
        assert!(Coordinates::new(180.0, 90.0).is_ok());
        assert!(Coordinates::new(-180.0, -90.0).is_ok());
        assert!(Coordinates::new(180.1, 0.0).is_err());
        assert!(Coordinates::new(0.0, -90.5).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_coordinates_keep_longitude_latitude_order() {
        let coords = Coordinates::new(-73.9857, 40.7484).unwrap();
        let json = serde_json::to_value(coords).unwrap();
        assert_eq!(json, serde_json::json!([-73.9857, 40.7484]));

        let point = coords.to_point();
        assert_eq!(point.x(), -73.9857);
        assert_eq!(point.y(), 40.7484);

        let bad: Result<Coordinates, _> = serde_json::from_str("[40.0, 100.0]");
        assert!(bad.is_err());
    }

    #[test]
    fn test_view_shape() {
        let record = sample_record();
        assert_eq!(record.to_string(), "Test POI (landmark)");

        let view = serde_json::to_value(record.to_view()).unwrap();
        assert_eq!(view["coordinates"], serde_json::json!([-73.9857, 40.7484]));
        assert_eq!(view["rating"], serde_json::json!(4.5));
        assert!(view["distance_km"].is_null());

        let with_distance = serde_json::to_value(record.to_view_with_distance(Some(1.25))).unwrap();
        assert_eq!(with_distance["distance_km"], serde_json::json!(1.25));
    }

    #[test]
    fn test_record_storage_round_trip() {
        let record = sample_record();
        let bytes = serde_json::to_vec(&record).unwrap();
        let back: PointRecord = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, record);
    }
}
