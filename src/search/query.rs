//! Radius search request validation.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::distance::DEFAULT_RADIUS_KM;
use crate::error::{FieldErrors, PoiError, Result};
use crate::models::Category;

/// Raw radius-search parameters as they arrive in the query string.
///
/// Everything is kept as text so that parse failures can be reported
/// against the field that caused them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RadiusParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius_km: Option<String>,
    pub category: Option<String>,
    pub min_rating: Option<String>,
}

/// Numeric bounds, checked after parsing
#[derive(Debug, Validate)]
struct RadiusBounds {
    #[validate(range(min = -90.0, max = 90.0, message = "Ensure this value is between -90 and 90."))]
    lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Ensure this value is between -180 and 180."))]
    lng: Option<f64>,
    #[validate(range(min = 0.1, max = 100.0, message = "Radius must be between 0.1 and 100 km."))]
    radius_km: Option<f64>,
    #[validate(range(min = 0.0, max = 5.0, message = "Ensure this value is between 0 and 5."))]
    min_rating: Option<f64>,
}

/// A validated radius search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadiusQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: f64,
    pub category: Option<Category>,
    pub min_rating: Option<f64>,
}

impl RadiusParams {
    pub fn validate(&self) -> Result<RadiusQuery> {
        let mut errors = FieldErrors::new();

        let lat = parse_number(&mut errors, "lat", self.lat.as_deref(), true);
        let lng = parse_number(&mut errors, "lng", self.lng.as_deref(), true);
        let radius_km = parse_number(&mut errors, "radius_km", self.radius_km.as_deref(), false);
        let min_rating = parse_number(&mut errors, "min_rating", self.min_rating.as_deref(), false);

        let bounds = RadiusBounds {
            lat,
            lng,
            radius_km,
            min_rating,
        };
        if let Err(e) = bounds.validate() {
            errors.extend_from(&e);
        }

        let category = match non_blank(self.category.as_deref()) {
            Some(raw) => match raw.parse::<Category>() {
                Ok(c) => Some(c),
                Err(e) => {
                    errors.add("category", e);
                    None
                }
            },
            None => None,
        };

        errors.into_result()?;
        let (Some(lat), Some(lng)) = (lat, lng) else {
            return Err(PoiError::Validation(FieldErrors::new()));
        };

        Ok(RadiusQuery {
            lat,
            lng,
            radius_km: radius_km.unwrap_or(DEFAULT_RADIUS_KM),
            category,
            min_rating,
        })
    }
}

impl RadiusQuery {
    pub fn new(lat: f64, lng: f64, radius_km: f64) -> Self {
        Self {
            lat,
            lng,
            radius_km,
            category: None,
            min_rating: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    /// Minimum rating at full precision.
    ///
    /// Not rounded to the stored two places: a minimum of 4.551 must still
    /// exclude a record rated 4.55.
    pub fn min_rating_decimal(&self) -> Option<Decimal> {
        self.min_rating.and_then(Decimal::from_f64)
    }

    /// Normalized cache key; equal queries produce equal keys
    pub fn cache_key(&self) -> String {
        format!(
            "radius:lat={}:lng={}:r={}:cat={}:min={}",
            self.lat,
            self.lng,
            self.radius_km,
            self.category.map(|c| c.as_str()).unwrap_or(""),
            self.min_rating.map(|m| m.to_string()).unwrap_or_default(),
        )
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_number(
    errors: &mut FieldErrors,
    field: &str,
    raw: Option<&str>,
    required: bool,
) -> Option<f64> {
    let Some(raw) = non_blank(raw) else {
        if required {
            errors.add(field, "This field is required.");
        }
        return None;
    };

    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            errors.add(field, "A valid number is required.");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(lat: &str, lng: &str, radius: Option<&str>) -> RadiusParams {
        RadiusParams {
            lat: Some(lat.to_string()),
            lng: Some(lng.to_string()),
            radius_km: radius.map(String::from),
            ..Default::default()
        }
    }

    fn errors_of(params: &RadiusParams) -> FieldErrors {
        match params.validate() {
            Err(PoiError::Validation(errors)) => errors,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_radius_to_ten_km() {
        let q = params("40.7580", "-74.0060", None).validate().unwrap();
        assert_eq!(q.radius_km, 10.0);
        assert_eq!(q.lat, 40.7580);
        assert_eq!(q.lng, -74.0060);
        assert!(q.category.is_none());
        assert!(q.min_rating.is_none());
    }

    #[test]
    fn test_latitude_out_of_range() {
        let errors = errors_of(&params("100", "-74.0060", Some("5")));
        assert!(errors.contains("lat"));
        assert!(!errors.contains("lng"));
    }

    #[test]
    fn test_longitude_out_of_range() {
        assert!(errors_of(&params("40", "-181", None)).contains("lng"));
    }

    #[test]
    fn test_radius_bound_is_one_hundred_km() {
        assert!(params("40", "-74", Some("100")).validate().is_ok());
        assert!(params("40", "-74", Some("0.1")).validate().is_ok());
        assert!(errors_of(&params("40", "-74", Some("100.1"))).contains("radius_km"));
        assert!(errors_of(&params("40", "-74", Some("1001"))).contains("radius_km"));
        assert!(errors_of(&params("40", "-74", Some("0.05"))).contains("radius_km"));
    }

    #[test]
    fn test_missing_and_malformed_numbers() {
        let errors = errors_of(&RadiusParams::default());
        assert_eq!(errors.get("lat"), ["This field is required.".to_string()]);
        assert!(errors.contains("lng"));

        let errors = errors_of(&params("abc", "NaN", Some("inf")));
        for field in ["lat", "lng", "radius_km"] {
            assert_eq!(errors.get(field), ["A valid number is required.".to_string()]);
        }
    }

    #[test]
    fn test_category_and_rating_filters() {
        let mut p = params("40", "-74", None);
        p.category = Some("museum".to_string());
        p.min_rating = Some("4.5".to_string());
        let q = p.validate().unwrap();
        assert_eq!(q.category, Some(Category::Museum));
        assert_eq!(q.min_rating, Some(4.5));
        assert_eq!(q.min_rating_decimal(), Some(Decimal::new(45, 1)));

        let precise = RadiusQuery::new(0.0, 0.0, 1.0).with_min_rating(4.551);
        assert!(precise.min_rating_decimal() > Some(Decimal::new(455, 2)));

        p.category = Some("spaceport".to_string());
        p.min_rating = Some("5.5".to_string());
        let errors = errors_of(&p);
        assert!(errors.contains("category"));
        assert!(errors.contains("min_rating"));
    }

    #[test]
    fn test_blank_optional_values_are_absent() {
        let mut p = params("40", "-74", Some(""));
        p.category = Some(String::new());
        let q = p.validate().unwrap();
        assert_eq!(q.radius_km, 10.0);
        assert!(q.category.is_none());
    }

    #[test]
    fn test_cache_key_is_normalized() {
        let a = params("40.75", "-74.0", Some("5")).validate().unwrap();
        let b = params(" 40.750 ", "-74", Some("5.0")).validate().unwrap();
        assert_eq!(a.cache_key(), b.cache_key());

        let c = a.clone().with_category(Category::Park);
        assert_ne!(a.cache_key(), c.cache_key());
    }
}
