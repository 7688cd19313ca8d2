//! Writable fields of a point of interest, raw and validated.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Category, Coordinates};
use crate::error::{FieldErrors, PoiError, Result};

/// Create/update body as received over HTTP or read from CSV.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PoiPayload {
    #[validate(length(min = 1, max = 255, message = "Ensure this field has 1 to 255 characters."))]
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500, message = "Ensure this field has no more than 500 characters."))]
    pub address: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20, message = "Ensure this field has no more than 20 characters."))]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(url(message = "Enter a valid URL."))]
    pub website: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0, message = "Ensure this value is between 0 and 5."))]
    pub rating: Option<f64>,
    /// `[longitude, latitude]`
    pub coordinates: Vec<f64>,
}

/// Validated, typed fields ready to be written to the store
#[derive(Debug, Clone, PartialEq)]
pub struct PoiDraft {
    pub name: String,
    pub category: Category,
    pub location: Coordinates,
    pub description: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub rating: Option<Decimal>,
}

impl PoiDraft {
    /// Draft with only the required fields set
    pub fn new(name: impl Into<String>, category: Category, location: Coordinates) -> Self {
        Self {
            name: name.into(),
            category,
            location,
            description: String::new(),
            address: String::new(),
            phone: String::new(),
            website: String::new(),
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating_to_decimal(rating);
        self
    }
}

/// Round a rating to its stored two-decimal precision
pub fn rating_to_decimal(rating: f64) -> Option<Decimal> {
    Decimal::from_f64(rating).map(|d| d.round_dp(2))
}

impl PoiPayload {
    /// Validate every field, reporting all failures at once
    pub fn into_draft(mut self) -> Result<PoiDraft> {
        // Blank optional text is equivalent to absent
        for field in [
            &mut self.description,
            &mut self.address,
            &mut self.phone,
            &mut self.website,
        ] {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }

        let mut errors = FieldErrors::new();
        if let Err(e) = self.validate() {
            errors.extend_from(&e);
        }
        if self.name.trim().is_empty() && !errors.contains("name") {
            errors.add("name", "This field may not be blank.");
        }

        let category = match self.category.parse::<Category>() {
            Ok(c) => Some(c),
            Err(e) => {
                errors.add("category", e);
                None
            }
        };

        let location = match self.coordinates.as_slice() {
            [lng, lat] => match Coordinates::new(*lng, *lat) {
                Ok(c) => Some(c),
                Err(e) => {
                    errors.add("coordinates", e);
                    None
                }
            },
            _ => {
                errors.add(
                    "coordinates",
                    "Coordinates must be [longitude, latitude] (exactly 2 numbers).",
                );
                None
            }
        };

        let rating = match self.rating {
            Some(r) if r.is_finite() => rating_to_decimal(r),
            Some(_) => {
                errors.add("rating", "A valid number is required.");
                None
            }
            None => None,
        };

        errors.into_result()?;
        let (Some(category), Some(location)) = (category, location) else {
            return Err(PoiError::Validation(FieldErrors::new()));
        };

        Ok(PoiDraft {
            name: self.name.trim().to_string(),
            category,
            location,
            description: self.description.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            website: self.website.unwrap_or_default(),
            rating,
        })
    }
}
