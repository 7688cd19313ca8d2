//! Aggregate views over the whole collection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Category;

/// `{value, label}` pair for the category listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub value: Category,
    pub label: String,
}

impl From<Category> for CategoryOption {
    fn from(category: Category) -> Self {
        Self {
            value: category,
            label: category.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiStats {
    pub total_pois: usize,
    /// Mean of the non-null ratings, two decimals
    #[serde(with = "rust_decimal::serde::float_option")]
    pub average_rating: Option<Decimal>,
    /// Most populated first
    pub categories: Vec<CategoryCount>,
}
