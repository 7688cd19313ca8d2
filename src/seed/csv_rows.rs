//! CSV import of point-of-interest rows.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use poi_locator::models::PoiPayload;
use poi_locator::PoiStore;

/// One CSV line; every column is optional text
#[derive(Debug, Deserialize)]
pub struct CsvRow {
    name: Option<String>,
    category: Option<String>,
    longitude: Option<String>,
    latitude: Option<String>,
    description: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    website: Option<String>,
    rating: Option<String>,
}

impl CsvRow {
    /// Convert to the create payload, parsing the numeric columns
    pub fn into_payload(self) -> Result<PoiPayload, String> {
        let number = |column: &str, raw: Option<&str>| -> Result<Option<f64>, String> {
            match raw.map(str::trim).filter(|s| !s.is_empty()) {
                Some(s) => s
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| format!("{}: \"{}\" is not a number", column, s)),
                None => Ok(None),
            }
        };

        let longitude = number("longitude", self.longitude.as_deref())?.unwrap_or(0.0);
        let latitude = number("latitude", self.latitude.as_deref())?.unwrap_or(0.0);
        let rating = number("rating", self.rating.as_deref())?;

        Ok(PoiPayload {
            name: self.name.unwrap_or_else(|| "Unknown".to_string()),
            category: self.category.unwrap_or_else(|| "landmark".to_string()),
            description: self.description,
            address: self.address,
            phone: self.phone,
            website: self.website,
            rating,
            coordinates: vec![longitude, latitude],
        })
    }
}

/// Load every valid row, skipping invalid ones; returns the number created
pub fn load_csv(store: &PoiStore, path: &Path) -> Result<usize> {
    info!("Loading points of interest from {}", path.display());

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut created = 0;
    for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
        let draft = row
            .map_err(|e| e.to_string())
            .and_then(CsvRow::into_payload)
            .and_then(|payload| payload.into_draft().map_err(|e| e.to_string()));

        match draft {
            Ok(draft) => {
                let (_, was_created) = store.get_or_create(draft)?;
                if was_created {
                    created += 1;
                }
            }
            Err(e) => warn!("Skipping row {}: {}", line + 1, e),
        }
    }

    info!("Loaded {} points of interest from CSV", created);
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\
name,category,longitude,latitude,description,address,phone,website,rating
Times Square,landmark,-74.0060,40.7580,Crossroads,Manhattan,,,4.2
Bad Category,spaceport,-74.0,40.7,,,,,
Bad Latitude,park,-74.0,95.0,,,,,
Not A Number,park,east,40.7,,,,,
Unrated Deli,restaurant,-73.99,40.75,,,,,
";

    #[test]
    fn test_load_skips_invalid_rows_and_reuses_existing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let store = PoiStore::temporary().unwrap();
        assert_eq!(load_csv(&store, file.path()).unwrap(), 2);

        let records = store.list().unwrap();
        assert_eq!(records.len(), 2);
        let deli = records.iter().find(|r| r.name == "Unrated Deli").unwrap();
        assert_eq!(deli.rating, None);
        assert_eq!(deli.location.longitude(), -73.99);

        assert_eq!(load_csv(&store, file.path()).unwrap(), 0);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_missing_file() {
        let store = PoiStore::temporary().unwrap();
        assert!(load_csv(&store, Path::new("/nonexistent/pois.csv")).is_err());
    }
}
