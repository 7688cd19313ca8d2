//! Durable point-of-interest store with an in-memory spatial index.
//!
//! Records live in a sled tree as JSON keyed by big-endian id. On open the
//! whole tree is loaded into a [`SpatialIndex`]; afterwards every write goes
//! to sled and to the index while holding the index write lock, so a reader
//! sees each write either completely or not at all.

mod index;

use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use rust_decimal::Decimal;
use sled::{Db, Tree};
use tracing::{debug, info};

pub use index::{IndexedPoi, SpatialIndex};

use crate::error::{PoiError, Result};
use crate::models::{Category, CategoryCount, PoiDraft, PoiStats, PointRecord};
use crate::search::SpatialRequest;

const RECORDS_TREE: &str = "pois";

/// A record that satisfied a spatial request, with its distance to the center
#[derive(Debug, Clone)]
pub struct DistanceMatch {
    pub record: Arc<PointRecord>,
    pub distance_m: f64,
}

/// Result of a connectivity probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreProbe {
    pub stored: usize,
    pub indexed: usize,
    pub size_on_disk: u64,
}

pub struct PoiStore {
    db: Db,
    records: Tree,
    index: RwLock<SpatialIndex>,
}

impl PoiStore {
    /// Open (or create) a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Opening store at {}", path.as_ref().display());
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// A store that is deleted when dropped
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> Result<Self> {
        let records = db.open_tree(RECORDS_TREE)?;

        let mut loaded = Vec::with_capacity(records.len());
        for entry in records.iter() {
            let (key, value) = entry?;
            loaded.push(decode(&key, &value)?);
        }
        info!("Loaded {} records", loaded.len());

        Ok(Self {
            db,
            records,
            index: RwLock::new(SpatialIndex::build(loaded)),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, SpatialIndex>> {
        self.index
            .read()
            .map_err(|_| PoiError::Unavailable("spatial index lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, SpatialIndex>> {
        self.index
            .write()
            .map_err(|_| PoiError::Unavailable("spatial index lock poisoned".to_string()))
    }

    fn persist(&self, record: &PointRecord) -> Result<()> {
        let value = serde_json::to_vec(record).map_err(|source| PoiError::Corrupt {
            id: record.id,
            source,
        })?;
        self.records.insert(record.id.to_be_bytes(), value)?;
        Ok(())
    }

    /// Create a record from a validated draft
    pub fn insert(&self, draft: PoiDraft) -> Result<Arc<PointRecord>> {
        let mut index = self.write()?;
        let id = self.db.generate_id()? + 1;
        let now = Utc::now();
        let record = build_record(id, draft, now, now);

        self.persist(&record)?;
        debug!("Inserted {}", record);
        Ok(index.upsert(record))
    }

    /// Reuse a record with the same name and location, or create one.
    ///
    /// Returns the record and whether it was created.
    pub fn get_or_create(&self, draft: PoiDraft) -> Result<(Arc<PointRecord>, bool)> {
        let mut index = self.write()?;
        if let Some(existing) = index
            .iter()
            .find(|r| r.name == draft.name && r.location == draft.location)
        {
            return Ok((Arc::clone(existing), false));
        }

        let id = self.db.generate_id()? + 1;
        let now = Utc::now();
        let record = build_record(id, draft, now, now);
        self.persist(&record)?;
        Ok((index.upsert(record), true))
    }

    /// Replace every writable field of a record
    pub fn update(&self, id: u64, draft: PoiDraft) -> Result<Arc<PointRecord>> {
        let mut index = self.write()?;
        let created_at = index.get(id).ok_or(PoiError::NotFound(id))?.created_at;
        let record = build_record(id, draft, created_at, Utc::now());

        self.persist(&record)?;
        debug!("Updated {}", record);
        Ok(index.upsert(record))
    }

    pub fn delete(&self, id: u64) -> Result<()> {
        let mut index = self.write()?;
        if index.get(id).is_none() {
            return Err(PoiError::NotFound(id));
        }
        self.records.remove(id.to_be_bytes())?;
        index.remove(id);
        debug!("Deleted record {}", id);
        Ok(())
    }

    pub fn get(&self, id: u64) -> Result<Arc<PointRecord>> {
        self.read()?.get(id).cloned().ok_or(PoiError::NotFound(id))
    }

    /// Every record in id order
    pub fn list(&self) -> Result<Vec<Arc<PointRecord>>> {
        Ok(self.read()?.iter().cloned().collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// Remove every record
    pub fn clear(&self) -> Result<usize> {
        let mut index = self.write()?;
        let removed = index.len();
        self.records.clear()?;
        *index = SpatialIndex::default();
        info!("Cleared {} records", removed);
        Ok(removed)
    }

    /// Records satisfying the request, each with its distance in meters.
    ///
    /// Evaluated under a single read lock.
    pub fn query(&self, request: &SpatialRequest) -> Result<Vec<DistanceMatch>> {
        let envelopes = request.envelopes();
        let index = self.read()?;

        let matches = index
            .candidates(&envelopes)
            .filter_map(|record| {
                request.matches(record).map(|distance_m| DistanceMatch {
                    record: Arc::clone(record),
                    distance_m,
                })
            })
            .collect();
        Ok(matches)
    }

    /// Totals, average rating and per-category counts
    pub fn stats(&self) -> Result<PoiStats> {
        let index = self.read()?;

        let mut counts = vec![0usize; Category::all().len()];
        let mut rating_sum = Decimal::ZERO;
        let mut rated = 0u32;
        for record in index.iter() {
            if let Some(slot) = Category::all().iter().position(|c| *c == record.category) {
                counts[slot] += 1;
            }
            if let Some(rating) = record.rating {
                rating_sum += rating;
                rated += 1;
            }
        }

        let average_rating = (rated > 0).then(|| (rating_sum / Decimal::from(rated)).round_dp(2));

        let mut categories: Vec<CategoryCount> = Category::all()
            .iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(category, count)| CategoryCount {
                category: *category,
                count,
            })
            .collect();
        // Stable: equal counts keep declaration order
        categories.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(PoiStats {
            total_pois: index.len(),
            average_rating,
            categories,
        })
    }

    /// Check that storage answers and the spatial index agrees with it
    pub fn probe(&self) -> Result<StoreProbe> {
        let size_on_disk = self.db.size_on_disk()?;
        let stored = self.records.len();
        let index = self.read()?;
        let indexed = index.len();

        if indexed != stored || index.tree_size() != indexed {
            return Err(PoiError::Unavailable(format!(
                "spatial index out of sync: {} stored, {} indexed, {} in tree",
                stored,
                indexed,
                index.tree_size()
            )));
        }

        Ok(StoreProbe {
            stored,
            indexed,
            size_on_disk,
        })
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Drop a record from the spatial index while leaving it on disk
    #[cfg(test)]
    pub(crate) fn unindex(&self, id: u64) -> Result<()> {
        self.write()?.remove(id);
        Ok(())
    }
}

fn build_record(
    id: u64,
    draft: PoiDraft,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
) -> PointRecord {
    PointRecord {
        id,
        name: draft.name,
        category: draft.category,
        location: draft.location,
        description: draft.description,
        address: draft.address,
        phone: draft.phone,
        website: draft.website,
        rating: draft.rating,
        created_at,
        updated_at,
    }
}

fn decode(key: &[u8], value: &[u8]) -> Result<PointRecord> {
    let id = key
        .try_into()
        .map(u64::from_be_bytes)
        .unwrap_or_default();
    serde_json::from_slice(value).map_err(|source| PoiError::Corrupt { id, source })
}
