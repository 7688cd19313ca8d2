//! Spatial index for fast radius lookups.

use std::collections::BTreeMap;
use std::sync::Arc;

use rstar::{RTree, RTreeObject, AABB};
use tracing::info;

use crate::models::PointRecord;

/// Wrapper for R-tree indexing of point records
#[derive(Clone, Debug)]
pub struct IndexedPoi {
    pub record: Arc<PointRecord>,
    position: [f64; 2],
}

impl RTreeObject for IndexedPoi {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PartialEq for IndexedPoi {
    fn eq(&self, other: &Self) -> bool {
        self.record.id == other.record.id && self.position == other.position
    }
}

impl IndexedPoi {
    pub fn new(record: Arc<PointRecord>) -> Self {
        let position = [record.location.longitude(), record.location.latitude()];
        Self { record, position }
    }
}

/// In-memory view of every record: an R-tree on `[lon, lat]` plus an id map.
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<IndexedPoi>,
    records: BTreeMap<u64, IndexedPoi>,
}

impl SpatialIndex {
    /// Build spatial index from stored records
    pub fn build(records: Vec<PointRecord>) -> Self {
        info!("Building spatial index for {} records...", records.len());

        let indexed: Vec<IndexedPoi> = records
            .into_iter()
            .map(|r| IndexedPoi::new(Arc::new(r)))
            .collect();

        let records = indexed
            .iter()
            .map(|ip| (ip.record.id, ip.clone()))
            .collect();
        let tree = RTree::bulk_load(indexed);

        info!("Spatial index built with {} entries", tree.size());

        Self { tree, records }
    }

    /// Insert a record, replacing any previous version with the same id
    pub fn upsert(&mut self, record: PointRecord) -> Arc<PointRecord> {
        self.remove(record.id);
        let entry = IndexedPoi::new(Arc::new(record));
        let record = Arc::clone(&entry.record);
        self.tree.insert(entry.clone());
        self.records.insert(record.id, entry);
        record
    }

    pub fn remove(&mut self, id: u64) -> Option<Arc<PointRecord>> {
        let entry = self.records.remove(&id)?;
        self.tree.remove(&entry);
        Some(entry.record)
    }

    pub fn get(&self, id: u64) -> Option<&Arc<PointRecord>> {
        self.records.get(&id).map(|e| &e.record)
    }

    /// All records in id order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<PointRecord>> {
        self.records.values().map(|e| &e.record)
    }

    /// Records whose position falls in any of the envelopes
    pub fn candidates<'a>(
        &'a self,
        envelopes: &'a [AABB<[f64; 2]>],
    ) -> impl Iterator<Item = &'a Arc<PointRecord>> + 'a {
        envelopes.iter().flat_map(move |envelope| {
            self.tree
                .locate_in_envelope(envelope)
                .map(|ip| &ip.record)
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Entries in the R-tree; equals `len()` unless the index is corrupt
    pub fn tree_size(&self) -> usize {
        self.tree.size()
    }
}
