//! Record store
//!
//! In-memory record collection with at-most-one-record-per-id semantics.
//! Records are kept in insertion order; lookups are a linear scan, which is
//! fine for a catalog of a few hundred entries.

use tokio::sync::RwLock;
use tracing::{debug, info};

use super::record::{Record, RecordPatch, TypeList};

/// Store operation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record {0} already exists")]
    Conflict(u32),

    #[error("record {0} does not exist")]
    UnknownId(u32),

    #[error("cannot create record without: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),
}

/// Result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

/// Shared record collection
///
/// Every mutation holds the write lock across find, apply and write-back,
/// so two writers can never both create the same id.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: RwLock<Vec<Record>>,
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from already-validated seed records
    pub fn with_records(records: Vec<Record>) -> Self {
        info!(count = records.len(), "Record store initialized");
        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn find_by_id(&self, id: u32) -> Option<Record> {
        let records = self.records.read().await;
        records.iter().find(|r| r.id == id).cloned()
    }

    pub async fn contains(&self, id: u32) -> bool {
        let records = self.records.read().await;
        records.iter().any(|r| r.id == id)
    }

    /// Insert a new record; fails if the id is taken
    pub async fn insert(&self, record: Record) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::Conflict(record.id));
        }
        debug!(id = record.id, name = %record.name, "Record inserted");
        records.push(record);
        Ok(())
    }

    /// Create the record from `patch` if absent, otherwise overwrite only
    /// the fields the patch sets
    pub async fn upsert_fields(&self, id: u32, patch: RecordPatch) -> Result<Upsert, StoreError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id == id) {
            Some(existing) => {
                let mut updated = existing.clone();
                patch.apply(&mut updated);
                *existing = updated;
                debug!(id, "Record updated via upsert");
                Ok(Upsert::Updated)
            }
            None => {
                let record = patch.into_record(id).map_err(StoreError::Incomplete)?;
                debug!(id, name = %record.name, "Record created via upsert");
                records.push(record);
                Ok(Upsert::Created)
            }
        }
    }

    /// Partial update of an existing record
    pub async fn update_fields(&self, id: u32, patch: RecordPatch) -> Result<(), StoreError> {
        self.modify(id, |record| patch.apply(record)).await
    }

    /// Add types to an existing record, promoting a single type to a list.
    /// Types the record already has are skipped.
    pub async fn append_type(&self, id: u32, types: TypeList) -> Result<(), StoreError> {
        self.modify(id, |record| {
            for value in types.as_slice() {
                if !record.types.push(value.as_str()) {
                    debug!(id, kind = %value, "Type already present, not appended");
                }
            }
        })
        .await
    }

    /// Snapshot of the whole collection in insertion order
    pub async fn list_all(&self) -> Vec<Record> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn modify<F>(&self, id: u32, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Record),
    {
        let mut records = self.records.write().await;
        let existing = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::UnknownId(id))?;
        let mut updated = existing.clone();
        f(&mut updated);
        *existing = updated;
        debug!(id, "Record updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn full_patch(name: &str) -> RecordPatch {
        RecordPatch::default()
            .with_num("001")
            .with_name(name)
            .with_image("001.png")
            .with_types(TypeList::single("Grass"))
            .with_height("0.71 m")
            .with_weight("6.9 kg")
            .with_weaknesses(vec!["Fire".into()])
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = RecordStore::new();
        let record = full_patch("Bulbasaur").into_record(1).unwrap();
        store.insert(record.clone()).await.unwrap();

        assert_eq!(store.find_by_id(1).await, Some(record));
        assert_eq!(store.find_by_id(2).await, None);
    }

    #[tokio::test]
    async fn test_insert_conflict() {
        let store = RecordStore::new();
        store
            .insert(full_patch("Bulbasaur").into_record(1).unwrap())
            .await
            .unwrap();

        let err = store
            .insert(full_patch("Impostor").into_record(1).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Conflict(1));
        assert_eq!(store.len().await, 1);
        assert_eq!(store.find_by_id(1).await.unwrap().name, "Bulbasaur");
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let store = RecordStore::new();
        let created = store.upsert_fields(4, full_patch("Charmander")).await.unwrap();
        assert_eq!(created, Upsert::Created);

        let updated = store
            .upsert_fields(4, RecordPatch::default().with_name("Charmeleon"))
            .await
            .unwrap();
        assert_eq!(updated, Upsert::Updated);

        let record = store.find_by_id(4).await.unwrap();
        assert_eq!(record.name, "Charmeleon");
        assert_eq!(record.height, "0.71 m");
    }

    #[tokio::test]
    async fn test_upsert_incomplete_does_not_insert() {
        let store = RecordStore::new();
        let err = store
            .upsert_fields(9, RecordPatch::default().with_name("Blastoise"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Incomplete(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_sequential_field_writes_keep_earlier_fields() {
        let store = RecordStore::with_records(vec![full_patch("Bulbasaur").into_record(1).unwrap()]);

        store
            .update_fields(1, RecordPatch::default().with_height("1.0 m"))
            .await
            .unwrap();
        store
            .update_fields(1, RecordPatch::default().with_weight("13.0 kg"))
            .await
            .unwrap();

        let record = store.find_by_id(1).await.unwrap();
        assert_eq!(record.height, "1.0 m");
        assert_eq!(record.weight, "13.0 kg");
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = RecordStore::new();
        let err = store
            .update_fields(3, RecordPatch::default().with_name("Venusaur"))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::UnknownId(3));
    }

    #[tokio::test]
    async fn test_append_type_promotes_and_is_idempotent() {
        let store = RecordStore::with_records(vec![full_patch("Bulbasaur").into_record(1).unwrap()]);

        store.append_type(1, TypeList::single("Poison")).await.unwrap();
        store.append_type(1, TypeList::single("Poison")).await.unwrap();

        let record = store.find_by_id(1).await.unwrap();
        assert_eq!(record.types.as_slice(), ["Grass", "Poison"]);
    }

    #[tokio::test]
    async fn test_list_all_keeps_insertion_order() {
        let store = RecordStore::new();
        for (id, name) in [(3, "Venusaur"), (1, "Bulbasaur"), (2, "Ivysaur")] {
            store.insert(full_patch(name).into_record(id).unwrap()).await.unwrap();
        }
        let ids: Vec<u32> = store.list_all().await.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_upserts_keep_single_record() {
        let store = Arc::new(RecordStore::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .upsert_fields(25, full_patch(&format!("Pikachu-{}", i)))
                    .await
                    .unwrap()
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap() == Upsert::Created {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.len().await, 1);
    }
}
