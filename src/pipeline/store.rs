//! Persistence of prediction records.

use crate::core::errors::{DiagnosisError, DiagnosisResult};
use crate::domain::record::PredictionRecord;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;
use uuid::Uuid;

/// Storage for prediction records.
pub trait PredictionStore: Send + Sync + Debug {
    /// Stores a new record.
    fn insert(&self, record: PredictionRecord) -> DiagnosisResult<()>;

    /// Looks a record up by id.
    fn find(&self, id: Uuid) -> DiagnosisResult<Option<PredictionRecord>>;

    /// Records of `owner_id`, newest first, at most `limit` of them.
    fn list_for_owner(
        &self,
        owner_id: &str,
        limit: usize,
    ) -> DiagnosisResult<Vec<PredictionRecord>>;
}

/// Process-local [`PredictionStore`].
#[derive(Debug, Default)]
pub struct InMemoryPredictionStore {
    records: RwLock<HashMap<Uuid, PredictionRecord>>,
}

impl InMemoryPredictionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records. Fails if a writer panicked while holding
    /// the lock.
    pub fn len(&self) -> DiagnosisResult<usize> {
        let records = self
            .records
            .read()
            .map_err(|_| DiagnosisError::lock_poisoned("prediction store"))?;
        Ok(records.len())
    }

    pub fn is_empty(&self) -> DiagnosisResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl PredictionStore for InMemoryPredictionStore {
    fn insert(&self, record: PredictionRecord) -> DiagnosisResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DiagnosisError::lock_poisoned("prediction store"))?;
        records.insert(record.id, record);
        Ok(())
    }

    fn find(&self, id: Uuid) -> DiagnosisResult<Option<PredictionRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| DiagnosisError::lock_poisoned("prediction store"))?;
        Ok(records.get(&id).cloned())
    }

    fn list_for_owner(
        &self,
        owner_id: &str,
        limit: usize,
    ) -> DiagnosisResult<Vec<PredictionRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| DiagnosisError::lock_poisoned("prediction store"))?;
        let mut owned: Vec<PredictionRecord> = records
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        owned.truncate(limit);
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::labels::DiseaseClass;
    use chrono::{Duration, Utc};

    fn record(owner: &str, minutes_ago: i64) -> PredictionRecord {
        PredictionRecord {
            id: Uuid::new_v4(),
            owner_id: owner.to_string(),
            disease_label: DiseaseClass::CornCommonRust,
            confidence_percent: 70,
            image_reference: "/uploads/x.png".to_string(),
            advisory: "Use resistant hybrid varieties. Apply fungicide if necessary.".to_string(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn test_insert_and_find() {
        let store = InMemoryPredictionStore::new();
        let r = record("alice", 0);
        store.insert(r.clone()).unwrap();
        assert_eq!(store.find(r.id).unwrap(), Some(r));
        assert_eq!(store.find(Uuid::new_v4()).unwrap(), None);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = InMemoryPredictionStore::new();
        store.insert(record("alice", 0)).unwrap();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.records.write().unwrap();
            panic!("writer died holding the lock");
        }));

        let err = store.len().unwrap_err();
        assert!(err.to_string().contains("prediction store lock"));
        assert!(store.is_empty().is_err());
        assert!(store.list_for_owner("alice", 10).is_err());
    }

    #[test]
    fn test_owner_listing_is_newest_first_and_limited() {
        let store = InMemoryPredictionStore::new();
        for minutes in [30, 5, 60, 10] {
            store.insert(record("alice", minutes)).unwrap();
        }
        store.insert(record("bob", 1)).unwrap();

        let listed = store.list_for_owner("alice", 3).unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed.iter().all(|r| r.owner_id == "alice"));
        assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert!(store.list_for_owner("carol", 10).unwrap().is_empty());
    }
}
