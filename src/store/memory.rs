//! In-memory entity store for tests and embedding hosts.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;

use crate::types::entities::{Entity, EntityKind};

use super::error::StoreError;
use super::types::StoreOperation;
use super::EntityStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<(EntityKind, Vec<u8>), JsonValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and deserialize a record; `None` if absent.
    pub async fn get<T: Entity>(&self, key: &[u8]) -> Result<Option<T>, StoreError> {
        let records = self.records.read().await;
        records
            .get(&(T::KIND, key.to_vec()))
            .map(|record| {
                serde_json::from_value(record.clone()).map_err(|e| StoreError::Corrupt {
                    kind: T::KIND,
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    pub async fn count(&self, kind: EntityKind) -> usize {
        let records = self.records.read().await;
        records.keys().filter(|(k, _)| *k == kind).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn load(
        &self,
        kind: EntityKind,
        key: &[u8],
    ) -> Result<Option<JsonValue>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(&(kind, key.to_vec())).cloned())
    }

    async fn commit(&self, operations: Vec<StoreOperation>) -> Result<(), StoreError> {
        // Single write lock for the whole batch keeps the commit atomic with
        // respect to concurrent readers.
        let mut records = self.records.write().await;
        for op in operations {
            let StoreOperation::Put { kind, key, record } = op;
            records.insert((kind, key), record);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::entities::NpcInfo;
    use alloy::primitives::U256;

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);

        let mut info = NpcInfo::new(vec![0xaa; 20]);
        info.active_weeks = U256::from(3u64);
        store
            .commit(vec![StoreOperation::put(&info).unwrap()])
            .await
            .unwrap();

        let loaded: NpcInfo = store.get(&[0xaa; 20]).await.unwrap().unwrap();
        assert_eq!(loaded.active_weeks, U256::from(3u64));
        assert_eq!(store.count(EntityKind::NpcInfo).await, 1);
    }

    #[tokio::test]
    async fn test_put_replaces_record() {
        let store = MemoryStore::new();

        let mut info = NpcInfo::new(vec![0xaa; 20]);
        info.active_weeks = U256::from(1u64);
        store
            .commit(vec![StoreOperation::put(&info).unwrap()])
            .await
            .unwrap();

        info.active_weeks = U256::from(2u64);
        store
            .commit(vec![StoreOperation::put(&info).unwrap()])
            .await
            .unwrap();

        let loaded: NpcInfo = store.get(&[0xaa; 20]).await.unwrap().unwrap();
        assert_eq!(loaded.active_weeks, U256::from(2u64));
        assert_eq!(store.count(EntityKind::NpcInfo).await, 1);
    }

    #[tokio::test]
    async fn test_kinds_do_not_collide_on_same_key() {
        let store = MemoryStore::new();
        let key = vec![0xaa; 20];

        let info = NpcInfo::new(key.clone());
        let vote = crate::types::entities::NpcVote::new(key.clone());
        store
            .commit(vec![
                StoreOperation::put(&info).unwrap(),
                StoreOperation::put(&vote).unwrap(),
            ])
            .await
            .unwrap();

        assert_eq!(store.count(EntityKind::NpcInfo).await, 1);
        assert_eq!(store.count(EntityKind::NpcVote).await, 1);
    }
}
