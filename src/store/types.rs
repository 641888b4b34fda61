use serde_json::Value as JsonValue;

use crate::types::entities::{Entity, EntityKind};

use super::error::StoreError;

/// A staged write. Handlers build these; nothing touches the store until the
/// engine commits the whole event's batch.
#[derive(Debug, Clone)]
pub enum StoreOperation {
    /// Full-record replace at (kind, key), creating the row if absent.
    Put {
        kind: EntityKind,
        key: Vec<u8>,
        record: JsonValue,
    },
}

impl StoreOperation {
    /// Stage a typed record for persistence.
    pub fn put<T: Entity>(entity: &T) -> Result<Self, StoreError> {
        let record = serde_json::to_value(entity).map_err(|e| StoreError::Serialize {
            kind: T::KIND,
            message: e.to_string(),
        })?;

        Ok(StoreOperation::Put {
            kind: T::KIND,
            key: entity.id().to_vec(),
            record,
        })
    }
}
