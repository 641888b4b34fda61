//! Pluggable entity persistence.
//!
//! The store is a key-value surface: records are addressed by
//! `(EntityKind, derived byte key)`, loaded whole, and replaced whole. The
//! engine stages [`StoreOperation`]s while handling an event and commits the
//! batch atomically.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::types::entities::EntityKind;

pub mod error;
pub mod memory;
pub mod migrations;
pub mod postgres;
pub mod types;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use types::StoreOperation;

#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Load the record at `(kind, key)`, if any.
    async fn load(&self, kind: EntityKind, key: &[u8]) -> Result<Option<JsonValue>, StoreError>;

    /// Apply every staged write, atomically: either all of them become
    /// visible or none do.
    async fn commit(&self, operations: Vec<StoreOperation>) -> Result<(), StoreError>;
}
