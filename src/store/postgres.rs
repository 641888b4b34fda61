//! PostgreSQL-backed entity store.
//!
//! One `entities` table keyed by `(kind, key)` with the record as JSONB.
//! A commit runs every staged write in a single transaction, so an event's
//! updates land together or not at all.

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use serde_json::Value as JsonValue;
use tokio_postgres::NoTls;

use crate::types::entities::EntityKind;

use super::error::StoreError;
use super::types::StoreOperation;
use super::EntityStore;

const UPSERT_SQL: &str = "INSERT INTO entities (kind, key, record) VALUES ($1, $2, $3) \
     ON CONFLICT (kind, key) DO UPDATE SET record = EXCLUDED.record, updated_at = NOW()";

pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        let config = database_url
            .parse::<tokio_postgres::Config>()
            .map_err(|e| StoreError::InvalidConnectionString(e.to_string()))?;

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = Manager::from_config(config, NoTls, manager_config);

        let pool = Pool::builder(manager)
            .max_size(16)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(StoreError::BuildError)?;

        let _conn = pool.get().await?;
        tracing::info!("Database connection pool created successfully");

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        super::migrations::run(&self.pool).await
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn load(
        &self,
        kind: EntityKind,
        key: &[u8],
    ) -> Result<Option<JsonValue>, StoreError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT record FROM entities WHERE kind = $1 AND key = $2",
                &[&kind.as_str(), &key],
            )
            .await?;

        Ok(rows.first().map(|row| row.get(0)))
    }

    async fn commit(&self, operations: Vec<StoreOperation>) -> Result<(), StoreError> {
        if operations.is_empty() {
            return Ok(());
        }

        let mut client = self.pool.get().await?;
        let transaction = client.transaction().await?;

        for op in &operations {
            let StoreOperation::Put { kind, key, record } = op;
            if let Err(e) = transaction
                .execute(UPSERT_SQL, &[&kind.as_str(), key, record])
                .await
            {
                let err: StoreError = e.into();
                tracing::error!("Entity upsert failed for kind {}: {}", kind, err);
                return Err(err);
            }
        }

        transaction.commit().await?;
        Ok(())
    }
}
