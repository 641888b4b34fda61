//! Per-event handler context.
//!
//! Gives handlers read access to the two registries and the store, plus the
//! configured totals policy. Handlers stage writes; they never commit.

use crate::state::{RentRegistryReader, SpectateRegistryReader};
use crate::store::{EntityStore, StoreError};
use crate::types::config::TotalsPolicy;
use crate::types::entities::Entity;

use super::error::AggregationError;

pub struct EventContext<'a> {
    pub rent: &'a dyn RentRegistryReader,
    pub spectate: &'a dyn SpectateRegistryReader,
    pub totals_policy: TotalsPolicy,
    store: &'a dyn EntityStore,
}

impl<'a> EventContext<'a> {
    pub fn new(
        rent: &'a dyn RentRegistryReader,
        spectate: &'a dyn SpectateRegistryReader,
        store: &'a dyn EntityStore,
        totals_policy: TotalsPolicy,
    ) -> Self {
        Self {
            rent,
            spectate,
            totals_policy,
            store,
        }
    }

    /// Load the record at `key`, or construct the zero-valued record for it.
    pub async fn load_or_default<T: Entity>(&self, key: Vec<u8>) -> Result<T, AggregationError> {
        match self.store.load(T::KIND, &key).await? {
            Some(record) => serde_json::from_value(record).map_err(|e| {
                AggregationError::Store(StoreError::Corrupt {
                    kind: T::KIND,
                    message: e.to_string(),
                })
            }),
            None => Ok(T::new(key)),
        }
    }
}
