//! Pipeline error taxonomy.

use thiserror::Error;

use crate::decoding::DecodeError;
use crate::state::StateReadError;
use crate::store::StoreError;

/// Per-event failure surfaced to the host. Whatever the variant, nothing
/// from the failed event has been persisted; redelivery is host policy.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("malformed event: {0}")]
    MalformedEvent(#[from] DecodeError),

    #[error("registry read failed: {0}")]
    StateRead(#[from] StateReadError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
