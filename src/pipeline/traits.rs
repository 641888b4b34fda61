//! Core trait for event handlers.
//!
//! Handlers receive one decoded event at a time, perform their read-through
//! calls, and return the store operations for the engine to commit. A
//! handler must either return every write for the event or an error; partial
//! output is never committed because the engine only commits after all
//! handlers for the event have succeeded.

use async_trait::async_trait;

use crate::decoding::{DecodedEvent, EventKind};
use crate::store::StoreOperation;

use super::context::EventContext;
use super::error::AggregationError;

#[async_trait]
pub trait EventHandler: Send + Sync + 'static {
    /// Unique name for this handler (used in logging).
    fn name(&self) -> &'static str;

    /// Event kinds this handler responds to.
    fn triggers(&self) -> Vec<EventKind>;

    /// Process one decoded event into staged store operations.
    async fn handle(
        &self,
        ctx: &EventContext<'_>,
        event: &DecodedEvent,
    ) -> Result<Vec<StoreOperation>, AggregationError>;
}
