//! Handlers for the access-controls contract events.
//!
//! All four kinds produce a single write-once record keyed by the event.

use async_trait::async_trait;

use crate::decoding::{DecodedEvent, Event, EventKind};
use crate::pipeline::context::EventContext;
use crate::pipeline::error::AggregationError;
use crate::pipeline::registry::HandlerRegistry;
use crate::pipeline::traits::EventHandler;
use crate::store::StoreOperation;
use crate::types::entities::{AdminAdded, AdminRemoved, Entity, NpcAdded, NpcRemoved};
use crate::types::keys::event_key;

use super::block_info;

pub struct AccessControlsHandler;

#[async_trait]
impl EventHandler for AccessControlsHandler {
    fn name(&self) -> &'static str {
        "AccessControlsHandler"
    }

    fn triggers(&self) -> Vec<EventKind> {
        vec![
            EventKind::AdminAdded,
            EventKind::AdminRemoved,
            EventKind::NpcAdded,
            EventKind::NpcRemoved,
        ]
    }

    async fn handle(
        &self,
        _ctx: &EventContext<'_>,
        event: &DecodedEvent,
    ) -> Result<Vec<StoreOperation>, AggregationError> {
        let env = &event.envelope;
        let key = event_key(&env.transaction_hash, env.log_index);

        let op = match &event.body {
            Event::AdminAdded(e) => {
                let mut record = AdminAdded::new(key);
                record.admin = e.admin;
                record.block = block_info(env);
                StoreOperation::put(&record)?
            }
            Event::AdminRemoved(e) => {
                let mut record = AdminRemoved::new(key);
                record.admin = e.admin;
                record.block = block_info(env);
                StoreOperation::put(&record)?
            }
            Event::NpcAdded(e) => {
                let mut record = NpcAdded::new(key);
                record.npc = e.npc;
                record.block = block_info(env);
                StoreOperation::put(&record)?
            }
            Event::NpcRemoved(e) => {
                let mut record = NpcRemoved::new(key);
                record.npc = e.npc;
                record.block = block_info(env);
                StoreOperation::put(&record)?
            }
            _ => return Ok(Vec::new()),
        };

        Ok(vec![op])
    }
}

pub fn register_handlers(registry: &mut HandlerRegistry) {
    registry.register(AccessControlsHandler);
}
