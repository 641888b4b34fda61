//! Aggregation engine that orchestrates handler execution.
//!
//! The engine consumes raw logs one at a time, in delivery order: decode,
//! invoke the registered handlers, then commit the collected store
//! operations in one transaction. An event either lands completely or not
//! at all; any failure surfaces to the host, which owns redelivery.

use std::sync::Arc;

use tokio::sync::mpsc::Receiver;

use crate::decoding::{DecodeError, DecodedEvent, RawLog};
use crate::state::{RentRegistryReader, SpectateRegistryReader};
use crate::store::EntityStore;
use crate::types::config::TotalsPolicy;

use super::context::EventContext;
use super::error::AggregationError;
use super::registry::HandlerRegistry;

pub struct AggregationEngine {
    registry: Arc<HandlerRegistry>,
    store: Arc<dyn EntityStore>,
    rent: Arc<dyn RentRegistryReader>,
    spectate: Arc<dyn SpectateRegistryReader>,
    totals_policy: TotalsPolicy,
}

impl AggregationEngine {
    pub fn new(
        registry: Arc<HandlerRegistry>,
        store: Arc<dyn EntityStore>,
        rent: Arc<dyn RentRegistryReader>,
        spectate: Arc<dyn SpectateRegistryReader>,
        totals_policy: TotalsPolicy,
    ) -> Self {
        Self {
            registry,
            store,
            rent,
            spectate,
            totals_policy,
        }
    }

    /// Process one raw log to completion.
    ///
    /// Returns `Ok(())` for successfully handled events and for event kinds
    /// nothing is registered for (hosts may deliver a superset).
    pub async fn process(&self, log: &RawLog) -> Result<(), AggregationError> {
        let event = match DecodedEvent::decode(log) {
            Ok(event) => event,
            Err(DecodeError::UnknownEvent(name)) => {
                tracing::debug!("Skipping unhandled event kind '{}'", name);
                return Ok(());
            }
            Err(e) => return Err(AggregationError::MalformedEvent(e)),
        };

        let kind = event.body.kind();
        let handlers = self.registry.handlers_for(kind);
        if handlers.is_empty() {
            tracing::debug!("No handlers registered for {:?}", kind);
            return Ok(());
        }

        let ctx = EventContext::new(
            self.rent.as_ref(),
            self.spectate.as_ref(),
            self.store.as_ref(),
            self.totals_policy,
        );

        let mut operations = Vec::new();
        for handler in handlers {
            let ops = handler.handle(&ctx, &event).await?;
            operations.extend(ops);
        }

        let op_count = operations.len();
        self.store.commit(operations).await?;

        tracing::trace!(
            "Processed {:?} at block {} log {} ({} writes)",
            kind,
            event.envelope.block_number,
            event.envelope.log_index,
            op_count
        );

        Ok(())
    }

    /// Consume logs from the channel until it closes, strictly in order.
    /// The first failing event aborts the run with its error.
    pub async fn run(&self, mut rx: Receiver<RawLog>) -> Result<(), AggregationError> {
        let mut processed: u64 = 0;

        while let Some(log) = rx.recv().await {
            self.process(&log).await?;
            processed += 1;

            if processed % 10_000 == 0 {
                tracing::info!("Processed {} events", processed);
            }
        }

        tracing::info!("Input stream closed after {} events", processed);
        Ok(())
    }
}
