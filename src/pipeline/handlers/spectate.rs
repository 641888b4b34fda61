//! Handlers for the spectate contract events.
//!
//! Vote events append one row to the per-target history after fetching the
//! vote's metadata from the spectate registry. The metadata lives at index
//! `vote count - 1`, which assumes the registry counted the triggering vote
//! before this log is handled; a zero counter aborts the event instead of
//! underflowing.

use alloy::primitives::U256;
use async_trait::async_trait;

use crate::decoding::{
    DecodedEvent, Event, EventEnvelope, EventKind, NpcVoteEvent, PubVoteEvent, WeeklyResetEvent,
};
use crate::pipeline::context::EventContext;
use crate::pipeline::error::AggregationError;
use crate::pipeline::registry::HandlerRegistry;
use crate::pipeline::traits::EventHandler;
use crate::state::StateReadError;
use crate::store::StoreOperation;
use crate::types::entities::{Entity, NpcVote, PubVote, VoteRow, WeeklyReset};
use crate::types::keys::{actor_key, event_key, pub_vote_key};

use super::block_info;

pub struct SpectateHandler;

#[async_trait]
impl EventHandler for SpectateHandler {
    fn name(&self) -> &'static str {
        "SpectateHandler"
    }

    fn triggers(&self) -> Vec<EventKind> {
        vec![
            EventKind::NpcVote,
            EventKind::PubVote,
            EventKind::WeeklyReset,
        ]
    }

    async fn handle(
        &self,
        ctx: &EventContext<'_>,
        event: &DecodedEvent,
    ) -> Result<Vec<StoreOperation>, AggregationError> {
        let env = &event.envelope;
        match &event.body {
            Event::NpcVote(e) => self.on_npc_vote(ctx, env, e).await,
            Event::PubVote(e) => self.on_pub_vote(ctx, env, e).await,
            Event::WeeklyReset(e) => self.on_weekly_reset(env, e),
            _ => Ok(Vec::new()),
        }
    }
}

impl SpectateHandler {
    async fn on_npc_vote(
        &self,
        ctx: &EventContext<'_>,
        env: &EventEnvelope,
        e: &NpcVoteEvent,
    ) -> Result<Vec<StoreOperation>, AggregationError> {
        let count = ctx.spectate.npc_vote_count(e.spectator, e.npc).await?;
        let index = count
            .checked_sub(U256::from(1u64))
            .ok_or_else(|| StateReadError::CounterBehind {
                scope: format!("npc vote ({}, {})", e.spectator, e.npc),
            })?;

        let fields = ctx.spectate.npc_vote(e.spectator, e.npc, index).await?;

        let mut record: NpcVote = ctx.load_or_default(actor_key(&e.npc)).await?;
        record.npc = e.npc;
        record.votes.push(VoteRow {
            spectator: e.spectator,
            block_number: env.block_number,
            block_timestamp: env.block_timestamp,
            transaction_hash: env.transaction_hash,
            fields,
        });

        Ok(vec![StoreOperation::put(&record)?])
    }

    async fn on_pub_vote(
        &self,
        ctx: &EventContext<'_>,
        env: &EventEnvelope,
        e: &PubVoteEvent,
    ) -> Result<Vec<StoreOperation>, AggregationError> {
        let count = ctx.spectate.pub_vote_count(e.profile_id, e.pub_id).await?;
        let index = count
            .checked_sub(U256::from(1u64))
            .ok_or_else(|| StateReadError::CounterBehind {
                scope: format!("pub vote ({}, {})", e.profile_id, e.pub_id),
            })?;

        let read = ctx.spectate.pub_vote(e.profile_id, e.pub_id, index).await?;

        let mut record: PubVote = ctx
            .load_or_default(pub_vote_key(&e.profile_id, &e.pub_id))
            .await?;
        record.profile_id = e.profile_id;
        record.pub_id = e.pub_id;
        record.npc = read.npc;
        record.votes.push(VoteRow {
            spectator: e.spectator,
            block_number: env.block_number,
            block_timestamp: env.block_timestamp,
            transaction_hash: env.transaction_hash,
            fields: read.fields,
        });

        Ok(vec![StoreOperation::put(&record)?])
    }

    fn on_weekly_reset(
        &self,
        env: &EventEnvelope,
        e: &WeeklyResetEvent,
    ) -> Result<Vec<StoreOperation>, AggregationError> {
        let mut record = WeeklyReset::new(event_key(&env.transaction_hash, env.log_index));
        record.reseter = e.reseter;
        record.block = block_info(env);

        Ok(vec![StoreOperation::put(&record)?])
    }
}

pub fn register_handlers(registry: &mut HandlerRegistry) {
    registry.register(SpectateHandler);
}
