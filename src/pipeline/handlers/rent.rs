//! Handlers for the rent contract events.
//!
//! Beyond the write-once record every event gets, `RentPaid` rebuilds the
//! NPC's running aggregate and appends to its payment history, the two
//! weights-calculated kinds rebuild the leaderboards over the tracked-actor
//! set, and the claim kinds refresh the spectator aggregate. All registry
//! reads observe current state, so a failed read aborts the event before
//! anything is staged for commit.

use alloy::primitives::U256;
use async_trait::async_trait;

use crate::decoding::{
    DecodedEvent, Event, EventEnvelope, EventKind, MissedRentDistributedEvent,
    NpcWeightsCalculatedEvent, RentMissedEvent, RentPaidEvent, SpectatorClaimedAllEvent,
    SpectatorClaimedEvent, SpectatorWeightsCalculatedEvent,
};
use crate::pipeline::context::EventContext;
use crate::pipeline::error::AggregationError;
use crate::pipeline::registry::HandlerRegistry;
use crate::pipeline::traits::EventHandler;
use crate::store::StoreOperation;
use crate::types::entities::{
    Entity, LeaderboardNpc, LeaderboardSpectator, MissedRentDistributed, NpcInfo, NpcWeightsCalculated,
    RentMissed, RentPaid, RentPaidNpc, RentPayment, SpectatorClaimed, SpectatorClaimedAll,
    SpectatorInfo, SpectatorWeightsCalculated,
};
use crate::types::keys::{actor_key, event_key};

use super::block_info;

pub struct RentHandler;

#[async_trait]
impl EventHandler for RentHandler {
    fn name(&self) -> &'static str {
        "RentHandler"
    }

    fn triggers(&self) -> Vec<EventKind> {
        vec![
            EventKind::MissedRentDistributed,
            EventKind::NpcWeightsCalculated,
            EventKind::RentMissed,
            EventKind::RentPaid,
            EventKind::SpectatorClaimed,
            EventKind::SpectatorClaimedAll,
            EventKind::SpectatorWeightsCalculated,
        ]
    }

    async fn handle(
        &self,
        ctx: &EventContext<'_>,
        event: &DecodedEvent,
    ) -> Result<Vec<StoreOperation>, AggregationError> {
        let env = &event.envelope;
        match &event.body {
            Event::MissedRentDistributed(e) => self.on_missed_rent_distributed(env, e),
            Event::NpcWeightsCalculated(e) => self.on_npc_weights_calculated(ctx, env, e).await,
            Event::RentMissed(e) => self.on_rent_missed(ctx, env, e).await,
            Event::RentPaid(e) => self.on_rent_paid(ctx, env, e).await,
            Event::SpectatorClaimed(e) => self.on_spectator_claimed(env, e),
            Event::SpectatorClaimedAll(e) => self.on_spectator_claimed_all(ctx, env, e).await,
            Event::SpectatorWeightsCalculated(e) => {
                self.on_spectator_weights_calculated(ctx, env, e).await
            }
            _ => Ok(Vec::new()),
        }
    }
}

impl RentHandler {
    fn on_missed_rent_distributed(
        &self,
        env: &EventEnvelope,
        e: &MissedRentDistributedEvent,
    ) -> Result<Vec<StoreOperation>, AggregationError> {
        let mut record = MissedRentDistributed::new(event_key(&env.transaction_hash, env.log_index));
        record.amount = e.amount;
        record.block = block_info(env);

        Ok(vec![StoreOperation::put(&record)?])
    }

    async fn on_npc_weights_calculated(
        &self,
        ctx: &EventContext<'_>,
        env: &EventEnvelope,
        e: &NpcWeightsCalculatedEvent,
    ) -> Result<Vec<StoreOperation>, AggregationError> {
        let mut ops = Vec::new();

        let mut record = NpcWeightsCalculated::new(event_key(&env.transaction_hash, env.log_index));
        record.npc = e.npc;
        record.global_weight = e.global_weight;
        record.block = block_info(env);
        ops.push(StoreOperation::put(&record)?);

        // Rebuild the leaderboard for every NPC currently tracked; addresses
        // outside the tracked set are left untouched.
        for npc in ctx.spectate.weekly_npcs().await? {
            let mut entry: LeaderboardNpc = ctx.load_or_default(actor_key(&npc)).await?;
            entry.npc = npc;
            entry.total_score = ctx.rent.npc_weighted_score_total(npc).await?;
            entry.weekly_score = ctx.rent.npc_weighted_score_weekly(npc).await?;
            ops.push(StoreOperation::put(&entry)?);
        }

        Ok(ops)
    }

    async fn on_rent_missed(
        &self,
        ctx: &EventContext<'_>,
        env: &EventEnvelope,
        e: &RentMissedEvent,
    ) -> Result<Vec<StoreOperation>, AggregationError> {
        let mut ops = Vec::new();

        let mut info: NpcInfo = ctx.load_or_default(actor_key(&e.npc)).await?;
        info.npc = e.npc;
        info.rent_missed_total = e.au_amount_paid;
        ops.push(StoreOperation::put(&info)?);

        let mut record = RentMissed::new(event_key(&env.transaction_hash, env.log_index));
        record.npc = e.npc;
        record.au_amount_paid = e.au_amount_paid;
        record.block = block_info(env);
        ops.push(StoreOperation::put(&record)?);

        Ok(ops)
    }

    async fn on_rent_paid(
        &self,
        ctx: &EventContext<'_>,
        env: &EventEnvelope,
        e: &RentPaidEvent,
    ) -> Result<Vec<StoreOperation>, AggregationError> {
        let mut ops = Vec::new();

        let mut record = RentPaid::new(event_key(&env.transaction_hash, env.log_index));
        record.npc = e.npc;
        record.au_amount_claimed = e.au_amount_claimed;
        record.au_amount_paid = e.au_amount_paid;
        record.block = block_info(env);
        ops.push(StoreOperation::put(&record)?);

        let mut history: RentPaidNpc = ctx.load_or_default(actor_key(&e.npc)).await?;
        history.npc = e.npc;
        history.payments.push(RentPayment {
            block_timestamp: env.block_timestamp,
            transaction_hash: env.transaction_hash,
            amount: e.au_amount_paid,
        });
        ops.push(StoreOperation::put(&history)?);

        let mut info: NpcInfo = ctx.load_or_default(actor_key(&e.npc)).await?;
        info.npc = e.npc;
        info.active_jobs = U256::ZERO;
        info.active_weeks = ctx.rent.npc_active_weeks(e.npc).await?;

        let weeks = info.active_weeks.saturating_to::<u64>();
        let mut au_earned_total = U256::ZERO;
        let mut au_paid_total = U256::ZERO;
        for week in 0..weeks {
            let week = U256::from(week);
            au_earned_total = ctx.totals_policy.fold(
                au_earned_total,
                ctx.rent.npc_au_claimed_by_week(e.npc, week).await?,
            );
            au_paid_total = ctx
                .totals_policy
                .fold(au_paid_total, ctx.rent.npc_au_rent_by_week(e.npc, week).await?);
        }
        info.au_earned_total = au_earned_total;
        info.au_paid_total = au_paid_total;

        info.current_weekly_score = ctx.rent.npc_weighted_score_total(e.npc).await?;
        info.current_global_score = ctx.rent.npc_weighted_score_weekly(e.npc).await?;

        let mut all_global_score = U256::ZERO;
        for npc in ctx.spectate.weekly_npcs().await? {
            all_global_score = ctx
                .totals_policy
                .fold(all_global_score, ctx.rent.npc_weighted_score_total(npc).await?);
        }
        info.all_global_score = all_global_score;
        ops.push(StoreOperation::put(&info)?);

        Ok(ops)
    }

    fn on_spectator_claimed(
        &self,
        env: &EventEnvelope,
        e: &SpectatorClaimedEvent,
    ) -> Result<Vec<StoreOperation>, AggregationError> {
        let mut record = SpectatorClaimed::new(event_key(&env.transaction_hash, env.log_index));
        record.spectator = e.spectator;
        record.au_amount_claimed = e.au_amount_claimed;
        record.block = block_info(env);

        Ok(vec![StoreOperation::put(&record)?])
    }

    async fn on_spectator_claimed_all(
        &self,
        ctx: &EventContext<'_>,
        env: &EventEnvelope,
        e: &SpectatorClaimedAllEvent,
    ) -> Result<Vec<StoreOperation>, AggregationError> {
        let mut ops = Vec::new();

        let mut record = SpectatorClaimedAll::new(event_key(&env.transaction_hash, env.log_index));
        record.spectator = e.spectator;
        record.au_amount_claimed = e.au_amount_claimed;
        record.block = block_info(env);
        ops.push(StoreOperation::put(&record)?);

        let mut info: SpectatorInfo = ctx.load_or_default(actor_key(&e.spectator)).await?;
        info.spectator = e.spectator;

        let week = ctx.rent.week_counter().await?;
        info.weekly_portion = ctx.rent.spectator_portion(e.spectator, week).await?;
        info.au_claimed_total = ctx.rent.spectator_au_claimed(e.spectator).await?;
        info.au_unclaimed_total = ctx.rent.spectator_au_unclaimed(e.spectator).await?;
        info.au_earned_total = ctx.rent.spectator_au_earned(e.spectator).await?;
        info.week_weight = ctx.rent.spectator_week_weight(e.spectator).await?;
        ops.push(StoreOperation::put(&info)?);

        Ok(ops)
    }

    async fn on_spectator_weights_calculated(
        &self,
        ctx: &EventContext<'_>,
        env: &EventEnvelope,
        e: &SpectatorWeightsCalculatedEvent,
    ) -> Result<Vec<StoreOperation>, AggregationError> {
        let mut ops = Vec::new();

        let mut record =
            SpectatorWeightsCalculated::new(event_key(&env.transaction_hash, env.log_index));
        record.npc = e.npc;
        record.global_weight = e.global_weight;
        record.global_weight_normalized = e.global_weight_normalized;
        record.block = block_info(env);
        ops.push(StoreOperation::put(&record)?);

        let weeks = ctx.rent.week_counter().await?.saturating_to::<u64>();

        for spectator in ctx.spectate.weekly_spectators().await? {
            let mut entry: LeaderboardSpectator = ctx.load_or_default(actor_key(&spectator)).await?;
            entry.spectator = spectator;

            let mut total_score = U256::ZERO;
            for week in 0..weeks {
                total_score = ctx.totals_policy.fold(
                    total_score,
                    ctx.rent
                        .spectator_weight_by_week(spectator, U256::from(week))
                        .await?,
                );
            }
            entry.total_score = total_score;
            entry.weekly_score = ctx.rent.spectator_week_weight(spectator).await?;
            ops.push(StoreOperation::put(&entry)?);
        }

        Ok(ops)
    }
}

pub fn register_handlers(registry: &mut HandlerRegistry) {
    registry.register(RentHandler);
}
