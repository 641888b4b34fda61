//! Read-only access to the two registry contracts.
//!
//! Handlers never bind to contract addresses directly; they receive these
//! traits through the event context. The production implementation issues
//! `eth_call`s (see [`super::rpc`]); tests inject a stub.
//!
//! Reads observe the registries' *current* state, so they depend on the
//! triggering event already being reflected there. In particular the
//! "most recent vote" index is `vote count - 1`, which is only correct when
//! the registry's counter has been bumped before the log is handled.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use thiserror::Error;

use crate::types::entities::VoteFields;

#[derive(Debug, Error)]
pub enum StateReadError {
    #[error("{contract} call '{method}' failed: {message}")]
    CallFailed {
        contract: &'static str,
        method: String,
        message: String,
    },

    #[error("{contract} call '{method}' returned empty data")]
    EmptyResult {
        contract: &'static str,
        method: String,
    },

    #[error("{contract} call '{method}' returned unexpected shape: {message}")]
    Decode {
        contract: &'static str,
        method: String,
        message: String,
    },

    #[error("vote counter for {scope} is zero; no most-recent vote to index")]
    CounterBehind { scope: String },
}

/// Read-through access to the rent registry: per-actor weights, scores,
/// claimed/unclaimed/earned totals, and the week counter.
#[async_trait]
pub trait RentRegistryReader: Send + Sync {
    async fn week_counter(&self) -> Result<U256, StateReadError>;

    async fn npc_active_weeks(&self, npc: Address) -> Result<U256, StateReadError>;

    async fn npc_au_claimed_by_week(
        &self,
        npc: Address,
        week: U256,
    ) -> Result<U256, StateReadError>;

    async fn npc_au_rent_by_week(&self, npc: Address, week: U256)
        -> Result<U256, StateReadError>;

    async fn npc_weighted_score_total(&self, npc: Address) -> Result<U256, StateReadError>;

    async fn npc_weighted_score_weekly(&self, npc: Address) -> Result<U256, StateReadError>;

    async fn spectator_portion(
        &self,
        spectator: Address,
        week: U256,
    ) -> Result<U256, StateReadError>;

    async fn spectator_au_claimed(&self, spectator: Address) -> Result<U256, StateReadError>;

    async fn spectator_au_unclaimed(&self, spectator: Address) -> Result<U256, StateReadError>;

    async fn spectator_au_earned(&self, spectator: Address) -> Result<U256, StateReadError>;

    async fn spectator_week_weight(&self, spectator: Address) -> Result<U256, StateReadError>;

    async fn spectator_weight_by_week(
        &self,
        spectator: Address,
        week: U256,
    ) -> Result<U256, StateReadError>;
}

/// The voted NPC plus metadata for one publication vote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PubVoteRead {
    pub npc: Address,
    pub fields: VoteFields,
}

/// Read-through access to the spectate registry: tracked-actor enumeration,
/// per-pair vote counts, and per-vote metadata.
#[async_trait]
pub trait SpectateRegistryReader: Send + Sync {
    async fn weekly_npcs(&self) -> Result<Vec<Address>, StateReadError>;

    async fn weekly_spectators(&self) -> Result<Vec<Address>, StateReadError>;

    async fn npc_vote_count(
        &self,
        spectator: Address,
        npc: Address,
    ) -> Result<U256, StateReadError>;

    async fn pub_vote_count(
        &self,
        profile_id: U256,
        pub_id: U256,
    ) -> Result<U256, StateReadError>;

    /// Metadata for the vote at `index` in the (spectator, npc) history.
    async fn npc_vote(
        &self,
        spectator: Address,
        npc: Address,
        index: U256,
    ) -> Result<VoteFields, StateReadError>;

    /// Metadata for the vote at `index` in the (profile, pub) history.
    async fn pub_vote(
        &self,
        profile_id: U256,
        pub_id: U256,
        index: U256,
    ) -> Result<PubVoteRead, StateReadError>;
}
