//! In-memory registry stub for tests.

use std::collections::HashMap;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::types::entities::VoteFields;

use super::registries::{
    PubVoteRead, RentRegistryReader, SpectateRegistryReader, StateReadError,
};

/// Canned registry state. Unset numeric reads return zero, like an untouched
/// contract slot; unset vote metadata returns an error. With `fail_reads`
/// set, every read fails, for exercising the abort-on-read-error path.
#[derive(Debug, Default)]
pub struct StubRegistry {
    pub week_counter: U256,
    pub npc_active_weeks: HashMap<Address, U256>,
    pub npc_au_claimed_by_week: HashMap<(Address, u64), U256>,
    pub npc_au_rent_by_week: HashMap<(Address, u64), U256>,
    pub npc_score_total: HashMap<Address, U256>,
    pub npc_score_weekly: HashMap<Address, U256>,
    pub spectator_portion: HashMap<(Address, u64), U256>,
    pub spectator_au_claimed: HashMap<Address, U256>,
    pub spectator_au_unclaimed: HashMap<Address, U256>,
    pub spectator_au_earned: HashMap<Address, U256>,
    pub spectator_week_weight: HashMap<Address, U256>,
    pub spectator_weight_by_week: HashMap<(Address, u64), U256>,
    pub weekly_npcs: Vec<Address>,
    pub weekly_spectators: Vec<Address>,
    pub npc_vote_counts: HashMap<(Address, Address), U256>,
    pub pub_vote_counts: HashMap<(U256, U256), U256>,
    pub npc_votes: HashMap<(Address, Address, u64), VoteFields>,
    pub pub_votes: HashMap<(U256, U256, u64), PubVoteRead>,
    pub fail_reads: bool,
}

impl StubRegistry {
    fn check(&self, method: &str) -> Result<(), StateReadError> {
        if self.fail_reads {
            Err(StateReadError::CallFailed {
                contract: "stub",
                method: method.to_string(),
                message: "stubbed failure".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

fn lookup<K: std::hash::Hash + Eq>(map: &HashMap<K, U256>, key: K) -> U256 {
    map.get(&key).copied().unwrap_or(U256::ZERO)
}

#[async_trait]
impl RentRegistryReader for StubRegistry {
    async fn week_counter(&self) -> Result<U256, StateReadError> {
        self.check("weekCounter")?;
        Ok(self.week_counter)
    }

    async fn npc_active_weeks(&self, npc: Address) -> Result<U256, StateReadError> {
        self.check("getNPCActiveWeeks")?;
        Ok(lookup(&self.npc_active_weeks, npc))
    }

    async fn npc_au_claimed_by_week(
        &self,
        npc: Address,
        week: U256,
    ) -> Result<U256, StateReadError> {
        self.check("getNPCAuClaimedByWeek")?;
        Ok(lookup(&self.npc_au_claimed_by_week, (npc, week.to::<u64>())))
    }

    async fn npc_au_rent_by_week(
        &self,
        npc: Address,
        week: U256,
    ) -> Result<U256, StateReadError> {
        self.check("getNPCAuRentByWeek")?;
        Ok(lookup(&self.npc_au_rent_by_week, (npc, week.to::<u64>())))
    }

    async fn npc_weighted_score_total(&self, npc: Address) -> Result<U256, StateReadError> {
        self.check("getNPCCurrentWeightedScoreTotal")?;
        Ok(lookup(&self.npc_score_total, npc))
    }

    async fn npc_weighted_score_weekly(&self, npc: Address) -> Result<U256, StateReadError> {
        self.check("getNPCCurrentWeightedScoreWeekly")?;
        Ok(lookup(&self.npc_score_weekly, npc))
    }

    async fn spectator_portion(
        &self,
        spectator: Address,
        week: U256,
    ) -> Result<U256, StateReadError> {
        self.check("getSpectatorPortion")?;
        Ok(lookup(&self.spectator_portion, (spectator, week.to::<u64>())))
    }

    async fn spectator_au_claimed(&self, spectator: Address) -> Result<U256, StateReadError> {
        self.check("getSpectatorAUClaimed")?;
        Ok(lookup(&self.spectator_au_claimed, spectator))
    }

    async fn spectator_au_unclaimed(&self, spectator: Address) -> Result<U256, StateReadError> {
        self.check("getSpectatorAUUnclaimed")?;
        Ok(lookup(&self.spectator_au_unclaimed, spectator))
    }

    async fn spectator_au_earned(&self, spectator: Address) -> Result<U256, StateReadError> {
        self.check("getSpectatorAUEarned")?;
        Ok(lookup(&self.spectator_au_earned, spectator))
    }

    async fn spectator_week_weight(&self, spectator: Address) -> Result<U256, StateReadError> {
        self.check("getSpectatorCurrentWeekWeight")?;
        Ok(lookup(&self.spectator_week_weight, spectator))
    }

    async fn spectator_weight_by_week(
        &self,
        spectator: Address,
        week: U256,
    ) -> Result<U256, StateReadError> {
        self.check("getSpectatorWeightByWeek")?;
        Ok(lookup(
            &self.spectator_weight_by_week,
            (spectator, week.to::<u64>()),
        ))
    }
}

#[async_trait]
impl SpectateRegistryReader for StubRegistry {
    async fn weekly_npcs(&self) -> Result<Vec<Address>, StateReadError> {
        self.check("getWeeklyNPCs")?;
        Ok(self.weekly_npcs.clone())
    }

    async fn weekly_spectators(&self) -> Result<Vec<Address>, StateReadError> {
        self.check("getWeeklySpectators")?;
        Ok(self.weekly_spectators.clone())
    }

    async fn npc_vote_count(
        &self,
        spectator: Address,
        npc: Address,
    ) -> Result<U256, StateReadError> {
        self.check("getNPCVoteCount")?;
        Ok(lookup(&self.npc_vote_counts, (spectator, npc)))
    }

    async fn pub_vote_count(
        &self,
        profile_id: U256,
        pub_id: U256,
    ) -> Result<U256, StateReadError> {
        self.check("getPubVoteCount")?;
        Ok(lookup(&self.pub_vote_counts, (profile_id, pub_id)))
    }

    async fn npc_vote(
        &self,
        spectator: Address,
        npc: Address,
        index: U256,
    ) -> Result<VoteFields, StateReadError> {
        self.check("getNPCVote")?;
        self.npc_votes
            .get(&(spectator, npc, index.to::<u64>()))
            .cloned()
            .ok_or(StateReadError::EmptyResult {
                contract: "stub",
                method: "getNPCVote".to_string(),
            })
    }

    async fn pub_vote(
        &self,
        profile_id: U256,
        pub_id: U256,
        index: U256,
    ) -> Result<PubVoteRead, StateReadError> {
        self.check("getPubVote")?;
        self.pub_votes
            .get(&(profile_id, pub_id, index.to::<u64>()))
            .cloned()
            .ok_or(StateReadError::EmptyResult {
                contract: "stub",
                method: "getPubVote".to_string(),
            })
    }
}
