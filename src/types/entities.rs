//! Persisted entity records.
//!
//! Each record is keyed by a derived byte sequence (see [`crate::types::keys`])
//! and serialized to JSON for storage. Event-scoped records are write-once;
//! actor-scoped records are either fully overwritten per triggering event or
//! grown by exactly one row. Row-shaped history (rent payments, votes) is
//! modelled as a single ordered `Vec` of structs so that the per-event fields
//! can never drift out of step with each other.

use std::fmt;

use alloy::primitives::{Address, Bytes, B256, U256};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Storage namespace for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    AdminAdded,
    AdminRemoved,
    NpcAdded,
    NpcRemoved,
    MissedRentDistributed,
    RentMissed,
    RentPaid,
    SpectatorClaimed,
    SpectatorClaimedAll,
    NpcWeightsCalculated,
    SpectatorWeightsCalculated,
    WeeklyReset,
    NpcInfo,
    SpectatorInfo,
    LeaderboardNpc,
    LeaderboardSpectator,
    RentPaidNpc,
    NpcVote,
    PubVote,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::AdminAdded => "admin_added",
            EntityKind::AdminRemoved => "admin_removed",
            EntityKind::NpcAdded => "npc_added",
            EntityKind::NpcRemoved => "npc_removed",
            EntityKind::MissedRentDistributed => "missed_rent_distributed",
            EntityKind::RentMissed => "rent_missed",
            EntityKind::RentPaid => "rent_paid",
            EntityKind::SpectatorClaimed => "spectator_claimed",
            EntityKind::SpectatorClaimedAll => "spectator_claimed_all",
            EntityKind::NpcWeightsCalculated => "npc_weights_calculated",
            EntityKind::SpectatorWeightsCalculated => "spectator_weights_calculated",
            EntityKind::WeeklyReset => "weekly_reset",
            EntityKind::NpcInfo => "npc_info",
            EntityKind::SpectatorInfo => "spectator_info",
            EntityKind::LeaderboardNpc => "leaderboard_npc",
            EntityKind::LeaderboardSpectator => "leaderboard_spectator",
            EntityKind::RentPaidNpc => "rent_paid_npc",
            EntityKind::NpcVote => "npc_vote",
            EntityKind::PubVote => "pub_vote",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted record type. `new` constructs the zero-valued record for a key;
/// handlers fill it in (or mutate a loaded one) and stage it for commit.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    const KIND: EntityKind;

    fn new(key: Vec<u8>) -> Self;

    fn id(&self) -> &Bytes;
}

macro_rules! impl_entity {
    ($ty:ident, $kind:expr) => {
        impl Entity for $ty {
            const KIND: EntityKind = $kind;

            fn new(key: Vec<u8>) -> Self {
                Self {
                    id: Bytes::from(key),
                    ..Default::default()
                }
            }

            fn id(&self) -> &Bytes {
                &self.id
            }
        }
    };
}

/// Block/transaction position shared by all write-once event records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: B256,
}

// ───── write-once event records ─────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminAdded {
    pub id: Bytes,
    pub admin: Address,
    #[serde(flatten)]
    pub block: BlockInfo,
}
impl_entity!(AdminAdded, EntityKind::AdminAdded);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminRemoved {
    pub id: Bytes,
    pub admin: Address,
    #[serde(flatten)]
    pub block: BlockInfo,
}
impl_entity!(AdminRemoved, EntityKind::AdminRemoved);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NpcAdded {
    pub id: Bytes,
    pub npc: Address,
    #[serde(flatten)]
    pub block: BlockInfo,
}
impl_entity!(NpcAdded, EntityKind::NpcAdded);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NpcRemoved {
    pub id: Bytes,
    pub npc: Address,
    #[serde(flatten)]
    pub block: BlockInfo,
}
impl_entity!(NpcRemoved, EntityKind::NpcRemoved);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissedRentDistributed {
    pub id: Bytes,
    pub amount: U256,
    #[serde(flatten)]
    pub block: BlockInfo,
}
impl_entity!(MissedRentDistributed, EntityKind::MissedRentDistributed);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RentMissed {
    pub id: Bytes,
    pub npc: Address,
    pub au_amount_paid: U256,
    #[serde(flatten)]
    pub block: BlockInfo,
}
impl_entity!(RentMissed, EntityKind::RentMissed);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RentPaid {
    pub id: Bytes,
    pub npc: Address,
    pub au_amount_claimed: U256,
    pub au_amount_paid: U256,
    #[serde(flatten)]
    pub block: BlockInfo,
}
impl_entity!(RentPaid, EntityKind::RentPaid);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpectatorClaimed {
    pub id: Bytes,
    pub spectator: Address,
    pub au_amount_claimed: U256,
    #[serde(flatten)]
    pub block: BlockInfo,
}
impl_entity!(SpectatorClaimed, EntityKind::SpectatorClaimed);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpectatorClaimedAll {
    pub id: Bytes,
    pub spectator: Address,
    pub au_amount_claimed: U256,
    #[serde(flatten)]
    pub block: BlockInfo,
}
impl_entity!(SpectatorClaimedAll, EntityKind::SpectatorClaimedAll);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NpcWeightsCalculated {
    pub id: Bytes,
    pub npc: Address,
    pub global_weight: U256,
    #[serde(flatten)]
    pub block: BlockInfo,
}
impl_entity!(NpcWeightsCalculated, EntityKind::NpcWeightsCalculated);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpectatorWeightsCalculated {
    pub id: Bytes,
    pub npc: Address,
    pub global_weight: U256,
    pub global_weight_normalized: U256,
    #[serde(flatten)]
    pub block: BlockInfo,
}
impl_entity!(
    SpectatorWeightsCalculated,
    EntityKind::SpectatorWeightsCalculated
);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklyReset {
    pub id: Bytes,
    pub reseter: Address,
    #[serde(flatten)]
    pub block: BlockInfo,
}
impl_entity!(WeeklyReset, EntityKind::WeeklyReset);

// ───── aggregate records ─────

/// Running per-NPC aggregate, fully recomputed on every `RentPaid` for the
/// NPC. `rent_missed_total` alone is also refreshed by `RentMissed`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NpcInfo {
    pub id: Bytes,
    pub npc: Address,
    pub rent_missed_total: U256,
    pub active_jobs: U256,
    pub active_weeks: U256,
    pub au_earned_total: U256,
    pub au_paid_total: U256,
    pub current_weekly_score: U256,
    pub current_global_score: U256,
    pub all_global_score: U256,
}
impl_entity!(NpcInfo, EntityKind::NpcInfo);

/// Running per-spectator aggregate, fully recomputed on every
/// `SpectatorClaimedAll` for the spectator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpectatorInfo {
    pub id: Bytes,
    pub spectator: Address,
    pub weekly_portion: U256,
    pub au_claimed_total: U256,
    pub au_unclaimed_total: U256,
    pub au_earned_total: U256,
    pub week_weight: U256,
}
impl_entity!(SpectatorInfo, EntityKind::SpectatorInfo);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaderboardNpc {
    pub id: Bytes,
    pub npc: Address,
    pub total_score: U256,
    pub weekly_score: U256,
}
impl_entity!(LeaderboardNpc, EntityKind::LeaderboardNpc);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaderboardSpectator {
    pub id: Bytes,
    pub spectator: Address,
    pub total_score: U256,
    pub weekly_score: U256,
}
impl_entity!(LeaderboardSpectator, EntityKind::LeaderboardSpectator);

// ───── append-only history records ─────
//
// Replaying an already-processed event appends a duplicate row; delivery is
// at-least-once and this layer does not deduplicate.

/// One rent payment observed for an NPC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentPayment {
    pub block_timestamp: u64,
    pub transaction_hash: B256,
    pub amount: U256,
}

/// Per-NPC rent payment history, one row appended per `RentPaid` event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RentPaidNpc {
    pub id: Bytes,
    pub npc: Address,
    pub payments: Vec<RentPayment>,
}
impl_entity!(RentPaidNpc, EntityKind::RentPaidNpc);

/// Vote metadata fetched from the spectate registry at vote time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteFields {
    pub comment: String,
    pub model: String,
    pub chat_context: String,
    pub sprite_sheet: String,
    pub lora: String,
    pub personality: String,
    pub tokenizer: String,
    pub training: String,
    pub completed_jobs: U256,
    pub scene: String,
    pub global: U256,
}

/// One vote row: who voted, where in the chain, and the registry metadata
/// for that vote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRow {
    pub spectator: Address,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: B256,
    pub fields: VoteFields,
}

/// Per-NPC vote history, one row appended per `NPCVote` event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NpcVote {
    pub id: Bytes,
    pub npc: Address,
    pub votes: Vec<VoteRow>,
}
impl_entity!(NpcVote, EntityKind::NpcVote);

/// Per-publication vote history, keyed by `(profile_id, pub_id)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PubVote {
    pub id: Bytes,
    pub profile_id: U256,
    pub pub_id: U256,
    pub npc: Address,
    pub votes: Vec<VoteRow>,
}
impl_entity!(PubVote, EntityKind::PubVote);
