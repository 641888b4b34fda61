//! Typed event records.
//!
//! [`DecodedEvent::decode`] turns a [`RawLog`] into a strongly-typed,
//! event-kind-specific record, or fails with [`DecodeError`] when a required
//! named parameter is absent or carries the wrong type tag. Decoding has no
//! side effects; nothing is persisted for a malformed event.

use alloy::primitives::{Address, U256};
use thiserror::Error;

use super::log::{EventEnvelope, LogValue, RawLog};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("event '{event}': missing required parameter '{param}'")]
    MissingParam {
        event: &'static str,
        param: &'static str,
    },

    #[error("event '{event}': parameter '{param}' is {actual}, expected {expected}")]
    WrongType {
        event: &'static str,
        param: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("unknown event kind '{0}'")]
    UnknownEvent(String),
}

/// Event kinds this pipeline indexes. Used as handler trigger keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    AdminAdded,
    AdminRemoved,
    NpcAdded,
    NpcRemoved,
    MissedRentDistributed,
    NpcWeightsCalculated,
    RentMissed,
    RentPaid,
    SpectatorClaimed,
    SpectatorClaimedAll,
    SpectatorWeightsCalculated,
    NpcVote,
    PubVote,
    WeeklyReset,
}

fn require<'a>(
    log: &'a RawLog,
    event: &'static str,
    param: &'static str,
) -> Result<&'a LogValue, DecodeError> {
    log.param(param)
        .ok_or(DecodeError::MissingParam { event, param })
}

fn require_address(
    log: &RawLog,
    event: &'static str,
    param: &'static str,
) -> Result<Address, DecodeError> {
    let value = require(log, event, param)?;
    value.as_address().ok_or(DecodeError::WrongType {
        event,
        param,
        expected: "address",
        actual: value.type_name(),
    })
}

fn require_uint256(
    log: &RawLog,
    event: &'static str,
    param: &'static str,
) -> Result<U256, DecodeError> {
    let value = require(log, event, param)?;
    value.as_uint256().ok_or(DecodeError::WrongType {
        event,
        param,
        expected: "uint256",
        actual: value.type_name(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAddedEvent {
    pub admin: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRemovedEvent {
    pub admin: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcAddedEvent {
    pub npc: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcRemovedEvent {
    pub npc: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissedRentDistributedEvent {
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcWeightsCalculatedEvent {
    pub npc: Address,
    pub global_weight: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentMissedEvent {
    pub npc: Address,
    pub au_amount_paid: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentPaidEvent {
    pub npc: Address,
    pub au_amount_claimed: U256,
    pub au_amount_paid: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectatorClaimedEvent {
    pub spectator: Address,
    pub au_amount_claimed: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectatorClaimedAllEvent {
    pub spectator: Address,
    pub au_amount_claimed: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectatorWeightsCalculatedEvent {
    pub npc: Address,
    pub global_weight: U256,
    pub global_weight_normalized: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcVoteEvent {
    pub spectator: Address,
    pub npc: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubVoteEvent {
    pub spectator: Address,
    pub profile_id: U256,
    pub pub_id: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyResetEvent {
    pub reseter: Address,
}

/// The typed body of a decoded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    AdminAdded(AdminAddedEvent),
    AdminRemoved(AdminRemovedEvent),
    NpcAdded(NpcAddedEvent),
    NpcRemoved(NpcRemovedEvent),
    MissedRentDistributed(MissedRentDistributedEvent),
    NpcWeightsCalculated(NpcWeightsCalculatedEvent),
    RentMissed(RentMissedEvent),
    RentPaid(RentPaidEvent),
    SpectatorClaimed(SpectatorClaimedEvent),
    SpectatorClaimedAll(SpectatorClaimedAllEvent),
    SpectatorWeightsCalculated(SpectatorWeightsCalculatedEvent),
    NpcVote(NpcVoteEvent),
    PubVote(PubVoteEvent),
    WeeklyReset(WeeklyResetEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::AdminAdded(_) => EventKind::AdminAdded,
            Event::AdminRemoved(_) => EventKind::AdminRemoved,
            Event::NpcAdded(_) => EventKind::NpcAdded,
            Event::NpcRemoved(_) => EventKind::NpcRemoved,
            Event::MissedRentDistributed(_) => EventKind::MissedRentDistributed,
            Event::NpcWeightsCalculated(_) => EventKind::NpcWeightsCalculated,
            Event::RentMissed(_) => EventKind::RentMissed,
            Event::RentPaid(_) => EventKind::RentPaid,
            Event::SpectatorClaimed(_) => EventKind::SpectatorClaimed,
            Event::SpectatorClaimedAll(_) => EventKind::SpectatorClaimedAll,
            Event::SpectatorWeightsCalculated(_) => EventKind::SpectatorWeightsCalculated,
            Event::NpcVote(_) => EventKind::NpcVote,
            Event::PubVote(_) => EventKind::PubVote,
            Event::WeeklyReset(_) => EventKind::WeeklyReset,
        }
    }
}

/// A fully decoded event: typed body plus position-in-chain envelope.
#[derive(Debug, Clone)]
pub struct DecodedEvent {
    pub envelope: EventEnvelope,
    pub body: Event,
}

impl DecodedEvent {
    /// Decode a raw log into a typed event record.
    pub fn decode(log: &RawLog) -> Result<Self, DecodeError> {
        let body = match log.event_name.as_str() {
            "AdminAdded" => Event::AdminAdded(AdminAddedEvent {
                admin: require_address(log, "AdminAdded", "admin")?,
            }),
            "AdminRemoved" => Event::AdminRemoved(AdminRemovedEvent {
                admin: require_address(log, "AdminRemoved", "admin")?,
            }),
            "NPCAdded" => Event::NpcAdded(NpcAddedEvent {
                npc: require_address(log, "NPCAdded", "npc")?,
            }),
            "NPCRemoved" => Event::NpcRemoved(NpcRemovedEvent {
                npc: require_address(log, "NPCRemoved", "npc")?,
            }),
            "MissedRentDistributed" => Event::MissedRentDistributed(MissedRentDistributedEvent {
                amount: require_uint256(log, "MissedRentDistributed", "amount")?,
            }),
            "NPCWeightsCalculated" => Event::NpcWeightsCalculated(NpcWeightsCalculatedEvent {
                npc: require_address(log, "NPCWeightsCalculated", "npc")?,
                global_weight: require_uint256(log, "NPCWeightsCalculated", "globalWeight")?,
            }),
            "RentMissed" => Event::RentMissed(RentMissedEvent {
                npc: require_address(log, "RentMissed", "npc")?,
                au_amount_paid: require_uint256(log, "RentMissed", "auAmountPaid")?,
            }),
            "RentPaid" => Event::RentPaid(RentPaidEvent {
                npc: require_address(log, "RentPaid", "npc")?,
                au_amount_claimed: require_uint256(log, "RentPaid", "auAmountClaimed")?,
                au_amount_paid: require_uint256(log, "RentPaid", "auAmountPaid")?,
            }),
            "SpectatorClaimed" => Event::SpectatorClaimed(SpectatorClaimedEvent {
                spectator: require_address(log, "SpectatorClaimed", "spectator")?,
                au_amount_claimed: require_uint256(log, "SpectatorClaimed", "auAmountClaimed")?,
            }),
            "SpectatorClaimedAll" => Event::SpectatorClaimedAll(SpectatorClaimedAllEvent {
                spectator: require_address(log, "SpectatorClaimedAll", "spectator")?,
                au_amount_claimed: require_uint256(log, "SpectatorClaimedAll", "auAmountClaimed")?,
            }),
            "SpectatorWeightsCalculated" => {
                Event::SpectatorWeightsCalculated(SpectatorWeightsCalculatedEvent {
                    npc: require_address(log, "SpectatorWeightsCalculated", "npc")?,
                    global_weight: require_uint256(
                        log,
                        "SpectatorWeightsCalculated",
                        "globalWeight",
                    )?,
                    global_weight_normalized: require_uint256(
                        log,
                        "SpectatorWeightsCalculated",
                        "globalWeightNormalized",
                    )?,
                })
            }
            "NPCVote" => Event::NpcVote(NpcVoteEvent {
                spectator: require_address(log, "NPCVote", "spectator")?,
                npc: require_address(log, "NPCVote", "npc")?,
            }),
            "PubVote" => Event::PubVote(PubVoteEvent {
                spectator: require_address(log, "PubVote", "spectator")?,
                profile_id: require_uint256(log, "PubVote", "profileId")?,
                pub_id: require_uint256(log, "PubVote", "pubId")?,
            }),
            "WeeklyReset" => Event::WeeklyReset(WeeklyResetEvent {
                reseter: require_address(log, "WeeklyReset", "reseter")?,
            }),
            other => return Err(DecodeError::UnknownEvent(other.to_string())),
        };

        Ok(DecodedEvent {
            envelope: log.envelope(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoding::log::LogParam;
    use alloy::primitives::B256;

    fn raw_log(event_name: &str, params: Vec<LogParam>) -> RawLog {
        RawLog {
            contract_address: Address::repeat_byte(0x99),
            event_name: event_name.to_string(),
            params,
            block_number: 42,
            block_timestamp: 1_700_000_000,
            transaction_hash: B256::repeat_byte(0x11),
            log_index: 1,
        }
    }

    #[test]
    fn test_decode_rent_paid() {
        let log = raw_log(
            "RentPaid",
            vec![
                LogParam::new("npc", LogValue::Address(Address::repeat_byte(0xaa))),
                LogParam::new("auAmountClaimed", LogValue::Uint256(U256::from(50u64))),
                LogParam::new("auAmountPaid", LogValue::Uint256(U256::from(30u64))),
            ],
        );

        let decoded = DecodedEvent::decode(&log).unwrap();
        assert_eq!(decoded.envelope.block_number, 42);
        assert_eq!(decoded.envelope.log_index, 1);
        match decoded.body {
            Event::RentPaid(e) => {
                assert_eq!(e.npc, Address::repeat_byte(0xaa));
                assert_eq!(e.au_amount_claimed, U256::from(50u64));
                assert_eq!(e.au_amount_paid, U256::from(30u64));
            }
            other => panic!("decoded wrong kind: {:?}", other),
        }
    }

    #[test]
    fn test_decode_npc_weights_calculated() {
        let log = raw_log(
            "NPCWeightsCalculated",
            vec![
                LogParam::new("npc", LogValue::Address(Address::repeat_byte(0xbb))),
                LogParam::new("globalWeight", LogValue::Uint256(U256::from(100u64))),
            ],
        );

        let decoded = DecodedEvent::decode(&log).unwrap();
        assert_eq!(decoded.body.kind(), EventKind::NpcWeightsCalculated);
        match decoded.body {
            Event::NpcWeightsCalculated(e) => {
                assert_eq!(e.global_weight, U256::from(100u64));
            }
            other => panic!("decoded wrong kind: {:?}", other),
        }
    }

    #[test]
    fn test_decode_pub_vote() {
        let log = raw_log(
            "PubVote",
            vec![
                LogParam::new("spectator", LogValue::Address(Address::repeat_byte(0x01))),
                LogParam::new("profileId", LogValue::Uint256(U256::from(7u64))),
                LogParam::new("pubId", LogValue::Uint256(U256::from(9u64))),
            ],
        );

        match DecodedEvent::decode(&log).unwrap().body {
            Event::PubVote(e) => {
                assert_eq!(e.profile_id, U256::from(7u64));
                assert_eq!(e.pub_id, U256::from(9u64));
            }
            other => panic!("decoded wrong kind: {:?}", other),
        }
    }

    #[test]
    fn test_missing_param_is_malformed() {
        let log = raw_log(
            "RentPaid",
            vec![LogParam::new(
                "npc",
                LogValue::Address(Address::repeat_byte(0xaa)),
            )],
        );

        match DecodedEvent::decode(&log) {
            Err(DecodeError::MissingParam { event, param }) => {
                assert_eq!(event, "RentPaid");
                assert_eq!(param, "auAmountClaimed");
            }
            other => panic!("expected MissingParam, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let log = raw_log(
            "AdminAdded",
            vec![LogParam::new("admin", LogValue::Uint256(U256::from(1u64)))],
        );

        match DecodedEvent::decode(&log) {
            Err(DecodeError::WrongType {
                param,
                expected,
                actual,
                ..
            }) => {
                assert_eq!(param, "admin");
                assert_eq!(expected, "address");
                assert_eq!(actual, "uint256");
            }
            other => panic!("expected WrongType, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_event_kind() {
        let log = raw_log("Paused", vec![]);
        match DecodedEvent::decode(&log) {
            Err(DecodeError::UnknownEvent(name)) => assert_eq!(name, "Paused"),
            other => panic!("expected UnknownEvent, got {:?}", other),
        }
    }
}
