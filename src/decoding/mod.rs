pub mod events;
pub mod log;

pub use events::{
    AdminAddedEvent, AdminRemovedEvent, DecodeError, DecodedEvent, Event, EventKind,
    MissedRentDistributedEvent, NpcAddedEvent, NpcRemovedEvent, NpcVoteEvent,
    NpcWeightsCalculatedEvent, PubVoteEvent, RentMissedEvent, RentPaidEvent,
    SpectatorClaimedAllEvent, SpectatorClaimedEvent, SpectatorWeightsCalculatedEvent,
    WeeklyResetEvent,
};
pub use log::{EventEnvelope, LogParam, LogValue, RawLog};
