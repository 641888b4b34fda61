pub mod access_controls;
pub mod rent;
pub mod spectate;

use crate::decoding::EventEnvelope;
use crate::types::entities::BlockInfo;

pub(crate) fn block_info(envelope: &EventEnvelope) -> BlockInfo {
    BlockInfo {
        block_number: envelope.block_number,
        block_timestamp: envelope.block_timestamp,
        transaction_hash: envelope.transaction_hash,
    }
}
