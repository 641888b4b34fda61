//! Derived entity keys.
//!
//! Every persisted record is addressed by a byte sequence derived
//! deterministically from event fields. Event-scoped records use the
//! transaction hash concatenated with the log index, which is unique per
//! log; actor-scoped records use the raw address bytes.

use alloy::primitives::{Address, B256, U256};

/// Key for records created once per event: `tx_hash ++ log_index` (big-endian).
pub fn event_key(transaction_hash: &B256, log_index: u32) -> Vec<u8> {
    let mut key = Vec::with_capacity(36);
    key.extend_from_slice(transaction_hash.as_slice());
    key.extend_from_slice(&log_index.to_be_bytes());
    key
}

/// Key for records scoped to a single actor: the 20 address bytes.
pub fn actor_key(address: &Address) -> Vec<u8> {
    address.as_slice().to_vec()
}

/// Key for publication votes: `profile_id ++ pub_id` (32 bytes each, big-endian).
pub fn pub_vote_key(profile_id: &U256, pub_id: &U256) -> Vec<u8> {
    let mut key = Vec::with_capacity(64);
    key.extend_from_slice(&profile_id.to_be_bytes::<32>());
    key.extend_from_slice(&pub_id.to_be_bytes::<32>());
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_key_is_unique_per_log() {
        let tx = B256::repeat_byte(0xab);
        let a = event_key(&tx, 0);
        let b = event_key(&tx, 1);
        assert_eq!(a.len(), 36);
        assert_ne!(a, b);
        assert_eq!(&a[..32], tx.as_slice());
        assert_eq!(hex::encode(&a[32..]), "00000000");
        assert_eq!(hex::encode(&b[32..]), "00000001");
    }

    #[test]
    fn test_event_key_is_stable() {
        let tx = B256::repeat_byte(0x11);
        assert_eq!(event_key(&tx, 7), event_key(&tx, 7));
    }

    #[test]
    fn test_actor_key_round_trips_address() {
        let addr = "0x7fb6f7EF8dfFb0bB8d82b64E6b90BcC5162621F6"
            .parse::<Address>()
            .unwrap();
        let key = actor_key(&addr);
        assert_eq!(key, addr.as_slice());
        assert_eq!(Address::from_slice(&key), addr);
    }

    #[test]
    fn test_pub_vote_key_distinguishes_components() {
        // (1, 2) and (2, 1) must not collide
        let a = pub_vote_key(&U256::from(1u64), &U256::from(2u64));
        let b = pub_vote_key(&U256::from(2u64), &U256::from(1u64));
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }
}
