//! Raw log payloads as delivered by the host.
//!
//! A [`RawLog`] carries the block/transaction envelope plus the ordered,
//! named, typed parameters of one decoded contract log. The host owns log
//! delivery and ordering; this layer only validates shape.

use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// A decoded parameter value from a log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum LogValue {
    Address(Address),
    Uint256(U256),
    Bool(bool),
    Bytes(Bytes),
    String(String),
}

impl LogValue {
    /// Type tag used in malformed-event errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            LogValue::Address(_) => "address",
            LogValue::Uint256(_) => "uint256",
            LogValue::Bool(_) => "bool",
            LogValue::Bytes(_) => "bytes",
            LogValue::String(_) => "string",
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            LogValue::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_uint256(&self) -> Option<U256> {
        match self {
            LogValue::Uint256(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LogValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            LogValue::Bytes(b) => Some(b.as_ref()),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            LogValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// A named event parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogParam {
    pub name: String,
    pub value: LogValue,
}

impl LogParam {
    pub fn new(name: impl Into<String>, value: LogValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Position-in-chain metadata for one log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: B256,
    pub log_index: u32,
}

/// One raw log record, delivered in chain order, at-least-once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLog {
    pub contract_address: Address,
    pub event_name: String,
    pub params: Vec<LogParam>,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: B256,
    pub log_index: u32,
}

impl RawLog {
    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&LogValue> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    pub fn envelope(&self) -> EventEnvelope {
        EventEnvelope {
            block_number: self.block_number,
            block_timestamp: self.block_timestamp,
            transaction_hash: self.transaction_hash,
            log_index: self.log_index,
        }
    }
}
