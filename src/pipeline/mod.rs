//! Aggregation pipeline for decoded contract events.
//!
//! This module provides:
//! - A handler trait for processing decoded events into store operations
//! - An event context with registry read-through and load-or-default access
//! - A handler registry for compile-time registration
//! - An engine that orchestrates handler execution and atomic store commits
//!
//! # Architecture
//!
//! ```text
//! Raw Logs ──► AggregationEngine ──► Handlers ──► StoreOperations ──► EntityStore
//!                    │
//!                    └─► EventContext
//!                         ├─ Rent registry reads
//!                         ├─ Spectate registry reads
//!                         └─ load_or_default over existing records
//! ```
//!
//! Events are handled strictly one at a time, in delivery order. A handler
//! stages writes; the engine commits them in a single transaction after
//! every handler for the event has succeeded, so a failed read-through or a
//! malformed payload leaves the store untouched.

pub mod context;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod traits;

pub use context::EventContext;
pub use engine::AggregationEngine;
pub use error::AggregationError;
pub use registry::{build_registry, HandlerRegistry};
pub use traits::EventHandler;
