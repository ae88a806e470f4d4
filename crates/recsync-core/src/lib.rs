// # recsync-core
//
// Core library for single-record DNS synchronization.
//
// ## Architecture Overview
//
// - **DnsProvider**: Trait for reading and writing records via provider APIs
// - **ZoneResolver**: Reduces a record name to its zone and looks up the zone id
// - **Reconciler**: Compares current vs. desired record and issues at most one mutation
// - **SyncEngine**: Runs resolve → fetch → decide → mutate once, sequentially
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decision logic is separate from provider I/O
// 2. **Idempotency**: Running twice with the same input makes no second change
// 3. **Fail Fast**: Every error stops the run; nothing is retried or swallowed
// 4. **Library-First**: The binary is a thin shell over this crate

pub mod traits;
pub mod engine;
pub mod reconcile;
pub mod zone;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{DnsProvider, DnsRecord, Zone};
pub use engine::SyncEngine;
pub use reconcile::{DesiredRecord, ReconcileAction, ReconcileOutcome, Reconciler};
pub use zone::{ZoneResolver, registrable_zone};
pub use config::{SyncConfig, SyncMode};
pub use error::{Error, Result, SyncStep};
