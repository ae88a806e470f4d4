//! Sync engine
//!
//! The SyncEngine runs the whole pipeline once:
//!
//! ```text
//! domain ──► ZoneResolver ──► zone id ──► Reconciler ──► outcome
//!                 │                            │
//!                 └────────► DnsProvider ◄─────┘
//! ```
//!
//! ## Flow
//!
//! 1. Reduce the domain to its registrable zone and look up the zone id
//! 2. Fetch the current record by name
//! 3. Decide: create, no-op, or update
//! 4. Issue at most one mutating call
//!
//! Every step runs sequentially. Any error stops the run and is returned
//! annotated with the failing [`SyncStep`]; nothing is retried.

use tracing::{Instrument, info, info_span};

use crate::config::{SyncConfig, SyncMode};
use crate::error::{Result, SyncStep};
use crate::reconcile::{DesiredRecord, ReconcileOutcome, Reconciler};
use crate::traits::DnsProvider;
use crate::zone::ZoneResolver;

/// Single-shot synchronization engine
///
/// Owns the provider and the execution mode. Holds no state between runs.
pub struct SyncEngine {
    /// DNS provider for reading and writing records
    provider: Box<dyn DnsProvider>,

    /// Live or dry-run
    mode: SyncMode,
}

impl SyncEngine {
    /// Create a new engine
    pub fn new(provider: Box<dyn DnsProvider>, mode: SyncMode) -> Self {
        Self { provider, mode }
    }

    /// Create an engine for a configuration
    ///
    /// Validation is the job of [`SyncConfig::from_lookup`] (or an explicit
    /// [`SyncConfig::validate`] call); the engine only takes the mode.
    pub fn from_config(provider: Box<dyn DnsProvider>, config: &SyncConfig) -> Self {
        Self::new(provider, config.mode)
    }

    /// The execution mode
    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Run the pipeline once for `desired`
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileOutcome)`: the record converged (or would have, in dry-run)
    /// - `Err(Error::Step { .. })`: the step that failed and its cause
    pub async fn run(&self, desired: &DesiredRecord) -> Result<ReconcileOutcome> {
        let span = info_span!(
            "sync",
            provider = self.provider.provider_name(),
            record = %desired.name,
            target = %desired.content,
            dry_run = self.mode.is_dry_run(),
        );

        self.run_inner(desired).instrument(span).await
    }

    async fn run_inner(&self, desired: &DesiredRecord) -> Result<ReconcileOutcome> {
        let zone = ZoneResolver::new(self.provider.as_ref())
            .resolve(&desired.name)
            .await
            .map_err(|e| e.at(SyncStep::ResolveZone))?;
        info!(zone = %zone.name, zone_id = %zone.id, "Resolved zone");

        Reconciler::new(self.provider.as_ref(), self.mode)
            .reconcile(&zone.id, desired)
            .await
    }
}
