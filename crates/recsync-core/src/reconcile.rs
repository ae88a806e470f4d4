//! Record reconciliation
//!
//! Compares the current remote record with the desired state and issues
//! at most one mutating call to converge them.
//!
//! ## Decision order
//!
//! 1. Record absent → create it from the desired state
//! 2. Record present, content equal → nothing to do
//! 3. Record present, content different → update content in place
//!
//! Only `content` is compared. TTL and proxy-flag drift on an existing
//! record are neither detected nor corrected.

use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config::SyncMode;
use crate::error::{Result, SyncStep};
use crate::traits::{DnsProvider, DnsRecord};

/// Desired state of the managed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredRecord {
    /// Fully-qualified record name
    pub name: String,
    /// Record type for newly created records
    pub record_type: String,
    /// Target content
    pub content: String,
    /// TTL for newly created records
    pub ttl: u32,
    /// Proxy flag for newly created records
    pub proxied: bool,
    /// Annotation for newly created records
    pub comment: Option<String>,
}

impl DesiredRecord {
    /// A fresh record (no id) carrying the full desired state
    pub fn to_new_record(&self) -> DnsRecord {
        DnsRecord {
            id: None,
            name: self.name.clone(),
            record_type: self.record_type.clone(),
            content: self.content.clone(),
            ttl: self.ttl,
            proxied: self.proxied,
            comment: self.comment.clone(),
        }
    }
}

/// The single action needed to converge a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileAction {
    /// Create this record
    Create(DnsRecord),
    /// Record already has the desired content
    Noop,
    /// Overwrite the existing record with this one
    Update {
        /// The record to send (existing id, type, name, ttl, proxy flag; new content)
        record: DnsRecord,
        /// Content before the update
        previous_content: String,
    },
}

/// Terminal state of a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Record didn't exist and was created
    Created {
        /// The created content
        content: String,
    },
    /// Record already had the desired content (no-op)
    Unchanged {
        /// The current content
        content: String,
    },
    /// Record existed with different content and was updated
    Updated {
        /// The content before the update
        previous_content: String,
        /// The new content
        content: String,
    },
}

impl ReconcileOutcome {
    /// Whether this outcome required a mutating call
    pub fn is_mutation(&self) -> bool {
        !matches!(self, ReconcileOutcome::Unchanged { .. })
    }
}

/// Decide what to do about `current` given `desired`
pub fn plan(current: Option<&DnsRecord>, desired: &DesiredRecord) -> ReconcileAction {
    match current {
        None => ReconcileAction::Create(desired.to_new_record()),
        Some(existing) if existing.content == desired.content => ReconcileAction::Noop,
        Some(existing) => ReconcileAction::Update {
            record: DnsRecord {
                content: desired.content.clone(),
                ..existing.clone()
            },
            previous_content: existing.content.clone(),
        },
    }
}

/// Executes the reconciliation plan against a provider
pub struct Reconciler<'a> {
    provider: &'a dyn DnsProvider,
    mode: SyncMode,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler backed by `provider`
    pub fn new(provider: &'a dyn DnsProvider, mode: SyncMode) -> Self {
        Self { provider, mode }
    }

    /// Converge the record named `desired.name` in zone `zone_id`
    ///
    /// Errors are annotated with the step that failed. A fetch failure
    /// returns before any mutating call is attempted.
    pub async fn reconcile(
        &self,
        zone_id: &str,
        desired: &DesiredRecord,
    ) -> Result<ReconcileOutcome> {
        let current = self
            .provider
            .get_record(zone_id, &desired.name)
            .await
            .map_err(|e| e.at(SyncStep::FetchRecord))?;

        match plan(current.as_ref(), desired) {
            ReconcileAction::Create(record) => {
                info!(record = %record.name, "DNS record not found, creating");
                if self.skip_mutation(SyncStep::CreateRecord, &record) {
                    return Ok(ReconcileOutcome::Created {
                        content: record.content,
                    });
                }

                self.provider
                    .create_record(zone_id, &record)
                    .await
                    .map_err(|e| e.at(SyncStep::CreateRecord))?;

                info!(record = %record.name, content = %record.content, "DNS record created");
                Ok(ReconcileOutcome::Created {
                    content: record.content,
                })
            }
            ReconcileAction::Noop => {
                info!(record = %desired.name, content = %desired.content, "DNS record unchanged");
                Ok(ReconcileOutcome::Unchanged {
                    content: desired.content.clone(),
                })
            }
            ReconcileAction::Update {
                record,
                previous_content,
            } => {
                info!(
                    record = %record.name,
                    from = %previous_content,
                    to = %record.content,
                    "DNS record target differs, updating"
                );
                if self.skip_mutation(SyncStep::UpdateRecord, &record) {
                    return Ok(ReconcileOutcome::Updated {
                        previous_content,
                        content: record.content,
                    });
                }

                self.provider
                    .update_record(zone_id, &record)
                    .await
                    .map_err(|e| e.at(SyncStep::UpdateRecord))?;

                info!(record = %record.name, content = %record.content, "DNS record updated");
                Ok(ReconcileOutcome::Updated {
                    previous_content,
                    content: record.content,
                })
            }
        }
    }

    /// In dry-run mode, log the intended mutation and report that it was skipped
    fn skip_mutation(&self, step: SyncStep, record: &DnsRecord) -> bool {
        if !self.mode.is_dry_run() {
            return false;
        }

        info!(
            "[DRY-RUN] Would {} via {}: {}",
            step,
            self.provider.provider_name(),
            mutation_payload(step, record)
        );
        debug!("Dry-run: mutation skipped");
        true
    }
}

/// The fields a mutating call sends for `record`
///
/// An update addresses the record by id and leaves its comment alone, so
/// neither is part of the update payload.
fn mutation_payload(step: SyncStep, record: &DnsRecord) -> Value {
    let mut payload = json!({
        "type": record.record_type,
        "name": record.name,
        "content": record.content,
        "ttl": record.ttl,
        "proxied": record.proxied,
    });

    if let Some(comment) = record
        .comment
        .as_ref()
        .filter(|_| step != SyncStep::UpdateRecord)
    {
        payload["comment"] = json!(comment);
    }
    payload
}
