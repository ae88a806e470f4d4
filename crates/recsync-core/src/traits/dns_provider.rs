// # DNS Provider Trait
//
// Defines the interface for reading and writing DNS records via provider APIs.
//
// ## Implementations
//
// - Cloudflare: `recsync-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use recsync_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let zone_id = provider.zone_id("example.com").await?;
//     match provider.get_record(&zone_id, "app.example.com").await? {
//         Some(record) => println!("current content: {}", record.content),
//         None => println!("record absent"),
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A zone hosted by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    /// Provider-internal zone identifier
    pub id: String,
    /// Registrable domain the zone serves
    pub name: String,
}

/// A single DNS record as seen by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider identifier, `None` for a record that doesn't exist yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Fully-qualified record name
    pub name: String,
    /// Record type (e.g., "CNAME")
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record content (hostname or IP literal)
    pub content: String,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Whether traffic is proxied by the provider
    #[serde(default)]
    pub proxied: bool,
    /// Free-text annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Trait for DNS provider implementations
///
/// Every method performs exactly one API call. Providers don't retry,
/// back off, cache, or decide whether a mutation is needed; that is the
/// reconciler's job.
///
/// The API token must never appear in logs or error messages.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Look up the identifier of the zone named `zone_name`
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: identifier of the first matching zone
    /// - `Err(Error::ZoneNotFound)`: the provider reported zero matches
    /// - `Err(Error)`: transport, protocol or rejection failures
    async fn zone_id(&self, zone_name: &str) -> Result<String, crate::Error>;

    /// Fetch the record named `name` in zone `zone_id`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))`: the first matching record
    /// - `Ok(None)`: no record with that name exists
    /// - `Err(Error)`: the request failed
    async fn get_record(
        &self,
        zone_id: &str,
        name: &str,
    ) -> Result<Option<DnsRecord>, crate::Error>;

    /// Create `record` in zone `zone_id`
    ///
    /// The record's `id` is ignored.
    async fn create_record(&self, zone_id: &str, record: &DnsRecord) -> Result<(), crate::Error>;

    /// Overwrite the record addressed by `record.id` in zone `zone_id`
    ///
    /// Only type, name, content, ttl and proxy flag are sent; the
    /// annotation on the remote record is left untouched.
    async fn update_record(&self, zone_id: &str, record: &DnsRecord) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
