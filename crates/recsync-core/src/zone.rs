//! Zone resolution
//!
//! Maps a fully-qualified record name to the provider zone that hosts it.
//!
//! ## Limitation
//!
//! The registrable domain is taken to be the last two labels. This is
//! wrong for multi-part public suffixes: `"app.example.co.uk"` reduces to
//! `"co.uk"`, and the provider lookup will then fail with
//! [`Error::ZoneNotFound`].

use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::{DnsProvider, Zone};

/// Reduce `domain` to its registrable zone (last two labels)
///
/// A single trailing dot is accepted. Fewer than two labels, or any
/// empty label, is [`Error::InvalidDomain`].
///
/// ```
/// use recsync_core::zone::registrable_zone;
///
/// assert_eq!(registrable_zone("a.b.example.com").unwrap(), "example.com");
/// assert!(registrable_zone("example").is_err());
/// ```
pub fn registrable_zone(domain: &str) -> Result<String> {
    let trimmed = domain.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);

    let labels: Vec<&str> = trimmed.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(Error::invalid_domain(domain));
    }

    let n = labels.len();
    Ok(format!("{}.{}", labels[n - 2], labels[n - 1]))
}

/// Resolves record names to provider zones
pub struct ZoneResolver<'a> {
    provider: &'a dyn DnsProvider,
}

impl<'a> ZoneResolver<'a> {
    /// Create a resolver backed by `provider`
    pub fn new(provider: &'a dyn DnsProvider) -> Self {
        Self { provider }
    }

    /// Find the zone hosting `domain`
    ///
    /// Domain parsing happens before any provider call, so an
    /// [`Error::InvalidDomain`] never costs a request.
    pub async fn resolve(&self, domain: &str) -> Result<Zone> {
        let name = registrable_zone(domain)?;
        debug!(zone = %name, "Looking up zone ID");

        let id = self.provider.zone_id(&name).await?;
        debug!(zone = %name, zone_id = %id, "Found zone ID");

        Ok(Zone { id, name })
    }
}
