//! Configuration types for the record synchronization system
//!
//! A [`SyncConfig`] is built once at startup, validated once, and then
//! handed to the engine. Loading it from the process environment lives in
//! the binary; this module only knows about named lookups.

use serde::{Deserialize, Serialize};

use crate::reconcile::DesiredRecord;

/// Record type managed by this system
pub const CNAME_RECORD_TYPE: &str = "CNAME";

/// TTL applied to newly created records (1 hour)
pub const DEFAULT_TTL: u32 = 3600;

/// Proxy flag applied to newly created records
pub const DEFAULT_PROXIED: bool = true;

/// Environment key holding the provider API token
pub const ENV_API_TOKEN: &str = "INPUT_CLOUDFLARE_API_TOKEN";
/// Environment key holding the fully-qualified record name
pub const ENV_DOMAIN: &str = "INPUT_DOMAIN";
/// Environment key holding the desired record content
pub const ENV_TARGET: &str = "INPUT_TARGET";
/// Environment key holding the optional annotation for new records
pub const ENV_COMMENT: &str = "INPUT_COMMENT";
/// Environment key selecting live or dry-run mode
pub const ENV_MODE: &str = "RECSYNC_MODE";

/// Execution mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// Reads and mutations are both performed
    #[default]
    Live,
    /// Reads are performed, mutations are only logged
    DryRun,
}

impl SyncMode {
    /// Parse a mode name (`live` or `dry-run`, case-insensitive)
    pub fn parse(value: &str) -> Result<Self, crate::Error> {
        match value.trim().to_lowercase().as_str() {
            "" | "live" => Ok(SyncMode::Live),
            "dry-run" | "dry_run" | "dryrun" => Ok(SyncMode::DryRun),
            other => Err(crate::Error::config(format!(
                "{ENV_MODE} '{other}' is not valid. Valid modes: live, dry-run"
            ))),
        }
    }

    /// Whether mutations should be skipped
    pub fn is_dry_run(self) -> bool {
        self == SyncMode::DryRun
    }
}

/// Main synchronization configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Provider API token
    /// ⚠️ NEVER log this value
    #[serde(skip_serializing)]
    pub api_token: String,

    /// Fully-qualified record name (e.g., "app.example.com")
    pub domain: String,

    /// Desired record content (hostname or IP literal)
    pub target: String,

    /// Optional annotation attached to newly created records
    #[serde(default)]
    pub comment: Option<String>,

    /// Live or dry-run
    #[serde(default)]
    pub mode: SyncMode,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("api_token", &"<REDACTED>")
            .field("domain", &self.domain)
            .field("target", &self.target)
            .field("comment", &self.comment)
            .field("mode", &self.mode)
            .finish()
    }
}

impl SyncConfig {
    /// Create a live configuration from the three required inputs
    pub fn new(
        api_token: impl Into<String>,
        domain: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            api_token: api_token.into(),
            domain: domain.into(),
            target: target.into(),
            comment: None,
            mode: SyncMode::Live,
        }
    }

    /// Set the annotation for newly created records
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the execution mode
    pub fn with_mode(mut self, mode: SyncMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build a configuration from a key lookup
    ///
    /// Required keys fail fast with the name of the first missing one.
    /// Values are trimmed; blank values count as missing. The result is
    /// validated before it is returned.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, crate::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| crate::Error::config(format!("{key} is required")))
        };

        let mut config = Self::new(
            required(ENV_API_TOKEN)?,
            required(ENV_DOMAIN)?,
            required(ENV_TARGET)?,
        );

        config.comment = lookup(ENV_COMMENT)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        if let Some(mode) = lookup(ENV_MODE) {
            config.mode = SyncMode::parse(&mode)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_token.trim().is_empty() {
            return Err(crate::Error::config("API token cannot be empty"));
        }

        if self.domain.trim().is_empty() {
            return Err(crate::Error::config("Domain cannot be empty"));
        }

        if self.target.trim().is_empty() {
            return Err(crate::Error::config("Target cannot be empty"));
        }

        // Fail before any network call if the zone can't be derived
        crate::zone::registrable_zone(&self.domain)?;

        Ok(())
    }

    /// The desired record state this configuration describes
    ///
    /// The record name is normalized to the form the provider stores:
    /// trimmed, with one trailing root dot removed.
    pub fn desired_record(&self) -> DesiredRecord {
        let domain = self.domain.trim();
        DesiredRecord {
            name: domain.strip_suffix('.').unwrap_or(domain).to_string(),
            record_type: CNAME_RECORD_TYPE.to_string(),
            content: self.target.trim().to_string(),
            ttl: DEFAULT_TTL,
            proxied: DEFAULT_PROXIED,
            comment: self.comment.clone(),
        }
    }
}
