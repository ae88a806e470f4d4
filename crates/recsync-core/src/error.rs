//! Error types for the record synchronization system
//!
//! This module defines all error types used throughout the crate.
//! Record absence is not represented here: a missing record is data
//! (`Option::None`), not a failure.

use std::fmt;
use thiserror::Error;

/// Result type alias for recsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the record synchronization system
#[derive(Error, Debug)]
pub enum Error {
    /// Network or connection failure reaching the provider
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body could not be decoded as expected
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Provider responded but signaled a logical failure
    #[error("Provider rejected request (status {status}): {message}")]
    ProviderRejected {
        /// HTTP status code returned by the provider
        status: u16,
        /// Provider error message, or the raw body when none was decodable
        message: String,
    },

    /// No zone matches the registrable domain
    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    /// Domain has fewer than two labels or an empty label
    #[error("Invalid domain: '{0}'")]
    InvalidDomain(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input passed by a caller
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An error annotated with the pipeline step in which it occurred
    #[error("can't {step}: {source}")]
    Step {
        /// The failing step
        step: SyncStep,
        /// The underlying error
        #[source]
        source: Box<Error>,
    },
}

/// A step of the linear sync pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    /// Reduce the domain and look up the zone identifier
    ResolveZone,
    /// Fetch the current record by name
    FetchRecord,
    /// Create a missing record
    CreateRecord,
    /// Update a divergent record
    UpdateRecord,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            SyncStep::ResolveZone => "resolve zone",
            SyncStep::FetchRecord => "fetch record",
            SyncStep::CreateRecord => "create record",
            SyncStep::UpdateRecord => "update record",
        };
        f.write_str(step)
    }
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a provider rejection error
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::ProviderRejected {
            status,
            message: message.into(),
        }
    }

    /// Create a "zone not found" error
    pub fn zone_not_found(zone: impl Into<String>) -> Self {
        Self::ZoneNotFound(zone.into())
    }

    /// Create an invalid domain error
    pub fn invalid_domain(domain: impl Into<String>) -> Self {
        Self::InvalidDomain(domain.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Attach the pipeline step to this error
    pub fn at(self, step: SyncStep) -> Self {
        Self::Step {
            step,
            source: Box::new(self),
        }
    }

    /// The step this error was raised in, if it was annotated with one
    pub fn step(&self) -> Option<SyncStep> {
        match self {
            Self::Step { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Short category name of the underlying error, for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Protocol(_) => "protocol",
            Self::ProviderRejected { .. } => "provider_rejected",
            Self::ZoneNotFound(_) => "zone_not_found",
            Self::InvalidDomain(_) => "invalid_domain",
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
            Self::Step { source, .. } => source.kind(),
        }
    }
}
