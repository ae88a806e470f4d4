//! Core traits for the record synchronization system
//!
//! - [`DnsProvider`]: Read and write DNS records via provider APIs

pub mod dns_provider;

pub use dns_provider::{DnsProvider, DnsRecord, Zone};
