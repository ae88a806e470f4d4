// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare implementation of `recsync_core::DnsProvider`.
//
// ## Behavior
//
// - ✅ Exactly one HTTP request per trait call
// - ✅ Full error propagation (transport, protocol, rejection, zone not found)
// - ✅ Zero-match record lookups are `Ok(None)`, not errors
// - ✅ Zero-match zone lookups are `Error::ZoneNotFound`, never an index panic
// - ❌ NO retry or backoff (a failed call ends the run)
// - ❌ NO timeout override (reqwest defaults apply)
// - ❌ NO caching (zones are looked up fresh on every run)
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Provider construction fails if the token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

mod types;

use async_trait::async_trait;
use recsync_core::config::SyncConfig;
use recsync_core::traits::{DnsProvider, DnsRecord};
use recsync_core::{Error, Result};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::types::{CloudflareResponse, CloudflareZone, CreateRecordBody, UpdateRecordBody};

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Longest raw body excerpt carried in an error message
const MAX_ERROR_BODY: usize = 512;

/// Cloudflare DNS provider
///
/// Stateless: every method maps to a single API call.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL, without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:Read and DNS:Edit permissions
    ///
    /// # Errors
    ///
    /// `Error::Config` if the token is empty.
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        Ok(Self {
            api_token,
            base_url: CLOUDFLARE_API_BASE.to_string(),
            client: reqwest::Client::new(),
        })
    }

    /// Create a provider from a sync configuration
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        Self::new(config.api_token.clone())
    }

    /// Point the provider at a different API base URL
    ///
    /// Used to target a mock server in tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The API base URL in use
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an authenticated request
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        self.client
            .request(method, url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
    }

    /// Send a request and read the full body
    ///
    /// Only transport failures are errors here; status handling is up to
    /// the caller.
    async fn dispatch(&self, request: RequestBuilder, op: &str) -> Result<(StatusCode, String)> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(format!("{op}: HTTP request failed: {e}")))?;

        let status = response.status();
        tracing::debug!("{op}: response status {status}");

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("{op}: failed to read response body: {e}")))?;

        Ok((status, body))
    }

    /// Decode the response envelope and check both status and `success`
    fn decode<T: DeserializeOwned>(
        status: StatusCode,
        body: &str,
        op: &str,
    ) -> Result<CloudflareResponse<T>> {
        let envelope: CloudflareResponse<T> = match serde_json::from_str(body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(Error::protocol(format!(
                    "{op}: failed to parse response: {e}"
                )));
            }
            Err(_) => return Err(Error::rejected(status.as_u16(), excerpt(body))),
        };

        if !envelope.success || !status.is_success() {
            let message = envelope
                .first_error()
                .unwrap_or_else(|| format!("{op}: response not successful"));
            return Err(Error::rejected(status.as_u16(), message));
        }

        Ok(envelope)
    }
}

/// Bound a raw body for inclusion in an error message
fn excerpt(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "<empty body>".to_string();
    }
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// # API Call
    ///
    /// ```http
    /// GET /zones?name=example.com
    /// Authorization: Bearer <token>
    /// ```
    async fn zone_id(&self, zone_name: &str) -> Result<String> {
        let request = self
            .request(Method::GET, "/zones")
            .query(&[("name", zone_name)]);
        let (status, body) = self.dispatch(request, "zone lookup").await?;

        let envelope: CloudflareResponse<Vec<CloudflareZone>> =
            Self::decode(status, &body, "zone lookup")?;
        let zones = envelope
            .result
            .ok_or_else(|| Error::protocol("zone lookup: response has no result"))?;

        let zone = zones
            .into_iter()
            .next()
            .ok_or_else(|| Error::zone_not_found(zone_name))?;

        tracing::debug!("Found zone ID: {}", zone.id);
        Ok(zone.id)
    }

    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?name=app.example.com
    /// Authorization: Bearer <token>
    /// ```
    async fn get_record(&self, zone_id: &str, name: &str) -> Result<Option<DnsRecord>> {
        let request = self
            .request(Method::GET, &format!("/zones/{zone_id}/dns_records"))
            .query(&[("name", name)]);
        let (status, body) = self.dispatch(request, "record lookup").await?;

        let envelope: CloudflareResponse<Vec<DnsRecord>> =
            Self::decode(status, &body, "record lookup")?;
        let records = envelope
            .result
            .ok_or_else(|| Error::protocol("record lookup: response has no result"))?;

        if records.len() > 1 {
            tracing::warn!(
                "{} records match {}, using the first one",
                records.len(),
                name
            );
        }

        let record = records.into_iter().next();
        if record.is_none() {
            tracing::debug!("Record not found: {}", name);
        }
        Ok(record)
    }

    /// # API Call
    ///
    /// ```http
    /// POST /zones/:zone_id/dns_records
    /// {"name": "...", "type": "CNAME", "content": "...", "ttl": 3600, "proxied": true}
    /// ```
    async fn create_record(&self, zone_id: &str, record: &DnsRecord) -> Result<()> {
        let request = self
            .request(Method::POST, &format!("/zones/{zone_id}/dns_records"))
            .json(&CreateRecordBody::from(record));
        let (status, body) = self.dispatch(request, "create record").await?;

        Self::decode::<serde_json::Value>(status, &body, "create record")?;
        Ok(())
    }

    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// {"type": "CNAME", "name": "...", "content": "...", "ttl": 3600, "proxied": true}
    /// ```
    async fn update_record(&self, zone_id: &str, record: &DnsRecord) -> Result<()> {
        let record_id = record
            .id
            .as_deref()
            .ok_or_else(|| Error::invalid_input("cannot update a record without an id"))?;

        let request = self
            .request(
                Method::PUT,
                &format!("/zones/{zone_id}/dns_records/{record_id}"),
            )
            .json(&UpdateRecordBody::from(record));
        let (status, body) = self.dispatch(request, "update record").await?;

        if status != StatusCode::OK {
            let message = serde_json::from_str::<CloudflareResponse<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.first_error())
                .unwrap_or_else(|| excerpt(&body));
            return Err(Error::rejected(status.as_u16(), message));
        }

        Self::decode::<serde_json::Value>(status, &body, "update record")?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}
