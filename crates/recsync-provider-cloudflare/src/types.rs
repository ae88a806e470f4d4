//! Cloudflare API v4 wire types

use recsync_core::DnsRecord;
use serde::{Deserialize, Serialize};

/// Envelope carried by every Cloudflare API response
#[derive(Debug, Deserialize)]
pub(crate) struct CloudflareResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub errors: Vec<CloudflareApiError>,
}

impl<T> CloudflareResponse<T> {
    /// First error as "message (code N)", if the provider sent any
    pub fn first_error(&self) -> Option<String> {
        self.errors
            .first()
            .map(|e| format!("{} (code {})", e.message, e.code))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CloudflareApiError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Zone entry from `GET /zones`
#[derive(Debug, Deserialize)]
pub(crate) struct CloudflareZone {
    pub id: String,
}

/// Body of `POST /zones/:zone_id/dns_records`
#[derive(Debug, Serialize)]
pub(crate) struct CreateRecordBody<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub content: &'a str,
    pub ttl: u32,
    pub proxied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<&'a str>,
}

impl<'a> From<&'a DnsRecord> for CreateRecordBody<'a> {
    fn from(record: &'a DnsRecord) -> Self {
        Self {
            name: &record.name,
            record_type: &record.record_type,
            content: &record.content,
            ttl: record.ttl,
            proxied: record.proxied,
            comment: record.comment.as_deref(),
        }
    }
}

/// Body of `PUT /zones/:zone_id/dns_records/:record_id`
///
/// The id is addressed via the URL and the comment is left untouched,
/// so neither is serialized.
#[derive(Debug, Serialize)]
pub(crate) struct UpdateRecordBody<'a> {
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub name: &'a str,
    pub content: &'a str,
    pub ttl: u32,
    pub proxied: bool,
}

impl<'a> From<&'a DnsRecord> for UpdateRecordBody<'a> {
    fn from(record: &'a DnsRecord) -> Self {
        Self {
            record_type: &record.record_type,
            name: &record.name,
            content: &record.content,
            ttl: record.ttl,
            proxied: record.proxied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> DnsRecord {
        DnsRecord {
            id: Some("abc".to_string()),
            name: "x.example.com".to_string(),
            record_type: "CNAME".to_string(),
            content: "new".to_string(),
            ttl: 3600,
            proxied: true,
            comment: Some("c".to_string()),
        }
    }

    #[test]
    fn update_body_omits_id_and_comment() {
        let record = record();
        let body = serde_json::to_value(UpdateRecordBody::from(&record)).unwrap();

        assert_eq!(
            body,
            json!({
                "type": "CNAME",
                "name": "x.example.com",
                "content": "new",
                "ttl": 3600,
                "proxied": true
            })
        );
    }

    #[test]
    fn create_body_includes_comment_only_when_set() {
        let mut record = record();
        let with_comment = serde_json::to_value(CreateRecordBody::from(&record)).unwrap();
        assert_eq!(with_comment["comment"], "c");
        assert!(with_comment.get("id").is_none());

        record.comment = None;
        let without = serde_json::to_value(CreateRecordBody::from(&record)).unwrap();
        assert!(without.get("comment").is_none());
    }

    #[test]
    fn envelope_without_result_or_errors_parses() {
        let envelope: CloudflareResponse<Vec<CloudflareZone>> =
            serde_json::from_str(r#"{"success": false}"#).unwrap();

        assert!(!envelope.success);
        assert!(envelope.result.is_none());
        assert!(envelope.first_error().is_none());
    }

    #[test]
    fn envelope_first_error_formats_code() {
        let envelope: CloudflareResponse<serde_json::Value> = serde_json::from_str(
            r#"{"success": false, "result": null, "errors": [{"code": 9109, "message": "Invalid access token"}]}"#,
        )
        .unwrap();

        assert_eq!(
            envelope.first_error().as_deref(),
            Some("Invalid access token (code 9109)")
        );
    }
}
