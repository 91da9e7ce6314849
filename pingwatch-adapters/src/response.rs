//! Wire format of the status endpoint.
//!
//! A status response is a JSON object with a top-level `status`
//! discriminator. On success it carries the account list and, optionally,
//! aggregate counters spread into the same object:
//!
//! ```json
//! {
//!   "status": "success",
//!   "accounts": [
//!     {"id": 1, "name": "Primary", "broker": "zerodha", "status": "connected"}
//!   ],
//!   "total": 1, "connected": 1, "failed": 0, "error": 0
//! }
//! ```
//!
//! Anything else in `status` is a failure, usually with a `message`.

use serde::Deserialize;

use pingwatch_types::{current_timestamp_ms, EntityStatus, Snapshot, StatusCounts};

use crate::AdapterError;

const SUCCESS: &str = "success";

/// Raw status response as sent by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    /// Discriminator: `"success"` or a failure marker such as `"error"`.
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub accounts: Option<Vec<EntityStatus>>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub connected: Option<u64>,
    #[serde(default)]
    pub failed: Option<u64>,
    #[serde(default)]
    pub error: Option<u64>,
}

impl StatusResponse {
    /// Returns true if the discriminator reports success.
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS
    }

    /// Convert into a snapshot, rejecting failure responses.
    pub fn into_snapshot(self) -> Result<Snapshot, AdapterError> {
        if !self.is_success() {
            let message = self
                .message
                .unwrap_or_else(|| format!("status '{}'", self.status));
            return Err(AdapterError::Rejected(message));
        }

        let entities = self.accounts.ok_or(AdapterError::MissingEntities)?;

        let counts = match self.total {
            Some(total) => StatusCounts {
                total,
                connected: self.connected.unwrap_or(0),
                failed: self.failed.unwrap_or(0),
                error: self.error.unwrap_or(0),
            },
            None => StatusCounts::from_entities(&entities),
        };

        Ok(Snapshot {
            timestamp_ms: current_timestamp_ms(),
            entities,
            counts,
        })
    }
}

/// Parse a status response body into a snapshot.
pub fn parse_response(body: &str) -> Result<Snapshot, AdapterError> {
    let response: StatusResponse = serde_json::from_str(body)?;
    response.into_snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pingwatch_types::{EntityId, StatusValue};

    #[test]
    fn test_parse_success() {
        let body = r#"{
            "status": "success",
            "accounts": [
                {"id": 1, "name": "Primary", "broker": "zerodha", "status": "connected"},
                {"id": 2, "name": "Hedge", "status": "failed"}
            ],
            "total": 2,
            "connected": 1,
            "failed": 1,
            "error": 0
        }"#;

        let snapshot = parse_response(body).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.entities[0].id, EntityId::Int(1));
        assert_eq!(snapshot.entities[1].status, StatusValue::Failed);
        assert_eq!(snapshot.counts.total, 2);
        assert_eq!(snapshot.counts.failed, 1);
    }

    #[test]
    fn test_counts_derived_when_absent() {
        let body = r#"{
            "status": "success",
            "accounts": [
                {"id": 1, "status": "error"},
                {"id": 2, "status": "error"},
                {"id": 3, "status": "connected"}
            ]
        }"#;

        let snapshot = parse_response(body).unwrap();
        assert_eq!(
            snapshot.counts,
            StatusCounts {
                total: 3,
                connected: 1,
                failed: 0,
                error: 2,
            }
        );
    }

    #[test]
    fn test_null_status_keeps_other_accounts() {
        let body = r#"{
            "status": "success",
            "accounts": [
                {"id": 1, "name": "Primary", "status": "failed"},
                {"id": 2, "name": "Hedge", "status": null}
            ]
        }"#;

        let snapshot = parse_response(body).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.entities[0].status, StatusValue::Failed);
        assert_eq!(snapshot.entities[1].status, StatusValue::Unknown);
        assert_eq!(snapshot.counts.total, 2);
        assert_eq!(snapshot.counts.failed, 1);
    }

    #[test]
    fn test_failure_discriminator() {
        let body = r#"{"status": "error", "message": "Failed to get ping status: boom"}"#;

        let err = parse_response(body).unwrap_err();
        assert!(matches!(err, AdapterError::Rejected(ref m) if m.contains("boom")));
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[test]
    fn test_failure_without_message() {
        let err = parse_response(r#"{"status": "degraded"}"#).unwrap_err();
        assert!(matches!(err, AdapterError::Rejected(ref m) if m.contains("degraded")));
    }

    #[test]
    fn test_missing_accounts() {
        let err = parse_response(r#"{"status": "success", "total": 0}"#).unwrap_err();
        assert!(matches!(err, AdapterError::MissingEntities));
    }

    #[test]
    fn test_malformed_body() {
        let err = parse_response("<html>login</html>").unwrap_err();
        assert!(matches!(err, AdapterError::Parse(_)));
    }
}
