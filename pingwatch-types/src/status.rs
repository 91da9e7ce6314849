//! Entity identifiers, status values and per-entity records.

use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;

/// Opaque identifier for a monitored account/connection.
///
/// Backends hand out either numeric or string ids. The two forms are kept
/// distinct: `1` and `"1"` are different entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum EntityId {
    /// Numeric id (database primary keys).
    Int(i64),
    /// Free-form string id.
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(id) => write!(f, "{}", id),
            EntityId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        EntityId::Int(id)
    }
}

impl From<i32> for EntityId {
    fn from(id: i32) -> Self {
        EntityId::Int(id.into())
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        EntityId::Text(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        EntityId::Text(id)
    }
}

/// Connection status reported by the backend.
///
/// The status domain is open: values other than the four known ones are
/// carried verbatim in [`StatusValue::Other`] and compared by string
/// equality, so a backend can introduce new states without breaking
/// consumers. A `null` or missing status is [`StatusValue::Unknown`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Option<String>", into = "Option<String>")
)]
pub enum StatusValue {
    Connected,
    Disconnected,
    Failed,
    Error,
    /// Any status string not listed above.
    Other(String),
    /// The backend did not report a status.
    #[default]
    Unknown,
}

impl StatusValue {
    /// The wire representation of this status.
    pub fn as_str(&self) -> &str {
        match self {
            StatusValue::Connected => "connected",
            StatusValue::Disconnected => "disconnected",
            StatusValue::Failed => "failed",
            StatusValue::Error => "error",
            StatusValue::Other(s) => s,
            StatusValue::Unknown => "unknown",
        }
    }

    /// Returns true for the states a connection can recover from:
    /// `failed`, `error` and `disconnected`.
    pub fn is_problem(&self) -> bool {
        matches!(
            self,
            StatusValue::Failed | StatusValue::Error | StatusValue::Disconnected
        )
    }

    /// Returns true if the status is one of the four known values.
    pub fn is_known(&self) -> bool {
        !matches!(self, StatusValue::Other(_) | StatusValue::Unknown)
    }

    /// Returns true if the backend reported no status at all.
    pub fn is_unknown(&self) -> bool {
        matches!(self, StatusValue::Unknown)
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for StatusValue {
    fn from(s: &str) -> Self {
        match s {
            "connected" => StatusValue::Connected,
            "disconnected" => StatusValue::Disconnected,
            "failed" => StatusValue::Failed,
            "error" => StatusValue::Error,
            other => StatusValue::Other(other.to_string()),
        }
    }
}

impl From<String> for StatusValue {
    fn from(s: String) -> Self {
        match s.as_str() {
            "connected" | "disconnected" | "failed" | "error" => StatusValue::from(s.as_str()),
            _ => StatusValue::Other(s),
        }
    }
}

impl From<Option<String>> for StatusValue {
    fn from(s: Option<String>) -> Self {
        s.map_or(StatusValue::Unknown, StatusValue::from)
    }
}

impl From<StatusValue> for Option<String> {
    fn from(status: StatusValue) -> Self {
        match status {
            StatusValue::Unknown => None,
            StatusValue::Other(s) => Some(s),
            known => Some(known.as_str().to_string()),
        }
    }
}

/// The observed state of one entity inside a snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityStatus {
    /// Identifier of the account/connection.
    pub id: EntityId,

    /// Current connection status.
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: StatusValue,

    /// User-facing account name.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub name: Option<String>,

    /// Broker the account belongs to; used as a fallback display name.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub broker: Option<String>,
}

impl EntityStatus {
    /// Create a record with no name or broker.
    pub fn new(id: impl Into<EntityId>, status: impl Into<StatusValue>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            name: None,
            broker: None,
        }
    }

    /// Name shown in notifications and indicators.
    ///
    /// Falls back from the account name to the broker name to `Account {id}`.
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.broker.as_deref().filter(|b| !b.is_empty()))
            .map(|n| n.to_string())
            .unwrap_or_else(|| format!("Account {}", self.id))
    }
}
