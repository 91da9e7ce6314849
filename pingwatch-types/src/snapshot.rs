//! Snapshot - a point-in-time view of entity connection states.

use alloc::string::String;
use alloc::vec::Vec;

use crate::{EntityId, EntityStatus, StatusValue};

/// Aggregate counters reported alongside a snapshot.
///
/// Only indicator rendering consumes these; the change detection works on
/// the per-entity records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusCounts {
    pub total: u64,
    pub connected: u64,
    pub failed: u64,
    pub error: u64,
}

impl StatusCounts {
    /// Derive counters from a list of entity records.
    ///
    /// `disconnected` and unrecognised statuses only count toward `total`.
    pub fn from_entities(entities: &[EntityStatus]) -> Self {
        entities.iter().fold(Self::default(), |mut counts, entity| {
            counts.total += 1;
            match entity.status {
                StatusValue::Connected => counts.connected += 1,
                StatusValue::Failed => counts.failed += 1,
                StatusValue::Error => counts.error += 1,
                _ => {}
            }
            counts
        })
    }

    /// Entities in `failed` or `error` state.
    pub fn unhealthy(&self) -> u64 {
        self.failed + self.error
    }
}

/// A point-in-time collection of entity statuses.
///
/// Snapshots are produced by a status fetcher once per poll and consumed
/// read-only by the monitor. Entity order is the order the backend reported.
///
/// # Example
///
/// ```rust
/// use pingwatch_types::{Snapshot, StatusValue};
///
/// let snapshot = Snapshot::builder()
///     .entity(1, "connected", |e| e.name("Primary"))
///     .build();
///
/// let primary = snapshot.get(&1.into()).unwrap();
/// assert_eq!(primary.status, StatusValue::Connected);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Unix timestamp in milliseconds when this snapshot was taken.
    pub timestamp_ms: u64,

    /// Entity records in backend order.
    pub entities: Vec<EntityStatus>,

    /// Aggregate counters for indicator rendering.
    pub counts: StatusCounts,
}

impl Snapshot {
    /// Create a snapshot from entity records, deriving the counters.
    #[cfg(feature = "std")]
    pub fn new(entities: Vec<EntityStatus>) -> Self {
        Self::with_timestamp(current_timestamp_ms(), entities)
    }

    /// Create a snapshot with a specific timestamp, deriving the counters.
    pub fn with_timestamp(timestamp_ms: u64, entities: Vec<EntityStatus>) -> Self {
        let counts = StatusCounts::from_entities(&entities);
        Self {
            timestamp_ms,
            entities,
            counts,
        }
    }

    /// Create a builder for constructing snapshots.
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::new()
    }

    /// Check if the snapshot is empty (no entities).
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of entities in the snapshot.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Get the record for a specific entity.
    pub fn get(&self, id: &EntityId) -> Option<&EntityStatus> {
        self.entities.iter().find(|e| &e.id == id)
    }

    /// Iterate over all entities in backend order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityStatus> {
        self.entities.iter()
    }
}

/// Builder for constructing `Snapshot` instances.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    timestamp_ms: Option<u64>,
    entities: Vec<EntityStatus>,
    counts: Option<StatusCounts>,
}

impl SnapshotBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a specific timestamp (milliseconds since Unix epoch).
    pub fn timestamp_ms(mut self, ts: u64) -> Self {
        self.timestamp_ms = Some(ts);
        self
    }

    /// Add an entity, configuring optional fields with a closure.
    pub fn entity<F>(
        mut self,
        id: impl Into<EntityId>,
        status: impl Into<StatusValue>,
        f: F,
    ) -> Self
    where
        F: FnOnce(EntityBuilder) -> EntityBuilder,
    {
        let entity = f(EntityBuilder::new(id.into(), status.into())).build();
        self.entities.push(entity);
        self
    }

    /// Add a pre-built entity record.
    pub fn entity_status(mut self, entity: EntityStatus) -> Self {
        self.entities.push(entity);
        self
    }

    /// Use backend-supplied counters instead of deriving them.
    pub fn counts(mut self, counts: StatusCounts) -> Self {
        self.counts = Some(counts);
        self
    }

    /// Build the snapshot.
    #[cfg(feature = "std")]
    pub fn build(self) -> Snapshot {
        let timestamp_ms = self.timestamp_ms.unwrap_or_else(current_timestamp_ms);
        self.finish(timestamp_ms)
    }

    /// Build the snapshot with a specific timestamp (for no_std).
    #[cfg(not(feature = "std"))]
    pub fn build(self) -> Snapshot {
        let timestamp_ms = self.timestamp_ms.unwrap_or(0);
        self.finish(timestamp_ms)
    }

    fn finish(self, timestamp_ms: u64) -> Snapshot {
        let counts = self
            .counts
            .unwrap_or_else(|| StatusCounts::from_entities(&self.entities));
        Snapshot {
            timestamp_ms,
            entities: self.entities,
            counts,
        }
    }
}

/// Builder for a single entity record.
#[derive(Debug)]
pub struct EntityBuilder {
    entity: EntityStatus,
}

impl EntityBuilder {
    fn new(id: EntityId, status: StatusValue) -> Self {
        Self {
            entity: EntityStatus {
                id,
                status,
                name: None,
                broker: None,
            },
        }
    }

    /// Set the account name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.entity.name = Some(name.into());
        self
    }

    /// Set the broker name.
    pub fn broker(mut self, broker: impl Into<String>) -> Self {
        self.entity.broker = Some(broker.into());
        self
    }

    fn build(self) -> EntityStatus {
        self.entity
    }
}

/// Get current timestamp in milliseconds since Unix epoch.
#[cfg(feature = "std")]
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
