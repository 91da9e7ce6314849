//! Last-known status per entity.

use std::collections::HashMap;

use pingwatch_types::{EntityId, EntityStatus, StatusValue};

/// A change of status for one entity between two observations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: StatusValue,
    pub to: StatusValue,
}

/// Memory of each entity's last observed status.
///
/// Entries are only ever overwritten with newer observations; entities that
/// stop being reported keep their last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusTable {
    entries: HashMap<EntityId, StatusValue>,
}

impl StatusTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation, returning the transition if the entity was
    /// known and its status changed.
    ///
    /// The first observation of an entity only establishes a baseline, and
    /// so does the first real status after an [`StatusValue::Unknown`] one.
    pub fn observe(&mut self, entity: &EntityStatus) -> Option<Transition> {
        let previous = self
            .entries
            .insert(entity.id.clone(), entity.status.clone())?;

        if previous == entity.status || previous.is_unknown() {
            None
        } else {
            Some(Transition {
                from: previous,
                to: entity.status.clone(),
            })
        }
    }

    pub fn get(&self, id: &EntityId) -> Option<&StatusValue> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &StatusValue)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_is_baseline() {
        let mut table = StatusTable::new();
        assert_eq!(table.observe(&EntityStatus::new(1, "failed")), None);
        assert_eq!(table.get(&1.into()), Some(&StatusValue::Failed));
    }

    #[test]
    fn test_change_is_reported() {
        let mut table = StatusTable::new();
        table.observe(&EntityStatus::new(1, "connected"));

        let transition = table.observe(&EntityStatus::new(1, "error")).unwrap();
        assert_eq!(transition.from, StatusValue::Connected);
        assert_eq!(transition.to, StatusValue::Error);
        assert_eq!(table.get(&1.into()), Some(&StatusValue::Error));
    }

    #[test]
    fn test_unknown_status_resets_baseline() {
        let mut table = StatusTable::new();
        table.observe(&EntityStatus::new(1, "connected"));

        let transition = table.observe(&EntityStatus::new(1, StatusValue::Unknown));
        assert_eq!(transition.map(|t| t.to), Some(StatusValue::Unknown));
        assert_eq!(table.get(&1.into()), Some(&StatusValue::Unknown));

        assert_eq!(table.observe(&EntityStatus::new(1, "failed")), None);
        assert_eq!(table.get(&1.into()), Some(&StatusValue::Failed));
    }

    #[test]
    fn test_repeat_is_not_a_change() {
        let mut table = StatusTable::new();
        table.observe(&EntityStatus::new("a", "maintenance"));
        assert_eq!(table.observe(&EntityStatus::new("a", "maintenance")), None);
        assert_eq!(table.len(), 1);
    }
}
