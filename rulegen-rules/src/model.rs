use serde::Serialize;
use tracing::debug;

use crate::condition::{Condition, ConditionId, ConditionPatch};
use crate::tag::AttributeKey;

/// Ordered, single-owner sequence of conditions being edited.
///
/// Operations addressing an unknown id are silent no-ops.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConditionModel {
    conditions: Vec<Condition>,
}

impl ConditionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a blank `field` condition and returns its id.
    pub fn add(&mut self) -> ConditionId {
        let condition = Condition::blank();
        let id = condition.id;
        self.conditions.push(condition);
        debug!(condition_id = %id, position = self.conditions.len() - 1, "condition added");
        id
    }

    /// Merges `patch` into the condition identified by `id`.
    pub fn update(&mut self, id: ConditionId, patch: ConditionPatch) {
        match self.find_mut(id) {
            Some(condition) => {
                let retagged = patch.tag.is_some();
                condition.apply(patch);
                debug!(condition_id = %id, tag = %condition.tag, retagged, "condition updated");
            }
            None => debug!(condition_id = %id, "update ignored for unknown condition"),
        }
    }

    /// Sets or clears a single attribute. Absent, empty and `"no"` values
    /// remove the key.
    pub fn update_attribute(&mut self, id: ConditionId, key: AttributeKey, value: Option<&str>) {
        match self.find_mut(id) {
            Some(condition) => {
                condition.attributes.set(key, value);
                debug!(
                    condition_id = %id,
                    attribute = %key,
                    stored = condition.attributes.contains(key),
                    "condition attribute updated"
                );
            }
            None => debug!(condition_id = %id, "attribute update ignored for unknown condition"),
        }
    }

    /// Removes the condition identified by `id`.
    pub fn remove(&mut self, id: ConditionId) {
        let before = self.conditions.len();
        self.conditions.retain(|condition| condition.id != id);
        if self.conditions.len() != before {
            debug!(condition_id = %id, "condition removed");
        }
    }

    pub fn get(&self, id: ConditionId) -> Option<&Condition> {
        self.conditions.iter().find(|condition| condition.id == id)
    }

    pub fn position(&self, id: ConditionId) -> Option<usize> {
        self.conditions.iter().position(|condition| condition.id == id)
    }

    /// Borrow the conditions in render order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.conditions.iter()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    fn find_mut(&mut self, id: ConditionId) -> Option<&mut Condition> {
        self.conditions.iter_mut().find(|condition| condition.id == id)
    }
}

impl<'a> IntoIterator for &'a ConditionModel {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.conditions.iter()
    }
}
