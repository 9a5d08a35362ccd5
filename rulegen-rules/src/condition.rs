use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::attributes::AttributeBag;
use crate::tag::{AttributeKey, RuleTag};

/// Opaque handle addressing a condition inside a [`crate::ConditionModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConditionId(Uuid);

impl ConditionId {
    pub(crate) fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One child element of a rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub id: ConditionId,
    pub tag: RuleTag,
    pub value: String,
    pub attributes: AttributeBag,
}

impl Condition {
    /// A fresh `field` condition with no content and no attributes.
    pub(crate) fn blank() -> Self {
        Self {
            id: ConditionId::mint(),
            tag: RuleTag::default(),
            value: String::new(),
            attributes: AttributeBag::new(),
        }
    }

    /// Attributes that are stored but not legal for the current tag.
    pub fn stray_attributes(&self) -> impl Iterator<Item = AttributeKey> + '_ {
        self.attributes
            .keys()
            .filter(move |key| !self.tag.allows(*key))
    }

    /// Applies a partial update. A tag in the patch resets the attribute bag,
    /// and an attribute bag in the patch replaces the stored one (pruned).
    pub(crate) fn apply(&mut self, patch: ConditionPatch) {
        if let Some(tag) = patch.tag {
            self.tag = tag;
            self.attributes.clear();
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(attributes) = patch.attributes {
            self.attributes.clear();
            self.attributes.merge(&attributes);
        }
    }
}

/// Partial update for a condition. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionPatch {
    pub tag: Option<RuleTag>,
    pub value: Option<String>,
    pub attributes: Option<AttributeBag>,
}

impl ConditionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, tag: RuleTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn attributes(mut self, attributes: AttributeBag) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tag.is_none() && self.value.is_none() && self.attributes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_condition_defaults() {
        let condition = Condition::blank();
        assert_eq!(condition.tag, RuleTag::Field);
        assert!(condition.value.is_empty());
        assert!(condition.attributes.is_empty());
    }

    #[test]
    fn tag_change_resets_attributes() {
        let mut condition = Condition::blank();
        condition.attributes.set(AttributeKey::Name, Some("data.srcuser"));

        condition.apply(ConditionPatch::new().tag(RuleTag::Group));

        assert_eq!(condition.tag, RuleTag::Group);
        assert!(condition.attributes.is_empty());
    }

    #[test]
    fn same_tag_still_resets_attributes() {
        let mut condition = Condition::blank();
        condition.attributes.set(AttributeKey::Name, Some("data.srcuser"));

        condition.apply(ConditionPatch::new().tag(RuleTag::Field));

        assert!(condition.attributes.is_empty());
    }

    #[test]
    fn attributes_in_same_patch_survive_tag_change() {
        let mut condition = Condition::blank();
        condition.attributes.set(AttributeKey::Name, Some("data.srcuser"));
        let attrs: AttributeBag = [(AttributeKey::Negate, "yes")].into_iter().collect();

        condition.apply(ConditionPatch::new().tag(RuleTag::Srcip).attributes(attrs));

        let keys: Vec<_> = condition.attributes.keys().collect();
        assert_eq!(keys, vec![AttributeKey::Negate]);
    }

    #[test]
    fn attribute_patch_replaces_existing_bag() {
        let mut condition = Condition::blank();
        condition.tag = RuleTag::Match;
        condition.attributes.set(AttributeKey::Negate, Some("yes"));
        let attrs: AttributeBag = [(AttributeKey::Type, "pcre2"), (AttributeKey::Negate, "no")]
            .into_iter()
            .collect();

        condition.apply(ConditionPatch::new().attributes(attrs));

        let keys: Vec<_> = condition.attributes.keys().collect();
        assert_eq!(keys, vec![AttributeKey::Type]);
    }

    #[test]
    fn value_only_patch_keeps_attributes() {
        let mut condition = Condition::blank();
        condition.attributes.set(AttributeKey::Name, Some("win.system.eventID"));

        condition.apply(ConditionPatch::new().value("4625"));

        assert_eq!(condition.value, "4625");
        assert_eq!(condition.attributes.get(AttributeKey::Name), Some("win.system.eventID"));
    }

    #[test]
    fn stray_attributes_are_reported() {
        let mut condition = Condition::blank();
        condition.tag = RuleTag::Srcip;
        condition.attributes.set(AttributeKey::Name, Some("x"));
        condition.attributes.set(AttributeKey::Negate, Some("yes"));

        let stray: Vec<_> = condition.stray_attributes().collect();
        assert_eq!(stray, vec![AttributeKey::Name]);
    }
}
