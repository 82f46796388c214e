//! # Baseline Diffs
//!
//! A [`Diff`] records how a customized [`Dataset`](crate::model::Dataset) differs from
//! the shared baseline it started from. Persisting the diff instead of the whole dataset
//! keeps exports small and lets user changes survive a baseline update:
//!
//! ```text
//!   baseline v1 ──edit──▶ customized ──build_diff(v1, customized)──▶ Diff
//!   baseline v2 ────────────────────────apply_diff(v2, Diff)───────▶ customized'
//! ```
//!
//! ## Keyed by Name
//!
//! Every level is matched by its human-readable identity (category name, group name, tag
//! key). Ids are regenerated on every creation path, including during apply, so they are
//! useless as anchors and never appear in a diff's matching logic.
//!
//! ## Shape
//!
//! The diff is sparse. A category or group entry exists only if it carries at least one
//! change; within a group, only the fields that changed are present:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `color` | new color (`""` clears it) |
//! | `added` | full tag snapshots, appended in order |
//! | `removed` | tag keys to drop |
//! | `updated` | per-tag changed translations and/or `hidden` |
//! | `order` | the complete desired key order |
//!
//! ## Stale Diffs
//!
//! A diff may be applied to a baseline that evolved after it was built. References to
//! things that no longer exist are skipped: updates for missing tags do nothing, and an
//! `order` list never deletes tags it fails to mention.

pub mod apply;
pub mod build;

pub use apply::{apply_diff, apply_diff_in_place};
pub use build::build_diff;

use crate::model::{Group, Tag, Translations};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Diff {
    #[serde(default)]
    pub categories: Vec<CategoryDiff>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDiff {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added_groups: Vec<Group>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupDiff>,
}

impl CategoryDiff {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added_groups.is_empty() && self.removed_groups.is_empty() && self.groups.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupDiff {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updated: Vec<TagUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<String>>,
}

impl GroupDiff {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.added.is_empty()
            && self.removed.is_empty()
            && self.updated.is_empty()
            && self.order.is_none()
    }
}

/// Changed fields of a tag present on both sides. Unchanged fields are absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TagUpdate {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<Translations>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

impl TagUpdate {
    pub fn is_empty(&self) -> bool {
        self.translation.as_ref().map_or(true, |t| t.is_empty()) && self.hidden.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_omitted() {
        let diff = Diff {
            categories: vec![CategoryDiff {
                name: "Quality".into(),
                groups: vec![GroupDiff {
                    name: "Basic".into(),
                    order: Some(vec!["a".into()]),
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };
        let json = serde_json::to_value(&diff).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "categories": [{
                    "name": "Quality",
                    "groups": [{ "name": "Basic", "order": ["a"] }]
                }]
            })
        );
    }

    #[test]
    fn test_parses_external_shape() {
        let json = r##"{
            "categories": [{
                "name": "Custom",
                "addedGroups": [{ "name": "Mine", "color": "#fff", "tags": [{ "key": "x" }] }],
                "removedGroups": ["Old"],
                "groups": [{
                    "name": "Basic",
                    "updated": [{ "key": "sky", "translation": { "zh_CN": "天空" } }]
                }]
            }]
        }"##;
        let diff: Diff = serde_json::from_str(json).unwrap();
        let cat = &diff.categories[0];
        assert_eq!(cat.added_groups[0].name, "Mine");
        assert_eq!(cat.added_groups[0].id, "");
        assert_eq!(cat.removed_groups, vec!["Old"]);
        let update = &cat.groups[0].updated[0];
        assert_eq!(update.translation.as_ref().unwrap()["zh_CN"], "天空");
        assert_eq!(update.hidden, None);
    }

    #[test]
    fn test_is_empty_checks() {
        assert!(GroupDiff::new("g").is_empty());
        assert!(CategoryDiff::new("c").is_empty());
        assert!(TagUpdate::default().is_empty());
        let update = TagUpdate {
            key: "k".into(),
            hidden: Some(false),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
