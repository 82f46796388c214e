//! Tag lookup and search.
//!
//! Prompt text rarely spells a tag exactly the way the dictionary does: users type
//! `Blue Sky` for `blue_sky`. Matching therefore normalizes case and treats underscores
//! as spaces, while still preferring an exact key match when one exists.

use crate::model::{Dataset, Group, Tag};
use std::collections::HashSet;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 8;

/// Lowercases, trims and maps `_` to a space.
pub fn normalize_key_for_match(s: &str) -> String {
    s.trim().to_lowercase().replace('_', " ")
}

fn matches_query(text: &str, query: &str, query_norm: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains(query) || lower.replace('_', " ").contains(query_norm)
}

impl Dataset {
    fn tag_position(&self, key: &str) -> Option<(usize, usize, usize)> {
        let positions = || {
            self.categories.iter().enumerate().flat_map(|(ci, c)| {
                c.groups.iter().enumerate().flat_map(move |(gi, g)| {
                    g.tags.iter().enumerate().map(move |(ti, t)| ((ci, gi, ti), t))
                })
            })
        };
        if let Some((pos, _)) = positions().find(|(_, t)| t.key == key) {
            return Some(pos);
        }
        let target = normalize_key_for_match(key);
        positions()
            .find(|(_, t)| normalize_key_for_match(&t.key) == target)
            .map(|(pos, _)| pos)
    }

    /// Finds a tag anywhere in the dataset: exact key first, then normalized key.
    pub fn tag_by_key(&self, key: &str) -> Option<&Tag> {
        let (ci, gi, ti) = self.tag_position(key)?;
        Some(&self.categories[ci].groups[gi].tags[ti])
    }

    pub fn tag_by_key_mut(&mut self, key: &str) -> Option<&mut Tag> {
        let (ci, gi, ti) = self.tag_position(key)?;
        Some(&mut self.categories[ci].groups[gi].tags[ti])
    }

    /// Display text of `key` in `lang`: the translation, the key itself if the tag has
    /// none for `lang`, or `None` if the tag is unknown.
    pub fn translation(&self, key: &str, lang: &str) -> Option<String> {
        let tag = self.tag_by_key(key)?;
        Some(
            tag.translation
                .get(lang)
                .cloned()
                .unwrap_or_else(|| tag.key.clone()),
        )
    }

    /// Up to `limit` distinct keys containing `prefix`, in tree order.
    pub fn suggestions(&self, prefix: &str, limit: usize) -> Vec<String> {
        let query = prefix.trim().to_lowercase();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }
        let query_norm = query.replace('_', " ");

        let mut seen = HashSet::new();
        let mut list = Vec::new();
        for tag in self.tags() {
            if seen.contains(tag.key.as_str()) {
                continue;
            }
            if matches_query(&tag.key, &query, &query_norm) {
                seen.insert(tag.key.as_str());
                list.push(tag.key.clone());
                if list.len() >= limit {
                    break;
                }
            }
        }
        list
    }
}

impl Group {
    /// Tags whose key or `lang` translation contains `query`, ignoring case and treating
    /// underscores as spaces. An empty query returns every tag.
    pub fn filter_tags(&self, query: &str, lang: &str) -> Vec<&Tag> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.tags.iter().collect();
        }
        let query_norm = query.replace('_', " ");
        self.tags
            .iter()
            .filter(|t| {
                matches_query(&t.key, &query, &query_norm)
                    || matches_query(t.translation_for(lang), &query, &query_norm)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Category::new("cat_1", "Scene").with_groups(vec![Group::new("grp_1", "Sky")
                .with_tags(vec![
                    Tag::new("blue_sky").with_translation("zh_CN", "蓝天"),
                    Tag::new("Blue Sky"),
                    Tag::new("night_sky"),
                ])]),
            Category::new("cat_2", "Other").with_groups(vec![Group::new("grp_2", "Misc")
                .with_tags(vec![Tag::new("blue_sky"), Tag::new("sky")])]),
        ])
    }

    #[test]
    fn test_normalize_key_for_match() {
        assert_eq!(normalize_key_for_match("  Blue_Sky "), "blue sky");
    }

    #[test]
    fn test_exact_match_preferred() {
        let ds = dataset();
        assert_eq!(ds.tag_by_key("Blue Sky").unwrap().key, "Blue Sky");
        assert_eq!(ds.tag_by_key("blue_sky").unwrap().key, "blue_sky");
        assert_eq!(ds.tag_by_key("NIGHT SKY").unwrap().key, "night_sky");
        assert!(ds.tag_by_key("cloud").is_none());
    }

    #[test]
    fn test_translation_falls_back_to_key() {
        let ds = dataset();
        assert_eq!(ds.translation("blue_sky", "zh_CN").as_deref(), Some("蓝天"));
        assert_eq!(ds.translation("night_sky", "zh_CN").as_deref(), Some("night_sky"));
        assert_eq!(ds.translation("cloud", "zh_CN"), None);
    }

    #[test]
    fn test_suggestions_unique_and_limited() {
        let ds = dataset();
        assert_eq!(
            ds.suggestions("sky", DEFAULT_SUGGESTION_LIMIT),
            vec!["blue_sky", "Blue Sky", "night_sky", "sky"]
        );
        assert_eq!(ds.suggestions("blue sky", 1), vec!["blue_sky"]);
        assert!(ds.suggestions("   ", 8).is_empty());
    }

    #[test]
    fn test_filter_tags_by_translation() {
        let ds = dataset();
        let group = ds.find_group("grp_1").unwrap();
        let found = group.filter_tags("蓝", "zh_CN");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key, "blue_sky");
        assert_eq!(group.filter_tags("night sky", "zh_CN").len(), 1);
        assert_eq!(group.filter_tags("", "zh_CN").len(), 3);
    }
}
