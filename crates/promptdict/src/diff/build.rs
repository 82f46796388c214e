//! Building a diff from a baseline and a customized dataset.
//!
//! Each level is indexed by name once (hash lookups), so the whole pass is linear in the
//! number of tags. When a dataset contains duplicate names, the entry keeps the position
//! of the first occurrence and the content of the last one.

use super::{CategoryDiff, Diff, GroupDiff, TagUpdate};
use crate::model::{Category, Dataset, Group, Tag, Translations, KNOWN_LANGUAGES};
use std::collections::{BTreeSet, HashMap};

/// Describes how `current` differs from `base`.
///
/// Categories present in `current` come first, in `current` order; categories that only
/// exist in `base` follow as group removals.
pub fn build_diff(base: &Dataset, current: &Dataset) -> Diff {
    let languages = compared_languages(base, current);
    let (base_order, base_cats) = index_by(&base.categories, |c| c.name.as_str());
    let (cur_order, cur_cats) = index_by(&current.categories, |c| c.name.as_str());

    let mut categories = Vec::new();

    for name in &cur_order {
        let cur_cat = cur_cats[name];
        let cat_diff = match base_cats.get(name) {
            None => CategoryDiff {
                name: cur_cat.name.clone(),
                added_groups: cur_cat.groups.clone(),
                ..Default::default()
            },
            Some(base_cat) => diff_category(base_cat, cur_cat, &languages),
        };
        if !cat_diff.is_empty() {
            categories.push(cat_diff);
        }
    }

    for name in &base_order {
        if cur_cats.contains_key(name) {
            continue;
        }
        let cat_diff = CategoryDiff {
            name: name.to_string(),
            removed_groups: unique_names(&base_cats[name].groups),
            ..Default::default()
        };
        if !cat_diff.is_empty() {
            categories.push(cat_diff);
        }
    }

    tracing::debug!(
        categories = categories.len(),
        "built diff against baseline"
    );
    Diff { categories }
}

fn diff_category(base: &Category, current: &Category, languages: &BTreeSet<String>) -> CategoryDiff {
    let (base_order, base_groups) = index_by(&base.groups, |g| g.name.as_str());
    let (cur_order, cur_groups) = index_by(&current.groups, |g| g.name.as_str());
    let mut cat_diff = CategoryDiff::new(current.name.clone());

    for name in &cur_order {
        let cur_grp = cur_groups[name];
        match base_groups.get(name) {
            None => cat_diff.added_groups.push(cur_grp.clone()),
            Some(base_grp) => {
                let grp_diff = diff_group(base_grp, cur_grp, languages);
                if !grp_diff.is_empty() {
                    cat_diff.groups.push(grp_diff);
                }
            }
        }
    }

    cat_diff.removed_groups = base_order
        .iter()
        .filter(|name| !cur_groups.contains_key(*name))
        .map(|name| name.to_string())
        .collect();

    cat_diff
}

fn diff_group(base: &Group, current: &Group, languages: &BTreeSet<String>) -> GroupDiff {
    let mut grp_diff = GroupDiff::new(current.name.clone());

    if base.color_str() != current.color_str() {
        // An empty string encodes "color cleared".
        grp_diff.color = Some(current.color.clone().unwrap_or_default());
    }

    let (base_keys, base_tags) = index_by(&base.tags, |t| t.key.as_str());
    let (cur_keys, cur_tags) = index_by(&current.tags, |t| t.key.as_str());

    for key in &cur_keys {
        let cur_tag = cur_tags[key];
        match base_tags.get(key) {
            None => grp_diff.added.push(cur_tag.clone()),
            Some(base_tag) => {
                if let Some(update) = diff_tag(base_tag, cur_tag, languages) {
                    grp_diff.updated.push(update);
                }
            }
        }
    }

    grp_diff.removed = base_keys
        .iter()
        .filter(|key| !cur_tags.contains_key(*key))
        .map(|key| key.to_string())
        .collect();

    let base_order = base.keys();
    let cur_order = current.keys();
    if base_order != cur_order {
        grp_diff.order = Some(cur_order);
    }

    grp_diff
}

fn diff_tag(base: &Tag, current: &Tag, languages: &BTreeSet<String>) -> Option<TagUpdate> {
    let mut translation = Translations::new();
    let tag_languages = base.translation.keys().chain(current.translation.keys());
    let all: BTreeSet<&str> = languages
        .iter()
        .chain(tag_languages)
        .map(String::as_str)
        .collect();

    for lang in all {
        let before = base.translation_for(lang);
        let after = current.translation_for(lang);
        if before != after {
            translation.insert(lang.to_string(), after.to_string());
        }
    }

    let update = TagUpdate {
        key: current.key.clone(),
        translation: (!translation.is_empty()).then_some(translation),
        hidden: (base.hidden != current.hidden).then_some(current.hidden),
    };
    (!update.is_empty()).then_some(update)
}

fn compared_languages(base: &Dataset, current: &Dataset) -> BTreeSet<String> {
    KNOWN_LANGUAGES
        .iter()
        .map(|l| l.to_string())
        .chain(base.languages.iter().cloned())
        .chain(current.languages.iter().cloned())
        .collect()
}

/// Unique names in first-occurrence order, plus a lookup holding the last item per name.
fn index_by<'a, T>(
    items: &'a [T],
    name: impl Fn(&'a T) -> &'a str,
) -> (Vec<&'a str>, HashMap<&'a str, &'a T>) {
    let mut order = Vec::new();
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        if map.insert(name(item), item).is_none() {
            order.push(name(item));
        }
    }
    (order, map)
}

fn unique_names(groups: &[Group]) -> Vec<String> {
    let (order, _) = index_by(groups, |g| g.name.as_str());
    order.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn quality_base() -> Dataset {
        Dataset::new(vec![Category::new("cat_1", "Quality").with_groups(vec![
            Group::new("grp_1", "Basic").with_tags(vec![
                Tag::new("masterpiece"),
                Tag::new("blurry").hidden(true),
            ]),
        ])])
    }

    #[test]
    fn test_identical_datasets_produce_empty_diff() {
        let base = quality_base();
        assert!(build_diff(&base, &base.clone()).is_empty());
    }

    #[test]
    fn test_ids_do_not_matter() {
        let base = quality_base();
        let mut current = base.clone();
        current.categories[0].id = "cat_x".into();
        current.categories[0].groups[0].id = "grp_x".into();
        assert!(build_diff(&base, &current).is_empty());
    }

    #[test]
    fn test_added_tag_and_reorder() {
        let base = quality_base();
        let mut current = base.clone();
        let tags = &mut current.categories[0].groups[0].tags;
        tags.insert(0, Tag::new("best_quality"));

        let diff = build_diff(&base, &current);
        assert_eq!(diff.categories.len(), 1);
        let cat = &diff.categories[0];
        assert_eq!(cat.name, "Quality");
        assert!(cat.added_groups.is_empty());
        assert!(cat.removed_groups.is_empty());
        assert_eq!(cat.groups.len(), 1);

        let grp = &cat.groups[0];
        assert_eq!(grp.name, "Basic");
        assert_eq!(grp.added, vec![Tag::new("best_quality")]);
        assert!(grp.removed.is_empty());
        assert!(grp.updated.is_empty());
        assert_eq!(grp.color, None);
        assert_eq!(
            grp.order,
            Some(vec![
                "best_quality".to_string(),
                "masterpiece".to_string(),
                "blurry".to_string()
            ])
        );
    }

    #[test]
    fn test_update_contains_only_changed_fields() {
        let base = quality_base();
        let mut current = base.clone();
        let tag = &mut current.categories[0].groups[0].tags[0];
        tag.translation.insert("zh_CN".into(), "杰作".into());

        let diff = build_diff(&base, &current);
        let grp = &diff.categories[0].groups[0];
        assert_eq!(grp.updated.len(), 1);
        let update = &grp.updated[0];
        assert_eq!(update.key, "masterpiece");
        assert_eq!(update.hidden, None);
        let translation = update.translation.as_ref().unwrap();
        assert_eq!(translation.len(), 1);
        assert_eq!(translation["zh_CN"], "杰作");
        assert_eq!(grp.order, None);
    }

    #[test]
    fn test_hidden_flag_change() {
        let base = quality_base();
        let mut current = base.clone();
        current.categories[0].groups[0].tags[1].hidden = false;

        let diff = build_diff(&base, &current);
        let update = &diff.categories[0].groups[0].updated[0];
        assert_eq!(update.key, "blurry");
        assert_eq!(update.hidden, Some(false));
        assert!(update.translation.is_none());
    }

    #[test]
    fn test_undeclared_language_is_compared() {
        let base = quality_base();
        let mut current = base.clone();
        current.categories[0].groups[0].tags[0]
            .translation
            .insert("fr_FR".into(), "chef-d'oeuvre".into());

        let diff = build_diff(&base, &current);
        let update = &diff.categories[0].groups[0].updated[0];
        assert_eq!(update.translation.as_ref().unwrap()["fr_FR"], "chef-d'oeuvre");
    }

    #[test]
    fn test_removed_tag() {
        let base = quality_base();
        let mut current = base.clone();
        current.categories[0].groups[0].tags.remove(1);

        let grp = &build_diff(&base, &current).categories[0].groups[0];
        assert_eq!(grp.removed, vec!["blurry"]);
        assert_eq!(grp.order, Some(vec!["masterpiece".to_string()]));
    }

    #[test]
    fn test_color_changes() {
        let base = quality_base();
        let mut current = base.clone();
        current.categories[0].groups[0].color = Some(String::new());
        assert!(build_diff(&base, &current).is_empty());

        current.categories[0].groups[0].color = Some("#ff0000".into());
        let grp = &build_diff(&base, &current).categories[0].groups[0];
        assert_eq!(grp.color.as_deref(), Some("#ff0000"));

        let diff = build_diff(&current, &base);
        assert_eq!(diff.categories[0].groups[0].color.as_deref(), Some(""));
    }

    #[test]
    fn test_added_and_removed_groups() {
        let base = quality_base();
        let mut current = base.clone();
        current.categories[0].groups[0].name = "Renamed".into();

        let cat = &build_diff(&base, &current).categories[0];
        assert_eq!(cat.added_groups.len(), 1);
        assert_eq!(cat.added_groups[0].name, "Renamed");
        assert_eq!(cat.removed_groups, vec!["Basic"]);
        assert!(cat.groups.is_empty());
    }

    #[test]
    fn test_new_and_removed_categories() {
        let base = quality_base();
        let mut current = base.clone();
        current.categories[0].name = "Style".into();

        let diff = build_diff(&base, &current);
        assert_eq!(diff.categories.len(), 2);
        assert_eq!(diff.categories[0].name, "Style");
        assert_eq!(diff.categories[0].added_groups[0].name, "Basic");
        assert_eq!(diff.categories[1].name, "Quality");
        assert_eq!(diff.categories[1].removed_groups, vec!["Basic"]);
    }

    #[test]
    fn test_empty_new_category_is_pruned() {
        let base = quality_base();
        let mut current = base.clone();
        current.categories.push(Category::new("cat_2", "Empty"));
        assert!(build_diff(&base, &current).is_empty());
    }

    #[test]
    fn test_duplicate_category_names_last_write_wins() {
        let base = quality_base();
        let mut current = base.clone();
        let mut dup = current.categories[0].clone();
        dup.groups[0].tags.push(Tag::new("extra"));
        current.categories.push(dup);

        let diff = build_diff(&base, &current);
        assert_eq!(diff.categories.len(), 1);
        assert_eq!(diff.categories[0].groups[0].added, vec![Tag::new("extra")]);
    }
}
