//! Applying a diff onto a dataset.
//!
//! Within a group the steps always run as added → removed → updated → order, so the
//! `order` list sees the final tag set. Apply never fails: anything the diff refers to
//! that the target lacks is either created (categories, groups) or skipped (tag updates).

use super::{CategoryDiff, Diff, GroupDiff};
use crate::ids::{IdGenerator, CATEGORY_PREFIX, GROUP_PREFIX};
use crate::model::{Category, Dataset, Group, Tag};
use std::collections::{HashMap, HashSet};

/// Applies `diff` to `target` and returns it.
pub fn apply_diff<G: IdGenerator>(mut target: Dataset, diff: &Diff, ids: &mut G) -> Dataset {
    apply_diff_in_place(&mut target, diff, ids);
    target
}

/// Applies `diff` to `target` in place.
pub fn apply_diff_in_place<G: IdGenerator>(target: &mut Dataset, diff: &Diff, ids: &mut G) {
    let mut in_use: HashSet<String> = target
        .categories
        .iter()
        .flat_map(|c| std::iter::once(c.id.clone()).chain(c.groups.iter().map(|g| g.id.clone())))
        .collect();
    for cat_diff in &diff.categories {
        let idx = match target
            .categories
            .iter()
            .rposition(|c| c.name == cat_diff.name)
        {
            Some(idx) => idx,
            None => {
                let id = next_id(ids, CATEGORY_PREFIX, &mut in_use);
                target.categories.push(Category::new(id, cat_diff.name.clone()));
                target.categories.len() - 1
            }
        };
        apply_category(&mut target.categories[idx], cat_diff, ids, &mut in_use);
    }
    target.register_used_languages();
    tracing::debug!(
        categories = diff.categories.len(),
        "applied diff onto dataset"
    );
}

fn next_id<G: IdGenerator>(ids: &mut G, prefix: &str, in_use: &mut HashSet<String>) -> String {
    let id = ids.unused_id(prefix, |id| in_use.contains(id));
    in_use.insert(id.clone());
    id
}

fn apply_category<G: IdGenerator>(
    cat: &mut Category,
    diff: &CategoryDiff,
    ids: &mut G,
    in_use: &mut HashSet<String>,
) {
    for snapshot in &diff.added_groups {
        let mut group = snapshot.clone();
        group.id = next_id(ids, GROUP_PREFIX, in_use);
        cat.groups.push(group);
    }

    if !diff.removed_groups.is_empty() {
        let removed: HashSet<&str> = diff.removed_groups.iter().map(String::as_str).collect();
        cat.groups.retain(|g| !removed.contains(g.name.as_str()));
    }

    for grp_diff in &diff.groups {
        let idx = match cat.groups.iter().rposition(|g| g.name == grp_diff.name) {
            Some(idx) => idx,
            None => {
                let mut group = Group::new(next_id(ids, GROUP_PREFIX, in_use), grp_diff.name.clone());
                group.color = grp_diff.color.clone().filter(|c| !c.is_empty());
                cat.groups.push(group);
                cat.groups.len() - 1
            }
        };
        apply_group(&mut cat.groups[idx], grp_diff);
    }
}

fn apply_group(group: &mut Group, diff: &GroupDiff) {
    if let Some(color) = &diff.color {
        group.color = (!color.is_empty()).then(|| color.clone());
    }

    group.tags.extend(diff.added.iter().cloned());

    if !diff.removed.is_empty() {
        let removed: HashSet<&str> = diff.removed.iter().map(String::as_str).collect();
        group.tags.retain(|t| !removed.contains(t.key.as_str()));
    }

    for update in &diff.updated {
        let Some(tag) = group.tags.iter_mut().rev().find(|t| t.key == update.key) else {
            tracing::debug!(key = %update.key, group = %group.name, "skipping update for missing tag");
            continue;
        };
        if let Some(translation) = &update.translation {
            tag.translation
                .extend(translation.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if let Some(hidden) = update.hidden {
            tag.hidden = hidden;
        }
    }

    if let Some(order) = &diff.order {
        reorder_tags(&mut group.tags, order);
    }
}

/// Moves tags named in `order` to the front in that order; the rest follow in their
/// prior relative order. Unknown keys in `order` are ignored.
fn reorder_tags(tags: &mut Vec<Tag>, order: &[String]) {
    let mut position: HashMap<String, usize> = HashMap::with_capacity(tags.len());
    for (i, tag) in tags.iter().enumerate() {
        position.entry(tag.key.clone()).or_insert(i);
    }
    let mut slots: Vec<Option<Tag>> = std::mem::take(tags).into_iter().map(Some).collect();

    let mut reordered = Vec::with_capacity(slots.len());
    for key in order {
        if let Some(&i) = position.get(key.as_str()) {
            if let Some(tag) = slots[i].take() {
                reordered.push(tag);
            }
        }
    }
    reordered.extend(slots.into_iter().flatten());
    *tags = reordered;
}
