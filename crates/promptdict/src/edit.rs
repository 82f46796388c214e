//! Dictionary editing.
//!
//! These are the mutations a user performs on a live [`Dataset`]: creating categories and
//! groups, and adding, renaming, translating, hiding and reordering tags. Groups are
//! addressed by id (the handle a UI holds), tags by key within their group.
//!
//! Names stay unique at every level: creation and renames reject duplicates with
//! [`PromptDictError::DuplicateName`], which is what lets the diff engine match by name.

use crate::config::SessionConfig;
use crate::error::{PromptDictError, Result};
use crate::ids::{IdGenerator, CATEGORY_PREFIX, GROUP_PREFIX};
use crate::model::{Category, Dataset, Group, Tag, LANG_EN};

impl Dataset {
    pub fn find_group(&self, group_id: &str) -> Option<&Group> {
        self.categories
            .iter()
            .flat_map(|c| c.groups.iter())
            .find(|g| g.id == group_id)
    }

    pub fn find_group_mut(&mut self, group_id: &str) -> Option<&mut Group> {
        self.categories
            .iter_mut()
            .flat_map(|c| c.groups.iter_mut())
            .find(|g| g.id == group_id)
    }

    fn group_or_err(&mut self, group_id: &str) -> Result<&mut Group> {
        self.find_group_mut(group_id)
            .ok_or_else(|| PromptDictError::GroupNotFound(group_id.to_string()))
    }

    /// Creates an empty category and returns its id.
    pub fn create_category<G: IdGenerator>(&mut self, name: &str, ids: &mut G) -> Result<String> {
        if self.category(name).is_some() {
            return Err(PromptDictError::DuplicateName {
                kind: "category",
                name: name.to_string(),
            });
        }
        let id = ids.unused_id(CATEGORY_PREFIX, |id| self.has_id(id));
        self.categories.push(Category::new(id.clone(), name));
        Ok(id)
    }

    /// Creates an empty group inside the category `category_id` and returns its id.
    pub fn create_group<G: IdGenerator>(
        &mut self,
        category_id: &str,
        name: &str,
        color: Option<String>,
        ids: &mut G,
    ) -> Result<String> {
        let idx = self
            .categories
            .iter()
            .position(|c| c.id == category_id)
            .ok_or_else(|| PromptDictError::CategoryNotFound(category_id.to_string()))?;
        if self.categories[idx].group(name).is_some() {
            return Err(PromptDictError::DuplicateName {
                kind: "group",
                name: format!("{}/{}", self.categories[idx].name, name),
            });
        }
        let id = ids.unused_id(GROUP_PREFIX, |id| self.has_id(id));
        let mut group = Group::new(id.clone(), name);
        group.color = color;
        self.categories[idx].groups.push(group);
        Ok(id)
    }

    /// Appends a tag translated to itself in English and in `lang`.
    pub fn add_tag(&mut self, group_id: &str, key: &str, lang: &str) -> Result<()> {
        let group = self.group_or_err(group_id)?;
        if group.tag(key).is_some() {
            return Err(PromptDictError::DuplicateName {
                kind: "tag",
                name: key.to_string(),
            });
        }
        group.tags.push(Tag::new(key).with_translation(lang, key));
        self.register_language(lang);
        Ok(())
    }

    pub fn remove_tag(&mut self, group_id: &str, key: &str) -> Result<()> {
        let group = self.group_or_err(group_id)?;
        let before = group.tags.len();
        group.tags.retain(|t| t.key != key);
        if group.tags.len() == before {
            return Err(PromptDictError::TagNotFound(key.to_string()));
        }
        Ok(())
    }

    /// Renames a tag; its English translation follows the new key.
    pub fn update_tag_key(&mut self, group_id: &str, old_key: &str, new_key: &str) -> Result<()> {
        let group = self.group_or_err(group_id)?;
        if old_key != new_key && group.tag(new_key).is_some() {
            return Err(PromptDictError::DuplicateName {
                kind: "tag",
                name: new_key.to_string(),
            });
        }
        let tag = group
            .tag_mut(old_key)
            .ok_or_else(|| PromptDictError::TagNotFound(old_key.to_string()))?;
        tag.key = new_key.to_string();
        tag.translation
            .insert(LANG_EN.to_string(), new_key.to_string());
        Ok(())
    }

    pub fn set_translation(
        &mut self,
        group_id: &str,
        key: &str,
        lang: &str,
        value: &str,
    ) -> Result<()> {
        let group = self.group_or_err(group_id)?;
        let tag = group
            .tag_mut(key)
            .ok_or_else(|| PromptDictError::TagNotFound(key.to_string()))?;
        tag.translation.insert(lang.to_string(), value.to_string());
        self.register_language(lang);
        Ok(())
    }

    /// Flips a tag's hidden flag and returns the new value.
    pub fn toggle_hidden(&mut self, group_id: &str, key: &str) -> Result<bool> {
        let group = self.group_or_err(group_id)?;
        let tag = group
            .tag_mut(key)
            .ok_or_else(|| PromptDictError::TagNotFound(key.to_string()))?;
        tag.hidden = !tag.hidden;
        Ok(tag.hidden)
    }

    /// Moves the tag at `from` to `to`. Out-of-range positions leave the group untouched
    /// and return `false`.
    pub fn reorder_tags(&mut self, group_id: &str, from: usize, to: usize) -> Result<bool> {
        let tags = &mut self.group_or_err(group_id)?.tags;
        if from >= tags.len() || to >= tags.len() {
            return Ok(false);
        }
        let tag = tags.remove(from);
        tags.insert(to, tag);
        Ok(true)
    }

    /// Records a translation for `key`.
    ///
    /// An existing tag (exact key first, then normalized) gets the translation; otherwise
    /// the tag is added to the custom mapping group, created on demand.
    pub fn add_mapping<G: IdGenerator>(
        &mut self,
        key: &str,
        lang: &str,
        value: &str,
        config: &SessionConfig,
        ids: &mut G,
    ) {
        if let Some(tag) = self.tag_by_key_mut(key) {
            tag.translation.insert(lang.to_string(), value.to_string());
        } else {
            let group = self.ensure_custom_group(config, ids);
            group
                .tags
                .push(Tag::new(key).with_translation(lang, value));
        }
        self.register_language(lang);
    }

    /// The custom mapping group, creating its category and the group if missing.
    pub fn ensure_custom_group<G: IdGenerator>(
        &mut self,
        config: &SessionConfig,
        ids: &mut G,
    ) -> &mut Group {
        let cat_idx = match self
            .categories
            .iter()
            .position(|c| c.name == config.custom_category)
        {
            Some(idx) => idx,
            None => {
                let id = ids.unused_id(CATEGORY_PREFIX, |id| self.has_id(id));
                self.categories
                    .push(Category::new(id, config.custom_category.clone()));
                self.categories.len() - 1
            }
        };
        let grp_idx = match self.categories[cat_idx]
            .groups
            .iter()
            .position(|g| g.name == config.custom_group)
        {
            Some(idx) => idx,
            None => {
                let id = ids.unused_id(GROUP_PREFIX, |id| self.has_id(id));
                let groups = &mut self.categories[cat_idx].groups;
                groups.push(
                    Group::new(id, config.custom_group.clone())
                        .with_color(config.custom_group_color.clone()),
                );
                groups.len() - 1
            }
        };
        &mut self.categories[cat_idx].groups[grp_idx]
    }
}
