//! # Domain Model: The Tag Dictionary Tree
//!
//! This module defines the dictionary data structures: [`Dataset`] → [`Category`] →
//! [`Group`] → [`Tag`].
//!
//! ## Identity
//!
//! Every level has exactly one identity key that the rest of the system relies on:
//!
//! | Level | Identity | Scope |
//! |-------|----------|-------|
//! | `Category` | `name` | unique within the dataset |
//! | `Group` | `name` | unique within its category |
//! | `Tag` | `key` | unique within its group |
//!
//! Categories and groups also carry an `id`, but ids are regenerated whenever an entity
//! is (re)created, including while a diff is applied. They are addressable handles for
//! editing a live dataset and nothing more. Diffs never mention them.
//!
//! ## Translations
//!
//! A tag's `translation` maps a language code to display text. A missing language and an
//! empty string are treated the same by comparisons (see [`Tag::translation_for`]).
//!
//! ## Serialization
//!
//! Field names are camelCase to stay compatible with persisted snapshots and exports.
//! `translation` and `hidden` are optional on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Language code such as `en`, `zh_CN` or `es_ES`.
pub type LangCode = String;

pub const LANG_EN: &str = "en";
pub const LANG_ZH_CN: &str = "zh_CN";
pub const LANG_ES_ES: &str = "es_ES";

/// Languages compared by the diff engine even when a dataset does not declare them.
pub const KNOWN_LANGUAGES: [&str; 3] = [LANG_EN, LANG_ZH_CN, LANG_ES_ES];

pub type Translations = BTreeMap<LangCode, String>;

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub translation: Translations,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
}

impl Tag {
    /// A tag whose only translation is its own key in English.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let mut translation = Translations::new();
        translation.insert(LANG_EN.to_string(), key.clone());
        Self {
            key,
            translation,
            hidden: false,
        }
    }

    pub fn with_translation(mut self, lang: &str, text: impl Into<String>) -> Self {
        self.translation.insert(lang.to_string(), text.into());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// The translation for `lang`, with absent treated as the empty string.
    pub fn translation_for(&self, lang: &str) -> &str {
        self.translation.get(lang).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: None,
            tags: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    pub fn tag(&self, key: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.key == key)
    }

    pub fn tag_mut(&mut self, key: &str) -> Option<&mut Tag> {
        self.tags.iter_mut().find(|t| t.key == key)
    }

    /// Tag keys in display order.
    pub fn keys(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.key.clone()).collect()
    }

    /// The color with empty strings collapsed to `None`.
    pub fn color_str(&self) -> &str {
        self.color.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            groups: Vec::new(),
        }
    }

    pub fn with_groups(mut self, groups: Vec<Group>) -> Self {
        self.groups = groups;
        self
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default = "default_languages")]
    pub languages: Vec<LangCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_languages() -> Vec<LangCode> {
    vec![LANG_EN.to_string()]
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            languages: default_languages(),
            updated_at: None,
        }
    }
}

impl Dataset {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories,
            ..Self::default()
        }
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.name == name)
    }

    /// Whether any category or group carries `id`.
    pub fn has_id(&self, id: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.id == id || c.groups.iter().any(|g| g.id == id))
    }

    pub fn has_language(&self, lang: &str) -> bool {
        self.languages.iter().any(|l| l == lang)
    }

    /// Adds `lang` to the declared languages if it is not there yet.
    pub fn register_language(&mut self, lang: &str) {
        if !self.has_language(lang) {
            self.languages.push(lang.to_string());
        }
    }

    /// Declares every language used by any tag translation.
    pub fn register_used_languages(&mut self) {
        let mut used: Vec<String> = Vec::new();
        for tag in self.tags() {
            for lang in tag.translation.keys() {
                if !used.contains(lang) {
                    used.push(lang.clone());
                }
            }
        }
        for lang in used {
            if lang != LANG_EN {
                self.register_language(&lang);
            }
        }
    }

    /// Iterates every tag in tree order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.categories
            .iter()
            .flat_map(|c| c.groups.iter())
            .flat_map(|g| g.tags.iter())
    }

    pub fn tag_count(&self) -> usize {
        self.tags().count()
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    /// Names that appear more than once at any level, as `category`, `category/group`
    /// or `category/group/key` paths.
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut dups = Vec::new();
        let mut cat_seen = HashSet::new();
        for cat in &self.categories {
            if !cat_seen.insert(cat.name.as_str()) {
                dups.push(cat.name.clone());
            }
            let mut grp_seen = HashSet::new();
            for grp in &cat.groups {
                if !grp_seen.insert(grp.name.as_str()) {
                    dups.push(format!("{}/{}", cat.name, grp.name));
                }
                let mut key_seen = HashSet::new();
                for tag in &grp.tags {
                    if !key_seen.insert(tag.key.as_str()) {
                        dups.push(format!("{}/{}/{}", cat.name, grp.name, tag.key));
                    }
                }
            }
        }
        dups
    }

    /// Structural equivalence that ignores ids and `updated_at`.
    ///
    /// Compares names, colors, tag keys and order, hidden flags and translations, with
    /// an empty translation treated as absent.
    pub fn equivalent_to(&self, other: &Dataset) -> bool {
        self.categories.len() == other.categories.len()
            && self
                .categories
                .iter()
                .zip(&other.categories)
                .all(|(a, b)| categories_equivalent(a, b))
    }
}

fn categories_equivalent(a: &Category, b: &Category) -> bool {
    a.name == b.name
        && a.groups.len() == b.groups.len()
        && a.groups
            .iter()
            .zip(&b.groups)
            .all(|(x, y)| groups_equivalent(x, y))
}

fn groups_equivalent(a: &Group, b: &Group) -> bool {
    a.name == b.name
        && a.color_str() == b.color_str()
        && a.tags.len() == b.tags.len()
        && a.tags.iter().zip(&b.tags).all(|(x, y)| tags_equivalent(x, y))
}

fn tags_equivalent(a: &Tag, b: &Tag) -> bool {
    a.key == b.key
        && a.hidden == b.hidden
        && a
            .translation
            .keys()
            .chain(b.translation.keys())
            .all(|lang| a.translation_for(lang) == b.translation_for(lang))
}
