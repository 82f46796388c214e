//! # Presets and Folders
//!
//! Presets are saved prompt texts. Two generations coexist:
//!
//! - **Legacy presets** ([`Preset`]): `{ name, text, updatedAt }`, identified by name.
//! - **Extended presets** ([`ExtendedPreset`]): typed, described, tagged and filed into
//!   [`PresetFolder`]s, identified by id.
//!
//! Legacy presets are converted once by [`migrate::migrate_legacy`]; afterwards the
//! legacy list only holds presets saved through the legacy operations of a session.
//!
//! ## Weak References
//!
//! `ExtendedPreset::folder_id` and `PresetFolder::parent_id` are plain ids resolved
//! against the folder table. Nothing enforces them at the type level, so every operation
//! that can invalidate one repairs it:
//!
//! | Operation | Effect on references |
//! |-----------|----------------------|
//! | [`PresetLibrary::delete_folder`] | clears `folderId` of its presets, `parentId` of its children, the default folder |
//! | [`PresetLibrary::move_folder`] | refuses moves that would create a cycle |
//! | [`merge::merge_import`] | breaks cycles and drops dangling ids afterwards |
//!
//! [`PresetLibrary::drop_dangling_references`] and [`PresetLibrary::break_folder_cycles`]
//! restore both invariants on data of unknown origin.

pub mod merge;
pub mod migrate;

pub use merge::{merge_import, MergeReport, PresetPayload};
pub use migrate::migrate_legacy;

use crate::error::{PromptDictError, Result};
use crate::ids::{IdGenerator, FOLDER_PREFIX, PRESET_PREFIX};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// A legacy named prompt text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetType {
    #[default]
    Positive,
    Negative,
    Setting,
    Style,
    Character,
    Scene,
    Custom,
}

impl PresetType {
    pub const ALL: [PresetType; 7] = [
        PresetType::Positive,
        PresetType::Negative,
        PresetType::Setting,
        PresetType::Style,
        PresetType::Character,
        PresetType::Scene,
        PresetType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresetType::Positive => "positive",
            PresetType::Negative => "negative",
            PresetType::Setting => "setting",
            PresetType::Style => "style",
            PresetType::Character => "character",
            PresetType::Scene => "scene",
            PresetType::Custom => "custom",
        }
    }
}

impl fmt::Display for PresetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PresetType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown preset type: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedPreset {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: PresetType,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetFolder {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl PresetFolder {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            color: None,
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

/// Preset-panel settings. Only the default folder is interpreted; whatever else a
/// client stores here is carried along untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetManagement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_folder_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Field changes for [`PresetLibrary::update_preset`]. `None` leaves a field as is;
/// the nested options of `description` and `folder_id` allow clearing.
#[derive(Debug, Clone, Default)]
pub struct PresetPatch {
    pub name: Option<String>,
    pub kind: Option<PresetType>,
    pub content: Option<String>,
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub folder_id: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PresetLibrary {
    pub legacy: Vec<Preset>,
    pub presets: Vec<ExtendedPreset>,
    pub folders: Vec<PresetFolder>,
    pub management: PresetManagement,
}

impl PresetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.legacy.is_empty() && self.presets.is_empty() && self.folders.is_empty()
    }

    pub fn folder(&self, id: &str) -> Option<&PresetFolder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn folder_by_name(&self, name: &str) -> Option<&PresetFolder> {
        self.folders.iter().find(|f| f.name == name)
    }

    pub fn preset(&self, id: &str) -> Option<&ExtendedPreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Whether any folder or extended preset carries `id`.
    pub fn has_id(&self, id: &str) -> bool {
        self.has_folder(id) || self.preset(id).is_some()
    }

    fn has_folder(&self, id: &str) -> bool {
        self.folder(id).is_some()
    }

    fn require_folder(&self, id: &str) -> Result<()> {
        if self.has_folder(id) {
            Ok(())
        } else {
            Err(PromptDictError::FolderNotFound(id.to_string()))
        }
    }

    /// The default folder, if it is set and still exists.
    pub fn default_folder(&self) -> Option<&PresetFolder> {
        self.management
            .default_folder_id
            .as_deref()
            .and_then(|id| self.folder(id))
    }

    // --- Folders ---

    pub fn create_folder<G: IdGenerator>(
        &mut self,
        name: &str,
        parent_id: Option<&str>,
        ids: &mut G,
    ) -> Result<String> {
        if self.folder_by_name(name).is_some() {
            return Err(PromptDictError::DuplicateName {
                kind: "folder",
                name: name.to_string(),
            });
        }
        if let Some(parent) = parent_id {
            self.require_folder(parent)?;
        }
        let id = ids.unused_id(FOLDER_PREFIX, |id| self.has_id(id));
        let mut folder = PresetFolder::new(id.clone(), name);
        folder.parent_id = parent_id.map(str::to_string);
        self.folders.push(folder);
        Ok(id)
    }

    pub fn rename_folder(&mut self, id: &str, name: &str) -> Result<()> {
        if self.folders.iter().any(|f| f.name == name && f.id != id) {
            return Err(PromptDictError::DuplicateName {
                kind: "folder",
                name: name.to_string(),
            });
        }
        let folder = self
            .folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| PromptDictError::FolderNotFound(id.to_string()))?;
        folder.name = name.to_string();
        Ok(())
    }

    /// Re-parents a folder. `None` moves it to the top level.
    pub fn move_folder(&mut self, id: &str, parent_id: Option<&str>) -> Result<()> {
        self.require_folder(id)?;
        if let Some(parent) = parent_id {
            self.require_folder(parent)?;
            if self.is_descendant_or_self(parent, id) {
                return Err(PromptDictError::FolderCycle {
                    folder: id.to_string(),
                    parent: parent.to_string(),
                });
            }
        }
        if let Some(folder) = self.folders.iter_mut().find(|f| f.id == id) {
            folder.parent_id = parent_id.map(str::to_string);
        }
        Ok(())
    }

    /// Whether `candidate` is `ancestor` or sits somewhere below it.
    fn is_descendant_or_self(&self, candidate: &str, ancestor: &str) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(candidate);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            if !seen.insert(id) {
                return false;
            }
            current = self.folder(id).and_then(|f| f.parent_id.as_deref());
        }
        false
    }

    /// Removes a folder. Presets inside it and child folders are kept and lose their
    /// reference to it.
    pub fn delete_folder(&mut self, id: &str) -> Result<()> {
        let before = self.folders.len();
        self.folders.retain(|f| f.id != id);
        if self.folders.len() == before {
            return Err(PromptDictError::FolderNotFound(id.to_string()));
        }
        for folder in &mut self.folders {
            if folder.parent_id.as_deref() == Some(id) {
                folder.parent_id = None;
            }
        }
        for preset in &mut self.presets {
            if preset.folder_id.as_deref() == Some(id) {
                preset.folder_id = None;
            }
        }
        if self.management.default_folder_id.as_deref() == Some(id) {
            self.management.default_folder_id = None;
        }
        Ok(())
    }

    pub fn set_default_folder(&mut self, id: Option<&str>) -> Result<()> {
        if let Some(id) = id {
            self.require_folder(id)?;
        }
        self.management.default_folder_id = id.map(str::to_string);
        Ok(())
    }

    // --- Extended presets ---

    fn find_by_name_and_kind(&self, name: &str, kind: PresetType) -> Option<usize> {
        self.presets
            .iter()
            .position(|p| p.name == name && p.kind == kind)
    }

    pub fn create_preset<G: IdGenerator>(
        &mut self,
        name: &str,
        kind: PresetType,
        content: &str,
        folder_id: Option<&str>,
        ids: &mut G,
        now: DateTime<Utc>,
    ) -> Result<String> {
        if self.find_by_name_and_kind(name, kind).is_some() {
            return Err(PromptDictError::DuplicateName {
                kind: "preset",
                name: format!("{name} ({kind})"),
            });
        }
        if let Some(folder) = folder_id {
            self.require_folder(folder)?;
        }
        let id = ids.unused_id(PRESET_PREFIX, |id| self.has_id(id));
        self.presets.push(ExtendedPreset {
            id: id.clone(),
            name: name.to_string(),
            kind,
            content: content.to_string(),
            description: None,
            tags: None,
            folder_id: folder_id.map(str::to_string),
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    pub fn update_preset(&mut self, id: &str, patch: PresetPatch, now: DateTime<Utc>) -> Result<()> {
        let idx = self
            .presets
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| PromptDictError::PresetNotFound(id.to_string()))?;

        let name = patch.name.as_deref().unwrap_or(&self.presets[idx].name);
        let kind = patch.kind.unwrap_or(self.presets[idx].kind);
        if let Some(other) = self.find_by_name_and_kind(name, kind) {
            if other != idx {
                return Err(PromptDictError::DuplicateName {
                    kind: "preset",
                    name: format!("{name} ({kind})"),
                });
            }
        }
        if let Some(Some(folder)) = &patch.folder_id {
            self.require_folder(folder)?;
        }

        let preset = &mut self.presets[idx];
        if let Some(name) = patch.name {
            preset.name = name;
        }
        if let Some(kind) = patch.kind {
            preset.kind = kind;
        }
        if let Some(content) = patch.content {
            preset.content = content;
        }
        if let Some(description) = patch.description {
            preset.description = description;
        }
        if let Some(tags) = patch.tags {
            preset.tags = Some(tags);
        }
        if let Some(folder_id) = patch.folder_id {
            preset.folder_id = folder_id;
        }
        preset.updated_at = now;
        Ok(())
    }

    pub fn delete_preset(&mut self, id: &str) -> Result<()> {
        let before = self.presets.len();
        self.presets.retain(|p| p.id != id);
        if self.presets.len() == before {
            return Err(PromptDictError::PresetNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Presets filed directly in `folder_id`; `None` lists unfiled presets.
    pub fn presets_in_folder(&self, folder_id: Option<&str>) -> Vec<&ExtendedPreset> {
        self.presets
            .iter()
            .filter(|p| p.folder_id.as_deref() == folder_id)
            .collect()
    }

    // --- Repair ---

    /// Clears `folderId`, `parentId` and the default folder wherever they name a folder
    /// that does not exist. Returns how many references were dropped.
    pub fn drop_dangling_references(&mut self) -> usize {
        let known: HashSet<String> = self.folders.iter().map(|f| f.id.clone()).collect();
        let mut dropped = 0;
        for folder in &mut self.folders {
            if folder.parent_id.as_ref().is_some_and(|p| !known.contains(p)) {
                folder.parent_id = None;
                dropped += 1;
            }
        }
        for preset in &mut self.presets {
            if preset.folder_id.as_ref().is_some_and(|f| !known.contains(f)) {
                preset.folder_id = None;
                dropped += 1;
            }
        }
        if self
            .management
            .default_folder_id
            .as_ref()
            .is_some_and(|f| !known.contains(f))
        {
            self.management.default_folder_id = None;
            dropped += 1;
        }
        if dropped > 0 {
            tracing::warn!(dropped, "dropped dangling folder references");
        }
        dropped
    }

    /// Clears the parent link that closes each cycle in the folder tree. Returns the
    /// number of links cleared.
    pub fn break_folder_cycles(&mut self) -> usize {
        let index: HashMap<String, usize> = self
            .folders
            .iter()
            .enumerate()
            .rev()
            .map(|(i, f)| (f.id.clone(), i))
            .collect();
        let mut broken = 0;
        for start in 0..self.folders.len() {
            let mut path = HashSet::from([start]);
            let mut current = start;
            while let Some(parent) = self.folders[current]
                .parent_id
                .as_ref()
                .and_then(|p| index.get(p).copied())
            {
                if path.contains(&parent) {
                    self.folders[current].parent_id = None;
                    broken += 1;
                    break;
                }
                path.insert(parent);
                current = parent;
            }
        }
        if broken > 0 {
            tracing::warn!(broken, "broke folder cycles");
        }
        broken
    }

    // --- Legacy presets ---

    /// Saves `text` under `name`, overwriting an existing legacy preset of that name.
    pub fn save_legacy(&mut self, name: &str, text: &str, now: DateTime<Utc>) {
        match self.legacy.iter_mut().find(|p| p.name == name) {
            Some(existing) => {
                existing.text = text.to_string();
                existing.updated_at = now;
            }
            None => self.legacy.push(Preset {
                name: name.to_string(),
                text: text.to_string(),
                updated_at: now,
            }),
        }
    }

    pub fn load_legacy(&self, name: &str) -> Option<&str> {
        self.legacy
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.text.as_str())
    }

    pub fn delete_legacy(&mut self, name: &str) -> bool {
        let before = self.legacy.len();
        self.legacy.retain(|p| p.name != name);
        self.legacy.len() != before
    }

    /// Renames a legacy preset. Renaming onto an existing name moves the text into that
    /// preset and removes the old one. Returns `false` if `old_name` does not exist.
    pub fn rename_legacy(&mut self, old_name: &str, new_name: &str, now: DateTime<Utc>) -> bool {
        let Some(source) = self.legacy.iter().position(|p| p.name == old_name) else {
            return false;
        };
        match self.legacy.iter().position(|p| p.name == new_name) {
            Some(target) if target != source => {
                let text = self.legacy[source].text.clone();
                self.legacy[target].text = text;
                self.legacy[target].updated_at = now;
                self.legacy.remove(source);
            }
            _ => {
                self.legacy[source].name = new_name.to_string();
                self.legacy[source].updated_at = now;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn library() -> (PresetLibrary, SequentialIds) {
        let mut ids = SequentialIds::new();
        let mut lib = PresetLibrary::new();
        let root = lib.create_folder("Root", None, &mut ids).unwrap();
        lib.create_folder("Child", Some(&root), &mut ids).unwrap();
        (lib, ids)
    }

    #[test]
    fn test_preset_type_serde() {
        assert_eq!(
            serde_json::to_string(&PresetType::Character).unwrap(),
            "\"character\""
        );
        assert_eq!("scene".parse::<PresetType>().unwrap(), PresetType::Scene);
        assert!("landscape".parse::<PresetType>().is_err());
    }

    #[test]
    fn test_extended_preset_wire_format() {
        let json = r#"{"id":"p1","name":"Hero","type":"character","content":"1girl","folderId":"f1","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-02T00:00:00Z"}"#;
        let preset: ExtendedPreset = serde_json::from_str(json).unwrap();
        assert_eq!(preset.kind, PresetType::Character);
        assert_eq!(preset.folder_id.as_deref(), Some("f1"));
        let back = serde_json::to_value(&preset).unwrap();
        assert_eq!(back["type"], "character");
        assert!(back.get("description").is_none());
    }

    #[test]
    fn test_management_keeps_unknown_fields() {
        let json = r#"{"defaultFolderId":"f1","viewMode":"grid","expanded":["a"]}"#;
        let mgmt: PresetManagement = serde_json::from_str(json).unwrap();
        assert_eq!(mgmt.default_folder_id.as_deref(), Some("f1"));
        assert_eq!(mgmt.extra["viewMode"], "grid");
        let back = serde_json::to_value(&mgmt).unwrap();
        assert_eq!(back["expanded"], serde_json::json!(["a"]));
    }

    #[test]
    fn test_create_folder_rules() {
        let (mut lib, mut ids) = library();
        assert!(matches!(
            lib.create_folder("Root", None, &mut ids).unwrap_err(),
            PromptDictError::DuplicateName { kind: "folder", .. }
        ));
        assert!(matches!(
            lib.create_folder("Orphan", Some("folder_404"), &mut ids).unwrap_err(),
            PromptDictError::FolderNotFound(_)
        ));
        assert_eq!(lib.folder_by_name("Child").unwrap().parent_id.as_deref(), Some("folder_1"));
    }

    #[test]
    fn test_created_ids_skip_existing_ones() {
        let mut ids = SequentialIds::new();
        let mut lib = PresetLibrary::new();
        lib.folders.push(PresetFolder::new("folder_1", "Imported"));
        let folder = lib.create_folder("Mine", None, &mut ids).unwrap();
        assert_eq!(folder, "folder_2");

        let mut ids = SequentialIds::starting_after(1);
        let preset = lib
            .create_preset("Hero", PresetType::Character, "a", None, &mut ids, now())
            .unwrap();
        assert_eq!(preset, "preset_3");
        assert!(lib.has_id("preset_3"));
    }

    #[test]
    fn test_move_folder_rejects_cycles() {
        let (mut lib, _) = library();
        let err = lib.move_folder("folder_1", Some("folder_2")).unwrap_err();
        assert!(matches!(err, PromptDictError::FolderCycle { .. }));
        assert!(lib.move_folder("folder_1", Some("folder_1")).is_err());
        lib.move_folder("folder_2", None).unwrap();
        lib.move_folder("folder_1", Some("folder_2")).unwrap();
        assert_eq!(lib.folder("folder_1").unwrap().parent_id.as_deref(), Some("folder_2"));
    }

    #[test]
    fn test_delete_folder_clears_references() {
        let (mut lib, mut ids) = library();
        let preset = lib
            .create_preset("Hero", PresetType::Character, "1girl", Some("folder_1"), &mut ids, now())
            .unwrap();
        lib.set_default_folder(Some("folder_1")).unwrap();

        lib.delete_folder("folder_1").unwrap();
        assert!(lib.folder("folder_2").unwrap().parent_id.is_none());
        assert!(lib.preset(&preset).unwrap().folder_id.is_none());
        assert!(lib.management.default_folder_id.is_none());
        assert!(lib.delete_folder("folder_1").is_err());
    }

    #[test]
    fn test_preset_identity_is_name_and_type() {
        let (mut lib, mut ids) = library();
        lib.create_preset("Hero", PresetType::Character, "a", None, &mut ids, now())
            .unwrap();
        lib.create_preset("Hero", PresetType::Scene, "b", None, &mut ids, now())
            .unwrap();
        assert!(lib
            .create_preset("Hero", PresetType::Scene, "c", None, &mut ids, now())
            .is_err());
        assert_eq!(lib.presets_in_folder(None).len(), 2);
    }

    #[test]
    fn test_update_preset_patch() {
        let (mut lib, mut ids) = library();
        let id = lib
            .create_preset("Hero", PresetType::Character, "a", Some("folder_2"), &mut ids, now())
            .unwrap();
        let patch = PresetPatch {
            content: Some("b".into()),
            description: Some(Some("main".into())),
            folder_id: Some(None),
            ..Default::default()
        };
        lib.update_preset(&id, patch, now()).unwrap();
        let preset = lib.preset(&id).unwrap();
        assert_eq!(preset.content, "b");
        assert_eq!(preset.description.as_deref(), Some("main"));
        assert!(preset.folder_id.is_none());
        assert_eq!(preset.name, "Hero");

        let bad = PresetPatch {
            folder_id: Some(Some("folder_404".into())),
            ..Default::default()
        };
        assert!(lib.update_preset(&id, bad, now()).is_err());
        assert!(lib.update_preset("nope", PresetPatch::default(), now()).is_err());
        lib.delete_preset(&id).unwrap();
        assert!(lib.presets.is_empty());
    }

    #[test]
    fn test_drop_dangling_references() {
        let (mut lib, _) = library();
        lib.folders[1].parent_id = Some("gone".into());
        lib.management.default_folder_id = Some("gone".into());
        assert_eq!(lib.drop_dangling_references(), 2);
        assert_eq!(lib.drop_dangling_references(), 0);
    }

    #[test]
    fn test_break_folder_cycles() {
        let mut lib = PresetLibrary::new();
        lib.folders = vec![
            PresetFolder::new("a", "A").with_parent("b"),
            PresetFolder::new("b", "B").with_parent("a"),
            PresetFolder::new("c", "C").with_parent("c"),
            PresetFolder::new("d", "D").with_parent("a"),
        ];
        assert_eq!(lib.break_folder_cycles(), 2);
        assert_eq!(lib.break_folder_cycles(), 0);
        assert!(lib.folder("c").unwrap().parent_id.is_none());
        assert_eq!(lib.folder("d").unwrap().parent_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_legacy_save_load_delete() {
        let mut lib = PresetLibrary::new();
        lib.save_legacy("day", "sky, sun", now());
        lib.save_legacy("day", "sky", now());
        assert_eq!(lib.legacy.len(), 1);
        assert_eq!(lib.load_legacy("day"), Some("sky"));
        assert!(lib.delete_legacy("day"));
        assert!(!lib.delete_legacy("day"));
        assert_eq!(lib.load_legacy("day"), None);
    }

    #[test]
    fn test_legacy_rename_onto_existing_merges() {
        let mut lib = PresetLibrary::new();
        lib.save_legacy("a", "text a", now());
        lib.save_legacy("b", "text b", now());
        assert!(lib.rename_legacy("a", "b", now()));
        assert_eq!(lib.legacy.len(), 1);
        assert_eq!(lib.load_legacy("b"), Some("text a"));

        assert!(lib.rename_legacy("b", "c", now()));
        assert_eq!(lib.load_legacy("c"), Some("text a"));
        assert!(!lib.rename_legacy("missing", "x", now()));
    }
}
