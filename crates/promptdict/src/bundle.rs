//! # Wire Documents
//!
//! Three JSON documents leave or enter the system. All share a `version` integer and a
//! `savedAt` timestamp, and use camelCase field names.
//!
//! | Document | Producer | Contents |
//! |----------|----------|----------|
//! | [`Snapshot`] | session persistence | dataset or diff, presets, editor state |
//! | [`DictionaryExport`] | dictionary export | the diff against the baseline, nothing else |
//! | [`PresetExport`] | preset export | folders, extended and legacy presets, management |
//!
//! Preset imports accept either the preset export or the older `{ presets: [...] }`
//! shape; [`parse_preset_import`] tells them apart before anything is deserialized into
//! typed structures, so an unrecognized document is rejected without side effects.

use crate::diff::Diff;
use crate::error::{PromptDictError, Result};
use crate::model::{Dataset, LangCode};
use crate::presets::{
    ExtendedPreset, Preset, PresetFolder, PresetLibrary, PresetManagement, PresetPayload,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const BUNDLE_VERSION: u32 = 1;
pub const PRESETS_BUNDLE_TYPE: &str = "presets";

/// Persisted session state. `dataset` wins over `custom_diff` when both are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub version: u32,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<Dataset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_diff: Option<Diff>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presets: Option<Vec<Preset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_presets: Option<Vec<ExtendedPreset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_folders: Option<Vec<PresetFolder>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_management: Option<PresetManagement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_lang: Option<LangCode>,
}

impl Snapshot {
    pub fn new(saved_at: DateTime<Utc>) -> Self {
        Self {
            version: BUNDLE_VERSION,
            saved_at,
            dataset: None,
            custom_diff: None,
            presets: None,
            extended_presets: None,
            preset_folders: None,
            preset_management: None,
            prompt_text: None,
            selected_lang: None,
        }
    }

    pub fn with_library(mut self, library: &PresetLibrary) -> Self {
        self.presets = Some(library.legacy.clone());
        self.extended_presets = Some(library.presets.clone());
        self.preset_folders = Some(library.folders.clone());
        self.preset_management = Some(library.management.clone());
        self
    }

    /// The preset library stored in this snapshot; absent parts are empty.
    pub fn library(&self) -> PresetLibrary {
        PresetLibrary {
            legacy: self.presets.clone().unwrap_or_default(),
            presets: self.extended_presets.clone().unwrap_or_default(),
            folders: self.preset_folders.clone().unwrap_or_default(),
            management: self.preset_management.clone().unwrap_or_default(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// A dictionary export: only the user's changes against the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryExport {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub custom_diff: Diff,
}

impl DictionaryExport {
    pub fn new(custom_diff: Diff, saved_at: DateTime<Utc>) -> Self {
        Self {
            version: BUNDLE_VERSION,
            saved_at,
            custom_diff,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// What a dictionary import resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum DictionaryImport {
    /// A full dataset, used as is.
    Dataset(Dataset),
    /// Changes to apply onto the baseline.
    Diff(Diff),
}

/// Parses a dictionary import. Accepts a [`DictionaryExport`] or any document carrying
/// a `dataset` or `customDiff`; `dataset` wins when both are present.
pub fn parse_dictionary_import(text: &str) -> Result<DictionaryImport> {
    let snapshot = Snapshot::from_json(text)?;
    match (snapshot.dataset, snapshot.custom_diff) {
        (Some(dataset), _) => Ok(DictionaryImport::Dataset(dataset)),
        (None, Some(diff)) => Ok(DictionaryImport::Diff(diff)),
        (None, None) => Err(PromptDictError::InvalidPayload(
            "expected a `dataset` or `customDiff` field".to_string(),
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetExport {
    #[serde(default)]
    pub version: u32,
    #[serde(rename = "type", default = "presets_type")]
    pub kind: String,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub extended_presets: Vec<ExtendedPreset>,
    #[serde(default)]
    pub preset_folders: Vec<PresetFolder>,
    #[serde(default)]
    pub preset_management: PresetManagement,
    #[serde(default)]
    pub presets: Vec<Preset>,
}

fn presets_type() -> String {
    PRESETS_BUNDLE_TYPE.to_string()
}

impl PresetExport {
    pub fn from_library(library: &PresetLibrary, saved_at: DateTime<Utc>) -> Self {
        Self {
            version: BUNDLE_VERSION,
            kind: presets_type(),
            saved_at,
            extended_presets: library.presets.clone(),
            preset_folders: library.folders.clone(),
            preset_management: library.management.clone(),
            presets: library.legacy.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn into_library(self) -> PresetLibrary {
        PresetLibrary {
            legacy: self.presets,
            presets: self.extended_presets,
            folders: self.preset_folders,
            management: self.preset_management,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LegacyPresetDocument {
    presets: Vec<Preset>,
}

/// A recognized preset import document.
#[derive(Debug, Clone, PartialEq)]
pub enum PresetImport {
    Bundle(PresetExport),
    Legacy(Vec<Preset>),
}

impl PresetImport {
    pub fn into_payload(self) -> PresetPayload {
        match self {
            PresetImport::Bundle(export) => PresetPayload {
                folders: export.preset_folders,
                presets: export.extended_presets,
                legacy: export.presets,
                management: Some(export.preset_management),
            },
            PresetImport::Legacy(legacy) => PresetPayload {
                legacy,
                ..Default::default()
            },
        }
    }
}

/// Recognizes a preset import document.
///
/// A document is a bundle if `type` is `"presets"` or it has any of `extendedPresets`,
/// `presetFolders` or `presetManagement`; otherwise it is legacy if it has a `presets`
/// array. Anything else is [`PromptDictError::InvalidPayload`].
pub fn parse_preset_import(text: &str) -> Result<PresetImport> {
    let value: Value = serde_json::from_str(text)?;
    let Some(object) = value.as_object() else {
        return Err(PromptDictError::InvalidPayload(
            "expected a JSON object".to_string(),
        ));
    };

    let is_bundle = object.get("type").and_then(Value::as_str) == Some(PRESETS_BUNDLE_TYPE)
        || ["extendedPresets", "presetFolders", "presetManagement"]
            .iter()
            .any(|k| object.contains_key(*k));
    if is_bundle {
        return Ok(PresetImport::Bundle(serde_json::from_value(value)?));
    }
    if object.get("presets").is_some_and(Value::is_array) {
        let doc: LegacyPresetDocument = serde_json::from_value(value)?;
        return Ok(PresetImport::Legacy(doc.presets));
    }
    Err(PromptDictError::InvalidPayload(
        "no presets found in document".to_string(),
    ))
}
