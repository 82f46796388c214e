//! Merging an imported preset collection into the local library.
//!
//! Foreign ids mean nothing locally, so folders are reconciled by name and presets by
//! `(name, type)`. The merge runs in two passes over the folders:
//!
//! ```text
//! pass 1: foreign folder ──name match──▶ existing local id  (refresh description/color)
//!                        └─no match────▶ fresh id, staged
//! pass 2: staged folders get parentId translated through the complete map
//! ```
//!
//! Because the map is complete before any `parentId` is translated, a child may appear
//! before its parent in the payload. Presets are then matched and their `folderId`
//! translated through the same map. Finally cycles are broken and dangling references
//! dropped, so the library is consistent whatever the payload contained.
//!
//! Importing the same payload twice creates nothing the second time: every folder
//! matches by name and every preset by `(name, type)`.

use super::{ExtendedPreset, Preset, PresetFolder, PresetLibrary, PresetManagement, PresetType};
use crate::ids::{IdGenerator, FOLDER_PREFIX, PRESET_PREFIX};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A foreign preset collection, already parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetPayload {
    pub folders: Vec<PresetFolder>,
    pub presets: Vec<ExtendedPreset>,
    pub legacy: Vec<Preset>,
    pub management: Option<PresetManagement>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub folders_created: usize,
    pub folders_matched: usize,
    pub presets_created: usize,
    pub presets_updated: usize,
    pub legacy_imported: usize,
}

impl MergeReport {
    pub fn is_noop(&self) -> bool {
        *self == MergeReport::default()
    }
}

/// Merges `payload` into `library`.
pub fn merge_import<G: IdGenerator>(
    library: &mut PresetLibrary,
    payload: &PresetPayload,
    ids: &mut G,
    now: DateTime<Utc>,
) -> MergeReport {
    let mut report = MergeReport::default();

    let folder_map = reconcile_folders(library, &payload.folders, ids, &mut report);
    let translate = |id: &Option<String>| id.as_ref().and_then(|f| folder_map.get(f).cloned());

    for foreign in &payload.presets {
        let folder_id = translate(&foreign.folder_id);
        let existing = library
            .presets
            .iter_mut()
            .find(|p| p.name == foreign.name && p.kind == foreign.kind);
        match existing {
            Some(local) => {
                local.content = foreign.content.clone();
                local.description = foreign.description.clone();
                local.tags = foreign.tags.clone();
                if folder_id.is_some() {
                    local.folder_id = folder_id;
                }
                local.updated_at = now;
                report.presets_updated += 1;
            }
            None => {
                let id = ids.unused_id(PRESET_PREFIX, |id| library.has_id(id));
                library.presets.push(ExtendedPreset {
                    id,
                    folder_id,
                    updated_at: now,
                    ..foreign.clone()
                });
                report.presets_created += 1;
            }
        }
    }

    for legacy in &payload.legacy {
        let id = ids.unused_id(PRESET_PREFIX, |id| library.has_id(id));
        library.presets.push(ExtendedPreset {
            id,
            name: legacy.name.clone(),
            kind: PresetType::Positive,
            content: legacy.text.clone(),
            description: None,
            tags: None,
            folder_id: None,
            created_at: legacy.updated_at,
            updated_at: now,
        });
        report.legacy_imported += 1;
    }

    if library.management.default_folder_id.is_none() {
        if let Some(default) = payload
            .management
            .as_ref()
            .and_then(|m| m.default_folder_id.as_ref())
        {
            library.management.default_folder_id = folder_map.get(default).cloned();
        }
    }

    library.break_folder_cycles();
    library.drop_dangling_references();

    tracing::info!(
        folders_created = report.folders_created,
        folders_matched = report.folders_matched,
        presets_created = report.presets_created,
        presets_updated = report.presets_updated,
        legacy_imported = report.legacy_imported,
        "merged preset import"
    );
    report
}

/// Builds the foreign → local folder id map and appends the folders that had no local
/// counterpart.
fn reconcile_folders<G: IdGenerator>(
    library: &mut PresetLibrary,
    foreign: &[PresetFolder],
    ids: &mut G,
    report: &mut MergeReport,
) -> HashMap<String, String> {
    let mut map: HashMap<String, String> = HashMap::with_capacity(foreign.len());
    let mut by_name: HashMap<String, String> = HashMap::new();
    for folder in library.folders.iter().rev() {
        by_name.insert(folder.name.clone(), folder.id.clone());
    }
    let existing = library.folders.len();
    let mut staged: Vec<PresetFolder> = Vec::new();

    for folder in foreign {
        match by_name.get(&folder.name) {
            Some(local_id) => {
                map.insert(folder.id.clone(), local_id.clone());
                let target = library.folders[..existing]
                    .iter_mut()
                    .chain(staged.iter_mut())
                    .find(|f| &f.id == local_id);
                if let Some(target) = target {
                    if folder.description.is_some() {
                        target.description = folder.description.clone();
                    }
                    if folder.color.is_some() {
                        target.color = folder.color.clone();
                    }
                }
                report.folders_matched += 1;
            }
            None => {
                let id = ids.unused_id(FOLDER_PREFIX, |id| {
                    library.has_id(id) || staged.iter().any(|f| f.id == id)
                });
                map.insert(folder.id.clone(), id.clone());
                by_name.insert(folder.name.clone(), id.clone());
                staged.push(PresetFolder {
                    id,
                    ..folder.clone()
                });
                report.folders_created += 1;
            }
        }
    }

    for folder in &mut staged {
        folder.parent_id = folder.parent_id.as_ref().and_then(|p| map.get(p).cloned());
    }
    library.folders.extend(staged);
    map
}
