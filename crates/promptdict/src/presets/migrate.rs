//! One-time conversion of legacy presets into extended presets.

use super::{ExtendedPreset, PresetLibrary, PresetType};
use crate::ids::{IdGenerator, PRESET_PREFIX};

/// Converts every legacy preset that has no `positive` extended preset of the same name,
/// files it into the default folder when that folder exists, then clears the legacy
/// list. Returns the number of presets created. Running it again is a no-op.
pub fn migrate_legacy<G: IdGenerator>(library: &mut PresetLibrary, ids: &mut G) -> usize {
    if library.legacy.is_empty() {
        return 0;
    }
    let folder_id = library.default_folder().map(|f| f.id.clone());
    let legacy = std::mem::take(&mut library.legacy);

    let mut created = 0;
    for preset in legacy {
        let exists = library
            .presets
            .iter()
            .any(|p| p.kind == PresetType::Positive && p.name == preset.name);
        if exists {
            continue;
        }
        let id = ids.unused_id(PRESET_PREFIX, |id| library.has_id(id));
        library.presets.push(ExtendedPreset {
            id,
            name: preset.name,
            kind: PresetType::Positive,
            content: preset.text,
            description: None,
            tags: None,
            folder_id: folder_id.clone(),
            created_at: preset.updated_at,
            updated_at: preset.updated_at,
        });
        created += 1;
    }
    tracing::info!(created, "migrated legacy presets");
    created
}
