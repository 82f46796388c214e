use chrono::Utc;
use promptdict::bundle::{parse_preset_import, PresetExport};
use promptdict::ids::SequentialIds;
use promptdict::presets::{merge_import, migrate_legacy, PresetFolder, PresetLibrary, PresetType};
use promptdict::{ErrorKind, PromptDictError};

fn local_library() -> PresetLibrary {
    let mut lib = PresetLibrary::new();
    lib.folders.push(PresetFolder::new("g9", "Characters"));
    lib
}

const PAYLOAD: &str = r##"{
  "version": 1,
  "type": "presets",
  "savedAt": "2024-06-01T12:00:00Z",
  "presetFolders": [
    {"id": "f3", "name": "Villains", "parentId": "f1"},
    {"id": "f1", "name": "Characters", "color": "#ef4444"},
    {"id": "f2", "name": "Scenes", "parentId": "f404"}
  ],
  "extendedPresets": [
    {"id": "p1", "name": "Hero", "type": "character", "content": "1girl, cape", "folderId": "f1",
     "createdAt": "2024-05-01T00:00:00Z", "updatedAt": "2024-05-02T00:00:00Z"},
    {"id": "p2", "name": "Lair", "type": "scene", "content": "cave", "folderId": "f3"}
  ],
  "presetManagement": {"defaultFolderId": "f2", "sortBy": "name"},
  "presets": []
}"##;

#[test]
fn test_bundle_merges_onto_existing_folders() {
    let mut ids = SequentialIds::new();
    let mut lib = local_library();
    let payload = parse_preset_import(PAYLOAD).unwrap().into_payload();
    let report = merge_import(&mut lib, &payload, &mut ids, Utc::now());

    assert_eq!(report.folders_matched, 1);
    assert_eq!(report.folders_created, 2);
    assert_eq!(lib.folders.len(), 3);

    let characters = lib.folder("g9").unwrap();
    assert_eq!(characters.color.as_deref(), Some("#ef4444"));

    let villains = lib.folder_by_name("Villains").unwrap();
    assert_eq!(villains.parent_id.as_deref(), Some("g9"));
    let scenes = lib.folder_by_name("Scenes").unwrap();
    assert!(scenes.parent_id.is_none());

    let hero = lib.presets.iter().find(|p| p.name == "Hero").unwrap();
    assert_eq!(hero.folder_id.as_deref(), Some("g9"));
    let lair = lib.presets.iter().find(|p| p.name == "Lair").unwrap();
    assert_eq!(lair.folder_id.as_deref(), Some(villains.id.as_str()));

    assert_eq!(lib.default_folder().unwrap().name, "Scenes");
    assert!(lib.management.extra.is_empty());
}

#[test]
fn test_reimport_creates_nothing() {
    let mut ids = SequentialIds::new();
    let mut lib = local_library();
    let payload = parse_preset_import(PAYLOAD).unwrap().into_payload();
    merge_import(&mut lib, &payload, &mut ids, Utc::now());
    let folders = lib.folders.clone();

    let report = merge_import(&mut lib, &payload, &mut ids, Utc::now());
    assert_eq!(report.folders_created, 0);
    assert_eq!(report.folders_matched, 3);
    assert_eq!(report.presets_created, 0);
    assert_eq!(report.presets_updated, 2);
    assert_eq!(lib.folders, folders);
    assert_eq!(lib.presets.len(), 2);
}

#[test]
fn test_export_then_import_into_empty_library() {
    let mut ids = SequentialIds::new();
    let mut source = local_library();
    let payload = parse_preset_import(PAYLOAD).unwrap().into_payload();
    merge_import(&mut source, &payload, &mut ids, Utc::now());

    let export = PresetExport::from_library(&source, Utc::now())
        .to_json_pretty()
        .unwrap();
    let mut target = PresetLibrary::new();
    let report = merge_import(
        &mut target,
        &parse_preset_import(&export).unwrap().into_payload(),
        &mut ids,
        Utc::now(),
    );
    assert_eq!(report.folders_created, 3);
    assert_eq!(report.presets_created, 2);
    let villains = target.folder_by_name("Villains").unwrap();
    let characters = target.folder_by_name("Characters").unwrap();
    assert_eq!(villains.parent_id.as_deref(), Some(characters.id.as_str()));
}

#[test]
fn test_legacy_document_then_migration() {
    let mut ids = SequentialIds::new();
    let mut lib = PresetLibrary::new();
    let legacy = r#"{"presets": [
        {"name": "day", "text": "sky, sun", "updatedAt": "2024-01-01T00:00:00Z"},
        {"name": "night", "text": "moon"}
    ]}"#;
    let report = merge_import(
        &mut lib,
        &parse_preset_import(legacy).unwrap().into_payload(),
        &mut ids,
        Utc::now(),
    );
    assert_eq!(report.legacy_imported, 2);
    assert!(lib
        .presets
        .iter()
        .all(|p| p.kind == PresetType::Positive));

    lib.save_legacy("day", "other", Utc::now());
    assert_eq!(migrate_legacy(&mut lib, &mut ids), 0);
    assert_eq!(migrate_legacy(&mut lib, &mut ids), 0);
    assert_eq!(lib.presets.len(), 2);
    assert!(lib.legacy.is_empty());
}

#[test]
fn test_rejected_payload_is_malformed_input() {
    let err = parse_preset_import(r#"{"categories": []}"#).unwrap_err();
    assert!(matches!(err, PromptDictError::InvalidPayload(_)));
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}
