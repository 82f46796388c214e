//! # Baseline Loading
//!
//! The baseline dictionary ships as YAML documents:
//!
//! - `default.yaml`: the structure. Categories, their groups and the tag keys. Mandatory.
//! - `{lang}.yaml`: one per translation language, same shape, with the translated text
//!   as the tag values. Optional.
//!
//! ```yaml
//! - name: Quality
//!   groups:
//!     - name: Basic
//!       color: "#f59e0b"
//!       tags:
//!         masterpiece: 杰作
//!         best_quality: ~
//! ```
//!
//! Tag order follows the mapping order. Structure tags carry only their English
//! translation (the key). A translation document is flattened to `key → text` regardless
//! of where the key sits in its tree, and applied to every structure tag with that key;
//! an empty or null value falls back to the key. Keys missing from a translation document
//! keep no entry for that language.
//!
//! A missing or invalid translation document is logged and skipped. A missing or invalid
//! structure document fails the load with [`PromptDictError::BaselineUnavailable`].

use crate::error::{PromptDictError, Result};
use crate::ids::{IdGenerator, CATEGORY_PREFIX, GROUP_PREFIX};
use crate::model::{Category, Dataset, Group, LangCode, Tag};
use chrono::Utc;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

pub const STRUCTURE_FILENAME: &str = "default.yaml";

#[derive(Debug, Deserialize)]
struct YamlCategory {
    name: String,
    #[serde(default)]
    groups: Vec<YamlGroup>,
}

#[derive(Debug, Deserialize)]
struct YamlGroup {
    name: String,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    tags: Option<Mapping>,
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_document(text: &str) -> Result<Vec<YamlCategory>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let doc: Option<Vec<YamlCategory>> = serde_yaml::from_str(text)?;
    Ok(doc.unwrap_or_default())
}

/// Builds the baseline structure from a `default.yaml` document.
pub fn build_structure<G: IdGenerator>(text: &str, ids: &mut G) -> Result<Dataset> {
    let mut issued: HashSet<String> = HashSet::new();
    let mut next_id = |prefix: &str| {
        let id = ids.unused_id(prefix, |id| issued.contains(id));
        issued.insert(id.clone());
        id
    };

    let mut categories = Vec::new();
    for cat in parse_document(text)? {
        let mut groups = Vec::with_capacity(cat.groups.len());
        for grp in cat.groups {
            let tags = grp
                .tags
                .iter()
                .flat_map(|m| m.iter().map(|(k, _)| k))
                .filter_map(scalar_to_string)
                .map(Tag::new)
                .collect();
            let mut group = Group::new(next_id(GROUP_PREFIX), grp.name).with_tags(tags);
            group.color = grp.color;
            groups.push(group);
        }
        categories.push(Category::new(next_id(CATEGORY_PREFIX), cat.name).with_groups(groups));
    }

    let mut dataset = Dataset::new(categories);
    dataset.updated_at = Some(Utc::now());
    Ok(dataset)
}

/// Flattens a translation document into `key → text`. Null values become `""`.
pub fn collect_translations(text: &str) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for cat in parse_document(text)? {
        for grp in cat.groups {
            for (key, value) in grp.tags.iter().flat_map(|m| m.iter()) {
                if let Some(key) = scalar_to_string(key) {
                    map.insert(key, scalar_to_string(value).unwrap_or_default());
                }
            }
        }
    }
    Ok(map)
}

/// Sets `lang` on every tag whose key appears in `translations` and declares the language.
pub fn merge_language(dataset: &mut Dataset, translations: &HashMap<String, String>, lang: &str) {
    for tag in dataset
        .categories
        .iter_mut()
        .flat_map(|c| c.groups.iter_mut())
        .flat_map(|g| g.tags.iter_mut())
    {
        if let Some(text) = translations.get(&tag.key) {
            let value = if text.is_empty() { tag.key.clone() } else { text.clone() };
            tag.translation.insert(lang.to_string(), value);
        }
    }
    dataset.register_language(lang);
}

/// Where baseline documents come from.
pub trait BaselineSource {
    /// The structure document.
    fn structure(&self) -> Result<String>;
    /// The translation document for `lang`.
    fn translation(&self, lang: &str) -> Result<String>;
}

/// Reads `default.yaml` and `{lang}.yaml` from a directory.
#[derive(Debug, Clone)]
pub struct DirBaselineSource {
    root: PathBuf,
}

impl DirBaselineSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BaselineSource for DirBaselineSource {
    fn structure(&self) -> Result<String> {
        Ok(std::fs::read_to_string(self.root.join(STRUCTURE_FILENAME))?)
    }

    fn translation(&self, lang: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.root.join(format!("{lang}.yaml")))?)
    }
}

/// In-memory documents, for tests and embedded baselines.
#[derive(Debug, Clone, Default)]
pub struct StaticBaselineSource {
    pub structure: String,
    pub translations: HashMap<LangCode, String>,
}

impl StaticBaselineSource {
    pub fn new(structure: impl Into<String>) -> Self {
        Self {
            structure: structure.into(),
            translations: HashMap::new(),
        }
    }

    pub fn with_translation(mut self, lang: &str, text: impl Into<String>) -> Self {
        self.translations.insert(lang.to_string(), text.into());
        self
    }
}

impl BaselineSource for StaticBaselineSource {
    fn structure(&self) -> Result<String> {
        Ok(self.structure.clone())
    }

    fn translation(&self, lang: &str) -> Result<String> {
        self.translations.get(lang).cloned().ok_or_else(|| {
            PromptDictError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{lang}.yaml"),
            ))
        })
    }
}

/// Loads the baseline: the structure, then each of `languages` that can be read and
/// parsed.
pub fn load_baseline<S: BaselineSource, G: IdGenerator>(
    source: &S,
    languages: &[LangCode],
    ids: &mut G,
) -> Result<Dataset> {
    let mut dataset = source
        .structure()
        .and_then(|text| build_structure(&text, ids))
        .map_err(|e| PromptDictError::BaselineUnavailable(format!("{STRUCTURE_FILENAME}: {e}")))?;

    for lang in languages {
        match source
            .translation(lang)
            .and_then(|text| collect_translations(&text))
        {
            Ok(translations) => merge_language(&mut dataset, &translations, lang),
            Err(e) => tracing::warn!(lang = %lang, error = %e, "translation not found or invalid"),
        }
    }

    tracing::info!(
        categories = dataset.categories.len(),
        tags = dataset.tag_count(),
        languages = ?dataset.languages,
        "loaded baseline"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    const STRUCTURE: &str = r##"
- name: Quality
  groups:
    - name: Basic
      color: "#f59e0b"
      tags:
        masterpiece: ~
        best_quality: ""
        blurry:
- name: Scene
  groups:
    - name: Sky
      tags:
        blue_sky:
"##;

    const ZH: &str = r#"
- name: 画质
  groups:
    - name: 基础
      tags:
        masterpiece: 杰作
        best_quality: ""
- name: 场景
  groups:
    - name: 天空
      tags:
        blue_sky: 蓝天
"#;

    #[test]
    fn test_structure_preserves_order_and_english() {
        let mut ids = SequentialIds::new();
        let ds = build_structure(STRUCTURE, &mut ids).unwrap();
        assert_eq!(ds.categories.len(), 2);
        let basic = &ds.categories[0].groups[0];
        assert_eq!(basic.keys(), vec!["masterpiece", "best_quality", "blurry"]);
        assert_eq!(basic.color.as_deref(), Some("#f59e0b"));
        assert_eq!(basic.tags[0].translation.len(), 1);
        assert_eq!(basic.tags[0].translation_for("en"), "masterpiece");
        assert_eq!(ds.languages, vec!["en"]);
        assert_eq!(ds.categories[0].id, "cat_2");
        assert_eq!(basic.id, "grp_1");
    }

    #[test]
    fn test_merge_language_fills_present_keys_only() {
        let mut ids = SequentialIds::new();
        let source = StaticBaselineSource::new(STRUCTURE).with_translation("zh_CN", ZH);
        let ds = load_baseline(&source, &["zh_CN".into(), "es_ES".into()], &mut ids).unwrap();

        let basic = &ds.categories[0].groups[0];
        assert_eq!(basic.tags[0].translation_for("zh_CN"), "杰作");
        assert_eq!(basic.tags[1].translation_for("zh_CN"), "best_quality");
        assert!(basic.tags[2].translation.get("zh_CN").is_none());
        assert_eq!(
            ds.categories[1].groups[0].tags[0].translation_for("zh_CN"),
            "蓝天"
        );
        assert_eq!(ds.languages, vec!["en", "zh_CN"]);
    }

    #[test]
    fn test_invalid_translation_is_skipped() {
        let mut ids = SequentialIds::new();
        let source =
            StaticBaselineSource::new(STRUCTURE).with_translation("es_ES", "- name: [unclosed");
        let ds = load_baseline(&source, &["es_ES".into()], &mut ids).unwrap();
        assert!(!ds.has_language("es_ES"));
    }

    #[test]
    fn test_missing_structure_is_fatal() {
        let mut ids = SequentialIds::new();
        let dir = tempfile::tempdir().unwrap();
        let err = load_baseline(&DirBaselineSource::new(dir.path()), &[], &mut ids).unwrap_err();
        assert!(matches!(err, PromptDictError::BaselineUnavailable(_)));
    }

    #[test]
    fn test_dir_source_reads_files() {
        let mut ids = SequentialIds::new();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("default.yaml"), STRUCTURE).unwrap();
        std::fs::write(dir.path().join("zh_CN.yaml"), ZH).unwrap();
        let ds = load_baseline(&DirBaselineSource::new(dir.path()), &["zh_CN".into()], &mut ids)
            .unwrap();
        assert_eq!(ds.tag_count(), 4);
        assert!(ds.has_language("zh_CN"));
    }

    #[test]
    fn test_empty_document_yields_empty_dataset() {
        let mut ids = SequentialIds::new();
        let ds = build_structure("", &mut ids).unwrap();
        assert!(ds.categories.is_empty());
    }
}
