//! # Configuration
//!
//! Session configuration is managed by [`confique`], which layers values from
//! environment variables, an optional TOML file and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `PROMPTDICT_STORAGE_KEY`, `PROMPTDICT_PERSIST_DELAY_MS`, etc.
//! 2. **Config file**: `promptdict.toml`, usually in the user's config directory.
//! 3. **Compiled defaults**: `#[config(default = ...)]` below.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `storage_key` | `ops.prompt.dataset.v1` | Snapshot slot in the storage backend |
//! | `persist_delay_ms` | `400` | Trailing debounce before a snapshot is written |
//! | `translation_languages` | `["zh_CN", "es_ES"]` | Optional baseline translations to load |
//! | `default_language` | unset | Initially selected language |
//! | `store_diff_only` | `false` | Persist only the diff against the baseline |
//! | `custom_category` | `Custom` | Category receiving ad-hoc mappings |
//! | `custom_group` | `User Mapping` | Group receiving ad-hoc mappings |
//! | `custom_group_color` | `#6366f1` | Color of a newly created mapping group |

use crate::error::Result;
use crate::model::{LangCode, LANG_EN, LANG_ZH_CN};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "promptdict.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Name of the snapshot slot in the storage backend.
    #[config(default = "ops.prompt.dataset.v1", env = "PROMPTDICT_STORAGE_KEY")]
    pub storage_key: String,

    /// Milliseconds of inactivity before pending changes are written.
    #[config(default = 400, env = "PROMPTDICT_PERSIST_DELAY_MS")]
    pub persist_delay_ms: u64,

    /// Baseline translation documents to load, besides the English structure.
    #[config(default = ["zh_CN", "es_ES"])]
    pub translation_languages: Vec<LangCode>,

    /// Language selected when a session starts without a saved choice.
    #[config(env = "PROMPTDICT_DEFAULT_LANGUAGE")]
    pub default_language: Option<LangCode>,

    /// Persist the diff against the baseline instead of the full dataset.
    #[config(default = false, env = "PROMPTDICT_STORE_DIFF_ONLY")]
    pub store_diff_only: bool,

    #[config(default = "Custom")]
    pub custom_category: String,

    #[config(default = "User Mapping")]
    pub custom_group: String,

    #[config(default = "#6366f1")]
    pub custom_group_color: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: "ops.prompt.dataset.v1".to_string(),
            persist_delay_ms: 400,
            translation_languages: vec!["zh_CN".to_string(), "es_ES".to_string()],
            default_language: None,
            store_diff_only: false,
            custom_category: "Custom".to_string(),
            custom_group: "User Mapping".to_string(),
            custom_group_color: "#6366f1".to_string(),
        }
    }
}

impl SessionConfig {
    /// Loads configuration from the environment and, if given, a TOML file.
    ///
    /// A missing file is not an error; defaults fill in whatever is not set.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = SessionConfig::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    pub fn persist_delay(&self) -> Duration {
        Duration::from_millis(self.persist_delay_ms)
    }

    /// The language to select for a dataset declaring `languages`.
    pub fn initial_language(&self, languages: &[LangCode]) -> LangCode {
        if let Some(lang) = &self.default_language {
            return lang.clone();
        }
        if languages.iter().any(|l| l == LANG_ZH_CN) {
            LANG_ZH_CN.to_string()
        } else {
            LANG_EN.to_string()
        }
    }
}
