//! # Session
//!
//! A [`Session`] is the in-memory state of one editing session: the baseline it started
//! from, the customized dataset, the preset library and the prompt editor state. It is
//! the only component that talks to a [`SnapshotBackend`].
//!
//! ## Restore
//!
//! [`Session::initialize`] reads the configured slot and picks the dictionary in this
//! order:
//!
//! 1. the snapshot's full `dataset`
//! 2. the snapshot's `customDiff` applied onto the baseline
//! 3. the baseline
//!
//! A slot that does not parse is logged and ignored, so the session starts from the
//! baseline. Presets, folders, the prompt text and the selected language are restored
//! alongside, and legacy presets are migrated.
//!
//! ## Persistence
//!
//! Mutations mark the session dirty through its [`PersistScheduler`]. The host calls
//! [`Session::tick`] periodically; once the configured delay has passed without further
//! changes, the snapshot is written. Explicit user actions that replace data wholesale
//! (imports, reset) save immediately.

use crate::bundle::{
    parse_dictionary_import, parse_preset_import, DictionaryExport, DictionaryImport,
    PresetExport, Snapshot,
};
use crate::config::SessionConfig;
use crate::diff::{apply_diff, build_diff, Diff};
use crate::error::Result;
use crate::ids::IdGenerator;
use crate::model::{Dataset, LangCode};
use crate::presets::{merge_import, migrate_legacy, MergeReport, PresetLibrary};
use crate::prompt::{normalize_prompt, Prompt};
use crate::store::{PersistScheduler, SnapshotBackend};
use chrono::{DateTime, Utc};
use std::time::Instant;

pub struct Session<B: SnapshotBackend, G: IdGenerator> {
    config: SessionConfig,
    backend: B,
    ids: G,
    baseline: Dataset,
    dataset: Dataset,
    library: PresetLibrary,
    prompt_text: String,
    selected_lang: LangCode,
    scheduler: PersistScheduler,
}

impl<B: SnapshotBackend, G: IdGenerator> Session<B, G> {
    /// Starts a session on `baseline`, restoring whatever the backend holds.
    ///
    /// Only backend I/O failures are errors; unreadable snapshot content falls back to
    /// the baseline.
    pub fn initialize(baseline: Dataset, backend: B, mut ids: G, config: SessionConfig) -> Result<Self> {
        let snapshot = match backend.load(&config.storage_key)? {
            Some(text) => match Snapshot::from_json(&text) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!(key = %config.storage_key, error = %e, "ignoring malformed snapshot");
                    None
                }
            },
            None => None,
        };

        let (dataset, mut library, prompt_text, selected_lang) = match snapshot {
            Some(snapshot) => {
                let library = snapshot.library();
                let dataset = match (snapshot.dataset, snapshot.custom_diff) {
                    (Some(dataset), _) => dataset,
                    (None, Some(diff)) => apply_diff(baseline.clone(), &diff, &mut ids),
                    (None, None) => baseline.clone(),
                };
                (dataset, library, snapshot.prompt_text, snapshot.selected_lang)
            }
            None => (baseline.clone(), PresetLibrary::new(), None, None),
        };
        let selected_lang =
            selected_lang.unwrap_or_else(|| config.initial_language(&dataset.languages));

        library.break_folder_cycles();
        library.drop_dangling_references();
        let migrated = migrate_legacy(&mut library, &mut ids);

        let mut session = Self {
            scheduler: PersistScheduler::new(config.persist_delay()),
            config,
            backend,
            ids,
            baseline,
            dataset,
            library,
            prompt_text: prompt_text.unwrap_or_default(),
            selected_lang,
        };
        if migrated > 0 {
            session.mark_dirty();
        }
        tracing::info!(
            categories = session.dataset.categories.len(),
            presets = session.library.presets.len(),
            lang = %session.selected_lang,
            "session initialized"
        );
        Ok(session)
    }

    // --- Accessors ---

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn baseline(&self) -> &Dataset {
        &self.baseline
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn library(&self) -> &PresetLibrary {
        &self.library
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    pub fn prompt(&self) -> Prompt {
        Prompt::parse(&self.prompt_text)
    }

    pub fn selected_lang(&self) -> &str {
        &self.selected_lang
    }

    pub fn is_dirty(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// The user's changes against the baseline.
    pub fn current_diff(&self) -> Diff {
        build_diff(&self.baseline, &self.dataset)
    }

    fn mark_dirty(&mut self) {
        self.scheduler.touch(Instant::now());
    }

    // --- Mutation ---

    /// Runs `f` on the dataset and marks the session dirty.
    pub fn edit_dataset<R>(&mut self, f: impl FnOnce(&mut Dataset, &mut G) -> R) -> R {
        let out = f(&mut self.dataset, &mut self.ids);
        self.dataset.touch();
        self.mark_dirty();
        out
    }

    /// Runs `f` on the preset library and marks the session dirty.
    pub fn edit_library<R>(&mut self, f: impl FnOnce(&mut PresetLibrary, &mut G) -> R) -> R {
        let out = f(&mut self.library, &mut self.ids);
        self.mark_dirty();
        out
    }

    /// Records a translation for `key`; see [`Dataset::add_mapping`].
    pub fn add_mapping(&mut self, key: &str, lang: &str, value: &str) {
        let config = &self.config;
        self.dataset
            .add_mapping(key, lang, value, config, &mut self.ids);
        self.dataset.touch();
        self.mark_dirty();
    }

    /// Sets the prompt text, normalized to `", "`-joined tokens.
    pub fn set_prompt_text(&mut self, text: &str) {
        self.set_prompt_text_raw(&normalize_prompt(text));
    }

    pub fn set_prompt_text_raw(&mut self, text: &str) {
        self.prompt_text = text.to_string();
        self.mark_dirty();
    }

    /// Runs `f` on the parsed prompt and stores the result.
    pub fn edit_prompt<R>(&mut self, f: impl FnOnce(&mut Prompt) -> R) -> R {
        let mut prompt = self.prompt();
        let out = f(&mut prompt);
        self.set_prompt_text_raw(&prompt.to_string());
        out
    }

    pub fn set_language(&mut self, lang: &str) {
        self.selected_lang = lang.to_string();
        self.mark_dirty();
    }

    // --- Dictionary import/export ---

    /// Pretty JSON of the user's changes, without presets.
    pub fn export_dictionary(&self) -> Result<String> {
        DictionaryExport::new(self.current_diff(), Utc::now()).to_json_pretty()
    }

    /// Replaces the dictionary from an export. Presets are not touched. On error nothing
    /// changes.
    pub fn import_dictionary(&mut self, text: &str) -> Result<()> {
        let mut dataset = match parse_dictionary_import(text)? {
            DictionaryImport::Dataset(dataset) => dataset,
            DictionaryImport::Diff(diff) => apply_diff(self.baseline.clone(), &diff, &mut self.ids),
        };
        dataset.touch();
        self.commit_dataset(dataset)?;
        tracing::info!(tags = self.dataset.tag_count(), "imported dictionary");
        Ok(())
    }

    /// Drops every dictionary customization. Presets are kept. On error nothing changes.
    pub fn reset_to_default(&mut self) -> Result<()> {
        self.commit_dataset(self.baseline.clone())?;
        tracing::info!("reset dictionary to baseline");
        Ok(())
    }

    /// Swaps in `dataset` and saves; a failed save restores the previous dataset.
    fn commit_dataset(&mut self, dataset: Dataset) -> Result<()> {
        let previous = std::mem::replace(&mut self.dataset, dataset);
        if let Err(e) = self.save() {
            self.dataset = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Swaps in a new baseline, carrying the current customization over to it.
    pub fn replace_baseline(&mut self, baseline: Dataset) {
        let diff = self.current_diff();
        self.dataset = apply_diff(baseline.clone(), &diff, &mut self.ids);
        self.baseline = baseline;
        self.mark_dirty();
    }

    // --- Presets ---

    pub fn export_presets(&self) -> Result<String> {
        PresetExport::from_library(&self.library, Utc::now()).to_json_pretty()
    }

    /// Merges a preset export or legacy preset document into the library. On error
    /// nothing changes.
    pub fn import_presets(&mut self, text: &str) -> Result<MergeReport> {
        let payload = parse_preset_import(text)?.into_payload();
        let mut merged = self.library.clone();
        let report = merge_import(&mut merged, &payload, &mut self.ids, Utc::now());
        let previous = std::mem::replace(&mut self.library, merged);
        if let Err(e) = self.save() {
            self.library = previous;
            return Err(e);
        }
        Ok(report)
    }

    /// Saves the current prompt text as legacy preset `name`.
    pub fn save_preset(&mut self, name: &str) {
        let text = self.prompt_text.clone();
        self.library.save_legacy(name, &text, Utc::now());
        self.mark_dirty();
    }

    /// Loads legacy preset `name` into the prompt. Returns `false` if it does not exist.
    pub fn load_preset(&mut self, name: &str) -> bool {
        match self.library.load_legacy(name).map(str::to_string) {
            Some(text) => {
                self.set_prompt_text_raw(&text);
                true
            }
            None => false,
        }
    }

    pub fn delete_preset(&mut self, name: &str) -> bool {
        let deleted = self.library.delete_legacy(name);
        if deleted {
            self.mark_dirty();
        }
        deleted
    }

    pub fn rename_preset(&mut self, old_name: &str, new_name: &str) -> bool {
        let renamed = self.library.rename_legacy(old_name, new_name, Utc::now());
        if renamed {
            self.mark_dirty();
        }
        renamed
    }

    // --- Persistence ---

    /// The persisted form of the session.
    pub fn snapshot(&self, saved_at: DateTime<Utc>) -> Snapshot {
        let mut snapshot = Snapshot::new(saved_at).with_library(&self.library);
        if self.config.store_diff_only {
            snapshot.custom_diff = Some(self.current_diff());
        } else {
            snapshot.dataset = Some(self.dataset.clone());
        }
        snapshot.prompt_text = Some(self.prompt_text.clone());
        snapshot.selected_lang = Some(self.selected_lang.clone());
        snapshot
    }

    /// Writes the snapshot now and clears any pending write.
    pub fn save(&mut self) -> Result<()> {
        let text = self.snapshot(Utc::now()).to_json()?;
        self.backend.save(&self.config.storage_key, &text)?;
        self.scheduler.flush();
        tracing::debug!(key = %self.config.storage_key, bytes = text.len(), "saved snapshot");
        Ok(())
    }

    /// Saves if a pending write is due at `now`. Returns whether a save happened. A
    /// failed save stays pending.
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        if !self.scheduler.take_due(now) {
            return Ok(false);
        }
        if let Err(e) = self.save() {
            self.scheduler.touch(now);
            return Err(e);
        }
        Ok(true)
    }

    /// Saves immediately if anything is pending.
    pub fn flush(&mut self) -> Result<bool> {
        if !self.scheduler.is_pending() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Empties the storage slot. The in-memory state is kept.
    pub fn clear_storage(&mut self) -> Result<()> {
        self.scheduler.flush();
        self.backend.remove(&self.config.storage_key)
    }
}
