use super::SnapshotBackend;
use crate::error::{PromptDictError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stores each slot as `{root}/{key}.json`.
#[derive(Debug, Clone)]
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing slot `key`.
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(PromptDictError::Io)?;
        }
        Ok(())
    }
}

impl SnapshotBackend for FsBackend {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(path).map_err(PromptDictError::Io)?;
        Ok(Some(text))
    }

    fn save(&self, key: &str, text: &str) -> Result<()> {
        self.ensure_dir()?;
        let path = self.slot_path(key);

        // Atomic write
        let tmp_file = self.root.join(format!(".{key}-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, text).map_err(PromptDictError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, &path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(PromptDictError::Io(e));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key);
        if path.exists() {
            fs::remove_file(path).map_err(PromptDictError::Io)?;
        }
        Ok(())
    }
}
