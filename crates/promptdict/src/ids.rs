//! Fresh identifier generation.
//!
//! Ids in promptdict are opaque presentation attributes: groups, categories, presets
//! and folders get one at creation and keep it for their lifetime, but ids are never
//! used to match entities across datasets (the diff engine matches by name). The
//! [`IdGenerator`] trait keeps the source of fresh ids pluggable so tests can use
//! deterministic ids.

use uuid::Uuid;

/// Source of fresh identifiers.
///
/// Generated ids are short, so callers that create entities next to existing ones go
/// through [`IdGenerator::unused_id`], which skips ids already in use.
pub trait IdGenerator {
    /// Returns a new id of the form `{prefix}_{suffix}`.
    fn fresh_id(&mut self, prefix: &str) -> String;

    /// Returns a fresh id for which `taken` is false.
    fn unused_id(&mut self, prefix: &str, taken: impl Fn(&str) -> bool) -> String
    where
        Self: Sized,
    {
        loop {
            let id = self.fresh_id(prefix);
            if !taken(&id) {
                return id;
            }
        }
    }
}

/// Random ids backed by v4 UUIDs, e.g. `grp_3f9a0c1`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn fresh_id(&mut self, prefix: &str) -> String {
        let simple = Uuid::new_v4().simple().to_string();
        format!("{}_{}", prefix, &simple[..7])
    }
}

/// Deterministic counter-based ids (`grp_1`, `cat_2`, ...), shared across prefixes.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting after `n`, so the first id ends in `n + 1`.
    pub fn starting_after(n: u64) -> Self {
        Self { next: n }
    }
}

impl IdGenerator for SequentialIds {
    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{}_{}", prefix, self.next)
    }
}

pub const CATEGORY_PREFIX: &str = "cat";
pub const GROUP_PREFIX: &str = "grp";
pub const PRESET_PREFIX: &str = "preset";
pub const FOLDER_PREFIX: &str = "folder";
