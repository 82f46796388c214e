//! # Snapshot Storage
//!
//! A session persists itself as one JSON [`Snapshot`](crate::bundle::Snapshot) string
//! per storage slot. The [`SnapshotBackend`] trait hides where that string lives:
//!
//! | Backend | Slot location | Use |
//! |---------|---------------|-----|
//! | [`MemBackend`] | in-process map | tests, embedding |
//! | [`FsBackend`] | `{root}/{key}.json` | the CLI |
//!
//! Backends deal in raw text; parsing and fallback on malformed content are the
//! session's job.
//!
//! Writes are debounced by [`PersistScheduler`]: every change pushes the deadline
//! back, and the snapshot is written once the session has been quiet for the configured
//! delay. Debouncing only affects when data reaches the backend, never what the
//! in-memory session holds.

pub mod debounce;
pub mod fs_backend;
pub mod mem_backend;

pub use debounce::PersistScheduler;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;

use crate::error::Result;

/// Raw storage for snapshot strings, keyed by slot name.
pub trait SnapshotBackend {
    /// The stored text, or `Ok(None)` if the slot is empty.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the slot's content. MUST be atomic: readers see the old or the new text,
    /// never a partial write.
    fn save(&self, key: &str, text: &str) -> Result<()>;

    /// Empties the slot. Removing an empty slot is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
