//! # promptdict Architecture
//!
//! promptdict is a **UI-agnostic prompt tag dictionary library**. It keeps a hierarchical,
//! multi-language tag dictionary (categories → groups → tags) that users customize, and
//! stores only what they changed relative to a shared baseline so the customization can
//! be carried onto a newer baseline later.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Clients (promptdict-cli, or any UI)                        │
//! │  - Argument parsing, rendering, terminal I/O                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session (session.rs)                                       │
//! │  - Owns baseline, dataset, presets, editor state            │
//! │  - Restore / debounced persist / import / export            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engines (diff/, presets/, wrappers.rs, prompt.rs, ...)     │
//! │  - Pure transformations over owned Rust values              │
//! │  - No I/O, no clocks except where passed in                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/) and baseline sources (baseline.rs)        │
//! │  - SnapshotBackend: MemBackend (tests), FsBackend           │
//! │  - BaselineSource: YAML documents                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing from `session.rs` inward writes to stdout/stderr or exits the process.
//! Diagnostics go through `tracing`; installing a subscriber is the client's choice.
//!
//! ## Identity
//!
//! Entities are matched by name (categories, groups), key (tags), or `(name, type)`
//! (extended presets). Ids are opaque handles regenerated on creation and never used to
//! match across datasets. Fresh ids come from an [`ids::IdGenerator`], so tests can use
//! deterministic ids.
//!
//! ## Module Overview
//!
//! - [`model`]: The dictionary tree (`Dataset`, `Category`, `Group`, `Tag`)
//! - [`edit`]: Dictionary mutations with uniqueness checks
//! - [`search`]: Key lookup, suggestions, group filtering
//! - [`diff`]: Building and applying baseline diffs
//! - [`presets`]: Preset library, import merge, legacy migration
//! - [`wrappers`]: Bracket-wrapper tokenizer
//! - [`prompt`]: Prompt editor token list
//! - [`bundle`]: Snapshot and export documents
//! - [`baseline`]: YAML baseline loading
//! - [`store`]: Snapshot backends and write debouncing
//! - [`session`]: Session orchestration
//! - [`config`]: Configuration management
//! - [`ids`]: Fresh id generation
//! - [`error`]: Error types

pub mod baseline;
pub mod bundle;
pub mod config;
pub mod diff;
pub mod edit;
pub mod error;
pub mod ids;
pub mod model;
pub mod presets;
pub mod prompt;
pub mod search;
pub mod session;
pub mod store;
pub mod wrappers;

pub use error::{ErrorKind, PromptDictError, Result};
pub use session::Session;
