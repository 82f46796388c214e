//! # CLI Behavior
//!
//! This is **one possible client** for promptdict. It is the only place that knows
//! about terminal I/O, exit codes and output formatting.
//!
//! ## Stateless Commands
//!
//! `baseline`, `diff`, `apply`, `presets` and `token` work on files named on the command
//! line and never touch the session store. `presets import` and `presets migrate` only
//! rewrite the library file when `--write` is given.
//!
//! ## Session Commands
//!
//! `session ...` opens the persisted session in the user data directory
//! (`PROMPTDICT_DATA_DIR` overrides it), on top of the baseline given with
//! `--baseline`. Configuration comes from `promptdict.toml` in the user config
//! directory (`PROMPTDICT_CONFIG` overrides the path) and `PROMPTDICT_*` variables.
//! Every session command flushes pending changes before exiting.

mod commands;
mod render;
mod setup;

pub use commands::run;
