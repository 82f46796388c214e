//! # promptdict CLI
//!
//! The binary is intentionally thin: argument parsing, context wiring and rendering
//! live in `src/cli/`, and this file only invokes `cli::run()` and handles process
//! termination.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/promptdict-cli/src/cli/)                 │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Dispatch + context wiring (commands.rs)                  │
//! │  - Terminal output (render.rs)                              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Library (crates/promptdict)                                │
//! │  - Session, diff engine, preset merge, tokenizer            │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Diagnostics from the library arrive as `tracing` events; the CLI routes them to
//! stderr at `warn` by default, `debug` with `-v`, or whatever `RUST_LOG` asks for.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
