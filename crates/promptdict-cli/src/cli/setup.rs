use clap::{Args, Parser, Subcommand};
use promptdict::wrappers::WrapperKind;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "promptdict", bin_name = "promptdict", version = get_version())]
#[command(about = "Multi-language prompt tag dictionary with baseline diffs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a baseline directory and summarize it
    Baseline {
        /// Directory holding default.yaml and optional {lang}.yaml files
        dir: PathBuf,

        /// Print the loaded dataset as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the dictionary export of a dataset against a baseline
    Diff {
        /// Baseline directory
        base: PathBuf,

        /// JSON file with a dataset (bare, or inside a snapshot)
        current: PathBuf,
    },

    /// Apply a dictionary export onto a baseline and print the dataset
    Apply {
        /// Baseline directory
        base: PathBuf,

        /// Dictionary export or snapshot JSON file
        export: PathBuf,

        /// Write the dataset to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Preset library files
    #[command(subcommand)]
    Presets(PresetCommands),

    /// Bracket-wrapper tokenizer
    #[command(subcommand)]
    Token(TokenCommands),

    /// The persisted session
    Session(SessionArgs),
}

#[derive(Subcommand, Debug)]
pub enum PresetCommands {
    /// Merge a preset export or legacy preset document into a library file
    Import {
        /// Library file (a preset export); missing means empty
        library: PathBuf,

        /// Document to import
        payload: PathBuf,

        /// Save the merged library back to the library file
        #[arg(long)]
        write: bool,
    },

    /// Convert legacy presets in a library file
    Migrate {
        /// Library file (a preset export)
        library: PathBuf,

        /// Save the migrated library back to the library file
        #[arg(long)]
        write: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    /// Show a token's core and wrappers, outermost first
    Parse { token: String },

    /// Wrap core text, first wrapper outermost
    Wrap {
        core: String,

        /// Wrappers: {} () [] <>
        #[arg(required = true)]
        wrappers: Vec<WrapperKind>,
    },

    /// Swap underscores and spaces in a token's core
    Toggle { token: String },
}

#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Baseline directory the session is built on
    #[arg(short, long)]
    pub baseline: PathBuf,

    #[command(subcommand)]
    pub command: SessionCommands,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// Summarize the session
    Show,

    /// Print the dictionary export (changes against the baseline)
    Export,

    /// Replace the dictionary from an export file; presets are kept
    Import { file: PathBuf },

    /// Drop all dictionary changes; presets are kept
    Reset,

    /// Record a translation for a tag, adding it to the mapping group if unknown
    Map {
        key: String,
        lang: String,
        value: String,
    },

    /// Suggest tag keys containing a prefix
    Suggest {
        prefix: String,

        #[arg(short, long, default_value_t = promptdict::search::DEFAULT_SUGGESTION_LIMIT)]
        limit: usize,
    },

    /// Print the preset export
    ExportPresets,

    /// Merge a preset document into the session's library
    ImportPresets { file: PathBuf },
}
