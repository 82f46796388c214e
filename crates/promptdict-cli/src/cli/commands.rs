//! # Command Dispatch
//!
//! `run()` parses arguments, installs the tracing subscriber and hands each command to a
//! `handle_*` function. Handlers call into the library and pass results to `render.rs`;
//! they hold no dictionary logic of their own.
//!
//! Session commands open a [`Session`] backed by [`FsBackend`] in the data directory and
//! flush it before returning.

use super::render::{
    print_dataset_summary, print_diff_summary, print_info, print_library_summary,
    print_merge_report, print_success, print_suggestions, print_token,
};
use super::setup::{Cli, Commands, PresetCommands, SessionArgs, SessionCommands, TokenCommands};
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Parser;
use directories::ProjectDirs;
use promptdict::baseline::{load_baseline, DirBaselineSource};
use promptdict::bundle::{
    parse_dictionary_import, parse_preset_import, DictionaryExport, DictionaryImport,
    PresetExport, Snapshot,
};
use promptdict::config::{SessionConfig, CONFIG_FILENAME};
use promptdict::diff::{apply_diff, build_diff};
use promptdict::ids::RandomIds;
use promptdict::model::Dataset;
use promptdict::presets::{merge_import, migrate_legacy, PresetLibrary};
use promptdict::store::FsBackend;
use promptdict::wrappers::{parse_wrappers, toggle_token_separator, wrap};
use promptdict::Session;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DATA_DIR_ENV: &str = "PROMPTDICT_DATA_DIR";
const CONFIG_ENV: &str = "PROMPTDICT_CONFIG";

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Only commands that load a baseline or open a session read the config.
    match cli.command {
        Commands::Baseline { dir, json } => handle_baseline(&load_config()?, &dir, json),
        Commands::Diff { base, current } => handle_diff(&load_config()?, &base, &current),
        Commands::Apply {
            base,
            export,
            output,
        } => handle_apply(&load_config()?, &base, &export, output.as_deref()),
        Commands::Presets(cmd) => match cmd {
            PresetCommands::Import {
                library,
                payload,
                write,
            } => handle_presets_import(&library, &payload, write),
            PresetCommands::Migrate { library, write } => handle_presets_migrate(&library, write),
        },
        Commands::Token(cmd) => {
            handle_token(cmd);
            Ok(())
        }
        Commands::Session(args) => handle_session(load_config()?, args),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second init (tests calling run twice) is harmless.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "promptdict", "promptdict")
        .ok_or_else(|| anyhow!("could not determine the home directory"))
}

fn config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    Ok(project_dirs()?.config_dir().join(CONFIG_FILENAME))
}

fn data_dir() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(path));
    }
    Ok(project_dirs()?.data_dir().to_path_buf())
}

fn load_config() -> Result<SessionConfig> {
    let path = config_path()?;
    let file = path.exists().then_some(path.as_path());
    SessionConfig::load(file).with_context(|| format!("loading {}", path.display()))
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn load_baseline_dir(config: &SessionConfig, dir: &Path) -> Result<Dataset> {
    load_baseline(
        &DirBaselineSource::new(dir),
        &config.translation_languages,
        &mut RandomIds,
    )
    .with_context(|| format!("loading baseline from {}", dir.display()))
}

/// A dataset file is either a bare dataset or a document with a `dataset` field.
fn read_dataset_file(path: &Path) -> Result<Dataset> {
    let text = read_file(path)?;
    if let Ok(Snapshot {
        dataset: Some(dataset),
        ..
    }) = Snapshot::from_json(&text)
    {
        return Ok(dataset);
    }
    serde_json::from_str(&text).with_context(|| format!("parsing dataset {}", path.display()))
}

fn handle_baseline(config: &SessionConfig, dir: &Path, json: bool) -> Result<()> {
    let dataset = load_baseline_dir(config, dir)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&dataset)?);
    } else {
        print_dataset_summary(&dataset);
    }
    Ok(())
}

fn handle_diff(config: &SessionConfig, base: &Path, current: &Path) -> Result<()> {
    let baseline = load_baseline_dir(config, base)?;
    let dataset = read_dataset_file(current)?;
    let diff = build_diff(&baseline, &dataset);
    println!("{}", DictionaryExport::new(diff, Utc::now()).to_json_pretty()?);
    Ok(())
}

fn handle_apply(
    config: &SessionConfig,
    base: &Path,
    export: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let baseline = load_baseline_dir(config, base)?;
    let text = read_file(export)?;
    let dataset = match parse_dictionary_import(&text)
        .with_context(|| format!("parsing {}", export.display()))?
    {
        DictionaryImport::Dataset(dataset) => dataset,
        DictionaryImport::Diff(diff) => apply_diff(baseline, &diff, &mut RandomIds),
    };
    let json = serde_json::to_string_pretty(&dataset)?;
    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            print_success(&format!("Wrote {}", path.display()));
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// A missing library file is an empty library.
fn read_library(path: &Path) -> Result<PresetLibrary> {
    if !path.exists() {
        return Ok(PresetLibrary::new());
    }
    let text = read_file(path)?;
    let export: PresetExport = serde_json::from_str(&text)
        .with_context(|| format!("parsing preset library {}", path.display()))?;
    Ok(export.into_library())
}

fn write_library(path: &Path, library: &PresetLibrary) -> Result<()> {
    let json = PresetExport::from_library(library, Utc::now()).to_json_pretty()?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

fn handle_presets_import(library_path: &Path, payload_path: &Path, write: bool) -> Result<()> {
    let mut library = read_library(library_path)?;
    let payload = parse_preset_import(&read_file(payload_path)?)
        .with_context(|| format!("parsing {}", payload_path.display()))?
        .into_payload();

    let report = merge_import(&mut library, &payload, &mut RandomIds, Utc::now());
    print_merge_report(&report);
    print_library_summary(&library);

    if write {
        write_library(library_path, &library)?;
        print_success(&format!("Wrote {}", library_path.display()));
    }
    Ok(())
}

fn handle_presets_migrate(library_path: &Path, write: bool) -> Result<()> {
    let mut library = read_library(library_path)?;
    let created = migrate_legacy(&mut library, &mut RandomIds);
    if created == 0 {
        print_info("No legacy presets to migrate.");
    } else {
        print_success(&format!("Migrated {} legacy presets.", created));
    }
    print_library_summary(&library);

    if write {
        write_library(library_path, &library)?;
        print_success(&format!("Wrote {}", library_path.display()));
    }
    Ok(())
}

fn handle_token(cmd: TokenCommands) {
    match cmd {
        TokenCommands::Parse { token } => print_token(&parse_wrappers(&token)),
        TokenCommands::Wrap { core, wrappers } => println!("{}", wrap(&core, &wrappers)),
        TokenCommands::Toggle { token } => println!("{}", toggle_token_separator(&token)),
    }
}

fn open_session(
    config: SessionConfig,
    baseline_dir: &Path,
) -> Result<Session<FsBackend, RandomIds>> {
    let baseline = load_baseline_dir(&config, baseline_dir)?;
    let dir = data_dir()?;
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    tracing::debug!(data_dir = %dir.display(), "opening session");
    Session::initialize(baseline, FsBackend::new(dir), RandomIds, config)
        .context("restoring session")
}

fn handle_session(config: SessionConfig, args: SessionArgs) -> Result<()> {
    let mut session = open_session(config, &args.baseline)?;

    match args.command {
        SessionCommands::Show => {
            print_dataset_summary(session.dataset());
            print_library_summary(session.library());
            println!("language: {}", session.selected_lang());
            print_diff_summary(&session.current_diff());
        }
        SessionCommands::Export => println!("{}", session.export_dictionary()?),
        SessionCommands::Import { file } => {
            session
                .import_dictionary(&read_file(&file)?)
                .with_context(|| format!("importing {}", file.display()))?;
            print_success(&format!(
                "Imported dictionary: {} tags.",
                session.dataset().tag_count()
            ));
        }
        SessionCommands::Reset => {
            session.reset_to_default()?;
            print_success("Dictionary reset to the baseline.");
        }
        SessionCommands::Map { key, lang, value } => {
            session.add_mapping(&key, &lang, &value);
            print_success(&format!("Mapped {} ({}) to {}.", key, lang, value));
        }
        SessionCommands::Suggest { prefix, limit } => {
            print_suggestions(&session.dataset().suggestions(&prefix, limit));
        }
        SessionCommands::ExportPresets => println!("{}", session.export_presets()?),
        SessionCommands::ImportPresets { file } => {
            let report = session
                .import_presets(&read_file(&file)?)
                .with_context(|| format!("importing {}", file.display()))?;
            print_merge_report(&report);
            print_library_summary(session.library());
        }
    }

    session.flush().context("saving session")?;
    Ok(())
}
