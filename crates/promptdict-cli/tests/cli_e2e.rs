#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const STRUCTURE: &str = r##"
- name: Quality
  groups:
    - name: Basic
      color: "#f59e0b"
      tags:
        masterpiece:
        best_quality:
- name: Scene
  groups:
    - name: Sky
      tags:
        blue_sky:
"##;

const ZH: &str = r#"
- name: 画质
  groups:
    - name: 基础
      tags:
        masterpiece: 杰作
"#;

struct TestEnv {
    temp: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let baseline = temp.path().join("baseline");
        fs::create_dir_all(&baseline).unwrap();
        fs::write(baseline.join("default.yaml"), STRUCTURE).unwrap();
        fs::write(baseline.join("zh_CN.yaml"), ZH).unwrap();
        Self { temp }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    fn baseline(&self) -> String {
        self.path("baseline").to_str().unwrap().to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("promptdict"));
        cmd.env("PROMPTDICT_DATA_DIR", self.path("data").as_os_str())
            .env("PROMPTDICT_CONFIG", self.path("promptdict.toml").as_os_str())
            .env_remove("RUST_LOG");
        cmd
    }
}

#[test]
fn test_baseline_summary() {
    let env = TestEnv::new();
    env.cmd()
        .args(["baseline", &env.baseline()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Quality"))
        .stdout(predicate::str::contains("2 categories, 3 tags"))
        .stdout(predicate::str::contains("zh_CN"));
}

#[test]
fn test_missing_baseline_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["baseline", env.path("nowhere").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_token_commands() {
    let env = TestEnv::new();
    env.cmd()
        .args(["token", "wrap", "sky", "{}", "()"])
        .assert()
        .success()
        .stdout("{(sky)}\n");
    env.cmd()
        .args(["token", "parse", "[(blue_sky)]"])
        .assert()
        .success()
        .stdout(predicate::str::contains("core: blue_sky"))
        .stdout(predicate::str::contains("wrappers: [] ()"));
    env.cmd()
        .args(["token", "toggle", "(blue_sky)"])
        .assert()
        .success()
        .stdout("(blue sky)\n");
}

#[test]
fn test_config_is_read_only_by_commands_that_need_it() {
    let env = TestEnv::new();
    fs::write(env.path("promptdict.toml"), "persist_delay_ms = [not toml").unwrap();

    env.cmd()
        .args(["token", "toggle", "blue_sky"])
        .assert()
        .success()
        .stdout("blue sky\n");
    env.cmd()
        .args(["baseline", &env.baseline()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("promptdict.toml"));
}

#[test]
fn test_session_mapping_persists_and_exports() {
    let env = TestEnv::new();

    env.cmd()
        .args(["session", "-b", &env.baseline(), "map", "sunset", "zh_CN", "日落"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mapped sunset"));

    env.cmd()
        .args(["session", "-b", &env.baseline(), "suggest", "sun"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sunset"));

    env.cmd()
        .args(["session", "-b", &env.baseline(), "export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("customDiff"))
        .stdout(predicate::str::contains("User Mapping"))
        .stdout(predicate::str::contains("日落"));

    env.cmd()
        .args(["session", "-b", &env.baseline(), "reset"])
        .assert()
        .success();

    env.cmd()
        .args(["session", "-b", &env.baseline(), "suggest", "sun"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matching tags."));
}

#[test]
fn test_export_then_apply_onto_baseline() {
    let env = TestEnv::new();
    env.cmd()
        .args(["session", "-b", &env.baseline(), "map", "sunset", "en", "sunset"])
        .assert()
        .success();

    let output = env
        .cmd()
        .args(["session", "-b", &env.baseline(), "export"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let export = env.path("export.json");
    fs::write(&export, &output.stdout).unwrap();

    let applied = env.path("dataset.json");
    env.cmd()
        .args([
            "apply",
            &env.baseline(),
            export.to_str().unwrap(),
            "--output",
            applied.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));
    let dataset = fs::read_to_string(&applied).unwrap();
    assert!(dataset.contains("sunset"));

    // Diffing the applied dataset against the same baseline reproduces the change.
    env.cmd()
        .args(["diff", &env.baseline(), applied.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("sunset"))
        .stdout(predicate::str::contains("Custom"));
}

#[test]
fn test_presets_import_and_migrate_files() {
    let env = TestEnv::new();
    let library = env.path("library.json");
    let legacy = env.path("legacy.json");
    fs::write(
        &legacy,
        r#"{"presets":[{"name":"day","text":"blue_sky, masterpiece","updatedAt":"2024-01-01T00:00:00Z"}]}"#,
    )
    .unwrap();

    env.cmd()
        .args([
            "presets",
            "import",
            library.to_str().unwrap(),
            legacy.to_str().unwrap(),
            "--write",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 from legacy"));
    assert!(library.exists());

    // The imported legacy preset is already a positive preset; nothing is left to migrate.
    env.cmd()
        .args(["presets", "migrate", library.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No legacy presets to migrate."))
        .stdout(predicate::str::contains("1 presets, 0 folders, 0 legacy"));
}

#[test]
fn test_session_preset_import_rejects_garbage() {
    let env = TestEnv::new();
    let bad = env.path("bad.json");
    fs::write(&bad, r#"{"nothing":"here"}"#).unwrap();
    env.cmd()
        .args([
            "session",
            "-b",
            &env.baseline(),
            "import-presets",
            bad.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
