use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ANNOTATIONS: &str = r##"{
  "points": [[1, 0.0, 0.0, "#ff0000"], [2, 30.0, 40.0, "#ff0000"]],
  "lines": [[1, 2, "#ff0000"]],
  "angles": [],
  "circles": [],
  "pivots": [2]
}"##;

fn report() -> Command {
    Command::cargo_bin("medmark-report").expect("binary exists")
}

fn write_annotations(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("scan.json");
    fs::write(&path, ANNOTATIONS).expect("write annotations");
    path
}

#[test]
fn help_lists_options() {
    report()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--heatmaps"))
        .stdout(predicate::str::contains("--pivots-only"));
}

#[test]
fn missing_file_fails() {
    let dir = TempDir::new().expect("temp dir");
    report()
        .arg(dir.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("importing"));
}

#[test]
fn nothing_to_report_fails() {
    report()
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to report"));
}

#[test]
fn prints_measurements_and_pivots() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_annotations(&dir);

    report()
        .arg(&path)
        .arg("--size")
        .arg("100x100")
        .assert()
        .success()
        .stdout(predicate::str::contains("Image: 100x100"))
        .stdout(predicate::str::contains("Points: 2, lines: 1"))
        .stdout(predicate::str::contains("line 1-2: 50.0"))
        .stdout(predicate::str::contains("2: (30.0, 40.0)"));
}

#[test]
fn prints_json_measurements() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_annotations(&dir);

    report()
        .arg(&path)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"distance\""));
}

#[test]
fn exports_pivots() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_annotations(&dir);
    let out = dir.path().join("pivots.json");

    report()
        .arg(&path)
        .arg("--export")
        .arg(&out)
        .arg("--pivots-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported"));

    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).expect("export written"))
        .expect("valid json");
    assert_eq!(written, serde_json::json!({ "pivots": [[2, 30.0, 40.0]] }));
}

#[test]
fn pivots_only_requires_export() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_annotations(&dir);

    report().arg(&path).arg("--pivots-only").assert().failure();
}

#[test]
fn heatmaps_require_image() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_annotations(&dir);

    report()
        .arg(&path)
        .arg("--heatmaps")
        .arg(dir.path().join("maps.npy"))
        .assert()
        .failure();
}

#[test]
fn broken_config_fails() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_annotations(&dir);
    let config = dir.path().join("config.json");
    fs::write(&config, "{ not json").expect("write config");

    report()
        .arg(&path)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading config"));
}

#[cfg(target_os = "linux")]
#[test]
fn broken_default_config_fails() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_annotations(&dir);
    let config_dir = dir.path().join("xdg").join("medmark");
    fs::create_dir_all(&config_dir).expect("config dir");
    fs::write(config_dir.join("medmark-config.json"), r#"{"version": 99}"#).expect("write config");

    report()
        .env("XDG_CONFIG_HOME", dir.path().join("xdg"))
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading config"));
}

#[cfg(target_os = "linux")]
#[test]
fn missing_default_config_uses_defaults() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_annotations(&dir);

    report()
        .env("XDG_CONFIG_HOME", dir.path().join("empty"))
        .arg(&path)
        .assert()
        .success();
}
