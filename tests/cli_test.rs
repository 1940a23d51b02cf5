//! CLI end-to-end tests.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[allow(deprecated)]
fn convertanything_cmd() -> Command {
    Command::cargo_bin("convertanything").unwrap()
}

#[test]
fn no_args_shows_help() {
    convertanything_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn version_command() {
    convertanything_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("convertanything"));
}

#[test]
fn classify_prints_category() {
    convertanything_cmd()
        .args(["classify", "photo.JPEG"])
        .assert()
        .success()
        .stdout("image\n");

    convertanything_cmd()
        .args(["classify", "archive.zip"])
        .assert()
        .success()
        .stdout("archieves\n");

    convertanything_cmd()
        .args(["classify", "README"])
        .assert()
        .success()
        .stdout("binary\n");
}

#[test]
fn classify_json() {
    convertanything_cmd()
        .args(["classify", "clip.mkv", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"category\": \"videos\""));
}

#[test]
fn options_lists_targets() {
    convertanything_cmd()
        .args(["options", "clip.mp4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Source category: videos"))
        .stdout(predicate::str::contains("JPG (Thumbnail)"))
        .stdout(predicate::str::contains("[cross-category, animation]"));
}

#[test]
fn options_json_for_unknown_file_is_empty() {
    let output = convertanything_cmd()
        .args(["options", "data.unknownext", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["sourceCategory"], "binary");
    assert_eq!(json["options"], serde_json::json!([]));
}

#[test]
fn custom_catalog_from_config() {
    let dir = tempdir().unwrap();
    let catalog = dir.path().join("formats.json");
    fs::write(
        &catalog,
        r#"{"image": [{"abbr": "PNG", "extensions": [".png"]}, {"abbr": "QOI", "extensions": [".qoi"]}]}"#,
    )
    .unwrap();
    let config = dir.path().join("config.json");
    fs::write(
        &config,
        serde_json::json!({"formats": {"catalog_path": catalog}}).to_string(),
    )
    .unwrap();

    convertanything_cmd()
        .args(["--config", config.to_str().unwrap(), "options", "a.png"])
        .assert()
        .success()
        .stdout(predicate::str::contains("QOI"))
        .stdout(predicate::str::contains("PNG (Sticker)"));
}

#[test]
fn validate_reports_warnings() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(
        &config,
        "[server]\nport = 0\n\n[auth]\nenabled = true\nallow_anonymous = false\n",
    )
    .unwrap();

    convertanything_cmd()
        .args(["--config", config.to_str().unwrap(), "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("server.port is 0"))
        .stdout(predicate::str::contains("anonymous tokens are disabled"));
}

#[test]
fn validate_rejects_broken_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{ not json").unwrap();

    convertanything_cmd()
        .args(["--config", config.to_str().unwrap(), "validate"])
        .assert()
        .failure();
}

#[test]
fn sweep_removes_expired_objects() {
    let dir = tempdir().unwrap();
    let storage = dir.path().join("storage");
    let uploads = storage.join("public_uploads");
    fs::create_dir_all(&uploads).unwrap();
    fs::write(uploads.join("old.txt"), "x").unwrap();

    let config = dir.path().join("config.json");
    fs::write(
        &config,
        serde_json::json!({
            "storage": {"root": storage},
            "cleanup": {"enabled": true, "retention_hours": 0}
        })
        .to_string(),
    )
    .unwrap();

    convertanything_cmd()
        .args(["--config", config.to_str().unwrap(), "sweep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted 1"));

    assert!(!uploads.join("old.txt").exists());
}

#[test]
fn start_help() {
    convertanything_cmd()
        .args(["start", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Start the HTTP API server"));
}
