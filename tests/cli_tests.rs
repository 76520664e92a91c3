//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("local-connector"))
}

fn event_names(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| {
            let value: Value = serde_json::from_str(line).expect("each line is JSON");
            value["event"].as_str().expect("event name").to_string()
        })
        .collect()
}

#[test]
fn test_cli_version() {
    let mut cmd = cli();
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains("local-connector"));
}

#[test]
fn test_cli_help() {
    let mut cmd = cli();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("collect"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn test_collect_help_lists_flags() {
    let mut cmd = cli();
    cmd.args(["collect", "--help"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--watch"))
        .stdout(predicate::str::contains("--content"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_collect_directory_prints_jsonl() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("script.js"), "console.log(1);").unwrap();
    fs::write(temp_dir.path().join("test.html"), "<p>hi</p>").unwrap();

    let output = cli().args(["collect"]).arg(temp_dir.path()).output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    assert_eq!(
        event_names(&output.stdout),
        vec!["scan::start", "fetch::end::script", "fetch::end::html", "scan::end"]
    );
}

#[test]
fn test_collect_file_uses_content_override() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("script.js");
    fs::write(&file, "console.log(1);").unwrap();

    let output = cli()
        .args(["collect", "--content", "\"Test Content\";"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<Value> = stdout.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1]["event"], "fetch::start::target");
    assert_eq!(lines[2]["event"], "fetch::end::script");
    assert_eq!(lines[2]["payload"]["response"]["body"]["content"], "\"Test Content\";");
    assert_eq!(lines[2]["payload"]["response"]["statusCode"], 200);
}

#[test]
fn test_collect_respects_gitignore() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".gitignore"), "ignore.html\n").unwrap();
    fs::write(temp_dir.path().join("ignore.html"), "<p>no</p>").unwrap();
    fs::write(temp_dir.path().join("keep.json"), "{}").unwrap();

    let output = cli().arg("collect").arg(temp_dir.path()).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let fetched: Vec<String> = stdout
        .lines()
        .map(|l| serde_json::from_str::<Value>(l).unwrap())
        .filter(|v| v["event"].as_str().is_some_and(|e| e.starts_with("fetch::end::")))
        .map(|v| v["payload"]["resource"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(fetched.len(), 2, "got {fetched:?}");
    assert!(fetched[0].ends_with("/.gitignore"));
    assert!(fetched[1].ends_with("/keep.json"));
}

#[test]
fn test_collect_missing_target_fails() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = cli();
    cmd.arg("collect").arg(temp_dir.path().join("missing"));
    cmd.assert().failure().stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_collect_rejects_remote_uri() {
    let mut cmd = cli();
    cmd.args(["collect", "https://example.com/index.html"]);
    cmd.assert().failure().stdout(predicate::str::is_empty());
}

#[test]
fn test_collect_rejects_bad_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("local-connector.toml");
    fs::write(&config, "bogus_key = true\n").unwrap();

    let mut cmd = cli();
    cmd.arg("collect").arg(temp_dir.path()).arg("--config").arg(&config);
    cmd.assert().failure();
}
