//! Integration tests for the `pt` CLI.
//!
//! Each test creates a temp data directory, runs `pt` as a subprocess with
//! `--data-dir`, and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use pintask::io::recovery::{RecoveryCategory, RecoveryEntry, log_recovery};

/// Get the path to the built `pt` binary.
fn pt_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("pt");
    path
}

/// Run `pt` against the given data directory, returning (stdout, stderr, success).
fn run_pt(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(pt_bin())
        .arg("--data-dir")
        .arg(dir)
        .args(args)
        .env_remove("PINTASK_DIR")
        .output()
        .expect("failed to run pt");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `pt` expecting success, return stdout.
fn run_pt_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_pt(dir, args);
    if !success {
        panic!(
            "pt {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Add a task and return its id.
fn add(dir: &Path, title: &str) -> String {
    run_pt_ok(dir, &["add", title]).trim().to_string()
}

fn read_todos(dir: &Path) -> serde_json::Value {
    let text = fs::read_to_string(dir.join("todos.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[test]
fn test_list_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_pt_ok(tmp.path(), &["list"]);
    assert_eq!(out, "");
    assert!(!tmp.path().join("todos.json").exists());
}

#[test]
fn test_list_in_insertion_order() {
    let tmp = tempfile::TempDir::new().unwrap();
    let first = add(tmp.path(), "Buy milk");
    let second = add(tmp.path(), "Call mom");

    let out = run_pt_ok(tmp.path(), &["list"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("[ ] {} Buy milk", first));
    assert_eq!(lines[1], format!("[ ] {} Call mom", second));
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = add(tmp.path(), "Buy milk");

    let out = run_pt_ok(tmp.path(), &["list", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let tasks = value.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], id.as_str());
    assert_eq!(tasks[0]["title"], "Buy milk");
    assert_eq!(tasks[0]["completed"], false);
    assert!(tasks[0]["added"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn test_list_open_and_done_filters() {
    let tmp = tempfile::TempDir::new().unwrap();
    let done = add(tmp.path(), "Buy milk");
    add(tmp.path(), "Call mom");
    run_pt_ok(tmp.path(), &["done", &done]);

    let open = run_pt_ok(tmp.path(), &["list", "--open"]);
    assert!(open.contains("Call mom"));
    assert!(!open.contains("Buy milk"));

    let finished = run_pt_ok(tmp.path(), &["list", "--done"]);
    assert!(finished.contains("[x]"));
    assert!(finished.contains("Buy milk"));
    assert!(!finished.contains("Call mom"));
}

#[test]
fn test_window_default_when_nothing_saved() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_pt_ok(tmp.path(), &["window"]);
    assert_eq!(out.trim(), "360x520 at 100,100 (default, nothing saved yet)");
}

#[test]
fn test_window_reads_saved_state() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("window_state.json"),
        r#"{ "x": 1520, "y": 0, "width": 400, "height": 600 }"#,
    )
    .unwrap();

    assert_eq!(run_pt_ok(tmp.path(), &["window"]).trim(), "400x600 at 1520,0");

    let out = run_pt_ok(tmp.path(), &["window", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["saved"], true);
    assert_eq!(value["x"], 1520);
    assert_eq!(value["height"], 600);
}

#[test]
fn test_window_default_follows_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[window]\nx = 10\ny = 20\nwidth = 300\nheight = 400\n",
    )
    .unwrap();
    let out = run_pt_ok(tmp.path(), &["window", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["saved"], false);
    assert_eq!(value["x"], 10);
    assert_eq!(value["width"], 300);
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[test]
fn test_add_task() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_pt_ok(tmp.path(), &["add", "Buy", "milk"]);
    let id = out.trim();
    let (millis, suffix) = id.split_once('-').unwrap();
    assert!(millis.parse::<i64>().is_ok());
    assert_eq!(suffix.len(), 7);

    let todos = read_todos(tmp.path());
    assert_eq!(todos["todos"][0]["id"], id);
    assert_eq!(todos["todos"][0]["title"], "Buy milk");
    assert_eq!(todos["todos"][0]["completed"], false);
    assert_eq!(todos["updated_at"], todos["todos"][0]["created_at"]);
}

#[test]
fn test_add_trims_title() {
    let tmp = tempfile::TempDir::new().unwrap();
    add(tmp.path(), "   Call mom  ");
    assert_eq!(read_todos(tmp.path())["todos"][0]["title"], "Call mom");
}

#[test]
fn test_add_blank_title_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_pt(tmp.path(), &["add", "   "]);
    assert!(!success);
    assert!(stderr.starts_with("error: "));
    assert!(!tmp.path().join("todos.json").exists());
}

#[test]
fn test_add_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_pt_ok(tmp.path(), &["--json", "add", "Buy milk"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["title"], "Buy milk");
    assert!(value.get("done").is_none());
}

#[test]
fn test_done_by_prefix() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = add(tmp.path(), "Buy milk");
    let prefix = &id[..id.len() - 3];

    let out = run_pt_ok(tmp.path(), &["done", prefix]);
    assert_eq!(out.trim(), id);

    let todos = read_todos(tmp.path());
    let task = &todos["todos"][0];
    assert_eq!(task["completed"], true);
    assert!(task["completed_at"].as_i64().unwrap() > 0);
}

#[test]
fn test_done_twice_keeps_completed_at() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = add(tmp.path(), "Buy milk");
    run_pt_ok(tmp.path(), &["done", &id]);
    let before = read_todos(tmp.path());

    let (stdout, stderr, success) = run_pt(tmp.path(), &["done", &id]);
    assert!(success);
    assert_eq!(stdout.trim(), id);
    assert!(stderr.contains("already done"));
    assert_eq!(read_todos(tmp.path()), before);
}

#[test]
fn test_done_unknown_id() {
    let tmp = tempfile::TempDir::new().unwrap();
    add(tmp.path(), "Buy milk");
    let (_, stderr, success) = run_pt(tmp.path(), &["done", "nope"]);
    assert!(!success);
    assert!(stderr.contains("task not found: nope"));
}

#[test]
fn test_ambiguous_prefix() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("todos.json"),
        r#"{
  "todos": [
    { "id": "100-aaaaaaa", "title": "One", "completed": false, "updated_at": 1 },
    { "id": "100-bbbbbbb", "title": "Two", "completed": false, "updated_at": 2 }
  ],
  "updated_at": 2
}"#,
    )
    .unwrap();
    let (_, stderr, success) = run_pt(tmp.path(), &["rm", "100-"]);
    assert!(!success);
    assert!(stderr.contains("ambiguous task id: 100-"));

    run_pt_ok(tmp.path(), &["rm", "100-b"]);
    let todos = read_todos(tmp.path());
    assert_eq!(todos["todos"].as_array().unwrap().len(), 1);
    assert_eq!(todos["todos"][0]["title"], "One");
}

#[test]
fn test_rename() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = add(tmp.path(), "Buy milk");
    let out = run_pt_ok(tmp.path(), &["rename", &id, "Buy", "oat", "milk"]);
    assert_eq!(out.trim(), id);
    assert_eq!(read_todos(tmp.path())["todos"][0]["title"], "Buy oat milk");
}

#[test]
fn test_rename_to_blank_removes() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = add(tmp.path(), "Buy milk");
    run_pt_ok(tmp.path(), &["done", &id]);

    let out = run_pt_ok(tmp.path(), &["rename", &id, "  "]);
    assert_eq!(out.trim(), format!("removed {}", id));
    assert!(read_todos(tmp.path())["todos"].as_array().unwrap().is_empty());
}

#[test]
fn test_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    let keep = add(tmp.path(), "Buy milk");
    let gone = add(tmp.path(), "Call mom");

    let out = run_pt_ok(tmp.path(), &["rm", &gone]);
    assert_eq!(out.trim(), format!("removed {}", gone));

    let todos = read_todos(tmp.path());
    let ids: Vec<&str> = todos["todos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![keep.as_str()]);
}

#[test]
fn test_malformed_file_refuses_writes() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("todos.json");
    fs::write(&path, "{ not json").unwrap();

    let (_, stderr, success) = run_pt(tmp.path(), &["add", "Buy milk"]);
    assert!(!success);
    assert!(stderr.contains("could not load tasks"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");

    let (_, _, success) = run_pt(tmp.path(), &["list"]);
    assert!(!success);
}

#[test]
fn test_legacy_record_without_created_at() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("todos.json"),
        r#"{ "todos": [ { "id": "1-abc", "title": "Old", "completed": false, "updated_at": 1700000000 } ], "updated_at": 1700000000 }"#,
    )
    .unwrap();
    let out = run_pt_ok(tmp.path(), &["list", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value[0]["created_at"], 1700000000);
    assert_eq!(value[0]["added"], "2023-11-14T22:13:20Z");
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[test]
fn test_log_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    assert_eq!(run_pt_ok(tmp.path(), &["log"]).trim(), "no recovery entries");
}

#[test]
fn test_log_shows_entries_newest_first() {
    let tmp = tempfile::TempDir::new().unwrap();
    log_recovery(
        tmp.path(),
        &RecoveryEntry::new(RecoveryCategory::Load, "could not load tasks"),
    )
    .unwrap();
    log_recovery(
        tmp.path(),
        &RecoveryEntry::new(RecoveryCategory::Save, "could not save tasks")
            .field("Path", "todos.json")
            .body("{\"todos\":[]}"),
    )
    .unwrap();

    let out = run_pt_ok(tmp.path(), &["log"]);
    let save = out.find("save: could not save tasks").unwrap();
    let load = out.find("load: could not load tasks").unwrap();
    assert!(save < load);
    assert!(out.contains("Path: todos.json"));

    let out = run_pt_ok(tmp.path(), &["log", "--limit", "1", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["category"], "save");
    assert_eq!(entries[0]["body"], "{\"todos\":[]}");
}

#[test]
fn test_log_prune_all() {
    let tmp = tempfile::TempDir::new().unwrap();
    log_recovery(
        tmp.path(),
        &RecoveryEntry::new(RecoveryCategory::Window, "could not set always-on-top"),
    )
    .unwrap();
    let out = run_pt_ok(tmp.path(), &["log", "prune", "--all"]);
    assert_eq!(out.trim(), "pruned 1 entries");
    assert_eq!(run_pt_ok(tmp.path(), &["log"]).trim(), "no recovery entries");
}

#[test]
fn test_log_path() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_pt_ok(tmp.path(), &["log", "path"]);
    assert_eq!(
        PathBuf::from(out.trim()),
        tmp.path().join(".recovery.log")
    );
}
