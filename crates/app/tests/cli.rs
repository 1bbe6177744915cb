//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG: &str = r#"
[access]
admin_users = [100]
grants = [{ user = 1, package = 1 }, { user = 2, package = 1 }]

[logging]
filter = "warn"
"#;

fn tryout(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("tryout").unwrap();
    cmd.current_dir(dir)
        .env_remove("TRYOUT_DB_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tryout.toml"), CONFIG).unwrap();
    tryout(dir.path()).arg("seed").assert().success();
    dir
}

fn run_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = tryout(dir).args(args).assert().success().get_output().clone();
    serde_json::from_slice(&output.stdout).unwrap()
}

fn start(dir: &Path, user: &str) -> String {
    let session = run_json(dir, &["start", "--user", user, "--package", "1"]);
    assert_eq!(session["status"], "in_progress");
    session["id"].as_u64().unwrap().to_string()
}

#[test]
fn help_lists_operations() {
    let dir = TempDir::new().unwrap();
    tryout(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("finish"))
        .stdout(predicate::str::contains("percentile"))
        .stdout(predicate::str::contains("analytics"));
}

#[test]
fn seed_reports_catalog() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tryout.toml"), CONFIG).unwrap();
    tryout(dir.path())
        .arg("seed")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"questions\": 6"));
    assert!(dir.path().join("tryout.sqlite3").exists());
}

#[test]
fn full_session_flow() {
    let dir = workspace();
    let session = start(dir.path(), "1");

    let verdict = run_json(
        dir.path(),
        &["answer", "--user", "1", "--session", &session, "--question", "1", "--option", "a"],
    );
    assert_eq!(verdict["is_correct"], true);

    let verdict = run_json(
        dir.path(),
        &["answer", "--user", "1", "--session", &session, "--question", "5", "--option", "E"],
    );
    assert!(verdict["is_correct"].is_null());

    let progress = run_json(dir.path(), &["progress", "--user", "1", "--session", &session]);
    assert_eq!(progress["answered"], 2);
    assert_eq!(progress["remaining"], 4);

    let result = run_json(dir.path(), &["finish", "--user", "1", "--session", &session]);
    assert_eq!(result["scores"]["twk"], 5);
    assert_eq!(result["scores"]["total"], 10);
    assert_eq!(result["scores"]["is_passed"], false);

    let results = run_json(dir.path(), &["results", "--user", "1", "--session", &session]);
    assert_eq!(results["scores"], result["scores"]);

    let percentile = run_json(dir.path(), &["percentile", "--session", &session]);
    assert_eq!(percentile["percentile"], 100);

    let ranking = run_json(dir.path(), &["ranking", "--package", "1"]);
    assert_eq!(ranking["participant_count"], 1);
    assert_eq!(ranking["entries"][0]["rank"], 1);

    let analytics = run_json(dir.path(), &["analytics", "--user", "1"]);
    assert_eq!(analytics["history"]["attempts"], 1);
    assert!(analytics["prediction"]["probability"].is_u64());
}

#[test]
fn rejects_invalid_option_letter() {
    let dir = workspace();
    let session = start(dir.path(), "1");
    tryout(dir.path())
        .args(["answer", "--user", "1", "--session", &session, "--question", "1", "--option", "F"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid option letter"));
}

#[test]
fn start_without_entitlement_is_denied() {
    let dir = workspace();
    tryout(dir.path())
        .args(["start", "--user", "7", "--package", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("access denied"));
}

#[test]
fn finishing_twice_is_invalid_state() {
    let dir = workspace();
    let session = start(dir.path(), "2");
    tryout(dir.path())
        .args(["finish", "--user", "2", "--session", &session])
        .assert()
        .success();
    tryout(dir.path())
        .args(["finish", "--user", "2", "--session", &session])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid state"));
    tryout(dir.path())
        .args(["answer", "--user", "2", "--session", &session, "--question", "2", "--option", "C"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid state"));
}

#[test]
fn non_integer_ids_are_rejected() {
    let dir = TempDir::new().unwrap();
    tryout(dir.path())
        .args(["start", "--user", "abc", "--package", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--user"));
}
