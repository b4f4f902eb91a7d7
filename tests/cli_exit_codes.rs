//! Exit status of the `rollout` binary for setup failures.

use assert_cmd::Command;
use predicates::prelude::*;

fn rollout() -> Command {
    let mut cmd = Command::cargo_bin("rollout").unwrap();
    cmd.env_remove("FILE")
        .env_remove("TEMPLATE")
        .env_remove("DRY_RUN")
        .env_remove("DRY_RUN_SCOPE")
        .env("RUST_LOG", "error");
    cmd
}

#[test]
fn test_help_succeeds() {
    rollout()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--file"));
}

#[test]
fn test_missing_manifest_is_fatal() {
    let temp = tempfile::tempdir().unwrap();
    let template = temp.path().join("template.yaml");
    std::fs::write(&template, "${REPO_TIER}").unwrap();

    rollout()
        .current_dir(temp.path())
        .arg("--file")
        .arg(temp.path().join("missing.csv"))
        .arg("--template")
        .arg(&template)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read manifest"));
}

#[test]
fn test_missing_template_is_fatal() {
    let temp = tempfile::tempdir().unwrap();
    let manifest = temp.path().join("repos.csv");
    std::fs::write(&manifest, "https://github.com/acme/widget,2\n").unwrap();

    rollout()
        .current_dir(temp.path())
        .arg("--file")
        .arg(&manifest)
        .arg("--template")
        .arg(temp.path().join("missing.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read template"));
}

#[test]
fn test_empty_manifest_reports_zero() {
    let temp = tempfile::tempdir().unwrap();
    let manifest = temp.path().join("repos.csv");
    let template = temp.path().join("template.yaml");
    std::fs::write(&manifest, "not,a,valid,row\n").unwrap();
    std::fs::write(&template, "${REPO_TIER}").unwrap();

    rollout()
        .current_dir(temp.path())
        .arg("--file")
        .arg(&manifest)
        .arg("--template")
        .arg(&template)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout("0 Pull Request(s) created.\n");
}

#[test]
fn test_enum_flags_use_config_spelling() {
    let temp = tempfile::tempdir().unwrap();
    let manifest = temp.path().join("repos.csv");
    let template = temp.path().join("template.yaml");
    std::fs::write(&manifest, "").unwrap();
    std::fs::write(&template, "${REPO_TIER}").unwrap();

    rollout()
        .current_dir(temp.path())
        .arg("--file")
        .arg(&manifest)
        .arg("--template")
        .arg(&template)
        .args(["--mode", "api_commit", "--dry-run-scope", "no_mutation"])
        .assert()
        .success()
        .stdout("0 Pull Request(s) created.\n");

    rollout()
        .current_dir(temp.path())
        .args(["--mode", "api-commit"])
        .assert()
        .failure();
}
