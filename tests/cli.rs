use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::write;
use tempfile::tempdir;

#[test]
fn help_lists_the_two_flags() {
    let mut cmd = Command::cargo_bin("repo-digest").expect("Binary exists");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"))
        .stdout(predicate::str::contains("--refresh-summaries"));
}

#[test]
fn unknown_flag_is_rejected() {
    let mut cmd = Command::cargo_bin("repo-digest").expect("Binary exists");
    cmd.arg("--config").assert().failure();
}

#[test]
fn missing_credentials_fail_before_any_output_is_written() {
    let workdir = tempdir().expect("temp dir");
    let config_path = workdir.path().join("digest.yaml");
    // A helper that cannot launch, so only the (removed) variables remain.
    write(&config_path, "credentials:\n  helper: [\"/nonexistent/gh\"]\n")
        .expect("Writing temp config failed");

    let mut cmd = Command::cargo_bin("repo-digest").expect("Binary exists");
    cmd.current_dir(workdir.path())
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .env("REPO_DIGEST_CONFIG", &config_path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No GitHub token found"));

    assert!(!workdir.path().join("data").exists());
}
