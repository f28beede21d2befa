//! Tests for the status command's classification output
//!
//! Raw-URL descriptors resolve their filename offline, so these scenarios
//! never touch the network.

mod common;

use common::TestInstall;
use predicates::prelude::*;

#[test]
fn test_missing_file_classifies_install() {
    let install = TestInstall::new();
    install.write_descriptors(
        "mods.json",
        r#"[{"type": "url", "url": "https://example.com/files/foo.jar"}]"#,
    );

    install
        .cmd()
        .args(["status", "--config"])
        .arg(&install.config)
        .arg("--root")
        .arg(&install.root)
        .assert()
        .success()
        .stdout(predicate::str::contains("install"));
}

#[test]
fn test_matching_hash_classifies_up_to_date() {
    let install = TestInstall::new();
    install.write_file("mods/foo.jar", "installed content");
    install.write_descriptors(
        "mods.json",
        &format!(
            r#"[{{"type": "url", "url": "https://example.com/files/foo.jar",
                 "metadata": {{"hash": "{}"}}}}]"#,
            TestInstall::hash_of("installed content")
        ),
    );

    install
        .cmd()
        .args(["status", "--config"])
        .arg(&install.config)
        .arg("--root")
        .arg(&install.root)
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date / skipped"));
}

#[test]
fn test_mismatched_hash_classifies_reinstall() {
    let install = TestInstall::new();
    install.write_file("mods/foo.jar", "stale content");
    install.write_descriptors(
        "mods.json",
        &format!(
            r#"[{{"type": "url", "url": "https://example.com/files/foo.jar",
                 "metadata": {{"hash": "{}"}}}}]"#,
            TestInstall::hash_of("expected content")
        ),
    );

    install
        .cmd()
        .args(["status", "--config"])
        .arg(&install.config)
        .arg("--root")
        .arg(&install.root)
        .assert()
        .success()
        .stdout(predicate::str::contains("reinstall"));
}

#[test]
fn test_force_redownload_classifies_reinstall() {
    let install = TestInstall::new();
    install.write_file("mods/foo.jar", "whatever");
    install.write_descriptors(
        "mods.json",
        r#"[{"type": "url", "url": "https://example.com/files/foo.jar",
             "installationPolicy": {"downloadAlways": true}}]"#,
    );

    install
        .cmd()
        .args(["status", "--config"])
        .arg(&install.config)
        .arg("--root")
        .arg(&install.root)
        .assert()
        .success()
        .stdout(predicate::str::contains("reinstall"));
}

#[test]
fn test_existing_file_without_hash_is_skipped() {
    let install = TestInstall::new();
    install.write_file("mods/foo.jar", "externally managed");
    install.write_descriptors(
        "mods.json",
        r#"[{"type": "url", "url": "https://example.com/files/foo.jar"}]"#,
    );

    install
        .cmd()
        .args(["status", "--config"])
        .arg(&install.config)
        .arg("--root")
        .arg(&install.root)
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date / skipped"));
}

#[test]
fn test_wrong_side_is_skipped() {
    let install = TestInstall::new();
    install.write_descriptors(
        "mods.json",
        r#"[{"type": "url", "url": "https://example.com/files/server-only.jar",
             "metadata": {"side": "server"}}]"#,
    );

    install
        .cmd()
        .args(["status", "--side", "client", "--config"])
        .arg(&install.config)
        .arg("--root")
        .arg(&install.root)
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date / skipped"));
}

#[test]
fn test_path_escape_is_fatal() {
    let install = TestInstall::new();
    install.write_descriptors(
        "mods.json",
        r#"[{"type": "url", "url": "https://example.com/files/evil.jar",
             "folder": "../outside"}]"#,
    );

    install
        .cmd()
        .args(["status", "--config"])
        .arg(&install.config)
        .arg("--root")
        .arg(&install.root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the installation root"));
}
