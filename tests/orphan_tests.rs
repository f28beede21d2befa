//! Tests for orphan detection, removal and tracking persistence

mod common;

use common::TestInstall;
use predicates::prelude::*;

/// Path of the tracking file inside the isolated state directory, for the
/// default pack on the client side
fn tracking_path(install: &TestInstall) -> std::path::PathBuf {
    install
        .state
        .join("default/unknown/client/installed-mods.json")
}

fn seed_tracking(install: &TestInstall, files: &[&str]) {
    let path = tracking_path(install);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let entries: Vec<String> = files.iter().map(|f| format!("\"{f}\"")).collect();
    std::fs::write(
        &path,
        format!("{{\"installedFiles\": [{}]}}", entries.join(", ")),
    )
    .unwrap();
}

fn read_tracking(install: &TestInstall) -> String {
    std::fs::read_to_string(tracking_path(install)).unwrap()
}

#[test]
fn test_tracked_undeclared_file_is_removed() {
    let install = TestInstall::new();
    install.write_file("mods/old.jar", "no longer declared");
    install.write_descriptors("mods.json", "[]");
    seed_tracking(&install, &["old.jar"]);

    install
        .cmd()
        .args(["sync", "--yes", "--config"])
        .arg(&install.config)
        .arg("--root")
        .arg(&install.root)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 removed"));

    assert!(!install.file_exists("mods/old.jar"));
    assert!(!read_tracking(&install).contains("old.jar"));
}

#[test]
fn test_stale_tracking_entry_is_untracked_quietly() {
    let install = TestInstall::new();
    install.write_descriptors("mods.json", "[]");
    seed_tracking(&install, &["vanished.jar"]);

    install
        .cmd()
        .args(["sync", "--yes", "--config"])
        .arg(&install.config)
        .arg("--root")
        .arg(&install.root)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 removed"));

    assert!(!read_tracking(&install).contains("vanished.jar"));
}

#[test]
fn test_declared_tracked_file_is_kept() {
    let install = TestInstall::new();
    install.write_file("mods/current.jar", "declared content");
    install.write_descriptors(
        "mods.json",
        r#"[{"type": "url", "url": "https://example.com/files/current.jar"}]"#,
    );
    seed_tracking(&install, &["current.jar"]);

    install
        .cmd()
        .args(["sync", "--yes", "--config"])
        .arg(&install.config)
        .arg("--root")
        .arg(&install.root)
        .assert()
        .success();

    assert!(install.file_exists("mods/current.jar"));
    assert!(read_tracking(&install).contains("current.jar"));
}

#[test]
fn test_empty_tracking_reconstructs_from_disk() {
    let install = TestInstall::new();
    install.write_file("mods/preexisting.jar", "installed before tracking");
    install.write_descriptors(
        "mods.json",
        r#"[{"type": "url", "url": "https://example.com/files/preexisting.jar"}]"#,
    );

    install
        .cmd()
        .args(["sync", "--yes", "--config"])
        .arg(&install.config)
        .arg("--root")
        .arg(&install.root)
        .assert()
        .success();

    // The pre-tracking install is adopted without being re-downloaded
    assert!(install.file_exists("mods/preexisting.jar"));
    assert!(read_tracking(&install).contains("preexisting.jar"));
}

#[test]
fn test_dry_run_does_not_remove_orphans() {
    let install = TestInstall::new();
    install.write_file("mods/old.jar", "no longer declared");
    install.write_descriptors("mods.json", "[]");
    seed_tracking(&install, &["old.jar"]);

    install
        .cmd()
        .args(["sync", "--dry-run", "--config"])
        .arg(&install.config)
        .arg("--root")
        .arg(&install.root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Would offer for removal:"))
        .stdout(predicate::str::contains("old.jar"));

    assert!(install.file_exists("mods/old.jar"));
}

#[test]
fn test_state_path_uses_pack_identity() {
    let install = TestInstall::new();
    install.write_pack(r#"{"packName": "My Pack!", "targetVersion": "1.20.1"}"#);
    install.write_descriptors("mods.json", "[]");

    install
        .cmd()
        .args(["sync", "--yes", "--side", "server", "--config"])
        .arg(&install.config)
        .arg("--root")
        .arg(&install.root)
        .assert()
        .success();

    assert!(
        install
            .state
            .join("My_Pack_/1.20.1/server/installed-mods.json")
            .exists()
    );
}
