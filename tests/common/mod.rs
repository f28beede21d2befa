//! Common test utilities for modsync integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// A test installation for integration tests
#[allow(dead_code)]
pub struct TestInstall {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to the installation root
    pub root: PathBuf,
    /// Path to the configuration directory
    pub config: PathBuf,
    /// Path to the isolated tracking-state directory
    pub state: PathBuf,
}

impl TestInstall {
    /// Create a new test installation with config, mods and state dirs
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().join("pack");
        let config = temp.path().join("config");
        let state = temp.path().join("state");
        std::fs::create_dir_all(root.join("mods")).expect("Failed to create mods directory");
        std::fs::create_dir_all(&config).expect("Failed to create config directory");
        std::fs::create_dir_all(&state).expect("Failed to create state directory");
        Self {
            temp,
            root,
            config,
            state,
        }
    }

    /// Write a descriptor file into the configuration directory
    pub fn write_descriptors(&self, name: &str, content: &str) {
        std::fs::write(self.config.join(name), content).expect("Failed to write descriptor file");
    }

    /// Write pack.json into the configuration directory
    #[allow(dead_code)]
    pub fn write_pack(&self, content: &str) {
        std::fs::write(self.config.join("pack.json"), content).expect("Failed to write pack.json");
    }

    /// Write a file under the installation root
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.root.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Check if a file exists under the installation root
    pub fn file_exists(&self, path: &str) -> bool {
        self.root.join(path).exists()
    }

    /// A modsync command pointed at this installation with isolated state
    #[allow(deprecated)]
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("modsync").expect("Failed to find binary");
        cmd.env("MODSYNC_STATE_DIR", &self.state);
        cmd
    }

    /// BLAKE3 hash string (with prefix) of arbitrary content, matching what
    /// the tool computes for a file holding that content
    pub fn hash_of(content: &str) -> String {
        format!("blake3:{}", blake3::hash(content.as_bytes()).to_hex())
    }
}
