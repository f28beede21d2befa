//! Per-run orchestration state
//!
//! A [`RunContext`] is constructed once per sync run and passed by reference
//! to every stage. Workers record failures and successes into it under locks;
//! a single fatal-severity entry makes the orchestrator halt after the
//! current stage finishes.

use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::backend::RemoteModInformation;
use crate::config::{InstallSide, ModDescriptor, PackConfig};

/// How severe a recorded per-item failure is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Logged, run continues
    Warn,
    /// Logged, run halts after the current stage
    Error,
}

/// One failure recorded during a run
#[derive(Debug, Clone)]
pub struct RunError {
    pub severity: Severity,
    pub message: String,
}

/// The outcome of one successful install, exposed to the host application
#[derive(Debug, Clone)]
pub struct InstalledMod {
    pub path: PathBuf,
    pub options: Option<Map<String, Value>>,
    pub inject: bool,
}

/// Shared state for one orchestration run
pub struct RunContext {
    pub side: InstallSide,
    local_version: Option<String>,
    remote_version: Option<String>,
    errors: Mutex<Vec<RunError>>,
    installed: Mutex<Vec<InstalledMod>>,
    info_cache: Mutex<HashMap<usize, RemoteModInformation>>,
}

impl RunContext {
    pub fn new(pack: &PackConfig, side: InstallSide, remote_version: Option<String>) -> Self {
        Self {
            side,
            local_version: pack.local_version.clone(),
            remote_version,
            errors: Mutex::new(Vec::new()),
            installed: Mutex::new(Vec::new()),
            info_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Record a per-item failure
    pub fn add_error(&self, severity: Severity, message: impl Into<String>) {
        self.errors.lock().push(RunError {
            severity,
            message: message.into(),
        });
    }

    /// Whether any fatal-severity error has been recorded so far
    pub fn has_fatal(&self) -> bool {
        self.errors
            .lock()
            .iter()
            .any(|e| e.severity == Severity::Error)
    }

    pub fn fatal_count(&self) -> usize {
        self.errors
            .lock()
            .iter()
            .filter(|e| e.severity == Severity::Error)
            .count()
    }

    /// Snapshot of every recorded failure
    pub fn errors(&self) -> Vec<RunError> {
        self.errors.lock().clone()
    }

    /// Record a successful install result
    pub fn record_installed(&self, result: InstalledMod) {
        self.installed.lock().push(result);
    }

    pub fn installed(&self) -> Vec<InstalledMod> {
        self.installed.lock().clone()
    }

    /// Cache resolved remote information for a descriptor, keyed by its index
    pub fn cache_info(&self, descriptor_id: usize, information: RemoteModInformation) {
        self.info_cache.lock().insert(descriptor_id, information);
    }

    /// Previously cached remote information, if any
    pub fn cached_info(&self, descriptor_id: usize) -> Option<RemoteModInformation> {
        self.info_cache.lock().get(&descriptor_id).cloned()
    }

    /// Severity of a download or query failure for this descriptor
    pub fn severity_for(&self, descriptor: &ModDescriptor) -> Severity {
        if descriptor.continue_on_failure() {
            Severity::Warn
        } else {
            Severity::Error
        }
    }

    /// Version-gate check: a gated descriptor installs only when its policy
    /// version equals the remote pack version, falling back to the local
    /// version when no remote version is known. Without either, no gate
    /// applies.
    pub fn passes_version_gate(&self, descriptor: &ModDescriptor) -> bool {
        let Some(gate) = descriptor
            .policy
            .as_ref()
            .and_then(|p| p.pack_version.as_deref())
        else {
            return true;
        };

        match self.remote_version.as_deref().or(self.local_version.as_deref()) {
            Some(version) => gate == version,
            None => true,
        }
    }
}
