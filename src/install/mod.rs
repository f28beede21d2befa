//! The installation orchestration core
//!
//! One sync run flows through these stages in order: the [`resolver`]
//! classifies every descriptor as excluded, fresh or reinstall; the
//! [`selector`] turns fresh installs into user-facing choices; the
//! [`executor`] transfers the final selection to disk; [`removal`] finds
//! tracked files no longer declared. Shared run state lives in
//! [`context::RunContext`].

pub mod context;
pub mod executor;
pub mod removal;
pub mod resolver;
pub mod selector;

use std::path::PathBuf;

use crate::backend::RemoteModInformation;

/// A resolved, installation-ready unit: descriptor index, its resolved
/// remote information and its absolute target path
#[derive(Debug, Clone)]
pub struct InstallableMod {
    /// Index of the owning descriptor in the loaded configuration
    pub descriptor_id: usize,
    pub information: RemoteModInformation,
    pub target: PathBuf,
}
