//! Error types and handling for modsync
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! These are the hard failures that abort a whole command. Per-item failures
//! encountered while resolving or installing individual mods are collected as
//! [`crate::install::context::RunError`] values instead, so that one broken
//! descriptor never takes down its siblings.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for modsync operations
#[derive(Error, Diagnostic, Debug)]
pub enum ModsyncError {
    // Configuration errors
    #[error("Configuration directory not found: {path}")]
    #[diagnostic(
        code(modsync::config::dir_not_found),
        help("Pass --config pointing at the directory holding your mod descriptor files")
    )]
    ConfigDirNotFound { path: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(modsync::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(modsync::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Pack name '{name}' contains a version number")]
    #[diagnostic(
        code(modsync::config::pack_name_version),
        help(
            "Keep the pack name constant across updates and put versions in the \
             dedicated 'localVersion' / 'targetVersion' fields instead, so file \
             tracking survives pack upgrades"
        )
    )]
    PackNameContainsVersion { name: String },

    // Remote backend errors
    #[error("Failed to query information for {name} from {backend}: {reason}")]
    #[diagnostic(code(modsync::backend::query_failed))]
    QueryFailed {
        name: String,
        backend: String,
        reason: String,
    },

    #[error("Failed to download {name}: {reason}")]
    #[diagnostic(code(modsync::backend::download_failed))]
    DownloadFailed { name: String, reason: String },

    // Installation errors
    #[error("File {path} did not match its expected hash after download")]
    #[diagnostic(
        code(modsync::install::hash_mismatch),
        help("The remote file may be corrupt or the configured hash is stale")
    )]
    HashMismatch { path: String },

    #[error("Refusing to install to {path}, which is outside the installation root {root}")]
    #[diagnostic(code(modsync::install::path_escape))]
    PathEscape { path: String, root: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(modsync::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(modsync::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(modsync::fs::io_error))]
    IoError { message: String },

    #[error("Could not determine a home directory for tracking state")]
    #[diagnostic(
        code(modsync::tracker::no_state_root),
        help("Set MODSYNC_STATE_DIR to an explicit directory")
    )]
    NoStateRoot,

    // Run outcome
    #[error("Sync aborted after {count} fatal error(s)")]
    #[diagnostic(
        code(modsync::run::fatal),
        help("The error summary above lists every failure recorded during the run")
    )]
    FatalRunErrors { count: usize },
}

impl From<std::io::Error> for ModsyncError {
    fn from(err: std::io::Error) -> Self {
        ModsyncError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ModsyncError {
    fn from(err: serde_json::Error) -> Self {
        ModsyncError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for ModsyncError {
    fn from(err: inquire::InquireError) -> Self {
        ModsyncError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ModsyncError>;
