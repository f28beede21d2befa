//! BLAKE3 hashing utilities for file integrity

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;

use crate::error::{ModsyncError, Result};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Outcome of comparing a file on disk against an expected hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashResult {
    /// File content matches the expected hash
    Matched,
    /// File content differs from the expected hash
    Unmatched,
    /// No expected hash is available, so nothing can be verified
    Unknown,
}

/// Calculate BLAKE3 hash of a file
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| ModsyncError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut reader = BufReader::new(file);
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| ModsyncError::FileReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

/// Compare a file on disk against an optional expected hash.
///
/// Returns [`HashResult::Unknown`] when no expected hash is given or the file
/// cannot be read, since neither case proves the content wrong.
pub fn check_file(path: &Path, expected: Option<&str>) -> HashResult {
    let Some(expected) = expected else {
        return HashResult::Unknown;
    };

    match hash_file(path) {
        Ok(actual) if verify_hash(expected, &actual) => HashResult::Matched,
        Ok(_) => HashResult::Unmatched,
        Err(_) => HashResult::Unknown,
    }
}

/// Verify a hash matches the expected value
pub fn verify_hash(expected: &str, actual: &str) -> bool {
    // Normalize both hashes (ensure prefix)
    let normalize = |h: &str| {
        if h.starts_with(HASH_PREFIX) {
            h.to_string()
        } else {
            format!("{}{}", HASH_PREFIX, h)
        }
    };

    normalize(expected) == normalize(actual)
}
