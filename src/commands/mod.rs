//! Command implementations for the modsync CLI

pub mod completions;
pub mod status;
pub mod sync;
pub mod version;
