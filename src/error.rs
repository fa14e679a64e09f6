//! Error types for compiler-scout operations.
//!
//! This module defines [`ScoutError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Discovery problems (a compiler that cannot be probed, a directory that
//!   cannot be read) are recovered locally and never surface here
//! - Persistence problems are fatal to the command and use `ScoutError`
//! - Use `anyhow::Error` (via `ScoutError::Other`) for unexpected errors

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core error type for compiler-scout operations.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// Failed to parse a scope's compilers file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Could not persist an updated scope. The previous file is left untouched.
    #[error("Failed to write config at {path}: {message}")]
    ConfigWriteFailure { path: PathBuf, message: String },

    /// Could not acquire the lock guarding a scope.
    #[error("Failed to lock config at {path}: {message}")]
    ConfigLockFailed { path: PathBuf, message: String },

    /// Scope name is not one of the known configuration layers.
    #[error("Unknown scope '{name}' (expected one of: system, site, user)")]
    UnknownScope { name: String },

    /// A compiler spec string could not be parsed.
    #[error("Invalid compiler spec '{spec}': {message}")]
    InvalidSpec { spec: String, message: String },

    /// Subprocess could not be started or was killed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Subprocess exceeded its time budget and was killed.
    #[error("Command timed out after {timeout:?}: {command}")]
    CommandTimedOut { command: String, timeout: Duration },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for compiler-scout operations.
pub type Result<T> = std::result::Result<T, ScoutError>;
