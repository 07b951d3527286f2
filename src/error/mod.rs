// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                      EnvError
//!                         |
//!   +--------+--------+---+----+---------+------------+
//!   |        |        |        |         |            |
//!   v        v        v        v         v            v
//! NoFile  NotFound  Empty   Denied/Io  Validation  ProductionProtected
//!                                         |
//!                          CombinedFormats, InvalidSetting
//!
//! AccessError   typed accessor failures (Missing, InvalidName, InvalidValue,
//!               Verification)
//! ```
//!
//! The engine never terminates the process. Every failure travels up as an
//! [`EnvError`] and `main` turns it into exit code 1.

use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`EnvError`].
pub type EnvResult<T> = std::result::Result<T, EnvError>;

/// Fixed diagnostic emitted when a write to a protected production file is refused.
pub const PRODUCTION_HALT: &str = "HALT: PRODUCTION IS PROTECTED! WRITE OPERATION CANCELED.";

/// Top-level engine error type.
#[derive(Debug, Error)]
pub enum EnvError {
    /// No path was given and no default env file could be discovered.
    #[error("no environment file found, pass --file or use --init")]
    NoEnvFile,

    /// The env file does not exist and neither `--init` nor `--write` was given.
    #[error("{} does not exist, use --write to create", .path.display())]
    NotFound { path: PathBuf },

    /// The env file exists but holds no bytes.
    #[error("{} is empty ({size} bytes)", .path.display())]
    Empty { path: PathBuf, size: usize },

    /// The env path is a directory.
    #[error("{} is not a regular file", .path.display())]
    NotAFile { path: PathBuf },

    /// Permission denied while reading or writing.
    #[error("permission denied: {}", .path.display())]
    PermissionDenied { path: PathBuf },

    /// Any other I/O failure.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON rendering failed.
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Caller misuse detected before any file was touched.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A write to a production env file was refused.
    #[error("{}", PRODUCTION_HALT)]
    ProductionProtected { path: PathBuf },
}

impl EnvError {
    /// Classifies an I/O error on `path` by its kind.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            ErrorKind::NotFound => Self::NotFound { path },
            ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    /// Wraps a failure to write to the output stream.
    pub fn output(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<stdout>"),
            source,
        }
    }
}

/// Validation errors raised before the engine touches the filesystem.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// More than one non-plain export format was requested without `--mk-all`.
    #[error("cannot combine --{first} with --{second}, use --mk-all to build every format")]
    CombinedFormats {
        first: &'static str,
        second: &'static str,
    },

    /// A configuration value is out of range.
    #[error("invalid value for '{key}': {message}")]
    InvalidSetting { key: String, message: String },
}

/// Errors raised by the typed environment accessors.
#[derive(Debug, Error)]
pub enum AccessError {
    /// A required variable is not set.
    #[error("required environment variable '{var}' is not set")]
    Missing { var: String },

    /// The name is empty or contains `=` or NUL.
    #[error("invalid environment variable name '{var}'")]
    InvalidName { var: String },

    /// The value contains NUL.
    #[error("invalid value for environment variable '{var}'")]
    InvalidValue { var: String },

    /// A write did not read back as expected.
    #[error("environment variable '{var}' did not hold the written state")]
    Verification { var: String },
}
