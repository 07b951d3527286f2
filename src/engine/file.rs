// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pre-flight file snapshot and default env-file discovery.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{EnvError, EnvResult};

/// Files tried, in order, when no path is given.
pub const DISCOVERY_ORDER: [&str; 4] = [".env", ".env.local", ".env.development", ".env.production"];

/// Metadata captured once before processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub path: PathBuf,
    pub exists: bool,
    pub size: u64,
    pub readonly: bool,
    pub modified: Option<SystemTime>,
    pub is_dir: bool,
}

impl FileDescriptor {
    /// Stats `path`. A missing file is a descriptor with `exists == false`.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than "not found".
    pub fn snapshot(path: &Path) -> EnvResult<Self> {
        match std::fs::metadata(path) {
            Ok(meta) => Ok(Self {
                path: path.to_path_buf(),
                exists: true,
                size: meta.len(),
                readonly: meta.permissions().readonly(),
                modified: meta.modified().ok(),
                is_dir: meta.is_dir(),
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self {
                path: path.to_path_buf(),
                exists: false,
                size: 0,
                readonly: false,
                modified: None,
                is_dir: false,
            }),
            Err(err) => Err(EnvError::io(path, err)),
        }
    }
}

/// First existing candidate of [`DISCOVERY_ORDER`] under `dir`.
#[must_use]
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DISCOVERY_ORDER
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}
