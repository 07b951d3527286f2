// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Removal of previously exported format files.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::Format;
use crate::error::{EnvError, EnvResult};

/// Order in which sibling exports are checked.
pub const CLEAN_ORDER: [Format; 5] = [
    Format::Json,
    Format::Yaml,
    Format::Toml,
    Format::Xml,
    Format::Ini,
];

/// What a clean pass did with each sibling export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Files deleted.
    pub removed: Vec<PathBuf>,
    /// Files left in place because deletion is disabled.
    pub retained: Vec<PathBuf>,
    /// Files that could not be inspected or removed.
    pub skipped: Vec<PathBuf>,
}

impl CleanReport {
    #[must_use]
    pub fn touched(&self) -> usize {
        self.removed.len() + self.retained.len() + self.skipped.len()
    }
}

/// Deletes `<base>.json|.yaml|.toml|.xml|.ini`.
///
/// While `never_delete` is set nothing is removed and a hint is written to
/// `out` for every file that would have been.
///
/// # Errors
///
/// Returns an error if a removal fails for a reason other than permissions,
/// or if the hint cannot be written.
pub fn clean_all<W: Write>(base: &Path, never_delete: bool, out: &mut W) -> EnvResult<CleanReport> {
    let mut report = CleanReport::default();

    for format in CLEAN_ORDER {
        let target = format.target(base);
        match std::fs::metadata(&target) {
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => continue,
            Err(err) => {
                warn!(path = %target.display(), error = %err, "cannot inspect export");
                report.skipped.push(target);
                continue;
            }
        }

        if never_delete {
            writeln!(out, "The --write flag can be used to remove {}", target.display())
                .map_err(EnvError::output)?;
            report.retained.push(target);
            continue;
        }

        match std::fs::remove_file(&target) {
            Ok(()) => {
                debug!(path = %target.display(), "removed export");
                report.removed.push(target);
            }
            Err(err) if err.kind() == ErrorKind::PermissionDenied => {
                warn!(path = %target.display(), error = %err, "export is not writable");
                report.skipped.push(target);
            }
            Err(err) => return Err(EnvError::io(&target, err)),
        }
    }

    Ok(report)
}
