// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for envkit.
//!
//! # Settings Structure
//!
//! ```text
//! Settings: Syntax, GuardSettings, FlagDefaults, LogSettings
//! Syntax:   item_separator "=", max_splits 1, list/map separators ","
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ValidationError;
use crate::logging::LogLevel;

/// Separators and numeric parsing rules shared by the dotenv parser, the
/// exporters and the typed accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Syntax {
    /// Separator between a key and its value.
    pub item_separator: String,
    /// Maximum number of times a line is split on `item_separator`.
    pub max_splits: usize,
    /// Separator between list items in accessor values.
    pub list_separator: String,
    /// Separator between `key=value` pairs in accessor map values.
    pub map_separator: String,
    /// Radix used by 64-bit integer accessors.
    pub int_radix: u32,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            item_separator: "=".to_string(),
            max_splits: 1,
            list_separator: ",".to_string(),
            map_separator: ",".to_string(),
            int_radix: 10,
        }
    }
}

impl Syntax {
    /// Syntax with a custom key/value separator and default everything else.
    #[must_use]
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            item_separator: separator.into(),
            ..Self::default()
        }
    }

    /// Splits `text` into a trimmed `(key, value)` pair.
    ///
    /// The split is bounded by `max_splits`; anything other than exactly two
    /// pieces yields `None`. Emptiness of the pieces is left to the caller.
    #[must_use]
    pub fn split_pair<'a>(&self, text: &'a str) -> Option<(&'a str, &'a str)> {
        let mut pieces = text.splitn(self.max_splits.saturating_add(1), self.item_separator.as_str());
        let key = pieces.next()?;
        let value = pieces.next()?;
        if pieces.next().is_some() {
            return None;
        }
        Some((key.trim(), value.trim()))
    }

    /// Checks the invariants the parser relies on.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidSetting` for an empty separator, a
    /// zero split count or a radix outside `2..=36`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |key: &str, message: &str| ValidationError::InvalidSetting {
            key: format!("syntax.{key}"),
            message: message.to_string(),
        };
        if self.item_separator.is_empty() {
            return Err(invalid("item_separator", "separator must not be empty"));
        }
        if self.list_separator.is_empty() {
            return Err(invalid("list_separator", "separator must not be empty"));
        }
        if self.map_separator.is_empty() {
            return Err(invalid("map_separator", "separator must not be empty"));
        }
        if self.max_splits == 0 {
            return Err(invalid("max_splits", "at least one split is required"));
        }
        if !(2..=36).contains(&self.int_radix) {
            return Err(invalid("int_radix", "radix must be between 2 and 36"));
        }
        Ok(())
    }
}

/// Write and delete protection toggles.
///
/// `None` means "decide from context": production detection for writes, the
/// presence of `--write`/`--rm` for deletes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardSettings {
    pub never_write_production: Option<bool>,
    pub never_delete: Option<bool>,
}

/// Flags that are switched on even when absent from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlagDefaults {
    pub write: bool,
    pub print: bool,
    pub json: bool,
    pub yaml: bool,
    pub xml: bool,
    pub toml: bool,
    pub ini: bool,
}

/// Logging options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// Console log level (0-6).
    pub level: LogLevel,
    /// Optional log file.
    pub file: Option<PathBuf>,
}
