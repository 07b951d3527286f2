// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for envkit.
//!
//! Settings are built once at process start and handed to the engine as an
//! immutable value.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. config file: --config, else $ENVKIT_CONFIG_FILE,
//!    else <config_dir>/envkit/config.toml (optional)
//! 3. ENVKIT_* env vars
//! 4. CLI flags (OR-ed over [defaults])
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! ENVKIT_SYNTAX__ITEM_SEPARATOR=:          → syntax.item_separator = ":"
//! ENVKIT_SYNTAX__MAX_SPLITS=2              → syntax.max_splits = 2
//! ENVKIT_GUARD__NEVER_WRITE_PRODUCTION=0   → guard.never_write_production = false
//! ENVKIT_DEFAULTS__JSON=true               → defaults.json = true
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::accessor::Accessor;
use crate::error::Result;

use loader::ConfigLoader;
use types::{FlagDefaults, GuardSettings, LogSettings, Syntax};

/// Prefix of every environment variable read by the loader.
pub const ENV_PREFIX: &str = "ENVKIT";

/// Variable naming an explicit config file.
pub const CONFIG_FILE_VAR: &str = "ENVKIT_CONFIG_FILE";

/// Complete application settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Separators and numeric parsing rules.
    pub syntax: Syntax,
    /// Production write and delete protection.
    pub guard: GuardSettings,
    /// Flags enabled without being passed on the command line.
    pub defaults: FlagDefaults,
    /// Logging options.
    pub log: LogSettings,
}

impl Settings {
    /// Create a new settings builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use envkit::config::Settings;
    ///
    /// let settings = Settings::builder()
    ///     .add_file_optional("envkit.toml")
    ///     .with_env_prefix("ENVKIT")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Parses settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML, does not match the
    /// `Settings` structure, or holds out-of-range syntax values.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Loads settings from the config file and the `ENVKIT_*` environment.
    ///
    /// An explicit path must exist; the default location is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit config file is missing or malformed,
    /// or if the merged settings are invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let accessor = Accessor::process(Syntax::default());
        let loader = match explicit {
            Some(path) => Self::builder().add_file(path),
            None => match accessor.optional_string(CONFIG_FILE_VAR) {
                Some(path) => Self::builder().add_file(path),
                None => match default_config_file() {
                    Some(path) => Self::builder().add_file_optional(path),
                    None => Self::builder(),
                },
            },
        };
        for (source, path) in loader.loaded_files() {
            tracing::debug!(source, path = %path.display(), "loading settings file");
        }
        loader.with_env_prefix(ENV_PREFIX).build()
    }
}

/// Default config file location, `<config_dir>/envkit/config.toml`.
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("envkit").join("config.toml"))
}
