// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Settings loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_file(req)           TOML or YAML, picked by extension
//!   .add_file_optional(opt)
//!   .add_toml_str()
//!   .with_env_prefix("ENVKIT")
//!        |
//!        v
//!    build() --> Settings (validated)
//! ```

use std::path::{Path, PathBuf};

use super::Settings;
use crate::error::Result;

/// Builder for loading [`Settings`] from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    env_source: Option<config::Map<String, String>>,
    files: Vec<(String, PathBuf)>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            env_source: None,
            files: Vec::new(),
        }
    }

    /// Adds a required configuration file. The format follows the extension
    /// (`.toml`, `.yml`, `.yaml`).
    ///
    /// The file is read when `build()` is called; a missing or malformed file
    /// makes `build()` fail.
    #[must_use]
    pub fn add_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(config::File::from(p).required(true));
        self.files.push(("file".to_string(), p.to_path_buf()));
        self
    }

    #[must_use]
    pub fn add_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(config::File::from(p).required(false));
        if p.exists() {
            self.files.push(("optional".to_string(), p.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        use config::{File, FileFormat};
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.files
            .push(("string".to_string(), PathBuf::from("<string>")));
        self
    }

    /// Reads `<PREFIX>_<SECTION>__<KEY>` variables on `build()`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Replaces the process environment with `vars` for the env-prefix source.
    #[must_use]
    pub fn with_env_source(mut self, vars: config::Map<String, String>) -> Self {
        self.env_source = Some(vars);
        self
    }

    /// Builds the settings from all added sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required configuration files are missing or malformed.
    /// - Environment variables cannot be parsed.
    /// - The merged configuration does not match `Settings`.
    /// - A syntax value is out of range.
    pub fn build(self) -> Result<Settings> {
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(self.env_source.clone()),
            ),
            None => self.builder,
        };
        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        settings.syntax.validate()?;
        Ok(settings)
    }

    #[must_use]
    pub fn loaded_files(&self) -> Vec<(String, PathBuf)> {
        self.files.clone()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
