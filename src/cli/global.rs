// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Options that configure the process rather than the run.
//!
//! ```text
//! --config FILE     ← settings file (TOML or YAML)
//! --log-level N     ← console verbosity (0-6), overrides log.level
//! --log-file FILE   ← log file, overrides log.file
//! -v/--verbose      ← raise console verbosity to at least debug
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::config::types::LogSettings;
use crate::logging::{LogConfig, LogLevel};

/// Process-level options.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to a TOML or YAML settings file.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Report what is being read and written.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl GlobalOptions {
    /// Merges these flags over the `[log]` settings.
    #[must_use]
    pub fn log_config(&self, settings: &LogSettings) -> LogConfig {
        let console_level = self
            .log_level
            .and_then(LogLevel::from_u8)
            .unwrap_or(settings.level)
            .with_verbose(self.verbose);

        let log_file = self.log_file.as_ref().or(settings.file.as_ref());

        LogConfig::builder()
            .with_console_level(console_level)
            .with_file_level(console_level.max(LogLevel::DEBUG))
            .maybe_with_log_file(log_file.map(|p| p.display().to_string()))
            .build()
    }
}
