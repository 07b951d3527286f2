// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Export format flags.

use clap::Args;

use crate::config::types::FlagDefaults;
use crate::export::Formats;

/// Output formats. Only one may be chosen unless --mk-all is given.
#[derive(Debug, Clone, Default, Args)]
pub struct ExportArgs {
    /// Render as JSON.
    #[arg(long)]
    pub json: bool,

    /// Render as YAML.
    #[arg(long)]
    pub yaml: bool,

    /// Render as XML.
    #[arg(long)]
    pub xml: bool,

    /// Render as `key: "value"` lines.
    #[arg(long)]
    pub toml: bool,

    /// Render as INI.
    #[arg(long)]
    pub ini: bool,

    /// Render every format, then the plain file.
    #[arg(long = "mk-all")]
    pub mk_all: bool,
}

impl ExportArgs {
    /// Requested formats with the configured defaults OR-ed in.
    #[must_use]
    pub fn formats(&self, defaults: &FlagDefaults) -> Formats {
        let mut formats = Formats::empty();
        formats.set(Formats::JSON, self.json || defaults.json);
        formats.set(Formats::YAML, self.yaml || defaults.yaml);
        formats.set(Formats::XML, self.xml || defaults.xml);
        formats.set(Formats::TOML, self.toml || defaults.toml);
        formats.set(Formats::INI, self.ini || defaults.ini);
        formats
    }
}
