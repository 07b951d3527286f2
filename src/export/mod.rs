// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Rendering of the final record store.
//!
//! ```text
//! Format   ext     shape
//! Json     .json   serde_json pretty object, insertion order
//! Ini      .ini    [default] + `key = value`
//! Yaml     .yaml   --- + `key: "value"`
//! Toml     .toml   `key: "value"`
//! Xml      .xml    <env><key>value</key></env>
//!
//! ExportSpec { formats, build_all, persist }
//!   validate()  at most one format unless build_all
//!   emit()      persist to <path><ext> (guarded) or print
//! ```
//!
//! The TOML shape reuses the YAML line form and is not valid TOML. Consumers
//! of existing output depend on it, so it is kept.

pub mod clean;

#[cfg(test)]
mod tests;

use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use bitflags::bitflags;
use regex::Regex;
use tracing::{debug, warn};

use crate::dotenv::RecordStore;
use crate::engine::guard::ProductionGuard;
use crate::error::{EnvError, EnvResult, ValidationError};

bitflags! {
    /// Export formats requested for one invocation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Formats: u8 {
        const JSON = 0x01;
        const INI = 0x02;
        const YAML = 0x04;
        const XML = 0x08;
        const TOML = 0x10;
    }
}

/// One non-plain output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Ini,
    Yaml,
    Toml,
    Xml,
}

impl Format {
    /// Build order used by `--mk-all`.
    pub const ALL: [Self; 5] = [Self::Json, Self::Ini, Self::Yaml, Self::Toml, Self::Xml];

    /// Order in which combined flags are reported as conflicting.
    const VALIDATION_ORDER: [Self; 5] = [Self::Json, Self::Ini, Self::Yaml, Self::Xml, Self::Toml];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Ini => "ini",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Xml => "xml",
        }
    }

    /// File extension including the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => ".json",
            Self::Ini => ".ini",
            Self::Yaml => ".yaml",
            Self::Toml => ".toml",
            Self::Xml => ".xml",
        }
    }

    #[must_use]
    pub const fn flag(self) -> Formats {
        match self {
            Self::Json => Formats::JSON,
            Self::Ini => Formats::INI,
            Self::Yaml => Formats::YAML,
            Self::Toml => Formats::TOML,
            Self::Xml => Formats::XML,
        }
    }

    /// `<base><ext>`, e.g. `.env.production.json`.
    #[must_use]
    pub fn target(self, base: &Path) -> PathBuf {
        let mut name = base.as_os_str().to_os_string();
        name.push(self.extension());
        PathBuf::from(name)
    }

    /// Renders `store` in this format.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::Json` if JSON serialization fails.
    pub fn render(self, store: &RecordStore) -> EnvResult<String> {
        Ok(match self {
            Self::Json => serde_json::to_string_pretty(store)?,
            Self::Ini => render_ini(store),
            Self::Yaml => render_yaml(store),
            Self::Toml => render_toml(store),
            Self::Xml => render_xml(store),
        })
    }
}

fn render_ini(store: &RecordStore) -> String {
    let mut out = String::from("[default]\n");
    for (key, value) in store.iter() {
        let _ = writeln!(out, "{key} = {value}");
    }
    out
}

fn render_yaml(store: &RecordStore) -> String {
    let mut out = String::from("---\n");
    out.push_str(&render_toml(store));
    out
}

fn render_toml(store: &RecordStore) -> String {
    let mut out = String::new();
    for (key, value) in store.iter() {
        let _ = writeln!(out, "{key}: \"{value}\"");
    }
    out
}

static XML_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").ok());

fn render_xml(store: &RecordStore) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<env>\n");
    for (key, value) in store.iter() {
        if !is_xml_name(key) {
            warn!(key, "key is not a valid XML element name, writing it unescaped");
        }
        let _ = writeln!(out, "   <{key}>{value}</{key}>");
    }
    out.push_str("</env>\n");
    out
}

/// Whether `key` can be used verbatim as an XML element name.
#[must_use]
pub fn is_xml_name(key: &str) -> bool {
    XML_NAME.as_ref().is_some_and(|re| re.is_match(key))
        && !key.to_ascii_lowercase().starts_with("xml")
}

/// Requested formats plus how to emit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportSpec {
    pub formats: Formats,
    pub build_all: bool,
    pub persist: bool,
}

impl ExportSpec {
    #[must_use]
    pub const fn new(formats: Formats, build_all: bool, persist: bool) -> Self {
        Self {
            formats,
            build_all,
            persist,
        }
    }

    /// Rejects more than one format unless every format is built.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::CombinedFormats` naming the first two flags.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.build_all {
            return Ok(());
        }
        let mut selected = Format::VALIDATION_ORDER
            .into_iter()
            .filter(|format| self.formats.contains(format.flag()));
        match (selected.next(), selected.next()) {
            (Some(first), Some(second)) => Err(ValidationError::CombinedFormats {
                first: first.name(),
                second: second.name(),
            }),
            (Some(only), None) => {
                debug!(format = only.name(), "exporting environment");
                Ok(())
            }
            _ => {
                debug!("not exporting the environment to a new format");
                Ok(())
            }
        }
    }

    /// Formats to emit, in build order.
    #[must_use]
    pub fn requested(&self) -> Vec<Format> {
        Format::ALL
            .into_iter()
            .filter(|format| self.build_all || self.formats.contains(format.flag()))
            .collect()
    }

    /// Renders every requested format and persists or prints it.
    ///
    /// Each write consults `guard` first, so a protected file aborts the
    /// export before its first byte is written.
    ///
    /// # Errors
    ///
    /// Returns the guard refusal, a write failure or an output failure.
    pub fn emit<W: Write>(
        &self,
        store: &RecordStore,
        base: &Path,
        guard: &ProductionGuard,
        out: &mut W,
    ) -> EnvResult<Vec<Format>> {
        let formats = self.requested();
        for format in &formats {
            let document = format.render(store)?;
            if self.persist {
                let target = format.target(base);
                guard.check(&target)?;
                std::fs::write(&target, document.as_bytes())
                    .map_err(|err| EnvError::io(&target, err))?;
                debug!(path = %target.display(), "wrote file");
            } else {
                print_document(out, &document)?;
            }
        }
        Ok(formats)
    }
}

/// Writes `document` to `out`, ending it with a newline.
///
/// # Errors
///
/// Returns `EnvError::Io` if the output stream fails.
pub fn print_document<W: Write>(out: &mut W, document: &str) -> EnvResult<()> {
    out.write_all(document.as_bytes())
        .map_err(EnvError::output)?;
    if !document.ends_with('\n') {
        out.write_all(b"\n").map_err(EnvError::output)?;
    }
    Ok(())
}
