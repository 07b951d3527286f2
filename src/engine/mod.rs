// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The env-file state engine.
//!
//! ```text
//! resolve path -> snapshot -> production detection
//!      |
//!      +-- clean_all ----------------------------------> Cleaned
//!      |
//! validate formats -> load / init / bootstrap write ---> Initialized
//!      |
//! scan (query + removal inline) -------- halted -------> Answered
//!      |
//! add -> post-add query / not found -------------------> Answered
//!      |
//! export formats -------------- single format ---------> Exported
//!      |
//! primary rewrite (guarded) / print -------------------> Saved | Printed | Unchanged
//! ```
//!
//! The engine never exits the process. `main` maps the returned [`Outcome`]
//! or [`EnvError`] to an exit code.

pub mod file;
pub mod guard;
pub mod mutation;
pub mod query;

#[cfg(test)]
mod tests;

use std::io::Write;
use std::path::{Path, PathBuf};

use bon::Builder;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::dotenv::RecordStore;
use crate::dotenv::parser::{Disposition, ScanObserver, ScanOutcome, scan};
use crate::error::{EnvError, EnvResult};
use crate::export::clean::{CleanReport, clean_all};
use crate::export::{ExportSpec, Format, Formats, print_document};

use file::{FileDescriptor, discover};
use guard::{PRODUCTION_MARKER, ProductionGuard};
use mutation::{MutationOp, Removal};
use query::{Query, QueryMode, Verdict};

/// Default file created by `--write`/`--init` when nothing was discovered.
pub const DEFAULT_FILE: &str = ".env";

/// Resolved options of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct RunOptions {
    /// Env file; discovered when absent.
    #[builder(into)]
    pub path: Option<PathBuf>,
    /// Target key of queries and mutations.
    #[builder(into, default)]
    pub key: String,
    /// Target value of queries and mutations.
    #[builder(into, default)]
    pub value: String,
    pub query: Option<QueryMode>,
    #[builder(default)]
    pub negate: bool,
    pub mutation: Option<MutationOp>,
    #[builder(default)]
    pub print: bool,
    #[builder(default)]
    pub write: bool,
    #[builder(default)]
    pub init: bool,
    #[builder(default)]
    pub prod: bool,
    #[builder(default)]
    pub mk_all: bool,
    #[builder(default)]
    pub clean_all: bool,
    #[builder(default)]
    pub formats: Formats,
}

impl RunOptions {
    const fn removes(&self) -> bool {
        matches!(self.mutation, Some(MutationOp::Remove))
    }

    const fn adds(&self) -> bool {
        matches!(self.mutation, Some(MutationOp::Add))
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A `has`/`is` query decided the run.
    Answered(Verdict),
    /// A missing file was created empty.
    Initialized(PathBuf),
    /// Sibling exports were cleaned.
    Cleaned(CleanReport),
    /// A single format was emitted.
    Exported(Vec<Format>),
    /// The primary file was rewritten.
    Saved(PathBuf),
    /// Plain output went to stdout.
    Printed,
    /// Nothing was written or printed.
    Unchanged,
}

impl Outcome {
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Answered(verdict) => verdict.exit_code(),
            _ => 0,
        }
    }
}

/// Applies the query and removal predicates to each line as it is scanned.
struct InlineEvaluator<'a> {
    query: Option<&'a Query>,
    removal: Option<&'a Removal>,
}

impl InlineEvaluator<'_> {
    fn decides(&self, mode: QueryMode, key: &str, value: &str) -> Option<Verdict> {
        self.query
            .filter(|query| query.mode() == mode && query.matches(key, value))
            .map(|query| query.verdict(true))
    }
}

impl ScanObserver for InlineEvaluator<'_> {
    type Halt = Verdict;

    fn inspect(&mut self, key: &str, value: &str) -> Disposition<Verdict> {
        if self.removal.is_some_and(|removal| removal.drops_key(key)) {
            return Disposition::Drop;
        }
        if let Some(verdict) = self.decides(QueryMode::Has, key, value) {
            return Disposition::Halt(verdict);
        }
        if self.removal.is_some_and(|removal| removal.drops_value(value)) {
            return Disposition::Drop;
        }
        if let Some(verdict) = self.decides(QueryMode::Is, key, value) {
            return Disposition::Halt(verdict);
        }
        Disposition::Keep
    }
}

enum Loaded {
    Text(String),
    Initialized,
}

/// Runs invocations against the filesystem with fixed settings.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    settings: Settings,
    workdir: Option<PathBuf>,
}

impl Engine {
    #[must_use]
    pub const fn new(settings: Settings) -> Self {
        Self {
            settings,
            workdir: None,
        }
    }

    /// Resolves relative paths and discovery against `dir` instead of the
    /// process working directory.
    #[must_use]
    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Executes one invocation, writing any user-facing output to `out`.
    ///
    /// # Errors
    ///
    /// Returns an [`EnvError`] for I/O failures, invalid flag combinations
    /// and refused production writes.
    pub fn run<W: Write>(&self, options: &RunOptions, out: &mut W) -> EnvResult<Outcome> {
        let path = self.resolve_path(options)?;
        let descriptor = FileDescriptor::snapshot(&path)?;
        if !descriptor.exists && !(options.init || options.write) {
            return Err(EnvError::NotFound { path });
        }
        if descriptor.is_dir {
            return Err(EnvError::NotAFile { path });
        }
        if descriptor.exists && descriptor.readonly && options.write {
            warn!(path = %path.display(), "env file is read-only");
        }

        let guard = ProductionGuard::detect(&path, options.prod, &self.settings.guard);
        if guard.is_production() {
            warn!(path = %path.display(), "using production environment file");
        } else {
            debug!(
                path = %path.display(),
                size = descriptor.size,
                modified = ?descriptor.modified,
                "using environment file"
            );
        }

        if options.clean_all {
            let never_delete = self
                .settings
                .guard
                .never_delete
                .unwrap_or(!(options.write || options.removes()));
            let report = clean_all(&path, never_delete, out)?;
            debug!(
                removed = report.removed.len(),
                retained = report.retained.len(),
                skipped = report.skipped.len(),
                "clean finished"
            );
            return Ok(Outcome::Cleaned(report));
        }

        let export = ExportSpec::new(options.formats, options.mk_all, options.write);
        export.validate()?;

        let text = match self.load(&path, &descriptor, options, &guard)? {
            Loaded::Text(text) => text,
            Loaded::Initialized => return Ok(Outcome::Initialized(path)),
        };
        if text.is_empty() && !(options.init || options.write || options.adds()) {
            return Err(EnvError::Empty { path, size: 0 });
        }

        let query = options
            .query
            .map(|mode| Query::new(mode, &options.key, &options.value, options.negate));
        let removal = options
            .removes()
            .then(|| Removal::new(&options.key, &options.value));
        let mut evaluator = InlineEvaluator {
            query: query.as_ref(),
            removal: removal.as_ref(),
        };

        let mut store = match scan(&text, &self.settings.syntax, &mut evaluator) {
            ScanOutcome::Halted(verdict) => return answer(verdict, options.print, out),
            ScanOutcome::Complete(store) => store,
        };
        debug!(entries = store.len(), "parsed environment file");

        let added = options.adds() && mutation::add(&mut store, &options.key, &options.value);
        if added {
            debug!(key = options.key.trim(), "added entry");
        }

        if let Some(query) = &query {
            if added {
                let verdict = query.evaluate(&store);
                if !options.print {
                    return Ok(Outcome::Answered(verdict));
                }
                write_answer(verdict, out)?;
            } else if !options.adds() {
                return answer(query.verdict(false), options.print, out);
            }
        }

        let separator = self.settings.syntax.item_separator.as_str();
        finish(&store, separator, &path, &export, &guard, options, out)
    }

    fn locate(&self, path: impl AsRef<Path>) -> PathBuf {
        match &self.workdir {
            Some(dir) => dir.join(path),
            None => path.as_ref().to_path_buf(),
        }
    }

    fn resolve_path(&self, options: &RunOptions) -> EnvResult<PathBuf> {
        if let Some(path) = options.path.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            return Ok(self.locate(path));
        }
        let dir = self.workdir.clone().unwrap_or_default();
        if let Some(found) = discover(&dir) {
            debug!(path = %found.display(), "discovered environment file");
            return Ok(found);
        }
        if options.write || options.init {
            let name = if options.prod { PRODUCTION_MARKER } else { DEFAULT_FILE };
            return Ok(self.locate(name));
        }
        Err(EnvError::NoEnvFile)
    }

    fn load(
        &self,
        path: &Path,
        descriptor: &FileDescriptor,
        options: &RunOptions,
        guard: &ProductionGuard,
    ) -> EnvResult<Loaded> {
        if !descriptor.exists {
            guard.check(path)?;
            if options.init {
                std::fs::write(path, b"").map_err(|err| EnvError::io(path, err))?;
                info!(path = %path.display(), "created empty environment file");
                return Ok(Loaded::Initialized);
            }
            let separator = &self.settings.syntax.item_separator;
            let line = format!("{}{separator}{}\n", options.key, options.value);
            std::fs::write(path, line.as_bytes()).map_err(|err| EnvError::io(path, err))?;
            info!(path = %path.display(), "created environment file");
        }
        let bytes = std::fs::read(path).map_err(|err| EnvError::io(path, err))?;
        Ok(Loaded::Text(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

/// Emits the requested formats, then rewrites or prints `key<SEP>value` lines.
fn finish<W: Write>(
    store: &RecordStore,
    separator: &str,
    path: &Path,
    export: &ExportSpec,
    guard: &ProductionGuard,
    options: &RunOptions,
    out: &mut W,
) -> EnvResult<Outcome> {
    if !export.requested().is_empty() {
        let formats = export.emit(store, path, guard, out)?;
        if !options.mk_all {
            return Ok(Outcome::Exported(formats));
        }
    }

    let plain = store.to_plain(separator);
    if options.write {
        guard.check(path)?;
        std::fs::write(path, plain.as_bytes()).map_err(|err| EnvError::io(path, err))?;
        debug!(path = %path.display(), entries = store.len(), "saved environment file");
        return Ok(Outcome::Saved(path.to_path_buf()));
    }
    if options.print {
        print_document(out, &plain)?;
        return Ok(Outcome::Printed);
    }
    debug!("finished without output");
    Ok(Outcome::Unchanged)
}

fn write_answer<W: Write>(verdict: Verdict, out: &mut W) -> EnvResult<()> {
    writeln!(out, "{}", verdict.answer()).map_err(EnvError::output)
}

fn answer<W: Write>(verdict: Verdict, print: bool, out: &mut W) -> EnvResult<Outcome> {
    debug!(found = verdict.found(), code = verdict.exit_code(), "query decided");
    if print {
        write_answer(verdict, out)?;
    }
    Ok(Outcome::Answered(verdict))
}
