// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Line-oriented dotenv parser.
//!
//! There is no comment syntax: short lines and lines that do not split into
//! exactly two non-empty pieces are dropped without a diagnostic.

use std::convert::Infallible;

use tracing::trace;

use super::RecordStore;
use crate::config::types::Syntax;

/// Lines shorter than this (in characters, after trimming) are ignored.
pub const MIN_LINE_LEN: usize = 3;

/// What to do with a parsed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition<H> {
    /// Store the entry.
    Keep,
    /// Skip the entry.
    Drop,
    /// Stop scanning immediately with a decision.
    Halt(H),
}

/// Consulted for every valid entry during a scan.
pub trait ScanObserver {
    /// Decision type carried out of a halted scan.
    type Halt;

    fn inspect(&mut self, key: &str, value: &str) -> Disposition<Self::Halt>;
}

/// Observer that keeps every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAll;

impl ScanObserver for KeepAll {
    type Halt = Infallible;

    fn inspect(&mut self, _key: &str, _value: &str) -> Disposition<Infallible> {
        Disposition::Keep
    }
}

/// Result of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome<H> {
    /// The observer decided before the end of the input.
    Halted(H),
    /// Every line was visited.
    Complete(RecordStore),
}

/// Extracts the `(key, value)` pair of one physical line, if it is valid.
#[must_use]
pub fn parse_line<'a>(line: &'a str, syntax: &Syntax) -> Option<(&'a str, &'a str)> {
    let line = line.trim();
    if line.chars().count() < MIN_LINE_LEN {
        return None;
    }
    let (key, value) = syntax.split_pair(line)?;
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Scans `text` forward, one line at a time, building a [`RecordStore`].
///
/// The observer sees entries in file order and may halt the scan before the
/// store is complete. Later duplicates overwrite earlier values.
pub fn scan<O: ScanObserver>(text: &str, syntax: &Syntax, observer: &mut O) -> ScanOutcome<O::Halt> {
    let mut store = RecordStore::new();
    for (number, line) in text.split('\n').enumerate() {
        let Some((key, value)) = parse_line(line, syntax) else {
            trace!(line = number + 1, "skipping line");
            continue;
        };
        match observer.inspect(key, value) {
            Disposition::Keep => store.insert(key, value),
            Disposition::Drop => trace!(line = number + 1, key, "dropping entry"),
            Disposition::Halt(decision) => return ScanOutcome::Halted(decision),
        }
    }
    ScanOutcome::Complete(store)
}
