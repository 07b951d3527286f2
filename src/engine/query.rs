// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Existence (`has`) and value (`is`) queries.
//!
//! ```text
//! found  negate  exit  answer
//!   1      0      0    YES
//!   1      1      1    NO
//!   0      0      1    NO
//!   0      1      0    YES
//! ```

use crate::dotenv::{RecordStore, fold_eq};

/// Which side of an entry a query matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Key equality, case-insensitive.
    Has,
    /// Value equality, case-insensitive.
    Is,
}

impl QueryMode {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Has => "has",
            Self::Is => "is",
        }
    }
}

/// A query against the entries of an env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    mode: QueryMode,
    target: String,
    negate: bool,
}

impl Query {
    /// `has` queries match `key`, `is` queries match `value`.
    #[must_use]
    pub fn new(mode: QueryMode, key: &str, value: &str, negate: bool) -> Self {
        let target = match mode {
            QueryMode::Has => key,
            QueryMode::Is => value,
        };
        Self {
            mode,
            target: target.trim().to_string(),
            negate,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> QueryMode {
        self.mode
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether the entry decides the query.
    #[must_use]
    pub fn matches(&self, key: &str, value: &str) -> bool {
        match self.mode {
            QueryMode::Has => fold_eq(key, &self.target),
            QueryMode::Is => fold_eq(value, &self.target),
        }
    }

    #[must_use]
    pub const fn verdict(&self, found: bool) -> Verdict {
        Verdict {
            found,
            negate: self.negate,
        }
    }

    /// Re-scans a finished store.
    #[must_use]
    pub fn evaluate(&self, store: &RecordStore) -> Verdict {
        self.verdict(store.iter().any(|(key, value)| self.matches(key, value)))
    }
}

/// Outcome of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    found: bool,
    negate: bool,
}

impl Verdict {
    #[must_use]
    pub const fn found(self) -> bool {
        self.found
    }

    /// True when the reported answer is positive.
    #[must_use]
    pub const fn holds(self) -> bool {
        self.found ^ self.negate
    }

    #[must_use]
    pub const fn exit_code(self) -> u8 {
        if self.holds() { 0 } else { 1 }
    }

    #[must_use]
    pub const fn answer(self) -> &'static str {
        if self.holds() { "YES" } else { "NO" }
    }
}
