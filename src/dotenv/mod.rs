// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Record store and dotenv parser.
//!
//! ```text
//! bytes --> parser::scan(text, &Syntax, &mut impl ScanObserver)
//!             per line: trim, len >= 3, split_pair, non-empty pieces
//!             observer: Keep | Drop | Halt(H)
//!                |
//!                v
//!   ScanOutcome::Complete(RecordStore) | ScanOutcome::Halted(H)
//! ```
//!
//! `RecordStore` keeps insertion order. Keys are stored with their exact case;
//! re-inserting a key replaces its value in place.

pub mod parser;


use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::types::Syntax;

/// Ordered mapping from variable name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `text` keeping every valid line.
    #[must_use]
    pub fn parse(text: &str, syntax: &Syntax) -> Self {
        match parser::scan(text, syntax, &mut parser::KeepAll) {
            parser::ScanOutcome::Complete(store) => store,
            parser::ScanOutcome::Halted(never) => match never {},
        }
    }

    /// Inserts or replaces `key`. A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(&slot) = self.index.get(&key) {
            self.entries[slot].1 = value;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, value));
        }
    }

    /// Inserts `key` only when it is absent. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.index.contains_key(&key) {
            return false;
        }
        self.insert(key, value);
        true
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1.as_str())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Renders `key<SEP>value` lines, one per entry.
    #[must_use]
    pub fn to_plain(&self, separator: &str) -> String {
        self.iter()
            .map(|(key, value)| format!("{key}{separator}{value}\n"))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RecordStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (key, value) in iter {
            store.insert(key, value);
        }
        store
    }
}

impl Serialize for RecordStore {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Unicode-aware case-insensitive equality.
#[must_use]
pub fn fold_eq(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}
