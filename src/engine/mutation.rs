// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Add and remove mutations.
//!
//! Removal happens while the file is scanned, so dropped lines never reach the
//! store. Adding happens once the scan completes and never overwrites.

use crate::dotenv::{RecordStore, fold_eq};

/// The single structural change an invocation may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOp {
    Add,
    Remove,
}

/// Removal predicates applied per line during the scan.
///
/// An empty target never matches, so `--rm --env KEY` without `--value`
/// removes by key only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    key: String,
    value: String,
}

impl Removal {
    #[must_use]
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.trim().to_string(),
            value: value.trim().to_string(),
        }
    }

    #[must_use]
    pub fn drops_key(&self, key: &str) -> bool {
        !self.key.is_empty() && fold_eq(key, &self.key)
    }

    #[must_use]
    pub fn drops_value(&self, value: &str) -> bool {
        !self.value.is_empty() && fold_eq(value, &self.value)
    }
}

/// Inserts the trimmed pair when the key is absent (exact case).
/// Returns whether the store changed.
pub fn add(store: &mut RecordStore, key: &str, value: &str) -> bool {
    let key = key.trim();
    if key.is_empty() {
        return false;
    }
    store.insert_if_absent(key, value.trim())
}
