// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Typed environment-variable accessors.
//!
//! ```text
//! Accessor<S: EnvSource> + Syntax
//!   existence   exists, must_exist
//!   truthy      boolean, is_true, is_false, are_true, are_false
//!   scalars     string, int, int64, float32, float64
//!   time        duration, unit_duration
//!   composite   list, map
//!   predicates  list_contains, list_length, list_is_length, map_has_key(s),
//!               *_in_range, *_less_than, *_greater_than
//!   writes      set, unset, was_set, was_unset       (S: EnvSink)
//!
//! EnvSource: ProcessEnv | ProcessEnvWriter | BTreeMap<String, String>
//! EnvSink:   ProcessEnvWriter | BTreeMap<String, String>
//! ```
//!
//! Every reader takes a fallback. A variable that is set but cannot be parsed
//! yields the fallback and a `warn!` event.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::types::Syntax;
use crate::error::AccessError;

/// Source of environment variables.
pub trait EnvSource {
    /// Returns the value of `name`, or `None` when unset.
    fn lookup(&self, name: &str) -> Option<String>;
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// A source that also accepts writes.
pub trait EnvSink: EnvSource {
    /// Sets `name` to `value`.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::InvalidName` for names the platform rejects.
    fn assign(&mut self, name: &str, value: &str) -> Result<(), AccessError>;

    /// Removes `name`. Removing an unset variable succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::InvalidName` for names the platform rejects.
    fn remove(&mut self, name: &str) -> Result<(), AccessError>;
}

impl EnvSink for BTreeMap<String, String> {
    fn assign(&mut self, name: &str, value: &str) -> Result<(), AccessError> {
        check_name(name)?;
        self.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<(), AccessError> {
        check_name(name)?;
        BTreeMap::remove(self, name);
        Ok(())
    }
}

/// Read-write access to the process environment.
///
/// Mutating the environment races with any other thread reading or writing
/// it, so construction is `unsafe`.
#[derive(Debug)]
pub struct ProcessEnvWriter {
    _private: (),
}

impl ProcessEnvWriter {
    /// # Safety
    ///
    /// No other thread may read or write the process environment while the
    /// returned writer is alive.
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl EnvSource for ProcessEnvWriter {
    fn lookup(&self, name: &str) -> Option<String> {
        ProcessEnv.lookup(name)
    }
}

impl EnvSink for ProcessEnvWriter {
    fn assign(&mut self, name: &str, value: &str) -> Result<(), AccessError> {
        check_name(name)?;
        if value.contains('\0') {
            return Err(AccessError::InvalidValue {
                var: name.to_string(),
            });
        }
        // SAFETY: `ProcessEnvWriter::new` requires exclusive access to the environment.
        unsafe { std::env::set_var(name, value) };
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<(), AccessError> {
        check_name(name)?;
        // SAFETY: `ProcessEnvWriter::new` requires exclusive access to the environment.
        unsafe { std::env::remove_var(name) };
        Ok(())
    }
}

/// Rejects names `std::env::set_var` would panic on.
fn check_name(name: &str) -> Result<(), AccessError> {
    if name.is_empty() || name.contains(['=', '\0']) {
        return Err(AccessError::InvalidName {
            var: name.to_string(),
        });
    }
    Ok(())
}

impl<S: EnvSource + ?Sized> EnvSource for &S {
    fn lookup(&self, name: &str) -> Option<String> {
        (**self).lookup(name)
    }
}

/// Typed reader over an [`EnvSource`].
#[derive(Debug, Clone)]
pub struct Accessor<S> {
    source: S,
    syntax: Syntax,
}

impl Accessor<ProcessEnv> {
    /// Reads from the process environment.
    #[must_use]
    pub const fn process(syntax: Syntax) -> Self {
        Self::new(ProcessEnv, syntax)
    }
}

impl<S: EnvSource> Accessor<S> {
    #[must_use]
    pub const fn new(source: S, syntax: Syntax) -> Self {
        Self { source, syntax }
    }

    #[must_use]
    pub const fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    // --- Existence ---

    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.source.lookup(name).is_some()
    }

    /// Fails when `name` is unset.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Missing` naming the variable.
    pub fn must_exist(&self, name: &str) -> Result<(), AccessError> {
        if self.exists(name) {
            Ok(())
        } else {
            Err(AccessError::Missing {
                var: name.to_string(),
            })
        }
    }

    // --- Scalars ---

    #[must_use]
    pub fn string(&self, name: &str, fallback: &str) -> String {
        self.source
            .lookup(name)
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Returns the value of `name`, treating an empty value as unset.
    #[must_use]
    pub fn optional_string(&self, name: &str) -> Option<String> {
        self.source.lookup(name).filter(|value| !value.is_empty())
    }

    /// Accepts `1`, `t`, `true` and `0`, `f`, `false` in any case.
    #[must_use]
    pub fn boolean(&self, name: &str, fallback: bool) -> bool {
        self.parsed(name, fallback, parse_bool)
    }

    /// True only when `name` is explicitly true.
    #[must_use]
    pub fn is_true(&self, name: &str) -> bool {
        self.boolean(name, false)
    }

    /// True when `name` is false or unset.
    #[must_use]
    pub fn is_false(&self, name: &str) -> bool {
        !self.boolean(name, false)
    }

    #[must_use]
    pub fn are_true(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.is_true(name))
    }

    #[must_use]
    pub fn are_false(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.is_false(name))
    }

    #[must_use]
    pub fn int(&self, name: &str, fallback: i32) -> i32 {
        self.parsed(name, fallback, |v| v.parse::<i32>())
    }

    /// Parses with the configured radix.
    #[must_use]
    pub fn int64(&self, name: &str, fallback: i64) -> i64 {
        let radix = self.syntax.int_radix;
        self.parsed(name, fallback, |v| i64::from_str_radix(v, radix))
    }

    #[must_use]
    pub fn float32(&self, name: &str, fallback: f32) -> f32 {
        self.parsed(name, fallback, |v| v.parse::<f32>())
    }

    #[must_use]
    pub fn float64(&self, name: &str, fallback: f64) -> f64 {
        self.parsed(name, fallback, |v| v.parse::<f64>())
    }

    // --- Time ---

    /// Parses `300ms`, `1h 30m` style strings, or an integer count of
    /// nanoseconds.
    #[must_use]
    pub fn duration(&self, name: &str, fallback: Duration) -> Duration {
        self.parsed(name, fallback, |v| {
            humantime::parse_duration(v).or_else(|err| {
                v.parse::<u64>()
                    .map(Duration::from_nanos)
                    .map_err(|_| err)
            })
        })
    }

    /// Multiplies an integer value (or the fallback) by `unit`. A full
    /// duration string such as `1h30m` is returned as is.
    #[must_use]
    pub fn unit_duration(&self, name: &str, fallback: u32, unit: Duration) -> Duration {
        let Some(raw) = self.source.lookup(name) else {
            return unit.saturating_mul(fallback);
        };
        let raw = raw.trim();
        if let Ok(count) = raw.parse::<u32>() {
            return unit.saturating_mul(count);
        }
        match humantime::parse_duration(raw) {
            Ok(duration) => duration,
            Err(err) => {
                report_invalid(name, raw, &err);
                unit.saturating_mul(fallback)
            }
        }
    }

    // --- Composite ---

    /// Splits on the list separator, trimming items and dropping empties.
    #[must_use]
    pub fn list(&self, name: &str, fallback: &[&str]) -> Vec<String> {
        self.source.lookup(name).map_or_else(
            || fallback.iter().map(ToString::to_string).collect(),
            |raw| {
                raw.split(self.syntax.list_separator.as_str())
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(ToString::to_string)
                    .collect()
            },
        )
    }

    /// Splits on the map separator, then each part on the item separator.
    /// Parts without a key are dropped.
    #[must_use]
    pub fn map(&self, name: &str, fallback: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let Some(raw) = self.source.lookup(name) else {
            return fallback.clone();
        };
        let parsed: BTreeMap<String, String> = raw
            .split(self.syntax.map_separator.as_str())
            .filter_map(|part| self.syntax.split_pair(part.trim()))
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        if parsed.is_empty() {
            debug!(var = name, "map value holds no key/value pairs");
        }
        parsed
    }

    // --- Predicates ---

    /// Case-insensitive membership test.
    #[must_use]
    pub fn list_contains(&self, name: &str, fallback: &[&str], needle: &str) -> bool {
        self.list(name, fallback)
            .iter()
            .any(|item| item.to_lowercase() == needle.to_lowercase())
    }

    /// Number of items after splitting and dropping empties.
    #[must_use]
    pub fn list_length(&self, name: &str, fallback: &[&str]) -> usize {
        self.list(name, fallback).len()
    }

    #[must_use]
    pub fn list_is_length(&self, name: &str, fallback: &[&str], len: usize) -> bool {
        self.list(name, fallback).len() == len
    }

    #[must_use]
    pub fn map_has_key(&self, name: &str, fallback: &BTreeMap<String, String>, key: &str) -> bool {
        self.map(name, fallback).contains_key(key)
    }

    #[must_use]
    pub fn map_has_keys(
        &self,
        name: &str,
        fallback: &BTreeMap<String, String>,
        keys: &[&str],
    ) -> bool {
        let map = self.map(name, fallback);
        keys.iter().all(|key| map.contains_key(*key))
    }

    /// Inclusive range check.
    #[must_use]
    pub fn int_in_range(&self, name: &str, fallback: i32, min: i32, max: i32) -> bool {
        (min..=max).contains(&self.int(name, fallback))
    }

    #[must_use]
    pub fn int_less_than(&self, name: &str, fallback: i32, bound: i32) -> bool {
        self.int(name, fallback) < bound
    }

    #[must_use]
    pub fn int_greater_than(&self, name: &str, fallback: i32, bound: i32) -> bool {
        self.int(name, fallback) > bound
    }

    /// Inclusive range check.
    #[must_use]
    pub fn int64_in_range(&self, name: &str, fallback: i64, min: i64, max: i64) -> bool {
        (min..=max).contains(&self.int64(name, fallback))
    }

    #[must_use]
    pub fn int64_less_than(&self, name: &str, fallback: i64, bound: i64) -> bool {
        self.int64(name, fallback) < bound
    }

    #[must_use]
    pub fn int64_greater_than(&self, name: &str, fallback: i64, bound: i64) -> bool {
        self.int64(name, fallback) > bound
    }

    fn parsed<T, E, F>(&self, name: &str, fallback: T, parse: F) -> T
    where
        E: Display,
        F: FnOnce(&str) -> Result<T, E>,
    {
        let Some(raw) = self.source.lookup(name) else {
            return fallback;
        };
        parse(raw.trim()).unwrap_or_else(|err| {
            report_invalid(name, &raw, &err);
            fallback
        })
    }
}

impl<S: EnvSink> Accessor<S> {
    /// Sets `name` to `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the name or value.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), AccessError> {
        self.source.assign(name, value).inspect_err(|err| report_write(name, err))?;
        debug!(var = name, "set environment variable");
        Ok(())
    }

    /// Removes `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the name.
    pub fn unset(&mut self, name: &str) -> Result<(), AccessError> {
        self.source.remove(name).inspect_err(|err| report_write(name, err))?;
        debug!(var = name, "unset environment variable");
        Ok(())
    }

    /// Sets `name` and reads it back. False if either step fails.
    pub fn was_set(&mut self, name: &str, value: &str) -> bool {
        if self.set(name, value).is_err() {
            return false;
        }
        if self.source.lookup(name).as_deref() == Some(value) {
            return true;
        }
        report_write(
            name,
            &AccessError::Verification {
                var: name.to_string(),
            },
        );
        false
    }

    /// Removes `name` and checks it is gone. False if either step fails.
    pub fn was_unset(&mut self, name: &str) -> bool {
        if self.unset(name).is_err() {
            return false;
        }
        if self.source.lookup(name).is_none() {
            return true;
        }
        report_write(
            name,
            &AccessError::Verification {
                var: name.to_string(),
            },
        );
        false
    }
}

fn report_write(name: &str, err: &AccessError) {
    warn!(var = name, error = %err, "environment write failed");
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => Err(format!("expected a boolean, got '{value}'")),
    }
}

fn report_invalid(name: &str, raw: &str, err: &dyn Display) {
    warn!(var = name, value = raw, error = %err, "invalid environment value, using fallback");
}
