// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use super::mutation::{self, MutationOp, Removal};
use super::query::{Query, QueryMode};
use super::{Engine, Outcome, RunOptions};
use crate::config::Settings;
use crate::config::types::{GuardSettings, Syntax};
use crate::dotenv::RecordStore;
use crate::error::{EnvError, ValidationError};
use crate::export::{Format, Formats};

struct Fixture {
    dir: TempDir,
    engine: Engine,
}

impl Fixture {
    fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    fn with_settings(settings: Settings) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let engine = Engine::new(settings).with_workdir(dir.path());
        Self { dir, engine }
    }

    fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, options: &RunOptions) -> (Result<Outcome, EnvError>, String) {
        let mut out = Vec::new();
        let result = self.engine.run(options, &mut out);
        (result, String::from_utf8(out).unwrap())
    }
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn checksum(path: &Path) -> Vec<u8> {
    std::fs::read(path).unwrap()
}

#[test]
fn test_query_and_removal_helpers() {
    let store: RecordStore = [("FOO", "bar")].into_iter().collect();
    let has = Query::new(QueryMode::Has, "foo", "", false);
    assert!(has.evaluate(&store).holds());
    let is = Query::new(QueryMode::Is, "", "BAZ", true);
    assert_eq!(is.evaluate(&store).exit_code(), 0);

    let removal = Removal::new("", "");
    assert!(!removal.drops_key("FOO"));
    assert!(!removal.drops_value("bar"));
}

#[test]
fn test_add_never_overwrites() {
    let mut store: RecordStore = [("FOO", "bar")].into_iter().collect();
    assert!(!mutation::add(&mut store, "FOO", "other"));
    assert!(mutation::add(&mut store, " NEW ", " v "));
    assert_eq!(store.get("FOO"), Some("bar"));
    assert_eq!(store.get("NEW"), Some("v"));
    assert!(!mutation::add(&mut store, "  ", "v"));
}

#[test]
fn test_has_query_exit_codes() {
    let fx = Fixture::new();
    let path = fx.file(".env", "FOO=bar\n");

    for (negate, code, answer) in [(false, 0, "YES\n"), (true, 1, "NO\n")] {
        let options = RunOptions::builder()
            .path(&path)
            .key("FOO")
            .query(QueryMode::Has)
            .negate(negate)
            .print(true)
            .build();
        let (outcome, out) = fx.run(&options);
        assert_eq!(outcome.unwrap().exit_code(), code);
        assert_eq!(out, answer);
    }
}

#[test]
fn test_has_query_is_case_insensitive_and_silent_without_print() {
    let fx = Fixture::new();
    let path = fx.file(".env", "FOO=bar\n");
    let options = RunOptions::builder()
        .path(&path)
        .key("foo")
        .query(QueryMode::Has)
        .build();
    let (outcome, out) = fx.run(&options);
    assert_eq!(outcome.unwrap().exit_code(), 0);
    assert!(out.is_empty());
}

#[test]
fn test_is_query_exit_codes() {
    let fx = Fixture::new();
    let path = fx.file(".env", "FOO=bar\n");

    let hit = RunOptions::builder()
        .path(&path)
        .value("bar")
        .query(QueryMode::Is)
        .build();
    assert_eq!(fx.run(&hit).0.unwrap().exit_code(), 0);

    let miss = RunOptions::builder()
        .path(&path)
        .value("baz")
        .query(QueryMode::Is)
        .build();
    assert_eq!(fx.run(&miss).0.unwrap().exit_code(), 1);

    let negated_miss = RunOptions::builder()
        .path(&path)
        .value("baz")
        .query(QueryMode::Is)
        .negate(true)
        .print(true)
        .build();
    let (outcome, out) = fx.run(&negated_miss);
    assert_eq!(outcome.unwrap().exit_code(), 0);
    assert_eq!(out, "YES\n");
}

#[test]
fn test_remove_by_value_drops_every_match() {
    let fx = Fixture::new();
    let path = fx.file(".env", "A=1\nB=2\nC=1\n");
    let options = RunOptions::builder()
        .path(&path)
        .value("1")
        .mutation(MutationOp::Remove)
        .write(true)
        .build();

    let (outcome, _) = fx.run(&options);

    assert_eq!(outcome.unwrap(), Outcome::Saved(path.clone()));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "B=2\n");
}

#[test]
fn test_remove_by_key_and_value_in_one_pass() {
    let fx = Fixture::new();
    let path = fx.file(".env", "A=1\nB=2\nC=3\n");
    let options = RunOptions::builder()
        .path(&path)
        .key("a")
        .value("3")
        .mutation(MutationOp::Remove)
        .print(true)
        .build();

    let (outcome, out) = fx.run(&options);

    assert_eq!(outcome.unwrap(), Outcome::Printed);
    assert_eq!(out, "B=2\n");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "A=1\nB=2\nC=3\n");
}

#[test]
fn test_add_is_idempotent() {
    let fx = Fixture::new();
    let path = fx.file(".env", "FOO=bar\n");
    let options = RunOptions::builder()
        .path(&path)
        .key("FOO")
        .value("changed")
        .mutation(MutationOp::Add)
        .write(true)
        .build();

    fx.run(&options).0.unwrap();
    fx.run(&options).0.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "FOO=bar\n");
}

#[test]
fn test_add_appends_new_key() {
    let fx = Fixture::new();
    let path = fx.file(".env", "FOO=bar\n");
    let options = RunOptions::builder()
        .path(&path)
        .key("NEW")
        .value("1")
        .mutation(MutationOp::Add)
        .write(true)
        .build();

    fx.run(&options).0.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "FOO=bar\nNEW=1\n");
}

#[test]
fn test_post_add_query_without_print_ends_the_run() {
    let fx = Fixture::new();
    let path = fx.file(".env", "FOO=bar\n");
    let options = RunOptions::builder()
        .path(&path)
        .key("NEW")
        .value("1")
        .mutation(MutationOp::Add)
        .query(QueryMode::Has)
        .write(true)
        .build();

    let (outcome, out) = fx.run(&options);

    assert!(matches!(outcome.unwrap(), Outcome::Answered(v) if v.exit_code() == 0));
    assert!(out.is_empty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "FOO=bar\n");
}

#[test]
fn test_post_add_query_with_print_continues() {
    let fx = Fixture::new();
    let path = fx.file(".env", "FOO=bar\n");
    let options = RunOptions::builder()
        .path(&path)
        .key("NEW")
        .value("1")
        .mutation(MutationOp::Add)
        .query(QueryMode::Is)
        .print(true)
        .build();

    let (outcome, out) = fx.run(&options);

    assert_eq!(outcome.unwrap(), Outcome::Printed);
    assert_eq!(out, "YES\nFOO=bar\nNEW=1\n");
}

#[test]
fn test_not_found_query_with_pending_add_falls_through() {
    let fx = Fixture::new();
    let path = fx.file(".env", "FOO=bar\n");
    let options = RunOptions::builder()
        .path(&path)
        .key("FOO")
        .value("other")
        .mutation(MutationOp::Add)
        .query(QueryMode::Is)
        .print(true)
        .build();

    let (outcome, out) = fx.run(&options);

    assert_eq!(outcome.unwrap(), Outcome::Printed);
    assert_eq!(out, "FOO=bar\n");
}

#[test]
fn test_production_guard_leaves_file_untouched() {
    let fx = Fixture::new();
    let path = fx.file(".env.production", "SECRET=1\n");
    let before = checksum(&path);
    let options = RunOptions::builder()
        .path(&path)
        .key("NEW")
        .value("2")
        .mutation(MutationOp::Add)
        .write(true)
        .build();

    let (outcome, _) = fx.run(&options);

    let err = outcome.unwrap_err();
    assert!(matches!(err, EnvError::ProductionProtected { .. }));
    insta::assert_snapshot!(err.to_string(), @"HALT: PRODUCTION IS PROTECTED! WRITE OPERATION CANCELED.");
    assert_eq!(checksum(&path), before);
}

#[test]
fn test_prod_flag_protects_any_path() {
    let fx = Fixture::new();
    let path = fx.file("staging.env", "A=1\n");
    let before = checksum(&path);
    let options = RunOptions::builder()
        .path(&path)
        .prod(true)
        .write(true)
        .formats(Formats::JSON)
        .build();

    let (outcome, _) = fx.run(&options);

    assert!(matches!(outcome, Err(EnvError::ProductionProtected { .. })));
    assert!(!Format::Json.target(&path).exists());
    assert_eq!(checksum(&path), before);
}

#[test]
fn test_production_guard_can_be_unlocked() {
    let settings = Settings {
        guard: GuardSettings {
            never_write_production: Some(false),
            never_delete: None,
        },
        ..Settings::default()
    };
    let fx = Fixture::with_settings(settings);
    let path = fx.file(".env.production", "A=1\n");
    let options = RunOptions::builder()
        .path(&path)
        .key("B")
        .value("2")
        .mutation(MutationOp::Add)
        .write(true)
        .build();

    fx.run(&options).0.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "A=1\nB=2\n");
}

#[test]
fn test_combined_formats_touch_nothing() {
    let fx = Fixture::new();
    let path = fx.file(".env", "A=1\n");
    let before = checksum(&path);
    let options = RunOptions::builder()
        .path(&path)
        .formats(Formats::JSON | Formats::YAML)
        .write(true)
        .build();

    let (outcome, out) = fx.run(&options);

    assert!(matches!(
        outcome,
        Err(EnvError::Validation(ValidationError::CombinedFormats { .. }))
    ));
    assert!(out.is_empty());
    assert_eq!(checksum(&path), before);
    for format in Format::ALL {
        assert!(!format.target(&path).exists());
    }
}

#[test]
fn test_single_format_skips_primary_rewrite() {
    let fx = Fixture::new();
    let path = fx.file(".env", "B=2\nA=1\n");
    let options = RunOptions::builder()
        .path(&path)
        .key("C")
        .value("3")
        .mutation(MutationOp::Add)
        .formats(Formats::INI)
        .write(true)
        .build();

    let (outcome, _) = fx.run(&options);

    assert_eq!(outcome.unwrap(), Outcome::Exported(vec![Format::Ini]));
    assert_eq!(
        std::fs::read_to_string(Format::Ini.target(&path)).unwrap(),
        "[default]\nB = 2\nA = 1\nC = 3\n"
    );
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "B=2\nA=1\n");
}

#[test]
fn test_mk_all_writes_everything() {
    let fx = Fixture::new();
    let path = fx.file(".env", "A=1\n");
    let options = RunOptions::builder()
        .path(&path)
        .mk_all(true)
        .formats(Formats::JSON | Formats::XML)
        .write(true)
        .build();

    let (outcome, _) = fx.run(&options);

    assert_eq!(outcome.unwrap(), Outcome::Saved(path.clone()));
    for format in Format::ALL {
        assert!(format.target(&path).is_file());
    }
}

#[test]
fn test_mk_all_prints_in_build_order() {
    let fx = Fixture::new();
    let path = fx.file(".env", "A=1\n");
    let options = RunOptions::builder()
        .path(&path)
        .mk_all(true)
        .print(true)
        .build();

    let (outcome, out) = fx.run(&options);

    assert_eq!(outcome.unwrap(), Outcome::Printed);
    let json = out.find("\"A\": \"1\"").unwrap();
    let ini = out.find("[default]").unwrap();
    let yaml = out.find("---").unwrap();
    let xml = out.find("<env>").unwrap();
    assert!(json < ini && ini < yaml && yaml < xml);
    assert!(out.ends_with("A=1\n"));
}

#[test]
fn test_init_creates_empty_file() {
    let fx = Fixture::new();
    let options = RunOptions::builder().init(true).build();

    let (outcome, _) = fx.run(&options);

    let path = fx.path(".env");
    assert_eq!(outcome.unwrap(), Outcome::Initialized(path.clone()));
    assert_eq!(std::fs::read(&path).unwrap(), b"");
}

#[test]
fn test_init_with_prod_is_refused() {
    let fx = Fixture::new();
    let options = RunOptions::builder().init(true).prod(true).build();

    let (outcome, _) = fx.run(&options);

    assert!(matches!(outcome, Err(EnvError::ProductionProtected { .. })));
    assert!(!fx.path(".env.production").exists());
}

#[test]
fn test_write_bootstraps_missing_file() {
    let fx = Fixture::new();
    let path = fx.path("app.env");
    let options = RunOptions::builder()
        .path("app.env")
        .key("FOO")
        .value("bar")
        .write(true)
        .build();

    let (outcome, _) = fx.run(&options);

    assert_eq!(outcome.unwrap(), Outcome::Saved(path.clone()));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "FOO=bar\n");
}

#[test]
fn test_missing_file_without_write_fails() {
    let fx = Fixture::new();
    let options = RunOptions::builder().path("missing.env").print(true).build();
    assert!(matches!(fx.run(&options).0, Err(EnvError::NotFound { .. })));
}

#[test]
fn test_no_discoverable_file() {
    let fx = Fixture::new();
    let (outcome, _) = fx.run(&RunOptions::default());
    assert!(matches!(outcome, Err(EnvError::NoEnvFile)));
}

#[test]
fn test_discovery_prefers_earlier_candidates() {
    let fx = Fixture::new();
    fx.file(".env.development", "DEV=1\n");
    fx.file(".env.local", "LOCAL=1\n");
    let options = RunOptions::builder().print(true).build();

    let (outcome, out) = fx.run(&options);

    assert_eq!(outcome.unwrap(), Outcome::Printed);
    assert_eq!(out, "LOCAL=1\n");
}

#[test]
fn test_directory_is_rejected() {
    let fx = Fixture::new();
    std::fs::create_dir(fx.path("conf")).unwrap();
    let options = RunOptions::builder().path("conf").build();
    assert!(matches!(fx.run(&options).0, Err(EnvError::NotAFile { .. })));
}

#[test]
fn test_empty_file_is_an_error_unless_adding() {
    let fx = Fixture::new();
    let path = fx.file(".env", "");

    let read = RunOptions::builder().path(&path).print(true).build();
    assert!(matches!(fx.run(&read).0, Err(EnvError::Empty { size: 0, .. })));

    let add = RunOptions::builder()
        .path(&path)
        .key("A")
        .value("1")
        .mutation(MutationOp::Add)
        .print(true)
        .build();
    let (outcome, out) = fx.run(&add);
    assert_eq!(outcome.unwrap(), Outcome::Printed);
    assert_eq!(out, "A=1\n");
}

#[test]
fn test_custom_separator_reads_and_bootstraps() {
    let settings = Settings {
        syntax: Syntax::with_separator(":"),
        ..Settings::default()
    };
    let fx = Fixture::with_settings(settings);
    let path = fx.file(".env", "FOO:bar\n");
    let options = RunOptions::builder()
        .path(&path)
        .key("FOO")
        .query(QueryMode::Has)
        .build();
    assert_eq!(fx.run(&options).0.unwrap().exit_code(), 0);

    let fresh = RunOptions::builder()
        .path("new.env")
        .key("K")
        .value("v")
        .write(true)
        .build();
    fx.run(&fresh).0.unwrap();
    assert_eq!(std::fs::read_to_string(fx.path("new.env")).unwrap(), "K:v\n");
}

#[test]
fn test_custom_separator_survives_rewrite() {
    let settings = Settings {
        syntax: Syntax::with_separator(":"),
        ..Settings::default()
    };
    let fx = Fixture::with_settings(settings);
    let path = fx.file(".env", "FOO:bar\n");

    let add = RunOptions::builder()
        .path(&path)
        .key("NEW")
        .value("v")
        .mutation(MutationOp::Add)
        .write(true)
        .build();
    fx.run(&add).0.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "FOO:bar\nNEW:v\n");

    for key in ["FOO", "NEW"] {
        let has = RunOptions::builder()
            .path(&path)
            .key(key)
            .query(QueryMode::Has)
            .build();
        assert_eq!(fx.run(&has).0.unwrap().exit_code(), 0, "{key} lost");
    }

    let print = RunOptions::builder().path(&path).print(true).build();
    assert_eq!(fx.run(&print).1, "FOO:bar\nNEW:v\n");
}

#[test]
fn test_clean_all_honours_never_delete_default() {
    let fx = Fixture::new();
    let path = fx.file(".env", "A=1\n");
    let json = fx.file(".env.json", "{}");

    let dry = RunOptions::builder().path(&path).clean_all(true).build();
    let (outcome, out) = fx.run(&dry);
    assert!(matches!(outcome.unwrap(), Outcome::Cleaned(report) if report.retained == vec![json.clone()]));
    assert!(out.starts_with("The --write flag can be used to remove"));
    assert!(json.exists());

    let real = RunOptions::builder()
        .path(&path)
        .clean_all(true)
        .write(true)
        .build();
    let (outcome, out) = fx.run(&real);
    assert!(matches!(outcome.unwrap(), Outcome::Cleaned(report) if report.removed == vec![json.clone()]));
    assert!(out.is_empty());
    assert!(!json.exists());
}

#[test]
fn test_clean_all_ignores_production_guard() {
    let fx = Fixture::new();
    let path = fx.file(".env.production", "A=1\n");
    let xml = fx.file(".env.production.xml", "<env/>");
    let options = RunOptions::builder()
        .path(&path)
        .clean_all(true)
        .mutation(MutationOp::Remove)
        .build();

    fx.run(&options).0.unwrap();

    assert!(!xml.exists());
}

#[test]
fn test_no_output_requested() {
    let fx = Fixture::new();
    let path = fx.file(".env", "A=1\n");
    let options = RunOptions::builder().path(&path).build();
    let (outcome, out) = fx.run(&options);
    assert_eq!(outcome.unwrap(), Outcome::Unchanged);
    assert!(out.is_empty());
}

#[test]
fn test_production_file_is_announced_at_default_level() {
    let fx = Fixture::new();
    let path = fx.file(".env.production", "A=1\n");
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();
    let options = RunOptions::builder().path(&path).build();

    let outcome = tracing::subscriber::with_default(subscriber, || fx.run(&options).0);

    assert_eq!(outcome.unwrap(), Outcome::Unchanged);
    let contents = log.contents();
    assert!(contents.contains("WARN"), "{contents}");
    assert!(contents.contains("using production environment file"), "{contents}");
}
