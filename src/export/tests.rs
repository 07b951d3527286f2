// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use super::clean::{CleanReport, clean_all};
use super::{ExportSpec, Format, Formats, is_xml_name};
use crate::config::types::GuardSettings;
use crate::dotenv::RecordStore;
use crate::engine::guard::ProductionGuard;
use crate::error::{EnvError, ValidationError};

fn sample() -> RecordStore {
    [("FOO", "bar"), ("HOST", "localhost")].into_iter().collect()
}

fn open_guard(path: &Path) -> ProductionGuard {
    ProductionGuard::detect(path, false, &GuardSettings::default())
}

#[test]
fn test_json_keeps_insertion_order() {
    let store: RecordStore = [("Z", "1"), ("A", "2")].into_iter().collect();
    let json = Format::Json.render(&store).unwrap();
    assert_eq!(json, "{\n  \"Z\": \"1\",\n  \"A\": \"2\"\n}");
}

#[test]
fn test_ini_render() {
    let ini = Format::Ini.render(&sample()).unwrap();
    assert_eq!(ini, "[default]\nFOO = bar\nHOST = localhost\n");
}

#[test]
fn test_yaml_and_toml_share_line_shape() {
    let yaml = Format::Yaml.render(&sample()).unwrap();
    let toml = Format::Toml.render(&sample()).unwrap();
    assert_eq!(yaml, "---\nFOO: \"bar\"\nHOST: \"localhost\"\n");
    assert_eq!(toml, "FOO: \"bar\"\nHOST: \"localhost\"\n");
}

#[test]
fn test_xml_render() {
    let xml = Format::Xml.render(&sample()).unwrap();
    assert_eq!(
        xml,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<env>\n   <FOO>bar</FOO>\n   <HOST>localhost</HOST>\n</env>\n"
    );
}

#[test]
fn test_xml_keys_are_written_verbatim() {
    let store: RecordStore = [("1BAD", "a<b")].into_iter().collect();
    let xml = Format::Xml.render(&store).unwrap();
    assert!(xml.contains("   <1BAD>a<b</1BAD>\n"));
}

#[test]
fn test_xml_name_check() {
    assert!(is_xml_name("DATABASE_URL"));
    assert!(is_xml_name("_private.key-1"));
    assert!(!is_xml_name("1ST"));
    assert!(!is_xml_name("has space"));
    assert!(!is_xml_name("xmlns"));
}

#[test]
fn test_target_appends_extension() {
    let target = Format::Yaml.target(Path::new("/tmp/app/.env.production"));
    assert_eq!(target, Path::new("/tmp/app/.env.production.yaml"));
}

#[test]
fn test_validate_rejects_combined_formats() {
    let spec = ExportSpec::new(Formats::YAML | Formats::JSON, false, false);
    let err = spec.validate().unwrap_err();
    assert!(matches!(
        err,
        ValidationError::CombinedFormats {
            first: "json",
            second: "yaml"
        }
    ));
    insta::assert_snapshot!(err.to_string(), @"cannot combine --json with --yaml, use --mk-all to build every format");
}

#[test]
fn test_validate_reports_in_check_order() {
    let spec = ExportSpec::new(Formats::TOML | Formats::XML, false, false);
    let err = spec.validate().unwrap_err();
    assert!(matches!(
        err,
        ValidationError::CombinedFormats {
            first: "xml",
            second: "toml"
        }
    ));
}

#[test]
fn test_build_all_accepts_anything() {
    let spec = ExportSpec::new(Formats::all(), true, false);
    assert!(spec.validate().is_ok());
    assert_eq!(spec.requested(), Format::ALL.to_vec());

    let none = ExportSpec::new(Formats::empty(), true, false);
    assert_eq!(none.requested().len(), 5);
}

#[test]
fn test_single_format_requested() {
    let spec = ExportSpec::new(Formats::INI, false, false);
    assert!(spec.validate().is_ok());
    assert_eq!(spec.requested(), vec![Format::Ini]);
    assert!(ExportSpec::default().requested().is_empty());
}

#[test]
fn test_emit_prints_without_write() {
    let spec = ExportSpec::new(Formats::TOML, false, false);
    let mut out = Vec::new();
    let base = Path::new("does-not-exist/.env");
    let emitted = spec.emit(&sample(), base, &open_guard(base), &mut out).unwrap();

    assert_eq!(emitted, vec![Format::Toml]);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "FOO: \"bar\"\nHOST: \"localhost\"\n"
    );
}

#[test]
fn test_emit_json_gets_trailing_newline() {
    let spec = ExportSpec::new(Formats::JSON, false, false);
    let mut out = Vec::new();
    let base = Path::new(".env");
    spec.emit(&sample(), base, &open_guard(base), &mut out).unwrap();
    assert!(String::from_utf8(out).unwrap().ends_with("}\n"));
}

#[test]
fn test_emit_persists_every_format() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join(".env");
    let spec = ExportSpec::new(Formats::empty(), true, true);
    let mut out = Vec::new();

    spec.emit(&sample(), &base, &open_guard(&base), &mut out).unwrap();

    assert!(out.is_empty());
    for format in Format::ALL {
        assert!(format.target(&base).is_file(), "{} missing", format.name());
    }
    let ini = std::fs::read_to_string(Format::Ini.target(&base)).unwrap();
    assert!(ini.starts_with("[default]\n"));
}

#[test]
fn test_emit_refuses_protected_target() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join(".env.production");
    let spec = ExportSpec::new(Formats::JSON, false, true);
    let mut out = Vec::new();

    let err = spec
        .emit(&sample(), &base, &open_guard(&base), &mut out)
        .unwrap_err();

    assert!(matches!(err, EnvError::ProductionProtected { .. }));
    assert!(!Format::Json.target(&base).exists());
}

#[test]
fn test_clean_removes_existing_exports() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join(".env");
    for format in [Format::Json, Format::Xml] {
        std::fs::write(format.target(&base), "x").unwrap();
    }
    let mut out = Vec::new();

    let report = clean_all(&base, false, &mut out).unwrap();

    assert_eq!(
        report,
        CleanReport {
            removed: vec![Format::Json.target(&base), Format::Xml.target(&base)],
            ..CleanReport::default()
        }
    );
    assert!(out.is_empty());
    assert!(!Format::Json.target(&base).exists());
    assert!(!Format::Xml.target(&base).exists());
}

#[test]
fn test_clean_never_delete_keeps_files_and_hints() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join(".env");
    let yaml = Format::Yaml.target(&base);
    std::fs::write(&yaml, "---\n").unwrap();
    let mut out = Vec::new();

    let report = clean_all(&base, true, &mut out).unwrap();

    assert_eq!(report.retained, vec![yaml.clone()]);
    assert_eq!(report.touched(), 1);
    assert!(yaml.exists());
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("The --write flag can be used to remove {}\n", yaml.display())
    );
}

#[test]
fn test_clean_with_nothing_to_do() {
    let dir = tempfile::tempdir().unwrap();
    let mut out = Vec::new();
    let report = clean_all(&dir.path().join(".env"), false, &mut out).unwrap();
    assert_eq!(report.touched(), 0);
}

#[cfg(unix)]
#[test]
fn test_clean_skips_files_it_cannot_remove() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let locked = dir.path().join("locked");
    std::fs::create_dir(&locked).unwrap();
    let base = locked.join(".env");
    let json = Format::Json.target(&base);
    std::fs::write(&json, "{}").unwrap();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

    // root ignores directory permissions
    if std::fs::write(locked.join("write-check"), "").is_ok() {
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let mut out = Vec::new();
    let result = clean_all(&base, false, &mut out);
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    let report = result.unwrap();
    assert_eq!(report.skipped, vec![json.clone()]);
    assert!(report.removed.is_empty());
    assert!(json.exists());
}
