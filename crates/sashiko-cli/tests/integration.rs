//! Integration tests for the sashiko CLI

use std::fs;

use sashiko_cli::{generate_command, scheme_command, GenerateOptions, ReportFormat};
use sashiko_core::{CodebookPolicy, PatternKind};
use sashiko_engine::Settings;
use tempfile::TempDir;

fn offline_settings() -> Settings {
    Settings::from_toml_str("[assets]\nsystem_fonts = false\n").unwrap()
}

fn options(text: &str, dir: &TempDir) -> GenerateOptions {
    GenerateOptions {
        text_h: text.to_string(),
        output: Some(dir.path().to_path_buf()),
        ..Default::default()
    }
}

#[test]
fn test_generate_writes_png() {
    let dir = TempDir::new().unwrap();
    let mut settings = offline_settings();
    let mut out = Vec::new();

    let artifact = generate_command(&options("HELLO", &dir), &mut settings, &mut out).unwrap();

    let png = fs::read(&artifact.raster.path).unwrap();
    assert!(png.starts_with(b"\x89PNG"));
    assert!(artifact.print_document.is_none());

    let report = String::from_utf8(out).unwrap();
    assert!(report.contains("Raster:"));
    assert!(report.contains("Label: HELLO"));
}

#[test]
fn test_generate_with_print_document_and_json_report() {
    let dir = TempDir::new().unwrap();
    let mut settings = offline_settings();
    let mut out = Vec::new();
    let opts = GenerateOptions {
        text_v: Some("kyiv".to_string()),
        kind: Some(PatternKind::Scheme),
        print: true,
        report: ReportFormat::Json,
        ..options("love", &dir)
    };

    let artifact = generate_command(&opts, &mut settings, &mut out).unwrap();
    let pdf = artifact.print_document.unwrap();
    assert!(fs::read(&pdf.path).unwrap().starts_with(b"%PDF"));

    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["label"], "LOVE / KYIV");
    assert_eq!(report["print_document"]["mime_type"], "application/pdf");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_generate_creates_output_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    let mut settings = offline_settings();
    let opts = GenerateOptions {
        text_h: "A".to_string(),
        output: Some(nested.clone()),
        no_label: true,
        ..Default::default()
    };

    generate_command(&opts, &mut settings, &mut Vec::new()).unwrap();
    assert_eq!(fs::read_dir(&nested).unwrap().count(), 1);
}

#[test]
fn test_generate_rejects_unregistered_texture() {
    let dir = TempDir::new().unwrap();
    let mut settings = offline_settings();
    let opts = GenerateOptions {
        background: Some("texture:denim".parse().unwrap()),
        ..options("A", &dir)
    };

    assert!(generate_command(&opts, &mut settings, &mut Vec::new()).is_err());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_scheme_preview() {
    let mut out = Vec::new();
    scheme_command("A", "A", CodebookPolicy::Latin, &mut out).unwrap();
    let preview = String::from_utf8(out).unwrap();
    assert_eq!(preview.lines().count(), 2 * 5 + 1);
    assert!(preview.starts_with("+  +--+"));
}
