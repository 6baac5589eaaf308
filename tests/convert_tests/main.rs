//! Integration tests for binary-to-text conversion
//!
//! These tests verify:
//! - Stream conversion with and without corruption
//! - Output path mapping and staleness checks
//! - Input discovery

use std::fs;
use std::io::Cursor;
use std::path::Path;

use chrono::DateTime;
use glog::codec::RecordEncoder;
use glog::convert::{
    collect_inputs, convert_file, convert_stream, needs_conversion, to_out_path, ConvertStats,
};
use glog::text::{CORRUPTION_BANNER, MAGENTA};
use glog::Level;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn encoded(msg: &str) -> Vec<u8> {
    let mut enc = RecordEncoder::new();
    enc.level(Level::Error)
        .pkg("conv")
        .msg(msg)
        .context("ok", true)
        .timestamp(&DateTime::from_timestamp(1_700_000_000, 0).unwrap());
    enc.finish().to_vec()
}

fn garbage() -> Vec<u8> {
    vec![0xAA; 20]
}

fn convert(bytes: Vec<u8>, coloring: bool) -> (String, glog::Result<ConvertStats>) {
    let mut out = Vec::new();
    let result = convert_stream(Cursor::new(bytes), &mut out, coloring);
    (String::from_utf8(out).unwrap(), result)
}

fn touch(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

// =============================================================================
// Stream Tests
// =============================================================================

#[test]
fn test_clean_stream() {
    let bytes = [encoded("a"), encoded("b")].concat();
    let (text, result) = convert(bytes, false);

    let stats = result.unwrap();
    assert_eq!(stats, ConvertStats { records: 2, corruptions: 0 });
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" ERROR conv <a> (ok: true)"));
    assert!(lines[1].ends_with(" ERROR conv <b> (ok: true)"));
}

#[test]
fn test_corruption_writes_one_banner_per_run() {
    let bytes = [
        encoded("a"),
        garbage(),
        garbage(),
        encoded("b"),
        garbage(),
        encoded("c"),
    ]
    .concat();
    let (text, result) = convert(bytes, false);

    let stats = result.unwrap();
    assert_eq!(stats.records, 3);
    assert_eq!(stats.corruptions, 2);

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[1], CORRUPTION_BANNER);
    assert_eq!(lines[3], CORRUPTION_BANNER);
    assert!(lines[4].ends_with("<c> (ok: true)"));
}

#[test]
fn test_colored_banner() {
    let bytes = [garbage(), encoded("a")].concat();
    let (text, result) = convert(bytes, true);
    result.unwrap();
    assert!(text.starts_with(MAGENTA));
}

#[test]
fn test_empty_stream() {
    let (text, result) = convert(Vec::new(), false);
    assert_eq!(result.unwrap(), ConvertStats::default());
    assert!(text.is_empty());
}

#[test]
fn test_truncated_tail_is_error_after_output() {
    let mut bytes = [encoded("a"), encoded("b")].concat();
    bytes.truncate(bytes.len() - 4);
    let (text, result) = convert(bytes, false);

    assert!(result.is_err());
    assert_eq!(text.lines().count(), 1);
}

#[test]
fn test_short_trailing_garbage_gets_banner() {
    let bytes = [encoded("a"), vec![0xde, 0xad, 0xbe]].concat();
    let (text, result) = convert(bytes, false);

    assert_eq!(result.unwrap(), ConvertStats { records: 1, corruptions: 1 });
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], CORRUPTION_BANNER);
}

// =============================================================================
// File Tests
// =============================================================================

#[test]
fn test_to_out_path() {
    assert_eq!(
        to_out_path(Path::new("/var/log/app/120000.000000001.log.bin")),
        Path::new("/var/log/app/120000.000000001.log.txt")
    );
    assert_eq!(
        to_out_path(Path::new("raw.dump")),
        Path::new("raw.dump.log.txt")
    );
}

#[test]
fn test_convert_file_and_staleness() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("a.log.bin");
    touch(&input, &encoded("on disk"));
    let output = to_out_path(&input);

    assert!(needs_conversion(&input, &output).unwrap());
    let stats = convert_file(&input, &output, false).unwrap();
    assert_eq!(stats.records, 1);
    assert!(!needs_conversion(&input, &output).unwrap());

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("<on disk>"));
}

#[test]
fn test_needs_conversion_missing_input() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("missing.log.bin");
    assert!(needs_conversion(&input, &to_out_path(&input)).is_err());
}

#[test]
fn test_collect_inputs_skips_hidden() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    touch(&root.join("2024_0131/000000.000000000.log.bin"), b"");
    touch(&root.join("2024_0131/000000.000000000.log.txt"), b"");
    touch(&root.join("2024_0201/120000.000000000.log.bin"), b"");
    touch(&root.join(".hidden/000000.000000000.log.bin"), b"");
    touch(&root.join("2024_0201/.secret.log.bin"), b"");

    let inputs = collect_inputs(&[root]);
    assert_eq!(
        inputs,
        vec![
            root.join("2024_0131/000000.000000000.log.bin"),
            root.join("2024_0201/120000.000000000.log.bin"),
        ]
    );
}

#[test]
fn test_collect_inputs_accepts_files() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("one.log.bin");
    touch(&file, b"");

    assert_eq!(collect_inputs(&[&file]), vec![file.clone()]);
    assert!(collect_inputs(&[temp_dir.path().join("nope")]).is_empty());
}
