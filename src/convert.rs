//! Binary-to-text conversion
//!
//! Turns `.log.bin` files written by the file sink into rendered
//! `.log.txt` files. Damaged regions are skipped; each run of damage is
//! replaced by a single banner line.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::codec::{Record, RecordReader};
use crate::config::OutputFormat;
use crate::error::{DecodeError, Result};
use crate::text::{corruption_banner, format_record};

/// Counters for one converted stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Records decoded and written
    pub records: u64,
    /// Corrupted runs, one banner each
    pub corruptions: u64,
}

/// Render every record of `input` into `output`.
///
/// Returns at clean end of input. Truncated input and transport failures
/// return the error; everything converted before it has been written.
pub fn convert_stream<R: Read, W: Write>(
    input: R,
    mut output: W,
    coloring: bool,
) -> Result<ConvertStats> {
    let mut reader = RecordReader::new(input);
    let mut record = Record::new();
    let mut stats = ConvertStats::default();
    let mut in_corruption = false;

    loop {
        match reader.read_next(&mut record) {
            Ok(_) => {
                in_corruption = false;
                stats.records += 1;
                output.write_all(format_record(&record, coloring).as_bytes())?;
            }
            Err(DecodeError::Eof) => return Ok(stats),
            Err(e) if e.is_recoverable() => {
                tracing::debug!(error = %e, "corrupted record, locating next one");
                if !in_corruption {
                    in_corruption = true;
                    stats.corruptions += 1;
                    output.write_all(corruption_banner(coloring).as_bytes())?;
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Text output path for a binary log: `x.log.bin` -> `x.log.txt`
pub fn to_out_path(path: &Path) -> PathBuf {
    let in_ext = OutputFormat::Binary.extension();
    let out_ext = OutputFormat::Text.extension();

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let out_name = match name.strip_suffix(in_ext) {
        Some(stem) => format!("{}{}", stem, out_ext),
        None => format!("{}{}", name, out_ext),
    };
    path.with_file_name(out_name)
}

/// True when `output` is missing or older than `input`
pub fn needs_conversion(input: &Path, output: &Path) -> Result<bool> {
    let in_modified = fs::metadata(input)?.modified()?;
    match fs::metadata(output) {
        Ok(meta) => Ok(meta.modified()? < in_modified),
        Err(_) => Ok(true),
    }
}

/// Convert one file, replacing any previous output
pub fn convert_file(input: &Path, output: &Path, coloring: bool) -> Result<ConvertStats> {
    let reader = BufReader::new(File::open(input)?);
    let mut writer = BufWriter::new(File::create(output)?);

    let result = convert_stream(reader, &mut writer, coloring);
    writer.flush()?;
    result
}

/// Every binary log under `paths`, sorted.
///
/// Directories are walked recursively; hidden files and directories found
/// while walking are skipped, paths given explicitly never are. Unreadable
/// entries are reported and skipped.
pub fn collect_inputs<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for path in paths {
        walk(path.as_ref(), &mut found, true);
    }
    found.sort();
    found
}

fn walk(path: &Path, found: &mut Vec<PathBuf>, explicit: bool) {
    if !explicit && is_hidden(path) {
        return;
    }

    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "cannot stat path");
            return;
        }
    };

    if meta.is_file() {
        if is_binary_log(path) {
            found.push(path.to_path_buf());
        }
        return;
    }

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "cannot read directory");
            return;
        }
    };
    for entry in entries {
        match entry {
            Ok(entry) => walk(&entry.path(), found, false),
            Err(e) => tracing::error!(path = %path.display(), error = %e, "cannot read entry"),
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.starts_with('.') && name != "." && name != "..")
}

fn is_binary_log(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.ends_with(OutputFormat::Binary.extension()))
}
