//! File sink
//!
//! ## Layout
//! ```text
//! {dir}/
//!   ├── 2024_0130/
//!   │     └── 093000.000000123.log.bin
//!   └── 2024_0131/
//!         ├── 000000.004000000.log.bin
//!         └── 120501.250000000.log.bin   <- current
//! ```
//!
//! A new file is opened when the current one reaches `max_file_size`, when
//! the local day changes, or when the current file was removed from disk.

use std::borrow::Cow;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, NaiveDate, Utc};
use parking_lot::Mutex;

use crate::config::{FileConfig, OutputFormat};
use crate::error::Result;
use crate::text::binary_to_text;

use super::{ErrorHandler, Sink};

/// Minimum delay between two checks for an externally removed file
const EXISTENCE_CHECK_INTERVAL: Duration = Duration::from_secs(5);

pub struct FileSink {
    config: FileConfig,
    state: Mutex<FileState>,
    on_error: ErrorHandler,
}

/// Currently open file, if any
struct FileState {
    file: Option<File>,
    path: PathBuf,
    size: u64,
    day: NaiveDate,
    last_check: Instant,
}

impl FileSink {
    /// Files are opened lazily on the first write
    pub fn new(config: FileConfig, on_error: ErrorHandler) -> Self {
        Self {
            config,
            state: Mutex::new(FileState {
                file: None,
                path: PathBuf::new(),
                size: 0,
                day: NaiveDate::MIN,
                last_check: Instant::now(),
            }),
            on_error,
        }
    }

    /// Path of the file currently written to
    pub fn current_path(&self) -> Option<PathBuf> {
        let state = self.state.lock();
        state.file.as_ref().map(|_| state.path.clone())
    }

    fn append(&self, record: &[u8], time: DateTime<Utc>) -> Result<()> {
        let data: Cow<'_, [u8]> = match self.config.format {
            OutputFormat::Binary => Cow::Borrowed(record),
            OutputFormat::Text => {
                Cow::Owned(binary_to_text(record, self.config.coloring)?.into_bytes())
            }
        };

        let local = time.with_timezone(&Local);
        let mut state = self.state.lock();

        if self.should_rotate(&mut state, local.date_naive()) {
            self.rotate(&mut state, &local)?;
        }

        if let Some(file) = state.file.as_mut() {
            file.write_all(&data)?;
        }
        state.size += data.len() as u64;
        Ok(())
    }

    fn should_rotate(&self, state: &mut FileState, today: NaiveDate) -> bool {
        if state.file.is_none() || state.size >= self.config.max_file_size || state.day != today {
            return true;
        }

        if state.last_check.elapsed() >= EXISTENCE_CHECK_INTERVAL {
            state.last_check = Instant::now();
            if !state.path.exists() {
                tracing::debug!(path = %state.path.display(), "log file removed, reopening");
                return true;
            }
        }
        false
    }

    fn rotate(&self, state: &mut FileState, local: &DateTime<Local>) -> Result<()> {
        state.file = None;

        let path = log_file_path(&self.config.dir, local, self.config.format);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let size = file.metadata()?.len();

        tracing::debug!(path = %path.display(), "opened log file");

        state.file = Some(file);
        state.path = path;
        state.size = size;
        state.day = local.date_naive();
        state.last_check = Instant::now();
        Ok(())
    }
}

impl Sink for FileSink {
    fn write(&self, record: &[u8], time: DateTime<Utc>) {
        if let Err(e) = self.append(record, time) {
            (self.on_error)(time, &e);
        }
    }
}

/// `{dir}/{YYYY_MMDD}/{HHMMSS}.{nanos}{ext}`
pub(crate) fn log_file_path(dir: &Path, local: &DateTime<Local>, format: OutputFormat) -> PathBuf {
    let name = format!(
        "{}.{:09}{}",
        local.format("%H%M%S"),
        local.timestamp_subsec_nanos(),
        format.extension()
    );
    dir.join(local.format("%Y_%m%d").to_string()).join(name)
}
