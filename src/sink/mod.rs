//! Sink Module
//!
//! Destinations for completed binary records.
//!
//! ## Responsibilities
//! - Accept one finished record at a time (push model, no return value)
//! - Report failures through an `ErrorHandler` instead of the caller
//!
//! ## Sinks
//! - `ConsoleSink`: decodes and renders text to stderr
//! - `FileSink`: appends to size/day-rotated files, binary or text

mod console;
mod file;

pub use console::ConsoleSink;
pub use file::FileSink;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::LoggerConfig;
use crate::error::{GlogError, Result};

/// Receives every committed record.
///
/// `record` is a complete binary record (header through End tag); `time`
/// is the commit time that was stamped into it.
pub trait Sink: Send + Sync {
    fn write(&self, record: &[u8], time: DateTime<Utc>);
}

/// Callback for sink failures
pub type ErrorHandler = Arc<dyn Fn(DateTime<Utc>, &GlogError) + Send + Sync>;

/// Reports sink failures as `tracing` warnings
pub fn default_error_handler() -> ErrorHandler {
    Arc::new(|time: DateTime<Utc>, err: &GlogError| {
        tracing::warn!(time = %time, error = %err, "glog sink failure");
    })
}

/// Build the sinks enabled in `config`
pub fn build_sinks(config: &LoggerConfig, on_error: ErrorHandler) -> Result<Vec<Arc<dyn Sink>>> {
    config.validate()?;

    let mut sinks: Vec<Arc<dyn Sink>> = Vec::new();
    if config.console.enable {
        sinks.push(Arc::new(ConsoleSink::new(
            config.console.coloring,
            Arc::clone(&on_error),
        )));
    }
    if config.file.enable {
        sinks.push(Arc::new(FileSink::new(config.file.clone(), on_error)));
    }
    Ok(sinks)
}
