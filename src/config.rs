//! Configuration for glog loggers
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{GlogError, Result};
use crate::level::Level;

/// Main configuration for one logger
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerConfig {
    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------
    /// Lowest level that is recorded; `None` turns the logger off
    pub level: Option<Level>,

    /// Record the caller's file name and line
    pub file_line: bool,

    // -------------------------------------------------------------------------
    // Sinks
    // -------------------------------------------------------------------------
    pub console: ConsoleConfig,

    pub file: FileConfig,
}

/// Console (stderr) sink configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    pub enable: bool,

    /// Emit ANSI colors
    pub coloring: bool,
}

/// File sink configuration
#[derive(Debug, Clone, PartialEq)]
pub struct FileConfig {
    pub enable: bool,

    /// Root directory; one sub-directory is created per day:
    ///   {dir}/
    ///     └── 2024_0131/
    ///           └── 235959.000000000.log.bin
    pub dir: PathBuf,

    /// Rotate once the current file reaches this size (bytes)
    pub max_file_size: u64,

    pub format: OutputFormat,

    /// ANSI colors in text output
    pub coloring: bool,
}

/// On-disk representation of records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Raw binary records, readable with the decoder
    Binary,

    /// Rendered text lines
    Text,
}

impl OutputFormat {
    /// File extension, including the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Binary => ".log.bin",
            OutputFormat::Text => ".log.txt",
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Some(Level::Trace),
            file_line: false,
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enable: true,
            coloring: true,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enable: false,
            dir: PathBuf::from("./logs"),
            max_file_size: 64 * 1024 * 1024, // 64 MB
            format: OutputFormat::Binary,
            coloring: false,
        }
    }
}

impl LoggerConfig {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings no sink can work with
    pub fn validate(&self) -> Result<()> {
        if self.file.enable {
            if self.file.dir.as_os_str().is_empty() {
                return Err(GlogError::Config("file sink dir is empty".to_string()));
            }
            if self.file.max_file_size == 0 {
                return Err(GlogError::Config(
                    "file sink max_file_size must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Builder for LoggerConfig
#[derive(Default)]
pub struct ConfigBuilder {
    config: LoggerConfig,
}

impl ConfigBuilder {
    /// Set the lowest recorded level (`None` = off)
    pub fn level(mut self, level: Option<Level>) -> Self {
        self.config.level = level;
        self
    }

    /// Record caller file and line
    pub fn file_line(mut self, enable: bool) -> Self {
        self.config.file_line = enable;
        self
    }

    /// Enable or disable the console sink
    pub fn console(mut self, enable: bool) -> Self {
        self.config.console.enable = enable;
        self
    }

    /// Enable or disable colors on the console
    pub fn console_coloring(mut self, coloring: bool) -> Self {
        self.config.console.coloring = coloring;
        self
    }

    /// Enable the file sink rooted at `dir`
    pub fn file_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.file.enable = true;
        self.config.file.dir = dir.into();
        self
    }

    /// Disable the file sink
    pub fn no_file(mut self) -> Self {
        self.config.file.enable = false;
        self
    }

    /// Set the rotation size (in bytes)
    pub fn max_file_size(mut self, size: u64) -> Self {
        self.config.file.max_file_size = size;
        self
    }

    /// Set the on-disk format
    pub fn file_format(mut self, format: OutputFormat) -> Self {
        self.config.file.format = format;
        self
    }

    /// Enable or disable colors in text files
    pub fn file_coloring(mut self, coloring: bool) -> Self {
        self.config.file.coloring = coloring;
        self
    }

    pub fn build(self) -> LoggerConfig {
        self.config
    }
}
