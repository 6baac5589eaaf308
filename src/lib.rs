//! # glog
//!
//! Structured logging built on a compact, self-describing binary record:
//! - Append-only encoding with typed key/value contexts
//! - Strict decoding plus resynchronization after corrupted bytes
//! - Colored text rendering, console and rotating file sinks
//! - Offline conversion of binary log files to text
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Logger (Entry builder)                      │
//! │          level filter, caller file/line, BufferPool         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ binary record
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ ConsoleSink │          │  FileSink   │
//!   │ (text, tty) │          │ (.log.bin)  │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │glog-convert │
//!                           │ (.log.txt)  │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod level;

pub mod codec;
pub mod pool;
pub mod text;
pub mod sink;
pub mod logger;
pub mod convert;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DecodeError, GlogError, Result};
pub use config::LoggerConfig;
pub use level::Level;
pub use codec::{Context, Record, Value};
pub use logger::{Entry, Logger, LoggerRegistry};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of glog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
