//! Logger Module
//!
//! Front end that turns chained calls into binary records and fans them out
//! to sinks.
//!
//! ## Flow
//! ```text
//! logger.info()            -> Entry (header, Level, Pkg, [File, Line])
//!       .msg("started")    -> Msg
//!       .u16("port", 80)   -> Context
//!       .commit()          -> Timestamp, End -> every sink -> pool
//! ```
//!
//! An entry below the configured level is inert: every call on it is a
//! no-op and nothing is allocated.

mod registry;

pub use registry::LoggerRegistry;

use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::codec::{Complex, RecordEncoder, Value};
use crate::config::LoggerConfig;
use crate::error::Result;
use crate::level::Level;
use crate::pool::BufferPool;
use crate::sink::{build_sinks, default_error_handler, ErrorHandler, Sink};

type Sinks = Arc<[Arc<dyn Sink>]>;

/// Configuration and the sinks built from it, swapped together
struct LoggerState {
    config: LoggerConfig,
    sinks: Sinks,
}

/// Named logger; the name is written as the record package
pub struct Logger {
    name: String,
    state: RwLock<LoggerState>,
    pool: Arc<BufferPool>,
    on_error: ErrorHandler,
}

impl Logger {
    /// Logger with the sinks described by `config`
    pub fn new(name: impl Into<String>, config: LoggerConfig) -> Result<Self> {
        Self::with_error_handler(name, config, default_error_handler())
    }

    /// Like `new`, but sink failures go to `on_error`, now and after every
    /// `set_config`.
    pub fn with_error_handler(
        name: impl Into<String>,
        config: LoggerConfig,
        on_error: ErrorHandler,
    ) -> Result<Self> {
        let sinks = build_sinks(&config, Arc::clone(&on_error))?;
        Ok(Self::assemble(name.into(), config, sinks, on_error))
    }

    /// Logger writing to caller-provided sinks; sink settings in `config`
    /// are ignored until the next `set_config`.
    pub fn with_sinks(
        name: impl Into<String>,
        config: LoggerConfig,
        sinks: Vec<Arc<dyn Sink>>,
    ) -> Self {
        Self::assemble(name.into(), config, sinks, default_error_handler())
    }

    fn assemble(
        name: String,
        config: LoggerConfig,
        sinks: Vec<Arc<dyn Sink>>,
        on_error: ErrorHandler,
    ) -> Self {
        Self {
            name,
            state: RwLock::new(LoggerState {
                config,
                sinks: sinks.into(),
            }),
            pool: Arc::new(BufferPool::default()),
            on_error,
        }
    }

    /// Share a buffer pool with other loggers
    pub(crate) fn with_pool(mut self, pool: Arc<BufferPool>) -> Self {
        self.pool = pool;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> LoggerConfig {
        self.state.read().config.clone()
    }

    /// Replace the configuration and rebuild the sinks.
    ///
    /// On error the previous configuration stays in effect.
    pub fn set_config(&self, config: LoggerConfig) -> Result<()> {
        let sinks = build_sinks(&config, Arc::clone(&self.on_error))?;
        *self.state.write() = LoggerState {
            config,
            sinks: sinks.into(),
        };
        tracing::debug!(logger = %self.name, "logger reconfigured");
        Ok(())
    }

    /// True when records at `level` are recorded
    pub fn enabled(&self, level: Level) -> bool {
        matches!(self.state.read().config.level, Some(min) if level >= min)
    }

    /// Buffer pool backing this logger's entries
    pub fn pool(&self) -> &Arc<BufferPool> {
        &self.pool
    }

    // =========================================================================
    // Entry Creation
    // =========================================================================

    /// Start a record at `level`
    #[track_caller]
    pub fn log(&self, level: Level) -> Entry<'_> {
        self.start(level, Location::caller())
    }

    #[track_caller]
    pub fn trace(&self) -> Entry<'_> {
        self.start(Level::Trace, Location::caller())
    }

    #[track_caller]
    pub fn debug(&self) -> Entry<'_> {
        self.start(Level::Debug, Location::caller())
    }

    #[track_caller]
    pub fn info(&self) -> Entry<'_> {
        self.start(Level::Info, Location::caller())
    }

    #[track_caller]
    pub fn warn(&self) -> Entry<'_> {
        self.start(Level::Warn, Location::caller())
    }

    #[track_caller]
    pub fn error(&self) -> Entry<'_> {
        self.start(Level::Error, Location::caller())
    }

    #[track_caller]
    pub fn fatal(&self) -> Entry<'_> {
        self.start(Level::Fatal, Location::caller())
    }

    fn start(&self, level: Level, caller: &'static Location<'static>) -> Entry<'_> {
        let file_line = {
            let state = self.state.read();
            match state.config.level {
                Some(min) if level >= min => state.config.file_line,
                _ => return Entry { active: None },
            }
        };

        let mut enc = RecordEncoder::from_buf(self.pool.acquire());
        enc.level(level).pkg(&self.name);
        if file_line {
            enc.file(base_name(caller.file())).line(caller.line());
        }

        Entry {
            active: Some(ActiveEntry { logger: self, enc }),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("config", &state.config)
            .field("sinks", &state.sinks.len())
            .finish()
    }
}

fn base_name(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}

// =============================================================================
// Entry
// =============================================================================

/// One record under construction.
///
/// Dropping an entry without `commit` discards it.
#[must_use = "an entry is only written by commit()"]
pub struct Entry<'a> {
    active: Option<ActiveEntry<'a>>,
}

struct ActiveEntry<'a> {
    logger: &'a Logger,
    enc: RecordEncoder,
}

macro_rules! typed_context {
    ($($(#[$doc:meta])* $name:ident($ty:ty) => $variant:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(self, key: &str, value: $ty) -> Self {
                self.value(key, Value::$variant(value))
            }
        )*
    };
}

impl<'a> Entry<'a> {
    /// False for an entry filtered out by level
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Flag the record for attention
    pub fn mark(mut self) -> Self {
        if let Some(active) = self.active.as_mut() {
            active.enc.mark();
        }
        self
    }

    pub fn msg(mut self, msg: &str) -> Self {
        if let Some(active) = self.active.as_mut() {
            active.enc.msg(msg);
        }
        self
    }

    /// Message built from `format_args!`; nothing is formatted when the
    /// entry is inactive.
    pub fn msg_fmt(mut self, args: fmt::Arguments<'_>) -> Self {
        if let Some(active) = self.active.as_mut() {
            match args.as_str() {
                Some(msg) => active.enc.msg(msg),
                None => active.enc.msg(&args.to_string()),
            };
        }
        self
    }

    /// Attach a context of any kind
    pub fn value(mut self, key: &str, value: Value) -> Self {
        if let Some(active) = self.active.as_mut() {
            active.enc.context_ref(key, &value);
        }
        self
    }

    typed_context! {
        bool(bool) => Bool,
        /// Rendered as hex
        byte(u8) => Byte,
        rune(char) => Rune,
        i8(i8) => Int8,
        i16(i16) => Int16,
        i32(i32) => Int32,
        i64(i64) => Int64,
        u8(u8) => Uint8,
        u16(u16) => Uint16,
        u32(u32) => Uint32,
        u64(u64) => Uint64,
        /// Pointer-sized unsigned integer, stored on 64 bits
        uintptr(u64) => Uintptr,
        f32(f32) => Float32,
        f64(f64) => Float64,
        complex64(Complex<f32>) => Complex64,
        complex128(Complex<f64>) => Complex128,
        time(DateTime<Utc>) => Time,
        duration(Duration) => Duration,
    }

    pub fn str(self, key: &str, value: &str) -> Self {
        if !self.is_active() {
            return self;
        }
        self.value(key, Value::String(value.to_string()))
    }

    /// Stamp, terminate and deliver the record to every sink
    pub fn commit(self) {
        let Some(ActiveEntry { logger, mut enc }) = self.active else {
            return;
        };

        let now = Utc::now();
        enc.timestamp(&now);
        let buf = enc.finish();

        let sinks = Arc::clone(&logger.state.read().sinks);
        for sink in sinks.iter() {
            sink.write(&buf, now);
        }
        logger.pool.release(buf);
    }
}
