//! Tests for Logger and Entry

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use glog::codec::{Complex, FieldKind, Value, ValueKind, HEADER_SIZE};
use glog::sink::Sink;
use glog::{Level, Logger, LoggerConfig};

use super::MemorySink;

// =============================================================================
// Helper Functions
// =============================================================================

fn logger_with(config: LoggerConfig) -> (Logger, Arc<MemorySink>) {
    let sink = MemorySink::new();
    let sinks: Vec<Arc<dyn Sink>> = vec![sink.clone() as Arc<dyn Sink>];
    (Logger::with_sinks("svc", config, sinks), sink)
}

fn logger() -> (Logger, Arc<MemorySink>) {
    logger_with(LoggerConfig::default())
}

// =============================================================================
// Entry Tests
// =============================================================================

#[test]
fn test_commit_delivers_record() {
    let (logger, sink) = logger();
    let before = Utc::now();
    logger.info().msg("started").u16("port", 8080).commit();
    let after = Utc::now();

    assert_eq!(sink.len(), 1);
    let record = sink.decoded(0);
    assert_eq!(record.level, Level::Info);
    assert_eq!(record.pkg, "svc");
    assert_eq!(record.msg, "started");
    assert_eq!(record.context("port").unwrap().value, Value::Uint16(8080));
    assert!(record.time >= before && record.time <= after);
    assert_eq!(record.time, sink.time(0));
    assert!(record.file.is_empty());
    assert_eq!(record.line, 0);
}

#[test]
fn test_every_level_constructor() {
    let (logger, sink) = logger();
    logger.trace().commit();
    logger.debug().commit();
    logger.info().commit();
    logger.warn().commit();
    logger.error().commit();
    logger.fatal().commit();
    logger.log(Level::Warn).commit();

    let levels: Vec<Level> = (0..sink.len()).map(|i| sink.decoded(i).level).collect();
    assert_eq!(
        levels,
        vec![
            Level::Trace,
            Level::Debug,
            Level::Info,
            Level::Warn,
            Level::Error,
            Level::Fatal,
            Level::Warn
        ]
    );
}

#[test]
fn test_typed_contexts() {
    let (logger, sink) = logger();
    let tm = DateTime::from_timestamp(1_700_000_000, 5).unwrap();
    logger
        .info()
        .bool("bool", true)
        .byte("byte", 0x7f)
        .rune("rune", 'λ')
        .i8("i8", -1)
        .i16("i16", -2)
        .i32("i32", -3)
        .i64("i64", -4)
        .u8("u8", 1)
        .u16("u16", 2)
        .u32("u32", 3)
        .u64("u64", 4)
        .uintptr("uintptr", 0x1000)
        .f32("f32", 0.25)
        .f64("f64", 0.5)
        .complex64("c64", Complex::new(1.0, 2.0))
        .complex128("c128", Complex::new(3.0, 4.0))
        .str("str", "text")
        .time("time", tm)
        .duration("duration", Duration::from_millis(250))
        .commit();

    let record = sink.decoded(0);
    let kinds: Vec<ValueKind> = record.contexts.iter().map(|c| c.kind()).collect();
    assert_eq!(kinds, ValueKind::ALL.to_vec());
    assert_eq!(record.context("time").unwrap().value, Value::Time(tm));
    assert_eq!(record.context("str").unwrap().value, Value::from("text"));
}

#[test]
fn test_generic_value_and_mark() {
    let (logger, sink) = logger();
    logger
        .warn()
        .mark()
        .value("answer", Value::Int64(42))
        .commit();

    let record = sink.decoded(0);
    assert!(record.mark);
    assert_eq!(record.contexts[0].value, Value::Int64(42));
}

#[test]
fn test_formatted_message() {
    let (logger, sink) = logger();
    let port = 8080;
    logger
        .info()
        .msg_fmt(format_args!("listening on {}", port))
        .commit();
    logger.info().msg_fmt(format_args!("literal")).commit();

    assert_eq!(sink.decoded(0).msg, "listening on 8080");
    assert_eq!(sink.decoded(1).msg, "literal");
}

#[test]
fn test_formatted_message_skipped_when_filtered() {
    struct Loud;
    impl std::fmt::Display for Loud {
        fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            panic!("formatted a filtered message");
        }
    }

    let config = LoggerConfig::builder().level(Some(Level::Error)).build();
    let (logger, sink) = logger_with(config);
    logger.debug().msg_fmt(format_args!("{}", Loud)).commit();
    assert_eq!(sink.len(), 0);
}

#[test]
fn test_field_order_on_wire() {
    let config = LoggerConfig::builder().file_line(true).build();
    let (logger, sink) = logger_with(config);
    logger.info().mark().msg("m").i32("n", 1).commit();

    let raw = sink.raw(0);
    let body = &raw[HEADER_SIZE..];
    assert_eq!(body[0], FieldKind::Level as u8);
    assert_eq!(body[2], FieldKind::Pkg as u8);
    // Pkg "svc" occupies 1 + 3 bytes, then File.
    assert_eq!(body[7], FieldKind::File as u8);

    let tail = &raw[raw.len() - 10..];
    assert_eq!(tail[0], FieldKind::Timestamp as u8);
    assert_eq!(tail[9], FieldKind::End as u8);
}

#[test]
fn test_file_line_records_caller() {
    let config = LoggerConfig::builder().file_line(true).build();
    let (logger, sink) = logger_with(config);

    let (entry, line) = (logger.info(), line!());
    entry.msg("here").commit();

    let record = sink.decoded(0);
    assert_eq!(record.file, "entry_tests.rs");
    assert_eq!(record.line, line);
}

// =============================================================================
// Level Filtering Tests
// =============================================================================

#[test]
fn test_below_level_is_noop() {
    let config = LoggerConfig::builder().level(Some(Level::Warn)).build();
    let (logger, sink) = logger_with(config);

    let entry = logger.info().msg("ignored").str("k", "v").mark();
    assert!(!entry.is_active());
    entry.commit();
    logger.error().msg("kept").commit();

    assert_eq!(sink.len(), 1);
    assert_eq!(sink.decoded(0).msg, "kept");
    assert!(logger.enabled(Level::Warn));
    assert!(!logger.enabled(Level::Info));
}

#[test]
fn test_level_off_disables_everything() {
    let config = LoggerConfig::builder().level(None).build();
    let (logger, sink) = logger_with(config);
    logger.fatal().msg("nothing").commit();
    assert_eq!(sink.len(), 0);
}

#[test]
fn test_uncommitted_entry_is_discarded() {
    let (logger, sink) = logger();
    let _ = logger.info().msg("dropped");
    assert_eq!(sink.len(), 0);
}

#[test]
fn test_set_config_changes_level() {
    let (logger, _sink) = logger();
    assert!(logger.enabled(Level::Debug));

    let config = LoggerConfig::builder()
        .level(Some(Level::Error))
        .console(false)
        .build();
    logger.set_config(config.clone()).unwrap();
    assert!(!logger.enabled(Level::Debug));
    assert_eq!(logger.config(), config);
}

#[test]
fn test_set_config_rejects_invalid() {
    let (logger, _sink) = logger();
    let bad = LoggerConfig::builder().file_dir("").build();
    assert!(logger.set_config(bad).is_err());
    assert_eq!(logger.config(), LoggerConfig::default());
}

// =============================================================================
// Pool Tests
// =============================================================================

#[test]
fn test_buffers_are_recycled() {
    let (logger, sink) = logger();
    for i in 0..10 {
        logger.debug().msg("loop").u32("i", i).commit();
    }
    assert_eq!(sink.len(), 10);
    assert_eq!(logger.pool().idle(), 1);
}

#[test]
fn test_concurrent_logging() {
    let (logger, sink) = logger();
    let logger = Arc::new(logger);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                for i in 0..25u32 {
                    logger.info().u32("thread", t).u32("i", i).commit();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(sink.len(), 100);
    for i in 0..sink.len() {
        assert_eq!(sink.decoded(i).contexts.len(), 2);
    }
}
