//! Error types for glog
//!
//! `DecodeError` is the complete error surface of the record decoder;
//! `GlogError` is the unified error for everything else (config, sinks).

use std::io;

use thiserror::Error;

/// Result type alias using GlogError
pub type Result<T> = std::result::Result<T, GlogError>;

/// Errors produced while decoding binary records
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Clean end of stream: no further record starts here.
    #[error("decode binary record: end of file")]
    Eof,

    /// Transport failure, or end of input inside a header, scan or field.
    #[error("decode binary record: {0}")]
    Io(#[from] io::Error),

    /// Strict mode only: the stream is not positioned at a record header.
    #[error("decode binary record: unmatched magic {}", hex(.got))]
    Magic { got: Vec<u8> },

    #[error("decode binary record: unsupported version {got}")]
    Version { got: u8 },

    /// Illegal tag, value kind, level or bool byte.
    #[error("decode binary record: {reason}")]
    Format { reason: String },
}

impl DecodeError {
    pub(crate) fn format(reason: impl Into<String>) -> Self {
        DecodeError::Format {
            reason: reason.into(),
        }
    }

    pub(crate) fn unexpected_eof() -> Self {
        DecodeError::Io(io::Error::from(io::ErrorKind::UnexpectedEof))
    }

    /// True for the clean end-of-stream sentinel
    pub fn is_eof(&self) -> bool {
        matches!(self, DecodeError::Eof)
    }

    /// True for transport failures and truncated input
    pub fn is_io(&self) -> bool {
        matches!(self, DecodeError::Io(_))
    }

    /// True when resynchronizing on the same stream can make progress
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DecodeError::Magic { .. } | DecodeError::Version { .. } | DecodeError::Format { .. }
        )
    }
}

/// Unified error type for glog operations
#[derive(Debug, Error)]
pub enum GlogError {
    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error(transparent)]
    Decode(#[from] DecodeError),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Sink Errors
    // -------------------------------------------------------------------------
    #[error("Sink error: {0}")]
    Sink(String),
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
