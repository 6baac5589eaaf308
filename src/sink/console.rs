//! Console sink: renders each record as one text line on stderr.

use std::io::{self, Write};

use chrono::{DateTime, Utc};

use crate::error::GlogError;
use crate::text::binary_to_text;

use super::{ErrorHandler, Sink};

pub struct ConsoleSink {
    coloring: bool,
    on_error: ErrorHandler,
}

impl ConsoleSink {
    pub fn new(coloring: bool, on_error: ErrorHandler) -> Self {
        Self { coloring, on_error }
    }
}

impl Sink for ConsoleSink {
    fn write(&self, record: &[u8], time: DateTime<Utc>) {
        let line = match binary_to_text(record, self.coloring) {
            Ok(line) => line,
            Err(e) => return (self.on_error)(time, &GlogError::from(e)),
        };

        let mut stderr = io::stderr().lock();
        if let Err(e) = stderr.write_all(line.as_bytes()) {
            (self.on_error)(time, &GlogError::Io(e));
        }
    }
}
