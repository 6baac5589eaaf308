//! Record definition
//!
//! One decoded log event. Built transiently by the decoder and owned by the
//! caller; `clear()` lets a stream consumer reuse one allocation.

use chrono::{DateTime, Utc};

use crate::level::Level;

use super::context::Context;

/// A single log event
#[derive(Debug, Clone, Default)]
pub struct Record {
    /// Commit time (nanosecond precision)
    pub time: DateTime<Utc>,

    pub level: Level,

    /// Originating logical component
    pub pkg: String,

    /// Source file name; empty when absent
    pub file: String,

    /// Source line; 0 when absent
    pub line: u32,

    pub msg: String,

    /// Highlight flag
    pub mark: bool,

    /// Typed attributes in wire order
    pub contexts: Vec<Context>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every field, keeping the context allocation
    pub fn clear(&mut self) {
        self.time = DateTime::<Utc>::default();
        self.level = Level::default();
        self.pkg.clear();
        self.file.clear();
        self.line = 0;
        self.msg.clear();
        self.mark = false;
        self.contexts.clear();
    }

    /// Look up the first context with `key`
    pub fn context(&self, key: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.key == key)
    }
}

// Context order is display order only; equality treats contexts as a multiset.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
            && self.level == other.level
            && self.pkg == other.pkg
            && self.file == other.file
            && self.line == other.line
            && self.msg == other.msg
            && self.mark == other.mark
            && same_contexts(&self.contexts, &other.contexts)
    }
}

fn same_contexts(a: &[Context], b: &[Context]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    a.iter().all(|ctx| {
        let found = b
            .iter()
            .enumerate()
            .position(|(i, other)| !used[i] && other == ctx);
        match found {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}
