//! Named logger registry
//!
//! Explicit replacement for a process-wide logger table: create one
//! registry, pass it where loggers are needed.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::LoggerConfig;
use crate::error::Result;
use crate::pool::BufferPool;

use super::Logger;

/// Create-or-get table of loggers sharing one buffer pool
pub struct LoggerRegistry {
    default_config: LoggerConfig,
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
    pool: Arc<BufferPool>,
}

impl LoggerRegistry {
    /// New loggers start with `default_config`
    pub fn new(default_config: LoggerConfig) -> Result<Self> {
        default_config.validate()?;
        Ok(Self {
            default_config,
            loggers: Mutex::new(HashMap::new()),
            pool: Arc::new(BufferPool::default()),
        })
    }

    /// Logger registered under `name`, created on first use
    pub fn get(&self, name: &str) -> Result<Arc<Logger>> {
        let mut loggers = self.loggers.lock();
        if let Some(logger) = loggers.get(name) {
            return Ok(Arc::clone(logger));
        }

        let logger = Arc::new(
            Logger::new(name, self.default_config.clone())?.with_pool(Arc::clone(&self.pool)),
        );
        loggers.insert(name.to_string(), Arc::clone(&logger));
        tracing::debug!(logger = %name, "registered logger");
        Ok(logger)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.loggers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
