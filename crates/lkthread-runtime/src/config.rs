//! Context layer configuration
//!
//! Settings are read from the environment on first use, or set explicitly
//! with [`ContextConfig::apply`]. The init and switch paths only read two
//! relaxed atomics.

use lkthread_core::constants::DEFAULT_STACK_SIZE;
use lkthread_core::env::{env_get, env_get_bool, env_get_opt};
use lkthread_core::kprint::{self, LogLevel};
use std::sync::atomic::{AtomicBool, Ordering};

static TRACE: AtomicBool = AtomicBool::new(false);
static DUMP_THREADS: AtomicBool = AtomicBool::new(false);
static CONFIGURED: AtomicBool = AtomicBool::new(false);

/// Configuration for the context layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    /// Log every initialize/switch/trampoline step at trace level
    pub trace: bool,

    /// Dump each thread descriptor after it is initialized
    pub dump_threads: bool,

    /// Log level to install; `None` keeps the current one
    pub log_level: Option<LogLevel>,

    /// Stack size demos and benches allocate per thread
    pub stack_size: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            trace: false,
            dump_threads: false,
            log_level: None,
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl ContextConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `LKT_TRACE`, `LKT_DUMP_THREADS`, `LKT_LOG_LEVEL` and
    /// `LKT_STACK_SIZE`, falling back to the defaults.
    pub fn from_env() -> Self {
        let log_level = env_get_opt::<String>("LKT_LOG_LEVEL")
            .as_deref()
            .and_then(LogLevel::parse);

        Self {
            trace: env_get_bool("LKT_TRACE", false),
            dump_threads: env_get_bool("LKT_DUMP_THREADS", false),
            log_level,
            stack_size: env_get("LKT_STACK_SIZE", DEFAULT_STACK_SIZE),
        }
    }

    pub fn trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }

    pub fn dump_threads(mut self, enabled: bool) -> Self {
        self.dump_threads = enabled;
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = size;
        self
    }

    /// Install these settings process-wide
    pub fn apply(&self) {
        TRACE.store(self.trace, Ordering::Relaxed);
        DUMP_THREADS.store(self.dump_threads, Ordering::Relaxed);
        if let Some(level) = self.log_level {
            kprint::set_log_level(level);
        }
        CONFIGURED.store(true, Ordering::Release);
    }
}

#[inline]
fn ensure_configured() {
    if !CONFIGURED.load(Ordering::Acquire) {
        ContextConfig::from_env().apply();
    }
}

/// Whether per-operation trace logging is on
#[inline]
pub fn trace_enabled() -> bool {
    ensure_configured();
    TRACE.load(Ordering::Relaxed)
}

/// Whether threads are dumped after initialization
#[inline]
pub fn dump_threads_enabled() -> bool {
    ensure_configured();
    DUMP_THREADS.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ContextConfig::new()
            .trace(true)
            .dump_threads(true)
            .log_level(LogLevel::Debug)
            .stack_size(8192);

        assert!(config.trace);
        assert!(config.dump_threads);
        assert_eq!(config.log_level, Some(LogLevel::Debug));
        assert_eq!(config.stack_size, 8192);
    }

    #[test]
    fn test_defaults() {
        let config = ContextConfig::default();
        assert!(!config.trace);
        assert!(!config.dump_threads);
        assert_eq!(config.log_level, None);
        assert_eq!(config.stack_size, DEFAULT_STACK_SIZE);
    }
}
