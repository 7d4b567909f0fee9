//! Leveled stderr logging for the context layer
//!
//! Every record is written under one stderr lock, so lines from the init,
//! switch and trampoline paths never interleave. The level comes from
//! `LKT_LOG_LEVEL` (name or 0-5) the first time anything logs, unless
//! [`set_log_level`] ran first.
//!
//! ```ignore
//! use lkthread_core::{kdebug, kfatal, ktrace};
//!
//! ktrace!("old {:p}, new {:p}", old, new);
//! kdebug!("thread {} exited with {}", name, code);
//! kfatal!("no kernel installed on this cpu");
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    const ALL: [LogLevel; 6] = [
        LogLevel::Off,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    /// Parse a level name or digit; `None` for anything unrecognised
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(n) = s.parse::<usize>() {
            return Self::ALL.get(n).copied();
        }
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s))
    }

    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Whether a logger set to `self` emits records at `record`
    #[inline]
    pub fn allows(self, record: LogLevel) -> bool {
        record != LogLevel::Off && record <= self
    }

    fn tag(self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[lkt ERROR]",
            LogLevel::Warn => "[lkt WARN ]",
            LogLevel::Info => "[lkt INFO ]",
            LogLevel::Debug => "[lkt DEBUG]",
            LogLevel::Trace => "[lkt TRACE]",
        }
    }
}

/// Not yet read from the environment
const UNSET: u8 = u8::MAX;

static LEVEL: AtomicU8 = AtomicU8::new(UNSET);

/// Current level, reading `LKT_LOG_LEVEL` on first call
pub fn log_level() -> LogLevel {
    let raw = LEVEL.load(Ordering::Relaxed);
    if let Some(&level) = LogLevel::ALL.get(raw as usize) {
        return level;
    }

    let from_env = std::env::var("LKT_LOG_LEVEL")
        .ok()
        .and_then(|v| LogLevel::parse(&v))
        .unwrap_or(LogLevel::Info);
    // A concurrent set_log_level wins over the environment.
    match LEVEL.compare_exchange(UNSET, from_env as u8, Ordering::Relaxed, Ordering::Relaxed) {
        Ok(_) => from_env,
        Err(raw) => LogLevel::ALL.get(raw as usize).copied().unwrap_or(from_env),
    }
}

/// Set the level, overriding `LKT_LOG_LEVEL`
pub fn set_log_level(level: LogLevel) {
    LEVEL.store(level as u8, Ordering::Relaxed);
}

#[inline]
pub fn level_enabled(level: LogLevel) -> bool {
    log_level().allows(level)
}

#[doc(hidden)]
pub fn _klog_impl(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }
    let mut err = std::io::stderr().lock();
    let _ = writeln!(err, "{} {}", level.tag(), args);
}

#[doc(hidden)]
pub fn _kfatal_impl(args: std::fmt::Arguments<'_>) -> ! {
    let mut err = std::io::stderr().lock();
    let _ = writeln!(err, "[lkt FATAL] {}", args);
    let _ = err.flush();
    std::process::abort()
}

/// Log at an explicit [`LogLevel`]
#[macro_export]
macro_rules! klog {
    ($level:expr, $($arg:tt)*) => {
        $crate::kprint::_klog_impl($level, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! kerror {
    ($($arg:tt)*) => { $crate::klog!($crate::kprint::LogLevel::Error, $($arg)*) };
}

#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)*) => { $crate::klog!($crate::kprint::LogLevel::Warn, $($arg)*) };
}

#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)*) => { $crate::klog!($crate::kprint::LogLevel::Info, $($arg)*) };
}

#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)*) => { $crate::klog!($crate::kprint::LogLevel::Debug, $($arg)*) };
}

#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)*) => { $crate::klog!($crate::kprint::LogLevel::Trace, $($arg)*) };
}

/// Unrecoverable invariant violation: print, flush and abort
#[macro_export]
macro_rules! kfatal {
    ($($arg:tt)*) => {
        $crate::kprint::_kfatal_impl(format_args!($($arg)*))
    };
}
