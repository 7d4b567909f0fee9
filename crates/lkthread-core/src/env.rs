//! Environment variable utilities
//!
//! Runtime knobs (`LKT_TRACE`, `LKT_DUMP_THREADS`, `LKT_STACK_SIZE`, ...)
//! are read through these helpers so every variable parses the same way.
//!
//! ```ignore
//! use lkthread_core::env::{env_get, env_get_bool};
//!
//! let stack_size: usize = env_get("LKT_STACK_SIZE", 16 * 1024);
//! let trace = env_get_bool("LKT_TRACE", false);
//! ```

use std::str::FromStr;

/// Get environment variable parsed as `T`, or `default` when unset or
/// unparsable.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    env_get_opt(key).unwrap_or(default)
}

/// Get environment variable as boolean
///
/// "1", "true", "yes", "on" (any case) are true; any other value is false.
/// Unset returns `default`.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

/// `Some(T)` if the variable is set and parses, `None` otherwise
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Get environment variable as string, or `default`
#[inline]
pub fn env_get_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Check if environment variable is set (regardless of value)
#[inline]
pub fn env_is_set(key: &str) -> bool {
    std::env::var_os(key).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns its variable names so parallel tests never collide.

    #[test]
    fn test_unset_defaults() {
        let key = "__LKT_TEST_UNSET__";
        assert_eq!(env_get::<usize>(key, 4096), 4096);
        assert!(env_get_bool(key, true));
        assert!(env_get_opt::<u32>(key).is_none());
        assert_eq!(env_get_str(key, "boot"), "boot");
        assert!(!env_is_set(key));
    }

    #[test]
    fn test_env_get_parses_and_trims() {
        std::env::set_var("__LKT_TEST_STACK__", " 8192 ");
        assert_eq!(env_get::<usize>("__LKT_TEST_STACK__", 0), 8192);
        std::env::remove_var("__LKT_TEST_STACK__");
    }

    #[test]
    fn test_env_get_invalid_falls_back() {
        std::env::set_var("__LKT_TEST_BAD__", "sixteen");
        assert_eq!(env_get::<usize>("__LKT_TEST_BAD__", 16), 16);
        std::env::remove_var("__LKT_TEST_BAD__");
    }

    #[test]
    fn test_env_get_bool_variants() {
        let key = "__LKT_TEST_BOOL__";
        for v in ["1", "true", "TRUE", "yes", "on"] {
            std::env::set_var(key, v);
            assert!(env_get_bool(key, false), "{v} should be true");
        }
        for v in ["0", "false", "off", "garbage"] {
            std::env::set_var(key, v);
            assert!(!env_get_bool(key, true), "{v} should be false");
        }
        std::env::remove_var(key);
    }

    #[test]
    fn test_env_is_set_empty_value() {
        std::env::set_var("__LKT_TEST_EMPTY__", "");
        assert!(env_is_set("__LKT_TEST_EMPTY__"));
        std::env::remove_var("__LKT_TEST_EMPTY__");
    }
}
