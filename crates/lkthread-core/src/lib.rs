//! # lkthread-core
//!
//! Core types for the lkthread architecture context layer.
//!
//! This crate is platform-agnostic and contains no assembly.
//! Register transfer lives in `lkthread-runtime`.
//!
//! ## Modules
//!
//! - `frame` - Context frame layouts (repr(C)) for every supported CPU
//! - `thread` - Thread descriptor consumed by the context layer
//! - `traits` - Collaborator interface the trampoline calls into
//! - `error` - Error types
//! - `kprint` - Level-filtered logging macros
//! - `env` - Environment variable utilities

pub mod frame;
pub mod thread;
pub mod traits;
pub mod error;
pub mod kprint;
pub mod env;

// Re-exports for convenience
pub use frame::{ContextFrame, SwitchFrame};
pub use thread::{Thread, ThreadStartRoutine};
pub use traits::ThreadKernel;
pub use error::{ThreadError, ThreadResult};
pub use kprint::{set_log_level, LogLevel};
pub use env::{env_get, env_get_bool, env_get_opt, env_get_str, env_is_set};

/// Constants shared by descriptors and frames
pub mod constants {
    /// Smallest stack a thread descriptor accepts (4 KB)
    ///
    /// Covers the first-run path with trace logging on, which formats
    /// through stderr on the new thread's stack.
    pub const MIN_STACK_SIZE: usize = 4 * 1024;

    /// Default stack size for demo and test threads (16 KB)
    pub const DEFAULT_STACK_SIZE: usize = 16 * 1024;

    /// Maximum diagnostic name length kept in a descriptor
    pub const THREAD_NAME_LEN: usize = 32;
}
