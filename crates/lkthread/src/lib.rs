//! # lkthread - kernel thread context layer
//!
//! The architecture-specific piece of a small kernel's thread support:
//! how a suspended thread's registers are stored, how a never-run thread's
//! first context is built, and how the CPU moves from one thread to another.
//!
//! ## Quick Start
//!
//! ```ignore
//! use lkthread::{Thread, CoopKernel, arch_thread_initialize, coop};
//! use std::ptr::NonNull;
//!
//! fn hello(_arg: usize) -> i32 {
//!     42
//! }
//!
//! let mut boot = Thread::bootstrap("bootstrap");
//! CoopKernel::install(NonNull::from(&mut boot));
//!
//! let mut stack = vec![0u128; 1024];
//! let mut t = Thread::new("hello", hello, 0, stack.as_mut_ptr().cast(), 16 * 1024)?;
//! arch_thread_initialize(&mut t);
//!
//! unsafe { coop::switch_to(NonNull::from(&mut t)) };
//! assert_eq!(CoopKernel::take_exit().map(|(_, code)| code), Some(42));
//! ```
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Scheduler (collaborator)                    │
//! │   current thread, critical section, thread_exit, policy     │
//! └─────────────────────────────────────────────────────────────┘
//!            │ arch_thread_initialize      │ arch_context_switch
//!            ▼                             ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 lkthread-runtime                            │
//! │   trampoline, per-CPU slots, arch backend (asm)             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 lkthread-core                               │
//! │   frame layouts, Thread descriptor, ThreadKernel trait      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub use lkthread_core::{
    constants, env, frame, ContextFrame, LogLevel, SwitchFrame, Thread, ThreadError,
    ThreadKernel, ThreadResult, ThreadStartRoutine, env_get, env_get_bool, set_log_level,
};
pub use lkthread_core::{kdebug, kerror, kfatal, kinfo, klog, ktrace, kwarn};

pub use lkthread_runtime::{
    arch_context_switch, arch_thread_initialize, coop, critical, current_arch, percpu,
    ContextConfig, CoopKernel, RESUME_BIAS,
};
pub use lkthread_runtime::{install_kernel, installed_kernel, uninstall_kernel};
