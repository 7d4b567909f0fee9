//! # lkthread-runtime
//!
//! Architecture-specific half of the lkthread context layer.
//!
//! This crate provides:
//! - Context initialization for never-run threads
//! - The switch primitive (assembly, one backend per architecture)
//! - The first-run trampoline
//! - Per-CPU collaborator slots: installed kernel, current thread, critical section
//! - A minimal cooperative collaborator for boot code, demos and tests

pub mod config;
pub mod arch;
pub mod context;
pub mod kernel;
pub mod percpu;
pub mod critical;
pub mod coop;

// Re-exports
pub use config::ContextConfig;
pub use context::{arch_context_switch, arch_thread_initialize, RESUME_BIAS};
pub use kernel::{install_kernel, installed_kernel, uninstall_kernel};
pub use critical::{enter_critical_section, exit_critical_section, in_critical_section};
pub use coop::CoopKernel;

// Architecture detection
cfg_if::cfg_if! {
    if #[cfg(target_arch = "x86_64")] {
        pub use arch::x86_64 as current_arch;
    } else if #[cfg(target_arch = "aarch64")] {
        pub use arch::aarch64 as current_arch;
    } else if #[cfg(target_arch = "microblaze")] {
        pub use arch::microblaze as current_arch;
    } else {
        compile_error!("Unsupported architecture");
    }
}
