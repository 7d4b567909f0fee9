//! Architecture-specific context switching
//!
//! Exactly one backend is compiled per target. Each provides:
//! - `prepare_frame` - fill a never-run frame for the configured stack top
//! - `context_switch` - save into one frame, load from another
//! - `thread_entry_address` - where a fresh frame lands

cfg_if::cfg_if! {
    if #[cfg(target_arch = "x86_64")] {
        pub mod x86_64;
    } else if #[cfg(target_arch = "aarch64")] {
        pub mod aarch64;
    } else if #[cfg(target_arch = "microblaze")] {
        pub mod microblaze;
    }
}
