//! Per-CPU collaborator slot
//!
//! The trampoline takes no arguments, so the scheduler registers its
//! [`ThreadKernel`] here before the first switch into a new thread. On a
//! host each OS thread plays one CPU, hence the slot is thread-local.

use lkthread_core::ThreadKernel;
use std::cell::Cell;

thread_local! {
    static KERNEL: Cell<Option<&'static dyn ThreadKernel>> = const { Cell::new(None) };
}

/// Register the collaborator for threads started on this CPU
#[inline]
pub fn install_kernel(kernel: &'static dyn ThreadKernel) {
    KERNEL.with(|k| k.set(Some(kernel)));
}

/// Remove the collaborator (CPU going offline)
#[inline]
pub fn uninstall_kernel() {
    KERNEL.with(|k| k.set(None));
}

/// Collaborator registered on this CPU, if any
#[inline]
pub fn installed_kernel() -> Option<&'static dyn ThreadKernel> {
    KERNEL.with(|k| k.get())
}
