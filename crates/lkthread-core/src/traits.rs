//! Collaborator interface
//!
//! The context layer does not own the current-thread pointer, the
//! critical section, or thread teardown. A scheduler provides them through
//! this trait; the trampoline is the only caller.

use core::ptr::NonNull;

use crate::thread::Thread;

/// Kernel services the trampoline needs from the scheduler
pub trait ThreadKernel: Sync {
    /// Descriptor of the thread whose registers are live on this CPU.
    ///
    /// The scheduler updates it before every switch; the context layer
    /// only reads it.
    fn current_thread(&self) -> NonNull<Thread>;

    /// Leave the critical section that is held across every switch.
    fn exit_critical_section(&self);

    /// Terminate the calling thread with `retcode`. Never returns.
    fn thread_exit(&self, retcode: i32) -> !;
}
