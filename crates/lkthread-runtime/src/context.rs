//! Thread context entry points
//!
//! - [`arch_thread_initialize`] builds the frame of a never-run thread
//! - [`arch_context_switch`] moves the CPU from one thread to another
//! - `initial_thread_func` is the first code every new thread runs
//!
//! Threads start and switch inside the scheduler's critical section. A newly
//! started thread has no switch call to return through, so the trampoline
//! is what leaves that critical section before user code runs.

use std::ptr::NonNull;

use lkthread_core::frame::{ContextFrame, SwitchFrame};
use lkthread_core::{kfatal, ktrace, Thread};

use crate::config::{dump_threads_enabled, trace_enabled};
use crate::current_arch;
use crate::kernel::installed_kernel;

/// Bias the current target applies to a fresh frame's resume address
pub const RESUME_BIAS: usize = <ContextFrame as SwitchFrame>::RESUME_BIAS;

/// Prepare `t`'s frame so the first switch into it runs the trampoline on
/// the top of its stack.
///
/// The frame is wiped first, so reused descriptor memory is fine.
pub fn arch_thread_initialize(t: &mut Thread) {
    if trace_enabled() {
        ktrace!("t {:p} ({})", t, t.name());
    }

    let stack_top = t.stack_top();
    let frame = t.frame_mut();
    frame.clear();
    current_arch::prepare_frame(frame, stack_top);

    if dump_threads_enabled() {
        t.dump();
    }
}

/// Save the running registers into `old` and resume `new`.
///
/// Returns when a later switch resumes `old`.
///
/// # Safety
///
/// - `old` is the thread running on this CPU; `new` is a different thread
///   that was initialized or previously switched out, and is not running.
/// - Both descriptors stay alive and pinned until `old` is resumed.
/// - The caller holds the critical section and has already pointed the
///   current-thread slot at `new`.
pub unsafe fn arch_context_switch(old: NonNull<Thread>, new: NonNull<Thread>) {
    if trace_enabled() {
        let (o, n) = (old.as_ref(), new.as_ref());
        ktrace!("old {:p} ({}), new {:p} ({})", o, o.name(), n, n.name());
    }

    let old_frame = (*old.as_ptr()).frame_ptr();
    let new_frame = (*new.as_ptr()).frame_ptr();
    current_arch::context_switch(old_frame, new_frame);
}

/// First function of every new thread. Never returns.
pub(crate) extern "C" fn initial_thread_func() -> ! {
    let Some(kernel) = installed_kernel() else {
        kfatal!("initial_thread_func: no kernel installed on this cpu");
    };

    let ct = kernel.current_thread();
    let (entry, arg) = {
        // SAFETY: the scheduler points the slot at the thread it switched to
        // before switching, and keeps it alive while it runs.
        let t = unsafe { ct.as_ref() };
        if trace_enabled() {
            ktrace!("thread {:p} calling {:#x} with arg {:#x}", t, t.entry() as *const () as usize, t.arg());
        }
        (t.entry(), t.arg())
    };

    // exit the implicit critical section we're within
    kernel.exit_critical_section();

    let ret = entry(arg);

    if trace_enabled() {
        ktrace!("thread {:p} exiting with {}", ct.as_ptr(), ret);
    }

    kernel.thread_exit(ret)
}
