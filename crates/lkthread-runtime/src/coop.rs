//! Minimal cooperative collaborator
//!
//! Enough kernel for boot code, demos and tests to drive the context layer:
//! the current-thread slot and critical section from this crate, plus a
//! `thread_exit` that records the exit code and switches back to a home
//! thread (usually the adopted boot thread), the way a worker's scheduler
//! context takes back a finished thread. There is no ready queue and no
//! policy: the caller decides who runs next with [`switch_to`].

use std::cell::Cell;
use std::ptr::NonNull;

use lkthread_core::{kdebug, kfatal, Thread, ThreadKernel};

use crate::context::arch_context_switch;
use crate::{critical, kernel, percpu};

/// Cooperative [`ThreadKernel`] backed by the per-CPU slots
pub struct CoopKernel;

static COOP_KERNEL: CoopKernel = CoopKernel;

thread_local! {
    /// Thread that exiting threads hand the CPU back to
    static HOME: Cell<Option<NonNull<Thread>>> = const { Cell::new(None) };

    /// Most recent exit not yet collected
    static LAST_EXIT: Cell<Option<(NonNull<Thread>, i32)>> = const { Cell::new(None) };
}

impl CoopKernel {
    /// Install on this CPU with `home` as the running thread.
    ///
    /// `home` is normally a [`Thread::bootstrap`] descriptor for the code
    /// calling this; it must outlive every thread started here.
    pub fn install(home: NonNull<Thread>) {
        HOME.with(|h| h.set(Some(home)));
        LAST_EXIT.with(|e| e.set(None));
        percpu::set_current_thread(home);
        kernel::install_kernel(&COOP_KERNEL);
    }

    /// Remove this CPU's collaborator and clear its slots
    pub fn uninstall() {
        kernel::uninstall_kernel();
        percpu::clear_current_thread();
        HOME.with(|h| h.set(None));
        LAST_EXIT.with(|e| e.set(None));
    }

    /// Collect the last thread that exited and its exit code
    pub fn take_exit() -> Option<(NonNull<Thread>, i32)> {
        LAST_EXIT.with(|e| e.take())
    }
}

impl ThreadKernel for CoopKernel {
    fn current_thread(&self) -> NonNull<Thread> {
        match percpu::current_thread() {
            Some(t) => t,
            None => kfatal!("coop: no current thread on this cpu"),
        }
    }

    fn exit_critical_section(&self) {
        critical::exit_critical_section();
    }

    fn thread_exit(&self, retcode: i32) -> ! {
        let current = self.current_thread();
        let Some(home) = HOME.with(|h| h.get()) else {
            kfatal!("coop: thread_exit with no home thread");
        };
        if current == home {
            kfatal!("coop: home thread called thread_exit({})", retcode);
        }

        kdebug!("coop: thread {:p} exited with {}", current.as_ptr(), retcode);
        LAST_EXIT.with(|e| e.set(Some((current, retcode))));

        // SAFETY: home is suspended (it is not current) and outlives us.
        unsafe { switch_to(home) };
        kfatal!("coop: exited thread {:p} was resumed", current.as_ptr());
    }
}

/// Hand the CPU to `next`; returns when something switches back.
///
/// Enters the critical section (checked to mask preemption in debug
/// builds), repoints the current-thread slot, switches,
/// and leaves the critical section once this thread runs again. Switching
/// to the current thread is a no-op.
///
/// # Safety
///
/// `next` must be a live, initialized or switched-out thread that is not
/// running, and must stay pinned while it can be resumed.
pub unsafe fn switch_to(next: NonNull<Thread>) {
    let Some(old) = percpu::current_thread() else {
        kfatal!("coop: switch_to with no current thread");
    };
    if old == next {
        return;
    }

    critical::enter_critical_section();
    debug_assert!(critical::preemption_blocked(), "switch_to: preemption still deliverable");
    percpu::set_current_thread(next);
    arch_context_switch(old, next);
    critical::exit_critical_section();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_sets_slots() {
        let mut boot = Thread::bootstrap("bootstrap");
        let ptr = NonNull::from(&mut boot);

        CoopKernel::install(ptr);
        assert_eq!(percpu::current_thread(), Some(ptr));
        assert!(kernel::installed_kernel().is_some());
        assert_eq!(COOP_KERNEL.current_thread(), ptr);

        CoopKernel::uninstall();
        assert!(percpu::current_thread().is_none());
        assert!(kernel::installed_kernel().is_none());
        assert!(CoopKernel::take_exit().is_none());
    }

    #[test]
    fn test_switch_to_self_is_noop() {
        let mut boot = Thread::bootstrap("bootstrap");
        CoopKernel::install(NonNull::from(&mut boot));

        unsafe { switch_to(NonNull::from(&mut boot)) };
        assert_eq!(critical::critical_section_depth(), 0);
        assert_eq!(*boot.frame(), lkthread_core::ContextFrame::default());

        CoopKernel::uninstall();
    }

    thread_local! {
        static SEEN_BLOCKED: Cell<Option<bool>> = const { Cell::new(None) };
    }

    fn record_preemption(_arg: usize) -> i32 {
        SEEN_BLOCKED.with(|s| s.set(Some(critical::preemption_blocked())));
        0
    }

    #[test]
    fn test_preemption_restored_around_switches() {
        #[repr(C, align(16))]
        struct Stack([u8; 64 * 1024]);

        let mut stack = Box::new(Stack([0; 64 * 1024]));
        let mut boot = Box::new(Thread::bootstrap("bootstrap"));
        CoopKernel::install(NonNull::from(&mut *boot));

        let mut t = Box::new(
            Thread::new("rec", record_preemption, 0, stack.0.as_mut_ptr(), 64 * 1024).unwrap(),
        );
        crate::context::arch_thread_initialize(&mut t);
        unsafe { switch_to(NonNull::from(&mut *t)) };

        // The entry ran with preemption deliverable again
        assert_eq!(SEEN_BLOCKED.with(|s| s.get()), Some(false));
        assert!(!critical::preemption_blocked());
        assert_eq!(CoopKernel::take_exit().map(|(_, r)| r), Some(0));

        CoopKernel::uninstall();
    }
}
