//! Per-CPU critical section
//!
//! Held across every context switch. Nesting is counted; the outermost
//! enter suppresses preemption and the matching exit restores it.
//!
//! On unix, preemption is the `SIGURG` signal a timer thread would send to
//! the CPU's OS thread, so it is blocked with `pthread_sigmask` for the
//! outermost section. Elsewhere only the depth is tracked.

use lkthread_core::kwarn;
use std::cell::Cell;

thread_local! {
    static DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// Enter (or nest) the critical section on this CPU
pub fn enter_critical_section() {
    DEPTH.with(|d| {
        let depth = d.get();
        if depth == 0 {
            mask::block_preemption();
        }
        d.set(depth + 1);
    });
}

/// Leave one level of the critical section
///
/// Unbalanced exits are logged and ignored.
pub fn exit_critical_section() {
    DEPTH.with(|d| {
        let depth = d.get();
        if depth == 0 {
            kwarn!("exit_critical_section: not in a critical section");
            return;
        }
        d.set(depth - 1);
        if depth == 1 {
            mask::restore_preemption();
        }
    });
}

#[inline]
pub fn in_critical_section() -> bool {
    critical_section_depth() > 0
}

#[inline]
pub fn critical_section_depth() -> u32 {
    DEPTH.with(|d| d.get())
}

/// Whether preemption is currently suppressed on this CPU
pub fn preemption_blocked() -> bool {
    mask::preemption_blocked()
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod mask {
            use lkthread_core::kerror;
            use nix::sys::signal::{pthread_sigmask, SigSet, SigmaskHow, Signal};
            use std::cell::Cell;

            /// Signal the preemption timer delivers
            const PREEMPT_SIGNAL: Signal = Signal::SIGURG;

            thread_local! {
                static SAVED_MASK: Cell<Option<SigSet>> = const { Cell::new(None) };
            }

            pub(super) fn block_preemption() {
                let mut set = SigSet::empty();
                set.add(PREEMPT_SIGNAL);
                let mut old = SigSet::empty();
                match pthread_sigmask(SigmaskHow::SIG_BLOCK, Some(&set), Some(&mut old)) {
                    Ok(()) => SAVED_MASK.with(|m| m.set(Some(old))),
                    Err(e) => kerror!("critical section: blocking {:?} failed: {}", PREEMPT_SIGNAL, e),
                }
            }

            pub(super) fn restore_preemption() {
                let Some(old) = SAVED_MASK.with(|m| m.take()) else {
                    return;
                };
                if let Err(e) = pthread_sigmask(SigmaskHow::SIG_SETMASK, Some(&old), None) {
                    kerror!("critical section: restoring signal mask failed: {}", e);
                }
            }

            pub(super) fn preemption_blocked() -> bool {
                let mut current = SigSet::empty();
                match pthread_sigmask(SigmaskHow::SIG_BLOCK, None, Some(&mut current)) {
                    Ok(()) => current.contains(PREEMPT_SIGNAL),
                    Err(_) => false,
                }
            }
        }
    } else {
        mod mask {
            pub(super) fn block_preemption() {}
            pub(super) fn restore_preemption() {}
            pub(super) fn preemption_blocked() -> bool {
                super::in_critical_section()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each #[test] runs on its own OS thread, i.e. its own CPU here.

    #[test]
    fn test_nesting() {
        assert_eq!(critical_section_depth(), 0);
        enter_critical_section();
        enter_critical_section();
        assert_eq!(critical_section_depth(), 2);
        exit_critical_section();
        assert!(in_critical_section());
        exit_critical_section();
        assert!(!in_critical_section());
    }

    #[test]
    fn test_unbalanced_exit_is_ignored() {
        lkthread_core::set_log_level(lkthread_core::LogLevel::Off);
        exit_critical_section();
        assert_eq!(critical_section_depth(), 0);
    }

    #[test]
    fn test_preemption_blocked_only_inside() {
        assert!(!preemption_blocked());
        enter_critical_section();
        assert!(preemption_blocked());
        enter_critical_section();
        exit_critical_section();
        assert!(preemption_blocked());
        exit_critical_section();
        assert!(!preemption_blocked());
    }
}
