//! Per-CPU current-thread slot
//!
//! Written by the scheduler around every switch, read by its
//! `ThreadKernel::current_thread`. The context layer never writes it.

use lkthread_core::Thread;
use std::cell::Cell;
use std::ptr::NonNull;

thread_local! {
    static CURRENT_THREAD: Cell<Option<NonNull<Thread>>> = const { Cell::new(None) };
}

#[inline]
pub fn set_current_thread(t: NonNull<Thread>) {
    CURRENT_THREAD.with(|cell| cell.set(Some(t)));
}

#[inline]
pub fn current_thread() -> Option<NonNull<Thread>> {
    CURRENT_THREAD.with(|cell| cell.get())
}

#[inline]
pub fn clear_current_thread() {
    CURRENT_THREAD.with(|cell| cell.set(None));
}
