//! aarch64 context switching implementation
//!
//! Same shape as the x86_64 backend: the frame records sp, a resume pc and
//! the AAPCS64 callee-saved set (x19-x28, fp, lr, d8-d15), and the switch
//! ends with `br` to the new pc.

use lkthread_core::frame::{Aarch64Frame, SwitchFrame};
use std::arch::naked_asm;

use crate::context::initial_thread_func;

/// Fill a never-run frame: sp at `stack_top`, pc at `thread_start`.
#[inline]
pub fn prepare_frame(frame: &mut Aarch64Frame, stack_top: usize) {
    frame.prepare(stack_top, thread_entry_address());
}

/// Address a fresh frame lands on
#[inline]
pub fn thread_entry_address() -> usize {
    thread_start as *const () as usize
}

/// First instruction of a new thread: zero fp/lr to end the frame chain,
/// keep sp 16-byte aligned, call the trampoline.
#[unsafe(naked)]
unsafe extern "C" fn thread_start() {
    naked_asm!(
        "mov x29, xzr",
        "mov x30, xzr",
        "mov x9, sp",
        "and x9, x9, #0xfffffffffffffff0",
        "mov sp, x9",
        "bl {trampoline}",
        "brk #0x1",
        trampoline = sym initial_thread_func,
    );
}

/// Save callee-saved registers to `old` and load them from `new`.
///
/// # Safety
///
/// `old` must be writable. `new` must hold a frame prepared by
/// `prepare_frame` or saved by a previous switch, whose stack is still live.
#[unsafe(naked)]
pub unsafe extern "C" fn context_switch(_old: *mut Aarch64Frame, _new: *const Aarch64Frame) {
    naked_asm!(
        // Save into old (x0)
        "mov x9, sp",
        "str x9, [x0, #0x00]",
        "adr x10, 2f",
        "str x10, [x0, #0x08]",
        "stp x19, x20, [x0, #0x10]",
        "stp x21, x22, [x0, #0x20]",
        "stp x23, x24, [x0, #0x30]",
        "stp x25, x26, [x0, #0x40]",
        "stp x27, x28, [x0, #0x50]",
        "stp x29, x30, [x0, #0x60]",
        "stp d8, d9, [x0, #0x70]",
        "stp d10, d11, [x0, #0x80]",
        "stp d12, d13, [x0, #0x90]",
        "stp d14, d15, [x0, #0xa0]",
        // Load from new (x1)
        "ldr x9, [x1, #0x00]",
        "mov sp, x9",
        "ldr x10, [x1, #0x08]",
        "ldp x19, x20, [x1, #0x10]",
        "ldp x21, x22, [x1, #0x20]",
        "ldp x23, x24, [x1, #0x30]",
        "ldp x25, x26, [x1, #0x40]",
        "ldp x27, x28, [x1, #0x50]",
        "ldp x29, x30, [x1, #0x60]",
        "ldp d8, d9, [x1, #0x70]",
        "ldp d10, d11, [x1, #0x80]",
        "ldp d12, d13, [x1, #0x90]",
        "ldp d14, d15, [x1, #0xa0]",
        "br x10",
        // Resume point of a saved frame; lr was restored above
        "2:",
        "ret",
    );
}
