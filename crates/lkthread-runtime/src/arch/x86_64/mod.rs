//! x86_64 context switching implementation
//!
//! The switch saves rsp, a resume rip and the System V callee-saved
//! registers, then jumps to the new frame's rip. A suspended thread's rip
//! is the `ret` at the end of `context_switch`, so it resumes by returning
//! to its caller. A fresh thread's rip is `thread_start`.

use lkthread_core::frame::{SwitchFrame, X86_64Frame};
use std::arch::naked_asm;

use crate::context::initial_thread_func;

/// Fill a never-run frame: rsp at `stack_top`, rip at `thread_start`.
#[inline]
pub fn prepare_frame(frame: &mut X86_64Frame, stack_top: usize) {
    frame.prepare(stack_top, thread_entry_address());
}

/// Address a fresh frame lands on
#[inline]
pub fn thread_entry_address() -> usize {
    thread_start as *const () as usize
}

/// First instruction of a new thread
///
/// The frame holds the raw stack top, which is 16-byte aligned. The ABI
/// wants rsp + 8 aligned at function entry, which the `call` provides.
/// rbp is cleared so backtraces stop here.
#[unsafe(naked)]
unsafe extern "C" fn thread_start() {
    naked_asm!(
        "xor ebp, ebp",
        "and rsp, -16",
        "call {trampoline}",
        "ud2",
        trampoline = sym initial_thread_func,
    );
}

/// Save callee-saved registers to `old` and load them from `new`.
///
/// Returns when some later switch loads `old` again.
///
/// # Safety
///
/// `old` must be writable. `new` must hold a frame prepared by
/// `prepare_frame` or saved by a previous switch, whose stack is still live.
#[unsafe(naked)]
pub unsafe extern "C" fn context_switch(_old: *mut X86_64Frame, _new: *const X86_64Frame) {
    naked_asm!(
        // Save into old (RDI)
        "mov [rdi + 0x00], rsp",
        "lea rax, [rip + 2f]",
        "mov [rdi + 0x08], rax",
        "mov [rdi + 0x10], rbx",
        "mov [rdi + 0x18], rbp",
        "mov [rdi + 0x20], r12",
        "mov [rdi + 0x28], r13",
        "mov [rdi + 0x30], r14",
        "mov [rdi + 0x38], r15",
        // Load from new (RSI)
        "mov rsp, [rsi + 0x00]",
        "mov rax, [rsi + 0x08]",
        "mov rbx, [rsi + 0x10]",
        "mov rbp, [rsi + 0x18]",
        "mov r12, [rsi + 0x20]",
        "mov r13, [rsi + 0x28]",
        "mov r14, [rsi + 0x30]",
        "mov r15, [rsi + 0x38]",
        "jmp rax",
        // Resume point of a saved frame
        "2:",
        "ret",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_frame_targets_thread_start() {
        let mut frame = X86_64Frame::default();
        prepare_frame(&mut frame, 0x10_0000);
        assert_eq!(frame.rsp, 0x10_0000);
        assert_eq!(frame.landing_address(), thread_start as *const () as usize);
        assert_eq!((frame.rbx, frame.rbp, frame.r12, frame.r15), (0, 0, 0, 0));
    }
}
