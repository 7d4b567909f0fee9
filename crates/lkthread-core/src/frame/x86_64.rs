//! x86_64 context-switch frame (callee-saved per System V AMD64 ABI)

use core::fmt;

use super::SwitchFrame;

/// Saved registers for a voluntary switch
///
/// Layout (offsets are stable for ASM access):
/// ```text
/// 0x00: rsp
/// 0x08: rip  - resume address
/// 0x10: rbx
/// 0x18: rbp
/// 0x20: r12
/// 0x28: r13
/// 0x30: r14
/// 0x38: r15
/// ```
#[repr(C)]
#[derive(Clone, Default, PartialEq, Eq)]
pub struct X86_64Frame {
    pub rsp: u64,
    pub rip: u64,
    pub rbx: u64,
    pub rbp: u64,
    pub r12: u64,
    pub r13: u64,
    pub r14: u64,
    pub r15: u64,
}

/// Size of the frame in bytes
pub const X86_64_FRAME_SIZE: usize = 64;

impl SwitchFrame for X86_64Frame {
    // The switch ends in `jmp` to the saved rip, which needs no adjustment.
    const RESUME_BIAS: usize = 0;
    const STACK_ALIGN: usize = 16;

    #[inline]
    fn stack_pointer(&self) -> usize {
        self.rsp as usize
    }

    #[inline]
    fn resume_address(&self) -> usize {
        self.rip as usize
    }

    fn prepare(&mut self, stack_top: usize, trampoline: usize) {
        self.clear();
        self.rsp = stack_top as u64;
        self.rip = trampoline.wrapping_sub(Self::RESUME_BIAS) as u64;
    }
}

impl fmt::Debug for X86_64Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X86_64Frame {{ rsp: {:#x}, rip: {:#x}, rbx: {:#x}, rbp: {:#x}, \
             r12: {:#x}, r13: {:#x}, r14: {:#x}, r15: {:#x} }}",
            self.rsp, self.rip, self.rbx, self.rbp, self.r12, self.r13, self.r14, self.r15
        )
    }
}
