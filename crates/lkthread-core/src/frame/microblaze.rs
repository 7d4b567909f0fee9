//! MicroBlaze context-switch frame
//!
//! Layout (offsets are stable for ASM access):
//! ```text
//! 0x00: r1   - stack pointer
//! 0x04: r2   - read-only small data anchor (_SDA2_BASE_)
//! 0x08: r13  - read-write small data anchor (_SDA_BASE_)
//! 0x0C: r14  - interrupt return address
//! 0x10: r15  - link register, doubles as the resume address
//! 0x14: r16  - break return address
//! 0x18: r17  - exception return address
//! 0x1C: r18  - assembler temporary
//! 0x20: r19..r31 - callee-saved (13 words)
//! ```

use core::fmt;

use super::SwitchFrame;

/// Callee-saved and dedicated registers of one suspended MicroBlaze thread
#[repr(C)]
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MicroBlazeFrame {
    pub r1: u32,
    pub r2: u32,
    pub r13: u32,
    pub r14: u32,
    pub r15: u32,
    pub r16: u32,
    pub r17: u32,
    pub r18: u32,
    pub callee: [u32; 13],
}

/// Size of the frame in bytes (21 words)
pub const MICROBLAZE_FRAME_SIZE: usize = 0x54;

impl MicroBlazeFrame {
    /// The switch returns with `rtsd r15, 8`: a MicroBlaze call (`brlid`)
    /// leaves r15 pointing at the call itself and the delay slot follows it,
    /// so a normal return lands at r15 + 8. A fresh frame therefore stores
    /// `trampoline - 8` in r15.
    pub const RTSD_OFFSET: usize = 8;

    /// Load the small data anchors the ABI expects in r2 and r13.
    ///
    /// These are global to the image, not per-thread, so the initializer
    /// copies them in from the linker symbols.
    #[inline]
    pub fn set_small_data_anchors(&mut self, sda2_base: u32, sda_base: u32) {
        self.r2 = sda2_base;
        self.r13 = sda_base;
    }
}

impl SwitchFrame for MicroBlazeFrame {
    const RESUME_BIAS: usize = Self::RTSD_OFFSET;
    // The ABI keeps r1 word aligned.
    const STACK_ALIGN: usize = 4;

    #[inline]
    fn stack_pointer(&self) -> usize {
        self.r1 as usize
    }

    #[inline]
    fn resume_address(&self) -> usize {
        self.r15 as usize
    }

    fn prepare(&mut self, stack_top: usize, trampoline: usize) {
        self.clear();
        self.r1 = stack_top as u32;
        self.r15 = trampoline.wrapping_sub(Self::RESUME_BIAS) as u32;
    }
}

impl fmt::Debug for MicroBlazeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MicroBlazeFrame {{ r1: {:#010x}, r2: {:#010x}, r13: {:#010x}, r14: {:#010x}, \
             r15: {:#010x}, r16: {:#010x}, r17: {:#010x}, r18: {:#010x}",
            self.r1, self.r2, self.r13, self.r14, self.r15, self.r16, self.r17, self.r18
        )?;
        for (i, v) in self.callee.iter().enumerate() {
            write!(f, ", r{}: {:#010x}", 19 + i, v)?;
        }
        write!(f, " }}")
    }
}
