//! aarch64 context-switch frame (callee-saved per AAPCS64)

use core::fmt;

use super::SwitchFrame;

/// Saved registers for a voluntary switch
///
/// Layout (offsets are stable for ASM access):
/// ```text
/// 0x00: sp
/// 0x08: pc        - resume address
/// 0x10: x19..x28  (10 x u64)
/// 0x60: x29 (fp)
/// 0x68: x30 (lr)
/// 0x70: d8..d15   (8 x u64, low halves of v8..v15)
/// ```
#[repr(C)]
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Aarch64Frame {
    pub sp: u64,
    pub pc: u64,
    pub x: [u64; 10],
    pub fp: u64,
    pub lr: u64,
    pub d: [u64; 8],
}

/// Size of the frame in bytes
pub const AARCH64_FRAME_SIZE: usize = 0xB0;

impl SwitchFrame for Aarch64Frame {
    // The switch ends in `br` to the saved pc.
    const RESUME_BIAS: usize = 0;
    const STACK_ALIGN: usize = 16;

    #[inline]
    fn stack_pointer(&self) -> usize {
        self.sp as usize
    }

    #[inline]
    fn resume_address(&self) -> usize {
        self.pc as usize
    }

    fn prepare(&mut self, stack_top: usize, trampoline: usize) {
        self.clear();
        self.sp = stack_top as u64;
        self.pc = trampoline.wrapping_sub(Self::RESUME_BIAS) as u64;
    }
}

impl fmt::Debug for Aarch64Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Aarch64Frame {{ sp: {:#x}, pc: {:#x}", self.sp, self.pc)?;
        for (i, v) in self.x.iter().enumerate() {
            write!(f, ", x{}: {:#x}", 19 + i, v)?;
        }
        write!(f, ", fp: {:#x}, lr: {:#x}", self.fp, self.lr)?;
        for (i, v) in self.d.iter().enumerate() {
            write!(f, ", d{}: {:#x}", 8 + i, v)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn test_layout_offsets() {
        assert_eq!(offset_of!(Aarch64Frame, sp), 0x00);
        assert_eq!(offset_of!(Aarch64Frame, pc), 0x08);
        assert_eq!(offset_of!(Aarch64Frame, x), 0x10);
        assert_eq!(offset_of!(Aarch64Frame, fp), 0x60);
        assert_eq!(offset_of!(Aarch64Frame, lr), 0x68);
        assert_eq!(offset_of!(Aarch64Frame, d), 0x70);
        assert_eq!(size_of::<Aarch64Frame>(), AARCH64_FRAME_SIZE);
    }

    #[test]
    fn test_prepare_zeroes_callee_saved() {
        let mut frame = Aarch64Frame { x: [7; 10], fp: 1, lr: 2, d: [3; 8], ..Default::default() };
        frame.prepare(0xffff_0000_4000, 0xffff_0000_0080);

        assert_eq!(frame.stack_pointer(), 0xffff_0000_4000);
        assert_eq!(frame.landing_address(), 0xffff_0000_0080);
        assert_eq!(frame.x, [0; 10]);
        assert_eq!(frame.d, [0; 8]);
        assert_eq!((frame.fp, frame.lr), (0, 0));
    }
}
