//! MicroBlaze context switching implementation
//!
//! The switch primitive lives in `switch.S` (compiled by build.rs); rustc
//! has no MicroBlaze inline assembly. It saves r1, r2, r13-r31 into the old
//! frame, loads them from the new one, and returns with `rtsd r15, 8`.
//!
//! A fresh frame therefore carries `initial_thread_func - 8` in r15 (see
//! `MicroBlazeFrame::RTSD_OFFSET`), and the `rtsd` of the first switch into
//! it lands on the trampoline's first instruction.

use lkthread_core::frame::{MicroBlazeFrame, SwitchFrame};

use crate::context::initial_thread_func;

extern "C" {
    fn microblaze_context_switch(old: *mut MicroBlazeFrame, new: *const MicroBlazeFrame);

    // Small data anchors provided by the linker script; crt0 loads the same
    // values into r13 and r2.
    static _SDA_BASE_: u8;
    static _SDA2_BASE_: u8;
}

/// Fill a never-run frame: r1 at `stack_top`, r15 at the biased trampoline,
/// r2/r13 at the image's small data anchors, everything else zero.
pub fn prepare_frame(frame: &mut MicroBlazeFrame, stack_top: usize) {
    frame.prepare(stack_top, thread_entry_address());

    let (sda2, sda) = unsafe {
        (
            core::ptr::addr_of!(_SDA2_BASE_) as usize,
            core::ptr::addr_of!(_SDA_BASE_) as usize,
        )
    };
    frame.set_small_data_anchors(sda2 as u32, sda as u32);
}

/// Address a fresh frame lands on
#[inline]
pub fn thread_entry_address() -> usize {
    initial_thread_func as *const () as usize
}

/// Save the current register state to `old` and load `new`.
///
/// # Safety
///
/// `old` must be writable. `new` must hold a frame prepared by
/// `prepare_frame` or saved by a previous switch, whose stack is still live.
#[inline]
pub unsafe fn context_switch(old: *mut MicroBlazeFrame, new: *const MicroBlazeFrame) {
    microblaze_context_switch(old, new);
}
