//! Context frame layouts
//!
//! A context frame holds exactly the registers the switch primitive saves
//! and restores. Layouts are `repr(C)` with fixed offsets because the
//! assembly in `lkthread-runtime` addresses fields by byte offset.
//!
//! All layouts are compiled on every target so they can be checked on the
//! build host; [`ContextFrame`] names the one the current target switches.

pub mod microblaze;
pub mod x86_64;
pub mod aarch64;

pub use self::microblaze::MicroBlazeFrame;
pub use self::x86_64::X86_64Frame;
pub use self::aarch64::Aarch64Frame;

/// Register frame understood by one architecture's switch primitive.
pub trait SwitchFrame: Default + Clone + PartialEq + core::fmt::Debug {
    /// Amount subtracted from the trampoline address before it is stored as
    /// the resume address. The switch primitive's final control transfer
    /// adds it back.
    const RESUME_BIAS: usize;

    /// Required alignment of a fresh thread's stack top.
    const STACK_ALIGN: usize;

    /// Saved stack pointer.
    fn stack_pointer(&self) -> usize;

    /// Saved resume address, as stored (still biased).
    fn resume_address(&self) -> usize;

    /// Reset every field to zero.
    fn clear(&mut self) {
        *self = Self::default();
    }

    /// Populate a never-run frame: stack pointer at `stack_top`, resume
    /// address at `trampoline - RESUME_BIAS`, everything else zero.
    fn prepare(&mut self, stack_top: usize, trampoline: usize);

    /// Address control reaches when this frame is switched in.
    #[inline]
    fn landing_address(&self) -> usize {
        self.resume_address().wrapping_add(Self::RESUME_BIAS)
    }
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "microblaze")] {
        /// Frame layout switched on this target
        pub type ContextFrame = MicroBlazeFrame;
    } else if #[cfg(target_arch = "aarch64")] {
        /// Frame layout switched on this target
        pub type ContextFrame = Aarch64Frame;
    } else {
        /// Frame layout switched on this target
        pub type ContextFrame = X86_64Frame;
    }
}
