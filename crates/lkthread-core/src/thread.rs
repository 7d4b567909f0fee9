//! Thread descriptor
//!
//! The context layer only ever reads `entry`, `arg`, `stack`, `stack_size`
//! and `name`, and mutates the embedded frame. Everything else a kernel
//! tracks about a thread (state, priority, wait queues) belongs to the
//! scheduler and lives outside this type.

use core::fmt;

use crate::constants::{MIN_STACK_SIZE, THREAD_NAME_LEN};
use crate::error::{ThreadError, ThreadResult};
use crate::frame::{ContextFrame, SwitchFrame};

/// Entry routine of a thread: one pointer-sized argument, integer result.
pub type ThreadStartRoutine = fn(usize) -> i32;

/// Descriptor of one kernel thread as seen by the context layer
pub struct Thread {
    name: String,
    entry: ThreadStartRoutine,
    arg: usize,
    stack: *mut u8,
    stack_size: usize,
    frame: ContextFrame,
}

impl Thread {
    /// Create a descriptor for a thread that will run `entry(arg)` on the
    /// stack `[stack, stack + stack_size)`.
    ///
    /// The frame starts zeroed; call `arch_thread_initialize` before the
    /// first switch into it. The stack memory stays owned by the caller and
    /// must outlive the thread.
    pub fn new(
        name: &str,
        entry: ThreadStartRoutine,
        arg: usize,
        stack: *mut u8,
        stack_size: usize,
    ) -> ThreadResult<Self> {
        validate_stack(stack, stack_size)?;

        Ok(Self {
            name: truncate_name(name),
            entry,
            arg,
            stack,
            stack_size,
            frame: ContextFrame::default(),
        })
    }

    /// Adopt the context that is already running (the boot thread).
    ///
    /// It has no stack of its own and is never initialized: the first
    /// switch out of it fills the frame with live registers.
    pub fn bootstrap(name: &str) -> Self {
        Self {
            name: truncate_name(name),
            entry: bootstrap_entry,
            arg: 0,
            stack: core::ptr::null_mut(),
            stack_size: 0,
            frame: ContextFrame::default(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn entry(&self) -> ThreadStartRoutine {
        self.entry
    }

    #[inline]
    pub fn arg(&self) -> usize {
        self.arg
    }

    /// Lowest address of the stack region (null for the boot thread)
    #[inline]
    pub fn stack(&self) -> *mut u8 {
        self.stack
    }

    #[inline]
    pub fn stack_size(&self) -> usize {
        self.stack_size
    }

    /// One past the highest stack address
    #[inline]
    pub fn stack_top(&self) -> usize {
        self.stack as usize + self.stack_size
    }

    /// True for a descriptor created by [`Thread::bootstrap`]
    #[inline]
    pub fn is_bootstrap(&self) -> bool {
        self.stack.is_null()
    }

    #[inline]
    pub fn frame(&self) -> &ContextFrame {
        &self.frame
    }

    #[inline]
    pub fn frame_mut(&mut self) -> &mut ContextFrame {
        &mut self.frame
    }

    /// Raw pointer to the embedded frame for the switch primitive
    #[inline]
    pub fn frame_ptr(&mut self) -> *mut ContextFrame {
        &mut self.frame
    }

    /// Log the descriptor and its saved registers at debug level
    pub fn dump(&self) {
        crate::kdebug!(
            "dump_thread: t {:p} ({}) entry {:#x} arg {:#x} stack {:p} size {:#x}",
            self,
            self.name,
            self.entry as *const () as usize,
            self.arg,
            self.stack,
            self.stack_size
        );
        crate::kdebug!("\tframe {:?}", self.frame);
    }
}

impl fmt::Debug for Thread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thread")
            .field("name", &self.name)
            .field("entry", &format_args!("{:#x}", self.entry as *const () as usize))
            .field("arg", &format_args!("{:#x}", self.arg))
            .field("stack", &self.stack)
            .field("stack_size", &self.stack_size)
            .field("frame", &self.frame)
            .finish()
    }
}

fn validate_stack(stack: *mut u8, stack_size: usize) -> ThreadResult<()> {
    if stack.is_null() {
        return Err(ThreadError::NullStack);
    }
    if stack_size < MIN_STACK_SIZE {
        return Err(ThreadError::StackTooSmall { size: stack_size, min: MIN_STACK_SIZE });
    }
    let align = ContextFrame::STACK_ALIGN;
    if (stack as usize) % align != 0 || stack_size % align != 0 {
        return Err(ThreadError::MisalignedStack { align });
    }
    (stack as usize)
        .checked_add(stack_size)
        .ok_or(ThreadError::StackOverflowsAddressSpace)?;
    Ok(())
}

fn truncate_name(name: &str) -> String {
    if name.len() <= THREAD_NAME_LEN {
        return name.to_string();
    }
    let mut end = THREAD_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

fn bootstrap_entry(_arg: usize) -> i32 {
    crate::kerror!("bootstrap thread entry called; it has no entry routine");
    -1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C, align(16))]
    struct TestStack([u8; 8192]);

    fn ret_seven(arg: usize) -> i32 {
        arg as i32 + 7
    }

    #[test]
    fn test_new_keeps_fields() {
        let mut stack = Box::new(TestStack([0; 8192]));
        let base = stack.0.as_mut_ptr();
        let t = Thread::new("worker", ret_seven, 35, base, 4096).unwrap();

        assert_eq!(t.name(), "worker");
        assert_eq!((t.entry())(t.arg()), 42);
        assert_eq!(t.stack(), base);
        assert_eq!(t.stack_size(), 4096);
        assert_eq!(t.stack_top(), base as usize + 4096);
        assert_eq!(*t.frame(), ContextFrame::default());
        assert!(!t.is_bootstrap());
    }

    #[test]
    fn test_new_rejects_bad_stacks() {
        let mut stack = Box::new(TestStack([0; 8192]));
        let base = stack.0.as_mut_ptr();

        assert_eq!(
            Thread::new("t", ret_seven, 0, core::ptr::null_mut(), 4096).unwrap_err(),
            ThreadError::NullStack
        );
        assert_eq!(
            Thread::new("t", ret_seven, 0, base, MIN_STACK_SIZE - 16).unwrap_err(),
            ThreadError::StackTooSmall { size: MIN_STACK_SIZE - 16, min: MIN_STACK_SIZE }
        );
        assert_eq!(
            Thread::new("t", ret_seven, 0, unsafe { base.add(1) }, 4096).unwrap_err(),
            ThreadError::MisalignedStack { align: ContextFrame::STACK_ALIGN }
        );
        assert_eq!(
            Thread::new("t", ret_seven, 0, base, 4097).unwrap_err(),
            ThreadError::MisalignedStack { align: ContextFrame::STACK_ALIGN }
        );
    }

    #[test]
    fn test_new_rejects_wrapping_stack() {
        let align = ContextFrame::STACK_ALIGN;
        let base = (usize::MAX - align + 1) as *mut u8;
        assert_eq!(
            Thread::new("t", ret_seven, 0, base, 4096).unwrap_err(),
            ThreadError::StackOverflowsAddressSpace
        );
    }

    #[test]
    fn test_bootstrap() {
        let t = Thread::bootstrap("bootstrap");
        assert!(t.is_bootstrap());
        assert_eq!(t.stack_size(), 0);
        assert_eq!(*t.frame(), ContextFrame::default());
        crate::kprint::set_log_level(crate::kprint::LogLevel::Off);
        assert_eq!((t.entry())(0), -1);
    }

    #[test]
    fn test_name_truncated() {
        let long = "a-very-long-thread-name-that-exceeds-the-limit";
        let t = Thread::bootstrap(long);
        assert_eq!(t.name().len(), THREAD_NAME_LEN);
        assert!(long.starts_with(t.name()));

        // Multi-byte characters are never split
        let t = Thread::bootstrap("ééééééééééééééééééééé");
        assert!(t.name().len() <= THREAD_NAME_LEN);
        assert!(t.name().chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_debug_formats_frame() {
        let t = Thread::bootstrap("main");
        let s = format!("{:?}", t);
        assert!(s.contains("\"main\""));
        assert!(s.contains("frame"));
    }
}
