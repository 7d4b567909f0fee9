//! Error types for thread descriptor construction
//!
//! Initialization, switching and the trampoline cannot fail; the only
//! checked conditions are the ones a caller can get wrong when handing a
//! stack to [`Thread::new`](crate::thread::Thread::new).

use core::fmt;

/// Result type for descriptor operations
pub type ThreadResult<T> = Result<T, ThreadError>;

/// Errors raised while validating a thread's stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadError {
    /// Stack base pointer is null
    NullStack,

    /// Stack is smaller than the minimum the context layer accepts
    StackTooSmall { size: usize, min: usize },

    /// Stack base or size breaks the architecture's stack alignment
    MisalignedStack { align: usize },

    /// Base + size does not fit in the address space
    StackOverflowsAddressSpace,
}

impl fmt::Display for ThreadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadError::NullStack => write!(f, "thread stack is null"),
            ThreadError::StackTooSmall { size, min } => {
                write!(f, "thread stack too small: {} bytes (minimum {})", size, min)
            }
            ThreadError::MisalignedStack { align } => {
                write!(f, "thread stack not aligned to {} bytes", align)
            }
            ThreadError::StackOverflowsAddressSpace => {
                write!(f, "thread stack extends past the end of the address space")
            }
        }
    }
}

impl std::error::Error for ThreadError {}
