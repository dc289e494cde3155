//! # Error Types
//!
//! General error handling for register contexts.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use thiserror::Error;

use crate::types::ThreadId;

/// Main error type for register context operations
///
/// Each variant corresponds to one failure the generic debugger layer needs to
/// tell apart. Nothing is retried internally: the error is returned to the
/// caller as soon as it is observed.
///
/// ## Error Categories
///
/// 1. **Lookup errors**: RegisterNotFound, WatchpointNotFound
/// 2. **Argument errors**: NullReference, InvalidRegister, InvalidArgument
/// 3. **Capability errors**: Unsupported, UnsupportedArchitecture
/// 4. **Collaborator errors**: ReadRegistersFailed, WriteRegistersFailed
#[derive(Error, Debug)]
pub enum RegctxError
{
    /// No register descriptor exists for the given logical index
    #[error("register {0} not found")]
    RegisterNotFound(u32),

    /// A required collaborator or argument is missing
    ///
    /// This happens when:
    /// - The process behind a thread has exited (its handle can no longer be upgraded)
    /// - No register descriptor was supplied to a read or write
    #[error("{0} is NULL")]
    NullReference(&'static str),

    /// The register is an internal-only pseudo register
    ///
    /// Internal-only registers have no logical register number, so they never
    /// map onto the thread's raw register storage.
    #[error("register \"{0}\" is an internal-only register, cannot access directly")]
    InvalidRegister(String),

    /// The operation is not implemented for this architecture variant
    ///
    /// MIPS64 reports this for bulk register transfer and for every hardware
    /// watchpoint operation that would change slot state.
    #[error("{operation} is not supported on {variant}")]
    Unsupported
    {
        /// Name of the operation that was attempted
        operation: &'static str,
        /// Architecture variant the context was built for
        variant: &'static str,
    },

    /// The watchpoint slot index is outside the hardware capacity
    #[error("watchpoint slot {index} not found (capacity {capacity})")]
    WatchpointNotFound
    {
        /// Requested slot index
        index: u32,
        /// Number of hardware watchpoint slots available
        capacity: u32,
    },

    /// The architecture has no register context implementation
    ///
    /// Returned by the fallible variant resolution used before constructing a
    /// context. Constructing a context directly for such an architecture is a
    /// contract violation and panics instead.
    #[error("unsupported architecture: {0}")]
    UnsupportedArchitecture(String),

    /// Invalid argument passed to a register context function
    ///
    /// Examples:
    /// - A zero-length watchpoint
    /// - A register value wider than a machine word
    /// - Reading a vector register as an unsigned integer
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The process collaborator failed to read register storage
    #[error("Failed to read registers: {operation}")]
    ReadRegistersFailed
    {
        /// Description of the operation that failed
        operation: String,
        /// Thread ID if the operation was thread-specific
        thread_id: Option<ThreadId>,
        /// Additional error details
        details: String,
    },

    /// The process collaborator failed to write register storage
    #[error("Failed to write registers: {operation}")]
    WriteRegistersFailed
    {
        /// Description of the operation that failed
        operation: String,
        /// Thread ID if the operation was thread-specific
        thread_id: Option<ThreadId>,
        /// Additional error details
        details: String,
    },
}

impl RegctxError
{
    /// Whether this error means the operation is missing for the architecture,
    /// as opposed to a failure of this particular call.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool
    {
        matches!(self, Self::Unsupported { .. })
    }
}

/// Convenience type alias for `Result<T, RegctxError>`
///
/// ```rust
/// use regctx_core::error::RegctxResult;
/// fn foo() -> RegctxResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type RegctxResult<T> = std::result::Result<T, RegctxError>;
