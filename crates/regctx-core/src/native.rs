//! # Native Process and Thread Collaborators
//!
//! The narrow interfaces a register context consumes from the rest of the
//! debugger.
//!
//! Process attach, thread enumeration, and the tracing transport itself live
//! elsewhere. A register context only needs two things from them:
//!
//! - **Raw register I/O** against a thread's register storage, exposed by the
//!   process as first-class operations ([`NativeProcess`])
//! - **The thread's identity and its owning process** ([`NativeThread`])
//!
//! ## Ownership
//!
//! The process is shared by every thread context of a debug session and may go
//! away at any time. Threads hand out the process as an `Option<Arc<_>>` that
//! is resolved anew on each call; a context never stores the strong reference,
//! so a process that exited between two calls is observed as missing on the
//! next one.

use std::sync::{Arc, Weak};

use crate::error::RegctxResult;
use crate::types::{RegisterValue, ThreadId};

/// Raw register access provided by a traced process
///
/// Implementations perform one synchronous call into the OS tracing interface
/// per method. Failures are returned as-is; the register context passes them
/// through to its caller without retrying.
pub trait NativeProcess: Send + Sync
{
    /// Read a register from a thread's raw register storage
    ///
    /// ## Parameters
    ///
    /// - `thread`: Thread whose registers are read
    /// - `byte_offset`: Offset of the register inside the storage blob
    /// - `name`: Register name, for diagnostics
    /// - `byte_size`: Declared width of the register
    ///
    /// The returned value may be wider than `byte_size` when the storage is
    /// only addressable in machine words.
    fn read_register_value(
        &self,
        thread: ThreadId,
        byte_offset: u32,
        name: &str,
        byte_size: u32,
    ) -> RegctxResult<RegisterValue>;

    /// Write a register into a thread's raw register storage
    ///
    /// A failed write must leave the storage unchanged.
    fn write_register_value(
        &self,
        thread: ThreadId,
        byte_offset: u32,
        name: &str,
        value: &RegisterValue,
    ) -> RegctxResult<()>;
}

/// A traced thread, as seen by its register context
pub trait NativeThread
{
    /// Owning process, or `None` if it no longer exists.
    fn process(&self) -> Option<Arc<dyn NativeProcess>>;

    /// Kernel identifier of the thread.
    fn id(&self) -> ThreadId;
}

/// Thread collaborator holding a non-owning handle to its process
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use regctx_core::native::{NativeProcess, NativeThread, ThreadHandle};
/// use regctx_core::platform::loopback::LoopbackProcess;
/// use regctx_core::types::{ByteOrder, ThreadId};
///
/// let process: Arc<dyn NativeProcess> = Arc::new(LoopbackProcess::new(304, ByteOrder::Little));
/// let thread = ThreadHandle::new(ThreadId::from(42), &process);
/// assert!(thread.process().is_some());
///
/// drop(process);
/// assert!(thread.process().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ThreadHandle
{
    id: ThreadId,
    process: Weak<dyn NativeProcess>,
}

impl ThreadHandle
{
    /// Create a handle for thread `id` of `process`.
    pub fn new(id: ThreadId, process: &Arc<dyn NativeProcess>) -> Self
    {
        Self {
            id,
            process: Arc::downgrade(process),
        }
    }
}

impl NativeThread for ThreadHandle
{
    fn process(&self) -> Option<Arc<dyn NativeProcess>>
    {
        self.process.upgrade()
    }

    fn id(&self) -> ThreadId
    {
        self.id
    }
}

impl<T: NativeThread + ?Sized> NativeThread for Arc<T>
{
    fn process(&self) -> Option<Arc<dyn NativeProcess>>
    {
        (**self).process()
    }

    fn id(&self) -> ThreadId
    {
        (**self).id()
    }
}
