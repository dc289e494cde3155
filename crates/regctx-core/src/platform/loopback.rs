//! # Loopback Process
//!
//! An in-memory process collaborator that stores register writes and hands
//! them back on read.
//!
//! Each thread gets its own zero-filled register blob, laid out exactly as the
//! register catalog describes and kept in the target's byte order. Like
//! `PTRACE_PEEKUSER`/`PTRACE_POKEUSER`, every transfer is exactly one 8-byte
//! word: reads come back as `UInt64` values even for narrower registers,
//! narrower writes are zero-extended, and anything wider than a word is
//! rejected.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::trace;

use crate::error::{RegctxError, RegctxResult};
use crate::native::NativeProcess;
use crate::types::{ByteOrder, RegisterValue, ThreadId};

/// Width of one storage transfer
pub const WORD_SIZE: usize = 8;

/// Direction of a storage access, for error reporting
#[derive(Debug, Clone, Copy)]
enum Access
{
    Read,
    Write,
}

impl Access
{
    fn failure(self, operation: String, thread: ThreadId, details: String) -> RegctxError
    {
        match self {
            Access::Read => RegctxError::ReadRegistersFailed {
                operation,
                thread_id: Some(thread),
                details,
            },
            Access::Write => RegctxError::WriteRegistersFailed {
                operation,
                thread_id: Some(thread),
                details,
            },
        }
    }
}

/// Register storage kept in memory, one blob per thread
#[derive(Debug)]
pub struct LoopbackProcess
{
    storage_size: usize,
    byte_order: ByteOrder,
    threads: Mutex<HashMap<ThreadId, Vec<u8>>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl LoopbackProcess
{
    /// Create a process whose threads have `storage_size` bytes of register storage.
    #[must_use]
    pub fn new(storage_size: usize, byte_order: ByteOrder) -> Self
    {
        Self {
            storage_size,
            byte_order,
            threads: Mutex::new(HashMap::new()),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Byte order of the stored blobs.
    #[must_use]
    pub fn byte_order(&self) -> ByteOrder
    {
        self.byte_order
    }

    /// Size of each thread's register blob.
    #[must_use]
    pub fn storage_size(&self) -> usize
    {
        self.storage_size
    }

    /// Number of `read_register_value` calls so far, failed ones included.
    #[must_use]
    pub fn read_calls(&self) -> usize
    {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of `write_register_value` calls so far, failed ones included.
    #[must_use]
    pub fn write_calls(&self) -> usize
    {
        self.writes.load(Ordering::Relaxed)
    }

    /// Copy of a thread's raw register blob, in target byte order.
    pub fn snapshot(&self, thread: ThreadId) -> RegctxResult<Vec<u8>>
    {
        let mut threads = self.lock(thread, Access::Read)?;
        Ok(threads.entry(thread).or_insert_with(|| vec![0; self.storage_size]).clone())
    }

    fn lock(&self, thread: ThreadId, access: Access) -> RegctxResult<MutexGuard<'_, HashMap<ThreadId, Vec<u8>>>>
    {
        self.threads.lock().map_err(|_| {
            access.failure(
                "lock loopback register storage".to_string(),
                thread,
                "register storage lock poisoned".to_string(),
            )
        })
    }

    fn span(&self, byte_offset: u32, width: usize) -> Option<std::ops::Range<usize>>
    {
        let start = usize::try_from(byte_offset).ok()?;
        let end = start.checked_add(width)?;
        (end <= self.storage_size).then_some(start..end)
    }

    /// Convert target-order bytes to least-significant-first order, or back.
    fn swap_order(&self, bytes: &mut [u8])
    {
        if self.byte_order == ByteOrder::Big {
            bytes.reverse();
        }
    }
}

impl NativeProcess for LoopbackProcess
{
    fn read_register_value(
        &self,
        thread: ThreadId,
        byte_offset: u32,
        name: &str,
        byte_size: u32,
    ) -> RegctxResult<RegisterValue>
    {
        self.reads.fetch_add(1, Ordering::Relaxed);
        trace!(thread = thread.raw(), byte_offset, name, byte_size, "loopback register read");

        if usize::try_from(byte_size).map_or(true, |size| size > WORD_SIZE) {
            return Err(Access::Read.failure(
                format!("read register {name}"),
                thread,
                format!("{byte_size} bytes do not fit in one {WORD_SIZE}-byte transfer"),
            ));
        }
        let range = self.span(byte_offset, WORD_SIZE).ok_or_else(|| {
            Access::Read.failure(
                format!("read register {name}"),
                thread,
                format!(
                    "{WORD_SIZE} bytes at offset {byte_offset} exceed {} bytes of register storage",
                    self.storage_size
                ),
            )
        })?;

        let mut threads = self.lock(thread, Access::Read)?;
        let blob = threads.entry(thread).or_insert_with(|| vec![0; self.storage_size]);
        let mut word = [0u8; WORD_SIZE];
        word.copy_from_slice(&blob[range]);
        self.swap_order(&mut word);
        Ok(RegisterValue::from_u64(u64::from_le_bytes(word)))
    }

    fn write_register_value(
        &self,
        thread: ThreadId,
        byte_offset: u32,
        name: &str,
        value: &RegisterValue,
    ) -> RegctxResult<()>
    {
        self.writes.fetch_add(1, Ordering::Relaxed);
        trace!(thread = thread.raw(), byte_offset, name, size = value.byte_size(), "loopback register write");

        if !value.is_valid() || value.byte_size() == 0 {
            return Err(RegctxError::InvalidArgument(format!("no value to write to register {name}")));
        }

        if value.byte_size() > WORD_SIZE {
            return Err(RegctxError::InvalidArgument(format!(
                "{}-byte value does not fit in one {WORD_SIZE}-byte transfer to register {name}",
                value.byte_size()
            )));
        }

        let mut word = [0u8; WORD_SIZE];
        word[..value.byte_size()].copy_from_slice(value.bytes());
        let range = self.span(byte_offset, WORD_SIZE).ok_or_else(|| {
            Access::Write.failure(
                format!("write register {name}"),
                thread,
                format!(
                    "{WORD_SIZE} bytes at offset {byte_offset} exceed {} bytes of register storage",
                    self.storage_size
                ),
            )
        })?;
        self.swap_order(&mut word);

        let mut threads = self.lock(thread, Access::Write)?;
        let blob = threads.entry(thread).or_insert_with(|| vec![0; self.storage_size]);
        blob[range].copy_from_slice(&word);
        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_big_endian_storage_order()
    {
        let process = LoopbackProcess::new(16, ByteOrder::Big);
        let thread = ThreadId::from(1);
        process
            .write_register_value(thread, 8, "r1", &RegisterValue::from_u64(0x0102_0304_0506_0708))
            .unwrap();

        let blob = process.snapshot(thread).unwrap();
        assert_eq!(&blob[8..], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(
            process.read_register_value(thread, 8, "r1", 8).unwrap().as_u64(),
            Some(0x0102_0304_0506_0708)
        );
    }

    #[test]
    fn test_narrow_write_is_zero_extended()
    {
        let process = LoopbackProcess::new(8, ByteOrder::Little);
        let thread = ThreadId::from(1);
        process.write_register_value(thread, 0, "r0", &RegisterValue::from_u64(u64::MAX)).unwrap();
        process.write_register_value(thread, 0, "r0", &RegisterValue::from_u16(0xabcd)).unwrap();

        let value = process.read_register_value(thread, 0, "r0", 2).unwrap();
        assert_eq!(value, RegisterValue::from_u64(0xabcd));
    }

    #[test]
    fn test_out_of_range_write_leaves_storage_unchanged()
    {
        let process = LoopbackProcess::new(8, ByteOrder::Little);
        let thread = ThreadId::from(7);
        let before = process.snapshot(thread).unwrap();

        let err = process.write_register_value(thread, 4, "bad", &RegisterValue::from_u64(1)).unwrap_err();
        assert!(matches!(err, RegctxError::WriteRegistersFailed { .. }));
        assert_eq!(process.snapshot(thread).unwrap(), before);
        assert_eq!(process.write_calls(), 1);
    }

    #[test]
    fn test_wide_value_is_rejected_without_touching_neighbours()
    {
        let process = LoopbackProcess::new(16, ByteOrder::Little);
        let thread = ThreadId::from(3);
        process.write_register_value(thread, 8, "r1", &RegisterValue::from_u64(0x5555)).unwrap();

        let err = process
            .write_register_value(thread, 0, "r0", &RegisterValue::from_u128(u128::MAX))
            .unwrap_err();
        assert!(matches!(err, RegctxError::InvalidArgument(_)));
        assert_eq!(process.snapshot(thread).unwrap(), [0, 0, 0, 0, 0, 0, 0, 0, 0x55, 0x55, 0, 0, 0, 0, 0, 0]);
        assert!(matches!(
            process.read_register_value(thread, 0, "r0", 16),
            Err(RegctxError::ReadRegistersFailed { .. })
        ));
    }

    #[test]
    fn test_poisoned_storage_reports_direction()
    {
        let process = LoopbackProcess::new(8, ByteOrder::Little);
        let thread = ThreadId::from(1);
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = process.threads.lock().unwrap();
            panic!("poison the register storage");
        }));

        let write = process.write_register_value(thread, 0, "r0", &RegisterValue::from_u64(1));
        assert!(matches!(write, Err(RegctxError::WriteRegistersFailed { .. })));
        let read = process.read_register_value(thread, 0, "r0", 8);
        assert!(matches!(read, Err(RegctxError::ReadRegistersFailed { .. })));
    }

    #[test]
    fn test_threads_have_separate_storage()
    {
        let process = LoopbackProcess::new(8, ByteOrder::Little);
        process.write_register_value(ThreadId::from(1), 0, "r0", &RegisterValue::from_u64(5)).unwrap();
        let other = process.read_register_value(ThreadId::from(2), 0, "r0", 8).unwrap();
        assert_eq!(other.as_u64(), Some(0));
        assert_eq!(process.read_calls(), 1);
    }
}
