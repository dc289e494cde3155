//! # MIPS64 Register Context
//!
//! Register context for 64-bit MIPS Linux threads, big- and little-endian.
//!
//! Registers are read and written one at a time through the owning process,
//! at the offsets of the Linux MIPS64 general register blob. The context
//! does not cache values: every call reaches the process.
//!
//! The variant declares neither bulk save/restore nor hardware watchpoints,
//! so bulk transfer reports `Unsupported` and the watchpoint table has no
//! slots.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::NativeRegisterContext;
use crate::catalog::{MachineVariant, RegisterCatalog};
use crate::error::{RegctxError, RegctxResult};
use crate::native::{NativeProcess, NativeThread};
use crate::types::{Architecture, RegisterDescriptor, RegisterValue, ThreadId};
use crate::watchpoints::{WatchpointCapability, WatchpointTable};

/// Register context of one MIPS64 thread
#[derive(Debug)]
pub struct NativeRegisterContextMips64<T: NativeThread>
{
    thread: T,
    variant: MachineVariant,
    catalog: &'static RegisterCatalog,
    watchpoints: WatchpointTable,
}

impl<T: NativeThread> NativeRegisterContextMips64<T>
{
    /// Create a context for `thread`, running on `architecture`.
    ///
    /// # Panics
    ///
    /// Panics if `architecture` is not a MIPS64 variant. Use
    /// [`MachineVariant::try_from`] and [`Self::with_variant`] to validate
    /// first.
    #[must_use]
    pub fn new(thread: T, architecture: Architecture) -> Self
    {
        match MachineVariant::try_from(architecture) {
            Ok(variant) => Self::with_variant(thread, variant),
            Err(err) => panic!("cannot create a MIPS64 register context: {err}"),
        }
    }

    /// Create a context for `thread` on an already resolved variant.
    #[must_use]
    pub fn with_variant(thread: T, variant: MachineVariant) -> Self
    {
        let capabilities = variant.capabilities();
        debug!(
            thread = thread.id().raw(),
            %variant,
            watchpoints = capabilities.hardware_watchpoints,
            "created register context"
        );
        Self {
            thread,
            variant,
            catalog: variant.catalog(),
            watchpoints: WatchpointTable::new(variant.name(), capabilities.hardware_watchpoints),
        }
    }

    /// Thread collaborator.
    #[must_use]
    pub fn thread(&self) -> &T
    {
        &self.thread
    }

    fn process(&self) -> RegctxResult<Arc<dyn NativeProcess>>
    {
        self.thread.process().ok_or(RegctxError::NullReference("NativeProcess"))
    }

    fn descriptor(&self, index: u32) -> RegctxResult<&'static RegisterDescriptor>
    {
        self.catalog.register_info_at_index(index).ok_or(RegctxError::RegisterNotFound(index))
    }

    /// Logical index of a caller-supplied descriptor, rejecting internal-only ones.
    fn user_index(descriptor: Option<&RegisterDescriptor>) -> RegctxResult<(u32, &RegisterDescriptor)>
    {
        let descriptor = descriptor.ok_or(RegctxError::NullReference("register descriptor"))?;
        if descriptor.is_internal_only() {
            debug!(register = descriptor.name, "rejected internal-only register");
            return Err(RegctxError::InvalidRegister(descriptor.name.to_string()));
        }
        Ok((descriptor.logical_index(), descriptor))
    }
}

impl<T: NativeThread> WatchpointCapability for NativeRegisterContextMips64<T>
{
    fn watchpoints(&self) -> &WatchpointTable
    {
        &self.watchpoints
    }

    fn watchpoints_mut(&mut self) -> &mut WatchpointTable
    {
        &mut self.watchpoints
    }
}

impl<T: NativeThread> NativeRegisterContext for NativeRegisterContextMips64<T>
{
    fn catalog(&self) -> &'static RegisterCatalog
    {
        self.catalog
    }

    fn thread_id(&self) -> ThreadId
    {
        self.thread.id()
    }

    fn variant(&self) -> MachineVariant
    {
        self.variant
    }

    fn read_register_raw(&self, index: u32) -> RegctxResult<RegisterValue>
    {
        let descriptor = self.descriptor(index)?;
        let process = self.process()?;
        trace!(register = descriptor.name, offset = descriptor.byte_offset, "reading register");
        process.read_register_value(self.thread.id(), descriptor.byte_offset, descriptor.name, descriptor.byte_size)
    }

    fn write_register_raw(&mut self, index: u32, value: &RegisterValue) -> RegctxResult<()>
    {
        let descriptor = self.descriptor(index)?;
        if value.byte_size() > usize::try_from(descriptor.byte_size).unwrap_or(usize::MAX) {
            debug!(register = descriptor.name, size = value.byte_size(), "rejected value wider than register");
            return Err(RegctxError::InvalidArgument(format!(
                "{}-byte value does not fit register {} ({} bytes)",
                value.byte_size(),
                descriptor.name,
                descriptor.byte_size
            )));
        }
        let process = self.process()?;
        trace!(register = descriptor.name, offset = descriptor.byte_offset, "writing register");
        process.write_register_value(self.thread.id(), descriptor.byte_offset, descriptor.name, value)
    }

    fn read_register(&self, descriptor: Option<&RegisterDescriptor>) -> RegctxResult<RegisterValue>
    {
        let (index, descriptor) = Self::user_index(descriptor)?;
        let mut value = self.read_register_raw(index)?;

        // Storage hands back whole machine words.
        let declared = usize::try_from(descriptor.byte_size).unwrap_or(usize::MAX);
        if value.byte_size() > declared && !value.set_type(descriptor) {
            warn!(register = descriptor.name, size = value.byte_size(), "register value too wide to narrow");
            return Err(RegctxError::InvalidArgument(format!(
                "cannot narrow a {}-byte value to register {}",
                value.byte_size(),
                descriptor.name
            )));
        }
        Ok(value)
    }

    fn write_register(&mut self, descriptor: Option<&RegisterDescriptor>, value: &RegisterValue) -> RegctxResult<()>
    {
        let (index, _) = Self::user_index(descriptor)?;
        self.write_register_raw(index, value)
    }
}
