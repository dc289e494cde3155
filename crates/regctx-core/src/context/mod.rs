//! # Native Register Context
//!
//! The per-thread interface the generic debugger layer uses to inspect and
//! modify a stopped thread's registers.
//!
//! A register context is created for each traced thread once its
//! architecture is known. It answers layout questions from the shared
//! [`RegisterCatalog`] and forwards register I/O to the process that owns the
//! thread.
//!
//! ## What implementors provide
//!
//! - The catalog selected at construction ([`NativeRegisterContext::catalog`])
//! - Raw register I/O by logical index and by descriptor
//! - A watchpoint slot table, through the [`WatchpointCapability`] supertrait
//!
//! Everything else (name lookups, numbering scheme conversion, unsigned
//! helpers, PC/SP/FP access, bulk save/restore) is provided here once for
//! every architecture. Bulk save/restore is gated on the variant's
//! [`CapabilityProfile`].
//!
//! ## Thread Safety
//!
//! A context is **not** synchronized. It is meant to be driven by the single
//! thread that owns the debug session for its target thread.

pub mod mips64;

pub use mips64::NativeRegisterContextMips64;

use tracing::{debug, warn};

use crate::catalog::{CapabilityProfile, MachineVariant, RegisterCatalog};
use crate::error::{RegctxError, RegctxResult};
use crate::types::{
    Address, GenericRegister, RegisterDescriptor, RegisterKind, RegisterSet, RegisterValue, ThreadId,
};
use crate::watchpoints::WatchpointCapability;

/// Register access for one traced thread
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use regctx_core::context::{NativeRegisterContext, NativeRegisterContextMips64};
/// use regctx_core::native::{NativeProcess, ThreadHandle};
/// use regctx_core::platform::loopback::LoopbackProcess;
/// use regctx_core::types::{Address, Architecture, ByteOrder, ThreadId};
///
/// let process: Arc<dyn NativeProcess> = Arc::new(LoopbackProcess::new(304, ByteOrder::Little));
/// let thread = ThreadHandle::new(ThreadId::from(1), &process);
/// let mut context = NativeRegisterContextMips64::new(thread, Architecture::Mips64el);
///
/// context.set_pc(Address::new(0x1200_0000))?;
/// assert_eq!(context.pc()?, Address::new(0x1200_0000));
/// assert_eq!(context.register_set_count(), 1);
/// # Ok::<(), regctx_core::error::RegctxError>(())
/// ```
pub trait NativeRegisterContext: WatchpointCapability
{
    /// Register layout catalog of the context's architecture.
    fn catalog(&self) -> &'static RegisterCatalog;

    /// Thread whose registers this context accesses.
    fn thread_id(&self) -> ThreadId;

    /// Machine variant resolved at construction.
    fn variant(&self) -> MachineVariant;

    /// Optional features available to this context.
    fn capabilities(&self) -> CapabilityProfile
    {
        self.variant().capabilities()
    }

    /// Number of named register sets.
    fn register_set_count(&self) -> usize
    {
        self.catalog().register_set_count()
    }

    /// Register set at `index`, or `None` when `index >= register_set_count()`.
    fn register_set(&self, index: usize) -> Option<&'static RegisterSet>
    {
        self.catalog().register_set(index)
    }

    /// Read the register at a logical index, exactly as storage returns it
    ///
    /// The value may be wider than the register when storage is only
    /// addressable in machine words.
    ///
    /// ## Errors
    ///
    /// - `RegisterNotFound`: No register has this index
    /// - `NullReference`: The owning process is gone
    /// - Any error of the process collaborator, unchanged
    fn read_register_raw(&self, index: u32) -> RegctxResult<RegisterValue>;

    /// Write the register at a logical index
    ///
    /// ## Errors
    ///
    /// - `InvalidArgument`: `value` is wider than the register; the process
    ///   is not consulted
    /// - Any error of [`NativeRegisterContext::read_register_raw`]
    fn write_register_raw(&mut self, index: u32, value: &RegisterValue) -> RegctxResult<()>;

    /// Read the register a descriptor describes
    ///
    /// A result wider than the descriptor is narrowed and re-typed to the
    /// descriptor's own type.
    ///
    /// ## Errors
    ///
    /// - `NullReference`: `descriptor` is `None`
    /// - `InvalidRegister`: The descriptor is internal-only; the process is
    ///   not consulted
    /// - Any error of [`NativeRegisterContext::read_register_raw`]
    fn read_register(&self, descriptor: Option<&RegisterDescriptor>) -> RegctxResult<RegisterValue>;

    /// Write the register a descriptor describes
    ///
    /// ## Errors
    ///
    /// Same as [`NativeRegisterContext::read_register`].
    fn write_register(&mut self, descriptor: Option<&RegisterDescriptor>, value: &RegisterValue) -> RegctxResult<()>;

    /// Snapshot the whole register file as one buffer
    ///
    /// The buffer is `catalog().storage_size()` bytes long. Each register
    /// sits at its byte offset, least significant byte first.
    ///
    /// ## Errors
    ///
    /// - `Unsupported`: The variant declares no bulk transfer; the process is
    ///   not consulted
    /// - Any error of [`NativeRegisterContext::read_register`]
    fn read_all_register_values(&self) -> RegctxResult<Vec<u8>>
    {
        require_bulk_transfer(self, "ReadAllRegisterValues")?;

        let catalog = self.catalog();
        let mut data = vec![0u8; catalog.storage_size()];
        for descriptor in catalog.registers().iter().filter(|descriptor| !descriptor.is_internal_only()) {
            let value = self.read_register(Some(descriptor))?;
            let slot = register_span(&mut data, descriptor, value.byte_size())?;
            slot.copy_from_slice(value.bytes());
        }
        Ok(data)
    }

    /// Restore the whole register file from a buffer taken by
    /// [`NativeRegisterContext::read_all_register_values`]
    ///
    /// Registers already written are put back if a later write fails.
    ///
    /// ## Errors
    ///
    /// - `Unsupported`: The variant declares no bulk transfer; the process is
    ///   not consulted
    /// - `InvalidArgument`: `data` is not `catalog().storage_size()` bytes
    /// - Any error of [`NativeRegisterContext::write_register`]
    fn write_all_register_values(&mut self, data: &[u8]) -> RegctxResult<()>
    {
        require_bulk_transfer(self, "WriteAllRegisterValues")?;

        let catalog = self.catalog();
        if data.len() != catalog.storage_size() {
            return Err(RegctxError::InvalidArgument(format!(
                "register file of {} is {} bytes, got {}",
                catalog.name(),
                catalog.storage_size(),
                data.len()
            )));
        }

        let previous = self.read_all_register_values()?;
        let registers: Vec<&'static RegisterDescriptor> =
            catalog.registers().iter().filter(|descriptor| !descriptor.is_internal_only()).collect();
        for (written, descriptor) in registers.iter().enumerate() {
            if let Err(err) = write_from_buffer(&mut *self, descriptor, data) {
                for restored in &registers[..written] {
                    if let Err(restore) = write_from_buffer(&mut *self, restored, &previous) {
                        warn!(register = restored.name, error = %restore, "failed to restore register");
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Number of registers in the catalog.
    fn register_count(&self) -> usize
    {
        self.catalog().register_count()
    }

    /// Number of registers that can be accessed directly.
    fn user_register_count(&self) -> usize
    {
        self.catalog().user_register_count()
    }

    /// Descriptor at a logical index.
    fn register_info_at_index(&self, index: u32) -> Option<&'static RegisterDescriptor>
    {
        self.catalog().register_info_at_index(index)
    }

    /// Descriptor by name or alternate name, ignoring ASCII case.
    fn register_info_by_name(&self, name: &str) -> Option<&'static RegisterDescriptor>
    {
        self.catalog().register_info_by_name(name)
    }

    /// Logical index of the register numbered `number` in `kind`.
    fn convert_register_kind_to_register_number(&self, kind: RegisterKind, number: u32) -> Option<u32>
    {
        self.catalog().convert_register_kind_to_register_number(kind, number)
    }

    /// Descriptor of the register numbered `number` in `kind`.
    fn register_info(&self, kind: RegisterKind, number: u32) -> Option<&'static RegisterDescriptor>
    {
        self.catalog().register_info(kind, number)
    }

    /// Read an integer register of at most 8 bytes.
    ///
    /// ## Errors
    ///
    /// - `RegisterNotFound`: No register has this index
    /// - `InvalidArgument`: The value read is not an integer that fits in a `u64`
    fn read_register_as_unsigned(&self, index: u32) -> RegctxResult<u64>
    {
        let descriptor = self.register_info_at_index(index).ok_or(RegctxError::RegisterNotFound(index))?;
        let value = self.read_register(Some(descriptor))?;
        value.as_u64().ok_or_else(|| {
            RegctxError::InvalidArgument(format!(
                "register {} holds a {:?} value, not an unsigned integer",
                descriptor.name,
                value.value_type()
            ))
        })
    }

    /// Write an integer register, truncating `value` to the register width.
    ///
    /// ## Errors
    ///
    /// - `RegisterNotFound`: No register has this index
    /// - `InvalidArgument`: The register is wider than 16 bytes
    /// - Any error of [`NativeRegisterContext::write_register`]
    fn write_register_from_unsigned(&mut self, index: u32, value: u64) -> RegctxResult<()>
    {
        let descriptor = self.register_info_at_index(index).ok_or(RegctxError::RegisterNotFound(index))?;
        let mut typed = RegisterValue::from_u64(value);
        if !typed.set_type(descriptor) {
            return Err(RegctxError::InvalidArgument(format!(
                "register {} is {} bytes wide",
                descriptor.name, descriptor.byte_size
            )));
        }
        self.write_register(Some(descriptor), &typed)
    }

    /// Logical index of a generic register.
    ///
    /// ## Errors
    ///
    /// `RegisterNotFound` when the architecture has no such register.
    fn generic_register_index(&self, generic: GenericRegister) -> RegctxResult<u32>
    {
        self.convert_register_kind_to_register_number(RegisterKind::Generic, generic.number())
            .ok_or(RegctxError::RegisterNotFound(generic.number()))
    }

    /// Program counter.
    fn pc(&self) -> RegctxResult<Address>
    {
        self.read_register_as_unsigned(self.generic_register_index(GenericRegister::Pc)?)
            .map(Address::from)
    }

    /// Set the program counter.
    fn set_pc(&mut self, pc: Address) -> RegctxResult<()>
    {
        let index = self.generic_register_index(GenericRegister::Pc)?;
        self.write_register_from_unsigned(index, pc.value())
    }

    /// Stack pointer.
    fn sp(&self) -> RegctxResult<Address>
    {
        self.read_register_as_unsigned(self.generic_register_index(GenericRegister::Sp)?)
            .map(Address::from)
    }

    /// Set the stack pointer.
    fn set_sp(&mut self, sp: Address) -> RegctxResult<()>
    {
        let index = self.generic_register_index(GenericRegister::Sp)?;
        self.write_register_from_unsigned(index, sp.value())
    }

    /// Frame pointer.
    fn fp(&self) -> RegctxResult<Address>
    {
        self.read_register_as_unsigned(self.generic_register_index(GenericRegister::Fp)?)
            .map(Address::from)
    }

    /// Set the frame pointer.
    fn set_fp(&mut self, fp: Address) -> RegctxResult<()>
    {
        let index = self.generic_register_index(GenericRegister::Fp)?;
        self.write_register_from_unsigned(index, fp.value())
    }

    /// Return address register.
    fn return_address(&self) -> RegctxResult<Address>
    {
        self.read_register_as_unsigned(self.generic_register_index(GenericRegister::Ra)?)
            .map(Address::from)
    }

    /// Flags/status register.
    fn flags(&self) -> RegctxResult<u64>
    {
        self.read_register_as_unsigned(self.generic_register_index(GenericRegister::Flags)?)
    }
}

fn require_bulk_transfer<C: NativeRegisterContext + ?Sized>(context: &C, operation: &'static str) -> RegctxResult<()>
{
    if context.capabilities().bulk_transfer {
        return Ok(());
    }
    let variant = context.variant();
    debug!(operation, %variant, "operation not supported");
    Err(RegctxError::Unsupported {
        operation,
        variant: variant.name(),
    })
}

fn register_span<'a>(data: &'a mut [u8], descriptor: &RegisterDescriptor, width: usize) -> RegctxResult<&'a mut [u8]>
{
    usize::try_from(descriptor.byte_offset)
        .ok()
        .and_then(|start| data.get_mut(start..start.checked_add(width)?))
        .ok_or_else(|| {
            RegctxError::InvalidArgument(format!("register {} lies outside the register file", descriptor.name))
        })
}

fn write_from_buffer<C: NativeRegisterContext + ?Sized>(
    context: &mut C,
    descriptor: &RegisterDescriptor,
    data: &[u8],
) -> RegctxResult<()>
{
    let width = usize::try_from(descriptor.byte_size).unwrap_or(usize::MAX);
    let bytes = usize::try_from(descriptor.byte_offset)
        .ok()
        .and_then(|start| data.get(start..start.checked_add(width)?))
        .ok_or_else(|| {
            RegctxError::InvalidArgument(format!("register {} lies outside the register file", descriptor.name))
        })?;
    let mut value = RegisterValue::from_bytes(bytes);
    if !value.set_type(descriptor) {
        return Err(RegctxError::InvalidArgument(format!(
            "register {} is {} bytes wide",
            descriptor.name, descriptor.byte_size
        )));
    }
    context.write_register(Some(descriptor), &value)
}
