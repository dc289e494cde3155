//! # Register Layout Catalog
//!
//! Immutable, per-architecture register tables.
//!
//! A [`RegisterCatalog`] describes every logical register of an architecture
//! and the named sets that group them. Catalogs are built once, on first use,
//! and shared by `&'static` reference for the rest of the process; nothing
//! ever mutates them.
//!
//! The architecture the debugger reports is narrowed into a [`MachineVariant`]
//! before a catalog is selected. Variants that differ only in byte order share
//! one catalog.

pub mod mips64;

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::error::{RegctxError, RegctxResult};
use crate::types::{Architecture, ByteOrder, RegisterDescriptor, RegisterKind, RegisterSet, INVALID_REGNUM};

static MIPS64_CATALOG: Lazy<RegisterCatalog> = Lazy::new(|| {
    RegisterCatalog::new(
        "mips64",
        &mips64::REGISTERS,
        &mips64::REGISTER_SETS,
        mips64::GPR_STORAGE_SIZE,
    )
});

/// Concrete machine variant a register context was built for
///
/// This is the closed set of architectures with a register layout catalog.
///
/// ## Example
///
/// ```rust
/// use regctx_core::catalog::MachineVariant;
/// use regctx_core::types::{Architecture, ByteOrder};
///
/// let variant = MachineVariant::try_from(Architecture::Mips64).unwrap();
/// assert_eq!(variant.byte_order(), ByteOrder::Big);
/// assert!(MachineVariant::try_from(Architecture::X86_64).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineVariant
{
    /// 64-bit MIPS, big-endian
    Mips64,
    /// 64-bit MIPS, little-endian
    Mips64el,
}

impl MachineVariant
{
    /// Name of the variant as used in triples.
    #[must_use]
    pub const fn name(self) -> &'static str
    {
        match self {
            MachineVariant::Mips64 => "mips64",
            MachineVariant::Mips64el => "mips64el",
        }
    }

    /// Byte order of the variant's register storage.
    #[must_use]
    pub const fn byte_order(self) -> ByteOrder
    {
        match self {
            MachineVariant::Mips64 => ByteOrder::Big,
            MachineVariant::Mips64el => ByteOrder::Little,
        }
    }

    /// Optional features the variant implements.
    #[must_use]
    pub const fn capabilities(self) -> CapabilityProfile
    {
        match self {
            // No watchpoint registers are driven and bulk transfer is not
            // implemented for MIPS64; both report unsupported.
            MachineVariant::Mips64 | MachineVariant::Mips64el => CapabilityProfile {
                hardware_watchpoints: 0,
                bulk_transfer: false,
            },
        }
    }

    /// Register layout catalog shared by this variant.
    #[must_use]
    pub fn catalog(self) -> &'static RegisterCatalog
    {
        RegisterCatalog::for_variant(self)
    }
}

impl TryFrom<Architecture> for MachineVariant
{
    type Error = RegctxError;

    fn try_from(architecture: Architecture) -> RegctxResult<Self>
    {
        match architecture {
            Architecture::Mips64 => Ok(MachineVariant::Mips64),
            Architecture::Mips64el => Ok(MachineVariant::Mips64el),
            other => Err(RegctxError::UnsupportedArchitecture(other.to_string())),
        }
    }
}

impl From<MachineVariant> for Architecture
{
    fn from(variant: MachineVariant) -> Self
    {
        match variant {
            MachineVariant::Mips64 => Architecture::Mips64,
            MachineVariant::Mips64el => Architecture::Mips64el,
        }
    }
}

impl fmt::Display for MachineVariant
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.name())
    }
}

/// Optional features of an architecture variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityProfile
{
    /// Number of hardware watchpoint slots (0 when unsupported)
    pub hardware_watchpoints: u32,
    /// Whether the whole register file can be saved and restored in one transfer
    pub bulk_transfer: bool,
}

/// Register tables of one architecture
///
/// Lookups never allocate: descriptors and sets are `&'static`, and name
/// lookups go through an index built with the catalog.
#[derive(Debug)]
pub struct RegisterCatalog
{
    name: &'static str,
    registers: &'static [RegisterDescriptor],
    sets: &'static [RegisterSet],
    storage_size: usize,
    by_name: HashMap<String, u32>,
}

impl RegisterCatalog
{
    fn new(
        name: &'static str,
        registers: &'static [RegisterDescriptor],
        sets: &'static [RegisterSet],
        storage_size: usize,
    ) -> Self
    {
        let mut by_name = HashMap::with_capacity(registers.len() * 2);
        for (index, descriptor) in (0u32..).zip(registers) {
            by_name.insert(descriptor.name.to_ascii_lowercase(), index);
            if let Some(alt_name) = descriptor.alt_name {
                by_name.entry(alt_name.to_ascii_lowercase()).or_insert(index);
            }
        }

        Self {
            name,
            registers,
            sets,
            storage_size,
            by_name,
        }
    }

    /// Catalog for a machine variant.
    #[must_use]
    pub fn for_variant(variant: MachineVariant) -> &'static RegisterCatalog
    {
        match variant {
            MachineVariant::Mips64 | MachineVariant::Mips64el => &MIPS64_CATALOG,
        }
    }

    /// Name of the architecture family the catalog describes.
    #[must_use]
    pub fn name(&self) -> &'static str
    {
        self.name
    }

    /// Every register descriptor, in logical order.
    #[must_use]
    pub fn registers(&self) -> &'static [RegisterDescriptor]
    {
        self.registers
    }

    /// Number of registers the catalog describes.
    #[must_use]
    pub fn register_count(&self) -> usize
    {
        self.registers.len()
    }

    /// Number of registers that are not internal-only.
    #[must_use]
    pub fn user_register_count(&self) -> usize
    {
        self.registers.iter().filter(|descriptor| !descriptor.is_internal_only()).count()
    }

    /// Size in bytes of the raw register storage the offsets point into.
    #[must_use]
    pub fn storage_size(&self) -> usize
    {
        self.storage_size
    }

    /// Descriptor at a logical index.
    #[must_use]
    pub fn register_info_at_index(&self, index: u32) -> Option<&'static RegisterDescriptor>
    {
        let registers: &'static [RegisterDescriptor] = self.registers;
        registers.get(usize::try_from(index).ok()?)
    }

    /// Descriptor by primary or alternate name, ignoring ASCII case.
    #[must_use]
    pub fn register_info_by_name(&self, name: &str) -> Option<&'static RegisterDescriptor>
    {
        let index = *self.by_name.get(&name.to_ascii_lowercase())?;
        self.register_info_at_index(index)
    }

    /// Translate a number in some scheme into a logical register index.
    ///
    /// ```rust
    /// use regctx_core::catalog::{MachineVariant, RegisterCatalog};
    /// use regctx_core::types::{GenericRegister, RegisterKind};
    ///
    /// let catalog = RegisterCatalog::for_variant(MachineVariant::Mips64);
    /// let pc = catalog.convert_register_kind_to_register_number(RegisterKind::Generic, GenericRegister::Pc.number());
    /// assert_eq!(pc, Some(34));
    /// ```
    #[must_use]
    pub fn convert_register_kind_to_register_number(&self, kind: RegisterKind, number: u32) -> Option<u32>
    {
        if kind == RegisterKind::Logical {
            return self.register_info_at_index(number).map(|_| number);
        }
        self.registers
            .iter()
            .find(|descriptor| descriptor.number(kind) == Some(number))
            .map(RegisterDescriptor::logical_index)
            .filter(|&index| index != INVALID_REGNUM)
    }

    /// Descriptor for a number in some scheme.
    #[must_use]
    pub fn register_info(&self, kind: RegisterKind, number: u32) -> Option<&'static RegisterDescriptor>
    {
        let index = self.convert_register_kind_to_register_number(kind, number)?;
        self.register_info_at_index(index)
    }

    /// Number of named register sets.
    #[must_use]
    pub fn register_set_count(&self) -> usize
    {
        self.sets.len()
    }

    /// Register set at `index`, or `None` when `index >= register_set_count()`.
    #[must_use]
    pub fn register_set(&self, index: usize) -> Option<&'static RegisterSet>
    {
        let sets: &'static [RegisterSet] = self.sets;
        sets.get(index)
    }

    /// Every register set, in order.
    #[must_use]
    pub fn register_sets(&self) -> &'static [RegisterSet]
    {
        self.sets
    }
}
