//! Register descriptors and register sets.
//!
//! A [`RegisterDescriptor`] is the metadata the debugger keeps for one logical
//! register: where it lives in the thread's raw register storage, how wide it
//! is, how to interpret its bytes, and what number it has in each of the
//! numbering schemes the rest of the debugger speaks (DWARF, GDB remote, the
//! OS's own register numbering, ...).

use std::fmt;

/// Sentinel for "no register number in this scheme"
///
/// Register sets end with this value, and a descriptor whose
/// [`RegisterKind::Logical`] number is `INVALID_REGNUM` is internal-only.
pub const INVALID_REGNUM: u32 = u32::MAX;

/// Register numbering scheme
///
/// Every descriptor carries one number per scheme, indexed by
/// [`RegisterKind::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterKind
{
    /// Numbering used by `.eh_frame` unwind tables
    EhFrame,
    /// DWARF debug information register numbering
    Dwarf,
    /// Architecture-neutral roles, see [`GenericRegister`]
    Generic,
    /// GDB remote protocol numbering
    Gdb,
    /// Native OS numbering (slot in the Linux general register set)
    Native,
    /// Logical index inside the register context
    Logical,
}

impl RegisterKind
{
    /// Number of numbering schemes.
    pub const COUNT: usize = 6;

    /// All schemes in table order.
    pub const ALL: [RegisterKind; Self::COUNT] = [
        RegisterKind::EhFrame,
        RegisterKind::Dwarf,
        RegisterKind::Generic,
        RegisterKind::Gdb,
        RegisterKind::Native,
        RegisterKind::Logical,
    ];

    /// Position of this scheme inside [`RegisterDescriptor::kinds`].
    #[must_use]
    pub const fn index(self) -> usize
    {
        match self {
            RegisterKind::EhFrame => 0,
            RegisterKind::Dwarf => 1,
            RegisterKind::Generic => 2,
            RegisterKind::Gdb => 3,
            RegisterKind::Native => 4,
            RegisterKind::Logical => 5,
        }
    }
}

impl fmt::Display for RegisterKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            RegisterKind::EhFrame => write!(f, "eh_frame"),
            RegisterKind::Dwarf => write!(f, "dwarf"),
            RegisterKind::Generic => write!(f, "generic"),
            RegisterKind::Gdb => write!(f, "gdb"),
            RegisterKind::Native => write!(f, "native"),
            RegisterKind::Logical => write!(f, "logical"),
        }
    }
}

/// Architecture-neutral register roles
///
/// The discriminant is the register's number in the [`RegisterKind::Generic`]
/// scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum GenericRegister
{
    /// Program counter
    Pc = 0,
    /// Stack pointer
    Sp = 1,
    /// Frame pointer
    Fp = 2,
    /// Return address
    Ra = 3,
    /// Status / flags
    Flags = 4,
    /// First integer argument
    Arg1 = 5,
    /// Second integer argument
    Arg2 = 6,
    /// Third integer argument
    Arg3 = 7,
    /// Fourth integer argument
    Arg4 = 8,
    /// Fifth integer argument
    Arg5 = 9,
    /// Sixth integer argument
    Arg6 = 10,
    /// Seventh integer argument
    Arg7 = 11,
    /// Eighth integer argument
    Arg8 = 12,
}

impl GenericRegister
{
    /// Number of this role in the generic scheme.
    #[must_use]
    pub const fn number(self) -> u32
    {
        self as u32
    }
}

/// How the bytes of a register are encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding
{
    /// Unsigned integer
    Uint,
    /// Two's complement signed integer
    Sint,
    /// IEEE-754 floating point
    Ieee754,
    /// Vector of lanes
    Vector,
}

/// Preferred display format for a register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format
{
    /// Hexadecimal
    Hex,
    /// Signed or unsigned decimal
    Decimal,
    /// Binary digits
    Binary,
    /// Floating point
    Float,
    /// Raw byte list
    Bytes,
}

/// Metadata describing one logical register
///
/// Descriptors live in the static tables of the layout catalog and are shared
/// by `&'static` reference.
///
/// ## Example
///
/// ```rust
/// use regctx_core::catalog::{MachineVariant, RegisterCatalog};
/// use regctx_core::types::RegisterKind;
///
/// let catalog = RegisterCatalog::for_variant(MachineVariant::Mips64el);
/// let sp = catalog.register_info_by_name("sp").unwrap();
/// assert_eq!(sp.name, "r29");
/// assert_eq!(sp.byte_offset, 29 * 8);
/// assert_eq!(sp.number(RegisterKind::Dwarf), Some(29));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDescriptor
{
    /// Primary register name
    pub name: &'static str,
    /// Alternate (ABI) name, if any
    pub alt_name: Option<&'static str>,
    /// Width of the register in bytes
    pub byte_size: u32,
    /// Offset of the register inside the thread's raw register storage
    pub byte_offset: u32,
    /// How the bytes are encoded
    pub encoding: Encoding,
    /// Preferred display format
    pub format: Format,
    /// Register number per scheme, indexed by [`RegisterKind::index`]
    pub kinds: [u32; RegisterKind::COUNT],
}

impl RegisterDescriptor
{
    /// Number of this register in the given scheme, if it has one.
    #[must_use]
    pub const fn number(&self, kind: RegisterKind) -> Option<u32>
    {
        match self.kinds[kind.index()] {
            INVALID_REGNUM => None,
            number => Some(number),
        }
    }

    /// Logical index of this register, or [`INVALID_REGNUM`] for internal-only registers.
    #[must_use]
    pub const fn logical_index(&self) -> u32
    {
        self.kinds[RegisterKind::Logical.index()]
    }

    /// Whether this register is for the debugger's own bookkeeping only
    ///
    /// Internal-only registers have no logical number and are never passed to
    /// raw register storage.
    #[must_use]
    pub const fn is_internal_only(&self) -> bool
    {
        self.logical_index() == INVALID_REGNUM
    }
}

/// Named, ordered group of registers
///
/// `registers` holds logical register indices terminated by [`INVALID_REGNUM`];
/// `num_registers` counts the indices before the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSet
{
    /// Display name, e.g. "General Purpose Registers"
    pub name: &'static str,
    /// Short name, e.g. "gpr"
    pub short_name: &'static str,
    /// Number of registers in the set (sentinel excluded)
    pub num_registers: usize,
    /// Logical register indices followed by the sentinel
    pub registers: &'static [u32],
}

impl RegisterSet
{
    /// Logical register indices of the set, without the trailing sentinel.
    #[must_use]
    pub fn register_indices(&self) -> &'static [u32]
    {
        let registers: &'static [u32] = self.registers;
        match registers.split_last() {
            Some((&INVALID_REGNUM, indices)) => indices,
            _ => registers,
        }
    }

    /// Whether the set contains the given logical register index.
    #[must_use]
    pub fn contains(&self, index: u32) -> bool
    {
        index != INVALID_REGNUM && self.register_indices().contains(&index)
    }
}
