//! Process, thread, and architecture types.

use std::fmt;
use std::str::FromStr;

/// Process identifier (PID)
///
/// Using a newtype instead of a raw `u32` keeps PIDs from being confused with
/// thread ids or register numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessId(pub u32);

impl From<u32> for ProcessId
{
    fn from(pid: u32) -> Self
    {
        ProcessId(pid)
    }
}

impl From<ProcessId> for u32
{
    fn from(pid: ProcessId) -> Self
    {
        pid.0
    }
}

/// Thread identifier
///
/// On Linux this is the kernel TID of the traced thread, which is what the
/// tracing interface expects when reading or writing register storage.
///
/// ## Example
///
/// ```rust
/// use regctx_core::types::ThreadId;
///
/// let thread = ThreadId::from(12345);
/// assert_eq!(thread.raw(), 12345);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadId(pub u64);

impl ThreadId
{
    /// Get the raw `u64` representation of the thread identifier
    pub fn raw(&self) -> u64
    {
        self.0
    }
}

impl From<u64> for ThreadId
{
    fn from(value: u64) -> Self
    {
        Self(value)
    }
}

impl fmt::Display for ThreadId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

/// Byte order of a target's register storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder
{
    /// Least significant byte first
    Little,
    /// Most significant byte first
    Big,
}

impl fmt::Display for ByteOrder
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            ByteOrder::Little => write!(f, "little-endian"),
            ByteOrder::Big => write!(f, "big-endian"),
        }
    }
}

/// CPU architecture of the debug target
///
/// This is the broad machine classification the debugger knows about. A
/// register context narrows it once, at construction, to the variants it has
/// a layout catalog for.
///
/// ## Example
///
/// ```rust
/// use regctx_core::types::Architecture;
///
/// let arch: Architecture = "mips64el".parse().unwrap();
/// assert_eq!(arch, Architecture::Mips64el);
/// assert_eq!(arch.to_string(), "mips64el");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture
{
    /// 64-bit ARM
    Arm64,
    /// 64-bit x86 (Intel/AMD)
    X86_64,
    /// 32-bit MIPS, big-endian
    Mips,
    /// 32-bit MIPS, little-endian
    Mipsel,
    /// 64-bit MIPS, big-endian
    Mips64,
    /// 64-bit MIPS, little-endian
    Mips64el,
    /// Any other architecture (or unknown)
    ///
    /// The `&'static str` contains the architecture name (e.g., "riscv64", "powerpc64").
    Unknown(&'static str),
}

impl Architecture
{
    /// Byte order used by this architecture's register storage.
    #[must_use]
    pub const fn byte_order(self) -> ByteOrder
    {
        match self {
            Architecture::Mips | Architecture::Mips64 => ByteOrder::Big,
            Architecture::Arm64
            | Architecture::X86_64
            | Architecture::Mipsel
            | Architecture::Mips64el
            | Architecture::Unknown(_) => ByteOrder::Little,
        }
    }
}

impl fmt::Display for Architecture
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Architecture::Arm64 => write!(f, "arm64"),
            Architecture::X86_64 => write!(f, "x86_64"),
            Architecture::Mips => write!(f, "mips"),
            Architecture::Mipsel => write!(f, "mipsel"),
            Architecture::Mips64 => write!(f, "mips64"),
            Architecture::Mips64el => write!(f, "mips64el"),
            Architecture::Unknown(name) => write!(f, "{name}"),
        }
    }
}

impl FromStr for Architecture
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "arm64" | "aarch64" => Ok(Architecture::Arm64),
            "x86_64" | "x86-64" | "amd64" => Ok(Architecture::X86_64),
            "mips" => Ok(Architecture::Mips),
            "mipsel" => Ok(Architecture::Mipsel),
            "mips64" => Ok(Architecture::Mips64),
            "mips64el" => Ok(Architecture::Mips64el),
            _ => Err(format!(
                "Unknown architecture: {s}. Use 'arm64', 'x86_64', 'mips', 'mipsel', 'mips64', or 'mips64el'"
            )),
        }
    }
}
