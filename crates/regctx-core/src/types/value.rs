//! Register values.
//!
//! A [`RegisterValue`] is the bytes of one register plus a type tag saying how
//! to interpret them. The bytes are always kept least significant byte first,
//! whatever the target's byte order; converting to and from the target's
//! storage order is the job of the process collaborator.

use smallvec::SmallVec;

use super::registers::{Encoding, RegisterDescriptor};

/// How the bytes of a [`RegisterValue`] are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterValueType
{
    /// No value has been stored
    Invalid,
    /// 8-bit unsigned integer
    UInt8,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit unsigned integer
    UInt32,
    /// 64-bit unsigned integer (machine word)
    UInt64,
    /// 128-bit unsigned integer
    UInt128,
    /// 32-bit IEEE-754 float
    Float,
    /// 64-bit IEEE-754 float
    Double,
    /// Uninterpreted bytes
    Bytes,
}

impl RegisterValueType
{
    /// Type a register with the given encoding and width should carry.
    #[must_use]
    pub const fn for_register(encoding: Encoding, byte_size: u32) -> Self
    {
        match (encoding, byte_size) {
            (Encoding::Uint | Encoding::Sint, 1) => RegisterValueType::UInt8,
            (Encoding::Uint | Encoding::Sint, 2) => RegisterValueType::UInt16,
            (Encoding::Uint | Encoding::Sint, 4) => RegisterValueType::UInt32,
            (Encoding::Uint | Encoding::Sint, 8) => RegisterValueType::UInt64,
            (Encoding::Uint | Encoding::Sint, 16) => RegisterValueType::UInt128,
            (Encoding::Ieee754, 4) => RegisterValueType::Float,
            (Encoding::Ieee754, 8) => RegisterValueType::Double,
            _ => RegisterValueType::Bytes,
        }
    }

    /// Whether this type is an unsigned integer.
    #[must_use]
    pub const fn is_integer(self) -> bool
    {
        matches!(
            self,
            RegisterValueType::UInt8
                | RegisterValueType::UInt16
                | RegisterValueType::UInt32
                | RegisterValueType::UInt64
                | RegisterValueType::UInt128
        )
    }
}

/// Value of one register
///
/// Values up to 16 bytes are stored inline.
///
/// ## Example
///
/// ```rust
/// use regctx_core::types::{RegisterValue, RegisterValueType};
///
/// let value = RegisterValue::from_u64(0x0011_2233_4455_6677);
/// assert_eq!(value.value_type(), RegisterValueType::UInt64);
/// assert_eq!(value.byte_size(), 8);
/// assert_eq!(value.bytes()[0], 0x77);
/// assert_eq!(value.as_u64(), Some(0x0011_2233_4455_6677));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterValue
{
    value_type: RegisterValueType,
    bytes: SmallVec<[u8; 16]>,
}

impl RegisterValue
{
    /// Empty value with type [`RegisterValueType::Invalid`].
    #[must_use]
    pub fn invalid() -> Self
    {
        Self {
            value_type: RegisterValueType::Invalid,
            bytes: SmallVec::new(),
        }
    }

    /// 8-bit unsigned value.
    #[must_use]
    pub fn from_u8(value: u8) -> Self
    {
        Self::scalar(RegisterValueType::UInt8, &[value])
    }

    /// 16-bit unsigned value.
    #[must_use]
    pub fn from_u16(value: u16) -> Self
    {
        Self::scalar(RegisterValueType::UInt16, &value.to_le_bytes())
    }

    /// 32-bit unsigned value.
    #[must_use]
    pub fn from_u32(value: u32) -> Self
    {
        Self::scalar(RegisterValueType::UInt32, &value.to_le_bytes())
    }

    /// 64-bit unsigned value.
    #[must_use]
    pub fn from_u64(value: u64) -> Self
    {
        Self::scalar(RegisterValueType::UInt64, &value.to_le_bytes())
    }

    /// 128-bit unsigned value.
    #[must_use]
    pub fn from_u128(value: u128) -> Self
    {
        Self::scalar(RegisterValueType::UInt128, &value.to_le_bytes())
    }

    /// 32-bit float.
    #[must_use]
    pub fn from_f32(value: f32) -> Self
    {
        Self::scalar(RegisterValueType::Float, &value.to_le_bytes())
    }

    /// 64-bit float.
    #[must_use]
    pub fn from_f64(value: f64) -> Self
    {
        Self::scalar(RegisterValueType::Double, &value.to_le_bytes())
    }

    /// Uninterpreted bytes, least significant byte first.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self
    {
        Self::scalar(RegisterValueType::Bytes, bytes)
    }

    fn scalar(value_type: RegisterValueType, bytes: &[u8]) -> Self
    {
        Self {
            value_type,
            bytes: SmallVec::from_slice(bytes),
        }
    }

    /// Type tag of the value.
    #[must_use]
    pub fn value_type(&self) -> RegisterValueType
    {
        self.value_type
    }

    /// Width of the value in bytes.
    #[must_use]
    pub fn byte_size(&self) -> usize
    {
        self.bytes.len()
    }

    /// Raw bytes, least significant byte first.
    #[must_use]
    pub fn bytes(&self) -> &[u8]
    {
        &self.bytes
    }

    /// Whether a value has been stored.
    #[must_use]
    pub fn is_valid(&self) -> bool
    {
        self.value_type != RegisterValueType::Invalid
    }

    /// Value as an unsigned machine word
    ///
    /// Returns `None` unless the value is an integer of at most 8 bytes.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64>
    {
        if !self.value_type.is_integer() || self.bytes.len() > 8 {
            return None;
        }
        let mut word = [0u8; 8];
        word[..self.bytes.len()].copy_from_slice(&self.bytes);
        Some(u64::from_le_bytes(word))
    }

    /// Value as a 128-bit unsigned integer, if it is an integer.
    #[must_use]
    pub fn as_u128(&self) -> Option<u128>
    {
        if !self.value_type.is_integer() {
            return None;
        }
        let mut wide = [0u8; 16];
        wide[..self.bytes.len()].copy_from_slice(&self.bytes);
        Some(u128::from_le_bytes(wide))
    }

    /// Re-type the value with the descriptor's own type
    ///
    /// The value is narrowed (or zero-extended) to the descriptor's byte size,
    /// keeping the least significant bytes. Returns `false` and leaves the value
    /// unchanged if the descriptor's width cannot be stored inline.
    pub fn set_type(&mut self, descriptor: &RegisterDescriptor) -> bool
    {
        let Ok(byte_size) = usize::try_from(descriptor.byte_size) else {
            return false;
        };
        if byte_size > self.bytes.inline_size() {
            return false;
        }
        self.bytes.resize(byte_size, 0);
        self.value_type = RegisterValueType::for_register(descriptor.encoding, descriptor.byte_size);
        true
    }
}

impl Default for RegisterValue
{
    fn default() -> Self
    {
        Self::invalid()
    }
}
