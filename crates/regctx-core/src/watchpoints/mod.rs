//! Hardware watchpoint bookkeeping.
//!
//! This module keeps the slot table behind the watchpoint operations every
//! register context exposes. The table tracks which hardware slots are armed,
//! what they watch, and whether a hit was reported; programming the actual
//! debug registers is left to the architecture backend.
//!
//! Architectures without watchpoint registers use a table of capacity zero.
//! Every operation still answers, but with "unsupported", "invalid index" or
//! `false`, so callers never need to special-case the architecture.

use bitflags::bitflags;
use tracing::debug;

use crate::error::{RegctxError, RegctxResult};
use crate::types::Address;

/// Slot index returned when no watchpoint could be allocated.
pub const INVALID_WATCHPOINT_INDEX: u32 = u32::MAX;

bitflags! {
    /// Memory accesses that trigger a watchpoint.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WatchFlags: u32 {
        /// Trigger on loads from the watched range.
        const READ = 1;
        /// Trigger on stores to the watched range.
        const WRITE = 2;
        /// Trigger on instruction fetch from the watched range.
        const EXECUTE = 4;
    }
}

/// Lifecycle states for a watchpoint slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchpointState
{
    /// Nothing is programmed into the slot.
    Vacant,
    /// Programmed and waiting for a matching access.
    Armed,
    /// A matching access was reported for the slot.
    Hit,
}

/// One hardware watchpoint slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchpointSlot
{
    /// Position of the slot in the hardware table.
    pub index: u32,
    /// Start of the watched range, [`Address::INVALID`] when vacant.
    pub address: Address,
    /// Length in bytes of the watched range.
    pub size: usize,
    /// Accesses that trigger the slot.
    pub flags: WatchFlags,
    /// Current lifecycle state.
    pub state: WatchpointState,
}

impl WatchpointSlot
{
    fn vacant(index: u32) -> Self
    {
        Self {
            index,
            address: Address::INVALID,
            size: 0,
            flags: WatchFlags::empty(),
            state: WatchpointState::Vacant,
        }
    }

    /// Whether nothing is programmed into the slot.
    #[must_use]
    pub fn is_vacant(&self) -> bool
    {
        self.state == WatchpointState::Vacant
    }
}

/// Fixed-capacity table of hardware watchpoint slots
///
/// ## Example
///
/// ```rust
/// use regctx_core::types::Address;
/// use regctx_core::watchpoints::{WatchFlags, WatchpointTable, INVALID_WATCHPOINT_INDEX};
///
/// let mut table = WatchpointTable::new("demo", 2);
/// let index = table.set(Address::new(0x1000), 8, WatchFlags::WRITE);
/// assert_eq!(index, 0);
/// assert_eq!(table.address(index), Address::new(0x1000));
///
/// let mut none = WatchpointTable::new("mips64", 0);
/// assert_eq!(none.set(Address::new(0x1000), 8, WatchFlags::WRITE), INVALID_WATCHPOINT_INDEX);
/// ```
#[derive(Debug, Clone)]
pub struct WatchpointTable
{
    variant: &'static str,
    slots: Vec<WatchpointSlot>,
}

impl WatchpointTable
{
    /// Create a table with `capacity` vacant slots for the named variant.
    #[must_use]
    pub fn new(variant: &'static str, capacity: u32) -> Self
    {
        Self {
            variant,
            slots: (0..capacity).map(WatchpointSlot::vacant).collect(),
        }
    }

    /// Number of hardware slots.
    #[must_use]
    pub fn capacity(&self) -> u32
    {
        u32::try_from(self.slots.len()).unwrap_or(u32::MAX)
    }

    /// Every slot, in index order.
    #[must_use]
    pub fn slots(&self) -> &[WatchpointSlot]
    {
        &self.slots
    }

    /// Slot at `index`, if it exists.
    #[must_use]
    pub fn slot(&self, index: u32) -> Option<&WatchpointSlot>
    {
        self.slots.get(usize::try_from(index).ok()?)
    }

    fn unsupported(&self, operation: &'static str) -> RegctxError
    {
        debug!(operation, variant = self.variant, "hardware watchpoints not supported");
        RegctxError::Unsupported {
            operation,
            variant: self.variant,
        }
    }

    /// Resolve `index` for an operation, failing with `Unsupported` when the
    /// table is empty and `WatchpointNotFound` when out of range.
    fn checked_slot(&self, operation: &'static str, index: u32) -> RegctxResult<&WatchpointSlot>
    {
        if self.slots.is_empty() {
            return Err(self.unsupported(operation));
        }
        self.slot(index).ok_or(RegctxError::WatchpointNotFound {
            index,
            capacity: self.capacity(),
        })
    }

    fn checked_slot_mut(&mut self, operation: &'static str, index: u32) -> RegctxResult<&mut WatchpointSlot>
    {
        self.checked_slot(operation, index)?;
        let capacity = self.capacity();
        usize::try_from(index)
            .ok()
            .and_then(|position| self.slots.get_mut(position))
            .ok_or(RegctxError::WatchpointNotFound { index, capacity })
    }

    fn validate(address: Address, size: usize, flags: WatchFlags) -> RegctxResult<()>
    {
        if size == 0 {
            return Err(RegctxError::InvalidArgument("watchpoint size must be non-zero".to_string()));
        }
        if flags.is_empty() {
            return Err(RegctxError::InvalidArgument(
                "watchpoint needs at least one of read, write or execute".to_string(),
            ));
        }
        if !address.is_valid() {
            return Err(RegctxError::InvalidArgument(format!("cannot watch invalid address {address}")));
        }
        Ok(())
    }

    /// Arm the first vacant slot, returning its index or
    /// [`INVALID_WATCHPOINT_INDEX`] when nothing could be armed.
    pub fn set(&mut self, address: Address, size: usize, flags: WatchFlags) -> u32
    {
        if self.slots.is_empty() {
            debug!(variant = self.variant, "no hardware watchpoint slots");
            return INVALID_WATCHPOINT_INDEX;
        }
        if let Err(err) = Self::validate(address, size, flags) {
            debug!(%err, "rejected watchpoint request");
            return INVALID_WATCHPOINT_INDEX;
        }
        let Some(index) = self.slots.iter().find(|slot| slot.is_vacant()).map(|slot| slot.index) else {
            debug!(capacity = self.capacity(), "all hardware watchpoint slots in use");
            return INVALID_WATCHPOINT_INDEX;
        };
        match self.set_with_index(address, size, flags, index) {
            Ok(()) => index,
            Err(_) => INVALID_WATCHPOINT_INDEX,
        }
    }

    /// Arm a specific slot, replacing whatever it held.
    pub fn set_with_index(&mut self, address: Address, size: usize, flags: WatchFlags, index: u32) -> RegctxResult<()>
    {
        let slot = self.checked_slot_mut("SetHardwareWatchpointWithIndex", index)?;
        Self::validate(address, size, flags)?;
        *slot = WatchpointSlot {
            index,
            address,
            size,
            flags,
            state: WatchpointState::Armed,
        };
        debug!(index, %address, size, ?flags, "armed watchpoint");
        Ok(())
    }

    /// Vacate a slot. Returns `false` when the slot does not exist.
    pub fn clear(&mut self, index: u32) -> bool
    {
        match self.checked_slot_mut("ClearHardwareWatchpoint", index) {
            Ok(slot) => {
                *slot = WatchpointSlot::vacant(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Vacate every slot.
    pub fn clear_all(&mut self) -> RegctxResult<()>
    {
        if self.slots.is_empty() {
            return Err(self.unsupported("ClearAllHardwareWatchpoints"));
        }
        for slot in &mut self.slots {
            *slot = WatchpointSlot::vacant(slot.index);
        }
        Ok(())
    }

    /// Record a hit reported for an armed slot.
    pub fn mark_hit(&mut self, index: u32) -> RegctxResult<()>
    {
        let slot = self.checked_slot_mut("MarkWatchpointHit", index)?;
        if slot.is_vacant() {
            return Err(RegctxError::InvalidArgument(format!("watchpoint slot {index} is vacant")));
        }
        slot.state = WatchpointState::Hit;
        Ok(())
    }

    /// Whether a hit was recorded for the slot; `is_hit` is cleared first.
    pub fn is_hit(&self, index: u32, is_hit: &mut bool) -> RegctxResult<()>
    {
        *is_hit = false;
        let slot = self.checked_slot("IsWatchpointHit", index)?;
        *is_hit = slot.state == WatchpointState::Hit;
        Ok(())
    }

    /// Whether the slot is vacant; `is_vacant` is cleared first.
    pub fn is_vacant(&self, index: u32, is_vacant: &mut bool) -> RegctxResult<()>
    {
        *is_vacant = false;
        let slot = self.checked_slot("IsWatchpointVacant", index)?;
        *is_vacant = slot.is_vacant();
        Ok(())
    }

    /// Watched address of an occupied slot, or [`Address::INVALID`].
    #[must_use]
    pub fn address(&self, index: u32) -> Address
    {
        self.slot(index)
            .filter(|slot| !slot.is_vacant())
            .map_or(Address::INVALID, |slot| slot.address)
    }
}

/// Watchpoint operations of a register context
///
/// Implementors only hand out their slot table; every operation is provided
/// on top of it, so architectures without watchpoint registers get the
/// uniform "unsupported" answers for free.
pub trait WatchpointCapability
{
    /// Slot table of the context.
    fn watchpoints(&self) -> &WatchpointTable;

    /// Mutable slot table of the context.
    fn watchpoints_mut(&mut self) -> &mut WatchpointTable;

    /// Number of hardware watchpoint slots (0 when unsupported).
    fn num_supported_hardware_watchpoints(&self) -> u32
    {
        self.watchpoints().capacity()
    }

    /// Arm the next free slot; [`INVALID_WATCHPOINT_INDEX`] on failure.
    fn set_hardware_watchpoint(&mut self, address: Address, size: usize, flags: WatchFlags) -> u32
    {
        self.watchpoints_mut().set(address, size, flags)
    }

    /// Arm the slot at `index`.
    fn set_hardware_watchpoint_with_index(
        &mut self,
        address: Address,
        size: usize,
        flags: WatchFlags,
        index: u32,
    ) -> RegctxResult<()>
    {
        self.watchpoints_mut().set_with_index(address, size, flags, index)
    }

    /// Vacate the slot at `index`; `false` when unsupported or out of range.
    fn clear_hardware_watchpoint(&mut self, index: u32) -> bool
    {
        self.watchpoints_mut().clear(index)
    }

    /// Vacate every slot.
    fn clear_all_hardware_watchpoints(&mut self) -> RegctxResult<()>
    {
        self.watchpoints_mut().clear_all()
    }

    /// Query whether the slot at `index` was hit.
    fn is_watchpoint_hit(&self, index: u32, is_hit: &mut bool) -> RegctxResult<()>
    {
        self.watchpoints().is_hit(index, is_hit)
    }

    /// Query whether the slot at `index` is vacant.
    fn is_watchpoint_vacant(&self, index: u32, is_vacant: &mut bool) -> RegctxResult<()>
    {
        self.watchpoints().is_vacant(index, is_vacant)
    }

    /// Watched address of the slot at `index`, or [`Address::INVALID`].
    fn watchpoint_address(&self, index: u32) -> Address
    {
        self.watchpoints().address(index)
    }

    /// Record an externally detected hit of the slot at `index`.
    fn mark_watchpoint_hit(&mut self, index: u32) -> RegctxResult<()>
    {
        self.watchpoints_mut().mark_hit(index)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_slot_state_machine()
    {
        let mut table = WatchpointTable::new("test", 2);
        let mut flag = true;

        table.is_vacant(1, &mut flag).unwrap();
        assert!(flag);

        table.set_with_index(Address::new(0x2000), 4, WatchFlags::READ | WatchFlags::WRITE, 1).unwrap();
        table.is_vacant(1, &mut flag).unwrap();
        assert!(!flag);
        table.is_hit(1, &mut flag).unwrap();
        assert!(!flag);

        table.mark_hit(1).unwrap();
        table.is_hit(1, &mut flag).unwrap();
        assert!(flag);
        assert_eq!(table.address(1), Address::new(0x2000));

        assert!(table.clear(1));
        table.is_vacant(1, &mut flag).unwrap();
        assert!(flag);
        assert_eq!(table.address(1), Address::INVALID);
    }

    #[test]
    fn test_set_fills_first_vacant_slot()
    {
        let mut table = WatchpointTable::new("test", 2);
        assert_eq!(table.set(Address::new(0x10), 8, WatchFlags::WRITE), 0);
        assert_eq!(table.set(Address::new(0x20), 8, WatchFlags::WRITE), 1);
        assert_eq!(table.set(Address::new(0x30), 8, WatchFlags::WRITE), INVALID_WATCHPOINT_INDEX);

        assert!(table.clear(0));
        assert_eq!(table.set(Address::new(0x30), 8, WatchFlags::EXECUTE), 0);
    }

    #[test]
    fn test_malformed_requests()
    {
        let mut table = WatchpointTable::new("test", 1);
        assert!(matches!(
            table.set_with_index(Address::new(0x10), 0, WatchFlags::READ, 0),
            Err(RegctxError::InvalidArgument(_))
        ));
        assert!(matches!(
            table.set_with_index(Address::new(0x10), 4, WatchFlags::empty(), 0),
            Err(RegctxError::InvalidArgument(_))
        ));
        assert!(matches!(
            table.set_with_index(Address::new(0x10), 4, WatchFlags::READ, 1),
            Err(RegctxError::WatchpointNotFound { index: 1, capacity: 1 })
        ));
        assert_eq!(table.set(Address::INVALID, 4, WatchFlags::READ), INVALID_WATCHPOINT_INDEX);
        assert!(table.slot(0).is_some_and(WatchpointSlot::is_vacant));
    }

    #[test]
    fn test_mark_hit_requires_armed_slot()
    {
        let mut table = WatchpointTable::new("test", 1);
        assert!(matches!(table.mark_hit(0), Err(RegctxError::InvalidArgument(_))));
    }

    #[test]
    fn test_zero_capacity_table()
    {
        let mut table = WatchpointTable::new("none", 0);
        let mut flag = true;

        assert_eq!(table.capacity(), 0);
        assert!(table.clear_all().unwrap_err().is_unsupported());
        assert!(table.is_hit(0, &mut flag).is_err());
        assert!(!flag);
        assert!(!table.clear(0));
    }
}
