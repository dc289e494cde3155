//! Tests for the watchpoint capability surface

use std::sync::Arc;

use regctx_core::context::NativeRegisterContextMips64;
use regctx_core::error::RegctxError;
use regctx_core::native::{NativeProcess, ThreadHandle};
use regctx_core::platform::loopback::LoopbackProcess;
use regctx_core::types::{Address, Architecture, ByteOrder, ThreadId};
use regctx_core::watchpoints::{
    WatchFlags, WatchpointCapability, WatchpointState, WatchpointTable, INVALID_WATCHPOINT_INDEX,
};

fn mips64_context() -> (Arc<dyn NativeProcess>, NativeRegisterContextMips64<ThreadHandle>)
{
    let process: Arc<dyn NativeProcess> = Arc::new(LoopbackProcess::new(304, ByteOrder::Big));
    let context = NativeRegisterContextMips64::new(ThreadHandle::new(ThreadId::from(9), &process), Architecture::Mips64);
    (process, context)
}

/// Context with watchpoint registers, for exercising the slot state machine.
struct FourSlots(WatchpointTable);

impl WatchpointCapability for FourSlots
{
    fn watchpoints(&self) -> &WatchpointTable
    {
        &self.0
    }

    fn watchpoints_mut(&mut self) -> &mut WatchpointTable
    {
        &mut self.0
    }
}

#[test]
fn test_mips64_has_no_watchpoints()
{
    let (_process, mut context) = mips64_context();
    assert_eq!(context.num_supported_hardware_watchpoints(), 0);
    assert_eq!(
        context.set_hardware_watchpoint(Address::new(0x1000), 8, WatchFlags::WRITE),
        INVALID_WATCHPOINT_INDEX
    );
    assert!(!context.clear_hardware_watchpoint(0));
    assert_eq!(context.watchpoint_address(0), Address::INVALID);
}

#[test]
fn test_mips64_watchpoint_changes_are_unsupported()
{
    let (_process, mut context) = mips64_context();

    let err = context
        .set_hardware_watchpoint_with_index(Address::new(0x1000), 8, WatchFlags::READ, 0)
        .unwrap_err();
    assert!(matches!(err, RegctxError::Unsupported { variant: "mips64", .. }));
    assert!(context.clear_all_hardware_watchpoints().unwrap_err().is_unsupported());
    assert!(context.mark_watchpoint_hit(0).unwrap_err().is_unsupported());
}

#[test]
fn test_mips64_status_queries_clear_output_first()
{
    let (_process, context) = mips64_context();

    let mut is_hit = true;
    assert!(context.is_watchpoint_hit(0, &mut is_hit).unwrap_err().is_unsupported());
    assert!(!is_hit);

    let mut is_vacant = true;
    assert!(context.is_watchpoint_vacant(3, &mut is_vacant).unwrap_err().is_unsupported());
    assert!(!is_vacant);
}

#[test]
fn test_slot_lifecycle()
{
    let mut slots = FourSlots(WatchpointTable::new("test", 4));
    assert_eq!(slots.num_supported_hardware_watchpoints(), 4);

    let index = slots.set_hardware_watchpoint(Address::new(0x4000), 4, WatchFlags::READ | WatchFlags::WRITE);
    assert_eq!(index, 0);
    assert_eq!(slots.watchpoints().slot(index).map(|slot| slot.state), Some(WatchpointState::Armed));
    assert_eq!(slots.watchpoint_address(index), Address::new(0x4000));

    let mut is_hit = true;
    slots.is_watchpoint_hit(index, &mut is_hit).unwrap();
    assert!(!is_hit);

    slots.mark_watchpoint_hit(index).unwrap();
    slots.is_watchpoint_hit(index, &mut is_hit).unwrap();
    assert!(is_hit);

    assert!(slots.clear_hardware_watchpoint(index));
    let mut is_vacant = false;
    slots.is_watchpoint_vacant(index, &mut is_vacant).unwrap();
    assert!(is_vacant);
    assert_eq!(slots.watchpoint_address(index), Address::INVALID);
}

#[test]
fn test_slot_index_out_of_range()
{
    let mut slots = FourSlots(WatchpointTable::new("test", 4));
    let err = slots
        .set_hardware_watchpoint_with_index(Address::new(0x4000), 8, WatchFlags::EXECUTE, 4)
        .unwrap_err();
    assert!(matches!(err, RegctxError::WatchpointNotFound { index: 4, capacity: 4 }));
    assert!(!slots.clear_hardware_watchpoint(4));

    let mut is_vacant = true;
    assert!(slots.is_watchpoint_vacant(4, &mut is_vacant).is_err());
    assert!(!is_vacant);
}

#[test]
fn test_clear_all_vacates_every_slot()
{
    let mut slots = FourSlots(WatchpointTable::new("test", 4));
    for offset in 0..4u64 {
        let index = slots.set_hardware_watchpoint(Address::new(0x100 * (offset + 1)), 8, WatchFlags::WRITE);
        assert_ne!(index, INVALID_WATCHPOINT_INDEX);
    }
    assert_eq!(
        slots.set_hardware_watchpoint(Address::new(0x900), 8, WatchFlags::WRITE),
        INVALID_WATCHPOINT_INDEX
    );

    slots.clear_all_hardware_watchpoints().unwrap();
    assert!(slots.watchpoints().slots().iter().all(|slot| slot.state == WatchpointState::Vacant));
}

#[test]
fn test_malformed_request_is_rejected()
{
    let mut slots = FourSlots(WatchpointTable::new("test", 4));
    assert!(matches!(
        slots.set_hardware_watchpoint_with_index(Address::new(0x10), 0, WatchFlags::READ, 0),
        Err(RegctxError::InvalidArgument(_))
    ));
    assert!(matches!(
        slots.set_hardware_watchpoint_with_index(Address::new(0x10), 8, WatchFlags::empty(), 0),
        Err(RegctxError::InvalidArgument(_))
    ));
    assert_eq!(
        slots.set_hardware_watchpoint(Address::new(0x10), 0, WatchFlags::READ),
        INVALID_WATCHPOINT_INDEX
    );
}
