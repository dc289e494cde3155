//! Tests for MIPS64 register contexts backed by the loopback process

use std::sync::Arc;

use proptest::prelude::*;
use regctx_core::catalog::{mips64, CapabilityProfile, MachineVariant, RegisterCatalog};
use regctx_core::context::{NativeRegisterContext, NativeRegisterContextMips64};
use regctx_core::error::{RegctxError, RegctxResult};
use regctx_core::native::{NativeProcess, ThreadHandle};
use regctx_core::platform::loopback::LoopbackProcess;
use regctx_core::types::{
    Address, Architecture, ByteOrder, RegisterDescriptor, RegisterKind, RegisterValue, RegisterValueType, ThreadId,
    INVALID_REGNUM,
};
use regctx_core::watchpoints::{WatchpointCapability, WatchpointTable};

const THREAD: ThreadId = ThreadId(4242);

struct Fixture
{
    loopback: Arc<LoopbackProcess>,
    context: NativeRegisterContextMips64<ThreadHandle>,
}

fn fixture(architecture: Architecture) -> Fixture
{
    let loopback = Arc::new(LoopbackProcess::new(mips64::GPR_STORAGE_SIZE, architecture.byte_order()));
    let process: Arc<dyn NativeProcess> = loopback.clone();
    let context = NativeRegisterContextMips64::new(ThreadHandle::new(THREAD, &process), architecture);
    Fixture { loopback, context }
}

/// MIPS64 context that declares bulk transfer, to exercise the provided
/// register-by-register save and restore.
struct BulkCapable(NativeRegisterContextMips64<ThreadHandle>);

impl WatchpointCapability for BulkCapable
{
    fn watchpoints(&self) -> &WatchpointTable
    {
        self.0.watchpoints()
    }

    fn watchpoints_mut(&mut self) -> &mut WatchpointTable
    {
        self.0.watchpoints_mut()
    }
}

impl NativeRegisterContext for BulkCapable
{
    fn catalog(&self) -> &'static RegisterCatalog
    {
        self.0.catalog()
    }

    fn thread_id(&self) -> ThreadId
    {
        self.0.thread_id()
    }

    fn variant(&self) -> MachineVariant
    {
        self.0.variant()
    }

    fn capabilities(&self) -> CapabilityProfile
    {
        CapabilityProfile {
            bulk_transfer: true,
            ..self.0.capabilities()
        }
    }

    fn read_register_raw(&self, index: u32) -> RegctxResult<RegisterValue>
    {
        self.0.read_register_raw(index)
    }

    fn write_register_raw(&mut self, index: u32, value: &RegisterValue) -> RegctxResult<()>
    {
        self.0.write_register_raw(index, value)
    }

    fn read_register(&self, descriptor: Option<&RegisterDescriptor>) -> RegctxResult<RegisterValue>
    {
        self.0.read_register(descriptor)
    }

    fn write_register(&mut self, descriptor: Option<&RegisterDescriptor>, value: &RegisterValue) -> RegctxResult<()>
    {
        self.0.write_register(descriptor, value)
    }
}

fn internal_only() -> RegisterDescriptor
{
    let mut descriptor = mips64::REGISTERS[0];
    descriptor.name = "shadow";
    descriptor.kinds = [INVALID_REGNUM; RegisterKind::COUNT];
    descriptor
}

#[test]
fn test_register_sets()
{
    let Fixture { loopback: _loopback, context } = fixture(Architecture::Mips64);
    assert_eq!(context.register_set_count(), 1);

    let set = context.register_set(0).expect("gpr set");
    assert_eq!(set.num_registers, 38);
    assert_eq!(set.registers.len(), 39);
    assert!(context.register_set(1).is_none());
}

#[test]
fn test_big_and_little_endian_share_tables()
{
    let big = fixture(Architecture::Mips64);
    let little = fixture(Architecture::Mips64el);
    assert!(std::ptr::eq(big.context.catalog(), little.context.catalog()));
    assert_eq!(big.context.variant(), MachineVariant::Mips64);
    assert_eq!(little.context.variant(), MachineVariant::Mips64el);
}

#[test]
fn test_internal_only_register_never_reaches_process()
{
    let Fixture { loopback, mut context } = fixture(Architecture::Mips64el);
    let descriptor = internal_only();

    let read = context.read_register(Some(&descriptor));
    assert!(matches!(read, Err(RegctxError::InvalidRegister(ref name)) if name == "shadow"));

    let write = context.write_register(Some(&descriptor), &RegisterValue::from_u64(1));
    assert!(matches!(write, Err(RegctxError::InvalidRegister(_))));

    assert_eq!(loopback.read_calls(), 0);
    assert_eq!(loopback.write_calls(), 0);
}

#[test]
fn test_read_after_process_exit_is_null_reference()
{
    let Fixture { loopback, context } = fixture(Architecture::Mips64el);
    drop(loopback);

    let mut value = RegisterValue::from_u64(0xfeed);
    match context.read_register(context.register_info_by_name("pc")) {
        Ok(read) => value = read,
        Err(err) => assert!(matches!(err, RegctxError::NullReference(_))),
    }
    assert_eq!(value, RegisterValue::from_u64(0xfeed));
    assert!(matches!(context.read_register_raw(0), Err(RegctxError::NullReference(_))));
}

#[test]
fn test_unknown_register_is_not_found()
{
    let Fixture { loopback, mut context } = fixture(Architecture::Mips64el);
    assert!(matches!(context.read_register_raw(38), Err(RegctxError::RegisterNotFound(38))));
    assert!(matches!(
        context.write_register_from_unsigned(100, 1),
        Err(RegctxError::RegisterNotFound(100))
    ));
    assert_eq!(loopback.read_calls() + loopback.write_calls(), 0);
}

#[test]
fn test_narrow_descriptor_retypes_word()
{
    let Fixture { loopback: _loopback, mut context } = fixture(Architecture::Mips64);
    context.write_register_from_unsigned(5, 0x1111_2222_3333_4444).unwrap();

    let raw = context.read_register_raw(5).unwrap();
    assert_eq!(raw.value_type(), RegisterValueType::UInt64);

    let mut narrow = mips64::REGISTERS[5];
    narrow.byte_size = 4;
    let value = context.read_register(Some(&narrow)).unwrap();
    assert_eq!(value, RegisterValue::from_u32(0x3333_4444));
}

#[test]
fn test_generic_register_helpers()
{
    let Fixture { loopback: _loopback, mut context } = fixture(Architecture::Mips64el);
    context.set_pc(Address::new(0x1200_0a00)).unwrap();
    context.set_sp(Address::new(0x7fff_f000)).unwrap();
    context.set_fp(Address::new(0x7fff_f100)).unwrap();
    context.write_register_from_unsigned(31, 0x1200_0b00).unwrap();
    context.write_register_from_unsigned(mips64::REG_SR, 0x0400_ff13).unwrap();

    assert_eq!(context.pc().unwrap(), Address::new(0x1200_0a00));
    assert_eq!(context.sp().unwrap(), Address::new(0x7fff_f000));
    assert_eq!(context.fp().unwrap(), Address::new(0x7fff_f100));
    assert_eq!(context.return_address().unwrap(), Address::new(0x1200_0b00));
    assert_eq!(context.flags().unwrap(), 0x0400_ff13);
    assert_eq!(context.read_register_as_unsigned(mips64::REG_PC).unwrap(), 0x1200_0a00);
}

#[test]
fn test_big_endian_storage_layout()
{
    let Fixture { loopback, mut context } = fixture(Architecture::Mips64);
    context.set_pc(Address::new(0x0102_0304_0506_0708)).unwrap();

    let blob = loopback.snapshot(THREAD).unwrap();
    let offset = mips64::REG_PC as usize * 8;
    assert_eq!(&blob[offset..offset + 8], &[1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_bulk_transfer_unsupported()
{
    let Fixture { loopback, mut context } = fixture(Architecture::Mips64el);
    context.write_register_from_unsigned(2, 0xabcd).unwrap();
    let before = loopback.snapshot(THREAD).unwrap();
    let (reads, writes) = (loopback.read_calls(), loopback.write_calls());

    let read = context.read_all_register_values().unwrap_err();
    assert!(matches!(
        read,
        RegctxError::Unsupported {
            operation: "ReadAllRegisterValues",
            variant: "mips64el"
        }
    ));
    let write = context.write_all_register_values(&[0xff; 304]).unwrap_err();
    assert!(write.is_unsupported());

    assert_eq!(loopback.snapshot(THREAD).unwrap(), before);
    assert_eq!((loopback.read_calls(), loopback.write_calls()), (reads, writes));
    assert_eq!(context.read_register_as_unsigned(2).unwrap(), 0xabcd);
}

#[test]
fn test_bulk_transfer_when_declared()
{
    let Fixture { loopback, context } = fixture(Architecture::Mips64);
    let mut context = BulkCapable(context);
    context.set_pc(Address::new(0x1200_0a00)).unwrap();
    context.write_register_from_unsigned(29, 0x7fff_f000).unwrap();

    let mut saved = context.read_all_register_values().unwrap();
    assert_eq!(saved.len(), mips64::GPR_STORAGE_SIZE);
    let pc = mips64::REG_PC as usize * 8;
    assert_eq!(&saved[pc..pc + 8], &0x1200_0a00u64.to_le_bytes());

    context.set_pc(Address::new(0xdead_0000)).unwrap();
    context.write_register_from_unsigned(29, 0).unwrap();
    context.write_all_register_values(&saved).unwrap();
    assert_eq!(context.pc().unwrap(), Address::new(0x1200_0a00));
    assert_eq!(context.sp().unwrap(), Address::new(0x7fff_f000));

    let before = loopback.snapshot(THREAD).unwrap();
    saved.pop();
    let err = context.write_all_register_values(&saved).unwrap_err();
    assert!(matches!(err, RegctxError::InvalidArgument(_)));
    assert_eq!(loopback.snapshot(THREAD).unwrap(), before);
}

#[test]
fn test_wide_write_leaves_neighbour_intact()
{
    let Fixture { loopback, mut context } = fixture(Architecture::Mips64el);
    context.write_register_from_unsigned(5, 0x5555).unwrap();
    let r4 = context.register_info_by_name("a0").expect("r4");
    let writes = loopback.write_calls();

    let err = context.write_register(Some(r4), &RegisterValue::from_u128(u128::MAX)).unwrap_err();
    assert!(matches!(err, RegctxError::InvalidArgument(_)));
    assert_eq!(loopback.write_calls(), writes);
    assert_eq!(context.read_register_as_unsigned(4).unwrap(), 0);
    assert_eq!(context.read_register_as_unsigned(5).unwrap(), 0x5555);
}

#[test]
fn test_collaborator_errors_pass_through()
{
    let loopback = Arc::new(LoopbackProcess::new(64, ByteOrder::Little));
    let process: Arc<dyn NativeProcess> = loopback.clone();
    let context = NativeRegisterContextMips64::new(ThreadHandle::new(THREAD, &process), Architecture::Mips64el);

    let err = context.read_register(context.register_info_by_name("pc")).unwrap_err();
    assert!(matches!(err, RegctxError::ReadRegistersFailed { thread_id: Some(THREAD), .. }));
    assert_eq!(loopback.read_calls(), 1);
}

proptest! {
    #[test]
    fn prop_write_then_read_round_trips(index in 0u32..38, bits in any::<u64>(), big_endian in any::<bool>())
    {
        let architecture = if big_endian { Architecture::Mips64 } else { Architecture::Mips64el };
        let Fixture { loopback: _loopback, mut context } = fixture(architecture);
        let descriptor = context.register_info_at_index(index).expect("register in range");
        let written = RegisterValue::from_u64(bits);

        context.write_register(Some(descriptor), &written).unwrap();
        let read = context.read_register(Some(descriptor)).unwrap();

        prop_assert_eq!(read.bytes(), written.bytes());
        prop_assert_eq!(read.byte_size(), descriptor.byte_size as usize);
    }
}
