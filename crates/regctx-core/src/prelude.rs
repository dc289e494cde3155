//! Common module for library exports

pub use crate::catalog::{CapabilityProfile, MachineVariant, RegisterCatalog};
pub use crate::context::{NativeRegisterContext, NativeRegisterContextMips64};
pub use crate::error::{RegctxError, RegctxResult};
pub use crate::native::{NativeProcess, NativeThread, ThreadHandle};
pub use crate::platform::loopback::LoopbackProcess;
pub use crate::types::address::Address;
pub use crate::types::process::{Architecture, ByteOrder, ProcessId, ThreadId};
pub use crate::types::registers::{GenericRegister, RegisterDescriptor, RegisterKind, RegisterSet, INVALID_REGNUM};
pub use crate::types::value::{RegisterValue, RegisterValueType};
pub use crate::watchpoints::{WatchFlags, WatchpointCapability, WatchpointState, INVALID_WATCHPOINT_INDEX};
