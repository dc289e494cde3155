//! # regctx-core
//!
//! Register access for traced threads of a native debugger.
//!
//! This crate sits between a debugger's architecture-neutral layer and the
//! OS tracing interface. It provides:
//! - Register layout catalogs (names, offsets, numbering schemes, register sets)
//! - Per-thread register contexts that read and write registers through the
//!   owning process
//! - A uniform hardware watchpoint surface, also on targets without watchpoint
//!   registers
//!
//! ## Architecture Support
//!
//! - **MIPS64** (`mips64`, `mips64el`): general purpose registers. Bulk
//!   register transfer and hardware watchpoints report `Unsupported`.
//!
//! ## Collaborators
//!
//! Process attach, thread tracking, and the tracing transport are not part of
//! this crate. Register contexts consume them through the small traits in
//! [`native`]. [`platform::loopback`] implements them in memory.

pub mod catalog;
pub mod context;
pub mod error;
pub mod native;
pub mod platform;
pub mod prelude;
pub mod types;
pub mod watchpoints;

pub use catalog::{MachineVariant, RegisterCatalog};
pub use context::{NativeRegisterContext, NativeRegisterContextMips64};
// Re-export commonly used types
pub use error::{RegctxError, RegctxResult};
pub use native::{NativeProcess, NativeThread, ThreadHandle};
pub use watchpoints::WatchpointCapability;
