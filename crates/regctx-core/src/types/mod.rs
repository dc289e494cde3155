//! # Types
//!
//! Architecture-agnostic types used throughout the register context layer.
//!
//! These types let the generic debugger layer talk about registers, threads,
//! and addresses without knowing which architecture's layout sits underneath.

pub mod address;
pub mod process;
pub mod registers;
pub mod value;

// Re-export all public types
pub use address::Address;
pub use process::{Architecture, ByteOrder, ProcessId, ThreadId};
pub use registers::{
    Encoding, Format, GenericRegister, RegisterDescriptor, RegisterKind, RegisterSet, INVALID_REGNUM,
};
pub use value::{RegisterValue, RegisterValueType};
