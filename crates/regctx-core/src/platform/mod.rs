//! # Process Collaborators
//!
//! Implementations of the [`NativeProcess`](crate::native::NativeProcess)
//! interface that register contexts read and write through.
//!
//! - **loopback**: In-memory register storage with the byte order and word
//!   granularity of a ptrace target. Used by tests and the `regctx` CLI.
//!
//! A ptrace-backed Linux collaborator plugs in at the same seam.

pub mod loopback;
