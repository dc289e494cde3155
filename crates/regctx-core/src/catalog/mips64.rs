//! # MIPS64 Register Layout
//!
//! Register tables for 64-bit MIPS Linux targets. Big-endian (`mips64`) and
//! little-endian (`mips64el`) targets share these tables; only the byte order
//! of the underlying storage differs.
//!
//! ## Storage Layout
//!
//! The general register blob is the Linux MIPS64 ELF general register set: 38
//! eight-byte slots in this order:
//!
//! ```text
//! Slot 0-31:  r0-r31
//! Slot 32:    lo   (mullo)
//! Slot 33:    hi   (mulhi)
//! Slot 34:    cp0_epc      (pc)
//! Slot 35:    cp0_badvaddr (badvaddr)
//! Slot 36:    cp0_status   (sr)
//! Slot 37:    cp0_cause    (cause)
//! Total: 38 u64s = 304 bytes
//! ```
//!
//! The slot number doubles as the register's native number and its logical
//! index.
//!
//! ## DWARF Numbering
//!
//! `r0`-`r31` are 0-31, followed by `sr` (32), `mullo` (33), `mulhi` (34),
//! `badvaddr` (35), `cause` (36) and `pc` (37). GDB remote numbering matches.

use crate::types::{Encoding, Format, GenericRegister, RegisterDescriptor, RegisterSet, INVALID_REGNUM};

/// Logical index of `mullo` (LO)
pub const REG_MULLO: u32 = 32;
/// Logical index of `mulhi` (HI)
pub const REG_MULHI: u32 = 33;
/// Logical index of the program counter
pub const REG_PC: u32 = 34;
/// Logical index of the CP0 bad virtual address register
pub const REG_BADVADDR: u32 = 35;
/// Logical index of the CP0 status register
pub const REG_SR: u32 = 36;
/// Logical index of the CP0 cause register
pub const REG_CAUSE: u32 = 37;

/// Number of general purpose registers
pub const NUM_GP_REGISTERS: usize = 38;

/// Width of one storage slot
pub const SLOT_SIZE: u32 = 8;

/// Size in bytes of the general register blob
pub const GPR_STORAGE_SIZE: usize = NUM_GP_REGISTERS * SLOT_SIZE as usize;

const DWARF_SR: u32 = 32;
const DWARF_LO: u32 = 33;
const DWARF_HI: u32 = 34;
const DWARF_BADVADDR: u32 = 35;
const DWARF_CAUSE: u32 = 36;
const DWARF_PC: u32 = 37;

const NO_GENERIC: u32 = INVALID_REGNUM;

const fn gpr(
    index: u32,
    name: &'static str,
    alt_name: Option<&'static str>,
    dwarf: u32,
    generic: u32,
) -> RegisterDescriptor
{
    RegisterDescriptor {
        name,
        alt_name,
        byte_size: SLOT_SIZE,
        byte_offset: index * SLOT_SIZE,
        encoding: Encoding::Uint,
        format: Format::Hex,
        // eh_frame, dwarf, generic, gdb, native, logical
        kinds: [dwarf, dwarf, generic, dwarf, index, index],
    }
}

/// Every MIPS64 register, in logical order
pub static REGISTERS: [RegisterDescriptor; NUM_GP_REGISTERS] = [
    gpr(0, "r0", Some("zero"), 0, NO_GENERIC),
    gpr(1, "r1", Some("at"), 1, NO_GENERIC),
    gpr(2, "r2", Some("v0"), 2, NO_GENERIC),
    gpr(3, "r3", Some("v1"), 3, NO_GENERIC),
    gpr(4, "r4", Some("a0"), 4, GenericRegister::Arg1.number()),
    gpr(5, "r5", Some("a1"), 5, GenericRegister::Arg2.number()),
    gpr(6, "r6", Some("a2"), 6, GenericRegister::Arg3.number()),
    gpr(7, "r7", Some("a3"), 7, GenericRegister::Arg4.number()),
    gpr(8, "r8", Some("a4"), 8, GenericRegister::Arg5.number()),
    gpr(9, "r9", Some("a5"), 9, GenericRegister::Arg6.number()),
    gpr(10, "r10", Some("a6"), 10, GenericRegister::Arg7.number()),
    gpr(11, "r11", Some("a7"), 11, GenericRegister::Arg8.number()),
    gpr(12, "r12", Some("t0"), 12, NO_GENERIC),
    gpr(13, "r13", Some("t1"), 13, NO_GENERIC),
    gpr(14, "r14", Some("t2"), 14, NO_GENERIC),
    gpr(15, "r15", Some("t3"), 15, NO_GENERIC),
    gpr(16, "r16", Some("s0"), 16, NO_GENERIC),
    gpr(17, "r17", Some("s1"), 17, NO_GENERIC),
    gpr(18, "r18", Some("s2"), 18, NO_GENERIC),
    gpr(19, "r19", Some("s3"), 19, NO_GENERIC),
    gpr(20, "r20", Some("s4"), 20, NO_GENERIC),
    gpr(21, "r21", Some("s5"), 21, NO_GENERIC),
    gpr(22, "r22", Some("s6"), 22, NO_GENERIC),
    gpr(23, "r23", Some("s7"), 23, NO_GENERIC),
    gpr(24, "r24", Some("t8"), 24, NO_GENERIC),
    gpr(25, "r25", Some("t9"), 25, NO_GENERIC),
    gpr(26, "r26", Some("k0"), 26, NO_GENERIC),
    gpr(27, "r27", Some("k1"), 27, NO_GENERIC),
    gpr(28, "r28", Some("gp"), 28, NO_GENERIC),
    gpr(29, "r29", Some("sp"), 29, GenericRegister::Sp.number()),
    gpr(30, "r30", Some("fp"), 30, GenericRegister::Fp.number()),
    gpr(31, "r31", Some("ra"), 31, GenericRegister::Ra.number()),
    gpr(REG_MULLO, "mullo", Some("lo"), DWARF_LO, NO_GENERIC),
    gpr(REG_MULHI, "mulhi", Some("hi"), DWARF_HI, NO_GENERIC),
    gpr(REG_PC, "pc", None, DWARF_PC, GenericRegister::Pc.number()),
    gpr(REG_BADVADDR, "badvaddr", None, DWARF_BADVADDR, NO_GENERIC),
    gpr(REG_SR, "sr", Some("status"), DWARF_SR, GenericRegister::Flags.number()),
    gpr(REG_CAUSE, "cause", None, DWARF_CAUSE, NO_GENERIC),
];

/// General purpose register indices; register sets end with the sentinel
const GP_REGNUMS: [u32; NUM_GP_REGISTERS + 1] = [
    0,
    1,
    2,
    3,
    4,
    5,
    6,
    7,
    8,
    9,
    10,
    11,
    12,
    13,
    14,
    15,
    16,
    17,
    18,
    19,
    20,
    21,
    22,
    23,
    24,
    25,
    26,
    27,
    28,
    29,
    30,
    31,
    REG_MULLO,
    REG_MULHI,
    REG_PC,
    REG_BADVADDR,
    REG_SR,
    REG_CAUSE,
    INVALID_REGNUM,
];

const _: () = assert!(GP_REGNUMS.len() - 1 == NUM_GP_REGISTERS, "GP_REGNUMS has wrong number of registers");
const _: () = assert!(GP_REGNUMS[NUM_GP_REGISTERS] == INVALID_REGNUM, "GP_REGNUMS must end with the sentinel");

/// Register sets provided for MIPS64
pub static REGISTER_SETS: [RegisterSet; 1] = [RegisterSet {
    name: "General Purpose Registers",
    short_name: "gpr",
    num_registers: NUM_GP_REGISTERS,
    registers: &GP_REGNUMS,
}];
