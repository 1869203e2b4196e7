// SPDX-License-Identifier: MPL-2.0

//! BAS register definitions.
//!
//! Offsets are relative to the BAR that exposes the BAS block and are
//! shifted left by the lane width's shift before use.

use bitflags::bitflags;

/// BAS registers. Each register is 64 bits wide.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum BasReg {
    /// Read Start Address: Offset of the first byte the engine reads.
    ReadAddr = 0x00,
    /// Read Burst Count: Number of bursts to read.
    ReadCount = 0x08,
    /// Read Error Count: Number of read bursts that failed the data check.
    ReadErr = 0x10,
    /// Read Control: Burst length and the enable bit, see [`BasCtrl`].
    ReadCtrl = 0x18,
    /// Write Start Address: Offset of the first byte the engine writes.
    WriteAddr = 0x20,
    /// Write Burst Count: Number of bursts to write.
    WriteCount = 0x28,
    /// Write Error Count: Number of write bursts that failed the data check.
    WriteErr = 0x30,
    /// Write Control: Burst length and the enable bit, see [`BasCtrl`].
    WriteCtrl = 0x38,
    /// Read Map Table: Address translation base of the read side.
    ReadMapTable = 0x100,
    /// Write Map Table: Address translation base of the write side.
    WriteMapTable = 0x200,
}

impl BasReg {
    /// Returns the register's offset in the BAR for the address shift `shift`.
    pub const fn offset(self, shift: u32) -> u64 {
        (self as u64) << shift
    }
}

bitflags! {
    /// The value of the read and write control registers.
    pub struct BasCtrl: u64 {
        /// Burst length of each transfer.
        const TRANSFER_SIZE = 0xFF;
        /// Starts the channel. Cleared by the engine when the transfer is done.
        const ENABLE = 1 << 31;
    }
}

/// Number of bytes moved per burst.
pub const BAS_BURST_BYTES: u64 = 512;

/// Largest burst count the count registers hold.
pub const BAS_TRANSFER_COUNT_MASK: u64 = 0xFFFF_FFFF;

/// Register address shift on a x8 link.
pub const BAS_X8_SHIFT_WIDTH: u32 = 0;
/// Register address shift on a x16 link.
pub const BAS_X16_SHIFT_WIDTH: u32 = 0;

/// Burst length encoding on a x8 link.
pub const BAS_X8_BURST_LENGTH: u64 = 16;
/// Burst length encoding on a x16 link.
pub const BAS_X16_BURST_LENGTH: u64 = 8;
