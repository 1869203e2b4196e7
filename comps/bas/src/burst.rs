// SPDX-License-Identifier: MPL-2.0

use core::fmt;

use log::{error, info, warn};

use crate::{
    Error, PioWrite, Result, Step,
    regs::{
        BAS_BURST_BYTES, BAS_TRANSFER_COUNT_MASK, BAS_X8_BURST_LENGTH, BAS_X8_SHIFT_WIDTH,
        BAS_X16_BURST_LENGTH, BAS_X16_SHIFT_WIDTH, BasCtrl, BasReg,
    },
};

/// The offset the engine starts a transfer at.
const BAS_START_OFFSET: u64 = 0;

/// The direction of a BAS transfer, seen from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The engine writes: uses the write-side registers.
    Tx,
    /// The engine reads: uses the read-side registers.
    Rx,
}

impl Direction {
    pub const fn map_table_reg(self) -> BasReg {
        match self {
            Direction::Tx => BasReg::WriteMapTable,
            Direction::Rx => BasReg::ReadMapTable,
        }
    }

    pub const fn addr_reg(self) -> BasReg {
        match self {
            Direction::Tx => BasReg::WriteAddr,
            Direction::Rx => BasReg::ReadAddr,
        }
    }

    pub const fn count_reg(self) -> BasReg {
        match self {
            Direction::Tx => BasReg::WriteCount,
            Direction::Rx => BasReg::ReadCount,
        }
    }

    pub const fn err_reg(self) -> BasReg {
        match self {
            Direction::Tx => BasReg::WriteErr,
            Direction::Rx => BasReg::ReadErr,
        }
    }

    pub const fn ctrl_reg(self) -> BasReg {
        match self {
            Direction::Tx => BasReg::WriteCtrl,
            Direction::Rx => BasReg::ReadCtrl,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Tx => f.write_str("Tx"),
            Direction::Rx => f.write_str("Rx"),
        }
    }
}

/// The PCIe link width the engine is programmed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneWidth {
    X8,
    X16,
}

impl LaneWidth {
    /// The register address shift.
    pub const fn shift(self) -> u32 {
        match self {
            LaneWidth::X8 => BAS_X8_SHIFT_WIDTH,
            LaneWidth::X16 => BAS_X16_SHIFT_WIDTH,
        }
    }

    /// The burst length encoding written to the control register.
    pub const fn burst_length(self) -> u64 {
        match self {
            LaneWidth::X8 => BAS_X8_BURST_LENGTH,
            LaneWidth::X16 => BAS_X16_BURST_LENGTH,
        }
    }

    /// The control register value that starts a transfer.
    pub fn ctrl_value(self) -> BasCtrl {
        let length = BasCtrl::from_bits_truncate(self.burst_length());
        (length - BasCtrl::ENABLE) | BasCtrl::ENABLE
    }
}

/// The lane width selected at build time by the `x16` feature.
impl Default for LaneWidth {
    fn default() -> Self {
        if cfg!(feature = "x16") {
            LaneWidth::X16
        } else {
            LaneWidth::X8
        }
    }
}

/// The parameters of one BAS channel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstConfig {
    pub direction: Direction,
    pub lane: LaneWidth,
    /// Number of bytes to transfer. A non-zero multiple of [`BAS_BURST_BYTES`].
    pub burst_size: u64,
    /// Value programmed into the map table register, usually the physical
    /// address of the DMA buffer.
    pub data: u64,
}

impl BurstConfig {
    /// Creates a configuration for the build-time lane width.
    pub fn new(direction: Direction, burst_size: u64, data: u64) -> Self {
        Self {
            direction,
            lane: LaneWidth::default(),
            burst_size,
            data,
        }
    }

    /// Returns the number of bursts, or an error if `burst_size` cannot be
    /// programmed.
    pub fn burst_count(&self) -> Result<u64> {
        if self.burst_size == 0 || self.burst_size % BAS_BURST_BYTES != 0 {
            warn!(
                "BAS: burst size {} is not a non-zero multiple of {}",
                self.burst_size, BAS_BURST_BYTES
            );
            return Err(Error::InvalidArgument);
        }

        let count = self.burst_size / BAS_BURST_BYTES;
        if count & !BAS_TRANSFER_COUNT_MASK != 0 {
            warn!("BAS: burst count {} overflows the count register", count);
            return Err(Error::InvalidArgument);
        }
        Ok(count)
    }

    /// Returns the `(offset, value)` register writes that configure the
    /// channel, in the order they must be issued.
    pub fn write_sequence(&self) -> Result<[(u64, u64); 4]> {
        let count = self.burst_count()?;
        let shift = self.lane.shift();
        let dir = self.direction;

        Ok([
            (dir.map_table_reg().offset(shift), self.data),
            (dir.addr_reg().offset(shift), BAS_START_OFFSET << shift),
            (dir.count_reg().offset(shift), count),
            (dir.ctrl_reg().offset(shift), self.lane.ctrl_value().bits()),
        ])
    }
}

/// Programs one BAS channel and returns the control register value written.
///
/// The four writes are issued in the order of [`BurstConfig::write_sequence`]
/// and are not retried. The caller must have exclusive access to the
/// channel's registers.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if `dev` is `None` or not mapped, or if the
///   burst size cannot be programmed. Nothing is written in these cases.
/// - [`Error::HardwareFault`] if a write fails. The writes before it have
///   taken effect.
pub fn configure<P: PioWrite>(dev: Option<&mut P>, config: &BurstConfig) -> Result<u64> {
    let Some(dev) = dev else {
        error!("BAS: no device context");
        return Err(Error::InvalidArgument);
    };
    if !dev.is_mapped() {
        error!("BAS: device registers are not mapped");
        return Err(Error::InvalidArgument);
    }

    let writes = config.write_sequence()?;
    for (step, (offset, value)) in Step::CONFIGURE.into_iter().zip(writes) {
        info!(
            "BAS {}: {} [{:#x}] <- {:#x}",
            config.direction, step, offset, value
        );
        dev.write(offset, value).map_err(|_| {
            error!("BAS {}: {} write at {:#x} failed", config.direction, step, offset);
            Error::HardwareFault { step, offset }
        })?;
    }

    let (_, ctrl) = writes[3];
    Ok(ctrl)
}
