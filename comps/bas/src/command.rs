// SPDX-License-Identifier: MPL-2.0

use log::warn;

use crate::{BurstConfig, Direction, Error, LaneWidth, PioWrite, Result, configure};

/// First device-private socket ioctl number.
pub const SIOCDEVPRIVATE: u32 = 0x89F0;

/// The device-private ioctls that start a BAS transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum BasCommand {
    Tx = SIOCDEVPRIVATE + 2,
    Rx = SIOCDEVPRIVATE + 3,
}

impl BasCommand {
    pub fn from_raw(cmd: u32) -> Option<Self> {
        match cmd {
            c if c == BasCommand::Tx as u32 => Some(BasCommand::Tx),
            c if c == BasCommand::Rx as u32 => Some(BasCommand::Rx),
            _ => None,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            BasCommand::Tx => Direction::Tx,
            BasCommand::Rx => Direction::Rx,
        }
    }
}

/// The argument of a [`BasCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BasRequest {
    /// Physical address of the DMA buffer.
    pub data: u64,
    /// Number of bytes to transfer.
    pub burst_size: u64,
}

/// Handles the raw ioctl `cmd` by configuring the channel it names.
///
/// Returns the control register value written.
pub fn handle_ioctl<P: PioWrite>(
    dev: Option<&mut P>,
    cmd: u32,
    req: &BasRequest,
    lane: LaneWidth,
) -> Result<u64> {
    let Some(cmd) = BasCommand::from_raw(cmd) else {
        warn!("BAS: unknown ioctl {:#x}", cmd);
        return Err(Error::InvalidArgument);
    };

    let config = BurstConfig {
        direction: cmd.direction(),
        lane,
        burst_size: req.burst_size,
        data: req.data,
    };
    configure(dev, &config)
}
