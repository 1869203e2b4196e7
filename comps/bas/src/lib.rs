// SPDX-License-Identifier: MPL-2.0

//! Burst address-space (BAS) configuration of the MCDMA engine.
//!
//! A BAS channel moves `burst_size` bytes between the engine's burst address
//! space and host memory. It is programmed with four register writes through
//! a [`PioWrite`] sink, after which the engine clears the enable bit of the
//! control register when the transfer completes.
//!
//! ```
//! # use mcdma_bas::{BurstConfig, Direction, LaneWidth, PioFault, PioWrite, configure};
//! struct Bar(Vec<(u64, u64)>);
//!
//! impl PioWrite for Bar {
//!     fn write(&mut self, offset: u64, value: u64) -> Result<(), PioFault> {
//!         self.0.push((offset, value));
//!         Ok(())
//!     }
//! }
//!
//! let mut bar = Bar(Vec::new());
//! let config = BurstConfig {
//!     direction: Direction::Tx,
//!     lane: LaneWidth::X8,
//!     burst_size: 4 * 512,
//!     data: 0x1_2340_0000,
//! };
//! let ctrl = configure(Some(&mut bar), &config).unwrap();
//! assert_eq!(ctrl, 0x8000_0010);
//! assert_eq!(bar.0[2], (0x28, 4));
//! ```

#![cfg_attr(not(test), no_std)]

mod burst;
mod command;
mod error;
mod pio;
pub mod regs;
mod status;

pub use self::{
    burst::{BurstConfig, Direction, LaneWidth, configure},
    command::{BasCommand, BasRequest, SIOCDEVPRIVATE, handle_ioctl},
    error::{Error, Result, Step},
    pio::{PioFault, PioRead, PioWrite},
    status::{error_count, wait_ctrl_deassert},
};

#[cfg(test)]
mod test;
