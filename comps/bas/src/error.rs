// SPDX-License-Identifier: MPL-2.0

use core::fmt;

/// A register access of a BAS operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Write of the map table (translation base) register.
    MapTable,
    /// Write of the start address register.
    StartAddr,
    /// Write of the burst count register.
    BurstCount,
    /// Write of the control register.
    Control,
    /// Read of the control register while waiting for the enable bit to clear.
    CtrlPoll,
    /// Read of the error count register.
    ErrCount,
}

impl Step {
    /// The four writes of a channel configuration, in order.
    pub const CONFIGURE: [Step; 4] = [
        Step::MapTable,
        Step::StartAddr,
        Step::BurstCount,
        Step::Control,
    ];
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::MapTable => "map table",
            Step::StartAddr => "start address",
            Step::BurstCount => "burst count",
            Step::Control => "control",
            Step::CtrlPoll => "control poll",
            Step::ErrCount => "error count",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The device context is missing or unmapped, or the burst parameters
    /// cannot be programmed.
    InvalidArgument,
    /// A register access failed. Registers written before `step` keep their
    /// new values, so the channel state is unknown.
    HardwareFault { step: Step, offset: u64 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument => write!(f, "invalid BAS argument"),
            Error::HardwareFault { step, offset } => {
                write!(f, "BAS {} access at {:#x} failed", step, offset)
            }
        }
    }
}

impl core::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
