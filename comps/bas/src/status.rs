// SPDX-License-Identifier: MPL-2.0

use log::{debug, warn};

use crate::{Direction, Error, LaneWidth, PioRead, Result, Step, regs::BasCtrl};

/// Polls the control register of `direction` until the engine clears the
/// enable bit, reading it at most `max_polls` times.
///
/// Returns the number of reads it took.
///
/// # Errors
///
/// Returns [`Error::HardwareFault`] with [`Step::CtrlPoll`] if a read fails or
/// the bit is still set after `max_polls` reads.
pub fn wait_ctrl_deassert<P: PioRead>(
    dev: &mut P,
    direction: Direction,
    lane: LaneWidth,
    max_polls: usize,
) -> Result<usize> {
    let offset = direction.ctrl_reg().offset(lane.shift());
    let fault = Error::HardwareFault {
        step: Step::CtrlPoll,
        offset,
    };

    for polls in 1..=max_polls {
        let ctrl = dev.read(offset).map_err(|_| fault)?;
        if !BasCtrl::from_bits_truncate(ctrl).contains(BasCtrl::ENABLE) {
            debug!("BAS {}: control deasserted after {} polls", direction, polls);
            return Ok(polls);
        }
    }

    warn!(
        "BAS {}: control still enabled after {} polls",
        direction, max_polls
    );
    Err(fault)
}

/// Reads the error count register of `direction`.
pub fn error_count<P: PioRead>(dev: &mut P, direction: Direction, lane: LaneWidth) -> Result<u64> {
    let offset = direction.err_reg().offset(lane.shift());
    dev.read(offset).map_err(|_| Error::HardwareFault {
        step: Step::ErrCount,
        offset,
    })
}
