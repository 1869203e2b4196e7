// SPDX-License-Identifier: MPL-2.0

use crate::{
    BasCommand, BasRequest, BurstConfig, Direction, Error, LaneWidth, PioFault, PioRead,
    PioWrite, Step, configure, error_count, handle_ioctl,
    regs::{BAS_TRANSFER_COUNT_MASK, BasCtrl, BasReg},
    wait_ctrl_deassert,
};

/// Records writes and answers reads from a script.
#[derive(Default)]
struct RecordingPio {
    unmapped: bool,
    /// Fail the n-th write (1-based).
    fail_write: Option<usize>,
    writes: Vec<(u64, u64)>,
    reads: Vec<u64>,
    /// Values returned by successive reads. Reads past the end fault.
    script: Vec<u64>,
}

impl PioWrite for RecordingPio {
    fn is_mapped(&self) -> bool {
        !self.unmapped
    }

    fn write(&mut self, offset: u64, value: u64) -> Result<(), PioFault> {
        if self.fail_write == Some(self.writes.len() + 1) {
            return Err(PioFault);
        }
        self.writes.push((offset, value));
        Ok(())
    }
}

impl PioRead for RecordingPio {
    fn read(&mut self, offset: u64) -> Result<u64, PioFault> {
        let value = *self.script.get(self.reads.len()).ok_or(PioFault)?;
        self.reads.push(offset);
        Ok(value)
    }
}

fn tx_x8(burst_size: u64) -> BurstConfig {
    BurstConfig {
        direction: Direction::Tx,
        lane: LaneWidth::X8,
        burst_size,
        data: 0xdead_b000,
    }
}

#[test]
fn tx_x8_four_bursts() {
    let mut pio = RecordingPio::default();
    let ctrl = configure(Some(&mut pio), &tx_x8(4 * 512)).unwrap();

    assert!(BasCtrl::from_bits_truncate(ctrl).contains(BasCtrl::ENABLE));
    assert_eq!(ctrl, 0x8000_0000 | 16);
    assert_eq!(
        pio.writes,
        [(0x200, 0xdead_b000), (0x20, 0), (0x28, 4), (0x38, ctrl)]
    );
}

#[test]
fn rx_x16_uses_read_side() {
    let mut pio = RecordingPio::default();
    let config = BurstConfig {
        direction: Direction::Rx,
        lane: LaneWidth::X16,
        burst_size: 512,
        data: 0x1000,
    };
    let ctrl = configure(Some(&mut pio), &config).unwrap();

    assert_eq!(ctrl, 0x8000_0008);
    assert_eq!(
        pio.writes,
        [(0x100, 0x1000), (0x00, 0), (0x08, 1), (0x18, 0x8000_0008)]
    );
}

#[test]
fn write_sequence_matches_writes() {
    let config = tx_x8(64 * 512);
    let mut pio = RecordingPio::default();
    configure(Some(&mut pio), &config).unwrap();
    assert_eq!(&pio.writes[..], &config.write_sequence().unwrap()[..]);
}

#[test]
fn bad_burst_sizes_write_nothing() {
    for size in [0, 1, 511, 513, 4 * 512 + 100] {
        let mut pio = RecordingPio::default();
        assert_eq!(
            configure(Some(&mut pio), &tx_x8(size)),
            Err(Error::InvalidArgument),
            "size {}",
            size
        );
        assert!(pio.writes.is_empty());
    }
}

#[test]
fn burst_count_overflow() {
    let largest = BAS_TRANSFER_COUNT_MASK * 512;
    assert_eq!(tx_x8(largest).burst_count(), Ok(BAS_TRANSFER_COUNT_MASK));

    let mut pio = RecordingPio::default();
    assert_eq!(
        configure(Some(&mut pio), &tx_x8(largest + 512)),
        Err(Error::InvalidArgument)
    );
    assert!(pio.writes.is_empty());
}

#[test]
fn missing_device_context() {
    assert_eq!(
        configure::<RecordingPio>(None, &tx_x8(512)),
        Err(Error::InvalidArgument)
    );

    let mut pio = RecordingPio {
        unmapped: true,
        ..Default::default()
    };
    assert_eq!(
        configure(Some(&mut pio), &tx_x8(512)),
        Err(Error::InvalidArgument)
    );
    assert!(pio.writes.is_empty());
}

#[test]
fn fault_on_burst_count_write() {
    let mut pio = RecordingPio {
        fail_write: Some(3),
        ..Default::default()
    };
    assert_eq!(
        configure(Some(&mut pio), &tx_x8(512)),
        Err(Error::HardwareFault {
            step: Step::BurstCount,
            offset: 0x28,
        })
    );
    assert_eq!(pio.writes.len(), 2);
}

#[test]
fn enable_bit_forced_on() {
    for lane in [LaneWidth::X8, LaneWidth::X16] {
        let ctrl = lane.ctrl_value();
        assert!(ctrl.contains(BasCtrl::ENABLE));
        assert_eq!((ctrl - BasCtrl::ENABLE).bits(), lane.burst_length());
    }
}

#[test]
fn default_lane_follows_feature() {
    let expected = if cfg!(feature = "x16") {
        LaneWidth::X16
    } else {
        LaneWidth::X8
    };
    assert_eq!(LaneWidth::default(), expected);
    assert_eq!(BurstConfig::new(Direction::Rx, 512, 0).lane, expected);
}

#[test]
fn ctrl_deasserts() {
    let mut pio = RecordingPio {
        script: vec![0x8000_0010, 0x8000_0010, 0x10],
        ..Default::default()
    };
    let polls = wait_ctrl_deassert(&mut pio, Direction::Rx, LaneWidth::X8, 10).unwrap();
    assert_eq!(polls, 3);
    assert_eq!(pio.reads, [0x18, 0x18, 0x18]);
}

#[test]
fn ctrl_never_deasserts() {
    let mut pio = RecordingPio {
        script: vec![0x8000_0010; 4],
        ..Default::default()
    };
    assert_eq!(
        wait_ctrl_deassert(&mut pio, Direction::Tx, LaneWidth::X8, 4),
        Err(Error::HardwareFault {
            step: Step::CtrlPoll,
            offset: BasReg::WriteCtrl as u64,
        })
    );
    assert_eq!(pio.reads.len(), 4);
}

#[test]
fn reads_error_count() {
    let mut pio = RecordingPio {
        script: vec![3],
        ..Default::default()
    };
    assert_eq!(error_count(&mut pio, Direction::Tx, LaneWidth::X16), Ok(3));
    assert_eq!(pio.reads, [0x30]);

    assert_eq!(
        error_count(&mut pio, Direction::Rx, LaneWidth::X16),
        Err(Error::HardwareFault {
            step: Step::ErrCount,
            offset: 0x10,
        })
    );
}

#[test]
fn ioctl_dispatch() {
    let req = BasRequest {
        data: 0x4000,
        burst_size: 1024,
    };

    let mut pio = RecordingPio::default();
    handle_ioctl(Some(&mut pio), BasCommand::Rx as u32, &req, LaneWidth::X8).unwrap();
    assert_eq!(pio.writes[0], (0x100, 0x4000));
    assert_eq!(pio.writes[2], (0x08, 2));

    let mut pio = RecordingPio::default();
    handle_ioctl(Some(&mut pio), 0x89F2, &req, LaneWidth::X8).unwrap();
    assert_eq!(pio.writes[0], (0x200, 0x4000));

    let mut pio = RecordingPio::default();
    assert_eq!(
        handle_ioctl(Some(&mut pio), 0x89F0, &req, LaneWidth::X8),
        Err(Error::InvalidArgument)
    );
    assert!(pio.writes.is_empty());
}
