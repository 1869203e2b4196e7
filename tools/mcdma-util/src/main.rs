// SPDX-License-Identifier: MPL-2.0

//! `mcdma-util`: inspect and program MCDMA devices from user space.
//!
//! Diagnostics go to stderr through `env_logger`; set `RUST_LOG=info` to see
//! every register write. The exit status tells the error kinds apart:
//!
//! | Status | Error |
//! |---|---|
//! | 1 | An OS operation failed |
//! | 2 | Bad command line |
//! | 3 | Invalid argument |
//! | 4 | A symbolic link was rejected |
//! | 5 | A path was swapped while being opened |
//! | 6 | A register access failed |
//! | 7 | A buffer copy overlapped its source |

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use log::error;
use mcdma_env::Error;
use nix::errno::Errno;

use crate::{
    cli::{Cli, Command},
    commands::{
        execute_bas_command, execute_bdf_command, execute_iommu_group_command,
        execute_mtime_command, execute_open_command,
    },
};

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let res = match &cli.command {
        Command::Mtime(args) => execute_mtime_command(args),
        Command::Open(args) => execute_open_command(args),
        Command::Bdf(args) => execute_bdf_command(args),
        Command::IommuGroup(args) => execute_iommu_group_command(args),
        Command::Bas(args) => execute_bas_command(args),
    };

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("mcdma-util: {}", err);
            ExitCode::from(exit_status(&err))
        }
    }
}

fn exit_status(err: &Error) -> u8 {
    match err {
        Error::Open(safe_open::Error::SymlinkRejected { .. }) => 4,
        Error::Open(safe_open::Error::RaceDetected { .. }) => 5,
        Error::Open(safe_open::Error::InvalidArgument)
        | Error::Str(bounded_str::Error::InvalidArgument)
        | Error::Bas(mcdma_bas::Error::InvalidArgument) => 3,
        Error::Bas(mcdma_bas::Error::HardwareFault { .. }) => 6,
        Error::Str(bounded_str::Error::OverlapDetected) => 7,
        Error::Os { errno, .. } if *errno == Errno::EINVAL => 3,
        Error::Open(_) | Error::Os { .. } => 1,
    }
}
