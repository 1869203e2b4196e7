// SPDX-License-Identifier: MPL-2.0

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mcdma_bas::{Direction, LaneWidth};
use mcdma_env::{PciAddress, SYSFS_PCI_DEVICES, VFIO_DEV_DIR};

#[derive(Debug, Parser)]
#[command(version, about = "Inspect and program MCDMA devices from user space")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Print the modification time of a file without following symlinks")]
    Mtime(MtimeArgs),
    #[command(about = "Open a file or directory race-free and print its identity")]
    Open(OpenArgs),
    #[command(about = "Parse a PCI address and print its canonical form")]
    Bdf(BdfArgs),
    #[command(about = "Print the IOMMU group of a PCI function")]
    IommuGroup(IommuGroupArgs),
    #[command(about = "Configure a burst address-space channel through a mapped BAR")]
    Bas(BasArgs),
}

#[derive(Debug, Args)]
pub struct MtimeArgs {
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct OpenArgs {
    pub path: PathBuf,
    #[arg(long, help = "Open as a directory and list its entries")]
    pub dir: bool,
    #[arg(
        long,
        default_value = "r",
        conflicts_with = "dir",
        help = "fopen-style access mode"
    )]
    pub mode: String,
}

#[derive(Debug, Args)]
pub struct BdfArgs {
    #[arg(value_parser = parse_pci_address)]
    pub addr: PciAddress,
}

#[derive(Debug, Args)]
pub struct IommuGroupArgs {
    #[arg(value_parser = parse_pci_address)]
    pub addr: PciAddress,
    #[arg(long, default_value = SYSFS_PCI_DEVICES, help = "Directory of PCI functions")]
    pub sysfs: PathBuf,
    #[arg(long, help = "Also open the group's VFIO device node")]
    pub open_vfio: bool,
    #[arg(long, default_value = VFIO_DEV_DIR, help = "Directory of VFIO group nodes")]
    pub vfio_dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct BasArgs {
    #[arg(long, value_parser = parse_pci_address, help = "PCI function of the engine")]
    pub bdf: PciAddress,
    #[arg(long, default_value_t = 2, help = "BAR that holds the BAS registers")]
    pub bar: usize,
    #[arg(long, value_enum)]
    pub direction: DirectionArg,
    #[arg(long, help = "Bytes to transfer, a multiple of 512")]
    pub burst_size: u64,
    #[arg(long, value_parser = parse_u64, help = "Value of the map table register")]
    pub data: u64,
    #[arg(long, value_enum, help = "PCIe lane width [default: build-time lane width]")]
    pub lane: Option<LaneArg>,
    #[arg(long, help = "Wait for the transfer and print the error count")]
    pub wait: bool,
    #[arg(long, default_value_t = 1_000_000, help = "Control register polls before giving up")]
    pub max_polls: usize,
    #[arg(long, default_value = SYSFS_PCI_DEVICES, help = "Directory of PCI functions")]
    pub sysfs: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    Tx,
    Rx,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Tx => Direction::Tx,
            DirectionArg::Rx => Direction::Rx,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LaneArg {
    X8,
    X16,
}

impl From<LaneArg> for LaneWidth {
    fn from(arg: LaneArg) -> Self {
        match arg {
            LaneArg::X8 => LaneWidth::X8,
            LaneArg::X16 => LaneWidth::X16,
        }
    }
}

fn parse_pci_address(s: &str) -> Result<PciAddress, String> {
    PciAddress::parse(s).map_err(|err| err.to_string())
}

/// Parses a decimal or `0x`-prefixed hexadecimal number.
fn parse_u64(s: &str) -> Result<u64, String> {
    let res = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    res.map_err(|err| err.to_string())
}
