// SPDX-License-Identifier: MPL-2.0

//! The Linux user-space environment of the MCDMA stack.
//!
//! This crate finds and opens what a user-space driver needs before it can
//! talk to the engine: the function's IOMMU group and VFIO group node, its
//! BARs mapped for programmed I/O, and the physical addresses of its DMA
//! buffers. Every file is opened through [`safe_open`], and identifiers read
//! from sysfs or the command line are parsed with [`bounded_str`].

mod bar;
mod error;
mod pagemap;
mod pci;
mod vfio;

pub use self::{
    bar::{BarResource, PCI_BAR_MAX, PioRegion, read_resources},
    error::{Error, Result},
    pagemap::{PAGEMAP_ENTRY_SIZE, PAGEMAP_PATH, PAGEMAP_PFN_MASK, Pagemap},
    pci::PciAddress,
    vfio::{SYSFS_PCI_DEVICES, VFIO_DEV_DIR, VfioGroup, iommu_group, open_vfio_group},
};
