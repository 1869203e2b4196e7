// SPDX-License-Identifier: MPL-2.0

use std::path::Path;

use log::debug;
use nix::{
    errno::Errno,
    unistd::{SysconfVar, sysconf},
};
use safe_open::StableFile;

use crate::error::{Result, return_errno_with_message};

/// The pagemap of the calling process.
pub const PAGEMAP_PATH: &str = "/proc/self/pagemap";

/// Size of one pagemap entry.
pub const PAGEMAP_ENTRY_SIZE: u64 = 8;

/// Bits 0-54 of a pagemap entry: the page frame number.
pub const PAGEMAP_PFN_MASK: u64 = 0x7f_ffff_ffff_ffff;

/// Translates virtual addresses of the calling process to physical ones.
///
/// Reading physical frame numbers requires `CAP_SYS_ADMIN`; without it the
/// kernel reports every frame as zero and translation fails.
#[derive(Debug)]
pub struct Pagemap {
    file: StableFile,
    page_size: u64,
}

impl Pagemap {
    /// Opens the pagemap of the calling process.
    pub fn open_self() -> Result<Self> {
        let page_size = match sysconf(SysconfVar::PAGE_SIZE)? {
            Some(size) if size > 0 => size as u64,
            _ => return_errno_with_message!(Errno::EINVAL, "unknown page size"),
        };
        Self::open(PAGEMAP_PATH, page_size)
    }

    /// Opens a pagemap file laid out for pages of `page_size` bytes.
    pub fn open(path: impl AsRef<Path>, page_size: u64) -> Result<Self> {
        if !page_size.is_power_of_two() {
            return_errno_with_message!(Errno::EINVAL, "page size is not a power of two");
        }
        let file = StableFile::open(path)?;
        Ok(Self { file, page_size })
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Returns the physical address `vaddr` is mapped to.
    ///
    /// Fails with `EFAULT` if the page is not present, with `EOVERFLOW` if the
    /// entry or the frame lies outside the 64-bit range, and with `ESTALE`
    /// (a [`safe_open::Error::Modified`]) if the pagemap changed since it was
    /// opened.
    pub fn virt_to_phys(&self, vaddr: u64) -> Result<u64> {
        let Some(offset) = (vaddr / self.page_size).checked_mul(PAGEMAP_ENTRY_SIZE) else {
            return_errno_with_message!(Errno::EOVERFLOW, "address past the end of the pagemap");
        };
        let mut entry = [0u8; PAGEMAP_ENTRY_SIZE as usize];
        self.file.read_exact_at(&mut entry, offset)?;

        let pfn = u64::from_ne_bytes(entry) & PAGEMAP_PFN_MASK;
        if pfn == 0 {
            return_errno_with_message!(Errno::EFAULT, "page not present");
        }

        let Some(frame) = pfn.checked_mul(self.page_size) else {
            return_errno_with_message!(Errno::EOVERFLOW, "frame number out of range");
        };
        let paddr = frame | (vaddr & (self.page_size - 1));
        debug!("virt {:#x} -> phys {:#x}", vaddr, paddr);
        Ok(paddr)
    }
}
