// SPDX-License-Identifier: MPL-2.0

use std::{
    io::{BufRead, BufReader},
    num::NonZeroUsize,
    os::fd::OwnedFd,
    path::Path,
    ptr::NonNull,
};

use bounded_str::split;
use log::{info, warn};
use mcdma_bas::{PioFault, PioRead, PioWrite};
use nix::{
    errno::Errno,
    sys::mman::{self, MapFlags, ProtFlags},
};
use safe_open::{OFlag, StreamMode};
use volatile::VolatilePtr;

use crate::{
    PciAddress,
    error::{Result, return_errno_with_message},
};

/// Number of BARs of a PCI function.
pub const PCI_BAR_MAX: usize = 6;

/// One line of a function's sysfs `resource` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarResource {
    pub start: u64,
    pub end: u64,
    pub flags: u64,
}

impl BarResource {
    /// Parses a `0x<start> 0x<end> 0x<flags>` line.
    pub fn parse(line: &str) -> Result<Self> {
        let mut buf = line.trim_end().as_bytes().to_vec();
        if buf.is_empty() {
            return_errno_with_message!(Errno::EINVAL, "empty resource line");
        }
        let mut slots = [&[][..]; 3];
        let fields = split(&mut buf, b' ', &mut slots)?;
        let &[start, end, flags] = &fields[..] else {
            return_errno_with_message!(Errno::EINVAL, "resource line needs three fields");
        };
        Ok(Self {
            start: parse_hex_u64(start)?,
            end: parse_hex_u64(end)?,
            flags: parse_hex_u64(flags)?,
        })
    }

    /// Returns the size of the BAR, or `None` for an unimplemented BAR.
    pub fn len(&self) -> Option<u64> {
        if self.start == self.end || self.end < self.start {
            return None;
        }
        Some(self.end - self.start + 1)
    }
}

fn parse_hex_u64(field: &[u8]) -> Result<u64> {
    let field = core::str::from_utf8(field).map_err(|_| Errno::EINVAL)?;
    let digits = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field);
    u64::from_str_radix(digits, 16).map_err(|_| Errno::EINVAL.into())
}

/// Reads the BAR table of the PCI function `addr` from sysfs.
///
/// Entry `i` is `None` if BAR `i` is not implemented or its line is missing.
pub fn read_resources(
    sysfs_root: &Path,
    addr: &PciAddress,
) -> Result<[Option<BarResource>; PCI_BAR_MAX]> {
    let path = sysfs_root.join(addr.to_string()).join("resource");
    let file = safe_open::open_stream(&path, StreamMode::READ)?;

    let mut bars = [None; PCI_BAR_MAX];
    for (i, line) in BufReader::new(file).lines().take(PCI_BAR_MAX).enumerate() {
        let line = line?;
        match BarResource::parse(&line) {
            Ok(res) if res.len().is_some() => {
                info!(
                    "{} resource[{}]: {:#x} - {:#x}: {:#x}",
                    addr,
                    i,
                    res.start,
                    res.end,
                    res.end - res.start + 1
                );
                bars[i] = Some(res);
            }
            Ok(_) => {}
            Err(err) => warn!("{} resource[{}]: {}", addr, i, err),
        }
    }
    Ok(bars)
}

/// A memory-mapped register window used for programmed I/O.
///
/// Accesses are 64 bits wide, naturally aligned and bounds-checked. The
/// mapping is removed on drop.
#[derive(Debug)]
pub struct PioRegion {
    base: NonNull<u8>,
    len: usize,
}

impl PioRegion {
    /// Maps BAR `bar` of the PCI function `addr`.
    pub fn map_bar(sysfs_root: &Path, addr: &PciAddress, bar: usize) -> Result<Self> {
        if bar >= PCI_BAR_MAX {
            return_errno_with_message!(Errno::EINVAL, "no such BAR");
        }
        let Some(len) = read_resources(sysfs_root, addr)?[bar].and_then(|res| res.len()) else {
            return_errno_with_message!(Errno::ENODEV, "BAR is not implemented");
        };
        let path = sysfs_root
            .join(addr.to_string())
            .join(format!("resource{}", bar));
        Self::map_file(&path, len)
    }

    /// Maps the first `len` bytes of the file `path`, shared and read-write.
    pub fn map_file(path: &Path, len: u64) -> Result<Self> {
        let Some(len) = usize::try_from(len).ok().and_then(NonZeroUsize::new) else {
            return_errno_with_message!(Errno::EINVAL, "bad mapping length");
        };
        let fd: OwnedFd = safe_open::open(path, OFlag::O_RDWR | OFlag::O_SYNC | OFlag::O_CLOEXEC)?;

        // SAFETY: A new shared mapping is created at an address chosen by the
        // kernel, so no existing memory is affected.
        let addr = unsafe {
            mman::mmap(
                None,
                len,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
                Some(&fd),
                0,
            )?
        };
        let Some(base) = NonNull::new(addr.cast::<u8>()) else {
            return_errno_with_message!(Errno::EFAULT, "mmap returned null");
        };

        info!("mapped {} ({:#x} bytes)", path.display(), len);
        Ok(Self {
            base,
            len: len.get(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: a region maps at least one byte.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn reg(&self, offset: u64) -> Option<NonNull<u64>> {
        let offset = usize::try_from(offset).ok()?;
        if offset % size_of::<u64>() != 0 || offset.checked_add(size_of::<u64>())? > self.len {
            return None;
        }
        // SAFETY: `offset + 8 <= self.len`, so the result stays inside the mapping.
        Some(unsafe { self.base.add(offset) }.cast::<u64>())
    }
}

impl PioWrite for PioRegion {
    fn write(&mut self, offset: u64, value: u64) -> core::result::Result<(), PioFault> {
        let reg = self.reg(offset).ok_or(PioFault)?;
        // SAFETY: `reg` is an aligned register inside the mapping, which lives
        // as long as `self`.
        unsafe { VolatilePtr::new(reg) }.write(value);
        Ok(())
    }
}

impl PioRead for PioRegion {
    fn read(&mut self, offset: u64) -> core::result::Result<u64, PioFault> {
        let reg = self.reg(offset).ok_or(PioFault)?;
        // SAFETY: See `write`.
        Ok(unsafe { VolatilePtr::new(reg) }.read())
    }
}

impl Drop for PioRegion {
    fn drop(&mut self) {
        // SAFETY: `base` and `len` describe a mapping created in `map_file`
        // that nothing else refers to.
        if let Err(errno) = unsafe { mman::munmap(self.base.as_ptr().cast(), self.len) } {
            warn!("munmap failed: {}", errno);
        }
    }
}
