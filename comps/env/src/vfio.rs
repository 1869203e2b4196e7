// SPDX-License-Identifier: MPL-2.0

use std::{
    fs::File,
    os::unix::ffi::OsStringExt,
    path::{Path, PathBuf},
};

use bounded_str::split;
use log::{debug, info, warn};
use nix::{errno::Errno, fcntl};
use safe_open::OFlag;

use crate::{
    PciAddress,
    error::{Result, return_errno_with_message},
};

/// Where the kernel lists PCI functions.
pub const SYSFS_PCI_DEVICES: &str = "/sys/bus/pci/devices";

/// Where VFIO group device nodes live.
pub const VFIO_DEV_DIR: &str = "/dev/vfio";

/// Most path components examined in an `iommu_group` link target.
const MAX_LINK_COMPONENTS: usize = 16;

/// Returns the IOMMU group of the PCI function `addr`.
///
/// The group is the last component of the `iommu_group` link in the
/// function's sysfs directory under `sysfs_root`. Returns `Ok(None)` if the
/// function has no such link.
pub fn iommu_group(sysfs_root: &Path, addr: &PciAddress) -> Result<Option<u32>> {
    let link = sysfs_root.join(addr.to_string()).join("iommu_group");
    let target = match fcntl::readlink(link.as_path()) {
        Ok(target) => target,
        Err(Errno::ENOENT) => {
            debug!("{}: no IOMMU group", addr);
            return Ok(None);
        }
        Err(errno) => return Err(errno.into()),
    };

    let mut target = target.into_vec();
    if target.is_empty() {
        return_errno_with_message!(Errno::EINVAL, "empty iommu_group link");
    }
    let mut slots = [&[][..]; MAX_LINK_COMPONENTS];
    let components = split(&mut target, b'/', &mut slots)?;

    let Some(group) = components
        .len()
        .checked_sub(1)
        .and_then(|last| components.get_str(last))
        .and_then(|group| group.parse::<u32>().ok())
    else {
        warn!("{}: cannot parse IOMMU group", addr);
        return_errno_with_message!(Errno::EINVAL, "bad IOMMU group number");
    };

    Ok(Some(group))
}

/// An open VFIO group device node.
#[derive(Debug)]
pub struct VfioGroup {
    file: File,
    path: PathBuf,
    group: u32,
}

impl VfioGroup {
    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn group(&self) -> u32 {
        self.group
    }

    /// Returns whether the group is one of VFIO's no-IOMMU groups.
    pub fn is_noiommu(&self) -> bool {
        self.path
            .file_name()
            .is_some_and(|name| name.as_encoded_bytes().starts_with(b"noiommu-"))
    }
}

/// Opens the VFIO group `group` read-write.
///
/// `<dev_root>/<group>` is tried first, then `<dev_root>/noiommu-<group>`.
/// Only a missing or inaccessible node leads to the fallback; a rejected
/// symlink or a detected race is returned right away.
pub fn open_vfio_group(dev_root: &Path, group: u32) -> Result<VfioGroup> {
    let flags = OFlag::O_RDWR | OFlag::O_CLOEXEC;

    let path = dev_root.join(group.to_string());
    let err = match safe_open::open(&path, flags) {
        Ok(fd) => return Ok(vfio_group(fd.into(), path, group)),
        Err(err @ safe_open::Error::NotAvailable { .. }) => err,
        Err(err) => return Err(err.into()),
    };
    warn!("cannot open VFIO group {}: {}", group, err);

    let path = dev_root.join(format!("noiommu-{}", group));
    let fd = safe_open::open(&path, flags)?;
    Ok(vfio_group(fd.into(), path, group))
}

fn vfio_group(file: File, path: PathBuf, group: u32) -> VfioGroup {
    info!("opened VFIO group {} at {}", group, path.display());
    VfioGroup { file, path, group }
}
