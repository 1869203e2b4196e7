// SPDX-License-Identifier: MPL-2.0

use std::{fmt, os::fd::RawFd, path::Path};

use nix::{
    errno::Errno,
    sys::stat::{self, FileStat, SFlag},
};

/// The identity of a filesystem object: its device and inode numbers.
///
/// Two handles or paths refer to the same object if and only if their
/// identities are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FsIdentity {
    dev: u64,
    ino: u64,
}

impl FsIdentity {
    pub fn new(dev: u64, ino: u64) -> Self {
        Self { dev, ino }
    }

    pub fn dev(&self) -> u64 {
        self.dev
    }

    pub fn ino(&self) -> u64 {
        self.ino
    }

    /// Returns the identity of the object the open file descriptor refers to.
    pub fn of_fd(fd: RawFd) -> nix::Result<Self> {
        stat::fstat(fd).map(|st| Self::from(&st))
    }
}

impl From<&FileStat> for FsIdentity {
    #[expect(clippy::useless_conversion)]
    fn from(st: &FileStat) -> Self {
        Self::new(u64::from(st.st_dev), u64::from(st.st_ino))
    }
}

impl fmt::Display for FsIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dev {:#x} ino {}", self.dev, self.ino)
    }
}

/// Inspects `path` without following a trailing symlink.
///
/// Returns `Ok(None)` if nothing exists at `path`.
pub(crate) fn inspect(path: &Path) -> nix::Result<Option<FileStat>> {
    match stat::lstat(path) {
        Ok(st) => Ok(Some(st)),
        Err(Errno::ENOENT) => Ok(None),
        Err(errno) => Err(errno),
    }
}

pub(crate) fn is_symlink(st: &FileStat) -> bool {
    SFlag::from_bits_truncate(st.st_mode) & SFlag::S_IFMT == SFlag::S_IFLNK
}
