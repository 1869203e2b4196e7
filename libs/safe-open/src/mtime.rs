// SPDX-License-Identifier: MPL-2.0

use std::{
    fmt,
    path::Path,
    time::{Duration, SystemTime},
};

use nix::{errno::Errno, sys::stat::FileStat};

use crate::{
    Error, FsOp, Result,
    identity::{inspect, is_symlink},
};

/// A modification timestamp with nanosecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mtime {
    secs: i64,
    nanos: u32,
}

impl Mtime {
    pub fn new(secs: i64, nanos: u32) -> Self {
        debug_assert!(nanos < 1_000_000_000);
        Self { secs, nanos }
    }

    /// Seconds since the Unix epoch.
    pub fn secs(&self) -> i64 {
        self.secs
    }

    /// Nanoseconds within the second.
    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    /// Converts the timestamp to a [`SystemTime`], or returns `None` if the
    /// platform cannot represent it.
    pub fn to_system_time(&self) -> Option<SystemTime> {
        let secs = Duration::from_secs(self.secs.unsigned_abs());
        let whole = if self.secs >= 0 {
            SystemTime::UNIX_EPOCH.checked_add(secs)
        } else {
            SystemTime::UNIX_EPOCH.checked_sub(secs)
        }?;
        whole.checked_add(Duration::from_nanos(u64::from(self.nanos)))
    }
}

impl From<&FileStat> for Mtime {
    fn from(st: &FileStat) -> Self {
        Self::new(st.st_mtime, st.st_mtime_nsec.clamp(0, 999_999_999) as u32)
    }
}

impl fmt::Display for Mtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.secs, self.nanos)
    }
}

/// Returns the modification time of `path`.
///
/// The path is inspected without following a trailing symlink, and a symlink
/// is rejected like in [`open`](crate::open).
pub fn mtime(path: impl AsRef<Path>) -> Result<Mtime> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidArgument);
    }

    let st = inspect(path)
        .and_then(|st| st.ok_or(Errno::ENOENT))
        .map_err(|errno| Error::not_available(path, FsOp::Inspect, errno))?;
    if is_symlink(&st) {
        return Err(Error::SymlinkRejected { path: path.into() });
    }

    Ok(Mtime::from(&st))
}
