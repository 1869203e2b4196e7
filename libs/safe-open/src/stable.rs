// SPDX-License-Identifier: MPL-2.0

use std::{
    fs::File,
    io,
    os::{fd::AsRawFd, unix::fs::FileExt},
    path::{Path, PathBuf},
};

use log::warn;
use nix::{errno::Errno, sys::stat};

use crate::{Error, FsOp, Mtime, OFlag, Result, open};

/// A read-only file whose contents are only trusted while its modification
/// time stays the one it had when it was opened.
///
/// Kernel-provided tables such as `/proc/self/pagemap` are read this way: a
/// read is rejected with [`Error::Modified`] once the file has changed.
#[derive(Debug)]
pub struct StableFile {
    file: File,
    path: PathBuf,
    mtime: Mtime,
}

impl StableFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::from(open(path, OFlag::O_RDONLY | OFlag::O_CLOEXEC)?);
        let mtime = fstat_mtime(&file, path)?;
        Ok(Self {
            file,
            path: path.into(),
            mtime,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The modification time recorded when the file was opened.
    pub fn mtime(&self) -> Mtime {
        self.mtime
    }

    /// Reads exactly `buf.len()` bytes at `offset`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotAvailable`] with [`FsOp::Read`] if the read fails or
    ///   hits the end of the file (`EIO`).
    /// - [`Error::Modified`] if the modification time differs from the one
    ///   recorded at open, before or after the read.
    pub fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> Result<()> {
        self.check_unmodified()?;
        self.file
            .read_exact_at(buf, offset)
            .map_err(|err| Error::not_available(&self.path, FsOp::Read, io_errno(&err)))?;
        self.check_unmodified()
    }

    fn check_unmodified(&self) -> Result<()> {
        let now = fstat_mtime(&self.file, &self.path)?;
        if now != self.mtime {
            warn!(
                "{}: modified since open ({} -> {})",
                self.path.display(),
                self.mtime,
                now
            );
            return Err(Error::Modified {
                path: self.path.clone(),
            });
        }
        Ok(())
    }
}

fn fstat_mtime(file: &File, path: &Path) -> Result<Mtime> {
    stat::fstat(file.as_raw_fd())
        .map(|st| Mtime::from(&st))
        .map_err(|errno| Error::not_available(path, FsOp::Verify, errno))
}

fn io_errno(err: &io::Error) -> Errno {
    err.raw_os_error().map_or(Errno::EIO, Errno::from_i32)
}
