// SPDX-License-Identifier: MPL-2.0

use std::{fmt, path::PathBuf};

use nix::errno::Errno;

use crate::FsIdentity;

/// The OS operation that failed in a [`Error::NotAvailable`] error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    /// `lstat` on the path, before opening.
    Inspect,
    /// The open primitive itself.
    Open,
    /// `fstat` on the opened handle.
    Verify,
    /// Reading from an opened handle.
    Read,
}

impl fmt::Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FsOp::Inspect => "inspect",
            FsOp::Open => "open",
            FsOp::Verify => "verify",
            FsOp::Read => "read",
        };
        f.write_str(name)
    }
}

/// The error type of the race-free open operations.
///
/// [`Error::SymlinkRejected`] and [`Error::RaceDetected`] report an attempt to
/// redirect the open. They are kept apart from [`Error::NotAvailable`] so that
/// callers can tell an attack from a missing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The path is empty, or a mode string is malformed.
    InvalidArgument,
    /// The path names a symbolic link.
    SymlinkRejected { path: PathBuf },
    /// The object opened is not the object inspected before the open.
    RaceDetected {
        path: PathBuf,
        inspected: FsIdentity,
        opened: FsIdentity,
    },
    /// An OS operation on the path failed.
    NotAvailable {
        path: PathBuf,
        op: FsOp,
        errno: Errno,
    },
    /// The file was modified after it had been opened.
    Modified { path: PathBuf },
}

impl Error {
    pub(crate) fn not_available(path: impl Into<PathBuf>, op: FsOp, errno: Errno) -> Self {
        Error::NotAvailable {
            path: path.into(),
            op,
            errno,
        }
    }

    /// Returns the OS error number behind this error.
    pub fn errno(&self) -> Errno {
        match self {
            Error::InvalidArgument => Errno::EINVAL,
            Error::SymlinkRejected { .. } => Errno::ELOOP,
            Error::RaceDetected { .. } => Errno::EAGAIN,
            Error::NotAvailable { errno, .. } => *errno,
            Error::Modified { .. } => Errno::ESTALE,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument => write!(f, "invalid argument"),
            Error::SymlinkRejected { path } => {
                write!(f, "{}: refusing to open a symbolic link", path.display())
            }
            Error::RaceDetected {
                path,
                inspected,
                opened,
            } => write!(
                f,
                "{}: object changed between inspection ({}) and open ({})",
                path.display(),
                inspected,
                opened
            ),
            Error::NotAvailable { path, op, errno } => write!(
                f,
                "{}: {} failed: {} ({})",
                path.display(),
                op,
                errno.desc(),
                *errno as i32
            ),
            Error::Modified { path } => {
                write!(f, "{}: file was modified after open", path.display())
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
