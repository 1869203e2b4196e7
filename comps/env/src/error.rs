// SPDX-License-Identifier: MPL-2.0

use core::fmt;

use nix::errno::Errno;

/// The error type of the MCDMA user-space environment.
///
/// Errors of the underlying libraries are kept as they are, so that a
/// rejected symlink or a detected race stays distinguishable from a plain
/// OS failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Open(safe_open::Error),
    Str(bounded_str::Error),
    Bas(mcdma_bas::Error),
    Os {
        errno: Errno,
        msg: Option<&'static str>,
    },
}

impl Error {
    pub const fn new(errno: Errno) -> Self {
        Error::Os { errno, msg: None }
    }

    pub const fn with_message(errno: Errno, msg: &'static str) -> Self {
        Error::Os {
            errno,
            msg: Some(msg),
        }
    }

    pub fn errno(&self) -> Errno {
        match self {
            Error::Open(err) => err.errno(),
            Error::Str(bounded_str::Error::InvalidArgument) => Errno::EINVAL,
            Error::Str(bounded_str::Error::OverlapDetected) => Errno::EFAULT,
            Error::Bas(mcdma_bas::Error::InvalidArgument) => Errno::EINVAL,
            Error::Bas(mcdma_bas::Error::HardwareFault { .. }) => Errno::EIO,
            Error::Os { errno, .. } => *errno,
        }
    }
}

impl From<Errno> for Error {
    fn from(errno: Errno) -> Self {
        Error::new(errno)
    }
}

impl From<safe_open::Error> for Error {
    fn from(err: safe_open::Error) -> Self {
        Error::Open(err)
    }
}

impl From<bounded_str::Error> for Error {
    fn from(err: bounded_str::Error) -> Self {
        Error::Str(err)
    }
}

impl From<mcdma_bas::Error> for Error {
    fn from(err: mcdma_bas::Error) -> Self {
        Error::Bas(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        match err.raw_os_error() {
            Some(errno) => Error::new(Errno::from_i32(errno)),
            None => Error::with_message(Errno::EIO, "I/O error"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Open(err) => write!(f, "{}", err),
            Error::Str(err) => write!(f, "{}", err),
            Error::Bas(err) => write!(f, "{}", err),
            Error::Os { errno, msg: None } => write!(f, "{}", errno.desc()),
            Error::Os {
                errno,
                msg: Some(msg),
            } => write!(f, "{}: {}", msg, errno.desc()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open(err) => Some(err),
            Error::Str(err) => Some(err),
            Error::Bas(err) => Some(err),
            Error::Os { .. } => None,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

macro_rules! return_errno_with_message {
    ($errno: expr, $message: expr) => {
        return Err($crate::error::Error::with_message($errno, $message))
    };
}
pub(crate) use return_errno_with_message;
