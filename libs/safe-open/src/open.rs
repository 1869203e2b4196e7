// SPDX-License-Identifier: MPL-2.0

use std::{
    fs::File,
    os::fd::{AsRawFd, FromRawFd, OwnedFd},
    path::Path,
    str::FromStr,
};

use log::{debug, warn};
use nix::{
    dir::Dir,
    fcntl::{self, OFlag},
    sys::stat::Mode,
};

use crate::{
    Error, FsIdentity, FsOp, Result,
    identity::{inspect, is_symlink},
};

/// The permission bits given to files created by [`open`].
pub const DEFAULT_CREATE_MODE: Mode = Mode::from_bits_truncate(0o666);

/// Opens `path` with `open_fn` after checking that it is not a symlink, and
/// verifies that the opened object is the one that was inspected.
///
/// `open_fn` is the open primitive. It is called exactly once, with `path`,
/// and must follow the path the way the caller wants the object opened. The
/// other functions of this crate are this function with a fixed primitive.
///
/// If nothing exists at `path` when it is inspected, the opened object (which
/// `open_fn` presumably created) is accepted without comparison.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if `path` is empty.
/// - [`Error::SymlinkRejected`] if `path` is a symbolic link. `open_fn` is not
///   called.
/// - [`Error::NotAvailable`] if inspecting, opening or verifying fails.
/// - [`Error::RaceDetected`] if the opened object differs from the inspected
///   one. The handle returned by `open_fn` has been dropped.
pub fn guarded_open<T, F>(path: &Path, open_fn: F) -> Result<T>
where
    T: AsRawFd,
    F: FnOnce(&Path) -> nix::Result<T>,
{
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidArgument);
    }

    let inspected =
        inspect(path).map_err(|errno| Error::not_available(path, FsOp::Inspect, errno))?;
    if let Some(st) = &inspected {
        if is_symlink(st) {
            warn!("{}: path is a symbolic link, not opening", path.display());
            return Err(Error::SymlinkRejected { path: path.into() });
        }
    }

    let handle = open_fn(path).map_err(|errno| Error::not_available(path, FsOp::Open, errno))?;

    let opened = FsIdentity::of_fd(handle.as_raw_fd())
        .map_err(|errno| Error::not_available(path, FsOp::Verify, errno))?;

    let Some(inspected) = inspected.as_ref().map(FsIdentity::from) else {
        debug!("{}: created ({})", path.display(), opened);
        return Ok(handle);
    };

    if inspected != opened {
        warn!(
            "{}: swapped between inspection ({}) and open ({})",
            path.display(),
            inspected,
            opened
        );
        return Err(Error::RaceDetected {
            path: path.into(),
            inspected,
            opened,
        });
    }

    Ok(handle)
}

/// Opens `path` with the `open(2)` flags `flags`.
///
/// If `flags` contains `O_CREAT`, a created file gets [`DEFAULT_CREATE_MODE`].
/// See [`guarded_open`] for the checks performed and the errors returned.
pub fn open(path: impl AsRef<Path>, flags: OFlag) -> Result<OwnedFd> {
    open_with_mode(path, flags, DEFAULT_CREATE_MODE)
}

/// Opens `path` with the `open(2)` flags `flags` and the creation mode `mode`.
///
/// The flags and the mode are passed to the OS unmodified.
pub fn open_with_mode(path: impl AsRef<Path>, flags: OFlag, mode: Mode) -> Result<OwnedFd> {
    guarded_open(path.as_ref(), |path| {
        let fd = fcntl::open(path, flags, mode)?;
        // SAFETY: `fd` was just returned by a successful `open` and is owned by nobody else.
        Ok(unsafe { OwnedFd::from_raw_fd(fd) })
    })
}

/// Opens `path` as a stream, with the access described by `mode`.
///
/// The returned [`File`] is unbuffered; wrap it in a `BufReader` or
/// `BufWriter` as needed.
pub fn open_stream(path: impl AsRef<Path>, mode: StreamMode) -> Result<File> {
    open(path, mode.flags()).map(File::from)
}

/// Opens the directory `path` for reading its entries.
pub fn open_dir(path: impl AsRef<Path>) -> Result<Dir> {
    guarded_open(path.as_ref(), |path| {
        Dir::open(
            path,
            OFlag::O_RDONLY | OFlag::O_DIRECTORY | OFlag::O_CLOEXEC,
            Mode::empty(),
        )
    })
}

/// The access mode of a stream, as written in an `fopen(3)` mode string.
///
/// The mode string is one of `r`, `r+`, `w`, `w+`, `a` and `a+`, optionally
/// followed by any of the modifiers `b` (ignored), `e` (close-on-exec) and `x`
/// (exclusive creation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamMode {
    base: OFlag,
    modifiers: OFlag,
}

impl StreamMode {
    pub const READ: Self = Self::new(OFlag::O_RDONLY);
    pub const WRITE: Self =
        Self::new(OFlag::O_WRONLY.union(OFlag::O_CREAT).union(OFlag::O_TRUNC));
    pub const APPEND: Self =
        Self::new(OFlag::O_WRONLY.union(OFlag::O_CREAT).union(OFlag::O_APPEND));

    const fn new(base: OFlag) -> Self {
        Self {
            base,
            modifiers: OFlag::empty(),
        }
    }

    /// Returns the `open(2)` flags of this mode.
    pub fn flags(&self) -> OFlag {
        self.base | self.modifiers
    }
}

impl FromStr for StreamMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (base, rest) = if let Some(rest) = s.strip_prefix("r+") {
            (OFlag::O_RDWR, rest)
        } else if let Some(rest) = s.strip_prefix('r') {
            (OFlag::O_RDONLY, rest)
        } else if let Some(rest) = s.strip_prefix("w+") {
            (OFlag::O_RDWR | OFlag::O_CREAT | OFlag::O_TRUNC, rest)
        } else if let Some(rest) = s.strip_prefix('w') {
            (OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC, rest)
        } else if let Some(rest) = s.strip_prefix("a+") {
            (OFlag::O_RDWR | OFlag::O_CREAT | OFlag::O_APPEND, rest)
        } else if let Some(rest) = s.strip_prefix('a') {
            (OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_APPEND, rest)
        } else {
            return Err(Error::InvalidArgument);
        };

        let mut modifiers = OFlag::empty();
        for c in rest.chars() {
            match c {
                'b' => {}
                'e' => modifiers |= OFlag::O_CLOEXEC,
                'x' => modifiers |= OFlag::O_EXCL,
                _ => return Err(Error::InvalidArgument),
            }
        }

        Ok(Self { base, modifiers })
    }
}
