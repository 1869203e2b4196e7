// SPDX-License-Identifier: MPL-2.0

//! Race-free access to filesystem objects by name.
//!
//! Device nodes, sysfs attributes and configuration files are opened by path.
//! Between looking at a path and opening it, another process may replace the
//! path with a symbolic link or with a different file. Every open in this
//! crate therefore goes through the same sequence:
//!
//! 1. `lstat` the path without following a trailing symlink. A symlink is
//!    rejected outright; a missing path is allowed (the open may create it).
//! 2. Open the path with the requested primitive.
//! 3. `fstat` the new handle.
//! 4. If step 1 saw an object, its (device, inode) identity must equal the
//!    one from step 3. Otherwise the handle is closed and the open fails.
//!
//! The identity from step 1 is never cached across calls. Handles are owned
//! values ([`OwnedFd`], [`File`], [`Dir`]), so every early return closes them.
//!
//! [`OwnedFd`]: std::os::fd::OwnedFd
//! [`File`]: std::fs::File
//! [`Dir`]: nix::dir::Dir

mod error;
mod identity;
mod mtime;
mod open;
mod stable;

pub use nix::{fcntl::OFlag, sys::stat::Mode};

pub use self::{
    error::{Error, FsOp, Result},
    identity::FsIdentity,
    mtime::{Mtime, mtime},
    open::{
        DEFAULT_CREATE_MODE, StreamMode, guarded_open, open, open_dir, open_stream,
        open_with_mode,
    },
    stable::StableFile,
};
