// SPDX-License-Identifier: MPL-2.0

use core::fmt;

/// The error type of the bounded string operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A buffer view is null or empty, or a view falls outside its buffer.
    InvalidArgument,
    /// The destination caught up with the source during a copy.
    OverlapDetected,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument => write!(f, "invalid buffer view"),
            Error::OverlapDetected => write!(f, "destination overlaps the source"),
        }
    }
}

impl core::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
