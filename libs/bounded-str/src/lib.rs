// SPDX-License-Identifier: MPL-2.0

//! Length-bounded byte string primitives.
//!
//! Identifiers that arrive from outside of the driver (PCI addresses given on
//! the command line, sysfs link targets, interface names) are handled as
//! NUL-terminated byte strings living in fixed-size buffers. This crate
//! provides the two operations the driver stack performs on such buffers:
//!
//! - [`copy`] and its raw-pointer form [`copy_raw`], which copy a string
//!   between two buffers without ever reading or writing outside the declared
//!   lengths, and which refuse to copy when the destination runs into the
//!   source;
//! - [`split`], which tokenizes a buffer in place by replacing delimiters
//!   with NUL bytes, without copying or allocating.
//!
//! Neither the source nor the destination is assumed to be NUL-terminated
//! within its declared length.

#![cfg_attr(not(test), no_std)]

mod copy;
mod error;
mod split;

#[cfg(test)]
mod test;

pub use self::{
    copy::{copy, copy_in_place, copy_raw, cstr_len},
    error::{Error, Result},
    split::{Tokens, split},
};

/// The terminator byte of a byte string.
pub const NUL: u8 = 0;
