// SPDX-License-Identifier: MPL-2.0

use core::ops::Range;

use crate::{Error, NUL, Result};

/// Copies a byte string from `src` into `dest`.
///
/// The copy proceeds byte by byte and stops in one of three ways:
/// 1. A NUL byte has been copied. The destination now holds a complete string.
/// 2. `src` is exhausted without a NUL byte. A NUL byte is appended to the
///    destination, so the result is the first `src.len()` bytes as a string.
/// 3. `dest` is full. The destination holds the bytes copied so far and is
///    not terminated.
///
/// All three outcomes are successes. No byte beyond `dest.len()` is written
/// and no byte beyond `src.len()` is read.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if either slice is empty.
pub fn copy(dest: &mut [u8], src: &[u8]) -> Result<()> {
    // SAFETY: Both pointers come from live slices and are valid for their lengths.
    unsafe { copy_raw(dest.as_mut_ptr(), dest.len(), src.as_ptr(), src.len()) }
}

/// Copies a byte string between two views of the same buffer.
///
/// This is the safe entry point for copies whose views may overlap. Apart
/// from the overlap check described in [`copy_raw`], the semantics are those
/// of [`copy`].
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if either range is empty or out of the
/// bounds of `buf`, and [`Error::OverlapDetected`] if the destination
/// catches up with the source.
pub fn copy_in_place(buf: &mut [u8], dest: Range<usize>, src: Range<usize>) -> Result<()> {
    if dest.is_empty() || dest.end > buf.len() {
        return Err(Error::InvalidArgument);
    }
    if src.is_empty() || src.end > buf.len() {
        return Err(Error::InvalidArgument);
    }

    let base = buf.as_mut_ptr();
    // SAFETY: Both ranges are non-empty and within `buf`, so both pointers are
    // in bounds and valid for their lengths. They are derived from the same
    // mutable pointer, so aliasing writes through `dest` are allowed.
    unsafe {
        copy_raw(
            base.add(dest.start),
            dest.len(),
            base.add(src.start).cast_const(),
            src.len(),
        )
    }
}

/// Copies a byte string from the view `src..src + src_len` into the view
/// `dest..dest + dest_len`.
///
/// The views may alias. Before each byte is written, the destination
/// position is compared with the position the source started at and with the
/// current source position; if either matches, the copy stops with
/// [`Error::OverlapDetected`] instead of overwriting bytes that are still to
/// be read. Bytes written before the overlap was found remain in the
/// destination.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if either pointer is null or either
/// length is zero, and [`Error::OverlapDetected`] as described above.
///
/// # Safety
///
/// - `dest` must be valid for writes of `dest_len` bytes.
/// - `src` must be valid for reads of `src_len` bytes.
/// - No Rust reference to either range may be alive during the call.
pub unsafe fn copy_raw(
    dest: *mut u8,
    dest_len: usize,
    src: *const u8,
    src_len: usize,
) -> Result<()> {
    if dest.is_null() || dest_len == 0 {
        return Err(Error::InvalidArgument);
    }
    if src.is_null() || src_len == 0 {
        return Err(Error::InvalidArgument);
    }

    let src_start = src.addr();
    let mut dest_cursor = dest;
    let mut src_cursor = src;
    let mut dest_avail = dest_len;
    let mut src_remain = src_len;

    while dest_avail > 0 {
        if dest_cursor.addr() == src_start || dest_cursor.addr() == src_cursor.addr() {
            return Err(Error::OverlapDetected);
        }

        if src_remain == 0 {
            // SAFETY: `dest_avail > 0`, so the cursor is still inside the destination.
            unsafe { dest_cursor.write(NUL) };
            return Ok(());
        }

        // SAFETY: `src_remain > 0` and `dest_avail > 0`, so both cursors are
        // still inside their views.
        let byte = unsafe {
            let byte = src_cursor.read();
            dest_cursor.write(byte);
            byte
        };
        if byte == NUL {
            return Ok(());
        }

        dest_avail -= 1;
        src_remain -= 1;
        dest_cursor = dest_cursor.wrapping_add(1);
        src_cursor = src_cursor.wrapping_add(1);
    }

    Ok(())
}

/// Returns the length of the byte string stored in `buf`.
///
/// This is the index of the first NUL byte, or `buf.len()` if there is none.
pub fn cstr_len(buf: &[u8]) -> usize {
    buf.iter().position(|&b| b == NUL).unwrap_or(buf.len())
}
