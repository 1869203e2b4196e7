// SPDX-License-Identifier: MPL-2.0

use core::ops::Deref;

use crate::{Error, NUL, Result, cstr_len};

/// The tokens produced by [`split`].
///
/// Each token borrows the buffer that was split. A token runs from its first
/// byte up to the next NUL byte of the buffer (or the end of the buffer),
/// which is how a C string pointer into the buffer would read it.
#[derive(Debug, Clone, Copy)]
pub struct Tokens<'a, 's> {
    tokens: &'s [&'a [u8]],
}

impl<'a> Tokens<'a, '_> {
    /// Returns the `index`-th token as UTF-8, if it exists and is valid UTF-8.
    pub fn get_str(&self, index: usize) -> Option<&'a str> {
        let token = *self.tokens.get(index)?;
        core::str::from_utf8(token).ok()
    }
}

impl<'a> Deref for Tokens<'a, '_> {
    type Target = [&'a [u8]];

    fn deref(&self) -> &Self::Target {
        self.tokens
    }
}

/// Splits `buf` in place at each occurrence of `delim`.
///
/// At most `slots.len()` tokens are produced. The scan goes from left to
/// right: the first byte always starts a token, and each delimiter is replaced
/// with a NUL byte and makes the following byte start a new token. Two
/// adjacent delimiters therefore produce an empty token, and so does a
/// delimiter at the very start of the buffer.
///
/// The scan stops at the first NUL byte already present in `buf`, or as soon
/// as `slots.len()` tokens have been produced. Bytes after the stopping point
/// are left unmodified, so the last token of a truncated split carries the
/// rest of the string.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `buf` or `slots` is empty.
///
/// # Examples
///
/// ```
/// let mut buf = *b"0000:3b:00.1";
/// let mut slots = [&[][..]; 4];
/// let tokens = bounded_str::split(&mut buf, b':', &mut slots).unwrap();
/// assert_eq!(&*tokens, &[&b"0000"[..], b"3b", b"00.1"]);
/// ```
pub fn split<'a, 's>(
    buf: &'a mut [u8],
    delim: u8,
    slots: &'s mut [&'a [u8]],
) -> Result<Tokens<'a, 's>> {
    if buf.is_empty() || slots.is_empty() {
        return Err(Error::InvalidArgument);
    }

    let max_tokens = slots.len();
    let mut nr_tokens = 0;
    let mut rest: &'a mut [u8] = buf;

    while let Some(&first) = rest.first() {
        if first == NUL || nr_tokens == max_tokens {
            break;
        }

        // A new token starts at `rest[0]`. Find the delimiter that ends it,
        // if the scan is allowed to go that far.
        nr_tokens += 1;
        let delim_pos = if first == delim {
            Some(0)
        } else if nr_tokens == max_tokens {
            None
        } else {
            match rest[1..].iter().position(|&b| b == NUL || b == delim) {
                Some(pos) if rest[pos + 1] == delim => Some(pos + 1),
                _ => None,
            }
        };

        let Some(delim_pos) = delim_pos else {
            let tail: &'a mut [u8] = core::mem::take(&mut rest);
            let tail: &'a [u8] = tail;
            slots[nr_tokens - 1] = &tail[..cstr_len(tail)];
            break;
        };

        let (token, tail) = core::mem::take(&mut rest).split_at_mut(delim_pos + 1);
        token[delim_pos] = NUL;
        let token: &'a [u8] = token;
        slots[nr_tokens - 1] = &token[..delim_pos];
        rest = tail;
    }

    let slots: &'s [&'a [u8]] = slots;
    Ok(Tokens {
        tokens: &slots[..nr_tokens],
    })
}
