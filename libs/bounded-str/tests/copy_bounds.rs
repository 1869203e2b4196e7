// SPDX-License-Identifier: MPL-2.0

use bounded_str::{Error, NUL, copy, copy_in_place, cstr_len};
use rand::{Rng, SeedableRng, rngs::SmallRng};

const ROUNDS: usize = 4096;
const GUARD: u8 = 0xee;
const GUARD_LEN: usize = 16;

/// Returns a random string byte that is never the guard byte.
fn random_byte(rng: &mut SmallRng) -> u8 {
    if rng.random_ratio(1, 16) {
        NUL
    } else {
        rng.random_range(1..GUARD)
    }
}

#[test]
fn copy_never_leaves_its_views() {
    let mut rng = SmallRng::seed_from_u64(0x6d63_646d_61);

    for _ in 0..ROUNDS {
        let src_len = rng.random_range(1..=48);
        let dest_len = rng.random_range(1..=48);

        // Both views are followed by guard bytes. A read past the source
        // would copy a guard byte; a write past the destination would
        // overwrite one.
        let mut src_buf = vec![GUARD; src_len + GUARD_LEN];
        for byte in &mut src_buf[..src_len] {
            *byte = random_byte(&mut rng);
        }
        let mut dest_buf = vec![GUARD; dest_len + GUARD_LEN];

        copy(&mut dest_buf[..dest_len], &src_buf[..src_len]).unwrap();

        assert!(dest_buf[dest_len..].iter().all(|&b| b == GUARD));

        let src_str = &src_buf[..cstr_len(&src_buf[..src_len])];
        let copied = src_str.len().min(dest_len);
        assert_eq!(&dest_buf[..copied], &src_str[..copied]);
        if copied < dest_len {
            assert_eq!(dest_buf[copied], NUL);
        }
    }
}

/// Replays the copy on index positions, returning the expected buffer or the
/// expected error. Every source index it reads is asserted to be in `src`.
fn model(
    buf: &[u8],
    dest: core::ops::Range<usize>,
    src: core::ops::Range<usize>,
) -> Result<Vec<u8>, (Error, Vec<u8>)> {
    let mut out = buf.to_vec();
    let (mut d, mut s) = (dest.start, src.start);
    while d < dest.end {
        if d == src.start || d == s {
            return Err((Error::OverlapDetected, out));
        }
        if s == src.end {
            out[d] = NUL;
            return Ok(out);
        }
        assert!(src.contains(&s));
        out[d] = out[s];
        if out[d] == NUL {
            return Ok(out);
        }
        d += 1;
        s += 1;
    }
    Ok(out)
}

#[test]
fn overlapping_copy_matches_model_and_stays_in_bounds() {
    let mut rng = SmallRng::seed_from_u64(0x0ff5e7);
    const BUF_LEN: usize = 64;

    for _ in 0..ROUNDS {
        let mut buf = [0u8; BUF_LEN];
        for byte in &mut buf {
            *byte = random_byte(&mut rng);
        }

        let dest_start = rng.random_range(0..BUF_LEN);
        let dest_end = rng.random_range(dest_start + 1..=BUF_LEN);
        // Bias the source towards the destination to exercise overlaps.
        let src_start = if rng.random_bool(0.5) {
            dest_start.saturating_add(rng.random_range(0..4)).min(BUF_LEN - 1)
        } else {
            rng.random_range(0..BUF_LEN)
        };
        let src_end = rng.random_range(src_start + 1..=BUF_LEN);

        let before = buf;
        let res = copy_in_place(&mut buf, dest_start..dest_end, src_start..src_end);

        for (i, (&now, &then)) in buf.iter().zip(before.iter()).enumerate() {
            if !(dest_start..dest_end).contains(&i) {
                assert_eq!(now, then, "byte {} outside the destination changed", i);
            }
        }

        match model(&before, dest_start..dest_end, src_start..src_end) {
            Ok(expected) => {
                assert_eq!(res, Ok(()));
                assert_eq!(&buf[..], &expected[..]);
            }
            Err((err, expected)) => {
                assert_eq!(res, Err(err));
                assert_eq!(&buf[..], &expected[..]);
            }
        }
    }
}
