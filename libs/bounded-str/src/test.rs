// SPDX-License-Identifier: MPL-2.0

use crate::{Error, copy, copy_in_place, copy_raw, cstr_len, split};

#[test]
fn copy_stops_at_terminator() {
    let mut dest = [0xffu8; 10];
    copy(&mut dest, b"abc\0").unwrap();
    assert_eq!(&dest[..4], b"abc\0");
    assert!(dest[4..].iter().all(|&b| b == 0xff));
}

#[test]
fn copy_terminates_after_source_capacity() {
    let src = b"abcdef";
    let mut dest = [0xffu8; 10];
    copy(&mut dest, &src[..3]).unwrap();
    assert_eq!(&dest[..4], b"abc\0");
    assert_eq!(dest[4], 0xff);
}

#[test]
fn copy_fills_destination_without_terminator() {
    let mut dest = [0xffu8; 3];
    copy(&mut dest, b"abcdef").unwrap();
    assert_eq!(&dest, b"abc");
}

#[test]
fn copy_rejects_empty_views() {
    let mut dest = [0u8; 4];
    assert_eq!(copy(&mut dest, b""), Err(Error::InvalidArgument));
    assert_eq!(copy(&mut [], b"abc"), Err(Error::InvalidArgument));
}

#[test]
fn copy_raw_rejects_null() {
    let mut dest = [0u8; 4];
    // SAFETY: Null pointers are rejected before any access.
    let res = unsafe { copy_raw(dest.as_mut_ptr(), dest.len(), core::ptr::null(), 4) };
    assert_eq!(res, Err(Error::InvalidArgument));
    let res = unsafe { copy_raw(core::ptr::null_mut(), 4, b"abc".as_ptr(), 3) };
    assert_eq!(res, Err(Error::InvalidArgument));
}

#[test]
fn copy_same_view_is_overlap() {
    let mut buf = *b"abcdef\0";
    assert_eq!(
        copy_in_place(&mut buf, 0..7, 0..7),
        Err(Error::OverlapDetected)
    );
    assert_eq!(&buf, b"abcdef\0");
}

#[test]
fn copy_into_source_start_is_overlap() {
    // The destination starts two bytes before the source and reaches the
    // first source byte on the third write.
    let mut buf = *b"..abcdef";
    assert_eq!(
        copy_in_place(&mut buf, 0..8, 2..8),
        Err(Error::OverlapDetected)
    );
    assert_eq!(&buf, b"ababcdef");
}

#[test]
fn copy_between_disjoint_views_of_one_buffer() {
    let mut buf = *b"ab\0.....";
    copy_in_place(&mut buf, 4..8, 0..3).unwrap();
    assert_eq!(&buf, b"ab\0.ab\0.");
}

#[test]
fn copy_in_place_rejects_out_of_bounds_views() {
    let mut buf = [0u8; 4];
    assert_eq!(
        copy_in_place(&mut buf, 0..5, 0..1),
        Err(Error::InvalidArgument)
    );
    assert_eq!(
        copy_in_place(&mut buf, 0..1, 2..2),
        Err(Error::InvalidArgument)
    );
}

#[test]
fn cstr_len_is_bounded() {
    assert_eq!(cstr_len(b"ab\0cd"), 2);
    assert_eq!(cstr_len(b"abcd"), 4);
    assert_eq!(cstr_len(b""), 0);
}

#[test]
fn split_keeps_empty_tokens() {
    let mut buf = *b"a,b,,c";
    let mut slots = [&[][..]; 10];
    let tokens = split(&mut buf, b',', &mut slots).unwrap();
    assert_eq!(&*tokens, &[&b"a"[..], b"b", b"", b"c"]);
}

#[test]
fn split_stops_at_max_tokens() {
    let mut buf = *b"a,b,c";
    let mut slots = [&[][..]; 2];
    let tokens = split(&mut buf, b',', &mut slots).unwrap();
    assert_eq!(&*tokens, &[&b"a"[..], b"b,c"]);
    assert_eq!(&buf, b"a\0b,c");
}

#[test]
fn split_leading_delimiter_gives_empty_first_token() {
    let mut buf = *b",ab";
    let mut slots = [&[][..]; 1];
    let tokens = split(&mut buf, b',', &mut slots).unwrap();
    assert_eq!(&*tokens, &[&b""[..]]);
    assert_eq!(&buf, b"\0ab");
}

#[test]
fn split_trailing_delimiter_gives_no_extra_token() {
    let mut buf = *b"ab,";
    let mut slots = [&[][..]; 4];
    let tokens = split(&mut buf, b',', &mut slots).unwrap();
    assert_eq!(&*tokens, &[&b"ab"[..]]);
}

#[test]
fn split_stops_at_existing_terminator() {
    let mut buf = *b"a/b\0c/d";
    let mut slots = [&[][..]; 8];
    let tokens = split(&mut buf, b'/', &mut slots).unwrap();
    assert_eq!(&*tokens, &[&b"a"[..], b"b"]);
    assert_eq!(&buf[4..], b"c/d");
}

#[test]
fn split_rejects_empty_input() {
    let mut slots = [&[][..]; 2];
    assert_eq!(
        split(&mut [], b',', &mut slots).map(|t| t.len()),
        Err(Error::InvalidArgument)
    );
    let mut buf = *b"a,b";
    assert_eq!(
        split(&mut buf, b',', &mut []).map(|t| t.len()),
        Err(Error::InvalidArgument)
    );
}

#[test]
fn split_tokens_as_str() {
    let mut buf = *b"../../../kernel/iommu_groups/17";
    let mut slots = [&[][..]; 16];
    let tokens = split(&mut buf, b'/', &mut slots).unwrap();
    assert_eq!(tokens.len(), 6);
    assert_eq!(tokens.get_str(5), Some("17"));
    assert_eq!(tokens.get_str(6), None);
}
