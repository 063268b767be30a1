use super::*;

#[test]
fn test_byte_length_classes() {
    assert_eq!(byte_length(b'a'), 1);
    assert_eq!(byte_length(0x7F), 1);
    assert_eq!(byte_length(0xC2), 2);
    assert_eq!(byte_length(0xDF), 2);
    assert_eq!(byte_length(0xE0), 3);
    assert_eq!(byte_length(0xEF), 3);
    assert_eq!(byte_length(0xF0), 4);
    assert_eq!(byte_length(0xF4), 4);
    // Invalid leads fall back to a single raw byte
    assert_eq!(byte_length(0x80), 1);
    assert_eq!(byte_length(0xC0), 1);
    assert_eq!(byte_length(0xC1), 1);
    assert_eq!(byte_length(0xF5), 1);
    assert_eq!(byte_length(0xFF), 1);
}

#[test]
fn test_validate_well_formed() {
    assert_eq!(validate(b"a"), Some(1));
    assert_eq!(validate("é".as_bytes()), Some(2));
    assert_eq!(validate("€".as_bytes()), Some(3));
    assert_eq!(validate("𝄞".as_bytes()), Some(4));
}

#[test]
fn test_validate_rejects_overlongs() {
    // 0xC0/0xC1 are never valid leads
    assert_eq!(validate(&[0xC0, 0x80]), None);
    assert_eq!(validate(&[0xC1, 0xBF]), None);
    // Overlong 3-byte: 0xE0 requires second byte >= 0xA0
    assert_eq!(validate(&[0xE0, 0x9F, 0x80]), None);
    assert_eq!(validate(&[0xE0, 0xA0, 0x80]), Some(3));
    // Overlong 4-byte: 0xF0 requires second byte >= 0x90
    assert_eq!(validate(&[0xF0, 0x8F, 0x80, 0x80]), None);
    assert_eq!(validate(&[0xF0, 0x90, 0x80, 0x80]), Some(4));
}

#[test]
fn test_validate_rejects_surrogates_and_out_of_range() {
    // U+D800 would encode as ED A0 80
    assert_eq!(validate(&[0xED, 0xA0, 0x80]), None);
    assert_eq!(validate(&[0xED, 0x9F, 0xBF]), Some(3)); // U+D7FF is fine
    // Above U+10FFFF: F4 90 80 80
    assert_eq!(validate(&[0xF4, 0x90, 0x80, 0x80]), None);
    assert_eq!(validate(&[0xF4, 0x8F, 0xBF, 0xBF]), Some(4)); // U+10FFFF
}

#[test]
fn test_validate_rejects_bad_continuations() {
    assert_eq!(validate(&[0xC2]), None); // truncated
    assert_eq!(validate(&[0xC2, 0x41]), None); // not a continuation
    assert_eq!(validate(&[0xE2, 0x82, 0x41]), None);
}

#[test]
fn test_decode() {
    assert_eq!(decode(b"a"), Some('a'));
    assert_eq!(decode("é".as_bytes()), Some('é'));
    assert_eq!(decode("中".as_bytes()), Some('中'));
    assert_eq!(decode("𝄞".as_bytes()), Some('𝄞'));
    assert_eq!(decode(&[0xFF]), None);
    assert_eq!(decode(&[]), None);
}

#[test]
fn test_char_width() {
    assert_eq!(char_width(b"a"), 1);
    assert_eq!(char_width("é".as_bytes()), 1);
    assert_eq!(char_width("中".as_bytes()), 2); // CJK is two cells
    assert_eq!(char_width("　".as_bytes()), 2); // ideographic space
    assert_eq!(char_width(&[0x01]), 0); // control
    assert_eq!(char_width(&[0x7F]), 0); // DEL
    assert_eq!(char_width("\u{0301}".as_bytes()), 0); // combining acute
    assert_eq!(char_width(&[0xFF]), 1); // raw byte
}

#[test]
fn test_boundaries_round_trip() {
    let s = "a中é𝄞!".as_bytes();
    let mut i = 0;
    let mut boundaries = vec![0];
    while i < s.len() {
        i = next_boundary(s, i);
        boundaries.push(i);
    }
    assert_eq!(boundaries, vec![0, 1, 4, 6, 10, 11]);
    // prev(next(i)) == i on every boundary
    for w in boundaries.windows(2) {
        assert_eq!(prev_boundary(s, w[1]), w[0]);
    }
}

#[test]
fn test_prev_boundary_stops_at_start() {
    let s = "é".as_bytes();
    assert_eq!(prev_boundary(s, 0), 0);
    assert_eq!(prev_boundary(s, 2), 0);
    // From the middle of a sequence, walks to its lead byte
    assert_eq!(prev_boundary(s, 1), 0);
}
