//! Tests for byte decoding.

use wren_common::encoding::{DEFAULT_ENCODING, EncodingError, decode, is_supported};

#[test]
fn test_decode_plain_utf8() {
    let text = decode("<p>héllo</p>".as_bytes(), DEFAULT_ENCODING).unwrap();
    assert_eq!(text, "<p>héllo</p>");
}

#[test]
fn test_decode_latin1_label() {
    // 0xE9 is 'é' in windows-1252 / latin1
    let text = decode(b"caf\xE9", "latin1").unwrap();
    assert_eq!(text, "café");
}

#[test]
fn test_bom_overrides_label() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice("ok ✓".as_bytes());
    let text = decode(&bytes, "latin1").unwrap();
    assert_eq!(text, "ok ✓");
}

#[test]
fn test_utf16le_bom() {
    let bytes = [0xFF, 0xFE, b'h', 0x00, b'i', 0x00];
    assert_eq!(decode(&bytes, "utf-8").unwrap(), "hi");
}

#[test]
fn test_unknown_label() {
    let err = decode(b"abc", "no-such-charset").unwrap_err();
    assert!(matches!(err, EncodingError::UnknownLabel { ref label } if label == "no-such-charset"));
    assert!(!is_supported("no-such-charset"));
    assert!(is_supported(" UTF-8 "));
}

#[test]
fn test_malformed_utf8() {
    let err = decode(b"abc\xC3", "utf-8").unwrap_err();
    assert!(matches!(err, EncodingError::Malformed { .. }));
}
