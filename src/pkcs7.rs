use crate::error::{Error, Result};

/// Appends PKCS#7 padding: `p = k - (len mod k)` bytes of value `p`, with a
/// whole block of value `k` when the input is already aligned. The trailing
/// byte therefore always declares the pad length. Never fails.
pub fn pad(buf: &[u8], k: usize) -> Vec<u8> {
    let mut out = buf.to_vec();
    pad_in_place(&mut out, k);
    out
}

/// In-place variant of [`pad`], for callers that asked for the mutation.
pub fn pad_in_place(buf: &mut Vec<u8>, k: usize) {
    debug_assert!(k >= 2 && k <= u8::MAX as usize);
    let p = k - buf.len() % k;
    buf.resize(buf.len() + p, p as u8);
}

#[test]
fn test_pad() {
    assert_eq!(pad(b"YELLOW SUBMARINE", 20), b"YELLOW SUBMARINE\x04\x04\x04\x04");
    // Aligned input grows by a full declared block.
    assert_eq!(pad(b"YELLOW SUBMARINE", 16), b"YELLOW SUBMARINE\x10\x10\x10\x10\x10\x10\x10\x10\x10\x10\x10\x10\x10\x10\x10\x10");
    assert_eq!(pad(b"", 4), b"\x04\x04\x04\x04");
}

/// Reports whether `buf` carries valid PKCS#7 padding for block size `k`.
/// Total by design: this predicate is exactly the bit of information a
/// padding oracle leaks.
pub fn check_padding(buf: &[u8], k: usize) -> bool {
    if k < 2 || buf.is_empty() || buf.len() % k != 0 {
        return false;
    }
    let p = buf[buf.len() - 1] as usize;
    if p < 1 || p > k || p > buf.len() {
        return false;
    }
    buf[buf.len() - p..].iter().all(|&b| b as usize == p)
}

#[test]
fn test_check_padding() {
    assert!(check_padding(b"YELLOW SUBMARINE\x04\x04\x04\x04", 20));
    assert!(check_padding(b"\x02\x02", 2));
    // Last byte zero, value beyond k, non-uniform tail.
    assert!(!check_padding(b"YELLOW SUBMARIN\x00", 16));
    assert!(!check_padding(b"YELLOW SUBMARIN\x11", 16));
    assert!(!check_padding(b"YELLOW SUBMA\x01\x02\x03\x04", 16));
    // Misaligned, empty, degenerate block size.
    assert!(!check_padding(b"YELLOW\x02\x02", 16));
    assert!(!check_padding(b"", 16));
    assert!(!check_padding(b"\x01", 1));
}

/// Validates then strips PKCS#7 padding.
pub fn unpad(buf: &[u8], k: usize) -> Result<Vec<u8>> {
    if !check_padding(buf, k) {
        return Err(Error::InvalidPadding);
    }
    let p = buf[buf.len() - 1] as usize;
    Ok(buf[..buf.len() - p].to_vec())
}

#[test]
fn test_unpad() {
    assert_eq!(unpad(b"ICE ICE BABY\x04\x04\x04\x04", 16).unwrap(), b"ICE ICE BABY");
    assert!(matches!(unpad(b"ICE ICE BABY\x05\x05\x05\x05", 16), Err(Error::InvalidPadding)));
    assert!(matches!(unpad(b"ICE ICE BABY\x01\x02\x03\x04", 16), Err(Error::InvalidPadding)));
    // A full padding block strips back to the original.
    assert_eq!(unpad(&pad(b"YELLOW SUBMARINE", 16), 16).unwrap(), b"YELLOW SUBMARINE");
}

#[test]
fn test_pad_unpad_round_trip() {
    for k in [2usize, 3, 8, 16, 20] {
        for len in 0..=2 * k {
            let buf: Vec<u8> = (0..len as u8).collect();
            assert_eq!(unpad(&pad(&buf, k), k).unwrap(), buf);
        }
    }
}
