//! Fixed-width field utilities for engine request records.
//!
//! The engine SDK takes zero-initialized C-style request structs whose string
//! fields are fixed byte arrays. This module provides the field widths and
//! helpers to convert between `&str` and the fixed representation.
//!
//! Truncation is a contract, not an error: input longer than a field's
//! capacity is silently cut at the byte boundary, matching the engine's own
//! behavior. A field truncated mid-codepoint reads back as `""`.

/// Broker identifier width.
pub const BROKER_ID_LEN: usize = 11;
/// User identifier width.
pub const USER_ID_LEN: usize = 16;
/// Investor identifier width.
pub const INVESTOR_ID_LEN: usize = 13;
/// Trading account identifier width.
pub const ACCOUNT_ID_LEN: usize = 13;
/// Instrument identifier width.
pub const INSTRUMENT_ID_LEN: usize = 31;
/// Exchange identifier width.
pub const EXCHANGE_ID_LEN: usize = 9;
/// Client-side order reference width.
pub const ORDER_REF_LEN: usize = 13;
/// Exchange-side order system identifier width.
pub const ORDER_SYS_ID_LEN: usize = 21;
/// Parked order identifier width.
pub const PARKED_ORDER_ID_LEN: usize = 13;
/// Password / captcha / one-time-token width.
pub const PASSWORD_LEN: usize = 41;
/// Terminal auth code width.
pub const AUTH_CODE_LEN: usize = 17;
/// Application identifier width.
pub const APP_ID_LEN: usize = 33;
/// User product info width.
pub const PRODUCT_INFO_LEN: usize = 11;

/// Write a UTF-8 string into a fixed byte field.
///
/// The string is copied byte-for-byte, truncated to the field capacity, and
/// the remaining bytes are zero-filled.
#[inline]
pub fn write_field<const N: usize>(buf: &mut [u8; N], s: &str) {
    let len = s.len().min(N);
    buf[..len].copy_from_slice(&s.as_bytes()[..len]);
    buf[len..].fill(0);
}

/// Read a string back from a fixed byte field.
///
/// Returns the content up to the first null byte (or the full buffer if none).
/// Returns `""` for an all-zero field or invalid UTF-8.
#[inline]
pub fn read_field<const N: usize>(buf: &[u8; N]) -> &str {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(N);
    std::str::from_utf8(&buf[..end]).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn round_trip() {
        let mut buf = [0u8; BROKER_ID_LEN];
        write_field(&mut buf, "9999");
        assert_eq!(read_field(&buf), "9999");
    }

    #[test]
    fn empty_field() {
        let mut buf = [0u8; USER_ID_LEN];
        write_field(&mut buf, "");
        assert_eq!(read_field(&buf), "");
    }

    #[test]
    fn exact_capacity() {
        let s = "A".repeat(INSTRUMENT_ID_LEN);
        let mut buf = [0u8; INSTRUMENT_ID_LEN];
        write_field(&mut buf, &s);
        assert_eq!(read_field(&buf), s);
    }

    #[test]
    fn oversized_input_truncated() {
        let s = "A".repeat(INSTRUMENT_ID_LEN + 10);
        let mut buf = [0u8; INSTRUMENT_ID_LEN];
        write_field(&mut buf, &s);
        assert_eq!(read_field(&buf).len(), INSTRUMENT_ID_LEN);
    }

    #[test]
    fn rewrite_zero_fills_tail() {
        let mut buf = [0u8; USER_ID_LEN];
        write_field(&mut buf, "a-long-user-id");
        write_field(&mut buf, "u1");
        assert_eq!(read_field(&buf), "u1");
        assert!(buf[2..].iter().all(|&b| b == 0));
    }

    proptest! {
        #[test]
        fn write_never_panics_and_respects_width(s in ".{0,120}") {
            let mut buf = [0u8; INSTRUMENT_ID_LEN];
            write_field(&mut buf, &s);
            prop_assert!(read_field(&buf).len() <= INSTRUMENT_ID_LEN);
        }

        #[test]
        fn ascii_prefix_preserved(s in "[A-Za-z0-9_.-]{0,60}") {
            let mut buf = [0u8; USER_ID_LEN];
            write_field(&mut buf, &s);
            prop_assert_eq!(read_field(&buf), &s[..s.len().min(USER_ID_LEN)]);
        }
    }
}
