//! Percent-escaped text found in historical wallet dumps.
//!
//! Older dump files escaped whitespace, control characters, non-ASCII bytes and `%` itself as
//! `%XX`. Current dumps write plain JSON strings, but every string read back from a dump passes
//! through [`decode_dump_string`] so that historical files keep importing.

/// Decodes `%XX` escapes, best-effort.
///
/// A `%` followed by at least two more bytes consumes those two bytes as hex digits; anything
/// else is copied through unchanged. Malformed digits are not rejected, they decode to whatever the
/// digit arithmetic yields. Decoded bytes that do not form valid UTF-8 are replaced with
/// `U+FFFD`.
pub fn decode_dump_string(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());

    let mut pos = 0;
    while pos < bytes.len() {
        let byte = bytes[pos];
        if byte == b'%' && pos + 2 < bytes.len() {
            out.push((hex_digit(bytes[pos + 1]) << 4) | hex_digit(bytes[pos + 2]));
            pos += 3;
        } else {
            out.push(byte);
            pos += 1;
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Escapes `text` the way historical dumps did.
///
/// Bytes `<= 0x20`, `>= 0x80` and `%` become `%XX` with uppercase hex digits.
pub fn encode_dump_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for &byte in text.as_bytes() {
        if byte <= b' ' || byte >= 0x80 || byte == b'%' {
            out.push('%');
            out.push_str(&format!("{byte:02X}"));
        } else {
            out.push(char::from(byte));
        }
    }

    out
}

/// Maps `0-9`, `A-F` and `a-f` to their value. Other bytes map to arbitrary values.
const fn hex_digit(c: u8) -> u8 {
    (c >> 6)
        .wrapping_mul(9)
        .wrapping_add(c.wrapping_sub(b'0') & 15)
}
