use std::fmt::Write;

pub fn nybble_to_hex(nyb: u8) -> char {
    (if nyb < 10 {
        b'0' + nyb
    } else {
        b'a' + (nyb - 10)
    }) as char
}

/// Renders bytes as one contiguous run of lowercase hex digits, in
/// stream order.
pub fn fmt_hex_bytes(bytes: &[u8]) -> String {
    let mut acc = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        acc.push(nybble_to_hex(b >> 4));
        acc.push(nybble_to_hex(b & 0xf));
    }
    acc
}

/// Writes `value` as exactly `digits` lowercase hex digits, most significant first.
pub fn write_hex_fixed(acc: &mut String, value: u64, digits: usize) {
    /* writing into a String never fails */
    let _ = write!(acc, "{:0width$x}", value, width = digits);
}

/// Whether a byte has a printable glyph. Standard ascii uses isprint/isspace;
/// for the high half we go with what fonts actually tend to have.
pub fn is_printable(ch: u8) -> bool {
    if ch < 0x80 {
        ch.is_ascii_graphic() || ch == b' ' || is_c_space(ch)
    } else {
        ch >= 0xa0
    }
}

/* C isspace: space, \t, \n, \v, \f, \r */
pub fn is_c_space(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Byte as the glyph it would be drawn with. Bytes above 0x7f map through latin-1.
pub fn byte_glyph(ch: u8) -> char {
    char::from(ch)
}
