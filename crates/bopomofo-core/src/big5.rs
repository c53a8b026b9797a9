//! Pure conversion between a Big5-encoded byte pair and its four-hex-digit
//! textual representation, used by character-info lookups. The full
//! Big5↔Unicode codepage table is the host's character-info data and is
//! out of scope here; this module only handles the byte-pair/hex identity
//! mapping the core needs to pass codes through.

/// Formats a Big5 byte pair as four uppercase hex digits, e.g. `(0xA4, 0x40)` → `"A440"`.
pub fn bytes_to_hex(high: u8, low: u8) -> String {
    format!("{high:02X}{low:02X}")
}

/// Parses a four-hex-digit string back into a Big5 byte pair.
/// Returns `None` if `hex` is not exactly four hex digits.
pub fn hex_to_bytes(hex: &str) -> Option<(u8, u8)> {
    if hex.len() != 4 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let high = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let low = u8::from_str_radix(&hex[2..4], 16).ok()?;
    Some((high, low))
}
