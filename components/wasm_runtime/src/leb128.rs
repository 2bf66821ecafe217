//! LEB128 decoding over a byte slice and a cursor
//!
//! Both decoders stop once 32 bits of shift have been consumed, silently
//! dropping the rest of an overlong encoding. Reading past the end of the
//! slice stops without error and returns what was accumulated.

/// Decode an unsigned 32-bit LEB128 value starting at `*pos`
pub fn read_u32(bytes: &[u8], pos: &mut usize) -> u32 {
    let mut result: u32 = 0;
    let mut shift: u32 = 0;

    while let Some(&byte) = bytes.get(*pos) {
        *pos += 1;
        result |= u32::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
        if shift >= 32 {
            break;
        }
    }
    result
}

/// Decode a signed 32-bit LEB128 value starting at `*pos`
///
/// The 7-bit groups are accumulated as-is and reinterpreted as two's
/// complement; short encodings are not sign-extended, so a negative value
/// needs all five bytes.
pub fn read_i32(bytes: &[u8], pos: &mut usize) -> i32 {
    let mut result: u32 = 0;
    let mut shift: u32 = 0;

    while let Some(&byte) = bytes.get(*pos) {
        *pos += 1;
        result |= u32::from(byte & 0x7F) << shift;
        shift += 7;
        if byte & 0x80 == 0 || shift >= 32 {
            break;
        }
    }
    result as i32
}

/// Decode a length-prefixed UTF-8 string.
///
/// Returns `None` if the declared length runs past the end or the bytes are
/// not UTF-8; `*pos` is left after the length prefix in that case.
pub fn read_name(bytes: &[u8], pos: &mut usize) -> Option<String> {
    let len = read_u32(bytes, pos) as usize;
    let end = pos.checked_add(len)?;
    let raw = bytes.get(*pos..end)?;
    let name = std::str::from_utf8(raw).ok()?.to_string();
    *pos = end;
    Some(name)
}
