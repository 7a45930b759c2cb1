use std::str::from_utf8_unchecked;

use crate::Error;

// cspell:disable-next-line
const ALPHABET: [u8; 32] = *b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Largest symbol allowed as first character, the remaining 125 bits are
/// covered by the other 25 characters.
const FIRST_SYMBOL_MAX: u8 = 7;

/// Decoding mode for ULID strings.
///
/// Both modes accept upper- and lowercase letters. They differ in how
/// characters outside the canonical alphabet are handled.
///
/// # Example
///
/// ```
/// use sortid::{Error, Mode, Ulid};
///
/// let s = "0000000000000000000000000O";
///
/// assert_eq!(Ulid::parse(s, Mode::Lenient), Ok(Ulid::nil()));
/// assert_eq!(Ulid::parse(s, Mode::Strict), Err(Error::InvalidChar));
/// ```
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Mode {
    /// Maps the confusable letters `O` to `0`, and `I` and `L` to `1`.
    #[default]
    Lenient,
    /// Accepts the 32 symbols of the canonical alphabet only.
    Strict,
}

#[rustfmt::skip]
const LENIENT: [i8; 256] = [
    /* 0x00 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0x10 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0x20 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0x30 */   0,  1,  2,  3,  4,  5,  6,  7,  8,  9, -1, -1, -1, -1, -1, -1,
    /* 0x40 */  -1, 10, 11, 12, 13, 14, 15, 16, 17,  1, 18, 19,  1, 20, 21,  0,
    /* 0x50 */  22, 23, 24, 25, 26, -1, 27, 28, 29, 30, 31, -1, -1, -1, -1, -1,
    /* 0x60 */  -1, 10, 11, 12, 13, 14, 15, 16, 17,  1, 18, 19,  1, 20, 21,  0,
    /* 0x70 */  22, 23, 24, 25, 26, -1, 27, 28, 29, 30, 31, -1, -1, -1, -1, -1,
    /* 0x80 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0x90 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0xA0 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0xB0 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0xC0 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0xD0 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0xE0 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0xF0 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
];

// Same as `LENIENT`, but without I, L, and O.
#[rustfmt::skip]
const STRICT: [i8; 256] = [
    /* 0x00 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0x10 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0x20 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0x30 */   0,  1,  2,  3,  4,  5,  6,  7,  8,  9, -1, -1, -1, -1, -1, -1,
    /* 0x40 */  -1, 10, 11, 12, 13, 14, 15, 16, 17, -1, 18, 19, -1, 20, 21, -1,
    /* 0x50 */  22, 23, 24, 25, 26, -1, 27, 28, 29, 30, 31, -1, -1, -1, -1, -1,
    /* 0x60 */  -1, 10, 11, 12, 13, 14, 15, 16, 17, -1, 18, 19, -1, 20, 21, -1,
    /* 0x70 */  22, 23, 24, 25, 26, -1, 27, 28, 29, 30, 31, -1, -1, -1, -1, -1,
    /* 0x80 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0x90 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0xA0 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0xB0 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0xC0 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0xD0 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0xE0 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    /* 0xF0 */  -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
];

const fn table(mode: Mode) -> &'static [i8; 256] {
    match mode {
        Mode::Lenient => &LENIENT,
        Mode::Strict => &STRICT,
    }
}

fn symbol(table: &[i8; 256], char: u8) -> Result<u8, Error> {
    u8::try_from(table[usize::from(char)]).or(Err(Error::InvalidChar))
}

pub fn encode(mut n: u128, buffer: &mut [u8; 26]) -> &str {
    for byte in buffer.iter_mut().rev() {
        *byte = ALPHABET[(n & 0x1F) as usize];
        n >>= 5;
    }

    // Safety: Encoding above guarantees valid UTF-8
    unsafe { from_utf8_unchecked(buffer) }
}

pub fn decode(ascii_bytes: &[u8; 26], mode: Mode) -> Result<u128, Error> {
    let table = table(mode);

    let first = symbol(table, ascii_bytes[0])?;
    let mut n = u128::from(first);

    // The top bits of the first symbol are shifted out here, they are checked below.
    for &byte in &ascii_bytes[1..] {
        n = (n << 5) | u128::from(symbol(table, byte)?);
    }

    if first <= FIRST_SYMBOL_MAX {
        Ok(n)
    } else {
        Err(Error::ValueOverflow)
    }
}

pub fn validate(buffer: &[u8; 26], mode: Mode) -> Result<(), Error> {
    decode(buffer, mode).map(|_| ())
}

pub fn canonicalize(buffer: &mut [u8; 26]) -> Result<&str, Error> {
    for byte in buffer.iter_mut() {
        *byte = ALPHABET[usize::from(symbol(&LENIENT, *byte)?)];
    }

    if symbol(&LENIENT, buffer[0])? > FIRST_SYMBOL_MAX {
        return Err(Error::ValueOverflow);
    }

    // Safety: Above code guarantees valid UTF-8 (it returns early, when not)
    Ok(unsafe { from_utf8_unchecked(buffer) })
}
