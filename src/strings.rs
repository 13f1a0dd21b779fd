// String and bytes generation functions for the conjecture library.
// Lengths are controlled by a `Repeat`, so text and binary share the
// collection length policy of lists. Characters are any Unicode scalar
// value, with a bias towards printable ASCII.

use crate::data::{DataSource, Draw};
use crate::distributions::{bounded_int, weighted, Repeat};

const FIRST_SURROGATE: u64 = 0xD800;
const SURROGATE_COUNT: u64 = 0x800;
const MAX_CODEPOINT: u64 = 0x10FFFF;

pub fn draw_char(source: &mut DataSource) -> Draw<char> {
    if weighted(source, 0.5)? {
        let c = 0x20 + bounded_int(source, 0x7E - 0x20)?;
        return Ok(char::from(c as u8));
    }
    // Draw from the code point space with the surrogate block cut out
    let mut c = bounded_int(source, MAX_CODEPOINT - SURROGATE_COUNT)?;
    if c >= FIRST_SURROGATE {
        c += SURROGATE_COUNT;
    }
    Ok(char::from_u32(c as u32).unwrap_or(char::REPLACEMENT_CHARACTER))
}

pub fn draw_text(source: &mut DataSource, mut repeat: Repeat) -> Draw<String> {
    let mut result = String::new();
    while repeat.should_continue(source)? {
        result.push(draw_char(source)?);
    }
    Ok(result)
}

pub fn draw_bytes(source: &mut DataSource, mut repeat: Repeat) -> Draw<Vec<u8>> {
    let mut result = Vec::new();
    while repeat.should_continue(source)? {
        result.push(source.bits(8)? as u8);
    }
    Ok(result)
}
