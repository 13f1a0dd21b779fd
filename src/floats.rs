// Float generation for the conjecture library.
// Floats are drawn over the whole IEEE 754 bit space of the requested
// width, so NaN, infinities, subnormals and signed zeros are all reachable.
// A small fraction of draws short-circuits to a table of special values.

use crate::data::{DataSource, Draw};
use crate::distributions::bounded_int;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    Width32,
    Width64,
}

impl FloatWidth {
    pub fn bits(self) -> u32 {
        match self {
            FloatWidth::Width32 => 32,
            FloatWidth::Width64 => 64,
        }
    }
}

const SPECIAL_FLOATS_64: &[f64] = &[
    0.0,
    -0.0,
    1.0,
    -1.0,
    f64::INFINITY,
    f64::NEG_INFINITY,
    f64::NAN,
    f64::MIN,
    f64::MAX,
    f64::MIN_POSITIVE,
    f64::EPSILON,
];

const SPECIAL_FLOATS_32: &[f32] = &[
    0.0,
    -0.0,
    1.0,
    -1.0,
    f32::INFINITY,
    f32::NEG_INFINITY,
    f32::NAN,
    f32::MIN,
    f32::MAX,
    f32::MIN_POSITIVE,
    f32::EPSILON,
];

fn special(source: &mut DataSource) -> Draw<Option<usize>> {
    // 1 in 64 draws returns a special value
    if source.bits(6)? == 0 {
        let index = bounded_int(source, SPECIAL_FLOATS_64.len() as u64 - 1)?;
        return Ok(Some(index as usize));
    }
    Ok(None)
}

pub fn draw_f64(source: &mut DataSource) -> Draw<f64> {
    if let Some(index) = special(source)? {
        return Ok(SPECIAL_FLOATS_64[index]);
    }
    let raw_bits = source.bits(FloatWidth::Width64.bits() as u64)?;
    Ok(f64::from_bits(raw_bits))
}

pub fn draw_f32(source: &mut DataSource) -> Draw<f32> {
    if let Some(index) = special(source)? {
        return Ok(SPECIAL_FLOATS_32[index]);
    }
    let raw_bits = source.bits(FloatWidth::Width32.bits() as u64)?;
    Ok(f32::from_bits(raw_bits as u32))
}
