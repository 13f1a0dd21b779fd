// Integer generation functions for the conjecture library.
// Bounded integers are drawn uniformly over their range, with a small
// chance of landing exactly on a boundary (or on zero) so that edge values
// show up far more often than pure uniform sampling would allow.

use crate::data::{DataSource, Draw};
use crate::distributions::bounded_int;

/// Draw an integer in `min_value..=max_value`.
///
/// The range may be as wide as the full `u64` or `i64` domain; wider
/// ranges are rejected by a debug assertion.
pub fn integer_in_range(source: &mut DataSource, min_value: i128, max_value: i128) -> Draw<i128> {
    debug_assert!(min_value <= max_value);
    let span = (max_value - min_value) as u128;
    debug_assert!(span <= u64::MAX as u128);

    // 1 in 32 draws picks an edge value
    if source.bits(5)? == 0 {
        let zero = 0i128.clamp(min_value, max_value);
        let edges = [min_value, max_value, zero];
        return Ok(edges[bounded_int(source, 2)? as usize]);
    }

    let offset = bounded_int(source, span as u64)?;
    Ok(min_value + offset as i128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_u64_range() {
        let mut source = DataSource::new(42);
        for _ in 0..1000 {
            let v = integer_in_range(&mut source, 0, u64::MAX as i128).unwrap();
            assert!(v >= 0 && v <= u64::MAX as i128);
        }
    }

    #[test]
    fn test_full_i64_range() {
        let mut source = DataSource::new(42);
        let mut saw_negative = false;
        for _ in 0..1000 {
            let v = integer_in_range(&mut source, i64::MIN as i128, i64::MAX as i128).unwrap();
            assert!(v >= i64::MIN as i128 && v <= i64::MAX as i128);
            saw_negative |= v < 0;
        }
        assert!(saw_negative);
    }

    #[test]
    fn test_edges_are_reachable() {
        let mut source = DataSource::new(0);
        let draws: Vec<i128> = (0..5000)
            .map(|_| integer_in_range(&mut source, -5, 1_000_000).unwrap())
            .collect();
        assert!(draws.contains(&-5));
        assert!(draws.contains(&1_000_000));
        assert!(draws.contains(&0));
    }

    #[test]
    fn test_single_value_range() {
        let mut source = DataSource::new(0);
        for _ in 0..100 {
            assert_eq!(integer_in_range(&mut source, 17, 17).unwrap(), 17);
        }
    }
}
