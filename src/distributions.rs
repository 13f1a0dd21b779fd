// General distribution functions and utilities.
// This module contains probability distributions and repetition
// control that are used across different data types.

use crate::data::{DataSource, Draw};

use std::u64::MAX as MAX64;

pub fn weighted(source: &mut DataSource, probability: f64) -> Draw<bool> {
    let truthy = (probability * (u64::max_value() as f64 + 1.0)).floor() as u64;
    let probe = source.bits(64)?;
    Ok(match (truthy, probe) {
        (0, _) => false,
        (MAX64, _) => true,
        (_, 0) => false,
        (_, 1) => true,
        _ => probe >= MAX64 - truthy,
    })
}

/// Uniform integer in `0..=max`, by rejection on the smallest covering bit width.
pub fn bounded_int(source: &mut DataSource, max: u64) -> Draw<u64> {
    let bitlength = 64 - max.leading_zeros() as u64;
    if bitlength == 0 {
        return Ok(0);
    }
    loop {
        let probe = source.bits(bitlength)?;
        if probe <= max {
            return Ok(probe);
        }
    }
}

#[derive(Debug, Clone)]
pub struct Repeat {
    min_count: u64,
    max_count: u64,
    p_continue: f64,

    current_count: u64,
}

impl Repeat {
    pub fn new(min_count: u64, max_count: u64, expected_count: f64) -> Repeat {
        Repeat {
            min_count,
            max_count,
            p_continue: 1.0 - 1.0 / (1.0 + expected_count),
            current_count: 0,
        }
    }

    pub fn count(&self) -> u64 {
        self.current_count
    }

    pub fn reject(&mut self) {
        assert!(self.current_count > 0);
        self.current_count -= 1;
    }

    pub fn should_continue(&mut self, source: &mut DataSource) -> Draw<bool> {
        if self.current_count < self.min_count {
            self.current_count += 1;
            return Ok(true);
        } else if self.current_count >= self.max_count || source.at_depth_limit() {
            return Ok(false);
        }

        let result = weighted(source, self.p_continue)?;
        if result {
            self.current_count += 1;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_extremes() {
        let mut source = DataSource::new(11);
        for _ in 0..100 {
            assert!(!weighted(&mut source, 0.0).unwrap());
            assert!(weighted(&mut source, 1.0).unwrap());
        }
    }

    #[test]
    fn test_weighted_is_roughly_fair() {
        let mut source = DataSource::new(5);
        let trues = (0..2000).filter(|_| weighted(&mut source, 0.5).unwrap()).count();
        assert!(trues > 800 && trues < 1200, "got {} trues", trues);
    }

    #[test]
    fn test_bounded_int_stays_in_bounds() {
        let mut source = DataSource::new(1);
        for max in [0u64, 1, 2, 7, 1000, u64::MAX] {
            for _ in 0..200 {
                assert!(bounded_int(&mut source, max).unwrap() <= max);
            }
        }
    }

    #[test]
    fn test_repeat_min_max_constraints() {
        let mut source = DataSource::new(9);

        let test_cases = vec![(0, 0, 1.0), (1, 1, 5.0), (3, 3, 10.0), (2, 8, 3.0)];

        for (min_count, max_count, expected) in test_cases {
            for _ in 0..50 {
                let mut repeat = Repeat::new(min_count, max_count, expected);
                let mut count = 0;
                while repeat.should_continue(&mut source).unwrap() {
                    count += 1;
                }
                assert!(count >= min_count, "count {} below {}", count, min_count);
                assert!(count <= max_count, "count {} above {}", count, max_count);
            }
        }
    }

    #[test]
    fn test_repeat_collapses_at_depth_limit() {
        let mut source = DataSource::with_limits(0, 1, crate::data::DEFAULT_MAX_DRAWS);
        source.start_span().unwrap();
        let mut repeat = Repeat::new(1, 10, 100.0);
        assert!(repeat.should_continue(&mut source).unwrap());
        assert!(!repeat.should_continue(&mut source).unwrap());
        assert_eq!(repeat.count(), 1);
    }
}
