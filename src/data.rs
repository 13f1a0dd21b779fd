//! # DataSource: the randomness behind every draw
//!
//! All strategies pull their randomness from a `DataSource`. A source wraps a
//! seeded ChaCha8 generator and hands out bits on request, while keeping
//! track of two limits that keep generation of recursive message graphs
//! finite:
//!
//! - **Draw budget**: every call to [`DataSource::bits`] spends one unit.
//!   Once `max_draws` is exceeded the draw fails with [`DrawError::Overrun`]
//!   and the runner discards the example.
//! - **Nesting depth**: message draws are bracketed by
//!   [`DataSource::start_span`] and [`DataSource::stop_span`]. Past
//!   `max_depth` the source reports [`DataSource::at_depth_limit`], which
//!   collections and optional fields honour by drawing their smallest
//!   shape. Spans opened deeper than twice the limit fail outright.
//!
//! A source is cheap to create and is never shared between examples, so two
//! draws with the same seed produce the same value.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default number of `bits` calls allowed per example.
pub const DEFAULT_MAX_DRAWS: u64 = 8192;

/// Default nesting depth before collections and optional fields collapse.
pub const DEFAULT_MAX_DEPTH: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawError {
    /// The draw budget or the hard nesting limit was exceeded
    Overrun,
    /// A filter rejected every candidate it was offered
    FilterExhausted,
    /// Attempted to choose from an empty set of alternatives
    EmptyChoice,
    /// A deferred strategy was drawn before its target was built
    Unresolved(String),
}

impl std::fmt::Display for DrawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawError::Overrun => write!(f, "Overran the draw budget or nesting limit"),
            DrawError::FilterExhausted => write!(f, "Filter rejected every drawn candidate"),
            DrawError::EmptyChoice => write!(f, "Cannot choose from empty sequence"),
            DrawError::Unresolved(name) => write!(f, "Deferred strategy for {} was never resolved", name),
        }
    }
}

impl std::error::Error for DrawError {}

pub type Draw<T> = Result<T, DrawError>;

#[derive(Debug, Clone)]
pub struct DataSource {
    rng: ChaCha8Rng,
    draws: u64,
    max_draws: u64,
    depth: usize,
    max_depth: usize,
}

impl DataSource {
    pub fn new(seed: u64) -> DataSource {
        DataSource::with_limits(seed, DEFAULT_MAX_DEPTH, DEFAULT_MAX_DRAWS)
    }

    pub fn with_limits(seed: u64, max_depth: usize, max_draws: u64) -> DataSource {
        DataSource {
            rng: ChaCha8Rng::seed_from_u64(seed),
            draws: 0,
            max_draws,
            depth: 0,
            max_depth,
        }
    }

    /// Draw `n_bits` uniformly random bits, `n_bits <= 64`.
    pub fn bits(&mut self, n_bits: u64) -> Draw<u64> {
        debug_assert!(n_bits <= 64);
        self.draws += 1;
        if self.draws > self.max_draws {
            return Err(DrawError::Overrun);
        }
        if n_bits == 0 {
            return Ok(0);
        }
        Ok(self.rng.next_u64() >> (64 - n_bits))
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn at_depth_limit(&self) -> bool {
        self.depth >= self.max_depth
    }

    pub fn start_span(&mut self) -> Draw<()> {
        if self.depth >= self.max_depth.saturating_mul(2) {
            return Err(DrawError::Overrun);
        }
        self.depth += 1;
        Ok(())
    }

    pub fn stop_span(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth = self.depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_bits() {
        let mut a = DataSource::new(7);
        let mut b = DataSource::new(7);
        for n in [1, 8, 17, 64] {
            assert_eq!(a.bits(n).unwrap(), b.bits(n).unwrap());
        }
    }

    #[test]
    fn test_bits_fit_width() {
        let mut source = DataSource::new(3);
        for _ in 0..1000 {
            assert!(source.bits(5).unwrap() < 32);
        }
        assert_eq!(source.bits(0).unwrap(), 0);
    }

    #[test]
    fn test_budget_overrun() {
        let mut source = DataSource::with_limits(0, DEFAULT_MAX_DEPTH, 3);
        assert!(source.bits(8).is_ok());
        assert!(source.bits(8).is_ok());
        assert!(source.bits(8).is_ok());
        assert_eq!(source.bits(8), Err(DrawError::Overrun));
    }

    #[test]
    fn test_span_depth_limits() {
        let mut source = DataSource::with_limits(0, 2, DEFAULT_MAX_DRAWS);
        assert!(!source.at_depth_limit());
        source.start_span().unwrap();
        source.start_span().unwrap();
        assert!(source.at_depth_limit());
        source.start_span().unwrap();
        source.start_span().unwrap();
        assert_eq!(source.start_span(), Err(DrawError::Overrun));
        source.stop_span();
        assert_eq!(source.depth(), 3);
    }
}
