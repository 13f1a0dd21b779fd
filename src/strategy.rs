//! # Strategies: reusable descriptions of how to draw a value
//!
//! A [`Strategy<T>`] is an immutable, cheaply clonable handle around a draw
//! function. It holds no mutable state of its own: every bit of randomness
//! comes from the [`DataSource`] passed to [`Strategy::draw`], so one strategy
//! can be drawn from any number of times, from any number of threads.
//!
//! The combinators here are the primitives the schema compiler builds
//! message strategies from:
//!
//! | Combinator | Draws |
//! | --- | --- |
//! | [`just`] | always the same value |
//! | [`integers`] | an integer in an inclusive range |
//! | [`booleans`] | `true` or `false` |
//! | [`floats32`], [`floats64`] | any float, NaN and infinities included |
//! | [`text`], [`binary`] | Unicode strings, byte strings |
//! | [`sampled_from`] | one of a fixed set of values |
//! | [`one_of`] | a value from one of several strategies |
//! | [`lists`], [`dictionaries`] | collections with a bounded length |
//! | [`absent_or`] | `None` or a value |
//! | [`deferred`] | whatever a strategy filled in later draws |

use crate::data::{DataSource, Draw, DrawError};
use crate::distributions::{bounded_int, weighted, Repeat};
use crate::{floats, ints, strings};

use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// How many candidates `filter` tries before giving up on a draw.
pub const MAX_FILTER_ATTEMPTS: usize = 3;

type DrawFn<T> = dyn Fn(&mut DataSource) -> Draw<T> + Send + Sync;

pub struct Strategy<T> {
    draw: Arc<DrawFn<T>>,
}

impl<T> Clone for Strategy<T> {
    fn clone(&self) -> Self {
        Strategy {
            draw: Arc::clone(&self.draw),
        }
    }
}

impl<T> fmt::Debug for Strategy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Strategy<{}>", std::any::type_name::<T>())
    }
}

impl<T: 'static> Strategy<T> {
    pub fn new<F>(draw: F) -> Strategy<T>
    where
        F: Fn(&mut DataSource) -> Draw<T> + Send + Sync + 'static,
    {
        Strategy { draw: Arc::new(draw) }
    }

    pub fn draw(&self, source: &mut DataSource) -> Draw<T> {
        (self.draw)(source)
    }

    /// Draw a single value from a fresh source seeded with `seed`.
    pub fn example(&self, seed: u64) -> Draw<T> {
        self.draw(&mut DataSource::new(seed))
    }

    pub fn map<U, F>(&self, f: F) -> Strategy<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let inner = self.clone();
        Strategy::new(move |source| inner.draw(source).map(&f))
    }

    pub fn filter<F>(&self, predicate: F) -> Strategy<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let inner = self.clone();
        Strategy::new(move |source| {
            for _ in 0..MAX_FILTER_ATTEMPTS {
                let candidate = inner.draw(source)?;
                if predicate(&candidate) {
                    return Ok(candidate);
                }
            }
            Err(DrawError::FilterExhausted)
        })
    }
}

/// Length policy for collections, text and byte strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRange {
    pub min_size: u64,
    pub max_size: u64,
    pub average_size: f64,
}

impl SizeRange {
    pub fn new(min_size: u64, max_size: u64, average_size: f64) -> SizeRange {
        assert!(min_size <= max_size);
        SizeRange {
            min_size,
            max_size,
            average_size,
        }
    }

    fn repeat(&self) -> Repeat {
        let expected = self.average_size - self.min_size as f64;
        Repeat::new(self.min_size, self.max_size, expected.max(0.0))
    }
}

impl Default for SizeRange {
    fn default() -> Self {
        SizeRange::new(0, 8, 2.0)
    }
}

pub fn just<T>(value: T) -> Strategy<T>
where
    T: Clone + Send + Sync + 'static,
{
    Strategy::new(move |_| Ok(value.clone()))
}

pub fn integers(min_value: i128, max_value: i128) -> Strategy<i128> {
    assert!(min_value <= max_value, "integers({}, {}) is empty", min_value, max_value);
    Strategy::new(move |source| ints::integer_in_range(source, min_value, max_value))
}

pub fn booleans() -> Strategy<bool> {
    Strategy::new(|source| weighted(source, 0.5))
}

pub fn floats64() -> Strategy<f64> {
    Strategy::new(floats::draw_f64)
}

pub fn floats32() -> Strategy<f32> {
    Strategy::new(floats::draw_f32)
}

pub fn text(sizes: SizeRange) -> Strategy<String> {
    Strategy::new(move |source| strings::draw_text(source, sizes.repeat()))
}

pub fn binary(sizes: SizeRange) -> Strategy<Vec<u8>> {
    Strategy::new(move |source| strings::draw_bytes(source, sizes.repeat()))
}

pub fn sampled_from<T>(values: Vec<T>) -> Strategy<T>
where
    T: Clone + Send + Sync + 'static,
{
    Strategy::new(move |source| {
        if values.is_empty() {
            return Err(DrawError::EmptyChoice);
        }
        let i = bounded_int(source, values.len() as u64 - 1)?;
        Ok(values[i as usize].clone())
    })
}

/// Uniform choice among `options`, then a draw from the chosen one.
pub fn one_of<T: 'static>(options: Vec<Strategy<T>>) -> Strategy<T> {
    Strategy::new(move |source| {
        if options.is_empty() {
            return Err(DrawError::EmptyChoice);
        }
        let i = bounded_int(source, options.len() as u64 - 1)?;
        options[i as usize].draw(source)
    })
}

pub fn lists<T: 'static>(element: Strategy<T>, sizes: SizeRange) -> Strategy<Vec<T>> {
    Strategy::new(move |source| {
        let mut repeat = sizes.repeat();
        let mut result = Vec::new();
        while repeat.should_continue(source)? {
            result.push(element.draw(source)?);
        }
        Ok(result)
    })
}

/// Key/value pairs with pairwise distinct keys.
///
/// A drawn key that is already present is rejected and does not count
/// towards the length. Small key spaces end the collection early rather
/// than retrying forever.
pub fn dictionaries<K, V>(keys: Strategy<K>, values: Strategy<V>, sizes: SizeRange) -> Strategy<Vec<(K, V)>>
where
    K: PartialEq + 'static,
    V: 'static,
{
    Strategy::new(move |source| {
        let mut repeat = sizes.repeat();
        let mut result: Vec<(K, V)> = Vec::new();
        let mut rejections = 0;
        while repeat.should_continue(source)? {
            let key = keys.draw(source)?;
            if result.iter().any(|(k, _)| *k == key) {
                repeat.reject();
                rejections += 1;
                if rejections > sizes.max_size {
                    break;
                }
                continue;
            }
            let value = values.draw(source)?;
            result.push((key, value));
        }
        Ok(result)
    })
}

/// `Some` with probability `p_present`, `None` otherwise. Always `None`
/// once the source has reached its depth limit.
pub fn absent_or<T: 'static>(inner: Strategy<T>, p_present: f64) -> Strategy<Option<T>> {
    Strategy::new(move |source| {
        if source.at_depth_limit() || !weighted(source, p_present)? {
            return Ok(None);
        }
        inner.draw(source).map(Some)
    })
}

/// A strategy that draws from whatever is stored in `cell` at draw time.
///
/// This is how a strategy can refer to one that is still being built.
pub fn deferred<T: 'static>(name: impl Into<String>, cell: Arc<OnceCell<Strategy<T>>>) -> Strategy<T> {
    let name = name.into();
    Strategy::new(move |source| match cell.get() {
        Some(target) => target.draw(source),
        None => Err(DrawError::Unresolved(name.clone())),
    })
}
