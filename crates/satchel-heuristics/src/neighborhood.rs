// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Randomized one-flip neighborhoods.
//!
//! A neighbor of a knapsack differs from it in the inclusion of a single item.
//! Heuristics draw how many neighbors to look at from a `NeighborCount` and the
//! flipped item uniformly from all items.

use rand::Rng;
use satchel_core::num::SolverNumeric;
use satchel_model::{eval::Evaluator, index::ItemIndex, knapsack::Knapsack};

/// A closed range `[min, max]` from which the number of sampled neighbors is drawn.
///
/// The lower bound is at least one, so a sampled neighborhood is never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NeighborCount {
    min: usize,
    max: usize,
}

impl Default for NeighborCount {
    fn default() -> Self {
        Self { min: 10, max: 20 }
    }
}

impl NeighborCount {
    /// Creates a new neighbor count range.
    ///
    /// # Panics
    ///
    /// Panics if `min` is zero or if `min > max`.
    #[inline]
    pub fn new(min: usize, max: usize) -> Self {
        assert!(
            min >= 1,
            "called `NeighborCount::new` with zero minimum: a neighborhood needs at least one candidate"
        );
        assert!(
            min <= max,
            "called `NeighborCount::new` with min > max: {} > {}",
            min,
            max
        );

        Self { min, max }
    }

    /// Creates a range that always yields exactly `count`.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero.
    #[inline]
    pub fn exactly(count: usize) -> Self {
        Self::new(count, count)
    }

    /// Returns the lower bound.
    #[inline]
    pub fn min(&self) -> usize {
        self.min
    }

    /// Returns the upper bound.
    #[inline]
    pub fn max(&self) -> usize {
        self.max
    }

    /// Draws a count uniformly from `[min, max]`.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.random_range(self.min..=self.max)
    }
}

impl std::fmt::Display for NeighborCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Draws a uniformly random item of a model with `num_items` items.
///
/// # Panics
///
/// Panics if `num_items` is zero.
#[inline]
pub fn random_item<R: Rng + ?Sized>(rng: &mut R, num_items: usize) -> ItemIndex {
    assert!(num_items > 0, "called `random_item` with zero items");
    ItemIndex::new(rng.random_range(0..num_items))
}

/// Evaluates a random one-flip neighbor of `current` and returns the flipped item with it.
#[inline]
pub fn random_flip<T, R>(
    rng: &mut R,
    evaluator: &Evaluator<T>,
    current: &Knapsack<T>,
) -> (ItemIndex, Knapsack<T>)
where
    T: SolverNumeric,
    R: Rng + ?Sized,
{
    let item = random_item(rng, current.num_items());
    (item, evaluator.flip(current, item))
}
