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

use crate::{
    heuristic::Heuristic,
    neighborhood::{NeighborCount, random_flip},
};
use rand::Rng;
use satchel_core::num::SolverNumeric;
use satchel_model::{eval::Evaluator, knapsack::Knapsack};

/// A sampled best-neighbor local search.
///
/// Each call draws a neighbor count `n` from its `NeighborCount`, generates `n`
/// random one-flip neighbors of the current knapsack, and returns the one with
/// the highest score. Among equal scores the first generated candidate wins, so
/// a seeded generator reproduces the same choice. The returned neighbor may be
/// worse than the input.
#[derive(Debug, Clone)]
pub struct LocalSearch<R> {
    neighbor_count: NeighborCount,
    rng: R,
}

impl<R> LocalSearch<R>
where
    R: Rng,
{
    /// Creates a new local search with the default neighbor count.
    #[inline]
    pub fn new(rng: R) -> Self {
        Self {
            neighbor_count: NeighborCount::default(),
            rng,
        }
    }

    /// Sets the range from which the number of neighbors per call is drawn.
    #[inline]
    pub fn with_neighbor_count(mut self, neighbor_count: NeighborCount) -> Self {
        self.neighbor_count = neighbor_count;
        self
    }

    /// Returns the neighbor count range.
    #[inline]
    pub fn neighbor_count(&self) -> NeighborCount {
        self.neighbor_count
    }
}

impl<T, R> Heuristic<T> for LocalSearch<R>
where
    T: SolverNumeric,
    R: Rng + Send,
{
    fn name(&self) -> &str {
        "LocalSearch"
    }

    fn execute_once(&mut self, evaluator: &Evaluator<T>, current: &Knapsack<T>) -> Knapsack<T> {
        if current.num_items() == 0 {
            return current.clone();
        }

        let neighbors = self.neighbor_count.sample(&mut self.rng);
        let mut best: Option<Knapsack<T>> = None;
        for _ in 0..neighbors {
            let (_, candidate) = random_flip(&mut self.rng, evaluator, current);
            match &best {
                Some(incumbent) if candidate.score() <= incumbent.score() => {}
                _ => best = Some(candidate),
            }
        }

        // `neighbors >= 1`, so `best` is always set here.
        best.unwrap_or_else(|| current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighborhood::random_item;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use satchel_model::{index::ItemIndex, model::ModelBuilder};

    fn evaluator(items: &[(i64, i64)], capacity: i64) -> Evaluator<i64> {
        let mut builder = ModelBuilder::new(items.len(), capacity);
        for (i, &(value, weight)) in items.iter().enumerate() {
            builder.set_item(ItemIndex::new(i), value, weight);
        }
        Evaluator::new(builder.build())
    }

    #[test]
    fn test_returns_best_sampled_neighbor() {
        let evaluator = evaluator(&[(1, 1), (7, 1), (3, 1), (5, 1), (2, 1)], 10);
        let count = NeighborCount::new(3, 6);
        let start = Knapsack::empty(5);
        let mut search = LocalSearch::new(ChaCha8Rng::seed_from_u64(11)).with_neighbor_count(count);

        let result = search.execute_once(&evaluator, &start);

        let mut replay = ChaCha8Rng::seed_from_u64(11);
        let n = count.sample(&mut replay);
        let expected = (0..n)
            .map(|_| evaluator.model().item_value(random_item(&mut replay, 5)))
            .max()
            .unwrap();

        assert_eq!(result.score(), expected);
        assert_eq!(result.num_selected(), 1);
        assert_eq!(evaluator.evaluations(), n as u64);
    }

    #[test]
    fn test_first_candidate_wins_ties() {
        let evaluator = evaluator(&[(5, 1), (5, 1), (5, 1), (5, 1)], 10);
        let count = NeighborCount::new(2, 4);
        let start = Knapsack::empty(4);
        let mut search = LocalSearch::new(ChaCha8Rng::seed_from_u64(99)).with_neighbor_count(count);

        let result = search.execute_once(&evaluator, &start);

        let mut replay = ChaCha8Rng::seed_from_u64(99);
        let _ = count.sample(&mut replay);
        let first = random_item(&mut replay, 4);
        assert!(result.contains(first));
        assert_eq!(result.num_selected(), 1);
    }

    #[test]
    fn test_may_return_worse_neighbor() {
        // Every flip from the full selection removes an item.
        let evaluator = evaluator(&[(4, 1), (4, 1)], 10);
        let mut full = fixedbitset::FixedBitSet::with_capacity(2);
        full.insert_range(..);
        let start = evaluator.evaluate(full);
        let mut search =
            LocalSearch::new(ChaCha8Rng::seed_from_u64(0)).with_neighbor_count(NeighborCount::exactly(1));

        let result = search.execute_once(&evaluator, &start);
        assert_eq!(result.score(), 4);
        assert_eq!(start.score(), 8);
    }

    #[test]
    fn test_same_seed_same_result() {
        let evaluator = evaluator(&[(1, 2), (7, 3), (3, 1), (5, 4), (2, 2), (9, 6)], 8);
        let mut a = LocalSearch::new(ChaCha8Rng::seed_from_u64(5));
        let mut b = LocalSearch::new(ChaCha8Rng::seed_from_u64(5));
        let mut ka = Knapsack::empty(6);
        let mut kb = Knapsack::empty(6);
        for _ in 0..20 {
            ka = a.execute_once(&evaluator, &ka);
            kb = b.execute_once(&evaluator, &kb);
            assert_eq!(ka, kb);
            assert!(ka.is_feasible(evaluator.model()));
        }
    }

    #[test]
    fn test_empty_model_returns_input() {
        let evaluator = evaluator(&[], 3);
        let mut search = LocalSearch::new(ChaCha8Rng::seed_from_u64(1));
        let start = Knapsack::empty(0);
        assert_eq!(search.execute_once(&evaluator, &start), start);
        assert_eq!(evaluator.evaluations(), 0);
    }
}
