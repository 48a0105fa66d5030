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

//! Tabu Search heuristic.
//!
//! Each call samples a number of one-flip moves and moves to the best
//! admissible one, even if it is worse than the current knapsack. A move is
//! admissible unless its item was flipped during the last `tenure` moves.
//!
//! # Mechanisms
//!
//! 1.  **Tabu List:** A FIFO queue of recently flipped items with a fixed
//!     `tenure`. Prevents undoing a move right after making it.
//! 2.  **Aspiration Criterion:** Overrides the tabu status of a move whose
//!     candidate is strictly better than the best score this heuristic has seen.
//!
//! When every sampled move is tabu and none aspires, the input is returned unchanged.
//! `reset` clears the tabu list and the best score seen.

use crate::{
    heuristic::Heuristic,
    neighborhood::{NeighborCount, random_flip},
};
use rand::Rng;
use rustc_hash::FxHashSet;
use satchel_core::num::SolverNumeric;
use satchel_model::{eval::Evaluator, index::ItemIndex, knapsack::Knapsack};
use std::collections::VecDeque;

/// A sampled Tabu Search over one-flip moves with a fixed item tenure.
#[derive(Debug, Clone)]
pub struct TabuSearch<T, R> {
    neighbor_count: NeighborCount,
    tenure: usize,                   // Size of the Tabu memory
    tabu_queue: VecDeque<ItemIndex>, // FIFO for expiring old entries
    tabu_set: FxHashSet<ItemIndex>,  // O(1) lookups
    best_score: Option<T>,           // Best score seen, for aspiration
    rng: R,
}

impl<T, R> TabuSearch<T, R>
where
    T: SolverNumeric,
    R: Rng,
{
    /// Creates a new Tabu Search with the specified memory size (tenure).
    ///
    /// # Panics
    ///
    /// Panics if `tenure` is 0.
    pub fn new(tenure: usize, rng: R) -> Self {
        assert!(tenure > 0, "called `TabuSearch::new()` with zero tenure");
        Self {
            neighbor_count: NeighborCount::default(),
            tenure,
            tabu_queue: VecDeque::with_capacity(tenure),
            tabu_set: FxHashSet::default(),
            best_score: None,
            rng,
        }
    }

    /// Sets the range from which the number of sampled moves per call is drawn.
    #[inline]
    pub fn with_neighbor_count(mut self, neighbor_count: NeighborCount) -> Self {
        self.neighbor_count = neighbor_count;
        self
    }

    /// Returns the tenure.
    #[inline]
    pub fn tenure(&self) -> usize {
        self.tenure
    }

    /// Returns `true` if flipping `item` is currently tabu.
    #[inline]
    pub fn is_tabu(&self, item: ItemIndex) -> bool {
        self.tabu_set.contains(&item)
    }

    /// Records a move in the Tabu list, handling tenure expiration.
    #[inline]
    fn make_tabu(&mut self, item: ItemIndex) {
        if self.tabu_set.contains(&item) {
            return;
        }

        if self.tabu_queue.len() >= self.tenure
            && let Some(oldest) = self.tabu_queue.pop_front()
        {
            self.tabu_set.remove(&oldest);
        }

        self.tabu_set.insert(item);
        self.tabu_queue.push_back(item);
    }

    #[inline]
    fn aspires(&self, candidate: &Knapsack<T>) -> bool {
        self.best_score
            .is_none_or(|best| candidate.score() > best)
    }
}

impl<T, R> Heuristic<T> for TabuSearch<T, R>
where
    T: SolverNumeric,
    R: Rng + Send,
{
    fn name(&self) -> &str {
        "TabuSearch"
    }

    fn execute_once(&mut self, evaluator: &Evaluator<T>, current: &Knapsack<T>) -> Knapsack<T> {
        if current.num_items() == 0 {
            return current.clone();
        }

        if self.best_score.is_none_or(|best| current.score() > best) {
            self.best_score = Some(current.score());
        }

        let moves = self.neighbor_count.sample(&mut self.rng);
        let mut chosen: Option<(ItemIndex, Knapsack<T>)> = None;
        for _ in 0..moves {
            let (item, candidate) = random_flip(&mut self.rng, evaluator, current);
            if self.is_tabu(item) && !self.aspires(&candidate) {
                continue;
            }
            match &chosen {
                Some((_, incumbent)) if candidate.score() <= incumbent.score() => {}
                _ => chosen = Some((item, candidate)),
            }
        }

        match chosen {
            Some((item, candidate)) => {
                self.make_tabu(item);
                if self.aspires(&candidate) {
                    self.best_score = Some(candidate.score());
                }
                candidate
            }
            None => current.clone(),
        }
    }

    fn reset(&mut self) {
        self.tabu_queue.clear();
        self.tabu_set.clear();
        self.best_score = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use satchel_model::model::ModelBuilder;

    fn evaluator(n: usize) -> Evaluator<i64> {
        let mut builder = ModelBuilder::new(n, 100);
        for i in 0..n {
            builder.set_item(ItemIndex::new(i), 1 + i as i64, 1);
        }
        Evaluator::new(builder.build())
    }

    #[test]
    fn test_initialization() {
        let ts: TabuSearch<i64, _> = TabuSearch::new(5, ChaCha8Rng::seed_from_u64(0));
        assert_eq!(Heuristic::<i64>::name(&ts), "TabuSearch");
        assert_eq!(ts.tenure(), 5);
        assert!(ts.tabu_queue.is_empty());
        assert!(ts.tabu_set.is_empty());
        assert!(ts.best_score.is_none());
    }

    #[test]
    #[should_panic(expected = "called `TabuSearch::new()` with zero tenure")]
    fn test_zero_tenure_panics() {
        let _ts: TabuSearch<i64, _> = TabuSearch::new(0, ChaCha8Rng::seed_from_u64(0));
    }

    #[test]
    fn test_tenure_expiration() {
        let mut ts: TabuSearch<i64, _> = TabuSearch::new(2, ChaCha8Rng::seed_from_u64(0));
        ts.make_tabu(ItemIndex::new(0));
        ts.make_tabu(ItemIndex::new(1));
        ts.make_tabu(ItemIndex::new(1));
        assert!(ts.is_tabu(ItemIndex::new(0)));
        assert_eq!(ts.tabu_queue.len(), 2);

        ts.make_tabu(ItemIndex::new(2));
        assert!(!ts.is_tabu(ItemIndex::new(0)));
        assert!(ts.is_tabu(ItemIndex::new(1)));
        assert!(ts.is_tabu(ItemIndex::new(2)));
    }

    #[test]
    fn test_moved_item_becomes_tabu() {
        let evaluator = evaluator(6);
        let mut ts = TabuSearch::new(3, ChaCha8Rng::seed_from_u64(4));
        let start = Knapsack::empty(6);
        let next = ts.execute_once(&evaluator, &start);

        assert_eq!(next.num_selected(), 1);
        let moved = next.selected_items().next().unwrap();
        assert!(ts.is_tabu(moved));
        assert_eq!(ts.best_score, Some(next.score()));
    }

    #[test]
    fn test_all_moves_tabu_returns_input() {
        let evaluator = evaluator(1);
        let mut ts = TabuSearch::new(1, ChaCha8Rng::seed_from_u64(8))
            .with_neighbor_count(NeighborCount::exactly(3));
        let start = Knapsack::empty(1);

        // Selects the only item.
        let full = ts.execute_once(&evaluator, &start);
        assert_eq!(full.score(), 1);

        // Removing it is tabu and cannot aspire, so nothing moves.
        let again = ts.execute_once(&evaluator, &full);
        assert_eq!(again, full);
    }

    #[test]
    fn test_aspiration_overrides_tabu() {
        let evaluator = evaluator(1);
        let mut ts = TabuSearch::new(1, ChaCha8Rng::seed_from_u64(8))
            .with_neighbor_count(NeighborCount::exactly(1));
        ts.make_tabu(ItemIndex::new(0));

        // Adding the item beats every score seen so far.
        let next = ts.execute_once(&evaluator, &Knapsack::empty(1));
        assert_eq!(next.score(), 1);
    }

    #[test]
    fn test_reset_forgets_memory() {
        let evaluator = evaluator(1);
        let mut ts = TabuSearch::new(1, ChaCha8Rng::seed_from_u64(8))
            .with_neighbor_count(NeighborCount::exactly(3));
        let full = ts.execute_once(&evaluator, &Knapsack::empty(1));
        assert!(ts.is_tabu(ItemIndex::new(0)));

        ts.reset();
        assert!(ts.tabu_queue.is_empty());
        assert!(!ts.is_tabu(ItemIndex::new(0)));
        assert!(ts.best_score.is_none());

        // Removing the item is admissible again.
        let next = ts.execute_once(&evaluator, &full);
        assert_eq!(next.score(), 0);
    }

    #[test]
    fn test_stays_feasible() {
        let mut builder = ModelBuilder::<i64>::new(8, 9);
        for i in 0..8 {
            builder.set_item(ItemIndex::new(i), (i as i64 * 7) % 5 + 1, (i as i64 % 3) + 2);
        }
        let evaluator = Evaluator::new(builder.build());
        let mut ts = TabuSearch::new(3, ChaCha8Rng::seed_from_u64(21));
        let mut current = Knapsack::empty(8);
        for _ in 0..50 {
            current = ts.execute_once(&evaluator, &current);
            assert!(current.is_feasible(evaluator.model()));
        }
    }
}
