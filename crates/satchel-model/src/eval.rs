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

//! Fitness evaluation and the shared evaluation counter.
//!
//! Every score a heuristic looks at is produced by an `Evaluator`, and
//! every production increments the `EvaluationCounter` exactly once. The
//! counter is the logical clock of a run: agents stamp their solutions
//! with its value to measure search effort independently of wall time.

use crate::{index::ItemIndex, knapsack::Knapsack, model::Model};
use fixedbitset::FixedBitSet;
use satchel_core::num::SolverNumeric;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// A shared, monotonically non-decreasing count of fitness evaluations.
///
/// Cloning the counter yields another handle onto the same count.
#[derive(Clone, Debug, Default)]
pub struct EvaluationCounter {
    count: Arc<AtomicU64>,
}

impl EvaluationCounter {
    /// Creates a new counter starting at zero.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of evaluations performed so far.
    #[inline]
    pub fn current_count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn increment(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}

impl std::fmt::Display for EvaluationCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EvaluationCounter({})", self.current_count())
    }
}

/// The fitness layer of a knapsack instance.
///
/// The evaluator turns raw selections into feasible `Knapsack` values. A
/// selection that exceeds the capacity is repaired by dropping selected items
/// in ascending value/weight order until it fits.
#[derive(Clone)]
pub struct Evaluator<T>
where
    T: SolverNumeric,
{
    model: Arc<Model<T>>,
    counter: EvaluationCounter,
}

impl<T> Evaluator<T>
where
    T: SolverNumeric,
{
    /// Creates a new evaluator with a fresh counter.
    #[inline]
    pub fn new(model: Model<T>) -> Self {
        Self::from_shared(Arc::new(model), EvaluationCounter::new())
    }

    /// Creates a new evaluator over a shared model and counter.
    #[inline]
    pub fn from_shared(model: Arc<Model<T>>, counter: EvaluationCounter) -> Self {
        Self { model, counter }
    }

    /// Returns the model this evaluator scores against.
    #[inline]
    pub fn model(&self) -> &Model<T> {
        &self.model
    }

    /// Returns a shared handle to the model.
    #[inline]
    pub fn shared_model(&self) -> Arc<Model<T>> {
        Arc::clone(&self.model)
    }

    /// Returns the evaluation counter.
    #[inline]
    pub fn counter(&self) -> &EvaluationCounter {
        &self.counter
    }

    /// Returns the number of evaluations performed so far.
    #[inline]
    pub fn evaluations(&self) -> u64 {
        self.counter.current_count()
    }

    /// Evaluates a selection, repairing it if it exceeds the capacity.
    ///
    /// Counts as one evaluation.
    ///
    /// # Panics
    ///
    /// Panics if `selection` does not range over exactly the items of the model.
    pub fn evaluate(&self, mut selection: FixedBitSet) -> Knapsack<T> {
        assert_eq!(
            selection.len(),
            self.model.num_items(),
            "called `Evaluator::evaluate` with a selection of {} items for a model of {} items",
            selection.len(),
            self.model.num_items()
        );

        // Bounded by the model totals, which fit into `T`.
        let (mut value, mut weight) = selection.ones().fold((T::zero(), T::zero()), |(v, w), i| {
            let item = ItemIndex::new(i);
            (v + self.model.item_value(item), w + self.model.item_weight(item))
        });

        if weight > self.model.capacity() {
            self.repair(&mut selection, &mut value, &mut weight);
        }

        self.counter.increment();
        Knapsack::from_parts(selection, value, weight)
    }

    /// Evaluates the neighbor of `knapsack` obtained by flipping the inclusion of `item_index`.
    ///
    /// Counts as one evaluation. `knapsack` itself is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `item_index` is out of bounds.
    pub fn flip(&self, knapsack: &Knapsack<T>, item_index: ItemIndex) -> Knapsack<T> {
        let index = item_index.get();
        assert!(
            index < self.model.num_items(),
            "called `Evaluator::flip` with item index out of bounds: the len is {} but the index is {}",
            self.model.num_items(),
            index
        );
        debug_assert!(knapsack.is_feasible(&self.model));

        let mut selection = knapsack.selection().clone();
        let item_value = self.model.item_value(item_index);
        let item_weight = self.model.item_weight(item_index);

        let (mut value, mut weight) = if selection.contains(index) {
            selection.set(index, false);
            (knapsack.score() - item_value, knapsack.weight() - item_weight)
        } else {
            selection.insert(index);
            (knapsack.score() + item_value, knapsack.weight() + item_weight)
        };

        if weight > self.model.capacity() {
            self.repair(&mut selection, &mut value, &mut weight);
        }

        self.counter.increment();
        Knapsack::from_parts(selection, value, weight)
    }

    fn repair(&self, selection: &mut FixedBitSet, value: &mut T, weight: &mut T) {
        let capacity = self.model.capacity();
        for &item in self.model.items_by_ratio().iter().rev() {
            if *weight <= capacity {
                break;
            }
            if selection.contains(item.get()) {
                selection.set(item.get(), false);
                *value = *value - self.model.item_value(item);
                *weight = *weight - self.model.item_weight(item);
            }
        }
        debug_assert!(*weight <= capacity);
    }
}

impl<T> std::fmt::Debug for Evaluator<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("model", &self.model)
            .field("evaluations", &self.evaluations())
            .finish()
    }
}

impl<T> std::fmt::Display for Evaluator<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Evaluator({}, evaluations: {})",
            self.model,
            self.evaluations()
        )
    }
}
