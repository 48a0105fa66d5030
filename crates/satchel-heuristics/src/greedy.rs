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

use crate::heuristic::Heuristic;
use satchel_core::num::SolverNumeric;
use satchel_model::{eval::Evaluator, knapsack::Knapsack};

/// A constructive heuristic that fills the knapsack by value/weight ratio.
///
/// Starting from the current selection, items are visited in descending ratio
/// order and added whenever they still fit. The result is deterministic and
/// never drops an item that was already selected, so applying the heuristic to
/// its own output is a no-op apart from the evaluation it costs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Greedy;

impl Greedy {
    /// Creates a new greedy heuristic.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> Heuristic<T> for Greedy
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "Greedy"
    }

    fn execute_once(&mut self, evaluator: &Evaluator<T>, current: &Knapsack<T>) -> Knapsack<T> {
        let model = evaluator.model();
        let capacity = model.capacity();

        let mut selection = current.selection().clone();
        let mut weight = current.weight();
        for &item in model.items_by_ratio() {
            if selection.contains(item.get()) {
                continue;
            }
            let item_weight = model.item_weight(item);
            if let Some(next) = weight.checked_add(&item_weight)
                && next <= capacity
            {
                selection.insert(item.get());
                weight = next;
            }
        }

        evaluator.evaluate(selection)
    }
}
