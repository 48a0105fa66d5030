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

use satchel_core::num::SolverNumeric;
use satchel_model::{eval::Evaluator, knapsack::Knapsack};

/// A search strategy that produces one new knapsack per call.
///
/// Implementations may keep internal state such as a random number generator
/// or a short-term memory, but the result of a call must depend only on that
/// state and on `current`. Candidates must be obtained through the
/// `evaluator`, which keeps them feasible and counts the evaluations.
///
/// State that tracks the search trajectory, such as a temperature or a tabu
/// list, persists across calls until `reset` is called.
pub trait Heuristic<T>: Send
where
    T: SolverNumeric,
{
    /// Returns the name of the heuristic.
    fn name(&self) -> &str;

    /// Performs one unit of work starting from `current` and returns the resulting knapsack.
    ///
    /// The returned value is independent of `current`.
    fn execute_once(&mut self, evaluator: &Evaluator<T>, current: &Knapsack<T>) -> Knapsack<T>;

    /// Forgets the search trajectory before the heuristic continues from an unrelated knapsack.
    ///
    /// The random number generator keeps its state. Does nothing by default.
    #[inline]
    fn reset(&mut self) {}
}

impl<T> std::fmt::Debug for dyn Heuristic<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Heuristic {{ name: {} }}", self.name())
    }
}

impl<T> std::fmt::Display for dyn Heuristic<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Heuristic: {}", self.name())
    }
}
