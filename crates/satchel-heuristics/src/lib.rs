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

//! Pluggable knapsack heuristics.
//!
//! A heuristic is a single capability: given the current knapsack, perform one
//! unit of work and hand back one new candidate. Everything else (how many
//! times it is applied, whose solution it works on, when the search stops) is
//! decided by the caller. Every variant here scores candidates through the
//! shared `Evaluator`, so the evaluation counter reflects the work done and
//! every returned knapsack is feasible.
//!
//! Provided heuristics:
//! - `greedy`: deterministic ratio-ordered construction, used to seed a run.
//! - `local_search`: best of a randomized number of one-flip neighbors.
//! - `simulated_annealing`: one-flip moves with Metropolis acceptance and pluggable cooling.
//! - `tabu_search`: best admissible sampled move under a short-term item memory.
//!
//! The `registry` module enumerates the variants by name so that a coordinator
//! can instantiate one of each without knowing the concrete types.

pub mod greedy;
pub mod heuristic;
pub mod local_search;
pub mod neighborhood;
pub mod registry;
pub mod simulated_annealing;
pub mod tabu_search;
