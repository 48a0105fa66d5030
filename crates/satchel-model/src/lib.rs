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

//! # Satchel Model
//!
//! **The domain layer of the satchel knapsack solver.**
//!
//! This crate defines the 0/1 knapsack instance, the solution value that the
//! heuristics pass around, and the counted fitness layer that builds those
//! values. It is the boundary every search component talks through.
//!
//! ## Architecture
//!
//! * **`index`**: Strongly typed `ItemIndex` to keep item positions apart from other `usize`s.
//! * **`model`**: The immutable `Model` (capacity, values, weights, ratio order) and its `ModelBuilder`.
//! * **`knapsack`**: The `Knapsack` solution value with its score and relative gap.
//! * **`eval`**: The `Evaluator` that repairs, scores and counts, plus the shared `EvaluationCounter`.
//! * **`loading`**: A text instance loader with descriptive errors.
//!
//! ## Design Philosophy
//!
//! 1.  **Value Semantics**: A `Knapsack` is never mutated once built. Neighbors are new values,
//!     so every stored solution is an independent copy by construction.
//! 2.  **Feasible by Construction**: Only the `Evaluator` builds non-empty knapsacks, and it
//!     repairs overweight selections before scoring them.
//! 3.  **Counted Fitness**: Every evaluation bumps a shared atomic counter that search
//!     components read as a logical clock.

pub mod eval;
pub mod index;
pub mod knapsack;
pub mod loading;
pub mod model;
