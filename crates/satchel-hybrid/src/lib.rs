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

//! # Satchel Hybrid
//!
//! Round-based hybridization of knapsack heuristics. A coordinator wraps every
//! registered heuristic in an agent, steps the agents in rounds, tracks the
//! best knapsack across them, and resets agents that fall too far behind.
//!
//! ## Modules
//!
//! - `agent`: one heuristic with its current and previous knapsack, logical
//!   timestamps and improvement ratio.
//! - `config`: tuning knobs, execution mode and their validation.
//! - `coordinator`: the orchestration loop, its builder and error type.
//!
//! ## Example
//!
//! ```
//! use satchel_hybrid::coordinator::CoordinatorBuilder;
//! use satchel_model::{index::ItemIndex, model::ModelBuilder};
//!
//! let mut builder = ModelBuilder::<i64>::new(3, 5);
//! builder.set_item(ItemIndex::new(0), 6, 2);
//! builder.set_item(ItemIndex::new(1), 5, 3);
//! builder.set_item(ItemIndex::new(2), 4, 4);
//!
//! let mut coordinator = CoordinatorBuilder::new(builder.build())
//!     .with_iteration_range(5, 10)
//!     .with_max_rounds_without_improvement(10)
//!     .build()
//!     .unwrap();
//! let outcome = coordinator.solve();
//! assert_eq!(outcome.score(), 11);
//! ```

pub mod agent;
pub mod config;
pub mod coordinator;
