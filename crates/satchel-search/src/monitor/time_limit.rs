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

//! # Time Limit Monitor
//!
//! Enforces a wall-clock time budget on the hybrid search. The clock is read
//! when `search_command` is consulted at a round boundary, filtered by a
//! bitmask over the number of observed rounds: `(rounds & clock_check_mask) == 0`
//! triggers a check. The default mask of `0` checks at every round boundary,
//! since a round is long compared to reading the clock.
//!
//! The budget is measured from `on_enter_search`. A round that is already in
//! progress is never interrupted, so a run may overshoot the budget by up to
//! one round.

use crate::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    report::RoundReport,
    stats::HybridStatistics,
};
use satchel_core::num::SolverNumeric;
use satchel_model::{knapsack::Knapsack, model::Model};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimitMonitor<T> {
    clock_check_mask: u64,
    rounds: u64,
    time_limit: std::time::Duration,
    start_time: std::time::Instant,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> TimeLimitMonitor<T> {
    const DEFAULT_ROUND_CLOCK_CHECK_MASK: u64 = 0;

    #[inline]
    pub fn new(time_limit: std::time::Duration) -> Self {
        Self::with_clock_check_mask(time_limit, Self::DEFAULT_ROUND_CLOCK_CHECK_MASK)
    }

    #[inline]
    pub fn with_clock_check_mask(time_limit: std::time::Duration, clock_check_mask: u64) -> Self {
        Self {
            clock_check_mask,
            rounds: 0,
            time_limit,
            start_time: std::time::Instant::now(),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Returns the configured budget.
    #[inline]
    pub fn time_limit(&self) -> std::time::Duration {
        self.time_limit
    }
}

impl<T> SearchMonitor<T> for TimeLimitMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model<T>, _best: &Knapsack<T>) {
        self.start_time = std::time::Instant::now();
        self.rounds = 0;
    }

    #[inline(always)]
    fn on_round(&mut self, _report: &RoundReport<T>) {
        self.rounds = self.rounds.wrapping_add(1);
    }

    fn on_new_best(&mut self, _best: &Knapsack<T>) {}
    fn on_exit_search(&mut self, _best: &Knapsack<T>, _statistics: &HybridStatistics) {}

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        if (self.rounds & self.clock_check_mask) == 0 && self.start_time.elapsed() >= self.time_limit
        {
            return SearchCommand::Terminate("time limit reached".to_string());
        }
        SearchCommand::Continue
    }
}
