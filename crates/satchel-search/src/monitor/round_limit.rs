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
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    report::RoundReport,
    stats::HybridStatistics,
};
use satchel_core::num::SolverNumeric;
use satchel_model::{knapsack::Knapsack, model::Model};

/// A monitor that terminates the search after a fixed number of rounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundLimitMonitor<T> {
    round_limit: u64,
    rounds: u64,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> RoundLimitMonitor<T> {
    /// Creates a new `RoundLimitMonitor` allowing `round_limit` rounds.
    #[inline]
    pub fn new(round_limit: u64) -> Self {
        Self {
            round_limit,
            rounds: 0,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Returns the number of rounds observed so far.
    #[inline]
    pub fn rounds(&self) -> u64 {
        self.rounds
    }
}

impl<T> SearchMonitor<T> for RoundLimitMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "RoundLimitMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model<T>, _best: &Knapsack<T>) {
        self.rounds = 0;
    }

    fn on_round(&mut self, report: &RoundReport<T>) {
        self.rounds = report.round;
    }

    fn on_new_best(&mut self, _best: &Knapsack<T>) {}
    fn on_exit_search(&mut self, _best: &Knapsack<T>, _statistics: &HybridStatistics) {}

    fn search_command(&self) -> SearchCommand {
        if self.rounds >= self.round_limit {
            SearchCommand::Terminate("round limit reached".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}
