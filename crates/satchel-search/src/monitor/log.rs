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

//! Progress logging for the hybrid search through `tracing`.
//!
//! Start and finish are logged at `info`, new best knapsacks at `debug`, and
//! every `log_every`-th round at `info` with the per-agent state at `debug`.

use crate::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    report::RoundReport,
    stats::HybridStatistics,
};
use satchel_core::num::SolverNumeric;
use satchel_model::{knapsack::Knapsack, model::Model};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMonitor<T> {
    log_every: u64,
    new_bests: u64,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for LogMonitor<T> {
    fn default() -> Self {
        Self::new(100)
    }
}

impl<T> LogMonitor<T> {
    /// Creates a new `LogMonitor` that logs every `log_every` rounds.
    ///
    /// # Panics
    ///
    /// Panics if `log_every` is zero.
    #[inline]
    pub fn new(log_every: u64) -> Self {
        assert!(log_every > 0, "called `LogMonitor::new` with zero interval");
        Self {
            log_every,
            new_bests: 0,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Returns the number of new best knapsacks observed in the current search.
    #[inline]
    pub fn new_bests(&self) -> u64 {
        self.new_bests
    }
}

impl<T> SearchMonitor<T> for LogMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, model: &Model<T>, best: &Knapsack<T>) {
        self.new_bests = 0;
        tracing::info!(
            items = model.num_items(),
            capacity = %model.capacity(),
            seed_score = %best.score(),
            "hybrid search started"
        );
    }

    fn on_round(&mut self, report: &RoundReport<T>) {
        if report.round % self.log_every != 0 {
            return;
        }
        tracing::info!(
            round = report.round,
            best_score = %report.best_score,
            stagnation = report.rounds_without_improvement,
            evaluations = report.evaluations,
            "round completed"
        );
        for agent in &report.agents {
            tracing::debug!(
                agent = agent.name.as_str(),
                score = %agent.score,
                improvement_ratio = agent.improvement_ratio,
                "agent state"
            );
        }
    }

    fn on_new_best(&mut self, best: &Knapsack<T>) {
        self.new_bests += 1;
        tracing::debug!(
            score = %best.score(),
            weight = %best.weight(),
            items = best.num_selected(),
            "new best knapsack"
        );
    }

    fn on_exit_search(&mut self, best: &Knapsack<T>, statistics: &HybridStatistics) {
        tracing::info!(
            best_score = %best.score(),
            rounds = statistics.rounds,
            improvements = statistics.improvements,
            redirections = statistics.redirections,
            evaluations = statistics.evaluations,
            elapsed_ms = statistics.solve_duration.as_millis() as u64,
            "hybrid search finished"
        );
    }

    fn search_command(&self) -> SearchCommand {
        SearchCommand::Continue
    }
}
