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
use std::sync::atomic::{AtomicBool, Ordering};

const DEFAULT_REASON: &str = "Interrupt signal received";

/// Terminates the search once a shared flag is raised.
///
/// The flag is only read at round boundaries, so a running round always
/// completes before the coordinator stops.
#[derive(Debug, Clone)]
pub struct InterruptMonitor<'a, T> {
    stop_flag: &'a AtomicBool,
    reason: String,
    _phantom: std::marker::PhantomData<T>,
}

impl<'a, T> InterruptMonitor<'a, T> {
    #[inline]
    pub fn new(stop_flag: &'a AtomicBool) -> Self {
        Self::with_reason(stop_flag, DEFAULT_REASON)
    }

    /// Creates a monitor that reports `reason` when it terminates the search.
    #[inline]
    pub fn with_reason(stop_flag: &'a AtomicBool, reason: impl Into<String>) -> Self {
        Self {
            stop_flag,
            reason: reason.into(),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Returns `true` if the flag is raised.
    #[inline]
    pub fn is_raised(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl<'a, T> SearchMonitor<T> for InterruptMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "InterruptMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model<T>, _best: &Knapsack<T>) {}
    fn on_round(&mut self, _report: &RoundReport<T>) {}
    fn on_new_best(&mut self, _best: &Knapsack<T>) {}
    fn on_exit_search(&mut self, _best: &Knapsack<T>, _statistics: &HybridStatistics) {}

    fn search_command(&self) -> SearchCommand {
        if self.is_raised() {
            SearchCommand::Terminate(self.reason.clone())
        } else {
            SearchCommand::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follows_flag() {
        let flag = AtomicBool::new(false);
        let monitor = InterruptMonitor::<i64>::new(&flag);
        assert!(!monitor.is_raised());
        assert_eq!(monitor.search_command(), SearchCommand::Continue);

        flag.store(true, Ordering::Relaxed);
        assert_eq!(
            monitor.search_command(),
            SearchCommand::Terminate("Interrupt signal received".to_string())
        );
    }

    #[test]
    fn test_custom_reason() {
        let flag = AtomicBool::new(true);
        let monitor = InterruptMonitor::<i64>::with_reason(&flag, "ctrl-c");
        assert_eq!(
            monitor.search_command(),
            SearchCommand::Terminate("ctrl-c".to_string())
        );
    }
}
