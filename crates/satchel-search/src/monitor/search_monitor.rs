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

use crate::{report::RoundReport, stats::HybridStatistics};
use satchel_core::num::SolverNumeric;
use satchel_model::{knapsack::Knapsack, model::Model};

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

pub trait SearchMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str;
    fn on_enter_search(&mut self, model: &Model<T>, best: &Knapsack<T>);
    fn on_round(&mut self, report: &RoundReport<T>);
    fn on_new_best(&mut self, best: &Knapsack<T>);
    fn on_exit_search(&mut self, best: &Knapsack<T>, statistics: &HybridStatistics);
    fn search_command(&self) -> SearchCommand;
}

impl<T> std::fmt::Debug for dyn SearchMonitor<T> + '_
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn SearchMonitor<T> + '_
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

impl<T, M> SearchMonitor<T> for &mut M
where
    T: SolverNumeric,
    M: SearchMonitor<T> + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn on_enter_search(&mut self, model: &Model<T>, best: &Knapsack<T>) {
        (**self).on_enter_search(model, best)
    }

    #[inline]
    fn on_round(&mut self, report: &RoundReport<T>) {
        (**self).on_round(report)
    }

    #[inline]
    fn on_new_best(&mut self, best: &Knapsack<T>) {
        (**self).on_new_best(best)
    }

    #[inline]
    fn on_exit_search(&mut self, best: &Knapsack<T>, statistics: &HybridStatistics) {
        (**self).on_exit_search(best, statistics)
    }

    #[inline]
    fn search_command(&self) -> SearchCommand {
        (**self).search_command()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::no_op::NoOpMonitor;

    #[test]
    fn test_command_display() {
        assert_eq!(format!("{}", SearchCommand::Continue), "Continue");
        assert_eq!(
            format!("{}", SearchCommand::Terminate("done".into())),
            "Terminate: done"
        );
        assert_eq!(SearchCommand::default(), SearchCommand::Continue);
    }

    #[test]
    fn test_trait_object_formatting() {
        let monitor: Box<dyn SearchMonitor<i64>> = Box::new(NoOpMonitor::<i64>::new());
        assert_eq!(format!("{:?}", monitor), "SearchMonitor(NoOpMonitor)");
        assert_eq!(format!("{}", monitor), "SearchMonitor(NoOpMonitor)");
    }

    #[test]
    fn test_forwarding_through_mutable_reference() {
        let mut inner = NoOpMonitor::<i64>::new();
        let forward = &mut inner;
        assert_eq!(forward.name(), "NoOpMonitor");
        assert_eq!(forward.search_command(), SearchCommand::Continue);
    }
}
