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

/// Fans every hook out to a list of monitors, in insertion order.
///
/// The search is terminated as soon as one of the monitors asks for it; the
/// reason of the first such monitor is reported.
pub struct CompositeMonitor<'a, T> {
    monitors: Vec<Box<dyn SearchMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: SearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Appends `monitor` and returns the composite.
    #[inline]
    pub fn with<M>(mut self, monitor: M) -> Self
    where
        M: SearchMonitor<T> + 'a,
    {
        self.add_monitor(monitor);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Returns the names of the monitors in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.monitors.iter().map(|monitor| monitor.name()).collect()
    }
}

impl<'a, T> FromIterator<Box<dyn SearchMonitor<T> + 'a>> for CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn SearchMonitor<T> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> SearchMonitor<T> for CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_enter_search(&mut self, model: &Model<T>, best: &Knapsack<T>) {
        self.monitors
            .iter_mut()
            .for_each(|monitor| monitor.on_enter_search(model, best));
    }

    fn on_round(&mut self, report: &RoundReport<T>) {
        self.monitors
            .iter_mut()
            .for_each(|monitor| monitor.on_round(report));
    }

    fn on_new_best(&mut self, best: &Knapsack<T>) {
        self.monitors
            .iter_mut()
            .for_each(|monitor| monitor.on_new_best(best));
    }

    fn on_exit_search(&mut self, best: &Knapsack<T>, statistics: &HybridStatistics) {
        self.monitors
            .iter_mut()
            .for_each(|monitor| monitor.on_exit_search(best, statistics));
    }

    fn search_command(&self) -> SearchCommand {
        self.monitors
            .iter()
            .map(|monitor| monitor.search_command())
            .find(|command| matches!(command, SearchCommand::Terminate(_)))
            .unwrap_or_default()
    }
}

impl<'a, T> std::fmt::Debug for CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeMonitor")
            .field("monitors", &self.names())
            .finish()
    }
}

impl<'a, T> std::fmt::Display for CompositeMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompositeMonitor([{}])", self.names().join(", "))
    }
}
