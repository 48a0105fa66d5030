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

use crate::stats::HybridStatistics;
use satchel_core::num::SolverNumeric;
use satchel_model::knapsack::Knapsack;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The best knapsack did not improve for more rounds than allowed.
    Stagnated,
    /// A monitor requested termination.
    /// The string contains information about the reason for abortion.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Stagnated => write!(f, "Stagnated"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// The outcome of a hybrid search run.
///
/// A run always has a best knapsack: the search starts from a feasible seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridOutcome<T>
where
    T: SolverNumeric,
{
    pub best: Knapsack<T>,
    pub reason: TerminationReason,
    pub statistics: HybridStatistics,
}

impl<T> HybridOutcome<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new(best: Knapsack<T>, reason: TerminationReason, statistics: HybridStatistics) -> Self {
        Self {
            best,
            reason,
            statistics,
        }
    }

    /// Returns the score of the best knapsack.
    #[inline]
    pub fn score(&self) -> T {
        self.best.score()
    }

    #[inline]
    pub fn is_stagnated(&self) -> bool {
        matches!(self.reason, TerminationReason::Stagnated)
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        matches!(self.reason, TerminationReason::Aborted(_))
    }
}

impl<T> std::fmt::Display for HybridOutcome<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Outcome: {}", self.reason)?;
        writeln!(f, "Best: {}", self.best)?;
        write!(f, "{}", self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::HybridStatisticsBuilder;

    #[test]
    fn test_reason_display() {
        assert_eq!(format!("{}", TerminationReason::Stagnated), "Stagnated");
        assert_eq!(
            format!("{}", TerminationReason::Aborted("time limit reached".into())),
            "Aborted: time limit reached"
        );
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = HybridOutcome::new(
            Knapsack::<i64>::empty(3),
            TerminationReason::Aborted("stop".into()),
            HybridStatisticsBuilder::new().rounds(2).build(),
        );
        assert_eq!(outcome.score(), 0);
        assert!(outcome.is_aborted());
        assert!(!outcome.is_stagnated());

        let rendered = format!("{}", outcome);
        assert!(rendered.starts_with("Outcome: Aborted: stop"));
        assert!(rendered.contains("Rounds: 2"));
    }
}
