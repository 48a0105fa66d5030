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

/// Statistics collected during a hybrid search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridStatistics {
    /// Number of completed rounds.
    pub rounds: u64,
    /// Number of rounds that improved the best knapsack.
    pub improvements: u64,
    /// Number of times an agent was reset to the best knapsack.
    pub redirections: u64,
    /// Number of fitness evaluations performed, including the seeding round.
    pub evaluations: u64,
    /// Number of agents taking part in the rounds.
    pub agents: usize,
    /// Total duration of the run.
    pub solve_duration: std::time::Duration,
}

impl std::fmt::Display for HybridStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Hybrid Statistics:")?;
        writeln!(f, "  Rounds: {}", self.rounds)?;
        writeln!(f, "  Improvements: {}", self.improvements)?;
        writeln!(f, "  Redirections: {}", self.redirections)?;
        writeln!(f, "  Evaluations: {}", self.evaluations)?;
        writeln!(f, "  Agents: {}", self.agents)?;
        writeln!(
            f,
            "  Solve Duration (secs): {:.3}",
            self.solve_duration.as_secs_f64()
        )
    }
}

/// Builder for `HybridStatistics`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridStatisticsBuilder {
    rounds: u64,
    improvements: u64,
    redirections: u64,
    evaluations: u64,
    agents: usize,
    solve_duration: std::time::Duration,
}

impl Default for HybridStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HybridStatisticsBuilder {
    /// Creates a new `HybridStatisticsBuilder` with default values.
    #[inline]
    pub fn new() -> Self {
        Self {
            rounds: 0,
            improvements: 0,
            redirections: 0,
            evaluations: 0,
            agents: 0,
            solve_duration: std::time::Duration::ZERO,
        }
    }

    /// Sets the number of completed rounds.
    #[inline]
    pub fn rounds(mut self, rounds: u64) -> Self {
        self.rounds = rounds;
        self
    }

    /// Sets the number of improving rounds.
    #[inline]
    pub fn improvements(mut self, improvements: u64) -> Self {
        self.improvements = improvements;
        self
    }

    /// Sets the number of redirections.
    #[inline]
    pub fn redirections(mut self, redirections: u64) -> Self {
        self.redirections = redirections;
        self
    }

    /// Sets the number of evaluations.
    #[inline]
    pub fn evaluations(mut self, evaluations: u64) -> Self {
        self.evaluations = evaluations;
        self
    }

    /// Sets the number of agents.
    #[inline]
    pub fn agents(mut self, agents: usize) -> Self {
        self.agents = agents;
        self
    }

    /// Sets the total solve duration.
    #[inline]
    pub fn solve_duration(mut self, solve_duration: std::time::Duration) -> Self {
        self.solve_duration = solve_duration;
        self
    }

    /// Builds the `HybridStatistics` instance.
    #[inline]
    pub fn build(self) -> HybridStatistics {
        HybridStatistics {
            rounds: self.rounds,
            improvements: self.improvements,
            redirections: self.redirections,
            evaluations: self.evaluations,
            agents: self.agents,
            solve_duration: self.solve_duration,
        }
    }
}
