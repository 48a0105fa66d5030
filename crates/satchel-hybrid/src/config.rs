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

//! Tuning knobs of the coordinator.
//!
//! The defaults reproduce the reference protocol: rounds of 100 to 150
//! heuristic applications per agent, redirection of agents more than 50%
//! below the best score, and termination after more than 1000 consecutive
//! rounds without improvement.

use std::ops::RangeInclusive;

/// Lower bound of the per-round iteration count.
pub const DEFAULT_MIN_ITERATIONS: usize = 100;
/// Upper bound of the per-round iteration count.
pub const DEFAULT_MAX_ITERATIONS: usize = 150;
/// Relative gap to the best knapsack above which an agent is redirected.
pub const DEFAULT_WORSE_THAN_BEST_THRESHOLD: f64 = 0.5;
/// Number of consecutive non-improving rounds the search tolerates.
pub const DEFAULT_MAX_ROUNDS_WITHOUT_IMPROVEMENT: u64 = 1000;

/// How the agents of a round are stepped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// One agent after another on the calling thread, in registry order.
    #[default]
    Sequential,
    /// One scoped thread per agent, joined before the round is aggregated.
    Parallel,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Sequential => write!(f, "Sequential"),
            ExecutionMode::Parallel => write!(f, "Parallel"),
        }
    }
}

/// The error type for invalid coordinator configurations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A round must apply its heuristic at least once.
    ZeroMinIterations,
    /// The iteration range is empty.
    InvertedIterationRange { min: usize, max: usize },
    /// The redirection threshold is negative or not finite.
    InvalidThreshold(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroMinIterations => write!(f, "Minimum iterations per round must be positive"),
            Self::InvertedIterationRange { min, max } => write!(
                f,
                "Minimum iterations per round ({}) exceed the maximum ({})",
                min, max
            ),
            Self::InvalidThreshold(threshold) => write!(
                f,
                "Redirection threshold must be a finite, non-negative number, got {}",
                threshold
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration of a `Coordinator`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatorConfig {
    /// Lower bound of the number of heuristic applications per agent round.
    pub min_iterations: usize,
    /// Upper bound of the number of heuristic applications per agent round.
    pub max_iterations: usize,
    /// Agents whose relative gap to the best knapsack exceeds this value are redirected.
    pub worse_than_best_threshold: f64,
    /// The search stops once more than this many consecutive rounds did not improve.
    pub max_rounds_without_improvement: u64,
    /// Seed of every random decision in the run.
    pub seed: u64,
    /// How agents are stepped within a round.
    pub execution: ExecutionMode,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            min_iterations: DEFAULT_MIN_ITERATIONS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            worse_than_best_threshold: DEFAULT_WORSE_THAN_BEST_THRESHOLD,
            max_rounds_without_improvement: DEFAULT_MAX_ROUNDS_WITHOUT_IMPROVEMENT,
            seed: 0,
            execution: ExecutionMode::Sequential,
        }
    }
}

impl CoordinatorConfig {
    /// Checks the configuration for values the coordinator cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_iterations == 0 {
            return Err(ConfigError::ZeroMinIterations);
        }
        if self.min_iterations > self.max_iterations {
            return Err(ConfigError::InvertedIterationRange {
                min: self.min_iterations,
                max: self.max_iterations,
            });
        }
        if !self.worse_than_best_threshold.is_finite() || self.worse_than_best_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.worse_than_best_threshold));
        }
        Ok(())
    }

    /// Returns the closed range of heuristic applications per agent round.
    #[inline]
    pub fn iteration_range(&self) -> RangeInclusive<usize> {
        self.min_iterations..=self.max_iterations
    }
}

impl std::fmt::Display for CoordinatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CoordinatorConfig(iterations: [{}, {}], threshold: {}, max stagnation: {}, seed: {}, execution: {})",
            self.min_iterations,
            self.max_iterations,
            self.worse_than_best_threshold,
            self.max_rounds_without_improvement,
            self.seed,
            self.execution
        )
    }
}
