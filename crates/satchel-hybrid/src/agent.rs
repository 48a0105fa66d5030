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

//! Agents wrap one heuristic and track its progress in rounds.
//!
//! An agent owns its current knapsack exclusively. A round (`Agent::step`)
//! first snapshots the current knapsack and the evaluation counter as the
//! previous state, then applies the heuristic a random number of times drawn
//! from the iteration range, and finally stamps the current state with the
//! counter. The improvement ratio is the score gained per evaluation between
//! those two stamps.
//!
//! Since the counter is shared by every agent, the stamps measure the effort
//! of the whole search. When agents run in parallel the interval between two
//! stamps also covers evaluations made by other agents in the same round.

use rand::Rng;
use satchel_core::num::{SolverNumeric, to_f64};
use satchel_heuristics::heuristic::Heuristic;
use satchel_model::{eval::Evaluator, knapsack::Knapsack};
use std::ops::RangeInclusive;

/// The lifecycle state of an `Agent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentState {
    /// Constructed, no round started yet.
    Idle,
    /// Applying the heuristic.
    Stepping,
    /// Between rounds.
    Ready,
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentState::Idle => write!(f, "Idle"),
            AgentState::Stepping => write!(f, "Stepping"),
            AgentState::Ready => write!(f, "Ready"),
        }
    }
}

/// A heuristic bound to its own current and previous knapsack.
pub struct Agent<T, R>
where
    T: SolverNumeric,
{
    heuristic: Box<dyn Heuristic<T>>,
    current_solution: Knapsack<T>,
    current_timestamp: u64,
    previous_solution: Knapsack<T>,
    previous_timestamp: u64,
    iterations: RangeInclusive<usize>,
    rng: R,
    state: AgentState,
    rounds: u64,
}

impl<T, R> Agent<T, R>
where
    T: SolverNumeric,
    R: Rng,
{
    /// Creates a new agent starting from `initial_solution`.
    ///
    /// Both stamps are set to the current evaluation count and the previous
    /// state is a copy of the initial one, so the improvement ratio is defined
    /// before the first round.
    ///
    /// # Panics
    ///
    /// Panics if `iterations` is empty.
    pub fn new(
        heuristic: Box<dyn Heuristic<T>>,
        initial_solution: Knapsack<T>,
        evaluator: &Evaluator<T>,
        iterations: RangeInclusive<usize>,
        rng: R,
    ) -> Self {
        assert!(
            !iterations.is_empty(),
            "called `Agent::new` with empty iteration range: {:?}",
            iterations
        );

        let timestamp = evaluator.evaluations();
        Self {
            heuristic,
            previous_solution: initial_solution.clone(),
            current_solution: initial_solution,
            current_timestamp: timestamp,
            previous_timestamp: timestamp,
            iterations,
            rng,
            state: AgentState::Idle,
            rounds: 0,
        }
    }

    /// Returns the name of the bound heuristic.
    #[inline]
    pub fn name(&self) -> &str {
        self.heuristic.name()
    }

    /// Returns the lifecycle state.
    #[inline]
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Returns the number of completed rounds.
    #[inline]
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Returns the range the per-round iteration count is drawn from.
    #[inline]
    pub fn iterations(&self) -> &RangeInclusive<usize> {
        &self.iterations
    }

    /// Applies the heuristic once to the current knapsack.
    ///
    /// Leaves the previous state and both stamps untouched.
    pub fn execute_once(&mut self, evaluator: &Evaluator<T>) {
        let resume = self.state;
        self.state = AgentState::Stepping;
        self.apply(evaluator);
        self.state = match resume {
            AgentState::Stepping => AgentState::Stepping,
            _ => AgentState::Ready,
        };
    }

    #[inline]
    fn apply(&mut self, evaluator: &Evaluator<T>) {
        self.current_solution = self
            .heuristic
            .execute_once(evaluator, &self.current_solution);
    }

    /// Runs one round and returns the number of heuristic applications.
    pub fn step(&mut self, evaluator: &Evaluator<T>) -> usize {
        self.state = AgentState::Stepping;
        self.update_previous_solution();

        let iterations = self.rng.random_range(self.iterations.clone());
        for _ in 0..iterations {
            self.apply(evaluator);
        }

        self.current_timestamp = evaluator.evaluations();
        self.rounds += 1;
        self.state = AgentState::Ready;
        iterations
    }

    /// Marks the current state as the round boundary.
    #[inline]
    fn update_previous_solution(&mut self) {
        self.previous_solution = self.current_solution.clone();
        self.previous_timestamp = self.current_timestamp;
    }

    /// Replaces the current knapsack.
    ///
    /// The previous state and both stamps are left untouched, so the next
    /// improvement ratio spans the replacement.
    #[inline]
    pub fn set_current_solution(&mut self, solution: Knapsack<T>) {
        self.current_solution = solution;
    }

    /// Moves the agent to `solution` and resets the search trajectory of its heuristic.
    ///
    /// Bookkeeping is kept as in [`Agent::set_current_solution`].
    #[inline]
    pub fn redirect(&mut self, solution: Knapsack<T>) {
        self.heuristic.reset();
        self.set_current_solution(solution);
    }

    /// Returns the current knapsack.
    #[inline]
    pub fn current_solution(&self) -> &Knapsack<T> {
        &self.current_solution
    }

    /// Returns an owned copy of the current knapsack.
    #[inline]
    pub fn snapshot_current(&self) -> Knapsack<T> {
        self.current_solution.clone()
    }

    /// Returns the score of the current knapsack.
    #[inline]
    pub fn current_score(&self) -> T {
        self.current_solution.score()
    }

    /// Returns the knapsack at the last round boundary.
    #[inline]
    pub fn previous_solution(&self) -> &Knapsack<T> {
        &self.previous_solution
    }

    /// Returns the evaluation count at which the last round ended.
    #[inline]
    pub fn current_timestamp(&self) -> u64 {
        self.current_timestamp
    }

    /// Returns the evaluation count at the last round boundary.
    #[inline]
    pub fn previous_timestamp(&self) -> u64 {
        self.previous_timestamp
    }

    /// Returns the score gained per evaluation since the last round boundary.
    ///
    /// Returns `0.0` if no evaluation happened in between, which is the case
    /// before the first round and for heuristics that never evaluate.
    pub fn improvement_ratio(&self) -> f64 {
        let elapsed = self.current_timestamp.saturating_sub(self.previous_timestamp);
        if elapsed == 0 {
            return 0.0;
        }

        let gain = to_f64(self.current_solution.score()) - to_f64(self.previous_solution.score());
        gain / elapsed as f64
    }
}

impl<T, R> std::fmt::Debug for Agent<T, R>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("heuristic", &self.heuristic.name())
            .field("state", &self.state)
            .field("current_score", &self.current_solution.score())
            .field("current_timestamp", &self.current_timestamp)
            .field("previous_score", &self.previous_solution.score())
            .field("previous_timestamp", &self.previous_timestamp)
            .field("iterations", &self.iterations)
            .field("rounds", &self.rounds)
            .finish()
    }
}

impl<T, R> std::fmt::Display for Agent<T, R>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Agent({}, score: {}, state: {})",
            self.heuristic.name(),
            self.current_solution.score(),
            self.state
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use satchel_heuristics::{greedy::Greedy, local_search::LocalSearch};
    use satchel_model::{index::ItemIndex, model::ModelBuilder};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    /// Counts its calls and returns the input unchanged without evaluating.
    struct CountingStub {
        calls: Arc<AtomicUsize>,
    }

    impl Heuristic<i64> for CountingStub {
        fn name(&self) -> &str {
            "CountingStub"
        }

        fn execute_once(&mut self, _evaluator: &Evaluator<i64>, current: &Knapsack<i64>) -> Knapsack<i64> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            current.clone()
        }
    }

    /// Counts how often its trajectory was reset.
    struct ResetCountingStub {
        resets: Arc<AtomicUsize>,
    }

    impl Heuristic<i64> for ResetCountingStub {
        fn name(&self) -> &str {
            "ResetCountingStub"
        }

        fn execute_once(&mut self, evaluator: &Evaluator<i64>, current: &Knapsack<i64>) -> Knapsack<i64> {
            Greedy::new().execute_once(evaluator, current)
        }

        fn reset(&mut self) {
            self.resets.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Evaluates the greedy fill of its input, one evaluation per call.
    struct EvaluatingStub;

    impl Heuristic<i64> for EvaluatingStub {
        fn name(&self) -> &str {
            "EvaluatingStub"
        }

        fn execute_once(&mut self, evaluator: &Evaluator<i64>, current: &Knapsack<i64>) -> Knapsack<i64> {
            Greedy::new().execute_once(evaluator, current)
        }
    }

    fn evaluator() -> Evaluator<i64> {
        let mut builder = ModelBuilder::new(5, 10);
        for (i, &(value, weight)) in [(10, 5), (40, 4), (30, 6), (50, 3), (15, 2)].iter().enumerate() {
            builder.set_item(ItemIndex::new(i), value, weight);
        }
        Evaluator::new(builder.build())
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_new_agent_is_idle_with_equal_stamps() {
        let evaluator = evaluator();
        let _ = evaluator.evaluate(fixedbitset::FixedBitSet::with_capacity(5));
        let agent = Agent::new(Box::new(EvaluatingStub), Knapsack::empty(5), &evaluator, 3..=4, rng());

        assert_eq!(agent.state(), AgentState::Idle);
        assert_eq!(agent.current_timestamp(), 1);
        assert_eq!(agent.previous_timestamp(), 1);
        assert_eq!(agent.previous_solution(), agent.current_solution());
        assert_eq!(agent.improvement_ratio(), 0.0);
        assert_eq!(agent.name(), "EvaluatingStub");
    }

    #[test]
    fn test_step_calls_heuristic_within_iteration_range() {
        let evaluator = evaluator();
        let calls = Arc::new(AtomicUsize::new(0));
        let stub = CountingStub {
            calls: Arc::clone(&calls),
        };
        let mut agent = Agent::new(Box::new(stub), Knapsack::empty(5), &evaluator, 100..=150, rng());

        for round in 1..=25u64 {
            let before = calls.load(Ordering::Relaxed);
            let iterations = agent.step(&evaluator);
            let made = calls.load(Ordering::Relaxed) - before;

            assert_eq!(made, iterations);
            assert!((100..=150).contains(&made), "made {} calls", made);
            assert!(agent.current_timestamp() >= agent.previous_timestamp());
            assert_eq!(agent.rounds(), round);
            assert_eq!(agent.state(), AgentState::Ready);
        }
    }

    #[test]
    fn test_single_value_range_is_exact() {
        let evaluator = evaluator();
        let calls = Arc::new(AtomicUsize::new(0));
        let stub = CountingStub {
            calls: Arc::clone(&calls),
        };
        let mut agent = Agent::new(Box::new(stub), Knapsack::empty(5), &evaluator, 7..=7, rng());
        assert_eq!(agent.step(&evaluator), 7);
        assert_eq!(calls.load(Ordering::Relaxed), 7);
    }

    #[test]
    fn test_ratio_is_zero_without_evaluations() {
        let evaluator = evaluator();
        let stub = CountingStub {
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let mut agent = Agent::new(Box::new(stub), Knapsack::empty(5), &evaluator, 2..=3, rng());
        agent.step(&evaluator);
        assert_eq!(agent.current_timestamp(), agent.previous_timestamp());
        assert_eq!(agent.improvement_ratio(), 0.0);
    }

    #[test]
    fn test_ratio_is_gain_per_evaluation() {
        let evaluator = evaluator();
        let mut agent = Agent::new(Box::new(EvaluatingStub), Knapsack::empty(5), &evaluator, 4..=4, rng());
        agent.step(&evaluator);

        // Greedy fill: item 3 (w3), item 1 (w4), item 4 (w2) => value 105.
        assert_eq!(agent.current_score(), 105);
        assert_eq!(agent.previous_solution().score(), 0);
        assert_eq!(agent.current_timestamp() - agent.previous_timestamp(), 4);
        assert_eq!(agent.improvement_ratio(), 105.0 / 4.0);

        // The second round starts from the filled knapsack and gains nothing.
        agent.step(&evaluator);
        assert_eq!(agent.previous_solution().score(), 105);
        assert_eq!(agent.improvement_ratio(), 0.0);
    }

    #[test]
    fn test_execute_once_leaves_bookkeeping_untouched() {
        let evaluator = evaluator();
        let mut agent = Agent::new(Box::new(EvaluatingStub), Knapsack::empty(5), &evaluator, 1..=1, rng());
        agent.execute_once(&evaluator);

        assert_eq!(agent.current_score(), 105);
        assert_eq!(agent.previous_solution().score(), 0);
        assert_eq!(agent.current_timestamp(), 0);
        assert_eq!(agent.previous_timestamp(), 0);
        assert_eq!(agent.state(), AgentState::Ready);
    }

    #[test]
    fn test_set_current_solution_keeps_previous_state() {
        let evaluator = evaluator();
        let mut agent = Agent::new(Box::new(EvaluatingStub), Knapsack::empty(5), &evaluator, 2..=2, rng());
        agent.step(&evaluator);
        let previous = agent.previous_solution().clone();
        let (prev_ts, cur_ts) = (agent.previous_timestamp(), agent.current_timestamp());

        agent.set_current_solution(Knapsack::empty(5));
        assert_eq!(agent.current_score(), 0);
        assert_eq!(agent.previous_solution(), &previous);
        assert_eq!(agent.previous_timestamp(), prev_ts);
        assert_eq!(agent.current_timestamp(), cur_ts);
    }

    #[test]
    fn test_redirect_resets_heuristic_and_keeps_previous_state() {
        let evaluator = evaluator();
        let resets = Arc::new(AtomicUsize::new(0));
        let heuristic = ResetCountingStub {
            resets: Arc::clone(&resets),
        };
        let mut agent = Agent::new(Box::new(heuristic), Knapsack::empty(5), &evaluator, 2..=2, rng());
        agent.step(&evaluator);
        assert_eq!(resets.load(Ordering::Relaxed), 0);
        let previous = agent.previous_solution().clone();
        let (prev_ts, cur_ts) = (agent.previous_timestamp(), agent.current_timestamp());

        agent.redirect(Knapsack::empty(5));
        assert_eq!(resets.load(Ordering::Relaxed), 1);
        assert_eq!(agent.current_score(), 0);
        assert_eq!(agent.previous_solution(), &previous);
        assert_eq!(agent.previous_timestamp(), prev_ts);
        assert_eq!(agent.current_timestamp(), cur_ts);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let evaluator = evaluator();
        let mut agent = Agent::new(
            Box::new(LocalSearch::new(ChaCha8Rng::seed_from_u64(1))),
            Knapsack::empty(5),
            &evaluator,
            3..=5,
            rng(),
        );
        agent.step(&evaluator);
        let snapshot = agent.snapshot_current();
        let score = agent.current_score();

        // Moving the agent on does not alter a snapshot, and vice versa.
        agent.set_current_solution(Knapsack::empty(5));
        assert_eq!(snapshot.score(), score);
        drop(snapshot);
        assert_eq!(agent.current_score(), 0);
    }

    #[test]
    #[should_panic(expected = "called `Agent::new` with empty iteration range")]
    fn test_empty_range_panics() {
        let evaluator = evaluator();
        #[allow(clippy::reversed_empty_ranges)]
        let range = 5..=4;
        let _ = Agent::new(Box::new(EvaluatingStub), Knapsack::empty(5), &evaluator, range, rng());
    }
}
