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

//! # Hybrid Coordinator
//!
//! The coordinator runs one `Agent` per registered heuristic in rounds and
//! turns them into a cooperative search.
//!
//! ## Protocol
//!
//! - **Seeding**: building the coordinator runs one round of a greedy agent on
//!   the initial knapsack and adopts the result as the best knapsack.
//! - **Round**: every agent is stepped once, in registry order or on one
//!   scoped thread per agent. The aggregation passes start only after all
//!   agents finished the round.
//! - **Aggregation**: an agent whose score strictly exceeds the best score
//!   replaces the best knapsack. A round without such an agent counts
//!   towards stagnation, any other round resets the counter.
//! - **Redirection**: agents whose relative gap to the best knapsack exceeds
//!   the threshold continue from a copy of the best knapsack, and their
//!   heuristic forgets its trajectory. Their previous state is kept, so the
//!   next improvement ratio spans the reset.
//! - **Termination**: the search ends once more rounds than allowed went by
//!   without improvement, or when a monitor asks to terminate. Monitors are
//!   consulted at the top of every round.
//!
//! All randomness derives from the configured seed. Heuristics never read the
//! evaluation counter, so both execution modes produce the same knapsacks
//! round by round.

use crate::{
    agent::Agent,
    config::{ConfigError, CoordinatorConfig, ExecutionMode},
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use satchel_core::num::SolverNumeric;
use satchel_heuristics::{greedy::Greedy, registry::HeuristicRegistry};
use satchel_model::{eval::Evaluator, knapsack::Knapsack, model::Model};
use satchel_search::{
    monitor::{
        log::LogMonitor,
        search_monitor::{SearchCommand, SearchMonitor},
    },
    report::{AgentReport, CoordinatorReport, RoundReport},
    result::{HybridOutcome, TerminationReason},
    stats::HybridStatisticsBuilder,
};

/// The error type for coordinator construction.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinatorError {
    /// The registry holds no heuristic, so no agent would take part.
    EmptyRegistry,
    /// The configuration cannot be run.
    InvalidConfig(ConfigError),
    /// The initial knapsack does not belong to the model or exceeds its capacity.
    InfeasibleInitialSolution,
}

impl std::fmt::Display for CoordinatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRegistry => write!(f, "The heuristic registry is empty"),
            Self::InvalidConfig(e) => write!(f, "Invalid configuration: {}", e),
            Self::InfeasibleInitialSolution => {
                write!(f, "The initial knapsack is not feasible for the model")
            }
        }
    }
}

impl std::error::Error for CoordinatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CoordinatorError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfig(e)
    }
}

/// Round-based controller over a set of heuristic agents.
///
/// Built with `CoordinatorBuilder`, which already performs the seeding round.
pub struct Coordinator<T>
where
    T: SolverNumeric,
{
    evaluator: Evaluator<T>,
    registry: HeuristicRegistry<T>,
    config: CoordinatorConfig,
    initial_solution: Knapsack<T>,
    current_best: Knapsack<T>,
    agents: Vec<Agent<T, ChaCha8Rng>>,
    rounds_not_improving: u64,
    rounds: u64,
    improvements: u64,
    redirections: u64,
    rng: ChaCha8Rng,
}

impl<T> Coordinator<T>
where
    T: SolverNumeric,
{
    /// Runs one round of a greedy agent on the initial knapsack and adopts
    /// its result as the best knapsack unless that is already better.
    ///
    /// Resets the stagnation counter on adoption. Only called while building.
    fn initialize(&mut self) {
        let mut greedy = Agent::new(
            Box::new(Greedy::new()),
            self.initial_solution.clone(),
            &self.evaluator,
            self.config.iteration_range(),
            ChaCha8Rng::seed_from_u64(self.rng.random()),
        );
        greedy.step(&self.evaluator);

        let seeded = greedy.snapshot_current();
        if seeded.score() < self.current_best.score() {
            return;
        }
        self.current_best = seeded;
        self.rounds_not_improving = 0;

        tracing::debug!(
            score = %self.current_best.score(),
            weight = %self.current_best.weight(),
            evaluations = self.evaluator.evaluations(),
            "seeded best knapsack"
        );
    }

    /// Runs the search with the default monitor stack until it stagnates.
    #[inline]
    pub fn solve(&mut self) -> HybridOutcome<T> {
        self.solve_with_monitor(LogMonitor::default())
    }

    /// Runs the search until it stagnates or `monitor` asks to terminate.
    ///
    /// Agents are created from the registry at the start of every call, each
    /// from a copy of the best knapsack. A second call therefore resumes from
    /// the best knapsack found so far; it returns without a round if the
    /// search has already stagnated.
    #[tracing::instrument(level = "debug", name = "Hybrid Search", skip(self, monitor))]
    pub fn solve_with_monitor<M>(&mut self, mut monitor: M) -> HybridOutcome<T>
    where
        M: SearchMonitor<T>,
    {
        let start_time = std::time::Instant::now();

        self.rounds = 0;
        self.improvements = 0;
        self.redirections = 0;
        self.create_agents();

        monitor.on_enter_search(self.evaluator.model(), &self.current_best);

        let reason = loop {
            if self.has_finished() {
                break TerminationReason::Stagnated;
            }
            if let SearchCommand::Terminate(reason) = monitor.search_command() {
                break TerminationReason::Aborted(reason);
            }

            self.run_agents_once();

            let improved = self.update_current_best();
            if improved {
                monitor.on_new_best(&self.current_best);
            }

            let agents = self.agent_reports();
            let redirections = self.redirect_agents();
            self.rounds += 1;

            monitor.on_round(&RoundReport {
                round: self.rounds,
                best_score: self.current_best.score(),
                improved,
                rounds_without_improvement: self.rounds_not_improving,
                redirections,
                evaluations: self.evaluator.evaluations(),
                agents,
            });
        };

        let statistics = HybridStatisticsBuilder::new()
            .rounds(self.rounds)
            .improvements(self.improvements)
            .redirections(self.redirections)
            .evaluations(self.evaluator.evaluations())
            .agents(self.agents.len())
            .solve_duration(start_time.elapsed())
            .build();

        monitor.on_exit_search(&self.current_best, &statistics);

        HybridOutcome::new(self.current_best.clone(), reason, statistics)
    }

    /// Replaces the agents with one fresh agent per registry entry.
    fn create_agents(&mut self) {
        let mut agents = Vec::with_capacity(self.registry.len());
        for factory in self.registry.iter() {
            let heuristic = factory.make(self.rng.random());
            agents.push(Agent::new(
                heuristic,
                self.current_best.clone(),
                &self.evaluator,
                self.config.iteration_range(),
                ChaCha8Rng::seed_from_u64(self.rng.random()),
            ));
        }
        self.agents = agents;
    }

    /// Steps every agent once and returns when all of them are done.
    fn run_agents_once(&mut self) {
        let evaluator = &self.evaluator;
        match self.config.execution {
            ExecutionMode::Sequential => {
                for agent in &mut self.agents {
                    agent.step(evaluator);
                }
            }
            ExecutionMode::Parallel => {
                let agents = &mut self.agents;
                std::thread::scope(|scope| {
                    let mut handles = Vec::with_capacity(agents.len());
                    for agent in agents.iter_mut() {
                        handles.push(scope.spawn(move || agent.step(evaluator)));
                    }
                    for handle in handles {
                        handle.join().expect("agent thread panicked");
                    }
                });
            }
        }
    }

    /// Adopts the best agent knapsack if it strictly beats the best one.
    ///
    /// Returns `true` if the best knapsack changed. Updates the stagnation
    /// counter either way.
    fn update_current_best(&mut self) -> bool {
        let mut improved = false;
        for agent in &self.agents {
            if agent.current_score() > self.current_best.score() {
                self.current_best = agent.snapshot_current();
                improved = true;
            }
        }

        if improved {
            self.rounds_not_improving = 0;
            self.improvements += 1;
            tracing::debug!(
                round = self.rounds + 1,
                score = %self.current_best.score(),
                "best knapsack improved"
            );
        } else {
            self.rounds_not_improving += 1;
        }
        improved
    }

    /// Resets agents that fell too far below the best knapsack.
    ///
    /// Returns the number of redirected agents.
    fn redirect_agents(&mut self) -> usize {
        let threshold = self.config.worse_than_best_threshold;
        let best = &self.current_best;

        let mut redirected = 0;
        for agent in &mut self.agents {
            let gap = agent.current_solution().relative_gap(best);
            if gap > threshold {
                tracing::debug!(
                    agent = agent.name(),
                    score = %agent.current_score(),
                    gap,
                    "redirecting agent to best knapsack"
                );
                agent.redirect(best.clone());
                redirected += 1;
            }
        }

        self.redirections += redirected as u64;
        redirected
    }

    fn agent_reports(&self) -> Vec<AgentReport<T>> {
        self.agents
            .iter()
            .map(|agent| AgentReport {
                name: agent.name().to_string(),
                score: agent.current_score(),
                improvement_ratio: agent.improvement_ratio(),
            })
            .collect()
    }

    /// Returns `true` once more consecutive rounds than allowed did not improve.
    #[inline]
    pub fn has_finished(&self) -> bool {
        self.rounds_not_improving > self.config.max_rounds_without_improvement
    }

    /// Summarizes the current state and logs the summary at `info` level.
    pub fn report(&self) -> CoordinatorReport<T> {
        let report = CoordinatorReport {
            best_score: self.current_best.score(),
            best_weight: self.current_best.weight(),
            rounds_without_improvement: self.rounds_not_improving,
            evaluations: self.evaluator.evaluations(),
            agents: self.agent_reports(),
        };

        tracing::info!(
            best_score = %report.best_score,
            best_weight = %report.best_weight,
            stagnation = report.rounds_without_improvement,
            evaluations = report.evaluations,
            agents = report.agents.len(),
            "coordinator report"
        );
        report
    }

    #[inline]
    pub fn current_best(&self) -> &Knapsack<T> {
        &self.current_best
    }

    #[inline]
    pub fn initial_solution(&self) -> &Knapsack<T> {
        &self.initial_solution
    }

    /// Returns the number of consecutive rounds without improvement.
    #[inline]
    pub fn rounds_not_improving(&self) -> u64 {
        self.rounds_not_improving
    }

    /// Returns the number of rounds of the current or last search.
    #[inline]
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Returns the agents of the current or last search in stepping order.
    #[inline]
    pub fn agents(&self) -> &[Agent<T, ChaCha8Rng>] {
        &self.agents
    }

    #[inline]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &HeuristicRegistry<T> {
        &self.registry
    }

    #[inline]
    pub fn evaluator(&self) -> &Evaluator<T> {
        &self.evaluator
    }

    #[inline]
    pub fn model(&self) -> &Model<T> {
        self.evaluator.model()
    }
}

impl<T> std::fmt::Debug for Coordinator<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("best_score", &self.current_best.score())
            .field("agents", &self.agents)
            .field("rounds_not_improving", &self.rounds_not_improving)
            .field("rounds", &self.rounds)
            .finish()
    }
}

impl<T> std::fmt::Display for Coordinator<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Coordinator(agents: {}, best: {}, stagnation: {})",
            self.registry.len(),
            self.current_best.score(),
            self.rounds_not_improving
        )
    }
}

/// Builder for `Coordinator`.
pub struct CoordinatorBuilder<T>
where
    T: SolverNumeric,
{
    evaluator: Evaluator<T>,
    registry: HeuristicRegistry<T>,
    config: CoordinatorConfig,
    initial_solution: Option<Knapsack<T>>,
}

impl<T> CoordinatorBuilder<T>
where
    T: SolverNumeric,
{
    /// Creates a builder for `model` with a fresh evaluation counter, the
    /// default registry and the default configuration.
    #[inline]
    pub fn new(model: Model<T>) -> Self {
        Self::from_evaluator(Evaluator::new(model))
    }

    /// Creates a builder that evaluates through `evaluator`.
    #[inline]
    pub fn from_evaluator(evaluator: Evaluator<T>) -> Self {
        Self {
            evaluator,
            registry: HeuristicRegistry::default(),
            config: CoordinatorConfig::default(),
            initial_solution: None,
        }
    }

    #[inline]
    pub fn with_registry(mut self, registry: HeuristicRegistry<T>) -> Self {
        self.registry = registry;
        self
    }

    #[inline]
    pub fn with_config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    #[inline]
    pub fn with_execution_mode(mut self, execution: ExecutionMode) -> Self {
        self.config.execution = execution;
        self
    }

    /// Sets the closed range of heuristic applications per agent round.
    #[inline]
    pub fn with_iteration_range(mut self, min: usize, max: usize) -> Self {
        self.config.min_iterations = min;
        self.config.max_iterations = max;
        self
    }

    #[inline]
    pub fn with_worse_than_best_threshold(mut self, threshold: f64) -> Self {
        self.config.worse_than_best_threshold = threshold;
        self
    }

    #[inline]
    pub fn with_max_rounds_without_improvement(mut self, rounds: u64) -> Self {
        self.config.max_rounds_without_improvement = rounds;
        self
    }

    /// Starts the seeding round from `solution` instead of the empty knapsack.
    #[inline]
    pub fn with_initial_solution(mut self, solution: Knapsack<T>) -> Self {
        self.initial_solution = Some(solution);
        self
    }

    /// Validates the setup and runs the seeding round.
    pub fn build(self) -> Result<Coordinator<T>, CoordinatorError> {
        self.config.validate()?;
        if self.registry.is_empty() {
            return Err(CoordinatorError::EmptyRegistry);
        }

        let num_items = self.evaluator.model().num_items();
        let initial_solution = match self.initial_solution {
            Some(solution) => {
                if !solution.is_feasible(self.evaluator.model()) {
                    return Err(CoordinatorError::InfeasibleInitialSolution);
                }
                solution
            }
            None => Knapsack::empty(num_items),
        };

        let mut coordinator = Coordinator {
            evaluator: self.evaluator,
            registry: self.registry,
            rng: ChaCha8Rng::seed_from_u64(self.config.seed),
            config: self.config,
            current_best: initial_solution.clone(),
            initial_solution,
            agents: Vec::new(),
            rounds_not_improving: 0,
            rounds: 0,
            improvements: 0,
            redirections: 0,
        };
        coordinator.initialize();
        Ok(coordinator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixedbitset::FixedBitSet;
    use satchel_heuristics::{
        heuristic::Heuristic,
        registry::{FnHeuristicFactory, HeuristicKind},
    };
    use satchel_model::{index::ItemIndex, model::ModelBuilder};
    use satchel_search::{
        monitor::{
            composite::CompositeMonitor, interrupt::InterruptMonitor, no_op::NoOpMonitor,
            round_limit::RoundLimitMonitor,
        },
        stats::HybridStatistics,
    };
    use std::sync::atomic::AtomicBool;

    /// Evaluates the empty knapsack on every call.
    struct Emptier;

    impl Heuristic<i64> for Emptier {
        fn name(&self) -> &str {
            "Emptier"
        }

        fn execute_once(&mut self, evaluator: &Evaluator<i64>, current: &Knapsack<i64>) -> Knapsack<i64> {
            evaluator.evaluate(FixedBitSet::with_capacity(current.num_items()))
        }
    }

    /// Returns its input without evaluating.
    struct Stay;

    impl Heuristic<i64> for Stay {
        fn name(&self) -> &str {
            "Stay"
        }

        fn execute_once(&mut self, _evaluator: &Evaluator<i64>, current: &Knapsack<i64>) -> Knapsack<i64> {
            current.clone()
        }
    }

    #[derive(Default)]
    struct RecordingMonitor {
        entered: bool,
        best_scores: Vec<i64>,
        new_bests: Vec<i64>,
        reports: Vec<RoundReport<i64>>,
        statistics: Option<HybridStatistics>,
    }

    impl SearchMonitor<i64> for RecordingMonitor {
        fn name(&self) -> &str {
            "RecordingMonitor"
        }

        fn on_enter_search(&mut self, _model: &Model<i64>, best: &Knapsack<i64>) {
            self.entered = true;
            self.best_scores.push(best.score());
        }

        fn on_round(&mut self, report: &RoundReport<i64>) {
            self.best_scores.push(report.best_score);
            self.reports.push(report.clone());
        }

        fn on_new_best(&mut self, best: &Knapsack<i64>) {
            self.new_bests.push(best.score());
        }

        fn on_exit_search(&mut self, _best: &Knapsack<i64>, statistics: &HybridStatistics) {
            self.statistics = Some(statistics.clone());
        }

        fn search_command(&self) -> SearchCommand {
            SearchCommand::Continue
        }
    }

    fn emptier_factory() -> FnHeuristicFactory<i64, impl Fn(u64) -> Box<dyn Heuristic<i64>> + Send + Sync> {
        FnHeuristicFactory::new("Emptier", |_seed: u64| -> Box<dyn Heuristic<i64>> { Box::new(Emptier) })
    }

    fn stay_factory() -> FnHeuristicFactory<i64, impl Fn(u64) -> Box<dyn Heuristic<i64>> + Send + Sync> {
        FnHeuristicFactory::new("Stay", |_seed: u64| -> Box<dyn Heuristic<i64>> { Box::new(Stay) })
    }

    // Greedy fill takes items 3, 1 and 4 for value 105, which is also optimal.
    fn small_model() -> Model<i64> {
        let mut builder = ModelBuilder::new(5, 10);
        for (i, &(value, weight)) in [(10, 5), (40, 4), (30, 6), (50, 3), (15, 2)].iter().enumerate() {
            builder.set_item(ItemIndex::new(i), value, weight);
        }
        builder.build()
    }

    fn random_model(num_items: usize, seed: u64) -> Model<i64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let items: Vec<(i64, i64)> = (0..num_items)
            .map(|_| (rng.random_range(1..=100), rng.random_range(1..=40)))
            .collect();
        let capacity = items.iter().map(|&(_, w)| w).sum::<i64>() / 3;

        let mut builder = ModelBuilder::new(num_items, capacity);
        for (i, &(value, weight)) in items.iter().enumerate() {
            builder.set_item(ItemIndex::new(i), value, weight);
        }
        builder.build()
    }

    fn quick(model: Model<i64>) -> CoordinatorBuilder<i64> {
        CoordinatorBuilder::new(model)
            .with_iteration_range(5, 10)
            .with_max_rounds_without_improvement(20)
            .with_seed(7)
    }

    #[test]
    fn test_initialize_adopts_greedy_round() {
        let coordinator = quick(small_model()).build().unwrap();

        let baseline = Greedy::new().execute_once(&Evaluator::new(small_model()), &Knapsack::empty(5));
        assert_eq!(baseline.score(), 105);
        assert_eq!(coordinator.current_best(), &baseline);
        assert_eq!(coordinator.rounds_not_improving(), 0);
        assert!(!coordinator.has_finished());
        assert!((5..=10).contains(&(coordinator.evaluator().evaluations() as usize)));
        assert!(coordinator.agents().is_empty());
    }

    #[test]
    fn test_initialize_starts_from_initial_solution() {
        let evaluator = Evaluator::new(small_model());
        let mut selection = FixedBitSet::with_capacity(5);
        selection.insert(2);
        let initial = evaluator.evaluate(selection);

        let coordinator = CoordinatorBuilder::from_evaluator(evaluator)
            .with_iteration_range(1, 1)
            .with_initial_solution(initial.clone())
            .build()
            .unwrap();

        // Item 2 stays in and only item 3 still fits next to it.
        assert_eq!(coordinator.initial_solution(), &initial);
        assert!(coordinator.current_best().contains(ItemIndex::new(2)));
        assert!(coordinator.current_best().contains(ItemIndex::new(3)));
        assert_eq!(coordinator.current_best().score(), 80);
        assert_eq!(coordinator.evaluator().evaluations(), 2);
    }

    #[test]
    fn test_initialize_never_lowers_best() {
        let mut coordinator = quick(random_model(60, 3)).build().unwrap();
        let seeded = coordinator.current_best().score();
        let solved = coordinator.solve_with_monitor(NoOpMonitor::new()).score();
        assert!(solved >= seeded);

        coordinator.initialize();
        assert_eq!(coordinator.current_best().score(), solved);
    }

    #[test]
    #[should_panic(expected = "called `ModelBuilder::build` with item totals that overflow")]
    fn test_rejects_model_with_overflowing_totals() {
        let mut builder = ModelBuilder::<i32>::new(3, 10);
        for i in 0..3 {
            builder.set_item(ItemIndex::new(i), 1_000_000_000, 1);
        }
        let _ = CoordinatorBuilder::new(builder.build()).with_iteration_range(1, 1).build();
    }

    #[test]
    fn test_solves_model_at_type_limit() {
        let mut builder = ModelBuilder::<i32>::new(3, 10);
        builder.set_item(ItemIndex::new(0), 1_000_000_000, 4);
        builder.set_item(ItemIndex::new(1), 1_000_000_000, 4);
        builder.set_item(ItemIndex::new(2), 147_483_647, 4);

        let mut coordinator = CoordinatorBuilder::new(builder.build())
            .with_iteration_range(5, 10)
            .with_max_rounds_without_improvement(5)
            .with_seed(7)
            .build()
            .unwrap();
        let outcome = coordinator.solve_with_monitor(NoOpMonitor::new());

        assert_eq!(outcome.score(), 2_000_000_000);
        assert!(outcome.best.is_feasible(coordinator.model()));
    }

    #[test]
    fn test_end_to_end_small_instance() {
        let mut coordinator = quick(small_model()).build().unwrap();
        let outcome = coordinator.solve_with_monitor(NoOpMonitor::new());

        assert!(outcome.is_stagnated());
        assert!(outcome.score() >= 105);
        assert!(outcome.best.is_feasible(coordinator.model()));
        assert_eq!(outcome.statistics.agents, 3);
        assert!(outcome.statistics.rounds >= 21);
        assert!(coordinator.has_finished());
    }

    #[test]
    fn test_end_to_end_default_configuration() {
        let mut coordinator = CoordinatorBuilder::new(small_model()).build().unwrap();
        let outcome = coordinator.solve();

        assert_eq!(outcome.reason, TerminationReason::Stagnated);
        assert_eq!(outcome.score(), 105);
        assert!(outcome.best.is_feasible(coordinator.model()));
        assert_eq!(coordinator.rounds_not_improving(), 1001);
        assert_eq!(outcome.statistics.evaluations, coordinator.evaluator().evaluations());
    }

    #[test]
    fn test_best_score_is_monotonic() {
        let mut coordinator = quick(random_model(60, 3)).build().unwrap();
        let mut monitor = RecordingMonitor::default();
        let outcome = coordinator.solve_with_monitor(&mut monitor);

        assert!(monitor.entered);
        assert!(monitor.best_scores.windows(2).all(|w| w[0] <= w[1]));
        assert!(monitor.new_bests.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(monitor.best_scores.last(), Some(&outcome.score()));
        assert_eq!(monitor.reports.len() as u64, outcome.statistics.rounds);
        assert_eq!(monitor.new_bests.len() as u64, outcome.statistics.improvements);
        assert_eq!(monitor.statistics.as_ref(), Some(&outcome.statistics));

        for (i, report) in monitor.reports.iter().enumerate() {
            assert_eq!(report.round, i as u64 + 1);
            assert_eq!(report.agents.len(), 3);
            assert!(report.agents.iter().all(|agent| agent.score <= report.best_score));
        }
    }

    #[test]
    fn test_stagnation_ends_after_threshold_plus_one_rounds() {
        let mut coordinator = quick(small_model())
            .with_registry(HeuristicRegistry::new().with(stay_factory()))
            .with_max_rounds_without_improvement(4)
            .build()
            .unwrap();
        let outcome = coordinator.solve_with_monitor(NoOpMonitor::new());

        assert!(outcome.is_stagnated());
        assert_eq!(outcome.statistics.rounds, 5);
        assert_eq!(outcome.statistics.improvements, 0);
        assert_eq!(outcome.score(), 105);
    }

    #[test]
    fn test_has_finished_boundary() {
        let mut coordinator = quick(small_model())
            .with_max_rounds_without_improvement(10)
            .build()
            .unwrap();

        coordinator.rounds_not_improving = 9;
        assert!(!coordinator.has_finished());
        coordinator.rounds_not_improving = 10;
        assert!(!coordinator.has_finished());
        coordinator.rounds_not_improving = 11;
        assert!(coordinator.has_finished());
    }

    #[test]
    fn test_redirection_postcondition() {
        let registry = HeuristicRegistry::from_kinds(&[HeuristicKind::LocalSearch]).with(emptier_factory());
        let mut coordinator = quick(small_model()).with_registry(registry).build().unwrap();
        coordinator.create_agents();

        let threshold = coordinator.config().worse_than_best_threshold;
        let mut total = 0;
        for _ in 0..10 {
            coordinator.run_agents_once();
            coordinator.update_current_best();
            total += coordinator.redirect_agents();

            let best = coordinator.current_best().clone();
            for agent in coordinator.agents() {
                assert!(agent.current_solution().relative_gap(&best) <= threshold);
            }
        }
        // The emptier falls to zero every round and is reset every round.
        assert!(total >= 10);
        assert_eq!(coordinator.redirections, total as u64);
    }

    #[test]
    fn test_update_current_best_counts_stagnation() {
        let registry = HeuristicRegistry::new().with(emptier_factory());
        let mut coordinator = quick(small_model()).with_registry(registry).build().unwrap();
        coordinator.create_agents();

        for expected in 1..=3 {
            coordinator.run_agents_once();
            assert!(!coordinator.update_current_best());
            assert_eq!(coordinator.rounds_not_improving(), expected);
        }
        assert_eq!(coordinator.current_best().score(), 105);
    }

    #[test]
    fn test_redirected_agent_keeps_previous_state() {
        let registry = HeuristicRegistry::new().with(emptier_factory());
        let mut coordinator = quick(small_model())
            .with_iteration_range(3, 3)
            .with_registry(registry)
            .build()
            .unwrap();
        coordinator.create_agents();

        coordinator.run_agents_once();
        coordinator.update_current_best();
        let agent = &coordinator.agents()[0];
        let (previous_ts, current_ts) = (agent.previous_timestamp(), agent.current_timestamp());
        assert_eq!(current_ts - previous_ts, 3);
        assert_eq!(agent.current_score(), 0);
        assert_eq!(agent.improvement_ratio(), -105.0 / 3.0);

        assert_eq!(coordinator.redirect_agents(), 1);

        // The ratio now spans the reset: the round's loss is no longer visible.
        let agent = &coordinator.agents()[0];
        assert_eq!(agent.current_score(), 105);
        assert_eq!(agent.previous_solution().score(), 105);
        assert_eq!(agent.previous_timestamp(), previous_ts);
        assert_eq!(agent.current_timestamp(), current_ts);
        assert_eq!(agent.improvement_ratio(), 0.0);
    }

    fn best_score_sequence(mode: ExecutionMode, seed: u64) -> (Vec<i64>, Vec<Vec<i64>>, Knapsack<i64>) {
        let mut coordinator = quick(random_model(80, 11))
            .with_seed(seed)
            .with_execution_mode(mode)
            .build()
            .unwrap();
        let mut monitor = RecordingMonitor::default();
        let outcome = coordinator.solve_with_monitor(&mut monitor);

        let agent_scores = monitor
            .reports
            .iter()
            .map(|report| report.agents.iter().map(|agent| agent.score).collect())
            .collect();
        (monitor.best_scores, agent_scores, outcome.best)
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let first = best_score_sequence(ExecutionMode::Sequential, 99);
        let second = best_score_sequence(ExecutionMode::Sequential, 99);
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = best_score_sequence(ExecutionMode::Sequential, 5);
        let parallel = best_score_sequence(ExecutionMode::Parallel, 5);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_interrupt_aborts_before_first_round() {
        let mut coordinator = quick(small_model()).build().unwrap();
        let stop = AtomicBool::new(true);
        let outcome = coordinator.solve_with_monitor(InterruptMonitor::new(&stop));

        assert_eq!(
            outcome.reason,
            TerminationReason::Aborted("Interrupt signal received".to_string())
        );
        assert_eq!(outcome.statistics.rounds, 0);
        assert_eq!(outcome.score(), 105);
    }

    #[test]
    fn test_round_limit_through_composite() {
        let mut coordinator = quick(random_model(40, 1))
            .with_max_rounds_without_improvement(1_000_000)
            .build()
            .unwrap();
        let mut recording = RecordingMonitor::default();
        let mut monitor = CompositeMonitor::<i64>::new();
        monitor.add_monitor(RoundLimitMonitor::new(3));
        monitor.add_monitor(&mut recording);
        let outcome = coordinator.solve_with_monitor(monitor);

        assert!(outcome.is_aborted());
        assert_eq!(outcome.statistics.rounds, 3);
        assert_eq!(coordinator.rounds(), 3);
        assert_eq!(recording.reports.len(), 3);
    }

    #[test]
    fn test_report_lists_agents() {
        let mut coordinator = quick(small_model()).build().unwrap();
        assert!(coordinator.report().agents.is_empty());

        coordinator.solve_with_monitor(NoOpMonitor::new());
        let report = coordinator.report();
        assert_eq!(report.best_score, 105);
        assert_eq!(report.best_weight, 9);
        assert_eq!(
            report.agents.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
            vec!["LocalSearch", "SimulatedAnnealing", "TabuSearch"]
        );
        assert_eq!(report.rounds_without_improvement, 21);
    }

    #[test]
    fn test_builder_errors() {
        let result = quick(small_model()).with_registry(HeuristicRegistry::new()).build();
        assert_eq!(result.err(), Some(CoordinatorError::EmptyRegistry));

        let result = quick(small_model()).with_iteration_range(0, 4).build();
        assert_eq!(
            result.err(),
            Some(CoordinatorError::InvalidConfig(ConfigError::ZeroMinIterations))
        );

        let result = quick(small_model()).with_worse_than_best_threshold(f64::NAN).build();
        assert!(matches!(
            result.err(),
            Some(CoordinatorError::InvalidConfig(ConfigError::InvalidThreshold(_)))
        ));

        let result = quick(small_model()).with_initial_solution(Knapsack::empty(4)).build();
        assert_eq!(result.err(), Some(CoordinatorError::InfeasibleInitialSolution));
    }

    #[test]
    fn test_error_source() {
        use std::error::Error;
        let error = CoordinatorError::from(ConfigError::ZeroMinIterations);
        assert!(error.source().is_some());
        assert!(CoordinatorError::EmptyRegistry.source().is_none());
        assert_eq!(
            format!("{}", error),
            "Invalid configuration: Minimum iterations per round must be positive"
        );
    }
}
