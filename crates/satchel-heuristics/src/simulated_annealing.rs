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

//! Simulated Annealing heuristic.
//!
//! Each call evaluates one random one-flip neighbor. A neighbor that is at
//! least as good as the current knapsack is always taken. A worse neighbor is
//! taken with the Metropolis probability `exp(-(current - candidate) / T)`,
//! where the temperature `T` is managed by a pluggable `CoolingSchedule` and
//! decays once per call, accepted or not. When the schedule reports a frozen
//! state the heuristic only takes non-worsening moves. `reset` re-heats the
//! schedule to its initial temperature.
//!
//! Scores are converted to `f64` for the probability. A non-finite
//! probability, or a temperature too close to zero, rejects the move.

use crate::{heuristic::Heuristic, neighborhood::random_flip};
use rand::Rng;
use satchel_core::num::{SolverNumeric, to_f64};
use satchel_model::{eval::Evaluator, knapsack::Knapsack};

/// Defines the thermodynamics of the annealing process.
///
/// Implementors control the initial temperature, the decay function, and the
/// "frozen" condition where the search reverts to a hill climber.
pub trait CoolingSchedule: Send + Sync + std::fmt::Debug {
    /// Resets the temperature to its initial state.
    fn on_start(&mut self);

    /// Updates the temperature for the next call.
    fn update(&mut self);

    /// Returns the current temperature ($T$).
    fn current(&self) -> f64;

    /// Returns `true` if the temperature is low enough to stop accepting worsening moves.
    fn is_frozen(&self) -> bool;
}

/// A geometric cooling schedule: $T_{k+1} = T_k \times \alpha$.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricCooling {
    initial: f64,
    current: f64,
    alpha: f64, // The decay rate (e.g., 0.995)
    min_temp: f64,
}

impl GeometricCooling {
    /// Creates a new geometric cooling schedule.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not strictly between `0.0` and `1.0`.
    #[inline]
    pub fn new(initial: f64, alpha: f64, min_temp: f64) -> Self {
        assert!(
            alpha > 0.0 && alpha < 1.0,
            "called `GeometricCooling::new()` with invalid alpha: {}. Must be in (0.0, 1.0)",
            alpha
        );
        Self {
            initial,
            current: initial,
            alpha,
            min_temp,
        }
    }
}

impl Default for GeometricCooling {
    fn default() -> Self {
        Self::new(10.0, 0.999, 1e-3)
    }
}

impl CoolingSchedule for GeometricCooling {
    #[inline]
    fn on_start(&mut self) {
        self.current = self.initial;
    }

    #[inline]
    fn update(&mut self) {
        self.current *= self.alpha;
    }

    #[inline]
    fn current(&self) -> f64 {
        self.current
    }

    #[inline]
    fn is_frozen(&self) -> bool {
        self.current <= self.min_temp
    }
}

/// A linear cooling schedule: $T_{k+1} = \max(0, T_k - \delta)$.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearCooling {
    initial: f64,
    current: f64,
    decrement: f64,
    min_temp: f64,
}

impl LinearCooling {
    /// Creates a new linear cooling schedule.
    ///
    /// # Panics
    ///
    /// Panics if `decrement` is negative.
    #[inline]
    pub fn new(initial: f64, decrement: f64, min_temp: f64) -> Self {
        assert!(
            decrement >= 0.0,
            "called `LinearCooling::new()` with negative decrement: {}",
            decrement
        );
        Self {
            initial,
            current: initial,
            decrement,
            min_temp,
        }
    }
}

impl CoolingSchedule for LinearCooling {
    #[inline]
    fn on_start(&mut self) {
        self.current = self.initial;
    }

    #[inline]
    fn update(&mut self) {
        self.current = (self.current - self.decrement).max(0.0);
    }

    #[inline]
    fn current(&self) -> f64 {
        self.current
    }

    #[inline]
    fn is_frozen(&self) -> bool {
        self.current <= self.min_temp
    }
}

/// A Simulated Annealing heuristic powered by a pluggable `CoolingSchedule`.
///
/// It uses the **Metropolis Criterion** to decide whether to take a worse neighbor:
/// $$ P(\text{accept}) = \exp\left(\frac{-(S_{\text{old}} - S_{\text{new}})}{T}\right) $$
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing<R, C> {
    cooling_schedule: C,
    rng: R,
}

impl<R, C> SimulatedAnnealing<R, C>
where
    R: Rng,
    C: CoolingSchedule,
{
    /// Creates a new Simulated Annealing instance.
    ///
    /// The schedule is reset to its initial temperature.
    #[inline]
    pub fn new(mut cooling_schedule: C, rng: R) -> Self {
        cooling_schedule.on_start();
        Self {
            cooling_schedule,
            rng,
        }
    }

    /// Returns the cooling schedule.
    #[inline]
    pub fn cooling_schedule(&self) -> &C {
        &self.cooling_schedule
    }

    fn should_accept<T>(&mut self, current: &Knapsack<T>, candidate: &Knapsack<T>) -> bool
    where
        T: SolverNumeric,
    {
        if candidate.score() >= current.score() {
            return true;
        }

        if self.cooling_schedule.is_frozen() {
            return false;
        }

        let temperature = self.cooling_schedule.current();
        if temperature <= 1e-9 {
            return false;
        }

        let loss = to_f64(current.score()) - to_f64(candidate.score());
        let acceptance_probability = (-loss / temperature).exp();
        if !acceptance_probability.is_finite() {
            return false;
        }

        self.rng.random_bool(acceptance_probability.clamp(0.0, 1.0))
    }
}

impl<T, R, C> Heuristic<T> for SimulatedAnnealing<R, C>
where
    T: SolverNumeric,
    R: Rng + Send,
    C: CoolingSchedule,
{
    fn name(&self) -> &str {
        "SimulatedAnnealing"
    }

    fn execute_once(&mut self, evaluator: &Evaluator<T>, current: &Knapsack<T>) -> Knapsack<T> {
        if current.num_items() == 0 {
            return current.clone();
        }

        let (_, candidate) = random_flip(&mut self.rng, evaluator, current);
        let accepted = self.should_accept(current, &candidate);
        // Time passes regardless of the outcome.
        self.cooling_schedule.update();

        if accepted {
            candidate
        } else {
            current.clone()
        }
    }

    #[inline]
    fn reset(&mut self) {
        self.cooling_schedule.on_start();
    }
}
