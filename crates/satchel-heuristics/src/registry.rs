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

//! An enumerable registry of heuristic constructors.
//!
//! The coordinator creates one agent per registry entry without knowing the
//! concrete heuristic types. Each entry is a named `HeuristicFactory` that
//! produces a fresh, independently seeded heuristic on demand. The built-in
//! variants are described by the closed `HeuristicKind` enum; anything else can
//! be registered through `FnHeuristicFactory` or a custom factory type.

use crate::{
    greedy::Greedy,
    heuristic::Heuristic,
    local_search::LocalSearch,
    simulated_annealing::{GeometricCooling, SimulatedAnnealing},
    tabu_search::TabuSearch,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use satchel_core::num::SolverNumeric;

/// The default tenure of registry-built `TabuSearch` instances.
pub const DEFAULT_TABU_TENURE: usize = 5;

/// Produces fresh heuristic instances.
pub trait HeuristicFactory<T>: Send + Sync
where
    T: SolverNumeric,
{
    /// Returns the name of the heuristics this factory produces.
    fn name(&self) -> &str;

    /// Creates a new heuristic whose randomness is derived from `seed`.
    fn make(&self, seed: u64) -> Box<dyn Heuristic<T>>;
}

impl<T> std::fmt::Debug for dyn HeuristicFactory<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HeuristicFactory {{ name: {} }}", self.name())
    }
}

/// The built-in heuristic variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeuristicKind {
    Greedy,
    LocalSearch,
    SimulatedAnnealing,
    TabuSearch,
}

impl HeuristicKind {
    /// Every built-in variant.
    pub const ALL: [HeuristicKind; 4] = [
        HeuristicKind::Greedy,
        HeuristicKind::LocalSearch,
        HeuristicKind::SimulatedAnnealing,
        HeuristicKind::TabuSearch,
    ];

    /// The variants that improve an existing knapsack. `Greedy` only seeds a run.
    pub const SEARCH: [HeuristicKind; 3] = [
        HeuristicKind::LocalSearch,
        HeuristicKind::SimulatedAnnealing,
        HeuristicKind::TabuSearch,
    ];

    /// Returns the name of the variant.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            HeuristicKind::Greedy => "Greedy",
            HeuristicKind::LocalSearch => "LocalSearch",
            HeuristicKind::SimulatedAnnealing => "SimulatedAnnealing",
            HeuristicKind::TabuSearch => "TabuSearch",
        }
    }

    /// Looks a variant up by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| HeuristicKind::name(*kind).eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", HeuristicKind::name(*self))
    }
}

impl<T> HeuristicFactory<T> for HeuristicKind
where
    T: SolverNumeric,
{
    #[inline]
    fn name(&self) -> &str {
        HeuristicKind::name(*self)
    }

    fn make(&self, seed: u64) -> Box<dyn Heuristic<T>> {
        let rng = ChaCha8Rng::seed_from_u64(seed);
        match self {
            HeuristicKind::Greedy => Box::new(Greedy::new()),
            HeuristicKind::LocalSearch => Box::new(LocalSearch::new(rng)),
            HeuristicKind::SimulatedAnnealing => {
                Box::new(SimulatedAnnealing::new(GeometricCooling::default(), rng))
            }
            HeuristicKind::TabuSearch => Box::new(TabuSearch::<T, _>::new(DEFAULT_TABU_TENURE, rng)),
        }
    }
}

/// A factory backed by a closure.
pub struct FnHeuristicFactory<T, F> {
    name: String,
    func: F,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T, F> FnHeuristicFactory<T, F>
where
    T: SolverNumeric,
    F: Fn(u64) -> Box<dyn Heuristic<T>> + Send + Sync,
{
    #[inline]
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T, F> HeuristicFactory<T> for FnHeuristicFactory<T, F>
where
    T: SolverNumeric,
    F: Fn(u64) -> Box<dyn Heuristic<T>> + Send + Sync,
{
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn make(&self, seed: u64) -> Box<dyn Heuristic<T>> {
        (self.func)(seed)
    }
}

/// An ordered set of uniquely named heuristic factories.
///
/// The iteration order is the registration order, which fixes the order in
/// which agents are created and stepped.
pub struct HeuristicRegistry<T>
where
    T: SolverNumeric,
{
    entries: Vec<Box<dyn HeuristicFactory<T>>>,
}

impl<T> Default for HeuristicRegistry<T>
where
    T: SolverNumeric,
{
    /// Registers every `HeuristicKind::SEARCH` variant.
    fn default() -> Self {
        Self::from_kinds(&HeuristicKind::SEARCH)
    }
}

impl<T> HeuristicRegistry<T>
where
    T: SolverNumeric,
{
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a registry holding the given built-in variants in order.
    ///
    /// # Panics
    ///
    /// Panics if `kinds` contains a variant twice.
    pub fn from_kinds(kinds: &[HeuristicKind]) -> Self {
        let mut registry = Self::new();
        for &kind in kinds {
            registry.register(kind);
        }
        registry
    }

    /// Appends a factory.
    ///
    /// # Panics
    ///
    /// Panics if a factory with the same name is already registered.
    pub fn register<F>(&mut self, factory: F) -> &mut Self
    where
        F: HeuristicFactory<T> + 'static,
    {
        assert!(
            !self.contains(factory.name()),
            "called `HeuristicRegistry::register` with duplicate name: {}",
            factory.name()
        );
        self.entries.push(Box::new(factory));
        self
    }

    /// Appends a factory and returns the registry.
    ///
    /// # Panics
    ///
    /// Panics if a factory with the same name is already registered.
    #[inline]
    pub fn with<F>(mut self, factory: F) -> Self
    where
        F: HeuristicFactory<T> + 'static,
    {
        self.register(factory);
        self
    }

    /// Returns the number of registered factories.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no factory is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if a factory with this name is registered.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name() == name)
    }

    /// Returns an iterator over the factories in registration order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &dyn HeuristicFactory<T>> {
        self.entries.iter().map(|entry| entry.as_ref())
    }

    /// Returns the names of all factories in registration order.
    #[inline]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name()).collect()
    }
}

impl<T> std::fmt::Debug for HeuristicRegistry<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeuristicRegistry")
            .field("entries", &self.names())
            .finish()
    }
}

impl<T> std::fmt::Display for HeuristicRegistry<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HeuristicRegistry([{}])", self.names().join(", "))
    }
}
