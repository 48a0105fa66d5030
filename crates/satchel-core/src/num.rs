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

//! # Solver Numeric Trait
//!
//! Unified numeric bounds for the model, the heuristics and the coordinator.
//! Values, weights and capacities are integers; every component is generic
//! over the concrete width so callers can trade range for cache footprint.
//!
//! `PrimInt` brings checked arithmetic; model construction uses it to reject
//! instances whose total value or total weight overflows the chosen width.
//! Every partial sum the fitness layer forms afterwards is bounded by those
//! totals, so it adds with plain `+`. Conversions to
//! `f64` (through `ToPrimitive`) are needed for relative gaps, improvement
//! ratios and annealing probabilities.
//!
//! Note: `i128` is intentionally excluded; it is significantly slower on many
//! platforms and knapsack totals never need that range in practice.

use num_traits::{FromPrimitive, PrimInt, Signed, ToPrimitive};
use std::hash::Hash;

/// A trait alias for the integer types a knapsack instance can be expressed in.
///
/// These are the signed integer types `i8`, `i16`, `i32`, `i64` and `isize`.
pub trait SolverNumeric:
    PrimInt
    + Signed
    + FromPrimitive
    + ToPrimitive
    + std::fmt::Debug
    + std::fmt::Display
    + std::iter::Sum
    + Send
    + Sync
    + Hash
    + 'static
{
}

impl<T> SolverNumeric for T where
    T: PrimInt
        + Signed
        + FromPrimitive
        + ToPrimitive
        + std::fmt::Debug
        + std::fmt::Display
        + std::iter::Sum
        + Send
        + Sync
        + Hash
        + 'static
{
}

/// Converts a solver numeric into `f64`, mapping unrepresentable values to `0.0`.
///
/// Every primitive signed integer converts, so the fallback only guards against
/// exotic `SolverNumeric` implementations.
#[inline]
pub fn to_f64<T>(value: T) -> f64
where
    T: SolverNumeric,
{
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_solver_numeric<T: SolverNumeric>() {}

    #[test]
    fn test_signed_primitives_are_solver_numeric() {
        assert_solver_numeric::<i8>();
        assert_solver_numeric::<i16>();
        assert_solver_numeric::<i32>();
        assert_solver_numeric::<i64>();
        assert_solver_numeric::<isize>();
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(to_f64(42_i64), 42.0);
        assert_eq!(to_f64(-3_i16), -3.0);
        assert_eq!(to_f64(i32::MAX), i32::MAX as f64);
    }
}
