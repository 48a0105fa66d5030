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

use crate::index::ItemIndex;
use satchel_core::num::{SolverNumeric, to_f64};

/// An immutable 0/1 knapsack instance.
///
/// This struct holds all pre-validated, queryable data:
/// - `values[item]`: the profit of packing the item.
/// - `weights[item]`: the strictly positive weight of the item.
/// - `ratio_order`: every item sorted by descending value/weight ratio, ties broken by
///   ascending index. Constructive heuristics and the repair step walk this order.
///
/// Construction:
/// - Use `ModelBuilder` and call `ModelBuilder::build` to obtain a validated `Model`.
///
/// Invariant: the sum of all values and the sum of all weights fit into `T`.
/// Every partial sum of non-negative items is bounded by these totals, so
/// scores and weights of any selection can be accumulated with plain addition.
#[derive(Clone, PartialEq, Eq)]
pub struct Model<T>
where
    T: SolverNumeric,
{
    capacity: T,
    values: Vec<T>,              // len = num_items
    weights: Vec<T>,             // len = num_items
    ratio_order: Vec<ItemIndex>, // len = num_items
}

impl<T> Model<T>
where
    T: SolverNumeric,
{
    /// Returns the number of items in the model.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use satchel_model::model::ModelBuilder;
    ///
    /// let model = ModelBuilder::<i64>::new(5, 10).build();
    /// assert_eq!(model.num_items(), 5);
    /// ```
    #[inline]
    pub fn num_items(&self) -> usize {
        self.values.len()
    }

    /// Returns the capacity of the knapsack.
    #[inline]
    pub fn capacity(&self) -> T {
        self.capacity
    }

    /// Returns a slice of all item values.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Returns a slice of all item weights.
    #[inline]
    pub fn weights(&self) -> &[T] {
        &self.weights
    }

    /// Returns the value of the specified item.
    ///
    /// # Panics
    ///
    /// Panics if `item_index` is not in `0..num_items()`.
    #[inline]
    pub fn item_value(&self, item_index: ItemIndex) -> T {
        let index = item_index.get();
        debug_assert!(
            index < self.num_items(),
            "called `Model::item_value` with item index out of bounds: the len is {} but the index is {}",
            self.num_items(),
            index
        );

        self.values[index]
    }

    /// Returns the weight of the specified item.
    ///
    /// # Panics
    ///
    /// Panics if `item_index` is not in `0..num_items()`.
    #[inline]
    pub fn item_weight(&self, item_index: ItemIndex) -> T {
        let index = item_index.get();
        debug_assert!(
            index < self.num_items(),
            "called `Model::item_weight` with item index out of bounds: the len is {} but the index is {}",
            self.num_items(),
            index
        );

        self.weights[index]
    }

    /// Returns the value/weight ratio of the specified item.
    #[inline]
    pub fn item_ratio(&self, item_index: ItemIndex) -> f64 {
        ratio(self.item_value(item_index), self.item_weight(item_index))
    }

    /// Returns all items sorted by descending value/weight ratio.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use satchel_model::model::ModelBuilder;
    /// # use satchel_model::index::ItemIndex;
    ///
    /// let mut builder = ModelBuilder::<i64>::new(2, 10);
    /// builder.set_item(ItemIndex::new(0), 1, 1);
    /// builder.set_item(ItemIndex::new(1), 6, 2);
    /// let model = builder.build();
    /// assert_eq!(model.items_by_ratio(), &[ItemIndex::new(1), ItemIndex::new(0)]);
    /// ```
    #[inline]
    pub fn items_by_ratio(&self) -> &[ItemIndex] {
        &self.ratio_order
    }

    /// Returns the sum of all item values, an upper bound on any score.
    #[inline]
    pub fn total_value(&self) -> T {
        self.values.iter().copied().sum()
    }

    /// Returns the sum of all item weights.
    #[inline]
    pub fn total_weight(&self) -> T {
        self.weights.iter().copied().sum()
    }

    /// Returns an iterator over all item indices in ascending order.
    #[inline]
    pub fn items(&self) -> impl Iterator<Item = ItemIndex> {
        ItemIndex::range(self.num_items())
    }
}

#[inline]
fn checked_sum<T>(items: &[T]) -> Option<T>
where
    T: SolverNumeric,
{
    items
        .iter()
        .try_fold(T::zero(), |acc, &item| acc.checked_add(&item))
}

#[inline(always)]
fn ratio<T>(value: T, weight: T) -> f64
where
    T: SolverNumeric,
{
    to_f64(value) / to_f64(weight)
}

impl<T> std::fmt::Debug for Model<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("capacity", &self.capacity)
            .field("values", &self.values)
            .field("weights", &self.weights)
            .field("ratio_order", &self.ratio_order)
            .finish()
    }
}

impl<T> std::fmt::Display for Model<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Model(num_items: {}, capacity: {})",
            self.num_items(),
            self.capacity
        )
    }
}

/// A mutable builder for `Model`.
///
/// Items start with value `0` and weight `1`, so an unconfigured item is harmless:
/// it fits whenever the capacity allows but never improves a score.
#[derive(Clone)]
pub struct ModelBuilder<T>
where
    T: SolverNumeric,
{
    capacity: T,
    values: Vec<T>,
    weights: Vec<T>,
}

impl<T> ModelBuilder<T>
where
    T: SolverNumeric,
{
    /// Creates a new `ModelBuilder` for `num_items` items and the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is negative.
    pub fn new(num_items: usize, capacity: T) -> Self {
        assert!(
            capacity >= T::zero(),
            "called `ModelBuilder::new` with negative capacity: {}",
            capacity
        );

        Self {
            capacity,
            values: vec![T::zero(); num_items],
            weights: vec![T::one(); num_items],
        }
    }

    /// Returns the number of items.
    #[inline]
    pub fn num_items(&self) -> usize {
        self.values.len()
    }

    /// Returns the capacity.
    #[inline]
    pub fn capacity(&self) -> T {
        self.capacity
    }

    /// Sets value and weight of the specified item.
    ///
    /// # Panics
    ///
    /// Panics if `item_index` is out of bounds, if `value` is negative,
    /// or if `weight` is not strictly positive.
    #[inline]
    pub fn set_item(&mut self, item_index: ItemIndex, value: T, weight: T) -> &mut Self {
        let index = item_index.get();
        assert!(
            index < self.num_items(),
            "called `ModelBuilder::set_item` with item index out of bounds: the len is {} but the index is {}",
            self.num_items(),
            index
        );
        assert!(
            value >= T::zero(),
            "called `ModelBuilder::set_item` with negative value {} for item {}",
            value,
            index
        );
        assert!(
            weight > T::zero(),
            "called `ModelBuilder::set_item` with non-positive weight {} for item {}",
            weight,
            index
        );

        self.values[index] = value;
        self.weights[index] = weight;
        self
    }

    /// Appends a new item and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if `value` is negative or if `weight` is not strictly positive.
    #[inline]
    pub fn push_item(&mut self, value: T, weight: T) -> ItemIndex {
        let item_index = ItemIndex::new(self.num_items());
        self.values.push(T::zero());
        self.weights.push(T::one());
        self.set_item(item_index, value, weight);
        item_index
    }

    /// Returns the sums of all values and all weights, or `None` if either
    /// overflows `T`.
    pub fn checked_totals(&self) -> Option<(T, T)> {
        let total_value = checked_sum(&self.values)?;
        let total_weight = checked_sum(&self.weights)?;
        Some((total_value, total_weight))
    }

    /// Builds the `Model` from the current state of the `ModelBuilder`.
    ///
    /// # Panics
    ///
    /// Panics if the sum of all values or the sum of all weights overflows `T`.
    pub fn build(self) -> Model<T> {
        assert!(
            self.checked_totals().is_some(),
            "called `ModelBuilder::build` with item totals that overflow {}",
            std::any::type_name::<T>()
        );

        let mut ratio_order: Vec<ItemIndex> = (0..self.values.len()).map(ItemIndex::new).collect();
        // Stable sort keeps ascending index order among equal ratios.
        ratio_order.sort_by(|&a, &b| {
            let ra = ratio(self.values[a.get()], self.weights[a.get()]);
            let rb = ratio(self.values[b.get()], self.weights[b.get()]);
            rb.total_cmp(&ra)
        });

        Model {
            capacity: self.capacity,
            values: self.values,
            weights: self.weights,
            ratio_order,
        }
    }
}

impl<T> std::fmt::Debug for ModelBuilder<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBuilder")
            .field("capacity", &self.capacity)
            .field("values", &self.values)
            .field("weights", &self.weights)
            .finish()
    }
}

impl<T> std::fmt::Display for ModelBuilder<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ModelBuilder(num_items: {}, capacity: {})",
            self.num_items(),
            self.capacity
        )
    }
}
