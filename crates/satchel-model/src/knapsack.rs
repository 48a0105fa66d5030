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

use crate::{index::ItemIndex, model::Model};
use fixedbitset::FixedBitSet;
use satchel_core::num::{SolverNumeric, to_f64};

/// A candidate assignment of items to the knapsack.
///
/// A `Knapsack` is a value: it is never mutated after construction and
/// `Clone` produces a fully independent copy of the selection. Outside of
/// this crate, new values can only be obtained through the `Evaluator`
/// (or `Knapsack::empty`), so every stored knapsack respects the capacity
/// of the model it was evaluated against.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Knapsack<T> {
    selection: FixedBitSet,
    value: T,
    weight: T,
}

impl<T> Knapsack<T>
where
    T: SolverNumeric,
{
    /// Creates an empty knapsack with `num_items` unselected items.
    ///
    /// The empty selection is feasible for every model, so no evaluation is needed.
    #[inline]
    pub fn empty(num_items: usize) -> Self {
        Self {
            selection: FixedBitSet::with_capacity(num_items),
            value: T::zero(),
            weight: T::zero(),
        }
    }

    #[inline]
    pub(crate) fn from_parts(selection: FixedBitSet, value: T, weight: T) -> Self {
        Self {
            selection,
            value,
            weight,
        }
    }

    /// Returns the fitness of this knapsack, the total value of the selected items.
    #[inline]
    pub fn score(&self) -> T {
        self.value
    }

    /// Returns the total weight of the selected items.
    #[inline]
    pub fn weight(&self) -> T {
        self.weight
    }

    /// Returns the number of items this knapsack ranges over.
    #[inline]
    pub fn num_items(&self) -> usize {
        self.selection.len()
    }

    /// Returns the number of selected items.
    #[inline]
    pub fn num_selected(&self) -> usize {
        self.selection.count_ones(..)
    }

    /// Returns `true` if the item is selected.
    ///
    /// # Panics
    ///
    /// Panics if `item_index` is out of bounds.
    #[inline]
    pub fn contains(&self, item_index: ItemIndex) -> bool {
        let index = item_index.get();
        assert!(
            index < self.num_items(),
            "called `Knapsack::contains` with item index out of bounds: the len is {} but the index is {}",
            self.num_items(),
            index
        );

        self.selection.contains(index)
    }

    /// Returns the underlying selection bitset.
    #[inline]
    pub fn selection(&self) -> &FixedBitSet {
        &self.selection
    }

    /// Returns an iterator over the selected items in ascending order.
    #[inline]
    pub fn selected_items(&self) -> impl Iterator<Item = ItemIndex> + '_ {
        self.selection.ones().map(ItemIndex::new)
    }

    /// Returns how much worse this knapsack is than `other`, normalized by
    /// the score of `other`.
    ///
    /// The result is `0.0` when this knapsack is at least as good as `other`
    /// or when `other` scores zero, and lies in `(0.0, 1.0]` otherwise.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use satchel_model::eval::Evaluator;
    /// # use satchel_model::index::ItemIndex;
    /// # use satchel_model::model::ModelBuilder;
    /// # use fixedbitset::FixedBitSet;
    ///
    /// let mut builder = ModelBuilder::<i64>::new(2, 10);
    /// builder.set_item(ItemIndex::new(0), 1, 1);
    /// builder.set_item(ItemIndex::new(1), 3, 1);
    /// let evaluator = Evaluator::new(builder.build());
    ///
    /// let mut selection = FixedBitSet::with_capacity(2);
    /// selection.insert(0);
    /// let low = evaluator.evaluate(selection);
    /// selection = FixedBitSet::with_capacity(2);
    /// selection.insert_range(..);
    /// let high = evaluator.evaluate(selection);
    ///
    /// assert_eq!(low.relative_gap(&high), 0.75);
    /// assert_eq!(high.relative_gap(&low), 0.0);
    /// ```
    #[inline]
    pub fn relative_gap(&self, other: &Self) -> f64 {
        if other.value <= T::zero() || self.value >= other.value {
            return 0.0;
        }

        let other_score = to_f64(other.value);
        (other_score - to_f64(self.value)) / other_score
    }

    /// Returns `true` if this knapsack fits the capacity of `model` and
    /// ranges over exactly the items of `model`.
    pub fn is_feasible(&self, model: &Model<T>) -> bool {
        if self.num_items() != model.num_items() {
            return false;
        }

        let weight = self
            .selected_items()
            .fold(T::zero(), |acc, item| acc + model.item_weight(item));
        weight == self.weight && weight <= model.capacity()
    }
}

impl<T> std::fmt::Debug for Knapsack<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Knapsack")
            .field("value", &self.value)
            .field("weight", &self.weight)
            .field("selected", &self.selected_items().map(|i| i.get()).collect::<Vec<_>>())
            .finish()
    }
}

impl<T> std::fmt::Display for Knapsack<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Knapsack(value: {}, weight: {}, items: [", self.value, self.weight)?;
        for (position, item) in self.selected_items().enumerate() {
            if position > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item.get())?;
        }
        write!(f, "])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelBuilder;

    fn model() -> Model<i64> {
        let mut builder = ModelBuilder::new(3, 5);
        builder.set_item(ItemIndex::new(0), 4, 2);
        builder.set_item(ItemIndex::new(1), 3, 2);
        builder.set_item(ItemIndex::new(2), 10, 4);
        builder.build()
    }

    fn knapsack(items: &[usize], value: i64, weight: i64) -> Knapsack<i64> {
        let mut selection = FixedBitSet::with_capacity(3);
        for &item in items {
            selection.insert(item);
        }
        Knapsack::from_parts(selection, value, weight)
    }

    #[test]
    fn test_empty() {
        let k = Knapsack::<i64>::empty(4);
        assert_eq!(k.score(), 0);
        assert_eq!(k.weight(), 0);
        assert_eq!(k.num_items(), 4);
        assert_eq!(k.num_selected(), 0);
        assert!(!k.contains(ItemIndex::new(3)));
    }

    #[test]
    fn test_selection_accessors() {
        let k = knapsack(&[0, 2], 14, 6);
        assert_eq!(k.num_selected(), 2);
        assert!(k.contains(ItemIndex::new(0)));
        assert!(!k.contains(ItemIndex::new(1)));
        assert_eq!(
            k.selected_items().collect::<Vec<_>>(),
            vec![ItemIndex::new(0), ItemIndex::new(2)]
        );
    }

    #[test]
    fn test_relative_gap() {
        let low = knapsack(&[1], 3, 2);
        let high = knapsack(&[2], 10, 4);
        assert!((low.relative_gap(&high) - 0.7).abs() < 1e-12);
        assert_eq!(high.relative_gap(&low), 0.0);
        assert_eq!(high.relative_gap(&high), 0.0);

        let zero = Knapsack::<i64>::empty(3);
        assert_eq!(zero.relative_gap(&zero), 0.0);
        assert_eq!(high.relative_gap(&zero), 0.0);
        assert_eq!(zero.relative_gap(&high), 1.0);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = knapsack(&[0], 4, 2);
        let mut copy = original.clone();
        copy.selection.insert(1);
        copy.value = 7;
        assert_eq!(original.score(), 4);
        assert!(!original.contains(ItemIndex::new(1)));
        assert_ne!(original, copy);
    }

    #[test]
    fn test_is_feasible() {
        let model = model();
        assert!(knapsack(&[0, 1], 7, 4).is_feasible(&model));
        assert!(!knapsack(&[0, 2], 14, 6).is_feasible(&model));
        // Stale weight bookkeeping is rejected too.
        assert!(!knapsack(&[0], 4, 3).is_feasible(&model));
        assert!(!Knapsack::<i64>::empty(2).is_feasible(&model));
    }

    #[test]
    #[should_panic(expected = "called `Knapsack::contains` with item index out of bounds")]
    fn test_contains_out_of_bounds_panics() {
        let _ = Knapsack::<i64>::empty(1).contains(ItemIndex::new(1));
    }

    #[test]
    fn test_display() {
        let k = knapsack(&[0, 2], 14, 6);
        assert_eq!(format!("{}", k), "Knapsack(value: 14, weight: 6, items: [0, 2])");
    }
}
