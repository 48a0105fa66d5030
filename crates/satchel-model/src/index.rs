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

/// Position of an item in a knapsack instance.
///
/// Item positions are also bit positions in a `Knapsack` selection, so the
/// wrapper stays a transparent `usize`.
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemIndex(usize);

impl ItemIndex {
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw position.
    #[inline(always)]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Returns the indices `0..num_items` in ascending order.
    #[inline]
    pub fn range(num_items: usize) -> impl DoubleEndedIterator<Item = ItemIndex> + ExactSizeIterator {
        (0..num_items).map(ItemIndex)
    }
}

impl std::fmt::Debug for ItemIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ItemIndex({})", self.0)
    }
}

impl std::fmt::Display for ItemIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for ItemIndex {
    #[inline]
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<ItemIndex> for usize {
    #[inline]
    fn from(index: ItemIndex) -> Self {
        index.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_ascending() {
        let items: Vec<usize> = ItemIndex::range(4).map(ItemIndex::get).collect();
        assert_eq!(items, vec![0, 1, 2, 3]);
        assert_eq!(ItemIndex::range(0).len(), 0);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format!("{:?}", ItemIndex::new(7)), "ItemIndex(7)");
        assert_eq!(format!("{}", ItemIndex::new(7)), "7");
    }

    #[test]
    fn test_usize_conversions() {
        assert_eq!(ItemIndex::from(5), ItemIndex::new(5));
        assert_eq!(usize::from(ItemIndex::new(9)), 9);
    }
}
