//! Range aggregation over per-offset values.

use std::fmt;

/// Answers "combine the values in `[l, r)`" in logarithmic time.
///
/// The combinator must be associative and `neutral` must be its identity.
/// Commutativity is not required: queries fold strictly left to right.
///
/// # Examples
///
/// ```
/// use route_builder::availability::RangeAggregator;
///
/// fn add(a: &u32, b: &u32) -> u32 { a + b }
///
/// let sums = RangeAggregator::new(vec![1, 2, 3, 4], 0, add);
/// assert_eq!(sums.select(1, 3), 5);
/// assert_eq!(sums.select(0, 100), 10);
/// assert_eq!(sums.select(3, 1), 0);
/// ```
#[derive(Clone)]
pub struct RangeAggregator<T> {
    len: usize,
    tree: Vec<T>,
    neutral: T,
    combine: fn(&T, &T) -> T,
}

impl<T: Clone> RangeAggregator<T> {
    /// Builds an aggregator over `values`.
    pub fn new(values: Vec<T>, neutral: T, combine: fn(&T, &T) -> T) -> Self {
        let len = values.len();
        let mut tree = Vec::with_capacity(2 * len);
        tree.extend(std::iter::repeat_n(neutral.clone(), len));
        tree.extend(values);
        for i in (1..len).rev() {
            tree[i] = combine(&tree[2 * i], &tree[2 * i + 1]);
        }
        Self {
            len,
            tree,
            neutral,
            combine,
        }
    }

    /// An aggregator where every query answers `neutral`.
    pub fn empty(neutral: T, combine: fn(&T, &T) -> T) -> Self {
        Self::new(Vec::new(), neutral, combine)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Combines the values at offsets `l..r`, clamped to the stored range.
    ///
    /// Empty or inverted ranges answer the neutral element.
    pub fn select(&self, l: usize, r: usize) -> T {
        let r = r.min(self.len);
        if l >= r {
            return self.neutral.clone();
        }

        let mut left = self.neutral.clone();
        let mut right = self.neutral.clone();
        let mut l = l + self.len;
        let mut r = r + self.len;
        while l < r {
            if l & 1 == 1 {
                left = (self.combine)(&left, &self.tree[l]);
                l += 1;
            }
            if r & 1 == 1 {
                r -= 1;
                right = (self.combine)(&self.tree[r], &right);
            }
            l >>= 1;
            r >>= 1;
        }
        (self.combine)(&left, &right)
    }
}

impl<T: fmt::Debug> fmt::Debug for RangeAggregator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeAggregator")
            .field("values", &&self.tree[self.len..])
            .finish()
    }
}
