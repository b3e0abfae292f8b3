//! Overflow-checked accumulator for folds over integer keys.

use crate::error::{Error, Result};

/// A running sum of `i64` values that fails instead of wrapping.
///
/// # Examples
///
/// ```
/// use rb_collections::red_black_tree::RedBlackMap;
/// use rb_collections::summation::Sum;
/// use rb_collections::Error;
///
/// let map: RedBlackMap<i64, &str> = vec![(1, "a"), (-4, "b"), (10, "c")].into_iter().collect();
/// let sum = map.try_traverse_lnr(Sum::new(), |sum, key, _| sum.accumulate(*key));
/// assert_eq!(sum.map(|sum| sum.total()), Ok(7));
///
/// let map: RedBlackMap<i64, ()> = vec![(i64::max_value(), ()), (1, ())].into_iter().collect();
/// let sum = map.try_traverse_lnr(Sum::new(), |sum, key, _| sum.accumulate(*key));
/// assert_eq!(sum, Err(Error::Overflow));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Sum {
    total: i64,
}

impl Sum {
    pub fn new() -> Self {
        Sum::default()
    }

    /// Adds `value` to the sum.
    ///
    /// # Errors
    ///
    /// Returns `Error::Overflow` if the sum does not fit in an `i64`.
    pub fn accumulate(self, value: i64) -> Result<Sum> {
        self.total
            .checked_add(value)
            .map(|total| Sum { total })
            .ok_or(Error::Overflow)
    }

    pub fn total(&self) -> i64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::Sum;
    use crate::error::Error;
    use crate::red_black_tree::RedBlackMap;

    #[test]
    fn test_accumulate() {
        let sum = Sum::new().accumulate(3).and_then(|sum| sum.accumulate(-5));
        assert_eq!(sum.map(|sum| sum.total()), Ok(-2));
    }

    #[test]
    fn test_overflow() {
        let low = Sum::new().accumulate(i64::min_value());
        assert_eq!(low.and_then(|sum| sum.accumulate(-1)), Err(Error::Overflow));
        let high = Sum::new().accumulate(i64::max_value());
        assert_eq!(high.and_then(|sum| sum.accumulate(1)), Err(Error::Overflow));
    }

    #[test]
    fn test_all_traversals_agree() {
        let map: RedBlackMap<i64, ()> = (-50..100).map(|key| (key, ())).collect();
        let expected = (-50..100).sum::<i64>();
        let lnr = map.try_traverse_lnr(Sum::new(), |sum, key, _| sum.accumulate(*key));
        let rnl = map.try_traverse_rnl(Sum::new(), |sum, key, _| sum.accumulate(*key));
        let breadth = map.try_traverse_breadth(Sum::new(), |sum, key, _| sum.accumulate(*key));
        assert_eq!(lnr.map(|sum| sum.total()), Ok(expected));
        assert_eq!(rnl.map(|sum| sum.total()), Ok(expected));
        assert_eq!(breadth.map(|sum| sum.total()), Ok(expected));
    }
}
