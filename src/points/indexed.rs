use super::PointView;
use crate::{Error, Point, Result};
use std::any::Any;
use std::ops::Range;

/// A point view that restricts its parent to an ordinal sub-range, with `O(1)` random access.
#[allow(missing_debug_implementations)]
pub struct Indexed<V> {
    parent: V,
    range: Range<usize>,
}

impl<V: PointView> Indexed<V> {
    /// Restricts `parent` to `range`.
    ///
    /// Fails if `range.end > parent.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::points::{Indexed, Owned, PointView};
    /// use lidar_cloud::Point;
    ///
    /// let owned = Owned::new(vec![Default::default(), Default::default(), Default::default()]);
    /// let indexed = Indexed::new(owned, 1..3).unwrap();
    /// assert_eq!(2, indexed.len());
    /// ```
    pub fn new(parent: V, range: Range<usize>) -> Result<Indexed<V>> {
        let len = parent.len();
        if range.end > len || range.start > range.end {
            return Err(Error::IndexOutOfBounds {
                index: range.end,
                len,
            });
        }
        Ok(Indexed { parent, range })
    }
}

impl<V: PointView> PointView for Indexed<V> {
    fn len(&self) -> usize {
        self.range.len()
    }

    fn get(&self, index: usize) -> Option<Point> {
        if index >= self.len() {
            None
        } else {
            self.parent.get(self.range.start + index)
        }
    }

    fn as_any(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::Owned;
    use crate::Point;

    #[test]
    fn out_of_bounds_range_is_an_error() {
        let owned = Owned::new(vec![Default::default()]);
        assert!(Indexed::new(owned, 0..2).is_err());
    }

    #[test]
    fn matches_bitmask_over_the_same_range() {
        use crate::points::Masked;

        let owned = || {
            Owned::new(vec![
                Point {
                    x: 1.,
                    ..Default::default()
                },
                Point {
                    x: 2.,
                    ..Default::default()
                },
                Point {
                    x: 3.,
                    ..Default::default()
                },
            ])
        };
        let indexed = Indexed::new(owned(), 1..3).unwrap();
        let masked = Masked::from_bitmask(owned(), vec![false, true, true]).unwrap();
        assert_eq!(indexed.len(), masked.len());
        for i in 0..indexed.len() {
            assert_eq!(indexed.get(i).unwrap().x, masked.get(i).unwrap().x);
        }
    }
}
