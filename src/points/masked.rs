use super::PointView;
use crate::{Error, Point, Result};
use std::any::Any;

/// A point view that hides some of its parent's points behind a bitmask.
///
/// Random access walks the bitmask from the front, so `get` is `O(n)` in the worst case; this
/// view is meant for filtering, not for repeated random indexing.
#[allow(missing_debug_implementations)]
pub struct Masked<V> {
    parent: V,
    bitmask: Vec<bool>,
    count: usize,
}

impl<V: PointView> Masked<V> {
    /// Wraps `parent` with a bitmask that admits every point.
    pub fn new(parent: V) -> Masked<V> {
        let len = parent.len();
        Masked {
            parent,
            bitmask: vec![true; len],
            count: len,
        }
    }

    /// Wraps `parent` with an explicit bitmask.
    ///
    /// Fails if `bitmask.len() != parent.len()`.
    pub fn from_bitmask(parent: V, bitmask: Vec<bool>) -> Result<Masked<V>> {
        let len = parent.len();
        if bitmask.len() != len {
            return Err(Error::ColumnLengthMismatch {
                name: "bitmask".to_string(),
                len: bitmask.len(),
                expected: len,
            });
        }
        let count = bitmask.iter().filter(|&&bit| bit).count();
        Ok(Masked {
            parent,
            bitmask,
            count,
        })
    }

    /// Clears the bits of every point that fails `predicate`, updating the cached count.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::points::{Masked, Owned, PointView};
    /// use lidar_cloud::Point;
    ///
    /// let owned = Owned::new(vec![
    ///     Point { x: 1., ..Default::default() },
    ///     Point { x: 2., ..Default::default() },
    /// ]);
    /// let mut masked = Masked::new(owned);
    /// masked.filter_in_place(|p| p.x > 1.);
    /// assert_eq!(1, masked.len());
    /// ```
    pub fn filter_in_place<F: Fn(&Point) -> bool>(&mut self, predicate: F) {
        for (index, bit) in self.bitmask.iter_mut().enumerate() {
            if *bit {
                let keep = self
                    .parent
                    .get(index)
                    .map(|point| predicate(&point))
                    .unwrap_or(false);
                if !keep {
                    *bit = false;
                }
            }
        }
        self.count = self.bitmask.iter().filter(|&&bit| bit).count();
    }

    /// Returns the bitmask, one entry per point in the parent view.
    pub fn bitmask(&self) -> &[bool] {
        &self.bitmask
    }
}

impl<V: PointView> PointView for Masked<V> {
    fn len(&self) -> usize {
        self.count
    }

    fn get(&self, index: usize) -> Option<Point> {
        let mut seen = 0;
        for (parent_index, &bit) in self.bitmask.iter().enumerate() {
            if bit {
                if seen == index {
                    return self.parent.get(parent_index);
                }
                seen += 1;
            }
        }
        None
    }

    fn as_any(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::Owned;

    fn owned() -> Owned {
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
    }

    #[test]
    fn filter_is_idempotent() {
        let mut masked = Masked::new(owned());
        masked.filter_in_place(|p| p.x >= 2.);
        let first = masked.bitmask().to_vec();
        masked.filter_in_place(|p| p.x >= 2.);
        assert_eq!(first, masked.bitmask());
        assert_eq!(2, masked.len());
    }

    #[test]
    fn from_bitmask_rejects_mismatched_length() {
        assert!(Masked::from_bitmask(owned(), vec![true]).is_err());
    }

    #[test]
    fn get_skips_cleared_bits() {
        let mut masked = Masked::new(owned());
        masked.filter_in_place(|p| p.x != 2.);
        assert_eq!(1., masked.get(0).unwrap().x);
        assert_eq!(3., masked.get(1).unwrap().x);
        assert!(masked.get(2).is_none());
    }
}
