//! Predicate, extent, and sub-range filter descriptors.
//!
//! These compose with both [Las](crate::Las) (which answers a filter by clearing bits in a
//! [Masked](crate::points::Masked) view, per [Las::filter](crate::Las::filter)) and
//! [PointCloud](crate::PointCloud) (which has no point view to lean on, so it materializes a
//! bitmask over its rows and clears it the same way).

use crate::{Error, Point, Result, Vector};
use std::ops::Range;

/// An axis-aligned bounding box filter, with a per-axis tolerance to absorb floating-point noise
/// at the boundary.
///
/// The tolerance is expressed as a fraction of each axis's extent: a point at `max.x + (max.x -
/// min.x) * tolerance` still counts as inside. The default tolerance is small enough to only
/// cover rounding error, not to meaningfully grow the box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtentFilter {
    /// The minimum corner of the box.
    pub min: Vector<f64>,
    /// The maximum corner of the box.
    pub max: Vector<f64>,
    /// The per-axis tolerance, as a fraction of that axis's `max - min`.
    pub tolerance: f64,
}

impl ExtentFilter {
    /// The default tolerance, chosen to absorb floating-point rescaling error without
    /// meaningfully growing the box.
    pub const DEFAULT_TOLERANCE: f64 = 1e-9;

    /// Builds a filter over `[min, max]` with the default tolerance.
    pub fn new(min: Vector<f64>, max: Vector<f64>) -> ExtentFilter {
        ExtentFilter {
            min,
            max,
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }

    /// Sets this filter's tolerance fraction.
    pub fn with_tolerance(mut self, tolerance: f64) -> ExtentFilter {
        self.tolerance = tolerance;
        self
    }

    /// True if `(x, y, z)` falls within this filter's box, tolerance included.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::{ExtentFilter, Vector};
    ///
    /// let filter = ExtentFilter::new(
    ///     Vector { x: 0., y: 0., z: 0. },
    ///     Vector { x: 10., y: 10., z: 10. },
    /// );
    /// assert!(filter.contains(5., 5., 5.));
    /// assert!(!filter.contains(20., 5., 5.));
    /// ```
    pub fn contains(&self, x: f64, y: f64, z: f64) -> bool {
        within(x, self.min.x, self.max.x, self.tolerance)
            && within(y, self.min.y, self.max.y, self.tolerance)
            && within(z, self.min.z, self.max.z, self.tolerance)
    }

    /// True if the point's coordinates fall within this filter's box.
    pub fn contains_point(&self, point: &Point) -> bool {
        self.contains(point.x, point.y, point.z)
    }
}

fn within(value: f64, min: f64, max: f64, tolerance: f64) -> bool {
    let pad = (max - min) * tolerance;
    value >= min - pad && value <= max + pad
}

/// A sub-range filter: every `step`-th index within `range`.
#[derive(Clone, Debug, PartialEq)]
pub struct SubRangeFilter {
    /// The ordinal range this filter draws from.
    pub range: Range<usize>,
    step: usize,
}

impl SubRangeFilter {
    /// Builds a filter over `range`, keeping every `step`-th index.
    ///
    /// `step` must be strictly positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::SubRangeFilter;
    ///
    /// let filter = SubRangeFilter::new(0..10, 2).unwrap();
    /// assert_eq!(vec![0, 2, 4, 6, 8], filter.indices().collect::<Vec<_>>());
    /// assert!(SubRangeFilter::new(0..10, -1).is_err());
    /// ```
    pub fn new(range: Range<usize>, step: i64) -> Result<SubRangeFilter> {
        if step <= 0 {
            return Err(Error::NegativeStep(step));
        }
        Ok(SubRangeFilter {
            range,
            step: step as usize,
        })
    }

    /// The step size this filter advances by.
    pub fn step(&self) -> usize {
        self.step
    }

    /// True if `index` is kept by this filter.
    pub fn contains_index(&self, index: usize) -> bool {
        self.range.contains(&index) && (index - self.range.start) % self.step == 0
    }

    /// Iterates over every index this filter keeps.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.range.clone().step_by(self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_tolerance_absorbs_boundary_noise() {
        let filter = ExtentFilter::new(
            Vector {
                x: 0.,
                y: 0.,
                z: 0.,
            },
            Vector {
                x: 1.,
                y: 1.,
                z: 1.,
            },
        );
        assert!(filter.contains(1.0000000001, 0.5, 0.5));
        assert!(!filter.contains(1.1, 0.5, 0.5));
    }

    #[test]
    fn sub_range_rejects_nonpositive_step() {
        assert!(SubRangeFilter::new(0..10, 0).is_err());
        assert!(SubRangeFilter::new(0..10, -3).is_err());
    }

    #[test]
    fn sub_range_indices_respect_step() {
        let filter = SubRangeFilter::new(2..9, 3).unwrap();
        assert_eq!(vec![2, 5, 8], filter.indices().collect::<Vec<_>>());
        assert!(filter.contains_index(5));
        assert!(!filter.contains_index(6));
        assert!(!filter.contains_index(1));
    }
}
