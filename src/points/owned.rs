use super::PointView;
use crate::Point;
use std::any::Any;

/// A point view backed by an owned, contiguous vector of points.
///
/// This is the default view used when a [Las](crate::Las) is read eagerly.
#[derive(Clone, Debug, Default)]
pub struct Owned(Vec<Point>);

impl Owned {
    /// Creates a new owned view from a vector of points.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::points::Owned;
    /// let view = Owned::new(vec![Default::default()]);
    /// ```
    pub fn new(points: Vec<Point>) -> Owned {
        Owned(points)
    }

    /// Consumes this view, returning the underlying vector.
    pub fn into_inner(self) -> Vec<Point> {
        self.0
    }

    /// Retains only the points for which `predicate` returns true, in place.
    pub fn retain<F: Fn(&Point) -> bool>(&mut self, predicate: F) {
        self.0.retain(|point| predicate(point));
    }
}

impl From<Vec<Point>> for Owned {
    fn from(points: Vec<Point>) -> Owned {
        Owned(points)
    }
}

impl PointView for Owned {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn get(&self, index: usize) -> Option<Point> {
        self.0.get(index).cloned()
    }

    fn as_any(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_drops_points() {
        let mut owned = Owned::new(vec![
            Point {
                x: 1.,
                ..Default::default()
            },
            Point {
                x: 2.,
                ..Default::default()
            },
        ]);
        owned.retain(|p| p.x > 1.);
        assert_eq!(1, owned.len());
        assert_eq!(2., owned.get(0).unwrap().x);
    }
}
