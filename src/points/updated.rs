use super::PointView;
use crate::point::Classification;
use crate::{Error, Point, Result};
use std::any::Any;

/// A sparse set of per-attribute overlay columns, one entry per point in the parent view.
///
/// Every populated column must have the same length as the view it overlays; [Updated::new]
/// checks this once, up front, rather than on every `get`.
#[derive(Clone, Debug, Default)]
pub struct PointOverlay {
    /// Overlay values for `x`.
    pub x: Option<Vec<f64>>,
    /// Overlay values for `y`.
    pub y: Option<Vec<f64>>,
    /// Overlay values for `z`.
    pub z: Option<Vec<f64>>,
    /// Overlay values for `intensity`.
    pub intensity: Option<Vec<u16>>,
    /// Overlay values for `classification`.
    pub classification: Option<Vec<Classification>>,
    /// Overlay values for `return_number`.
    pub return_number: Option<Vec<u8>>,
    /// Overlay values for `gps_time`.
    pub gps_time: Option<Vec<Option<f64>>>,
}

macro_rules! check_len {
    ($overlay:expr, $field:ident, $len:expr) => {
        if let Some(column) = &$overlay.$field {
            if column.len() != $len {
                return Err(Error::ColumnLengthMismatch {
                    name: stringify!($field).to_string(),
                    len: column.len(),
                    expected: $len,
                });
            }
        }
    };
}

impl PointOverlay {
    fn check_lengths(&self, len: usize) -> Result<()> {
        check_len!(self, x, len);
        check_len!(self, y, len);
        check_len!(self, z, len);
        check_len!(self, intensity, len);
        check_len!(self, classification, len);
        check_len!(self, return_number, len);
        check_len!(self, gps_time, len);
        Ok(())
    }

    /// True if this overlay touches any of the attributes that feed into the header's summary
    /// statistics (coordinates and return number).
    pub fn affects_summary(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.z.is_some() || self.return_number.is_some()
    }
}

/// A point view that layers per-attribute overlay columns onto a parent view.
///
/// `get(i)` returns the parent's point at `i` with every overlaid field replaced by the value at
/// the same index in the corresponding overlay column.
#[allow(missing_debug_implementations)]
pub struct Updated<V> {
    parent: V,
    overlay: PointOverlay,
}

impl<V: PointView> Updated<V> {
    /// Layers `overlay` onto `parent`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::points::{Owned, PointOverlay, PointView, Updated};
    /// use lidar_cloud::Point;
    ///
    /// let owned = Owned::new(vec![Point::default(), Point::default()]);
    /// let overlay = PointOverlay { x: Some(vec![1., 2.]), ..Default::default() };
    /// let updated = Updated::new(owned, overlay).unwrap();
    /// assert_eq!(1., updated.get(0).unwrap().x);
    /// assert_eq!(2., updated.get(1).unwrap().x);
    /// ```
    pub fn new(parent: V, overlay: PointOverlay) -> Result<Updated<V>> {
        overlay.check_lengths(parent.len())?;
        Ok(Updated { parent, overlay })
    }

    /// Returns the overlay this view applies.
    pub fn overlay(&self) -> &PointOverlay {
        &self.overlay
    }
}

impl<V: PointView> PointView for Updated<V> {
    fn len(&self) -> usize {
        self.parent.len()
    }

    fn get(&self, index: usize) -> Option<Point> {
        let mut point = self.parent.get(index)?;
        if let Some(values) = &self.overlay.x {
            point.x = values[index];
        }
        if let Some(values) = &self.overlay.y {
            point.y = values[index];
        }
        if let Some(values) = &self.overlay.z {
            point.z = values[index];
        }
        if let Some(values) = &self.overlay.intensity {
            point.intensity = values[index];
        }
        if let Some(values) = &self.overlay.classification {
            point.classification = values[index];
        }
        if let Some(values) = &self.overlay.return_number {
            point.return_number = values[index];
        }
        if let Some(values) = &self.overlay.gps_time {
            point.gps_time = values[index];
        }
        Some(point)
    }

    fn as_any(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::Owned;

    #[test]
    fn rejects_mismatched_overlay_length() {
        let owned = Owned::new(vec![Point::default(), Point::default()]);
        let overlay = PointOverlay {
            x: Some(vec![1.]),
            ..Default::default()
        };
        assert!(Updated::new(owned, overlay).is_err());
    }

    #[test]
    fn unoverlaid_fields_pass_through() {
        let owned = Owned::new(vec![Point {
            intensity: 7,
            ..Default::default()
        }]);
        let overlay = PointOverlay {
            x: Some(vec![42.]),
            ..Default::default()
        };
        let updated = Updated::new(owned, overlay).unwrap();
        let point = updated.get(0).unwrap();
        assert_eq!(42., point.x);
        assert_eq!(7, point.intensity);
    }
}
