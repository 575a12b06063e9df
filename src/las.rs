//! The [Las] container: a header paired with a point view.
//!
//! A [Reader](crate::Reader)/[Writer](crate::Writer) pair handles the streaming I/O; [Las] sits a
//! level above them, owning a [Header] and a [PointView](crate::points::PointView) together so
//! that filtering, attribute overlays, and summary-statistic bookkeeping have one home.
//!
//! ```
//! use lidar_cloud::{Las, Point};
//!
//! let mut las = Las::from_points(vec![
//!     Point { x: 1., classification: Default::default(), ..Default::default() },
//!     Point { x: 5., classification: Default::default(), ..Default::default() },
//! ]);
//! assert_eq!(2, las.len());
//! las = las.filter(|p| p.x > 2.);
//! assert_eq!(1, las.len());
//! ```

use crate::points::{Indexed, Masked, Owned, PointOverlay, PointView, Points, Updated};
use crate::{crs, Error, Header, Point, Reader, Result, Vector, Writer};
use std::io::{Read, Seek, Write};
use std::ops::Range;
use std::path::Path;

#[cfg(feature = "mmap")]
use crate::points::Mapped;

/// The coordinate reference system a [Las] container carries, as recorded by its header.
#[derive(Debug)]
pub enum Crs<'a> {
    /// A GeoTIFF key directory, as embedded in pre-1.4 or non-WKT files.
    GeoTiff(crs::GeoTiffCrs),
    /// Raw WKT bytes, as embedded when the header's `well_known_text` flag is set.
    Wkt(&'a [u8]),
}

/// A LAS point cloud: a [Header] paired with a [PointView](crate::points::PointView).
///
/// Filtering and attribute updates are expressed as methods that consume `self` and return a new
/// `Las`, mirroring how point views chain (see [points](crate::points)); [filter_in_place] is the
/// one escape hatch, and only succeeds when the current view is owned or already masked.
#[allow(missing_debug_implementations)]
pub struct Las {
    header: Header,
    points: Box<dyn PointView>,
}

impl Las {
    /// Builds a container directly from a header and a point view.
    pub fn new(header: Header, points: impl PointView + 'static) -> Las {
        Las {
            header,
            points: Box::new(points),
        }
    }

    /// Builds a container from a vector of points, with a default header.
    pub fn from_points(points: Vec<Point>) -> Las {
        let mut header = Header::default();
        for point in &points {
            header.add_point(point);
        }
        Las::new(header, Owned::new(points))
    }

    /// Reads every point eagerly into an owned view.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::Las;
    /// let las = Las::read_path("tests/data/autzen.las").unwrap();
    /// assert!(las.len() > 0);
    /// ```
    pub fn read<R: Read + Seek + Send + Sync + 'static>(read: R) -> Result<Las> {
        let mut reader = Reader::new(read)?;
        let header = reader.header().clone();
        let mut points = Vec::with_capacity(header.number_of_points() as usize);
        let _ = reader.read_all_points_into(&mut points)?;
        Ok(Las::new(header, Owned::new(points)))
    }

    /// Reads a file at `path` eagerly into an owned view.
    pub fn read_path<P: AsRef<Path>>(path: P) -> Result<Las> {
        let reader = Reader::from_path(path)?;
        Self::from_reader(reader)
    }

    /// Wraps an already-open [Reader] in a lazily-streamed view.
    ///
    /// Points are decoded one at a time, on demand, via [LazStream](crate::points::LazStream).
    pub fn stream(reader: Reader) -> Las {
        let header = reader.header().clone();
        Las::new(header, crate::points::LazStream::new(reader))
    }

    fn from_reader(mut reader: Reader) -> Result<Las> {
        let header = reader.header().clone();
        let mut points = Vec::with_capacity(header.number_of_points() as usize);
        let _ = reader.read_all_points_into(&mut points)?;
        Ok(Las::new(header, Owned::new(points)))
    }

    /// Memory-maps the file at `path` and returns a non-owning view over its points.
    #[cfg(feature = "mmap")]
    pub fn open_mapped<P: AsRef<Path>>(path: P) -> Result<Las> {
        let (header, mapped) = Mapped::open(path)?;
        Ok(Las::new(header, mapped))
    }

    /// Writes every point in this container's current view, in view order.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lidar_cloud::{Las, Point};
    ///
    /// let las = Las::from_points(vec![Point::default()]);
    /// let mut bytes = Vec::new();
    /// las.write(Cursor::new(&mut bytes)).unwrap();
    /// ```
    pub fn write<W: Write + Seek + Send + Sync + 'static>(&self, write: W) -> Result<()> {
        let mut writer = Writer::new(write, self.header.clone())?;
        for index in 0..self.points.len() {
            if let Some(point) = self.points.get(index) {
                writer.write_point(point)?;
            }
        }
        writer.close()
    }

    /// Writes every point in this container's current view to a new file at `path`.
    pub fn write_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = Writer::from_path(path, self.header.clone())?;
        for index in 0..self.points.len() {
            if let Some(point) = self.points.get(index) {
                writer.write_point(point)?;
            }
        }
        writer.close()
    }

    /// Returns this container's header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the number of points visible through this container's current view.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if this container has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the point at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index)
    }

    /// Returns an iterator over this container's points, in view order.
    pub fn points(&self) -> Points<'_> {
        Points::new(&*self.points)
    }

    /// Restricts this container to an ordinal sub-range of its current view.
    pub fn range(self, range: Range<usize>) -> Result<Las> {
        let indexed = Indexed::new(self.points, range)?;
        Ok(Las {
            header: self.header,
            points: Box::new(indexed),
        })
    }

    /// Restricts this container to the points selected by `bitmask`.
    ///
    /// `bitmask.len()` must equal `self.len()`.
    pub fn bitmask(self, bitmask: Vec<bool>) -> Result<Las> {
        let masked = Masked::from_bitmask(self.points, bitmask)?;
        Ok(Las {
            header: self.header,
            points: Box::new(masked),
        })
    }

    /// Returns the minimum rescaled coordinates across the current view.
    pub fn min(&self) -> Vector<f64> {
        self.header.bounds().min
    }

    /// Returns the maximum rescaled coordinates across the current view.
    pub fn max(&self) -> Vector<f64> {
        self.header.bounds().max
    }

    /// Returns `(min, max)` rescaled coordinates across the current view.
    pub fn extrema(&self) -> (Vector<f64>, Vector<f64>) {
        let bounds = self.header.bounds();
        (bounds.min, bounds.max)
    }

    /// Returns a new container holding only the points that satisfy `predicate`, with summary
    /// statistics recomputed from the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::{Las, Point};
    ///
    /// let las = Las::from_points(vec![
    ///     Point { x: 1., ..Default::default() },
    ///     Point { x: 9., ..Default::default() },
    /// ]);
    /// let filtered = las.filter(|p| p.x < 5.);
    /// assert_eq!(1, filtered.len());
    /// ```
    pub fn filter<F: Fn(&Point) -> bool>(self, predicate: F) -> Las {
        let mut masked = Masked::new(self.points);
        masked.filter_in_place(predicate);
        let mut header = self.header;
        recompute_summary(&mut header, &masked);
        Las {
            header,
            points: Box::new(masked),
        }
    }

    /// Filters this container's current view in place.
    ///
    /// Only works when the current view is already [Owned](crate::points::Owned) or
    /// [Masked](crate::points::Masked); refuses (returning an error, leaving `self` untouched)
    /// for any non-owning view, per the [PointView](crate::points::PointView) contract.
    pub fn filter_in_place<F: Fn(&Point) -> bool>(&mut self, predicate: F) -> Result<()> {
        if let Some(masked) = self
            .points
            .as_any()
            .downcast_mut::<Masked<Box<dyn PointView>>>()
        {
            masked.filter_in_place(predicate);
        } else if let Some(owned) = self.points.as_any().downcast_mut::<Owned>() {
            owned.retain(predicate);
        } else {
            return Err(Error::NotFilterableInPlace);
        }
        let header = &mut self.header;
        recompute_summary(header, &*self.points);
        Ok(())
    }

    /// Layers an attribute overlay onto this container's points, optionally adjusting the header,
    /// and returns the resulting container.
    ///
    /// Summary statistics are recomputed whenever the overlay touches a coordinate or the return
    /// number (see [PointOverlay::affects_summary]).
    pub fn update(
        self,
        overlay: PointOverlay,
        header_overrides: impl FnOnce(&mut Header),
    ) -> Result<Las> {
        let mut header = self.header;
        header_overrides(&mut header);
        let recompute = overlay.affects_summary();
        let updated = Updated::new(self.points, overlay)?;
        if recompute {
            recompute_summary(&mut header, &updated);
        }
        Ok(Las {
            header,
            points: Box::new(updated),
        })
    }

    /// Returns the already-rescaled coordinates of the point at `index`.
    ///
    /// Reprojection to a different CRS is outside this crate's scope (see the module
    /// documentation); pass the point through an external `CoordinateTransform` instead.
    pub fn coordinates(&self, index: usize) -> Option<Vector<f64>> {
        self.get(index).map(|point| Vector {
            x: point.x,
            y: point.y,
            z: point.z,
        })
    }

    /// Returns this container's coordinate reference system, if any.
    pub fn crs(&self) -> Result<Option<Crs<'_>>> {
        if self.header.has_wkt_crs() {
            Ok(self.header.get_wkt_crs().map(Crs::Wkt))
        } else {
            Ok(self.header.get_geotiff_crs()?.map(Crs::GeoTiff))
        }
    }
}

fn recompute_summary(header: &mut Header, points: &dyn PointView) {
    header.clear();
    for index in 0..points.len() {
        if let Some(point) = points.get(index) {
            header.add_point(&point);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<Point> {
        vec![
            Point {
                x: 1.,
                return_number: 1,
                ..Default::default()
            },
            Point {
                x: 5.,
                return_number: 1,
                ..Default::default()
            },
            Point {
                x: 9.,
                return_number: 1,
                ..Default::default()
            },
        ]
    }

    #[test]
    fn filter_recomputes_bounds() {
        let las = Las::from_points(points());
        let filtered = las.filter(|p| p.x < 6.);
        assert_eq!(2, filtered.len());
        assert_eq!(1., filtered.min().x);
        assert_eq!(5., filtered.max().x);
    }

    #[test]
    fn filter_in_place_works_on_owned() {
        let mut las = Las::from_points(points());
        las.filter_in_place(|p| p.x > 3.).unwrap();
        assert_eq!(2, las.len());
    }

    #[test]
    fn filter_in_place_refuses_on_indexed() {
        let las = Las::from_points(points());
        let mut ranged = las.range(0..2).unwrap();
        assert!(ranged.filter_in_place(|p| p.x > 0.).is_err());
    }

    #[test]
    fn range_restricts_view() {
        let las = Las::from_points(points());
        let ranged = las.range(1..3).unwrap();
        assert_eq!(2, ranged.len());
        assert_eq!(5., ranged.get(0).unwrap().x);
    }

    #[test]
    fn update_overlays_and_recomputes() {
        let las = Las::from_points(points());
        let overlay = PointOverlay {
            x: Some(vec![10., 20., 30.]),
            ..Default::default()
        };
        let updated = las.update(overlay, |_| {}).unwrap();
        assert_eq!(10., updated.min().x);
        assert_eq!(30., updated.max().x);
    }

    #[test]
    fn round_trips_through_bytes() {
        use std::io::Cursor;

        let las = Las::from_points(points());
        let mut bytes = Vec::new();
        las.write(Cursor::new(&mut bytes)).unwrap();
        let read_back = Las::read(Cursor::new(bytes)).unwrap();
        assert_eq!(las.len(), read_back.len());
        for i in 0..las.len() {
            assert_eq!(las.get(i).unwrap().x, read_back.get(i).unwrap().x);
        }
    }
}
