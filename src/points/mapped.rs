use super::PointView;
use crate::point::Format;
use crate::{raw, Header, Point, Result, Transform, Vector};
use memmap2::Mmap;
use std::any::Any;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;

/// A point view backed by a memory-mapped file.
///
/// Each record is decoded on demand straight out of the mapped bytes; nothing beyond the `Header`
/// itself is copied into memory until a point is actually requested.
#[allow(missing_debug_implementations)]
pub struct Mapped {
    mmap: Mmap,
    point_data_start: u64,
    record_length: u64,
    format: Format,
    transforms: Vector<Transform>,
    len: usize,
}

impl Mapped {
    /// Memory-maps the file at `path` and returns its header alongside a view over its points.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use lidar_cloud::points::{Mapped, PointView};
    /// let (header, view) = Mapped::open("tests/data/autzen.las").unwrap();
    /// assert_eq!(header.number_of_points() as usize, view.len());
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<(Header, Mapped)> {
        let file = File::open(path)?;
        // Mmap::map is unsafe because the caller must guarantee the file isn't modified out from
        // under the mapping; we treat the file as read-only input data for the lifetime of the
        // view, same contract the `mmap` feature documents.
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file)? };

        let mut cursor = Cursor::new(&mmap[..]);
        let header = Header::new(&mut cursor)?;
        let point_data_start = cursor.position();
        let format = *header.point_format();
        let record_length = u64::from(format.len());
        let len = header.number_of_points() as usize;
        let transforms = *header.transforms();

        let view = Mapped {
            mmap,
            point_data_start,
            record_length,
            format,
            transforms,
            len,
        };
        Ok((header, view))
    }
}

impl PointView for Mapped {
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, index: usize) -> Option<Point> {
        if index >= self.len {
            return None;
        }
        let start = self.point_data_start + index as u64 * self.record_length;
        let end = start + self.record_length;
        let slice = self.mmap.get(start as usize..end as usize)?;
        raw::Point::read_from(Cursor::new(slice), self.format)
            .ok()
            .map(|raw_point| Point::new(raw_point, &self.transforms))
    }

    fn as_any(&mut self) -> &mut dyn Any {
        self
    }
}
