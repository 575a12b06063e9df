use super::PointView;
use crate::{Point, Reader};
use std::any::Any;
use std::sync::Mutex;

/// A point view backed by a sequential [Reader], such as a laz decompressor.
///
/// `get` tracks the index of the last point it produced and only issues a physical seek when the
/// requested index isn't the immediate successor of that one, so sequential iteration over a
/// compressed stream never pays for a seek it doesn't need.
#[allow(missing_debug_implementations)]
pub struct LazStream {
    reader: Mutex<Reader>,
    cursor: Mutex<Option<u64>>,
    len: usize,
}

impl LazStream {
    /// Wraps `reader` in a point view with a seek-avoiding cursor.
    pub fn new(reader: Reader) -> LazStream {
        let len = reader.header().number_of_points() as usize;
        LazStream {
            reader: Mutex::new(reader),
            cursor: Mutex::new(None),
            len,
        }
    }
}

impl PointView for LazStream {
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, index: usize) -> Option<Point> {
        let mut reader = self.reader.lock().unwrap_or_else(|e| e.into_inner());
        let mut cursor = self.cursor.lock().unwrap_or_else(|e| e.into_inner());
        let index = index as u64;
        let needs_seek = match *cursor {
            Some(previous) => previous.wrapping_add(1) != index,
            None => index != 0,
        };
        if needs_seek && reader.seek(index).is_err() {
            return None;
        }
        let point = reader.read_point().ok().flatten();
        *cursor = Some(index);
        point
    }

    fn as_any(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn sequential_reads_match_random_access() {
        let mut bytes = Vec::new();
        {
            let mut writer = crate::Writer::new(Cursor::new(&mut bytes), Default::default())
                .expect("writer");
            for i in 0..5 {
                writer
                    .write_point(Point {
                        x: i as f64,
                        ..Default::default()
                    })
                    .expect("write point");
            }
            writer.close().expect("close");
        }

        let reader = Reader::new(Cursor::new(bytes)).expect("reader");
        let stream = LazStream::new(reader);
        let sequential: Vec<f64> = (0..5).map(|i| stream.get(i).unwrap().x).collect();
        assert_eq!(vec![0., 1., 2., 3., 4.], sequential);

        // random access after sequential reads must still see the right record.
        assert_eq!(2., stream.get(2).unwrap().x);
        assert_eq!(4., stream.get(4).unwrap().x);
        assert_eq!(0., stream.get(0).unwrap().x);
    }
}
