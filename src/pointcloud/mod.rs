//! [PointCloud]: a columnar, struct-of-arrays point store.
//!
//! Unlike [Las](crate::Las), which carries one row format fixed by the LAS point data record, a
//! [PointCloud] is a dynamic, runtime-typed table: every column is named, every column has its
//! own type, and `x`/`y`/`z` are the only columns every point cloud is guaranteed to carry.

use crate::{Bounds, Error, ExtentFilter, Las, Point, Result, SubRangeFilter, Vector};
use std::collections::HashSet;

/// A single named, typed column of a [PointCloud].
///
/// All columns in a point cloud share the same length, the number of rows in the cloud.
#[derive(Clone, Debug)]
pub enum Column {
    /// 64-bit floats, used for coordinates and other high-precision attributes.
    F64(Vec<f64>),
    /// 32-bit floats, used for the scan angle.
    F32(Vec<f32>),
    /// Unsigned 64-bit integers.
    U64(Vec<u64>),
    /// Unsigned 32-bit integers.
    U32(Vec<u32>),
    /// Unsigned 16-bit integers, used for intensity, near-infrared, point source id, and color.
    U16(Vec<u16>),
    /// Unsigned 8-bit integers, used for return number, classification, and user data.
    U8(Vec<u8>),
    /// Signed 32-bit integers.
    I32(Vec<i32>),
    /// Booleans, used for flags.
    Bool(Vec<bool>),
    /// Per-row neighbor index lists, as produced by [crate::knn].
    Neighbors(Vec<Vec<usize>>),
}

macro_rules! column_accessor {
    ($as_name:ident, $as_mut_name:ident, $variant:ident, $ty:ty) => {
        #[doc = concat!("Returns this column as a `", stringify!($ty), "` slice, if it is one.")]
        pub fn $as_name(&self) -> Result<&[$ty]> {
            match self {
                Column::$variant(values) => Ok(values),
                _ => Err(Error::ColumnTypeMismatch {
                    name: String::new(),
                    expected: stringify!($variant),
                }),
            }
        }

        #[doc = concat!("Returns this column as a mutable `", stringify!($ty), "` slice, if it is one.")]
        pub fn $as_mut_name(&mut self) -> Result<&mut [$ty]> {
            match self {
                Column::$variant(values) => Ok(values),
                _ => Err(Error::ColumnTypeMismatch {
                    name: String::new(),
                    expected: stringify!($variant),
                }),
            }
        }
    };
}

impl Column {
    column_accessor!(as_f64, as_f64_mut, F64, f64);
    column_accessor!(as_f32, as_f32_mut, F32, f32);
    column_accessor!(as_u64, as_u64_mut, U64, u64);
    column_accessor!(as_u32, as_u32_mut, U32, u32);
    column_accessor!(as_u16, as_u16_mut, U16, u16);
    column_accessor!(as_u8, as_u8_mut, U8, u8);
    column_accessor!(as_i32, as_i32_mut, I32, i32);
    column_accessor!(as_bool, as_bool_mut, Bool, bool);

    /// The number of rows in this column.
    pub fn len(&self) -> usize {
        match self {
            Column::F64(v) => v.len(),
            Column::F32(v) => v.len(),
            Column::U64(v) => v.len(),
            Column::U32(v) => v.len(),
            Column::U16(v) => v.len(),
            Column::U8(v) => v.len(),
            Column::I32(v) => v.len(),
            Column::Bool(v) => v.len(),
            Column::Neighbors(v) => v.len(),
        }
    }

    /// True if this column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a new column holding only the rows selected by `bitmask`.
    fn retain(&self, bitmask: &[bool]) -> Column {
        macro_rules! keep {
            ($values:expr) => {
                $values
                    .iter()
                    .zip(bitmask)
                    .filter(|(_, &keep)| keep)
                    .map(|(v, _)| v.clone())
                    .collect()
            };
        }
        match self {
            Column::F64(v) => Column::F64(keep!(v)),
            Column::F32(v) => Column::F32(keep!(v)),
            Column::U64(v) => Column::U64(keep!(v)),
            Column::U32(v) => Column::U32(keep!(v)),
            Column::U16(v) => Column::U16(keep!(v)),
            Column::U8(v) => Column::U8(keep!(v)),
            Column::I32(v) => Column::I32(keep!(v)),
            Column::Bool(v) => Column::Bool(keep!(v)),
            Column::Neighbors(v) => Column::Neighbors(keep!(v)),
        }
    }
}

/// Options controlling construction of a [PointCloud] from a [Las] container.
///
/// Use [Default::default] and override only the fields you care about.
#[derive(Clone, Default)]
pub struct FromLasOptions {
    /// Attribute columns to extract, beyond the always-present `x`/`y`/`z`.
    ///
    /// An empty list extracts every attribute this module knows how to extract. Recognized
    /// names: `intensity`, `return_number`, `number_of_returns`, `classification`, `gps_time`,
    /// `scan_angle`, `user_data`, `point_source_id`, `nir`.
    pub attributes: Vec<String>,
    /// Restricts extraction to points whose coordinates fall within this extent.
    pub extent: Option<ExtentFilter>,
    /// Restricts extraction to a sub-range of ordinal point indices.
    pub sub_range: Option<SubRangeFilter>,
    /// An additional predicate evaluated against each raw point before extraction.
    pub filter: Option<std::sync::Arc<dyn Fn(&Point) -> bool + Send + Sync>>,
    /// The coordinate reference system to record on the resulting cloud.
    ///
    /// Reprojection is not performed; this is recorded as metadata only.
    pub crs: Option<String>,
}

impl std::fmt::Debug for FromLasOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromLasOptions")
            .field("attributes", &self.attributes)
            .field("extent", &self.extent)
            .field("sub_range", &self.sub_range)
            .field("filter", &self.filter.is_some())
            .field("crs", &self.crs)
            .finish()
    }
}

const KNOWN_ATTRIBUTES: &[&str] = &[
    "intensity",
    "return_number",
    "number_of_returns",
    "classification",
    "gps_time",
    "scan_angle",
    "user_data",
    "point_source_id",
    "nir",
];

fn extract_attribute(name: &str, points: &[Point]) -> Option<Column> {
    match name {
        "intensity" => Some(Column::U16(points.iter().map(|p| p.intensity).collect())),
        "return_number" => Some(Column::U8(points.iter().map(|p| p.return_number).collect())),
        "number_of_returns" => Some(Column::U8(
            points.iter().map(|p| p.number_of_returns).collect(),
        )),
        "classification" => Some(Column::U8(
            points.iter().map(|p| u8::from(p.classification)).collect(),
        )),
        "gps_time" => Some(Column::F64(
            points.iter().map(|p| p.gps_time.unwrap_or(f64::NAN)).collect(),
        )),
        "scan_angle" => Some(Column::F32(points.iter().map(|p| p.scan_angle).collect())),
        "user_data" => Some(Column::U8(points.iter().map(|p| p.user_data).collect())),
        "point_source_id" => Some(Column::U16(
            points.iter().map(|p| p.point_source_id).collect(),
        )),
        "nir" => Some(Column::U16(
            points.iter().map(|p| p.nir.unwrap_or(0)).collect(),
        )),
        _ => None,
    }
}

/// A columnar, struct-of-arrays point store.
///
/// # Examples
///
/// ```
/// use lidar_cloud::{Column, Las, Point, PointCloud};
/// use lidar_cloud::pointcloud::FromLasOptions;
///
/// let las = Las::from_points(vec![
///     Point { x: 1., y: 2., z: 3., ..Default::default() },
/// ]);
/// let cloud = PointCloud::from_las(&las, FromLasOptions::default()).unwrap();
/// assert_eq!(1, cloud.len());
/// assert_eq!(&[1.], cloud.x().unwrap());
/// ```
#[derive(Clone, Debug, Default)]
pub struct PointCloud {
    columns: Vec<(String, Column)>,
    crs: Option<String>,
}

impl PointCloud {
    /// Builds an empty point cloud.
    pub fn new() -> PointCloud {
        PointCloud::default()
    }

    /// Builds a point cloud from `x`/`y`/`z` coordinate columns.
    pub fn from_coordinates(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Result<PointCloud> {
        let len = x.len();
        if y.len() != len {
            return Err(Error::ColumnLengthMismatch {
                name: "y".to_string(),
                len: y.len(),
                expected: len,
            });
        }
        if z.len() != len {
            return Err(Error::ColumnLengthMismatch {
                name: "z".to_string(),
                len: z.len(),
                expected: len,
            });
        }
        let mut cloud = PointCloud::new();
        cloud.columns.push(("x".to_string(), Column::F64(x)));
        cloud.columns.push(("y".to_string(), Column::F64(y)));
        cloud.columns.push(("z".to_string(), Column::F64(z)));
        Ok(cloud)
    }

    /// Builds a point cloud from a [Las] container's points.
    ///
    /// Coordinates are taken from the already-rescaled [Point] values, not recomputed from raw
    /// integer coordinates; this is a deliberate simplification (see `DESIGN.md`).
    pub fn from_las(las: &Las, options: FromLasOptions) -> Result<PointCloud> {
        let mut points: Vec<Point> = las.points().collect();

        if let Some(sub_range) = &options.sub_range {
            let keep: HashSet<usize> = sub_range.indices().collect();
            points = points
                .into_iter()
                .enumerate()
                .filter(|(i, _)| keep.contains(i))
                .map(|(_, p)| p)
                .collect();
        }
        if let Some(extent) = &options.extent {
            points.retain(|p| extent.contains_point(p));
        }
        if let Some(filter) = &options.filter {
            points.retain(|p| filter(p));
        }

        let x = points.iter().map(|p| p.x).collect();
        let y = points.iter().map(|p| p.y).collect();
        let z = points.iter().map(|p| p.z).collect();
        let mut cloud = PointCloud::from_coordinates(x, y, z)?;

        let names: Vec<&str> = if options.attributes.is_empty() {
            KNOWN_ATTRIBUTES.to_vec()
        } else {
            options.attributes.iter().map(String::as_str).collect()
        };
        for name in names {
            if let Some(column) = extract_attribute(name, &points) {
                cloud.columns.push((name.to_string(), column));
            }
        }

        cloud.crs = options.crs;
        Ok(cloud)
    }

    /// The number of rows (points) in this cloud.
    pub fn len(&self) -> usize {
        self.columns.first().map(|(_, c)| c.len()).unwrap_or(0)
    }

    /// True if this cloud has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// This cloud's coordinate reference system, if recorded.
    pub fn crs(&self) -> Option<&str> {
        self.crs.as_deref()
    }

    /// Sets this cloud's coordinate reference system.
    pub fn set_crs(&mut self, crs: impl Into<String>) {
        self.crs = Some(crs.into());
    }

    /// Returns the named column, if present.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(column_name, _)| column_name == name)
            .map(|(_, column)| column)
    }

    /// Returns the names of every column, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Inserts a new column, or replaces an existing one with the same name.
    ///
    /// Fails if the column's length doesn't match this cloud's row count (unless this is the
    /// first column inserted).
    pub fn insert_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if !self.is_empty() && column.len() != self.len() {
            return Err(Error::ColumnLengthMismatch {
                name,
                len: column.len(),
                expected: self.len(),
            });
        }
        if let Some(existing) = self.columns.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = column;
        } else {
            self.columns.push((name, column));
        }
        Ok(())
    }

    fn required_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| Error::NoSuchColumn(name.to_string()))
    }

    /// Returns the `x` column.
    pub fn x(&self) -> Result<&[f64]> {
        self.required_column("x")?.as_f64()
    }

    /// Returns the `y` column.
    pub fn y(&self) -> Result<&[f64]> {
        self.required_column("y")?.as_f64()
    }

    /// Returns the `z` column.
    pub fn z(&self) -> Result<&[f64]> {
        self.required_column("z")?.as_f64()
    }

    /// Returns this cloud's coordinates as `(x, y, z)` triples.
    pub fn coordinates(&self) -> Result<Vec<Vector<f64>>> {
        let x = self.x()?;
        let y = self.y()?;
        let z = self.z()?;
        Ok((0..self.len())
            .map(|i| Vector {
                x: x[i],
                y: y[i],
                z: z[i],
            })
            .collect())
    }

    /// Returns the bounding box of this cloud's coordinates.
    pub fn bounds(&self) -> Result<Bounds> {
        let x = self.x()?;
        let y = self.y()?;
        let z = self.z()?;
        let mut bounds = Bounds::default();
        for i in 0..self.len() {
            bounds.grow(&Point {
                x: x[i],
                y: y[i],
                z: z[i],
                ..Default::default()
            });
        }
        Ok(bounds)
    }

    /// Returns a new cloud retaining only the rows selected by `bitmask`.
    ///
    /// `bitmask.len()` must equal `self.len()`.
    pub fn retain_bitmask(&self, bitmask: &[bool]) -> Result<PointCloud> {
        if bitmask.len() != self.len() {
            return Err(Error::ColumnLengthMismatch {
                name: "bitmask".to_string(),
                len: bitmask.len(),
                expected: self.len(),
            });
        }
        let columns = self
            .columns
            .iter()
            .map(|(name, column)| (name.clone(), column.retain(bitmask)))
            .collect();
        Ok(PointCloud {
            columns,
            crs: self.crs.clone(),
        })
    }

    /// Returns a new cloud retaining only the rows within `filter`'s extent.
    pub fn filter_extent(&self, filter: &ExtentFilter) -> Result<PointCloud> {
        let x = self.x()?;
        let y = self.y()?;
        let z = self.z()?;
        let bitmask: Vec<bool> = (0..self.len())
            .map(|i| filter.contains(x[i], y[i], z[i]))
            .collect();
        self.retain_bitmask(&bitmask)
    }

    /// Returns a new cloud retaining only the rows within `filter`'s sub-range.
    pub fn filter_sub_range(&self, filter: &SubRangeFilter) -> Result<PointCloud> {
        let bitmask: Vec<bool> = (0..self.len())
            .map(|i| filter.contains_index(i))
            .collect();
        self.retain_bitmask(&bitmask)
    }

    /// Returns a new cloud retaining only the rows for which `predicate` returns `true`.
    ///
    /// `predicate` receives the row index; use [PointCloud::column] to look up whatever columns
    /// it needs.
    pub fn filter<F: Fn(usize) -> bool>(&self, predicate: F) -> Result<PointCloud> {
        let bitmask: Vec<bool> = (0..self.len()).map(predicate).collect();
        self.retain_bitmask(&bitmask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    fn cloud() -> PointCloud {
        let las = Las::from_points(vec![
            Point {
                x: 1.,
                intensity: 10,
                ..Default::default()
            },
            Point {
                x: 5.,
                intensity: 20,
                ..Default::default()
            },
            Point {
                x: 9.,
                intensity: 30,
                ..Default::default()
            },
        ]);
        PointCloud::from_las(
            &las,
            FromLasOptions {
                attributes: vec!["intensity".to_string()],
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn from_las_extracts_requested_attributes() {
        let cloud = cloud();
        assert_eq!(3, cloud.len());
        assert_eq!(&[1., 5., 9.], cloud.x().unwrap());
        assert_eq!(&[10, 20, 30], cloud.column("intensity").unwrap().as_u16().unwrap());
    }

    #[test]
    fn insert_column_rejects_wrong_length() {
        let mut cloud = cloud();
        assert!(cloud
            .insert_column("bad", Column::F64(vec![1.]))
            .is_err());
    }

    #[test]
    fn filter_extent_retains_matching_rows() {
        let cloud = cloud();
        let filter = ExtentFilter::new(
            Vector {
                x: 0.,
                y: -1.,
                z: -1.,
            },
            Vector {
                x: 6.,
                y: 1.,
                z: 1.,
            },
        );
        let filtered = cloud.filter_extent(&filter).unwrap();
        assert_eq!(2, filtered.len());
        assert_eq!(&[1., 5.], filtered.x().unwrap());
    }

    #[test]
    fn filter_sub_range_retains_every_step() {
        let cloud = cloud();
        let filter = SubRangeFilter::new(0..3, 2).unwrap();
        let filtered = cloud.filter_sub_range(&filter).unwrap();
        assert_eq!(2, filtered.len());
        assert_eq!(&[1., 9.], filtered.x().unwrap());
    }
}
