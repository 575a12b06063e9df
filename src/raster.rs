//! Bins a [PointCloud] onto a regular 2D grid.
//!
//! Output is CSR-style: `offsets[cell]..offsets[cell + 1]` indexes into `point_indices` to list
//! the points assigned to that cell. `offsets` is always non-decreasing and has `grid.len() + 1`
//! entries, the same shape rayon/bytemuck-backed sparse structures in the rest of this crate's
//! dependency tree favor for exactly this reason: it's a flat, contiguous, trivially-`Pod` layout.

use crate::knn::KdTree;
use crate::{PointCloud, Result};
use rayon::prelude::*;

/// A regular 2D grid over an `(x, y)` extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    /// The grid's minimum corner.
    pub origin: (f64, f64),
    /// The side length of each (square) cell.
    pub cell_size: f64,
    /// The number of columns.
    pub nx: usize,
    /// The number of rows.
    pub ny: usize,
}

impl Grid {
    /// Builds the smallest grid of `cell_size`-sided cells that covers `[min, max]`.
    pub fn covering(min: (f64, f64), max: (f64, f64), cell_size: f64) -> Grid {
        let nx = (((max.0 - min.0) / cell_size).ceil() as usize).max(1);
        let ny = (((max.1 - min.1) / cell_size).ceil() as usize).max(1);
        Grid {
            origin: min,
            cell_size,
            nx,
            ny,
        }
    }

    /// The total number of cells.
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    /// True if this grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the `(column, row)` of the cell containing `(x, y)`, or `None` if outside the
    /// grid.
    pub fn cell(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let cx = ((x - self.origin.0) / self.cell_size).floor();
        let cy = ((y - self.origin.1) / self.cell_size).floor();
        if cx < 0. || cy < 0. {
            return None;
        }
        let (cx, cy) = (cx as usize, cy as usize);
        if cx >= self.nx || cy >= self.ny {
            None
        } else {
            Some((cx, cy))
        }
    }

    /// Returns the flat index of cell `(column, row)`.
    pub fn flat_index(&self, column: usize, row: usize) -> usize {
        row * self.nx + column
    }

    /// Returns the `(x, y)` center of cell `(column, row)`.
    pub fn center(&self, column: usize, row: usize) -> (f64, f64) {
        (
            self.origin.0 + (column as f64 + 0.5) * self.cell_size,
            self.origin.1 + (row as f64 + 0.5) * self.cell_size,
        )
    }
}

/// How points are assigned to grid cells.
#[derive(Clone, Copy, Debug)]
pub enum RasterMode {
    /// Each point is assigned to the single cell containing its `(x, y)` footprint.
    ///
    /// Guarantees a partition: every point appears in exactly one cell's list.
    Footprint,
    /// Each cell lists every point within `radius` of the cell's center.
    ///
    /// A point may appear in zero, one, or many cells.
    Radius(f64),
    /// Each cell lists the `k` points nearest its center.
    ///
    /// Guarantees every non-empty cloud's cells list exactly `min(k, len)` points.
    Nearest(usize),
}

/// A CSR-encoded binning of a [PointCloud] onto a [Grid].
#[derive(Clone, Debug)]
pub struct Raster {
    /// The grid the points were binned onto.
    pub grid: Grid,
    /// Cell `c`'s points are `point_indices[offsets[c]..offsets[c + 1]]`.
    pub offsets: Vec<usize>,
    /// Point indices, grouped by cell.
    pub point_indices: Vec<usize>,
}

impl Raster {
    /// Returns the point indices assigned to cell `(column, row)`.
    pub fn cell_points(&self, column: usize, row: usize) -> &[usize] {
        let cell = self.grid.flat_index(column, row);
        &self.point_indices[self.offsets[cell]..self.offsets[cell + 1]]
    }
}

/// Bins `cloud`'s points onto a grid of `cell_size`-sided cells, using `mode` to decide cell
/// membership.
///
/// # Examples
///
/// ```
/// use lidar_cloud::pointcloud::FromLasOptions;
/// use lidar_cloud::raster::{rasterize, RasterMode};
/// use lidar_cloud::{Las, Point, PointCloud};
///
/// let las = Las::from_points(vec![
///     Point { x: 0.5, y: 0.5, ..Default::default() },
///     Point { x: 1.5, y: 0.5, ..Default::default() },
/// ]);
/// let cloud = PointCloud::from_las(&las, FromLasOptions::default()).unwrap();
/// let raster = rasterize(&cloud, 1.0, RasterMode::Footprint).unwrap();
/// assert_eq!(2, raster.point_indices.len());
/// ```
pub fn rasterize(cloud: &PointCloud, cell_size: f64, mode: RasterMode) -> Result<Raster> {
    let x = cloud.x()?;
    let y = cloud.y()?;
    let (min, max) = extent(x, y);
    let grid = Grid::covering(min, max, cell_size);

    let buckets = match mode {
        RasterMode::Footprint => footprint_buckets(&grid, x, y),
        RasterMode::Radius(radius) => radius_buckets(&grid, x, y, radius),
        RasterMode::Nearest(k) => nearest_buckets(&grid, x, y, k),
    };

    let mut offsets = Vec::with_capacity(grid.len() + 1);
    let mut point_indices = Vec::new();
    offsets.push(0);
    for bucket in buckets {
        point_indices.extend(bucket);
        offsets.push(point_indices.len());
    }

    Ok(Raster {
        grid,
        offsets,
        point_indices,
    })
}

fn extent(x: &[f64], y: &[f64]) -> ((f64, f64), (f64, f64)) {
    let mut min = (f64::INFINITY, f64::INFINITY);
    let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for i in 0..x.len() {
        min.0 = min.0.min(x[i]);
        min.1 = min.1.min(y[i]);
        max.0 = max.0.max(x[i]);
        max.1 = max.1.max(y[i]);
    }
    if !min.0.is_finite() {
        min = (0., 0.);
        max = (0., 0.);
    }
    (min, max)
}

fn footprint_buckets(grid: &Grid, x: &[f64], y: &[f64]) -> Vec<Vec<usize>> {
    let mut buckets = vec![Vec::new(); grid.len()];
    for i in 0..x.len() {
        if let Some((cx, cy)) = grid.cell(x[i], y[i]) {
            buckets[grid.flat_index(cx, cy)].push(i);
        }
    }
    buckets
}

fn radius_buckets(grid: &Grid, x: &[f64], y: &[f64], radius: f64) -> Vec<Vec<usize>> {
    (0..grid.ny)
        .into_par_iter()
        .flat_map(|row| {
            (0..grid.nx).into_par_iter().map(move |column| {
                let (cx, cy) = grid.center(column, row);
                (0..x.len())
                    .filter(|&i| {
                        let dx = x[i] - cx;
                        let dy = y[i] - cy;
                        (dx * dx + dy * dy).sqrt() <= radius
                    })
                    .collect::<Vec<usize>>()
            })
        })
        .collect()
}

fn nearest_buckets(grid: &Grid, x: &[f64], y: &[f64], k: usize) -> Vec<Vec<usize>> {
    let positions: Vec<[f64; 3]> = (0..x.len()).map(|i| [x[i], y[i], 0.]).collect();
    let tree = KdTree::new(&positions);
    (0..grid.ny)
        .into_par_iter()
        .flat_map(|row| {
            (0..grid.nx).into_par_iter().map(move |column| {
                let (cx, cy) = grid.center(column, row);
                tree.k_nearest(&[cx, cy, 0.], k)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointcloud::FromLasOptions;
    use crate::{Las, Point};

    fn cloud() -> PointCloud {
        let las = Las::from_points(vec![
            Point {
                x: 0.5,
                y: 0.5,
                ..Default::default()
            },
            Point {
                x: 1.5,
                y: 0.5,
                ..Default::default()
            },
            Point {
                x: 0.6,
                y: 0.5,
                ..Default::default()
            },
        ]);
        PointCloud::from_las(&las, FromLasOptions::default()).unwrap()
    }

    #[test]
    fn footprint_partitions_points() {
        let raster = rasterize(&cloud(), 1.0, RasterMode::Footprint).unwrap();
        assert_eq!(3, raster.point_indices.len());
        assert_eq!(
            raster.offsets.last().copied(),
            Some(raster.point_indices.len())
        );
        for i in 1..raster.offsets.len() {
            assert!(raster.offsets[i] >= raster.offsets[i - 1]);
        }
    }

    #[test]
    fn nearest_guarantees_k_points_per_cell() {
        let raster = rasterize(&cloud(), 1.0, RasterMode::Nearest(2)).unwrap();
        for row in 0..raster.grid.ny {
            for column in 0..raster.grid.nx {
                assert_eq!(2, raster.cell_points(column, row).len());
            }
        }
    }

    #[test]
    fn radius_can_assign_a_point_to_multiple_cells() {
        let raster = rasterize(&cloud(), 1.0, RasterMode::Radius(5.0)).unwrap();
        assert!(raster.point_indices.len() >= 3);
    }
}
