//! Parallel, optionally neighborhood-aware, per-row map over a [PointCloud].
//!
//! [apply] runs `function` once per row, in parallel via [rayon], handing it the row index and
//! (depending on [Neighbors]) a list of neighbor indices to consult. `function` is free to read
//! any column off the cloud itself; `columns` exists so [apply] can fail fast, before spending any
//! work, if one of the columns the caller says it needs doesn't exist.

use crate::knn::neighbors as k_nearest_neighbors;
use crate::{Error, PointCloud, Result};
use rayon::prelude::*;

/// Controls what neighbor information [apply] computes for each row before calling `function`.
#[derive(Clone, Debug)]
pub enum Neighbors {
    /// No neighbor list; `function` receives an empty slice.
    Disabled,
    /// Reuse the cloud's existing `neighbors` column (see
    /// [Column::Neighbors](crate::Column::Neighbors)).
    ///
    /// Fails if the cloud has no such column.
    Column,
    /// Compute the `k` nearest neighbors of every row on the fly, via [crate::knn].
    Nearest(usize),
    /// Use an explicit, caller-supplied neighbor list, one entry per row.
    ///
    /// Fails if the list's length doesn't match the cloud's row count.
    Explicit(Vec<Vec<usize>>),
}

fn resolve_neighbors(cloud: &PointCloud, neighbors: &Neighbors) -> Result<Vec<Vec<usize>>> {
    match neighbors {
        Neighbors::Disabled => Ok(vec![Vec::new(); cloud.len()]),
        Neighbors::Column => {
            let column = cloud
                .column("neighbors")
                .ok_or_else(|| Error::NoSuchColumn("neighbors".to_string()))?;
            match column {
                crate::Column::Neighbors(lists) => Ok(lists.clone()),
                _ => Err(Error::ColumnTypeMismatch {
                    name: "neighbors".to_string(),
                    expected: "Neighbors",
                }),
            }
        }
        Neighbors::Nearest(k) => {
            let positions: Vec<[f64; 3]> = cloud
                .coordinates()?
                .into_iter()
                .map(|v| [v.x, v.y, v.z])
                .collect();
            Ok(k_nearest_neighbors(&positions, *k))
        }
        Neighbors::Explicit(lists) => {
            if lists.len() != cloud.len() {
                return Err(Error::ColumnLengthMismatch {
                    name: "neighbors".to_string(),
                    len: lists.len(),
                    expected: cloud.len(),
                });
            }
            Ok(lists.clone())
        }
    }
}

/// Applies `function` to every row of `cloud`, in parallel.
///
/// `columns` lists the columns `function` intends to read; [apply] checks they all exist before
/// doing any work, but otherwise doesn't restrict what `function` may access through `cloud`.
///
/// # Examples
///
/// ```
/// use lidar_cloud::apply::{apply, Neighbors};
/// use lidar_cloud::{Las, Point, PointCloud};
/// use lidar_cloud::pointcloud::FromLasOptions;
///
/// let las = Las::from_points(vec![
///     Point { x: 1., ..Default::default() },
///     Point { x: 2., ..Default::default() },
/// ]);
/// let cloud = PointCloud::from_las(&las, FromLasOptions::default()).unwrap();
/// let doubled = apply(&cloud, &["x"], Neighbors::Disabled, |cloud, i, _neighbors| {
///     cloud.x().unwrap()[i] * 2.
/// })
/// .unwrap();
/// assert_eq!(vec![2., 4.], doubled);
/// ```
pub fn apply<T, F>(
    cloud: &PointCloud,
    columns: &[&str],
    neighbors: Neighbors,
    function: F,
) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(&PointCloud, usize, &[usize]) -> T + Sync,
{
    for name in columns {
        if cloud.column(name).is_none() {
            return Err(Error::NoSuchColumn(name.to_string()));
        }
    }
    let neighbor_lists = resolve_neighbors(cloud, &neighbors)?;
    Ok((0..cloud.len())
        .into_par_iter()
        .map(|i| function(cloud, i, &neighbor_lists[i]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointcloud::FromLasOptions;
    use crate::{Las, Point};

    fn cloud() -> PointCloud {
        let las = Las::from_points(vec![
            Point {
                x: 0.,
                ..Default::default()
            },
            Point {
                x: 1.,
                ..Default::default()
            },
            Point {
                x: 10.,
                ..Default::default()
            },
        ]);
        PointCloud::from_las(&las, FromLasOptions::default()).unwrap()
    }

    #[test]
    fn fails_fast_on_unknown_column() {
        let cloud = cloud();
        let result = apply(&cloud, &["nope"], Neighbors::Disabled, |_, i, _| i);
        assert!(result.is_err());
    }

    #[test]
    fn disabled_neighbors_gives_empty_slices() {
        let cloud = cloud();
        let lengths = apply(&cloud, &[], Neighbors::Disabled, |_, _, n| n.len()).unwrap();
        assert_eq!(vec![0, 0, 0], lengths);
    }

    #[test]
    fn nearest_neighbors_are_computed_per_row() {
        let cloud = cloud();
        let nearest = apply(&cloud, &[], Neighbors::Nearest(1), |_, _, n| n.to_vec()).unwrap();
        assert_eq!(vec![1], nearest[0]);
        assert_eq!(vec![0], nearest[1]);
        assert_eq!(vec![1], nearest[2]);
    }

    #[test]
    fn explicit_neighbors_reject_wrong_length() {
        let cloud = cloud();
        let result = apply(
            &cloud,
            &[],
            Neighbors::Explicit(vec![vec![]]),
            |_, _, n| n.len(),
        );
        assert!(result.is_err());
    }
}
