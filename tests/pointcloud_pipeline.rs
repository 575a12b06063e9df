//! End-to-end exercise of the in-memory processing layer: build a `Las` in memory, turn it into a
//! `PointCloud`, then filter, apply, and rasterize it.

use lidar_cloud::apply::{apply, Neighbors};
use lidar_cloud::pointcloud::FromLasOptions;
use lidar_cloud::raster::{rasterize, RasterMode};
use lidar_cloud::{ExtentFilter, Las, Point, PointCloud, SubRangeFilter, Vector};

fn grid_points(side: i32) -> Vec<Point> {
    let mut points = Vec::new();
    for i in 0..side {
        for j in 0..side {
            points.push(Point {
                x: i as f64,
                y: j as f64,
                z: (i + j) as f64,
                intensity: ((i * side + j) % u16::MAX as i32) as u16,
                ..Default::default()
            });
        }
    }
    points
}

#[test]
fn full_pipeline_from_las_to_raster() {
    let las = Las::from_points(grid_points(10));
    let cloud = PointCloud::from_las(
        &las,
        FromLasOptions {
            attributes: vec!["intensity".to_string()],
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(100, cloud.len());

    let extent = ExtentFilter::new(
        Vector {
            x: 0.,
            y: 0.,
            z: 0.,
        },
        Vector {
            x: 4.,
            y: 4.,
            z: 100.,
        },
    );
    let subset = cloud.filter_extent(&extent).unwrap();
    assert!(subset.len() < cloud.len());
    assert!(subset.x().unwrap().iter().all(|&x| (0. ..=4.).contains(&x)));

    let sub_range = SubRangeFilter::new(0..subset.len(), 2).unwrap();
    let every_other = subset.filter_sub_range(&sub_range).unwrap();
    assert_eq!((subset.len() + 1) / 2, every_other.len());

    let doubled = apply(
        &every_other,
        &["intensity"],
        Neighbors::Nearest(4),
        |cloud, i, neighbors| {
            let intensity = cloud.column("intensity").unwrap().as_u16().unwrap()[i];
            (intensity as usize) + neighbors.len()
        },
    )
    .unwrap();
    assert_eq!(every_other.len(), doubled.len());

    let raster = rasterize(&cloud, 2.0, RasterMode::Footprint).unwrap();
    assert_eq!(cloud.len(), raster.point_indices.len());

    let nearest_raster = rasterize(&cloud, 2.0, RasterMode::Nearest(3)).unwrap();
    for row in 0..nearest_raster.grid.ny {
        for column in 0..nearest_raster.grid.nx {
            assert_eq!(3, nearest_raster.cell_points(column, row).len());
        }
    }
}

#[test]
fn las_filter_and_pointcloud_agree_on_row_count() {
    let las = Las::from_points(grid_points(5));
    let filtered_las = las.filter(|p| p.x < 2.);
    let cloud = PointCloud::from_las(&filtered_las, FromLasOptions::default()).unwrap();
    assert_eq!(filtered_las.len(), cloud.len());
}
