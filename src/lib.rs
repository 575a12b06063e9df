//! Reads, writes, and analyzes [ASPRS
//! LAS](https://www.asprs.org/committee-general/laser-las-file-format-exchange-activities.html)
//! lidar point cloud data, point formats zero through ten, versions 1.0 through 1.4, with
//! optional laszip compression.
//!
//! Beyond the binary codec, this crate builds an in-memory processing layer on top of it:
//!
//! - [points] holds a family of [PointView](points::PointView) implementations (owned, mapped,
//!   streamed, masked, indexed, and attribute-overlaid) that a [Las] container can sit on without
//!   ever materializing a copy it doesn't need.
//! - [Las] aggregates a [Header] and a point view into a single container with filtering,
//!   attribute-overlay updates, and recomputed summary statistics.
//! - [PointCloud] is a columnar, struct-of-arrays store built from one or more [Las] containers,
//!   with a dynamic, runtime-typed attribute schema.
//! - [knn] and [apply] provide a k-d tree neighbor index and a parallel per-point/per-neighborhood
//!   map over a [PointCloud]'s columns.
//! - [raster] bins a [PointCloud] onto a regular 2D grid by footprint, radius, or k-NN.
//! - [filter] composes predicate, extent, and sub-range filters over both [Las] and [PointCloud].
//!
//! # Reading points
//!
//! Use a [Reader] to read one or more points:
//!
//! ```
//! use lidar_cloud::Reader;
//! let mut reader = Reader::from_path("tests/data/autzen.las").unwrap();
//!
//! let point = reader.read_point().unwrap().unwrap();
//! for point in reader.points() {
//!     let point = point.unwrap();
//!     let x = point.x;
//!     // etc.
//! }
//! ```
//!
//! # Writing points
//!
//! A [Writer] writes points to anything that implements `Write + Seek`. If you're comfortable
//! with reasonable default settings, use a [Writer] directly:
//!
//! ```
//! use lidar_cloud::{Point, Writer};
//! let mut writer = Writer::default();
//! let mut point = Point::default();
//! point.x = 1.;
//! writer.write_point(point).unwrap();
//! ```
//!
//! In order to configure the `Writer`, e.g. to set the LAS version or point format, use a
//! [Builder]:
//!
//! ```
//! use std::io::Cursor;
//! use lidar_cloud::Builder;
//!
//! let mut builder = Builder::from((1, 4));
//! builder.point_format = lidar_cloud::point::Format::new(1).unwrap();
//! let header = builder.into_header().unwrap();
//! let writer = lidar_cloud::Writer::new(Cursor::new(Vec::new()), header).unwrap();
//! ```
//!
//! A [Writer] implements `Drop`, which it uses to re-write the header with the point count and
//! other metadata when the writer goes out of scope. If this re-write fails, the drop impl
//! panics, so if that's unacceptable, close the writer yourself:
//!
//! ```
//! use lidar_cloud::Writer;
//! {
//!     let mut writer = Writer::default();
//!     writer.close().unwrap();
//! } // `close` is not called again
//! ```
//!
//! # Laszip compression
//!
//! Enable the `laz` feature to read and write laszip-compressed point data. The `laz-parallel`
//! feature additionally enables multi-threaded (de)compression via [LazParallelism].

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]

pub mod apply;
pub mod bounds;
pub mod crs;
mod error;
pub mod feature;
mod filter;
mod gps_time_type;
pub mod header;
pub mod knn;
mod las;
#[cfg(feature = "laz")]
pub mod laz;
pub mod point;
pub mod pointcloud;
pub mod points;
pub mod raw;
pub mod raster;
pub mod reader;
mod transform;
pub mod utils;
mod vector;
mod version;
pub mod vlr;
pub mod writer;

pub use bounds::Bounds;
pub use error::{Error, Result};
pub use feature::Feature;
pub use filter::{ExtentFilter, SubRangeFilter};
pub use gps_time_type::GpsTimeType;
pub use header::{Builder, Header};
pub use las::Las;
pub use point::{Color, Point};
pub use pointcloud::{Column, PointCloud};
#[allow(deprecated)]
pub use reader::Read;
#[cfg(feature = "laz")]
pub use reader::LazParallelism;
pub use reader::{Reader, ReaderOptions};
pub use transform::{RoundingMode, Transform};
pub use vector::Vector;
pub use version::Version;
pub use vlr::Vlr;
#[allow(deprecated)]
pub use writer::Write;
pub use writer::{Writer, WriterOptions};
