//! Crate-wide error type.

use crate::point::Format;
use crate::Version;
use thiserror::Error;

/// Our error type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Wraps an `std::io::Error`.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wraps a `std::str::Utf8Error`.
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),

    /// Wraps a `std::num::TryFromIntError`.
    #[error(transparent)]
    TryFromInt(#[from] std::num::TryFromIntError),

    /// Wraps a `uuid::Error`.
    #[error(transparent)]
    Uuid(#[from] uuid::Error),

    /// The file signature was not "LASF".
    #[error("invalid file signature: {0:?}")]
    FileSignature([u8; 4]),

    /// This version does not support the requested feature.
    #[error("version {version} does not support the {feature} feature")]
    UnsupportedFeature {
        /// The version.
        version: Version,
        /// The name of the feature.
        feature: &'static str,
    },

    /// This version does not support this point format.
    #[error("version {version} does not support point format {format:?}")]
    Format {
        /// The version.
        version: Version,
        /// The unsupported point format.
        format: Format,
    },

    /// Point data record length is too short for this point format.
    #[error("the point data record length ({len}) is too short for format {format:?}")]
    PointDataRecordLength {
        /// The unsupported point format.
        format: Format,
        /// The invalid length.
        len: u16,
    },

    /// There's point padding, but no evlrs, so the point padding is unreachable.
    #[error("there is point padding, but no evlrs, so the point padding is unreachable")]
    PointPadding,

    /// The header is too large.
    #[error("the header is too large: {0}")]
    HeaderTooLarge(usize),

    /// The offset to the point data is too large.
    #[error("the offset to the point data is too large: {0}")]
    OffsetToPointDataTooLarge(usize),

    /// Too many points for this version of LAS.
    #[error("too many points ({n}) for version {version}")]
    TooManyPoints {
        /// The number of points.
        n: u64,
        /// The version.
        version: Version,
    },

    /// Too many vlrs.
    #[error("too many vlrs: {0}")]
    TooManyVlrs(usize),

    /// Too many evlrs.
    #[error("too many evlrs: {0}")]
    TooManyEvlrs(usize),

    /// Data for a variable length record is too long.
    #[error("vlr data is too long: {0}")]
    VlrDataTooLong(usize),

    /// An invalid classification value.
    #[error("invalid classification: {0}")]
    Classification(u8),

    /// An invalid return number, either out of range for this point's format or unsupported by
    /// the version that is meant to write it.
    #[error("invalid return number {return_number}")]
    ReturnNumber {
        /// The return number.
        return_number: u8,
        /// The version that does not support this many returns, if relevant.
        version: Option<Version>,
    },

    /// An invalid scanner channel.
    #[error("invalid scanner channel: {0}")]
    ScannerChannel(u8),

    /// A classification was marked overlap, but the point format doesn't support overlap
    /// classifications.
    #[error("point format {0:?} does not support overlap classification")]
    OverlapClassification(Format),

    /// An invalid point format number.
    #[error("invalid point format number: {0}")]
    FormatNumber(u8),

    /// The header already has a CRS vlr.
    #[error("the header already has a crs vlr")]
    HeaderContainsCrsVlr,

    /// The WKT crs vlr could not be read.
    #[error("could not read wkt crs")]
    UnreadableWktCrs,

    /// The GeoTIFF crs vlrs could not be read.
    #[error("could not read geotiff crs")]
    UnreadableGeoTiffCrs,

    /// The crs was user-defined, with no EPSG equivalent.
    #[error("crs is user-defined and has no epsg equivalent")]
    UserDefinedCrs,

    /// This combination of GeoTIFF string and double data isn't implemented.
    #[error("unimplemented geotiff key data: {0}")]
    UnimplementedForGeoTiffStringAndDoubleData(String),

    /// The GeoTIFF key has no defined data.
    #[error("no data defined for geotiff key {0}")]
    UndefinedDataForGeoTiffKey(u16),

    /// The requested attribute doesn't exist on this point cloud or point view.
    #[error("no such attribute: {0}")]
    MissingAttribute(String),

    /// The point cloud's columns have mismatched lengths.
    #[error("column {name} has length {len}, expected {expected}")]
    ColumnLengthMismatch {
        /// The offending column.
        name: String,
        /// The offending column's length.
        len: usize,
        /// The expected length, i.e. the row count of the point cloud.
        expected: usize,
    },

    /// An index was out of bounds.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// The length of the collection being indexed.
        len: usize,
    },

    /// A laz-specific error, only available when the `laz` feature is enabled.
    #[cfg(feature = "laz")]
    #[error(transparent)]
    Laz(#[from] laz::LasZipError),

    /// The data is laz-compressed, but this crate was built without the `laz` feature.
    #[error("this data is laz-compressed, but the `laz` feature is not enabled")]
    LaszipNotEnabled,

    /// A laszip vlr was expected, but not found.
    #[error("no laszip vlr was found")]
    LasZipVlrNotFound,

    /// The writer has already been closed.
    #[error("this writer is already closed")]
    ClosedWriter,

    /// A point's set of optional attributes doesn't match its point format.
    #[error("point attributes do not match format {0:?}")]
    PointAttributesDoNotMatch(Format),

    /// A sub-range filter step must be strictly positive.
    #[error("sub-range filter step must be positive, got {0}")]
    NegativeStep(i64),

    /// An in-place filter was requested on a view that doesn't own or mask its points.
    #[error("filter_in_place requires an owned or masked point view")]
    NotFilterableInPlace,

    /// A column was accessed as the wrong type.
    #[error("column {name} is not a {expected} column")]
    ColumnTypeMismatch {
        /// The column's name.
        name: String,
        /// The type that was requested.
        expected: &'static str,
    },

    /// A named column doesn't exist in a point cloud.
    #[error("no column named {0}")]
    NoSuchColumn(String),

    /// A generic, ad-hoc error message, used sparingly for conditions that don't warrant their
    /// own variant.
    #[error("{0}")]
    Other(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
