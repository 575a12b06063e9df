use crate::feature::Feature;
use crate::point::Format;
use crate::{Error, Result};
use std::fmt;

/// LAS version, major and minor.
///
/// Only 1.0 through 1.4 are supported. The major version is fixed at one; the
/// minor version selects which header fields, point data record formats, and
/// VLR types are legal.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Version {
    /// The major version. Always 1 for every version of LAS published so far.
    pub major: u8,
    /// The minor version, 0 through 4.
    pub minor: u8,
}

impl Version {
    /// Creates a new version.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::Version;
    /// let version = Version::new(1, 2);
    /// ```
    pub fn new(major: u8, minor: u8) -> Version {
        Version { major, minor }
    }

    /// Returns true if this version supports the given feature.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::Version;
    /// use lidar_cloud::feature::Waveforms;
    /// assert!(!Version::new(1, 2).supports::<Waveforms>());
    /// assert!(Version::new(1, 4).supports::<Waveforms>());
    /// ```
    pub fn supports<F: Feature>(self) -> bool {
        F::is_supported_by(self)
    }

    /// Returns an error if this version does not support the given feature.
    pub fn verify_support_for<F: Feature>(self) -> Result<()> {
        if self.supports::<F>() {
            Ok(())
        } else {
            Err(Error::UnsupportedFeature {
                version: self,
                feature: F::name(),
            })
        }
    }

    /// Returns true if this version supports the given point format.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::{Version, point::Format};
    /// assert!(!Version::new(1, 1).supports_point_format(Format::new(3).unwrap()));
    /// assert!(Version::new(1, 2).supports_point_format(Format::new(3).unwrap()));
    /// ```
    pub fn supports_point_format(self, format: Format) -> bool {
        let minimum_minor = match format.number {
            0 | 1 => 0,
            2 | 3 => 2,
            4 | 5 => 3,
            6..=10 => 4,
            _ => return false,
        };
        self.minor >= minimum_minor
    }

    /// Returns the size in bytes of the fixed portion of the header for this version.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::Version;
    /// assert_eq!(227, Version::new(1, 2).header_size());
    /// assert_eq!(375, Version::new(1, 4).header_size());
    /// ```
    pub fn header_size(self) -> u16 {
        match self.minor {
            0 | 1 | 2 => 227,
            3 => 235,
            _ => 375,
        }
    }

    /// Does this version require the two-byte 0xCCDD signature before point data?
    pub fn requires_point_data_start_signature(self) -> bool {
        self.minor == 0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl From<(u8, u8)> for Version {
    fn from((major, minor): (u8, u8)) -> Version {
        Version { major, minor }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_sizes() {
        assert_eq!(227, Version::new(1, 0).header_size());
        assert_eq!(227, Version::new(1, 1).header_size());
        assert_eq!(227, Version::new(1, 2).header_size());
        assert_eq!(235, Version::new(1, 3).header_size());
        assert_eq!(375, Version::new(1, 4).header_size());
    }

    #[test]
    fn display() {
        assert_eq!("1.2", Version::new(1, 2).to_string());
    }

    #[test]
    fn point_data_start_signature() {
        assert!(Version::new(1, 0).requires_point_data_start_signature());
        assert!(!Version::new(1, 2).requires_point_data_start_signature());
    }
}
