//! Point data record formats.

use crate::{Error, Result};

/// The length, in bytes, of the fields common to every point format.
const BASE_LEN: u16 = 20;

/// Describes the layout of a point data record format (0 through 10).
///
/// A `Format` doesn't just carry the format number — it also carries the number of extra bytes
/// tacked on to the end of each point record, since that's only knowable once a header's point
/// data record length is compared against the format's base length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Format {
    /// The format number, zero through ten.
    pub number: u8,

    /// Is this one of the "extended" formats (6 through 10), with three-byte flags and a
    /// two-byte scaled scan angle?
    pub is_extended: bool,

    /// Does this format include a gps time field?
    pub has_gps_time: bool,

    /// Does this format include red, green, and blue color fields?
    pub has_color: bool,

    /// Does this format include a near infrared field?
    pub has_nir: bool,

    /// Does this format include waveform fields?
    pub has_waveform: bool,

    /// The number of extra bytes tacked on to the end of each point record.
    pub extra_bytes: u16,

    /// Is this point format laz-compressed?
    ///
    /// This isn't a real on-disk attribute of a point format — it's communicated via a separate
    /// vlr and a flag on the point data record format number — but it's convenient to carry it
    /// alongside the rest of the format's shape.
    pub is_compressed: bool,
}

impl Format {
    /// Creates a new format for the given format number.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::point::Format;
    /// let format = Format::new(1).unwrap();
    /// assert!(Format::new(11).is_err());
    /// ```
    pub fn new(number: u8) -> Result<Format> {
        let (is_extended, has_gps_time, has_color, has_nir, has_waveform) = match number {
            0 => (false, false, false, false, false),
            1 => (false, true, false, false, false),
            2 => (false, false, true, false, false),
            3 => (false, true, true, false, false),
            4 => (false, true, false, false, true),
            5 => (false, true, true, false, true),
            6 => (true, true, false, false, false),
            7 => (true, true, true, false, false),
            8 => (true, true, true, true, false),
            9 => (true, true, false, false, true),
            10 => (true, true, true, true, true),
            _ => return Err(Error::FormatNumber(number)),
        };
        Ok(Format {
            number,
            is_extended,
            has_gps_time,
            has_color,
            has_nir,
            has_waveform,
            extra_bytes: 0,
            is_compressed: false,
        })
    }

    /// Returns the total length, in bytes, of a point record in this format, including any
    /// extra bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::point::Format;
    /// assert_eq!(20, Format::new(0).unwrap().len());
    /// assert_eq!(28, Format::new(1).unwrap().len());
    /// ```
    pub fn len(&self) -> u16 {
        let mut n = BASE_LEN;
        if self.has_gps_time {
            n += 8;
        }
        if self.has_color {
            n += 6;
        }
        if self.has_nir {
            n += 2;
        }
        if self.has_waveform {
            n += 29;
        }
        n + self.extra_bytes
    }

    /// Returns true if this format has no point records, i.e. its length is zero.
    ///
    /// This can never actually happen for a valid format, but is provided for parity with other
    /// length-bearing types.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the point format number as a `u8`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::point::Format;
    /// assert_eq!(Some(0), Format::new(0).unwrap().to_u8());
    /// ```
    pub fn to_u8(&self) -> Option<u8> {
        Some(self.number)
    }

    /// Returns the point format number as a `u8`, suitable for writing to a header.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::point::Format;
    /// assert_eq!(0, Format::new(0).unwrap().to_writable_u8().unwrap());
    /// ```
    pub fn to_writable_u8(&self) -> Result<u8> {
        if self.number > 10 {
            return Err(Error::FormatNumber(self.number));
        }
        Ok(self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_format_number() {
        assert!(Format::new(11).is_err());
    }

    #[test]
    fn lengths() {
        assert_eq!(20, Format::new(0).unwrap().len());
        assert_eq!(28, Format::new(1).unwrap().len());
        assert_eq!(26, Format::new(2).unwrap().len());
        assert_eq!(34, Format::new(3).unwrap().len());
        assert_eq!(57, Format::new(4).unwrap().len());
        assert_eq!(63, Format::new(5).unwrap().len());
        assert_eq!(30, Format::new(6).unwrap().len());
        assert_eq!(36, Format::new(7).unwrap().len());
        assert_eq!(38, Format::new(8).unwrap().len());
        assert_eq!(59, Format::new(9).unwrap().len());
        assert_eq!(67, Format::new(10).unwrap().len());
    }

    #[test]
    fn extra_bytes_included() {
        let mut format = Format::new(0).unwrap();
        format.extra_bytes = 4;
        assert_eq!(24, format.len());
    }

    #[test]
    fn extended_formats() {
        for number in 6..=10 {
            assert!(Format::new(number).unwrap().is_extended);
        }
        for number in 0..=5 {
            assert!(!Format::new(number).unwrap().is_extended);
        }
    }
}
