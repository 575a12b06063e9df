//! Variable length records.
//!
//! These store additional data that isn't part of the standard header, such as spatial reference
//! information, laszip compression parameters, or extra byte descriptors.

use crate::raw::{self, RecordLength};
use crate::utils::{AsLasStr, FromLasStr};
use crate::Result;

/// The fixed size, in bytes, of a vlr header excluding its data (reserved + user id + record id
/// + record length + description).
const VLR_HEADER_LEN: usize = 54;
/// Same as [VLR_HEADER_LEN], but for extended vlrs, which use a `u64` record length.
const EVLR_HEADER_LEN: usize = 60;

/// A variable length record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vlr {
    /// The User ID field is ASCII character data that identifies the user which created the
    /// variable length record.
    pub user_id: String,

    /// The Record ID is dependent upon the User ID, and is managed by whoever owns that User ID.
    pub record_id: u16,

    /// Optional, null terminated text description of the data.
    pub description: String,

    /// The raw bytes of the record.
    pub data: Vec<u8>,
}

impl Vlr {
    /// Creates a cooked vlr from a raw one.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::{raw, Vlr};
    /// let vlr = Vlr::new(raw::Vlr::default());
    /// ```
    pub fn new(raw_vlr: raw::Vlr) -> Vlr {
        Vlr {
            user_id: raw_vlr.user_id.as_ref().as_las_str_lossy(),
            record_id: raw_vlr.record_id,
            description: raw_vlr.description.as_ref().as_las_str_lossy(),
            data: raw_vlr.data,
        }
    }

    /// Converts this vlr into a raw vlr, ready to be written to a `Write`.
    pub fn into_raw(self, extended: bool) -> Result<raw::Vlr> {
        let mut user_id = [0; 16];
        user_id.as_mut().from_las_str(&self.user_id)?;
        let mut description = [0; 32];
        description.as_mut().from_las_str(&self.description)?;
        let record_length_after_header = if extended {
            RecordLength::Evlr(self.data.len() as u64)
        } else {
            RecordLength::Vlr(self.data.len() as u16)
        };
        Ok(raw::Vlr {
            reserved: 0,
            user_id,
            record_id: self.record_id,
            record_length_after_header,
            description,
            data: self.data,
        })
    }

    /// Returns the total length in bytes of this vlr, including its header, if it were written
    /// out as a regular (non-extended) vlr or an extended one.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::Vlr;
    /// assert_eq!(54, Vlr::default().len(false));
    /// assert_eq!(60, Vlr::default().len(true));
    /// ```
    pub fn len(&self, extended: bool) -> usize {
        let header_len = if extended {
            EVLR_HEADER_LEN
        } else {
            VLR_HEADER_LEN
        };
        header_len + self.data.len()
    }

    /// Returns true if this vlr is empty, i.e. has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if this vlr's data is too large to fit in a regular (non-extended) vlr.
    pub fn has_large_data(&self) -> bool {
        self.data.len() > u16::MAX as usize
    }

    /// Returns true if this vlr describes a coordinate reference system, either GeoTIFF or WKT.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::Vlr;
    /// let mut vlr = Vlr::default();
    /// assert!(!vlr.is_projection());
    /// vlr.user_id = "LASF_Projection".to_string();
    /// vlr.record_id = 2112;
    /// assert!(vlr.is_projection());
    /// ```
    pub fn is_projection(&self) -> bool {
        if !self.user_id.eq_ignore_ascii_case("LASF_Projection") {
            return false;
        }
        matches!(self.record_id, 34735 | 34736 | 34737 | 2112)
    }

    /// Returns true if this vlr describes extra byte layout ("LASF_Spec", record id 4).
    pub fn is_extra_bytes(&self) -> bool {
        self.user_id == "LASF_Spec" && self.record_id == 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let vlr = Vlr {
            user_id: "test".to_string(),
            record_id: 42,
            description: "a description".to_string(),
            data: vec![1, 2, 3],
        };
        let raw_vlr = vlr.clone().into_raw(false).unwrap();
        assert_eq!(vlr, Vlr::new(raw_vlr));
    }

    #[test]
    fn is_projection() {
        let mut vlr = Vlr::default();
        assert!(!vlr.is_projection());
        vlr.user_id = "LASF_Projection".to_string();
        vlr.record_id = 34735;
        assert!(vlr.is_projection());
        vlr.record_id = 1;
        assert!(!vlr.is_projection());
    }

    #[test]
    fn lengths() {
        let vlr = Vlr {
            data: vec![0; 10],
            ..Default::default()
        };
        assert_eq!(64, vlr.len(false));
        assert_eq!(70, vlr.len(true));
    }
}
