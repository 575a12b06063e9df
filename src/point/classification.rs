use crate::{Error, Result};

const ASPRS_CLASSIFICATION_MASK: u8 = 0b00011111;

/// The ASPRS standard classification of a point.
///
/// In version 1.0, this was a user-defined and optional `u8`. Subsequent versions defined this
/// field more rigidly. Overlap points (code 12) aren't represented here — see
/// [Point::is_overlap](crate::Point::is_overlap).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// Created, never classified.
    CreatedNeverClassified,
    /// Unclassified.
    Unclassified,
    /// Ground.
    Ground,
    /// Low vegetation.
    LowVegetation,
    /// Medium vegetation.
    MediumVegetation,
    /// High vegetation.
    HighVegetation,
    /// Building.
    Building,
    /// Low point (noise).
    LowPoint,
    /// Model key-point (mass point).
    ModelKeyPoint,
    /// Water.
    Water,
    /// Reserved for ASPRS definition.
    Reserved(u8),
}

impl Classification {
    /// Creates a classification from its ASPRS code.
    ///
    /// Returns an error if the code is 12 (overlap points), since overlap isn't represented as a
    /// classification in this library — see [Point::is_overlap](crate::Point::is_overlap).
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::point::Classification;
    /// assert_eq!(Classification::Ground, Classification::new(2).unwrap());
    /// assert!(Classification::new(12).is_err());
    /// ```
    pub fn new(n: u8) -> Result<Classification> {
        match n & ASPRS_CLASSIFICATION_MASK {
            0 => Ok(Classification::CreatedNeverClassified),
            1 => Ok(Classification::Unclassified),
            2 => Ok(Classification::Ground),
            3 => Ok(Classification::LowVegetation),
            4 => Ok(Classification::MediumVegetation),
            5 => Ok(Classification::HighVegetation),
            6 => Ok(Classification::Building),
            7 => Ok(Classification::LowPoint),
            8 => Ok(Classification::ModelKeyPoint),
            9 => Ok(Classification::Water),
            12 => Err(Error::Classification(n)),
            n => Ok(Classification::Reserved(n)),
        }
    }
}

impl From<Classification> for u8 {
    fn from(classification: Classification) -> u8 {
        match classification {
            Classification::CreatedNeverClassified => 0,
            Classification::Unclassified => 1,
            Classification::Ground => 2,
            Classification::LowVegetation => 3,
            Classification::MediumVegetation => 4,
            Classification::HighVegetation => 5,
            Classification::Building => 6,
            Classification::LowPoint => 7,
            Classification::ModelKeyPoint => 8,
            Classification::Water => 9,
            Classification::Reserved(n) => n,
        }
    }
}

impl Default for Classification {
    fn default() -> Classification {
        Classification::CreatedNeverClassified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        for n in [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 13, 31] {
            let classification = Classification::new(n).unwrap();
            assert_eq!(n, u8::from(classification));
        }
    }

    #[test]
    fn overlap_code_is_an_error() {
        assert!(Classification::new(12).is_err());
    }
}
