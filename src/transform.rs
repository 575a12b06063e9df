use crate::{Error, Result};

/// A scale and an offset that converts an `i32` record value into an `f64` coordinate, and back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// The scale.
    pub scale: f64,
    /// The offset.
    pub offset: f64,
}

/// Controls how a float is rounded when it is converted back into an `i32` record value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundingMode {
    /// Round to the nearest integer, ties away from zero.
    Nearest,
    /// Always round down.
    Floor,
    /// Always round up.
    Ceil,
}

impl Transform {
    /// Converts a raw record value into a float coordinate.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::Transform;
    /// let transform = Transform { scale: 0.001, offset: 0. };
    /// assert_eq!(1.001, transform.direct(1001));
    /// ```
    pub fn direct(&self, n: i32) -> f64 {
        f64::from(n) * self.scale + self.offset
    }

    /// Converts a float coordinate into a raw record value, rounding to the nearest integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_cloud::Transform;
    /// let transform = Transform { scale: 0.001, offset: 0. };
    /// assert_eq!(1001, transform.inverse(1.0005).unwrap());
    /// ```
    pub fn inverse(&self, n: f64) -> Result<i32> {
        self.inverse_with_rounding_mode(n, RoundingMode::Nearest)
    }

    /// Converts a float coordinate into a raw record value using the given rounding mode.
    pub fn inverse_with_rounding_mode(&self, n: f64, rounding: RoundingMode) -> Result<i32> {
        let descaled = (n - self.offset) / self.scale;
        let rounded = match rounding {
            RoundingMode::Nearest => descaled.round(),
            RoundingMode::Floor => descaled.floor(),
            RoundingMode::Ceil => descaled.ceil(),
        };
        if rounded > f64::from(i32::MAX) || rounded < f64::from(i32::MIN) {
            Err(Error::Other(format!(
                "coordinate {n} does not fit in an i32 after applying transform {self:?}"
            )))
        } else {
            Ok(rounded as i32)
        }
    }
}

impl Default for Transform {
    fn default() -> Transform {
        Transform {
            scale: 0.001,
            offset: 0.,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let transform = Transform::default();
        assert_eq!(1., transform.direct(transform.inverse(1.).unwrap()));
    }

    #[test]
    fn rounding_modes() {
        let transform = Transform {
            scale: 1.,
            offset: 0.,
        };
        assert_eq!(
            1,
            transform
                .inverse_with_rounding_mode(1.5, RoundingMode::Floor)
                .unwrap()
        );
        assert_eq!(
            2,
            transform
                .inverse_with_rounding_mode(1.5, RoundingMode::Ceil)
                .unwrap()
        );
    }

    #[test]
    fn overflow() {
        let transform = Transform {
            scale: 1e-30,
            offset: 0.,
        };
        assert!(transform.inverse(1e30).is_err());
    }
}
