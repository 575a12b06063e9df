//! Helpers for reading and writing the fixed-width, null-padded ASCII strings used throughout
//! LAS headers and variable length records.

use crate::{Error, Result};

/// Writes a `&str` into a fixed-size byte buffer, null-padding any remaining space.
pub trait FromLasStr {
    /// Copies `s` into `self`, which must be at least as long as `s`.
    fn from_las_str(&mut self, s: &str) -> Result<()>;
}

impl FromLasStr for &mut [u8] {
    fn from_las_str(&mut self, s: &str) -> Result<()> {
        let bytes = s.as_bytes();
        if bytes.len() > self.len() {
            return Err(Error::Other(format!(
                "string '{s}' is too long for a {}-byte field",
                self.len()
            )));
        }
        self[..bytes.len()].copy_from_slice(bytes);
        for byte in self[bytes.len()..].iter_mut() {
            *byte = 0;
        }
        Ok(())
    }
}

/// Reads a fixed-size, null-padded byte buffer as a `&str`.
pub trait AsLasStr {
    /// Returns the string, stopping at the first null byte.
    fn as_las_str(&self) -> Result<&str>;

    /// Returns the string, stopping at the first null byte, replacing invalid UTF-8 sequences.
    fn as_las_str_lossy(&self) -> String;
}

/// Converts a zero value to `None`, and anything else to `Some`.
///
/// Several optional fields in the LAS header are represented on disk as a value that is zero
/// when absent, e.g. the offset to the first EVLR.
pub fn some_or_none_if_zero(n: u64) -> Option<u64> {
    if n == 0 {
        None
    } else {
        Some(n)
    }
}

impl AsLasStr for [u8] {
    fn as_las_str(&self) -> Result<&str> {
        let end = self.iter().position(|&b| b == 0).unwrap_or(self.len());
        std::str::from_utf8(&self[..end]).map_err(Error::from)
    }

    fn as_las_str_lossy(&self) -> String {
        let end = self.iter().position(|&b| b == 0).unwrap_or(self.len());
        String::from_utf8_lossy(&self[..end]).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let mut bytes = [0u8; 16];
        bytes.as_mut().from_las_str("hello").unwrap();
        assert_eq!("hello", bytes.as_ref().as_las_str().unwrap());
    }

    #[test]
    fn too_long() {
        let mut bytes = [0u8; 4];
        assert!(bytes.as_mut().from_las_str("hello").is_err());
    }

    #[test]
    fn lossy_on_bad_utf8() {
        let bytes = [0xff, 0xfe, 0, 0];
        assert!(bytes.as_ref().as_las_str().is_err());
        assert!(!bytes.as_ref().as_las_str_lossy().is_empty());
    }
}
