//! Bridge API version parsing and capability resolution.

use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// A bridge API version, compared numerically by major, minor and patch.
///
/// Bridges advertise their version as `"X.Y.Z"` (older firmware may omit
/// the patch component). Comparison is numeric per component, never a
/// lexicographic string comparison.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use hue_lights_rs::ApiVersion;
///
/// let old = ApiVersion::from_str("1.2.0").unwrap();
/// let new = ApiVersion::from_str("1.10.0").unwrap();
/// assert!(old < new);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ApiVersion {
    major: u32,
    minor: u32,
    patch: u32,
}

impl ApiVersion {
    /// The version a bridge is assumed to run when it does not advertise one.
    pub const DEFAULT: ApiVersion = ApiVersion::new(1, 0, 0);

    /// First version with native `bri_inc` support.
    pub(crate) const NATIVE_INCREMENT: ApiVersion = ApiVersion::new(1, 2, 1);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        ApiVersion {
            major,
            minor,
            patch,
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    /// Parse from a dotted version string (e.g., `"1.2.1"`).
    ///
    /// One to three components are accepted; missing components are zero,
    /// so `"1.0"` parses as `1.0.0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::str::FromStr;
    /// use hue_lights_rs::ApiVersion;
    ///
    /// assert_eq!(ApiVersion::from_str("1.0").unwrap(), ApiVersion::new(1, 0, 0));
    /// assert!(ApiVersion::from_str("1.2.x").is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Error> {
        let mut parts = s.split('.');
        let mut component = |present: bool| -> Result<u32, Error> {
            match parts.next() {
                Some(part) => part
                    .parse()
                    .map_err(|_| Error::InvalidVersion(s.to_string())),
                None if present => Err(Error::InvalidVersion(s.to_string())),
                None => Ok(0),
            }
        };

        let major = component(true)?;
        let minor = component(false)?;
        let patch = component(false)?;
        if parts.next().is_some() {
            return Err(Error::InvalidVersion(s.to_string()));
        }
        Ok(ApiVersion::new(major, minor, patch))
    }
}

/// How relative brightness changes are encoded for a particular bridge.
///
/// Resolved once per bridge from its advertised [`ApiVersion`] and injected
/// into the payload builder, so the switch is testable without a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaEncoding {
    /// The bridge predates native increments. Deltas are applied to the
    /// cached brightness locally and sent as an absolute `bri` value.
    Emulated,
    /// The bridge accepts the `bri_inc` field verbatim.
    Native,
}

impl DeltaEncoding {
    /// Resolve the encoding for a bridge advertising `version`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::str::FromStr;
    /// use hue_lights_rs::{ApiVersion, DeltaEncoding};
    ///
    /// let v = ApiVersion::from_str("1.2.0").unwrap();
    /// assert_eq!(DeltaEncoding::for_version(&v), DeltaEncoding::Emulated);
    ///
    /// let v = ApiVersion::from_str("1.2.1").unwrap();
    /// assert_eq!(DeltaEncoding::for_version(&v), DeltaEncoding::Native);
    /// ```
    pub fn for_version(version: &ApiVersion) -> Self {
        if *version < ApiVersion::NATIVE_INCREMENT {
            DeltaEncoding::Emulated
        } else {
            DeltaEncoding::Native
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_version() {
        assert_eq!(
            "1.2.1".parse::<ApiVersion>().unwrap(),
            ApiVersion::new(1, 2, 1)
        );
    }

    #[test]
    fn test_parse_short_version() {
        assert_eq!(
            "1.0".parse::<ApiVersion>().unwrap(),
            ApiVersion::DEFAULT
        );
        assert_eq!("2".parse::<ApiVersion>().unwrap(), ApiVersion::new(2, 0, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<ApiVersion>().is_err());
        assert!("1.2.3.4".parse::<ApiVersion>().is_err());
        assert!("a.b.c".parse::<ApiVersion>().is_err());
    }

    #[test]
    fn test_numeric_ordering() {
        let threshold = ApiVersion::NATIVE_INCREMENT;
        assert!("1.2.0".parse::<ApiVersion>().unwrap() < threshold);
        assert!("1.3.0".parse::<ApiVersion>().unwrap() > threshold);
        // A lexicographic comparison would get this one wrong.
        assert!("1.10.0".parse::<ApiVersion>().unwrap() > threshold);
    }

    #[test]
    fn test_encoding_threshold() {
        let emulated = ["1.0", "1.2.0"];
        for v in emulated {
            let version = v.parse().unwrap();
            assert_eq!(DeltaEncoding::for_version(&version), DeltaEncoding::Emulated);
        }
        let native = ["1.2.1", "1.3.0", "1.10.0"];
        for v in native {
            let version = v.parse().unwrap();
            assert_eq!(DeltaEncoding::for_version(&version), DeltaEncoding::Native);
        }
    }
}
