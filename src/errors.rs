use crate::response::ApiError;

/// All error types that can occur when interacting with a Hue bridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// An HTTP request to the bridge or the discovery service failed.
    #[error("http request failed: {0}")]
    Http(reqwest::Error),

    /// An attribute value is outside the range the bridge accepts.
    #[error("invalid {attribute} {value}; valid range is {min}..={max}")]
    OutOfRange {
        attribute: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A power change was combined with other attribute changes.
    ///
    /// The bridge does not define what happens when power is toggled in the
    /// same request as other attributes, so the combination is rejected
    /// before transmission.
    #[error("cannot change power state together with other attributes")]
    PowerConflict,

    /// The bridge response contained no success entry.
    #[error("API did not return success")]
    NotSuccessful,

    /// A single-result operation received a different number of response items.
    #[error("expected {expected} response item(s), got {actual}")]
    UnexpectedResponseCount { expected: usize, actual: usize },

    /// An error reported by the bridge itself.
    #[error("bridge error {} at {}: {}", .0.kind, .0.address, .0.description)]
    Bridge(ApiError),

    /// The bridge advertised an API version string that could not be parsed.
    #[error("invalid API version string: {0:?}")]
    InvalidVersion(String),

    /// Attempted to assign an index to a light that already has one.
    #[error("light index {0:?} is already assigned")]
    AlreadyLinked(String),

    /// Attempted a per-light operation on a light without an assigned index.
    #[error("light has no assigned index")]
    NotLinked,

    /// The discovery service returned no bridge candidates.
    #[error("no bridges discovered")]
    NoBridgeFound,
}

impl Error {
    /// Create a new out of range error
    pub fn out_of_range(attribute: &'static str, value: i64, min: i64, max: i64) -> Self {
        Error::OutOfRange {
            attribute,
            value,
            min,
            max,
        }
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
