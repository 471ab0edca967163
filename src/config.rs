//! Bridge configuration descriptor.

use serde::{Deserialize, Serialize};

/// Configuration of a Hue bridge as reported by its `/config` endpoint.
///
/// Older firmware revisions do not advertise `apiversion`; callers should
/// fall back to [`ApiVersion::DEFAULT`](crate::ApiVersion::DEFAULT) in that
/// case, which [`Bridge::connect`](crate::Bridge::connect) does.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BridgeConfig {
    pub name: String,
    #[serde(default)]
    pub apiversion: Option<String>,
    #[serde(default)]
    pub swversion: Option<String>,
    #[serde(default)]
    pub bridgeid: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub modelid: Option<String>,
}
