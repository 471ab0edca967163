//! Bridge discovery via the vendor's cloud lookup service.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::bridge::Bridge;
use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

const DISCOVERY_URL: &str = "https://discovery.meethue.com/";

/// A bridge candidate returned by the discovery service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredBridge {
    /// Bridge id as registered with the cloud service
    pub id: String,
    /// Address of the bridge on the local network
    #[serde(rename = "internalipaddress")]
    pub internal_ip_address: String,
    #[serde(rename = "macaddress", default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl DiscoveredBridge {
    /// Convert this candidate into a [`Bridge`] without touching the
    /// network again.
    ///
    /// The bridge gets the default API version; use
    /// [`Bridge::connect`] with
    /// [`internal_ip_address`](DiscoveredBridge::internal_ip_address) when
    /// the real version matters.
    pub fn into_bridge(self, username: &str) -> Bridge {
        Bridge::new(&self.internal_ip_address, username)
    }
}

/// Query the cloud lookup service for bridges on this network.
///
/// The service lists every bridge that has phoned home from the caller's
/// public address. Selection policy is up to the caller;
/// [`Bridge::discover`] simply takes the first candidate.
///
/// # Examples
///
/// ```ignore
/// let bridges = discover_bridges().await?;
/// for bridge in bridges {
///     println!("{} at {}", bridge.id, bridge.internal_ip_address);
/// }
/// ```
pub async fn discover_bridges() -> Result<Vec<DiscoveredBridge>> {
    debug!("GET {DISCOVERY_URL}");
    let response = reqwest::get(DISCOVERY_URL).await.map_err(Error::Http)?;
    let candidates: Vec<DiscoveredBridge> = response.json().await.map_err(Error::Http)?;
    debug!("discovered {} bridge(s)", candidates.len());
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_lookup_response() {
        let candidates: Vec<DiscoveredBridge> = serde_json::from_value(json!([
            {
                "id": "001788fffe2207d5",
                "internalipaddress": "192.168.1.2",
                "macaddress": "00:17:88:22:07:d5",
                "name": "Philips hue"
            },
            {
                "id": "001788fffe09a1fb",
                "internalipaddress": "192.168.1.7"
            }
        ]))
        .unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].internal_ip_address, "192.168.1.2");
        assert_eq!(candidates[1].mac_address, None);
    }
}
