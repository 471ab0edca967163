//! Bridge connection and HTTP transport.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::BridgeConfig;
use crate::discovery;
use crate::errors::Error;
use crate::history::{MessageType, RequestHistory};
use crate::light::{Light, LightAttributes};
use crate::payload::StatePayload;
use crate::response::ApiResponseItem;
use crate::types::{ApiVersion, DeltaEncoding};

type Result<T> = std::result::Result<T, Error>;

/// Represents one Hue bridge on the local network.
///
/// All communication goes through the bridge's REST interface under
/// `http://<host>/api/<username>`. A bridge is created once at startup and
/// is immutable afterwards; in particular its advertised API version, and
/// the [`DeltaEncoding`] capability derived from it, are resolved at
/// construction time.
///
/// # Example
///
/// ```ignore
/// use hue_lights_rs::{Bridge, StateOption};
///
/// async fn dim_all() -> Result<(), hue_lights_rs::Error> {
///     let bridge = Bridge::connect("192.168.1.2", "A1B2C3D4").await?;
///     for (_, mut light) in bridge.get_lights().await? {
///         light.set_state(&[StateOption::BrightnessDelta(-30)]).await?;
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Bridge {
    host: String,
    username: String,
    base_url: String,
    api_version: ApiVersion,
    delta_encoding: DeltaEncoding,
    client: reqwest::Client,
    history: Arc<Mutex<RequestHistory>>,
}

impl Bridge {
    /// Create a bridge for a known host without touching the network.
    ///
    /// The API version is assumed to be the protocol default
    /// ([`ApiVersion::DEFAULT`]); use [`Bridge::connect`] to resolve the
    /// real one from the device.
    pub fn new(host: &str, username: &str) -> Self {
        Self::with_resolved_version(host, username, ApiVersion::DEFAULT)
    }

    /// Create a bridge for a known host with an explicitly known version.
    pub fn with_version(host: &str, username: &str, version: &str) -> Result<Self> {
        Ok(Self::with_resolved_version(
            host,
            username,
            version.parse()?,
        ))
    }

    /// Create a bridge and resolve its API version from a live `/config`
    /// fetch. Bridges that do not advertise a version get the default.
    pub async fn connect(host: &str, username: &str) -> Result<Self> {
        let bridge = Bridge::new(host, username);
        let config = bridge.config().await?;
        let api_version = match &config.apiversion {
            Some(version) => version.parse()?,
            None => ApiVersion::DEFAULT,
        };
        Ok(Bridge {
            delta_encoding: DeltaEncoding::for_version(&api_version),
            api_version,
            ..bridge
        })
    }

    /// Create a bridge from the first candidate the cloud discovery
    /// service reports for this network.
    pub async fn discover(username: &str) -> Result<Self> {
        let candidates = discovery::discover_bridges().await?;
        let Some(first) = candidates.into_iter().next() else {
            return Err(Error::NoBridgeFound);
        };
        Bridge::connect(&first.internal_ip_address, username).await
    }

    fn with_resolved_version(host: &str, username: &str, api_version: ApiVersion) -> Self {
        Bridge {
            host: host.to_string(),
            username: username.to_string(),
            base_url: format!("http://{host}/api/{username}"),
            delta_encoding: DeltaEncoding::for_version(&api_version),
            api_version,
            client: reqwest::Client::new(),
            history: Arc::new(Mutex::new(RequestHistory::new())),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The API version this bridge advertised at construction time.
    pub fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// How relative brightness changes are encoded for this bridge.
    pub fn delta_encoding(&self) -> DeltaEncoding {
        self.delta_encoding
    }

    pub async fn history(&self) -> RequestHistory {
        self.history.lock().await.clone()
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    /// Fetch the bridge configuration descriptor.
    pub async fn config(&self) -> Result<BridgeConfig> {
        self.get_json("config").await
    }

    /// Enumerate all lights known to this bridge, keyed by their index.
    pub async fn get_lights(&self) -> Result<HashMap<String, Light<'_>>> {
        let all: HashMap<String, LightAttributes> = self.get_json("lights").await?;

        let mut lights = HashMap::with_capacity(all.len());
        for (index, attributes) in all {
            let mut light = Light::new(self, attributes);
            light.link(&index)?;
            lights.insert(index, light);
        }
        Ok(lights)
    }

    /// Fetch a single light by its bridge index.
    pub async fn get_light(&self, index: &str) -> Result<Light<'_>> {
        let attributes: LightAttributes = self.get_json(&format!("lights/{index}")).await?;
        let mut light = Light::new(self, attributes);
        light.link(index)?;
        Ok(light)
    }

    pub(crate) async fn put_state(
        &self,
        index: &str,
        payload: &StatePayload,
    ) -> Result<Vec<ApiResponseItem>> {
        self.put_items(&format!("lights/{index}/state"), payload)
            .await
    }

    pub(crate) async fn put_light(
        &self,
        index: &str,
        body: &Value,
    ) -> Result<Vec<ApiResponseItem>> {
        self.put_items(&format!("lights/{index}"), body).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.request(Method::GET, path, None).await?;
        serde_json::from_value(value).map_err(Error::JsonLoad)
    }

    async fn put_items(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<Vec<ApiResponseItem>> {
        let body = serde_json::to_value(body).map_err(Error::JsonDump)?;
        let value = self.request(Method::PUT, path, Some(body)).await?;
        serde_json::from_value(value).map_err(Error::JsonLoad)
    }

    /// One blocking round trip to the bridge. No timeout or retry policy
    /// lives here; both belong to the caller.
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        let endpoint = format!("{method} {path}");

        self.history.lock().await.record(
            MessageType::Send,
            &endpoint,
            body.as_ref().unwrap_or(&Value::Null),
        );
        debug!("{method} {url}");

        let mut request = self.client.request(method, &url);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let result = async {
            let response = request.send().await.map_err(Error::Http)?;
            response.json::<Value>().await.map_err(Error::Http)
        }
        .await;

        match result {
            Ok(value) => {
                debug!("response for {endpoint}: {value:?}");
                self.history
                    .lock()
                    .await
                    .record(MessageType::Receive, &endpoint, &value);
                Ok(value)
            }
            Err(error) => {
                self.history.lock().await.record_error(&error.to_string());
                Err(error)
            }
        }
    }
}
