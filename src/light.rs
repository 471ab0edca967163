//! Individual light control.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::bridge::Bridge;
use crate::errors::Error;
use crate::payload::{StateBuilder, StateOption};
use crate::response::{self, AppliedChanges};
use crate::state::LightState;

type Result<T> = std::result::Result<T, Error>;

/// Descriptive attributes of a light as decoded from the bridge.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LightAttributes {
    pub name: String,
    pub modelid: String,
    #[serde(rename = "type")]
    pub light_type: String,
    #[serde(default)]
    pub uniqueid: String,
    #[serde(default)]
    pub swversion: String,
    #[serde(default)]
    pub manufacturername: String,
    pub state: LightState,
}

/// Represents a single light managed by a [`Bridge`].
///
/// A light never owns its bridge; it keeps a shared back-reference and the
/// bridge outlives every light created from it. The embedded [`LightState`]
/// is a cache: it reflects the last fetch plus this library's own
/// predictions and reconciliations, not necessarily the live value.
///
/// No concurrent-writer protection is provided for the cached state; the
/// caller that issues state changes is expected to be the only mutator.
#[derive(Debug)]
pub struct Light<'a> {
    bridge: &'a Bridge,
    index: Option<String>,
    attributes: LightAttributes,
}

impl<'a> Light<'a> {
    pub(crate) fn new(bridge: &'a Bridge, attributes: LightAttributes) -> Light<'a> {
        Light {
            bridge,
            index: None,
            attributes,
        }
    }

    /// Assign the bridge-side index of this light.
    ///
    /// The index identifies the light in every REST path and is assigned
    /// exactly once; linking an already-linked light fails with
    /// [`Error::AlreadyLinked`].
    pub fn link(&mut self, index: &str) -> Result<()> {
        if let Some(existing) = &self.index {
            return Err(Error::AlreadyLinked(existing.clone()));
        }
        self.index = Some(index.to_string());
        Ok(())
    }

    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    pub fn attributes(&self) -> &LightAttributes {
        &self.attributes
    }

    /// Last known state of this light.
    pub fn state(&self) -> &LightState {
        &self.attributes.state
    }

    pub fn bridge(&self) -> &Bridge {
        self.bridge
    }

    /// Apply a sequence of state changes in one request.
    ///
    /// The options are folded in order into a single payload (see
    /// [`StateBuilder`]); a composition that turns out to be a no-op skips
    /// the network round trip and returns empty changes. On success the
    /// attribute paths reported by the bridge are folded back into the
    /// cached state, so even native `bri_inc` requests leave the cache
    /// consistent with what the bridge reported.
    ///
    /// Nothing is retried here: a brightness delta depends on the cached
    /// state, so the command is not idempotent and retry policy belongs to
    /// the caller.
    pub async fn set_state(&mut self, options: &[StateOption]) -> Result<AppliedChanges> {
        let index = self.index.clone().ok_or(Error::NotLinked)?;
        let payload = StateBuilder::build(
            options,
            &mut self.attributes.state,
            self.bridge.delta_encoding(),
        )?;
        let Some(payload) = payload else {
            debug!("no effective change for light {index}, skipping request");
            return Ok(AppliedChanges::new());
        };

        let items = self.bridge.put_state(&index, &payload).await?;
        let changes = response::reconcile(items)?;
        for (path, value) in &changes {
            self.attributes.state.apply_reported(path, value);
        }
        Ok(changes)
    }

    /// Rename this light on the bridge.
    ///
    /// The bridge answers a rename with exactly one response item; any
    /// other count is treated as a protocol violation.
    pub async fn rename(&mut self, name: &str) -> Result<()> {
        let index = self.index.clone().ok_or(Error::NotLinked)?;
        let items = self
            .bridge
            .put_light(&index, &json!({ "name": name }))
            .await?;
        response::reconcile_single(items)?;
        self.attributes.name = name.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attributes() -> LightAttributes {
        serde_json::from_value(json!({
            "name": "Desk lamp",
            "modelid": "LCT001",
            "type": "Extended color light",
            "uniqueid": "00:17:88:01:00:d4:12:08-0a",
            "swversion": "5.105.0.21169",
            "manufacturername": "Signify",
            "state": {"on": true, "bri": 100}
        }))
        .unwrap()
    }

    #[test]
    fn test_link_assigns_exactly_once() {
        let bridge = Bridge::new("192.168.1.2", "testuser");
        let mut light = Light::new(&bridge, attributes());
        assert_eq!(light.index(), None);

        light.link("1").unwrap();
        assert_eq!(light.index(), Some("1"));

        assert_eq!(
            light.link("2").unwrap_err(),
            Error::AlreadyLinked("1".to_string())
        );
        assert_eq!(light.index(), Some("1"));
    }

    #[test]
    fn test_decodes_bridge_attributes() {
        let attrs = attributes();
        assert_eq!(attrs.light_type, "Extended color light");
        assert_eq!(attrs.state.bri, 100);
    }
}
