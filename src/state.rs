//! Cached light state snapshots.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which of the three color systems currently drives the light's color.
///
/// The modes are mutually exclusive; the bridge reports the one that was
/// set most recently.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color temperature (`ct`)
    Ct,
    /// Hue and saturation (`hue` + `sat`)
    Hs,
    /// CIE xy chromaticity (`xy`)
    Xy,
}

/// Temporary visual effect used to identify a light.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Alert {
    #[default]
    None,
    /// One breathe cycle
    Select,
    /// Breathe cycles for 15 seconds
    LSelect,
}

/// Dynamic effect running on the light.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    #[default]
    None,
    ColorLoop,
}

/// Last known state of a light, as fetched from the bridge.
///
/// White-only models omit the color fields entirely, so everything beyond
/// power and brightness is optional. The snapshot reflects the last fetch
/// (or the library's own prediction after an emulated brightness delta),
/// not necessarily the bridge's live value.
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LightState {
    pub on: bool,
    /// Brightness in the bridge domain 1..=254; 0 is not a valid value.
    pub bri: u8,
    #[serde(default)]
    pub hue: Option<u16>,
    #[serde(default)]
    pub sat: Option<u8>,
    #[serde(default)]
    pub xy: Option<[f64; 2]>,
    #[serde(default)]
    pub ct: Option<u16>,
    #[serde(default)]
    pub alert: Option<Alert>,
    #[serde(default)]
    pub effect: Option<Effect>,
    #[serde(default)]
    pub colormode: Option<ColorMode>,
    #[serde(default)]
    pub reachable: bool,
}

impl LightState {
    /// Fold one attribute path reported by the bridge back into the cache.
    ///
    /// `path` is the bridge's success key (e.g. `/lights/1/state/bri`); only
    /// the attribute segment matters here. Unknown attributes and values of
    /// an unexpected shape are ignored, since the bridge owns that contract.
    pub(crate) fn apply_reported(&mut self, path: &str, value: &Value) {
        let Some(attribute) = path.rsplit('/').next() else {
            return;
        };

        match attribute {
            "on" => {
                if let Some(on) = value.as_bool() {
                    self.on = on;
                }
            }
            // The bridge answers a `bri_inc` request with the resulting
            // absolute brightness, so both keys land in the same field.
            "bri" | "bri_inc" => {
                if let Some(bri) = value.as_u64() {
                    self.bri = bri.clamp(1, 254) as u8;
                }
            }
            "hue" => {
                if let Some(hue) = value.as_u64() {
                    self.hue = Some(hue as u16);
                }
            }
            "sat" => {
                if let Some(sat) = value.as_u64() {
                    self.sat = Some(sat.min(254) as u8);
                }
            }
            "ct" => {
                if let Some(ct) = value.as_u64() {
                    self.ct = Some(ct as u16);
                }
            }
            "xy" => {
                if let Ok(xy) = serde_json::from_value::<[f64; 2]>(value.clone()) {
                    self.xy = Some(xy);
                }
            }
            "alert" => {
                if let Ok(alert) = serde_json::from_value(value.clone()) {
                    self.alert = Some(alert);
                }
            }
            "effect" => {
                if let Ok(effect) = serde_json::from_value(value.clone()) {
                    self.effect = Some(effect);
                }
            }
            "colormode" => {
                if let Ok(mode) = serde_json::from_value(value.clone()) {
                    self.colormode = Some(mode);
                }
            }
            _ => {}
        }
    }
}
