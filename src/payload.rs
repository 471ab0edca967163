//! State-change payloads and the builder that composes them.

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::state::{Alert, Effect, LightState};
use crate::types::{Color, DeltaEncoding};

type Result<T> = std::result::Result<T, Error>;

const BRI_MIN: u8 = 1;
const BRI_MAX: u8 = 254;

/// The literal set of fields sent to `/lights/<id>/state`.
///
/// Built incrementally by [`StateBuilder`]; only fields that were actually
/// requested are serialized. A payload is used for exactly one PUT and then
/// discarded.
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StatePayload {
    pub(crate) on: Option<bool>,
    pub(crate) bri: Option<u8>,
    pub(crate) bri_inc: Option<i16>,
    pub(crate) hue: Option<u16>,
    pub(crate) sat: Option<u8>,
    pub(crate) xy: Option<[f64; 2]>,
    pub(crate) ct: Option<u16>,
    pub(crate) alert: Option<Alert>,
    pub(crate) effect: Option<Effect>,
    #[serde(rename = "transitiontime")]
    pub(crate) transition_time: Option<u16>,
}

impl StatePayload {
    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    fn field_count(&self) -> usize {
        [
            self.on.is_some(),
            self.bri.is_some(),
            self.bri_inc.is_some(),
            self.hue.is_some(),
            self.sat.is_some(),
            self.xy.is_some(),
            self.ct.is_some(),
            self.alert.is_some(),
            self.effect.is_some(),
            self.transition_time.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    /// A transition time with nothing to transition to does nothing.
    fn is_transition_only(&self) -> bool {
        self.transition_time.is_some() && self.field_count() == 1
    }
}

/// One proposed mutation of a light's state.
///
/// Options are composed into a single request with [`StateBuilder::build`];
/// they only exist for the duration of one command composition.
#[derive(Debug, Clone, PartialEq)]
pub enum StateOption {
    /// Switch the light on or off. Must be the only change in a request.
    On(bool),
    /// Absolute brightness, 1..=254.
    Brightness(u8),
    /// Relative brightness change. Encoding depends on the target bridge,
    /// see [`DeltaEncoding`].
    BrightnessDelta(i16),
    /// Hue angle as the full 16-bit range; the bridge defines wrap-around.
    Hue(u16),
    /// Saturation, 1..=254.
    Saturation(u8),
    /// CIE xy chromaticity coordinates.
    Xy([f64; 2]),
    /// Color temperature in mireds.
    ColorTemperature(u16),
    /// Transition duration in 100ms ticks. Only meaningful combined with
    /// another change.
    TransitionTime(u16),
    /// xy chromaticity derived from an RGB color.
    Color(Color),
    /// Brightness derived from an RGB color's luminance.
    BrightnessFromColor(Color),
    /// Identification alert.
    Alert(Alert),
    /// Dynamic effect.
    Effect(Effect),
}

/// Folds a sequence of [`StateOption`]s into one validated [`StatePayload`].
///
/// Application is fail-fast and order-sensitive: the first option that
/// fails validation stops the fold, and later options never execute.
/// Cross-field rules (power exclusivity, transition-only no-op) are checked
/// once in [`finish`](StateBuilder::finish) so that newly added attributes
/// inherit them.
///
/// # Examples
///
/// ```
/// use hue_lights_rs::{DeltaEncoding, LightState, StateBuilder, StateOption};
///
/// let mut state = LightState { bri: 100, ..Default::default() };
/// let payload = StateBuilder::build(
///     &[StateOption::Brightness(200), StateOption::TransitionTime(4)],
///     &mut state,
///     DeltaEncoding::Native,
/// )
/// .unwrap();
/// assert!(payload.is_some());
/// ```
#[derive(Default, Debug)]
pub struct StateBuilder {
    payload: StatePayload,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `options` in order against `state` and finalize.
    ///
    /// Returns `Ok(None)` when the composition is a no-op; the caller must
    /// then skip the network call entirely.
    pub fn build(
        options: &[StateOption],
        state: &mut LightState,
        delta: DeltaEncoding,
    ) -> Result<Option<StatePayload>> {
        let mut builder = StateBuilder::new();
        for option in options {
            builder.apply(option, state, delta)?;
        }
        builder.finish()
    }

    /// Apply one option to the payload under construction.
    ///
    /// `state` is the cached state of the target light: an emulated
    /// brightness delta reads the cached brightness and, when it produces a
    /// real change, writes the predicted value back immediately.
    pub fn apply(
        &mut self,
        option: &StateOption,
        state: &mut LightState,
        delta: DeltaEncoding,
    ) -> Result<()> {
        match option {
            StateOption::On(on) => {
                self.payload.on = Some(*on);
            }
            StateOption::Brightness(bri) => {
                self.payload.bri = Some(validated("brightness", *bri)?);
            }
            StateOption::BrightnessDelta(delta_value) => {
                self.apply_brightness_delta(*delta_value, state, delta);
            }
            StateOption::Hue(hue) => {
                self.payload.hue = Some(*hue);
            }
            StateOption::Saturation(sat) => {
                self.payload.sat = Some(validated("saturation", *sat)?);
            }
            StateOption::Xy(xy) => {
                self.payload.xy = Some(*xy);
            }
            StateOption::ColorTemperature(ct) => {
                self.payload.ct = Some(*ct);
            }
            StateOption::TransitionTime(ticks) => {
                self.payload.transition_time = Some(*ticks);
            }
            StateOption::Color(color) => {
                self.payload.xy = Some(color.to_xy());
            }
            StateOption::BrightnessFromColor(color) => {
                self.payload.bri = Some(color.to_brightness());
            }
            StateOption::Alert(alert) => {
                self.payload.alert = Some(*alert);
            }
            StateOption::Effect(effect) => {
                self.payload.effect = Some(*effect);
            }
        }
        Ok(())
    }

    /// Finalize the payload, enforcing the cross-field invariants.
    pub fn finish(self) -> Result<Option<StatePayload>> {
        if self.payload.is_empty() || self.payload.is_transition_only() {
            return Ok(None);
        }
        if self.payload.on.is_some() && self.payload.field_count() > 1 {
            return Err(Error::PowerConflict);
        }
        Ok(Some(self.payload))
    }

    fn apply_brightness_delta(
        &mut self,
        delta_value: i16,
        state: &mut LightState,
        delta: DeltaEncoding,
    ) {
        match delta {
            DeltaEncoding::Native => {
                self.payload.bri_inc = Some(delta_value);
            }
            DeltaEncoding::Emulated => {
                let target = state.bri as i32 + delta_value as i32;
                let bri = if target > BRI_MAX as i32 {
                    if state.bri == BRI_MAX {
                        // Already at max brightness, nothing to send.
                        return;
                    }
                    BRI_MAX
                } else if target < BRI_MIN as i32 {
                    if state.bri == BRI_MIN {
                        // Already at min brightness, nothing to send.
                        return;
                    }
                    BRI_MIN
                } else {
                    target as u8
                };

                self.payload.bri = Some(bri);
                // Predict the outcome locally; the bridge has not confirmed
                // this value yet.
                state.bri = bri;
            }
        }
    }
}

fn validated(attribute: &'static str, value: u8) -> Result<u8> {
    if (BRI_MIN..=BRI_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(Error::out_of_range(
            attribute,
            value as i64,
            BRI_MIN as i64,
            BRI_MAX as i64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state_with_bri(bri: u8) -> LightState {
        LightState {
            on: true,
            bri,
            ..Default::default()
        }
    }

    fn build(
        options: &[StateOption],
        state: &mut LightState,
        delta: DeltaEncoding,
    ) -> Result<Option<StatePayload>> {
        StateBuilder::build(options, state, delta)
    }

    #[test]
    fn test_brightness_out_of_range_fails() {
        let mut state = state_with_bri(100);
        for value in [0, 255] {
            let result = build(
                &[StateOption::Brightness(value)],
                &mut state,
                DeltaEncoding::Native,
            );
            assert_eq!(
                result.unwrap_err(),
                Error::out_of_range("brightness", value as i64, 1, 254)
            );
        }
    }

    #[test]
    fn test_saturation_out_of_range_fails() {
        let mut state = state_with_bri(100);
        let result = build(
            &[StateOption::Saturation(0)],
            &mut state,
            DeltaEncoding::Native,
        );
        assert_eq!(
            result.unwrap_err(),
            Error::out_of_range("saturation", 0, 1, 254)
        );
    }

    #[test]
    fn test_fail_fast_stops_at_first_invalid_option() {
        let mut state = state_with_bri(100);
        let mut builder = StateBuilder::new();
        let err = builder
            .apply(
                &StateOption::Brightness(0),
                &mut state,
                DeltaEncoding::Emulated,
            )
            .unwrap_err();
        assert_eq!(err, Error::out_of_range("brightness", 0, 1, 254));
    }

    #[test]
    fn test_power_conflicts_with_other_options_in_any_order() {
        let mut state = state_with_bri(100);
        let combos: [&[StateOption]; 3] = [
            &[StateOption::On(true), StateOption::Brightness(100)],
            &[StateOption::Brightness(100), StateOption::On(true)],
            &[StateOption::On(false), StateOption::Alert(Alert::Select)],
        ];
        for options in combos {
            let result = build(options, &mut state, DeltaEncoding::Native);
            assert_eq!(result.unwrap_err(), Error::PowerConflict);
        }
    }

    #[test]
    fn test_power_alone_is_allowed() {
        let mut state = state_with_bri(100);
        let payload = build(&[StateOption::On(false)], &mut state, DeltaEncoding::Native)
            .unwrap()
            .unwrap();
        assert_eq!(payload.on, Some(false));
    }

    #[test]
    fn test_empty_options_are_a_noop() {
        let mut state = state_with_bri(100);
        let payload = build(&[], &mut state, DeltaEncoding::Native).unwrap();
        assert!(payload.is_none());
    }

    #[test]
    fn test_transition_time_alone_is_a_noop() {
        let mut state = state_with_bri(100);
        let payload = build(
            &[StateOption::TransitionTime(10)],
            &mut state,
            DeltaEncoding::Native,
        )
        .unwrap();
        assert!(payload.is_none());
    }

    #[test]
    fn test_emulated_delta_clamps_and_updates_cache() {
        let mut state = state_with_bri(200);
        let payload = build(
            &[StateOption::BrightnessDelta(100)],
            &mut state,
            DeltaEncoding::Emulated,
        )
        .unwrap()
        .unwrap();

        assert_eq!(payload.bri, Some(254));
        assert_eq!(payload.bri_inc, None);
        assert_eq!(state.bri, 254);
    }

    #[test]
    fn test_native_delta_is_sent_verbatim() {
        let mut state = state_with_bri(200);
        let payload = build(
            &[StateOption::BrightnessDelta(100)],
            &mut state,
            DeltaEncoding::Native,
        )
        .unwrap()
        .unwrap();

        assert_eq!(payload.bri_inc, Some(100));
        assert_eq!(payload.bri, None);
        assert_eq!(state.bri, 200);
    }

    #[test]
    fn test_emulated_delta_at_max_is_a_noop() {
        let mut state = state_with_bri(254);
        let payload = build(
            &[StateOption::BrightnessDelta(10)],
            &mut state,
            DeltaEncoding::Emulated,
        )
        .unwrap();

        assert!(payload.is_none());
        assert_eq!(state.bri, 254);
    }

    #[test]
    fn test_emulated_delta_at_min_is_a_noop() {
        let mut state = state_with_bri(1);
        let payload = build(
            &[StateOption::BrightnessDelta(-10)],
            &mut state,
            DeltaEncoding::Emulated,
        )
        .unwrap();

        assert!(payload.is_none());
        assert_eq!(state.bri, 1);
    }

    #[test]
    fn test_emulated_delta_within_range() {
        let mut state = state_with_bri(100);
        let payload = build(
            &[StateOption::BrightnessDelta(-50)],
            &mut state,
            DeltaEncoding::Emulated,
        )
        .unwrap()
        .unwrap();

        assert_eq!(payload.bri, Some(50));
        assert_eq!(state.bri, 50);
    }

    #[test]
    fn test_color_option_writes_xy_and_brightness_from_color_writes_bri() {
        let mut state = state_with_bri(100);
        let payload = build(
            &[
                StateOption::Color(Color::rgb(255, 0, 0)),
                StateOption::BrightnessFromColor(Color::rgb(255, 255, 255)),
            ],
            &mut state,
            DeltaEncoding::Native,
        )
        .unwrap()
        .unwrap();

        assert!(payload.xy.is_some());
        assert_eq!(payload.bri, Some(254));
    }

    #[test]
    fn test_serialized_payload_contains_exactly_the_requested_fields() {
        let mut state = state_with_bri(100);
        let payload = build(
            &[
                StateOption::Brightness(200),
                StateOption::Hue(40_000),
                StateOption::TransitionTime(4),
            ],
            &mut state,
            DeltaEncoding::Native,
        )
        .unwrap()
        .unwrap();

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({"bri": 200, "hue": 40000, "transitiontime": 4})
        );
    }

    #[test]
    fn test_later_option_overwrites_same_field() {
        let mut state = state_with_bri(100);
        let payload = build(
            &[
                StateOption::Xy([0.1, 0.1]),
                StateOption::Color(Color::rgb(255, 0, 0)),
            ],
            &mut state,
            DeltaEncoding::Native,
        )
        .unwrap()
        .unwrap();

        let [x, _] = payload.xy.unwrap();
        assert!((x - 0.640).abs() < 0.005);
    }
}
