//! # hue_lights_rs
//!
//! An async Rust library for controlling Philips Hue bridges over their
//! local REST interface.
//!
//! This crate discovers a bridge, enumerates the lights it manages, and
//! issues state-change commands (on/off, brightness, color, transitions)
//! while tolerating partial command failures and protocol differences
//! between bridge firmware revisions.
//!
//! ## Quick Start
//!
//! ```ignore
//! use hue_lights_rs::{Bridge, StateOption};
//!
//! async fn sunset() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect to a known bridge with a registered username
//!     let bridge = Bridge::connect("192.168.1.2", "A1B2C3D4").await?;
//!
//!     // Fade the living room light down over two seconds
//!     let mut light = bridge.get_light("1").await?;
//!     let applied = light
//!         .set_state(&[
//!             StateOption::Brightness(40),
//!             StateOption::ColorTemperature(450),
//!             StateOption::TransitionTime(20),
//!         ])
//!         .await?;
//!     println!("bridge applied {} change(s)", applied.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Composable state changes**: combine [`StateOption`]s into one
//!   validated request via [`StateBuilder`]
//! - **Firmware-aware brightness deltas**: relative changes use the native
//!   `bri_inc` field on bridges that support it and are emulated against
//!   the cached state on bridges that do not (see [`DeltaEncoding`])
//! - **Multi-status reconciliation**: per-attribute bridge responses are
//!   aggregated into a single result, or the bridge's own error surfaces
//!   as the authoritative failure
//! - **RGB Colors**: derive xy chromaticity and brightness from a [`Color`]
//! - **Discovery**: find bridges on the local network with
//!   [`discover_bridges`]
//! - **Diagnostics**: per-bridge request history via
//!   [`RequestHistory`]
//!
//! ## Communication
//!
//! All communication happens over HTTP against the bridge's REST interface
//! at `http://<host>/api/<username>`. Registering the username (pressing
//! the link button) is outside the scope of this crate. Every call is one
//! synchronous request/response round trip; no retry or timeout policy is
//! applied internally, since relative brightness commands are not safely
//! idempotent.

mod bridge;
mod config;
mod discovery;
mod errors;
mod history;
mod light;
mod payload;
mod response;
mod state;
mod types;

// Re-export public API
pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use discovery::{DiscoveredBridge, discover_bridges};
pub use errors::Error;
pub use history::{HistoryEntry, HistorySummary, MessageType, RequestHistory};
pub use light::{Light, LightAttributes};
pub use payload::{StateBuilder, StateOption, StatePayload};
pub use response::{ApiError, AppliedChanges};
pub use state::{Alert, ColorMode, Effect, LightState};
pub use types::{ApiVersion, Color, DeltaEncoding};
