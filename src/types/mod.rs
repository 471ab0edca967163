//! Value types for light control parameters.

mod color;
mod version;

pub use color::Color;
pub use version::{ApiVersion, DeltaEncoding};
