//! RGB color representation and chromaticity projection.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// CIE xy coordinates of the D65 white point, used when a color carries no
/// chromaticity information at all (pure black).
const WHITE_POINT: [f64; 2] = [0.3127, 0.3290];

/// An RGB color with red, green, and blue components (0-255 each).
///
/// Hue bridges do not take RGB values directly; a color is converted to
/// CIE xy chromaticity via [`Color::to_xy`] and to a brightness channel via
/// [`Color::to_brightness`] before transmission.
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Color {
    pub(crate) red: u8,
    pub(crate) green: u8,
    pub(crate) blue: u8,
}

impl Color {
    /// Create a color with the given RGB values.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Create a default color (black: 0,0,0).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    /// Project this color onto the CIE xy chromaticity plane.
    ///
    /// Pure black has no chromaticity; it maps to the D65 white point.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_lights_rs::Color;
    ///
    /// let [x, y] = Color::rgb(255, 0, 0).to_xy();
    /// assert!((x - 0.640).abs() < 0.005);
    /// assert!((y - 0.330).abs() < 0.005);
    /// ```
    pub fn to_xy(&self) -> [f64; 2] {
        let (x, y, z) = self.to_xyz();
        let sum = x + y + z;
        if sum == 0.0 {
            return WHITE_POINT;
        }
        [x / sum, y / sum]
    }

    /// Derive a bridge brightness value from this color.
    ///
    /// The CIE Y (luminance) channel is scaled to the bridge's brightness
    /// domain and clamped to 1..=254.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_lights_rs::Color;
    ///
    /// assert_eq!(Color::rgb(255, 255, 255).to_brightness(), 254);
    /// assert_eq!(Color::rgb(0, 0, 0).to_brightness(), 1);
    /// ```
    pub fn to_brightness(&self) -> u8 {
        let (_, y, _) = self.to_xyz();
        (y * 254.0).clamp(1.0, 254.0) as u8
    }

    /// Convert to CIE XYZ assuming sRGB components under D65.
    fn to_xyz(&self) -> (f64, f64, f64) {
        let r = linearize(self.red);
        let g = linearize(self.green);
        let b = linearize(self.blue);

        let x = 0.4124564 * r + 0.3575761 * g + 0.1804375 * b;
        let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
        let z = 0.0193339 * r + 0.1191920 * g + 0.9503041 * b;
        (x, y, z)
    }
}

/// Invert the sRGB gamma curve for one 0-255 component.
fn linearize(component: u8) -> f64 {
    let v = component as f64 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parse from comma-separated string (e.g., "255,128,0").
    fn from_str(s: &str) -> Result<Self, String> {
        let parts: Vec<u8> = s.split(',').map(|c| c.parse().unwrap_or(0)).collect();
        if parts.len() == 3 {
            Ok(Self::rgb(parts[0], parts[1], parts[2]))
        } else {
            Err("Expected format: r,g,b".into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_has_no_chromaticity() {
        assert_eq!(Color::new().to_xy(), WHITE_POINT);
    }

    #[test]
    fn test_white_is_near_white_point() {
        let [x, y] = Color::rgb(255, 255, 255).to_xy();
        assert!((x - WHITE_POINT[0]).abs() < 0.005);
        assert!((y - WHITE_POINT[1]).abs() < 0.005);
    }

    #[test]
    fn test_dim_color_brightness_clamps_low() {
        assert_eq!(Color::rgb(1, 0, 0).to_brightness(), 1);
    }
}
