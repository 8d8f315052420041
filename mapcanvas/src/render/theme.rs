//! Visual theme: background fill and center marker style.

use image::Rgba;
use thiserror::Error;

/// Errors raised while parsing theme values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    #[error("Invalid color '{0}' (expected #rrggbb or #rrggbbaa)")]
    InvalidColor(String),

    #[error("Unknown theme '{0}' (expected light or dark)")]
    UnknownTheme(String),
}

/// Appearance of the marker drawn at the requested coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub fill: Rgba<u8>,
    pub outline: Rgba<u8>,
    /// Outer radius in pixels.
    pub radius: u32,
    /// Outline thickness in pixels, drawn inside the radius.
    pub outline_width: u32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            fill: Rgba([0xd6, 0x33, 0x2a, 0xff]),
            outline: Rgba([0xff, 0xff, 0xff, 0xff]),
            radius: 8,
            outline_width: 2,
        }
    }
}

/// Theme applied to a rendered map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    name: String,
    background: Rgba<u8>,
    marker: Option<MarkerStyle>,
}

impl Theme {
    /// Light grey background with a red marker.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Rgba([0xdd, 0xdd, 0xdd, 0xff]),
            marker: Some(MarkerStyle::default()),
        }
    }

    /// Dark background with an amber marker.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Rgba([0x22, 0x24, 0x28, 0xff]),
            marker: Some(MarkerStyle {
                fill: Rgba([0xff, 0xb3, 0x00, 0xff]),
                outline: Rgba([0x11, 0x11, 0x11, 0xff]),
                ..MarkerStyle::default()
            }),
        }
    }

    /// Look up a preset by name (case-insensitive).
    pub fn named(name: &str) -> Result<Self, ThemeError> {
        match name.trim().to_lowercase().as_str() {
            "light" => Ok(Self::light()),
            "dark" => Ok(Self::dark()),
            _ => Err(ThemeError::UnknownTheme(name.to_string())),
        }
    }

    pub fn with_background(mut self, background: Rgba<u8>) -> Self {
        self.background = background;
        self
    }

    pub fn with_marker(mut self, marker: MarkerStyle) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn without_marker(mut self) -> Self {
        self.marker = None;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    pub fn marker(&self) -> Option<&MarkerStyle> {
        self.marker.as_ref()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// Parse `#rrggbb` or `#rrggbbaa` into a color.
pub fn parse_color(value: &str) -> Result<Rgba<u8>, ThemeError> {
    let invalid = || ThemeError::InvalidColor(value.to_string());

    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    let alpha = if hex.len() == 8 { channel(6)? } else { 0xff };

    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}
