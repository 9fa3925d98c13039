use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex color {input:?}: {reason}")]
    InvalidFormat { input: String, reason: &'static str },
}

impl ColorError {
    fn invalid(input: &str, reason: &'static str) -> Self {
        ColorError::InvalidFormat {
            input: input.to_string(),
            reason,
        }
    }
}

/// CIE 1931 chromaticity, as accepted by the bridge `color.xy` fields.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Xy {
    pub x: f64,
    pub y: f64,
}

/// Parses `#rrggbb` or `rrggbb` and converts it with [`rgb_to_xy`].
pub fn hex_to_xy(hex_color: &str) -> Result<Xy, ColorError> {
    if hex_color.is_empty() {
        return Err(ColorError::invalid(hex_color, "empty string"));
    }

    let digits = hex_color.strip_prefix('#').unwrap_or(hex_color);
    if digits.len() != 6 {
        return Err(ColorError::invalid(hex_color, "expected 6 hex digits"));
    }

    let bytes = digits.as_bytes();
    let channel = |i: usize| -> Result<u8, ColorError> {
        let pair = &bytes[i..i + 2];
        // from_str_radix would accept a leading '+'
        if !pair.iter().all(u8::is_ascii_hexdigit) {
            return Err(ColorError::invalid(hex_color, "non-hex channel"));
        }
        let text = std::str::from_utf8(pair).map_err(|_| ColorError::invalid(hex_color, "non-hex channel"))?;
        u8::from_str_radix(text, 16).map_err(|_| ColorError::invalid(hex_color, "non-hex channel"))
    };

    let r = channel(0)?;
    let g = channel(2)?;
    let b = channel(4)?;

    Ok(rgb_to_xy(r as f64, g as f64, b as f64))
}

/// sRGB (D65) to xy, rounded to two decimals. Black maps to (0, 0).
pub fn rgb_to_xy(r: f64, g: f64, b: f64) -> Xy {
    let r = gamma_correct(r / 255.0);
    let g = gamma_correct(g / 255.0);
    let b = gamma_correct(b / 255.0);

    let x = r * 0.4124 + g * 0.3576 + b * 0.1805;
    let y = r * 0.2126 + g * 0.7152 + b * 0.0722;
    let z = r * 0.0193 + g * 0.1192 + b * 0.9505;

    let sum = x + y + z;
    if sum == 0.0 {
        return Xy { x: 0.0, y: 0.0 };
    }

    Xy {
        x: round2(x / sum),
        y: round2(y / sum),
    }
}

/// sRGB transfer function decode, channel in [0, 1].
pub(crate) fn gamma_correct(value: f64) -> f64 {
    if value > 0.04045 {
        ((value + 0.055) / 1.055).powf(2.4)
    } else {
        value / 12.92
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
