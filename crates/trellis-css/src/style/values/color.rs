//! CSS color values.
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)
//!
//! Layout never paints, so colors are only parsed to validate declarations
//! during the cascade and to give painters a typed accessor.

use serde::Serialize;
use trellis_common::ValueError;

use super::{parse_number, split_top_level};

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
/// sRGB color represented as RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorValue {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

/// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
///
/// The CSS 2.1 basic set plus the extended names seen most in the wild.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aqua", [0, 255, 255]),
    ("black", [0, 0, 0]),
    ("blue", [0, 0, 255]),
    ("brown", [165, 42, 42]),
    ("coral", [255, 127, 80]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]),
    ("darkred", [139, 0, 0]),
    ("fuchsia", [255, 0, 255]),
    ("gold", [255, 215, 0]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("grey", [128, 128, 128]),
    ("indigo", [75, 0, 130]),
    ("lightblue", [173, 216, 230]),
    ("lightgray", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightgrey", [211, 211, 211]),
    ("lime", [0, 255, 0]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("navy", [0, 0, 128]),
    ("olive", [128, 128, 0]),
    ("orange", [255, 165, 0]),
    ("pink", [255, 192, 203]),
    ("purple", [128, 0, 128]),
    ("red", [255, 0, 0]),
    ("salmon", [250, 128, 114]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("steelblue", [70, 130, 180]),
    ("teal", [0, 128, 128]),
    ("tomato", [255, 99, 71]),
    ("violet", [238, 130, 238]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
];

impl ColorValue {
    /// Black (#000000)
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };

    /// Parse any supported color syntax.
    ///
    /// `currentcolor` is not a concrete color; callers resolve it against
    /// the `color` property (see [`is_color_keyword`]).
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Color`] when the text is not a color.
    pub fn parse(text: &str) -> Result<Self, ValueError> {
        let trimmed = text.trim();
        let err = || ValueError::Color(trimmed.to_string());
        if let Some(hex) = trimmed.strip_prefix('#') {
            return Self::from_hex(hex).ok_or_else(err);
        }
        if let Some(open) = trimmed.find('(') {
            if !trimmed.ends_with(')') {
                return Err(err());
            }
            let name = trimmed[..open].trim().to_ascii_lowercase();
            let args = &trimmed[open + 1..trimmed.len() - 1];
            return match name.as_str() {
                "rgb" | "rgba" => parse_rgb_function(args).ok_or_else(err),
                "hsl" | "hsla" => parse_hsl_function(args).ok_or_else(err),
                _ => Err(err()),
            };
        }
        Self::from_named(trimmed).ok_or_else(err)
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    ///
    /// "The syntax of a <hex-color> is a <hash-token> token whose value
    /// consists of 3, 4, 6, or 8 hexadecimal digits."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
        let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            // "The three-digit RGB notation (#RGB) is converted into six-digit
            // form (#RRGGBB) by replicating digits, not by adding zeros."
            3 | 4 => {
                let r = digit(0)? * 17;
                let g = digit(1)? * 17;
                let b = digit(2)? * 17;
                let a = if hex.len() == 4 { digit(3)? * 17 } else { 255 };
                Some(ColorValue { r, g, b, a })
            }
            6 | 8 => {
                let a = if hex.len() == 8 { pair(6)? } else { 255 };
                Some(ColorValue {
                    r: pair(0)?,
                    g: pair(2)?,
                    b: pair(4)?,
                    a,
                })
            }
            _ => None,
        }
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower == "transparent" {
            return Some(Self::TRANSPARENT);
        }
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == lower)
            .map(|&(_, [r, g, b])| ColorValue { r, g, b, a: 255 })
    }

    /// `#rrggbb` or `#rrggbbaa` when not opaque.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// True for `currentcolor`, which is valid wherever a color is.
#[must_use]
pub fn is_color_keyword(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("currentcolor")
}

/// Validate a color property value without resolving `currentcolor`.
///
/// # Errors
///
/// Returns [`ValueError::Color`] when the text is neither a color nor
/// `currentcolor`.
pub fn validate_color(text: &str) -> Result<(), ValueError> {
    if is_color_keyword(text) {
        return Ok(());
    }
    ColorValue::parse(text).map(|_| ())
}

/// Split function arguments on commas, or on whitespace plus an optional
/// `/ alpha` in the modern syntax.
fn color_args(args: &str) -> Vec<&str> {
    if args.contains(',') {
        return split_top_level(args, ',');
    }
    let mut parts: Vec<&str> = Vec::new();
    for (i, piece) in split_top_level(args, '/').into_iter().enumerate() {
        if i == 0 {
            parts.extend(piece.split_ascii_whitespace());
        } else {
            parts.push(piece);
        }
    }
    parts
}

/// [§ 5.1 The RGB functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
fn parse_rgb_function(args: &str) -> Option<ColorValue> {
    let parts = color_args(args);
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |text: &str| -> Option<u8> {
        let value = if let Some(pct) = text.strip_suffix('%') {
            parse_number(pct).ok()? * 2.55
        } else {
            parse_number(text).ok()?
        };
        Some(value.round().clamp(0.0, 255.0) as u8)
    };
    Some(ColorValue {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a: match parts.get(3) {
            Some(alpha) => alpha_to_u8(alpha)?,
            None => 255,
        },
    })
}

/// [§ 7.1 The HSL functions](https://www.w3.org/TR/css-color-4/#the-hsl-notation)
fn parse_hsl_function(args: &str) -> Option<ColorValue> {
    let parts = color_args(args);
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let hue = parse_number(parts[0].trim_end_matches("deg")).ok()?;
    let saturation = parse_number(parts[1].strip_suffix('%').unwrap_or(parts[1])).ok()? / 100.0;
    let lightness = parse_number(parts[2].strip_suffix('%').unwrap_or(parts[2])).ok()? / 100.0;
    let (r, g, b) = hsl_to_rgb(hue, saturation.clamp(0.0, 1.0), lightness.clamp(0.0, 1.0));
    Some(ColorValue {
        r,
        g,
        b,
        a: match parts.get(3) {
            Some(alpha) => alpha_to_u8(alpha)?,
            None => 255,
        },
    })
}

fn alpha_to_u8(text: &str) -> Option<u8> {
    let alpha = if let Some(pct) = text.strip_suffix('%') {
        parse_number(pct).ok()? / 100.0
    } else {
        parse_number(text).ok()?
    };
    Some((alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// [§ 7.1 Converting HSL colors to sRGB](https://www.w3.org/TR/css-color-4/#hsl-to-rgb)
fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let hue = hue.rem_euclid(360.0);
    let f = |n: f64| {
        let k = (n + hue / 30.0) % 12.0;
        let a = saturation * lightness.min(1.0 - lightness);
        let v = lightness - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0);
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };
    (f(0.0), f(8.0), f(4.0))
}
