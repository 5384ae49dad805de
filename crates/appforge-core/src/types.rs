//! Core value types shared by every stage of the generator.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;

/// A color in the OKLCH perceptual color space.
///
/// `l` is lightness in `0.0..=1.0`, `c` is chroma (practically `0.0..=0.4`),
/// `h` is hue in degrees `0.0..360.0`, `alpha` is opacity in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
    pub alpha: f64,
}

impl Oklch {
    pub const fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h, alpha: 1.0 }
    }

    pub const fn with_alpha(l: f64, c: f64, h: f64, alpha: f64) -> Self {
        Self { l, c, h, alpha }
    }

    /// Return a copy with lightness clamped into range.
    pub fn with_lightness(self, l: f64) -> Self {
        Self { l: l.clamp(0.0, 1.0), ..self }
    }

    /// Return a copy with chroma floored at zero.
    pub fn with_chroma(self, c: f64) -> Self {
        Self { c: c.max(0.0), ..self }
    }

    /// Return a copy with the hue rotated by `degrees`.
    pub fn rotate_hue(self, degrees: f64) -> Self {
        Self { h: normalize_hue(self.h + degrees), ..self }
    }

    /// Whether this color sits on the light side of the lightness midpoint.
    pub fn is_light(&self) -> bool {
        self.l >= 0.5
    }

    /// Parse `#RRGGBB`, `#RRGGBBAA` or `oklch(L C H)` / `oklch(L C H / A)`.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if let Some(body) = trimmed
            .strip_prefix("oklch(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let (channels, alpha) = match body.split_once('/') {
                Some((channels, alpha)) => (channels, Some(alpha.trim())),
                None => (body, None),
            };
            let parts: Vec<f64> = channels
                .split_whitespace()
                .map(|part| part.parse::<f64>().ok())
                .collect::<Option<Vec<_>>>()?;
            if parts.len() != 3 {
                return None;
            }
            let alpha = match alpha {
                Some(a) => a.parse::<f64>().ok()?,
                None => 1.0,
            };
            if !(0.0..=1.0).contains(&parts[0]) || parts[1] < 0.0 || !(0.0..=1.0).contains(&alpha) {
                return None;
            }
            return Some(Self::with_alpha(parts[0], parts[1], normalize_hue(parts[2]), alpha));
        }
        Rgba::from_hex(trimmed).map(Self::from_rgba)
    }

    /// Convert from gamma-encoded sRGB.
    pub fn from_rgba(color: Rgba) -> Self {
        let r = srgb_to_linear(color.r);
        let g = srgb_to_linear(color.g);
        let b = srgb_to_linear(color.b);

        let l = (0.412_221_470_8 * r + 0.536_332_536_3 * g + 0.051_445_992_9 * b).cbrt();
        let m = (0.211_903_498_2 * r + 0.680_699_545_1 * g + 0.107_396_956_6 * b).cbrt();
        let s = (0.088_302_461_9 * r + 0.281_718_837_6 * g + 0.629_978_700_5 * b).cbrt();

        let lightness = 0.210_454_255_3 * l + 0.793_617_785_0 * m - 0.004_072_046_8 * s;
        let a = 1.977_998_495_1 * l - 2.428_592_205_0 * m + 0.450_593_709_9 * s;
        let bb = 0.025_904_037_1 * l + 0.782_771_766_2 * m - 0.808_675_766_0 * s;

        let chroma = (a * a + bb * bb).sqrt();
        let hue = if chroma < 1e-6 { 0.0 } else { normalize_hue(bb.atan2(a).to_degrees()) };

        Self::with_alpha(lightness.clamp(0.0, 1.0), chroma, hue, color.a)
    }

    /// Convert to gamma-encoded sRGB, clamping out-of-gamut channels.
    pub fn to_rgba(&self) -> Rgba {
        let hue = self.h.to_radians();
        let a = self.c * hue.cos();
        let b = self.c * hue.sin();

        let l = (self.l + 0.396_337_777_4 * a + 0.215_803_757_3 * b).powi(3);
        let m = (self.l - 0.105_561_345_8 * a - 0.063_854_172_8 * b).powi(3);
        let s = (self.l - 0.089_484_177_5 * a - 1.291_485_548_0 * b).powi(3);

        let r = 4.076_741_662_1 * l - 3.307_711_591_3 * m + 0.230_969_929_2 * s;
        let g = -1.268_438_004_6 * l + 2.609_757_401_1 * m - 0.341_319_396_5 * s;
        let bl = -0.004_196_086_3 * l - 0.703_418_614_7 * m + 1.707_614_701_0 * s;

        Rgba {
            r: linear_to_srgb(r),
            g: linear_to_srgb(g),
            b: linear_to_srgb(bl),
            a: self.alpha.clamp(0.0, 1.0),
        }
    }
}

impl fmt::Display for Oklch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (self.alpha - 1.0).abs() < f64::EPSILON {
            write!(f, "oklch({:.3} {:.3} {:.1})", self.l, self.c, self.h)
        } else {
            write!(f, "oklch({:.3} {:.3} {:.1} / {:.2})", self.l, self.c, self.h, self.alpha)
        }
    }
}

impl Serialize for Oklch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Oklch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Oklch::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color `{raw}`")))
    }
}

fn normalize_hue(h: f64) -> f64 {
    let wrapped = h % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f64) -> f64 {
    let encoded = if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    encoded.clamp(0.0, 1.0)
}

/// A gamma-encoded sRGB color with straight alpha, channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create from hex string (e.g., "#FF5733" or "FF5733CC").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| -> Option<f64> {
            u8::from_str_radix(&hex[range], 16)
                .ok()
                .map(|v| v as f64 / 255.0)
        };
        match hex.len() {
            6 => Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Some(Self {
                r: channel(0..2)?,
                g: channel(2..4)?,
                b: channel(4..6)?,
                a: channel(6..8)?,
            }),
            _ => None,
        }
    }

    /// Convert to hex string (e.g., "#FF5733").
    pub fn to_hex(&self) -> String {
        let to8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        if to8(self.a) == 255 {
            format!("#{:02X}{:02X}{:02X}", to8(self.r), to8(self.g), to8(self.b))
        } else {
            format!(
                "#{:02X}{:02X}{:02X}{:02X}",
                to8(self.r),
                to8(self.g),
                to8(self.b),
                to8(self.a)
            )
        }
    }
}

/// Path of node ids from a tree's root to one node, used in error reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(pub SmallVec<[String; 8]>);

impl NodePath {
    pub fn root(id: impl Into<String>) -> Self {
        let mut segments = SmallVec::new();
        segments.push(id.into());
        Self(segments)
    }

    /// Path of a child one level below this one.
    pub fn child(&self, id: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(id.into());
        Self(segments)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn leaf(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}
