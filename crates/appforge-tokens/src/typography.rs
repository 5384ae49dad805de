//! Typography tokens: a modular type scale and named text styles.

use indexmap::IndexMap;
use serde::Serialize;

/// Default ratio between adjacent steps of the type scale (major third).
pub const DEFAULT_SCALE_RATIO: f64 = 1.25;

/// Ladder step names with their exponent relative to the base size.
const LADDER: [(&str, i32); 8] = [
    ("xs", -2),
    ("sm", -1),
    ("base", 0),
    ("lg", 1),
    ("xl", 2),
    ("2xl", 3),
    ("3xl", 4),
    ("4xl", 5),
];

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FontWeight {
    Thin,
    ExtraLight,
    Light,
    Regular,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
}

impl FontWeight {
    /// Convert to numeric weight.
    pub fn to_numeric(&self) -> u16 {
        match self {
            Self::Thin => 100,
            Self::ExtraLight => 200,
            Self::Light => 300,
            Self::Regular => 400,
            Self::Medium => 500,
            Self::SemiBold => 600,
            Self::Bold => 700,
            Self::ExtraBold => 800,
            Self::Black => 900,
        }
    }

    /// SwiftUI `Font.Weight` member.
    pub fn to_swift(&self) -> &'static str {
        match self {
            Self::Thin => ".thin",
            Self::ExtraLight => ".ultraLight",
            Self::Light => ".light",
            Self::Regular => ".regular",
            Self::Medium => ".medium",
            Self::SemiBold => ".semibold",
            Self::Bold => ".bold",
            Self::ExtraBold => ".heavy",
            Self::Black => ".black",
        }
    }
}

/// Font family design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FontFamily {
    Sans,
    Serif,
    Mono,
    Rounded,
}

impl FontFamily {
    /// SwiftUI `Font.Design` member.
    pub fn to_swift(&self) -> &'static str {
        match self {
            Self::Sans => ".default",
            Self::Serif => ".serif",
            Self::Mono => ".monospaced",
            Self::Rounded => ".rounded",
        }
    }
}

/// A resolved text style.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Ladder step the size comes from.
    pub step: String,
    pub size: f64,
    pub weight: FontWeight,
    pub family: FontFamily,
    /// Line height as a multiple of the size.
    pub line_height: f64,
    /// Letter spacing in em.
    pub letter_spacing: f64,
}

impl TextStyle {
    /// Extra space between lines, in points.
    pub fn line_spacing(&self) -> f64 {
        round2(self.size * (self.line_height - 1.0))
    }

    /// Tracking in points.
    pub fn tracking(&self) -> f64 {
        round2(self.size * self.letter_spacing)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyTokens {
    pub base_size: f64,
    pub ratio: f64,
    /// Size per ladder step, smallest first.
    pub scale: IndexMap<String, f64>,
    pub families: IndexMap<String, FontFamily>,
    pub line_heights: IndexMap<String, f64>,
    /// Letter spacing in em.
    pub letter_spacing: IndexMap<String, f64>,
    pub styles: IndexMap<String, TextStyle>,
}

impl TypographyTokens {
    /// A named text style, or a ladder step rendered as a regular sans style.
    pub fn font(&self, slot: &str) -> Option<TextStyle> {
        if let Some(style) = self.styles.get(slot) {
            return Some(style.clone());
        }
        self.scale.get(slot).map(|size| TextStyle {
            step: slot.to_string(),
            size: *size,
            weight: FontWeight::Regular,
            family: FontFamily::Sans,
            line_height: self.line_heights["normal"],
            letter_spacing: 0.0,
        })
    }

    /// Letter spacing of a slot converted to points at the base size.
    pub fn tracking(&self, slot: &str) -> Option<f64> {
        self.letter_spacing.get(slot).map(|em| round2(em * self.base_size))
    }
}

/// Generate typography tokens from a base size and scale ratio.
pub fn generate_typography_tokens(base_size: f64, ratio: f64) -> TypographyTokens {
    let scale: IndexMap<String, f64> = LADDER
        .iter()
        .map(|(name, exp)| (name.to_string(), round2(base_size * ratio.powi(*exp))))
        .collect();

    let families = [
        ("sans", FontFamily::Sans),
        ("serif", FontFamily::Serif),
        ("mono", FontFamily::Mono),
        ("rounded", FontFamily::Rounded),
    ]
    .into_iter()
    .map(|(name, family)| (name.to_string(), family))
    .collect();

    let line_heights: IndexMap<String, f64> = [("tight", 1.2), ("normal", 1.5), ("relaxed", 1.75)]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

    let letter_spacing: IndexMap<String, f64> = [("tight", -0.025), ("normal", 0.0), ("wide", 0.025)]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

    use FontWeight::*;
    let style_table = [
        ("largeTitle", "4xl", Bold, "tight", "tight"),
        ("title", "3xl", Bold, "tight", "tight"),
        ("title2", "2xl", SemiBold, "tight", "normal"),
        ("title3", "xl", SemiBold, "tight", "normal"),
        ("headline", "lg", SemiBold, "normal", "normal"),
        ("body", "base", Regular, "normal", "normal"),
        ("callout", "base", Medium, "normal", "normal"),
        ("subheadline", "sm", Regular, "normal", "normal"),
        ("footnote", "sm", Regular, "relaxed", "normal"),
        ("caption", "xs", Medium, "relaxed", "wide"),
    ];

    let styles = style_table
        .iter()
        .map(|(name, step, weight, leading, tracking)| {
            let style = TextStyle {
                step: step.to_string(),
                size: scale[*step],
                weight: *weight,
                family: FontFamily::Sans,
                line_height: line_heights[*leading],
                letter_spacing: letter_spacing[*tracking],
            };
            (name.to_string(), style)
        })
        .collect();

    TypographyTokens {
        base_size,
        ratio,
        scale,
        families,
        line_heights,
        letter_spacing,
        styles,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_ladder() {
        let tokens = generate_typography_tokens(16.0, DEFAULT_SCALE_RATIO);
        assert_eq!(tokens.scale["base"], 16.0);
        assert_eq!(tokens.scale["lg"], 20.0);
        assert_eq!(tokens.scale["xl"], 25.0);
        assert_eq!(tokens.scale["sm"], 12.8);
        assert_eq!(tokens.scale.len(), 8);
    }

    #[test]
    fn test_text_styles_reference_ladder() {
        let tokens = generate_typography_tokens(16.0, DEFAULT_SCALE_RATIO);
        for style in tokens.styles.values() {
            assert_eq!(tokens.scale[style.step.as_str()], style.size);
        }
        let body = tokens.font("body").unwrap();
        assert_eq!(body.weight, FontWeight::Regular);
        assert_eq!(body.line_spacing(), 8.0);
    }

    #[test]
    fn test_ladder_step_as_font() {
        let tokens = generate_typography_tokens(16.0, DEFAULT_SCALE_RATIO);
        let xl = tokens.font("xl").unwrap();
        assert_eq!(xl.size, 25.0);
        assert!(tokens.font("huge").is_none());
    }

    #[test]
    fn test_tracking_in_points() {
        let tokens = generate_typography_tokens(16.0, DEFAULT_SCALE_RATIO);
        assert_eq!(tokens.tracking("wide"), Some(0.4));
        assert_eq!(tokens.tracking("normal"), Some(0.0));
    }

    #[test]
    fn test_weights_map_to_swift() {
        assert_eq!(FontWeight::SemiBold.to_swift(), ".semibold");
        assert_eq!(FontWeight::ExtraBold.to_numeric(), 800);
        assert_eq!(FontFamily::Mono.to_swift(), ".monospaced");
    }

    proptest! {
        #[test]
        fn prop_ladder_increases(base in 8.0f64..32.0, ratio in 1.05f64..1.6) {
            let tokens = generate_typography_tokens(base, ratio);
            let sizes: Vec<f64> = tokens.scale.values().copied().collect();
            prop_assert!(sizes.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
