//! Elevation shadow tokens.

use appforge_core::{Oklch, ShadowIntensity};
use indexmap::IndexMap;
use serde::Serialize;

/// A drop shadow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShadowToken {
    pub x: f64,
    pub y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: Oklch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShadowTokens {
    pub intensity: ShadowIntensity,
    pub levels: IndexMap<String, ShadowToken>,
}

/// (name, y offset, blur, spread, alpha) per level.
const LEVELS: [(&str, f64, f64, f64, f64); 5] = [
    ("xs", 1.0, 2.0, 0.0, 0.05),
    ("sm", 2.0, 4.0, 0.0, 0.08),
    ("md", 4.0, 8.0, -1.0, 0.12),
    ("lg", 8.0, 16.0, -2.0, 0.16),
    ("xl", 16.0, 24.0, -4.0, 0.20),
];

/// Generate the five elevation levels. Intensity scales alpha only.
pub fn generate_shadow_tokens(intensity: ShadowIntensity) -> ShadowTokens {
    let levels = LEVELS
        .iter()
        .map(|(name, y, blur, spread, alpha)| {
            let alpha = (alpha * intensity.multiplier()).min(1.0);
            let token = ShadowToken {
                x: 0.0,
                y: *y,
                blur: *blur,
                spread: *spread,
                color: Oklch::with_alpha(0.0, 0.0, 0.0, alpha),
            };
            (name.to_string(), token)
        })
        .collect();

    ShadowTokens { intensity, levels }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_levels() {
        let tokens = generate_shadow_tokens(ShadowIntensity::Normal);
        let names: Vec<_> = tokens.levels.keys().map(String::as_str).collect();
        assert_eq!(names, ["xs", "sm", "md", "lg", "xl"]);
    }

    #[test]
    fn test_intensity_scales_alpha_only() {
        let normal = generate_shadow_tokens(ShadowIntensity::Normal);
        let strong = generate_shadow_tokens(ShadowIntensity::Strong);
        let subtle = generate_shadow_tokens(ShadowIntensity::Subtle);

        let (n, s) = (normal.levels["md"], strong.levels["md"]);
        assert_eq!(n.blur, s.blur);
        assert_eq!(n.y, s.y);
        assert!((s.color.alpha - 0.18).abs() < 1e-9);
        assert!((subtle.levels["md"].color.alpha - 0.06).abs() < 1e-9);
    }
}
