//! Color tokens derived from a primary color in OKLCH.

use appforge_core::Oklch;
use indexmap::IndexMap;
use serde::Serialize;

/// Minimum lightness difference for readable text.
pub const MIN_CONTRAST_DELTA: f64 = 0.4;

const CONTRAST_STEP: f64 = 0.05;
const CONTRAST_MAX_STEPS: usize = 10;

/// Interaction state of a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    Base,
    Hover,
    Pressed,
    Disabled,
}

impl ColorRole {
    /// Parse a slot suffix such as `hover`.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "hover" => Some(Self::Hover),
            "pressed" => Some(Self::Pressed),
            "disabled" => Some(Self::Disabled),
            _ => None,
        }
    }
}

/// Derive the color for an interaction state.
///
/// Hover and pressed move lightness away from the base's own side of the
/// midpoint, so light colors darken and dark colors lighten.
pub fn resolve_color(base: Oklch, role: ColorRole) -> Oklch {
    let direction = if base.is_light() { -1.0 } else { 1.0 };
    match role {
        ColorRole::Base => base,
        ColorRole::Hover => base.with_lightness(base.l + direction * 0.05),
        ColorRole::Pressed => base.with_lightness(base.l + direction * 0.10),
        ColorRole::Disabled => Oklch {
            alpha: 0.5,
            ..base.with_chroma(base.c - 0.1)
        },
    }
}

/// Outcome of a contrast repair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastResult {
    pub color: Oklch,
    /// Achieved lightness difference to the background.
    pub delta: f64,
    /// Whether the requested minimum was reached.
    pub met: bool,
}

/// Adjust `fg` until its lightness differs from `bg` by at least `min_delta`.
///
/// Steps of 0.05 move away from the background's side of the midpoint, for at
/// most 10 iterations. Never fails: when the target is unreachable the best
/// achieved color is returned with `met == false`. A compliant input comes back
/// unchanged.
pub fn ensure_contrast(fg: Oklch, bg: Oklch, min_delta: f64) -> ContrastResult {
    let delta = |c: &Oklch| (c.l - bg.l).abs();

    if delta(&fg) >= min_delta {
        return ContrastResult {
            color: fg,
            delta: delta(&fg),
            met: true,
        };
    }

    let direction = if bg.is_light() { -1.0 } else { 1.0 };
    let mut best = fg;
    let mut current = fg;

    for _ in 0..CONTRAST_MAX_STEPS {
        current = current.with_lightness(current.l + direction * CONTRAST_STEP);
        if delta(&current) > delta(&best) {
            best = current;
        }
        if delta(&best) >= min_delta {
            break;
        }
    }

    ContrastResult {
        color: best,
        delta: delta(&best),
        met: delta(&best) >= min_delta,
    }
}

/// A text slot that could not reach the readable contrast threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastShortfall {
    pub slot: String,
    pub against: String,
    pub achieved: f64,
    pub required: f64,
}

impl std::fmt::Display for ContrastShortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "color `{}` reaches a lightness contrast of {:.2} against `{}` (needs {:.2})",
            self.slot, self.achieved, self.against, self.required
        )
    }
}

/// The color palette, keyed by slot name in a fixed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorTokens {
    pub slots: IndexMap<String, Oklch>,
    pub shortfalls: Vec<ContrastShortfall>,
}

impl ColorTokens {
    /// Look up a slot, with an optional interaction suffix (`primary.hover`).
    pub fn get(&self, slot: &str) -> Option<Oklch> {
        if let Some(color) = self.slots.get(slot) {
            return Some(*color);
        }
        let (base, suffix) = slot.rsplit_once('.')?;
        let role = ColorRole::from_suffix(suffix)?;
        self.slots.get(base).map(|c| resolve_color(*c, role))
    }

    pub fn primary(&self) -> Option<Oklch> {
        self.get("primary")
    }

    pub fn accent(&self) -> Option<Oklch> {
        self.get("accent")
    }
}

/// Lightness and chroma of the neutral slots, tinted with the primary hue.
const LIGHT_NEUTRALS: [(&str, f64, f64); 7] = [
    ("background", 0.99, 0.005),
    ("surface", 0.97, 0.01),
    ("surfaceVariant", 0.94, 0.015),
    ("border", 0.88, 0.02),
    ("textPrimary", 0.20, 0.02),
    ("textSecondary", 0.45, 0.02),
    ("textDisabled", 0.65, 0.01),
];

const DARK_NEUTRALS: [(&str, f64, f64); 7] = [
    ("background", 0.15, 0.01),
    ("surface", 0.20, 0.015),
    ("surfaceVariant", 0.25, 0.02),
    ("border", 0.35, 0.02),
    ("textPrimary", 0.95, 0.01),
    ("textSecondary", 0.72, 0.015),
    ("textDisabled", 0.50, 0.01),
];

const SEMANTIC: [(&str, Oklch); 4] = [
    ("success", Oklch::new(0.65, 0.17, 145.0)),
    ("warning", Oklch::new(0.78, 0.16, 75.0)),
    ("error", Oklch::new(0.60, 0.20, 25.0)),
    ("info", Oklch::new(0.62, 0.15, 240.0)),
];

/// Text slots repaired against the background.
const READABLE_TEXT: [&str; 2] = ["textPrimary", "textSecondary"];

/// Generate the full palette.
///
/// The accent defaults to the primary hue rotated by 150 degrees with a little
/// more chroma. `dark` selects the dark neutral table.
pub fn generate_color_tokens(primary: Oklch, accent: Option<Oklch>, dark: bool) -> ColorTokens {
    let accent = accent.unwrap_or_else(|| primary.rotate_hue(150.0).with_chroma(primary.c + 0.02));
    let secondary = primary.with_chroma(primary.c - 0.08);

    let mut slots = IndexMap::new();
    let mut shortfalls = Vec::new();

    slots.insert("primary".to_string(), primary);

    let on_primary_start = if primary.is_light() {
        Oklch::new(0.15, 0.02, primary.h)
    } else {
        Oklch::new(0.98, 0.01, primary.h)
    };
    let on_primary = ensure_contrast(on_primary_start, primary, MIN_CONTRAST_DELTA);
    if !on_primary.met {
        shortfalls.push(ContrastShortfall {
            slot: "onPrimary".to_string(),
            against: "primary".to_string(),
            achieved: on_primary.delta,
            required: MIN_CONTRAST_DELTA,
        });
    }
    slots.insert("onPrimary".to_string(), on_primary.color);
    slots.insert("secondary".to_string(), secondary);
    slots.insert("accent".to_string(), accent);

    let neutrals = if dark { &DARK_NEUTRALS } else { &LIGHT_NEUTRALS };
    for (name, l, c) in neutrals.iter() {
        slots.insert(name.to_string(), Oklch::new(*l, *c, primary.h));
    }

    let background = slots["background"];
    for name in READABLE_TEXT {
        let result = ensure_contrast(slots[name], background, MIN_CONTRAST_DELTA);
        if !result.met {
            shortfalls.push(ContrastShortfall {
                slot: name.to_string(),
                against: "background".to_string(),
                achieved: result.delta,
                required: MIN_CONTRAST_DELTA,
            });
        }
        slots.insert(name.to_string(), result.color);
    }

    for (name, color) in SEMANTIC {
        slots.insert(name.to_string(), color);
    }

    ColorTokens { slots, shortfalls }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BLUE: Oklch = Oklch::new(0.623, 0.188, 259.8);

    #[test]
    fn test_hover_and_pressed_darken_light_colors() {
        let hover = resolve_color(BLUE, ColorRole::Hover);
        let pressed = resolve_color(BLUE, ColorRole::Pressed);
        assert!((hover.l - (BLUE.l - 0.05)).abs() < 1e-9);
        assert!((pressed.l - (BLUE.l - 0.10)).abs() < 1e-9);
    }

    #[test]
    fn test_hover_lightens_dark_colors() {
        let navy = Oklch::new(0.3, 0.1, 260.0);
        assert!((resolve_color(navy, ColorRole::Hover).l - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_disabled_reduces_chroma_and_alpha() {
        let disabled = resolve_color(BLUE, ColorRole::Disabled);
        assert!((disabled.c - 0.088).abs() < 1e-9);
        assert_eq!(disabled.alpha, 0.5);

        let grey = resolve_color(Oklch::new(0.5, 0.05, 0.0), ColorRole::Disabled);
        assert_eq!(grey.c, 0.0);
    }

    #[test]
    fn test_compliant_color_unchanged() {
        let fg = Oklch::new(0.2, 0.02, 0.0);
        let bg = Oklch::new(0.99, 0.0, 0.0);
        let result = ensure_contrast(fg, bg, MIN_CONTRAST_DELTA);
        assert_eq!(result.color, fg);
        assert!(result.met);
    }

    #[test]
    fn test_contrast_repair_darkens_on_light_background() {
        let fg = Oklch::new(0.8, 0.02, 0.0);
        let bg = Oklch::new(0.99, 0.0, 0.0);
        let result = ensure_contrast(fg, bg, MIN_CONTRAST_DELTA);
        assert!(result.met);
        assert!(result.color.l < fg.l);
        assert!(result.delta >= MIN_CONTRAST_DELTA);
    }

    #[test]
    fn test_unreachable_contrast_reports_best() {
        let fg = Oklch::new(0.5, 0.0, 0.0);
        let bg = Oklch::new(0.5, 0.0, 0.0);
        let result = ensure_contrast(fg, bg, 0.9);
        assert!(!result.met);
        assert!((result.delta - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_default_accent_rotates_hue() {
        let tokens = generate_color_tokens(BLUE, None, false);
        let accent = tokens.accent().unwrap();
        assert!((accent.h - 49.8).abs() < 1e-9);
        assert!((accent.c - 0.208).abs() < 1e-9);
    }

    #[test]
    fn test_light_and_dark_tables_differ() {
        let light = generate_color_tokens(BLUE, None, false);
        let dark = generate_color_tokens(BLUE, None, true);
        assert!(light.get("background").unwrap().is_light());
        assert!(!dark.get("background").unwrap().is_light());
        assert!(light.shortfalls.is_empty());
        assert!(dark.shortfalls.is_empty());
    }

    #[test]
    fn test_role_suffix_lookup() {
        let tokens = generate_color_tokens(BLUE, None, false);
        assert_eq!(
            tokens.get("primary.pressed"),
            Some(resolve_color(BLUE, ColorRole::Pressed))
        );
        assert!(tokens.get("primary.glowing").is_none());
        assert!(tokens.get("chartreuse").is_none());
    }

    #[test]
    fn test_on_primary_is_readable() {
        let tokens = generate_color_tokens(BLUE, None, false);
        let on_primary = tokens.get("onPrimary").unwrap();
        assert!((on_primary.l - BLUE.l).abs() >= MIN_CONTRAST_DELTA - 1e-9 || !tokens.shortfalls.is_empty());
    }

    proptest! {
        #[test]
        fn prop_contrast_repair_never_reduces_contrast(
            fl in 0.0f64..=1.0,
            bl in 0.0f64..=1.0,
            min in 0.0f64..=1.0,
        ) {
            let fg = Oklch::new(fl, 0.05, 120.0);
            let bg = Oklch::new(bl, 0.01, 120.0);
            let result = ensure_contrast(fg, bg, min);
            prop_assert!(result.delta + 1e-12 >= (fl - bl).abs());
            prop_assert_eq!(result.met, result.delta >= min);
        }

        #[test]
        fn prop_palette_is_deterministic(l in 0.2f64..0.9, c in 0.0f64..0.3, h in 0.0f64..360.0, dark in any::<bool>()) {
            let primary = Oklch::new(l, c, h);
            prop_assert_eq!(
                generate_color_tokens(primary, None, dark),
                generate_color_tokens(primary, None, dark)
            );
        }
    }
}
