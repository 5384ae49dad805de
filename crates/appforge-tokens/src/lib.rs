//! Design token resolver for appforge.
//!
//! Derives a complete, deterministic token set (colors, typography, spacing,
//! shadows, motion) from a handful of appearance inputs, and resolves token
//! references from component properties to concrete values.

pub mod color;
pub mod motion;
pub mod shadow;
pub mod spacing;
pub mod typography;

pub use color::{
    ensure_contrast, generate_color_tokens, resolve_color, ColorRole, ColorTokens, ContrastResult,
    ContrastShortfall, MIN_CONTRAST_DELTA,
};
pub use motion::{generate_motion_tokens, CubicBezier, MotionToken, MotionTokens, Spring};
pub use shadow::{generate_shadow_tokens, ShadowToken, ShadowTokens};
pub use spacing::{generate_spacing_tokens, SpacingTokens};
pub use typography::{
    generate_typography_tokens, FontFamily, FontWeight, TextStyle, TypographyTokens, DEFAULT_SCALE_RATIO,
};

use appforge_core::{Appearance, Oklch, ShadowIntensity, TokenKind};
use serde::Serialize;
use thiserror::Error;

/// Errors from token lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Unknown {kind} token `{slot}`")]
    UnknownSlot { kind: TokenKind, slot: String },
}

/// Inputs from which a token set is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenInputs {
    pub primary: Oklch,
    pub accent: Option<Oklch>,
    pub dark: bool,
    pub base_unit: f64,
    pub base_font_size: f64,
    pub shadow_intensity: ShadowIntensity,
}

impl TokenInputs {
    pub fn new(primary: Oklch) -> Self {
        Self {
            primary,
            accent: None,
            dark: false,
            base_unit: 4.0,
            base_font_size: 16.0,
            shadow_intensity: ShadowIntensity::Normal,
        }
    }

    pub fn from_appearance(appearance: &Appearance) -> Self {
        Self {
            primary: appearance.primary_color,
            accent: appearance.accent_color,
            dark: appearance.dark_theme,
            base_unit: appearance.base_unit,
            base_font_size: appearance.base_font_size,
            shadow_intensity: appearance.shadow_intensity,
        }
    }
}

/// A concrete token value.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedToken {
    Color(Oklch),
    /// A length in points.
    Dimension(f64),
    /// A unitless multiplier.
    Number(f64),
    Font(TextStyle),
    Shadow(ShadowToken),
    Motion(MotionToken),
}

impl ResolvedToken {
    pub fn as_color(&self) -> Option<Oklch> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_dimension(&self) -> Option<f64> {
        match self {
            Self::Dimension(d) => Some(*d),
            _ => None,
        }
    }
}

/// The full token set for one generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignTokens {
    pub name: String,
    pub version: String,
    pub colors: ColorTokens,
    pub typography: TypographyTokens,
    pub spacing: SpacingTokens,
    pub shadows: ShadowTokens,
    pub motion: MotionTokens,
}

impl DesignTokens {
    /// Derive every token category from the inputs.
    pub fn generate(name: impl Into<String>, version: impl Into<String>, inputs: &TokenInputs) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            colors: generate_color_tokens(inputs.primary, inputs.accent, inputs.dark),
            typography: generate_typography_tokens(inputs.base_font_size, DEFAULT_SCALE_RATIO),
            spacing: generate_spacing_tokens(inputs.base_unit),
            shadows: generate_shadow_tokens(inputs.shadow_intensity),
            motion: generate_motion_tokens(),
        }
    }

    /// Resolve a slot of the given kind.
    pub fn resolve(&self, kind: TokenKind, slot: &str) -> Result<ResolvedToken, TokenError> {
        let resolved = match kind {
            TokenKind::Color => self.colors.get(slot).map(ResolvedToken::Color),
            TokenKind::Spacing => self.spacing.scale.get(slot).copied().map(ResolvedToken::Dimension),
            TokenKind::Radius => self.spacing.radii.get(slot).copied().map(ResolvedToken::Dimension),
            TokenKind::BorderWidth => self
                .spacing
                .border_widths
                .get(slot)
                .copied()
                .map(ResolvedToken::Dimension),
            TokenKind::Font => self.typography.font(slot).map(ResolvedToken::Font),
            TokenKind::LineHeight => self
                .typography
                .line_heights
                .get(slot)
                .copied()
                .map(ResolvedToken::Number),
            TokenKind::LetterSpacing => self.typography.tracking(slot).map(ResolvedToken::Dimension),
            TokenKind::Shadow => self.shadows.levels.get(slot).copied().map(ResolvedToken::Shadow),
            TokenKind::Motion => self.motion.get(slot).map(ResolvedToken::Motion),
        };
        resolved.ok_or_else(|| TokenError::UnknownSlot {
            kind,
            slot: slot.to_string(),
        })
    }

    /// Contrast shortfalls recorded while generating the palette.
    pub fn contrast_shortfalls(&self) -> &[ContrastShortfall] {
        &self.colors.shortfalls
    }
}
