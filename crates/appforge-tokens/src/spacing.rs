//! Spacing, corner radius and border width tokens.

use indexmap::IndexMap;
use serde::Serialize;

/// Radius large enough to render a capsule.
pub const FULL_RADIUS: f64 = 9999.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingTokens {
    pub base_unit: f64,
    pub scale: IndexMap<String, f64>,
    pub radii: IndexMap<String, f64>,
    pub border_widths: IndexMap<String, f64>,
}

/// Generate spacing tokens as multiples of `base_unit`.
pub fn generate_spacing_tokens(base_unit: f64) -> SpacingTokens {
    let multiples = |table: &[(&str, f64)]| -> IndexMap<String, f64> {
        table
            .iter()
            .map(|(name, factor)| (name.to_string(), base_unit * factor))
            .collect()
    };

    let scale = multiples(&[
        ("none", 0.0),
        ("xs", 1.0),
        ("sm", 2.0),
        ("md", 4.0),
        ("lg", 6.0),
        ("xl", 8.0),
        ("xxl", 12.0),
    ]);

    let mut radii = multiples(&[("none", 0.0), ("sm", 1.0), ("md", 2.0), ("lg", 3.0), ("xl", 4.0)]);
    radii.insert("full".to_string(), FULL_RADIUS);

    // Border widths are absolute.
    let border_widths = [("hairline", 0.5), ("thin", 1.0), ("medium", 2.0), ("thick", 4.0)]
        .into_iter()
        .map(|(name, width)| (name.to_string(), width))
        .collect();

    SpacingTokens {
        base_unit,
        scale,
        radii,
        border_widths,
    }
}
