//! Motion tokens: durations, easing curves and springs.

use indexmap::IndexMap;
use serde::Serialize;

/// A cubic bezier timing curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

/// A spring described by response time and damping fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spring {
    pub response: f64,
    pub damping_fraction: f64,
}

/// A resolved animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MotionToken {
    Timing { curve: CubicBezier, duration: f64 },
    Spring(Spring),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionTokens {
    pub durations: IndexMap<String, f64>,
    pub easings: IndexMap<String, CubicBezier>,
    pub springs: IndexMap<String, Spring>,
}

impl MotionTokens {
    /// Resolve a motion slot.
    ///
    /// Accepted forms: `spring.<name>`, `<easing>.<duration>`, a bare duration
    /// (standard easing) or a bare easing (normal duration).
    pub fn get(&self, slot: &str) -> Option<MotionToken> {
        match slot.split_once('.') {
            Some(("spring", name)) => self.springs.get(name).copied().map(MotionToken::Spring),
            Some((easing, duration)) => self.timing(easing, duration),
            None if self.durations.contains_key(slot) => self.timing("standard", slot),
            None => self.timing(slot, "normal"),
        }
    }

    fn timing(&self, easing: &str, duration: &str) -> Option<MotionToken> {
        Some(MotionToken::Timing {
            curve: *self.easings.get(easing)?,
            duration: *self.durations.get(duration)?,
        })
    }
}

/// Generate the fixed motion tokens.
pub fn generate_motion_tokens() -> MotionTokens {
    let durations = [
        ("instant", 0.0),
        ("fast", 0.15),
        ("normal", 0.25),
        ("slow", 0.4),
        ("slower", 0.6),
    ]
    .into_iter()
    .map(|(name, secs)| (name.to_string(), secs))
    .collect();

    let easings = [
        ("standard", CubicBezier::new(0.2, 0.0, 0.0, 1.0)),
        ("decelerate", CubicBezier::new(0.0, 0.0, 0.0, 1.0)),
        ("accelerate", CubicBezier::new(0.3, 0.0, 1.0, 1.0)),
        ("linear", CubicBezier::new(0.0, 0.0, 1.0, 1.0)),
    ]
    .into_iter()
    .map(|(name, curve)| (name.to_string(), curve))
    .collect();

    let springs = [("snappy", 0.3, 0.85), ("smooth", 0.5, 1.0), ("bouncy", 0.5, 0.6)]
        .into_iter()
        .map(|(name, response, damping_fraction)| {
            (
                name.to_string(),
                Spring {
                    response,
                    damping_fraction,
                },
            )
        })
        .collect();

    MotionTokens {
        durations,
        easings,
        springs,
    }
}
