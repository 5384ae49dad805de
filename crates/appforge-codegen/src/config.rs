//! Generator configuration.

use crate::error::{CodegenError, Result};
use serde::{Deserialize, Serialize};

/// Resource ceilings enforced before any building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    pub max_depth: usize,
    pub max_nodes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_nodes: 5000,
        }
    }
}

/// Knobs for one generator instance.
///
/// Every field has a default, so an empty TOML document is a valid config:
///
/// ```toml
/// nesting_warning_depth = 8
/// emit_previews = false
///
/// [limits]
/// max_depth = 32
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub limits: Limits,
    /// Container nesting deeper than this produces a warning.
    pub nesting_warning_depth: usize,
    /// Emit a `#Preview` block per screen.
    pub emit_previews: bool,
    /// Spaces per indentation level.
    pub indent_width: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            nesting_warning_depth: 10,
            emit_previews: true,
            indent_width: 4,
        }
    }
}

impl GeneratorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_previews(mut self, emit: bool) -> Self {
        self.emit_previews = emit;
        self
    }

    /// Reject values the generator cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_depth == 0 || self.limits.max_nodes == 0 {
            return Err(CodegenError::InvalidConfig(
                "limits must allow at least one node".to_string(),
            ));
        }
        if !(1..=8).contains(&self.indent_width) {
            return Err(CodegenError::InvalidConfig(format!(
                "indent_width must be between 1 and 8, got {}",
                self.indent_width
            )));
        }
        Ok(())
    }
}
