//! Error types for code generation.

use appforge_core::{BindingSource, NormalizeError, ReferenceErrors};
use appforge_tokens::TokenError;
use thiserror::Error;

/// Result type alias for codegen operations.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors raised while lowering a normalized tree into the IR.
///
/// These indicate the catalog and the builder have drifted apart; none of them
/// should occur for a tree that passed normalization and reference checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Unresolved {binding_source} binding `{path}` on node `{node_id}`: {reason}")]
    UnresolvedBindingSource {
        node_id: String,
        binding_source: BindingSource,
        path: String,
        reason: String,
    },

    #[error("Unknown modifier `{name}` on node `{node_id}`")]
    UnknownModifier { node_id: String, name: String },

    #[error("Invalid arguments for modifier `{name}` on node `{node_id}`: {reason}")]
    InvalidModifierArgs {
        node_id: String,
        name: String,
        reason: String,
    },

    #[error("Token resolution failed on node `{node_id}`: {error}")]
    TokenResolutionFailure {
        node_id: String,
        #[source]
        error: TokenError,
    },

    #[error("Node `{node_id}` targets unknown screen `{target}`")]
    DanglingEdge { node_id: String, target: String },

    #[error("Invalid default for `{name}`: {reason}")]
    InvalidDefault { name: String, reason: String },

    #[error("Invalid action on node `{node_id}`: {reason}")]
    InvalidAction { node_id: String, reason: String },

    #[error("Node `{node_id}` of type `{type_tag}` cannot be attached as a presentation")]
    NotPresentable { node_id: String, type_tag: String },

    #[error("Custom action `{name}` conflicts with another member of the screen on node `{node_id}`")]
    ConflictingHandler { node_id: String, name: String },
}

/// Errors that can occur during code generation.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// The app configuration or generator configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The generator configuration file could not be parsed.
    #[error("Invalid generator configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A data model is structurally invalid.
    #[error("Invalid data model `{model}`: {reason}")]
    InvalidModel { model: String, reason: String },

    /// A screen's tree failed schema validation.
    #[error("Screen `{screen}`: {source}")]
    Normalize {
        screen: String,
        source: NormalizeError,
    },

    /// Every unresolved cross-reference in the app definition.
    #[error(transparent)]
    References(#[from] ReferenceErrors),

    /// Internal lowering failure.
    #[error("Screen `{screen}`: {source}")]
    Build { screen: String, source: BuildError },
}
