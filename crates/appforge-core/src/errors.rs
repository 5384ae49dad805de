//! Schema and reference error types.
//!
//! Schema errors are structural and recoverable by fixing the input tree; each one
//! carries the offending node id and its path from the root so a caller can retry
//! with corrective context. Reference errors are collected across the whole app
//! definition and reported together.

use crate::types::NodePath;
use thiserror::Error;

/// Errors raised by the component catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("Component type `{0}` is already registered")]
    DuplicateType(String),

    #[error("Unknown component type `{0}`")]
    UnknownType(String),

    #[error("Invalid property `{field}` on `{type_tag}`: {reason}")]
    InvalidProps {
        type_tag: String,
        field: String,
        reason: String,
    },
}

/// Which resource ceiling a tree exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Depth,
    NodeCount,
}

impl std::fmt::Display for LimitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Depth => write!(f, "tree depth"),
            Self::NodeCount => write!(f, "node count"),
        }
    }
}

/// Errors during tree normalization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("Unknown component type `{type_tag}` on node `{node_id}` at {path}")]
    UnknownType {
        type_tag: String,
        node_id: String,
        path: NodePath,
    },

    #[error("Invalid property `{field}` on `{type_tag}` node `{node_id}` at {path}: {reason}")]
    InvalidProps {
        type_tag: String,
        field: String,
        reason: String,
        node_id: String,
        path: NodePath,
    },

    #[error("Invalid children on `{type_tag}` node `{node_id}` at {path}: {reason}")]
    InvalidChildren {
        type_tag: String,
        reason: String,
        node_id: String,
        path: NodePath,
    },

    #[error("Invalid binding for `{property}` on node `{node_id}` at {path}: {reason}")]
    InvalidBinding {
        property: String,
        reason: String,
        node_id: String,
        path: NodePath,
    },

    #[error("Invalid modifier `{name}` on node `{node_id}` at {path}: {reason}")]
    InvalidModifier {
        name: String,
        reason: String,
        node_id: String,
        path: NodePath,
    },

    #[error("Duplicate node id `{node_id}` at {path} (first seen at {first})")]
    DuplicateId {
        node_id: String,
        first: NodePath,
        path: NodePath,
    },

    #[error("Maximum {kind} ({limit}) exceeded at {path}")]
    LimitExceeded {
        kind: LimitKind,
        limit: usize,
        path: NodePath,
    },
}

impl NormalizeError {
    /// Id of the node the error was reported on.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Self::UnknownType { node_id, .. }
            | Self::InvalidProps { node_id, .. }
            | Self::InvalidChildren { node_id, .. }
            | Self::InvalidBinding { node_id, .. }
            | Self::InvalidModifier { node_id, .. }
            | Self::DuplicateId { node_id, .. } => Some(node_id.as_str()),
            Self::LimitExceeded { path, .. } => path.leaf(),
        }
    }
}

/// A reference that does not resolve against the whole app definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("Entry screen `{0}` does not exist")]
    MissingEntryScreen(String),

    #[error("Tab bar item `{title}` targets unknown screen `{target}`")]
    DanglingTab { title: String, target: String },

    #[error("Node `{node_id}` in screen `{screen}` targets unknown screen `{target}`")]
    DanglingNavigation {
        screen: String,
        node_id: String,
        target: String,
    },

    #[error("Duplicate screen id `{0}`")]
    DuplicateScreen(String),

    #[error("Screens `{first}` and `{second}` both generate the type name `{type_name}`")]
    ConflictingScreenNames {
        first: String,
        second: String,
        type_name: String,
    },

    #[error("`{owner}` generates the type name `{type_name}`, which is already defined by {defined_by}")]
    ReservedTypeName {
        owner: String,
        type_name: String,
        defined_by: String,
    },

    #[error("Duplicate data model `{0}`")]
    DuplicateModel(String),

    #[error("`{owner}` refers to unknown data model `{model}`")]
    UnknownModel { owner: String, model: String },

    #[error("Deep link `{link}` of screen `{screen}` is invalid: {reason}")]
    InvalidDeepLink {
        screen: String,
        link: String,
        reason: String,
    },

    #[error("Default value of `{name}` in `{owner}` is invalid: {reason}")]
    InvalidDefault {
        owner: String,
        name: String,
        reason: String,
    },

    #[error("Screen `{screen}` declares `{name}` more than once")]
    DuplicateVariable { screen: String, name: String },

    #[error("Variable `{name}` in screen `{screen}` is unusable: {reason}")]
    InvalidVariable {
        screen: String,
        name: String,
        reason: String,
    },

    #[error("Custom action `{name}` on node `{node_id}` in screen `{screen}` is unusable: {reason}")]
    ConflictingHandler {
        screen: String,
        node_id: String,
        name: String,
        reason: String,
    },

    #[error("Unresolved {binding_source} binding `{path}` on node `{node_id}` in screen `{screen}`: {reason}")]
    UnresolvedBindingSource {
        screen: String,
        node_id: String,
        binding_source: crate::ast::BindingSource,
        path: String,
        reason: String,
    },
}

/// Every reference error found in one app definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceErrors(pub Vec<ReferenceError>);

impl ReferenceErrors {
    pub fn push(&mut self, error: ReferenceError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceError> {
        self.0.iter()
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ReferenceErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} unresolved reference(s):", self.0.len())?;
        for error in &self.0 {
            writeln!(f, "  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ReferenceErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_errors_display_lists_all() {
        let mut errors = ReferenceErrors::default();
        errors.push(ReferenceError::MissingEntryScreen("home".into()));
        errors.push(ReferenceError::DanglingTab {
            title: "Settings".into(),
            target: "settings".into(),
        });

        let text = errors.to_string();
        assert!(text.contains("2 unresolved reference(s)"));
        assert!(text.contains("`home`"));
        assert!(text.contains("`settings`"));
    }

    #[test]
    fn test_normalize_error_reports_node() {
        let error = NormalizeError::UnknownType {
            type_tag: "Carousel".into(),
            node_id: "hero".into(),
            path: NodePath::root("root").child("hero"),
        };
        assert_eq!(error.node_id(), Some("hero"));
        assert!(error.to_string().contains("root/hero"));
    }
}
