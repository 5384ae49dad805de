//! Tree normalization: schema validation, default filling and limit checks.
//!
//! Normalization walks a raw tree in pre-order. The first violation found is
//! the one reported, with the offending node id and its path from the root.
//! Screen references are not resolved here; they are collected for the
//! orchestrator, which checks them against the whole app definition.

use crate::config::Limits;
use crate::naming;
use crate::signatures;
use appforge_catalog::{BindMode, Catalog, ComponentKind};
use appforge_core::{
    Action, BindingSource, CatalogError, ComponentNode, DataBinding, LimitKind, Modifier, NodePath,
    NormalizeError, PropValue, Props,
};
use std::collections::HashMap;

/// A validated node with default-filled properties.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedNode {
    pub id: String,
    pub type_tag: String,
    pub kind: ComponentKind,
    pub props: Props,
    pub children: Vec<NormalizedNode>,
    pub bindings: Vec<DataBinding>,
    pub modifiers: Vec<Modifier>,
    /// 1 for the root.
    pub depth: usize,
}

impl NormalizedNode {
    pub fn prop(&self, name: &str) -> Option<&PropValue> {
        self.props.get(name)
    }
}

/// How a node refers to another screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A `navigate` action.
    Navigate,
    /// A `presentSheet` action.
    PresentSheet,
    /// A navigation link target.
    Link,
    /// A tab of a tab view.
    Tab,
}

/// A deferred reference from a node to a screen id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenReference {
    pub node_id: String,
    pub target: String,
    pub kind: ReferenceKind,
}

/// A validated tree together with what the orchestrator needs to know about it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTree {
    pub root: NormalizedNode,
    pub node_count: usize,
    /// Deepest container nesting, counting the root as 1.
    pub max_depth: usize,
    pub references: Vec<ScreenReference>,
}

impl NormalizedTree {
    /// All nodes in pre-order.
    pub fn nodes(&self) -> impl Iterator<Item = &NormalizedNode> {
        let mut stack = vec![&self.root];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Validate a raw tree against the catalog.
pub fn normalize(root: &ComponentNode, catalog: &Catalog, limits: &Limits) -> Result<NormalizedTree, NormalizeError> {
    check_limits(root, limits)?;

    let mut normalizer = Normalizer {
        catalog,
        seen: HashMap::new(),
        references: Vec::new(),
        node_count: 0,
        max_depth: 0,
    };
    let root = normalizer.node(root, NodePath::root(root.id.clone()), 1)?;

    Ok(NormalizedTree {
        root,
        node_count: normalizer.node_count,
        max_depth: normalizer.max_depth,
        references: normalizer.references,
    })
}

/// Iterative pass so pathological trees fail before any recursion.
fn check_limits(root: &ComponentNode, limits: &Limits) -> Result<(), NormalizeError> {
    let mut stack = vec![(root, NodePath::root(root.id.clone()))];
    let mut count = 0usize;

    while let Some((node, path)) = stack.pop() {
        count += 1;
        if path.depth() > limits.max_depth {
            return Err(NormalizeError::LimitExceeded {
                kind: LimitKind::Depth,
                limit: limits.max_depth,
                path,
            });
        }
        if count > limits.max_nodes {
            return Err(NormalizeError::LimitExceeded {
                kind: LimitKind::NodeCount,
                limit: limits.max_nodes,
                path,
            });
        }
        for child in node.children.iter().rev() {
            stack.push((child, path.child(child.id.clone())));
        }
    }
    Ok(())
}

struct Normalizer<'a> {
    catalog: &'a Catalog,
    seen: HashMap<String, NodePath>,
    references: Vec<ScreenReference>,
    node_count: usize,
    max_depth: usize,
}

impl<'a> Normalizer<'a> {
    fn node(&mut self, node: &ComponentNode, path: NodePath, depth: usize) -> Result<NormalizedNode, NormalizeError> {
        let catalog = self.catalog;
        let schema = catalog
            .schema(&node.type_tag)
            .map_err(|err| schema_error(err, node, &path))?;
        let meta = schema.meta();

        let props = schema.validate(&node.props).map_err(|err| schema_error(err, node, &path))?;

        meta.children
            .check(node.children.len())
            .map_err(|reason| NormalizeError::InvalidChildren {
                type_tag: node.type_tag.clone(),
                reason,
                node_id: node.id.clone(),
                path: path.clone(),
            })?;

        self.check_bindings(node, meta, &path)?;
        check_actions(node, &props, &path)?;
        check_modifiers(node, meta.kind, &path)?;

        if let Some(first) = self.seen.get(&node.id) {
            return Err(NormalizeError::DuplicateId {
                node_id: node.id.clone(),
                first: first.clone(),
                path,
            });
        }
        self.seen.insert(node.id.clone(), path.clone());

        self.node_count += 1;
        if !node.children.is_empty() {
            self.max_depth = self.max_depth.max(depth);
        }
        self.collect_references(node, &props);

        let children = node
            .children
            .iter()
            .map(|child| self.node(child, path.child(child.id.clone()), depth + 1))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NormalizedNode {
            id: node.id.clone(),
            type_tag: node.type_tag.clone(),
            kind: meta.kind,
            props,
            children,
            bindings: node.bindings.clone(),
            modifiers: node.modifiers.clone(),
            depth,
        })
    }

    fn check_bindings(
        &self,
        node: &ComponentNode,
        meta: &appforge_catalog::ComponentMeta,
        path: &NodePath,
    ) -> Result<(), NormalizeError> {
        let invalid = |binding: &DataBinding, reason: String| NormalizeError::InvalidBinding {
            property: binding.property.clone(),
            reason,
            node_id: node.id.clone(),
            path: path.clone(),
        };

        for (index, binding) in node.bindings.iter().enumerate() {
            if binding.path.is_empty() {
                return Err(invalid(binding, "path is empty".to_string()));
            }
            if let Some(segment) = binding.segments().find(|s| !naming::is_identifier(s)) {
                return Err(invalid(binding, format!("`{segment}` is not a valid path segment")));
            }
            let schema = meta.prop(&binding.property).ok_or_else(|| {
                invalid(
                    binding,
                    format!("`{}` has no property `{}`", node.type_tag, binding.property),
                )
            })?;
            match (schema.bind, binding.source) {
                (BindMode::None, _) => {
                    return Err(invalid(binding, "property is not bindable".to_string()));
                }
                (BindMode::TwoWay, BindingSource::Environment) => {
                    return Err(invalid(
                        binding,
                        "environment values are read-only and cannot back a two-way property".to_string(),
                    ));
                }
                _ => {}
            }
            if node.bindings[..index].iter().any(|b| b.property == binding.property) {
                return Err(invalid(binding, "property is bound more than once".to_string()));
            }
        }
        Ok(())
    }

    fn collect_references(&mut self, node: &ComponentNode, props: &Props) {
        let mut found: Vec<(&str, ReferenceKind)> = Vec::new();

        for value in props.values() {
            match value {
                PropValue::Action(action) => found.extend(action_reference(action)),
                PropValue::Actions(items) => {
                    found.extend(items.iter().filter_map(|item| item.action.as_ref()).filter_map(action_reference));
                }
                PropValue::Screen(target) => found.push((target.as_str(), ReferenceKind::Link)),
                PropValue::Tabs(tabs) => found.extend(tabs.iter().map(|tab| (tab.screen.as_str(), ReferenceKind::Tab))),
                _ => {}
            }
        }

        let modifier_actions: Vec<Action> = node
            .modifiers
            .iter()
            .filter(|m| matches!(m.name.as_str(), "onTapGesture" | "onAppear"))
            .filter_map(|m| m.args.first())
            .filter_map(|arg| serde_json::from_value::<Action>(arg.clone()).ok())
            .collect();
        found.extend(modifier_actions.iter().filter_map(action_reference));

        self.references.extend(found.into_iter().map(|(target, kind)| ScreenReference {
            node_id: node.id.clone(),
            target: target.to_string(),
            kind,
        }));
    }
}

fn check_actions(node: &ComponentNode, props: &Props, path: &NodePath) -> Result<(), NormalizeError> {
    for (field, value) in props {
        let actions: Vec<&Action> = match value {
            PropValue::Action(action) => vec![action],
            PropValue::Actions(items) => items.iter().filter_map(|item| item.action.as_ref()).collect(),
            _ => continue,
        };
        for action in actions {
            signatures::check_action(action).map_err(|reason| NormalizeError::InvalidProps {
                type_tag: node.type_tag.clone(),
                field: field.clone(),
                reason,
                node_id: node.id.clone(),
                path: path.clone(),
            })?;
        }
    }
    Ok(())
}

fn check_modifiers(node: &ComponentNode, kind: ComponentKind, path: &NodePath) -> Result<(), NormalizeError> {
    let invalid = |modifier: &Modifier, reason: String| NormalizeError::InvalidModifier {
        name: modifier.name.clone(),
        reason,
        node_id: node.id.clone(),
        path: path.clone(),
    };
    for modifier in &node.modifiers {
        if !kind.accepts_modifiers() {
            return Err(invalid(modifier, format!("`{}` nodes take no modifiers", node.type_tag)));
        }
        signatures::check_modifier(modifier).map_err(|reason| invalid(modifier, reason))?;
    }
    Ok(())
}

fn action_reference(action: &Action) -> Option<(&str, ReferenceKind)> {
    match action {
        Action::Navigate { target } => Some((target.as_str(), ReferenceKind::Navigate)),
        Action::PresentSheet { target } => Some((target.as_str(), ReferenceKind::PresentSheet)),
        Action::Dismiss | Action::Custom { .. } => None,
    }
}

fn schema_error(err: CatalogError, node: &ComponentNode, path: &NodePath) -> NormalizeError {
    match err {
        CatalogError::UnknownType(type_tag) => NormalizeError::UnknownType {
            type_tag,
            node_id: node.id.clone(),
            path: path.clone(),
        },
        CatalogError::InvalidProps { type_tag, field, reason } => NormalizeError::InvalidProps {
            type_tag,
            field,
            reason,
            node_id: node.id.clone(),
            path: path.clone(),
        },
        CatalogError::DuplicateType(type_tag) => NormalizeError::InvalidProps {
            type_tag,
            field: String::new(),
            reason: "schema registered twice".to_string(),
            node_id: node.id.clone(),
            path: path.clone(),
        },
    }
}
