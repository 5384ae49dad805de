//! Whole-app reference checks.
//!
//! Unlike schema validation, which stops at the first bad node, these checks
//! run to completion and report every unresolved reference at once.

use crate::builder::{default_value, BindingContext, RESERVED_NAMES, RESERVED_TYPES};
use crate::naming::{self, ScreenNames};
use crate::normalize::{NormalizedNode, NormalizedTree};
use crate::signatures;
use appforge_catalog::Catalog;
use appforge_core::{
    Action, AppDefinition, BindingSource, PropValue, PropertyType, ReferenceError, ReferenceErrors, Screen,
};
use std::collections::{HashMap, HashSet};

/// Check every cross-reference in `app`. `trees` holds the normalized tree
/// of each screen, in screen order.
pub fn check_references(app: &AppDefinition, trees: &[NormalizedTree], catalog: &Catalog) -> Result<(), ReferenceErrors> {
    let mut errors = ReferenceErrors::default();

    let screen_ids = check_screens(app, &mut errors);
    if !screen_ids.contains(app.entry_screen.as_str()) {
        errors.push(ReferenceError::MissingEntryScreen(app.entry_screen.clone()));
    }
    if let Some(bar) = &app.tab_bar {
        for item in bar.items.iter().filter(|item| !screen_ids.contains(item.screen.as_str())) {
            errors.push(ReferenceError::DanglingTab {
                title: item.title.clone(),
                target: item.screen.clone(),
            });
        }
    }

    let model_names = check_models(app, &mut errors);

    for (screen, tree) in app.screens.iter().zip(trees) {
        for reference in tree.references.iter().filter(|r| !screen_ids.contains(r.target.as_str())) {
            errors.push(ReferenceError::DanglingNavigation {
                screen: screen.id.clone(),
                node_id: reference.node_id.clone(),
                target: reference.target.clone(),
            });
        }
        check_variables(screen, &model_names, &mut errors);
        check_bindings(app, screen, tree, catalog, &mut errors);
    }

    errors.into_result()
}

/// Type names the generated sources declare besides the screen views, with
/// what declares them.
fn declared_types(app: &AppDefinition) -> HashMap<String, String> {
    let mut types: HashMap<String, String> = RESERVED_TYPES
        .iter()
        .map(|name| (name.to_string(), "the generated app".to_string()))
        .collect();
    types.insert(naming::app_type_name(&app.config.name), "the generated app".to_string());
    for model in &app.models {
        if let Some(type_name) = naming::type_name(&model.name) {
            types
                .entry(type_name)
                .or_insert_with(|| format!("data model `{}`", model.name));
        }
    }
    types
}

/// Duplicate ids, generated-name collisions and deep links. Returns the set of screen ids.
fn check_screens<'a>(app: &'a AppDefinition, errors: &mut ReferenceErrors) -> HashSet<&'a str> {
    let declared = declared_types(app);
    let mut ids = HashSet::new();
    let mut view_types: HashMap<String, &str> = HashMap::new();
    let mut handles: HashMap<String, &str> = HashMap::new();
    let mut links: HashMap<&str, &str> = HashMap::new();

    for screen in &app.screens {
        if !ids.insert(screen.id.as_str()) {
            errors.push(ReferenceError::DuplicateScreen(screen.id.clone()));
            continue;
        }

        let names = ScreenNames::for_screen(screen);
        if let Some(defined_by) = declared.get(&names.view_type) {
            errors.push(ReferenceError::ReservedTypeName {
                owner: screen.id.clone(),
                type_name: names.view_type.clone(),
                defined_by: defined_by.clone(),
            });
        }
        for (map, name) in [(&mut view_types, names.view_type), (&mut handles, names.handle)] {
            match map.get(&name) {
                Some(first) => errors.push(ReferenceError::ConflictingScreenNames {
                    first: first.to_string(),
                    second: screen.id.clone(),
                    type_name: name,
                }),
                None => {
                    map.insert(name, screen.id.as_str());
                }
            }
        }

        if let Some(link) = &screen.deep_link {
            let invalid = |reason: String| ReferenceError::InvalidDeepLink {
                screen: screen.id.clone(),
                link: link.clone(),
                reason,
            };
            if !naming::is_deep_link(link) {
                errors.push(invalid("must be a slash-separated path such as `/notes/detail`".to_string()));
            } else if let Some(other) = links.insert(link.as_str(), screen.id.as_str()) {
                errors.push(invalid(format!("already used by screen `{other}`")));
            }
        }
    }
    ids
}

/// Duplicate models and unknown model references. Returns the set of model names.
fn check_models<'a>(app: &'a AppDefinition, errors: &mut ReferenceErrors) -> HashSet<&'a str> {
    let app_type = naming::app_type_name(&app.config.name);
    let mut names = HashSet::new();
    for model in &app.models {
        if !names.insert(model.name.as_str()) {
            errors.push(ReferenceError::DuplicateModel(model.name.clone()));
        }
        if naming::type_name(&model.name).as_deref() == Some(app_type.as_str()) {
            errors.push(ReferenceError::ReservedTypeName {
                owner: model.name.clone(),
                type_name: app_type.clone(),
                defined_by: "the generated app".to_string(),
            });
        }
    }
    for model in &app.models {
        for property in &model.properties {
            check_type(
                &property.ty,
                &format!("{}.{}", model.name, property.name),
                &names,
                errors,
            );
        }
    }
    names
}

fn check_type(ty: &PropertyType, owner: &str, models: &HashSet<&str>, errors: &mut ReferenceErrors) {
    if let Some(model) = ty.referenced_model().filter(|m| !models.contains(m)) {
        errors.push(ReferenceError::UnknownModel {
            owner: owner.to_string(),
            model: model.to_string(),
        });
    }
}

fn check_variables(screen: &Screen, models: &HashSet<&str>, errors: &mut ReferenceErrors) {
    let mut seen = HashSet::new();
    for decl in screen.parameters.iter().chain(&screen.state) {
        if !seen.insert(decl.name.as_str()) {
            errors.push(ReferenceError::DuplicateVariable {
                screen: screen.id.clone(),
                name: decl.name.clone(),
            });
            continue;
        }

        let reason = if !naming::is_identifier(&decl.name) {
            Some("not a valid identifier")
        } else if naming::is_keyword(&decl.name) || RESERVED_NAMES.contains(&decl.name.as_str()) {
            Some("the name is reserved")
        } else if decl.name.starts_with("isPresenting") {
            Some("the `isPresenting` prefix is reserved for sheet flags")
        } else {
            None
        };
        if let Some(reason) = reason {
            errors.push(ReferenceError::InvalidVariable {
                screen: screen.id.clone(),
                name: decl.name.clone(),
                reason: reason.to_string(),
            });
        }

        check_type(&decl.ty, &format!("{}.{}", screen.id, decl.name), models, errors);

        if let Err(reason) = default_value(&decl.ty, decl.default.as_ref()) {
            errors.push(ReferenceError::InvalidDefault {
                owner: screen.id.clone(),
                name: decl.name.clone(),
                reason,
            });
        }
    }
}

fn check_bindings(
    app: &AppDefinition,
    screen: &Screen,
    tree: &NormalizedTree,
    catalog: &Catalog,
    errors: &mut ReferenceErrors,
) {
    let mut context = BindingContext::new(screen, &app.models);
    for node in tree.nodes() {
        let Ok(meta) = catalog.lookup(&node.type_tag) else {
            continue;
        };
        for binding in &node.bindings {
            let result = meta
                .prop(&binding.property)
                .ok_or_else(|| format!("`{}` has no property `{}`", node.type_tag, binding.property))
                .and_then(|prop| context.resolve(binding, prop));
            if let Err(reason) = result {
                errors.push(ReferenceError::UnresolvedBindingSource {
                    screen: screen.id.clone(),
                    node_id: node.id.clone(),
                    binding_source: binding.source,
                    path: binding.path.clone(),
                    reason,
                });
            }
        }
    }

    // Synthesized state is only complete once every binding has resolved.
    for node in tree.nodes() {
        let paths = node
            .modifiers
            .iter()
            .filter(|m| m.name == "animation")
            .filter_map(|m| m.args.get(1)?.as_str());
        for path in paths {
            if let Err(reason) = context.lookup(path) {
                errors.push(ReferenceError::UnresolvedBindingSource {
                    screen: screen.id.clone(),
                    node_id: node.id.clone(),
                    binding_source: BindingSource::State,
                    path: path.to_string(),
                    reason,
                });
            }
        }
    }
    check_handlers(screen, tree, &context, errors);
}

/// Custom action handlers become methods of the screen view. Their names must
/// not shadow stored members and every call site must agree on the parameters.
fn check_handlers(screen: &Screen, tree: &NormalizedTree, context: &BindingContext, errors: &mut ReferenceErrors) {
    let mut seen: HashMap<String, Vec<(String, String)>> = HashMap::new();
    for node in tree.nodes() {
        for action in node_actions(node) {
            let Action::Custom { name, params } = action else {
                continue;
            };
            let Ok(signature) = signatures::handler_params(&params) else {
                continue;
            };
            let reason = if RESERVED_NAMES.contains(&name.as_str()) || name.starts_with("isPresenting") {
                Some("the name is reserved")
            } else if context.is_member(&name) {
                Some("the name is already a stored member of the screen")
            } else if seen.get(&name).is_some_and(|first| *first != signature) {
                Some("invoked elsewhere with different parameters")
            } else {
                None
            };
            match reason {
                Some(reason) => errors.push(ReferenceError::ConflictingHandler {
                    screen: screen.id.clone(),
                    node_id: node.id.clone(),
                    name,
                    reason: reason.to_string(),
                }),
                None => {
                    seen.entry(name).or_insert(signature);
                }
            }
        }
    }
}

/// Every action a node triggers, from its properties and its gesture modifiers.
fn node_actions(node: &NormalizedNode) -> Vec<Action> {
    let mut actions = Vec::new();
    for value in node.props.values() {
        match value {
            PropValue::Action(action) => actions.push(action.clone()),
            PropValue::Actions(items) => actions.extend(items.iter().filter_map(|item| item.action.clone())),
            _ => {}
        }
    }
    actions.extend(
        node.modifiers
            .iter()
            .filter(|m| matches!(m.name.as_str(), "onTapGesture" | "onAppear"))
            .filter_map(|m| m.args.first())
            .filter_map(|arg| serde_json::from_value::<Action>(arg.clone()).ok()),
    );
    actions
}
