//! Lowering of normalized trees into the SwiftUI IR.
//!
//! One [`ScreenBuilder`] exists per screen. It resolves every binding of the
//! tree up front, then walks the tree once. Token references resolve to
//! literal values, actions become statements, and presentation nodes are
//! hoisted onto their parent as modifiers. Screens share nothing mutable, so
//! they can be built in parallel.

mod bindings;
mod components;
mod modifiers;

pub use bindings::{default_value, expected_type, zero_value, BindingContext, Bound, RESERVED_NAMES};

use crate::error::BuildError;
use crate::ir::{
    swift_type, Arg, BuiltScreen, Closure, ContainerKind, Decl, EdgeKind, EntryIr, Helper, LeafKind, ModelDecl,
    ModifierExpr, NavEdge, PropertyDecl, RouteDecl, Stmt, StoreDecl, UiExpr, ValueExpr,
};
use crate::naming::{self, ScreenIndex, ScreenNames};
use crate::signatures;
use crate::normalize::{NormalizedNode, NormalizedTree};
use appforge_catalog::Catalog;
use appforge_core::{Action, AppDefinition, DataModel, Screen, TokenKind, TokenRef};
use appforge_tokens::{spacing::FULL_RADIUS, DesignTokens, MotionToken, ResolvedToken, ShadowToken};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Type names the generated entry file defines.
pub const RESERVED_TYPES: &[&str] = &["Route", "Router", "RootView"];

/// Shared, read-only inputs of screen building.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub catalog: &'a Catalog,
    pub tokens: &'a DesignTokens,
    pub screens: &'a ScreenIndex,
    pub models: &'a [DataModel],
}

/// Lower one normalized screen tree into a [`BuiltScreen`].
pub fn build(screen: &Screen, tree: &NormalizedTree, cx: &BuildContext<'_>) -> Result<BuiltScreen, BuildError> {
    let mut builder = ScreenBuilder::new(screen, cx);
    builder.bind_all(tree)?;
    let body = builder.root(&tree.root)?;
    builder.finish(body)
}

pub(crate) struct ScreenBuilder<'a> {
    screen: &'a Screen,
    cx: &'a BuildContext<'a>,
    bindings: BindingContext<'a>,
    /// Resolved bindings keyed by node id and property.
    resolved: HashMap<(String, String), Bound>,
    edges: Vec<NavEdge>,
    /// Presentation flag to presented view type, in first-use order.
    sheets: IndexMap<String, String>,
    handlers: IndexMap<String, Vec<(String, String)>>,
    uses_router: bool,
    uses_dismiss: bool,
}

impl<'a> ScreenBuilder<'a> {
    fn new(screen: &'a Screen, cx: &'a BuildContext<'a>) -> Self {
        Self {
            screen,
            cx,
            bindings: BindingContext::new(screen, cx.models),
            resolved: HashMap::new(),
            edges: Vec::new(),
            sheets: IndexMap::new(),
            handlers: IndexMap::new(),
            uses_router: false,
            uses_dismiss: false,
        }
    }

    /// Resolve every binding before lowering, so synthesized state is known
    /// regardless of where in the tree it is first used.
    fn bind_all(&mut self, tree: &NormalizedTree) -> Result<(), BuildError> {
        for node in tree.nodes() {
            for binding in &node.bindings {
                let unresolved = |reason: String| BuildError::UnresolvedBindingSource {
                    node_id: node.id.clone(),
                    binding_source: binding.source,
                    path: binding.path.clone(),
                    reason,
                };
                let meta = self
                    .cx
                    .catalog
                    .lookup(&node.type_tag)
                    .map_err(|e| unresolved(e.to_string()))?;
                let prop = meta
                    .prop(&binding.property)
                    .ok_or_else(|| unresolved(format!("`{}` has no property `{}`", node.type_tag, binding.property)))?;
                let bound = self.bindings.resolve(binding, prop).map_err(unresolved)?;
                self.resolved
                    .insert((node.id.clone(), binding.property.clone()), bound);
            }
        }
        Ok(())
    }

    fn finish(self, body: UiExpr) -> Result<BuiltScreen, BuildError> {
        let names = ScreenNames::for_screen(self.screen);

        let mut chain = Vec::new();
        if !self.screen.name.trim().is_empty() {
            chain.push(ModifierExpr::new(
                "navigationTitle",
                vec![Arg::new(ValueExpr::str(&self.screen.name))],
            ));
        }
        for (flag, view_type) in &self.sheets {
            chain.push(
                ModifierExpr::new("sheet", vec![Arg::labeled("isPresented", ValueExpr::Binding(flag.clone()))])
                    .with_closure(Closure::new(vec![UiExpr::leaf(LeafKind::Custom(view_type.clone()), vec![])])),
            );
        }
        let body = body.modified(chain);

        let mut decls = self
            .bindings
            .decls()
            .map_err(|(name, reason)| BuildError::InvalidDefault { name, reason })?;
        if self.uses_router {
            decls.push(Decl::Router);
        }
        if self.uses_dismiss {
            decls.push(Decl::Environment {
                key: "dismiss".to_string(),
                name: "dismiss".to_string(),
            });
        }
        for flag in self.sheets.keys() {
            if !self.bindings.is_member(flag) {
                decls.push(Decl::State {
                    name: flag.clone(),
                    ty: "Bool".to_string(),
                    initial: ValueExpr::Bool(false),
                });
            }
        }

        let helpers = self
            .handlers
            .into_iter()
            .map(|(name, params)| Helper::Handler { name, params })
            .collect();

        Ok(BuiltScreen {
            screen_id: self.screen.id.clone(),
            view_type: names.view_type,
            decls,
            body,
            helpers,
            edges: self.edges,
            uses_router: self.uses_router,
        })
    }

    fn bound(&self, node: &NormalizedNode, property: &str) -> Option<&Bound> {
        self.resolved.get(&(node.id.clone(), property.to_string()))
    }

    fn target(&self, node_id: &str, target: &str) -> Result<&'a ScreenNames, BuildError> {
        self.cx.screens.get(target).ok_or_else(|| BuildError::DanglingEdge {
            node_id: node_id.to_string(),
            target: target.to_string(),
        })
    }

    fn edge(&mut self, node_id: &str, target: &str, kind: EdgeKind) {
        self.edges.push(NavEdge {
            from: self.screen.id.clone(),
            to: target.to_string(),
            node_id: node_id.to_string(),
            kind,
        });
    }

    fn token(&self, node_id: &str, token: &TokenRef) -> Result<ResolvedToken, BuildError> {
        self.cx
            .tokens
            .resolve(token.kind, &token.slot)
            .map_err(|error| BuildError::TokenResolutionFailure {
                node_id: node_id.to_string(),
                error,
            })
    }

    fn color(&self, node_id: &str, token: &TokenRef) -> Result<ValueExpr, BuildError> {
        match self.token(node_id, token)? {
            ResolvedToken::Color(color) => Ok(ValueExpr::Color(color.to_rgba())),
            other => Err(self.wrong_kind(node_id, token, &other)),
        }
    }

    /// Spacing, radius, border width and letter spacing tokens.
    fn dimension(&self, node_id: &str, token: &TokenRef) -> Result<f64, BuildError> {
        match self.token(node_id, token)? {
            ResolvedToken::Dimension(points) => Ok(points),
            other => Err(self.wrong_kind(node_id, token, &other)),
        }
    }

    fn font(&self, node_id: &str, token: &TokenRef) -> Result<ValueExpr, BuildError> {
        match self.token(node_id, token)? {
            ResolvedToken::Font(style) => Ok(ValueExpr::Font {
                size: style.size,
                weight: style.weight.to_swift().to_string(),
                design: style.family.to_swift().to_string(),
            }),
            other => Err(self.wrong_kind(node_id, token, &other)),
        }
    }

    fn shadow(&self, node_id: &str, token: &TokenRef) -> Result<ModifierExpr, BuildError> {
        match self.token(node_id, token)? {
            ResolvedToken::Shadow(shadow) => Ok(shadow_modifier(&shadow)),
            other => Err(self.wrong_kind(node_id, token, &other)),
        }
    }

    fn motion(&self, node_id: &str, token: &TokenRef) -> Result<ValueExpr, BuildError> {
        match self.token(node_id, token)? {
            ResolvedToken::Motion(motion) => Ok(animation(&motion)),
            other => Err(self.wrong_kind(node_id, token, &other)),
        }
    }

    fn wrong_kind(&self, node_id: &str, token: &TokenRef, found: &ResolvedToken) -> BuildError {
        BuildError::InvalidModifierArgs {
            node_id: node_id.to_string(),
            name: token.slot.clone(),
            reason: format!("{} token resolved to {found:?}", token.kind),
        }
    }

    /// Lower an action into statements, recording edges and handlers.
    fn action(&mut self, node_id: &str, action: &Action) -> Result<Vec<Stmt>, BuildError> {
        match action {
            Action::Navigate { target } => {
                let names = self.target(node_id, target)?;
                self.edge(node_id, target, EdgeKind::Push);
                self.uses_router = true;
                Ok(vec![Stmt::Navigate {
                    route: names.route_case(),
                }])
            }
            Action::PresentSheet { target } => {
                let names = self.target(node_id, target)?;
                let flag = names.presentation_flag();
                self.sheets
                    .entry(flag.clone())
                    .or_insert_with(|| names.view_type.clone());
                self.edge(node_id, target, EdgeKind::Sheet);
                Ok(vec![Stmt::Present { flag }])
            }
            Action::Dismiss => {
                self.uses_dismiss = true;
                Ok(vec![Stmt::Dismiss])
            }
            Action::Custom { name, params } => self.custom_action(node_id, name, params),
        }
    }

    fn custom_action(
        &mut self,
        node_id: &str,
        name: &str,
        params: &IndexMap<String, serde_json::Value>,
    ) -> Result<Vec<Stmt>, BuildError> {
        let invalid = |reason: String| BuildError::InvalidAction {
            node_id: node_id.to_string(),
            reason,
        };
        if !naming::is_identifier(name) || naming::is_keyword(name) {
            return Err(invalid(format!("`{name}` is not a valid handler name")));
        }
        if RESERVED_NAMES.contains(&name) || self.bindings.is_member(name) || self.sheets.contains_key(name) {
            return Err(BuildError::ConflictingHandler {
                node_id: node_id.to_string(),
                name: name.to_string(),
            });
        }

        let signature = signatures::handler_params(params).map_err(invalid)?;
        let args = params
            .iter()
            .filter_map(|(key, value)| {
                let expr = match value {
                    serde_json::Value::String(s) => ValueExpr::str(s),
                    serde_json::Value::Bool(b) => ValueExpr::Bool(*b),
                    serde_json::Value::Number(n) => match n.as_i64() {
                        Some(i) => ValueExpr::Int(i),
                        None => ValueExpr::Number(n.as_f64().unwrap_or_default()),
                    },
                    _ => return None,
                };
                Some(Arg::labeled(key, expr))
            })
            .collect();

        match self.handlers.get(name) {
            Some(existing) if *existing != signature => {
                return Err(BuildError::ConflictingHandler {
                    node_id: node_id.to_string(),
                    name: name.to_string(),
                })
            }
            Some(_) => {}
            None => {
                self.handlers.insert(name.to_string(), signature);
            }
        }

        Ok(vec![Stmt::Invoke {
            name: name.to_string(),
            args,
        }])
    }
}

/// A shape for a corner radius; the full radius renders as a capsule.
fn shape(radius: f64) -> ValueExpr {
    if radius >= FULL_RADIUS {
        ValueExpr::call("Capsule", vec![])
    } else {
        ValueExpr::call(
            "RoundedRectangle",
            vec![Arg::labeled("cornerRadius", ValueExpr::Number(radius))],
        )
    }
}

fn shadow_modifier(shadow: &ShadowToken) -> ModifierExpr {
    ModifierExpr::new(
        "shadow",
        vec![
            Arg::labeled("color", ValueExpr::Color(shadow.color.to_rgba())),
            Arg::labeled("radius", ValueExpr::Number(shadow.blur / 2.0)),
            Arg::labeled("x", ValueExpr::Number(shadow.x)),
            Arg::labeled("y", ValueExpr::Number(shadow.y)),
        ],
    )
}

fn animation(motion: &MotionToken) -> ValueExpr {
    match motion {
        MotionToken::Spring(spring) => ValueExpr::call(
            ".spring",
            vec![
                Arg::labeled("response", ValueExpr::Number(spring.response)),
                Arg::labeled("dampingFraction", ValueExpr::Number(spring.damping_fraction)),
            ],
        ),
        MotionToken::Timing { curve, duration } => ValueExpr::call(
            ".timingCurve",
            vec![
                Arg::new(ValueExpr::Number(curve.x1)),
                Arg::new(ValueExpr::Number(curve.y1)),
                Arg::new(ValueExpr::Number(curve.x2)),
                Arg::new(ValueExpr::Number(curve.y2)),
                Arg::labeled("duration", ValueExpr::Number(*duration)),
            ],
        ),
    }
}

/// `NavigationStack(path: $router.path) { View().navigationDestination(...) }`.
fn routed_stack(view_type: &str) -> UiExpr {
    let destination = ModifierExpr::new(
        "navigationDestination",
        vec![Arg::labeled("for", ValueExpr::ident("Route.self"))],
    )
    .with_closure(
        Closure::new(vec![UiExpr::leaf(
            LeafKind::Custom("routeView".to_string()),
            vec![Arg::labeled("for", ValueExpr::ident("route"))],
        )])
        .with_param("route"),
    );
    let content = UiExpr::leaf(LeafKind::Custom(view_type.to_string()), vec![]).modified(vec![destination]);
    UiExpr::container(
        ContainerKind::NavigationStack,
        vec![Arg::labeled("path", ValueExpr::Binding("router.path".to_string()))],
        vec![content],
    )
}

/// Build the IR of the app entry file.
pub fn build_entry(
    app: &AppDefinition,
    tokens: &DesignTokens,
    screens: &ScreenIndex,
    value_models: Vec<ModelDecl>,
) -> Result<EntryIr, BuildError> {
    let lookup = |node_id: &str, target: &str| {
        screens.get(target).ok_or_else(|| BuildError::DanglingEdge {
            node_id: node_id.to_string(),
            target: target.to_string(),
        })
    };

    let routes = app
        .screens
        .iter()
        .filter_map(|screen| {
            let names = screens.get(&screen.id)?;
            Some(RouteDecl {
                case: names.route_case(),
                view_type: names.view_type.clone(),
                deep_link: screen.deep_link.clone(),
            })
        })
        .collect::<Vec<_>>();
    let entry = lookup("entryScreen", &app.entry_screen)?;

    let tab_items = app.tab_bar.as_ref().map(|bar| bar.items.as_slice()).unwrap_or_default();
    let (root, tabs) = if tab_items.is_empty() {
        (routed_stack(&entry.view_type), Vec::new())
    } else {
        let mut children = Vec::with_capacity(tab_items.len());
        let mut tabs = Vec::with_capacity(tab_items.len());
        for item in tab_items {
            let names = lookup("tabBar", &item.screen)?;
            let case = names.route_case();
            children.push(routed_stack(&names.view_type).modified(vec![
                ModifierExpr::new("tabItem", vec![]).with_closure(Closure::new(vec![UiExpr::leaf(
                    LeafKind::Label,
                    vec![
                        Arg::new(ValueExpr::str(&item.title)),
                        Arg::labeled("systemImage", ValueExpr::str(&item.icon)),
                    ],
                )])),
                ModifierExpr::new("tag", vec![Arg::new(ValueExpr::ident(&format!("Route.{case}")))]),
            ]));
            tabs.push(case);
        }
        let root = UiExpr::container(
            ContainerKind::TabView,
            vec![Arg::labeled(
                "selection",
                ValueExpr::Binding("router.selectedTab".to_string()),
            )],
            children,
        );
        (root, tabs)
    };

    let accent = tokens
        .resolve(TokenKind::Color, "accent")
        .map_err(|error| BuildError::TokenResolutionFailure {
            node_id: "app".to_string(),
            error,
        })?;
    let mut scene_modifiers = vec![ModifierExpr::new(
        "environmentObject",
        vec![Arg::new(ValueExpr::ident("router"))],
    )];
    if let ResolvedToken::Color(color) = accent {
        scene_modifiers.push(ModifierExpr::new(
            "tint",
            vec![Arg::new(ValueExpr::Color(color.to_rgba()))],
        ));
    }
    let appearance = &app.config.appearance;
    if !appearance.supports_dark_mode {
        let scheme = if appearance.dark_theme { "dark" } else { "light" };
        scene_modifiers.push(ModifierExpr::new(
            "preferredColorScheme",
            vec![Arg::new(ValueExpr::member(scheme))],
        ));
    }
    if routes.iter().any(|r| r.deep_link.is_some()) {
        scene_modifiers.push(ModifierExpr::new(
            "onOpenURL",
            vec![Arg::labeled("perform", ValueExpr::ident("router.open"))],
        ));
    }

    let persisted: Vec<String> = app
        .models
        .iter()
        .filter(|m| m.persisted)
        .map(|m| swift_type(&appforge_core::PropertyType::Model(m.name.clone())))
        .collect();
    let store = match (persisted.is_empty(), app.config.uses_cloud_sync) {
        (true, _) => StoreDecl::None,
        (false, false) => StoreDecl::Local(persisted),
        (false, true) => StoreDecl::CloudSynced(persisted),
    };

    Ok(EntryIr {
        app_type: naming::app_type_name(&app.config.name),
        routes,
        root,
        root_case: entry.route_case(),
        tabs,
        scene_modifiers,
        store,
        value_models,
    })
}

/// Build a model type, returning the reason on failure.
pub fn build_model(model: &DataModel, models: &[DataModel]) -> Result<ModelDecl, String> {
    let type_name = naming::type_name(&model.name).ok_or("the name has no usable characters")?;
    if RESERVED_TYPES.contains(&type_name.as_str()) {
        return Err(format!("`{type_name}` is defined by the generated app"));
    }

    let mut seen = HashSet::new();
    let mut properties = Vec::with_capacity(model.properties.len());
    for property in &model.properties {
        let name = &property.name;
        if !naming::is_identifier(name) || naming::is_keyword(name) {
            return Err(format!("property `{name}` is not a valid identifier"));
        }
        if !seen.insert(name.as_str()) {
            return Err(format!("property `{name}` is declared more than once"));
        }
        if !model.persisted {
            let held = property
                .ty
                .referenced_model()
                .and_then(|held| models.iter().find(|m| m.name == held));
            if let Some(held) = held.filter(|m| m.persisted) {
                return Err(format!(
                    "property `{name}` holds persisted model `{}` but `{}` is not persisted",
                    held.name, model.name
                ));
            }
        }
        let default = default_value(&property.ty, property.default.as_ref())
            .map_err(|reason| format!("property `{name}`: {reason}"))?;
        properties.push(PropertyDecl {
            name: name.clone(),
            ty: swift_type(&property.ty),
            default,
            transient: model.persisted && !property.persisted,
        });
    }

    Ok(ModelDecl {
        type_name,
        persisted: model.persisted,
        properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;
    use crate::normalize::normalize;
    use crate::printer;
    use appforge_core::{
        AppConfig, BindingSource, ComponentNode, DataBinding, ModelProperty, PropertyType, TabBar, TabItem,
        VariableDecl,
    };
    use appforge_tokens::TokenInputs;
    use serde_json::json;

    fn tokens() -> DesignTokens {
        DesignTokens::generate("Test", "1.0.0", &TokenInputs::from_appearance(&Default::default()))
    }

    fn app(screens: Vec<Screen>) -> AppDefinition {
        let entry = screens[0].id.clone();
        AppDefinition {
            config: AppConfig::new("Notes", "com.example.notes"),
            screens,
            models: vec![],
            entry_screen: entry,
            tab_bar: None,
        }
    }

    fn build_app(app: &AppDefinition) -> Result<Vec<BuiltScreen>, BuildError> {
        let catalog = Catalog::standard();
        let tokens = tokens();
        let index = naming::screen_index(&app.screens);
        let cx = BuildContext {
            catalog,
            tokens: &tokens,
            screens: &index,
            models: &app.models,
        };
        app.screens
            .iter()
            .map(|screen| {
                let tree = normalize(&screen.root, catalog, &Limits::default()).unwrap();
                build(screen, &tree, &cx)
            })
            .collect()
    }

    fn body(built: &BuiltScreen) -> String {
        printer::print(&built.body)
    }

    #[test]
    fn test_navigate_action_uses_router() {
        let root = ComponentNode::new("root", "VStack").with_child(
            ComponentNode::new("open", "Button")
                .with_prop("title", json!("Open"))
                .with_prop("action", json!({"type": "navigate", "target": "detail"})),
        );
        let app = app(vec![
            Screen::new("home", "Home", root),
            Screen::new("detail", "Detail", ComponentNode::new("d", "Text")),
        ]);
        let built = build_app(&app).unwrap();
        let home = &built[0];
        assert!(home.uses_router);
        assert!(home.decls.contains(&Decl::Router));
        assert!(body(home).contains(r#"Button("Open", action: { router.navigate(to: .detail) })"#));
        assert_eq!(home.edges.len(), 1);
        assert_eq!(home.edges[0].kind, EdgeKind::Push);
        assert!(!built[1].uses_router);
    }

    #[test]
    fn test_present_sheet_synthesizes_flag() {
        let root = ComponentNode::new("root", "VStack").with_child(
            ComponentNode::new("add", "Button")
                .with_prop("title", json!("Add"))
                .with_prop("action", json!({"type": "presentSheet", "target": "compose"})),
        );
        let app = app(vec![
            Screen::new("home", "Home", root),
            Screen::new("compose", "Compose", ComponentNode::new("c", "Text")),
        ]);
        let home = &build_app(&app).unwrap()[0];
        let out = body(home);
        assert!(out.contains("isPresentingCompose = true"));
        assert!(out.contains(".sheet(isPresented: $isPresentingCompose) {\n        ComposeView()\n    }"));
        assert!(home.decls.contains(&Decl::State {
            name: "isPresentingCompose".into(),
            ty: "Bool".into(),
            initial: ValueExpr::Bool(false),
        }));
    }

    #[test]
    fn test_navigation_title_last_before_sheets() {
        let app = app(vec![Screen::new("home", "Home", ComponentNode::new("t", "Text"))]);
        let home = &build_app(&app).unwrap()[0];
        insta::assert_snapshot!(body(home), @r###"
        Text("")
            .font(.system(size: 16, weight: .regular, design: .default))
            .navigationTitle("Home")
        "###);
    }

    #[test]
    fn test_bound_text_interpolates_state() {
        let mut screen = Screen::new(
            "home",
            "Home",
            ComponentNode::new("t", "Text")
                .with_prop("content", json!("fallback"))
                .with_binding(DataBinding::new("content", BindingSource::State, "greeting")),
        );
        screen.state.push(VariableDecl {
            name: "greeting".into(),
            ty: PropertyType::String,
            default: Some(json!("Hello")),
        });
        let home = &build_app(&app(vec![screen])).unwrap()[0];
        let out = body(home);
        assert!(out.contains(r#"Text("\(greeting)")"#));
        assert!(!out.contains("fallback"));
        assert_eq!(
            home.decls[0],
            Decl::State {
                name: "greeting".into(),
                ty: "String".into(),
                initial: ValueExpr::str("Hello"),
            }
        );
    }

    #[test]
    fn test_custom_actions_become_handlers() {
        let root = ComponentNode::new("root", "VStack")
            .with_child(
                ComponentNode::new("a", "Button")
                    .with_prop("action", json!({"type": "custom", "name": "share", "params": {"id": 3}})),
            )
            .with_child(
                ComponentNode::new("b", "Button")
                    .with_prop("action", json!({"type": "custom", "name": "share", "params": {"id": 4}})),
            );
        let home = &build_app(&app(vec![Screen::new("home", "Home", root)])).unwrap()[0];
        assert_eq!(
            home.helpers,
            vec![Helper::Handler {
                name: "share".into(),
                params: vec![("id".into(), "Int".into())]
            }]
        );

        let conflicting = ComponentNode::new("root", "VStack")
            .with_child(
                ComponentNode::new("a", "Button")
                    .with_prop("action", json!({"type": "custom", "name": "share", "params": {"id": 3}})),
            )
            .with_child(
                ComponentNode::new("b", "Button")
                    .with_prop("action", json!({"type": "custom", "name": "share", "params": {"id": "x"}})),
            );
        let err = build_app(&app(vec![Screen::new("home", "Home", conflicting)])).unwrap_err();
        assert!(matches!(err, BuildError::ConflictingHandler { ref node_id, .. } if node_id == "b"));
    }

    #[test]
    fn test_root_presentation_gets_carrier() {
        let root = ComponentNode::new("alert", "Alert")
            .with_prop("title", json!("Oops"))
            .with_binding(DataBinding::new("isPresented", BindingSource::State, "showAlert"));
        let home = &build_app(&app(vec![Screen::new("home", "", root)])).unwrap()[0];
        insta::assert_snapshot!(body(home), @r###"
        EmptyView()
            .alert("Oops", isPresented: $showAlert) {
            }
        "###);
    }

    #[test]
    fn test_entry_with_tabs() {
        let mut app = app(vec![
            Screen::new("home", "Home", ComponentNode::new("a", "Text")),
            Screen::new("settings", "Settings", ComponentNode::new("b", "Text")),
        ]);
        app.tab_bar = Some(TabBar {
            items: vec![
                TabItem {
                    screen: "home".into(),
                    title: "Home".into(),
                    icon: "house".into(),
                },
                TabItem {
                    screen: "settings".into(),
                    title: "Settings".into(),
                    icon: "gear".into(),
                },
            ],
        });
        let index = naming::screen_index(&app.screens);
        let entry = build_entry(&app, &tokens(), &index, vec![]).unwrap();
        assert_eq!(entry.tabs, vec!["home", "settings"]);
        let out = printer::print(&entry.root);
        assert!(out.starts_with("TabView(selection: $router.selectedTab) {"));
        assert!(out.contains(".tag(Route.settings)"));
        assert!(out.contains(r#"Label("Settings", systemImage: "gear")"#));
        assert_eq!(entry.store, StoreDecl::None);
    }

    #[test]
    fn test_entry_dangling_tab() {
        let mut app = app(vec![Screen::new("home", "Home", ComponentNode::new("a", "Text"))]);
        app.tab_bar = Some(TabBar {
            items: vec![TabItem {
                screen: "ghost".into(),
                title: "Ghost".into(),
                icon: "eye".into(),
            }],
        });
        let index = naming::screen_index(&app.screens);
        assert!(matches!(
            build_entry(&app, &tokens(), &index, vec![]),
            Err(BuildError::DanglingEdge { .. })
        ));
    }

    #[test]
    fn test_entry_scene_modifiers() {
        let mut app = app(vec![Screen::new("home", "Home", ComponentNode::new("a", "Text"))]);
        app.screens[0].deep_link = Some("/home".into());
        app.config.appearance.supports_dark_mode = false;
        let index = naming::screen_index(&app.screens);
        let entry = build_entry(&app, &tokens(), &index, vec![]).unwrap();
        let names: Vec<_> = entry.scene_modifiers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["environmentObject", "tint", "preferredColorScheme", "onOpenURL"]);
    }

    fn property(name: &str, ty: PropertyType) -> ModelProperty {
        ModelProperty {
            name: name.into(),
            ty,
            default: None,
            persisted: true,
        }
    }

    #[test]
    fn test_build_model() {
        let note = DataModel {
            name: "note".into(),
            properties: vec![
                property("title", PropertyType::String),
                ModelProperty {
                    persisted: false,
                    ..property("draft", PropertyType::Bool)
                },
            ],
            persisted: true,
        };
        let decl = build_model(&note, std::slice::from_ref(&note)).unwrap();
        assert_eq!(decl.type_name, "Note");
        assert!(!decl.properties[0].transient);
        assert!(decl.properties[1].transient);
    }

    #[test]
    fn test_build_model_rejects_bad_properties() {
        let dup = DataModel {
            name: "Note".into(),
            properties: vec![property("title", PropertyType::String), property("title", PropertyType::Int)],
            persisted: true,
        };
        assert!(build_model(&dup, &[]).unwrap_err().contains("more than once"));

        let keyword = DataModel {
            name: "Note".into(),
            properties: vec![property("default", PropertyType::String)],
            persisted: true,
        };
        assert!(build_model(&keyword, &[]).is_err());

        let reserved = DataModel {
            name: "Route".into(),
            properties: vec![],
            persisted: false,
        };
        assert!(build_model(&reserved, &[]).is_err());
    }

    #[test]
    fn test_value_model_cannot_hold_persisted_model() {
        let note = DataModel {
            name: "Note".into(),
            properties: vec![],
            persisted: true,
        };
        let draft = DataModel {
            name: "Draft".into(),
            properties: vec![property("note", PropertyType::Model("Note".into()))],
            persisted: false,
        };
        let models = vec![note, draft];
        assert!(build_model(&models[1], &models).is_err());
    }
}
